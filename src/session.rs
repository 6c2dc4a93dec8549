use crate::ids::ManagerId;
use crate::manager::Manager;
use tracing::info;

/// Root container for everything created during one run.
#[derive(Debug, Default)]
pub struct Session {
    managers: Vec<Manager>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_manager(&mut self, manager: Manager) -> ManagerId {
        let id = manager.id();
        info!(manager = %id, name = %manager.name(), "manager added");
        self.managers.push(manager);
        id
    }

    pub fn managers(&self) -> &[Manager] {
        &self.managers
    }

    pub fn manager(&self, id: ManagerId) -> Option<&Manager> {
        self.managers.iter().find(|m| m.id() == id)
    }

    pub fn manager_at(&self, index: usize) -> Option<&Manager> {
        self.managers.get(index)
    }

    pub fn manager_at_mut(&mut self, index: usize) -> Option<&mut Manager> {
        self.managers.get_mut(index)
    }

    pub fn manager_count(&self) -> usize {
        self.managers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn managers_keep_insertion_order() {
        let mut session = Session::new();
        let ana = session.add_manager(Manager::new("Ana").unwrap());
        session.add_manager(Manager::new("Bruno").unwrap());
        assert_eq!(session.manager_count(), 2);
        assert_eq!(session.manager_at(0).unwrap().id(), ana);
        assert_eq!(session.manager_at(1).unwrap().name(), "Bruno");
        assert_eq!(session.manager(ana).unwrap().name(), "Ana");
    }
}

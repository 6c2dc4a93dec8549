use crate::error::{ModelError, ModelResult};
use crate::ids::{ManagerId, ProjectId};
use crate::project::{Project, TaskSummary};
use serde::Serialize;
use std::fmt;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Manager {
    id: ManagerId,
    name: String,
    projects: Vec<Project>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectSummary {
    pub name: String,
    pub task_count: usize,
}

impl fmt::Display for ProjectSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (tasks: {})", self.name, self.task_count)
    }
}

/// Tasks of one project, as shown by the "all tasks" listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectTasks {
    pub project: String,
    pub tasks: Vec<TaskSummary>,
}

impl Manager {
    pub fn new(name: impl Into<String>) -> ModelResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ModelError::EmptyName);
        }
        Ok(Self {
            id: ManagerId::new(),
            name,
            projects: Vec::new(),
        })
    }

    pub fn id(&self) -> ManagerId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn project(&self, id: ProjectId) -> Option<&Project> {
        self.projects.iter().find(|p| p.id() == id)
    }

    pub fn project_mut(&mut self, id: ProjectId) -> Option<&mut Project> {
        self.projects.iter_mut().find(|p| p.id() == id)
    }

    pub fn project_at(&self, index: usize) -> Option<&Project> {
        self.projects.get(index)
    }

    pub fn project_at_mut(&mut self, index: usize) -> Option<&mut Project> {
        self.projects.get_mut(index)
    }

    pub(crate) fn projects_mut(&mut self) -> &mut [Project] {
        &mut self.projects
    }

    /// Appends `project` and points its back-reference at this manager.
    ///
    /// There is no duplicate check.
    pub fn add_project(&mut self, mut project: Project) -> ProjectId {
        project.set_manager(Some(self.id));
        let id = project.id();
        info!(manager = %self.id, project = %id, name = %project.name(), "project added");
        self.projects.push(project);
        id
    }

    /// Removes the first project with handle `id` and hands it back detached.
    pub fn remove_project(&mut self, id: ProjectId) -> ModelResult<Project> {
        let index = self
            .projects
            .iter()
            .position(|p| p.id() == id)
            .ok_or(ModelError::ProjectNotFound(id))?;
        let mut project = self.projects.remove(index);
        project.set_manager(None);
        info!(manager = %self.id, project = %id, "project removed");
        Ok(project)
    }

    pub fn list_projects(&self) -> Vec<ProjectSummary> {
        debug!(manager = %self.id, count = self.projects.len(), "listing projects");
        self.projects
            .iter()
            .map(|p| ProjectSummary {
                name: p.name().to_string(),
                task_count: p.tasks().len(),
            })
            .collect()
    }

    pub fn list_all_tasks(&self) -> Vec<ProjectTasks> {
        self.projects
            .iter()
            .map(|p| ProjectTasks {
                project: p.name().to_string(),
                tasks: p.list_tasks(),
            })
            .collect()
    }

    pub fn task_count(&self) -> usize {
        self.projects.iter().map(|p| p.tasks().len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::Task;
    use pretty_assertions::assert_eq;

    #[test]
    fn add_project_sets_back_reference() {
        let mut manager = Manager::new("Ana").unwrap();
        let id = manager.add_project(Project::new("Website").unwrap());
        assert_eq!(manager.project(id).unwrap().manager(), Some(manager.id()));
    }

    #[test]
    fn remove_project_clears_back_reference() {
        let mut manager = Manager::new("Ana").unwrap();
        let id = manager.add_project(Project::new("Website").unwrap());
        let removed = manager.remove_project(id).unwrap();
        assert_eq!(removed.manager(), None);
        assert!(manager.projects().is_empty());
    }

    #[test]
    fn remove_missing_project_fails() {
        let mut manager = Manager::new("Ana").unwrap();
        let stray = Project::new("Other").unwrap();
        assert_eq!(
            manager.remove_project(stray.id()),
            Err(ModelError::ProjectNotFound(stray.id()))
        );
    }

    #[test]
    fn listings_do_not_mutate() {
        let mut manager = Manager::new("Ana").unwrap();
        let id = manager.add_project(Project::new("Website").unwrap());
        manager
            .project_mut(id)
            .unwrap()
            .add_task(Task::new("Design homepage", "").unwrap());
        manager.add_project(Project::new("Mobile").unwrap());
        let before = manager.clone();

        let projects = manager.list_projects();
        assert_eq!(projects, manager.list_projects());
        assert_eq!(projects[0].to_string(), "Website (tasks: 1)");
        assert_eq!(projects[1].to_string(), "Mobile (tasks: 0)");

        let grouped = manager.list_all_tasks();
        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped[0].tasks[0].name, "Design homepage");
        assert!(grouped[1].tasks.is_empty());
        assert_eq!(manager, before);
        assert_eq!(manager.task_count(), 1);
    }
}

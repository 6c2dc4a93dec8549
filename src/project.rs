use crate::error::{ModelError, ModelResult};
use crate::ids::{ManagerId, ProjectId, TaskId};
use crate::input::format_deadline;
use crate::task::{Priority, Task, TaskStatus};
use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Project {
    id: ProjectId,
    name: String,
    tasks: Vec<Task>,
    #[serde(skip)]
    manager: Option<ManagerId>,
}

/// One line of a task listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskSummary {
    pub name: String,
    pub status: TaskStatus,
    pub priority: Priority,
    pub deadline: Option<NaiveDate>,
}

impl From<&Task> for TaskSummary {
    fn from(task: &Task) -> Self {
        Self {
            name: task.name().to_string(),
            status: task.status(),
            priority: task.priority(),
            deadline: task.deadline(),
        }
    }
}

impl fmt::Display for TaskSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} | Status: {} | Priority: {} | Deadline: {}",
            self.name,
            self.status,
            self.priority,
            format_deadline(self.deadline)
        )
    }
}

impl Project {
    pub fn new(name: impl Into<String>) -> ModelResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ModelError::EmptyName);
        }
        Ok(Self {
            id: ProjectId::new(),
            name,
            tasks: Vec::new(),
            manager: None,
        })
    }

    pub fn id(&self) -> ProjectId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Owning manager, if the project currently sits in one.
    pub fn manager(&self) -> Option<ManagerId> {
        self.manager
    }

    pub(crate) fn set_manager(&mut self, manager: Option<ManagerId>) {
        self.manager = manager;
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub(crate) fn tasks_mut(&mut self) -> &mut [Task] {
        &mut self.tasks
    }

    pub fn task(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id() == id)
    }

    pub fn task_mut(&mut self, id: TaskId) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id() == id)
    }

    pub fn task_at(&self, index: usize) -> Option<&Task> {
        self.tasks.get(index)
    }

    pub fn task_at_mut(&mut self, index: usize) -> Option<&mut Task> {
        self.tasks.get_mut(index)
    }

    /// Appends `task` and points its back-reference at this project.
    ///
    /// There is no duplicate check.
    pub fn add_task(&mut self, mut task: Task) -> TaskId {
        task.set_project(Some(self.id));
        let id = task.id();
        info!(project = %self.id, task = %id, name = %task.name(), "task added");
        self.tasks.push(task);
        id
    }

    /// Removes the first task with handle `id` and hands it back detached.
    pub fn remove_task(&mut self, id: TaskId) -> ModelResult<Task> {
        let index = self
            .tasks
            .iter()
            .position(|t| t.id() == id)
            .ok_or(ModelError::TaskNotFound(id))?;
        let mut task = self.tasks.remove(index);
        task.set_project(None);
        info!(project = %self.id, task = %id, "task removed");
        Ok(task)
    }

    pub fn list_tasks(&self) -> Vec<TaskSummary> {
        debug!(project = %self.id, count = self.tasks.len(), "listing tasks");
        self.tasks.iter().map(TaskSummary::from).collect()
    }
}

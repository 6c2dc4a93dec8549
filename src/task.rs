use crate::error::{ModelError, ModelResult, ParseLabelError};
use crate::ids::{ProjectId, TaskId};
use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Pending,
    InProgress,
    Done,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 3] = [Self::Pending, Self::InProgress, Self::Done];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::InProgress => "In progress",
            Self::Done => "Done",
        }
    }

    /// Neighbour towards `Done`, clamped at the last status.
    pub fn next(self) -> Self {
        match self {
            Self::Pending => Self::InProgress,
            Self::InProgress | Self::Done => Self::Done,
        }
    }

    /// Neighbour towards `Pending`, clamped at the first status.
    pub fn previous(self) -> Self {
        match self {
            Self::Done => Self::InProgress,
            Self::InProgress | Self::Pending => Self::Pending,
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = ParseLabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" | "pendente" => Ok(Self::Pending),
            "in progress" | "in-progress" | "inprogress" | "in_progress" | "em andamento" => {
                Ok(Self::InProgress)
            }
            "done" | "concluída" | "concluida" => Ok(Self::Done),
            _ => Err(ParseLabelError {
                kind: "status",
                value: s.trim().to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = ParseLabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" | "baixa" => Ok(Self::Low),
            "medium" | "média" | "media" => Ok(Self::Medium),
            "high" | "alta" => Ok(Self::High),
            _ => Err(ParseLabelError {
                kind: "priority",
                value: s.trim().to_string(),
            }),
        }
    }
}

/// One field of a partial update: either leave the current value alone or
/// replace it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FieldUpdate<T> {
    #[default]
    Keep,
    Set(T),
}

impl<T> FieldUpdate<T> {
    pub fn is_keep(&self) -> bool {
        matches!(self, Self::Keep)
    }

    fn apply(self, slot: &mut T) {
        if let Self::Set(value) = self {
            *slot = value;
        }
    }
}

impl FieldUpdate<String> {
    fn apply_non_blank(self, slot: &mut String) {
        match self {
            Self::Set(value) if !value.trim().is_empty() => *slot = value,
            _ => {}
        }
    }
}

/// Changes for `Task::update_fields`. Every field defaults to `Keep`.
///
/// `deadline: Set(None)` clears the deadline, `Keep` leaves it as is.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TaskUpdate {
    pub name: FieldUpdate<String>,
    pub description: FieldUpdate<String>,
    pub priority: FieldUpdate<Priority>,
    pub deadline: FieldUpdate<Option<NaiveDate>>,
}

impl TaskUpdate {
    pub fn is_noop(&self) -> bool {
        self.name.is_keep()
            && self.description.is_keep()
            && self.priority.is_keep()
            && self.deadline.is_keep()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Task {
    id: TaskId,
    name: String,
    description: String,
    status: TaskStatus,
    priority: Priority,
    deadline: Option<NaiveDate>,
    #[serde(skip)]
    project: Option<ProjectId>,
}

impl Task {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> ModelResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ModelError::EmptyName);
        }
        Ok(Self {
            id: TaskId::new(),
            name,
            description: description.into(),
            status: TaskStatus::Pending,
            priority: Priority::default(),
            deadline: None,
            project: None,
        })
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_deadline(mut self, deadline: Option<NaiveDate>) -> Self {
        self.deadline = deadline;
        self
    }

    pub fn id(&self) -> TaskId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn status(&self) -> TaskStatus {
        self.status
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }

    pub fn deadline(&self) -> Option<NaiveDate> {
        self.deadline
    }

    /// Owning project, if the task currently sits in one.
    pub fn project(&self) -> Option<ProjectId> {
        self.project
    }

    pub(crate) fn set_project(&mut self, project: Option<ProjectId>) {
        self.project = project;
    }

    /// Overwrites the status. Any status may follow any other.
    pub fn update_status(&mut self, status: TaskStatus) {
        info!(task = %self.id, from = %self.status, to = %status, "task status updated");
        self.status = status;
    }

    pub fn update_fields(&mut self, update: TaskUpdate) {
        if update.is_noop() {
            return;
        }

        let TaskUpdate {
            name,
            description,
            priority,
            deadline,
        } = update;

        // Blank text keeps the current value.
        name.apply_non_blank(&mut self.name);
        description.apply_non_blank(&mut self.description);
        priority.apply(&mut self.priority);
        deadline.apply(&mut self.deadline);

        info!(task = %self.id, name = %self.name, "task fields updated");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn sample() -> Task {
        Task::new("Design homepage", "Wireframes first")
            .unwrap()
            .with_priority(Priority::High)
            .with_deadline(NaiveDate::from_ymd_opt(2025, 12, 31))
    }

    #[test]
    fn new_task_defaults() {
        let task = Task::new("Write docs", "").unwrap();
        assert_eq!(task.status(), TaskStatus::Pending);
        assert_eq!(task.priority(), Priority::Medium);
        assert_eq!(task.deadline(), None);
        assert_eq!(task.project(), None);
        assert_eq!(task.description(), "");
    }

    #[test]
    fn new_task_rejects_blank_name() {
        assert_eq!(Task::new("   ", "x"), Err(ModelError::EmptyName));
    }

    #[test]
    fn empty_update_leaves_task_unchanged() {
        let mut task = sample();
        let before = task.clone();
        task.update_fields(TaskUpdate::default());
        assert_eq!(task, before);
    }

    #[test]
    fn explicit_none_clears_deadline() {
        let mut task = sample();
        task.update_fields(TaskUpdate {
            deadline: FieldUpdate::Set(None),
            ..Default::default()
        });
        assert_eq!(task.deadline(), None);
        assert_eq!(task.name(), "Design homepage");
    }

    #[test]
    fn omitted_deadline_is_kept() {
        let mut task = sample();
        task.update_fields(TaskUpdate {
            name: FieldUpdate::Set("Design landing page".to_string()),
            ..Default::default()
        });
        assert_eq!(task.name(), "Design landing page");
        assert_eq!(task.deadline(), NaiveDate::from_ymd_opt(2025, 12, 31));
    }

    #[test]
    fn blank_text_updates_are_ignored() {
        let mut task = sample();
        task.update_fields(TaskUpdate {
            name: FieldUpdate::Set(String::new()),
            description: FieldUpdate::Set("  ".to_string()),
            priority: FieldUpdate::Set(Priority::Low),
            ..Default::default()
        });
        assert_eq!(task.name(), "Design homepage");
        assert_eq!(task.description(), "Wireframes first");
        assert_eq!(task.priority(), Priority::Low);
    }

    #[test]
    fn non_blank_description_replaces() {
        let mut task = sample();
        task.update_fields(TaskUpdate {
            description: FieldUpdate::Set("Mobile first".to_string()),
            ..Default::default()
        });
        assert_eq!(task.description(), "Mobile first");
    }

    #[test]
    fn status_accepts_any_transition() {
        let mut task = sample();
        task.update_status(TaskStatus::Done);
        assert_eq!(task.status(), TaskStatus::Done);
        task.update_status(TaskStatus::Pending);
        assert_eq!(task.status(), TaskStatus::Pending);
    }

    #[rstest]
    #[case("Pending", TaskStatus::Pending)]
    #[case("pendente", TaskStatus::Pending)]
    #[case("In progress", TaskStatus::InProgress)]
    #[case("Em andamento", TaskStatus::InProgress)]
    #[case("Concluída", TaskStatus::Done)]
    #[case(" DONE ", TaskStatus::Done)]
    fn status_labels(#[case] input: &str, #[case] expected: TaskStatus) {
        assert_eq!(input.parse::<TaskStatus>().unwrap(), expected);
    }

    #[test]
    fn unknown_status_label_is_rejected() {
        let err = "blocked".parse::<TaskStatus>().unwrap_err();
        assert_eq!(err.kind, "status");
        assert_eq!(err.value, "blocked");
    }

    #[rstest]
    #[case("baixa", Priority::Low)]
    #[case("Média", Priority::Medium)]
    #[case("high", Priority::High)]
    fn priority_labels(#[case] input: &str, #[case] expected: Priority) {
        assert_eq!(input.parse::<Priority>().unwrap(), expected);
    }

    #[test]
    fn status_neighbours_are_clamped() {
        assert_eq!(TaskStatus::Pending.previous(), TaskStatus::Pending);
        assert_eq!(TaskStatus::Pending.next(), TaskStatus::InProgress);
        assert_eq!(TaskStatus::Done.next(), TaskStatus::Done);
        assert_eq!(TaskStatus::Done.previous(), TaskStatus::InProgress);
    }
}

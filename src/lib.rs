//! In-memory managers, projects and tasks driven from a text menu.

pub mod board;
pub mod config;
pub mod console;
pub mod error;
pub mod ids;
pub mod input;
pub mod manager;
pub mod project;
pub mod session;
pub mod task;

pub use console::{Console, ConsoleOptions};
pub use error::{ModelError, ModelResult, ParseLabelError};
pub use ids::{ManagerId, ProjectId, TaskId};
pub use input::InputError;
pub use manager::{Manager, ProjectSummary, ProjectTasks};
pub use project::{Project, TaskSummary};
pub use session::Session;
pub use task::{FieldUpdate, Priority, Task, TaskStatus, TaskUpdate};

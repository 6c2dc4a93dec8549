//! Numbered text menu driving the session.
//!
//! Every answer is validated before an entity method is called, so a
//! rejected input leaves the session untouched and returns to the menu.

use crate::board;
use crate::input::{self, InputError};
use crate::manager::Manager;
use crate::project::Project;
use crate::session::Session;
use crate::task::{Task, TaskUpdate};
use crossterm::style::{style, Stylize};
use std::io::{self, BufRead, Write};
use tracing::{debug, warn};

const MENU: &str = "\n=== PROJECTS AND TASKS ===
1. Create Manager
2. Create Project
3. Create Task
4. List a Manager's Projects
5. List a Project's Tasks
6. Update a Task's Status
7. Edit a Task (name/description/priority/deadline)
8. List all Tasks of a Manager
9. Delete Project
10. Delete Task
11. Show a Manager's Board
12. Export a Manager as JSON
0. Exit";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConsoleOptions {
    pub color: bool,
}

impl Default for ConsoleOptions {
    fn default() -> Self {
        Self { color: true }
    }
}

/// Whether the menu loop keeps going after an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Exit,
}

/// Result of a selection prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pick<T> {
    Picked(T),
    Cancel,
    /// Input ended while waiting for an answer.
    Closed,
}

macro_rules! picked {
    ($pick:expr) => {
        match $pick? {
            Pick::Picked(value) => value,
            Pick::Cancel => return Ok(Flow::Continue),
            Pick::Closed => return Ok(Flow::Exit),
        }
    };
}

macro_rules! answer {
    ($read:expr) => {
        match $read? {
            Some(line) => line,
            None => return Ok(Flow::Exit),
        }
    };
}

pub type BoardViewer = fn(&mut Manager) -> io::Result<()>;

pub struct Console<R, W> {
    input: R,
    output: W,
    options: ConsoleOptions,
    board_viewer: BoardViewer,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W, options: ConsoleOptions) -> Self {
        Self {
            input,
            output,
            options,
            board_viewer: board::show_board,
        }
    }

    /// Replaces the full-screen board, e.g. when no terminal is attached.
    pub fn with_board_viewer(mut self, viewer: BoardViewer) -> Self {
        self.board_viewer = viewer;
        self
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Runs the menu until the user picks 0 or input ends.
    pub fn run(&mut self, session: &mut Session) -> io::Result<()> {
        loop {
            writeln!(self.output, "{MENU}")?;
            let Some(choice) = self.prompt("Choose an option: ")? else {
                debug!("input closed, leaving menu");
                return Ok(());
            };

            let flow = match choice.as_str() {
                "1" => self.create_manager(session)?,
                "2" => self.create_project(session)?,
                "3" => self.create_task(session)?,
                "4" => self.list_projects(session)?,
                "5" => self.list_tasks(session)?,
                "6" => self.update_status(session)?,
                "7" => self.edit_task(session)?,
                "8" => self.list_all_tasks(session)?,
                "9" => self.delete_project(session)?,
                "10" => self.delete_task(session)?,
                "11" => self.show_board(session)?,
                "12" => self.export_manager(session)?,
                "0" => {
                    writeln!(self.output, "Exiting... see you soon!")?;
                    Flow::Exit
                }
                other => {
                    debug!(choice = other, "unknown menu option");
                    self.error("Invalid option. Try again.")?;
                    Flow::Continue
                }
            };

            if flow == Flow::Exit {
                return Ok(());
            }
        }
    }

    fn create_manager(&mut self, session: &mut Session) -> io::Result<Flow> {
        let name = answer!(self.prompt("Manager name: "));
        match input::require_name(&name).map(Manager::new) {
            Ok(Ok(manager)) => {
                session.add_manager(manager);
                self.success("Manager created.")?;
            }
            _ => self.error("Empty name. Cancelled.")?,
        }
        Ok(Flow::Continue)
    }

    fn create_project(&mut self, session: &mut Session) -> io::Result<Flow> {
        let m = picked!(self.pick_manager(session));
        let name = answer!(self.prompt("Project name: "));
        let project = match input::require_name(&name).map(Project::new) {
            Ok(Ok(project)) => project,
            _ => {
                self.error("Empty name. Cancelled.")?;
                return Ok(Flow::Continue);
            }
        };
        if let Some(manager) = session.manager_at_mut(m) {
            manager.add_project(project);
            self.success("Project added to manager.")?;
        }
        Ok(Flow::Continue)
    }

    fn create_task(&mut self, session: &mut Session) -> io::Result<Flow> {
        let (m, p) = picked!(self.pick_project(session));
        let name = answer!(self.prompt("Task name: "));
        let description = answer!(self.prompt("Task description: "));
        let priority = answer!(self.prompt("Priority (Low/Medium/High) [Medium]: "));
        let deadline = answer!(self.prompt("Deadline (dd/mm/yyyy) or Enter for none: "));

        let task = input::parse_date(&deadline).and_then(|deadline| {
            let priority = input::parse_priority(&priority)?;
            let name = input::require_name(&name)?;
            let task = Task::new(name, description.trim()).map_err(|_| InputError::EmptyName)?;
            Ok(task.with_priority(priority).with_deadline(deadline))
        });
        let task = match task {
            Ok(task) => task,
            Err(err) => {
                self.reject(&err, "Task cancelled.")?;
                return Ok(Flow::Continue);
            }
        };

        if let Some(project) = project_at_mut(session, m, p) {
            project.add_task(task);
            self.success("Task created.")?;
        }
        Ok(Flow::Continue)
    }

    fn list_projects(&mut self, session: &Session) -> io::Result<Flow> {
        let m = picked!(self.pick_manager(session));
        let Some(manager) = session.manager_at(m) else {
            return Ok(Flow::Continue);
        };
        writeln!(self.output, "\nProjects of {}:", manager.name())?;
        let projects = manager.list_projects();
        if projects.is_empty() {
            writeln!(self.output, "  (no projects)")?;
        }
        for (i, summary) in projects.iter().enumerate() {
            writeln!(self.output, "  {}. {}", i + 1, summary)?;
        }
        Ok(Flow::Continue)
    }

    fn list_tasks(&mut self, session: &Session) -> io::Result<Flow> {
        let (m, p) = picked!(self.pick_project(session));
        let Some(project) = session.manager_at(m).and_then(|mg| mg.project_at(p)) else {
            return Ok(Flow::Continue);
        };
        writeln!(self.output, "\nTasks of project '{}':", project.name())?;
        self.print_tasks(project)?;
        Ok(Flow::Continue)
    }

    fn update_status(&mut self, session: &mut Session) -> io::Result<Flow> {
        let (m, p, t) = picked!(self.pick_task(session, "update its status"));
        let answer = answer!(self.prompt("New status (Pending/In progress/Done): "));
        if answer.trim().is_empty() {
            self.error("Empty status. Cancelled.")?;
            return Ok(Flow::Continue);
        }
        let status = match input::parse_status(&answer) {
            Ok(status) => status,
            Err(err) => {
                self.reject(&err, "Cancelled.")?;
                return Ok(Flow::Continue);
            }
        };
        if let Some(task) = project_at_mut(session, m, p).and_then(|pr| pr.task_at_mut(t)) {
            task.update_status(status);
            self.success("Status updated.")?;
        }
        Ok(Flow::Continue)
    }

    fn edit_task(&mut self, session: &mut Session) -> io::Result<Flow> {
        let (m, p, t) = picked!(self.pick_task(session, "edit"));
        let Some(current) = session
            .manager_at(m)
            .and_then(|mg| mg.project_at(p))
            .and_then(|pr| pr.task_at(t))
            .cloned()
        else {
            return Ok(Flow::Continue);
        };

        let name = answer!(self.prompt(&format!(
            "New name [{}] (Enter = keep): ",
            current.name()
        )));
        let description = answer!(self.prompt("New description (Enter = keep): "));
        let priority = answer!(self.prompt(&format!(
            "New priority (Low/Medium/High) [{}] (Enter = keep): ",
            current.priority()
        )));
        let deadline = answer!(self.prompt(&format!(
            "New deadline (dd/mm/yyyy) [{}] (Enter = keep, {} = remove): ",
            input::format_deadline(current.deadline()),
            input::CLEAR_DEADLINE
        )));

        let update = input::priority_edit(&priority).and_then(|priority| {
            Ok(TaskUpdate {
                name: input::text_edit(&name),
                description: input::text_edit(&description),
                priority,
                deadline: input::parse_deadline_edit(&deadline)?,
            })
        });
        let update = match update {
            Ok(update) => update,
            Err(err) => {
                self.reject(&err, "Edit cancelled.")?;
                return Ok(Flow::Continue);
            }
        };

        if let Some(task) = project_at_mut(session, m, p).and_then(|pr| pr.task_at_mut(t)) {
            task.update_fields(update);
            self.success("Task updated.")?;
        }
        Ok(Flow::Continue)
    }

    fn list_all_tasks(&mut self, session: &Session) -> io::Result<Flow> {
        let m = picked!(self.pick_manager(session));
        let Some(manager) = session.manager_at(m) else {
            return Ok(Flow::Continue);
        };
        writeln!(self.output, "\nAll tasks of manager {}:", manager.name())?;
        let grouped = manager.list_all_tasks();
        if grouped.is_empty() {
            writeln!(self.output, "  (no projects)")?;
        }
        for group in grouped {
            writeln!(self.output, "\nProject: {}", group.project)?;
            if group.tasks.is_empty() {
                writeln!(self.output, "  (no tasks)")?;
            }
            for (i, summary) in group.tasks.iter().enumerate() {
                writeln!(self.output, "  {}. {}", i + 1, summary)?;
            }
        }
        Ok(Flow::Continue)
    }

    fn delete_project(&mut self, session: &mut Session) -> io::Result<Flow> {
        let (m, p) = picked!(self.pick_project(session));
        let Some(manager) = session.manager_at_mut(m) else {
            return Ok(Flow::Continue);
        };
        let Some((id, name)) = manager
            .project_at(p)
            .map(|pr| (pr.id(), pr.name().to_string()))
        else {
            return Ok(Flow::Continue);
        };

        let confirm = answer!(self.prompt(&format!("Delete project '{name}'? (y/N): ")));
        if !input::is_confirmation(&confirm) {
            writeln!(self.output, "Cancelled.")?;
            return Ok(Flow::Continue);
        }
        match manager.remove_project(id) {
            Ok(_) => self.success("Project deleted.")?,
            Err(err) => self.error(&err.to_string())?,
        }
        Ok(Flow::Continue)
    }

    fn delete_task(&mut self, session: &mut Session) -> io::Result<Flow> {
        let (m, p, t) = picked!(self.pick_task(session, "delete"));
        let Some(project) = project_at_mut(session, m, p) else {
            return Ok(Flow::Continue);
        };
        let Some((id, name)) = project
            .task_at(t)
            .map(|task| (task.id(), task.name().to_string()))
        else {
            return Ok(Flow::Continue);
        };

        let confirm = answer!(self.prompt(&format!("Delete task '{name}'? (y/N): ")));
        if !input::is_confirmation(&confirm) {
            writeln!(self.output, "Cancelled.")?;
            return Ok(Flow::Continue);
        }
        match project.remove_task(id) {
            Ok(_) => self.success("Task deleted.")?,
            Err(err) => self.error(&err.to_string())?,
        }
        Ok(Flow::Continue)
    }

    fn show_board(&mut self, session: &mut Session) -> io::Result<Flow> {
        let m = picked!(self.pick_manager(session));
        let Some(manager) = session.manager_at_mut(m) else {
            return Ok(Flow::Continue);
        };
        if let Err(err) = (self.board_viewer)(manager) {
            warn!(error = %err, "board failed");
            self.error(&format!("Could not open the board: {err}"))?;
        }
        Ok(Flow::Continue)
    }

    fn export_manager(&mut self, session: &Session) -> io::Result<Flow> {
        let m = picked!(self.pick_manager(session));
        if let Some(manager) = session.manager_at(m) {
            let json = serde_json::to_string_pretty(manager)?;
            writeln!(self.output, "{json}")?;
        }
        Ok(Flow::Continue)
    }

    fn pick_manager(&mut self, session: &Session) -> io::Result<Pick<usize>> {
        let names: Vec<String> = session
            .managers()
            .iter()
            .map(|m| m.name().to_string())
            .collect();
        self.select(&names, "manager")
    }

    fn pick_project(&mut self, session: &Session) -> io::Result<Pick<(usize, usize)>> {
        let m = match self.pick_manager(session)? {
            Pick::Picked(m) => m,
            Pick::Cancel => return Ok(Pick::Cancel),
            Pick::Closed => return Ok(Pick::Closed),
        };
        let names: Vec<String> = session
            .manager_at(m)
            .map(|mg| mg.projects().iter().map(|p| p.name().to_string()).collect())
            .unwrap_or_default();
        Ok(match self.select(&names, "project")? {
            Pick::Picked(p) => Pick::Picked((m, p)),
            Pick::Cancel => Pick::Cancel,
            Pick::Closed => Pick::Closed,
        })
    }

    fn pick_task(
        &mut self,
        session: &Session,
        action: &str,
    ) -> io::Result<Pick<(usize, usize, usize)>> {
        let (m, p) = match self.pick_project(session)? {
            Pick::Picked(path) => path,
            Pick::Cancel => return Ok(Pick::Cancel),
            Pick::Closed => return Ok(Pick::Closed),
        };
        let Some(project) = session.manager_at(m).and_then(|mg| mg.project_at(p)) else {
            return Ok(Pick::Cancel);
        };
        self.print_tasks(project)?;
        let count = project.tasks().len();
        if count == 0 {
            return Ok(Pick::Cancel);
        }
        let prompt = format!("Choose the task number to {action} (or 0 to cancel): ");
        Ok(match self.read_int(&prompt, 0, count)? {
            None => Pick::Closed,
            Some(0) => Pick::Cancel,
            Some(t) => Pick::Picked((m, p, t - 1)),
        })
    }

    fn print_tasks(&mut self, project: &Project) -> io::Result<()> {
        let tasks = project.list_tasks();
        if tasks.is_empty() {
            writeln!(self.output, "  (no tasks)")?;
        }
        for (i, summary) in tasks.iter().enumerate() {
            writeln!(self.output, "  {}. {}", i + 1, summary)?;
        }
        Ok(())
    }

    /// Shows a 1-based list and returns the zero-based index picked.
    fn select(&mut self, names: &[String], title: &str) -> io::Result<Pick<usize>> {
        if names.is_empty() {
            writeln!(self.output, "{title}: (empty list)")?;
            return Ok(Pick::Cancel);
        }
        for (i, name) in names.iter().enumerate() {
            writeln!(self.output, "  {}. {}", i + 1, name)?;
        }
        let prompt = format!("Choose the {title} number (or 0 to cancel): ");
        Ok(match self.read_int(&prompt, 0, names.len())? {
            None => Pick::Closed,
            Some(0) => {
                debug!(title, "selection cancelled");
                Pick::Cancel
            }
            Some(n) => Pick::Picked(n - 1),
        })
    }

    /// Asks until a number within `min..=max` is typed. `None` on end of input.
    fn read_int(&mut self, prompt: &str, min: usize, max: usize) -> io::Result<Option<usize>> {
        loop {
            let Some(answer) = self.prompt(prompt)? else {
                return Ok(None);
            };
            if answer.is_empty() {
                writeln!(self.output, "Empty input. Type a number.")?;
                continue;
            }
            let Ok(n) = answer.parse::<usize>() else {
                writeln!(self.output, "Type a valid number.")?;
                continue;
            };
            if n < min {
                writeln!(self.output, "Minimum value: {min}")?;
                continue;
            }
            if n > max {
                writeln!(self.output, "Maximum value: {max}")?;
                continue;
            }
            return Ok(Some(n));
        }
    }

    /// Prints `message` and reads one trimmed line. `None` on end of input.
    fn prompt(&mut self, message: &str) -> io::Result<Option<String>> {
        write!(self.output, "{message}")?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            writeln!(self.output)?;
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn reject(&mut self, err: &InputError, outcome: &str) -> io::Result<()> {
        warn!(error = %err, "input rejected");
        let message = match err {
            InputError::InvalidDate(_) => format!("Invalid date format. Use dd/mm/yyyy. {outcome}"),
            InputError::EmptyName => format!("Empty name. {outcome}"),
            other => format!("{}. {outcome}", capitalize(&other.to_string())),
        };
        self.error(&message)
    }

    fn success(&mut self, message: &str) -> io::Result<()> {
        if self.options.color {
            writeln!(self.output, "{}", style(message).green())
        } else {
            writeln!(self.output, "{message}")
        }
    }

    fn error(&mut self, message: &str) -> io::Result<()> {
        if self.options.color {
            writeln!(self.output, "{}", style(message).red())
        } else {
            writeln!(self.output, "{message}")
        }
    }
}

fn project_at_mut(session: &mut Session, m: usize, p: usize) -> Option<&mut Project> {
    session.manager_at_mut(m).and_then(|mg| mg.project_at_mut(p))
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

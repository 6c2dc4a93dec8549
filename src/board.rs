//! Full-screen board of one manager's tasks, one column per status.

use crate::manager::Manager;
use crate::task::{Task, TaskStatus};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState},
    Frame, Terminal,
};
use std::io;
use tracing::{debug, warn};

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BoardState {
    selected_status: usize,
    selected_task: usize,
}

impl BoardState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> TaskStatus {
        TaskStatus::ALL
            .get(self.selected_status)
            .copied()
            .unwrap_or_default()
    }

    /// Row of the cursor inside the selected column.
    pub fn selected_task(&self) -> usize {
        self.selected_task
    }

    /// Applies one key press. Returns `false` when the board should close.
    pub fn handle_key(&mut self, manager: &mut Manager, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return false,
            KeyCode::Left => {
                if self.selected_status > 0 {
                    self.selected_status -= 1;
                    self.selected_task = 0;
                }
            }
            KeyCode::Right => {
                if self.selected_status < TaskStatus::ALL.len() - 1 {
                    self.selected_status += 1;
                    self.selected_task = 0;
                }
            }
            KeyCode::Up => {
                self.selected_task = self.selected_task.saturating_sub(1);
            }
            KeyCode::Down => {
                let max_tasks = tasks_in(manager, self.status()).len();
                if self.selected_task + 1 < max_tasks {
                    self.selected_task += 1;
                }
            }
            KeyCode::Enter => self.move_task(manager, TaskStatus::next),
            KeyCode::Backspace => self.move_task(manager, TaskStatus::previous),
            _ => {}
        }
        true
    }

    fn move_task(&mut self, manager: &mut Manager, step: fn(TaskStatus) -> TaskStatus) {
        let status = self.status();
        let selected = self.selected_task;
        let task = manager
            .projects_mut()
            .iter_mut()
            .flat_map(|p| p.tasks_mut().iter_mut())
            .filter(|t| t.status() == status)
            .nth(selected);
        if let Some(task) = task {
            let target = step(status);
            if target != status {
                task.update_status(target);
            }
        }
        // Keep the cursor inside the column that just shrank.
        let remaining = tasks_in(manager, status).len();
        self.selected_task = self.selected_task.min(remaining.saturating_sub(1));
    }
}

/// Tasks with `status` across all projects, paired with their project name.
pub fn tasks_in(manager: &Manager, status: TaskStatus) -> Vec<(&str, &Task)> {
    manager
        .projects()
        .iter()
        .flat_map(|p| p.tasks().iter().map(move |t| (p.name(), t)))
        .filter(|(_, t)| t.status() == status)
        .collect()
}

pub fn render_board(f: &mut Frame, manager: &Manager, state: &BoardState) {
    let outer = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Min(3), Constraint::Length(1)])
        .split(f.area());
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(vec![
            Constraint::Percentage(33),
            Constraint::Percentage(33),
            Constraint::Percentage(34),
        ])
        .split(outer[0]);

    for (i, status) in TaskStatus::ALL.iter().enumerate() {
        let tasks = tasks_in(manager, *status);
        let items: Vec<ListItem> = tasks
            .iter()
            .map(|(project, t)| {
                ListItem::new(Line::from(vec![
                    Span::raw(format!("[{}] ", project)),
                    Span::styled(t.name(), Style::default().fg(Color::White)),
                    Span::raw(format!(" ({})", t.priority())),
                ]))
            })
            .collect();

        let selected = state.status() == *status;
        let list = List::new(items)
            .block(
                Block::default()
                    .title(format!("{} - {}", manager.name(), status))
                    .borders(Borders::ALL)
                    .border_style(if selected {
                        Style::default().fg(Color::Cyan)
                    } else {
                        Style::default()
                    }),
            )
            .highlight_style(Style::default().add_modifier(Modifier::BOLD))
            .highlight_symbol("> ");

        let mut list_state =
            ListState::default().with_selected(selected.then_some(state.selected_task));
        f.render_stateful_widget(list, chunks[i], &mut list_state);
    }

    let help = Line::from("←/→ column  ↑/↓ task  Enter next status  Backspace previous  q back");
    f.render_widget(help, outer[1]);
}

pub fn run_board<B: Backend>(
    terminal: &mut Terminal<B>,
    manager: &mut Manager,
    state: &mut BoardState,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| render_board(f, manager, state))?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if !state.handle_key(manager, key.code) {
                return Ok(());
            }
        }
    }
}

/// Leaves raw mode when dropped, whichever way the board exits.
struct RawModeGuard;

impl RawModeGuard {
    fn enable() -> io::Result<Self> {
        enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        if let Err(err) = disable_raw_mode() {
            warn!(error = %err, "failed to leave raw mode");
        }
    }
}

/// Takes over the terminal until the user leaves the board.
pub fn show_board(manager: &mut Manager) -> io::Result<()> {
    debug!(manager = %manager.id(), "opening board");
    let _raw_mode = RawModeGuard::enable()?;
    let mut stdout = io::stdout();
    if let Err(err) = execute!(stdout, EnterAlternateScreen, EnableMouseCapture) {
        let _ = execute!(stdout, LeaveAlternateScreen, DisableMouseCapture);
        return Err(err);
    }

    let result = Terminal::new(CrosstermBackend::new(io::stdout())).and_then(|mut terminal| {
        let mut state = BoardState::new();
        let result = run_board(&mut terminal, manager, &mut state);
        terminal.show_cursor()?;
        result
    });

    execute!(stdout, LeaveAlternateScreen, DisableMouseCapture)?;
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::Project;
    use ratatui::backend::TestBackend;

    fn manager() -> Manager {
        let mut manager = Manager::new("Ana").unwrap();
        let mut website = Project::new("Website").unwrap();
        website.add_task(Task::new("Design homepage", "").unwrap());
        website.add_task(Task::new("Write copy", "").unwrap());
        let mut mobile = Project::new("Mobile").unwrap();
        mobile.add_task(Task::new("Login screen", "").unwrap());
        manager.add_project(website);
        manager.add_project(mobile);
        manager
    }

    #[test]
    fn columns_collect_across_projects() {
        let manager = manager();
        let pending = tasks_in(&manager, TaskStatus::Pending);
        assert_eq!(pending.len(), 3);
        assert_eq!(pending[2], ("Mobile", &manager.projects()[1].tasks()[0]));
        assert!(tasks_in(&manager, TaskStatus::Done).is_empty());
    }

    #[test]
    fn enter_moves_selected_task_forward() {
        let mut manager = manager();
        let mut state = BoardState::new();
        assert!(state.handle_key(&mut manager, KeyCode::Down));
        assert!(state.handle_key(&mut manager, KeyCode::Enter));

        let moved = &manager.projects()[0].tasks()[1];
        assert_eq!(moved.name(), "Write copy");
        assert_eq!(moved.status(), TaskStatus::InProgress);
        assert_eq!(state.selected_task(), 1);
        assert_eq!(tasks_in(&manager, TaskStatus::Pending).len(), 2);
    }

    #[test]
    fn backspace_moves_back_and_clamps_at_pending() {
        let mut manager = manager();
        let mut state = BoardState::new();
        state.handle_key(&mut manager, KeyCode::Backspace);
        assert_eq!(tasks_in(&manager, TaskStatus::Pending).len(), 3);

        state.handle_key(&mut manager, KeyCode::Enter);
        state.handle_key(&mut manager, KeyCode::Right);
        state.handle_key(&mut manager, KeyCode::Backspace);
        assert!(tasks_in(&manager, TaskStatus::InProgress).is_empty());
    }

    #[test]
    fn cursor_stays_in_bounds() {
        let mut manager = manager();
        let mut state = BoardState::new();
        for _ in 0..5 {
            state.handle_key(&mut manager, KeyCode::Down);
            state.handle_key(&mut manager, KeyCode::Right);
        }
        assert_eq!(state.status(), TaskStatus::Done);
        assert_eq!(state.selected_task(), 0);
        state.handle_key(&mut manager, KeyCode::Up);
        assert_eq!(state.selected_task(), 0);
    }

    #[test]
    fn out_of_range_column_falls_back_to_pending() {
        let state = BoardState {
            selected_status: 7,
            selected_task: 0,
        };
        assert_eq!(state.status(), TaskStatus::Pending);
    }

    #[test]
    fn quit_keys_close_the_board() {
        let mut manager = manager();
        let mut state = BoardState::new();
        assert!(!state.handle_key(&mut manager, KeyCode::Char('q')));
        assert!(!state.handle_key(&mut manager, KeyCode::Esc));
    }

    #[test]
    fn renders_a_column_per_status() {
        let manager = manager();
        let mut terminal = Terminal::new(TestBackend::new(120, 12)).unwrap();
        terminal
            .draw(|f| render_board(f, &manager, &BoardState::new()))
            .unwrap();
        let screen: String = terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect();
        assert!(screen.contains("Ana - Pending"));
        assert!(screen.contains("Ana - In progress"));
        assert!(screen.contains("Ana - Done"));
        assert!(screen.contains("Design homepage"));
    }
}

// Terminal UI implementation using ratatui
// Dashboard, searchable table and the add/edit/delete dialogs

pub mod app;
pub mod runner;
pub mod ui;

pub use app::{App, Form, FormKind, InputMode, Toast};
pub use runner::run_tui;

//! Application state for the TUI.

use anyhow::Result;
use crickdash_core::catalog::{self, DEFAULT_FIELDER};
use crickdash_core::{Analysis, Chart, Config, ConnectParams, Dataset, QueryResult, Session};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::widgets::ListState;
use tokio::runtime::Runtime;

/// Current view mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    /// Dataset tabs + analysis menu + results
    #[default]
    Dashboard,
    /// Connection form overlay
    Connect,
}

/// Connect form fields, in focus order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Host,
    Port,
    User,
    Password,
    Database,
}

impl FormField {
    pub const ALL: [FormField; 5] = [
        FormField::Host,
        FormField::Port,
        FormField::User,
        FormField::Password,
        FormField::Database,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            FormField::Host => "Host",
            FormField::Port => "Port",
            FormField::User => "Username",
            FormField::Password => "Password",
            FormField::Database => "Database",
        }
    }
}

/// Text inputs for the connection form.
#[derive(Debug, Clone, Default)]
pub struct ConnectForm {
    pub host: String,
    pub port: String,
    pub user: String,
    pub password: String,
    pub database: String,
    /// Index into [`FormField::ALL`]
    pub focus: usize,
}

impl ConnectForm {
    fn from_config(config: &Config) -> Self {
        Self {
            host: config.connection.host.clone(),
            port: config.connection.port.to_string(),
            user: config.connection.user.clone(),
            password: String::new(),
            database: config.connection.database.clone(),
            focus: 0,
        }
    }

    pub fn focused(&self) -> FormField {
        FormField::ALL[self.focus]
    }

    fn focused_value_mut(&mut self) -> &mut String {
        match self.focused() {
            FormField::Host => &mut self.host,
            FormField::Port => &mut self.port,
            FormField::User => &mut self.user,
            FormField::Password => &mut self.password,
            FormField::Database => &mut self.database,
        }
    }

    pub fn value(&self, field: FormField) -> &str {
        match field {
            FormField::Host => &self.host,
            FormField::Port => &self.port,
            FormField::User => &self.user,
            FormField::Password => &self.password,
            FormField::Database => &self.database,
        }
    }
}

/// Status line content: either a success note or a verbatim error.
#[derive(Debug, Clone)]
pub struct Status {
    pub text: String,
    pub is_error: bool,
}

impl Status {
    fn ok(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: false,
        }
    }

    fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: true,
        }
    }
}

/// Main application state.
pub struct App {
    /// The database session (at most one connection)
    session: Session,
    /// Runtime for blocking on driver calls, one per app
    runtime: Runtime,
    /// Current view mode
    pub view_mode: ViewMode,
    /// Index into [`Dataset::ALL`] for the active tab
    pub dataset_index: usize,
    /// Analysis menu selection state
    pub analysis_state: ListState,
    /// Fielder-name input for the parameterized analysis
    pub fielder: String,
    /// True while the fielder input is capturing keys
    pub editing_fielder: bool,
    /// Connection form state
    pub form: ConnectForm,
    /// Last query result, if any
    pub result: Option<QueryResult>,
    /// Charts classified for the last result
    pub charts: Vec<Chart>,
    /// Status line (success or verbatim error)
    pub status: Option<Status>,
    /// Whether the app should exit
    pub should_quit: bool,
}

impl App {
    /// Create a new App with form prefills from config.
    pub fn new(config: &Config) -> Result<Self> {
        let mut analysis_state = ListState::default();
        analysis_state.select(Some(0));

        Ok(Self {
            session: Session::new(),
            runtime: Runtime::new()?,
            view_mode: ViewMode::default(),
            dataset_index: 0,
            analysis_state,
            fielder: DEFAULT_FIELDER.to_string(),
            editing_fielder: false,
            form: ConnectForm::from_config(config),
            result: None,
            charts: Vec::new(),
            status: None,
            should_quit: false,
        })
    }

    /// The dataset for the active tab.
    pub fn dataset(&self) -> Dataset {
        Dataset::ALL[self.dataset_index]
    }

    /// The analysis currently highlighted in the menu.
    pub fn selected_analysis(&self) -> Analysis {
        let idx = self.analysis_state.selected().unwrap_or(0);
        Analysis::ALL[idx.min(Analysis::ALL.len() - 1)]
    }

    /// True if connected to the database.
    pub fn is_connected(&self) -> bool {
        self.session.is_connected()
    }

    /// Tear down the session on exit.
    pub fn shutdown(&mut self) {
        self.runtime.block_on(self.session.disconnect());
    }

    /// Handle keyboard input.
    pub fn handle_key(&mut self, key: KeyEvent) {
        match self.view_mode {
            ViewMode::Dashboard => {
                if self.editing_fielder {
                    self.handle_fielder_key(key);
                } else {
                    self.handle_dashboard_key(key);
                }
            }
            ViewMode::Connect => self.handle_form_key(key),
        }
    }

    /// Handle keyboard input in the dashboard view.
    fn handle_dashboard_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => {
                self.should_quit = true;
            }
            KeyCode::Tab => {
                self.next_dataset();
            }
            KeyCode::BackTab => {
                self.previous_dataset();
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.select_next_analysis();
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.select_previous_analysis();
            }
            KeyCode::Home | KeyCode::Char('g') => {
                self.analysis_state.select(Some(0));
            }
            KeyCode::End | KeyCode::Char('G') => {
                self.analysis_state.select(Some(Analysis::ALL.len() - 1));
            }
            KeyCode::Enter => {
                self.run_selected_analysis();
            }
            KeyCode::Char('c') => {
                self.open_connect_form();
            }
            KeyCode::Char('d') => {
                self.disconnect();
            }
            KeyCode::Char('f') => {
                if self.selected_analysis().takes_fielder() {
                    self.editing_fielder = true;
                }
            }
            _ => {}
        }
    }

    /// Handle keyboard input while editing the fielder name.
    fn handle_fielder_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter | KeyCode::Esc => {
                self.editing_fielder = false;
            }
            KeyCode::Backspace => {
                self.fielder.pop();
            }
            KeyCode::Char(c) => {
                self.fielder.push(c);
            }
            _ => {}
        }
    }

    /// Handle keyboard input in the connection form.
    fn handle_form_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.view_mode = ViewMode::Dashboard;
            }
            KeyCode::Enter => {
                self.connect();
            }
            KeyCode::Tab | KeyCode::Down => {
                self.form.focus = (self.form.focus + 1) % FormField::ALL.len();
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.form.focus =
                    (self.form.focus + FormField::ALL.len() - 1) % FormField::ALL.len();
            }
            KeyCode::Backspace => {
                self.form.focused_value_mut().pop();
            }
            KeyCode::Char(c) => {
                self.form.focused_value_mut().push(c);
            }
            _ => {}
        }
    }

    /// Advance to the next dataset tab; stale results do not carry across.
    fn next_dataset(&mut self) {
        self.dataset_index = (self.dataset_index + 1) % Dataset::ALL.len();
        self.clear_output();
    }

    /// Go back one dataset tab.
    fn previous_dataset(&mut self) {
        self.dataset_index =
            (self.dataset_index + Dataset::ALL.len() - 1) % Dataset::ALL.len();
        self.clear_output();
    }

    /// Select the next analysis in the menu.
    fn select_next_analysis(&mut self) {
        let i = match self.analysis_state.selected() {
            Some(i) => {
                if i >= Analysis::ALL.len() - 1 {
                    0
                } else {
                    i + 1
                }
            }
            None => 0,
        };
        self.analysis_state.select(Some(i));
    }

    /// Select the previous analysis in the menu.
    fn select_previous_analysis(&mut self) {
        let i = match self.analysis_state.selected() {
            Some(i) => {
                if i == 0 {
                    Analysis::ALL.len() - 1
                } else {
                    i - 1
                }
            }
            None => 0,
        };
        self.analysis_state.select(Some(i));
    }

    fn clear_output(&mut self) {
        self.result = None;
        self.charts.clear();
    }

    /// Open the connection form.
    fn open_connect_form(&mut self) {
        self.form.focus = 0;
        self.view_mode = ViewMode::Connect;
    }

    /// Attempt to connect with the form's parameters.
    fn connect(&mut self) {
        let port = match self.form.port.trim().parse::<u16>() {
            Ok(p) => p,
            Err(_) => {
                self.status = Some(Status::error(format!(
                    "Invalid port: {}",
                    self.form.port
                )));
                return;
            }
        };

        let params = ConnectParams {
            host: self.form.host.trim().to_string(),
            port,
            user: self.form.user.trim().to_string(),
            password: self.form.password.clone(),
            database: self.form.database.trim().to_string(),
        };

        match self.runtime.block_on(self.session.connect(&params)) {
            Ok(()) => {
                self.status = Some(Status::ok("Connected successfully!"));
                self.view_mode = ViewMode::Dashboard;
            }
            Err(e) => {
                // Surfaced verbatim; the session stays disconnected.
                self.status = Some(Status::error(format!("Connection failed: {}", e)));
            }
        }
    }

    /// Disconnect, or acknowledge there is nothing to do.
    fn disconnect(&mut self) {
        if self.runtime.block_on(self.session.disconnect()) {
            self.status = Some(Status::ok("Disconnected successfully"));
            self.clear_output();
        } else {
            self.status = Some(Status::ok("Not connected - nothing to do"));
        }
    }

    /// Run the highlighted analysis and classify its result.
    fn run_selected_analysis(&mut self) {
        let analysis = self.selected_analysis();
        let dataset = self.dataset();

        let fielder = analysis
            .takes_fielder()
            .then(|| self.fielder.clone());
        let query = catalog::select(analysis, dataset, fielder.as_deref());

        match self.runtime.block_on(self.session.run_analysis(&query)) {
            Ok((result, charts)) => {
                self.status = Some(Status::ok(format!(
                    "{} - {} rows",
                    analysis.label(),
                    result.rows.len()
                )));
                self.result = Some(result);
                self.charts = charts;
            }
            Err(e) => {
                // No partial output: a failed run replaces the previous one
                // with the verbatim error.
                self.status = Some(Status::error(format!("Error executing query: {}", e)));
                self.clear_output();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn test_app() -> App {
        App::new(&Config::default()).unwrap()
    }

    #[test]
    fn test_tab_cycles_datasets() {
        let mut app = test_app();
        assert_eq!(app.dataset(), Dataset::Test);

        app.handle_key(key(KeyCode::Tab));
        assert_eq!(app.dataset(), Dataset::Odi);

        app.handle_key(key(KeyCode::Tab));
        app.handle_key(key(KeyCode::Tab));
        app.handle_key(key(KeyCode::Tab));
        assert_eq!(app.dataset(), Dataset::Test);

        app.handle_key(key(KeyCode::BackTab));
        assert_eq!(app.dataset(), Dataset::Ipl);
    }

    #[test]
    fn test_analysis_selection_wraps() {
        let mut app = test_app();
        assert_eq!(app.selected_analysis(), Analysis::TeamRuns);

        app.handle_key(key(KeyCode::Up));
        assert_eq!(app.selected_analysis(), Analysis::AllFormatCatches);

        app.handle_key(key(KeyCode::Down));
        assert_eq!(app.selected_analysis(), Analysis::TeamRuns);
    }

    #[test]
    fn test_fielder_editing_only_for_fielder_analysis() {
        let mut app = test_app();

        // TeamRuns does not take a fielder; 'f' is inert.
        app.handle_key(key(KeyCode::Char('f')));
        assert!(!app.editing_fielder);

        // Move to the fielder analysis and edit.
        while app.selected_analysis() != Analysis::CaughtByFielder {
            app.handle_key(key(KeyCode::Down));
        }
        app.handle_key(key(KeyCode::Char('f')));
        assert!(app.editing_fielder);

        app.handle_key(key(KeyCode::Backspace));
        app.handle_key(key(KeyCode::Backspace));
        app.handle_key(key(KeyCode::Backspace));
        app.handle_key(key(KeyCode::Backspace));
        app.handle_key(key(KeyCode::Backspace));
        app.handle_key(key(KeyCode::Char('R')));
        app.handle_key(key(KeyCode::Char('o')));
        app.handle_key(key(KeyCode::Char('o')));
        app.handle_key(key(KeyCode::Char('t')));
        app.handle_key(key(KeyCode::Enter));

        assert!(!app.editing_fielder);
        assert_eq!(app.fielder, "Root");
    }

    #[test]
    fn test_connect_form_focus_cycles() {
        let mut app = test_app();
        app.handle_key(key(KeyCode::Char('c')));
        assert_eq!(app.view_mode, ViewMode::Connect);
        assert_eq!(app.form.focused(), FormField::Host);

        app.handle_key(key(KeyCode::Tab));
        assert_eq!(app.form.focused(), FormField::Port);

        app.handle_key(key(KeyCode::BackTab));
        app.handle_key(key(KeyCode::BackTab));
        assert_eq!(app.form.focused(), FormField::Database);

        app.handle_key(key(KeyCode::Esc));
        assert_eq!(app.view_mode, ViewMode::Dashboard);
    }

    #[test]
    fn test_form_prefills_from_config_without_password() {
        let app = test_app();
        assert_eq!(app.form.host, "localhost");
        assert_eq!(app.form.port, "3306");
        assert_eq!(app.form.user, "root");
        assert_eq!(app.form.database, "crickets_db");
        assert!(app.form.password.is_empty());
    }

    #[test]
    fn test_disconnect_without_connection_is_acknowledged() {
        let mut app = test_app();
        app.handle_key(key(KeyCode::Char('d')));

        let status = app.status.as_ref().expect("status should be set");
        assert!(!status.is_error);
        assert!(status.text.contains("nothing to do"));
        assert!(!app.is_connected());
    }

    #[test]
    fn test_run_without_connection_reports_error() {
        let mut app = test_app();
        app.handle_key(key(KeyCode::Enter));

        let status = app.status.expect("status should be set");
        assert!(status.is_error);
        assert!(app.result.is_none());
        assert!(app.charts.is_empty());
    }

    #[test]
    fn test_invalid_port_is_rejected_before_connecting() {
        let mut app = test_app();
        app.form.port = "not-a-port".to_string();
        app.handle_key(key(KeyCode::Char('c')));
        app.handle_key(key(KeyCode::Enter));

        let status = app.status.expect("status should be set");
        assert!(status.is_error);
        assert!(status.text.contains("Invalid port"));
        assert_eq!(app.view_mode, ViewMode::Connect);
    }
}

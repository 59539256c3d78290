//! Main TUI application state and logic

use crate::board::Board;
use crate::interpreter::{
    Interrupt, Notice, Pacer, RunOutcome, RunState, RunView, Runner, SpeedControl,
};
use crate::program::Workspace;
use crate::project::{self, StartCorner};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    Frame, Terminal,
};
use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// Longest wait between redraws while a step is pausing
const FRAME: Duration = Duration::from_millis(30);

/// Speed change per `+`/`-` press
const SPEED_NOTCH: i64 = 5;

/// Everything the panes need besides the run itself
pub struct UiState {
    /// Status message to display
    pub status_message: String,

    /// Whether the app should quit
    pub should_quit: bool,

    pub program_scroll: usize,

    /// Start preset applied on grid changes
    pub corner: StartCorner,

    /// Where `w` saves the project and `l` loads it from
    pub project_path: PathBuf,

    /// Directory and basename `e` exports to
    pub export_dir: PathBuf,
    pub export_basename: String,

    /// Shared with the runner, so changes apply mid-run
    pub speed: SpeedControl,
}

/// The main application state
pub struct App {
    pub runner: Runner,
    pub workspace: Workspace,
    pub ui: UiState,
}

/// Draw one frame: program and board side by side, status bar below
pub fn draw(frame: &mut Frame, view: &RunView<'_>, workspace: &Workspace, ui: &mut UiState) {
    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(frame.area());

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
        .split(main_chunks[0]);

    super::panes::render_program_pane(
        frame,
        columns[0],
        workspace,
        view.highlighted,
        view.state == RunState::Running,
        &mut ui.program_scroll,
    );

    super::panes::render_board_pane(
        frame,
        columns[1],
        view.board,
        ui.corner.label(),
        view.pending.len(),
    );

    super::panes::render_status_bar(
        frame,
        main_chunks[1],
        &ui.status_message,
        view.state,
        view.executed,
        ui.speed.get(),
    );
}

/// Animates a run: redraws and polls keys until each pause's deadline
struct TuiPacer<'a, B: Backend> {
    terminal: &'a mut Terminal<B>,
    workspace: &'a Workspace,
    ui: &'a mut UiState,
    /// First terminal error hit mid-run; the run is stopped when it happens
    error: Option<io::Error>,
}

impl<B: Backend> TuiPacer<'_, B> {
    /// Keys honored while running. Returns `Stop` to cancel the run.
    fn handle_key(&mut self, key: KeyEvent) -> Interrupt {
        match key.code {
            KeyCode::Char('x') | KeyCode::Char('X') | KeyCode::Esc => Interrupt::Stop,
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.ui.should_quit = true;
                Interrupt::Stop
            }
            KeyCode::Char('+') | KeyCode::Char('=') => {
                self.ui.speed.adjust(SPEED_NOTCH);
                Interrupt::Resume
            }
            KeyCode::Char('-') => {
                self.ui.speed.adjust(-SPEED_NOTCH);
                Interrupt::Resume
            }
            _ => Interrupt::Resume,
        }
    }

    fn fail(&mut self, error: io::Error) -> Interrupt {
        log::warn!("terminal error during run: {}", error);
        self.error.get_or_insert(error);
        Interrupt::Stop
    }
}

impl<B: Backend> Pacer for TuiPacer<'_, B> {
    fn pause(&mut self, view: &RunView<'_>, delay: Duration) -> Interrupt {
        let deadline = Instant::now() + delay;
        loop {
            let (workspace, ui) = (self.workspace, &mut *self.ui);
            if let Err(e) = self.terminal.draw(|f| draw(f, view, workspace, ui)) {
                return self.fail(e);
            }

            let now = Instant::now();
            if now >= deadline {
                return Interrupt::Resume;
            }
            match event::poll((deadline - now).min(FRAME)) {
                Ok(true) => match event::read() {
                    Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                        if self.handle_key(key) == Interrupt::Stop {
                            return Interrupt::Stop;
                        }
                    }
                    Ok(_) => {}
                    Err(e) => return self.fail(e),
                },
                Ok(false) => {}
                Err(e) => return self.fail(e),
            }
        }
    }

    fn notify(&mut self, notice: Notice) {
        self.ui.status_message = notice.message().to_string();
    }
}

impl App {
    pub fn new(runner: Runner, workspace: Workspace, corner: StartCorner) -> Self {
        let speed = runner.speed().clone();
        App {
            runner,
            workspace,
            ui: UiState {
                status_message: String::from("Ready!"),
                should_quit: false,
                program_scroll: 0,
                corner,
                project_path: PathBuf::from("project.json"),
                export_dir: PathBuf::from("."),
                export_basename: String::from("board"),
                speed,
            },
        }
    }

    pub fn with_project_path(mut self, path: PathBuf) -> Self {
        self.ui.project_path = path;
        self
    }

    pub fn with_export(mut self, dir: PathBuf, basename: String) -> Self {
        self.ui.export_dir = dir;
        self.ui.export_basename = basename;
        self
    }

    /// Run the TUI application
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| draw(f, &self.runner.view(), &self.workspace, &mut self.ui))?;

            if self.ui.should_quit {
                break;
            }

            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key_event(key, terminal)?;
                    }
                }
            }
        }

        Ok(())
    }

    /// Handle keyboard events while idle
    pub fn handle_key_event<B: Backend>(
        &mut self,
        key: KeyEvent,
        terminal: &mut Terminal<B>,
    ) -> io::Result<()> {
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.ui.should_quit = true;
            }
            KeyCode::Char('r') | KeyCode::Char('R') => {
                self.drive(terminal, true)?;
            }
            KeyCode::Char('s') | KeyCode::Char('S') | KeyCode::Right => {
                self.drive(terminal, false)?;
            }
            KeyCode::Char('x') | KeyCode::Char('X') | KeyCode::Esc => {
                self.runner.stop();
                self.ui.status_message = Notice::Stopped.message().to_string();
            }
            KeyCode::Char('n') | KeyCode::Char('N') => {
                self.runner.reset(&mut self.workspace);
                self.ui.program_scroll = 0;
                self.ui.status_message = "Program reset".to_string();
            }
            KeyCode::Char('+') | KeyCode::Char('=') => {
                self.ui.speed.adjust(SPEED_NOTCH);
                self.ui.status_message = format!("Speed {}", self.ui.speed.get());
            }
            KeyCode::Char('-') => {
                self.ui.speed.adjust(-SPEED_NOTCH);
                self.ui.status_message = format!("Speed {}", self.ui.speed.get());
            }
            KeyCode::Char('c') | KeyCode::Char('C') => {
                let corner = self.ui.corner.next();
                self.change_board(|board| corner.apply(board));
                self.ui.corner = corner;
                self.ui.status_message = format!("Start: {}", corner.label());
            }
            KeyCode::Char('[') => self.resize(-1, 0),
            KeyCode::Char(']') => self.resize(1, 0),
            KeyCode::Char('{') => self.resize(0, -1),
            KeyCode::Char('}') => self.resize(0, 1),
            KeyCode::Char('w') | KeyCode::Char('W') => {
                self.ui.status_message = match project::save_to_file(
                    &self.ui.project_path,
                    &self.workspace,
                    self.runner.board(),
                ) {
                    Ok(()) => format!("Saved {}", self.ui.project_path.display()),
                    Err(e) => format!("Save failed: {}", e),
                };
            }
            KeyCode::Char('l') | KeyCode::Char('L') => self.load_project(),
            KeyCode::Char('e') | KeyCode::Char('E') => {
                let bitmap = self.runner.board().export_bitmap();
                self.ui.status_message =
                    match bitmap.write_to(&self.ui.export_dir, &self.ui.export_basename) {
                        Ok(path) => {
                            format!("Exported {} as {}", path.display(), bitmap.format.magic())
                        }
                        Err(e) => format!("Export failed: {}", e),
                    };
            }
            KeyCode::Up => {
                self.ui.program_scroll = self.ui.program_scroll.saturating_sub(1);
            }
            KeyCode::Down => {
                self.ui.program_scroll = self.ui.program_scroll.saturating_add(1);
            }
            _ => {}
        }
        Ok(())
    }

    /// Run the program to the end, or execute a single step
    fn drive<B: Backend>(&mut self, terminal: &mut Terminal<B>, to_end: bool) -> io::Result<()> {
        let mut pacer = TuiPacer {
            terminal,
            workspace: &self.workspace,
            ui: &mut self.ui,
            error: None,
        };
        let result = if to_end {
            self.runner.run(&self.workspace, &mut pacer)
        } else {
            self.runner.single_step(&self.workspace, &mut pacer)
        };
        let error = pacer.error.take();

        match result {
            Ok(RunOutcome::Stepped) => {
                self.ui.status_message = format!("{} steps left", self.runner.pending().len());
            }
            Ok(RunOutcome::Busy) => {
                self.ui.status_message = "Already running".to_string();
            }
            Ok(_) => {}
            Err(e) => {
                self.ui.status_message = format!("Cannot run: {}", e);
            }
        }

        match error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Stop any pending program, then apply a settings change to the board
    fn change_board(&mut self, change: impl FnOnce(&mut Board)) {
        self.runner.stop();
        match self.runner.board_mut() {
            Ok(board) => change(board),
            Err(e) => self.ui.status_message = format!("Cannot change settings: {}", e),
        }
    }

    /// Replace the program and settings with the project file's. A bad file
    /// leaves everything as it was.
    fn load_project(&mut self) {
        self.runner.stop();
        let result = match self.runner.board_mut() {
            Ok(board) => project::load_from_file(&self.ui.project_path, &mut self.workspace, board),
            Err(e) => {
                self.ui.status_message = format!("Cannot load: {}", e);
                return;
            }
        };
        self.ui.status_message = match result {
            Ok(settings) => {
                self.ui.corner = settings.corner();
                self.ui.program_scroll = 0;
                format!("Loaded {}", self.ui.project_path.display())
            }
            Err(e) => {
                log::warn!("load of {} failed: {}", self.ui.project_path.display(), e);
                format!("Load failed: {}", e)
            }
        };
    }

    fn resize(&mut self, row_delta: i64, col_delta: i64) {
        let corner = self.ui.corner;
        self.change_board(|board| {
            board.set_grid(board.rows() as i64 + row_delta, board.cols() as i64 + col_delta);
            corner.apply(board);
        });
        let board = self.runner.board();
        self.ui.status_message = format!("Grid {}×{}", board.rows(), board.cols());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::program::BlockKind;
    use crossterm::event::KeyModifiers;
    use ratatui::backend::TestBackend;

    fn press(app: &mut App, terminal: &mut Terminal<TestBackend>, code: KeyCode) {
        app.handle_key_event(KeyEvent::new(code, KeyModifiers::NONE), terminal)
            .unwrap();
    }

    fn app_with_fill() -> App {
        let mut workspace = Workspace::new();
        let start = workspace.ensure_start_block();
        workspace
            .push(&start, BlockKind::Fill { color: "#00f".into() })
            .unwrap();
        // Full speed never pauses, so no terminal events are polled
        let runner = Runner::new(Board::new(3, 3), SpeedControl::new(100));
        App::new(runner, workspace, StartCorner::TopLeft)
    }

    #[test]
    fn test_run_key_completes_program() {
        let mut app = app_with_fill();
        let mut terminal = Terminal::new(TestBackend::new(80, 20)).unwrap();
        press(&mut app, &mut terminal, KeyCode::Char('r'));
        assert_eq!(app.runner.board().color_at(0, 0), Some("#0000ff"));
        assert_eq!(app.ui.status_message, Notice::Finished.message());
    }

    #[test]
    fn test_step_and_stop_keys() {
        let mut app = app_with_fill();
        let mut terminal = Terminal::new(TestBackend::new(80, 20)).unwrap();
        press(&mut app, &mut terminal, KeyCode::Right);
        press(&mut app, &mut terminal, KeyCode::Char('s'));
        assert_eq!(app.runner.board().fill_colors().len(), 1);

        press(&mut app, &mut terminal, KeyCode::Esc);
        assert!(app.runner.pending().is_empty());
        assert!(app.runner.board().fill_colors().is_empty());
        assert_eq!(app.runner.state(), RunState::Stopped);
    }

    #[test]
    fn test_settings_keys() {
        let mut app = app_with_fill();
        let mut terminal = Terminal::new(TestBackend::new(80, 20)).unwrap();
        press(&mut app, &mut terminal, KeyCode::Char(']'));
        press(&mut app, &mut terminal, KeyCode::Char('{'));
        assert_eq!((app.runner.board().rows(), app.runner.board().cols()), (4, 2));

        press(&mut app, &mut terminal, KeyCode::Char('c'));
        assert_eq!(app.ui.corner, StartCorner::TopRight);
        assert_eq!(app.runner.board().start_position(), (0, 1));

        press(&mut app, &mut terminal, KeyCode::Char('-'));
        assert_eq!(app.runner.speed().get(), 95);
    }

    #[test]
    fn test_load_key_replaces_program() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_with_fill().with_project_path(dir.path().join("saved.json"));
        let mut terminal = Terminal::new(TestBackend::new(80, 20)).unwrap();
        press(&mut app, &mut terminal, KeyCode::Char('w'));

        press(&mut app, &mut terminal, KeyCode::Char('n'));
        assert_eq!(app.workspace.len(), 1);

        press(&mut app, &mut terminal, KeyCode::Char('l'));
        assert_eq!(app.workspace.len(), 2);
        assert!(app.ui.status_message.starts_with("Loaded"));
        press(&mut app, &mut terminal, KeyCode::Char('r'));
        assert_eq!(app.runner.board().color_at(0, 0), Some("#0000ff"));
    }

    #[test]
    fn test_bad_project_file_keeps_program() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ \"blocks\": [[{ \"type\": ").unwrap();
        let mut app = app_with_fill().with_project_path(path);
        let mut terminal = Terminal::new(TestBackend::new(80, 20)).unwrap();
        press(&mut app, &mut terminal, KeyCode::Char(']'));

        press(&mut app, &mut terminal, KeyCode::Char('l'));
        assert!(app.ui.status_message.starts_with("Load failed"));
        assert_eq!(app.workspace.len(), 2);
        assert_eq!(app.runner.board().rows(), 4);

        press(&mut app, &mut terminal, KeyCode::Char('L'));
        assert_eq!(app.workspace.len(), 2);
    }

    #[test]
    fn test_draw_renders_all_panes() {
        let mut app = app_with_fill();
        let mut terminal = Terminal::new(TestBackend::new(80, 20)).unwrap();
        terminal
            .draw(|f| draw(f, &app.runner.view(), &app.workspace, &mut app.ui))
            .unwrap();
        let buffer = terminal.backend().buffer();
        let text: String = buffer.content().iter().map(|c| c.symbol()).collect();
        assert!(text.contains("Program"));
        assert!(text.contains("Board 3×3"));
        assert!(text.contains("IDLE"));
    }
}

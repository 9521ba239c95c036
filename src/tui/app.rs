use std::io;
use std::path::PathBuf;
use std::time::Duration;

use chrono::Utc;
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use crate::engine::{Command, DragPayload, Engine};
use crate::flatten::EntryKind;
use crate::io::library_io::{load_library, sample_library, save_library};
use crate::io::watcher::LibraryWatcher;
use crate::model::{Folder, FolderId, Library, Snippet};
use crate::viewport::Viewport;

use super::input;
use super::render;
use super::theme::Theme;

/// Current interaction mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Navigate,
    /// Typing in the search input; the tree recompiles per keystroke.
    Search,
    /// Typing into the inline creation/rename row.
    Edit,
}

/// An in-flight mouse drag over the tree.
#[derive(Debug, Clone)]
pub struct DragState {
    pub payload: DragPayload,
    pub from_index: usize,
    /// Row the pointer is currently over (None = root background).
    pub over: Option<usize>,
    /// Becomes true once the pointer leaves the press row; a press-release
    /// on the same row is a click, not a drop.
    pub moved: bool,
}

/// The browser application. Plays the "external collaborator" role for the
/// engine: owns the authoritative library, applies drained commands to it,
/// persists, and refreshes the engine with the result.
pub struct App {
    pub library: Library,
    pub engine: Engine,
    pub viewport: Viewport,
    pub mode: Mode,
    pub theme: Theme,
    pub should_quit: bool,
    /// Search input as typed (the engine holds the applied query).
    pub search_input: String,
    /// Text of the inline creation/rename input.
    pub edit_buffer: String,
    pub status_message: Option<String>,
    pub drag: Option<DragState>,
    pub library_path: Option<PathBuf>,
    next_id: u64,
}

impl App {
    pub fn new(library: Library, library_path: Option<PathBuf>) -> Self {
        let mut engine = Engine::new();
        engine.refresh(&library);
        App {
            library,
            engine,
            viewport: Viewport::new(1, 0),
            mode: Mode::Navigate,
            theme: Theme::default(),
            should_quit: false,
            search_input: String::new(),
            edit_buffer: String::new(),
            status_message: None,
            drag: None,
            library_path,
            next_id: 1,
        }
    }

    /// Apply every queued engine command to the authoritative library, then
    /// hand the refreshed data back. This is the top path of the control
    /// loop: command -> data change -> recompile.
    pub fn apply_commands(&mut self) {
        let commands = self.engine.drain_commands();
        if commands.is_empty() {
            return;
        }

        let mut data_changed = false;
        for command in commands {
            match command {
                Command::SelectSnippet(Some(id)) => {
                    if let Some(snippet) = self.library.snippet(&id) {
                        self.status_message = Some(format!("open: {}", snippet.title));
                    }
                }
                Command::SelectSnippet(None) | Command::SelectFolder(_) => {}
                Command::ToggleFolder { .. } => {
                    // Collapse state is engine-owned and session-local.
                }
                Command::MoveSnippets { ids, target } => {
                    let count = ids.len();
                    for id in ids {
                        if let Some(snippet) = self.library.snippet_mut(&id) {
                            snippet.folder_id = target.clone();
                            snippet.updated_at = Utc::now();
                        }
                    }
                    self.status_message = Some(format!("moved {count} snippet(s)"));
                    data_changed = true;
                }
                Command::MoveFolders { ids, target } => {
                    for id in ids {
                        if let Some(folder) = self.library.folder_mut(&id) {
                            folder.parent_id = target.clone();
                        }
                    }
                    data_changed = true;
                }
                Command::NewSnippet { title, parent } => {
                    let id = self.generate_id("snip");
                    let mut snippet = Snippet::new(id, title);
                    snippet.folder_id = parent;
                    self.library.snippets.push(snippet);
                    data_changed = true;
                }
                Command::NewFolder { name, parent } => {
                    let id = self.generate_id("folder");
                    let mut folder = Folder::new(id, name);
                    folder.parent_id = parent;
                    self.library.folders.push(folder);
                    data_changed = true;
                }
                Command::Rename { kind, id, name } => {
                    match kind {
                        EntryKind::Folder => {
                            if let Some(folder) = self.library.folder_mut(&id) {
                                folder.name = name;
                            }
                        }
                        EntryKind::Snippet => {
                            if let Some(snippet) = self.library.snippet_mut(&id) {
                                snippet.title = name;
                                snippet.updated_at = Utc::now();
                            }
                        }
                    }
                    data_changed = true;
                }
                Command::ContextMenu { kind, id } => {
                    self.status_message = Some(format!("menu: {kind:?} {id}"));
                }
                Command::FocusSearch => {
                    self.mode = Mode::Search;
                }
            }
        }

        if data_changed {
            self.save();
            self.engine.refresh(&self.library);
        }
    }

    fn generate_id(&mut self, prefix: &str) -> String {
        // Ids only need to be unique within this library.
        loop {
            let id = format!("{prefix}-{}", self.next_id);
            self.next_id += 1;
            let taken = self.library.folder(&id).is_some() || self.library.snippet(&id).is_some();
            if !taken {
                return id;
            }
        }
    }

    pub fn save(&mut self) {
        if let Some(path) = &self.library_path
            && let Err(e) = save_library(path, &self.library)
        {
            self.status_message = Some(format!("save failed: {e}"));
        }
    }

    /// Reload from disk after an external change and push the new data
    /// through the engine (selection reconciles via focus recovery).
    pub fn reload(&mut self) {
        let Some(path) = &self.library_path else {
            return;
        };
        match load_library(path) {
            Ok(mut library) => {
                library.dirty_ids = std::mem::take(&mut self.library.dirty_ids);
                self.library = library;
                self.engine.refresh(&self.library);
                self.status_message = Some("library reloaded".to_string());
            }
            Err(e) => {
                self.status_message = Some(format!("reload failed: {e}"));
            }
        }
    }

    /// Parent for a create action: the folder context, or root.
    pub fn create_parent(&self) -> Option<FolderId> {
        self.engine.selected_folder().map(str::to_string)
    }
}

/// Run the browser.
pub fn run(library_path: Option<&std::path::Path>) -> Result<(), Box<dyn std::error::Error>> {
    let (library, path) = match library_path {
        Some(p) => (load_library(p)?, Some(p.to_path_buf())),
        None => (sample_library(), None),
    };
    let mut app = App::new(library, path);

    let watcher = app
        .library_path
        .as_deref()
        .and_then(|p| LibraryWatcher::start(p).ok());

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, event::EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Restore the terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), event::DisableMouseCapture, LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let result = run_event_loop(&mut terminal, &mut app, watcher.as_ref());

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        event::DisableMouseCapture,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    watcher: Option<&LibraryWatcher>,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        terminal.draw(|frame| render::render(frame, app))?;

        if event::poll(Duration::from_millis(250))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    input::handle_key(app, key);
                }
                Event::Mouse(mouse) => {
                    input::handle_mouse(app, mouse);
                }
                _ => {}
            }
            app.apply_commands();
        }

        if let Some(watcher) = watcher
            && !watcher.poll().is_empty()
        {
            app.reload();
        }

        if app.should_quit {
            break;
        }
    }
    Ok(())
}

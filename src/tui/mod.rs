//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the UI,
//! and translates keyboard events into core::Action values.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Redraw Strategy
//!
//! The event loop uses conditional redraw to avoid unnecessary work:
//!
//! - **Animating** (query pending, transcript still scrolling): draws every ~50ms.
//! - **Idle**: sleeps up to 500ms, only redraws on events, background results
//!   or terminal resize.
//!
//! ## Background work
//!
//! Queries, the health probe and file actions run as tokio tasks. Each task
//! reports back with a single `Action` over an mpsc channel, which the loop
//! drains between frames. Abort handles for unfinished tasks are kept and
//! aborted on exit, so nothing lands after teardown.

mod component;
mod components;
mod event;
mod ui;

use log::{debug, info, warn};
use std::io::stdout;
use std::path::PathBuf;
use std::sync::{Arc, mpsc};
use std::time::{Duration, Instant};

use crossterm::cursor::{Hide, SetCursorStyle, Show};
use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
    KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::execute;
use tokio::task::AbortHandle;

use crate::api::{FileActions, HttpQueryService, QueryService, UnimplementedFileActions};
use crate::core::action::{Action, Effect, FileAction, update};
use crate::core::config::ResolvedConfig;
use crate::core::staging::FileHandle;
use crate::core::state::App;
use crate::tui::component::EventHandler;
use crate::tui::components::{FilePanelState, InputBox, InputEvent, MessageListState, PanelEvent};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};

/// TUI-specific presentation state (not part of core business logic)
pub struct TuiState {
    pub message_list: MessageListState,
    pub input_box: InputBox,
    pub file_panel: FilePanelState,
    // Animation state
    pub pulse_value: f32,
}

impl TuiState {
    pub fn new(suppress_empty_queries: bool) -> Self {
        Self {
            message_list: MessageListState::new(),
            input_box: InputBox::new(suppress_empty_queries),
            file_panel: FilePanelState::new(),
            pulse_value: 0.0,
        }
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        // Kitty keyboard protocol lets Shift+Enter through; terminals without it ignore the request
        execute!(
            stdout(),
            EnableMouseCapture,
            EnableBracketedPaste,
            Show,
            SetCursorStyle::SteadyBlock, // Non-blinking: avoids blink timer reset from continuous redraws
            PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                    | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
            )
        )?;
        info!("Terminal modes enabled (mouse, bracketed paste, keyboard enhancement)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(
            stdout(),
            PopKeyboardEnhancementFlags,
            DisableMouseCapture,
            DisableBracketedPaste,
            Hide
        );
    }
}

/// Performs the I/O an `Effect` asks for.
struct Effects {
    service: Arc<dyn QueryService>,
    file_actions: Arc<dyn FileActions>,
    tx: mpsc::Sender<Action>,
    in_flight: Vec<AbortHandle>,
}

impl Effects {
    /// Returns true when the loop should quit.
    fn perform(&mut self, effect: Effect) -> bool {
        self.in_flight.retain(|handle| !handle.is_finished());
        match effect {
            Effect::None => {}
            Effect::Quit => return true,
            Effect::SpawnQuery { id, query } => {
                self.in_flight
                    .push(spawn_query(self.service.clone(), id, query, self.tx.clone()));
            }
            Effect::RunFileAction(action) => {
                self.in_flight.push(spawn_file_action(
                    self.file_actions.clone(),
                    action,
                    self.tx.clone(),
                ));
            }
        }
        false
    }

    fn abort_all(&mut self) {
        for handle in self.in_flight.drain(..) {
            handle.abort();
        }
    }
}

/// Runs an action through `update` and performs its effect.
fn dispatch(app: &mut App, effects: &mut Effects, action: Action) -> bool {
    let effect = update(app, action);
    effects.perform(effect)
}

pub fn run(config: ResolvedConfig) -> std::io::Result<()> {
    let service: Arc<dyn QueryService> = Arc::new(HttpQueryService::new(
        config.base_url.clone(),
        Duration::from_secs(config.timeout_secs),
    ));
    let mut app = App::from_config(&config);
    let mut tui = TuiState::new(config.suppress_empty_queries);

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new();

    // Channel for actions from background tasks
    let (tx, rx) = mpsc::channel();
    let mut effects = Effects {
        service: service.clone(),
        file_actions: Arc::new(UnimplementedFileActions),
        tx: tx.clone(),
        in_flight: Vec::new(),
    };
    effects
        .in_flight
        .push(spawn_health_check(service, tx.clone()));

    let start_time = Instant::now();
    let mut needs_redraw = true; // Force first frame
    let mut seen_revision = app.log.revision();

    'main: loop {
        tui.input_box.waiting = app.is_loading();

        let animating = app.is_loading() || tui.message_list.is_animating();
        if animating {
            needs_redraw = true;
        }

        if needs_redraw {
            let elapsed = start_time.elapsed().as_secs_f32();
            tui.pulse_value = (elapsed * 5.0).sin() * 0.5 + 0.5;
            terminal.draw(|f| ui::draw_ui(f, &app, &mut tui))?;
            needs_redraw = false;
        }

        let timeout = if animating {
            Duration::from_millis(50)
        } else {
            Duration::from_millis(500)
        };
        let first_event = poll_event_timeout(timeout);
        if first_event.is_some() {
            needs_redraw = true;
        }

        // Process first event + drain ALL pending events before next draw
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            if handle_event(&mut app, &mut tui, &mut effects, event) {
                break 'main;
            }
        }

        // Results from background tasks
        while let Ok(action) = rx.try_recv() {
            needs_redraw = true;
            debug!("Event loop received: {:?}", action);
            if dispatch(&mut app, &mut effects, action) {
                break 'main;
            }
        }

        // Follow the newest exchange whenever the log changed
        if app.log.revision() != seen_revision {
            seen_revision = app.log.revision();
            tui.message_list.follow_latest(&app.log);
            needs_redraw = true;
        }
    }

    effects.abort_all();
    ratatui::restore();
    Ok(())
}

/// Routes one terminal event. Returns true when the loop should quit.
fn handle_event(app: &mut App, tui: &mut TuiState, effects: &mut Effects, event: TuiEvent) -> bool {
    match event {
        // Resize just needs a redraw (already flagged)
        TuiEvent::Resize => false,
        TuiEvent::ForceQuit => dispatch(app, effects, Action::Quit),
        TuiEvent::ToggleUploadPanel => {
            let quit = dispatch(app, effects, Action::ToggleUploadPanel);
            if !app.upload_panel_open {
                tui.file_panel = FilePanelState::new();
            }
            quit
        }
        // Transcript scrolling works with or without the panel
        TuiEvent::ScrollUp
        | TuiEvent::ScrollDown
        | TuiEvent::ScrollPageUp
        | TuiEvent::ScrollPageDown
        | TuiEvent::ScrollToBottom => {
            tui.message_list.handle_event(&event);
            false
        }
        _ if app.upload_panel_open => {
            let Some(panel_event) = tui.file_panel.handle_event(&event, &app.staging) else {
                return false;
            };
            let action = match panel_event {
                PanelEvent::Choose { slot, path } => match FileHandle::open(expand_home(&path)) {
                    Ok(file) => Action::FileChosen {
                        slot,
                        file: Some(file),
                    },
                    Err(e) => Action::FilePickFailed {
                        slot,
                        reason: format!("Cannot open {path}: {e}"),
                    },
                },
                PanelEvent::Cancel(slot) => Action::FileChosen { slot, file: None },
                PanelEvent::Remove(id) => Action::RemoveStaged(id),
                PanelEvent::AddSlot => Action::AddPickerSlot,
                PanelEvent::Upload => Action::UploadFiles,
                PanelEvent::Organize => Action::OrganizeFiles,
                PanelEvent::Dismiss => {
                    tui.file_panel = FilePanelState::new();
                    Action::ToggleUploadPanel
                }
            };
            dispatch(app, effects, action)
        }
        _ => {
            // Events in one batch can follow a submit from the same batch
            tui.input_box.waiting = app.is_loading();
            match tui.input_box.handle_event(&event) {
                Some(InputEvent::Submit(text)) => dispatch(app, effects, Action::Submit(text)),
                Some(InputEvent::ContentChanged) | None => false,
            }
        }
    }
}

/// Expands a leading `~/` to the home directory.
fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(rest);
    }
    PathBuf::from(path)
}

fn spawn_query(
    service: Arc<dyn QueryService>,
    id: usize,
    query: String,
    tx: mpsc::Sender<Action>,
) -> AbortHandle {
    info!("Spawning query for exchange {} ({} bytes)", id, query.len());
    tokio::spawn(async move {
        let started = Instant::now();
        let outcome = service.query(&query).await;
        debug!(
            "Exchange {} settled in {}ms (ok={})",
            id,
            started.elapsed().as_millis(),
            outcome.is_ok()
        );
        if tx.send(Action::QueryResolved { id, outcome }).is_err() {
            warn!("Failed to send result for exchange {}: receiver dropped", id);
        }
    })
    .abort_handle()
}

fn spawn_health_check(service: Arc<dyn QueryService>, tx: mpsc::Sender<Action>) -> AbortHandle {
    tokio::spawn(async move {
        let result = service.health().await;
        if tx.send(Action::HealthChecked(result)).is_err() {
            warn!("Failed to send health result: receiver dropped");
        }
    })
    .abort_handle()
}

fn spawn_file_action(
    file_actions: Arc<dyn FileActions>,
    action: FileAction,
    tx: mpsc::Sender<Action>,
) -> AbortHandle {
    info!("Spawning file action: {:?}", action);
    tokio::spawn(async move {
        let result = match action {
            FileAction::Upload(files) => file_actions.upload(&files).await,
            FileAction::Organize => file_actions.organize().await,
        };
        if tx.send(Action::FileActionDone(result)).is_err() {
            warn!("Failed to send file action result: receiver dropped");
        }
    })
    .abort_handle()
}

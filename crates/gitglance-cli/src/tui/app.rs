use std::path::PathBuf;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use gitglance::{filter_snapshots, summarize, FilterSummary, RepositorySnapshot};
use ratatui::widgets::ListState;
use tracing::debug;

use crate::config::Settings;
use crate::open::{open_command, open_directory};
use crate::theme::THEMES;
use crate::tui::constants::{STATUS_MAX_MS, STATUS_MIN_MS, STATUS_PER_CHAR_MS};
use crate::tui::worker::start_background_tasks;

use super::types::{StatusMessage, StatusTone, WorkerEvent, WorkerRequest};

pub(crate) struct App {
    pub(crate) directory: PathBuf,
    pub(crate) snapshots: Vec<RepositorySnapshot>,
    pub(crate) list_state: ListState,
    pub(crate) error: Option<String>,
    pub(crate) status: Option<StatusMessage>,
    pub(crate) skip_unchanged: bool,
    pub(crate) last_refresh: Option<Instant>,
    pub(crate) loading_since: Option<Instant>,
    refresh_interval: Duration,
    theme_index: usize,
    worker_tx: mpsc::Sender<WorkerRequest>,
    worker_rx: mpsc::Receiver<WorkerEvent>,
    request_seq: u64,
    pending_request: Option<u64>,
    desired_selection: Option<String>,
}

impl App {
    pub(crate) fn new(settings: Settings) -> Self {
        let directory = settings.directory.clone();
        let skip_unchanged = settings.skip_unchanged;
        let refresh_interval = settings.refresh_interval;
        let theme_index = settings.theme_index.min(THEMES.len() - 1);
        let (worker_tx, worker_rx) = start_background_tasks(settings);
        let mut app = Self {
            directory,
            snapshots: Vec::new(),
            list_state: ListState::default(),
            error: None,
            status: None,
            skip_unchanged,
            last_refresh: None,
            loading_since: None,
            refresh_interval,
            theme_index,
            worker_tx,
            worker_rx,
            request_seq: 0,
            pending_request: None,
            desired_selection: None,
        };
        app.request_refresh();
        app
    }

    /// Returns true when the app should exit.
    pub(crate) fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return true;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Up | KeyCode::Char('k') => self.move_selection(-1),
            KeyCode::Down | KeyCode::Char('j') => self.move_selection(1),
            KeyCode::Home => self.select_index(0),
            KeyCode::End => {
                let len = self.visible().len();
                self.select_index(len.saturating_sub(1));
            }
            KeyCode::Char('r') => {
                self.request_refresh();
                self.set_status("refreshing");
            }
            KeyCode::Char('s') => self.toggle_skip_unchanged(),
            KeyCode::Char('o') | KeyCode::Enter => self.open_selected(),
            KeyCode::Char('h') => self.cycle_theme(1),
            KeyCode::Char('H') => self.cycle_theme(-1),
            _ => {}
        }

        false
    }

    /// Periodic work between frames: scheduled refreshes and status expiry.
    pub(crate) fn tick(&mut self) {
        if let Some(status) = self.status.as_ref() {
            if Instant::now() >= status.deadline {
                self.status = None;
            }
        }

        if self.pending_request.is_some() {
            return;
        }
        let due = self
            .last_refresh
            .map(|at| at.elapsed() >= self.refresh_interval)
            .unwrap_or(true);
        if due {
            self.request_refresh();
        }
    }

    pub(crate) fn handle_worker_events(&mut self) {
        while let Ok(event) = self.worker_rx.try_recv() {
            match event {
                WorkerEvent::SnapshotsLoaded {
                    request_id,
                    result,
                    elapsed,
                } => {
                    if self.pending_request != Some(request_id) {
                        debug!(request_id, "dropping stale refresh");
                        continue;
                    }
                    self.pending_request = None;
                    self.loading_since = None;
                    self.last_refresh = Some(Instant::now());
                    match result {
                        Ok(snapshots) => {
                            debug!(
                                repositories = snapshots.len(),
                                elapsed_ms = elapsed.as_millis() as u64,
                                "applied refresh"
                            );
                            self.apply_snapshots(snapshots);
                        }
                        Err(err) => {
                            self.snapshots.clear();
                            self.list_state.select(None);
                            self.set_error(err.clone());
                            self.error = Some(err);
                        }
                    }
                }
                WorkerEvent::DirectoryChanged => {
                    self.request_refresh();
                }
            }
        }
    }

    fn apply_snapshots(&mut self, snapshots: Vec<RepositorySnapshot>) {
        let preferred = self
            .desired_selection
            .take()
            .or_else(|| self.selected_snapshot().map(|snapshot| snapshot.name.clone()));
        self.error = None;
        self.snapshots = snapshots;
        self.restore_selection(preferred.as_deref());
    }

    pub(crate) fn request_refresh(&mut self) {
        self.request_seq = self.request_seq.wrapping_add(1);
        let request_id = self.request_seq;
        if self
            .worker_tx
            .send(WorkerRequest::Refresh { request_id })
            .is_err()
        {
            self.set_error("background worker stopped");
            return;
        }
        self.pending_request = Some(request_id);
        if self.loading_since.is_none() {
            self.loading_since = Some(Instant::now());
        }
    }

    pub(crate) fn visible(&self) -> Vec<&RepositorySnapshot> {
        filter_snapshots(&self.snapshots, self.skip_unchanged)
    }

    pub(crate) fn summary(&self) -> FilterSummary {
        summarize(&self.snapshots, self.skip_unchanged)
    }

    pub(crate) fn selected_snapshot(&self) -> Option<&RepositorySnapshot> {
        let index = self.list_state.selected()?;
        self.visible().get(index).copied()
    }

    fn toggle_skip_unchanged(&mut self) {
        let preferred = self.selected_snapshot().map(|snapshot| snapshot.name.clone());
        self.skip_unchanged = !self.skip_unchanged;
        self.restore_selection(preferred.as_deref());
        if self.skip_unchanged {
            self.set_status("hiding unchanged repositories");
        } else {
            self.set_status("showing all repositories");
        }
    }

    fn open_selected(&mut self) {
        let Some(name) = self.selected_snapshot().map(|snapshot| snapshot.name.clone()) else {
            return;
        };
        let path = self.directory.join(&name);
        match open_directory(&path) {
            Ok(()) => self.set_status(format!("opened {name} with {}", open_command())),
            Err(err) => self.set_error(format!("cannot open {name}: {err}")),
        }
    }

    fn restore_selection(&mut self, preferred: Option<&str>) {
        let index = preferred
            .and_then(|name| {
                self.visible()
                    .iter()
                    .position(|snapshot| snapshot.name == name)
            })
            .or_else(|| self.list_state.selected())
            .unwrap_or(0);
        self.select_index(index);
    }

    fn select_index(&mut self, index: usize) {
        let len = self.visible().len();
        if len == 0 {
            self.list_state.select(None);
        } else {
            self.list_state.select(Some(index.min(len - 1)));
        }
    }

    fn move_selection(&mut self, delta: i32) {
        let len = self.visible().len();
        move_state(&mut self.list_state, len, delta);
    }

    pub(crate) fn theme_color(&self) -> ratatui::style::Color {
        THEMES[self.theme_index].color()
    }

    pub(crate) fn theme_name(&self) -> &'static str {
        THEMES[self.theme_index].name
    }

    fn cycle_theme(&mut self, delta: i32) {
        let len = THEMES.len() as i32;
        let next = (self.theme_index as i32 + delta).rem_euclid(len);
        self.theme_index = next as usize;
        self.set_status(format!("theme: {}", self.theme_name()));
    }

    pub(crate) fn set_status(&mut self, message: impl Into<String>) {
        self.set_status_tone(message, StatusTone::Success);
    }

    fn set_error(&mut self, message: impl Into<String>) {
        self.set_status_tone(message, StatusTone::Error);
    }

    fn set_status_tone(&mut self, message: impl Into<String>, tone: StatusTone) {
        let text = message.into();
        let duration = status_duration(&text);
        self.status = Some(StatusMessage {
            text,
            tone,
            deadline: Instant::now() + duration,
        });
    }
}

fn move_state(state: &mut ListState, len: usize, delta: i32) {
    if len == 0 {
        state.select(None);
        return;
    }

    let current = state.selected().unwrap_or(0) as i32;
    let next = (current + delta).clamp(0, len as i32 - 1);
    state.select(Some(next as usize));
}

fn status_duration(message: &str) -> Duration {
    let chars = message.chars().count() as u64;
    let ms = STATUS_MIN_MS + chars * STATUS_PER_CHAR_MS;
    Duration::from_millis(ms.min(STATUS_MAX_MS))
}

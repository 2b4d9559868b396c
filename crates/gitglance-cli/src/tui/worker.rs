use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use notify::event::ModifyKind;
use notify::{EventKind, RecursiveMode, Watcher};
use tracing::{debug, warn};

use crate::config::Settings;
use crate::feed::load_snapshots;

use super::constants::WATCH_DEBOUNCE_MS;
use super::types::{WorkerEvent, WorkerRequest};

pub(crate) fn start_background_tasks(
    settings: Settings,
) -> (mpsc::Sender<WorkerRequest>, mpsc::Receiver<WorkerEvent>) {
    let (request_tx, request_rx) = mpsc::channel();
    let (event_tx, event_rx) = mpsc::channel();
    spawn_directory_watcher(settings.directory.clone(), event_tx.clone());
    spawn_worker(settings, request_rx, event_tx);
    (request_tx, event_rx)
}

fn spawn_worker(
    settings: Settings,
    request_rx: mpsc::Receiver<WorkerRequest>,
    event_tx: mpsc::Sender<WorkerEvent>,
) {
    thread::spawn(move || {
        while let Ok(request) = request_rx.recv() {
            // Coalesce queued refreshes into the newest one.
            let WorkerRequest::Refresh { mut request_id } = request;
            for WorkerRequest::Refresh { request_id: newer } in request_rx.try_iter() {
                request_id = newer;
            }

            let started = Instant::now();
            let result = load_snapshots(&settings)
                .map(|snapshots| snapshots.into_vec())
                .map_err(|err| {
                    warn!(error = %err, "refresh failed");
                    err.to_string()
                });
            let elapsed = started.elapsed();
            debug!(request_id, elapsed_ms = elapsed.as_millis() as u64, "refresh finished");

            if event_tx
                .send(WorkerEvent::SnapshotsLoaded {
                    request_id,
                    result,
                    elapsed,
                })
                .is_err()
            {
                return;
            }
        }
    });
}

fn spawn_directory_watcher(directory: PathBuf, event_tx: mpsc::Sender<WorkerEvent>) {
    thread::spawn(move || {
        let (watch_tx, watch_rx) = mpsc::channel();
        let mut watcher = match notify::recommended_watcher(move |res| {
            let _ = watch_tx.send(res);
        }) {
            Ok(watcher) => watcher,
            Err(err) => {
                warn!(error = %err, "directory watcher unavailable");
                return;
            }
        };

        if let Err(err) = watcher.watch(&directory, RecursiveMode::NonRecursive) {
            warn!(directory = %directory.display(), error = %err, "cannot watch directory");
            return;
        }

        let mut last_event = Instant::now() - Duration::from_secs(5);
        let debounce = Duration::from_millis(WATCH_DEBOUNCE_MS);
        for event in watch_rx {
            let event = match event {
                Ok(event) => event,
                Err(_) => continue,
            };
            if !is_relevant_fs_event(&event, &directory) {
                continue;
            }
            let now = Instant::now();
            if now.duration_since(last_event) < debounce {
                continue;
            }
            last_event = now;
            if event_tx.send(WorkerEvent::DirectoryChanged).is_err() {
                return;
            }
        }
    });
}

/// Repositories appearing or disappearing directly under the scanned directory.
fn is_relevant_fs_event(event: &notify::Event, directory: &Path) -> bool {
    let structural = matches!(
        event.kind,
        EventKind::Create(_) | EventKind::Remove(_) | EventKind::Modify(ModifyKind::Name(_))
    );
    structural
        && event
            .paths
            .iter()
            .any(|path| is_direct_child(path, directory))
}

fn is_direct_child(path: &Path, directory: &Path) -> bool {
    let is_hidden = path
        .file_name()
        .map(|name| name.to_string_lossy().starts_with('.'))
        .unwrap_or(true);
    !is_hidden && path.parent().is_some_and(|parent| parent == directory)
}

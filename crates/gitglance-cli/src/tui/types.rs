use std::time::{Duration, Instant};

use gitglance::RepositorySnapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StatusTone {
    Success,
    Error,
}

#[derive(Debug, Clone)]
pub(crate) struct StatusMessage {
    pub(crate) text: String,
    pub(crate) tone: StatusTone,
    pub(crate) deadline: Instant,
}

#[derive(Debug)]
pub(crate) enum WorkerRequest {
    Refresh { request_id: u64 },
}

#[derive(Debug)]
pub(crate) enum WorkerEvent {
    SnapshotsLoaded {
        request_id: u64,
        result: Result<Vec<RepositorySnapshot>, String>,
        elapsed: Duration,
    },
    DirectoryChanged,
}

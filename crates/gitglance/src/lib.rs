pub mod error;
pub mod filter;
pub mod model;
pub mod parse;

pub use error::{GlanceError, Result};
pub use filter::{filter_snapshots, summarize, FilterSummary};
pub use model::{BranchInfo, ChangeKind, RepositorySnapshot, SnapshotSet, StatusCode};
pub use parse::{
    parse_branch_line, parse_status, parse_status_with, split_status_line, DuplicatePolicy,
    MalformedLinePolicy, ParseOptions,
};

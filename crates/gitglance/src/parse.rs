use std::borrow::Cow;

use tracing::{debug, trace};

use crate::error::{GlanceError, Result};
use crate::model::{BranchInfo, RepositorySnapshot, SnapshotSet, StatusCode};

pub const PATH_SEPARATOR: char = '/';
pub const BRANCH_MARKER: &str = "##";
pub const MALFORMED_MARKER: &str = "<raw>";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MalformedLinePolicy {
    /// Fail the whole parse with [`GlanceError::MalformedFileStatusLine`].
    #[default]
    Reject,
    /// Append `"<raw> <line>"` to the `other` bucket of the current repository.
    KeepAsOther,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DuplicatePolicy {
    /// A later marker with the same name starts a fresh snapshot in the earlier one's slot.
    #[default]
    Replace,
    /// Fail with [`GlanceError::DuplicateRepository`].
    Reject,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseOptions {
    pub malformed_lines: MalformedLinePolicy,
    pub duplicates: DuplicatePolicy,
}

/// Parses concatenated per-repository status output with the default options.
///
/// # Errors
///
/// Returns [`GlanceError::Sequencing`] when a branch or file line precedes every
/// repository marker, and [`GlanceError::MalformedFileStatusLine`] for lines that carry
/// no status code.
pub fn parse_status(raw: &str, root_prefix: &str) -> Result<SnapshotSet> {
    parse_status_with(raw, root_prefix, &ParseOptions::default())
}

/// Parses concatenated per-repository status output.
///
/// Every occurrence of `root_prefix` (minus trailing separators) is removed before the
/// text is split into lines, then the lines are folded in order into a [`SnapshotSet`].
///
/// # Errors
///
/// See [`parse_status`]; with [`DuplicatePolicy::Reject`] a repeated repository name
/// also fails with [`GlanceError::DuplicateRepository`].
pub fn parse_status_with(
    raw: &str,
    root_prefix: &str,
    options: &ParseOptions,
) -> Result<SnapshotSet> {
    let text = strip_root_prefix(raw, root_prefix);
    let state = text
        .lines()
        .enumerate()
        .map(|(index, line)| (index + 1, line))
        .filter(|(_, line)| !line.trim().is_empty())
        .try_fold(ParseState::default(), |state, (line_number, line)| {
            state.step(line_number, line, options)
        })?;

    debug!(
        repositories = state.snapshots.len(),
        "parsed status output"
    );
    Ok(state.snapshots)
}

#[derive(Default)]
struct ParseState {
    current: Option<String>,
    snapshots: SnapshotSet,
}

impl ParseState {
    fn step(mut self, line_number: usize, line: &str, options: &ParseOptions) -> Result<Self> {
        if line.starts_with(PATH_SEPARATOR) {
            let name = repository_name(line);
            if options.duplicates == DuplicatePolicy::Reject && self.snapshots.contains(&name) {
                return Err(GlanceError::DuplicateRepository { name, line_number });
            }
            debug!(repository = %name, line_number, "repository marker");
            if self
                .snapshots
                .insert(RepositorySnapshot::new(name.clone()))
                .is_some()
            {
                debug!(repository = %name, "replaced earlier snapshot with the same name");
            }
            self.current = Some(name);
            return Ok(self);
        }

        let Some(snapshot) = self
            .current
            .as_deref()
            .and_then(|name| self.snapshots.get_mut(name))
        else {
            return Err(GlanceError::Sequencing {
                line_number,
                line: line.to_string(),
            });
        };

        if line.starts_with(BRANCH_MARKER) {
            snapshot.branch = parse_branch_line(line);
            trace!(line_number, branch = %snapshot.branch.local, "branch info");
            return Ok(self);
        }

        match split_status_line(line) {
            Some((code, path)) => {
                let code = StatusCode::classify(code);
                trace!(line_number, kind = code.kind().label(), path, "file status");
                snapshot.record(code, path);
            }
            None => match options.malformed_lines {
                MalformedLinePolicy::Reject => {
                    return Err(GlanceError::MalformedFileStatusLine {
                        line_number,
                        line: line.to_string(),
                    });
                }
                MalformedLinePolicy::KeepAsOther => {
                    trace!(line_number, "kept malformed line");
                    snapshot.other.push(format!("{MALFORMED_MARKER} {line}"));
                }
            },
        }

        Ok(self)
    }
}

fn strip_root_prefix<'a>(raw: &'a str, root_prefix: &str) -> Cow<'a, str> {
    let prefix = root_prefix.trim_end_matches(PATH_SEPARATOR);
    if prefix.is_empty() || !raw.contains(prefix) {
        return Cow::Borrowed(raw);
    }
    Cow::Owned(raw.replace(prefix, ""))
}

fn repository_name(line: &str) -> String {
    line.chars().filter(|ch| *ch != PATH_SEPARATOR).collect()
}

/// Parses a `## local...remote [ahead N, behind M]` line.
pub fn parse_branch_line(line: &str) -> BranchInfo {
    let cleaned = line.replace('#', "").replace("...", " ");
    let mut tokens = cleaned.split_whitespace();
    let local = tokens.next().unwrap_or_default().to_string();
    let remote = tokens.next().unwrap_or_default().to_string();
    let rest = tokens.collect::<Vec<_>>().join(" ");
    let divergence = rest.strip_prefix('[').unwrap_or(&rest);
    let divergence = divergence.strip_suffix(']').unwrap_or(divergence);

    BranchInfo {
        local,
        remote,
        divergence: divergence.to_string(),
    }
}

/// Splits a file-status line into its raw one- or two-character code and its path.
///
/// The two-character form wins when both fit, so `"M  a b"` yields `("M ", "a b")`.
pub fn split_status_line(line: &str) -> Option<(&str, &str)> {
    let mut chars = line.char_indices().skip(1);
    let (second_at, second) = chars.next()?;
    if let Some((third_at, ' ')) = chars.next() {
        return Some((&line[..third_at], &line[third_at + 1..]));
    }
    if second == ' ' {
        return Some((&line[..second_at], &line[second_at + 1..]));
    }
    None
}

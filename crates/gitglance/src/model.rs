use std::collections::HashMap;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BranchInfo {
    pub local: String,
    pub remote: String,
    pub divergence: String,
}

impl BranchInfo {
    pub fn has_remote(&self) -> bool {
        !self.remote.is_empty()
    }

    pub fn has_divergence(&self) -> bool {
        !self.divergence.is_empty()
    }
}

/// Names one of the six change buckets of a [`RepositorySnapshot`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeKind {
    Added,
    Deleted,
    Modified,
    Renamed,
    Untracked,
    Other,
}

impl ChangeKind {
    pub const ALL: [ChangeKind; 6] = [
        ChangeKind::Added,
        ChangeKind::Deleted,
        ChangeKind::Modified,
        ChangeKind::Renamed,
        ChangeKind::Untracked,
        ChangeKind::Other,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ChangeKind::Added => "added",
            ChangeKind::Deleted => "deleted",
            ChangeKind::Modified => "modified",
            ChangeKind::Renamed => "renamed",
            ChangeKind::Untracked => "untracked",
            ChangeKind::Other => "other",
        }
    }
}

/// A classified status code from a file-status line.
///
/// `Other` keeps the code exactly as it appeared, surrounding spaces included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusCode {
    Added,
    Deleted,
    Modified,
    Renamed,
    Untracked,
    Other(String),
}

impl StatusCode {
    pub fn classify(raw: &str) -> Self {
        match raw.trim() {
            "A" => StatusCode::Added,
            "D" => StatusCode::Deleted,
            "M" => StatusCode::Modified,
            "R" => StatusCode::Renamed,
            "??" => StatusCode::Untracked,
            _ => StatusCode::Other(raw.to_string()),
        }
    }

    pub fn kind(&self) -> ChangeKind {
        match self {
            StatusCode::Added => ChangeKind::Added,
            StatusCode::Deleted => ChangeKind::Deleted,
            StatusCode::Modified => ChangeKind::Modified,
            StatusCode::Renamed => ChangeKind::Renamed,
            StatusCode::Untracked => ChangeKind::Untracked,
            StatusCode::Other(_) => ChangeKind::Other,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepositorySnapshot {
    pub name: String,
    pub branch: BranchInfo,
    pub added: Vec<String>,
    pub deleted: Vec<String>,
    pub modified: Vec<String>,
    pub renamed: Vec<String>,
    pub untracked: Vec<String>,
    pub other: Vec<String>,
}

impl RepositorySnapshot {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn bucket(&self, kind: ChangeKind) -> &[String] {
        match kind {
            ChangeKind::Added => &self.added,
            ChangeKind::Deleted => &self.deleted,
            ChangeKind::Modified => &self.modified,
            ChangeKind::Renamed => &self.renamed,
            ChangeKind::Untracked => &self.untracked,
            ChangeKind::Other => &self.other,
        }
    }

    /// Appends a file-status entry. `Other` entries are stored as `"<code> <path>"`.
    pub fn record(&mut self, code: StatusCode, path: &str) {
        match code {
            StatusCode::Added => self.added.push(path.to_string()),
            StatusCode::Deleted => self.deleted.push(path.to_string()),
            StatusCode::Modified => self.modified.push(path.to_string()),
            StatusCode::Renamed => self.renamed.push(path.to_string()),
            StatusCode::Untracked => self.untracked.push(path.to_string()),
            StatusCode::Other(raw) => self.other.push(format!("{raw} {path}")),
        }
    }

    pub fn total_changes(&self) -> usize {
        ChangeKind::ALL
            .iter()
            .map(|kind| self.bucket(*kind).len())
            .sum()
    }

    pub fn is_unchanged(&self) -> bool {
        self.total_changes() == 0
    }

    /// Every entry in bucket order: added, deleted, modified, renamed, untracked, other.
    pub fn changes(&self) -> impl Iterator<Item = (ChangeKind, &str)> + '_ {
        ChangeKind::ALL.into_iter().flat_map(move |kind| {
            self.bucket(kind)
                .iter()
                .map(move |entry| (kind, entry.as_str()))
        })
    }
}

/// Snapshots keyed by name, in the order their names were first inserted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SnapshotSet {
    entries: Vec<RepositorySnapshot>,
    index: HashMap<String, usize>,
}

impl SnapshotSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a snapshot. An existing snapshot with the same name is replaced in place
    /// and returned.
    pub fn insert(&mut self, snapshot: RepositorySnapshot) -> Option<RepositorySnapshot> {
        if let Some(&position) = self.index.get(&snapshot.name) {
            return Some(std::mem::replace(&mut self.entries[position], snapshot));
        }
        self.index
            .insert(snapshot.name.clone(), self.entries.len());
        self.entries.push(snapshot);
        None
    }

    pub fn get(&self, name: &str) -> Option<&RepositorySnapshot> {
        self.index.get(name).map(|&position| &self.entries[position])
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut RepositorySnapshot> {
        let position = *self.index.get(name)?;
        self.entries.get_mut(position)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RepositorySnapshot> {
        self.entries.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(|snapshot| snapshot.name.as_str())
    }

    pub fn into_vec(self) -> Vec<RepositorySnapshot> {
        self.entries
    }
}

impl<'a> IntoIterator for &'a SnapshotSet {
    type Item = &'a RepositorySnapshot;
    type IntoIter = std::slice::Iter<'a, RepositorySnapshot>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl IntoIterator for SnapshotSet {
    type Item = RepositorySnapshot;
    type IntoIter = std::vec::IntoIter<RepositorySnapshot>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

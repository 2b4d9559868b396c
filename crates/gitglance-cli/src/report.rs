use gitglance::{BranchInfo, RepositorySnapshot};
use serde_json::{json, Value};

use crate::theme::change_icon;

/// `local ➡️ remote (❗divergence)`, omitting the parts that are empty.
pub(crate) fn branch_line(branch: &BranchInfo) -> String {
    let mut line = branch.local.clone();
    if branch.has_remote() {
        line.push_str(&format!(" ➡️ {}", branch.remote));
    }
    if branch.has_divergence() {
        line.push_str(&format!(" (❗{})", branch.divergence));
    }
    line
}

pub(crate) fn render_text(snapshots: &[&RepositorySnapshot]) -> String {
    if snapshots.is_empty() {
        return "no repositories\n".to_string();
    }

    let mut out = String::new();
    for (idx, snapshot) in snapshots.iter().enumerate() {
        if idx > 0 {
            out.push('\n');
        }
        out.push_str(&snapshot.name);
        out.push('\n');
        let branch = branch_line(&snapshot.branch);
        if !branch.is_empty() {
            out.push_str(&format!("  {branch}\n"));
        }
        for (kind, entry) in snapshot.changes() {
            out.push_str(&format!("  {} {entry}\n", change_icon(kind)));
        }
    }
    out
}

pub(crate) fn render_json(snapshots: &[&RepositorySnapshot]) -> Value {
    Value::Array(snapshots.iter().map(|snapshot| snapshot_json(snapshot)).collect())
}

fn snapshot_json(snapshot: &RepositorySnapshot) -> Value {
    json!({
        "name": snapshot.name,
        "branch": {
            "local": snapshot.branch.local,
            "remote": snapshot.branch.remote,
            "divergence": snapshot.branch.divergence,
        },
        "added": snapshot.added,
        "deleted": snapshot.deleted,
        "modified": snapshot.modified,
        "renamed": snapshot.renamed,
        "untracked": snapshot.untracked,
        "other": snapshot.other,
    })
}

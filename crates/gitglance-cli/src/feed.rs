use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use gitglance::{parse_status, SnapshotSet};
use tracing::{debug, warn};

use crate::config::Settings;
use crate::error::FeedError;

/// Runs the status command in every immediate subdirectory of `directory` and
/// concatenates the results, each block introduced by the subdirectory's path.
pub(crate) fn collect_status(directory: &Path, status_command: &str) -> Result<String, FeedError> {
    let mut output = String::new();

    for repo_dir in list_repo_dirs(directory)? {
        output.push_str(&repo_dir.display().to_string());
        output.push('\n');

        if let Some(stdout) = run_status_command(&repo_dir, status_command)? {
            output.push_str(&stdout);
            if !stdout.ends_with('\n') {
                output.push('\n');
            }
        }
        output.push('\n');
    }

    Ok(output)
}

pub(crate) fn load_snapshots(settings: &Settings) -> Result<SnapshotSet, FeedError> {
    let raw = collect_status(&settings.directory, &settings.status_command)?;
    let snapshots = parse_status(&raw, &settings.root_prefix())?;
    debug!(
        directory = %settings.directory.display(),
        repositories = snapshots.len(),
        "loaded snapshots"
    );
    Ok(snapshots)
}

fn list_repo_dirs(directory: &Path) -> Result<Vec<PathBuf>, FeedError> {
    let read_error = |source| FeedError::ReadDirectory {
        path: directory.display().to_string(),
        source,
    };

    let mut dirs = Vec::new();
    for entry in fs::read_dir(directory).map_err(read_error)? {
        let entry = entry.map_err(read_error)?;
        if !entry.file_type().map_err(read_error)?.is_dir() {
            continue;
        }
        let path = entry.path();
        if is_hidden(path.file_name()) {
            continue;
        }
        dirs.push(path);
    }

    dirs.sort();
    Ok(dirs)
}

fn is_hidden(name: Option<&OsStr>) -> bool {
    name.map(|name| name.to_string_lossy().starts_with('.'))
        .unwrap_or(false)
}

fn run_status_command(repo_dir: &Path, status_command: &str) -> Result<Option<String>, FeedError> {
    let output = Command::new("sh")
        .arg("-c")
        .arg(status_command)
        .current_dir(repo_dir)
        .stdin(Stdio::null())
        .output()
        .map_err(|source| FeedError::Spawn {
            command: status_command.to_string(),
            source,
        })?;

    if output.status.success() {
        return Ok(Some(String::from_utf8_lossy(&output.stdout).to_string()));
    }

    warn!(
        directory = %repo_dir.display(),
        status = %output.status,
        stderr = %String::from_utf8_lossy(&output.stderr).trim(),
        "status command failed"
    );
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::{collect_status, load_snapshots};
    use crate::config::Settings;
    use crate::error::FeedError;
    use std::fs;
    use std::path::{Path, PathBuf};
    use std::time::{Duration, SystemTime, UNIX_EPOCH};

    #[test]
    fn collect_status_emits_one_block_per_directory() {
        let root = unique_root("collect_status_emits_one_block_per_directory");
        fs::create_dir_all(root.join("beta")).expect("create beta");
        fs::create_dir_all(root.join("alpha")).expect("create alpha");
        fs::create_dir_all(root.join(".hidden")).expect("create hidden");
        fs::write(root.join("notes.txt"), "not a directory").expect("write file");
        fs::write(root.join("alpha").join("status.txt"), "## main\n?? new.txt").expect("write");

        let output = collect_status(&root, "cat status.txt").expect("collect status");
        let expected = format!(
            "{root}/alpha\n## main\n?? new.txt\n\n{root}/beta\n\n",
            root = root.display()
        );
        assert_eq!(output, expected);

        cleanup_root(&root);
    }

    #[test]
    fn load_snapshots_parses_the_feed() {
        let root = unique_root("load_snapshots_parses_the_feed");
        fs::create_dir_all(root.join("clean")).expect("create clean");
        fs::create_dir_all(root.join("dirty")).expect("create dirty");
        fs::write(root.join("clean").join("status.txt"), "## main...origin/main\n")
            .expect("write clean");
        fs::write(
            root.join("dirty").join("status.txt"),
            "## dev...origin/dev [ahead 1]\n M src/lib.rs\n?? todo.md\n",
        )
        .expect("write dirty");

        let settings = settings_for(&root, "cat status.txt");
        let snapshots = load_snapshots(&settings).expect("load snapshots");
        assert_eq!(snapshots.names().collect::<Vec<_>>(), vec!["clean", "dirty"]);
        let dirty = snapshots.get("dirty").expect("dirty snapshot");
        assert_eq!(dirty.branch.divergence, "ahead 1");
        assert_eq!(dirty.modified, vec!["src/lib.rs".to_string()]);
        assert_eq!(dirty.untracked, vec!["todo.md".to_string()]);

        cleanup_root(&root);
    }

    #[test]
    fn load_snapshots_surfaces_parse_errors() {
        let root = unique_root("load_snapshots_surfaces_parse_errors");
        fs::create_dir_all(root.join("odd")).expect("create odd");

        let settings = settings_for(&root, "echo 'unexpected output'");
        let err = load_snapshots(&settings).expect_err("malformed feed");
        assert!(matches!(err, FeedError::Parse(_)));

        cleanup_root(&root);
    }

    #[test]
    fn collect_status_fails_for_missing_directory() {
        let root = unique_root("collect_status_fails_for_missing_directory");
        let err = collect_status(&root, "true").expect_err("missing directory");
        assert!(matches!(err, FeedError::ReadDirectory { .. }));
    }

    fn settings_for(root: &Path, command: &str) -> Settings {
        Settings {
            directory: root.to_path_buf(),
            status_command: command.to_string(),
            skip_unchanged: false,
            refresh_interval: Duration::from_secs(5),
            theme_index: 0,
        }
    }

    fn unique_root(test_name: &str) -> PathBuf {
        let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
        let workspace_root = manifest_dir
            .parent()
            .and_then(Path::parent)
            .map(Path::to_path_buf)
            .expect("workspace root");
        let seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time")
            .as_nanos();
        let pid = std::process::id();
        workspace_root
            .join(".gitglance-cli-feed-test")
            .join(format!("{test_name}-{pid}-{seed}"))
    }

    fn cleanup_root(root: &Path) {
        if root.exists() {
            fs::remove_dir_all(root).expect("cleanup root");
        }
    }
}

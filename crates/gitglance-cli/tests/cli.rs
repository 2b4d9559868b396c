use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::time::{SystemTime, UNIX_EPOCH};

const SAVED_FEED: &str = "/r/app\n## main...origin/main [behind 4]\n M src/lib.rs\n/r/lib\n## main\n";

#[test]
fn parse_file_prints_text_report() {
    let ctx = TestContext::new("parse_file_prints_text_report");
    let feed = ctx.write_file("feed.txt", SAVED_FEED);

    let output = ctx.gitglance(&["parse", feed.to_str().expect("feed path"), "--root", "/r"]);
    let stdout = assert_success(output);
    assert_eq!(
        stdout,
        "app\n  main ➡️ origin/main (❗behind 4)\n  ✏️ src/lib.rs\n\nlib\n  main\n"
    );
}

#[test]
fn parse_file_prints_json() {
    let ctx = TestContext::new("parse_file_prints_json");
    let feed = ctx.write_file("feed.txt", SAVED_FEED);

    let output = ctx.gitglance(&[
        "parse",
        feed.to_str().expect("feed path"),
        "--root",
        "/r",
        "--json",
    ]);
    let stdout = assert_success(output);
    let value: serde_json::Value = serde_json::from_str(&stdout).expect("json output");
    assert_eq!(value[0]["name"], "app");
    assert_eq!(value[0]["branch"]["divergence"], "behind 4");
    assert_eq!(value[0]["modified"][0], "src/lib.rs");
    assert_eq!(value[1]["name"], "lib");
}

#[test]
fn parse_skip_unchanged_hides_clean_repositories() {
    let ctx = TestContext::new("parse_skip_unchanged_hides_clean_repositories");
    let feed = ctx.write_file("feed.txt", SAVED_FEED);

    let output = ctx.gitglance(&[
        "parse",
        feed.to_str().expect("feed path"),
        "--root",
        "/r",
        "--skip-unchanged",
    ]);
    let stdout = assert_success(output);
    assert!(stdout.starts_with("app\n"));
    assert!(!stdout.contains("lib\n  main"));
}

#[test]
fn parse_line_before_marker_fails() {
    let ctx = TestContext::new("parse_line_before_marker_fails");
    let feed = ctx.write_file("feed.txt", "## main\n M a.rs\n");

    let output = ctx.gitglance(&["parse", feed.to_str().expect("feed path")]);
    assert_failure_contains(output, "error:");
}

#[test]
fn parse_keep_malformed_records_raw_line() {
    let ctx = TestContext::new("parse_keep_malformed_records_raw_line");
    let feed = ctx.write_file("feed.txt", "/r/app\nwarning: junk\n");

    let output = ctx.gitglance(&["parse", feed.to_str().expect("feed path"), "--root", "/r"]);
    assert_failure_contains(output, "error:");

    let output = ctx.gitglance(&[
        "parse",
        feed.to_str().expect("feed path"),
        "--root",
        "/r",
        "--keep-malformed",
    ]);
    assert_success_contains(output, "❓ <raw> warning: junk");
}

#[test]
fn status_reports_untracked_files_in_git_repos() {
    let ctx = TestContext::new("status_reports_untracked_files_in_git_repos");
    let projects = ctx.root.join("projects");
    init_repo(&projects.join("alpha"));
    init_repo(&projects.join("beta"));
    fs::write(projects.join("alpha").join("notes.txt"), "todo").expect("write notes");

    let output = ctx.gitglance(&["status", "-d", projects.to_str().expect("projects path")]);
    let stdout = assert_success(output);
    assert!(stdout.starts_with("alpha\n"), "got {stdout:?}");
    assert!(stdout.contains("🆕 notes.txt"));
    assert!(stdout.contains("\nbeta\n"));
}

#[test]
fn status_skip_unchanged_hides_clean_repos() {
    let ctx = TestContext::new("status_skip_unchanged_hides_clean_repos");
    let projects = ctx.root.join("projects");
    init_repo(&projects.join("alpha"));
    init_repo(&projects.join("beta"));
    fs::write(projects.join("beta").join("README.md"), "changed").expect("edit README");

    let output = ctx.gitglance(&[
        "status",
        "--skip-unchanged",
        "-d",
        projects.to_str().expect("projects path"),
    ]);
    let stdout = assert_success(output);
    assert!(!stdout.contains("alpha"), "got {stdout:?}");
    assert!(stdout.contains("beta\n"));
    assert!(stdout.contains("✏️ README.md"));
}

#[test]
fn status_uses_configured_command() {
    let ctx = TestContext::new("status_uses_configured_command");
    let projects = ctx.root.join("projects");
    let app = projects.join("app");
    fs::create_dir_all(&app).expect("create app dir");
    fs::write(app.join("status.txt"), "## trunk\nA  new.rs\n").expect("write status");
    fs::create_dir_all(projects.join(".hidden")).expect("create hidden dir");
    ctx.write_config(&format!(
        "directory = \"{}\"\nstatus_command = \"cat status.txt\"\n",
        projects.display()
    ));

    let output = ctx.gitglance(&["status", "--json"]);
    let stdout = assert_success(output);
    let value: serde_json::Value = serde_json::from_str(&stdout).expect("json output");
    assert_eq!(value.as_array().map(Vec::len), Some(1));
    assert_eq!(value[0]["name"], "app");
    assert_eq!(value[0]["branch"]["local"], "trunk");
    assert_eq!(value[0]["added"][0], "new.rs");
}

#[test]
fn status_empty_directory_reports_nothing() {
    let ctx = TestContext::new("status_empty_directory_reports_nothing");
    let projects = ctx.root.join("projects");
    fs::create_dir_all(&projects).expect("create projects");

    let output = ctx.gitglance(&["status", "-d", projects.to_str().expect("projects path")]);
    let stdout = assert_success(output);
    assert_eq!(stdout.trim(), "no repositories");
}

#[test]
fn status_missing_directory_fails() {
    let ctx = TestContext::new("status_missing_directory_fails");
    let missing = ctx.root.join("nope");

    let output = ctx.gitglance(&["status", "-d", missing.to_str().expect("missing path")]);
    assert_failure_contains(output, "error:");
}

#[test]
fn config_set_and_show() {
    let ctx = TestContext::new("config_set_and_show");
    let projects = ctx.root.join("projects");
    fs::create_dir_all(&projects).expect("create projects");

    let output = ctx.gitglance(&["config", "set", "skip_unchanged", "true"]);
    assert_success_contains(output, "set skip_unchanged");
    let output = ctx.gitglance(&["config", "set", "theme", "orange"]);
    assert_success_contains(output, "set theme");

    let output = ctx.gitglance(&["config", "show", "-d", projects.to_str().expect("path")]);
    let stdout = assert_success(output);
    assert!(stdout.contains("skip_unchanged = true"));
    assert!(stdout.contains("theme = orange"));
    assert!(stdout.contains("status_command = git status --short --branch"));
}

#[test]
fn config_path_points_into_home() {
    let ctx = TestContext::new("config_path_points_into_home");

    let output = ctx.gitglance(&["config", "path"]);
    let stdout = assert_success(output);
    assert_eq!(
        stdout.trim(),
        ctx.config_dir().join("config.toml").display().to_string()
    );
}

#[test]
fn config_set_unknown_key_fails() {
    let ctx = TestContext::new("config_set_unknown_key_fails");

    let output = ctx.gitglance(&["config", "set", "colour", "red"]);
    assert_failure_contains(output, "unknown key: colour");
}

#[test]
fn config_set_invalid_value_fails() {
    let ctx = TestContext::new("config_set_invalid_value_fails");

    let output = ctx.gitglance(&["config", "set", "refresh_ms", "soon"]);
    assert_failure_contains(output, "invalid setting refresh_ms");
}

struct TestContext {
    root: PathBuf,
    home: PathBuf,
}

impl TestContext {
    fn new(test_name: &str) -> Self {
        let root = unique_root(test_name);
        let home = root.join("home");
        fs::create_dir_all(&home).expect("create home");
        Self { root, home }
    }

    fn config_dir(&self) -> PathBuf {
        self.home.join(".gitglance")
    }

    fn gitglance(&self, args: &[&str]) -> Output {
        Command::new(gitglance_bin())
            .args(args)
            .current_dir(&self.root)
            .env("GITGLANCE_HOME", self.config_dir())
            .env("HOME", &self.home)
            .env_remove("GITGLANCE_DIRECTORY")
            .env_remove("GITGLANCE_LOG")
            .output()
            .expect("run gitglance")
    }

    fn write_config(&self, contents: &str) {
        let config_dir = self.config_dir();
        fs::create_dir_all(&config_dir).expect("create config dir");
        fs::write(config_dir.join("config.toml"), contents).expect("write config");
    }

    fn write_file(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.root.join(name);
        fs::write(&path, contents).expect("write file");
        path
    }
}

impl Drop for TestContext {
    fn drop(&mut self) {
        cleanup_root(&self.root);
    }
}

fn gitglance_bin() -> &'static str {
    env!("CARGO_BIN_EXE_gitglance")
}

fn unique_root(test_name: &str) -> PathBuf {
    let workspace_root = workspace_root();
    let seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("time")
        .as_nanos();
    let pid = std::process::id();
    workspace_root
        .join(".gitglance-cli-test")
        .join(format!("{test_name}-{pid}-{seed}"))
}

fn workspace_root() -> PathBuf {
    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    manifest_dir
        .parent()
        .and_then(Path::parent)
        .map(Path::to_path_buf)
        .expect("workspace root")
}

fn init_repo(path: &Path) {
    fs::create_dir_all(path).expect("create repo dir");
    run_git(&["init", "--quiet"], path);
    run_git(&["config", "user.email", "gitglance-test@example.com"], path);
    run_git(&["config", "user.name", "gitglance-test"], path);
    fs::write(path.join("README.md"), "hello").expect("write README");
    run_git(&["add", "README.md"], path);
    run_git(&["commit", "--quiet", "-m", "init"], path);
}

fn run_git(args: &[&str], cwd: &Path) {
    let output = Command::new("git")
        .args(args)
        .current_dir(cwd)
        .output()
        .expect("run git");

    if !output.status.success() {
        panic!(
            "git {:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
    }
}

fn cleanup_root(root: &Path) {
    if root.exists() {
        fs::remove_dir_all(root).expect("cleanup root");
    }
}

fn assert_success(output: Output) -> String {
    if !output.status.success() {
        panic!(
            "command failed: {}\nstdout: {}\nstderr: {}",
            output.status,
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        );
    }
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn assert_success_contains(output: Output, needle: &str) {
    let stdout = assert_success(output);
    assert!(
        stdout.contains(needle),
        "expected stdout to contain {:?}, got {:?}",
        needle,
        stdout
    );
}

fn assert_failure_contains(output: Output, needle: &str) {
    if output.status.success() {
        panic!(
            "expected failure, got success.\nstdout: {}\nstderr: {}",
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        );
    }
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains(needle),
        "expected stderr to contain {:?}, got {:?}",
        needle,
        stderr
    );
}

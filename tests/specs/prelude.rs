//! Spec-test harness: a temp project with stub vendor CLIs on PATH.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

pub const SPEC_WAIT_MAX_MS: u64 = 15_000;

/// Stub for a claude-family CLI that answers every prompt with a fixed
/// reply (and honors the version probe).
pub const CLAUDE_OK_STUB: &str = r#"case "$1" in --version) echo "claude 1.0.0"; exit 0;; esac
echo '{"type":"system","subtype":"init","session_id":"sess-stub"}'
echo '{"type":"assistant","message":{"content":[{"type":"text","text":"stub says hi"}]}}'
echo '{"type":"result","subtype":"success","is_error":false,"result":"stub says hi","session_id":"sess-stub"}'"#;

/// Stub for a codex-family CLI that hangs long past any test timeout.
pub const CODEX_SLEEP_STUB: &str = r#"case "$1" in --version) echo "codex 1.0.0"; exit 0;; esac
sleep 30"#;

/// Stub for a codex-family CLI that answers immediately.
pub const CODEX_OK_STUB: &str = r#"case "$1" in --version) echo "codex 1.0.0"; exit 0;; esac
echo '{"type":"thread.started","thread_id":"th-stub"}'
echo '{"type":"item.completed","item":{"type":"agent_message","text":"codex recovered"}}'"#;

/// Stub for a codex-family CLI that fails with a transient error.
pub const CODEX_FAIL_STUB: &str = r#"case "$1" in --version) echo "codex 1.0.0"; exit 0;; esac
echo "stream disconnected" >&2
exit 1"#;

/// Two-member config: `a` is claude-family, `b` is codex-family.
pub const TWO_MEMBER_CONFIG: &str = r#"{
    "agents": {
        "a": {"backend": "claude"},
        "b": {"backend": "codex"}
    },
    "council": {"members": ["a", "b"], "timeout": 2}
}"#;

pub struct Project {
    temp: tempfile::TempDir,
}

pub struct RunResult {
    pub status: std::process::ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

impl Project {
    pub fn empty() -> Self {
        let temp = tempfile::TempDir::new().unwrap();
        std::fs::create_dir_all(temp.path().join("bin")).unwrap();
        std::fs::create_dir_all(temp.path().join("state")).unwrap();
        Self { temp }
    }

    pub fn path(&self) -> &Path {
        self.temp.path()
    }

    pub fn state_dir(&self) -> PathBuf {
        self.path().join("state")
    }

    /// Write `config.json` into the state dir.
    pub fn config(&self, json: &str) {
        std::fs::write(self.state_dir().join("config.json"), json).unwrap();
    }

    /// Install an executable stub under the vendor CLI's name.
    pub fn stub(&self, name: &str, script: &str) {
        use std::os::unix::fs::PermissionsExt;
        let path = self.path().join("bin").join(name);
        std::fs::write(&path, format!("#!/bin/sh\n{}\n", script)).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    }

    fn kd(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::Command::cargo_bin("kd").unwrap();
        let path_env = format!(
            "{}:{}",
            self.path().join("bin").display(),
            std::env::var("PATH").unwrap_or_default()
        );
        cmd.env("KINGDOM_STATE_DIR", self.state_dir())
            .env("PATH", path_env)
            .env("NO_COLOR", "1")
            .current_dir(self.path());
        cmd
    }

    /// Run `kd` with args and capture everything.
    pub fn run(&self, args: &[&str]) -> RunResult {
        let output = self.kd().args(args).output().unwrap();
        RunResult {
            status: output.status,
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        }
    }

    pub fn threads_dir(&self) -> PathBuf {
        self.state_dir().join("branches/main/threads")
    }

    pub fn thread_dir(&self, id: &str) -> PathBuf {
        self.threads_dir().join(id)
    }

    /// File names of a thread's messages, sorted.
    pub fn message_files(&self, id: &str) -> Vec<String> {
        let mut names: Vec<String> = match std::fs::read_dir(self.thread_dir(id)) {
            Ok(entries) => entries
                .filter_map(|e| e.ok())
                .filter_map(|e| e.file_name().into_string().ok())
                .filter(|name| name.ends_with(".md"))
                .collect(),
            Err(_) => Vec::new(),
        };
        names.sort();
        names
    }

    pub fn message_body(&self, id: &str, file: &str) -> String {
        let content = std::fs::read_to_string(self.thread_dir(id).join(file)).unwrap();
        let (_, body) = content
            .split_once("---\n\n")
            .unwrap_or_else(|| panic!("no body separator in {}", file));
        body.to_string()
    }
}

impl RunResult {
    #[track_caller]
    pub fn passes(self) -> Self {
        assert!(
            self.status.success(),
            "expected success, got {:?}\nstdout:\n{}\nstderr:\n{}",
            self.status.code(),
            self.stdout,
            self.stderr
        );
        self
    }

    #[track_caller]
    pub fn exits(self, code: i32) -> Self {
        assert_eq!(
            self.status.code(),
            Some(code),
            "stdout:\n{}\nstderr:\n{}",
            self.stdout,
            self.stderr
        );
        self
    }

    #[track_caller]
    pub fn stdout_has(self, needle: &str) -> Self {
        assert!(
            self.stdout.contains(needle),
            "stdout missing {:?}:\n{}",
            needle,
            self.stdout
        );
        self
    }

    #[track_caller]
    pub fn stderr_has(self, needle: &str) -> Self {
        assert!(
            self.stderr.contains(needle),
            "stderr missing {:?}:\n{}",
            needle,
            self.stderr
        );
        self
    }

    /// First line of stdout, which `kd ask` uses for the thread id.
    pub fn first_line(&self) -> String {
        self.stdout.lines().next().unwrap_or("").trim().to_string()
    }
}

/// Poll a condition until it holds or the deadline passes.
pub fn wait_for(max_ms: u64, mut cond: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + Duration::from_millis(max_ms);
    while Instant::now() < deadline {
        if cond() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(50));
    }
    cond()
}

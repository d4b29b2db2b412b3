//! End-to-end tests for the fdsnoop binary: exit codes, output stream, and a
//! snapshot of a real process.

use std::fs;
use std::path::Path;
use std::process::{Child, Command};
use std::thread;
use std::time::{Duration, Instant};

use assert_cmd::prelude::*;
use predicates::prelude::*;
use tempfile::NamedTempFile;

fn fdsnoop() -> Command {
    Command::cargo_bin("fdsnoop").expect("fdsnoop binary not found")
}

/// Kills the wrapped child when dropped, even if an assertion panics.
struct KillOnDrop(Child);

impl Drop for KillOnDrop {
    fn drop(&mut self) {
        let _ = self.0.kill();
        let _ = self.0.wait();
    }
}

/// Start `sleep` holding `path` open on descriptor 3 and wait until
/// /proc shows it.
fn spawn_holder(path: &Path) -> KillOnDrop {
    let child = Command::new("sh")
        .arg("-c")
        .arg("exec 3< \"$0\"; exec sleep 30")
        .arg(path)
        .spawn()
        .expect("failed to spawn sh");
    let pid = child.id();
    let holder = KillOnDrop(child);

    let deadline = Instant::now() + Duration::from_secs(5);
    loop {
        let comm = fs::read_to_string(format!("/proc/{pid}/comm")).unwrap_or_default();
        let has_fd = Path::new(&format!("/proc/{pid}/fd/3")).exists();
        if comm.trim() == "sleep" && has_fd {
            return holder;
        }
        assert!(Instant::now() < deadline, "holder process never settled");
        thread::sleep(Duration::from_millis(20));
    }
}

#[test]
fn zero_pid_prints_usage_and_exits_1() {
    fdsnoop()
        .args(["--pid", "0"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("--pid <PID>"))
        .stderr(predicate::str::is_empty());
}

#[test]
fn missing_pid_prints_usage_and_exits_1() {
    fdsnoop()
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Usage"))
        .stderr(predicate::str::is_empty());
}

#[test]
fn unknown_process_reports_on_stdout_and_exits_1() {
    // Above any pid_max the kernel allows
    fdsnoop()
        .args(["--pid", "4294967295"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains(
            "cannot list descriptors of pid 4294967295",
        ))
        .stderr(predicate::str::is_empty());
}

#[test]
fn bad_argument_exits_1_on_stdout() {
    fdsnoop()
        .args(["--pid", "abc"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("abc"))
        .stderr(predicate::str::is_empty());
}

#[test]
fn help_exits_0() {
    fdsnoop()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("PID to analyze"));
}

#[test]
fn snapshots_a_live_process() {
    let file = NamedTempFile::new().unwrap();
    let holder = spawn_holder(file.path());
    let pid = holder.0.id();

    let expected = format!("FD: 3\nPath: {}\nFlags: [", file.path().display());
    fdsnoop()
        .args(["--pid", &pid.to_string()])
        .assert()
        .success()
        .stdout(predicate::str::contains(expected))
        .stdout(predicate::str::contains("FD: 0\n").not())
        .stdout(predicate::str::contains("FD: 1\n").not())
        .stdout(predicate::str::contains("FD: 2\n").not())
        .stderr(predicate::str::is_empty());
}

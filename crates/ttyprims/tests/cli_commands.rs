#![cfg(all(unix, feature = "cli"))]

use std::ffi::CStr;
use std::fs::File;
use std::io::{Read, Write};
use std::os::fd::{AsRawFd, FromRawFd, OwnedFd};
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

struct Pty {
    master: File,
    slave_path: String,
}

fn open_pty() -> Pty {
    // SAFETY: plain libc calls on a descriptor we own; `ptsname` returns a
    // pointer to a static buffer that is copied immediately.
    unsafe {
        let master = libc::posix_openpt(libc::O_RDWR | libc::O_NOCTTY);
        assert!(master >= 0, "posix_openpt failed");
        assert_eq!(libc::grantpt(master), 0, "grantpt failed");
        assert_eq!(libc::unlockpt(master), 0, "unlockpt failed");
        let name = libc::ptsname(master);
        assert!(!name.is_null(), "ptsname failed");
        Pty {
            master: File::from(OwnedFd::from_raw_fd(master)),
            slave_path: CStr::from_ptr(name).to_string_lossy().into_owned(),
        }
    }
}

fn ttyprims() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_ttyprims"));
    cmd.arg("--log-level").arg("error");
    cmd
}

#[test]
fn version_prints_package_version() {
    let output = ttyprims().arg("version").output().expect("version should run");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.trim(), format!("ttyprims {}", env!("CARGO_PKG_VERSION")));
}

#[test]
fn bauds_json_lists_every_rate() {
    let output = ttyprims()
        .args(["--format", "json", "bauds"])
        .output()
        .expect("bauds should run");
    assert!(output.status.success());

    let rates: Vec<serde_json::Value> =
        serde_json::from_slice(&output.stdout).expect("bauds output should be JSON");
    assert_eq!(rates.len(), 30);
    assert!(rates.iter().any(|r| r["rate"] == 115200));
}

#[test]
fn send_writes_payload_to_device() {
    let pty = open_pty();
    let output = ttyprims()
        .args(["--format", "json", "send", &pty.slave_path])
        .args(["--data", "AT", "--newline", "--baud", "115200"])
        .output()
        .expect("send should run");
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let report: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("send report should be JSON");
    assert_eq!(report["written"], 3);
    assert_eq!(report["requested"], 3);

    let mut buf = [0u8; 3];
    (&pty.master).read_exact(&mut buf).expect("master should receive payload");
    assert_eq!(&buf, b"AT\n");
}

#[test]
fn listen_prints_received_lines() {
    let pty = open_pty();
    let mut child = ttyprims()
        .args(["--format", "raw", "listen", &pty.slave_path])
        .args(["--lines", "--count", "1"])
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .expect("listen should start");

    // The listener may not be subscribed yet; repeat until it exits.
    let deadline = Instant::now() + Duration::from_secs(10);
    let status = loop {
        if let Some(status) = child.try_wait().expect("try_wait") {
            break status;
        }
        assert!(Instant::now() < deadline, "listen did not exit");
        let _ = (&pty.master).write_all(b"hello\n");
        drain_master(&pty);
        thread::sleep(Duration::from_millis(100));
    };
    assert!(status.success());

    let mut stdout = String::new();
    child
        .stdout
        .take()
        .expect("stdout piped")
        .read_to_string(&mut stdout)
        .expect("stdout readable");
    assert_eq!(stdout.lines().next(), Some("hello"));
}

#[test]
fn missing_device_fails_with_usage_code() {
    let output = ttyprims()
        .args(["send", "/dev/ttyprims-missing", "--data", "x"])
        .output()
        .expect("send should run");
    assert_eq!(output.status.code(), Some(64));
    assert!(String::from_utf8_lossy(&output.stderr).contains("cannot open"));
}

#[test]
fn non_terminal_device_fails_configuration() {
    let output = ttyprims()
        .args(["send", "/dev/null", "--data", "x"])
        .output()
        .expect("send should run");
    assert_eq!(output.status.code(), Some(3));
}

/// Discard anything the slave echoed before it was switched to raw mode.
fn drain_master(pty: &Pty) {
    let mut fd = libc::pollfd {
        fd: pty.master.as_raw_fd(),
        events: libc::POLLIN,
        revents: 0,
    };
    let mut buf = [0u8; 256];
    // SAFETY: `fd` is a valid pollfd for the duration of the call.
    while unsafe { libc::poll(&mut fd, 1, 0) } > 0 && fd.revents & libc::POLLIN != 0 {
        if (&pty.master).read(&mut buf).unwrap_or(0) == 0 {
            break;
        }
    }
}

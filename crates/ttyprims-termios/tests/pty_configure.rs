#![cfg(unix)]

use std::ffi::CStr;
use std::fs::{File, OpenOptions};
use std::os::fd::{AsRawFd, FromRawFd, OwnedFd};
use std::os::unix::fs::OpenOptionsExt;
use std::path::PathBuf;

use ttyprims_termios::{configure, BaudRate, DataBits, Parity, Settings, StopBits};

/// Allocate a pseudo-terminal pair and return the master and the slave path.
fn open_pty() -> (OwnedFd, PathBuf) {
    // SAFETY: plain libc calls on a descriptor we own; `ptsname` returns a
    // pointer to a static buffer that is copied before any other pty call.
    unsafe {
        let master = libc::posix_openpt(libc::O_RDWR | libc::O_NOCTTY);
        assert!(master >= 0, "posix_openpt failed");
        assert_eq!(libc::grantpt(master), 0, "grantpt failed");
        assert_eq!(libc::unlockpt(master), 0, "unlockpt failed");
        let name = libc::ptsname(master);
        assert!(!name.is_null(), "ptsname failed");
        let path = PathBuf::from(CStr::from_ptr(name).to_string_lossy().into_owned());
        (OwnedFd::from_raw_fd(master), path)
    }
}

fn open_slave(path: &PathBuf) -> File {
    OpenOptions::new()
        .read(true)
        .write(true)
        .custom_flags(libc::O_NOCTTY)
        .open(path)
        .expect("slave should open")
}

fn read_attributes(file: &File) -> libc::termios {
    // SAFETY: zeroed termios is valid and immediately overwritten by tcgetattr
    // on a live descriptor.
    unsafe {
        let mut t: libc::termios = std::mem::zeroed();
        assert_eq!(libc::tcgetattr(file.as_raw_fd(), &mut t), 0);
        t
    }
}

#[test]
fn configure_commits_raw_mode_to_device() {
    let (_master, path) = open_pty();
    let slave = open_slave(&path);

    // Linux ptys force CS8 and clear PARENB on every commit, so framing is
    // checked with 8N2 only.
    let settings = Settings::new(BaudRate::Baud115200)
        .with_parity(Parity::None)
        .with_stop_bits(StopBits::Two)
        .with_data_bits(DataBits::Eight)
        .with_minimum_bytes_to_read(0)
        .with_timeout(10);
    configure(&slave, &settings).expect("configure should succeed on a pty");

    let t = read_attributes(&slave);
    assert_eq!(t.c_lflag & (libc::ICANON | libc::ECHO | libc::ISIG), 0);
    assert_eq!(t.c_cflag & libc::CSIZE, libc::CS8);
    assert_eq!(t.c_iflag & (libc::ICRNL | libc::INLCR | libc::IGNCR), 0);
    assert_ne!(t.c_cflag & libc::CSTOPB, 0);
    assert_eq!(t.c_cc[libc::VMIN], 0);
    assert_eq!(t.c_cc[libc::VTIME], 10);
    // SAFETY: reads a field of a valid termios.
    let ospeed = unsafe { libc::cfgetospeed(&t) };
    assert_eq!(ospeed, BaudRate::Baud115200.speed());
}

#[test]
fn configure_can_be_repeated() {
    let (_master, path) = open_pty();
    let slave = open_slave(&path);

    configure(&slave, &Settings::new(BaudRate::Baud9600)).unwrap();
    configure(&slave, &Settings::new(BaudRate::Baud19200).with_process_output(true)).unwrap();

    let t = read_attributes(&slave);
    assert_ne!(t.c_oflag & libc::OPOST, 0);
    // SAFETY: reads a field of a valid termios.
    let ispeed = unsafe { libc::cfgetispeed(&t) };
    assert_eq!(ispeed, BaudRate::Baud19200.speed());
}

#[test]
fn configure_on_non_tty_fails_reading_attributes() {
    let file = File::open("/dev/null").expect("/dev/null should open");
    let err = configure(&file, &Settings::default()).unwrap_err();
    assert!(matches!(
        err,
        ttyprims_termios::TermiosError::GetAttributes(_)
    ));
}

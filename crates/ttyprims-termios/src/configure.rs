use std::os::fd::{AsFd, AsRawFd};

use tracing::debug;

use crate::backend::{Backend, Platform};
use crate::error::{Result, TermiosError};
use crate::settings::{Settings, StopBits};

/// Translate `settings` into the bits of `termios`.
///
/// Only the fields the settings govern are touched; everything else in the
/// structure is kept as read from the device. Canonical mode, echo and
/// signal generation are always disabled and CR/NL input translation is
/// always off, so reads deliver raw bytes.
pub fn apply(settings: &Settings, termios: &mut libc::termios) -> Result<()> {
    set_speeds(settings, termios)?;

    termios.c_cflag &= !(libc::PARENB | libc::PARODD);
    termios.c_cflag |= settings.parity.flags();

    match settings.stop_bits {
        StopBits::One => termios.c_cflag &= !libc::CSTOPB,
        StopBits::Two => termios.c_cflag |= libc::CSTOPB,
    }

    termios.c_cflag &= !libc::CSIZE;
    termios.c_cflag |= settings.data_bits.flag();

    termios.c_iflag &= !(libc::ICRNL | libc::INLCR | libc::IGNCR);

    Platform::set_hardware_flow_control(termios, settings.hardware_flow_control);

    let software = libc::IXON | libc::IXOFF | libc::IXANY;
    if settings.software_flow_control {
        termios.c_iflag |= software;
    } else {
        termios.c_iflag &= !software;
    }

    termios.c_cflag |= libc::CREAD | libc::CLOCAL;

    termios.c_lflag &= !(libc::ICANON | libc::ECHO | libc::ECHOE | libc::ISIG);

    if settings.process_output {
        termios.c_oflag |= libc::OPOST;
    } else {
        termios.c_oflag &= !libc::OPOST;
    }

    termios.c_cc[libc::VMIN] = settings.minimum_bytes_to_read;
    termios.c_cc[libc::VTIME] = settings.timeout;

    Ok(())
}

/// Read, update and commit the control structure of an open descriptor.
///
/// The new attributes take effect immediately (`TCSANOW`).
///
/// # Partial application
///
/// The steps are not transactional. If committing fails after the
/// structure was accepted (for example the Darwin custom speed ioctl),
/// the device keeps whatever was already applied; nothing is rolled back.
pub fn configure(fd: impl AsFd, settings: &Settings) -> Result<()> {
    let fd = fd.as_fd();
    let raw = fd.as_raw_fd();

    // SAFETY: `termios` is a plain C struct for which all-zero bytes is a valid value;
    // it is fully overwritten by `tcgetattr` before use.
    let mut termios: libc::termios = unsafe { std::mem::zeroed() };

    // SAFETY: `raw` is borrowed from a live descriptor and `termios` is a valid,
    // writable `struct termios`.
    if unsafe { libc::tcgetattr(raw, &mut termios) } == -1 {
        return Err(TermiosError::GetAttributes(std::io::Error::last_os_error()));
    }

    apply(settings, &mut termios)?;

    // SAFETY: same descriptor as above; `termios` was initialised by `tcgetattr`.
    if unsafe { libc::tcsetattr(raw, libc::TCSANOW, &termios) } == -1 {
        return Err(TermiosError::SetAttributes(std::io::Error::last_os_error()));
    }

    Platform::commit_custom_speed(fd, settings)?;

    debug!(
        backend = Platform::NAME,
        receive_rate = settings.receive_rate.value(),
        transmit_rate = settings.transmit_rate.value(),
        parity = ?settings.parity,
        data_bits = settings.data_bits.bits(),
        stop_bits = ?settings.stop_bits,
        "applied line settings"
    );
    Ok(())
}

fn set_speeds(settings: &Settings, termios: &mut libc::termios) -> Result<()> {
    let input = Platform::termios_speed(settings.receive_rate);
    // SAFETY: `termios` is a valid, exclusively borrowed `struct termios`.
    if unsafe { libc::cfsetispeed(termios, input) } == -1 {
        return Err(TermiosError::SetSpeed {
            rate: settings.receive_rate.value(),
            source: std::io::Error::last_os_error(),
        });
    }

    let output = Platform::termios_speed(settings.transmit_rate);
    // SAFETY: as above.
    if unsafe { libc::cfsetospeed(termios, output) } == -1 {
        return Err(TermiosError::SetSpeed {
            rate: settings.transmit_rate.value(),
            source: std::io::Error::last_os_error(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::baud::BaudRate;
    use crate::settings::{DataBits, Parity};

    fn blank() -> libc::termios {
        // SAFETY: all-zero bytes is a valid `struct termios`.
        unsafe { std::mem::zeroed() }
    }

    fn cooked() -> libc::termios {
        let mut t = blank();
        t.c_iflag = libc::ICRNL | libc::INLCR | libc::IGNCR | libc::IXON | libc::BRKINT;
        t.c_oflag = libc::OPOST;
        t.c_cflag = libc::CS7 | libc::PARENB | libc::PARODD | libc::CSTOPB | libc::HUPCL;
        t.c_lflag = libc::ICANON | libc::ECHO | libc::ECHOE | libc::ISIG | libc::IEXTEN;
        t.c_cc[libc::VINTR] = 3;
        t
    }

    fn input_speed(t: &libc::termios) -> libc::speed_t {
        // SAFETY: reads a field of a valid `struct termios`.
        unsafe { libc::cfgetispeed(t) }
    }

    fn output_speed(t: &libc::termios) -> libc::speed_t {
        // SAFETY: reads a field of a valid `struct termios`.
        unsafe { libc::cfgetospeed(t) }
    }

    #[test]
    fn raw_mode_is_forced() {
        let mut t = cooked();
        apply(&Settings::default(), &mut t).unwrap();

        assert_eq!(t.c_lflag & (libc::ICANON | libc::ECHO | libc::ECHOE | libc::ISIG), 0);
        assert_eq!(t.c_iflag & (libc::ICRNL | libc::INLCR | libc::IGNCR), 0);
        assert_eq!(t.c_cflag & (libc::CREAD | libc::CLOCAL), libc::CREAD | libc::CLOCAL);
        assert_eq!(t.c_oflag & libc::OPOST, 0);
    }

    #[test]
    fn unrelated_bits_are_preserved() {
        let mut t = cooked();
        apply(&Settings::default(), &mut t).unwrap();

        assert_ne!(t.c_iflag & libc::BRKINT, 0);
        assert_ne!(t.c_cflag & libc::HUPCL, 0);
        assert_ne!(t.c_lflag & libc::IEXTEN, 0);
        assert_eq!(t.c_cc[libc::VINTR], 3);
    }

    #[test]
    fn framing_8n1_clears_previous_framing() {
        let mut t = cooked();
        apply(&Settings::default(), &mut t).unwrap();

        assert_eq!(t.c_cflag & libc::CSIZE, libc::CS8);
        assert_eq!(t.c_cflag & (libc::PARENB | libc::PARODD), 0);
        assert_eq!(t.c_cflag & libc::CSTOPB, 0);
    }

    #[test]
    fn parity_stop_and_size_are_set() {
        let mut t = blank();
        let settings = Settings::default()
            .with_parity(Parity::Even)
            .with_stop_bits(StopBits::Two)
            .with_data_bits(DataBits::Five);
        apply(&settings, &mut t).unwrap();

        assert_eq!(t.c_cflag & (libc::PARENB | libc::PARODD), libc::PARENB);
        assert_ne!(t.c_cflag & libc::CSTOPB, 0);
        assert_eq!(t.c_cflag & libc::CSIZE, libc::CS5);

        apply(&settings.with_parity(Parity::Odd), &mut t).unwrap();
        assert_eq!(
            t.c_cflag & (libc::PARENB | libc::PARODD),
            libc::PARENB | libc::PARODD
        );
    }

    #[test]
    fn software_flow_control_toggles() {
        let mut t = blank();
        let flags = libc::IXON | libc::IXOFF | libc::IXANY;

        apply(&Settings::default().with_software_flow_control(true), &mut t).unwrap();
        assert_eq!(t.c_iflag & flags, flags);

        apply(&Settings::default(), &mut t).unwrap();
        assert_eq!(t.c_iflag & flags, 0);
    }

    #[test]
    #[cfg(any(target_os = "linux", target_os = "android"))]
    fn hardware_flow_control_uses_crtscts() {
        let mut t = blank();
        apply(&Settings::default().with_hardware_flow_control(true), &mut t).unwrap();
        assert_ne!(t.c_cflag & libc::CRTSCTS, 0);

        apply(&Settings::default(), &mut t).unwrap();
        assert_eq!(t.c_cflag & libc::CRTSCTS, 0);
    }

    #[test]
    #[cfg(not(any(target_os = "linux", target_os = "android")))]
    fn hardware_flow_control_uses_rts_cts_pair() {
        let flags = libc::CRTS_IFLOW | libc::CCTS_OFLOW;
        let mut t = blank();
        apply(&Settings::default().with_hardware_flow_control(true), &mut t).unwrap();
        assert_eq!(t.c_cflag & flags, flags);

        apply(&Settings::default(), &mut t).unwrap();
        assert_eq!(t.c_cflag & flags, 0);
    }

    #[test]
    fn output_processing_toggles() {
        let mut t = blank();
        apply(&Settings::default().with_process_output(true), &mut t).unwrap();
        assert_ne!(t.c_oflag & libc::OPOST, 0);
    }

    #[test]
    fn special_character_thresholds() {
        let mut t = blank();
        let settings = Settings::default()
            .with_minimum_bytes_to_read(0)
            .with_timeout(25);
        apply(&settings, &mut t).unwrap();

        assert_eq!(t.c_cc[libc::VMIN], 0);
        assert_eq!(t.c_cc[libc::VTIME], 25);
    }

    #[test]
    fn speeds_are_set_per_direction() {
        let mut t = blank();
        let settings = Settings::new(BaudRate::Baud115200).with_receive_rate(BaudRate::Baud9600);
        apply(&settings, &mut t).unwrap();

        assert_eq!(input_speed(&t), BaudRate::Baud9600.speed());
        assert_eq!(output_speed(&t), BaudRate::Baud115200.speed());
    }
}

//! Line discipline configuration.
//!
//! Every entry point reads the current attributes with `tcgetattr`, edits them, and
//! writes them back with `tcsetattr(TCSANOW)`. A failure at any step is reported as
//! [`LineError::Configuration`] and leaves the line in an unspecified state.

use std::mem::MaybeUninit;
use std::os::fd::{AsFd, AsRawFd, RawFd};

use tracing::debug;

use crate::baud::BaudRate;
use crate::config::{LineConfig, LineSettings};
use crate::error::{LineError, Result};
use crate::timing::ReadTiming;

const RAW_CFLAG_SET: libc::tcflag_t = libc::CLOCAL | libc::CREAD | libc::CS8;
const RAW_CFLAG_CLEAR: libc::tcflag_t = libc::PARENB | libc::CSTOPB | libc::CRTSCTS;
const RAW_IFLAG_CLEAR: libc::tcflag_t = libc::IGNBRK
    | libc::BRKINT
    | libc::PARMRK
    | libc::ISTRIP
    | libc::INLCR
    | libc::IGNCR
    | libc::ICRNL
    | libc::IXON
    | libc::IXOFF
    | libc::IXANY;
const RAW_LFLAG_CLEAR: libc::tcflag_t =
    libc::ECHO | libc::ECHONL | libc::ICANON | libc::ISIG | libc::IEXTEN;
const RAW_OFLAG_CLEAR: libc::tcflag_t = libc::OPOST;

/// Program `fd` into raw 8N1 mode at `config.baud` with `config.timing`.
pub fn configure(fd: impl AsFd, config: &LineConfig) -> Result<()> {
    let raw = fd.as_fd().as_raw_fd();
    let mut tty = get_attrs(raw)?;

    set_speed(&mut tty, config.baud)?;
    make_raw(&mut tty);
    apply_timing(&mut tty, config.timing);

    set_attrs(raw, &tty)?;
    debug!(
        fd = raw,
        baud = config.baud.bps(),
        min_bytes = config.timing.min_bytes,
        timeout_ds = config.timing.timeout_deciseconds,
        "configured raw line"
    );
    Ok(())
}

/// Replace only VMIN/VTIME on `fd`, leaving every other attribute untouched.
pub fn set_timing(fd: impl AsFd, timing: ReadTiming) -> Result<()> {
    let raw = fd.as_fd().as_raw_fd();
    let mut tty = get_attrs(raw)?;
    apply_timing(&mut tty, timing);
    set_attrs(raw, &tty)?;
    debug!(
        fd = raw,
        min_bytes = timing.min_bytes,
        timeout_ds = timing.timeout_deciseconds,
        "updated read timing"
    );
    Ok(())
}

/// Switch to `(min_bytes, 5)`.
pub fn set_blocking(fd: impl AsFd, min_bytes: u8) -> Result<()> {
    set_timing(fd, ReadTiming::reconfigured(min_bytes))
}

/// Read back the attributes currently in effect.
pub fn read_settings(fd: impl AsFd) -> Result<LineSettings> {
    let tty = get_attrs(fd.as_fd().as_raw_fd())?;

    // SAFETY: `tty` is a fully initialized termios returned by tcgetattr.
    let (ispeed, ospeed) = unsafe { (libc::cfgetispeed(&tty), libc::cfgetospeed(&tty)) };

    Ok(LineSettings {
        input_baud: BaudRate::from_speed(ispeed),
        output_baud: BaudRate::from_speed(ospeed),
        timing: ReadTiming::new(tty.c_cc[libc::VMIN], tty.c_cc[libc::VTIME]),
        raw: is_raw(&tty),
    })
}

fn get_attrs(fd: RawFd) -> Result<libc::termios> {
    let mut tty = MaybeUninit::<libc::termios>::uninit();

    // SAFETY: `tty` is a valid writable pointer to a termios-sized buffer.
    let rc = unsafe { libc::tcgetattr(fd, tty.as_mut_ptr()) };
    if rc != 0 {
        return Err(LineError::configuration("tcgetattr"));
    }

    // SAFETY: tcgetattr returned 0, so every field of `tty` has been written.
    Ok(unsafe { tty.assume_init() })
}

fn set_attrs(fd: RawFd, tty: &libc::termios) -> Result<()> {
    // SAFETY: `tty` points to a valid termios for the duration of the call.
    let rc = unsafe { libc::tcsetattr(fd, libc::TCSANOW, tty) };
    if rc != 0 {
        return Err(LineError::configuration("tcsetattr"));
    }
    Ok(())
}

fn set_speed(tty: &mut libc::termios, baud: BaudRate) -> Result<()> {
    let speed = baud.speed();

    // SAFETY: `tty` is a valid, initialized termios owned by the caller.
    if unsafe { libc::cfsetospeed(tty, speed) } != 0 {
        return Err(LineError::configuration("cfsetospeed"));
    }
    // SAFETY: as above.
    if unsafe { libc::cfsetispeed(tty, speed) } != 0 {
        return Err(LineError::configuration("cfsetispeed"));
    }
    Ok(())
}

fn make_raw(tty: &mut libc::termios) {
    tty.c_cflag &= !libc::CSIZE;
    tty.c_cflag |= RAW_CFLAG_SET;
    tty.c_cflag &= !RAW_CFLAG_CLEAR;

    tty.c_iflag &= !RAW_IFLAG_CLEAR;
    tty.c_lflag &= !RAW_LFLAG_CLEAR;
    tty.c_oflag &= !RAW_OFLAG_CLEAR;
}

fn apply_timing(tty: &mut libc::termios, timing: ReadTiming) {
    tty.c_cc[libc::VMIN] = timing.min_bytes;
    tty.c_cc[libc::VTIME] = timing.timeout_deciseconds;
}

fn is_raw(tty: &libc::termios) -> bool {
    tty.c_cflag & libc::CSIZE == libc::CS8
        && tty.c_cflag & RAW_CFLAG_SET == RAW_CFLAG_SET
        && tty.c_cflag & RAW_CFLAG_CLEAR == 0
        && tty.c_iflag & RAW_IFLAG_CLEAR == 0
        && tty.c_lflag & RAW_LFLAG_CLEAR == 0
        && tty.c_oflag & RAW_OFLAG_CLEAR == 0
}

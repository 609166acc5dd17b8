//! termios raw mode and the window size ioctl.
//!
//! Reads in raw mode use `VMIN = 0, VTIME = 1`, so a read on the tty comes
//! back after at most 100ms with or without input. The input reader relies
//! on that to notice its stop flag.

#![allow(unsafe_code)]
#![allow(clippy::borrow_as_ptr)]

use std::io;
use std::mem::MaybeUninit;
use std::os::unix::io::{AsRawFd, RawFd};

/// Tenths of a second a raw read waits for the first byte.
const READ_TIMEOUT_DECISECONDS: libc::cc_t = 1;

/// Raw mode on one descriptor; the saved settings come back on drop.
#[derive(Debug)]
pub struct RawModeGuard {
    fd: RawFd,
    saved: libc::termios,
}

impl RawModeGuard {
    pub fn new<F: AsRawFd>(fd: &F) -> io::Result<Self> {
        let fd = fd.as_raw_fd();
        let saved = read_termios(fd)?;
        let mut raw = saved;
        make_raw(&mut raw);
        write_termios(fd, &raw)?;
        Ok(Self { fd, saved })
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = write_termios(self.fd, &self.saved);
    }
}

pub fn enable_raw_mode() -> io::Result<RawModeGuard> {
    RawModeGuard::new(&io::stdin())
}

#[must_use]
pub fn is_tty<F: AsRawFd>(fd: &F) -> bool {
    // SAFETY: isatty accepts any descriptor value.
    unsafe { libc::isatty(fd.as_raw_fd()) == 1 }
}

/// Columns and rows of the terminal on stdout; zero in either is an error.
pub fn terminal_size() -> io::Result<(u16, u16)> {
    let mut ws = MaybeUninit::<libc::winsize>::zeroed();
    // SAFETY: TIOCGWINSZ writes a winsize into the pointed-to memory.
    check(unsafe { libc::ioctl(libc::STDOUT_FILENO, libc::TIOCGWINSZ, ws.as_mut_ptr()) })?;
    // SAFETY: zero-initialized and filled by a successful ioctl.
    let ws = unsafe { ws.assume_init() };
    match (ws.ws_col, ws.ws_row) {
        (0, _) | (_, 0) => Err(io::Error::new(
            io::ErrorKind::InvalidData,
            "terminal reported a zero-sized window",
        )),
        size => Ok(size),
    }
}

/// Byte-at-a-time input without echo, signals or output processing.
fn make_raw(t: &mut libc::termios) {
    t.c_iflag &= !(libc::BRKINT | libc::ICRNL | libc::INPCK | libc::ISTRIP | libc::IXON);
    t.c_oflag &= !libc::OPOST;
    t.c_cflag |= libc::CS8;
    t.c_lflag &= !(libc::ECHO | libc::ICANON | libc::IEXTEN | libc::ISIG);
    t.c_cc[libc::VMIN] = 0;
    t.c_cc[libc::VTIME] = READ_TIMEOUT_DECISECONDS;
}

fn read_termios(fd: RawFd) -> io::Result<libc::termios> {
    let mut t = MaybeUninit::<libc::termios>::zeroed();
    // SAFETY: tcgetattr fills the termios on success.
    check(unsafe { libc::tcgetattr(fd, t.as_mut_ptr()) })?;
    // SAFETY: zero-initialized and filled by a successful tcgetattr.
    Ok(unsafe { t.assume_init() })
}

fn write_termios(fd: RawFd, t: &libc::termios) -> io::Result<()> {
    // SAFETY: tcsetattr only reads the termios.
    check(unsafe { libc::tcsetattr(fd, libc::TCSAFLUSH, t) })
}

/// Map the libc `-1` failure convention to `io::Error`.
fn check(ret: libc::c_int) -> io::Result<()> {
    if ret == -1 {
        Err(io::Error::last_os_error())
    } else {
        Ok(())
    }
}

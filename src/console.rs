use nix::sys::{
    select::{select, FdSet},
    time::{TimeVal, TimeValLike},
};
use std::io::{self, Read, Write};

/// Terminal capabilities the interpreter needs from its host.
///
/// The core never touches stdin/stdout directly; everything flows through an
/// implementation of this trait, so tests can substitute a scripted console
/// and every run becomes deterministic.
pub trait Console {
    /// Non-blocking probe for pending input. Must not consume anything.
    fn key_available(&mut self) -> bool;

    /// Block until one byte of input is available and return it.
    fn read_char(&mut self) -> io::Result<u8>;

    fn write_byte(&mut self, byte: u8) -> io::Result<()>;

    fn flush(&mut self) -> io::Result<()>;

    fn write_string(&mut self, string: &str) -> io::Result<()> {
        for byte in string.bytes() {
            self.write_byte(byte)?;
        }
        Ok(())
    }
}

/// Console backed by the process's stdin and stdout.
pub struct StdConsole;

impl StdConsole {
    pub fn new() -> StdConsole {
        StdConsole
    }
}

impl Console for StdConsole {
    fn key_available(&mut self) -> bool {
        let mut readfds = FdSet::new();
        readfds.insert(libc::STDIN_FILENO);

        match select(None, &mut readfds, None, None, &mut TimeVal::zero()) {
            Ok(value) => value == 1,
            Err(_) => false,
        }
    }

    fn read_char(&mut self) -> io::Result<u8> {
        let mut buffer = [0; 1];

        match io::stdin().read_exact(&mut buffer) {
            Ok(()) => Ok(buffer[0]),
            // Closed input behaves as a stream of NULs rather than killing
            // the machine mid-instruction.
            Err(ref error) if error.kind() == io::ErrorKind::UnexpectedEof => Ok(0),
            Err(error) => Err(error),
        }
    }

    fn write_byte(&mut self, byte: u8) -> io::Result<()> {
        io::stdout().write_all(&[byte])
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stdout().flush()
    }
}

#[cfg(test)]
pub(crate) use self::scripted::ScriptedConsole;

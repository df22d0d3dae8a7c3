use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// The image file could not be opened, or its origin word could not be
    /// read. An image with an origin but no body is not an error.
    #[error("failed to load image: {path}")]
    ImageLoad { path: String, source: io::Error },

    /// RTI (8) or the reserved opcode (13) was executed. Neither has a
    /// defined behavior here, so execution aborts.
    #[error("illegal opcode {opcode:#x} executed at {pc:#06x}")]
    IllegalOpcode { opcode: u16, pc: u16 },

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error(transparent)]
    Readline(#[from] rustyline::error::ReadlineError),
}

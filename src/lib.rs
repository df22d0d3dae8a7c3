mod config;
mod console;
mod cpu;
mod debugger;
mod error;
mod instruction;
mod loader;
mod opcode;
mod process;
mod sign_extend;
mod state;
mod trap_vector;

pub use crate::config::Config;
pub use crate::console::{Console, StdConsole};
pub use crate::error::Error;
pub use crate::loader::{load_image, load_path};
pub use crate::state::State;

/// Load the configured images and run the machine to completion, on stdin
/// and stdout. With `debug` set, drop into the interactive stepper instead.
pub fn run(config: Config) -> Result<(), Error> {
    let mut state = State::new(StdConsole::new());

    for path in &config.image_paths {
        loader::load_path(path, &mut state.memory)?;
    }

    if config.debug {
        debugger::debug(state)?;
    } else {
        process::run(state)?;
    }

    Ok(())
}

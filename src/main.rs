use clap::{App, Arg};
use lazy_static::lazy_static;
use lc3vm::Config;
use nix::sys::signal::{sigaction, SaFlags, SigAction, SigHandler, SigSet, Signal};
use nix::sys::termios::{tcgetattr, tcsetattr, LocalFlags, SetArg, Termios};
use std::process;
use std::sync::Mutex;

lazy_static! {
    // The terminal settings in effect before raw mode, kept where the SIGINT
    // handler can reach them.
    static ref ORIGINAL_TERMIOS: Mutex<Option<Termios>> = Mutex::new(None);
}

fn main() {
    let matches = App::new("lc3vm")
        .about("LC-3 virtual machine")
        .arg(
            Arg::with_name("debug")
                .short("d")
                .long("debug")
                .help("Runs in debug mode"),
        )
        .arg(
            Arg::with_name("IMAGE")
                .help("Image files to load, in order")
                .required(true)
                .multiple(true)
                .index(1),
        )
        .get_matches_safe()
        .unwrap_or_else(|error| match error.kind {
            clap::ErrorKind::HelpDisplayed | clap::ErrorKind::VersionDisplayed => {
                println!("{}", error.message);
                process::exit(0);
            }
            _ => {
                println!("lc3vm [image-file] ...");
                process::exit(2);
            }
        });

    let config = Config {
        image_paths: matches
            .values_of("IMAGE")
            .unwrap()
            .map(String::from)
            .collect(),
        debug: matches.is_present("debug"),
    };

    install_interrupt_handler();

    let result = {
        let _input_buffering = InputBuffering::disable().unwrap_or_else(|error| {
            println!("An error occured: {}", error);
            process::exit(1);
        });

        lc3vm::run(config)
    };

    if let Err(error) = result {
        println!("{}", error);
        process::exit(1);
    }
}

/// Scoped raw-mode acquisition: turning off canonical input and echo so the
/// machine sees keystrokes immediately. Dropping the guard restores the
/// saved settings, on the normal and the error path alike; the SIGINT
/// handler covers user interruption.
struct InputBuffering;

impl InputBuffering {
    fn disable() -> nix::Result<InputBuffering> {
        let original = tcgetattr(libc::STDIN_FILENO)?;

        let mut raw = original.clone();
        raw.local_flags &= !(LocalFlags::ICANON | LocalFlags::ECHO);
        tcsetattr(libc::STDIN_FILENO, SetArg::TCSANOW, &raw)?;

        if let Ok(mut termios) = ORIGINAL_TERMIOS.lock() {
            *termios = Some(original);
        }

        Ok(InputBuffering)
    }
}

impl Drop for InputBuffering {
    fn drop(&mut self) {
        restore_input_buffering();
    }
}

fn restore_input_buffering() {
    if let Ok(termios) = ORIGINAL_TERMIOS.lock() {
        if let Some(original) = termios.as_ref() {
            let _ = tcsetattr(libc::STDIN_FILENO, SetArg::TCSANOW, original);
        }
    }
}

extern "C" fn handle_interrupt(_signal: i32) {
    restore_input_buffering();
    println!();
    process::exit(-2);
}

fn install_interrupt_handler() {
    let action = SigAction::new(
        SigHandler::Handler(handle_interrupt),
        SaFlags::empty(),
        SigSet::empty(),
    );

    if let Err(error) = unsafe { sigaction(Signal::SIGINT, &action) } {
        println!("An error occured: {}", error);
        process::exit(1);
    }
}

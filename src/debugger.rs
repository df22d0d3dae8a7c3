mod disassemble;

use crate::console::Console;
use crate::debugger::disassemble::disassemble;
use crate::error::Error;
use crate::state::State;
use lazy_static::lazy_static;
use regex::Regex;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

/// Interactive stepper: prompts between instructions, with `continue`
/// running freely until HALT or the break address.
pub(crate) fn debug<C: Console>(mut state: State<C>) -> Result<State<C>, Error> {
    lazy_static! {
        static ref READ_REGEX: Regex = Regex::new(r"^read 0x([a-f0-9]{1,4})$").unwrap();
        static ref BREAK_ADDRESS_REGEX: Regex =
            Regex::new(r"^break-address 0x([a-f0-9]{1,4})$").unwrap();
    }

    let mut editor = DefaultEditor::new()?;

    while state.running {
        if state.debug_continue {
            if state.break_address == Some(state.pc) {
                println!("Break address {:#06x} hit", state.pc);
                state.debug_continue = false;
            } else {
                state = state.step()?;
                continue;
            }
        }

        let line = match editor.readline(&format!("{:#06x}> ", state.pc)) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(error) => return Err(error.into()),
        };
        let _ = editor.add_history_entry(line.as_str());

        match line.as_ref() {
            "c" | "continue" => {
                state.debug_continue = true;
            }

            "s" | "step" | "" => {
                state = state.step()?;
            }

            "i" | "inspect" => {
                let instruction = state.read_memory(state.pc)?;
                println!(
                    "{:?}, instruction: {:#06x}, {:#018b}",
                    state, instruction, instruction
                );
            }

            "d" | "disassemble" => {
                let instruction = state.read_memory(state.pc)?;
                println!("{}", disassemble(instruction));
            }

            line if READ_REGEX.is_match(line) => {
                if let Some(address) = READ_REGEX.captures(line).and_then(|c| c.get(1)) {
                    let address = u16::from_str_radix(address.as_str(), 16).unwrap();
                    let value = state.read_memory(address)?;
                    println!("{:#06x}, {:#018b}", value, value);
                }
            }

            line if BREAK_ADDRESS_REGEX.is_match(line) => {
                if let Some(address) = BREAK_ADDRESS_REGEX.captures(line).and_then(|c| c.get(1)) {
                    let address = u16::from_str_radix(address.as_str(), 16).unwrap();
                    state.break_address = Some(address);
                    println!("Break address set to {:#06x}", address);
                }
            }

            "h" | "help" => {
                println!("c, continue               Continue execution.");
                println!("s, step                   Execute the current instruction.");
                println!("i, inspect                Inspect state.");
                println!("d, disassemble            Disassemble current instruction.");
                println!("   read <addr>            Read and display memory. e.g. read 0x3000");
                println!("   break-address <addr>   Break at address. e.g. break-address 0x3000");
                println!("   exit                   Leave the debugger.");
            }

            "exit" => {
                state.running = false;
            }

            _ => {
                println!("Unknown command {:?}", line);
            }
        }
    }

    Ok(state)
}

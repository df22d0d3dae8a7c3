use crate::console::Console;
use crate::error::Error;
use crate::state::State;

/// Step the machine until a HALT trap clears `running`. Illegal opcodes and
/// console failures abort the loop with an error.
pub(crate) fn run<C: Console>(mut state: State<C>) -> Result<State<C>, Error> {
    while state.running {
        state = state.step()?;
    }

    Ok(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::ScriptedConsole;
    use crate::instruction::Register::*;
    use crate::loader::load_image;
    use crate::state::Condition;
    use std::io::Cursor;

    #[test]
    fn run_halts_immediately() {
        let state = run_program(&[0xF025]);

        assert_eq!(state.console.output(), "HALT\n");
        assert_eq!(state.pc, 0x3001);
        assert_eq!(state.registers.read(R7), 0x3001);
        assert_eq!(state.running, false);
    }

    #[test]
    fn run_adds_immediates_and_sets_flags() {
        // ADD R0, R0, #0; ADD R0, R0, #5; HALT
        let state = run_program(&[0x1020, 0x1025, 0xF025]);

        assert_eq!(state.registers.read(R0), 5);
        assert_eq!(state.condition, Condition::P);
        assert_eq!(state.console.output(), "HALT\n");
    }

    #[test]
    fn run_prints_string_via_puts() {
        // LEA R0, #3; PUTS; HALT; "Hi\0"
        let state = run_program(&[0xE003, 0xF022, 0xF025, 0x0048, 0x0069, 0x0000]);

        assert_eq!(state.console.output(), "HiHALT\n");
    }

    #[test]
    fn run_loads_through_pointer() {
        // LDI R0, #3; HALT; padding; pointer; padding; target
        let state = run_program(&[0xA003, 0xF025, 0x0000, 0x0000, 0x3006, 0x0000, 0x002A]);

        assert_eq!(state.registers.read(R0), 0x002A);
        assert_eq!(state.condition, Condition::P);
    }

    #[test]
    fn run_counts_down_until_zero() {
        // ADD R1, R1, #3
        // ADD R1, R1, #-1
        // BRp #-2
        // HALT
        let state = run_program(&[0x1263, 0x127F, 0x03FE, 0xF025]);

        assert_eq!(state.registers.read(R1), 0);
        assert_eq!(state.condition, Condition::Z);
        assert_eq!(state.console.output(), "HALT\n");
    }

    #[test]
    fn run_returns_from_subroutine() {
        let mut state = new_state();
        // JSR #2; HALT; JMP R7
        load_program(&mut state, &[0x4802, 0xF025, 0xC1C0]);

        state = state.step().unwrap();
        assert_eq!(state.registers.read(R7), 0x3001);
        assert_eq!(state.pc, 0x3003);

        state = state.step().unwrap();
        assert_eq!(state.pc, 0x3001);

        state = state.step().unwrap();
        assert_eq!(state.running, false);
        assert_eq!(state.console.output(), "HALT\n");
    }

    #[test]
    fn run_aborts_on_reserved_opcode() {
        let mut state = new_state();
        load_program(&mut state, &[0xD000]);

        let result = run(state);

        assert!(matches!(
            result,
            Err(Error::IllegalOpcode {
                opcode: 0xd,
                pc: 0x3000
            })
        ));
    }

    #[test]
    fn run_a_loaded_image() {
        // The ADD-immediate program above, as the bytes of an image file.
        let image = vec![0x30, 0x00, 0x10, 0x20, 0x10, 0x25, 0xF0, 0x25];
        let mut state = new_state();
        load_image(Cursor::new(image), &mut state.memory).unwrap();

        let state = run(state).unwrap();

        assert_eq!(state.registers.read(R0), 5);
        assert_eq!(state.console.output(), "HALT\n");
    }

    fn new_state() -> State<ScriptedConsole> {
        State::new(ScriptedConsole::new())
    }

    fn load_program(state: &mut State<ScriptedConsole>, words: &[u16]) {
        for (i, word) in words.iter().enumerate() {
            state.memory.write(0x3000 + i as u16, *word);
        }
    }

    fn run_program(words: &[u16]) -> State<ScriptedConsole> {
        let mut state = new_state();
        load_program(&mut state, words);

        run(state).unwrap()
    }
}

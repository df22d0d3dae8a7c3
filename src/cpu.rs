use crate::console::Console;
use crate::error::Error;
use crate::instruction::Instruction;
use crate::instruction::Register::*;
use crate::sign_extend::SignExtend;
use crate::state::{Condition, State};
use crate::trap_vector::TrapVector;

/// Execute one decoded instruction against the machine state.
///
/// The PC is incremented first, so every PC-relative offset below is
/// relative to the address of the next sequential instruction. All register
/// arithmetic wraps modulo 2^16.
pub fn execute<C: Console>(
    mut state: State<C>,
    instruction: Instruction,
) -> Result<State<C>, Error> {
    state.pc = state.pc.wrapping_add(1);

    match instruction {
        // BR - Conditional Branch
        //
        //      |0 0 0 0|n|z|p|pc_offset_9      |
        //
        // Each set bit of [11:9] tests the matching condition code. If any
        // tested code is currently set, PC <- PC + SEXT(pc_offset_9). With
        // n=z=p=0 the branch is never taken; with all three set it always is.
        Instruction::BR(condition, pc_offset) => {
            if (condition.n && state.condition == Condition::N)
                || (condition.z && state.condition == Condition::Z)
                || (condition.p && state.condition == Condition::P)
            {
                state.pc = state.pc.wrapping_add(pc_offset.sign_extend(9));
            }
        }

        // ADD - Addition
        //
        //      |0 0 0 1|DR   |SR1  |0|0 0|SR2  |
        //      |0 0 0 1|DR   |SR1  |1|imm_5    |
        //
        // DR <- SR1 + SR2, or DR <- SR1 + SEXT(imm5). Sets condition codes.
        Instruction::ADD(dr, sr1, sr2) => {
            let value = state
                .registers
                .read(sr1)
                .wrapping_add(state.registers.read(sr2));

            state.registers.write(dr, value);
            state.update_flags(dr);
        }
        Instruction::ADDIMM(dr, sr1, imm5) => {
            let value = state
                .registers
                .read(sr1)
                .wrapping_add(imm5.sign_extend(5));

            state.registers.write(dr, value);
            state.update_flags(dr);
        }

        // LD - Load
        //
        //      |0 0 1 0|DR   |pc_offset_9      |
        //
        // DR <- mem[PC + SEXT(pc_offset_9)]. Sets condition codes.
        Instruction::LD(dr, pc_offset) => {
            let address = state.pc.wrapping_add(pc_offset.sign_extend(9));
            let value = state.read_memory(address)?;

            state.registers.write(dr, value);
            state.update_flags(dr);
        }

        // ST - Store
        //
        //      |0 0 1 1|SR   |pc_offset_9      |
        //
        // mem[PC + SEXT(pc_offset_9)] <- SR.
        Instruction::ST(sr, pc_offset) => {
            let address = state.pc.wrapping_add(pc_offset.sign_extend(9));

            state.memory.write(address, state.registers.read(sr));
        }

        // JSR / JSRR - Jump to Subroutine
        //
        //      |0 1 0 0|1|pc_offset_11         |
        //      |0 1 0 0|0|0 0|BaseR|0 0 0 0 0 0|
        //
        // R7 is written with the incremented PC before the target is read,
        // so JSRR with BaseR=7 jumps to the return address it just saved.
        Instruction::JSR(pc_offset) => {
            state.registers.write(R7, state.pc);
            state.pc = state.pc.wrapping_add(pc_offset.sign_extend(11));
        }
        Instruction::JSRR(base_r) => {
            state.registers.write(R7, state.pc);
            state.pc = state.registers.read(base_r);
        }

        // AND - Bit-wise Logical AND
        //
        //      |0 1 0 1|DR   |SR1  |0|0 0|SR2  |
        //      |0 1 0 1|DR   |SR1  |1|imm_5    |
        //
        // DR <- SR1 AND SR2, or DR <- SR1 AND SEXT(imm5). Sets condition
        // codes.
        Instruction::AND(dr, sr1, sr2) => {
            let value = state.registers.read(sr1) & state.registers.read(sr2);

            state.registers.write(dr, value);
            state.update_flags(dr);
        }
        Instruction::ANDIMM(dr, sr1, imm5) => {
            let value = state.registers.read(sr1) & imm5.sign_extend(5);

            state.registers.write(dr, value);
            state.update_flags(dr);
        }

        // LDR - Load Base+offset
        //
        //      |0 1 1 0|DR   |BaseR|offset_6   |
        //
        // DR <- mem[BaseR + SEXT(offset_6)]. Sets condition codes.
        Instruction::LDR(dr, base_r, offset) => {
            let address = state
                .registers
                .read(base_r)
                .wrapping_add(offset.sign_extend(6));
            let value = state.read_memory(address)?;

            state.registers.write(dr, value);
            state.update_flags(dr);
        }

        // STR - Store Base+offset
        //
        //      |0 1 1 1|SR   |BaseR|offset_6   |
        //
        // mem[BaseR + SEXT(offset_6)] <- SR.
        Instruction::STR(sr, base_r, offset) => {
            let address = state
                .registers
                .read(base_r)
                .wrapping_add(offset.sign_extend(6));

            state.memory.write(address, state.registers.read(sr));
        }

        // Return from interrupt. There is no interrupt mechanism in this
        // machine, so reaching RTI is a programming error.
        Instruction::RTI => {
            return Err(Error::IllegalOpcode {
                opcode: 0x8,
                pc: state.pc.wrapping_sub(1),
            });
        }

        // NOT - Bit-Wise Complement
        //
        //      |1 0 0 1|DR   |SR   |1|1 1 1 1 1|
        //
        // DR <- NOT(SR). Sets condition codes.
        Instruction::NOT(dr, sr) => {
            state.registers.write(dr, !state.registers.read(sr));
            state.update_flags(dr);
        }

        // LDI - Load Indirect
        //
        //      |1 0 1 0|DR   |pc_offset_9      |
        //
        // DR <- mem[mem[PC + SEXT(pc_offset_9)]]. Both reads go through the
        // device dispatch, so a pointer to the keyboard status register
        // probes the keyboard. Sets condition codes.
        Instruction::LDI(dr, pc_offset) => {
            let pointer = state.pc.wrapping_add(pc_offset.sign_extend(9));
            let address = state.read_memory(pointer)?;
            let value = state.read_memory(address)?;

            state.registers.write(dr, value);
            state.update_flags(dr);
        }

        // STI - Store Indirect
        //
        //      |1 0 1 1|SR   |pc_offset_9      |
        //
        // mem[mem[PC + SEXT(pc_offset_9)]] <- SR.
        Instruction::STI(sr, pc_offset) => {
            let pointer = state.pc.wrapping_add(pc_offset.sign_extend(9));
            let address = state.read_memory(pointer)?;

            state.memory.write(address, state.registers.read(sr));
        }

        // JMP - Jump / RET - Return from Subroutine
        //
        //      |1 1 0 0|0 0 0|BaseR|0 0 0 0 0 0|
        //
        // PC <- BaseR. RET is the BaseR=7 encoding.
        Instruction::JMP(base_r) => {
            state.pc = state.registers.read(base_r);
        }

        // Reserved encoding; executing it is fatal.
        Instruction::RES => {
            return Err(Error::IllegalOpcode {
                opcode: 0xd,
                pc: state.pc.wrapping_sub(1),
            });
        }

        // LEA - Load Effective Address
        //
        //      |1 1 1 0|DR   |pc_offset_9      |
        //
        // DR <- PC + SEXT(pc_offset_9); no memory access. Sets condition
        // codes.
        Instruction::LEA(dr, pc_offset) => {
            state
                .registers
                .write(dr, state.pc.wrapping_add(pc_offset.sign_extend(9)));
            state.update_flags(dr);
        }

        // TRAP - System Call
        //
        //      |1 1 1 1|0 0 0 0|trap_vector_8  |
        //
        // R7 <- incremented PC, unconditionally, then the vector's service
        // routine runs. A handler could therefore return with JMP R7.
        Instruction::TRAP(trap_vector) => {
            state.registers.write(R7, state.pc);

            match trap_vector {
                // Read one character; R0 <- zero-extended byte, no echo.
                TrapVector::GETC => {
                    let character = state.console.read_char()?;

                    state.registers.write(R0, u16::from(character));
                    state.update_flags(R0);
                }

                // Write the character in R0[7:0].
                TrapVector::OUT => {
                    state.console.write_byte(state.registers.read(R0) as u8)?;
                    state.console.flush()?;
                }

                // Write the NUL-terminated string starting at mem[R0], one
                // character per word.
                TrapVector::PUTS => {
                    let mut address = state.registers.read(R0);

                    loop {
                        let word = state.memory.read(address);
                        if word == 0 {
                            break;
                        }

                        state.console.write_byte(word as u8)?;
                        address = address.wrapping_add(1);
                    }

                    state.console.flush()?;
                }

                // Prompt for a character, echo it, R0 <- zero-extended byte.
                TrapVector::IN => {
                    state.console.write_string("Enter a character: ")?;
                    state.console.flush()?;

                    let character = state.console.read_char()?;
                    state.console.write_byte(character)?;
                    state.console.flush()?;

                    state.registers.write(R0, u16::from(character));
                    state.update_flags(R0);
                }

                // Write the NUL-terminated string starting at mem[R0], two
                // characters packed per word, low byte first. An odd-length
                // string has 0x00 in the final high byte, which is skipped.
                TrapVector::PUTSP => {
                    let mut address = state.registers.read(R0);

                    loop {
                        let word = state.memory.read(address);
                        if word == 0 {
                            break;
                        }

                        state.console.write_byte(word as u8)?;
                        let high = (word >> 8) as u8;
                        if high != 0 {
                            state.console.write_byte(high)?;
                        }

                        address = address.wrapping_add(1);
                    }

                    state.console.flush()?;
                }

                // Announce the halt and stop the run loop.
                TrapVector::HALT => {
                    state.console.write_string("HALT\n")?;
                    state.console.flush()?;

                    state.running = false;
                }

                // Vectors without a service routine fall through; R7 already
                // holds the return address.
                TrapVector::UNKNOWN(_) => {}
            }
        }
    }

    Ok(state)
}

use crate::opcode::Opcode;
use crate::sign_extend::SignExtend;
use crate::trap_vector::TrapVector;

/// Render an instruction word in assembler form.
pub(crate) fn disassemble(instruction: u16) -> String {
    match Opcode::from_instruction(instruction) {
        Opcode::BR => {
            let n = if (instruction >> 11) & 0x1 == 1 { "n" } else { "" };
            let z = if (instruction >> 10) & 0x1 == 1 { "z" } else { "" };
            let p = if (instruction >> 9) & 0x1 == 1 { "p" } else { "" };
            let pc_offset = (instruction & 0x1ff).sign_extend(9) as i16;

            format!("BR{}{}{} #{}", n, z, p, pc_offset)
        }

        Opcode::ADD => {
            let dr = (instruction >> 9) & 0x7;
            let sr1 = (instruction >> 6) & 0x7;

            if (instruction >> 5) & 0x1 == 1 {
                let imm5 = (instruction & 0x1f).sign_extend(5) as i16;
                format!("ADD R{}, R{}, #{}", dr, sr1, imm5)
            } else {
                format!("ADD R{}, R{}, R{}", dr, sr1, instruction & 0x7)
            }
        }

        Opcode::LD => {
            let dr = (instruction >> 9) & 0x7;
            let pc_offset = (instruction & 0x1ff).sign_extend(9) as i16;

            format!("LD R{}, #{}", dr, pc_offset)
        }

        Opcode::ST => {
            let sr = (instruction >> 9) & 0x7;
            let pc_offset = (instruction & 0x1ff).sign_extend(9) as i16;

            format!("ST R{}, #{}", sr, pc_offset)
        }

        Opcode::JSR => {
            if (instruction >> 11) & 0x1 == 1 {
                let pc_offset = (instruction & 0x7ff).sign_extend(11) as i16;
                format!("JSR #{}", pc_offset)
            } else {
                format!("JSRR R{}", (instruction >> 6) & 0x7)
            }
        }

        Opcode::AND => {
            let dr = (instruction >> 9) & 0x7;
            let sr1 = (instruction >> 6) & 0x7;

            if (instruction >> 5) & 0x1 == 1 {
                let imm5 = (instruction & 0x1f).sign_extend(5) as i16;
                format!("AND R{}, R{}, #{}", dr, sr1, imm5)
            } else {
                format!("AND R{}, R{}, R{}", dr, sr1, instruction & 0x7)
            }
        }

        Opcode::LDR => {
            let dr = (instruction >> 9) & 0x7;
            let base_r = (instruction >> 6) & 0x7;
            let offset = (instruction & 0x3f).sign_extend(6) as i16;

            format!("LDR R{}, R{}, #{}", dr, base_r, offset)
        }

        Opcode::STR => {
            let sr = (instruction >> 9) & 0x7;
            let base_r = (instruction >> 6) & 0x7;
            let offset = (instruction & 0x3f).sign_extend(6) as i16;

            format!("STR R{}, R{}, #{}", sr, base_r, offset)
        }

        Opcode::RTI => "RTI".to_string(),

        Opcode::NOT => {
            let dr = (instruction >> 9) & 0x7;
            let sr = (instruction >> 6) & 0x7;

            format!("NOT R{}, R{}", dr, sr)
        }

        Opcode::LDI => {
            let dr = (instruction >> 9) & 0x7;
            let pc_offset = (instruction & 0x1ff).sign_extend(9) as i16;

            format!("LDI R{}, #{}", dr, pc_offset)
        }

        Opcode::STI => {
            let sr = (instruction >> 9) & 0x7;
            let pc_offset = (instruction & 0x1ff).sign_extend(9) as i16;

            format!("STI R{}, #{}", sr, pc_offset)
        }

        Opcode::JMP => {
            let base_r = (instruction >> 6) & 0x7;

            if base_r == 7 {
                "RET".to_string()
            } else {
                format!("JMP R{}", base_r)
            }
        }

        Opcode::RES => "RES".to_string(),

        Opcode::LEA => {
            let dr = (instruction >> 9) & 0x7;
            let pc_offset = (instruction & 0x1ff).sign_extend(9) as i16;

            format!("LEA R{}, #{}", dr, pc_offset)
        }

        Opcode::TRAP => match TrapVector::decode(instruction) {
            TrapVector::UNKNOWN(vector) => format!("TRAP {:#04x}", vector),
            vector => format!("TRAP {:?}", vector),
        },
    }
}

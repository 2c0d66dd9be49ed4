use std::fmt;

use crate::status::Fault;

/// Decoded CHIP-8 instruction.
///
/// `x` and `y` are register indices (second and third nibble), `nn` is the low byte,
/// `n` the low nibble and `nnn` the low 12 bits of the instruction word.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Instruction {
    /// 0NNN: Call machine code routine (unsupported)
    Sys(u16),
    /// 00E0: Clear screen
    Clear,
    /// 00EE: Return from subroutine
    Return,
    /// 1NNN: Jump to NNN
    Jump(u16),
    /// 2NNN: Call subroutine at NNN
    Call(u16),
    /// 3XNN: Skip next instruction if VX == NN
    SkipEqImm { x: u8, nn: u8 },
    /// 4XNN: Skip next instruction if VX != NN
    SkipNeqImm { x: u8, nn: u8 },
    /// 5XY0: Skip next instruction if VX == VY
    SkipEqReg { x: u8, y: u8 },
    /// 6XNN: VX = NN
    SetImm { x: u8, nn: u8 },
    /// 7XNN: VX += NN, no carry
    AddImm { x: u8, nn: u8 },
    /// 8XY0: VX = VY
    SetReg { x: u8, y: u8 },
    /// 8XY1: VX |= VY
    Or { x: u8, y: u8 },
    /// 8XY2: VX &= VY
    And { x: u8, y: u8 },
    /// 8XY3: VX ^= VY
    Xor { x: u8, y: u8 },
    /// 8XY4: VX += VY, VF = carry
    AddReg { x: u8, y: u8 },
    /// 8XY5: VX = VX - VY, VF = no borrow
    SubXY { x: u8, y: u8 },
    /// 8XY6: Shift right, VF = shifted out bit
    ShiftRight { x: u8, y: u8 },
    /// 8XY7: VX = VY - VX, VF = no borrow
    SubYX { x: u8, y: u8 },
    /// 8XYE: Shift left, VF = shifted out bit
    ShiftLeft { x: u8, y: u8 },
    /// 9XY0: Skip next instruction if VX != VY
    SkipNeqReg { x: u8, y: u8 },
    /// ANNN: I = NNN
    SetIndex(u16),
    /// BNNN: Jump to NNN + V0
    JumpOffset(u16),
    /// CXNN: VX = random & NN
    Random { x: u8, nn: u8 },
    /// DXYN: Draw N rows tall sprite at (VX, VY)
    Draw { x: u8, y: u8, n: u8 },
    /// EX9E: Skip next instruction if key VX is down
    SkipKeyDown { x: u8 },
    /// EXA1: Skip next instruction if key VX is up
    SkipKeyUp { x: u8 },
    /// FX07: VX = delay timer
    GetDelay { x: u8 },
    /// FX0A: Wait for a key press and release, store key in VX
    WaitKey { x: u8 },
    /// FX15: delay timer = VX
    SetDelay { x: u8 },
    /// FX18: sound timer = VX
    SetSound { x: u8 },
    /// FX1E: I += VX
    AddIndex { x: u8 },
    /// FX29: I = address of font sprite for digit VX
    FontChar { x: u8 },
    /// FX33: Store BCD of VX at I, I+1, I+2
    Bcd { x: u8 },
    /// FX55: Store V0..=VX at I
    Store { x: u8 },
    /// FX65: Load V0..=VX from I
    Load { x: u8 },
}

impl Instruction {
    /// Decode a big-endian instruction word.
    pub fn decode(word: u16) -> Result<Instruction, Fault> {
        let n1 = (word >> 12) as u8;
        let x = ((word >> 8) & 0xF) as u8;
        let y = ((word >> 4) & 0xF) as u8;
        let n = (word & 0xF) as u8;
        let nn = (word & 0xFF) as u8;
        let nnn = word & 0x0FFF;

        let inst = match (n1, x, y, n) {
            (0x0, 0x0, 0xE, 0x0) => Instruction::Clear,
            (0x0, 0x0, 0xE, 0xE) => Instruction::Return,
            (0x0, 0x0, _, _) => return Err(Fault::InstructionNotRecognized(word)),
            (0x0, _, _, _) => Instruction::Sys(nnn),
            (0x1, _, _, _) => Instruction::Jump(nnn),
            (0x2, _, _, _) => Instruction::Call(nnn),
            (0x3, _, _, _) => Instruction::SkipEqImm { x, nn },
            (0x4, _, _, _) => Instruction::SkipNeqImm { x, nn },
            (0x5, _, _, 0x0) => Instruction::SkipEqReg { x, y },
            (0x6, _, _, _) => Instruction::SetImm { x, nn },
            (0x7, _, _, _) => Instruction::AddImm { x, nn },
            (0x8, _, _, 0x0) => Instruction::SetReg { x, y },
            (0x8, _, _, 0x1) => Instruction::Or { x, y },
            (0x8, _, _, 0x2) => Instruction::And { x, y },
            (0x8, _, _, 0x3) => Instruction::Xor { x, y },
            (0x8, _, _, 0x4) => Instruction::AddReg { x, y },
            (0x8, _, _, 0x5) => Instruction::SubXY { x, y },
            (0x8, _, _, 0x6) => Instruction::ShiftRight { x, y },
            (0x8, _, _, 0x7) => Instruction::SubYX { x, y },
            (0x8, _, _, 0xE) => Instruction::ShiftLeft { x, y },
            (0x9, _, _, 0x0) => Instruction::SkipNeqReg { x, y },
            (0xA, _, _, _) => Instruction::SetIndex(nnn),
            (0xB, _, _, _) => Instruction::JumpOffset(nnn),
            (0xC, _, _, _) => Instruction::Random { x, nn },
            (0xD, _, _, _) => Instruction::Draw { x, y, n },
            (0xE, _, 0x9, 0xE) => Instruction::SkipKeyDown { x },
            (0xE, _, 0xA, 0x1) => Instruction::SkipKeyUp { x },
            (0xF, _, 0x0, 0x7) => Instruction::GetDelay { x },
            (0xF, _, 0x0, 0xA) => Instruction::WaitKey { x },
            (0xF, _, 0x1, 0x5) => Instruction::SetDelay { x },
            (0xF, _, 0x1, 0x8) => Instruction::SetSound { x },
            (0xF, _, 0x1, 0xE) => Instruction::AddIndex { x },
            (0xF, _, 0x2, 0x9) => Instruction::FontChar { x },
            (0xF, _, 0x3, 0x3) => Instruction::Bcd { x },
            (0xF, _, 0x5, 0x5) => Instruction::Store { x },
            (0xF, _, 0x6, 0x5) => Instruction::Load { x },
            _ => return Err(Fault::InstructionNotRecognized(word)),
        };

        Ok(inst)
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Instruction::Sys(nnn) => write!(f, "SYS 0x{:03x}", nnn),
            Instruction::Clear => write!(f, "CLS"),
            Instruction::Return => write!(f, "RET"),
            Instruction::Jump(nnn) => write!(f, "JP 0x{:03x}", nnn),
            Instruction::Call(nnn) => write!(f, "CALL 0x{:03x}", nnn),
            Instruction::SkipEqImm { x, nn } => write!(f, "SE V{:x}, 0x{:02x}", x, nn),
            Instruction::SkipNeqImm { x, nn } => write!(f, "SNE V{:x}, 0x{:02x}", x, nn),
            Instruction::SkipEqReg { x, y } => write!(f, "SE V{:x}, V{:x}", x, y),
            Instruction::SetImm { x, nn } => write!(f, "LD V{:x}, 0x{:02x}", x, nn),
            Instruction::AddImm { x, nn } => write!(f, "ADD V{:x}, 0x{:02x}", x, nn),
            Instruction::SetReg { x, y } => write!(f, "LD V{:x}, V{:x}", x, y),
            Instruction::Or { x, y } => write!(f, "OR V{:x}, V{:x}", x, y),
            Instruction::And { x, y } => write!(f, "AND V{:x}, V{:x}", x, y),
            Instruction::Xor { x, y } => write!(f, "XOR V{:x}, V{:x}", x, y),
            Instruction::AddReg { x, y } => write!(f, "ADD V{:x}, V{:x}", x, y),
            Instruction::SubXY { x, y } => write!(f, "SUB V{:x}, V{:x}", x, y),
            Instruction::ShiftRight { x, y } => write!(f, "SHR V{:x}, V{:x}", x, y),
            Instruction::SubYX { x, y } => write!(f, "SUBN V{:x}, V{:x}", x, y),
            Instruction::ShiftLeft { x, y } => write!(f, "SHL V{:x}, V{:x}", x, y),
            Instruction::SkipNeqReg { x, y } => write!(f, "SNE V{:x}, V{:x}", x, y),
            Instruction::SetIndex(nnn) => write!(f, "LD I, 0x{:03x}", nnn),
            Instruction::JumpOffset(nnn) => write!(f, "JP V0, 0x{:03x}", nnn),
            Instruction::Random { x, nn } => write!(f, "RND V{:x}, 0x{:02x}", x, nn),
            Instruction::Draw { x, y, n } => write!(f, "DRW V{:x}, V{:x}, {:x}", x, y, n),
            Instruction::SkipKeyDown { x } => write!(f, "SKP V{:x}", x),
            Instruction::SkipKeyUp { x } => write!(f, "SKNP V{:x}", x),
            Instruction::GetDelay { x } => write!(f, "LD V{:x}, DT", x),
            Instruction::WaitKey { x } => write!(f, "LD V{:x}, K", x),
            Instruction::SetDelay { x } => write!(f, "LD DT, V{:x}", x),
            Instruction::SetSound { x } => write!(f, "LD ST, V{:x}", x),
            Instruction::AddIndex { x } => write!(f, "ADD I, V{:x}", x),
            Instruction::FontChar { x } => write!(f, "LD F, V{:x}", x),
            Instruction::Bcd { x } => write!(f, "LD B, V{:x}", x),
            Instruction::Store { x } => write!(f, "LD [I], V{:x}", x),
            Instruction::Load { x } => write!(f, "LD V{:x}, [I]", x),
        }
    }
}

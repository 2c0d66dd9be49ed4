// CHIP-8 virtual machine
//
// Useful links:
// * [Guide to making a CHIP-8 emulator](https://tobiasvl.github.io/blog/write-a-chip-8-emulator/)
// * [CHIP-8 Instruction Set](https://github.com/mattmikolay/chip-8/wiki/CHIP%E2%80%908-Instruction-Set)
// * [Chip-8 on the COSMAC VIP](https://laurencescotford.com/chip-8-on-the-cosmac-vip-arithmetic-and-logic-instructions/)
//

use log::{debug, trace, warn};
use rand::{rngs::StdRng, RngCore, SeedableRng};
use thiserror::Error;

use crate::display::{Display, SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::instruction::Instruction;
use crate::keypad::{KeyWait, Keypad};
use crate::quirks::{Chip8Mode, IndexAfterTransfer, Quirks, ShiftSource};
use crate::status::{Fault, Status};

const MEMORY_SIZE: usize = 0x1000;
const PROGRAM_START: u16 = 0x200;
/// Largest program that fits between 0x200 and the end of memory
pub const PROGRAM_CAPACITY: usize = MEMORY_SIZE - PROGRAM_START as usize;

const FONT_START: u16 = 0x000;
const FONT_SPRITE_SIZE: u16 = 5;
const FONT_SIZE: usize = 80;

const STACK_SIZE: usize = 16;
const FLAG: usize = 0xF;

const SOUND_TIMER_MAX: u8 = 255;
/// The COSMAC VIP ignores sound timer values below 2
const MIN_AUDIBLE_SOUND_TIMER: u8 = 2;

pub static DEFAULT_FONT: [u8; FONT_SIZE] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FontError {
    #[error("font sprite must be 80 bytes, got {0}")]
    InvalidLength(usize),
}

#[derive(Debug, Clone)]
pub struct Chip8Builder {
    /// Font sprite
    font: [u8; FONT_SIZE],
    // PRNG Seed
    rng_seed: Option<u64>,
    /// Opcode semantics
    quirks: Quirks,
}

pub struct Chip8 {
    /// General purpose registers
    regs: [u8; 16],
    /// Index register
    index: u16,
    /// Program counter
    pc: u16,
    /// Call stack
    stack: [u16; STACK_SIZE],
    /// Stack pointer
    sp: u8,
    /// Delay Timer
    delay_timer: u8,
    /// Sound Timer
    sound_timer: u8,
    /// Whether the host should be playing a tone
    sound_active: bool,
    /// Memory
    memory: Vec<u8>,
    /// Display
    display: Display,
    /// Keypad
    keypad: Keypad,
    /// FX0A progress
    key_wait: KeyWait,
    /// Result of the last load or step
    status: Status,
    /// Font sprite copied to memory on every reset
    font: [u8; FONT_SIZE],
    /// Opcode semantics
    quirks: Quirks,
    /// PRNG seed re-applied on every reset
    rng_seed: Option<u64>,
    /// PRNG Generator
    rng: StdRng,
}

impl Chip8Builder {
    pub fn new() -> Chip8Builder {
        Chip8Builder {
            font: DEFAULT_FONT,
            rng_seed: None,
            quirks: Quirks::default(),
        }
    }

    pub fn with_font(mut self, font: &[u8]) -> Result<Self, FontError> {
        self.font = font
            .try_into()
            .map_err(|_| FontError::InvalidLength(font.len()))?;
        Ok(self)
    }

    pub fn with_rng_seed(mut self, seed: u64) -> Self {
        self.rng_seed = Some(seed);
        self
    }

    pub fn with_mode(mut self, mode: Chip8Mode) -> Self {
        self.quirks = Quirks::from(mode);
        self
    }

    pub fn with_quirks(mut self, quirks: Quirks) -> Self {
        self.quirks = quirks;
        self
    }

    pub fn build(&self) -> Chip8 {
        let mut chip = Chip8 {
            regs: [0u8; 16],
            index: 0,
            pc: 0,
            stack: [0u16; STACK_SIZE],
            sp: 0,
            delay_timer: 0,
            sound_timer: 0,
            sound_active: false,
            memory: vec![0u8; MEMORY_SIZE],
            display: Display::new(),
            keypad: Keypad::default(),
            key_wait: KeyWait::Idle,
            status: Status::Reset,
            font: self.font,
            quirks: self.quirks,
            rng_seed: self.rng_seed,
            rng: new_rng(self.rng_seed),
        };
        chip.reset();
        chip
    }
}

impl Default for Chip8Builder {
    fn default() -> Self {
        Self::new()
    }
}

fn new_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

impl Chip8 {
    /// Reset all machine state and copy `program` to 0x200.
    ///
    /// A program larger than [`PROGRAM_CAPACITY`] halts the machine with
    /// [`Fault::ProgramTooBig`] and nothing is copied.
    pub fn load_program(&mut self, program: &[u8]) -> Status {
        self.reset();

        if program.len() > PROGRAM_CAPACITY {
            self.halt(Fault::ProgramTooBig {
                size: program.len(),
            });
        } else {
            let start = PROGRAM_START as usize;
            self.memory[start..start + program.len()].copy_from_slice(program);
            self.status = Status::Ok;
            debug!("Loaded {} byte program", program.len());
        }

        self.pc = PROGRAM_START;
        self.status
    }

    /// Advance the timers by `elapsed_ticks` 60 Hz ticks, then execute one instruction.
    ///
    /// Only a machine with status [`Status::Ok`] executes, any other status is
    /// returned unchanged without touching the machine.
    pub fn step(&mut self, elapsed_ticks: u32) -> Status {
        if !self.status.is_ok() {
            return self.status;
        }

        self.step_timers(elapsed_ticks);

        if let Err(fault) = self.fetch().and_then(|word| self.execute(word)) {
            self.halt(fault);
        }

        self.status
    }

    pub fn set_key_down(&mut self, key: u8) {
        self.keypad.press(key);
    }

    pub fn set_key_up(&mut self, key: u8) {
        self.keypad.release(key);
    }

    pub fn is_sound_active(&self) -> bool {
        self.sound_active
    }

    /// Returns whether the display changed since the last call and clears the flag.
    pub fn consume_dirty_flag(&mut self) -> bool {
        self.display.take_dirty()
    }

    pub fn get_pixel(&self, x: usize, y: usize) -> bool {
        self.display.pixel(x, y)
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn quirks(&self) -> Quirks {
        self.quirks
    }

    pub fn pc(&self) -> u16 {
        self.pc
    }

    pub fn index(&self) -> u16 {
        self.index
    }

    pub fn registers(&self) -> &[u8; 16] {
        &self.regs
    }

    pub fn delay_timer(&self) -> u8 {
        self.delay_timer
    }

    pub fn sound_timer(&self) -> u8 {
        self.sound_timer
    }

    pub fn stack_depth(&self) -> usize {
        self.sp as usize
    }

    pub fn memory(&self) -> &[u8] {
        &self.memory
    }

    pub fn is_awaiting_key(&self) -> bool {
        matches!(self.key_wait, KeyWait::Awaiting { .. })
    }

    fn reset(&mut self) {
        self.regs = [0u8; 16];
        self.index = 0;
        self.pc = 0;
        self.stack = [0u16; STACK_SIZE];
        self.sp = 0;
        self.delay_timer = 0;
        self.sound_timer = 0;
        self.sound_active = false;

        self.memory.iter_mut().for_each(|b| *b = 0);
        let font_start = FONT_START as usize;
        self.memory[font_start..font_start + FONT_SIZE].copy_from_slice(&self.font);

        self.display = Display::new();
        self.display.clear();
        self.keypad = Keypad::default();
        self.key_wait = KeyWait::Idle;

        if self.rng_seed.is_some() {
            self.rng = new_rng(self.rng_seed);
        }

        self.status = Status::Reset;
        debug!("Machine reset");
    }

    fn halt(&mut self, fault: Fault) {
        warn!("Halted at 0x{:04x}: {}", self.pc, fault);
        self.status = Status::Halted(fault);
    }

    fn step_timers(&mut self, elapsed_ticks: u32) {
        let ticks = u8::try_from(elapsed_ticks).unwrap_or(u8::MAX);

        if self.delay_timer > 0 {
            self.delay_timer = self.delay_timer.saturating_sub(ticks);
        }

        if self.sound_timer > 0 {
            self.sound_timer = self.sound_timer.saturating_sub(ticks);
            if self.sound_timer == 0 {
                self.sound_active = false;
            }
        } else {
            self.sound_active = false;
        }
    }

    fn fetch(&self) -> Result<u16, Fault> {
        let pc = self.pc as usize;
        let hi = self.read_u8(pc)?;
        let lo = self.read_u8(pc + 1)?;
        Ok(u16::from_be_bytes([hi, lo]))
    }

    fn execute(&mut self, word: u16) -> Result<(), Fault> {
        let inst = Instruction::decode(word)?;
        trace!("0x{:04x}: 0x{:04x} {}", self.pc, word, inst);

        match inst {
            Instruction::Sys(_) => Err(Fault::MachineRoutineNotImplemented(word)),
            Instruction::Clear => {
                self.display.clear();
                self.advance_pc()
            }
            Instruction::Return => {
                self.pop()?;
                self.advance_pc()
            }
            Instruction::Jump(nnn) => {
                self.pc = nnn;
                Ok(())
            }
            Instruction::Call(nnn) => {
                self.push()?;
                self.pc = nnn;
                Ok(())
            }
            Instruction::SkipEqImm { x, nn } => self.skip_if(self.reg(x) == nn),
            Instruction::SkipNeqImm { x, nn } => self.skip_if(self.reg(x) != nn),
            Instruction::SkipEqReg { x, y } => self.skip_if(self.reg(x) == self.reg(y)),
            Instruction::SetImm { x, nn } => {
                self.regs[x as usize] = nn;
                self.advance_pc()
            }
            Instruction::AddImm { x, nn } => {
                self.regs[x as usize] = self.reg(x).wrapping_add(nn);
                self.advance_pc()
            }
            Instruction::SetReg { x, y } => {
                self.regs[x as usize] = self.reg(y);
                self.advance_pc()
            }
            Instruction::Or { x, y } => {
                self.regs[x as usize] |= self.reg(y);
                self.advance_pc()
            }
            Instruction::And { x, y } => {
                self.regs[x as usize] &= self.reg(y);
                self.advance_pc()
            }
            Instruction::Xor { x, y } => {
                self.regs[x as usize] ^= self.reg(y);
                self.advance_pc()
            }
            Instruction::AddReg { x, y } => {
                let (res, carry) = self.reg(x).overflowing_add(self.reg(y));
                self.set_with_flag(x, res, carry as u8);
                self.advance_pc()
            }
            Instruction::SubXY { x, y } => {
                let (vx, vy) = (self.reg(x), self.reg(y));
                self.set_with_flag(x, vx.wrapping_sub(vy), (vx >= vy) as u8);
                self.advance_pc()
            }
            Instruction::SubYX { x, y } => {
                let (vx, vy) = (self.reg(x), self.reg(y));
                self.set_with_flag(x, vy.wrapping_sub(vx), (vy >= vx) as u8);
                self.advance_pc()
            }
            Instruction::ShiftRight { x, y } => {
                let src = self.shift_source(x, y);
                self.set_with_flag(x, src >> 1, src & 0x01);
                self.advance_pc()
            }
            Instruction::ShiftLeft { x, y } => {
                let src = self.shift_source(x, y);
                self.set_with_flag(x, src << 1, (src & 0x80) >> 7);
                self.advance_pc()
            }
            Instruction::SkipNeqReg { x, y } => self.skip_if(self.reg(x) != self.reg(y)),
            Instruction::SetIndex(nnn) => {
                self.index = nnn;
                self.advance_pc()
            }
            Instruction::JumpOffset(nnn) => {
                self.pc = nnn + self.regs[0] as u16;
                Ok(())
            }
            Instruction::Random { x, nn } => {
                let n = self.rng.next_u32() as u8;
                self.regs[x as usize] = n & nn;
                self.advance_pc()
            }
            Instruction::Draw { x, y, n } => self.draw(x, y, n),
            Instruction::SkipKeyDown { x } => self.skip_if(self.keypad.is_down(self.reg(x))),
            Instruction::SkipKeyUp { x } => self.skip_if(!self.keypad.is_down(self.reg(x))),
            Instruction::GetDelay { x } => {
                self.regs[x as usize] = self.delay_timer;
                self.advance_pc()
            }
            Instruction::WaitKey { x } => self.wait_key(x),
            Instruction::SetDelay { x } => {
                self.delay_timer = self.reg(x);
                self.advance_pc()
            }
            Instruction::SetSound { x } => {
                self.sound_timer = self.reg(x);
                if self.sound_timer >= MIN_AUDIBLE_SOUND_TIMER {
                    self.sound_active = true;
                }
                self.advance_pc()
            }
            Instruction::AddIndex { x } => {
                self.index = self.index.wrapping_add(self.reg(x) as u16);
                self.advance_pc()
            }
            Instruction::FontChar { x } => {
                let digit = self.reg(x) as u16;
                if digit < 16 {
                    self.index = FONT_START + digit * FONT_SPRITE_SIZE;
                }
                self.advance_pc()
            }
            Instruction::Bcd { x } => {
                let value = self.reg(x);
                let start = self.index as usize;
                let digits = [value / 100, value / 10 % 10, value % 10];
                for (offset, digit) in digits.into_iter().enumerate() {
                    self.write_u8(start + offset, digit)?;
                }
                self.advance_pc()
            }
            Instruction::Store { x } => {
                let start = self.index as usize;
                for i in 0..=x as usize {
                    self.write_u8(start + i, self.regs[i])?;
                }
                self.finish_transfer(start, x);
                self.advance_pc()
            }
            Instruction::Load { x } => {
                let start = self.index as usize;
                for i in 0..=x as usize {
                    self.regs[i] = self.read_u8(start + i)?;
                }
                self.finish_transfer(start, x);
                self.advance_pc()
            }
        }
    }

    // DXYN: XOR an N rows tall sprite from memory at I onto the screen at (VX, VY).
    // Sprites are clipped at the screen edges, VF is set if any pixel was erased.
    fn draw(&mut self, x: u8, y: u8, n: u8) -> Result<(), Fault> {
        self.display.mark_dirty();

        // Origin where we start to draw
        let ox = self.reg(x) as usize % SCREEN_WIDTH;
        let oy = self.reg(y) as usize % SCREEN_HEIGHT;
        let start = self.index as usize;

        let mut erased = false;
        for row in 0..n as usize {
            let py = oy + row;
            if py >= SCREEN_HEIGHT {
                break;
            }

            let data = self.read_u8(start + row)?;

            for column in 0..8 {
                let px = ox + column;
                if px >= SCREEN_WIDTH {
                    break;
                }

                if data & (0x80 >> column) != 0 {
                    erased |= self.display.toggle(px, py);
                }
            }
        }

        self.regs[FLAG] = erased as u8;
        self.advance_pc()
    }

    // FX0A: Latch the first key that goes down, store it once it is released.
    // The sound timer is held at its maximum while the key is down.
    fn wait_key(&mut self, x: u8) -> Result<(), Fault> {
        match self.key_wait {
            KeyWait::Idle => {
                if let Some(key) = self.keypad.first_down() {
                    self.key_wait = KeyWait::Awaiting { key };
                    self.sound_timer = SOUND_TIMER_MAX;
                    self.sound_active = true;
                }
                Ok(())
            }
            KeyWait::Awaiting { key } if self.keypad.is_down(key) => {
                self.sound_timer = SOUND_TIMER_MAX;
                Ok(())
            }
            KeyWait::Awaiting { key } => {
                self.regs[x as usize] = key;
                self.key_wait = KeyWait::Idle;
                self.sound_timer = 0;
                self.sound_active = false;
                self.advance_pc()
            }
        }
    }

    fn reg(&self, r: u8) -> u8 {
        self.regs[r as usize]
    }

    // VF is written last so it holds the flag even when it is also the destination
    fn set_with_flag(&mut self, x: u8, value: u8, flag: u8) {
        self.regs[x as usize] = value;
        self.regs[FLAG] = flag;
    }

    fn shift_source(&self, x: u8, y: u8) -> u8 {
        match self.quirks.shift {
            ShiftSource::VY => self.reg(y),
            ShiftSource::VX => self.reg(x),
        }
    }

    fn finish_transfer(&mut self, start: usize, x: u8) {
        if self.quirks.transfer == IndexAfterTransfer::Advanced {
            // start + x is a checked address, so this fits in u16
            self.index = (start + x as usize + 1) as u16;
        }
    }

    fn advance_pc(&mut self) -> Result<(), Fault> {
        self.advance_pc_by(2)
    }

    // PC only moves if the next instruction starts inside memory
    fn advance_pc_by(&mut self, offset: usize) -> Result<(), Fault> {
        let next = self.pc as usize + offset;
        if next < MEMORY_SIZE {
            self.pc = next as u16;
            Ok(())
        } else {
            Err(Fault::OutOfBounds { addr: next })
        }
    }

    fn skip_if(&mut self, condition: bool) -> Result<(), Fault> {
        self.advance_pc_by(if condition { 4 } else { 2 })
    }

    fn push(&mut self) -> Result<(), Fault> {
        if self.sp as usize >= STACK_SIZE {
            return Err(Fault::StackOverflow);
        }
        self.stack[self.sp as usize] = self.pc;
        self.sp += 1;
        Ok(())
    }

    fn pop(&mut self) -> Result<(), Fault> {
        if self.sp == 0 {
            return Err(Fault::StackUnderflow);
        }
        self.sp -= 1;
        self.pc = self.stack[self.sp as usize];
        Ok(())
    }

    fn guard(addr: usize) -> Result<usize, Fault> {
        if addr < MEMORY_SIZE {
            Ok(addr)
        } else {
            Err(Fault::OutOfBounds { addr })
        }
    }

    fn read_u8(&self, addr: usize) -> Result<u8, Fault> {
        Ok(self.memory[Self::guard(addr)?])
    }

    fn write_u8(&mut self, addr: usize, data: u8) -> Result<(), Fault> {
        self.memory[Self::guard(addr)?] = data;
        Ok(())
    }
}

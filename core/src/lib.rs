mod chip8;
mod display;
mod instruction;
mod keypad;
mod quirks;
mod status;

pub use chip8::{Chip8, Chip8Builder, FontError, DEFAULT_FONT, PROGRAM_CAPACITY};
pub use display::{SCREEN_HEIGHT, SCREEN_WIDTH};
pub use instruction::Instruction;
pub use keypad::KEY_COUNT;
pub use quirks::{Chip8Mode, IndexAfterTransfer, Quirks, ShiftSource};
pub use status::{Fault, Status};

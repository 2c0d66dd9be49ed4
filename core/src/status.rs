use thiserror::Error;

/// Conditions that halt the machine until a new program is loaded.
#[derive(Error, Clone, Copy, PartialEq, Eq, Debug)]
pub enum Fault {
    #[error("program of {size} bytes does not fit in the program area")]
    ProgramTooBig { size: usize },
    #[error("memory accessed out of bounds at 0x{addr:04x}")]
    OutOfBounds { addr: usize },
    #[error("instruction 0x{0:04x} not recognized")]
    InstructionNotRecognized(u16),
    #[error("machine code routine 0x{0:04x} (0NNN) is not implemented")]
    MachineRoutineNotImplemented(u16),
    #[error("stack overflowed")]
    StackOverflow,
    #[error("stack underflowed")]
    StackUnderflow,
}

/// Result of loading a program or stepping the machine.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Status {
    /// Program loaded, keep stepping
    Ok,
    /// Freshly reset, no program loaded yet
    Reset,
    /// Stopped on a fault, `step` is a no-op until the next load
    Halted(Fault),
}

impl Status {
    pub fn is_ok(&self) -> bool {
        matches!(self, Status::Ok)
    }

    pub fn is_fatal(&self) -> bool {
        matches!(self, Status::Halted(_))
    }

    pub fn fault(&self) -> Option<Fault> {
        match self {
            Status::Halted(fault) => Some(*fault),
            _ => None,
        }
    }
}

impl From<Fault> for Status {
    fn from(fault: Fault) -> Self {
        Status::Halted(fault)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_halted_is_fatal() {
        assert!(!Status::Ok.is_fatal());
        assert!(!Status::Reset.is_fatal());
        assert!(Status::Halted(Fault::StackOverflow).is_fatal());
        assert_eq!(
            Status::from(Fault::StackUnderflow).fault(),
            Some(Fault::StackUnderflow)
        );
    }

    #[test]
    fn test_fault_messages() {
        assert_eq!(
            Fault::OutOfBounds { addr: 0x1000 }.to_string(),
            "memory accessed out of bounds at 0x1000"
        );
        assert_eq!(
            Fault::InstructionNotRecognized(0x5121).to_string(),
            "instruction 0x5121 not recognized"
        );
    }
}

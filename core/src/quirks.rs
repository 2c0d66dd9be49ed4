// Opcode semantics that differ between historical CHIP-8 interpreters.
//
// Both choices are fixed when a machine is built, they change which programs run correctly.

/// Source operand of the shift instructions 8XY6 and 8XYE.
#[allow(clippy::upper_case_acronyms)]
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum ShiftSource {
    /// VY is shifted and the result stored in VX (COSMAC VIP)
    #[default]
    VY,
    /// VX is shifted in place, VY is ignored (CHIP-48 and later)
    VX,
}

/// Value of the index register after the block transfers FX55 and FX65.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum IndexAfterTransfer {
    /// I is left pointing one past the last transferred byte (I = I + X + 1)
    #[default]
    Advanced,
    /// I keeps the value it had before the transfer (SUPER-CHIP)
    Restored,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct Quirks {
    pub shift: ShiftSource,
    pub transfer: IndexAfterTransfer,
}

#[allow(non_camel_case_types)]
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Chip8Mode {
    COSMAC_VIP,
    CHIP_48,
    SUPER_CHIP,
}

impl From<Chip8Mode> for Quirks {
    fn from(mode: Chip8Mode) -> Self {
        match mode {
            Chip8Mode::COSMAC_VIP => Quirks {
                shift: ShiftSource::VY,
                transfer: IndexAfterTransfer::Advanced,
            },
            Chip8Mode::CHIP_48 => Quirks {
                shift: ShiftSource::VX,
                transfer: IndexAfterTransfer::Advanced,
            },
            Chip8Mode::SUPER_CHIP => Quirks {
                shift: ShiftSource::VX,
                transfer: IndexAfterTransfer::Restored,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_cosmac_vip() {
        assert_eq!(Quirks::default(), Quirks::from(Chip8Mode::COSMAC_VIP));
    }

    #[test]
    fn test_super_chip_restores_index() {
        let quirks = Quirks::from(Chip8Mode::SUPER_CHIP);
        assert_eq!(quirks.shift, ShiftSource::VX);
        assert_eq!(quirks.transfer, IndexAfterTransfer::Restored);
    }
}

pub const KEY_COUNT: usize = 16;

/// 16-key hexadecimal keypad
#[derive(Clone, Copy, Debug, Default)]
pub struct Keypad {
    keys: [bool; KEY_COUNT],
}

impl Keypad {
    /// Out of range keys are ignored.
    pub fn press(&mut self, key: u8) {
        if let Some(k) = self.keys.get_mut(key as usize) {
            *k = true;
        }
    }

    pub fn release(&mut self, key: u8) {
        if let Some(k) = self.keys.get_mut(key as usize) {
            *k = false;
        }
    }

    pub fn is_down(&self, key: u8) -> bool {
        self.keys.get(key as usize).copied().unwrap_or(false)
    }

    /// Lowest numbered key currently down.
    pub fn first_down(&self) -> Option<u8> {
        self.keys.iter().position(|&k| k).map(|k| k as u8)
    }
}

/// Progress of the FX0A wait-for-key instruction.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum KeyWait {
    #[default]
    Idle,
    /// A key went down and the instruction waits for its release
    Awaiting { key: u8 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_press_release() {
        let mut keypad = Keypad::default();

        keypad.press(0xA);
        assert!(keypad.is_down(0xA));

        keypad.release(0xA);
        assert!(!keypad.is_down(0xA));
    }

    #[test]
    fn test_out_of_range_keys_ignored() {
        let mut keypad = Keypad::default();

        keypad.press(16);
        keypad.press(0xFF);

        assert!(!keypad.is_down(16));
        assert_eq!(keypad.first_down(), None);
    }

    #[test]
    fn test_first_down_scans_ascending() {
        let mut keypad = Keypad::default();
        keypad.press(0xC);
        keypad.press(0x5);

        assert_eq!(keypad.first_down(), Some(0x5));
    }
}

use std::str::FromStr;

use anyhow::{anyhow, bail, Context};
use chip_8_core::{Chip8, KEY_COUNT};

/// A keypad key held down over a range of steps: `K@S` or `K@S-E` (K in hex).
///
/// The key goes down before step `S` and up before step `E`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPress {
    pub key: u8,
    pub from: u64,
    pub until: Option<u64>,
}

impl FromStr for KeyPress {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<KeyPress, Self::Err> {
        let (key, range) = s
            .split_once('@')
            .ok_or_else(|| anyhow!("expected KEY@STEP[-STEP], got {:?}", s))?;

        let key = u8::from_str_radix(key, 16).with_context(|| format!("invalid key {:?}", key))?;
        if key as usize >= KEY_COUNT {
            bail!("key 0x{:x} is not on the keypad", key);
        }

        let (from, until) = match range.split_once('-') {
            Some((from, until)) => (from, Some(until.parse::<u64>()?)),
            None => (range, None),
        };
        let from = from.parse::<u64>()?;

        if let Some(until) = until {
            if until <= from {
                bail!("key release at step {} is not after press at {}", until, from);
            }
        }

        Ok(KeyPress { key, from, until })
    }
}

/// Apply key transitions scheduled for `step`.
pub fn apply(presses: &[KeyPress], chip: &mut Chip8, step: u64) {
    for press in presses {
        if press.from == step {
            log::debug!("Key 0x{:x} down at step {}", press.key, step);
            chip.set_key_down(press.key);
        }
        if press.until == Some(step) {
            log::debug!("Key 0x{:x} up at step {}", press.key, step);
            chip.set_key_up(press.key);
        }
    }
}

/// 60 Hz timer rate of the CHIP-8 delay and sound timers
pub const TIMER_HZ: u32 = 60;

pub const DEFAULT_IPS: u32 = 500;
pub const MIN_IPS: u32 = 100;
pub const MAX_IPS: u32 = 2000;

/// Converts an instruction rate into whole 60 Hz ticks per executed instruction.
///
/// The fractional remainder is carried over, so over one emulated second exactly
/// 60 ticks are handed out regardless of the instruction rate.
#[derive(Debug, Clone)]
pub struct TickClock {
    ips: u32,
    acc: u32,
}

impl TickClock {
    pub fn new(ips: u32) -> TickClock {
        TickClock {
            ips: ips.clamp(MIN_IPS, MAX_IPS),
            acc: 0,
        }
    }

    pub fn ips(&self) -> u32 {
        self.ips
    }

    /// Ticks elapsed during the next instruction.
    pub fn tick(&mut self) -> u32 {
        self.acc += TIMER_HZ;
        let ticks = self.acc / self.ips;
        self.acc -= ticks * self.ips;
        ticks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sixty_ticks_per_second() {
        for ips in [MIN_IPS, DEFAULT_IPS, 700, MAX_IPS] {
            let mut clock = TickClock::new(ips);
            let ticks: u32 = (0..ips).map(|_| clock.tick()).sum();
            assert_eq!(ticks, TIMER_HZ, "ips {}", ips);
        }
    }

    #[test]
    fn test_ips_clamped() {
        assert_eq!(TickClock::new(1).ips(), MIN_IPS);
        assert_eq!(TickClock::new(1_000_000).ips(), MAX_IPS);
    }
}

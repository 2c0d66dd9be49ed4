pub const SCREEN_WIDTH: usize = 64;
pub const SCREEN_HEIGHT: usize = 32;

/// Display: 64x32 pixels 1 bit monochrome, with a one-shot dirty flag
pub struct Display {
    pixels: [bool; SCREEN_WIDTH * SCREEN_HEIGHT],
    dirty: bool,
}

impl Display {
    pub fn new() -> Display {
        Display {
            pixels: [false; SCREEN_WIDTH * SCREEN_HEIGHT],
            dirty: false,
        }
    }

    /// Turn all pixels off and mark the display dirty.
    pub fn clear(&mut self) {
        self.pixels.iter_mut().for_each(|p| *p = false);
        self.dirty = true;
    }

    pub fn pixel(&self, x: usize, y: usize) -> bool {
        if x >= SCREEN_WIDTH || y >= SCREEN_HEIGHT {
            return false;
        }
        self.pixels[y * SCREEN_WIDTH + x]
    }

    /// XOR a set sprite bit into the pixel at (x, y), returns true if the pixel was erased.
    pub fn toggle(&mut self, x: usize, y: usize) -> bool {
        let idx = y * SCREEN_WIDTH + x;
        self.pixels[idx] = !self.pixels[idx];
        !self.pixels[idx]
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Returns the dirty flag and clears it.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::replace(&mut self.dirty, false)
    }
}

impl Default for Display {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_reports_erase() {
        let mut display = Display::new();

        assert!(!display.toggle(3, 4));
        assert!(display.pixel(3, 4));
        assert!(display.toggle(3, 4));
        assert!(!display.pixel(3, 4));
    }

    #[test]
    fn test_out_of_range_pixel_is_off() {
        let mut display = Display::new();
        display.toggle(SCREEN_WIDTH - 1, SCREEN_HEIGHT - 1);

        assert!(display.pixel(SCREEN_WIDTH - 1, SCREEN_HEIGHT - 1));
        assert!(!display.pixel(SCREEN_WIDTH, 0));
        assert!(!display.pixel(0, SCREEN_HEIGHT));
    }

    #[test]
    fn test_dirty_is_one_shot() {
        let mut display = Display::new();
        assert!(!display.take_dirty());

        display.clear();

        assert!(display.take_dirty());
        assert!(!display.take_dirty());
    }
}

use std::{fs::File, io::Write, path::Path};

use anyhow::Context;
use chip_8_core::{Chip8, SCREEN_HEIGHT, SCREEN_WIDTH};

use crate::color::Color;

pub fn to_text(chip: &Chip8) -> String {
    let mut out = String::with_capacity((SCREEN_WIDTH * 3 + 1) * SCREEN_HEIGHT);
    for y in 0..SCREEN_HEIGHT {
        for x in 0..SCREEN_WIDTH {
            out.push(if chip.get_pixel(x, y) { '█' } else { ' ' });
        }
        out.push('\n');
    }
    out
}

pub fn to_rgb(chip: &Chip8, foreground: Color, background: Color) -> Vec<Color> {
    (0..SCREEN_HEIGHT)
        .flat_map(|y| (0..SCREEN_WIDTH).map(move |x| (x, y)))
        .map(|(x, y)| {
            if chip.get_pixel(x, y) {
                foreground
            } else {
                background
            }
        })
        .collect()
}

/// Write the framebuffer as a binary PPM, each CHIP-8 pixel scaled to `scale`x`scale`.
pub fn write_ppm(path: &Path, pixels: &[Color], scale: usize) -> anyhow::Result<()> {
    let width = SCREEN_WIDTH * scale;
    let height = SCREEN_HEIGHT * scale;

    let mut scaled = Vec::with_capacity(width * height);
    for row in pixels.chunks(SCREEN_WIDTH) {
        let line: Vec<Color> = row
            .iter()
            .flat_map(|c| std::iter::repeat(*c).take(scale))
            .collect();
        for _ in 0..scale {
            scaled.extend_from_slice(&line);
        }
    }

    let mut file =
        File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    write!(file, "P6\n{} {}\n255\n", width, height)?;
    file.write_all(bytemuck::cast_slice(&scaled))?;
    Ok(())
}

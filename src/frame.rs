// Copyright (c) 2026 rezky_nightky

use crate::canvas::Framebuffer;
use crate::cell::Cell;
use crate::palette::Rgb;
use crate::runtime::ColorMode;

/// Terminal cell grid with dirty tracking. Each cell row shows two rows of
/// sub-pixels sampled from a [`Framebuffer`].
#[derive(Clone, Debug)]
pub struct Frame {
    pub width: u16,
    pub height: u16,
    pub cells: Vec<Cell>,
    dirty_all: bool,
    dirty_map: Vec<bool>,
    dirty: Vec<usize>,
}

impl Frame {
    pub fn new(width: u16, height: u16) -> Self {
        let len = width as usize * height as usize;
        Self {
            width,
            height,
            cells: vec![Cell::blank_with_bg(None); len],
            dirty_all: true,
            dirty_map: vec![false; len],
            dirty: Vec::new(),
        }
    }

    pub fn is_dirty_all(&self) -> bool {
        self.dirty_all
    }

    pub fn dirty_indices(&self) -> &[usize] {
        &self.dirty
    }

    pub fn clear_dirty(&mut self) {
        if self.dirty_all {
            self.dirty_all = false;
            self.dirty_map.fill(false);
            self.dirty.clear();
            return;
        }

        for &i in &self.dirty {
            if let Some(v) = self.dirty_map.get_mut(i) {
                *v = false;
            }
        }
        self.dirty.clear();
    }

    pub fn index(&self, x: u16, y: u16) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    #[allow(dead_code)]
    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        self.index(x, y).map(|i| &self.cells[i])
    }

    pub fn cell_at_index(&self, i: usize) -> Cell {
        self.cells[i]
    }

    pub fn set(&mut self, x: u16, y: u16, cell: Cell) {
        let Some(i) = self.index(x, y) else {
            return;
        };
        if self.cells[i] == cell {
            return;
        }
        self.cells[i] = cell;
        if !self.dirty_all && !self.dirty_map[i] {
            self.dirty_map[i] = true;
            self.dirty.push(i);
        }
    }

    /// Resamples `fb` onto the grid. A sub-pixel covers a block of framebuffer
    /// pixels and takes the first non-background pixel in it, so one-pixel lines
    /// survive the reduction.
    pub fn downsample(&mut self, fb: &Framebuffer, mode: ColorMode, background: Rgb) {
        if self.width == 0 || self.height == 0 || fb.width == 0 || fb.height == 0 {
            return;
        }

        let sub_rows = self.height as u32 * 2;
        let cols = self.width as u32;
        let span = |i: u32, n: u32, len: u32| {
            let start = (i as u64 * len as u64 / n as u64) as u32;
            let end = ((i as u64 + 1) * len as u64 / n as u64) as u32;
            let start = start.min(len - 1);
            (start, end.clamp(start + 1, len))
        };

        let sample = |xs: (u32, u32), ys: (u32, u32)| -> Rgb {
            for y in ys.0..ys.1 {
                for x in xs.0..xs.1 {
                    if let Some(p) = fb.pixel(x, y) {
                        if p != background {
                            return p;
                        }
                    }
                }
            }
            background
        };

        for cy in 0..self.height {
            let upper_rows = span(cy as u32 * 2, sub_rows, fb.height);
            let lower_rows = span(cy as u32 * 2 + 1, sub_rows, fb.height);
            for cx in 0..self.width {
                let xs = span(cx as u32, cols, fb.width);
                let upper = sample(xs, upper_rows).to_term(mode, background);
                let lower = sample(xs, lower_rows).to_term(mode, background);
                self.set(cx, cy, Cell::from_halves(upper, lower));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crossterm::style::Color;

    use super::*;
    use crate::canvas::Canvas;

    const BG: Rgb = Rgb::new(73, 55, 84);
    const FG: Rgb = Rgb::new(167, 154, 173);

    fn rgb(c: Rgb) -> Option<Color> {
        c.to_term(ColorMode::TrueColor, BG)
    }

    #[test]
    fn set_tracks_only_changed_cells() {
        let mut f = Frame::new(3, 2);
        f.clear_dirty();
        let c = Cell::blank_with_bg(Some(Color::Red));
        f.set(1, 1, c);
        f.set(1, 1, c);
        assert_eq!(f.dirty_indices(), &[4]);
        f.clear_dirty();
        f.set(1, 1, c);
        assert!(f.dirty_indices().is_empty());
    }

    #[test]
    fn thin_line_survives_downsampling() {
        let mut fb = Framebuffer::new(640, 480, BG);
        fb.draw_line(FG, 321.0, 0.0, 321.0, 479.0);

        let mut f = Frame::new(80, 24);
        f.downsample(&fb, ColorMode::TrueColor, BG);

        for y in 0..24 {
            let c = f.get(40, y).unwrap();
            assert_eq!(*c, Cell::blank_with_bg(rgb(FG)));
            assert_eq!(*f.get(39, y).unwrap(), Cell::blank_with_bg(rgb(BG)));
        }
    }

    #[test]
    fn halves_are_sampled_separately() {
        let mut fb = Framebuffer::new(4, 4, BG);
        fb.draw_line(FG, 0.0, 0.0, 3.0, 0.0);

        let mut f = Frame::new(1, 2);
        f.downsample(&fb, ColorMode::TrueColor, BG);

        let top = f.get(0, 0).unwrap();
        assert_eq!(top.fg, rgb(FG));
        assert_eq!(top.bg, rgb(BG));
        assert_eq!(*f.get(0, 1).unwrap(), Cell::blank_with_bg(rgb(BG)));
    }

    #[test]
    fn grid_larger_than_canvas_still_samples() {
        let fb = Framebuffer::new(2, 2, FG);
        let mut f = Frame::new(5, 5);
        f.downsample(&fb, ColorMode::TrueColor, BG);
        assert!(f.cells.iter().all(|c| *c == Cell::blank_with_bg(rgb(FG))));
    }
}

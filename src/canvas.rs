// Copyright (c) 2026 rezky_nightky

use std::io;

use crate::palette::Rgb;
use crate::runtime::RainEvent;

/// A colored line segment in canvas pixel space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment {
    pub color: Rgb,
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

pub trait Canvas {
    /// Endpoints are truncated to whole pixels; anything off the surface is clipped.
    fn draw_line(&mut self, color: Rgb, x0: f64, y0: f64, x1: f64, y1: f64);

    fn draw_segment(&mut self, seg: Segment) {
        self.draw_line(seg.color, seg.x0, seg.y0, seg.x1, seg.y1);
    }
}

/// The drawing surface the main loop runs against. Dropping it releases the
/// underlying display.
pub trait Renderer: Canvas {
    fn clear(&mut self, color: Rgb);
    fn present(&mut self) -> io::Result<()>;
    /// Non-blocking; returns at most one pending event.
    fn poll_event(&mut self) -> io::Result<Option<RainEvent>>;
    /// Milliseconds between the last two presented frames.
    fn frame_time(&self) -> u32;
}

#[derive(Clone, Debug)]
pub struct Framebuffer {
    pub width: u32,
    pub height: u32,
    pixels: Vec<Rgb>,
}

impl Framebuffer {
    pub fn new(width: u32, height: u32, fill: Rgb) -> Self {
        Self {
            width,
            height,
            pixels: vec![fill; width as usize * height as usize],
        }
    }

    pub fn clear(&mut self, color: Rgb) {
        self.pixels.fill(color);
    }

    fn index(&self, x: i64, y: i64) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgb> {
        self.index(x as i64, y as i64).map(|i| self.pixels[i])
    }

    pub fn put(&mut self, x: i64, y: i64, color: Rgb) {
        if let Some(i) = self.index(x, y) {
            self.pixels[i] = color;
        }
    }
}

impl Canvas for Framebuffer {
    fn draw_line(&mut self, color: Rgb, x0: f64, y0: f64, x1: f64, y1: f64) {
        let (mut x, mut y) = (x0 as i64, y0 as i64);
        let (x1, y1) = (x1 as i64, y1 as i64);

        // Skip lines entirely on one side of the surface.
        let (w, h) = (self.width as i64, self.height as i64);
        if (x < 0 && x1 < 0) || (y < 0 && y1 < 0) || (x >= w && x1 >= w) || (y >= h && y1 >= h) {
            return;
        }

        let dx = (x1 - x).abs();
        let dy = -(y1 - y).abs();
        let sx = if x < x1 { 1 } else { -1 };
        let sy = if y < y1 { 1 } else { -1 };
        let mut err = dx + dy;

        loop {
            self.put(x, y, color);
            if x == x1 && y == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }
}

#[cfg(test)]
impl Canvas for Vec<Segment> {
    fn draw_line(&mut self, color: Rgb, x0: f64, y0: f64, x1: f64, y1: f64) {
        self.push(Segment {
            color,
            x0,
            y0,
            x1,
            y1,
        });
    }
}

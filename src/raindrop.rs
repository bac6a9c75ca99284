// Copyright (c) 2026 rezky_nightky

use rand::Rng;

use crate::config::Config;
use crate::palette::Rgb;

/// A falling vertical streak.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Raindrop {
    pub x: f64,
    pub y: f64,
    pub width: i32,
    /// Always `width * length_factor`.
    pub length: i32,
    /// Pixels per frame, always > 0.
    pub velocity: f64,
    pub color: Rgb,
}

impl Raindrop {
    pub fn new<R: Rng + ?Sized>(cfg: &Config, rng: &mut R) -> Self {
        let mut d = Self {
            x: 0.0,
            y: 0.0,
            width: 0,
            length: 0,
            velocity: 0.0,
            color: Rgb::default(),
        };
        d.respawn(cfg, rng);
        d
    }

    /// Re-roll every property and park the drop somewhere above the top edge.
    pub fn respawn<R: Rng + ?Sized>(&mut self, cfg: &Config, rng: &mut R) {
        self.x = rng.random_range(0..cfg.width.max(1)) as f64;
        self.y = -(rng.random_range(0..cfg.height.max(1)) as f64);

        let width = rng.random_range(1..=cfg.max_width.max(1));
        self.width = width as i32;
        self.length = self.width * cfg.length_factor.max(1) as i32;

        let resolution = cfg.velocity_resolution.max(1);
        let jitter = rng.random_range(0..resolution) as f64 / resolution as f64;
        self.velocity = width as f64 / cfg.velocity_factor.max(1) as f64 + jitter;

        if !cfg.palette.is_empty() {
            self.color = cfg.palette[rng.random_range(0..cfg.palette.len())];
        }
    }

    /// Moves the drop down one frame. Returns true once it has fallen past `floor`.
    pub fn fall(&mut self, floor: f64) -> bool {
        self.y += self.velocity;
        self.y > floor
    }
}

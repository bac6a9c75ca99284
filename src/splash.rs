// Copyright (c) 2026 rezky_nightky

use std::f64::consts::PI;

use rand::Rng;

use crate::canvas::Segment;
use crate::config::Config;
use crate::palette::Rgb;
use crate::raindrop::Raindrop;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    /// Angle runs 0 → π.
    LeftToRight,
    /// Angle runs π → 0.
    RightToLeft,
}

/// Half-circle arc traced by a drop that hit the floor. The circle is centered
/// on the floor line at `center_x`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Splash {
    pub x: f64,
    pub y: f64,
    pub radius: i32,
    pub center_x: i32,
    pub angle: f64,
    pub step: f64,
    pub end_angle: f64,
    pub color: Rgb,
    pub active: bool,
}

impl Default for Splash {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            radius: 0,
            center_x: 0,
            angle: 0.0,
            step: 0.0,
            end_angle: 0.0,
            color: Rgb::default(),
            active: false,
        }
    }
}

impl Splash {
    /// Arms the splash from the drop that just crossed the floor. Must run before
    /// the drop respawns; the drop's color is copied here.
    pub fn arm<R: Rng + ?Sized>(&mut self, drop: &Raindrop, cfg: &Config, rng: &mut R) {
        let dir = if rng.random_bool(0.5) {
            Direction::LeftToRight
        } else {
            Direction::RightToLeft
        };
        self.arm_towards(drop, cfg, dir);
    }

    pub fn arm_towards(&mut self, drop: &Raindrop, cfg: &Config, dir: Direction) {
        let x = drop.x.trunc();
        self.y = cfg.height as f64;
        self.x = x;
        self.radius = (cfg.splash_range * drop.velocity) as i32;
        self.center_x = x as i32 + self.radius;
        let step = cfg.splash_step.abs();
        match dir {
            Direction::LeftToRight => {
                self.angle = 0.0;
                self.step = step;
                self.end_angle = PI;
            }
            Direction::RightToLeft => {
                self.angle = PI;
                self.step = -step;
                self.end_angle = 0.0;
            }
        }
        self.color = drop.color;
        self.active = true;
    }

    pub fn direction(&self) -> Direction {
        if self.step >= 0.0 {
            Direction::LeftToRight
        } else {
            Direction::RightToLeft
        }
    }

    fn passed_end(&self) -> bool {
        match self.direction() {
            Direction::LeftToRight => self.angle > self.end_angle,
            Direction::RightToLeft => self.angle < self.end_angle,
        }
    }

    /// One frame along the arc. Returns the segment to draw, or `None` when the
    /// splash is (or just became) inactive.
    pub fn advance(&mut self, floor: f64) -> Option<Segment> {
        if !self.active {
            return None;
        }

        self.angle += self.step;
        if self.passed_end() {
            self.active = false;
            return None;
        }

        let r = self.radius as f64;
        let x = self.center_x as f64 + self.angle.cos() * r;
        let y = floor - self.angle.sin() * r;
        let seg = Segment {
            color: self.color,
            x0: self.x,
            y0: self.y,
            x1: x,
            y1: y,
        };
        self.x = x;
        self.y = y;
        Some(seg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drop_at(x: f64, velocity: f64) -> Raindrop {
        Raindrop {
            x,
            y: 481.0,
            width: 1,
            length: 5,
            velocity,
            color: Rgb::new(145, 124, 155),
        }
    }

    #[test]
    fn arm_left_to_right_starts_at_zero_heading_to_pi() {
        let cfg = Config::default();
        let mut s = Splash::default();
        s.arm_towards(&drop_at(100.7, 0.55), &cfg, Direction::LeftToRight);

        assert!(s.active);
        assert_eq!(s.angle, 0.0);
        assert!(s.step > 0.0);
        assert_eq!(s.end_angle, PI);
        assert_eq!(s.x, 100.0);
        assert_eq!(s.y, 480.0);
        assert_eq!(s.radius, 11);
        assert_eq!(s.center_x, 111);
        assert_eq!(s.color, Rgb::new(145, 124, 155));
    }

    #[test]
    fn arm_right_to_left_starts_at_pi_heading_to_zero() {
        let cfg = Config::default();
        let mut s = Splash::default();
        s.arm_towards(&drop_at(10.0, 1.0), &cfg, Direction::RightToLeft);

        assert_eq!(s.angle, PI);
        assert!(s.step < 0.0);
        assert_eq!(s.end_angle, 0.0);
        assert_eq!(s.direction(), Direction::RightToLeft);
    }

    #[test]
    fn left_to_right_runs_until_past_pi_then_stops_drawing() {
        let cfg = Config::default();
        let mut s = Splash::default();
        s.arm_towards(&drop_at(200.0, 0.5), &cfg, Direction::LeftToRight);

        let mut prev = s.angle;
        let mut frames = 0;
        while let Some(seg) = s.advance(480.0) {
            assert!(s.angle > prev);
            assert!(s.angle <= PI);
            assert!(seg.y1 <= 480.0);
            prev = s.angle;
            frames += 1;
            assert!(frames <= 241);
        }

        assert!(!s.active);
        assert!(s.angle > PI);
        assert!(frames >= 239);
        assert!(s.advance(480.0).is_none());
    }

    #[test]
    fn right_to_left_angle_decreases_and_deactivates_below_zero() {
        let cfg = Config::default();
        let mut s = Splash::default();
        s.arm_towards(&drop_at(50.0, 0.8), &cfg, Direction::RightToLeft);

        let mut prev = s.angle;
        while s.advance(480.0).is_some() {
            assert!(s.angle < prev);
            assert!(s.angle >= 0.0);
            prev = s.angle;
        }
        assert!(!s.active);
        assert!(s.angle < 0.0);
    }

    #[test]
    fn segments_chain_from_previous_point() {
        let cfg = Config::default();
        let mut s = Splash::default();
        s.arm_towards(&drop_at(300.0, 1.0), &cfg, Direction::RightToLeft);

        let first = s.advance(480.0).unwrap();
        assert_eq!((first.x0, first.y0), (300.0, 480.0));
        let second = s.advance(480.0).unwrap();
        assert_eq!((second.x0, second.y0), (first.x1, first.y1));

        let r = s.radius as f64;
        let dx = second.x1 - s.center_x as f64;
        let dy = 480.0 - second.y1;
        assert!(((dx * dx + dy * dy).sqrt() - r).abs() < 1e-9);
    }

    #[test]
    fn arm_picks_either_direction_about_half_the_time() {
        use rand::rngs::StdRng;
        use rand::SeedableRng;

        let cfg = Config::default();
        let mut rng = StdRng::seed_from_u64(1);
        let drop = drop_at(120.0, 0.6);
        let mut s = Splash::default();
        let mut left_to_right = 0;
        for _ in 0..10_000 {
            s.arm(&drop, &cfg, &mut rng);
            if s.direction() == Direction::LeftToRight {
                left_to_right += 1;
            }
        }
        assert!((4500..5500).contains(&left_to_right), "{}", left_to_right);
    }

    #[test]
    fn inactive_splash_is_left_untouched() {
        let mut s = Splash::default();
        let before = s;
        assert!(s.advance(480.0).is_none());
        assert_eq!(s, before);
    }
}

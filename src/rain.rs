// Copyright (c) 2026 rezky_nightky

use rand::{rngs::StdRng, SeedableRng};

use crate::canvas::Canvas;
use crate::config::Config;
use crate::raindrop::Raindrop;
use crate::splash::Splash;

/// Both particle pools plus the random source that feeds them.
///
/// `drops[i]` and `splashes[i]` are paired: a drop crossing the floor arms the
/// splash at its own index. Pools are sized once from [`Config::particles`].
pub struct Rain {
    pub cfg: Config,
    pub drops: Vec<Raindrop>,
    pub splashes: Vec<Splash>,
    rng: StdRng,
}

impl Rain {
    pub fn new(cfg: Config, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let drops = (0..cfg.particles)
            .map(|_| Raindrop::new(&cfg, &mut rng))
            .collect();
        let splashes = vec![Splash::default(); cfg.particles];
        Self {
            cfg,
            drops,
            splashes,
            rng,
        }
    }

    pub fn active_splashes(&self) -> usize {
        self.splashes.iter().filter(|s| s.active).count()
    }

    /// Advances every slot by one frame and draws it.
    pub fn step<C: Canvas + ?Sized>(&mut self, canvas: &mut C) {
        let floor = self.cfg.height as f64;

        for (drop, splash) in self.drops.iter_mut().zip(self.splashes.iter_mut()) {
            if drop.fall(floor) {
                splash.arm(drop, &self.cfg, &mut self.rng);
                drop.respawn(&self.cfg, &mut self.rng);
            }

            if let Some(seg) = splash.advance(floor) {
                canvas.draw_segment(seg);
            }

            canvas.draw_line(
                drop.color,
                drop.x,
                drop.y,
                drop.x,
                drop.y + drop.length as f64,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use std::f64::consts::PI;

    use super::*;
    use crate::canvas::Segment;
    use crate::palette::Rgb;
    use crate::splash::Direction;

    fn small(particles: usize) -> Config {
        Config {
            particles,
            ..Config::default()
        }
    }

    #[test]
    fn pools_are_sized_from_config_and_start_quiet() {
        let rain = Rain::new(small(37), 5);
        assert_eq!(rain.drops.len(), 37);
        assert_eq!(rain.splashes.len(), 37);
        assert_eq!(rain.active_splashes(), 0);
        assert!(rain.drops.iter().all(|d| d.y <= 0.0 && d.y >= -480.0));
    }

    #[test]
    fn every_slot_draws_its_drop_each_frame() {
        let mut rain = Rain::new(small(20), 11);
        let mut out: Vec<Segment> = Vec::new();
        rain.step(&mut out);
        assert_eq!(out.len(), 20);
        for (seg, d) in out.iter().zip(&rain.drops) {
            assert_eq!(seg.x0, seg.x1);
            assert_eq!(seg.y1 - seg.y0, d.length as f64);
            assert_eq!(seg.color, d.color);
        }
    }

    #[test]
    fn crossing_the_floor_arms_splash_from_the_old_drop_then_respawns() {
        let mut rain = Rain::new(small(1), 3);
        let old_color = Rgb::new(1, 2, 3);
        rain.drops[0] = Raindrop {
            x: 100.0,
            y: 478.0,
            width: 1,
            length: 5,
            velocity: 3.0,
            color: old_color,
        };

        let mut out: Vec<Segment> = Vec::new();
        rain.step(&mut out);

        let s = rain.splashes[0];
        assert!(s.active);
        assert_eq!(s.radius, 60);
        assert_eq!(s.color, old_color);
        assert_eq!(s.center_x, 160);

        let d = rain.drops[0];
        assert!(d.y <= 0.0 && d.y >= -480.0);
        assert_ne!(d.color, old_color);
        assert!(rain.cfg.palette.contains(&d.color));

        // Arc segment first, in the old color, then the respawned drop.
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].color, old_color);
        assert_eq!((out[0].x0, out[0].y0), (100.0, 480.0));
        assert_eq!(out[1].color, d.color);
    }

    #[test]
    fn splash_deactivates_once_and_stays_untouched() {
        let mut rain = Rain::new(small(1), 8);
        let parent = Raindrop {
            x: 10.0,
            y: 490.0,
            width: 1,
            length: 5,
            velocity: 0.5,
            color: Rgb::new(9, 9, 9),
        };
        rain.splashes[0].arm_towards(&parent, &rain.cfg, Direction::LeftToRight);
        // Keep the drop far above the floor for the whole run.
        rain.drops[0].y = -1.0e9;
        rain.drops[0].velocity = 0.1;

        let mut deactivated_at = None;
        let mut prev = rain.splashes[0].angle;
        for frame in 0..400 {
            let mut out: Vec<Segment> = Vec::new();
            rain.step(&mut out);
            let s = rain.splashes[0];
            if s.active {
                assert!(s.angle > prev);
                assert!(s.angle <= PI);
                assert_eq!(out.len(), 2);
                prev = s.angle;
            } else {
                if deactivated_at.is_none() {
                    deactivated_at = Some(frame);
                    assert!(s.angle > PI);
                }
                assert_eq!(out.len(), 1);
            }
        }

        let frame = deactivated_at.unwrap();
        assert!((238..=240).contains(&frame));
        let frozen = rain.splashes[0];
        let mut out: Vec<Segment> = Vec::new();
        rain.step(&mut out);
        assert_eq!(rain.splashes[0], frozen);
    }

    #[test]
    fn frames_without_crossings_leave_splash_flags_alone() {
        let mut rain = Rain::new(small(50), 21);
        for d in &mut rain.drops {
            d.y = -400.0;
            d.velocity = 0.5;
        }
        let parent = rain.drops[0];
        rain.splashes[0].arm_towards(&parent, &rain.cfg, Direction::RightToLeft);
        rain.splashes[1].arm_towards(&parent, &rain.cfg, Direction::LeftToRight);
        let before: Vec<bool> = rain.splashes.iter().map(|s| s.active).collect();
        let mut out: Vec<Segment> = Vec::new();
        rain.step(&mut out);
        rain.step(&mut out);
        let after: Vec<bool> = rain.splashes.iter().map(|s| s.active).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn same_seed_replays_the_same_frames() {
        let record = |seed: u64| {
            let mut rain = Rain::new(small(200), seed);
            let mut out: Vec<Segment> = Vec::new();
            for _ in 0..600 {
                rain.step(&mut out);
            }
            (out, rain.active_splashes())
        };

        let (a, active_a) = record(1234);
        let (b, active_b) = record(1234);
        assert_eq!(a, b);
        assert_eq!(active_a, active_b);

        let (c, _) = record(4321);
        assert_ne!(a, c);
    }

    #[test]
    fn long_runs_keep_every_invariant() {
        let mut rain = Rain::new(small(100), 77);
        let mut out: Vec<Segment> = Vec::new();
        let mut saw_splash = false;
        for _ in 0..3000 {
            out.clear();
            rain.step(&mut out);
            for d in &rain.drops {
                assert!(d.velocity > 0.0);
                assert_eq!(d.length, d.width * 5);
                assert!(d.y <= 480.0);
            }
            for s in rain.splashes.iter().filter(|s| s.active) {
                saw_splash = true;
                let excursion = match s.direction() {
                    Direction::LeftToRight => s.angle,
                    Direction::RightToLeft => PI - s.angle,
                };
                assert!((0.0..=PI).contains(&excursion));
            }
        }
        assert!(saw_splash);
    }
}

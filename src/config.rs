// Copyright (c) 2026 rezky_nightky

use std::f64::consts::PI;
use std::io::IsTerminal;

use clap::Parser;

use crate::palette::{Rgb, BACKGROUND, RAIN_COLORS};

pub const DEFAULT_PARAMS_USAGE: &str =
    "DEFAULT PARAMS USAGE:\n  purple-rain --fps 60 --duration 0";

pub fn color_enabled_stdout() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    if matches!(std::env::var("CLICOLOR").ok().as_deref(), Some("0")) {
        return false;
    }
    std::io::stdout().is_terminal()
}

pub fn default_params_usage_for_help() -> String {
    if !color_enabled_stdout() {
        return DEFAULT_PARAMS_USAGE.to_string();
    }
    match DEFAULT_PARAMS_USAGE.split_once('\n') {
        Some((heading, rest)) => format!("\x1b[1;36m{}\x1b[0m\n{}", heading, rest),
        None => DEFAULT_PARAMS_USAGE.to_string(),
    }
}

/// Everything the simulation and the renderer need to know about the scene.
///
/// Built once at startup from [`Config::default`]; none of these are exposed on
/// the command line.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    /// Canvas width in pixels. Default 640.
    pub width: u32,
    /// Canvas height in pixels. Default 480. Splash arcs are centered on this line.
    pub height: u32,
    /// Size of both the raindrop and the splash pool. Default 500.
    pub particles: usize,
    /// Window / terminal title. Default "Purple Rain".
    pub title: String,
    /// Widest drop in pixels; widths are drawn from `1..=max_width`. Default 2.
    pub max_width: u32,
    /// Drop length is `width * length_factor`. Default 5.
    pub length_factor: u32,
    /// Base fall speed is `width / velocity_factor` pixels per frame. Default 10.
    pub velocity_factor: u32,
    /// Jitter added to the fall speed is `k / velocity_resolution`,
    /// `k` in `0..velocity_resolution`. Default 10000.
    pub velocity_resolution: u32,
    /// Splash radius is `splash_range * velocity`. Default 20.
    pub splash_range: f64,
    /// Angle advanced by a splash per frame, in radians. Default π/240.
    pub splash_step: f64,
    /// Default (73, 55, 84).
    pub background: Rgb,
    /// Drop colors, picked uniformly. Default: four shades of purple.
    pub palette: Vec<Rgb>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            particles: 500,
            title: "Purple Rain".to_string(),
            max_width: 2,
            length_factor: 5,
            velocity_factor: 10,
            velocity_resolution: 10_000,
            splash_range: 20.0,
            splash_step: PI / 240.0,
            background: BACKGROUND,
            palette: RAIN_COLORS.to_vec(),
        }
    }
}

#[derive(Parser, Debug, Clone)]
#[command(name = "purple-rain", version, disable_version_flag = true)]
pub struct Args {
    #[arg(
        short = 'f',
        long = "fps",
        default_value_t = 60.0,
        help_heading = "GENERAL",
        help = "Target FPS (min 1 max 240)"
    )]
    pub fps: f64,

    #[arg(
        long = "duration",
        help_heading = "GENERAL",
        help = "Stop after N seconds (min 0.1 max 86400; <=0 disables)"
    )]
    pub duration: Option<f64>,

    #[arg(
        short = 's',
        long = "screensaver",
        help_heading = "GENERAL",
        help = "Screensaver mode (exit on any keypress)"
    )]
    pub screensaver: bool,

    #[arg(
        long = "seed",
        help_heading = "GENERAL",
        help = "Seed the random source (default: wall-clock seconds)"
    )]
    pub seed: Option<u64>,

    #[arg(
        long = "colormode",
        help_heading = "APPEARANCE",
        help = "Force color mode (allowed: 0,16,8/256,24/32). Default: 24-bit if supported (COLORTERM), else 8-bit"
    )]
    pub colormode: Option<u16>,

    #[arg(
        long = "perf-stats",
        help_heading = "PERFORMANCE",
        help = "Print frame time statistics on exit"
    )]
    pub perf_stats: bool,

    #[arg(
        long = "check-bitcolor",
        help_heading = "HELP",
        help = "Print detected terminal color capability and exit"
    )]
    pub check_bitcolor: bool,

    #[arg(
        long = "info",
        short = 'i',
        help_heading = "HELP",
        help = "Print version info and exit"
    )]
    pub info: bool,

    #[arg(
        long = "version",
        short = 'v',
        help_heading = "HELP",
        help = "Print version and exit"
    )]
    pub version: bool,
}

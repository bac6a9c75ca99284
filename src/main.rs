// Copyright (c) 2026 rezky_nightky

mod canvas;
mod cell;
mod config;
mod frame;
mod palette;
mod rain;
mod raindrop;
mod runtime;
mod splash;
mod terminal;

use std::env;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

#[cfg(unix)]
use std::thread;

use clap::builder::styling::{AnsiColor as ClapAnsiColor, Color as ClapColor};
use clap::builder::styling::{Effects as ClapEffects, Style as ClapStyle};
use clap::builder::Styles as ClapStyles;
use clap::{CommandFactory, FromArgMatches};

#[cfg(unix)]
use signal_hook::consts::{SIGHUP, SIGINT, SIGTERM};
#[cfg(unix)]
use signal_hook::iterator::Signals;

use crate::canvas::Renderer;
use crate::config::{default_params_usage_for_help, Args, Config};
use crate::rain::Rain;
use crate::runtime::{ColorMode, RainEvent};
use crate::terminal::{restore_terminal_best_effort, Terminal};

const HELP_TEMPLATE: &str = "\
{before-help}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}";

fn build_info() -> &'static str {
    env!("PURPLE_RAIN_BUILD")
}

fn clap_styles() -> ClapStyles {
    let bold = |c: ClapAnsiColor| {
        ClapStyle::new()
            .effects(ClapEffects::BOLD)
            .fg_color(Some(ClapColor::Ansi(c)))
    };
    ClapStyles::styled()
        .header(bold(ClapAnsiColor::Magenta))
        .usage(bold(ClapAnsiColor::Magenta))
        .literal(ClapStyle::new().fg_color(Some(ClapColor::Ansi(ClapAnsiColor::Yellow))))
}

fn require_f64_range(name: &str, v: f64, min: f64, max: f64) -> f64 {
    if !v.is_finite() {
        eprintln!("failed to apply {} {} (must be a finite number)", name, v);
        std::process::exit(1);
    }
    if v < min || v > max {
        eprintln!("failed to apply {} {} (min {} max {})", name, v, min, max);
        std::process::exit(1);
    }
    v
}

fn detect_color_mode_auto() -> ColorMode {
    let colorterm = env::var("COLORTERM")
        .unwrap_or_default()
        .to_ascii_lowercase();
    if colorterm.contains("truecolor") || colorterm.contains("24bit") {
        return ColorMode::TrueColor;
    }

    let term = env::var("TERM").unwrap_or_default().to_ascii_lowercase();
    if term == "dumb" {
        return ColorMode::Mono;
    }
    if term.contains("256color") {
        return ColorMode::Color256;
    }
    if term.is_empty() || term == "linux" || term.starts_with("vt") {
        return ColorMode::Color16;
    }

    ColorMode::Color256
}

fn detect_color_mode(args: &Args) -> ColorMode {
    match args.colormode {
        None => detect_color_mode_auto(),
        Some(0) => ColorMode::Mono,
        Some(16) => ColorMode::Color16,
        Some(8) | Some(256) => ColorMode::Color256,
        Some(24) | Some(32) => ColorMode::TrueColor,
        Some(m) => {
            eprintln!("invalid --colormode: {} (allowed: 0,16,8,256,24,32)", m);
            std::process::exit(1);
        }
    }
}

fn wall_clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

#[derive(Debug, Default)]
struct FrameStats {
    frames: u64,
    sum_ms: u64,
    max_ms: u32,
}

impl FrameStats {
    fn record(&mut self, frame_ms: u32) {
        self.frames = self.frames.saturating_add(1);
        self.sum_ms = self.sum_ms.saturating_add(frame_ms as u64);
        self.max_ms = self.max_ms.max(frame_ms);
    }

    fn print(&self, elapsed: Duration, active_splashes: usize) {
        let elapsed_s = elapsed.as_secs_f64().max(0.000_001);
        let frames = self.frames.max(1);
        println!("PERF STATS:");
        println!("  elapsed_s: {:.3}", elapsed_s);
        println!("  frames: {}", self.frames);
        println!("  avg_fps: {:.3}", self.frames as f64 / elapsed_s);
        println!(
            "  avg_frame_ms: {:.3}",
            self.sum_ms as f64 / frames as f64
        );
        println!("  max_frame_ms: {}", self.max_ms);
        println!("  active_splashes: {}", active_splashes);
    }
}

/// Clear, step, present, then look at one pending event. Returns once a quit
/// event arrives or `end_time` passes.
fn run<R: Renderer>(
    renderer: &mut R,
    rain: &mut Rain,
    stats: &mut FrameStats,
    end_time: Option<Instant>,
) -> std::io::Result<bool> {
    loop {
        if end_time.is_some_and(|end| Instant::now() >= end) {
            return Ok(false);
        }

        renderer.clear(rain.cfg.background);
        rain.step(&mut *renderer);
        renderer.present()?;
        stats.record(renderer.frame_time());

        if let Some(RainEvent::Quit) = renderer.poll_event()? {
            return Ok(true);
        }
    }
}

fn main() -> std::io::Result<()> {
    std::panic::set_hook(Box::new(|info| {
        restore_terminal_best_effort();
        eprintln!("{}", info);
    }));

    #[cfg(unix)]
    {
        if let Ok(mut signals) = Signals::new([SIGINT, SIGTERM, SIGHUP]) {
            thread::spawn(move || {
                if let Some(sig) = signals.forever().next() {
                    restore_terminal_best_effort();
                    std::process::exit(128 + sig);
                }
            });
        }
    }

    #[cfg(windows)]
    {
        if let Err(e) = ctrlc::set_handler(|| {
            restore_terminal_best_effort();
            std::process::exit(130);
        }) {
            eprintln!("failed to install Ctrl-C handler: {}", e);
        }
    }

    let cmd = Args::command()
        .styles(clap_styles())
        .before_help(default_params_usage_for_help())
        .help_template(HELP_TEMPLATE);
    let matches = cmd.get_matches();
    let args = Args::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());

    if args.check_bitcolor {
        let show = |name: &str| env::var(name).unwrap_or_else(|_| "(unset)".to_string());
        println!("COLORTERM={} TERM={}", show("COLORTERM"), show("TERM"));
        println!(
            "auto: {}, effective: {}",
            detect_color_mode_auto().label(),
            detect_color_mode(&args).label()
        );
        return Ok(());
    }

    if args.version {
        println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    if args.info {
        println!("{} v{} ({})", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"), build_info());
        println!("License: {}", env!("CARGO_PKG_LICENSE"));
        return Ok(());
    }

    let color_mode = detect_color_mode(&args);
    let target_fps = require_f64_range("--fps", args.fps, 1.0, 240.0);
    let duration = args.duration.and_then(|s| {
        if !s.is_finite() {
            eprintln!("failed to apply --duration {} (must be a finite number)", s);
            std::process::exit(1);
        }
        if s <= 0.0 {
            return None;
        }
        Some(require_f64_range("--duration", s, 0.1, 86400.0))
    });
    let seed = args.seed.unwrap_or_else(wall_clock_seed);

    let cfg = Config::default();
    let mut term = match Terminal::new(&cfg, color_mode, target_fps, args.screensaver) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("failed to initialize renderer: {}", e);
            std::process::exit(1);
        }
    };
    let mut rain = Rain::new(cfg, seed);

    let start_time = Instant::now();
    let end_time = duration.map(|s| start_time + Duration::from_secs_f64(s));
    let mut stats = FrameStats::default();

    let quit = run(&mut term, &mut rain, &mut stats, end_time);
    drop(term);

    if quit? {
        eprintln!("Received a signal to quit");
    }
    if args.perf_stats {
        stats.print(start_time.elapsed(), rain.active_splashes());
    }

    Ok(())
}

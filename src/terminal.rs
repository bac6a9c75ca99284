// Copyright (c) 2026 rezky_nightky

use std::io::{stdout, Result, Stdout, Write};
use std::thread;
use std::time::{Duration, Instant};

use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    style::{
        Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor,
    },
    terminal, ExecutableCommand, QueueableCommand,
};

use crate::canvas::{Canvas, Framebuffer, Renderer};
use crate::cell::Cell;
use crate::config::Config;
use crate::frame::Frame;
use crate::palette::Rgb;
use crate::runtime::{ColorMode, RainEvent};

struct LastFrame {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

/// Maps a key press to a loop event. `Esc`, `q` and `Ctrl-C` quit; in
/// screensaver mode every key does.
fn classify_key(k: KeyEvent, quit_on_any_key: bool) -> RainEvent {
    if quit_on_any_key {
        return RainEvent::Quit;
    }
    match (k.code, k.modifiers) {
        (KeyCode::Esc, _) | (KeyCode::Char('q'), _) => RainEvent::Quit,
        (KeyCode::Char('c'), m) if m.contains(KeyModifiers::CONTROL) => RainEvent::Quit,
        _ => RainEvent::Other,
    }
}

/// Whether the previously drawn frame can serve as the diff base.
fn can_diff(last: Option<&LastFrame>, width: u16, height: u16) -> bool {
    last.is_some_and(|l| l.width == width && l.height == height)
}

/// Renders the pixel canvas into the terminal using half-block cells.
pub struct Terminal {
    stdout: Stdout,
    canvas: Framebuffer,
    frame: Frame,
    last: Option<LastFrame>,
    run_buf: String,
    color_mode: ColorMode,
    background: Rgb,
    quit_on_any_key: bool,
    period: Duration,
    next_frame: Instant,
    last_present: Option<Instant>,
    frame_time_ms: u32,
}

impl Terminal {
    pub fn new(
        cfg: &Config,
        color_mode: ColorMode,
        fps: f64,
        quit_on_any_key: bool,
    ) -> Result<Self> {
        let mut out = stdout();
        terminal::enable_raw_mode()?;
        let init_res: Result<()> = (|| {
            out.execute(terminal::EnterAlternateScreen)?;
            out.execute(cursor::Hide)?;
            let _ = out.execute(terminal::DisableLineWrap);
            let _ = out.execute(terminal::SetTitle(cfg.title.as_str()));
            out.execute(SetAttribute(Attribute::Reset))?;
            out.execute(ResetColor)?;
            out.execute(terminal::Clear(terminal::ClearType::All))?;
            out.flush()?;
            Ok(())
        })();
        if let Err(e) = init_res {
            restore_terminal_best_effort();
            return Err(e);
        }

        let (w, h) = match terminal::size() {
            Ok(size) => size,
            Err(e) => {
                restore_terminal_best_effort();
                return Err(e);
            }
        };

        Ok(Self {
            stdout: out,
            canvas: Framebuffer::new(cfg.width, cfg.height, cfg.background),
            frame: Frame::new(w, h),
            last: None,
            run_buf: String::with_capacity(64),
            color_mode,
            background: cfg.background,
            quit_on_any_key,
            period: Duration::from_secs_f64(1.0 / fps.max(1.0)),
            next_frame: Instant::now(),
            last_present: None,
            frame_time_ms: 0,
        })
    }

    fn resize(&mut self, w: u16, h: u16) {
        self.frame = Frame::new(w, h);
        self.last = None;
    }

    fn queue_style(
        &mut self,
        cell: Cell,
        cur_fg: &mut Option<Option<Color>>,
        cur_bg: &mut Option<Option<Color>>,
    ) -> Result<()> {
        if *cur_fg != Some(cell.fg) {
            self.stdout
                .queue(SetForegroundColor(cell.fg.unwrap_or(Color::Reset)))?;
            *cur_fg = Some(cell.fg);
        }
        if *cur_bg != Some(cell.bg) {
            self.stdout
                .queue(SetBackgroundColor(cell.bg.unwrap_or(Color::Reset)))?;
            *cur_bg = Some(cell.bg);
        }
        Ok(())
    }

    fn draw(&mut self) -> Result<()> {
        let mut cur_fg: Option<Option<Color>> = None;
        let mut cur_bg: Option<Option<Color>> = None;

        let (width, height) = (self.frame.width, self.frame.height);
        let reuse_last = can_diff(self.last.as_ref(), width, height);
        let total_cells = width as usize * height as usize;
        let dirty_is_large =
            total_cells > 0 && self.frame.dirty_indices().len() >= total_cells / 3;

        if !reuse_last || self.frame.is_dirty_all() || dirty_is_large {
            if !reuse_last {
                self.stdout
                    .queue(terminal::Clear(terminal::ClearType::All))?;
            }
            let mut cells = Vec::with_capacity(total_cells);
            for y in 0..height {
                self.stdout.queue(cursor::MoveTo(0, y))?;
                for x in 0..width {
                    let idx = y as usize * width as usize + x as usize;
                    let cell = self.frame.cell_at_index(idx);
                    self.queue_style(cell, &mut cur_fg, &mut cur_bg)?;
                    self.stdout.queue(Print(cell.ch))?;
                    cells.push(cell);
                }
            }
            self.last = Some(LastFrame {
                width,
                height,
                cells,
            });
        } else {
            let mut dirty = self.frame.dirty_indices().to_vec();
            dirty.sort_unstable();
            let w = width as usize;
            let mut cur_pos: Option<usize> = None;

            let mut i = 0usize;
            while i < dirty.len() {
                let idx0 = dirty[i];
                let cell0 = self.frame.cell_at_index(idx0);
                let Some(last) = self.last.as_mut() else {
                    break;
                };
                if last.cells[idx0] == cell0 {
                    i += 1;
                    continue;
                }
                last.cells[idx0] = cell0;

                // Batch neighbours on the same row that share a style.
                self.run_buf.clear();
                self.run_buf.push(cell0.ch);
                let mut end = idx0;
                let mut j = i + 1;
                while j < dirty.len() {
                    let idx1 = dirty[j];
                    if idx1 != end + 1 || idx1 % w == 0 {
                        break;
                    }
                    let cell1 = self.frame.cell_at_index(idx1);
                    if last.cells[idx1] == cell1
                        || cell1.fg != cell0.fg
                        || cell1.bg != cell0.bg
                    {
                        break;
                    }
                    last.cells[idx1] = cell1;
                    self.run_buf.push(cell1.ch);
                    end = idx1;
                    j += 1;
                }

                if cur_pos != Some(idx0) {
                    self.stdout
                        .queue(cursor::MoveTo((idx0 % w) as u16, (idx0 / w) as u16))?;
                }
                self.queue_style(cell0, &mut cur_fg, &mut cur_bg)?;
                self.stdout.queue(Print(self.run_buf.as_str()))?;
                cur_pos = if (end + 1) % w == 0 { None } else { Some(end + 1) };

                i = j;
            }
        }

        self.stdout.queue(SetAttribute(Attribute::Reset))?;
        self.stdout.queue(ResetColor)?;
        self.stdout.flush()?;
        self.frame.clear_dirty();
        Ok(())
    }
}

impl Canvas for Terminal {
    fn draw_line(&mut self, color: Rgb, x0: f64, y0: f64, x1: f64, y1: f64) {
        self.canvas.draw_line(color, x0, y0, x1, y1);
    }
}

impl Renderer for Terminal {
    fn clear(&mut self, color: Rgb) {
        self.canvas.clear(color);
    }

    fn present(&mut self) -> Result<()> {
        self.frame
            .downsample(&self.canvas, self.color_mode, self.background);
        if self.frame.is_dirty_all() || !self.frame.dirty_indices().is_empty() {
            self.draw()?;
        }

        let now = Instant::now();
        if self.next_frame > now {
            thread::sleep(self.next_frame - now);
        }
        self.next_frame += self.period;
        let now = Instant::now();
        if now > self.next_frame {
            self.next_frame = now;
        }

        if let Some(prev) = self.last_present {
            self.frame_time_ms = now.saturating_duration_since(prev).as_millis() as u32;
        }
        self.last_present = Some(now);
        Ok(())
    }

    fn poll_event(&mut self) -> Result<Option<RainEvent>> {
        if !event::poll(Duration::from_millis(0))? {
            return Ok(None);
        }
        let ev = match event::read()? {
            Event::Resize(w, h) => {
                self.resize(w, h);
                RainEvent::Resize
            }
            Event::Key(k) if k.kind == KeyEventKind::Press => classify_key(k, self.quit_on_any_key),
            _ => RainEvent::Other,
        };
        Ok(Some(ev))
    }

    fn frame_time(&self) -> u32 {
        self.frame_time_ms
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        let _ = self.stdout.execute(SetAttribute(Attribute::Reset));
        let _ = self.stdout.execute(ResetColor);
        let _ = self.stdout.execute(cursor::Show);
        let _ = self.stdout.execute(terminal::EnableLineWrap);
        let _ = self.stdout.execute(terminal::LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
        let _ = self.stdout.flush();
    }
}

pub fn restore_terminal_best_effort() {
    let mut out = stdout();
    let _ = out.execute(SetAttribute(Attribute::Reset));
    let _ = out.execute(ResetColor);
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::EnableLineWrap);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();
    let _ = out.flush();
}

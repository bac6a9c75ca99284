// Copyright (c) 2026 rezky_nightky

use crossterm::style::Color;

const UPPER_HALF: char = '\u{2580}';
const LOWER_HALF: char = '\u{2584}';

/// One terminal cell, holding two stacked sub-pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub fg: Option<Color>,
    pub bg: Option<Color>,
}

impl Cell {
    pub fn blank_with_bg(bg: Option<Color>) -> Self {
        Self { ch: ' ', fg: None, bg }
    }

    pub fn from_halves(upper: Option<Color>, lower: Option<Color>) -> Self {
        match (upper, lower) {
            (u, l) if u == l => Self::blank_with_bg(u),
            (Some(u), l) => Self {
                ch: UPPER_HALF,
                fg: Some(u),
                bg: l,
            },
            (None, l) => Self {
                ch: LOWER_HALF,
                fg: l,
                bg: None,
            },
        }
    }
}

// Copyright (c) 2026 rezky_nightky

use crossterm::style::Color;

use crate::runtime::ColorMode;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    fn dist2(self, other: Rgb) -> i32 {
        let dr = (self.r as i32) - (other.r as i32);
        let dg = (self.g as i32) - (other.g as i32);
        let db = (self.b as i32) - (other.b as i32);
        (dr * dr) + (dg * dg) + (db * db)
    }

    /// Terminal color for this pixel. `None` means "leave the terminal default",
    /// which is how mono mode shows the background.
    pub fn to_term(self, mode: ColorMode, background: Rgb) -> Option<Color> {
        match mode {
            ColorMode::TrueColor => Some(Color::Rgb {
                r: self.r,
                g: self.g,
                b: self.b,
            }),
            ColorMode::Color256 => Some(Color::AnsiValue(to_ansi256(self))),
            ColorMode::Color16 => Some(to_color16(self)),
            ColorMode::Mono => (self != background).then_some(Color::White),
        }
    }
}

pub const BACKGROUND: Rgb = Rgb::new(73, 55, 84);

pub const RAIN_COLORS: [Rgb; 4] = [
    Rgb::new(145, 124, 155),
    Rgb::new(155, 123, 149),
    Rgb::new(130, 111, 139),
    Rgb::new(167, 154, 173),
];

fn to_ansi256(c: Rgb) -> u8 {
    const CUBE_LEVELS: [u8; 6] = [0, 95, 135, 175, 215, 255];

    let level = |v: u8| ((v as u16 * 5 + 127) / 255) as u8;
    let (r6, g6, b6) = (level(c.r), level(c.g), level(c.b));
    let cube = Rgb::new(
        CUBE_LEVELS[r6 as usize],
        CUBE_LEVELS[g6 as usize],
        CUBE_LEVELS[b6 as usize],
    );
    let cube_idx = 16 + 36 * r6 + 6 * g6 + b6;

    let avg = ((c.r as u16 + c.g as u16 + c.b as u16) / 3) as u8;
    let (gray_idx, gray) = match avg {
        0..=7 => (16, Rgb::new(0, 0, 0)),
        239..=255 => (231, Rgb::new(255, 255, 255)),
        _ => {
            let step = (avg - 8) / 10;
            let v = 8 + 10 * step;
            (232 + step, Rgb::new(v, v, v))
        }
    };

    if c.dist2(gray) < c.dist2(cube) {
        gray_idx
    } else {
        cube_idx
    }
}

fn to_color16(c: Rgb) -> Color {
    const TABLE: [(Color, Rgb); 16] = [
        (Color::Black, Rgb::new(0, 0, 0)),
        (Color::DarkGrey, Rgb::new(128, 128, 128)),
        (Color::Grey, Rgb::new(192, 192, 192)),
        (Color::White, Rgb::new(255, 255, 255)),
        (Color::DarkRed, Rgb::new(128, 0, 0)),
        (Color::Red, Rgb::new(255, 0, 0)),
        (Color::DarkGreen, Rgb::new(0, 128, 0)),
        (Color::Green, Rgb::new(0, 255, 0)),
        (Color::DarkBlue, Rgb::new(0, 0, 128)),
        (Color::Blue, Rgb::new(0, 0, 255)),
        (Color::DarkCyan, Rgb::new(0, 128, 128)),
        (Color::Cyan, Rgb::new(0, 255, 255)),
        (Color::DarkMagenta, Rgb::new(128, 0, 128)),
        (Color::Magenta, Rgb::new(255, 0, 255)),
        (Color::DarkYellow, Rgb::new(128, 128, 0)),
        (Color::Yellow, Rgb::new(255, 255, 0)),
    ];

    TABLE
        .iter()
        .min_by_key(|(_, rgb)| c.dist2(*rgb))
        .map(|(color, _)| *color)
        .unwrap_or(Color::White)
}

// Copyright (c) 2026 rezky_nightky

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColorMode {
    Mono,
    Color16,
    Color256,
    TrueColor,
}

impl ColorMode {
    pub fn label(self) -> &'static str {
        match self {
            ColorMode::TrueColor => "24-bit truecolor",
            ColorMode::Color256 => "8-bit (256-color)",
            ColorMode::Color16 => "16-color",
            ColorMode::Mono => "mono",
        }
    }
}

/// Input the renderer hands back to the main loop, at most one per frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RainEvent {
    Quit,
    /// Already applied by the renderer; the simulation canvas keeps its size.
    Resize,
    Other,
}

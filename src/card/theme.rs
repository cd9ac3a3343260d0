/// 8-bit RGBA color kept as plain data so themes can be `const`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    pub fn to_skia(self) -> tiny_skia::Color {
        tiny_skia::Color::from_rgba8(self.r, self.g, self.b, self.a)
    }

    /// Same color with its alpha scaled by `opacity` (0.0..=1.0).
    pub fn faded(self, opacity: f32) -> Self {
        let a = (self.a as f32 * opacity.clamp(0.0, 1.0)).round() as u8;
        self.with_alpha(a)
    }
}

const fn rgb(r: u8, g: u8, b: u8) -> Rgba {
    Rgba::rgb(r, g, b)
}

/// How the card background is painted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Background {
    Solid(Rgba),
    /// Three-stop diagonal gradient using [`GRADIENT_STOPS`].
    Gradient,
}

/// Stop colors of the gradient background, top-left to bottom-right.
pub const GRADIENT_STOPS: [(f32, Rgba); 3] = [
    (0.0, rgb(0x66, 0x7E, 0xEA)),
    (0.5, rgb(0x76, 0x4B, 0xA2)),
    (1.0, rgb(0xF0, 0x93, 0xFB)),
];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Theme {
    pub name: &'static str,
    pub background: Background,
    pub primary_text: Rgba,
    pub secondary_text: Rgba,
    pub border: Rgba,
    pub is_dark: bool,
}

pub const DEFAULT_THEME: &str = "dark";

pub const DARK: Theme = Theme {
    name: "dark",
    background: Background::Solid(rgb(0x0D, 0x11, 0x17)),
    primary_text: rgb(0xFF, 0xFF, 0xFF),
    secondary_text: rgb(0xC9, 0xD1, 0xD9),
    border: rgb(0xE1, 0xE4, 0xE8),
    is_dark: true,
};

pub const LIGHT: Theme = Theme {
    name: "light",
    background: Background::Solid(rgb(0xFF, 0xFF, 0xFF)),
    primary_text: rgb(0x24, 0x29, 0x2F),
    secondary_text: rgb(0x57, 0x60, 0x6A),
    border: rgb(0xD0, 0xD7, 0xDE),
    is_dark: false,
};

pub const GRADIENT: Theme = Theme {
    name: "gradient",
    background: Background::Gradient,
    primary_text: rgb(0xFF, 0xFF, 0xFF),
    secondary_text: rgb(0xF3, 0xF4, 0xF6),
    border: rgb(0xFF, 0xFF, 0xFF),
    is_dark: true,
};

pub const CYBERPUNK: Theme = Theme {
    name: "cyberpunk",
    background: Background::Solid(rgb(0x0A, 0x0E, 0x27)),
    primary_text: rgb(0x00, 0xFF, 0xF7),
    secondary_text: rgb(0xFF, 0x6E, 0xC7),
    border: rgb(0xFF, 0x00, 0xFF),
    is_dark: true,
};

pub const THEMES: [Theme; 4] = [DARK, LIGHT, GRADIENT, CYBERPUNK];

impl Theme {
    /// Look a theme up by name, falling back to `dark` for anything unknown.
    pub fn by_name(name: &str) -> Theme {
        THEMES
            .iter()
            .find(|t| t.name.eq_ignore_ascii_case(name.trim()))
            .copied()
            .unwrap_or(DARK)
    }

    pub fn names() -> impl Iterator<Item = &'static str> {
        THEMES.iter().map(|t| t.name)
    }

    /// Opacity of the watermark, fainter on light backgrounds.
    pub fn watermark_opacity(&self) -> f32 {
        if self.is_dark {
            0.6
        } else {
            0.45
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        DARK
    }
}

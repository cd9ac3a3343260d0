//! Fixed card geometry and the text layout helpers built on it.
//!
//! The card is a 1200×630 canvas cut into four equal quadrants. Every drawing
//! step receives a quadrant and lays itself out inside it.

pub const CANVAS_WIDTH: u32 = 1200;
pub const CANVAS_HEIGHT: u32 = 630;

pub const QUADRANT_WIDTH: f32 = 600.0;
pub const QUADRANT_HEIGHT: f32 = 315.0;

/// Horizontal inset applied inside a quadrant.
pub const PADDING: f32 = 60.0;

pub const ELLIPSIS: &str = "…";

/// Rectangle covering one quarter of the canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quadrant {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Quadrant {
    const fn at(x: f32, y: f32) -> Self {
        Quadrant {
            x,
            y,
            width: QUADRANT_WIDTH,
            height: QUADRANT_HEIGHT,
        }
    }

    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }

    pub fn center_y(&self) -> f32 {
        self.y + self.height / 2.0
    }

    /// Width left for content once [`PADDING`] is removed on both sides.
    pub fn usable_width(&self) -> f32 {
        self.width - PADDING * 2.0
    }
}

/// Top-left
pub const Q1: Quadrant = Quadrant::at(0.0, 0.0);
/// Top-right
pub const Q2: Quadrant = Quadrant::at(QUADRANT_WIDTH, 0.0);
/// Bottom-left
pub const Q3: Quadrant = Quadrant::at(0.0, QUADRANT_HEIGHT);
/// Bottom-right
pub const Q4: Quadrant = Quadrant::at(QUADRANT_WIDTH, QUADRANT_HEIGHT);

// Repo info block (Q1)
pub const HEADER_FONT_SIZE: f32 = 56.0;
pub const HEADER_TOP: f32 = 48.0;
pub const DESCRIPTION_GAP: f32 = 24.0;
pub const DESCRIPTION_FONT_SIZE: f32 = 24.0;
pub const DESCRIPTION_LINE_HEIGHT: f32 = 1.4;

/// Number of description lines that fit under the two header lines.
///
/// Computed from the fixed font sizes, never from measured glyph heights.
pub fn max_description_lines(quadrant: &Quadrant) -> usize {
    let used = HEADER_TOP + HEADER_FONT_SIZE * 2.0 + DESCRIPTION_GAP;
    let available = quadrant.height - used;
    let line = DESCRIPTION_FONT_SIZE * DESCRIPTION_LINE_HEIGHT;

    if available <= 0.0 {
        0
    } else {
        (available / line).floor() as usize
    }
}

/// Abbreviate a counter: `999 -> "999"`, `1000 -> "1.0k"`, `212000 -> "212.0k"`.
pub fn format_count(value: u64) -> String {
    if value >= 1000 {
        format!("{:.1}k", value as f64 / 1000.0)
    } else {
        value.to_string()
    }
}

/// Shorten `text` with an ellipsis until it fits in `max_width` pixels.
pub fn truncate_to_width(text: &str, max_width: f32, measure: impl Fn(&str) -> f32) -> String {
    if measure(text) <= max_width {
        return text.to_string();
    }

    let chars: Vec<char> = text.chars().collect();
    let mut keep = chars.len();
    while keep > 0 {
        keep -= 1;
        let candidate: String = chars[..keep]
            .iter()
            .collect::<String>()
            .trim_end()
            .to_string()
            + ELLIPSIS;
        if measure(&candidate) <= max_width {
            return candidate;
        }
    }

    if measure(ELLIPSIS) <= max_width {
        ELLIPSIS.to_string()
    } else {
        String::new()
    }
}

/// Greedily pack words into lines no wider than `max_width`.
///
/// A single word wider than the line on its own is cut with an ellipsis, so no
/// returned line exceeds `max_width`.
pub fn wrap_text(text: &str, max_width: f32, measure: impl Fn(&str) -> f32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{} {}", current, word)
        };

        if measure(&candidate) > max_width && !current.is_empty() {
            lines.push(std::mem::replace(&mut current, word.to_string()));
        } else {
            current = candidate;
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }

    lines
        .into_iter()
        .map(|line| truncate_to_width(&line, max_width, &measure))
        .collect()
}

/// Wrap a description and cap it at `max_lines`, marking the cut with an ellipsis.
pub fn clamp_lines(
    text: &str,
    max_width: f32,
    max_lines: usize,
    measure: impl Fn(&str) -> f32,
) -> Vec<String> {
    let mut lines = wrap_text(text, max_width, &measure);
    if lines.len() <= max_lines {
        return lines;
    }

    lines.truncate(max_lines);
    if let Some(last) = lines.last_mut() {
        let marked = format!("{}{}", last.trim_end_matches(ELLIPSIS), ELLIPSIS);
        *last = truncate_to_width(&marked, max_width, &measure);
    }
    lines
}

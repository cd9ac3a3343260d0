//! Social card rendering.
//!
//! A card is a pure function of (repository, theme, watermark flag). The
//! renderer paints onto a fresh 1200×630 surface per request, so concurrent or
//! superseded renders never share pixels.

pub mod assets;
pub mod images;
pub mod layout;
pub mod render;
pub mod surface;
pub mod text;
pub mod theme;

pub use images::{HttpImageLoader, ImageLoader, StaticImageLoader};
pub use render::{Card, CardRenderer, CardRequest};
pub use text::{Typography, Weight};
pub use theme::{Background, Rgba, Theme};

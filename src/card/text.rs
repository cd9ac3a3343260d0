use std::path::Path;
use std::sync::Arc;

use fontdue::{Font, FontSettings};
use resvg::usvg::fontdb;
use tracing::{info, warn};

use crate::error::{Result, SnapRepoError};

/// Advance per character, in em, used when no font face is available.
const FALLBACK_ADVANCE_EM: f32 = 0.55;
/// Ascent, in em, used when no font face is available.
const FALLBACK_ASCENT_EM: f32 = 0.8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Weight {
    Regular,
    Bold,
}

/// Font faces used to measure and rasterize card text.
///
/// Without faces, text is measured with fixed per-character metrics and
/// glyphs are not painted; layout stays deterministic either way.
#[derive(Clone, Default)]
pub struct Typography {
    regular: Option<Arc<Font>>,
    bold: Option<Arc<Font>>,
}

impl std::fmt::Debug for Typography {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Typography")
            .field("regular", &self.regular.is_some())
            .field("bold", &self.bold.is_some())
            .finish()
    }
}

impl Typography {
    /// Fixed metrics only.
    pub fn fallback() -> Self {
        Typography::default()
    }

    /// Load a single font file, used for both weights.
    pub fn from_file(path: &Path) -> Result<Self> {
        let data = std::fs::read(path)?;
        let font = Arc::new(parse_font(&data, 0)?);
        info!(path = %path.display(), "loaded card font");
        Ok(Typography {
            regular: Some(font.clone()),
            bold: Some(font),
        })
    }

    /// Find a sans-serif face among the installed system fonts.
    pub fn system() -> Self {
        let mut db = fontdb::Database::new();
        db.load_system_fonts();

        let regular = query_face(&db, fontdb::Weight::NORMAL);
        let bold = query_face(&db, fontdb::Weight::BOLD).or_else(|| regular.clone());

        if regular.is_none() {
            warn!("no system sans-serif font found, card text will not be painted");
        }

        Typography { regular, bold }
    }

    /// Explicit font file when given, system discovery otherwise.
    pub fn resolve(font_path: Option<&Path>) -> Result<Self> {
        match font_path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::system()),
        }
    }

    pub fn has_faces(&self) -> bool {
        self.regular.is_some()
    }

    pub(crate) fn face(&self, weight: Weight) -> Option<&Arc<Font>> {
        match weight {
            Weight::Regular => self.regular.as_ref(),
            Weight::Bold => self.bold.as_ref().or(self.regular.as_ref()),
        }
    }

    /// Width of `text` in pixels at `size`.
    pub fn measure(&self, text: &str, size: f32, weight: Weight) -> f32 {
        match self.face(weight) {
            Some(font) => text
                .chars()
                .map(|c| font.metrics(c, size).advance_width)
                .sum(),
            None => text.chars().count() as f32 * size * FALLBACK_ADVANCE_EM,
        }
    }

    /// Distance from the top of a text line to its baseline.
    pub fn ascent(&self, size: f32, weight: Weight) -> f32 {
        self.face(weight)
            .and_then(|font| font.horizontal_line_metrics(size))
            .map(|m| m.ascent)
            .unwrap_or(size * FALLBACK_ASCENT_EM)
    }
}

fn parse_font(data: &[u8], collection_index: u32) -> Result<Font> {
    let settings = FontSettings {
        collection_index,
        ..FontSettings::default()
    };
    Font::from_bytes(data, settings).map_err(|e| SnapRepoError::Render(e.to_string()))
}

fn query_face(db: &fontdb::Database, weight: fontdb::Weight) -> Option<Arc<Font>> {
    let id = db.query(&fontdb::Query {
        families: &[fontdb::Family::SansSerif],
        weight,
        ..fontdb::Query::default()
    })?;

    db.with_face_data(id, |data, index| parse_font(data, index).ok())
        .flatten()
        .map(Arc::new)
}

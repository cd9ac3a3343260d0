use std::path::Path;

use futures::stream::{FuturesUnordered, StreamExt};
use tiny_skia::Pixmap;
use tracing::{debug, info};

use super::assets::{self, StatIcon};
use super::images::ImageLoader;
use super::layout::{
    clamp_lines, format_count, max_description_lines, truncate_to_width, Quadrant,
    CANVAS_HEIGHT, CANVAS_WIDTH, DESCRIPTION_FONT_SIZE, DESCRIPTION_GAP,
    DESCRIPTION_LINE_HEIGHT, HEADER_FONT_SIZE, HEADER_TOP, PADDING, Q1, Q2, Q3, Q4,
};
use super::surface::Surface;
use super::text::{Typography, Weight};
use super::theme::{Background, Rgba, Theme, GRADIENT_STOPS};
use crate::error::{Result, SnapRepoError};
use crate::models::Repository;

// Avatar (Q2)
const AVATAR_RADIUS: f32 = 100.0;
const AVATAR_BORDER: f32 = 3.0;

// Stats row (Q3)
const STAT_ICON_SIZE: f32 = 24.0;
const STAT_NUMBER_SIZE: f32 = 24.0;
const STAT_LABEL_SIZE: f32 = 18.0;
const STAT_ICON_GAP: f32 = 8.0;
const STAT_LABEL_GAP: f32 = 10.0;

// Language badges (Q4)
const MAX_BADGES: usize = 3;
const BADGE_HEIGHT: f32 = 44.0;
const BADGE_FONT_SIZE: f32 = 20.0;
const BADGE_PADDING: f32 = 16.0;
const BADGE_ICON_SIZE: f32 = 24.0;
const BADGE_ICON_GAP: f32 = 8.0;
const BADGE_GAP: f32 = 16.0;
const BADGE_LETTER_SIZE: f32 = 14.0;

// Watermark (bottom-right corner)
const WATERMARK_TEXT: &str = "SnapRepo";
const WATERMARK_FONT_SIZE: f32 = 20.0;
const WATERMARK_LOGO_SIZE: f32 = 28.0;
const WATERMARK_MARGIN: f32 = 24.0;

/// Icons are rasterized at twice their drawn size.
const ICON_OVERSAMPLE: u32 = 2;

const INK_DARK: Rgba = Rgba::rgb(0x0D, 0x11, 0x17);
const INK_LIGHT: Rgba = Rgba::rgb(0xFF, 0xFF, 0xFF);

/// Inputs of a single card render.
#[derive(Debug, Clone)]
pub struct CardRequest {
    pub repository: Repository,
    pub theme: Theme,
    pub watermark: bool,
}

impl CardRequest {
    /// Build a request, resolving the theme by name (unknown names fall back to dark).
    pub fn new(repository: Repository, theme_name: &str, watermark: bool) -> Self {
        CardRequest {
            repository,
            theme: Theme::by_name(theme_name),
            watermark,
        }
    }
}

/// Finished card raster.
#[derive(Debug, Clone)]
pub struct Card {
    pixmap: Pixmap,
    theme: &'static str,
}

impl Card {
    pub const FILE_NAME: &'static str = "snaprepo-image.png";

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    pub fn theme(&self) -> &'static str {
        self.theme
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    pub fn encode_png(&self) -> Result<Vec<u8>> {
        self.pixmap
            .encode_png()
            .map_err(|e| SnapRepoError::Render(format!("PNG encoding failed: {}", e)))
    }

    pub fn save_png(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.encode_png()?)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy)]
enum Layer {
    Avatar,
    LanguageIcon(usize),
}

/// Where a language badge's icon goes once it has loaded.
#[derive(Debug, Clone)]
struct IconSlot {
    language: String,
    cx: f32,
    cy: f32,
    url: Option<String>,
}

/// Paints repository cards onto a fresh surface per request.
pub struct CardRenderer<L> {
    loader: L,
    typography: Typography,
}

impl<L: ImageLoader> CardRenderer<L> {
    pub fn new(loader: L, typography: Typography) -> Self {
        CardRenderer { loader, typography }
    }

    pub fn typography(&self) -> &Typography {
        &self.typography
    }

    pub async fn render(&self, request: &CardRequest) -> Result<Card> {
        let card = self.render_while(request, || true).await?;
        card.ok_or_else(|| SnapRepoError::Render("render cancelled".to_string()))
    }

    /// Render, giving up as soon as `keep_going` turns false.
    ///
    /// Base layers are painted first. The avatar and language icons are then
    /// loaded concurrently and each completion paints only its own layer, in
    /// whatever order they arrive. Branding is painted last. A load failure
    /// degrades its layer and never fails the render.
    pub async fn render_while<K>(&self, request: &CardRequest, keep_going: K) -> Result<Option<Card>>
    where
        K: Fn() -> bool,
    {
        let theme = &request.theme;
        let repo = &request.repository;
        let mut surface = Surface::new(CANVAS_WIDTH, CANVAS_HEIGHT, self.typography.clone())?;

        draw_background(&mut surface, theme)?;
        draw_repo_info(&mut surface, repo, &Q1, theme);
        draw_stats(&mut surface, repo, &Q3, theme);
        let slots = draw_language_badges(&mut surface, repo, &Q4, theme);

        let mut pending = FuturesUnordered::new();
        if !repo.avatar_url.is_empty() {
            pending.push(load_layer(&self.loader, Layer::Avatar, repo.avatar_url.clone()));
        }
        for (index, slot) in slots.iter().enumerate() {
            match &slot.url {
                Some(url) => pending.push(load_layer(&self.loader, Layer::LanguageIcon(index), url.clone())),
                None => draw_letter_icon(&mut surface, slot, theme),
            }
        }

        while let Some((layer, loaded)) = pending.next().await {
            if !keep_going() {
                debug!(repo = %repo.name, "render superseded, dropping pending image layers");
                return Ok(None);
            }

            match (layer, loaded) {
                (Layer::Avatar, Ok(image)) => draw_avatar(&mut surface, &image, &Q2, theme),
                (Layer::Avatar, Err(e)) => {
                    debug!(url = %repo.avatar_url, error = %e, "avatar unavailable, skipping");
                }
                (Layer::LanguageIcon(index), Ok(image)) => {
                    draw_icon_image(&mut surface, &slots[index], &image);
                }
                (Layer::LanguageIcon(index), Err(e)) => {
                    debug!(language = %slots[index].language, error = %e, "language icon unavailable");
                    draw_letter_icon(&mut surface, &slots[index], theme);
                }
            }
        }

        if !keep_going() {
            return Ok(None);
        }

        if request.watermark {
            draw_watermark(&mut surface, theme);
        }

        info!(owner = %repo.owner, repo = %repo.name, theme = theme.name, "card rendered");
        Ok(Some(Card {
            pixmap: surface.into_pixmap(),
            theme: theme.name,
        }))
    }
}

async fn load_layer<L: ImageLoader>(loader: &L, layer: Layer, url: String) -> (Layer, Result<Pixmap>) {
    let loaded = loader.load(&url).await;
    (layer, loaded)
}

fn draw_background(surface: &mut Surface, theme: &Theme) -> Result<()> {
    match theme.background {
        Background::Solid(color) => {
            surface.fill(color);
            Ok(())
        }
        Background::Gradient => surface.fill_gradient(&GRADIENT_STOPS),
    }
}

fn draw_avatar(surface: &mut Surface, image: &Pixmap, quadrant: &Quadrant, theme: &Theme) {
    let cx = quadrant.center_x();
    let cy = quadrant.y + quadrant.height * 0.55;

    surface.draw_image_in_circle(image, cx, cy, AVATAR_RADIUS);
    surface.stroke_circle(cx, cy, AVATAR_RADIUS, AVATAR_BORDER, theme.border);
}

fn draw_repo_info(surface: &mut Surface, repo: &Repository, quadrant: &Quadrant, theme: &Theme) {
    let max_width = quadrant.usable_width();
    let x = quadrant.x + PADDING;
    let mut y = quadrant.y + HEADER_TOP;

    let owner = {
        let typography = surface.typography();
        truncate_to_width(&format!("{} / ", repo.owner), max_width, |t| {
            typography.measure(t, HEADER_FONT_SIZE, Weight::Regular)
        })
    };
    surface.fill_text(&owner, x, y, HEADER_FONT_SIZE, Weight::Regular, theme.secondary_text);
    y += HEADER_FONT_SIZE;

    let name = {
        let typography = surface.typography();
        truncate_to_width(&repo.name, max_width, |t| {
            typography.measure(t, HEADER_FONT_SIZE, Weight::Bold)
        })
    };
    surface.fill_text(&name, x, y, HEADER_FONT_SIZE, Weight::Bold, theme.primary_text);
    y += HEADER_FONT_SIZE + DESCRIPTION_GAP;

    let description = repo.description.as_deref().unwrap_or_default();
    let lines = {
        let typography = surface.typography();
        clamp_lines(description, max_width, max_description_lines(quadrant), |t| {
            typography.measure(t, DESCRIPTION_FONT_SIZE, Weight::Regular)
        })
    };

    for line in lines {
        surface.fill_text(&line, x, y, DESCRIPTION_FONT_SIZE, Weight::Regular, theme.secondary_text);
        y += DESCRIPTION_FONT_SIZE * DESCRIPTION_LINE_HEIGHT;
    }
}

fn draw_stats(surface: &mut Surface, repo: &Repository, quadrant: &Quadrant, theme: &Theme) {
    let items = [
        (StatIcon::Star, repo.stars, "Stars"),
        (StatIcon::Fork, repo.forks, "Forks"),
        (StatIcon::Issues, repo.issues, "Issues"),
    ];

    let slot_width = quadrant.width / items.len() as f32;
    let center_y = quadrant.center_y();

    for (index, (icon, value, label)) in items.into_iter().enumerate() {
        let center_x = quadrant.x + slot_width * index as f32 + slot_width / 2.0;
        draw_stat_item(surface, icon, value, label, center_x, center_y, theme);
    }
}

fn draw_stat_item(
    surface: &mut Surface,
    icon: StatIcon,
    value: u64,
    label: &str,
    center_x: f32,
    center_y: f32,
    theme: &Theme,
) {
    let number = format_count(value);
    let number_width = surface.measure_text(&number, STAT_NUMBER_SIZE, Weight::Bold);
    let label_width = surface.measure_text(label, STAT_LABEL_SIZE, Weight::Regular);

    let top_row_width = STAT_ICON_SIZE + STAT_ICON_GAP + number_width;
    let top_row_height = STAT_ICON_SIZE.max(STAT_NUMBER_SIZE);
    let total_height = top_row_height + STAT_LABEL_GAP + STAT_LABEL_SIZE;

    let start_x = center_x - top_row_width / 2.0;
    let start_y = center_y - total_height / 2.0;

    match icon.rasterize(theme.primary_text, STAT_ICON_SIZE as u32 * ICON_OVERSAMPLE) {
        Ok(image) => surface.draw_image(&image, start_x, start_y, STAT_ICON_SIZE, STAT_ICON_SIZE, 1.0),
        Err(e) => debug!(?icon, error = %e, "stat icon unavailable"),
    }

    surface.fill_text(
        &number,
        start_x + STAT_ICON_SIZE + STAT_ICON_GAP,
        start_y,
        STAT_NUMBER_SIZE,
        Weight::Bold,
        theme.primary_text,
    );
    surface.fill_text(
        label,
        center_x - label_width / 2.0,
        start_y + top_row_height + STAT_LABEL_GAP,
        STAT_LABEL_SIZE,
        Weight::Regular,
        theme.secondary_text,
    );
}

/// Paint badge backgrounds and labels; icons are filled in later.
fn draw_language_badges(
    surface: &mut Surface,
    repo: &Repository,
    quadrant: &Quadrant,
    theme: &Theme,
) -> Vec<IconSlot> {
    let languages: Vec<&String> = repo
        .top_languages
        .iter()
        .flatten()
        .take(MAX_BADGES)
        .collect();
    if languages.is_empty() {
        return Vec::new();
    }

    let chrome = BADGE_PADDING * 2.0 + BADGE_ICON_SIZE + BADGE_ICON_GAP;
    let max_label = (quadrant.usable_width() - BADGE_GAP * (MAX_BADGES - 1) as f32) / MAX_BADGES as f32 - chrome;

    let labels: Vec<(String, f32)> = languages
        .iter()
        .map(|language| {
            let typography = surface.typography();
            let measure = |t: &str| typography.measure(t, BADGE_FONT_SIZE, Weight::Regular);
            let label = truncate_to_width(language, max_label, &measure);
            let width = measure(&label);
            (label, width)
        })
        .collect();

    let total_width: f32 = labels.iter().map(|(_, w)| w + chrome).sum::<f32>()
        + BADGE_GAP * (labels.len() - 1) as f32;

    let mut x = quadrant.center_x() - total_width / 2.0;
    let y = quadrant.y + quadrant.height * 0.4 - BADGE_HEIGHT / 2.0;
    let mut slots = Vec::with_capacity(labels.len());

    for (language, (label, label_width)) in languages.into_iter().zip(labels) {
        let badge_width = label_width + chrome;

        surface.fill_pill(x, y, badge_width, BADGE_HEIGHT, theme.border.faded(0.12));
        surface.stroke_pill(x, y, badge_width, BADGE_HEIGHT, 1.5, theme.border.faded(0.5));

        let text_x = x + BADGE_PADDING + BADGE_ICON_SIZE + BADGE_ICON_GAP;
        let text_y = y + (BADGE_HEIGHT - BADGE_FONT_SIZE) / 2.0;
        surface.fill_text(&label, text_x, text_y, BADGE_FONT_SIZE, Weight::Regular, theme.primary_text);

        slots.push(IconSlot {
            language: language.clone(),
            cx: x + BADGE_PADDING + BADGE_ICON_SIZE / 2.0,
            cy: y + BADGE_HEIGHT / 2.0,
            url: assets::language_icon_url(language),
        });

        x += badge_width + BADGE_GAP;
    }

    slots
}

fn draw_icon_image(surface: &mut Surface, slot: &IconSlot, image: &Pixmap) {
    let half = BADGE_ICON_SIZE / 2.0;
    surface.draw_image(image, slot.cx - half, slot.cy - half, BADGE_ICON_SIZE, BADGE_ICON_SIZE, 1.0);
}

/// Filled circle holding the language's first letter.
fn draw_letter_icon(surface: &mut Surface, slot: &IconSlot, theme: &Theme) {
    let radius = BADGE_ICON_SIZE / 2.0;
    surface.fill_circle(slot.cx, slot.cy, radius, theme.secondary_text);

    let Some(letter) = slot.language.chars().next() else {
        return;
    };
    let letter: String = letter.to_uppercase().collect();
    let ink = if theme.is_dark { INK_DARK } else { INK_LIGHT };
    let width = surface.measure_text(&letter, BADGE_LETTER_SIZE, Weight::Bold);

    surface.fill_text(
        &letter,
        slot.cx - width / 2.0,
        slot.cy - BADGE_LETTER_SIZE / 2.0,
        BADGE_LETTER_SIZE,
        Weight::Bold,
        ink,
    );
}

/// Logo plus wordmark in the bottom-right corner.
fn draw_watermark(surface: &mut Surface, theme: &Theme) {
    let opacity = theme.watermark_opacity();
    let color = theme.primary_text.faded(opacity);

    let text_width = surface.measure_text(WATERMARK_TEXT, WATERMARK_FONT_SIZE, Weight::Bold);
    let right = CANVAS_WIDTH as f32 - WATERMARK_MARGIN;
    let bottom = CANVAS_HEIGHT as f32 - WATERMARK_MARGIN;

    let text_x = right - text_width;
    let text_y = bottom - (WATERMARK_LOGO_SIZE + WATERMARK_FONT_SIZE) / 2.0;
    surface.fill_text(WATERMARK_TEXT, text_x, text_y, WATERMARK_FONT_SIZE, Weight::Bold, color);

    let logo_x = text_x - BADGE_ICON_GAP - WATERMARK_LOGO_SIZE;
    let logo_y = bottom - WATERMARK_LOGO_SIZE;
    match assets::logo(theme.primary_text, WATERMARK_LOGO_SIZE as u32 * ICON_OVERSAMPLE) {
        Ok(image) => surface.draw_image(&image, logo_x, logo_y, WATERMARK_LOGO_SIZE, WATERMARK_LOGO_SIZE, opacity),
        Err(e) => debug!(error = %e, "logo unavailable"),
    }
}

use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;

use reqwest::Client;
use resvg::usvg;
use tiny_skia::{Pixmap, PremultipliedColorU8, Transform};
use tracing::debug;

use crate::error::{Result, SnapRepoError};

/// Edge length, in pixels, that SVG images are rasterized at.
pub const SVG_RASTER_SIZE: u32 = 128;

/// Asynchronous "load image by URL" capability.
///
/// A failed load is an ordinary `Err`; callers decide how to degrade.
pub trait ImageLoader: Send + Sync {
    fn load(&self, url: &str) -> impl Future<Output = Result<Pixmap>> + Send;
}

/// Fetches images over HTTP and decodes PNG, JPEG, GIF, WebP or SVG.
#[derive(Debug, Clone)]
pub struct HttpImageLoader {
    client: Client,
}

impl HttpImageLoader {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("SnapRepo/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(HttpImageLoader { client })
    }
}

impl ImageLoader for HttpImageLoader {
    fn load(&self, url: &str) -> impl Future<Output = Result<Pixmap>> + Send {
        let request = self.client.get(url);
        let url = url.to_string();

        async move {
            let response = request.send().await?;
            let status = response.status();
            if !status.is_success() {
                return Err(SnapRepoError::Image(format!("{} returned {}", url, status)));
            }

            let is_svg = response
                .headers()
                .get(reqwest::header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .map(|v| v.contains("svg"))
                .unwrap_or(false);

            let bytes = response.bytes().await?;
            debug!(url = %url, bytes = bytes.len(), "image downloaded");

            if is_svg || looks_like_svg(&bytes) {
                rasterize_svg(&bytes, SVG_RASTER_SIZE)
            } else {
                decode_raster(&bytes)
            }
        }
    }
}

/// In-memory loader keyed by URL; unknown URLs fail.
#[derive(Debug, Clone, Default)]
pub struct StaticImageLoader {
    images: HashMap<String, Pixmap>,
    delays: HashMap<String, Duration>,
}

impl StaticImageLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_image(mut self, url: impl Into<String>, image: Pixmap) -> Self {
        self.images.insert(url.into(), image);
        self
    }

    /// Hold the completion for `url` back by `delay`.
    pub fn with_delay(mut self, url: impl Into<String>, delay: Duration) -> Self {
        self.delays.insert(url.into(), delay);
        self
    }
}

impl ImageLoader for StaticImageLoader {
    fn load(&self, url: &str) -> impl Future<Output = Result<Pixmap>> + Send {
        let image = self.images.get(url).cloned();
        let delay = self.delays.get(url).copied();
        let url = url.to_string();

        async move {
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
            image.ok_or_else(|| SnapRepoError::Image(format!("no image registered for {}", url)))
        }
    }
}

fn looks_like_svg(bytes: &[u8]) -> bool {
    let head = &bytes[..bytes.len().min(256)];
    let head = String::from_utf8_lossy(head);
    let head = head.trim_start();
    head.starts_with("<svg") || (head.starts_with("<?xml") && head.contains("<svg"))
}

/// Decode PNG/JPEG/GIF/WebP bytes into a premultiplied pixmap.
pub fn decode_raster(bytes: &[u8]) -> Result<Pixmap> {
    let rgba = image::load_from_memory(bytes)
        .map_err(|e| SnapRepoError::Image(e.to_string()))?
        .to_rgba8();

    let (width, height) = rgba.dimensions();
    let mut pixmap = Pixmap::new(width, height)
        .ok_or_else(|| SnapRepoError::Image(format!("invalid image size {}x{}", width, height)))?;

    for (dst, src) in pixmap.pixels_mut().iter_mut().zip(rgba.pixels()) {
        let [r, g, b, a] = src.0;
        let premul = |c: u8| (c as u32 * a as u32 / 255) as u8;
        if let Some(color) = PremultipliedColorU8::from_rgba(premul(r), premul(g), premul(b), a) {
            *dst = color;
        }
    }

    Ok(pixmap)
}

/// Rasterize an SVG document so its longer edge is `size` pixels.
pub fn rasterize_svg(data: &[u8], size: u32) -> Result<Pixmap> {
    let tree = usvg::Tree::from_data(data, &usvg::Options::default())
        .map_err(|e| SnapRepoError::Image(format!("invalid SVG: {}", e)))?;

    let natural = tree.size();
    let scale = size as f32 / natural.width().max(natural.height());
    let width = ((natural.width() * scale).ceil() as u32).max(1);
    let height = ((natural.height() * scale).ceil() as u32).max(1);

    let mut pixmap = Pixmap::new(width, height)
        .ok_or_else(|| SnapRepoError::Image(format!("invalid SVG size {}x{}", width, height)))?;
    resvg::render(&tree, Transform::from_scale(scale, scale), &mut pixmap.as_mut());

    Ok(pixmap)
}

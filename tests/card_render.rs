use std::time::Duration;

use snaprepo::card::assets::{language_icon_path, language_icon_url, ICON_CDN_BASE};
use snaprepo::card::layout::{
    clamp_lines, format_count, max_description_lines, truncate_to_width, wrap_text, ELLIPSIS, Q1,
};
use snaprepo::card::{CardRenderer, CardRequest, StaticImageLoader, Theme, Typography};
use snaprepo::models::Repository;
use tiny_skia::{Color, Pixmap};

/// Ten pixels per character keeps the layout tests independent of fonts.
fn mono(text: &str) -> f32 {
    text.chars().count() as f32 * 10.0
}

fn solid(r: u8, g: u8, b: u8, size: u32) -> Pixmap {
    let mut pixmap = Pixmap::new(size, size).unwrap();
    pixmap.fill(Color::from_rgba8(r, g, b, 255));
    pixmap
}

fn rust_repository() -> Repository {
    let mut repo = Repository::mock();
    repo.top_languages = Some(vec!["Rust".to_string(), "C".to_string(), "Brainfuck".to_string()]);
    repo
}

#[test]
fn test_format_count() {
    assert_eq!(format_count(0), "0");
    assert_eq!(format_count(999), "999");
    assert_eq!(format_count(1000), "1.0k");
    assert_eq!(format_count(59_600), "59.6k");
    assert_eq!(format_count(212_000), "212.0k");
}

#[test]
fn test_wrap_never_exceeds_width() {
    let text = "A blazingly fast tool with an extraordinarily_long_identifier_that_cannot_fit inside";
    let lines = wrap_text(text, 100.0, mono);

    assert!(lines.len() > 1);
    for line in &lines {
        assert!(mono(line) <= 100.0, "{:?} is too wide", line);
    }
}

#[test]
fn test_clamp_marks_cut_with_ellipsis() {
    let text = "one two three four five six seven eight nine ten eleven twelve";
    let lines = clamp_lines(text, 100.0, 3, mono);

    assert_eq!(lines.len(), 3);
    assert!(lines[2].ends_with(ELLIPSIS));
    assert!(lines.iter().all(|l| mono(l) <= 100.0));

    let short = clamp_lines("fits fine", 100.0, 3, mono);
    assert_eq!(short, vec!["fits fine"]);
}

#[test]
fn test_long_repository_name_is_truncated() {
    let name = "an-exceedingly-long-repository-name-that-will-never-fit-on-one-card";
    let max = Q1.usable_width();
    let shown = truncate_to_width(name, max, mono);

    assert!(shown.ends_with(ELLIPSIS));
    assert!(mono(&shown) <= max);
    assert!(name.starts_with(shown.trim_end_matches(ELLIPSIS)));

    assert_eq!(truncate_to_width("linux", max, mono), "linux");
}

#[test]
fn test_description_fits_three_lines() {
    assert_eq!(max_description_lines(&Q1), 3);
}

#[test]
fn test_theme_lookup_falls_back_to_dark() {
    assert_eq!(Theme::by_name("light").name, "light");
    assert_eq!(Theme::by_name("CyberPunk").name, "cyberpunk");
    assert_eq!(Theme::by_name("solarized").name, "dark");
    assert_eq!(Theme::by_name("").name, "dark");
    assert_eq!(Theme::names().collect::<Vec<_>>(), ["dark", "light", "gradient", "cyberpunk"]);
}

#[test]
fn test_language_icon_lookup() {
    assert_eq!(language_icon_path("C++"), Some("cplusplus/cplusplus-original.svg"));
    assert_eq!(language_icon_path("TypeScript"), Some("typescript/typescript-original.svg"));
    assert_eq!(language_icon_path("Shell"), Some("bash/bash-original.svg"));
    assert_eq!(language_icon_path("Brainfuck"), None);
    assert_eq!(
        language_icon_url("rust").unwrap(),
        format!("{}/rust/rust-original.svg", ICON_CDN_BASE)
    );
}

#[tokio::test]
async fn test_card_has_fixed_size_and_png_signature() {
    let renderer = CardRenderer::new(StaticImageLoader::new(), Typography::fallback());
    let card = renderer
        .render(&CardRequest::new(Repository::mock(), "gradient", true))
        .await
        .unwrap();

    assert_eq!((card.width(), card.height()), (1200, 630));
    assert_eq!(card.theme(), "gradient");

    let png = card.encode_png().unwrap();
    assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
}

#[tokio::test]
async fn test_background_uses_theme_color() {
    let renderer = CardRenderer::new(StaticImageLoader::new(), Typography::fallback());

    let dark = renderer
        .render(&CardRequest::new(Repository::mock(), "dark", false))
        .await
        .unwrap();
    let corner = dark.pixmap().pixel(2, 2).unwrap();
    assert_eq!((corner.red(), corner.green(), corner.blue()), (0x0D, 0x11, 0x17));

    let light = renderer
        .render(&CardRequest::new(Repository::mock(), "light", false))
        .await
        .unwrap();
    let corner = light.pixmap().pixel(2, 2).unwrap();
    assert_eq!((corner.red(), corner.green(), corner.blue()), (0xFF, 0xFF, 0xFF));

    let gradient = renderer
        .render(&CardRequest::new(Repository::mock(), "gradient", false))
        .await
        .unwrap();
    assert_ne!(gradient.pixmap().pixel(2, 2), gradient.pixmap().pixel(1197, 627));
}

#[tokio::test]
async fn test_avatar_failure_is_not_fatal() {
    let renderer = CardRenderer::new(StaticImageLoader::new(), Typography::fallback());
    let result = renderer
        .render(&CardRequest::new(rust_repository(), "dark", true))
        .await;
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_avatar_is_painted_in_top_right_quadrant() {
    let repo = Repository::mock();
    let loader = StaticImageLoader::new().with_image(repo.avatar_url.clone(), solid(255, 0, 0, 64));
    let renderer = CardRenderer::new(loader, Typography::fallback());

    let card = renderer.render(&CardRequest::new(repo, "dark", false)).await.unwrap();
    let center = card.pixmap().pixel(900, 173).unwrap();

    assert!(center.red() > 240 && center.green() < 15 && center.blue() < 15);
}

#[tokio::test]
async fn test_watermark_flag_changes_output() {
    let renderer = CardRenderer::new(StaticImageLoader::new(), Typography::fallback());

    let with = renderer
        .render(&CardRequest::new(Repository::mock(), "dark", true))
        .await
        .unwrap();
    let without = renderer
        .render(&CardRequest::new(Repository::mock(), "dark", false))
        .await
        .unwrap();

    assert_ne!(with.pixmap().data(), without.pixmap().data());
}

#[tokio::test]
async fn test_rendering_is_deterministic() {
    let repo = rust_repository();
    let loader = StaticImageLoader::new()
        .with_image(repo.avatar_url.clone(), solid(40, 120, 200, 32))
        .with_image(language_icon_url("Rust").unwrap(), solid(220, 90, 30, 16));
    let renderer = CardRenderer::new(loader, Typography::fallback());
    let request = CardRequest::new(repo, "cyberpunk", true);

    let first = renderer.render(&request).await.unwrap();
    let second = renderer.render(&request).await.unwrap();

    assert_eq!(first.pixmap().data(), second.pixmap().data());
}

#[tokio::test]
async fn test_completion_order_does_not_change_pixels() {
    let repo = rust_repository();
    let avatar = solid(40, 120, 200, 32);
    let icon = solid(220, 90, 30, 16);
    let icon_url = language_icon_url("Rust").unwrap();

    let prompt = StaticImageLoader::new()
        .with_image(repo.avatar_url.clone(), avatar.clone())
        .with_image(icon_url.clone(), icon.clone());
    let avatar_last = StaticImageLoader::new()
        .with_image(repo.avatar_url.clone(), avatar)
        .with_image(icon_url, icon)
        .with_delay(repo.avatar_url.clone(), Duration::from_millis(50));

    let request = CardRequest::new(repo, "light", true);
    let a = CardRenderer::new(prompt, Typography::fallback()).render(&request).await.unwrap();
    let b = CardRenderer::new(avatar_last, Typography::fallback())
        .render(&request)
        .await
        .unwrap();

    assert_eq!(a.pixmap().data(), b.pixmap().data());
}

#[tokio::test]
async fn test_render_while_stops_when_superseded() {
    let repo = Repository::mock();
    let loader = StaticImageLoader::new()
        .with_image(repo.avatar_url.clone(), solid(255, 0, 0, 8))
        .with_delay(repo.avatar_url.clone(), Duration::from_millis(20));
    let renderer = CardRenderer::new(loader, Typography::fallback());

    let card = renderer
        .render_while(&CardRequest::new(repo, "dark", true), || false)
        .await
        .unwrap();
    assert!(card.is_none());
}

/// Center of the icon slot of a lone "Rust" badge with fallback metrics.
const RUST_BADGE_ICON: (u32, u32) = (874, 441);

fn rust_only_repository() -> Repository {
    let mut repo = Repository::mock();
    repo.top_languages = Some(vec!["Rust".to_string()]);
    repo
}

#[tokio::test]
async fn test_failed_icon_falls_back_to_letter_circle() {
    let renderer = CardRenderer::new(StaticImageLoader::new(), Typography::fallback());
    let card = renderer
        .render(&CardRequest::new(rust_only_repository(), "dark", false))
        .await
        .unwrap();

    let secondary = Theme::by_name("dark").secondary_text;
    let (x, y) = RUST_BADGE_ICON;
    let pixel = card.pixmap().pixel(x, y).unwrap();
    assert_eq!(
        (pixel.red(), pixel.green(), pixel.blue()),
        (secondary.r, secondary.g, secondary.b)
    );
}

#[tokio::test]
async fn test_loaded_icon_is_painted_in_badge() {
    let loader = StaticImageLoader::new()
        .with_image(language_icon_url("Rust").unwrap(), solid(220, 90, 30, 16));
    let renderer = CardRenderer::new(loader, Typography::fallback());
    let card = renderer
        .render(&CardRequest::new(rust_only_repository(), "dark", false))
        .await
        .unwrap();

    let (x, y) = RUST_BADGE_ICON;
    let pixel = card.pixmap().pixel(x, y).unwrap();
    let close = |a: u8, b: u8| a.abs_diff(b) <= 2;
    assert!(close(pixel.red(), 220) && close(pixel.green(), 90) && close(pixel.blue(), 30));
}

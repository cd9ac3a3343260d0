use std::sync::Arc;
use std::time::Duration;

use snaprepo::card::{CardRenderer, StaticImageLoader, Typography};
use snaprepo::error::SnapRepoError;
use snaprepo::models::Repository;
use snaprepo::service::RepositoryService;
use snaprepo::session::Studio;
use tiny_skia::{Color, Pixmap};

fn studio_with(loader: StaticImageLoader) -> Studio<StaticImageLoader> {
    let renderer = Arc::new(CardRenderer::new(loader, Typography::fallback()));
    Studio::new(RepositoryService::mock(Duration::ZERO), renderer)
}

fn slow_avatar_loader(delay: Duration) -> StaticImageLoader {
    let mut avatar = Pixmap::new(16, 16).unwrap();
    avatar.fill(Color::from_rgba8(0, 200, 0, 255));
    let url = Repository::mock().avatar_url;
    StaticImageLoader::new()
        .with_image(url.clone(), avatar)
        .with_delay(url, delay)
}

#[tokio::test]
async fn test_defaults() {
    let studio = studio_with(StaticImageLoader::new());
    assert!(studio.repository().is_none());
    assert_eq!(studio.theme(), "dark");
    assert!(studio.watermark());
}

#[tokio::test]
async fn test_invalid_link_fails_before_fetch() {
    let mut studio = studio_with(StaticImageLoader::new());
    let err = studio.submit("github.com/rust-lang/rust").await.unwrap_err();

    assert!(matches!(err, SnapRepoError::InvalidRepoUrl(_)));
    assert_eq!(err.user_message(), "Invalid GitHub repository URL");
    assert!(studio.repository().is_none());
}

#[tokio::test]
async fn test_failed_submit_keeps_previous_repository() {
    let mut studio = studio_with(StaticImageLoader::new());
    studio.show(Repository::mock());

    assert!(studio.submit("https://gitlab.com/a/b").await.is_err());
    assert_eq!(studio.repository().map(|r| r.name.as_str()), Some("linux"));
}

#[tokio::test]
async fn test_submit_then_render() {
    let mut studio = studio_with(StaticImageLoader::new());
    let repo = studio.submit("https://github.com/torvalds/linux").await.unwrap();
    assert_eq!(repo.owner, "torvalds");

    studio.set_theme("light");
    studio.set_watermark(false);
    let card = studio.render().await.unwrap().expect("card");

    assert_eq!(card.theme(), "light");
    assert_eq!((card.width(), card.height()), (1200, 630));
}

#[tokio::test]
async fn test_nothing_to_render_without_repository() {
    let studio = studio_with(StaticImageLoader::new());
    assert!(studio.render().await.unwrap().is_none());
}

#[tokio::test]
async fn test_unchanged_inputs_keep_ticket_current() {
    let mut studio = studio_with(StaticImageLoader::new());
    studio.show(Repository::mock());

    let ticket = studio.ticket();
    studio.set_theme("dark");
    studio.set_watermark(true);
    assert!(ticket.is_current());

    studio.set_theme("gradient");
    assert!(!ticket.is_current());
}

#[tokio::test]
async fn test_superseded_render_is_dropped() {
    let mut studio = studio_with(slow_avatar_loader(Duration::from_millis(100)));
    studio.show(Repository::mock());

    let stale = tokio::spawn(studio.render());
    studio.set_theme("cyberpunk");
    let fresh = studio.render();

    assert!(stale.await.unwrap().unwrap().is_none());
    let card = fresh.await.unwrap().expect("fresh card");
    assert_eq!(card.theme(), "cyberpunk");
}

#[tokio::test]
async fn test_go_home_clears_repository() {
    let mut studio = studio_with(slow_avatar_loader(Duration::from_millis(50)));
    studio.show(Repository::mock());

    let pending = studio.render();
    studio.go_home();

    assert!(studio.repository().is_none());
    assert!(pending.await.unwrap().is_none());
    assert!(studio.render().await.unwrap().is_none());
}

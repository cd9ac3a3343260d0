//! Hosting-layer state for one person building a card.
//!
//! Inputs (repository, theme, watermark) change through explicit setters and
//! the caller asks for a fresh render afterwards. Each change bumps a
//! generation counter; a render started under an older generation stops
//! applying image completions and resolves to `None`, so a superseded card is
//! never published.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tracing::{debug, info};

use crate::card::theme::DEFAULT_THEME;
use crate::card::{Card, CardRenderer, CardRequest, ImageLoader, Theme};
use crate::error::Result;
use crate::models::Repository;
use crate::repo_url::parse_github_url;
use crate::service::RepositoryService;

/// Snapshot of the input generation a render was started under.
#[derive(Debug, Clone)]
pub struct RenderTicket {
    generation: u64,
    latest: Arc<AtomicU64>,
}

impl RenderTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_current(&self) -> bool {
        self.latest.load(Ordering::SeqCst) == self.generation
    }
}

pub struct Studio<L> {
    service: RepositoryService,
    renderer: Arc<CardRenderer<L>>,
    repository: Option<Repository>,
    theme: String,
    watermark: bool,
    generation: Arc<AtomicU64>,
}

impl<L: ImageLoader + 'static> Studio<L> {
    pub fn new(service: RepositoryService, renderer: Arc<CardRenderer<L>>) -> Self {
        Studio {
            service,
            renderer,
            repository: None,
            theme: DEFAULT_THEME.to_string(),
            watermark: true,
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn repository(&self) -> Option<&Repository> {
        self.repository.as_ref()
    }

    pub fn theme(&self) -> &str {
        &self.theme
    }

    pub fn watermark(&self) -> bool {
        self.watermark
    }

    /// Validate `link`, fetch the repository and make it the current card.
    ///
    /// Invalid links fail before any network call. On failure the previous
    /// repository stays in place.
    pub async fn submit(&mut self, link: &str) -> Result<&Repository> {
        let target = parse_github_url(link)?;
        info!(owner = %target.owner, repo = %target.repo, "creating snapshot");

        let repository = self
            .service
            .fetch_repository(&target.owner, &target.repo)
            .await?;

        self.bump();
        let repository: &Repository = self.repository.insert(repository);
        Ok(repository)
    }

    pub fn show(&mut self, repository: Repository) {
        self.repository = Some(repository);
        self.bump();
    }

    pub fn set_theme(&mut self, name: &str) {
        if self.theme != name {
            self.theme = name.to_string();
            self.bump();
        }
    }

    pub fn set_watermark(&mut self, enabled: bool) {
        if self.watermark != enabled {
            self.watermark = enabled;
            self.bump();
        }
    }

    /// Drop the current repository and return to the empty form.
    pub fn go_home(&mut self) {
        if self.repository.take().is_some() {
            self.bump();
        }
    }

    pub fn ticket(&self) -> RenderTicket {
        RenderTicket {
            generation: self.generation.load(Ordering::SeqCst),
            latest: self.generation.clone(),
        }
    }

    /// Render the current inputs.
    ///
    /// The returned future owns everything it needs and may be spawned. It
    /// resolves to `None` when there is nothing to draw or when the inputs
    /// changed before it finished.
    pub fn render(&self) -> impl Future<Output = Result<Option<Card>>> + Send + 'static {
        let request = self
            .repository
            .clone()
            .map(|repo| CardRequest::new(repo, &self.theme, self.watermark));
        let renderer = self.renderer.clone();
        let ticket = self.ticket();

        async move {
            let Some(request) = request else {
                return Ok(None);
            };

            let card = renderer.render_while(&request, || ticket.is_current()).await?;
            if card.is_none() {
                debug!(generation = ticket.generation(), "render superseded");
            }
            Ok(card)
        }
    }

    /// Theme the next render will use after name resolution.
    pub fn resolved_theme(&self) -> Theme {
        Theme::by_name(&self.theme)
    }

    fn bump(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }
}

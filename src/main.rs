use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use colored::*;
use tracing_subscriber::EnvFilter;

use snaprepo::card::{CardRenderer, HttpImageLoader, Theme, Typography};
use snaprepo::cli::{Cli, Command};
use snaprepo::github::GitHubClient;
use snaprepo::proxy::{start_server, ProxyState};
use snaprepo::service::{RepositoryService, MOCK_DELAY};
use snaprepo::session::Studio;
use snaprepo::SnapRepoError;

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env file if it exists
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    let outcome = match cli.command {
        Command::Serve {
            port,
            token_env,
            github_api_url,
        } => serve(cli.font.as_deref(), port, token_env, github_api_url).await,
        Command::Snap {
            url,
            theme,
            no_watermark,
            output,
            api_url,
            offline,
        } => {
            snap(SnapOptions {
                font: cli.font.as_deref(),
                url: &url,
                theme: &theme,
                watermark: !no_watermark,
                output: &output,
                api_url,
                offline,
            })
            .await
        }
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // Lookup failures get the short human message, everything else the full chain
            match e.downcast_ref::<SnapRepoError>() {
                Some(err) => eprintln!("{} {}", "✗".red(), err.user_message().red()),
                None => eprintln!("{} {:#}", "✗".red(), e),
            }
            ExitCode::FAILURE
        }
    }
}

async fn serve(font: Option<&Path>, port: u16, token_env: String, api_url: String) -> anyhow::Result<()> {
    println!("{}", "SnapRepo Proxy".bold().green());
    println!("{}\n", "=".repeat(50).dimmed());

    let github = GitHubClient::with_base_url(&api_url)?.with_token_env(&token_env);
    if github.has_token() {
        println!("🔑 Using token from ${}", token_env);
    } else {
        println!(
            "{}",
            format!("No token in ${}, requests are unauthenticated", token_env).yellow()
        );
    }

    let typography = Typography::resolve(font).context("loading card font")?;
    if !typography.has_faces() {
        println!("{}", "No font found, card text will not be painted".yellow());
    }

    let renderer = CardRenderer::new(HttpImageLoader::new()?, typography);
    let state = ProxyState::new(github, renderer);

    println!("📡 Forwarding to {}", api_url);
    println!("\nPress Ctrl+C to stop the server\n");

    start_server(state, port, async {
        tokio::signal::ctrl_c().await.ok();
        println!("\n🛑 Shutting down server...");
    })
    .await?;

    Ok(())
}

struct SnapOptions<'a> {
    font: Option<&'a Path>,
    url: &'a str,
    theme: &'a str,
    watermark: bool,
    output: &'a Path,
    api_url: Option<String>,
    offline: bool,
}

async fn snap(options: SnapOptions<'_>) -> anyhow::Result<()> {
    let service = match (options.offline, options.api_url) {
        (true, _) => {
            println!("{}", "Offline mode, rendering the sample repository".yellow());
            RepositoryService::mock(MOCK_DELAY)
        }
        (false, Some(api_url)) => RepositoryService::proxy(api_url)?,
        (false, None) => RepositoryService::direct(GitHubClient::new()?),
    };

    let typography = Typography::resolve(options.font).context("loading card font")?;
    let renderer = Arc::new(CardRenderer::new(HttpImageLoader::new()?, typography));

    let mut studio = Studio::new(service, renderer);
    studio.set_theme(options.theme);
    studio.set_watermark(options.watermark);

    let repository = studio.submit(options.url).await?;
    println!(
        "📦 {} / {}  ★ {}  ⑂ {}",
        repository.owner.bold(),
        repository.name.bold(),
        repository.stars,
        repository.forks
    );

    let theme: Theme = studio.resolved_theme();
    if !theme.name.eq_ignore_ascii_case(options.theme.trim()) {
        println!("{}", format!("Unknown theme '{}', using {}", options.theme, theme.name).yellow());
    }

    let card = studio
        .render()
        .await?
        .ok_or_else(|| anyhow::anyhow!("render produced no card"))?;
    card.save_png(options.output)
        .with_context(|| format!("writing {}", options.output.display()))?;

    println!(
        "✅ Saved {}x{} {} card to {}",
        card.width(),
        card.height(),
        card.theme(),
        options.output.display().to_string().cyan()
    );
    Ok(())
}

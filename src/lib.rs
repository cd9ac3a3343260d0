//! SnapRepo: GitHub repository social cards.
//!
//! Two halves share this crate. The [`proxy`] forwards `owner`/`repo` lookups
//! to the GitHub REST API and reshapes the answer into an [`ApiResponse`]
//! envelope. The [`card`] renderer paints a [`Repository`] onto a fixed
//! 1200×630 canvas and encodes it as PNG.

pub mod card;
pub mod cli;
pub mod error;
pub mod github;
pub mod health;
pub mod models;
pub mod proxy;
pub mod repo_url;
pub mod service;
pub mod session;
pub mod types;

pub use error::{Result, SnapRepoError};
pub use models::{ApiResponse, RepoRef, Repository};
pub use repo_url::parse_github_url;

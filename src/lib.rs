//! # lotto-draw
//!
//! Weighted lottery draw engine driven by historical draw statistics.
//!
//! ## Design Philosophy
//!
//! lotto-draw is designed to be:
//! - **Library-first** - No CLI or UI; a front end calls in and renders what comes back
//! - **Always usable** - A failed refresh never leaves a session without weights
//! - **Explicit state** - Session state is a value the caller owns and passes in
//! - **Not a forecaster** - It samples by historical frequency, it does not predict
//!
//! ## Pipeline
//!
//! On refresh, each configured source is fetched in order, its draw-history table
//! located, and every number in 1–49 extracted. The first source yielding enough
//! numbers wins; the occurrence counts become the session's weights. On generate,
//! six main numbers and one special number are drawn by weight.
//!
//! ## Quick Start
//!
//! ```no_run
//! use lotto_draw::{Config, DrawEngine, FetchResult, SessionState};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let engine = DrawEngine::new(Config::with_sources([
//!         "https://lotto.example.com/history",
//!         "https://mirror.example.com/history",
//!     ]))?;
//!     let mut session = SessionState::new();
//!
//!     match engine.refresh_requested(&mut session).await {
//!         FetchResult::Success { source, history } => {
//!             println!("{} numbers from {}", history.len(), source)
//!         }
//!         FetchResult::Failure(failure) => println!("using uniform weights:\n{}", failure),
//!     }
//!
//!     let draw = engine.generate_requested(&session);
//!     println!("{} ({})", draw, session.mode());
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Configuration types
pub mod config;
/// Refresh and generate orchestration
pub mod engine;
/// Error types
pub mod error;
/// Table selection and number extraction
pub mod extraction;
/// Historical data source fetching
pub mod fetcher;
/// Weighted draw sampling
pub mod sampler;
/// Per-session state
pub mod session;
/// Core types
pub mod types;
/// Frequency-based weight model
pub mod weights;

// Re-export commonly used types
pub use config::{Config, ExtractionConfig, FetchConfig, SamplingConfig};
pub use engine::DrawEngine;
pub use error::{Error, RefreshFailure, Result, SourceDiagnostic, SourceError};
pub use extraction::{KeywordTableSelector, Table, TableSelector};
pub use fetcher::SourceFetcher;
pub use sampler::{DrawReport, DrawSampler};
pub use session::SessionState;
pub use types::{Draw, FetchResult, HistoryNumbers, SamplingMode};
pub use weights::{AMPLIFICATION_FACTOR, WeightMap, calculate_weights};

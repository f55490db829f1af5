//! Refresh and generate orchestration
//!
//! [`DrawEngine`] is what a front end talks to. It holds configuration, the
//! fetcher and the table selector, and owns no session data: every trigger takes
//! the caller's [`SessionState`] explicitly.

use crate::config::Config;
use crate::error::Result;
use crate::extraction::{KeywordTableSelector, TableSelector, extract_page};
use crate::fetcher::SourceFetcher;
use crate::sampler::DrawSampler;
use crate::session::SessionState;
use crate::types::{Draw, FetchResult};
use crate::weights::calculate_weights;
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Weighted draw engine
///
/// Immutable after construction, so one engine can serve many sessions.
#[derive(Clone)]
pub struct DrawEngine {
    config: Config,
    fetcher: SourceFetcher,
    selector: Arc<dyn TableSelector>,
    sampler: DrawSampler,
}

impl std::fmt::Debug for DrawEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DrawEngine")
            .field("sources", &self.config.sources)
            .field("sampler", &self.sampler)
            .finish_non_exhaustive()
    }
}

impl DrawEngine {
    /// Create an engine with the keyword table selector from `config`
    ///
    /// # Errors
    /// Returns error if the configuration is invalid or the HTTP client cannot be
    /// created
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;

        let fetcher = SourceFetcher::new(&config.fetch)?;
        let selector = KeywordTableSelector::new(
            config.extraction.keywords.iter().cloned(),
            config.extraction.min_rows,
        );
        let sampler = DrawSampler::new(config.sampling.retry_budget);

        info!(
            sources = config.sources.len(),
            timeout_secs = config.fetch.timeout.as_secs(),
            "Draw engine initialized"
        );

        Ok(Self {
            config,
            fetcher,
            selector: Arc::new(selector),
            sampler,
        })
    }

    /// Replace the table selection strategy
    pub fn with_selector(mut self, selector: impl TableSelector + 'static) -> Self {
        self.selector = Arc::new(selector);
        self
    }

    /// The engine's configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Fetch history and, on success, replace the session's weights
    ///
    /// Each source goes through fetch, table selection and number extraction; any
    /// failure along the way moves on to the next source. If every source fails the
    /// session is left exactly as it was and the result lists one diagnostic per
    /// source.
    pub async fn refresh_requested(&self, session: &mut SessionState) -> FetchResult {
        let selector = self.selector.as_ref();
        let min_sample = self.config.extraction.min_sample;

        let outcome = self
            .fetcher
            .fetch_with_fallback(&self.config.sources, |body| {
                extract_page(body, selector, min_sample)
            })
            .await;

        match outcome {
            Ok((source, history)) => {
                let weights = calculate_weights(&history);
                info!(
                    source = %source,
                    numbers = history.len(),
                    "Loaded historical draw data"
                );
                session.apply_refresh(weights, source.clone());
                FetchResult::Success { source, history }
            }
            Err(failure) => {
                warn!(
                    attempted = failure.attempted(),
                    data_loaded = session.data_loaded(),
                    "Refresh failed, keeping current weights"
                );
                FetchResult::Failure(failure)
            }
        }
    }

    /// Generate one draw from the session's current weights
    pub fn generate_requested(&self, session: &SessionState) -> Draw {
        self.generate_with_rng(session, &mut rand::thread_rng())
    }

    /// Generate one draw with the given random source
    pub fn generate_with_rng<R: Rng + ?Sized>(&self, session: &SessionState, rng: &mut R) -> Draw {
        let report = self.sampler.draw_with_report(session.weights(), rng);
        debug!(
            draw = %report.draw,
            mode = %session.mode(),
            starved = report.starved(),
            "Generated draw"
        );
        report.draw
    }

    /// Generate one draw reproducibly from a seed
    pub fn generate_seeded(&self, session: &SessionState, seed: u64) -> Draw {
        let mut rng = StdRng::seed_from_u64(seed);
        self.generate_with_rng(session, &mut rng)
    }

    /// Generate several independent draws at once
    ///
    /// With a seed the whole batch is reproducible.
    pub fn generate_many(&self, session: &SessionState, count: usize, seed: Option<u64>) -> Vec<Draw> {
        let mut rng: StdRng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };
        (0..count)
            .map(|_| self.generate_with_rng(session, &mut rng))
            .collect()
    }

    /// Discard the draw currently on display
    ///
    /// The session's weights are not touched.
    pub fn clear_requested(&self, displayed: &mut Option<Draw>) {
        if let Some(draw) = displayed.take() {
            debug!(draw = %draw, "Cleared displayed draw");
        }
    }

    /// The `n` heaviest numbers of the session, for a "hot numbers" display
    pub fn hot_numbers(&self, session: &SessionState, n: usize) -> Vec<(u8, u64)> {
        session.hot_numbers(n)
    }
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::extraction::Table;

    fn engine() -> DrawEngine {
        DrawEngine::new(Config::with_sources(["http://127.0.0.1:9/history"])).unwrap()
    }

    #[test]
    fn new_rejects_invalid_config() {
        assert!(matches!(
            DrawEngine::new(Config::default()),
            Err(Error::Config { .. })
        ));
    }

    #[test]
    fn seeded_generation_is_reproducible() {
        let engine = engine();
        let session = SessionState::new();
        assert_eq!(
            engine.generate_seeded(&session, 8),
            engine.generate_seeded(&session, 8)
        );
    }

    #[test]
    fn generate_many_returns_requested_count() {
        let engine = engine();
        let session = SessionState::new();

        let batch = engine.generate_many(&session, 5, Some(1));

        assert_eq!(batch.len(), 5);
        assert_eq!(batch, engine.generate_many(&session, 5, Some(1)));
        assert!(engine.generate_many(&session, 0, None).is_empty());
    }

    #[test]
    fn generate_does_not_touch_session() {
        let engine = engine();
        let session = SessionState::new();

        let draw = engine.generate_requested(&session);

        assert_eq!(draw.numbers().count(), 7);
        assert!(session.weights().is_uniform());
        assert!(!session.data_loaded());
    }

    #[test]
    fn clear_discards_displayed_draw_only() {
        let engine = engine();
        let session = SessionState::new();
        let mut displayed = Some(engine.generate_requested(&session));

        engine.clear_requested(&mut displayed);
        assert!(displayed.is_none());
        engine.clear_requested(&mut displayed);
        assert!(displayed.is_none());
        assert!(session.weights().is_uniform());
    }

    struct NeverSelect;

    impl TableSelector for NeverSelect {
        fn select<'a>(&self, _tables: &'a [Table]) -> Option<&'a Table> {
            None
        }
    }

    #[test]
    fn with_selector_keeps_configuration() {
        let engine = engine().with_selector(NeverSelect);
        assert_eq!(engine.config().sources.len(), 1);
        assert_eq!(engine.hot_numbers(&SessionState::new(), 2), vec![(1, 1), (2, 1)]);
    }
}

//! The full enrichment run: correlate, chain, annotate, sequence free throws.

use serde::Serialize;
use tracing::{info, info_span};

use crate::chain::{ChainBuilder, GameAnnotator, NoopAnnotator};
use crate::config::EnrichConfig;
use crate::correlate::{CorrelationReport, Correlator};
use crate::error::EnrichError;
use crate::event::EventRecord;
use crate::free_throw::label_free_throws;
use crate::timing::{self, STAGE_CHAIN, STAGE_CORRELATE, STAGE_FREE_THROWS};

/// Output of one enrichment run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedGame {
    pub events: Vec<EventRecord>,
    pub report: CorrelationReport,
    /// Index of the first record of each period in `events`.
    pub period_starts: Vec<usize>,
    /// Free throw trips labelled.
    pub free_throw_trips: usize,
}

impl EnrichedGame {
    /// `(period, record count)` for every period present, in stream order.
    #[must_use]
    pub fn period_counts(&self) -> Vec<(u8, usize)> {
        let mut counts: Vec<(u8, usize)> = Vec::new();
        for event in &self.events {
            match counts.last_mut() {
                Some((period, n)) if *period == event.period => *n += 1,
                _ => counts.push((event.period, 1)),
            }
        }
        counts
    }
}

#[derive(Debug, Clone, Default)]
pub struct Enricher {
    config: EnrichConfig,
}

impl Enricher {
    #[must_use]
    pub const fn new(config: EnrichConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub const fn config(&self) -> &EnrichConfig {
        &self.config
    }

    /// Run the pipeline with no annotation hooks.
    ///
    /// # Errors
    ///
    /// Returns [`EnrichError::UnpairedSubstitution`] when a substitution half
    /// has no counterpart; nothing is returned in that case.
    pub fn run(&self, records: Vec<EventRecord>) -> Result<EnrichedGame, EnrichError> {
        self.run_with(records, &mut NoopAnnotator)
    }

    /// Run the pipeline, handing the chained stream to `annotator`.
    ///
    /// # Errors
    ///
    /// See [`Enricher::run`].
    pub fn run_with(
        &self,
        records: Vec<EventRecord>,
        annotator: &mut dyn GameAnnotator,
    ) -> Result<EnrichedGame, EnrichError> {
        let span = info_span!("enrich", records = records.len());
        let _entered = span.enter();

        let correlator = Correlator::new(&self.config.correlation);
        let correlated = timing::timed(STAGE_CORRELATE, || correlator.run(records))?;
        let mut events = correlated.events;

        let chain = ChainBuilder::new(self.config.fouls.clone());
        let summary = timing::timed(STAGE_CHAIN, || chain.build(&mut events, annotator));

        let free_throw_trips = timing::timed(STAGE_FREE_THROWS, || label_free_throws(&mut events));

        info!(
            input = correlated.report.input_records,
            output = events.len(),
            merged = correlated.report.removed(),
            periods = summary.period_starts.len(),
            "enrichment complete"
        );

        Ok(EnrichedGame {
            events,
            report: correlated.report,
            period_starts: summary.period_starts,
            free_throw_trips,
        })
    }
}

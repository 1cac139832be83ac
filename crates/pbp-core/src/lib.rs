//! pbp-core library.
//!
//! Turns a chronologically ordered play-by-play feed into a linked,
//! stateful event stream: split records are merged ([`correlate`]), events
//! are chained within periods with foul snapshots ([`chain`]), and free
//! throws are labelled by trip ([`free_throw`]). [`Enricher`] runs the whole
//! thing.
//!
//! # Conventions
//!
//! - **Errors**: library failures are [`EnrichError`]; config loading uses
//!   `anyhow::Result`.
//! - **Logging**: `tracing` macros (`info!`, `warn!`, `debug!`, `trace!`).

pub mod chain;
pub mod config;
pub mod correlate;
pub mod error;
pub mod event;
pub mod free_throw;
pub mod pipeline;
pub mod query;
pub mod scan;
pub mod stream;
pub mod timing;

pub use chain::{ChainBuilder, ChainSummary, GameAnnotator, NoopAnnotator, enrich};
pub use config::EnrichConfig;
pub use correlate::{CorrelationReport, Correlator, correlate};
pub use error::{EnrichError, ErrorCode};
pub use event::EventRecord;
pub use free_throw::sequence_free_throws;
pub use pipeline::{EnrichedGame, Enricher};

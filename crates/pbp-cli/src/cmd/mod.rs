pub mod enrich;
pub mod summary;

use std::path::Path;

use anyhow::Context;
use pbp_core::event::EventRecord;
use pbp_core::event::types::{UNKNOWN_ACTION_TYPE_PREFIX, UNKNOWN_SUB_TYPE_PREFIX};
use pbp_core::{EnrichConfig, EnrichedGame, Enricher, ErrorCode};
use tracing::debug;

use crate::output::{CliError, OutputMode, render_error};

/// Read a JSON array of raw records from `path`.
///
/// Malformed input is reported on stderr with its error code before failing.
pub fn read_records(path: &Path, output: OutputMode) -> anyhow::Result<Vec<EventRecord>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    match serde_json::from_str::<Vec<EventRecord>>(&raw) {
        Ok(records) => {
            debug!(path = %path.display(), records = records.len(), "loaded feed");
            Ok(records)
        }
        Err(err) => {
            let code = input_error_code(&err.to_string());
            render_error(
                output,
                &CliError::with_details(
                    format!("{}: {err}", path.display()),
                    code.hint(),
                    code.code(),
                ),
            )?;
            anyhow::bail!("{}", code.message());
        }
    }
}

/// Run the pipeline, rendering engine errors with their stable code.
pub fn enrich_records(
    records: Vec<EventRecord>,
    config: &EnrichConfig,
    output: OutputMode,
) -> anyhow::Result<EnrichedGame> {
    match Enricher::new(config.clone()).run(records) {
        Ok(game) => Ok(game),
        Err(err) => {
            render_error(output, &CliError::from(&err))?;
            anyhow::bail!("{}", err.error_code().message());
        }
    }
}

pub fn load_game(
    path: &Path,
    config: &EnrichConfig,
    output: OutputMode,
) -> anyhow::Result<EnrichedGame> {
    let records = read_records(path, output)?;
    enrich_records(records, config, output)
}

fn input_error_code(message: &str) -> ErrorCode {
    if message.contains(UNKNOWN_ACTION_TYPE_PREFIX) {
        ErrorCode::UnknownActionType
    } else if message.contains(UNKNOWN_SUB_TYPE_PREFIX) {
        ErrorCode::UnknownSubType
    } else {
        ErrorCode::InputParseError
    }
}

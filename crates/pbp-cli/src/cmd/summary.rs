//! `pbp summary`: what the enrichment pass did to a feed.

use std::io::{self, Write};
use std::path::PathBuf;

use clap::Args;
use pbp_core::{CorrelationReport, EnrichConfig, EnrichedGame};
use serde::Serialize;

use crate::output::{OutputMode, pretty_kv, pretty_section, render_mode};

#[derive(Args, Debug)]
pub struct SummaryArgs {
    /// JSON file holding an array of raw event records, in game order.
    pub file: PathBuf,
}

#[derive(Debug, Serialize)]
pub struct PeriodCount {
    pub period: u8,
    pub events: usize,
}

/// Report payload for `pbp summary`.
#[derive(Debug, Serialize)]
pub struct GameSummary {
    pub correlation: CorrelationReport,
    pub periods: Vec<PeriodCount>,
    pub free_throw_trips: usize,
}

impl From<&EnrichedGame> for GameSummary {
    fn from(game: &EnrichedGame) -> Self {
        Self {
            correlation: game.report,
            periods: game
                .period_counts()
                .into_iter()
                .map(|(period, events)| PeriodCount { period, events })
                .collect(),
            free_throw_trips: game.free_throw_trips,
        }
    }
}

pub fn run_summary(
    args: &SummaryArgs,
    config: &EnrichConfig,
    output: OutputMode,
) -> anyhow::Result<()> {
    let game = super::load_game(&args.file, config, output)?;
    let summary = GameSummary::from(&game);
    render_mode(output, &summary, render_text, render_pretty)
}

fn render_text(summary: &GameSummary, w: &mut dyn Write) -> io::Result<()> {
    let report = &summary.correlation;
    writeln!(
        w,
        "records {} -> {} assists={} steals={} blocks={} fouls_on={} substitutions={} \
         discarded_blocks={} free_throw_trips={}",
        report.input_records,
        report.output_records,
        report.assists,
        report.steals,
        report.blocks,
        report.fouls_on,
        report.substitutions,
        report.discarded_blocks,
        summary.free_throw_trips
    )?;
    for period in &summary.periods {
        writeln!(w, "period {}\t{}", period.period, period.events)?;
    }
    Ok(())
}

fn render_pretty(summary: &GameSummary, w: &mut dyn Write) -> io::Result<()> {
    let report = &summary.correlation;
    pretty_section(w, "Correlation")?;
    pretty_kv(w, "Records in", report.input_records.to_string())?;
    pretty_kv(w, "Records out", report.output_records.to_string())?;
    pretty_kv(w, "Assists", report.assists.to_string())?;
    pretty_kv(w, "Steals", report.steals.to_string())?;
    pretty_kv(w, "Blocks", report.blocks.to_string())?;
    pretty_kv(w, "Fouls drawn", report.fouls_on.to_string())?;
    pretty_kv(w, "Substitutions", report.substitutions.to_string())?;
    pretty_kv(w, "Discarded blocks", report.discarded_blocks.to_string())?;
    pretty_kv(w, "Free throw trips", summary.free_throw_trips.to_string())?;

    writeln!(w)?;
    pretty_section(w, "Periods")?;
    for period in &summary.periods {
        pretty_kv(w, &format!("Period {}", period.period), period.events.to_string())?;
    }
    Ok(())
}

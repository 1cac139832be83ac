//! `pbp enrich`: print the enriched event stream.

use std::io::{self, Write};
use std::path::PathBuf;

use clap::Args;
use pbp_core::EnrichConfig;
use pbp_core::event::EventRecord;

use crate::output::{OutputMode, pretty_section, render_mode};

#[derive(Args, Debug)]
pub struct EnrichArgs {
    /// JSON file holding an array of raw event records, in game order.
    pub file: PathBuf,
}

pub fn run_enrich(
    args: &EnrichArgs,
    config: &EnrichConfig,
    output: OutputMode,
) -> anyhow::Result<()> {
    let game = super::load_game(&args.file, config, output)?;
    render_mode(output, game.events.as_slice(), render_text, render_pretty)
}

fn render_text(events: &[EventRecord], w: &mut dyn Write) -> io::Result<()> {
    for (i, event) in events.iter().enumerate() {
        writeln!(w, "{i}\t{}", describe(event))?;
    }
    Ok(())
}

fn render_pretty(events: &[EventRecord], w: &mut dyn Write) -> io::Result<()> {
    let mut current_period = None;
    for (i, event) in events.iter().enumerate() {
        if current_period != Some(event.period) {
            if current_period.is_some() {
                writeln!(w)?;
            }
            pretty_section(w, &period_heading(event.period))?;
            current_period = Some(event.period);
        }
        writeln!(w, "{i:>5}  {}", describe(event))?;
        let fouls = foul_line(event);
        if !fouls.is_empty() {
            writeln!(w, "{:>5}  {fouls}", "")?;
        }
    }
    Ok(())
}

fn period_heading(period: u8) -> String {
    if period <= 4 {
        format!("Period {period}")
    } else {
        format!("Overtime {}", period - 4)
    }
}

/// Base record description plus any merged partners.
fn describe(event: &EventRecord) -> String {
    let mut line = event.to_string();
    let partners = [
        ("assist", &event.assist),
        ("steal", &event.steal),
        ("block", &event.block),
        ("fouled", &event.foul_on),
    ];
    for (label, player) in partners {
        if let Some(player) = player {
            line.push_str(&format!(" [{label} {player}]"));
        }
    }
    if let Some(ordinal) = event.free_throw_ordinal {
        line.push_str(&format!(" ({ordinal})"));
    }
    line
}

/// Team foul bank after a foul, e.g. `fouls to give: A 2, B 4`.
fn foul_line(event: &EventRecord) -> String {
    if !event.counts_as_personal_foul() {
        return String::new();
    }
    let bank: Vec<String> = event
        .fouls_to_give
        .teams()
        .map(|team| format!("{team} {}", event.fouls_to_give.get(team)))
        .collect();
    if bank.is_empty() {
        return String::new();
    }
    format!("fouls to give: {}", bank.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pbp_core::event::{ActionType, GameClock, FreeThrowOrdinal};

    #[test]
    fn describe_lists_partners_and_ordinal() {
        let mut shot = EventRecord::new(1, 1, GameClock::from_secs(50), ActionType::FreeThrow)
            .with_team("A")
            .with_player("a1")
            .with_made(true);
        shot.free_throw_ordinal = Some(FreeThrowOrdinal { number: 1, total: 2 });
        let line = describe(&shot);
        assert!(line.ends_with("(1 of 2)"), "{line}");

        let mut turnover =
            EventRecord::new(2, 1, GameClock::from_secs(40), ActionType::Turnover).with_team("A");
        turnover.steal = Some("b7".into());
        assert!(describe(&turnover).contains("[steal b7]"));
    }

    #[test]
    fn overtime_headings() {
        assert_eq!(period_heading(4), "Period 4");
        assert_eq!(period_heading(6), "Overtime 2");
    }

    #[test]
    fn pretty_groups_by_period() {
        let events = vec![
            EventRecord::new(1, 1, GameClock::from_secs(600), ActionType::StartOfPeriod),
            EventRecord::new(2, 2, GameClock::from_secs(600), ActionType::StartOfPeriod),
        ];
        let mut buf = Vec::new();
        render_pretty(&events, &mut buf).expect("render");
        let text = String::from_utf8(buf).expect("utf8");
        assert!(text.contains("Period 1"));
        assert!(text.contains("Period 2"));
    }
}

//! Opt-in wall-clock timing of pipeline stages.
//!
//! Off by default. Turned on by `--timing` on the CLI or `PBP_TIMING=1`.
//! Samples are kept per thread and drained by [`collect_report`].

use std::cell::RefCell;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use serde_json::json;

/// Environment variable that switches stage timing on.
pub const TIMING_ENV: &str = "PBP_TIMING";

/// Stage names recorded by the pipeline, in execution order.
pub const STAGE_CORRELATE: &str = "enrich.correlate";
pub const STAGE_CHAIN: &str = "enrich.chain";
pub const STAGE_FREE_THROWS: &str = "enrich.free_throws";

/// Aggregated stage timings, in the order stages first ran.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StageReport {
    pub stages: Vec<StageTiming>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageTiming {
    pub name: String,
    /// Number of times the stage ran.
    pub runs: usize,
    pub total: Duration,
    /// Slowest single run.
    pub max: Duration,
}

thread_local! {
    static SAMPLES: RefCell<Vec<(String, Duration)>> = const { RefCell::new(Vec::new()) };
}

static TIMING_ENABLED: AtomicBool = AtomicBool::new(false);

/// `true` when `PBP_TIMING` holds `1`, `true`, `yes` or `on` (any case).
#[must_use]
pub fn timing_enabled_from_env() -> bool {
    std::env::var(TIMING_ENV)
        .ok()
        .is_some_and(|value| is_truthy(&value))
}

pub fn set_timing_enabled(enabled: bool) {
    TIMING_ENABLED.store(enabled, Ordering::Relaxed);
    if !enabled {
        clear_timings();
    }
}

#[must_use]
pub fn is_timing_enabled() -> bool {
    TIMING_ENABLED.load(Ordering::Relaxed)
}

pub fn clear_timings() {
    SAMPLES.with(|samples| samples.borrow_mut().clear());
}

/// Run `f`, recording its duration under `stage` when timing is enabled.
pub fn timed<R>(stage: &str, f: impl FnOnce() -> R) -> R {
    if !is_timing_enabled() {
        return f();
    }

    let started = Instant::now();
    let result = f();
    record_sample(stage, started.elapsed());
    result
}

/// Drain this thread's samples into a report.
#[must_use]
pub fn collect_report() -> StageReport {
    let samples = SAMPLES.with(|samples| std::mem::take(&mut *samples.borrow_mut()));

    let mut stages: Vec<StageTiming> = Vec::new();
    for (name, elapsed) in samples {
        if let Some(stage) = stages.iter_mut().find(|s| s.name == name) {
            stage.runs += 1;
            stage.total += elapsed;
            stage.max = stage.max.max(elapsed);
        } else {
            stages.push(StageTiming {
                name,
                runs: 1,
                total: elapsed,
                max: elapsed,
            });
        }
    }

    StageReport { stages }
}

impl StageReport {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Sum of every stage's total.
    #[must_use]
    pub fn total(&self) -> Duration {
        self.stages.iter().map(|s| s.total).sum()
    }

    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        let stages = self
            .stages
            .iter()
            .map(|stage| {
                json!({
                    "stage": stage.name,
                    "runs": stage.runs,
                    "total_us": stage.total.as_micros(),
                    "max_us": stage.max.as_micros(),
                })
            })
            .collect::<Vec<_>>();

        json!({ "stages": stages, "total_us": self.total().as_micros() })
    }

    /// Plain table for stderr.
    #[must_use]
    pub fn display_table(&self) -> String {
        use std::fmt::Write as _;

        if self.stages.is_empty() {
            return "No timing samples recorded.".to_string();
        }

        let mut out = String::new();
        out.push_str("stage                      runs      total        max\n");
        out.push_str("----------------------------------------------------\n");
        for stage in &self.stages {
            let _ = writeln!(
                out,
                "{:<24} {:>6} {:>10} {:>10}",
                stage.name,
                stage.runs,
                format_duration(stage.total),
                format_duration(stage.max)
            );
        }
        let _ = writeln!(out, "{:<24} {:>6} {:>10}", "total", "", format_duration(self.total()));
        out
    }
}

fn record_sample(stage: &str, elapsed: Duration) {
    SAMPLES.with(|samples| samples.borrow_mut().push((stage.to_string(), elapsed)));
}

fn format_duration(duration: Duration) -> String {
    let micros = duration.as_micros();
    if micros >= 1_000_000 {
        format!("{}.{:03}s", micros / 1_000_000, (micros % 1_000_000) / 1_000)
    } else if micros >= 1_000 {
        format!("{}.{:03}ms", micros / 1_000, micros % 1_000)
    } else {
        format!("{micros}µs")
    }
}

fn is_truthy(value: &str) -> bool {
    ["1", "true", "yes", "on"]
        .iter()
        .any(|t| value.eq_ignore_ascii_case(t))
}

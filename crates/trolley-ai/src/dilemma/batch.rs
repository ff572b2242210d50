use std::io::{Read, Write};

use serde::{Deserialize, Deserializer, Serialize};
use tracing::info;

use super::domain::{HeadCount, TrackId};
use super::scenario::AggregateScenario;
use super::strategy::{DecisionEngine, DecisionMetrics, DecisionMode};

/// Failure while streaming a batch of aggregate scenarios.
#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to flush batch output: {0}")]
    Io(#[from] std::io::Error),
}

/// Counts of what a batch run produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub rows: usize,
    pub track1_chosen: usize,
    pub track2_chosen: usize,
}

/// Decides every aggregate scenario in `input` and writes one decision row per scenario.
///
/// Input columns follow the legacy feature order (`t1_children` .. `t2_elders`) plus an
/// optional `mode`; blank cells read as zero or as the default mode.
pub fn decide_batch<R: Read, W: Write>(
    engine: &DecisionEngine,
    input: R,
    output: W,
) -> Result<BatchSummary, BatchError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(input);
    let mut csv_writer = csv::Writer::from_writer(output);
    let mut summary = BatchSummary::default();

    for record in csv_reader.deserialize::<ScenarioRow>() {
        let row = record?;
        let result = engine.decide_aggregate(&row.into_scenario());

        let (track1_total, track2_total) = match result.metrics {
            DecisionMetrics::Totals {
                track1_total,
                track2_total,
            } => (track1_total, track2_total),
            DecisionMetrics::Roster { .. } => (0, 0),
        };

        csv_writer.serialize(DecisionRow {
            chosen_track: result.chosen_track.index(),
            reason: &result.reason,
            track1_total,
            track2_total,
        })?;

        summary.rows += 1;
        match result.chosen_track {
            TrackId::One => summary.track1_chosen += 1,
            TrackId::Two => summary.track2_chosen += 1,
        }
    }

    csv_writer.flush()?;
    info!(
        rows = summary.rows,
        track1_chosen = summary.track1_chosen,
        track2_chosen = summary.track2_chosen,
        "batch decided"
    );
    Ok(summary)
}

#[derive(Debug, Deserialize)]
struct ScenarioRow {
    #[serde(default)]
    t1_children: Option<u32>,
    #[serde(default)]
    t1_adults: Option<u32>,
    #[serde(default)]
    t1_elders: Option<u32>,
    #[serde(default)]
    t2_children: Option<u32>,
    #[serde(default)]
    t2_adults: Option<u32>,
    #[serde(default)]
    t2_elders: Option<u32>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    mode: Option<String>,
}

impl ScenarioRow {
    fn into_scenario(self) -> AggregateScenario {
        let track1 = HeadCount::new(
            self.t1_children.unwrap_or_default(),
            self.t1_adults.unwrap_or_default(),
            self.t1_elders.unwrap_or_default(),
        );
        let track2 = HeadCount::new(
            self.t2_children.unwrap_or_default(),
            self.t2_adults.unwrap_or_default(),
            self.t2_elders.unwrap_or_default(),
        );
        let mode = self
            .mode
            .map(DecisionMode::from)
            .unwrap_or(DecisionMode::Normal);
        AggregateScenario::new(track1, track2, mode)
    }
}

#[derive(Debug, Serialize)]
struct DecisionRow<'a> {
    chosen_track: u8,
    reason: &'a str,
    track1_total: u64,
    track2_total: u64,
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const INPUT: &str = "\
t1_children,t1_adults,t1_elders,t2_children,t2_adults,t2_elders,mode
2,0,0,0,3,0,
1,5,0,2,0,0,children_first
0,0,0,0,0,0,utilitarian
";

    #[test]
    fn every_row_yields_a_decision() {
        let engine = DecisionEngine::without_classifier();
        let mut output = Vec::new();

        let summary = decide_batch(&engine, INPUT.as_bytes(), &mut output).expect("batch runs");

        assert_eq!(
            summary,
            BatchSummary {
                rows: 3,
                track1_chosen: 3,
                track2_chosen: 0,
            }
        );

        let written = String::from_utf8(output).expect("utf8 output");
        let mut lines = written.lines();
        assert_eq!(
            lines.next(),
            Some("chosen_track,reason,track1_total,track2_total")
        );
        assert!(lines.next().is_some_and(|line| line.starts_with("1,") && line.ends_with(",2,3")));
        assert!(lines.next().is_some_and(|line| line.ends_with(",6,2")));
        assert!(lines
            .next()
            .is_some_and(|line| line.contains("not implemented")));
    }

    #[test]
    fn blank_cells_read_as_zero() {
        let input = "t1_children,t1_adults,t1_elders,t2_children,t2_adults,t2_elders\n,1,,,,2\n";
        let engine = DecisionEngine::without_classifier();
        let mut output = Vec::new();

        decide_batch(&engine, input.as_bytes(), &mut output).expect("batch runs");

        let written = String::from_utf8(output).expect("utf8 output");
        assert!(written.lines().nth(1).is_some_and(|line| line.ends_with(",1,2")));
    }

    #[test]
    fn malformed_counts_surface_as_csv_errors() {
        let input = "t1_children,t1_adults,t1_elders,t2_children,t2_adults,t2_elders\nmany,0,0,0,0,0\n";
        let engine = DecisionEngine::without_classifier();

        let error = decide_batch(&engine, input.as_bytes(), Vec::new()).expect_err("bad row");
        assert!(matches!(error, BatchError::Csv(_)));
    }
}

use super::super::domain::Roster;
use super::super::scoring::track_loss;
use super::super::weights::WeightTable;
use super::policy::{lower_side, DecisionMetrics, DecisionRule, Verdict};

/// Loss and head count of both tracks under one weight table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RosterMeasures {
    pub(crate) track1_loss: i64,
    pub(crate) track2_loss: i64,
    pub(crate) track1_count: usize,
    pub(crate) track2_count: usize,
}

impl RosterMeasures {
    pub(crate) fn measure(track1: &Roster, track2: &Roster, table: &WeightTable) -> Self {
        Self {
            track1_loss: track_loss(track1, table),
            track2_loss: track_loss(track2, table),
            track1_count: track1.len(),
            track2_count: track2.len(),
        }
    }

    pub(crate) fn metrics(&self) -> DecisionMetrics {
        DecisionMetrics::Roster {
            track1_count: self.track1_count,
            track2_count: self.track2_count,
            track1_loss: self.track1_loss,
            track2_loss: self.track2_loss,
        }
    }
}

/// Loss comparator chain shared by the utilitarian, custom, and deontological fallbacks:
/// lower loss is sacrificed, then lower head count, then track 1.
pub(crate) fn weigh_losses(context: &str, measures: &RosterMeasures) -> Verdict {
    let RosterMeasures {
        track1_loss,
        track2_loss,
        track1_count,
        track2_count,
    } = *measures;

    if let Some(track) = lower_side(track1_loss, track2_loss) {
        return Verdict::new(
            track,
            DecisionRule::EthicalLoss,
            format!(
                "{context}: track {track} sacrificed because it carries the lower ethical loss \
                 (track 1 loss = {track1_loss}, track 2 loss = {track2_loss})."
            ),
        );
    }

    if let Some(track) = lower_side(track1_count, track2_count) {
        return Verdict::new(
            track,
            DecisionRule::HeadCount,
            format!(
                "{context}: ethical loss is equal ({track1_loss}); track {track} holds fewer \
                 people (track 1 = {track1_count}, track 2 = {track2_count}) and was sacrificed."
            ),
        );
    }

    Verdict::default_track(format!(
        "{context}: ethical loss ({track1_loss}) and head count ({track1_count}) are equal; \
         track 1 chosen by default."
    ))
}

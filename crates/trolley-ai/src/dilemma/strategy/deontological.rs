use super::super::domain::{AgeGroup, Flag, Roster, TrackId};
use super::mode::DeonVariant;
use super::policy::{higher_side, DecisionRule, Verdict};
use super::utilitarian::{weigh_losses, RosterMeasures};

const GUILTY_FLAGS: [Flag; 2] = [Flag::Guilty, Flag::LawBreaker];
const VULNERABLE_FLAGS: [Flag; 3] = [Flag::Pregnant, Flag::Disabled, Flag::Vulnerable];

/// Applies the named duty-based rule; rules that cannot separate the tracks defer to the
/// default-weight loss comparison in `measures`.
pub(crate) fn decide(
    variant: &DeonVariant,
    track1: &Roster,
    track2: &Roster,
    measures: &RosterMeasures,
) -> Verdict {
    match variant {
        DeonVariant::NonIntervention => Verdict::new(
            TrackId::One,
            DecisionRule::NonIntervention,
            "Deontological (non-intervention): the lever was not pulled, so the trolley \
             continued along track 1.",
        ),
        DeonVariant::ProtectChildren => protect_children(track1, track2, measures),
        DeonVariant::ProtectInnocent => protect_innocent(track1, track2, measures),
        DeonVariant::ProtectVulnerable => protect_vulnerable(track1, track2, measures),
        DeonVariant::Unrecognized(raw) => Verdict::new(
            TrackId::One,
            DecisionRule::UnrecognizedVariant,
            format!("Deontological variant '{raw}' is not recognized; track 1 chosen by default."),
        ),
    }
}

fn protect_children(track1: &Roster, track2: &Roster, measures: &RosterMeasures) -> Verdict {
    let has_child1 = track1.has_age(AgeGroup::Child);
    let has_child2 = track2.has_age(AgeGroup::Child);

    let protected = match (has_child1, has_child2) {
        (true, false) => Some(TrackId::One),
        (false, true) => Some(TrackId::Two),
        _ => None,
    };

    match protected {
        Some(protected) => {
            let track = protected.other();
            Verdict::new(
                track,
                DecisionRule::ChildPresence,
                format!(
                    "Deontological (protect children): only track {protected} holds a child, \
                     so track {track} was sacrificed."
                ),
            )
        }
        None => {
            let presence = if has_child1 { "both" } else { "neither" };
            weigh_losses(
                &format!(
                    "Deontological (protect children), {presence} track(s) hold a child, \
                     utilitarian fallback"
                ),
                measures,
            )
        }
    }
}

fn protect_innocent(track1: &Roster, track2: &Roster, measures: &RosterMeasures) -> Verdict {
    let guilty1 = track1.count_flags(&GUILTY_FLAGS);
    let guilty2 = track2.count_flags(&GUILTY_FLAGS);

    match higher_side(guilty1, guilty2) {
        Some(track) => Verdict::new(
            track,
            DecisionRule::GuiltyCount,
            format!(
                "Deontological (protect innocent): track {track} carries more guilty or \
                 law-breaking marks (track 1 = {guilty1}, track 2 = {guilty2}) and was sacrificed."
            ),
        ),
        None => weigh_losses(
            &format!(
                "Deontological (protect innocent), guilty marks equal ({guilty1}), \
                 utilitarian fallback"
            ),
            measures,
        ),
    }
}

fn protect_vulnerable(track1: &Roster, track2: &Roster, measures: &RosterMeasures) -> Verdict {
    let vulnerable1 = track1.count_flags(&VULNERABLE_FLAGS);
    let vulnerable2 = track2.count_flags(&VULNERABLE_FLAGS);

    let protected = match (vulnerable1, vulnerable2) {
        (v1, 0) if v1 > 0 => Some(TrackId::One),
        (0, v2) if v2 > 0 => Some(TrackId::Two),
        _ => None,
    };

    match protected {
        Some(protected) => {
            let track = protected.other();
            Verdict::new(
                track,
                DecisionRule::VulnerablePresence,
                format!(
                    "Deontological (protect vulnerable): only track {protected} holds pregnant, \
                     disabled or vulnerable people (track 1 = {vulnerable1}, track 2 = \
                     {vulnerable2}), so track {track} was sacrificed."
                ),
            )
        }
        None => weigh_losses(
            &format!(
                "Deontological (protect vulnerable), vulnerable marks track 1 = {vulnerable1}, \
                 track 2 = {vulnerable2}, utilitarian fallback"
            ),
            measures,
        ),
    }
}

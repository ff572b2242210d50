use super::super::domain::{HeadCount, TrackId};
use super::policy::{lower_side, DecisionRule, Verdict};

/// Head-count policy: sacrifice the smaller group; on equal totals protect the side
/// with more children; on a full tie default to track 1.
pub(crate) fn simple_count(track1: &HeadCount, track2: &HeadCount) -> Verdict {
    let (total1, total2) = (track1.total(), track2.total());

    if let Some(track) = lower_side(total1, total2) {
        let (own, other) = ordered(track, total1, total2);
        return Verdict::new(
            track,
            DecisionRule::TotalCount,
            format!(
                "Track {track} sacrificed: it holds {own} people against {other} on track {}.",
                track.other()
            ),
        );
    }

    if let Some(track) = lower_side(track1.children, track2.children) {
        let (own, other) = ordered(track, track1.children, track2.children);
        return Verdict::new(
            track,
            DecisionRule::ChildCount,
            format!(
                "Totals are equal ({total1}); track {} holds more children ({other} vs {own}), \
                 so track {track} was sacrificed.",
                track.other()
            ),
        );
    }

    Verdict::default_track(format!(
        "Both tracks are identical ({total1} people, {} children); track 1 chosen by default.",
        track1.children
    ))
}

/// Children-first policy: child count decides, total count breaks ties, track 1 otherwise.
pub(crate) fn children_first(track1: &HeadCount, track2: &HeadCount) -> Verdict {
    if let Some(track) = lower_side(track1.children, track2.children) {
        let (own, other) = ordered(track, track1.children, track2.children);
        return Verdict::new(
            track,
            DecisionRule::ChildCount,
            format!(
                "Children first: track {track} holds fewer children ({own} vs {other}), \
                 so it was sacrificed to save more children."
            ),
        );
    }

    let (total1, total2) = (track1.total(), track2.total());
    if let Some(track) = lower_side(total1, total2) {
        let (own, other) = ordered(track, total1, total2);
        return Verdict::new(
            track,
            DecisionRule::TotalCount,
            format!(
                "Children first: child counts are equal ({}); track {track} has the smaller \
                 total ({own} vs {other}) and was sacrificed.",
                track1.children
            ),
        );
    }

    Verdict::default_track(format!(
        "Children first: children ({}) and totals ({total1}) are equal; track 1 chosen by default.",
        track1.children
    ))
}

fn ordered<T>(track: TrackId, value1: T, value2: T) -> (T, T) {
    match track {
        TrackId::One => (value1, value2),
        TrackId::Two => (value2, value1),
    }
}

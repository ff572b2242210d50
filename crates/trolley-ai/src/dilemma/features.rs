//! Fixed-order feature encodings handed to the external classifier.
//!
//! Column order is a wire contract with the fitted model and must never be permuted:
//! * legacy: `[t1_children, t1_adults, t1_elders, t2_children, t2_adults, t2_elders]`
//! * extended: 25 columns per track (4 age, 11 role, 10 flag), track 1 before track 2.

use std::fmt;

use serde::Serialize;

use super::domain::{AgeGroup, Flag, HeadCount, Person, Role, Roster};

pub const LEGACY_FEATURE_COUNT: usize = 6;
pub const EXTENDED_TRACK_WIDTH: usize = 25;
pub const EXTENDED_FEATURE_COUNT: usize = EXTENDED_TRACK_WIDTH * 2;

const LEGACY_COLUMNS: [&str; LEGACY_FEATURE_COUNT] = [
    "t1_children",
    "t1_adults",
    "t1_elders",
    "t2_children",
    "t2_adults",
    "t2_elders",
];

const AGE_COLUMNS: [&str; 4] = ["child", "teen", "adult", "elder"];
const ROLE_OFFSET: usize = AGE_COLUMNS.len();
const FLAG_OFFSET: usize = ROLE_OFFSET + Role::ALL.len();

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EncodingScheme {
    Legacy,
    Extended,
}

impl EncodingScheme {
    pub fn width(self) -> usize {
        match self {
            Self::Legacy => LEGACY_FEATURE_COUNT,
            Self::Extended => EXTENDED_FEATURE_COUNT,
        }
    }

    /// Column names in classifier order.
    pub fn columns(self) -> Vec<String> {
        match self {
            Self::Legacy => LEGACY_COLUMNS.iter().map(|name| name.to_string()).collect(),
            Self::Extended => ["t1_", "t2_"]
                .iter()
                .flat_map(|prefix| {
                    extended_track_columns()
                        .into_iter()
                        .map(move |column| format!("{prefix}{column}"))
                })
                .collect(),
        }
    }
}

impl fmt::Display for EncodingScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Legacy => write!(f, "legacy"),
            Self::Extended => write!(f, "extended"),
        }
    }
}

fn extended_track_columns() -> Vec<String> {
    AGE_COLUMNS
        .iter()
        .map(|age| age.to_string())
        .chain(Role::ALL.iter().map(|role| role.label().to_string()))
        .chain(Flag::ALL.iter().map(|flag| format!("{}_flag", flag.label())))
        .collect()
}

/// Encoded scenario ready for the classifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeatureVector {
    scheme: EncodingScheme,
    values: Vec<u32>,
}

impl FeatureVector {
    pub fn scheme(&self) -> EncodingScheme {
        self.scheme
    }

    pub fn values(&self) -> &[u32] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

pub fn encode_legacy(track1: &HeadCount, track2: &HeadCount) -> FeatureVector {
    FeatureVector {
        scheme: EncodingScheme::Legacy,
        values: vec![
            track1.children,
            track1.adults,
            track1.elders,
            track2.children,
            track2.adults,
            track2.elders,
        ],
    }
}

/// Legacy encoding of roster tracks, bucketing ages into children/adults/elders.
pub fn encode_legacy_roster(track1: &Roster, track2: &Roster) -> FeatureVector {
    encode_legacy(&track1.head_count(), &track2.head_count())
}

pub fn encode_extended(track1: &Roster, track2: &Roster) -> FeatureVector {
    let mut values = Vec::with_capacity(EXTENDED_FEATURE_COUNT);
    values.extend_from_slice(&encode_track(track1));
    values.extend_from_slice(&encode_track(track2));
    FeatureVector {
        scheme: EncodingScheme::Extended,
        values,
    }
}

fn encode_track(track: &Roster) -> [u32; EXTENDED_TRACK_WIDTH] {
    let mut columns = [0u32; EXTENDED_TRACK_WIDTH];
    for person in track.people() {
        columns[age_column(person)] += 1;
        columns[role_column(person)] += 1;
        for flag in person.flags() {
            columns[FLAG_OFFSET + flag_position(flag)] += 1;
        }
    }
    columns
}

// young, unset and unrecognized ages all share the adult column
fn age_column(person: &Person) -> usize {
    match person.age() {
        Some(AgeGroup::Child) => 0,
        Some(AgeGroup::Teen) => 1,
        Some(AgeGroup::Young | AgeGroup::Adult) | None => 2,
        Some(AgeGroup::Elder) => 3,
    }
}

fn role_column(person: &Person) -> usize {
    let role = person.role().unwrap_or(Role::Other);
    let position = Role::ALL
        .iter()
        .position(|candidate| *candidate == role)
        .unwrap_or(Role::ALL.len() - 1);
    ROLE_OFFSET + position
}

fn flag_position(flag: Flag) -> usize {
    Flag::ALL
        .iter()
        .position(|candidate| *candidate == flag)
        .unwrap_or_default()
}

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Index of one of the two tracks. A decision always names exactly one of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum TrackId {
    One,
    Two,
}

impl TrackId {
    pub fn from_index(index: i64) -> Option<Self> {
        match index {
            1 => Some(Self::One),
            2 => Some(Self::Two),
            _ => None,
        }
    }

    pub fn index(self) -> u8 {
        match self {
            Self::One => 1,
            Self::Two => 2,
        }
    }

    pub fn other(self) -> Self {
        match self {
            Self::One => Self::Two,
            Self::Two => Self::One,
        }
    }
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.index())
    }
}

impl From<TrackId> for u8 {
    fn from(value: TrackId) -> Self {
        value.index()
    }
}

impl TryFrom<u8> for TrackId {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::from_index(i64::from(value)).ok_or_else(|| format!("track id must be 1 or 2, got {value}"))
    }
}

/// Age bracket of a person. Unrecognized labels are treated as unset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AgeGroup {
    Child,
    Teen,
    Young,
    Adult,
    Elder,
}

impl AgeGroup {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "child" => Some(Self::Child),
            "teen" => Some(Self::Teen),
            "young" => Some(Self::Young),
            "adult" => Some(Self::Adult),
            "elder" => Some(Self::Elder),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Child => "child",
            Self::Teen => "teen",
            Self::Young => "young",
            Self::Adult => "adult",
            Self::Elder => "elder",
        }
    }
}

/// Occupational or social role. Anything outside the vocabulary folds into `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Doctor,
    Nurse,
    Teacher,
    Engineer,
    Student,
    Unemployed,
    Retired,
    Pregnant,
    Criminal,
    Thief,
    Other,
}

impl Role {
    /// Column order of the role block in the extended feature encoding.
    pub const ALL: [Role; 11] = [
        Role::Doctor,
        Role::Nurse,
        Role::Teacher,
        Role::Engineer,
        Role::Student,
        Role::Unemployed,
        Role::Retired,
        Role::Pregnant,
        Role::Criminal,
        Role::Thief,
        Role::Other,
    ];

    pub fn parse(raw: &str) -> Self {
        match raw {
            "doctor" => Self::Doctor,
            "nurse" => Self::Nurse,
            "teacher" => Self::Teacher,
            "engineer" => Self::Engineer,
            "student" => Self::Student,
            "unemployed" => Self::Unemployed,
            "retired" => Self::Retired,
            "pregnant" | "pregnant_role" => Self::Pregnant,
            "criminal" => Self::Criminal,
            "thief" => Self::Thief,
            _ => Self::Other,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Doctor => "doctor",
            Self::Nurse => "nurse",
            Self::Teacher => "teacher",
            Self::Engineer => "engineer",
            Self::Student => "student",
            Self::Unemployed => "unemployed",
            Self::Retired => "retired",
            Self::Pregnant => "pregnant_role",
            Self::Criminal => "criminal",
            Self::Thief => "thief",
            Self::Other => "other",
        }
    }
}

/// Situational attribute attached to a person.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Flag {
    Pregnant,
    Disabled,
    Innocent,
    Guilty,
    LawBreaker,
    Relative,
    Friend,
    Stranger,
    SavesLives,
    Vulnerable,
}

impl Flag {
    /// Column order of the flag block in the extended feature encoding.
    pub const ALL: [Flag; 10] = [
        Flag::Pregnant,
        Flag::Disabled,
        Flag::Innocent,
        Flag::Guilty,
        Flag::LawBreaker,
        Flag::Relative,
        Flag::Friend,
        Flag::Stranger,
        Flag::SavesLives,
        Flag::Vulnerable,
    ];

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "pregnant" => Some(Self::Pregnant),
            "disabled" => Some(Self::Disabled),
            "innocent" => Some(Self::Innocent),
            "guilty" => Some(Self::Guilty),
            "law_breaker" => Some(Self::LawBreaker),
            "relative" => Some(Self::Relative),
            "friend" => Some(Self::Friend),
            "stranger" => Some(Self::Stranger),
            "saves_lives" => Some(Self::SavesLives),
            "vulnerable" => Some(Self::Vulnerable),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Pregnant => "pregnant",
            Self::Disabled => "disabled",
            Self::Innocent => "innocent",
            Self::Guilty => "guilty",
            Self::LawBreaker => "law_breaker",
            Self::Relative => "relative",
            Self::Friend => "friend",
            Self::Stranger => "stranger",
            Self::SavesLives => "saves_lives",
            Self::Vulnerable => "vulnerable",
        }
    }
}

/// A person standing on a track. Attributes are normalized once, at construction.
///
/// Category labels match exactly: `"Child"` is not `"child"`. An unmatched age reads as
/// unset, an unmatched role as `other`, and unmatched or non-string flags are dropped.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "PersonPayload")]
pub struct Person {
    age: Option<AgeGroup>,
    role: Option<Role>,
    flags: BTreeSet<Flag>,
}

impl Person {
    pub fn new(
        age: Option<AgeGroup>,
        role: Option<Role>,
        flags: impl IntoIterator<Item = Flag>,
    ) -> Self {
        Self {
            age,
            role,
            flags: flags.into_iter().collect(),
        }
    }

    pub fn age(&self) -> Option<AgeGroup> {
        self.age
    }

    pub fn role(&self) -> Option<Role> {
        self.role
    }

    pub fn flags(&self) -> impl Iterator<Item = Flag> + '_ {
        self.flags.iter().copied()
    }

    pub fn has_flag(&self, flag: Flag) -> bool {
        self.flags.contains(&flag)
    }
}

/// Loosely typed wire shape accepted for a person.
#[derive(Debug, Default, Deserialize)]
struct PersonPayload {
    #[serde(default)]
    age: Option<Value>,
    #[serde(default)]
    role: Option<Value>,
    #[serde(default)]
    flags: Option<Vec<Value>>,
}

impl From<PersonPayload> for Person {
    fn from(payload: PersonPayload) -> Self {
        let flags = payload
            .flags
            .unwrap_or_default()
            .iter()
            .filter_map(Value::as_str)
            .filter_map(Flag::parse)
            .collect();

        Self {
            age: payload.age.as_ref().and_then(Value::as_str).and_then(AgeGroup::parse),
            role: payload
                .role
                .map(|raw| raw.as_str().map_or(Role::Other, Role::parse)),
            flags,
        }
    }
}

/// Roster form of a track: the explicit list of people on it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Roster(Vec<Person>);

impl Roster {
    pub fn new(people: Vec<Person>) -> Self {
        Self(people)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn people(&self) -> &[Person] {
        &self.0
    }

    pub fn has_age(&self, age: AgeGroup) -> bool {
        self.0.iter().any(|person| person.age == Some(age))
    }

    /// Number of flag occurrences on this track drawn from `flags`.
    pub fn count_flags(&self, flags: &[Flag]) -> usize {
        self.0
            .iter()
            .map(|person| flags.iter().filter(|flag| person.has_flag(**flag)).count())
            .sum()
    }

    /// Buckets the roster into the legacy children/adults/elders counts.
    pub fn head_count(&self) -> HeadCount {
        let mut count = HeadCount::default();
        for person in &self.0 {
            match person.age {
                Some(AgeGroup::Child) => count.children += 1,
                Some(AgeGroup::Elder) => count.elders += 1,
                Some(AgeGroup::Teen | AgeGroup::Young | AgeGroup::Adult) | None => {
                    count.adults += 1
                }
            }
        }
        count
    }
}

impl FromIterator<Person> for Roster {
    fn from_iter<I: IntoIterator<Item = Person>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Aggregate (legacy) form of a track: pre-counted age buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HeadCount {
    #[serde(default, deserialize_with = "null_as_zero")]
    pub children: u32,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub adults: u32,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub elders: u32,
}

impl HeadCount {
    pub fn new(children: u32, adults: u32, elders: u32) -> Self {
        Self {
            children,
            adults,
            elders,
        }
    }

    /// Head count across all three buckets, widened so it cannot overflow.
    pub fn total(&self) -> u64 {
        u64::from(self.children) + u64::from(self.adults) + u64::from(self.elders)
    }
}

fn null_as_zero<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<u32>::deserialize(deserializer)?.unwrap_or_default())
}

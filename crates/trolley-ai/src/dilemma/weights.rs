//! Ethical weight tables and caller-supplied overrides.
//!
//! Each category (age, role, flag) is a record with one field per recognized value, so
//! lookups are exhaustive matches rather than string comparisons. Overrides mirror the records
//! with optional fields; a present field replaces the default, an absent one keeps it.

use serde::{Deserialize, Serialize};

use super::domain::{AgeGroup, Flag, Role};

/// Weight contributed by an unset age or an unset role, independent of any table.
pub const UNSET_WEIGHT: i64 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgeWeights {
    pub child: i64,
    pub teen: i64,
    pub young: i64,
    pub adult: i64,
    pub elder: i64,
}

impl Default for AgeWeights {
    fn default() -> Self {
        Self {
            child: 4,
            teen: 3,
            young: 3,
            adult: 2,
            elder: 1,
        }
    }
}

impl AgeWeights {
    pub fn weight(&self, age: Option<AgeGroup>) -> i64 {
        match age {
            Some(AgeGroup::Child) => self.child,
            Some(AgeGroup::Teen) => self.teen,
            Some(AgeGroup::Young) => self.young,
            Some(AgeGroup::Adult) => self.adult,
            Some(AgeGroup::Elder) => self.elder,
            None => UNSET_WEIGHT,
        }
    }

    fn apply(&mut self, overrides: &AgeOverrides) {
        override_field(&mut self.child, overrides.child);
        override_field(&mut self.teen, overrides.teen);
        override_field(&mut self.young, overrides.young);
        override_field(&mut self.adult, overrides.adult);
        override_field(&mut self.elder, overrides.elder);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleWeights {
    pub doctor: i64,
    pub nurse: i64,
    pub teacher: i64,
    pub engineer: i64,
    pub student: i64,
    pub unemployed: i64,
    pub retired: i64,
    pub pregnant: i64,
    pub criminal: i64,
    pub thief: i64,
    pub other: i64,
}

impl Default for RoleWeights {
    fn default() -> Self {
        Self {
            doctor: 4,
            nurse: 3,
            teacher: 3,
            engineer: 2,
            student: 2,
            unemployed: 1,
            retired: 1,
            pregnant: 3,
            criminal: -1,
            thief: 0,
            other: 1,
        }
    }
}

impl RoleWeights {
    pub fn weight(&self, role: Option<Role>) -> i64 {
        match role {
            Some(Role::Doctor) => self.doctor,
            Some(Role::Nurse) => self.nurse,
            Some(Role::Teacher) => self.teacher,
            Some(Role::Engineer) => self.engineer,
            Some(Role::Student) => self.student,
            Some(Role::Unemployed) => self.unemployed,
            Some(Role::Retired) => self.retired,
            Some(Role::Pregnant) => self.pregnant,
            Some(Role::Criminal) => self.criminal,
            Some(Role::Thief) => self.thief,
            Some(Role::Other) => self.other,
            None => UNSET_WEIGHT,
        }
    }

    fn apply(&mut self, overrides: &RoleOverrides) {
        override_field(&mut self.doctor, overrides.doctor);
        override_field(&mut self.nurse, overrides.nurse);
        override_field(&mut self.teacher, overrides.teacher);
        override_field(&mut self.engineer, overrides.engineer);
        override_field(&mut self.student, overrides.student);
        override_field(&mut self.unemployed, overrides.unemployed);
        override_field(&mut self.retired, overrides.retired);
        override_field(&mut self.pregnant, overrides.pregnant);
        override_field(&mut self.criminal, overrides.criminal);
        override_field(&mut self.thief, overrides.thief);
        override_field(&mut self.other, overrides.other);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlagWeights {
    pub pregnant: i64,
    pub disabled: i64,
    pub innocent: i64,
    pub guilty: i64,
    pub law_breaker: i64,
    pub relative: i64,
    pub friend: i64,
    pub stranger: i64,
    pub saves_lives: i64,
    pub vulnerable: i64,
}

impl Default for FlagWeights {
    fn default() -> Self {
        Self {
            pregnant: 3,
            disabled: 2,
            innocent: 1,
            guilty: -2,
            law_breaker: -1,
            relative: 2,
            friend: 1,
            stranger: 0,
            saves_lives: 2,
            vulnerable: 2,
        }
    }
}

impl FlagWeights {
    pub fn weight(&self, flag: Flag) -> i64 {
        match flag {
            Flag::Pregnant => self.pregnant,
            Flag::Disabled => self.disabled,
            Flag::Innocent => self.innocent,
            Flag::Guilty => self.guilty,
            Flag::LawBreaker => self.law_breaker,
            Flag::Relative => self.relative,
            Flag::Friend => self.friend,
            Flag::Stranger => self.stranger,
            Flag::SavesLives => self.saves_lives,
            Flag::Vulnerable => self.vulnerable,
        }
    }

    fn apply(&mut self, overrides: &FlagOverrides) {
        override_field(&mut self.pregnant, overrides.pregnant);
        override_field(&mut self.disabled, overrides.disabled);
        override_field(&mut self.innocent, overrides.innocent);
        override_field(&mut self.guilty, overrides.guilty);
        override_field(&mut self.law_breaker, overrides.law_breaker);
        override_field(&mut self.relative, overrides.relative);
        override_field(&mut self.friend, overrides.friend);
        override_field(&mut self.stranger, overrides.stranger);
        override_field(&mut self.saves_lives, overrides.saves_lives);
        override_field(&mut self.vulnerable, overrides.vulnerable);
    }
}

/// The age, role, and flag tables used to score a person.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WeightTable {
    pub age: AgeWeights,
    pub role: RoleWeights,
    pub flag: FlagWeights,
}

impl WeightTable {
    pub fn merged(&self, overrides: Option<&WeightOverrides>) -> Self {
        merge(self, overrides)
    }
}

/// Overlays `overrides` on `defaults`. Override values are not validated; negative
/// weights are a legitimate way to disfavor a category.
pub fn merge(defaults: &WeightTable, overrides: Option<&WeightOverrides>) -> WeightTable {
    let mut merged = *defaults;
    if let Some(overrides) = overrides {
        merged.age.apply(&overrides.age);
        merged.role.apply(&overrides.role);
        merged.flag.apply(&overrides.flag);
    }
    merged
}

fn override_field(slot: &mut i64, value: Option<i64>) {
    if let Some(value) = value {
        *slot = value;
    }
}

/// Partial replacement for the default tables, keyed the way callers submit custom rules.
/// Keys outside the vocabulary are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeightOverrides {
    #[serde(default, rename = "age_weights")]
    pub age: AgeOverrides,
    #[serde(default, rename = "role_weights")]
    pub role: RoleOverrides,
    #[serde(default, rename = "flag_weights")]
    pub flag: FlagOverrides,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgeOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub child: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub teen: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub young: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub adult: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elder: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoleOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doctor: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nurse: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub teacher: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub engineer: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unemployed: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retired: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none", alias = "pregnant_role")]
    pub pregnant: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub criminal: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thief: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub other: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlagOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pregnant: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disabled: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub innocent: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guilty: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub law_breaker: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relative: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub friend: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stranger: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub saves_lives: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vulnerable: Option<i64>,
}

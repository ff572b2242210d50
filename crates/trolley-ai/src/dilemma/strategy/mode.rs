use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Strategy family selected for a decision. Unknown selectors are kept verbatim so the
/// fallback can name them; a non-string selector is kept as its JSON text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Value", into = "String")]
pub enum DecisionMode {
    /// Simple head count ("normal").
    Normal,
    ChildrenFirst,
    Utilitarian,
    Custom,
    Deontological,
    /// Externally classified.
    Ml,
    Unrecognized(String),
}

impl DecisionMode {
    pub fn label(&self) -> &str {
        match self {
            Self::Normal => "normal",
            Self::ChildrenFirst => "children_first",
            Self::Utilitarian => "utilitarian",
            Self::Custom => "custom",
            Self::Deontological => "deontological",
            Self::Ml => "ml",
            Self::Unrecognized(raw) => raw,
        }
    }
}

impl From<String> for DecisionMode {
    fn from(raw: String) -> Self {
        let normalized = raw.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "normal" | "simple_count" => Self::Normal,
            "children_first" => Self::ChildrenFirst,
            "utilitarian" => Self::Utilitarian,
            "custom" => Self::Custom,
            "deontological" => Self::Deontological,
            "ml" => Self::Ml,
            _ => Self::Unrecognized(raw),
        }
    }
}

impl From<Value> for DecisionMode {
    fn from(raw: Value) -> Self {
        match raw {
            Value::String(raw) => Self::from(raw),
            other => Self::Unrecognized(other.to_string()),
        }
    }
}

impl From<&str> for DecisionMode {
    fn from(raw: &str) -> Self {
        Self::from(raw.to_string())
    }
}

impl From<DecisionMode> for String {
    fn from(mode: DecisionMode) -> Self {
        mode.label().to_string()
    }
}

impl fmt::Display for DecisionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Named deontological rule applied before any utilitarian fallback.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Value", into = "String")]
pub enum DeonVariant {
    #[default]
    NonIntervention,
    ProtectChildren,
    ProtectInnocent,
    ProtectVulnerable,
    Unrecognized(String),
}

impl DeonVariant {
    pub fn label(&self) -> &str {
        match self {
            Self::NonIntervention => "non_intervention",
            Self::ProtectChildren => "protect_children",
            Self::ProtectInnocent => "protect_innocent",
            Self::ProtectVulnerable => "protect_vulnerable",
            Self::Unrecognized(raw) => raw,
        }
    }
}

impl From<String> for DeonVariant {
    fn from(raw: String) -> Self {
        let normalized = raw.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "non_intervention" => Self::NonIntervention,
            "protect_children" => Self::ProtectChildren,
            "protect_innocent" => Self::ProtectInnocent,
            "protect_vulnerable" => Self::ProtectVulnerable,
            _ => Self::Unrecognized(raw),
        }
    }
}

impl From<Value> for DeonVariant {
    fn from(raw: Value) -> Self {
        match raw {
            Value::String(raw) => Self::from(raw),
            other => Self::Unrecognized(other.to_string()),
        }
    }
}

impl From<&str> for DeonVariant {
    fn from(raw: &str) -> Self {
        Self::from(raw.to_string())
    }
}

impl From<DeonVariant> for String {
    fn from(variant: DeonVariant) -> Self {
        variant.label().to_string()
    }
}

impl fmt::Display for DeonVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

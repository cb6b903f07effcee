use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TrainerError;

/// Every action a strategy table can prescribe.
///
/// Declaration order is the display priority used when listing the actions
/// available in a table. `Variable` marks solver indifference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ActionLabel {
    #[serde(rename = "fold")]
    Fold,
    #[serde(rename = "check")]
    Check,
    #[serde(rename = "limp")]
    Limp,
    #[serde(rename = "open")]
    Open,
    #[serde(rename = "call")]
    Call,
    #[serde(rename = "shove")]
    Shove,
    #[serde(rename = "open_shove")]
    OpenShove,
    #[serde(rename = "3bet_nai")]
    ThreeBetNai,
    #[serde(rename = "3bet_ai")]
    ThreeBetAi,
    #[serde(rename = "iso_nai")]
    IsoNai,
    #[serde(rename = "iso_ai")]
    IsoAi,
    #[serde(rename = "iso_all_in")]
    IsoAllIn,
    #[serde(rename = "iso_1_3_stack")]
    IsoThirdStack,
    #[serde(rename = "iso_size_value_call_all_in")]
    IsoSizeValueCallAllIn,
    #[serde(rename = "limp_fold")]
    LimpFold,
    #[serde(rename = "variable")]
    Variable,
}

pub const ALL_ACTIONS: [ActionLabel; 16] = [
    ActionLabel::Fold,
    ActionLabel::Check,
    ActionLabel::Limp,
    ActionLabel::Open,
    ActionLabel::Call,
    ActionLabel::Shove,
    ActionLabel::OpenShove,
    ActionLabel::ThreeBetNai,
    ActionLabel::ThreeBetAi,
    ActionLabel::IsoNai,
    ActionLabel::IsoAi,
    ActionLabel::IsoAllIn,
    ActionLabel::IsoThirdStack,
    ActionLabel::IsoSizeValueCallAllIn,
    ActionLabel::LimpFold,
    ActionLabel::Variable,
];

impl ActionLabel {
    /// Wire name as it appears in the dataset files.
    pub fn as_str(self) -> &'static str {
        match self {
            ActionLabel::Fold => "fold",
            ActionLabel::Check => "check",
            ActionLabel::Limp => "limp",
            ActionLabel::Open => "open",
            ActionLabel::Call => "call",
            ActionLabel::Shove => "shove",
            ActionLabel::OpenShove => "open_shove",
            ActionLabel::ThreeBetNai => "3bet_nai",
            ActionLabel::ThreeBetAi => "3bet_ai",
            ActionLabel::IsoNai => "iso_nai",
            ActionLabel::IsoAi => "iso_ai",
            ActionLabel::IsoAllIn => "iso_all_in",
            ActionLabel::IsoThirdStack => "iso_1_3_stack",
            ActionLabel::IsoSizeValueCallAllIn => "iso_size_value_call_all_in",
            ActionLabel::LimpFold => "limp_fold",
            ActionLabel::Variable => "variable",
        }
    }

    /// Human-readable name.
    pub fn display_name(self) -> &'static str {
        match self {
            ActionLabel::Fold => "Fold",
            ActionLabel::Check => "Check",
            ActionLabel::Limp => "Limp",
            ActionLabel::Open => "Open",
            ActionLabel::Call => "Call",
            ActionLabel::Shove => "Shove",
            ActionLabel::OpenShove => "Open shove",
            ActionLabel::ThreeBetNai => "3bet non all-in",
            ActionLabel::ThreeBetAi => "3bet all-in",
            ActionLabel::IsoNai => "Iso non all-in",
            ActionLabel::IsoAi | ActionLabel::IsoAllIn => "Iso all-in",
            ActionLabel::IsoThirdStack => "Iso 1/3 stack",
            ActionLabel::IsoSizeValueCallAllIn => "Iso size value/call all-in",
            ActionLabel::LimpFold => "Limp/fold",
            ActionLabel::Variable => "Variable",
        }
    }

    /// Whether the action puts the whole stack in.
    pub fn is_all_in(self) -> bool {
        matches!(
            self,
            ActionLabel::Shove
                | ActionLabel::OpenShove
                | ActionLabel::ThreeBetAi
                | ActionLabel::IsoAi
                | ActionLabel::IsoAllIn
        )
    }
}

impl fmt::Display for ActionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActionLabel {
    type Err = TrainerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        ALL_ACTIONS
            .iter()
            .copied()
            .find(|a| a.as_str() == needle)
            .ok_or_else(|| TrainerError::UnknownAction(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_names_round_trip_through_from_str() {
        for action in ALL_ACTIONS {
            assert_eq!(action.as_str().parse::<ActionLabel>().unwrap(), action);
        }
    }

    #[test]
    fn serde_uses_wire_names() {
        let parsed: ActionLabel = serde_json::from_str("\"3bet_nai\"").unwrap();
        assert_eq!(parsed, ActionLabel::ThreeBetNai);
        assert_eq!(
            serde_json::to_string(&ActionLabel::IsoThirdStack).unwrap(),
            "\"iso_1_3_stack\""
        );
    }

    #[test]
    fn priority_follows_declaration_order() {
        assert!(ActionLabel::Fold < ActionLabel::Check);
        assert!(ActionLabel::LimpFold < ActionLabel::Variable);
    }

    #[test]
    fn unknown_label_is_rejected() {
        assert!("minraise".parse::<ActionLabel>().is_err());
    }
}

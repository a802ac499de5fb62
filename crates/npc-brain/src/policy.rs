//! Planner Policy
//!
//! Decides which planner an agent gets and the label its traces carry.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;
use crate::planner::PlannerMode;

/// Faction name used when an agent has none.
pub const UNAFFILIATED: &str = "Unaffiliated";

/// Table key naming the fallback planner for unlisted factions.
pub const DEFAULT_ENTRY: &str = "default";

/// How planners are assigned to agents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PolicyMode {
    /// Every agent uses the configured planner
    #[default]
    GlobalPlanner,
    /// Planner chosen per faction from a table
    FactionMix,
    /// Every agent uses HTN
    HtnPilot,
}

impl PolicyMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            PolicyMode::GlobalPlanner => "GlobalPlanner",
            PolicyMode::FactionMix => "FactionMix",
            PolicyMode::HtnPilot => "HtnPilot",
        }
    }
}

impl fmt::Display for PolicyMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PolicyMode {
    type Err = ConfigError;

    /// Accepts `global-planner`, `global_planner` or `GlobalPlanner` forms.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "globalplanner" => Ok(PolicyMode::GlobalPlanner),
            "factionmix" => Ok(PolicyMode::FactionMix),
            "htnpilot" => Ok(PolicyMode::HtnPilot),
            _ => Err(ConfigError::UnknownPolicy(s.to_string())),
        }
    }
}

/// Planner and trace label resolved for one agent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyResolution {
    pub planner: PlannerMode,
    pub policy_name: String,
}

/// Parses `Faction=Planner;...;default=Planner`. Empty segments are ignored.
pub fn parse_policy_table(table: &str) -> Result<BTreeMap<String, PlannerMode>, ConfigError> {
    let mut entries = BTreeMap::new();
    for segment in table.split(';') {
        let segment = segment.trim();
        if segment.is_empty() {
            continue;
        }
        let (faction, mode) = segment
            .split_once('=')
            .ok_or_else(|| ConfigError::MalformedPolicyEntry(segment.to_string()))?;
        let faction = faction.trim();
        if faction.is_empty() {
            return Err(ConfigError::MalformedPolicyEntry(segment.to_string()));
        }
        let mode = mode
            .parse::<PlannerMode>()
            .map_err(|_| ConfigError::MalformedPolicyEntry(segment.to_string()))?;
        entries.insert(faction.to_string(), mode);
    }
    Ok(entries)
}

/// Looks a faction up exactly, then ignoring ASCII case.
fn lookup<'a>(table: &'a BTreeMap<String, PlannerMode>, key: &str) -> Option<&'a PlannerMode> {
    table.get(key).or_else(|| {
        table
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(key))
            .map(|(_, mode)| mode)
    })
}

/// Resolves the planner and policy label for an agent of `faction`.
pub fn resolve_policy(
    policy: PolicyMode,
    configured: PlannerMode,
    table: &BTreeMap<String, PlannerMode>,
    faction: Option<&str>,
) -> PolicyResolution {
    match policy {
        PolicyMode::GlobalPlanner => PolicyResolution {
            planner: configured,
            policy_name: format!("Global:{}", configured),
        },
        PolicyMode::HtnPilot => PolicyResolution {
            planner: PlannerMode::Htn,
            policy_name: PolicyMode::HtnPilot.as_str().to_string(),
        },
        PolicyMode::FactionMix => {
            let faction = faction
                .map(str::trim)
                .filter(|f| !f.is_empty())
                .unwrap_or(UNAFFILIATED);
            let planner = lookup(table, faction)
                .or_else(|| lookup(table, DEFAULT_ENTRY))
                .copied()
                .unwrap_or(configured);
            PolicyResolution {
                planner,
                policy_name: format!("FactionMix:{}->{}", faction, planner),
            }
        }
    }
}

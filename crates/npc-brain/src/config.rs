//! Configuration loading for the decision core.
//!
//! Settings come from a TOML file, then environment overrides are applied
//! on top.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::ConfigError;
use crate::goal::Goal;
use crate::library::{build_custom_goals, default_goals, extended_goals, GoalLibrary, GoalSpec};
use crate::planner::{PlannerMode, DEFAULT_MAX_EXPANSIONS};
use crate::policy::{parse_policy_table, resolve_policy, PolicyMode, PolicyResolution};

/// Overrides the planner mode (`goap`, `simple`, `htn`).
pub const ENV_PLANNER: &str = "NPC_BRAIN_PLANNER";
/// Overrides the policy mode (`global-planner`, `faction-mix`, `htn-pilot`).
pub const ENV_POLICY: &str = "NPC_BRAIN_POLICY";
/// Replaces the faction table (`Faction=Planner;...;default=Planner`).
pub const ENV_POLICY_TABLE: &str = "NPC_BRAIN_POLICY_TABLE";

/// Default size of the recent-decision ring.
pub const DEFAULT_RECENT_CAPACITY: usize = 24;

/// Complete decision core configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BrainConfig {
    /// Planner selection and search limits
    #[serde(default)]
    pub planner: PlannerConfig,
    /// Planner assignment policy
    #[serde(default)]
    pub policy: PolicyConfig,
    /// Goal library
    #[serde(default)]
    pub goals: GoalsConfig,
    /// Decision recorder settings
    #[serde(default)]
    pub recorder: RecorderConfig,
}

impl BrainConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Parses configuration from a TOML string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Serializes the configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Applies environment overrides read through `lookup`.
    ///
    /// Unrecognized planner or policy values fall back to the defaults. The
    /// HTN pilot policy forces the HTN planner. A malformed policy table is
    /// an error.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(ENV_PLANNER) {
            self.planner.mode = value.parse().unwrap_or_else(|_| {
                tracing::warn!("ignoring unknown {}={:?}", ENV_PLANNER, value);
                PlannerMode::default()
            });
        }
        if let Some(value) = lookup(ENV_POLICY) {
            self.policy.mode = value.parse().unwrap_or_else(|_| {
                tracing::warn!("ignoring unknown {}={:?}", ENV_POLICY, value);
                PolicyMode::default()
            });
        }
        if let Some(value) = lookup(ENV_POLICY_TABLE) {
            self.policy.faction_table = parse_policy_table(&value)?;
        }
        if self.policy.mode == PolicyMode::HtnPilot {
            self.planner.mode = PlannerMode::Htn;
        }
        Ok(())
    }

    /// Applies overrides from the process environment.
    pub fn apply_process_env(&mut self) -> Result<(), ConfigError> {
        self.apply_env(|key| std::env::var(key).ok())
    }

    /// Resolves planner and policy label for an agent of `faction`.
    pub fn resolve(&self, faction: Option<&str>) -> PolicyResolution {
        resolve_policy(
            self.policy.mode,
            self.planner.mode,
            &self.policy.faction_table,
            faction,
        )
    }

    /// Builds a fresh goal set from the configured library.
    pub fn build_goals(&self) -> Result<Vec<Goal>, ConfigError> {
        match self.goals.library {
            GoalLibrary::Default => Ok(default_goals()),
            GoalLibrary::Extended => Ok(extended_goals()),
            GoalLibrary::Custom => build_custom_goals(&self.goals.custom),
        }
    }
}

/// Planner configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Planner used by the global policy
    pub mode: PlannerMode,
    /// GOAP node expansion budget per search (minimum 1)
    pub max_expansions: usize,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            mode: PlannerMode::Goap,
            max_expansions: DEFAULT_MAX_EXPANSIONS,
        }
    }
}

/// Policy configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    pub mode: PolicyMode,
    /// Faction name to planner mode; the `default` key covers the rest
    pub faction_table: BTreeMap<String, PlannerMode>,
}

/// Goal library configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GoalsConfig {
    pub library: GoalLibrary,
    /// Goal definitions used when `library = "custom"`
    pub custom: Vec<GoalSpec>,
}

/// Decision recorder configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecorderConfig {
    /// Number of recent decision summaries kept
    pub recent_capacity: usize,
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self {
            recent_capacity: DEFAULT_RECENT_CAPACITY,
        }
    }
}

/// Generates a default configuration file content.
pub fn default_config_toml() -> String {
    r#"# NPC Brain Configuration

[planner]
# goap | simple | htn
mode = "goap"
max_expansions = 4096

[policy]
# global_planner | faction_mix | htn_pilot
mode = "global_planner"

[policy.faction_table]
# Sylvars = "htn"
# default = "goap"

[goals]
# default | extended | custom
library = "default"

# [[goals.custom]]
# name = "SecureFood"
# cooldown_seconds = 2.0
# considerations = [{ kind = "low_food" }, { kind = "hunger" }]

[recorder]
recent_capacity = 24
"#
    .to_string()
}

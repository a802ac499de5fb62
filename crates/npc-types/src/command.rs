//! Command Vocabulary
//!
//! Commands are what a decision emits each tick. The simulation maps them onto
//! its own job system; the planners only emit the subset they know about.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A single command for an NPC to carry out this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum NpcCommand {
    #[default]
    Idle,
    GatherWood,
    GatherStone,
    GatherIron,
    GatherGold,
    GatherFood,
    EatFood,
    Rest,
    BuildHouse,
    CraftTools,
}

impl NpcCommand {
    /// Returns all command variants in declaration order.
    pub fn all() -> &'static [NpcCommand] {
        &[
            NpcCommand::Idle,
            NpcCommand::GatherWood,
            NpcCommand::GatherStone,
            NpcCommand::GatherIron,
            NpcCommand::GatherGold,
            NpcCommand::GatherFood,
            NpcCommand::EatFood,
            NpcCommand::Rest,
            NpcCommand::BuildHouse,
            NpcCommand::CraftTools,
        ]
    }

    /// Returns the canonical name of the command.
    pub fn as_str(&self) -> &'static str {
        match self {
            NpcCommand::Idle => "Idle",
            NpcCommand::GatherWood => "GatherWood",
            NpcCommand::GatherStone => "GatherStone",
            NpcCommand::GatherIron => "GatherIron",
            NpcCommand::GatherGold => "GatherGold",
            NpcCommand::GatherFood => "GatherFood",
            NpcCommand::EatFood => "EatFood",
            NpcCommand::Rest => "Rest",
            NpcCommand::BuildHouse => "BuildHouse",
            NpcCommand::CraftTools => "CraftTools",
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, NpcCommand::Idle)
    }
}

impl fmt::Display for NpcCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error type for parsing a command name.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseCommandError(pub String);

impl fmt::Display for ParseCommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown command: '{}'", self.0)
    }
}

impl std::error::Error for ParseCommandError {}

impl FromStr for NpcCommand {
    type Err = ParseCommandError;

    /// Parses a command name, ignoring ASCII case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NpcCommand::all()
            .iter()
            .copied()
            .find(|command| command.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseCommandError(s.to_string()))
    }
}

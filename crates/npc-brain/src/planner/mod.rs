//! Planners
//!
//! Three interchangeable strategies behind one trait. Each planner owns its
//! private plan state; nothing is shared between agents.
//!
//! - [`goap`]: forward A* search over a symbolic state
//! - [`htn`]: scored decomposition into fixed command sequences
//! - [`simple`]: one rule per goal name

pub mod goap;
pub mod htn;
pub mod simple;
pub mod state;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use npc_types::{NpcContext, PlannerDecision};

use crate::error::ConfigError;
use crate::goal::Goal;

pub use goap::{GoapAction, GoapPlan, GoapPlanner, DEFAULT_MAX_EXPANSIONS};
pub use htn::{HtnMethod, HtnPlanner};
pub use simple::SimplePlanner;
pub use state::GoapState;

/// Turns the active goal into one command per tick.
pub trait Planner: fmt::Debug + Send {
    /// Display name reported in traces.
    fn name(&self) -> &'static str;

    /// Assigns the active goal. Assigning a goal with a different name
    /// discards any queued plan.
    fn set_goal(&mut self, goal: &Goal);

    /// Name of the active goal, if one was ever assigned.
    fn current_goal(&self) -> Option<&str>;

    /// Returns the next command and plan metadata for this tick.
    fn next_command(&mut self, ctx: &NpcContext) -> PlannerDecision;
}

/// Which planner implementation an agent uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PlannerMode {
    #[default]
    Goap,
    Simple,
    Htn,
}

impl PlannerMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlannerMode::Goap => "Goap",
            PlannerMode::Simple => "Simple",
            PlannerMode::Htn => "Htn",
        }
    }

    /// Creates a fresh planner. `max_expansions` only affects GOAP.
    pub fn create(&self, max_expansions: usize) -> Box<dyn Planner> {
        match self {
            PlannerMode::Goap => Box::new(GoapPlanner::new().with_max_expansions(max_expansions)),
            PlannerMode::Simple => Box::new(SimplePlanner::new()),
            PlannerMode::Htn => Box::new(HtnPlanner::new()),
        }
    }
}

impl fmt::Display for PlannerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlannerMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "goap" => Ok(PlannerMode::Goap),
            "simple" => Ok(PlannerMode::Simple),
            "htn" => Ok(PlannerMode::Htn),
            _ => Err(ConfigError::UnknownPlanner(s.to_string())),
        }
    }
}

/// Preview of the current command followed by up to four queued ones.
pub(crate) fn plan_preview<'a>(
    current: npc_types::NpcCommand,
    queued: impl Iterator<Item = &'a npc_types::NpcCommand>,
) -> Vec<npc_types::NpcCommand> {
    std::iter::once(current)
        .chain(queued.copied().take(npc_types::MAX_PLAN_PREVIEW - 1))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_planner_mode() {
        assert_eq!("goap".parse::<PlannerMode>().unwrap(), PlannerMode::Goap);
        assert_eq!(" HTN ".parse::<PlannerMode>().unwrap(), PlannerMode::Htn);
        assert_eq!("Simple".parse::<PlannerMode>().unwrap(), PlannerMode::Simple);
        assert!(matches!(
            "astar".parse::<PlannerMode>(),
            Err(ConfigError::UnknownPlanner(_))
        ));
    }

    #[test]
    fn test_create_reports_names() {
        for mode in [PlannerMode::Goap, PlannerMode::Simple, PlannerMode::Htn] {
            let planner = mode.create(DEFAULT_MAX_EXPANSIONS);
            assert_eq!(planner.name(), mode.as_str());
            assert!(planner.current_goal().is_none());
        }
    }

    #[test]
    fn test_plan_preview_caps_at_five() {
        use npc_types::NpcCommand;
        let queued = vec![NpcCommand::GatherWood; 9];
        let preview = plan_preview(NpcCommand::BuildHouse, queued.iter());
        assert_eq!(preview.len(), 5);
        assert_eq!(preview[0], NpcCommand::BuildHouse);
    }
}

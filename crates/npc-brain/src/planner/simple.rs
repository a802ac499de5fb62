//! Simple Planner
//!
//! One rule per goal name, no search and no queue. A cheap deterministic
//! baseline.

use npc_types::{NpcCommand, NpcContext, PlannerDecision, ReplanReason};

use super::Planner;
use crate::goal::Goal;

/// Hunger at or above which SecureFood eats from stock instead of foraging.
pub const EAT_HUNGER_THRESHOLD: f32 = 68.0;

/// Maps a goal name to its command, or `None` when no rule exists.
pub fn rule_for(goal_name: &str, ctx: &NpcContext) -> Option<NpcCommand> {
    let command = match goal_name {
        "GatherWood" => NpcCommand::GatherWood,
        "GatherStone" | "StabilizeResources" => NpcCommand::GatherStone,
        "BuildHouse" | "ExpandHousing" => {
            if ctx.can_afford_house() {
                NpcCommand::BuildHouse
            } else {
                NpcCommand::GatherWood
            }
        }
        "SecureFood" => {
            if ctx.hunger >= EAT_HUNGER_THRESHOLD && ctx.home_food > 0 {
                NpcCommand::EatFood
            } else {
                NpcCommand::GatherFood
            }
        }
        "RecoverStamina" => NpcCommand::Rest,
        _ => return None,
    };
    Some(command)
}

/// Rule-table planner. Only remembers the goal name.
#[derive(Debug, Default)]
pub struct SimplePlanner {
    goal: Option<String>,
}

impl SimplePlanner {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Planner for SimplePlanner {
    fn name(&self) -> &'static str {
        "Simple"
    }

    fn set_goal(&mut self, goal: &Goal) {
        self.goal = Some(goal.name().to_string());
    }

    fn current_goal(&self) -> Option<&str> {
        self.goal.as_deref()
    }

    fn next_command(&mut self, ctx: &NpcContext) -> PlannerDecision {
        let Some(goal) = self.goal.as_deref() else {
            return PlannerDecision::idle(ReplanReason::NoGoal);
        };

        match rule_for(goal, ctx) {
            Some(command) => {
                PlannerDecision::planned(command, 1, vec![command], ReplanReason::RuleMatch)
            }
            None => PlannerDecision::idle(ReplanReason::NoRule),
        }
    }
}

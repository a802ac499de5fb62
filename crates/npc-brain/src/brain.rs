//! Decision Brain
//!
//! Runs the goal selector and the active planner once per tick and merges
//! their output into a command plus trace.

use npc_types::{
    DecisionResult, DecisionTrace, NpcCommand, NpcContext, PlannerDecision, ReplanReason,
};

use crate::config::BrainConfig;
use crate::error::ConfigError;
use crate::goal::Goal;
use crate::planner::Planner;
use crate::selector::GoalSelector;

/// Anything that turns a context snapshot into a decision.
pub trait NpcDecisionBrain {
    fn think(&mut self, ctx: &NpcContext) -> DecisionResult;
}

/// Utility-driven brain: one selector, one planner, one goal set per agent.
#[derive(Debug)]
pub struct DecisionBrain {
    planner: Box<dyn Planner>,
    goals: Vec<Goal>,
    selector: GoalSelector,
    policy_name: String,
}

impl DecisionBrain {
    pub fn new(planner: Box<dyn Planner>, goals: Vec<Goal>, policy_name: impl Into<String>) -> Self {
        Self {
            planner,
            goals,
            selector: GoalSelector::new(),
            policy_name: policy_name.into(),
        }
    }

    /// Builds a brain for an agent of `faction` from configuration.
    pub fn from_config(config: &BrainConfig, faction: Option<&str>) -> Result<Self, ConfigError> {
        let resolution = config.resolve(faction);
        let goals = config.build_goals()?;
        let planner = resolution.planner.create(config.planner.max_expansions);

        tracing::info!(
            "brain created: planner={} policy={} goals={}",
            planner.name(),
            resolution.policy_name,
            goals.len()
        );
        Ok(Self::new(planner, goals, resolution.policy_name))
    }

    pub fn planner_name(&self) -> &'static str {
        self.planner.name()
    }

    pub fn policy_name(&self) -> &str {
        &self.policy_name
    }

    pub fn goals(&self) -> &[Goal] {
        &self.goals
    }

    /// Goal currently assigned to the planner.
    pub fn current_goal(&self) -> Option<&str> {
        self.planner.current_goal()
    }
}

impl NpcDecisionBrain for DecisionBrain {
    fn think(&mut self, ctx: &NpcContext) -> DecisionResult {
        let selection = self
            .selector
            .select_goal(&mut self.goals, self.planner.as_mut(), ctx);
        let decision = self.planner.next_command(ctx);

        tracing::debug!(
            "t={:.2} goal={} command={} reason={}",
            ctx.simulation_time_seconds,
            selection.selected.as_deref().unwrap_or("None"),
            decision.command,
            decision.replan_reason
        );

        let trace = DecisionTrace::new(
            selection.selected.as_deref(),
            self.planner.name(),
            self.policy_name.clone(),
            &decision,
            selection.scores,
        );
        DecisionResult {
            command: decision.command,
            trace,
        }
    }
}

/// Brain that always answers with the same command.
#[derive(Debug, Clone)]
pub struct FixedBrain {
    command: NpcCommand,
    policy_name: String,
}

impl FixedBrain {
    pub fn new(command: NpcCommand) -> Self {
        Self {
            command,
            policy_name: "Fixed".to_string(),
        }
    }
}

impl NpcDecisionBrain for FixedBrain {
    fn think(&mut self, _ctx: &NpcContext) -> DecisionResult {
        let decision = PlannerDecision::planned(
            self.command,
            1,
            vec![self.command],
            ReplanReason::RuleMatch,
        )
        .with_method("FixedMethod", 1.0);
        DecisionResult {
            command: self.command,
            trace: DecisionTrace::new(
                None,
                "Fixed",
                self.policy_name.clone(),
                &decision,
                Vec::new(),
            ),
        }
    }
}

//! Decision Trace Types
//!
//! Value records describing why a command was chosen. A trace is built fresh
//! for every decision and never mutated after construction.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::NpcCommand;

/// Name reported when no goal or no method applies.
pub const NONE_NAME: &str = "None";

/// Maximum number of commands shown in a plan preview.
pub const MAX_PLAN_PREVIEW: usize = 5;

/// Why the planner rebuilt or continued its plan on this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReplanReason {
    /// No goal has ever been assigned to the planner.
    NoGoal,
    /// A goal with a different name was assigned since the last plan.
    GoalChanged,
    /// The queued plan still had commands left.
    PlanContinue,
    /// The search produced a new plan.
    PlanBuilt,
    /// The search found no plan.
    NoPlan,
    /// The rule table had an entry for the goal.
    RuleMatch,
    /// The rule table had no entry for the goal.
    NoRule,
    /// A scored method was chosen.
    MethodScored,
    /// No method produced a plan.
    NoMethod,
}

impl ReplanReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReplanReason::NoGoal => "NoGoal",
            ReplanReason::GoalChanged => "GoalChanged",
            ReplanReason::PlanContinue => "PlanContinue",
            ReplanReason::PlanBuilt => "PlanBuilt",
            ReplanReason::NoPlan => "NoPlan",
            ReplanReason::RuleMatch => "RuleMatch",
            ReplanReason::NoRule => "NoRule",
            ReplanReason::MethodScored => "MethodScored",
            ReplanReason::NoMethod => "NoMethod",
        }
    }
}

impl fmt::Display for ReplanReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Score recorded for one goal during selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalScoreEntry {
    pub goal_name: String,
    pub score: f32,
    pub on_cooldown: bool,
}

impl GoalScoreEntry {
    pub fn scored(goal_name: impl Into<String>, score: f32) -> Self {
        Self {
            goal_name: goal_name.into(),
            score,
            on_cooldown: false,
        }
    }

    /// A goal skipped because its cooldown has not elapsed. Scores 0.
    pub fn cooling_down(goal_name: impl Into<String>) -> Self {
        Self {
            goal_name: goal_name.into(),
            score: 0.0,
            on_cooldown: true,
        }
    }
}

/// What a planner returns for one tick: the command plus plan metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannerDecision {
    pub command: NpcCommand,
    pub plan_length: usize,
    pub plan_preview: Vec<NpcCommand>,
    pub plan_cost: usize,
    pub replan_reason: ReplanReason,
    pub method_name: String,
    pub method_score: f32,
    pub runner_up_method: String,
    pub runner_up_score: f32,
}

impl PlannerDecision {
    /// An idle decision with an empty plan.
    pub fn idle(replan_reason: ReplanReason) -> Self {
        Self {
            command: NpcCommand::Idle,
            plan_length: 0,
            plan_preview: Vec::new(),
            plan_cost: 0,
            replan_reason,
            method_name: NONE_NAME.to_string(),
            method_score: 0.0,
            runner_up_method: NONE_NAME.to_string(),
            runner_up_score: 0.0,
        }
    }

    /// A decision for `command` with the given plan length and preview.
    ///
    /// The preview is truncated to [`MAX_PLAN_PREVIEW`] entries and the plan
    /// cost is approximated by the preview length.
    pub fn planned(
        command: NpcCommand,
        plan_length: usize,
        mut plan_preview: Vec<NpcCommand>,
        replan_reason: ReplanReason,
    ) -> Self {
        plan_preview.truncate(MAX_PLAN_PREVIEW);
        Self {
            command,
            plan_length,
            plan_cost: plan_preview.len(),
            plan_preview,
            replan_reason,
            method_name: NONE_NAME.to_string(),
            method_score: 0.0,
            runner_up_method: NONE_NAME.to_string(),
            runner_up_score: 0.0,
        }
    }

    pub fn with_method(mut self, name: impl Into<String>, score: f32) -> Self {
        self.method_name = name.into();
        self.method_score = score;
        self
    }

    pub fn with_runner_up(mut self, name: impl Into<String>, score: f32) -> Self {
        self.runner_up_method = name.into();
        self.runner_up_score = score;
        self
    }
}

/// Read-only record of the reasoning behind one decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTrace {
    pub selected_goal: String,
    pub planner_name: String,
    pub policy_name: String,
    pub plan_length: usize,
    pub plan_preview: Vec<NpcCommand>,
    pub plan_cost: usize,
    pub replan_reason: ReplanReason,
    pub method_name: String,
    pub method_score: f32,
    pub runner_up_method: String,
    pub runner_up_score: f32,
    pub goal_scores: Vec<GoalScoreEntry>,
}

impl DecisionTrace {
    /// Assembles a trace from a planner decision and the selector's scores.
    pub fn new(
        selected_goal: Option<&str>,
        planner_name: impl Into<String>,
        policy_name: impl Into<String>,
        decision: &PlannerDecision,
        goal_scores: Vec<GoalScoreEntry>,
    ) -> Self {
        Self {
            selected_goal: selected_goal.unwrap_or(NONE_NAME).to_string(),
            planner_name: planner_name.into(),
            policy_name: policy_name.into(),
            plan_length: decision.plan_length,
            plan_preview: decision.plan_preview.clone(),
            plan_cost: decision.plan_cost,
            replan_reason: decision.replan_reason,
            method_name: decision.method_name.clone(),
            method_score: decision.method_score,
            runner_up_method: decision.runner_up_method.clone(),
            runner_up_score: decision.runner_up_score,
            goal_scores,
        }
    }

    /// Returns the recorded score entry for a goal, if it was considered.
    pub fn score_for(&self, goal_name: &str) -> Option<&GoalScoreEntry> {
        self.goal_scores.iter().find(|entry| entry.goal_name == goal_name)
    }
}

/// The externally visible outcome of one `think` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionResult {
    pub command: NpcCommand,
    pub trace: DecisionTrace,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idle_decision_is_empty() {
        let decision = PlannerDecision::idle(ReplanReason::NoGoal);
        assert_eq!(decision.command, NpcCommand::Idle);
        assert_eq!(decision.plan_length, 0);
        assert!(decision.plan_preview.is_empty());
        assert_eq!(decision.plan_cost, 0);
        assert_eq!(decision.method_name, NONE_NAME);
        assert_eq!(decision.runner_up_method, NONE_NAME);
    }

    #[test]
    fn test_planned_truncates_preview() {
        let preview = vec![NpcCommand::GatherWood; 8];
        let decision =
            PlannerDecision::planned(NpcCommand::GatherWood, 8, preview, ReplanReason::PlanBuilt);

        assert_eq!(decision.plan_length, 8);
        assert_eq!(decision.plan_preview.len(), MAX_PLAN_PREVIEW);
        assert_eq!(decision.plan_cost, MAX_PLAN_PREVIEW);
    }

    #[test]
    fn test_trace_defaults_goal_to_none() {
        let decision = PlannerDecision::idle(ReplanReason::NoGoal);
        let trace = DecisionTrace::new(None, "Goap", "Global:Goap", &decision, Vec::new());
        assert_eq!(trace.selected_goal, NONE_NAME);
        assert_eq!(trace.replan_reason, ReplanReason::NoGoal);
    }

    #[test]
    fn test_trace_copies_method_metadata() {
        let decision = PlannerDecision::planned(
            NpcCommand::GatherStone,
            1,
            vec![NpcCommand::GatherStone],
            ReplanReason::MethodScored,
        )
        .with_method("GatherStoneRun", 0.8)
        .with_runner_up("BalancedGathering", 0.4);

        let scores = vec![
            GoalScoreEntry::scored("GatherStone", 0.3),
            GoalScoreEntry::cooling_down("BuildHouse"),
        ];
        let trace = DecisionTrace::new(Some("GatherStone"), "Htn", "HtnPilot", &decision, scores);

        assert_eq!(trace.method_name, "GatherStoneRun");
        assert_eq!(trace.runner_up_method, "BalancedGathering");
        assert_eq!(trace.runner_up_score, 0.4);
        assert!(trace.score_for("BuildHouse").unwrap().on_cooldown);
        assert_eq!(trace.score_for("BuildHouse").unwrap().score, 0.0);
        assert!(trace.score_for("Missing").is_none());
    }

    #[test]
    fn test_replan_reason_serializes_by_name() {
        assert_eq!(
            serde_json::to_string(&ReplanReason::GoalChanged).unwrap(),
            r#""GoalChanged""#
        );
        assert_eq!(ReplanReason::PlanContinue.to_string(), "PlanContinue");
    }
}

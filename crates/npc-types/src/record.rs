//! Decision Records
//!
//! Sequence-numbered decisions as written to logs, and the debug read model
//! built from them.

use serde::{Deserialize, Serialize};

use crate::{DecisionTrace, GoalScoreEntry, NpcCommand, ReplanReason, NONE_NAME};

/// Generates a decision ID with the given sequence number.
pub fn generate_decision_id(sequence: u64) -> String {
    format!("dec_{:08}", sequence)
}

/// One decision made by one agent, as logged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionRecord {
    pub decision_id: String,
    pub sequence: u64,
    pub agent_id: String,
    pub simulation_time_seconds: f32,
    pub command: NpcCommand,
    pub trace: DecisionTrace,
}

impl DecisionRecord {
    /// One-line human readable summary: `<policy> | Goal <goal> -> <command>`.
    pub fn summary(&self) -> String {
        format!(
            "{} | Goal {} -> {}",
            self.trace.policy_name, self.trace.selected_goal, self.command
        )
    }

    /// Serializes the record to a single JSON line.
    pub fn to_jsonl(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserializes a record from a JSON line.
    pub fn from_jsonl(line: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(line)
    }
}

/// Debug view of the latest decision of a tracked agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiDebugSnapshot {
    pub has_data: bool,
    pub agent_id: Option<String>,
    pub decision_sequence: u64,
    pub planner_name: String,
    pub policy_name: String,
    pub selected_goal: String,
    pub next_command: NpcCommand,
    pub plan_length: usize,
    pub plan_cost: usize,
    pub replan_reason: Option<ReplanReason>,
    pub method_name: String,
    /// Sorted by descending score
    pub goal_scores: Vec<GoalScoreEntry>,
    /// Oldest first
    pub recent_decisions: Vec<String>,
}

impl AiDebugSnapshot {
    /// Snapshot used before any decision has been recorded.
    pub fn empty(planner_name: impl Into<String>, policy_name: impl Into<String>) -> Self {
        Self {
            has_data: false,
            agent_id: None,
            decision_sequence: 0,
            planner_name: planner_name.into(),
            policy_name: policy_name.into(),
            selected_goal: NONE_NAME.to_string(),
            next_command: NpcCommand::Idle,
            plan_length: 0,
            plan_cost: 0,
            replan_reason: None,
            method_name: NONE_NAME.to_string(),
            goal_scores: Vec::new(),
            recent_decisions: Vec::new(),
        }
    }

    /// Builds a snapshot from a recorded decision.
    pub fn from_record(record: &DecisionRecord, recent_decisions: Vec<String>) -> Self {
        let mut goal_scores = record.trace.goal_scores.clone();
        // Stable sort keeps selector order among equal scores
        goal_scores.sort_by(|a, b| b.score.total_cmp(&a.score));

        Self {
            has_data: true,
            agent_id: Some(record.agent_id.clone()),
            decision_sequence: record.sequence,
            planner_name: record.trace.planner_name.clone(),
            policy_name: record.trace.policy_name.clone(),
            selected_goal: record.trace.selected_goal.clone(),
            next_command: record.command,
            plan_length: record.trace.plan_length,
            plan_cost: record.trace.plan_cost,
            replan_reason: Some(record.trace.replan_reason),
            method_name: record.trace.method_name.clone(),
            goal_scores,
            recent_decisions,
        }
    }
}

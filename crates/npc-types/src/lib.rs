//! Shared value types for the NPC decision core.
//!
//! This crate contains pure data structures with no decision logic.
//! It is a dependency for all other crates in the workspace.

pub mod command;
pub mod context;
pub mod record;
pub mod trace;

#[cfg(any(test, feature = "test-fixtures"))]
pub mod fixtures;

// Re-export command types
pub use command::{NpcCommand, ParseCommandError};

// Re-export context types
pub use context::{
    NpcContext, DEFAULT_HOUSE_CAPACITY, DEFAULT_HOUSE_STONE_COST, DEFAULT_HOUSE_WOOD_COST,
};

// Re-export trace types
pub use trace::{
    DecisionResult, DecisionTrace, GoalScoreEntry, PlannerDecision, ReplanReason,
    MAX_PLAN_PREVIEW, NONE_NAME,
};

// Re-export record types
pub use record::{generate_decision_id, AiDebugSnapshot, DecisionRecord};

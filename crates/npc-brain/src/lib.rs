//! NPC decision core: utility goal selection and action planning.
//!
//! Each tick an agent's brain scores its goals against a context snapshot,
//! hands the winner to its planner and returns the planner's next command
//! together with a trace of why it was chosen.
//!
//! # Architecture
//!
//! ```text
//! NpcContext ──▶ GoalSelector ──▶ Planner (GOAP | HTN | Simple) ──▶ DecisionResult
//!                    │                                                   │
//!                    └──────────── goal scores ─────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`consideration`]: Pure scoring functions
//! - [`goal`]: Goals with simulation-time cooldowns
//! - [`utility`]: Multiplicative evaluator
//! - [`selector`]: Cooldown-gated goal selection
//! - [`planner`]: GOAP, HTN and rule-table planners
//! - [`brain`]: Per-agent orchestration
//! - [`library`]: Built-in and configurable goal sets
//! - [`policy`]: Planner assignment per agent
//! - [`config`]: TOML configuration and environment overrides
//! - [`recorder`]: Decision bookkeeping and JSONL output
//! - [`scenario`]: Seeded synthetic harness

pub mod brain;
pub mod config;
pub mod consideration;
pub mod error;
pub mod goal;
pub mod library;
pub mod planner;
pub mod policy;
pub mod recorder;
pub mod scenario;
pub mod selector;
pub mod utility;

// Re-export brain types
pub use brain::{DecisionBrain, FixedBrain, NpcDecisionBrain};

// Re-export config types
pub use config::{
    default_config_toml, BrainConfig, GoalsConfig, PlannerConfig, PolicyConfig, RecorderConfig,
};

// Re-export error types
pub use error::{BrainError, ConfigError};

// Re-export goal types
pub use goal::Goal;
pub use library::{default_goals, extended_goals, ConsiderationSpec, GoalLibrary, GoalSpec};
pub use selector::{GoalSelection, GoalSelector};
pub use utility::UtilityEvaluator;

// Re-export planner types
pub use planner::{GoapPlanner, GoapState, HtnPlanner, Planner, PlannerMode, SimplePlanner};

// Re-export policy types
pub use policy::{PolicyMode, PolicyResolution};

// Re-export recorder and harness types
pub use recorder::DecisionRecorder;
pub use scenario::{run_scenario, ScenarioConfig, ScenarioSummary};

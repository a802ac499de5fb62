//! Goal Libraries
//!
//! Fixed goal sets plus the serializable goal definitions used to build
//! custom libraries from configuration.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::consideration::{
    BuildHouseFeasible, Consideration, HousingPressure, Hunger, Inverted, LowFood, LowStoneStock,
    LowWoodStock, StaminaDeficit,
};
use crate::error::ConfigError;
use crate::goal::Goal;

/// Wood threshold used by the GatherWood goal.
pub const GATHER_WOOD_THRESHOLD: i32 = 6;

/// Stone threshold used by the StabilizeResources goal.
pub const STABILIZE_STONE_THRESHOLD: i32 = 10;

/// The three base goals: GatherWood, GatherStone, BuildHouse.
pub fn default_goals() -> Vec<Goal> {
    vec![
        Goal::new("GatherWood")
            .with_cooldown(2.0)
            .with_consideration(LowWoodStock::new(GATHER_WOOD_THRESHOLD))
            .with_consideration(Hunger),
        Goal::new("GatherStone")
            .with_cooldown(3.0)
            .with_consideration(Hunger),
        Goal::new("BuildHouse")
            .with_cooldown(5.0)
            .with_consideration(BuildHouseFeasible)
            .with_consideration(Inverted::new(Hunger)),
    ]
}

/// The base goals plus food, stamina, housing and stone upkeep goals.
pub fn extended_goals() -> Vec<Goal> {
    let mut goals = default_goals();
    goals.extend([
        Goal::new("SecureFood")
            .with_cooldown(2.0)
            .with_consideration(LowFood)
            .with_consideration(Hunger),
        Goal::new("RecoverStamina")
            .with_cooldown(4.0)
            .with_consideration(StaminaDeficit),
        Goal::new("ExpandHousing")
            .with_cooldown(6.0)
            .with_consideration(HousingPressure)
            .with_consideration(BuildHouseFeasible)
            .with_consideration(Inverted::new(Hunger)),
        Goal::new("StabilizeResources")
            .with_cooldown(3.0)
            .with_consideration(LowStoneStock::new(STABILIZE_STONE_THRESHOLD))
            .with_consideration(Inverted::new(Hunger)),
    ]);
    goals
}

/// Which goal set a brain starts with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum GoalLibrary {
    #[default]
    Default,
    Extended,
    /// Goals listed in the configuration file
    Custom,
}

/// Serializable description of one consideration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ConsiderationSpec {
    Hunger,
    LowWoodStock {
        #[serde(default = "default_stock_threshold")]
        threshold: i32,
    },
    LowStoneStock {
        #[serde(default = "default_stock_threshold")]
        threshold: i32,
    },
    BuildHouseFeasible,
    LowFood,
    StaminaDeficit,
    HousingPressure,
    Inverted {
        inner: Box<ConsiderationSpec>,
    },
}

fn default_stock_threshold() -> i32 {
    5
}

impl ConsiderationSpec {
    pub fn build(&self) -> Box<dyn Consideration> {
        match self {
            ConsiderationSpec::Hunger => Box::new(Hunger),
            ConsiderationSpec::LowWoodStock { threshold } => Box::new(LowWoodStock::new(*threshold)),
            ConsiderationSpec::LowStoneStock { threshold } => {
                Box::new(LowStoneStock::new(*threshold))
            }
            ConsiderationSpec::BuildHouseFeasible => Box::new(BuildHouseFeasible),
            ConsiderationSpec::LowFood => Box::new(LowFood),
            ConsiderationSpec::StaminaDeficit => Box::new(StaminaDeficit),
            ConsiderationSpec::HousingPressure => Box::new(HousingPressure),
            ConsiderationSpec::Inverted { inner } => Box::new(Inverted::boxed(inner.build())),
        }
    }
}

/// Serializable description of one goal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalSpec {
    pub name: String,
    #[serde(default)]
    pub cooldown_seconds: f32,
    #[serde(default)]
    pub considerations: Vec<ConsiderationSpec>,
}

impl GoalSpec {
    pub fn build(&self) -> Goal {
        self.considerations.iter().fold(
            Goal::new(self.name.clone()).with_cooldown(self.cooldown_seconds),
            |goal, spec| goal.with_boxed_consideration(spec.build()),
        )
    }
}

/// Builds goals from definitions, rejecting an empty list or duplicate names.
pub fn build_custom_goals(specs: &[GoalSpec]) -> Result<Vec<Goal>, ConfigError> {
    if specs.is_empty() {
        return Err(ConfigError::EmptyCustomLibrary);
    }
    let goals: Vec<Goal> = specs.iter().map(GoalSpec::build).collect();
    ensure_unique_names(&goals)?;
    Ok(goals)
}

/// Goal names identify goals, so a set may not repeat one.
pub fn ensure_unique_names(goals: &[Goal]) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();
    for goal in goals {
        if !seen.insert(goal.name()) {
            return Err(ConfigError::DuplicateGoal(goal.name().to_string()));
        }
    }
    Ok(())
}

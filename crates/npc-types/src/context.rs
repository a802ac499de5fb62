//! Context Snapshot
//!
//! The flat, read-only view of the world an NPC decides against. The external
//! simulation builds one per agent per tick; nothing in the decision core
//! writes back into it.

use serde::{Deserialize, Serialize};

/// Default wood cost of a house when the simulation does not say otherwise.
pub const DEFAULT_HOUSE_WOOD_COST: i32 = 50;

/// Default stone cost of a house when the simulation does not say otherwise.
pub const DEFAULT_HOUSE_STONE_COST: i32 = 100;

/// Default number of residents a single house holds.
pub const DEFAULT_HOUSE_CAPACITY: i32 = 5;

/// Immutable snapshot of the facts an NPC decides against.
///
/// `hunger` and `stamina` are on a 0..=100 scale, higher hunger meaning
/// hungrier. `simulation_time_seconds` is monotonic simulation time, never
/// wall-clock time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NpcContext {
    pub simulation_time_seconds: f32,
    pub hunger: f32,
    pub stamina: f32,
    pub home_wood: i32,
    pub home_stone: i32,
    pub home_iron: i32,
    pub home_gold: i32,
    pub home_food: i32,
    pub home_house_count: i32,
    pub house_wood_cost: i32,
    pub house_stone_cost: i32,
    pub colony_population: i32,
    pub house_capacity: i32,
    pub stone_buildings_enabled: bool,
    pub can_build_with_stone: bool,
}

impl Default for NpcContext {
    fn default() -> Self {
        Self {
            simulation_time_seconds: 0.0,
            hunger: 20.0,
            stamina: 100.0,
            home_wood: 0,
            home_stone: 0,
            home_iron: 0,
            home_gold: 0,
            home_food: 0,
            home_house_count: 0,
            house_wood_cost: DEFAULT_HOUSE_WOOD_COST,
            house_stone_cost: DEFAULT_HOUSE_STONE_COST,
            colony_population: 0,
            house_capacity: DEFAULT_HOUSE_CAPACITY,
            stone_buildings_enabled: false,
            can_build_with_stone: false,
        }
    }
}

impl NpcContext {
    /// Creates a context at the given simulation time with default values.
    pub fn at(simulation_time_seconds: f32) -> Self {
        Self {
            simulation_time_seconds,
            ..Default::default()
        }
    }

    pub fn with_hunger(mut self, hunger: f32) -> Self {
        self.hunger = hunger;
        self
    }

    pub fn with_stamina(mut self, stamina: f32) -> Self {
        self.stamina = stamina;
        self
    }

    pub fn with_wood(mut self, wood: i32) -> Self {
        self.home_wood = wood;
        self
    }

    pub fn with_stone(mut self, stone: i32) -> Self {
        self.home_stone = stone;
        self
    }

    pub fn with_food(mut self, food: i32) -> Self {
        self.home_food = food;
        self
    }

    pub fn with_houses(mut self, house_count: i32) -> Self {
        self.home_house_count = house_count;
        self
    }

    pub fn with_population(mut self, population: i32) -> Self {
        self.colony_population = population;
        self
    }

    pub fn with_house_capacity(mut self, capacity: i32) -> Self {
        self.house_capacity = capacity;
        self
    }

    pub fn with_house_costs(mut self, wood_cost: i32, stone_cost: i32) -> Self {
        self.house_wood_cost = wood_cost;
        self.house_stone_cost = stone_cost;
        self
    }

    /// Enables stone construction; `affordable` mirrors the colony's own
    /// "can build with stone" flag.
    pub fn with_stone_buildings(mut self, affordable: bool) -> Self {
        self.stone_buildings_enabled = true;
        self.can_build_with_stone = affordable;
        self
    }

    /// True when the colony holds enough wood for a house.
    pub fn can_afford_wood_house(&self) -> bool {
        self.home_wood >= self.house_wood_cost
    }

    /// True when stone construction is enabled, allowed for this colony and
    /// the stone stock covers the cost.
    pub fn can_afford_stone_house(&self) -> bool {
        self.stone_buildings_enabled
            && self.can_build_with_stone
            && self.home_stone >= self.house_stone_cost
    }

    /// True when either construction path is affordable.
    pub fn can_afford_house(&self) -> bool {
        self.can_afford_wood_house() || self.can_afford_stone_house()
    }

    /// Total residents the colony's houses can hold.
    pub fn housing_capacity(&self) -> i32 {
        self.home_house_count.saturating_mul(self.house_capacity)
    }

    /// Serializes the context to a single JSON line.
    pub fn to_jsonl(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserializes a context from a JSON line.
    pub fn from_jsonl(line: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_sets_fields() {
        let ctx = NpcContext::at(3.0)
            .with_hunger(10.0)
            .with_wood(80)
            .with_houses(1)
            .with_population(6);

        assert_eq!(ctx.simulation_time_seconds, 3.0);
        assert_eq!(ctx.hunger, 10.0);
        assert_eq!(ctx.home_wood, 80);
        assert_eq!(ctx.home_house_count, 1);
        assert_eq!(ctx.colony_population, 6);
        assert_eq!(ctx.house_wood_cost, DEFAULT_HOUSE_WOOD_COST);
    }

    #[test]
    fn test_affordability() {
        let poor = NpcContext::default();
        assert!(!poor.can_afford_house());

        let wood_rich = NpcContext::default().with_wood(50);
        assert!(wood_rich.can_afford_wood_house());
        assert!(wood_rich.can_afford_house());

        // Stone stock alone is not enough while stone buildings are disabled
        let stone_rich = NpcContext::default().with_stone(200);
        assert!(!stone_rich.can_afford_stone_house());

        let stone_enabled = stone_rich.with_stone_buildings(true);
        assert!(stone_enabled.can_afford_stone_house());
        assert!(stone_enabled.can_afford_house());

        let stone_blocked = NpcContext::default()
            .with_stone(200)
            .with_stone_buildings(false);
        assert!(!stone_blocked.can_afford_stone_house());
    }

    #[test]
    fn test_housing_capacity() {
        let ctx = NpcContext::default().with_houses(3).with_house_capacity(4);
        assert_eq!(ctx.housing_capacity(), 12);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let ctx = NpcContext::from_jsonl(r#"{"simulation_time_seconds":1.5,"home_wood":7}"#).unwrap();
        assert_eq!(ctx.simulation_time_seconds, 1.5);
        assert_eq!(ctx.home_wood, 7);
        assert_eq!(ctx.hunger, 20.0);
        assert_eq!(ctx.house_capacity, DEFAULT_HOUSE_CAPACITY);
    }
}

//! Sample data fixtures for testing.
//!
//! This module provides ready-made context snapshots for other crates to use.
//! Enable the `test-fixtures` feature to access these helpers.
//!
//! # Example
//!
//! ```ignore
//! // In your Cargo.toml:
//! // [dev-dependencies]
//! // npc-types = { path = "../npc-types", features = ["test-fixtures"] }
//!
//! use npc_types::fixtures;
//!
//! let contexts = fixtures::sample_contexts();
//! let ready = fixtures::build_house_ready();
//! ```

use crate::NpcContext;

/// Returns sample contexts from the fixtures file, in time order.
///
/// Contains 6 snapshots:
/// - an empty colony at capacity (no wood, house cost 50)
/// - an affordable, overcrowded colony with low hunger
/// - a starving colony with a little food
/// - an exhausted agent
/// - a stone-age colony that can afford a stone house
/// - a depleted colony with no food
pub fn sample_contexts() -> Vec<NpcContext> {
    let jsonl = include_str!("../tests/fixtures/sample_contexts.jsonl");
    jsonl
        .lines()
        .filter(|l| !l.trim().is_empty())
        .map(|l| {
            NpcContext::from_jsonl(l).unwrap_or_else(|e| {
                panic!("Failed to parse context line: {}\nError: {}", l, e)
            })
        })
        .collect()
}

/// Colony with no wood and no spare housing.
pub fn empty_stock() -> NpcContext {
    sample_contexts()[0].clone()
}

/// Colony that can afford a wood house and is over capacity, hunger 10.
pub fn build_house_ready() -> NpcContext {
    sample_contexts()[1].clone()
}

/// Hungry agent (hunger 85) with two food in stock.
pub fn starving() -> NpcContext {
    sample_contexts()[2].clone()
}

/// Agent with stamina 15.
pub fn exhausted() -> NpcContext {
    sample_contexts()[3].clone()
}

/// Colony with stone buildings enabled and enough stone for a house.
pub fn stone_age() -> NpcContext {
    sample_contexts()[4].clone()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_contexts_load() {
        let contexts = sample_contexts();
        assert_eq!(contexts.len(), 6, "Should have 6 sample contexts");

        // Clock is monotonic across the samples
        for pair in contexts.windows(2) {
            assert!(pair[0].simulation_time_seconds < pair[1].simulation_time_seconds);
        }
    }

    #[test]
    fn test_named_helpers() {
        assert_eq!(empty_stock().home_wood, 0);
        assert!(build_house_ready().can_afford_wood_house());
        assert!(starving().hunger > 80.0);
        assert!(exhausted().stamina < 20.0);
        assert!(stone_age().can_afford_stone_house());
        assert!(!stone_age().can_afford_wood_house());
    }
}

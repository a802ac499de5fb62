//! Utility Evaluator
//!
//! Multiplies a goal's clamped consideration scores into one value.

use npc_types::NpcContext;

use crate::consideration::clamp_unit;
use crate::goal::Goal;

/// Stateless multiplicative scorer.
#[derive(Debug, Clone, Copy, Default)]
pub struct UtilityEvaluator;

impl UtilityEvaluator {
    pub fn new() -> Self {
        Self
    }

    /// Scores a goal in `[0, 1]`.
    ///
    /// Stops at the first consideration that drives the product to 0; the
    /// remaining ones are not evaluated. A goal without considerations
    /// scores 1.
    pub fn evaluate(&self, goal: &Goal, ctx: &NpcContext) -> f32 {
        let mut score = 1.0_f32;
        for consideration in goal.considerations() {
            score *= clamp_unit(consideration.evaluate(ctx));
            if score <= 0.0 {
                break;
            }
        }
        score
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consideration::{BuildHouseFeasible, Consideration, Hunger, Inverted, LowWoodStock};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Counts evaluations and returns a fixed value.
    #[derive(Debug)]
    struct Counting {
        value: f32,
        calls: Arc<AtomicUsize>,
    }

    impl Consideration for Counting {
        fn evaluate(&self, _ctx: &NpcContext) -> f32 {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.value
        }

        fn name(&self) -> &'static str {
            "Counting"
        }
    }

    #[test]
    fn test_product_of_considerations() {
        let goal = Goal::new("BuildHouse")
            .with_consideration(BuildHouseFeasible)
            .with_consideration(Inverted::new(Hunger));
        let ctx = NpcContext::default()
            .with_hunger(10.0)
            .with_wood(80)
            .with_houses(1)
            .with_population(6);

        let score = UtilityEvaluator::new().evaluate(&goal, &ctx);
        assert!((score - 0.9).abs() < 1e-6);
    }

    #[test]
    fn test_empty_goal_scores_one() {
        let goal = Goal::new("Anything");
        assert_eq!(UtilityEvaluator::new().evaluate(&goal, &NpcContext::default()), 1.0);
    }

    #[test]
    fn test_short_circuits_on_zero() {
        let calls = Arc::new(AtomicUsize::new(0));
        let goal = Goal::new("GatherWood")
            .with_consideration(LowWoodStock::new(6))
            .with_consideration(Counting {
                value: 0.5,
                calls: Arc::clone(&calls),
            });

        // Plenty of wood: the first consideration is 0
        let ctx = NpcContext::default().with_wood(80);
        assert_eq!(UtilityEvaluator::new().evaluate(&goal, &ctx), 0.0);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_malformed_output_is_clamped() {
        let calls = Arc::new(AtomicUsize::new(0));
        let over = Goal::new("Over").with_consideration(Counting {
            value: 4.0,
            calls: Arc::clone(&calls),
        });
        let nan = Goal::new("Nan").with_consideration(Counting {
            value: f32::NAN,
            calls: Arc::clone(&calls),
        });

        let evaluator = UtilityEvaluator::new();
        let ctx = NpcContext::default();
        assert_eq!(evaluator.evaluate(&over, &ctx), 1.0);
        assert_eq!(evaluator.evaluate(&nan, &ctx), 0.0);
    }
}

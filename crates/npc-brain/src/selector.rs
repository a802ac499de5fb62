//! Goal Selector
//!
//! Scores every goal, skips those cooling down and hands the best one to
//! the planner.

use npc_types::{GoalScoreEntry, NpcContext};

use crate::goal::Goal;
use crate::planner::Planner;
use crate::utility::UtilityEvaluator;

/// Outcome of one selection pass.
#[derive(Debug, Clone, PartialEq)]
pub struct GoalSelection {
    /// Name of the chosen goal, if any goal was eligible
    pub selected: Option<String>,
    /// One entry per goal, in goal order
    pub scores: Vec<GoalScoreEntry>,
}

/// Cooldown-gated utility selector.
#[derive(Debug, Clone, Default)]
pub struct GoalSelector {
    evaluator: UtilityEvaluator,
}

impl GoalSelector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Picks the highest-scoring goal not on cooldown.
    ///
    /// Ties go to the goal listed first. The winner is marked selected at
    /// the context's simulation time and assigned to `planner`. When no goal
    /// is eligible the planner keeps whatever goal it already had.
    pub fn select_goal(
        &self,
        goals: &mut [Goal],
        planner: &mut dyn Planner,
        ctx: &NpcContext,
    ) -> GoalSelection {
        let now = ctx.simulation_time_seconds;
        let mut scores = Vec::with_capacity(goals.len());
        let mut best: Option<(usize, f32)> = None;

        for (index, goal) in goals.iter().enumerate() {
            if goal.is_on_cooldown(now) {
                tracing::debug!("goal {} on cooldown at t={:.2}", goal.name(), now);
                scores.push(GoalScoreEntry::cooling_down(goal.name()));
                continue;
            }

            let score = self.evaluator.evaluate(goal, ctx);
            tracing::debug!("goal {} scored {:.3}", goal.name(), score);
            scores.push(GoalScoreEntry::scored(goal.name(), score));

            if best.map_or(true, |(_, best_score)| score > best_score) {
                best = Some((index, score));
            }
        }

        let selected = best.map(|(index, _)| {
            let goal = &mut goals[index];
            goal.mark_selected(now);
            planner.set_goal(goal);
            goal.name().to_string()
        });

        GoalSelection { selected, scores }
    }
}

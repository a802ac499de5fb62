//! HTN Planner
//!
//! Decomposes a goal into hand-scored candidate methods, each a fixed
//! command sequence, and queues the best one. The highest score wins and
//! ties go to the method declared first.

use std::collections::VecDeque;
use std::fmt;

use npc_types::{NpcCommand, NpcContext, PlannerDecision, ReplanReason, NONE_NAME};

use super::{plan_preview, Planner};
use crate::goal::Goal;

/// Score of the catch-all method for unrecognized goals.
pub const FALLBACK_SCORE: f32 = 0.01;

/// One scored way of achieving a goal.
#[derive(Debug, Clone, PartialEq)]
pub struct HtnMethod {
    pub name: &'static str,
    pub score: f32,
    pub commands: Vec<NpcCommand>,
}

impl HtnMethod {
    pub fn new(name: &'static str, score: f32, commands: Vec<NpcCommand>) -> Self {
        Self {
            name,
            score,
            commands,
        }
    }
}

/// Produces candidate methods for a goal name, in declaration order.
pub type Decomposer = fn(&str, &NpcContext) -> Vec<HtnMethod>;

/// The built-in method tables.
pub fn default_methods(goal_name: &str, ctx: &NpcContext) -> Vec<HtnMethod> {
    use NpcCommand::*;

    match goal_name {
        "BuildHouse" | "ExpandHousing" => {
            let mut methods = vec![if ctx.can_afford_wood_house() {
                HtnMethod::new("BuildHouseByWood", 1.0, vec![BuildHouse])
            } else {
                HtnMethod::new("BuildHouseByWood", 0.7, vec![GatherWood, BuildHouse])
            }];
            if ctx.stone_buildings_enabled {
                methods.push(if ctx.can_afford_stone_house() {
                    HtnMethod::new("BuildHouseByStone", 0.95, vec![BuildHouse])
                } else {
                    HtnMethod::new("BuildHouseByStone", 0.55, vec![GatherStone, BuildHouse])
                });
            }
            methods
        }
        "SecureFood" => {
            let eat_score = if ctx.hunger >= 70.0 && ctx.home_food > 0 {
                0.9
            } else {
                0.1
            };
            let forage_then_eat = if ctx.hunger >= 50.0 { 0.75 } else { 0.3 };
            vec![
                HtnMethod::new("EatFromStock", eat_score, vec![EatFood]),
                HtnMethod::new("ForageFood", 0.6, vec![GatherFood]),
                HtnMethod::new("ForageThenEat", forage_then_eat, vec![GatherFood, EatFood]),
            ]
        }
        "RecoverStamina" => {
            let eat_then_rest = if ctx.home_food > 0 && ctx.hunger >= 50.0 {
                0.85
            } else {
                0.4
            };
            vec![
                HtnMethod::new("RestInPlace", 0.8, vec![Rest]),
                HtnMethod::new("EatThenRest", eat_then_rest, vec![EatFood, Rest]),
            ]
        }
        "StabilizeResources" | "GatherStone" => {
            let balanced = if ctx.home_wood < ctx.house_wood_cost {
                0.8
            } else {
                0.4
            };
            vec![
                HtnMethod::new("GatherStoneRun", 0.8, vec![GatherStone]),
                HtnMethod::new("BalancedGathering", balanced, vec![GatherWood, GatherStone]),
            ]
        }
        "GatherWood" => vec![HtnMethod::new("GatherWoodRun", 0.8, vec![GatherWood])],
        _ => vec![HtnMethod::new("FallbackIdle", FALLBACK_SCORE, vec![Idle])],
    }
}

/// Picks the winner and runner-up by index.
///
/// Ranking is a stable sort by descending score, so equal scores keep
/// declaration order. NaN scores rank last.
pub fn select_method(candidates: &[HtnMethod]) -> Option<(usize, Option<usize>)> {
    let mut order: Vec<usize> = (0..candidates.len()).collect();
    order.sort_by(|&a, &b| rank_key(candidates[b].score).total_cmp(&rank_key(candidates[a].score)));
    let winner = *order.first()?;
    Some((winner, order.get(1).copied()))
}

fn rank_key(score: f32) -> f32 {
    if score.is_nan() {
        f32::NEG_INFINITY
    } else {
        score
    }
}

/// Per-agent HTN planner state.
pub struct HtnPlanner {
    decomposer: Decomposer,
    plan: VecDeque<NpcCommand>,
    goal: Option<String>,
    goal_changed: bool,
    method_name: String,
    method_score: f32,
    runner_up_method: String,
    runner_up_score: f32,
}

impl fmt::Debug for HtnPlanner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HtnPlanner")
            .field("plan", &self.plan)
            .field("goal", &self.goal)
            .field("goal_changed", &self.goal_changed)
            .field("method_name", &self.method_name)
            .field("runner_up_method", &self.runner_up_method)
            .finish_non_exhaustive()
    }
}

impl Default for HtnPlanner {
    fn default() -> Self {
        Self::new()
    }
}

impl HtnPlanner {
    pub fn new() -> Self {
        Self {
            decomposer: default_methods,
            plan: VecDeque::new(),
            goal: None,
            goal_changed: false,
            method_name: NONE_NAME.to_string(),
            method_score: 0.0,
            runner_up_method: NONE_NAME.to_string(),
            runner_up_score: 0.0,
        }
    }

    /// Replaces the method tables.
    pub fn with_decomposer(mut self, decomposer: Decomposer) -> Self {
        self.decomposer = decomposer;
        self
    }

    fn decompose(&mut self, goal_name: &str, ctx: &NpcContext) -> bool {
        let candidates = (self.decomposer)(goal_name, ctx);
        let Some((winner, runner_up)) = select_method(&candidates) else {
            self.record_method(None, None);
            return false;
        };

        let chosen = &candidates[winner];
        self.plan.extend(chosen.commands.iter().copied());
        self.record_method(Some(chosen), runner_up.map(|i| &candidates[i]));
        tracing::debug!(
            "HTN goal={} method={} ({:.2}) runner_up={} ({:.2})",
            goal_name,
            self.method_name,
            self.method_score,
            self.runner_up_method,
            self.runner_up_score
        );
        !chosen.commands.is_empty()
    }

    fn record_method(&mut self, chosen: Option<&HtnMethod>, runner_up: Option<&HtnMethod>) {
        let (name, score) = chosen.map_or((NONE_NAME, 0.0), |m| (m.name, m.score));
        self.method_name = name.to_string();
        self.method_score = score;
        let (name, score) = runner_up.map_or((NONE_NAME, 0.0), |m| (m.name, m.score));
        self.runner_up_method = name.to_string();
        self.runner_up_score = score;
    }
}

impl Planner for HtnPlanner {
    fn name(&self) -> &'static str {
        "Htn"
    }

    fn set_goal(&mut self, goal: &Goal) {
        if self.goal.as_deref() != Some(goal.name()) {
            self.goal = Some(goal.name().to_string());
            self.plan.clear();
            self.goal_changed = true;
        }
    }

    fn current_goal(&self) -> Option<&str> {
        self.goal.as_deref()
    }

    fn next_command(&mut self, ctx: &NpcContext) -> PlannerDecision {
        let Some(goal) = self.goal.clone() else {
            return PlannerDecision::idle(ReplanReason::NoGoal);
        };

        let mut reason = ReplanReason::PlanContinue;
        if self.plan.is_empty() {
            let found = self.decompose(&goal, ctx);
            reason = match (self.goal_changed, found) {
                (true, _) => ReplanReason::GoalChanged,
                (false, true) => ReplanReason::MethodScored,
                (false, false) => ReplanReason::NoMethod,
            };
            self.goal_changed = false;
        }

        let decision = match self.plan.pop_front() {
            Some(command) => PlannerDecision::planned(
                command,
                1 + self.plan.len(),
                plan_preview(command, self.plan.iter()),
                reason,
            ),
            None => PlannerDecision::idle(reason),
        };

        decision
            .with_method(self.method_name.clone(), self.method_score)
            .with_runner_up(self.runner_up_method.clone(), self.runner_up_score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(methods: &[HtnMethod]) -> Vec<&str> {
        methods.iter().map(|m| m.name).collect()
    }

    #[test]
    fn test_build_house_methods() {
        let poor = NpcContext::default().with_wood(0);
        let methods = default_methods("BuildHouse", &poor);
        assert_eq!(names(&methods), vec!["BuildHouseByWood"]);
        assert_eq!(methods[0].score, 0.7);
        assert_eq!(methods[0].commands, vec![NpcCommand::GatherWood, NpcCommand::BuildHouse]);

        let stone = NpcContext::default()
            .with_wood(60)
            .with_stone(150)
            .with_stone_buildings(true);
        let methods = default_methods("ExpandHousing", &stone);
        assert_eq!(names(&methods), vec!["BuildHouseByWood", "BuildHouseByStone"]);
        assert_eq!(methods[0].score, 1.0);
        assert_eq!(methods[1].score, 0.95);
        assert_eq!(methods[1].commands, vec![NpcCommand::BuildHouse]);

        // Stone enabled but short: quarry first
        let short = NpcContext::default()
            .with_wood(0)
            .with_stone(20)
            .with_stone_buildings(true);
        let methods = default_methods("BuildHouse", &short);
        assert_eq!(names(&methods), vec!["BuildHouseByWood", "BuildHouseByStone"]);
        assert_eq!(methods[1].score, 0.55);
        assert_eq!(methods[1].commands, vec![NpcCommand::GatherStone, NpcCommand::BuildHouse]);
        assert_eq!(select_method(&methods), Some((0, Some(1))));

        // Enough stone but the colony may not build with it
        let barred = NpcContext::default()
            .with_stone(150)
            .with_stone_buildings(false);
        let methods = default_methods("BuildHouse", &barred);
        assert_eq!(methods[1].score, 0.55);
        assert_eq!(methods[1].commands, vec![NpcCommand::GatherStone, NpcCommand::BuildHouse]);
    }

    #[test]
    fn test_unknown_goal_falls_back_to_idle() {
        let methods = default_methods("Dance", &NpcContext::default());
        assert_eq!(names(&methods), vec!["FallbackIdle"]);
        assert_eq!(methods[0].score, FALLBACK_SCORE);
        assert_eq!(methods[0].commands, vec![NpcCommand::Idle]);
    }

    #[test]
    fn test_select_method_prefers_first_on_tie() {
        let candidates = vec![
            HtnMethod::new("A", 0.5, vec![NpcCommand::GatherWood]),
            HtnMethod::new("B", 0.8, vec![NpcCommand::GatherStone]),
            HtnMethod::new("C", 0.8, vec![NpcCommand::GatherFood]),
        ];
        assert_eq!(select_method(&candidates), Some((1, Some(2))));
        assert_eq!(select_method(&candidates[..1]), Some((0, None)));
        assert_eq!(select_method(&[]), None);
    }

    #[test]
    fn test_select_method_ranks_nan_last() {
        let candidates = vec![
            HtnMethod::new("Broken", f32::NAN, vec![NpcCommand::Rest]),
            HtnMethod::new("Fine", 0.1, vec![NpcCommand::Rest]),
        ];
        assert_eq!(select_method(&candidates), Some((1, Some(0))));
    }

    #[test]
    fn test_records_method_and_runner_up() {
        let mut planner = HtnPlanner::new();
        planner.set_goal(&Goal::new("SecureFood"));
        let ctx = NpcContext::default().with_hunger(85.0).with_food(2);

        let decision = planner.next_command(&ctx);
        assert_eq!(decision.command, NpcCommand::EatFood);
        assert_eq!(decision.replan_reason, ReplanReason::GoalChanged);
        assert_eq!(decision.method_name, "EatFromStock");
        assert_eq!(decision.method_score, 0.9);
        assert_eq!(decision.runner_up_method, "ForageThenEat");
        assert_eq!(decision.runner_up_score, 0.75);

        // Plan drained: the same goal is decomposed again
        let again = planner.next_command(&ctx);
        assert_eq!(again.replan_reason, ReplanReason::MethodScored);
    }

    #[test]
    fn test_single_candidate_runner_up_is_none() {
        let mut planner = HtnPlanner::new();
        planner.set_goal(&Goal::new("GatherWood"));
        let decision = planner.next_command(&NpcContext::default());

        assert_eq!(decision.method_name, "GatherWoodRun");
        assert_eq!(decision.runner_up_method, NONE_NAME);
        assert_eq!(decision.runner_up_score, 0.0);
    }

    #[test]
    fn test_multi_step_method_continues() {
        let mut planner = HtnPlanner::new();
        planner.set_goal(&Goal::new("BuildHouse"));
        let ctx = NpcContext::default().with_wood(0);

        let first = planner.next_command(&ctx);
        assert_eq!(first.command, NpcCommand::GatherWood);
        assert_eq!(first.plan_length, 2);
        assert_eq!(first.plan_preview, vec![NpcCommand::GatherWood, NpcCommand::BuildHouse]);

        let second = planner.next_command(&ctx);
        assert_eq!(second.command, NpcCommand::BuildHouse);
        assert_eq!(second.replan_reason, ReplanReason::PlanContinue);
        assert_eq!(second.method_name, "BuildHouseByWood");
    }

    #[test]
    fn test_empty_table_reports_no_method() {
        fn nothing(_: &str, _: &NpcContext) -> Vec<HtnMethod> {
            Vec::new()
        }

        let mut planner = HtnPlanner::new().with_decomposer(nothing);
        planner.set_goal(&Goal::new("BuildHouse"));

        let first = planner.next_command(&NpcContext::default());
        assert_eq!(first.command, NpcCommand::Idle);
        assert_eq!(first.replan_reason, ReplanReason::GoalChanged);
        assert_eq!(first.method_name, NONE_NAME);

        let second = planner.next_command(&NpcContext::default());
        assert_eq!(second.replan_reason, ReplanReason::NoMethod);
    }

    #[test]
    fn test_no_goal_is_idle() {
        let mut planner = HtnPlanner::new();
        let decision = planner.next_command(&NpcContext::default());
        assert_eq!(decision.replan_reason, ReplanReason::NoGoal);
        assert_eq!(decision.method_name, NONE_NAME);
    }
}

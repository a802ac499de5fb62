//! GOAP Planner
//!
//! Forward A* search from the agent's symbolic state to a goal-derived
//! target state. The heuristic sums per-key deficits; it can overestimate
//! when one coarse action overshoots several keys at once, so plans are
//! good rather than guaranteed optimal.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashSet, VecDeque};

use npc_types::{NpcCommand, NpcContext, PlannerDecision, ReplanReason};

use super::state::GoapState;
use super::{plan_preview, Planner};
use crate::goal::Goal;

/// Default cap on node expansions per search.
pub const DEFAULT_MAX_EXPANSIONS: usize = 4096;

/// Wood added by one GatherWood action.
pub const WOOD_PER_GATHER: i32 = 50;
/// Stone added by one GatherStone action.
pub const STONE_PER_GATHER: i32 = 15;

/// One symbolic action available to the search.
#[derive(Debug, Clone, PartialEq)]
pub struct GoapAction {
    pub name: &'static str,
    pub command: NpcCommand,
    pub preconditions: GoapState,
    pub effects: GoapState,
    pub cost: u32,
}

impl GoapAction {
    pub fn new(name: &'static str, command: NpcCommand) -> Self {
        Self {
            name,
            command,
            preconditions: GoapState::new(),
            effects: GoapState::new(),
            cost: 1,
        }
    }

    pub fn requires(mut self, key: &str, value: i32) -> Self {
        self.preconditions.set(key, value);
        self
    }

    pub fn adds(mut self, key: &str, value: i32) -> Self {
        self.effects.set(key, value);
        self
    }

    pub fn with_cost(mut self, cost: u32) -> Self {
        self.cost = cost;
        self
    }
}

/// The built-in action catalog.
pub fn default_actions() -> Vec<GoapAction> {
    vec![
        GoapAction::new("GatherWood", NpcCommand::GatherWood).adds("wood", WOOD_PER_GATHER),
        GoapAction::new("GatherStone", NpcCommand::GatherStone).adds("stone", STONE_PER_GATHER),
        GoapAction::new("GatherFood", NpcCommand::GatherFood)
            .adds("food", 8)
            .adds("satiety", 8),
        GoapAction::new("EatFood", NpcCommand::EatFood)
            .requires("food", 1)
            .adds("food", -1)
            .adds("satiety", 35),
        GoapAction::new("Rest", NpcCommand::Rest).adds("stamina", 28),
        GoapAction::new("BuildHouse", NpcCommand::BuildHouse)
            .requires("wood", 50)
            .adds("wood", -50)
            .adds("house", 1),
    ]
}

/// Symbolic view of the context the search starts from.
pub fn world_state(ctx: &NpcContext) -> GoapState {
    GoapState::from_pairs([
        ("wood", ctx.home_wood),
        ("stone", ctx.home_stone),
        ("food", ctx.home_food),
        ("house", ctx.home_house_count),
        ("satiety", satiety(ctx)),
        ("stamina", stamina(ctx)),
    ])
}

// Float to int casts saturate, so only the arithmetic needs guarding
fn satiety(ctx: &NpcContext) -> i32 {
    100_i32.saturating_sub(ctx.hunger.round() as i32).max(0)
}

fn stamina(ctx: &NpcContext) -> i32 {
    (ctx.stamina.round() as i32).max(0)
}

/// Target state for a goal name. Unknown goals get an empty target, which
/// every state satisfies.
pub fn goal_state(goal_name: &str, ctx: &NpcContext) -> GoapState {
    match goal_name {
        "GatherWood" => {
            GoapState::new().with("wood", ctx.home_wood.saturating_add(WOOD_PER_GATHER))
        }
        "BuildHouse" | "ExpandHousing" => {
            GoapState::new().with("house", ctx.home_house_count.saturating_add(1))
        }
        "GatherStone" | "StabilizeResources" => {
            GoapState::new().with("stone", ctx.home_stone.saturating_add(STONE_PER_GATHER))
        }
        "SecureFood" => GoapState::new().with("satiety", satiety(ctx).max(20).saturating_add(20)),
        "RecoverStamina" => {
            GoapState::new().with("stamina", stamina(ctx).max(20).saturating_add(30))
        }
        _ => GoapState::new(),
    }
}

/// A found plan and its summed action cost.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoapPlan {
    pub commands: Vec<NpcCommand>,
    pub cost: i64,
}

#[derive(Debug)]
struct Node {
    state: GoapState,
    parent: Option<usize>,
    action: Option<usize>,
    g: i64,
}

/// Per-agent GOAP planner state.
#[derive(Debug)]
pub struct GoapPlanner {
    actions: Vec<GoapAction>,
    plan: VecDeque<NpcCommand>,
    goal: Option<String>,
    goal_changed: bool,
    max_expansions: usize,
}

impl Default for GoapPlanner {
    fn default() -> Self {
        Self::new()
    }
}

impl GoapPlanner {
    pub fn new() -> Self {
        Self {
            actions: default_actions(),
            plan: VecDeque::new(),
            goal: None,
            goal_changed: false,
            max_expansions: DEFAULT_MAX_EXPANSIONS,
        }
    }

    /// Replaces the action catalog.
    pub fn with_actions(mut self, actions: Vec<GoapAction>) -> Self {
        self.actions = actions;
        self
    }

    /// Caps node expansions per search. Values below 1 become 1.
    pub fn with_max_expansions(mut self, max_expansions: usize) -> Self {
        self.max_expansions = max_expansions.max(1);
        self
    }

    pub fn max_expansions(&self) -> usize {
        self.max_expansions
    }

    /// Commands still queued after the last returned one.
    pub fn queued(&self) -> impl Iterator<Item = &NpcCommand> {
        self.plan.iter()
    }

    /// Searches for a command sequence reaching the goal's target state.
    ///
    /// Open nodes are ordered by `(f, h, insertion order)`. Returns `None`
    /// when the open set empties or the expansion budget runs out.
    pub fn build_plan(&self, ctx: &NpcContext, goal_name: &str) -> Option<GoapPlan> {
        let start = world_state(ctx);
        let target = goal_state(goal_name, ctx);
        tracing::trace!("GOAP {} from {} to {}", goal_name, start, target);

        let mut nodes = vec![Node {
            state: start.clone(),
            parent: None,
            action: None,
            g: 0,
        }];
        let mut open = BinaryHeap::new();
        open.push(Reverse((start.deficit_to(&target), start.deficit_to(&target), 0usize)));
        let mut closed: HashSet<GoapState> = HashSet::new();
        let mut expansions = 0usize;

        while let Some(Reverse((_, _, index))) = open.pop() {
            if nodes[index].state.contains(&target) {
                let plan = self.reconstruct(&nodes, index);
                tracing::trace!(
                    "GOAP reached {} after {} expansions ({} nodes), cost {}",
                    goal_name,
                    expansions,
                    nodes.len(),
                    plan.cost
                );
                return Some(plan);
            }

            if !closed.insert(nodes[index].state.clone()) {
                continue;
            }

            expansions += 1;
            if expansions > self.max_expansions {
                tracing::warn!(
                    "GOAP search for {} exceeded {} expansions; no plan",
                    goal_name,
                    self.max_expansions
                );
                return None;
            }

            for (action_index, action) in self.actions.iter().enumerate() {
                if !nodes[index].state.contains(&action.preconditions) {
                    continue;
                }
                let next = nodes[index].state.apply(&action.effects);
                if closed.contains(&next) {
                    continue;
                }

                let g = nodes[index].g + i64::from(action.cost);
                let h = next.deficit_to(&target);
                let id = nodes.len();
                nodes.push(Node {
                    state: next,
                    parent: Some(index),
                    action: Some(action_index),
                    g,
                });
                open.push(Reverse((g + h, h, id)));
            }
        }

        tracing::trace!("GOAP exhausted the open set for {} after {} expansions", goal_name, expansions);
        None
    }

    fn reconstruct(&self, nodes: &[Node], goal_index: usize) -> GoapPlan {
        let mut steps = Vec::new();
        let mut index = goal_index;
        while let (Some(parent), Some(action)) = (nodes[index].parent, nodes[index].action) {
            steps.push(&self.actions[action]);
            index = parent;
        }
        steps.reverse();

        tracing::trace!(
            "GOAP plan: {}",
            steps.iter().map(|a| a.name).collect::<Vec<_>>().join(" -> ")
        );
        GoapPlan {
            commands: steps.iter().map(|a| a.command).collect(),
            cost: nodes[goal_index].g,
        }
    }
}

impl Planner for GoapPlanner {
    fn name(&self) -> &'static str {
        "Goap"
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
            let built = self.build_plan(ctx, &goal);
            reason = match (self.goal_changed, built.is_some()) {
                (true, _) => ReplanReason::GoalChanged,
                (false, true) => ReplanReason::PlanBuilt,
                (false, false) => ReplanReason::NoPlan,
            };
            if let Some(plan) = built {
                self.plan.extend(plan.commands);
            }
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

        tracing::debug!(
            "GOAP goal={} command={} reason={} plan_length={}",
            goal,
            decision.command,
            decision.replan_reason,
            decision.plan_length
        );
        decision
    }
}

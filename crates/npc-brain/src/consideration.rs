//! Considerations
//!
//! Pure scoring functions mapping a context snapshot to a desirability in
//! `[0, 1]`. Considerations carry at most a few fixed parameters and never
//! mutate anything, so the evaluator is free to skip them.

use std::fmt::Debug;

use npc_types::NpcContext;

/// A single scored aspect of a goal's desirability.
pub trait Consideration: Debug + Send + Sync {
    /// Scores the context. Callers clamp the result, so out-of-range or NaN
    /// output is tolerated.
    fn evaluate(&self, ctx: &NpcContext) -> f32;

    /// Short name used in logs.
    fn name(&self) -> &'static str;
}

/// Clamps a raw score into `[0, 1]`, mapping NaN to 0.
pub fn clamp_unit(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// Linear ramp from 0 at `threshold` up to 1 at zero stock.
fn low_stock_ramp(stock: i32, threshold: i32) -> f32 {
    if stock >= threshold {
        return 0.0;
    }
    clamp_unit((threshold - stock) as f32 / threshold as f32)
}

/// How hungry the agent is: `hunger / 100`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Hunger;

impl Consideration for Hunger {
    fn evaluate(&self, ctx: &NpcContext) -> f32 {
        clamp_unit(ctx.hunger / 100.0)
    }

    fn name(&self) -> &'static str {
        "Hunger"
    }
}

/// Pressure from a wood stock below `threshold`.
#[derive(Debug, Clone, Copy)]
pub struct LowWoodStock {
    threshold: i32,
}

impl LowWoodStock {
    /// Thresholds below 1 are raised to 1.
    pub fn new(threshold: i32) -> Self {
        Self {
            threshold: threshold.max(1),
        }
    }

    pub fn threshold(&self) -> i32 {
        self.threshold
    }
}

impl Default for LowWoodStock {
    fn default() -> Self {
        Self::new(5)
    }
}

impl Consideration for LowWoodStock {
    fn evaluate(&self, ctx: &NpcContext) -> f32 {
        low_stock_ramp(ctx.home_wood, self.threshold)
    }

    fn name(&self) -> &'static str {
        "LowWoodStock"
    }
}

/// Pressure from a stone stock below `threshold`.
#[derive(Debug, Clone, Copy)]
pub struct LowStoneStock {
    threshold: i32,
}

impl LowStoneStock {
    /// Thresholds below 1 are raised to 1.
    pub fn new(threshold: i32) -> Self {
        Self {
            threshold: threshold.max(1),
        }
    }

    pub fn threshold(&self) -> i32 {
        self.threshold
    }
}

impl Default for LowStoneStock {
    fn default() -> Self {
        Self::new(5)
    }
}

impl Consideration for LowStoneStock {
    fn evaluate(&self, ctx: &NpcContext) -> f32 {
        low_stock_ramp(ctx.home_stone, self.threshold)
    }

    fn name(&self) -> &'static str {
        "LowStoneStock"
    }
}

/// Whether building a house is both possible and needed.
///
/// - 0 when neither the wood nor the enabled stone path is affordable
/// - 1 when the population has reached housing capacity
/// - 0.25 otherwise ("can, but not urgent")
#[derive(Debug, Clone, Copy, Default)]
pub struct BuildHouseFeasible;

impl Consideration for BuildHouseFeasible {
    fn evaluate(&self, ctx: &NpcContext) -> f32 {
        if !ctx.can_afford_house() {
            return 0.0;
        }
        if ctx.colony_population >= ctx.housing_capacity() {
            1.0
        } else {
            0.25
        }
    }

    fn name(&self) -> &'static str {
        "BuildHouseFeasible"
    }
}

/// Food stock shortfall against a population-scaled target of
/// `max(3, population * 1.2)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LowFood;

impl LowFood {
    pub fn target(ctx: &NpcContext) -> f32 {
        (ctx.colony_population as f32 * 1.2).max(3.0)
    }
}

impl Consideration for LowFood {
    fn evaluate(&self, ctx: &NpcContext) -> f32 {
        let target = Self::target(ctx);
        let food = ctx.home_food as f32;
        if food >= target {
            return 0.0;
        }
        clamp_unit((target - food) / target)
    }

    fn name(&self) -> &'static str {
        "LowFood"
    }
}

/// `(100 - stamina) / 100`.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaminaDeficit;

impl Consideration for StaminaDeficit {
    fn evaluate(&self, ctx: &NpcContext) -> f32 {
        clamp_unit((100.0 - ctx.stamina) / 100.0)
    }

    fn name(&self) -> &'static str {
        "StaminaDeficit"
    }
}

/// Occupancy above 85% of housing capacity: `population / capacity - 0.85`.
///
/// A colony with no housing at all counts as capacity 1.
#[derive(Debug, Clone, Copy, Default)]
pub struct HousingPressure;

impl Consideration for HousingPressure {
    fn evaluate(&self, ctx: &NpcContext) -> f32 {
        let capacity = ctx.housing_capacity().max(1) as f32;
        clamp_unit(ctx.colony_population as f32 / capacity - 0.85)
    }

    fn name(&self) -> &'static str {
        "HousingPressure"
    }
}

/// `1 - clamp(inner)`. Used to suppress a goal while some pressure is high.
#[derive(Debug)]
pub struct Inverted {
    inner: Box<dyn Consideration>,
}

impl Inverted {
    pub fn new(inner: impl Consideration + 'static) -> Self {
        Self {
            inner: Box::new(inner),
        }
    }

    pub fn boxed(inner: Box<dyn Consideration>) -> Self {
        Self { inner }
    }
}

impl Consideration for Inverted {
    fn evaluate(&self, ctx: &NpcContext) -> f32 {
        1.0 - clamp_unit(self.inner.evaluate(ctx))
    }

    fn name(&self) -> &'static str {
        "Inverted"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_unit_handles_nan_and_range() {
        assert_eq!(clamp_unit(f32::NAN), 0.0);
        assert_eq!(clamp_unit(-3.0), 0.0);
        assert_eq!(clamp_unit(7.5), 1.0);
        assert_eq!(clamp_unit(0.4), 0.4);
    }

    #[test]
    fn test_hunger() {
        let ctx = NpcContext::default().with_hunger(35.0);
        assert!((Hunger.evaluate(&ctx) - 0.35).abs() < 1e-6);

        // Out-of-range hunger clamps
        let starving = NpcContext::default().with_hunger(250.0);
        assert_eq!(Hunger.evaluate(&starving), 1.0);
    }

    #[test]
    fn test_low_wood_stock_ramp() {
        let c = LowWoodStock::new(6);
        assert_eq!(c.evaluate(&NpcContext::default().with_wood(0)), 1.0);
        assert!((c.evaluate(&NpcContext::default().with_wood(3)) - 0.5).abs() < 1e-6);
        assert_eq!(c.evaluate(&NpcContext::default().with_wood(6)), 0.0);
        assert_eq!(c.evaluate(&NpcContext::default().with_wood(80)), 0.0);
    }

    #[test]
    fn test_low_stock_threshold_minimum() {
        assert_eq!(LowWoodStock::new(0).threshold(), 1);
        assert_eq!(LowStoneStock::new(-4).threshold(), 1);
        assert_eq!(LowWoodStock::default().threshold(), 5);

        let c = LowStoneStock::new(10);
        assert!((c.evaluate(&NpcContext::default().with_stone(4)) - 0.6).abs() < 1e-6);
    }

    #[test]
    fn test_build_house_feasible() {
        // Cannot afford
        let poor = NpcContext::default().with_wood(10).with_houses(1).with_population(6);
        assert_eq!(BuildHouseFeasible.evaluate(&poor), 0.0);

        // Affordable and at capacity
        let crowded = NpcContext::default().with_wood(80).with_houses(1).with_population(5);
        assert_eq!(BuildHouseFeasible.evaluate(&crowded), 1.0);

        // Affordable with room to spare
        let roomy = NpcContext::default().with_wood(80).with_houses(2).with_population(6);
        assert_eq!(BuildHouseFeasible.evaluate(&roomy), 0.25);

        // Stone path counts only when enabled
        let stone = NpcContext::default()
            .with_stone(150)
            .with_houses(1)
            .with_population(9)
            .with_stone_buildings(true);
        assert_eq!(BuildHouseFeasible.evaluate(&stone), 1.0);
    }

    #[test]
    fn test_low_food_target_scales_with_population() {
        let small = NpcContext::default().with_population(1).with_food(0);
        assert_eq!(LowFood::target(&small), 3.0);
        assert_eq!(LowFood.evaluate(&small), 1.0);

        let large = NpcContext::default().with_population(10).with_food(6);
        assert!((LowFood::target(&large) - 12.0).abs() < 1e-5);
        assert!((LowFood.evaluate(&large) - 0.5).abs() < 1e-5);

        let stocked = NpcContext::default().with_population(10).with_food(20);
        assert_eq!(LowFood.evaluate(&stocked), 0.0);
    }

    #[test]
    fn test_stamina_deficit() {
        assert_eq!(StaminaDeficit.evaluate(&NpcContext::default().with_stamina(100.0)), 0.0);
        assert!((StaminaDeficit.evaluate(&NpcContext::default().with_stamina(25.0)) - 0.75).abs() < 1e-6);
    }

    #[test]
    fn test_housing_pressure() {
        let under = NpcContext::default().with_houses(2).with_population(5);
        assert_eq!(HousingPressure.evaluate(&under), 0.0);

        let full = NpcContext::default().with_houses(2).with_population(10);
        assert!((HousingPressure.evaluate(&full) - 0.15).abs() < 1e-5);

        // No houses at all behaves like capacity 1
        let homeless = NpcContext::default().with_houses(0).with_population(3);
        assert_eq!(HousingPressure.evaluate(&homeless), 1.0);
    }

    #[test]
    fn test_inverted() {
        let inv = Inverted::new(Hunger);
        assert!((inv.evaluate(&NpcContext::default().with_hunger(10.0)) - 0.9).abs() < 1e-6);

        // Inner output is clamped before inversion
        let inv_over = Inverted::new(Hunger);
        assert_eq!(inv_over.evaluate(&NpcContext::default().with_hunger(140.0)), 0.0);
        assert_eq!(inv.name(), "Inverted");
    }
}

use crate::context::SimContext;
use crate::error::SimResult;

/// One phase of the per-tick update.
///
/// The simulation runs its built-in phases (motion, actors, balls, beds,
/// interactions) in a fixed order, then any registered custom systems, and
/// finally the holding sync. Each phase receives a mutable context with the
/// world, clock, configuration, RNG, and event log.
pub trait System: std::fmt::Debug {
    /// Human-readable name for this system.
    fn name(&self) -> &str;

    /// Called once per tick.
    fn tick(&mut self, ctx: &mut SimContext<'_>) -> SimResult<()>;

    /// Called once before the first tick. Optional setup hook.
    fn init(&mut self, _ctx: &mut SimContext<'_>) -> SimResult<()> {
        Ok(())
    }

    /// Support downcasting to concrete types.
    fn as_any(&self) -> &dyn std::any::Any;

    /// Support downcasting to concrete types.
    fn as_any_mut(&mut self) -> &mut dyn std::any::Any;
}

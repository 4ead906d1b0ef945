use std::collections::BTreeMap;

use tracing::debug;

use crate::config::FieldTypeTable;
use crate::error::Result;
use crate::simulation::production::{step_all, ProductionReport};
use crate::simulation::upkeep::charge_upkeep;
use crate::state::{PlayerId, World};

/// Game ticks between production passes
pub const PRODUCTION_PERIOD: u32 = 10;
/// Game ticks between upkeep charges
pub const UPKEEP_PERIOD: u32 = 100;
/// The production counter wraps at this value
pub const PRODUCTION_COUNTER_MAX: u8 = 8;

/// Result of advancing one game tick
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickResult {
    pub time_game: u32,
    pub production: Option<ProductionReport>,
    pub upkeep: Option<BTreeMap<PlayerId, u32>>,
}

/// Tick executor - advances the production economy of a loaded world
pub struct TickExecutor<'a> {
    fields: &'a FieldTypeTable,
    time_game: u32,
    cnt_production: u8,
}

impl<'a> TickExecutor<'a> {
    /// Start from the clock stored in the world's timers, or from zero
    pub fn new(fields: &'a FieldTypeTable, world: &World) -> Self {
        let (time_game, cnt_production) = world
            .timers
            .as_ref()
            .map_or((0, 0), |t| (t.time_game, t.cnt_production));
        Self { fields, time_game, cnt_production }
    }

    pub fn time_game(&self) -> u32 {
        self.time_game
    }

    pub fn cnt_production(&self) -> u8 {
        self.cnt_production
    }

    /// Advance one game tick
    pub fn tick(&mut self, world: &mut World) -> Result<TickResult> {
        self.time_game = self.time_game.wrapping_add(1);
        let mut result = TickResult { time_game: self.time_game, ..TickResult::default() };

        if self.time_game % PRODUCTION_PERIOD == 0 {
            self.cnt_production = (self.cnt_production + 1) % PRODUCTION_COUNTER_MAX;
            let report = step_all(&mut world.producers, &world.islands, self.fields, self.cnt_production)?;
            debug!(time = self.time_game, ?report, "production pass");
            result.production = Some(report);
        }
        if self.time_game % UPKEEP_PERIOD == 0 {
            result.upkeep = Some(charge_upkeep(world, self.fields)?);
        }

        if let Some(timers) = world.timers.as_mut() {
            timers.time_game = self.time_game;
            timers.cnt_production = self.cnt_production;
        }
        Ok(result)
    }

    /// Advance several game ticks
    pub fn run(&mut self, world: &mut World, ticks: u32) -> Result<Vec<TickResult>> {
        let mut results = Vec::with_capacity(ticks as usize);
        for _ in 0..ticks {
            results.push(self.tick(world)?);
        }
        Ok(results)
    }
}

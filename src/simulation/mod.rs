//! Production economy on top of a loaded world

pub mod production;
pub mod tick;
pub mod upkeep;

pub use production::{step, step_all, ProductionReport, StepOutcome, RETRY_TICKS};
pub use tick::{TickExecutor, TickResult};
pub use upkeep::{charge_upkeep, player_upkeep};

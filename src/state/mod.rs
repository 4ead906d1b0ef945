pub mod castle;
pub mod city;
pub mod farm_field;
pub mod field;
pub mod generation;
pub mod good;
pub mod house;
pub mod island;
pub mod kontor;
pub mod player;
pub mod producer;
pub mod ship;
pub mod soldier;
pub mod task;
pub mod timers;
pub mod trader;
pub mod world;

pub use castle::{Castle, GarrisonUnit};
pub use city::City;
pub use farm_field::FarmField;
pub use field::{Field, FieldGrid, BUILDING_ID_OFFSET};
pub use generation::{ClimateFilter, IslandTemplate, WorldGenerationSettings};
pub use good::{Good, TradeAction};
pub use house::House;
pub use island::{
    Climate, DepositSize, Island, IslandFertility, IslandId, IslandSize,
    OreKind, OreLocation,
};
pub use kontor::Kontor;
pub use player::{Contract, ContractState, Player, PlayerEvent, PlayerId, PlayerKind};
pub use producer::{Producer, ProducerFlags, ProducerStatus};
pub use ship::{Cargo, CourseState, Ship, ShipCourse, ShipType, TradeStop};
pub use soldier::{Soldier, SoldierKind};
pub use task::Task;
pub use timers::{TimerFlags, Timers};
pub use trader::{Trader, TraderGood};
pub use world::{OnIsland, Owned, RefTables, ScenarioInfo, World};

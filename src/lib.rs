//! GAM World
//!
//! A Rust library for reading save games and scenarios of a 1990s island
//! trading simulation into a typed, cross-referenced world model.

pub mod codec;
pub mod config;
pub mod error;
pub mod loader;
pub mod simulation;
pub mod state;

pub use error::{Error, ErrorCategory, Result};
pub use codec::{
    BinaryReader, BinaryWriter, Block, Container, IslandBlock,
    GoodAmount, Point, Rotation4, Rotation8,
};
pub use config::{FieldType, FieldTypeTable, ProductionParams};
pub use loader::{
    DirStorage, MemoryStorage, Storage, ZipStorage,
    TerrainLoader, WorldGenerator, WorldLoader,
};
pub use state::{
    City, Island, IslandId, Kontor, Player, PlayerId, Producer, Ship, Soldier, World,
};
pub use simulation::{StepOutcome, TickExecutor};

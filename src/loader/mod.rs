//! Turning containers plus the terrain library into a [`World`](crate::state::World)

pub mod assembler;
pub mod generator;
pub mod storage;
pub mod terrain;

pub use assembler::WorldLoader;
pub use generator::{GeneratedIsland, WorldGenerator};
pub use storage::{DirStorage, MemoryStorage, Storage, ZipStorage};
pub use terrain::{terrain_path, TerrainEntry, TerrainFile, TerrainLoader};

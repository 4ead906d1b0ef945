pub mod reader;
pub mod writer;
pub mod types;
pub mod block;

pub use reader::BinaryReader;
pub use writer::BinaryWriter;
pub use types::*;
pub use block::{Block, IslandBlock, Container, TAG_LEN};

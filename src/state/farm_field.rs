use serde::Serialize;

use crate::codec::{BinaryReader, Point};
use crate::error::{Error, Result};
use super::island::IslandId;
use super::world::{OnIsland, RefTables};

/// A growing crop tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FarmField {
    pub island_id: IslandId,
    pub position: Point,
    /// Index into the 32 growth timers, 0..=32
    pub growth_timer_index: u8,
    pub last_growth_count: u8,
    /// Zero in editor-made missions; the field's own animation step is authoritative
    pub anim_count: u8,
}

impl FarmField {
    pub const SIZE: usize = 8;
    pub const MAX_GROWTH_TIMER_INDEX: u8 = 32;

    pub fn read(reader: &mut BinaryReader, refs: &RefTables) -> Result<Self> {
        let island_id = refs.island(reader.read_u8()? as u32)?.id;
        let position = reader.read_point_u8()?;
        let growth_timer_index = reader.read_u8()?;
        if growth_timer_index > Self::MAX_GROWTH_TIMER_INDEX {
            return Err(Error::unexpected("growth timer index", growth_timer_index));
        }
        let last_growth_count = reader.read_u8()?;
        let anim_count = reader.read_u8()?;
        reader.expect_zero_u16("farm field padding")?;

        Ok(Self { island_id, position, growth_timer_index, last_growth_count, anim_count })
    }
}

impl OnIsland for FarmField {
    fn island_id(&self) -> IslandId {
        self.island_id
    }
}

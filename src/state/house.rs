use serde::Serialize;

use crate::codec::{BinaryReader, Point};
use crate::error::Result;
use super::island::IslandId;
use super::world::{OnIsland, RefTables};

/// A residential building
#[derive(Debug, Clone, Serialize)]
pub struct House {
    pub island_id: IslandId,
    pub position: Point,
    pub speed_count: u8,
    pub city_number: u8,
    pub inhabitant_level: u8,
    pub market_distance: u8,
    pub inhabitants: u16,
    pub flags: [u8; 2],
    #[serde(skip)]
    pub reserved: Vec<u8>,
}

impl House {
    pub const SIZE: usize = 16;

    pub fn read(reader: &mut BinaryReader, refs: &RefTables) -> Result<Self> {
        let mut reserved = Vec::new();

        let island_id = refs.island(reader.read_u8()? as u32)?.id;
        let position = reader.read_point_u8()?;
        let speed_count = reader.read_u8()?;
        let city_number = reader.read_u8()?;
        let inhabitant_level = reader.read_u8()?;
        let market_distance = reader.read_u8()?;
        reader.read_reserved(1, &mut reserved)?;
        let inhabitants = reader.read_u16_le()?;
        let flags = reader.read_array::<2>()?;
        reader.read_reserved(4, &mut reserved)?;

        Ok(Self {
            island_id,
            position,
            speed_count,
            city_number,
            inhabitant_level,
            market_distance,
            inhabitants,
            flags,
            reserved,
        })
    }
}

impl OnIsland for House {
    fn island_id(&self) -> IslandId {
        self.island_id
    }
}

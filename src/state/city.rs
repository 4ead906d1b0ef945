use serde::Serialize;

use crate::codec::BinaryReader;
use crate::error::Result;
use super::island::IslandId;
use super::player::PlayerId;
use super::world::{OnIsland, Owned, RefTables};

/// Population levels, lowest first
pub const INHABITANT_LEVELS: usize = 5;

/// A settlement on an island, owned by one player
#[derive(Debug, Clone, Serialize)]
pub struct City {
    pub island_id: IslandId,
    /// Index of this city among the cities of its island
    pub city_number: u8,
    pub player_id: PlayerId,
    pub progress_allowed: bool,
    /// Pioneers, settlers, citizens, merchants, aristocrats
    pub inhabitants: [u32; INHABITANT_LEVELS],
    pub tax_rates: [u8; INHABITANT_LEVELS],
    pub name: String,
    #[serde(skip)]
    pub reserved: Vec<u8>,
}

impl City {
    pub const SIZE: usize = 168;

    pub fn read(reader: &mut BinaryReader, refs: &RefTables) -> Result<Self> {
        let mut reserved = Vec::new();

        let island_id = refs.island(reader.read_u8()? as u32)?.id;
        let city_number = reader.read_u8()?;
        let player_id = refs.player(reader.read_u16_le()? as u32)?.id;
        let progress_allowed = !reader.read_bool()?;
        reader.read_reserved(87, &mut reserved)?;

        let mut inhabitants = [0u32; INHABITANT_LEVELS];
        for count in inhabitants.iter_mut() {
            *count = reader.read_u32_le()?;
        }
        reader.read_reserved(15, &mut reserved)?;
        let tax_rates = reader.read_array::<INHABITANT_LEVELS>()?;
        reader.read_reserved(3, &mut reserved)?;
        let name = reader.read_fixed_string(33)?;

        Ok(Self {
            island_id,
            city_number,
            player_id,
            progress_allowed,
            inhabitants,
            tax_rates,
            name,
            reserved,
        })
    }

    pub fn population(&self) -> u32 {
        self.inhabitants.iter().sum()
    }
}

impl Owned for City {
    fn player_id(&self) -> PlayerId {
        self.player_id
    }
}

impl OnIsland for City {
    fn island_id(&self) -> IslandId {
        self.island_id
    }
}

use serde::Serialize;

use crate::codec::{BinaryReader, Point};
use crate::error::Result;
use super::island::IslandId;
use super::player::PlayerId;
use super::soldier::SoldierKind;
use super::world::{OnIsland, Owned, RefTables};

/// A garrison slot inside a castle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct GarrisonUnit {
    pub kind: Option<SoldierKind>,
    pub kind_raw: u8,
    pub ready: bool,
    /// Raw flag byte; only the ready bit is decoded
    pub flags: u8,
    pub hit_points: u16,
    /// The words after the flags and after the hit points
    #[serde(skip)]
    pub reserved: [u8; 4],
}

impl GarrisonUnit {
    pub const SIZE: usize = 8;
    const READY: u8 = 0x10;

    fn read(reader: &mut BinaryReader) -> Result<Self> {
        let mut reserved = [0u8; 4];
        let kind_raw = reader.read_u8()?;
        let flags = reader.read_u8()?;
        reserved[..2].copy_from_slice(reader.read_bytes(2)?);
        let hit_points = reader.read_u16_le()?;
        reserved[2..].copy_from_slice(reader.read_bytes(2)?);
        Ok(Self {
            kind: SoldierKind::from_u16(kind_raw as u16),
            kind_raw,
            ready: flags & Self::READY != 0,
            flags,
            hit_points,
            reserved,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Castle {
    pub island_id: IslandId,
    pub position: Point,
    pub player_id: PlayerId,
    pub swords: u16,
    pub muskets: u16,
    pub cannons: u16,
    pub units: [GarrisonUnit; 8],
    #[serde(skip)]
    pub reserved: Vec<u8>,
}

impl Castle {
    pub const SIZE: usize = 112;

    pub fn read(reader: &mut BinaryReader, refs: &RefTables) -> Result<Self> {
        let island_id = refs.island(reader.read_u8()? as u32)?.id;
        let position = reader.read_point_u8()?;
        let player_id = refs.player(reader.read_u8()? as u32)?.id;
        let mut reserved = Vec::new();
        reader.read_reserved(4, &mut reserved)?;
        let swords = reader.read_u16_le()?;
        let muskets = reader.read_u16_le()?;
        let cannons = reader.read_u16_le()?;
        reader.read_reserved(2, &mut reserved)?;

        let mut units = [GarrisonUnit::default(); 8];
        for unit in units.iter_mut() {
            *unit = GarrisonUnit::read(reader)?;
        }
        reader.read_reserved(32, &mut reserved)?;

        Ok(Self { island_id, position, player_id, swords, muskets, cannons, units, reserved })
    }

    pub fn ready_units(&self) -> usize {
        self.units.iter().filter(|u| u.ready).count()
    }
}

impl Owned for Castle {
    fn player_id(&self) -> PlayerId {
        self.player_id
    }
}

impl OnIsland for Castle {
    fn island_id(&self) -> IslandId {
        self.island_id
    }
}

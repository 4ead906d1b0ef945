use bitflags::bitflags;
use serde::Serialize;

use crate::codec::BinaryReader;
use crate::error::{Error, Result};

/// Player identifier
pub type PlayerId = u8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[repr(u8)]
pub enum PlayerKind {
    Human = 0,
    Ai = 1,
    Trader = 2,
    Pirate = 3,
    Native = 4,
}

impl PlayerKind {
    pub fn from_u8(v: u8) -> Option<Self> {
        match v {
            0 => Some(Self::Human),
            1 => Some(Self::Ai),
            2 => Some(Self::Trader),
            3 => Some(Self::Pirate),
            4 => Some(Self::Native),
            _ => None,
        }
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
    pub struct PlayerFlags: u8 {
        const POSITIVE_WILL_INFLUENCE = 1 << 0;
        const NEGATIVE_WILL_INFLUENCE = 1 << 1;
        const PALACE_BUILT = 1 << 2;
        const CATHEDRAL_BUILT = 1 << 3;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[repr(u8)]
pub enum ContractState {
    Inactive = 0,
    OfferedByMe = 1,
    OfferedByOther = 2,
    Active = 3,
}

/// A trade or peace treaty slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Contract {
    pub state: ContractState,
    pub time: u32,
}

impl Contract {
    pub const SIZE: usize = 8;

    pub fn read(reader: &mut BinaryReader) -> Result<Self> {
        let raw = reader.read_u32_le()?;
        let state = match raw {
            0 => ContractState::Inactive,
            1 => ContractState::OfferedByMe,
            2 => ContractState::OfferedByOther,
            3 => ContractState::Active,
            v => return Err(Error::unexpected("contract state", v)),
        };
        Ok(Self { state, time: reader.read_u32_le()? })
    }
}

/// A diplomatic event involving another player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlayerEvent {
    /// Event kinds are not decoded further
    pub kind: u8,
    pub other_player_id: PlayerId,
    pub time: u32,
}

impl PlayerEvent {
    pub const SIZE: usize = 8;
    pub const SLOTS: usize = 64;

    pub fn read(reader: &mut BinaryReader) -> Result<Self> {
        let kind = reader.read_u8()?;
        let other_player_id = reader.read_u8()?;
        reader.expect_zero_u16("player event padding")?;
        let time = reader.read_u32_le()?;
        Ok(Self { kind, other_player_id, time })
    }

    fn is_empty(&self) -> bool {
        self.kind == 0 && self.other_player_id == 0 && self.time == 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct CombatStats {
    pub enemies_defeated: u16,
    pub triumph_arches_built: u16,
    pub soldiers_killed: u16,
    pub soldiers_fallen: u16,
    pub ships_sunk: u16,
    pub ships_destroyed: u16,
}

#[derive(Debug, Clone, Serialize)]
pub struct Player {
    pub id: PlayerId,
    pub kind: PlayerKind,
    pub money: i32,
    pub color: u8,
    /// 0xFF when no task is assigned
    pub assigned_task_id: u8,
    pub flags: PlayerFlags,
    pub stats: CombatStats,
    /// Between 1.0 and 5.0
    pub positive_will_influence: f32,
    pub negative_will_influence: f32,
    pub accessible_buildings: u32,
    pub statues: u16,
    pub statues_built: u16,
    pub trade_contracts: [Contract; 3],
    pub peace_contracts: [Contract; 3],
    /// Occupied event slots only
    pub events: Vec<PlayerEvent>,
    pub name: String,
    pub second_name: String,
    #[serde(skip)]
    pub reserved: Vec<u8>,
}

impl Player {
    pub const SIZE: usize = 1072;
    pub const NO_TASK: u8 = 0xFF;

    pub fn read(reader: &mut BinaryReader) -> Result<Self> {
        let mut reserved = Vec::new();

        let money = reader.read_i32_le()?;
        let kind_raw = reader.read_u8()?;
        let kind = PlayerKind::from_u8(kind_raw)
            .ok_or_else(|| Error::unexpected("player kind", kind_raw))?;
        let id = reader.read_u8()?;
        reader.read_reserved(1, &mut reserved)?;
        let color = reader.read_u8()?;
        reader.read_reserved(4, &mut reserved)?;
        let assigned_task_id = reader.read_u8()?;
        reader.read_reserved(3, &mut reserved)?;

        let stats = CombatStats {
            enemies_defeated: reader.read_u16_le()?,
            triumph_arches_built: reader.read_u16_le()?,
            soldiers_killed: reader.read_u16_le()?,
            soldiers_fallen: reader.read_u16_le()?,
            ships_sunk: reader.read_u16_le()?,
            ships_destroyed: reader.read_u16_le()?,
        };

        reader.read_reserved(1, &mut reserved)?;
        let flags = PlayerFlags::from_bits_retain(reader.read_u8()?);
        reader.read_reserved(6, &mut reserved)?;
        let positive_will_influence = reader.read_u8()? as f32 / 32.0 + 1.0;
        let negative_will_influence = reader.read_u8()? as f32 / 32.0 + 1.0;
        reader.read_reserved(14, &mut reserved)?;
        let accessible_buildings = reader.read_u32_le()?;
        let statues = reader.read_u16_le()?;
        let statues_built = reader.read_u16_le()?;
        reader.read_reserved(4 + 264, &mut reserved)?;

        let trade_contracts = [
            Contract::read(reader)?,
            Contract::read(reader)?,
            Contract::read(reader)?,
        ];
        let peace_contracts = [
            Contract::read(reader)?,
            Contract::read(reader)?,
            Contract::read(reader)?,
        ];

        let mut events = Vec::new();
        for _ in 0..PlayerEvent::SLOTS {
            let event = PlayerEvent::read(reader)?;
            if !event.is_empty() {
                events.push(event);
            }
        }
        reader.read_reserved(72, &mut reserved)?;

        let name = reader.read_fixed_string(56)?;
        let second_name = reader.read_fixed_string(56)?;

        Ok(Self {
            id,
            kind,
            money,
            color,
            assigned_task_id,
            flags,
            stats,
            positive_will_influence,
            negative_will_influence,
            accessible_buildings,
            statues,
            statues_built,
            trade_contracts,
            peace_contracts,
            events,
            name,
            second_name,
            reserved,
        })
    }

    pub fn palace_built(&self) -> bool {
        self.flags.contains(PlayerFlags::PALACE_BUILT)
    }

    pub fn cathedral_built(&self) -> bool {
        self.flags.contains(PlayerFlags::CATHEDRAL_BUILT)
    }

    pub fn has_task(&self) -> bool {
        self.assigned_task_id != Self::NO_TASK
    }
}

use serde::Serialize;

use crate::codec::{BinaryReader, Point, Rotation8};
use crate::error::{Error, Result};
use super::player::PlayerId;
use super::world::{Owned, RefTables};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ShipType {
    SmallTrader,
    LargeTrader,
    SmallWarship,
    LargeWarship,
    FreeTrader,
    Pirate,
}

impl ShipType {
    pub fn from_u16(v: u16) -> Option<Self> {
        match v {
            0x15 => Some(Self::SmallTrader),
            0x17 => Some(Self::LargeTrader),
            0x19 => Some(Self::SmallWarship),
            0x1B => Some(Self::LargeWarship),
            0x1D | 0x25 => Some(Self::FreeTrader),
            0x1F => Some(Self::Pirate),
            _ => None,
        }
    }
}

/// Navigation state of one course slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CourseState {
    Stopped,
    Sailing,
    /// 52, 53 or 54; seen on disk but not told apart
    Other(u8),
}

impl CourseState {
    pub fn from_u8(v: u8) -> Result<Self> {
        match v {
            0 => Ok(Self::Stopped),
            55 => Ok(Self::Sailing),
            52..=54 => Ok(Self::Other(v)),
            v => Err(Error::unexpected("ship course state", v)),
        }
    }
}

/// A waypoint packed in one word.
///
/// Byte 0 is the state, byte 1 holds the high nibbles of x (low) and y (high),
/// byte 2 the low byte of y and byte 3 the low byte of x.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ShipCourse {
    pub state: CourseState,
    pub position: Point,
}

impl ShipCourse {
    pub fn read(reader: &mut BinaryReader) -> Result<Self> {
        let [state, high, y_low, x_low] = reader.read_array::<4>()?;
        Ok(Self {
            state: CourseState::from_u8(state)?,
            position: Point::new(
                x_low as u32 + ((high as u32 & 0x0F) << 8),
                y_low as u32 + ((high as u32 & 0xF0) << 4),
            ),
        })
    }
}

/// A scheduled trade route stop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TradeStop {
    pub stop_id: u8,
    pub kontor_id: u8,
    pub goods: [TradeStopGood; 2],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct TradeStopGood {
    pub good_id: u16,
    pub amount: u16,
    pub action: u32,
}

impl TradeStopGood {
    fn read(reader: &mut BinaryReader) -> Result<Self> {
        Ok(Self {
            good_id: reader.read_u16_le()?,
            amount: reader.read_u16_le()?,
            action: reader.read_u32_le()?,
        })
    }
}

impl TradeStop {
    pub const SIZE: usize = 36;
    pub const SLOTS: usize = 8;

    /// Unknown bytes of the stop go to the ship's `reserved`, including those of empty stops
    fn read(reader: &mut BinaryReader, reserved: &mut Vec<u8>) -> Result<Self> {
        let stop_id = reader.read_u8()?;
        let kontor_id = reader.read_u8()?;
        reader.read_reserved(2, reserved)?;
        let goods = [TradeStopGood::read(reader)?, TradeStopGood::read(reader)?];
        reader.read_reserved(16, reserved)?;
        Ok(Self { stop_id, kontor_id, goods })
    }

    fn is_empty(&self) -> bool {
        self.stop_id == 0 && self.kontor_id == 0 && self.goods.iter().all(|g| g.good_id == 0)
    }
}

/// One cargo hold slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Cargo {
    pub good_id: u16,
    pub amount: u16,
    /// 0 load, 1 unload
    pub action: u32,
}

impl Cargo {
    pub const SIZE: usize = 8;
    pub const SLOTS: usize = 8;
}

#[derive(Debug, Clone, Serialize)]
pub struct Ship {
    pub id: u16,
    pub name: String,
    pub position: Point,
    pub courses: [ShipCourse; 3],
    pub hit_points: u16,
    pub cannons: u8,
    pub flags: u8,
    pub selling_price: u16,
    pub ship_type: Option<ShipType>,
    pub type_raw: u16,
    pub kind: u8,
    pub player_id: PlayerId,
    pub rotation: Rotation8,
    /// Occupied route stops only
    pub trade_route: Vec<TradeStop>,
    /// Non-empty cargo slots only
    pub cargo: Vec<Cargo>,
    /// Unknown bytes in record order
    #[serde(skip)]
    pub reserved: Vec<u8>,
}

impl Ship {
    pub const SIZE: usize = 436;

    pub fn read(reader: &mut BinaryReader, refs: &RefTables) -> Result<Self> {
        let mut reserved = Vec::new();

        let name = reader.read_fixed_string(28)?;
        let position = reader.read_point_u16()?;
        reader.read_reserved(12, &mut reserved)?;
        let courses = [
            ShipCourse::read(reader)?,
            ShipCourse::read(reader)?,
            ShipCourse::read(reader)?,
        ];
        reader.read_reserved(4, &mut reserved)?;
        let hit_points = reader.read_u16_le()?;
        reader.read_reserved(4, &mut reserved)?;
        let cannons = reader.read_u8()?;
        let flags = reader.read_u8()?;
        let selling_price = reader.read_u16_le()?;
        let id = reader.read_u16_le()?;
        let type_raw = reader.read_u16_le()?;
        let kind = reader.read_u8()?;
        let player_id = refs.player(reader.read_u8()? as u32)?.id;
        reader.read_reserved(4, &mut reserved)?;
        let rotation = Rotation8::decode("ship rotation", reader.read_u16_le()?)?;

        let mut trade_route = Vec::new();
        for _ in 0..TradeStop::SLOTS {
            let stop = TradeStop::read(reader, &mut reserved)?;
            if !stop.is_empty() {
                trade_route.push(stop);
            }
        }
        reader.read_reserved(2, &mut reserved)?;

        let mut cargo = Vec::new();
        for _ in 0..Cargo::SLOTS {
            let slot = Cargo {
                good_id: reader.read_u16_le()?,
                amount: reader.read_u16_le()?,
                action: reader.read_u32_le()?,
            };
            if slot.amount != 0 {
                cargo.push(slot);
            }
        }

        Ok(Self {
            id,
            name,
            position,
            courses,
            hit_points,
            cannons,
            flags,
            selling_price,
            ship_type: ShipType::from_u16(type_raw),
            type_raw,
            kind,
            player_id,
            rotation,
            trade_route,
            cargo,
            reserved,
        })
    }
}

impl Owned for Ship {
    fn player_id(&self) -> PlayerId {
        self.player_id
    }
}

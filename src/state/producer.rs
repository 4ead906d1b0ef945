use serde::Serialize;

use crate::codec::{BinaryReader, BinaryWriter, GoodAmount, Point};
use crate::error::Result;
use super::island::IslandId;
use super::world::{OnIsland, RefTables};

/// First status byte of a producer.
///
/// bit 0 active, bit 1 connected to market, bits 2-5 animation counter,
/// bit 6 set while good pickup is blocked, bit 7 unknown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ProducerFlags(u8);

impl ProducerFlags {
    const ACTIVE: u8 = 1 << 0;
    const CONNECTED_TO_MARKET: u8 = 1 << 1;
    const ANIM_SHIFT: u8 = 2;
    const ANIM_MASK: u8 = 0b1111 << Self::ANIM_SHIFT;
    const PICKUP_BLOCKED: u8 = 1 << 6;

    pub fn from_raw(raw: u8) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> u8 {
        self.0
    }

    fn set_bit(&mut self, bit: u8, on: bool) {
        if on {
            self.0 |= bit;
        } else {
            self.0 &= !bit;
        }
    }

    pub fn active(self) -> bool {
        self.0 & Self::ACTIVE != 0
    }

    pub fn set_active(&mut self, on: bool) {
        self.set_bit(Self::ACTIVE, on);
    }

    pub fn connected_to_market(self) -> bool {
        self.0 & Self::CONNECTED_TO_MARKET != 0
    }

    pub fn set_connected_to_market(&mut self, on: bool) {
        self.set_bit(Self::CONNECTED_TO_MARKET, on);
    }

    pub fn anim_count(self) -> u8 {
        (self.0 & Self::ANIM_MASK) >> Self::ANIM_SHIFT
    }

    /// Values above 15 are truncated to four bits
    pub fn set_anim_count(&mut self, count: u8) {
        self.0 = (self.0 & !Self::ANIM_MASK) | ((count << Self::ANIM_SHIFT) & Self::ANIM_MASK);
    }

    pub fn allow_good_pickup(self) -> bool {
        self.0 & Self::PICKUP_BLOCKED == 0
    }

    pub fn set_allow_good_pickup(&mut self, allow: bool) {
        self.set_bit(Self::PICKUP_BLOCKED, !allow);
    }
}

/// Second status byte of a producer.
///
/// bits 0-3 count failed production attempts (saturating at 15),
/// bit 6 marks a just-completed cycle. Other bits are kept as read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ProducerStatus(u8);

impl ProducerStatus {
    const NO_GOOD_MASK: u8 = 0b1111;
    const PRODUCED: u8 = 1 << 6;
    pub const MAX_NO_GOOD_COUNT: u8 = 15;

    pub fn from_raw(raw: u8) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> u8 {
        self.0
    }

    pub fn no_good_count(self) -> u8 {
        self.0 & Self::NO_GOOD_MASK
    }

    pub fn set_no_good_count(&mut self, count: u8) {
        let count = count.min(Self::MAX_NO_GOOD_COUNT);
        self.0 = (self.0 & !Self::NO_GOOD_MASK) | count;
    }

    pub fn produced(self) -> bool {
        self.0 & Self::PRODUCED != 0
    }

    pub fn set_produced(&mut self, on: bool) {
        if on {
            self.0 |= Self::PRODUCED;
        } else {
            self.0 &= !Self::PRODUCED;
        }
    }
}

/// A production building's runtime state (24 bytes on disk)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Producer {
    pub island_id: IslandId,
    pub position: Point,
    pub speed: u8,
    /// Mirrors the global production counter
    pub speed_count: u8,
    /// Output waiting for pickup
    pub stock: GoodAmount,
    /// Counts down once per production tick and wraps to 11 instead of reaching 0
    pub timer: u16,
    pub first_good_stock: GoodAmount,
    /// Zero for buildings without a secondary input
    pub second_good_stock: GoodAmount,
    /// 0x80 while a cycle is running
    pub produced_good: u8,
    /// Grows by one ton per completed cycle; with `time_count` it gives utilisation
    pub prod_count: GoodAmount,
    pub time_count: u16,
    pub flags: ProducerFlags,
    pub status: ProducerStatus,
    /// Bytes 7 and 14, unknown
    pub reserved: [u8; 2],
}

impl Producer {
    pub const SIZE: usize = 24;
    pub const PRODUCING: u8 = 0x80;

    /// Decode without resolving the island
    pub fn decode(reader: &mut BinaryReader) -> Result<Self> {
        let island_id = reader.read_u8()?;
        let position = reader.read_point_u8()?;
        let speed = reader.read_u8()?;
        let speed_count = reader.read_u8()?;
        let stock = reader.read_amount()?;
        let reserved_a = reader.read_u8()?;
        let timer = reader.read_u16_le()?;
        let second_good_stock = reader.read_amount()?;
        let first_good_stock = reader.read_amount()?;
        let reserved_b = reader.read_u8()?;
        let produced_good = reader.read_u8()?;
        let prod_count = reader.read_amount()?;
        let time_count = reader.read_u16_le()?;
        let flags = ProducerFlags::from_raw(reader.read_u8()?);
        let status = ProducerStatus::from_raw(reader.read_u8()?);
        reader.expect_zero_u16("producer padding")?;

        Ok(Self {
            island_id,
            position,
            speed,
            speed_count,
            stock,
            timer,
            first_good_stock,
            second_good_stock,
            produced_good,
            prod_count,
            time_count,
            flags,
            status,
            reserved: [reserved_a, reserved_b],
        })
    }

    pub fn read(reader: &mut BinaryReader, refs: &RefTables) -> Result<Self> {
        let producer = Self::decode(reader)?;
        refs.island(producer.island_id as u32)?;
        Ok(producer)
    }

    /// Exact inverse of [`Producer::decode`]
    pub fn encode(&self, writer: &mut BinaryWriter) {
        writer.write_u8(self.island_id);
        writer.write_point_u8(self.position);
        writer.write_u8(self.speed);
        writer.write_u8(self.speed_count);
        writer.write_amount(self.stock);
        writer.write_u8(self.reserved[0]);
        writer.write_u16_le(self.timer);
        writer.write_amount(self.second_good_stock);
        writer.write_amount(self.first_good_stock);
        writer.write_u8(self.reserved[1]);
        writer.write_u8(self.produced_good);
        writer.write_amount(self.prod_count);
        writer.write_u16_le(self.time_count);
        writer.write_u8(self.flags.raw());
        writer.write_u8(self.status.raw());
        writer.write_u16_le(0);
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut writer = BinaryWriter::with_capacity(Self::SIZE);
        self.encode(&mut writer);
        writer.into_vec()
    }

    pub fn active(&self) -> bool {
        self.flags.active()
    }

    pub fn is_producing(&self) -> bool {
        self.produced_good & Self::PRODUCING != 0
    }

    pub fn set_producing(&mut self, on: bool) {
        if on {
            self.produced_good |= Self::PRODUCING;
        } else {
            self.produced_good &= !Self::PRODUCING;
        }
    }
}

impl OnIsland for Producer {
    fn island_id(&self) -> IslandId {
        self.island_id
    }
}

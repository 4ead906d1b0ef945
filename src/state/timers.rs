use bitflags::bitflags;
use serde::Serialize;

use crate::codec::BinaryReader;
use crate::error::Result;

bitflags! {
    /// Global event switches. A set bit disables the event.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
    pub struct TimerFlags: u32 {
        const NO_PIRATE = 1 << 0;
        const NO_DROUGHT = 1 << 2;
        const NO_IRON_DEPLETION = 1 << 3;
        const NO_TRADER = 1 << 6;
        const NO_VOLCANO = 1 << 8;
    }
}

/// Global simulation counters and switches
#[derive(Debug, Clone, Serialize)]
pub struct Timers {
    pub cnt_city: u8,
    pub cnt_island: u8,
    pub cnt_shipyard: u8,
    pub cnt_military: u8,
    /// Wraps 0..8; producers re-check their inputs when it is 0
    pub cnt_production: u8,
    pub cnt_settlers: [u8; 32],
    pub cnt_growth: [u8; 32],

    pub time_city: u32,
    pub time_island: u32,
    pub time_shipyard: u32,
    pub time_military: u32,
    pub time_production: u32,
    pub time_good_tools_count: u32,
    pub time_good_tools_max: u32,
    pub time_game: u32,

    pub no_ore_out: u8,
    pub tutorial: u8,
    pub ai_level: u8,
    pub mission_number: u8,
    pub flags: TimerFlags,

    pub game_id: u32,
    pub city_name_number: u32,
    pub time_next_drought: u32,
    pub time_pirate_sec: u32,
    pub mission_sub_number: u32,
    pub ship_max: u32,
    pub time_next_volcano: u32,
    pub cnt_volcano: u32,

    pub time_settlers: Vec<u32>,
    pub time_growth: Vec<u32>,
    #[serde(skip)]
    pub reserved: Vec<u8>,
}

impl Timers {
    pub const SIZE: usize = 664;

    pub fn read(reader: &mut BinaryReader) -> Result<Self> {
        let mut reserved = Vec::new();

        let [cnt_city, cnt_island, cnt_shipyard, cnt_military, cnt_production] =
            reader.read_array::<5>()?;
        reader.expect_zeroes(31 + 32, "timer counter padding")?;
        let cnt_settlers = reader.read_array::<32>()?;
        let cnt_growth = reader.read_array::<32>()?;

        let time_city = reader.read_u32_le()?;
        let time_island = reader.read_u32_le()?;
        let time_shipyard = reader.read_u32_le()?;
        let time_military = reader.read_u32_le()?;
        let time_production = reader.read_u32_le()?;
        let time_good_tools_count = reader.read_u32_le()?;
        let time_good_tools_max = reader.read_u32_le()?;
        let time_game = reader.read_u32_le()?;

        let [no_ore_out, tutorial, ai_level, mission_number] = reader.read_array::<4>()?;
        let flags = TimerFlags::from_bits_retain(reader.read_u32_le()?);

        let game_id = reader.read_u32_le()?;
        let city_name_number = reader.read_u32_le()?;
        let time_next_drought = reader.read_u32_le()?;
        let time_pirate_sec = reader.read_u32_le()?;
        let mission_sub_number = reader.read_u32_le()?;
        let ship_max = reader.read_u32_le()?;
        // two volcano words of unknown meaning
        reader.read_reserved(8, &mut reserved)?;
        let time_next_volcano = reader.read_u32_le()?;
        let cnt_volcano = reader.read_u32_le()?;
        reader.expect_zeroes((17 + 32) * 4, "timer padding")?;

        let mut time_settlers = Vec::with_capacity(32);
        for _ in 0..32 {
            time_settlers.push(reader.read_u32_le()?);
        }
        let mut time_growth = Vec::with_capacity(32);
        for _ in 0..32 {
            time_growth.push(reader.read_u32_le()?);
        }

        Ok(Self {
            cnt_city,
            cnt_island,
            cnt_shipyard,
            cnt_military,
            cnt_production,
            cnt_settlers,
            cnt_growth,
            time_city,
            time_island,
            time_shipyard,
            time_military,
            time_production,
            time_good_tools_count,
            time_good_tools_max,
            time_game,
            no_ore_out,
            tutorial,
            ai_level,
            mission_number,
            flags,
            game_id,
            city_name_number,
            time_next_drought,
            time_pirate_sec,
            mission_sub_number,
            ship_max,
            time_next_volcano,
            cnt_volcano,
            time_settlers,
            time_growth,
            reserved,
        })
    }

    pub fn trader_enabled(&self) -> bool {
        !self.flags.contains(TimerFlags::NO_TRADER)
    }

    pub fn pirate_enabled(&self) -> bool {
        !self.flags.contains(TimerFlags::NO_PIRATE)
    }

    pub fn droughts_enabled(&self) -> bool {
        !self.flags.contains(TimerFlags::NO_DROUGHT)
    }

    pub fn volcano_enabled(&self) -> bool {
        !self.flags.contains(TimerFlags::NO_VOLCANO)
    }

    /// Whether big iron deposits can be mined out
    pub fn iron_runs_out(&self) -> bool {
        !self.flags.contains(TimerFlags::NO_IRON_DEPLETION)
    }
}

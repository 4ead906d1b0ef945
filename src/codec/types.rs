use serde::Serialize;

use crate::error::{Error, Result};

/// Stock amount in fixed point (32 units per ton)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
pub struct GoodAmount(pub u16);

impl GoodAmount {
    pub const UNITS_PER_TON: u16 = 32;
    pub const ZERO: Self = Self(0);

    pub fn from_tons(tons: u16) -> Self {
        Self(tons.saturating_mul(Self::UNITS_PER_TON))
    }

    /// Whole tons, rounding down
    pub fn tons(self) -> u16 {
        self.0 / Self::UNITS_PER_TON
    }

    pub fn to_tons_f64(self) -> f64 {
        self.0 as f64 / Self::UNITS_PER_TON as f64
    }

    pub fn raw(self) -> u16 {
        self.0
    }

    pub fn saturating_add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }

    pub fn saturating_sub(self, other: Self) -> Self {
        Self(self.0.saturating_sub(other.0))
    }
}

impl From<u16> for GoodAmount {
    fn from(v: u16) -> Self {
        Self(v)
    }
}

/// Integer grid position, either island-relative or in world coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct Point {
    pub x: u32,
    pub y: u32,
}

impl Point {
    pub fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

/// Four-way building rotation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[repr(u8)]
pub enum Rotation4 {
    #[default]
    North = 0,
    East = 1,
    South = 2,
    West = 3,
}

impl Rotation4 {
    /// Takes the low two bits; every value is valid.
    pub fn from_bits(v: u32) -> Self {
        match v & 0b11 {
            0 => Self::North,
            1 => Self::East,
            2 => Self::South,
            _ => Self::West,
        }
    }
}

/// Eight-way unit heading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[repr(u8)]
pub enum Rotation8 {
    #[default]
    North = 0,
    NorthEast = 1,
    East = 2,
    SouthEast = 3,
    South = 4,
    SouthWest = 5,
    West = 6,
    NorthWest = 7,
}

impl Rotation8 {
    pub fn from_u8(v: u8) -> Option<Self> {
        match v {
            0 => Some(Self::North),
            1 => Some(Self::NorthEast),
            2 => Some(Self::East),
            3 => Some(Self::SouthEast),
            4 => Some(Self::South),
            5 => Some(Self::SouthWest),
            6 => Some(Self::West),
            7 => Some(Self::NorthWest),
            _ => None,
        }
    }

    pub fn decode(field: &'static str, v: u16) -> Result<Self> {
        u8::try_from(v)
            .ok()
            .and_then(Self::from_u8)
            .ok_or_else(|| Error::unexpected(field, v))
    }
}

/// Extract `width` bits of `word` starting at `shift` (bit 0 = LSB)
pub(crate) fn bits(word: u32, shift: u32, width: u32) -> u32 {
    (word >> shift) & ((1u32 << width) - 1)
}

use bitflags::bitflags;
use serde::Serialize;

use crate::codec::{BinaryReader, Point};
use crate::error::{Error, Result};
use super::field::{Field, FieldGrid};

/// Island identifier
pub type IslandId = u8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Climate {
    North,
    South,
}

impl Climate {
    pub fn from_south_flag(south: bool) -> Self {
        if south { Self::South } else { Self::North }
    }

    /// Directory name in the terrain library
    pub fn dir_name(self) -> &'static str {
        match self {
            Self::North => "north",
            Self::South => "south",
        }
    }
}

/// Island size categories of the terrain library, smallest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum IslandSize {
    Little,
    Middle,
    Medium,
    Big,
    Large,
}

impl IslandSize {
    pub const ALL: [Self; 5] = [Self::Little, Self::Middle, Self::Medium, Self::Big, Self::Large];

    /// Category index as stored in island templates (0..=4)
    pub fn from_id(id: u8) -> Option<Self> {
        Self::ALL.get(id as usize).copied()
    }

    pub fn id(self) -> u8 {
        self as u8
    }

    /// File name prefix in the terrain library
    pub fn code(self) -> &'static str {
        match self {
            Self::Little => "lit",
            Self::Middle => "mit",
            Self::Medium => "med",
            Self::Big => "big",
            Self::Large => "lar",
        }
    }

    pub fn max_width(self) -> u32 {
        match self {
            Self::Little => 35,
            Self::Middle => 45,
            Self::Medium => 55,
            Self::Big => 85,
            Self::Large => 100,
        }
    }

    /// Smallest category that holds an island of `width`
    pub fn for_width(width: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|size| width <= size.max_width())
    }
}

bitflags! {
    /// Cash crops an island can grow. Only the low six bits are tracked.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
    pub struct FertilityFlags: u32 {
        const TOBACCO = 1 << 0;
        const SPICE = 1 << 1;
        const SUGAR_CANE = 1 << 2;
        const COTTON = 1 << 3;
        const WINE = 1 << 4;
        const CACAO = 1 << 5;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct IslandFertility {
    pub tobacco: bool,
    pub spice: bool,
    pub sugar_cane: bool,
    pub cotton: bool,
    pub wine: bool,
    pub cacao: bool,
}

impl IslandFertility {
    pub fn from_raw(raw: u32) -> Self {
        let flags = FertilityFlags::from_bits_truncate(raw);
        Self {
            tobacco: flags.contains(FertilityFlags::TOBACCO),
            spice: flags.contains(FertilityFlags::SPICE),
            sugar_cane: flags.contains(FertilityFlags::SUGAR_CANE),
            cotton: flags.contains(FertilityFlags::COTTON),
            wine: flags.contains(FertilityFlags::WINE),
            cacao: flags.contains(FertilityFlags::CACAO),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum OreKind {
    Iron,
    Gold,
}

impl OreKind {
    pub fn from_u8(v: u8) -> Option<Self> {
        match v {
            2 => Some(Self::Iron),
            3 => Some(Self::Gold),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DepositSize {
    Small,
    Big,
}

/// An ore deposit on an island
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OreLocation {
    pub kind: OreKind,
    pub position: Point,
    pub discovered: bool,
    pub size: DepositSize,
    pub amount: u16,
    /// The packed deposit word as stored, including bits with no known meaning
    pub deposit_raw: u32,
}

impl OreLocation {
    pub const SIZE: usize = 8;

    /// Reads one slot. `used` slots must name a known ore kind; unused slots decode to `None`.
    fn read(reader: &mut BinaryReader, used: bool) -> Result<Option<Self>> {
        let kind = reader.read_u8()?;
        let position = reader.read_point_u8()?;
        let discovered = reader.read_bool()?;
        // Observed words: small iron 0x0A000001, big iron 0x1E000000, gold 0x06400001.
        let deposit_raw = reader.read_u32_le()?;

        if !used {
            return Ok(None);
        }
        let kind = OreKind::from_u8(kind).ok_or_else(|| Error::unexpected("ore kind", kind))?;
        Ok(Some(Self {
            kind,
            position,
            discovered,
            size: if deposit_raw & 1 != 0 { DepositSize::Small } else { DepositSize::Big },
            amount: (deposit_raw >> 16) as u16,
            deposit_raw,
        }))
    }
}

/// An island with its terrain and building grids
#[derive(Debug, Clone, Serialize)]
pub struct Island {
    pub id: IslandId,
    /// Top-left corner in world coordinates
    pub position: Point,
    pub width: u32,
    pub height: u32,
    /// Selects the terrain file in the library
    pub base_island_number: u16,
    pub climate: Climate,
    /// Set when the save carries its own terrain overlay (e.g. a rotated island)
    pub differs_from_base: bool,
    pub fertility_discovered: bool,
    pub fertility: IslandFertility,
    pub fertility_raw: u32,
    pub ore_locations: Vec<OreLocation>,
    pub base_fields: FieldGrid,
    pub current_fields: FieldGrid,
    #[serde(skip)]
    pub reserved: Vec<u8>,
}

impl Island {
    pub const SIZE: usize = 116;

    pub fn read(reader: &mut BinaryReader) -> Result<Self> {
        let mut reserved = Vec::new();

        let id = reader.read_u8()?;
        let width = reader.read_u8()? as u32;
        let height = reader.read_u8()? as u32;
        reader.read_reserved(1, &mut reserved)?;
        let position = reader.read_point_u16()?;
        reader.read_reserved(2 + 2 + 14, &mut reserved)?;

        let num_ore_locations = reader.read_u8()?;
        if num_ore_locations > 2 {
            return Err(Error::unexpected("ore location count", num_ore_locations));
        }
        let fertility_discovered = reader.read_bool()?;
        let mut ore_locations = Vec::with_capacity(2);
        for slot in 0..2u8 {
            if let Some(ore) = OreLocation::read(reader, slot < num_ore_locations)? {
                ore_locations.push(ore);
            }
        }
        reader.read_reserved(48, &mut reserved)?;

        let fertility_raw = reader.read_u32_le()?;
        let base_island_number = reader.read_u16_le()?;
        reader.read_reserved(2, &mut reserved)?;
        let south = reader.read_bool()?;
        let differs_from_base = reader.read_u8()? != 0;
        reader.read_reserved(14, &mut reserved)?;

        Ok(Self {
            id,
            position,
            width,
            height,
            base_island_number,
            climate: Climate::from_south_flag(south),
            differs_from_base,
            fertility_discovered,
            fertility: IslandFertility::from_raw(fertility_raw),
            fertility_raw,
            ore_locations,
            base_fields: FieldGrid::new(width, height),
            current_fields: FieldGrid::new(width, height),
            reserved,
        })
    }

    pub fn is_south(&self) -> bool {
        self.climate == Climate::South
    }

    /// Whether a world coordinate lies inside this island's rectangle
    pub fn contains(&self, world: Point) -> bool {
        world.x >= self.position.x
            && world.y >= self.position.y
            && world.x < self.position.x + self.width
            && world.y < self.position.y + self.height
    }

    /// Convert a world coordinate to island-relative, if it lies on the island
    pub fn to_local(&self, world: Point) -> Option<Point> {
        self.contains(world)
            .then(|| Point::new(world.x - self.position.x, world.y - self.position.y))
    }

    /// Player-placed building at an island-relative position
    pub fn building_at(&self, local: Point) -> Option<&Field> {
        self.current_fields.get(local.x, local.y)
    }

    /// Terrain at an island-relative position
    pub fn terrain_at(&self, local: Point) -> Option<&Field> {
        self.base_fields.get(local.x, local.y)
    }
}

use serde::Serialize;
use tracing::warn;

use crate::codec::{bits, BinaryReader, Block, Rotation4};
use crate::error::{Error, Result};

/// Raw building ids are stored relative to this base.
pub const BUILDING_ID_OFFSET: u32 = 20000;

/// One building or terrain tile placed on an island.
///
/// Packed word layout, bit 0 = LSB:
/// rotation(2) | animation(4) | unknown(8) | status(3) | random(5) | player(3) | reserved(7)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Field {
    /// Building id in the field-definition id space (raw + 20000)
    pub building_id: u32,
    pub x: u8,
    pub y: u8,
    pub rotation: Rotation4,
    pub animation: u8,
    pub unknown: u8,
    pub status: u8,
    pub random: u8,
    pub player_id: u8,
    pub reserved: u8,
}

impl Field {
    pub const SIZE: usize = 8;

    pub fn read(reader: &mut BinaryReader) -> Result<Self> {
        let building_id = reader.read_u16_le()? as u32 + BUILDING_ID_OFFSET;
        let x = reader.read_u8()?;
        let y = reader.read_u8()?;
        let packed = reader.read_u32_le()?;

        Ok(Self {
            building_id,
            x,
            y,
            rotation: Rotation4::from_bits(packed),
            animation: bits(packed, 2, 4) as u8,
            unknown: bits(packed, 6, 8) as u8,
            status: bits(packed, 14, 3) as u8,
            random: bits(packed, 17, 5) as u8,
            player_id: bits(packed, 22, 3) as u8,
            reserved: bits(packed, 25, 7) as u8,
        })
    }
}

/// Column-major grid of optional fields covering one island
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldGrid {
    width: u32,
    height: u32,
    cells: Vec<Option<Field>>,
}

impl FieldGrid {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            cells: vec![None; (width * height) as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    fn index(&self, x: u32, y: u32) -> Option<usize> {
        (x < self.width && y < self.height).then(|| (x * self.height + y) as usize)
    }

    pub fn get(&self, x: u32, y: u32) -> Option<&Field> {
        self.index(x, y).and_then(|i| self.cells[i].as_ref())
    }

    /// Place a field at its own coordinates, replacing any previous occupant
    pub fn insert(&mut self, field: Field) -> Result<()> {
        let i = self.index(field.x as u32, field.y as u32).ok_or_else(|| {
            Error::unexpected("field position", (field.x as u64) << 8 | field.y as u64)
        })?;
        self.cells[i] = Some(field);
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Field> {
        self.cells.iter().flatten()
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(Option::is_none)
    }

    /// Decode every field record of an overlay block onto a new grid
    pub fn from_overlay(width: u32, height: u32, block: &Block) -> Result<Self> {
        let mut grid = Self::new(width, height);
        for field in read_overlay(block)? {
            grid.insert(field)?;
        }
        Ok(grid)
    }
}

/// Decode all field records of an overlay block
pub fn read_overlay(block: &Block) -> Result<Vec<Field>> {
    let count = block.record_count(Field::SIZE)?;
    let mut reader = block.reader();
    let mut fields = Vec::with_capacity(count);
    let mut odd_reserved = 0usize;
    for _ in 0..count {
        let field = Field::read(&mut reader)?;
        if field.reserved != 0 {
            odd_reserved += 1;
        }
        fields.push(field);
    }
    // Shipped saves carry nonzero reserved bits here, so they are kept rather than rejected.
    if odd_reserved > 0 {
        warn!(tag = %block.tag, count = odd_reserved, "fields with nonzero reserved bits");
    }
    Ok(fields)
}

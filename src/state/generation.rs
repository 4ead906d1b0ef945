use serde::Serialize;

use crate::codec::{BinaryReader, Point};
use crate::error::{Error, Result};
use super::island::{Climate, IslandSize};

/// Climate constraint of an island template
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ClimateFilter {
    North,
    South,
    Any,
}

impl ClimateFilter {
    pub fn from_u8(v: u8) -> Self {
        match v {
            0 => Self::North,
            1 => Self::South,
            _ => Self::Any,
        }
    }

    /// Climates whose terrain files may be sampled
    pub fn climates(self) -> &'static [Climate] {
        match self {
            Self::North => &[Climate::North],
            Self::South => &[Climate::South],
            Self::Any => &[Climate::North, Climate::South],
        }
    }
}

/// Placement request for one procedurally chosen island
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IslandTemplate {
    /// Slot number; skipped when an island with this id already exists
    pub num: u8,
    pub size: IslandSize,
    pub climate: ClimateFilter,
    pub position: Point,
    /// Mostly 0x0000FFFF, otherwise 0
    pub file_number: u32,
}

impl IslandTemplate {
    pub const SIZE: usize = 16;

    fn read(reader: &mut BinaryReader) -> Result<Self> {
        let climate = ClimateFilter::from_u8(reader.read_u8()?);
        let size_id = reader.read_u8()?;
        let size = IslandSize::from_id(size_id)
            .ok_or_else(|| Error::unexpected("island size category", size_id))?;
        reader.expect_zero_u8("island template padding")?;
        let num = reader.read_u8()?;
        let file_number = reader.read_u32_le()?;
        let x = reader.read_u32_le()?;
        let y = reader.read_u32_le()?;

        Ok(Self { num, size, climate, position: Point::new(x, y), file_number })
    }
}

/// Scenario generation parameters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WorldGenerationSettings {
    pub natives_north: u8,
    pub natives_south: u8,
    pub big_iron_ore: u8,
    pub small_iron_ore: u8,
    pub gold_ore: u8,
    pub wine: u8,
    pub sugar_cane: u8,
    pub spice: u8,
    pub cacao: u8,
    pub tobacco: u8,
    pub cotton: u8,
    pub treasures: u8,
    pub templates: Vec<IslandTemplate>,
}

impl WorldGenerationSettings {
    const HEADER: usize = 100;
    const COUNTS: usize = 268;

    pub fn read(reader: &mut BinaryReader) -> Result<Self> {
        let header = reader.read_bytes(Self::HEADER)?;
        let count = reader.read_u32_le()? as usize;
        let counts = reader.read_bytes(Self::COUNTS)?;

        let needed = count.saturating_mul(IslandTemplate::SIZE);
        if needed > reader.remaining() {
            return Err(Error::UnexpectedEof {
                offset: reader.position(),
                need: needed,
                have: reader.remaining(),
            });
        }
        let mut templates = Vec::with_capacity(count);
        for _ in 0..count {
            templates.push(IslandTemplate::read(reader)?);
        }
        let tail = reader.remaining();
        reader.expect_zeroes(tail, "generation settings trailer")?;

        Ok(Self {
            natives_north: header[64],
            natives_south: header[68],
            big_iron_ore: counts[46],
            small_iron_ore: counts[54],
            gold_ore: counts[62],
            tobacco: counts[78],
            spice: counts[86],
            sugar_cane: counts[95],
            cotton: counts[102],
            wine: counts[110],
            cacao: counts[118],
            treasures: counts[174],
            templates,
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::codec::BinaryWriter;

    pub(crate) fn template_bytes(w: &mut BinaryWriter, num: u8, size: u8, climate: u8, x: u32, y: u32) {
        w.write_u8(climate);
        w.write_u8(size);
        w.write_u8(0);
        w.write_u8(num);
        w.write_u32_le(0xFFFF);
        w.write_u32_le(x);
        w.write_u32_le(y);
    }

    /// Settings payload with the given (num, size, climate, x, y) templates
    pub(crate) fn settings_record(templates: &[(u8, u8, u8, u32, u32)]) -> Vec<u8> {
        let mut header = [0u8; 100];
        header[64] = 2;
        header[68] = 3;
        let mut counts = [0u8; 268];
        counts[46] = 6;
        counts[95] = 3;
        counts[174] = 10;

        let mut w = BinaryWriter::new();
        w.write_bytes(&header);
        w.write_u32_le(templates.len() as u32);
        w.write_bytes(&counts);
        for &(num, size, climate, x, y) in templates {
            template_bytes(&mut w, num, size, climate, x, y);
        }
        w.write_zeroes(8);
        w.into_vec()
    }

    #[test]
    fn test_read_settings() {
        let data = settings_record(&[(0, 2, 0, 10, 20), (1, 4, 1, 200, 30), (5, 0, 7, 1, 1)]);
        let mut reader = BinaryReader::new(&data);
        let settings = WorldGenerationSettings::read(&mut reader).unwrap();

        assert!(reader.is_empty());
        assert_eq!(settings.natives_north, 2);
        assert_eq!(settings.natives_south, 3);
        assert_eq!(settings.big_iron_ore, 6);
        assert_eq!(settings.sugar_cane, 3);
        assert_eq!(settings.treasures, 10);
        assert_eq!(settings.templates.len(), 3);

        let t = settings.templates[0];
        assert_eq!(t.size, IslandSize::Medium);
        assert_eq!(t.climate, ClimateFilter::North);
        assert_eq!(t.position, Point::new(10, 20));
        assert_eq!(settings.templates[1].climate, ClimateFilter::South);
        assert_eq!(settings.templates[2].climate, ClimateFilter::Any);
        assert_eq!(settings.templates[2].num, 5);
    }

    #[test]
    fn test_invalid_size_category() {
        let data = settings_record(&[(0, 5, 0, 0, 0)]);
        let err = WorldGenerationSettings::read(&mut BinaryReader::new(&data)).unwrap_err();
        assert!(matches!(err, Error::UnexpectedValue { field: "island size category", value: 5 }));
    }

    #[test]
    fn test_nonzero_trailer_rejected() {
        let mut data = settings_record(&[]);
        let last = data.len() - 1;
        data[last] = 1;
        assert!(WorldGenerationSettings::read(&mut BinaryReader::new(&data)).is_err());
    }

    #[test]
    fn test_template_count_exceeds_payload() {
        let mut data = settings_record(&[]);
        data[100..104].copy_from_slice(&1000u32.to_le_bytes());
        assert!(matches!(
            WorldGenerationSettings::read(&mut BinaryReader::new(&data)),
            Err(Error::UnexpectedEof { .. })
        ));
    }

    #[test]
    fn test_climate_filter_climates() {
        assert_eq!(ClimateFilter::North.climates(), &[Climate::North]);
        assert_eq!(ClimateFilter::Any.climates().len(), 2);
    }
}

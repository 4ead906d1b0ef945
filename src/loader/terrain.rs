use tracing::debug;

use crate::codec::{Block, Container, IslandBlock};
use crate::error::{Error, Result};
use crate::state::{Climate, ClimateFilter, FieldGrid, Island, IslandSize};
use super::storage::Storage;

/// Overlays an island block may carry: base terrain, then buildings
const MAX_OVERLAYS: usize = 2;

/// `/islands/{climate}/{size code}{NN}.scp`
pub fn terrain_path(climate: Climate, size: IslandSize, number: u16) -> String {
    format!("{}/{}{:02}.scp", climate_dir(climate), size.code(), number)
}

pub fn climate_dir(climate: Climate) -> String {
    format!("/islands/{}", climate.dir_name())
}

/// A file in the terrain library
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerrainEntry {
    pub path: String,
    pub climate: Climate,
    pub size: IslandSize,
    pub number: u16,
}

impl TerrainEntry {
    /// Parse a library file name such as `med07.scp`
    pub fn parse(climate: Climate, size: IslandSize, name: &str) -> Option<Self> {
        let digits = name.strip_prefix(size.code())?.strip_suffix(".scp")?;
        if digits.len() != 2 || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        Some(Self {
            path: format!("{}/{}", climate_dir(climate), name),
            climate,
            size,
            number: digits.parse().ok()?,
        })
    }
}

/// A framed terrain file; its first island block holds the default terrain
#[derive(Debug, Clone)]
pub struct TerrainFile {
    pub path: String,
    pub container: Container,
}

impl TerrainFile {
    pub fn island_block(&self) -> Result<&IslandBlock> {
        self.container
            .islands()
            .first()
            .ok_or(Error::MissingBlock { tag: "INSEL5" })
    }

    /// Default terrain overlay shipped with the file
    pub fn base_overlay(&self) -> Result<&Block> {
        self.island_block()?
            .overlays
            .first()
            .ok_or(Error::MissingBlock { tag: "INSELHAUS" })
    }
}

/// Resolves islands against the external terrain library
pub struct TerrainLoader<'a> {
    storage: &'a dyn Storage,
}

impl<'a> TerrainLoader<'a> {
    pub fn new(storage: &'a dyn Storage) -> Self {
        Self { storage }
    }

    pub async fn load(&self, path: &str) -> Result<TerrainFile> {
        let data = self.storage.read(path).await?;
        let container = Container::parse(data)?;
        Ok(TerrainFile { path: path.to_string(), container })
    }

    /// The terrain file an island was derived from
    pub async fn load_for(&self, island: &Island) -> Result<TerrainFile> {
        let size = IslandSize::for_width(island.width)
            .ok_or(Error::NoSizeCategory { width: island.width })?;
        self.load(&terrain_path(island.climate, size, island.base_island_number)).await
    }

    /// Library files of one size category under the allowed climates, sorted by path
    pub async fn candidates(&self, size: IslandSize, filter: ClimateFilter) -> Result<Vec<TerrainEntry>> {
        let mut entries = Vec::new();
        for &climate in filter.climates() {
            let names = self.storage.list(&climate_dir(climate)).await?;
            entries.extend(names.iter().filter_map(|name| TerrainEntry::parse(climate, size, name)));
        }
        entries.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(entries)
    }

    /// Fill an island's base and current grids from its overlays.
    ///
    /// The first overlay is the island's own terrain and only used when the
    /// island differs from its library file; otherwise the library terrain is
    /// loaded. The second overlay holds the player-placed buildings.
    pub async fn attach_fields(&self, island: &mut Island, block: &IslandBlock) -> Result<()> {
        if block.overlays.len() > MAX_OVERLAYS {
            return Err(Error::unexpected("island overlay count", block.overlays.len() as u64));
        }

        island.base_fields = if island.differs_from_base {
            let overlay = block
                .overlays
                .first()
                .ok_or(Error::MissingBlock { tag: "INSELHAUS" })?;
            FieldGrid::from_overlay(island.width, island.height, overlay)?
        } else {
            let terrain = self.load_for(island).await?;
            debug!(island = island.id, path = %terrain.path, "loaded library terrain");
            FieldGrid::from_overlay(island.width, island.height, terrain.base_overlay()?)?
        };

        island.current_fields = match block.overlays.get(1) {
            Some(overlay) => FieldGrid::from_overlay(island.width, island.height, overlay)?,
            None => FieldGrid::new(island.width, island.height),
        };
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::codec::{BinaryReader, BinaryWriter};
    use crate::loader::storage::MemoryStorage;
    use crate::state::island::tests::island_record;

    pub(crate) fn field_bytes(w: &mut BinaryWriter, raw_id: u16, x: u8, y: u8) {
        w.write_u16_le(raw_id);
        w.write_u8(x);
        w.write_u8(y);
        w.write_u32_le(0);
    }

    /// A terrain file: island record plus one overlay of `fields` (raw id, x, y)
    pub(crate) fn terrain_file(width: u8, height: u8, fields: &[(u16, u8, u8)]) -> Vec<u8> {
        let mut overlay = BinaryWriter::new();
        for &(id, x, y) in fields {
            field_bytes(&mut overlay, id, x, y);
        }
        let mut w = BinaryWriter::new();
        w.write_block("INSEL5", &island_record(0, width, height, 0, false, false));
        w.write_block("INSELHAUS", overlay.as_slice());
        w.into_vec()
    }

    #[test]
    fn test_size_category_boundaries() {
        let cases = [
            (1, Some("lit")),
            (35, Some("lit")),
            (36, Some("mit")),
            (45, Some("mit")),
            (46, Some("med")),
            (55, Some("med")),
            (56, Some("big")),
            (85, Some("big")),
            (86, Some("lar")),
            (100, Some("lar")),
            (101, None),
        ];
        for (width, code) in cases {
            assert_eq!(IslandSize::for_width(width).map(IslandSize::code), code, "width {width}");
        }
    }

    #[test]
    fn test_terrain_path() {
        assert_eq!(terrain_path(Climate::North, IslandSize::Medium, 7), "/islands/north/med07.scp");
        assert_eq!(terrain_path(Climate::South, IslandSize::Large, 12), "/islands/south/lar12.scp");
    }

    #[test]
    fn test_parse_entry_names() {
        let entry = TerrainEntry::parse(Climate::South, IslandSize::Big, "big04.scp").unwrap();
        assert_eq!(entry.number, 4);
        assert_eq!(entry.path, "/islands/south/big04.scp");
        assert!(TerrainEntry::parse(Climate::South, IslandSize::Big, "med04.scp").is_none());
        assert!(TerrainEntry::parse(Climate::South, IslandSize::Big, "big4.scp").is_none());
        assert!(TerrainEntry::parse(Climate::South, IslandSize::Big, "big04.bak").is_none());
        assert!(TerrainEntry::parse(Climate::South, IslandSize::Big, "bigx4.scp").is_none());
    }

    fn island(width: u8, base: u16, differs: bool) -> Island {
        let data = island_record(1, width, 10, base, false, differs);
        Island::read(&mut BinaryReader::new(&data)).unwrap()
    }

    fn island_block(overlays: &[&[(u16, u8, u8)]]) -> IslandBlock {
        let mut w = BinaryWriter::new();
        w.write_block("INSEL5", &island_record(1, 40, 10, 3, false, false));
        for fields in overlays {
            let mut overlay = BinaryWriter::new();
            for &(id, x, y) in *fields {
                field_bytes(&mut overlay, id, x, y);
            }
            w.write_block("INSELHAUS", overlay.as_slice());
        }
        Container::parse(w.into_vec()).unwrap().islands()[0].clone()
    }

    #[test]
    fn test_attach_library_terrain() {
        let storage = MemoryStorage::new()
            .with_file("/islands/north/mit03.scp", terrain_file(40, 10, &[(1, 0, 0), (1, 39, 9)]));
        let loader = TerrainLoader::new(&storage);
        let mut island = island(40, 3, false);
        let block = island_block(&[&[(500, 2, 2)], &[(900, 5, 5)]]);

        tokio_test::block_on(loader.attach_fields(&mut island, &block)).unwrap();
        // the save's own first overlay is ignored in favour of the library file
        assert_eq!(island.base_fields.len(), 2);
        assert_eq!(island.terrain_at(crate::codec::Point::new(39, 9)).unwrap().building_id, 20001);
        assert_eq!(island.current_fields.len(), 1);
        assert_eq!(island.building_at(crate::codec::Point::new(5, 5)).unwrap().building_id, 20900);
    }

    #[test]
    fn test_attach_embedded_terrain() {
        let storage = MemoryStorage::new();
        let loader = TerrainLoader::new(&storage);
        let mut island = island(40, 3, true);
        let block = island_block(&[&[(500, 2, 2)]]);

        tokio_test::block_on(loader.attach_fields(&mut island, &block)).unwrap();
        assert_eq!(island.base_fields.len(), 1);
        assert!(island.current_fields.is_empty());
    }

    #[test]
    fn test_missing_terrain_file() {
        let storage = MemoryStorage::new();
        let loader = TerrainLoader::new(&storage);
        let mut island = island(40, 3, false);
        let block = island_block(&[&[], &[]]);

        let err = tokio_test::block_on(loader.attach_fields(&mut island, &block)).unwrap_err();
        assert!(matches!(err, Error::MissingResource { ref path } if path == "/islands/north/mit03.scp"));
    }

    #[test]
    fn test_too_many_overlays() {
        let storage = MemoryStorage::new();
        let loader = TerrainLoader::new(&storage);
        let mut island = island(40, 3, true);
        let block = island_block(&[&[], &[], &[]]);

        let err = tokio_test::block_on(loader.attach_fields(&mut island, &block)).unwrap_err();
        assert!(matches!(err, Error::UnexpectedValue { field: "island overlay count", value: 3 }));
    }

    #[test]
    fn test_oversized_island() {
        let storage = MemoryStorage::new();
        let loader = TerrainLoader::new(&storage);
        let island = island(120, 3, false);

        let err = tokio_test::block_on(loader.load_for(&island)).unwrap_err();
        assert!(matches!(err, Error::NoSizeCategory { width: 120 }));
    }

    #[test]
    fn test_candidates_respect_climate_and_size() {
        let storage = MemoryStorage::new()
            .with_file("/islands/north/med02.scp", vec![])
            .with_file("/islands/north/med01.scp", vec![])
            .with_file("/islands/north/lit01.scp", vec![])
            .with_file("/islands/south/med01.scp", vec![]);
        let loader = TerrainLoader::new(&storage);

        let north = tokio_test::block_on(loader.candidates(IslandSize::Medium, ClimateFilter::North)).unwrap();
        let paths: Vec<&str> = north.iter().map(|e| e.path.as_str()).collect();
        assert_eq!(paths, ["/islands/north/med01.scp", "/islands/north/med02.scp"]);

        let any = tokio_test::block_on(loader.candidates(IslandSize::Medium, ClimateFilter::Any)).unwrap();
        assert_eq!(any.len(), 3);
    }
}

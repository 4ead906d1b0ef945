//! World assembly.
//!
//! Players and islands are decoded first. Every other record names its owner
//! and location by id, so those records are decoded in a second pass against
//! the finished player and island tables.

use std::collections::BTreeMap;

use bytes::Bytes;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use crate::codec::{BinaryReader, Container};
use crate::config::FieldTypeTable;
use crate::error::{Error, Result};
use crate::state::{
    Castle, City, FarmField, House, Island, IslandId, Kontor, Player, PlayerId, Producer,
    RefTables, ScenarioInfo, Ship, Soldier, Task, Timers, Trader, World,
    WorldGenerationSettings,
};
use super::generator::WorldGenerator;
use super::storage::Storage;
use super::terrain::TerrainLoader;

pub mod tags {
    pub const PLAYER: &str = "PLAYER4";
    pub const CITY: &str = "STADT4";
    pub const SHIP: &str = "SHIP4";
    pub const SOLDIER: &str = "SOLDAT3";
    pub const KONTOR: &str = "KONTOR2";
    pub const CASTLE: &str = "MILITAR";
    pub const PRODUCER: &str = "PRODLIST2";
    pub const HOUSE: &str = "SIEDLER";
    pub const FARM_FIELD: &str = "ROHWACHS2";
    pub const TASK: &str = "AUFTRAG4";
    pub const TRADER: &str = "HANDLER";
    pub const TIMERS: &str = "TIMERS";
    pub const NAME: &str = "NAME";
    pub const RANKING: &str = "SZENE_RANKING";
    pub const CAMPAIGN: &str = "SZENE_KAMPAGNE";
    pub const MISSION_NUMBER: &str = "SZENE_MISSNR";
    pub const GENERATION: &str = "SZENE_INSELN";
}

/// Decode every fixed-size record under `tag`, across all blocks carrying it.
/// The closure also receives the record's running index.
fn decode_all<T>(
    container: &Container,
    tag: &str,
    record: usize,
    mut decode: impl FnMut(&mut BinaryReader, usize) -> Result<T>,
) -> Result<Vec<T>> {
    let mut out = Vec::new();
    for block in container.blocks(tag) {
        let count = block.record_count(record)?;
        let mut reader = block.reader();
        for _ in 0..count {
            let index = out.len();
            out.push(decode(&mut reader, index)?);
        }
    }
    if !out.is_empty() {
        debug!(tag, count = out.len(), "decoded records");
    }
    Ok(out)
}

fn read_scenario_number(container: &Container, tag: &str) -> Result<Option<u32>> {
    container
        .first_non_empty(tag)
        .map(|block| block.reader().read_u32_le())
        .transpose()
}

/// Loads saves and scenarios into a [`World`]
pub struct WorldLoader<'a> {
    storage: &'a dyn Storage,
    fields: &'a FieldTypeTable,
}

impl<'a> WorldLoader<'a> {
    pub fn new(storage: &'a dyn Storage, fields: &'a FieldTypeTable) -> Self {
        Self { storage, fields }
    }

    /// Load a save or scenario stored at `path` in the same storage as the terrain library
    pub async fn load_path(&self, path: &str) -> Result<World> {
        let data = self.storage.read(path).await?;
        self.load(data).await
    }

    /// Load a container, sampling generated islands with an entropy-seeded rng
    pub async fn load(&self, data: impl Into<Bytes>) -> Result<World> {
        let mut rng = StdRng::from_entropy();
        self.load_with_rng(data, &mut rng).await
    }

    /// Load a container; `rng` drives the terrain choice for generated islands
    pub async fn load_with_rng<R: Rng + ?Sized>(&self, data: impl Into<Bytes>, rng: &mut R) -> Result<World> {
        let container = Container::parse(data)?;
        let terrain = TerrainLoader::new(self.storage);

        let players = self.read_players(&container)?;
        let islands = self.read_islands(&container, &terrain).await?;

        let mut world = {
            let refs = RefTables::new(&players, &islands);
            Self::read_dependents(&container, refs)?
        };
        world.players = players;
        world.islands = islands;

        if let Some(block) = container.first_non_empty(tags::GENERATION) {
            let settings = WorldGenerationSettings::read(&mut block.reader())?;
            let generator = WorldGenerator::new(terrain, self.fields);
            generator.populate(&mut world, &settings, rng).await?;
            world.generation = Some(settings);
        }

        info!(
            name = %world.name,
            players = world.players.len(),
            islands = world.islands.len(),
            cities = world.cities.len(),
            ships = world.ships.len(),
            producers = world.producers.len(),
            "world loaded"
        );
        Ok(world)
    }

    fn read_players(&self, container: &Container) -> Result<BTreeMap<PlayerId, Player>> {
        let mut players = BTreeMap::new();
        for player in decode_all(container, tags::PLAYER, Player::SIZE, |r, _| Player::read(r))? {
            let id = player.id;
            if players.insert(id, player).is_some() {
                return Err(Error::DuplicateId { kind: "player", id: id as u32 });
            }
        }
        Ok(players)
    }

    async fn read_islands(
        &self,
        container: &Container,
        terrain: &TerrainLoader<'_>,
    ) -> Result<BTreeMap<IslandId, Island>> {
        let mut islands = BTreeMap::new();
        for island_block in container.islands() {
            let mut island = Island::read(&mut island_block.block.reader())?;
            if islands.contains_key(&island.id) {
                return Err(Error::DuplicateId { kind: "island", id: island.id as u32 });
            }
            terrain.attach_fields(&mut island, island_block).await?;
            debug!(
                island = island.id,
                width = island.width,
                height = island.height,
                overlays = island_block.overlays.len(),
                "decoded island"
            );
            islands.insert(island.id, island);
        }
        Ok(islands)
    }

    /// Everything that refers to players or islands
    fn read_dependents(container: &Container, refs: RefTables<'_>) -> Result<World> {
        let name = match container.first_non_empty(tags::NAME) {
            Some(block) => block.reader().read_fixed_string(block.len())?,
            None => String::new(),
        };

        let ranking = read_scenario_number(container, tags::RANKING)?;
        let campaign = read_scenario_number(container, tags::CAMPAIGN)?;
        let mission_number = read_scenario_number(container, tags::MISSION_NUMBER)?;
        let scenario = (ranking.is_some() || campaign.is_some() || mission_number.is_some())
            .then_some(ScenarioInfo { ranking, campaign, mission_number });

        Ok(World {
            name,
            scenario,
            cities: decode_all(container, tags::CITY, City::SIZE, |r, _| City::read(r, &refs))?,
            kontors: decode_all(container, tags::KONTOR, Kontor::SIZE, |r, _| Kontor::read(r, &refs))?,
            ships: decode_all(container, tags::SHIP, Ship::SIZE, |r, _| Ship::read(r, &refs))?,
            soldiers: decode_all(container, tags::SOLDIER, Soldier::SIZE, |r, _| Soldier::read(r, &refs))?,
            castles: decode_all(container, tags::CASTLE, Castle::SIZE, |r, _| Castle::read(r, &refs))?,
            producers: decode_all(container, tags::PRODUCER, Producer::SIZE, |r, _| {
                Producer::read(r, &refs)
            })?,
            houses: decode_all(container, tags::HOUSE, House::SIZE, |r, _| House::read(r, &refs))?,
            farm_fields: decode_all(container, tags::FARM_FIELD, FarmField::SIZE, |r, _| {
                FarmField::read(r, &refs)
            })?,
            tasks: decode_all(container, tags::TASK, Task::SIZE, Task::read)?,
            trader: container
                .first_non_empty(tags::TRADER)
                .map(|block| Trader::read(&mut block.reader()))
                .transpose()?,
            timers: container
                .first_non_empty(tags::TIMERS)
                .map(|block| Timers::read(&mut block.reader()))
                .transpose()?,
            ..World::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{BinaryWriter, Point};
    use crate::config::field_type::tests::FIELDS_JSON;
    use crate::error::ErrorCategory;
    use crate::loader::storage::MemoryStorage;
    use crate::loader::terrain::tests::{field_bytes, terrain_file};
    use crate::state::city::tests::city_record;
    use crate::state::generation::tests::settings_record;
    use crate::state::island::tests::island_record;
    use crate::state::kontor::tests::kontor_record;
    use crate::state::player::tests::player_record;
    use crate::state::player::PlayerKind;
    use crate::state::producer::tests::IDLE_AT_8_14;
    use crate::state::ship::tests::ship_record;
    use crate::state::soldier::tests::soldier_record;

    fn load(storage: &MemoryStorage, data: Vec<u8>) -> Result<World> {
        let table = FieldTypeTable::from_json(FIELDS_JSON.as_bytes()).unwrap();
        let loader = WorldLoader::new(storage, &table);
        tokio_test::block_on(loader.load_with_rng(data, &mut StdRng::seed_from_u64(1602)))
    }

    fn overlay(fields: &[(u16, u8, u8)]) -> Vec<u8> {
        let mut w = BinaryWriter::new();
        for &(id, x, y) in fields {
            field_bytes(&mut w, id, x, y);
        }
        w.into_vec()
    }

    #[test]
    fn test_single_player_container() {
        let mut w = BinaryWriter::new();
        w.write_block("PLAYER4", &player_record(-500, PlayerKind::Human, 0));

        let world = load(&MemoryStorage::new(), w.into_vec()).unwrap();
        assert_eq!(world.players.len(), 1);
        let player = world.player(0).unwrap();
        assert_eq!(player.money, -500);
        assert_eq!(player.kind, PlayerKind::Human);
        assert!(world.islands.is_empty());
        assert!(world.ships.is_empty());
        assert!(world.cities.is_empty());
        assert!(world.scenario.is_none());
        assert!(world.generation.is_none());
    }

    #[test]
    fn test_empty_container() {
        let world = load(&MemoryStorage::new(), Vec::new()).unwrap();
        assert!(world.players.is_empty());
        assert!(world.tasks.is_empty());
        assert!(world.trader.is_none());
        assert!(world.name.is_empty());
    }

    #[test]
    fn test_full_save() {
        let mut players = player_record(1000, PlayerKind::Human, 0);
        players.extend(player_record(2000, PlayerKind::Ai, 1));

        let mut w = BinaryWriter::new();
        w.write_block("NAME", b"Neuland\0");
        // dependents may precede the records they refer to
        w.write_block("STADT4", &city_record(4, 1, "Nordhafen"));
        w.write_block("PLAYER4", &players);
        w.write_block("INSEL5", &island_record(4, 20, 20, 1, false, true));
        w.write_block("INSELHAUS", &overlay(&[(1, 0, 0), (1, 1, 0)]));
        w.write_block("INSELHAUS", &overlay(&[(100, 5, 6)]));
        w.write_block("SHIP4", &ship_record(0, 0));
        w.write_block("SOLDAT3", &soldier_record(1, 0));
        w.write_block("KONTOR2", &kontor_record(4, 1));
        let mut producer = IDLE_AT_8_14;
        producer[0] = 4;
        w.write_block("PRODLIST2", &producer);
        w.write_block("SZENE_MISSNR", &3u32.to_le_bytes());

        let world = load(&MemoryStorage::new(), w.into_vec()).unwrap();
        assert_eq!(world.name, "Neuland");
        assert_eq!(world.players.len(), 2);
        assert_eq!(world.cities.len(), 1);
        assert_eq!(world.cities_of(1).count(), 1);
        assert_eq!(world.ships_of(0).count(), 1);
        assert_eq!(world.soldiers_of(1).count(), 1);
        assert_eq!(world.kontors_on(4).count(), 1);
        assert_eq!(world.producers_on(4).count(), 1);
        assert_eq!(world.scenario.as_ref().unwrap().mission_number, Some(3));

        let island = world.island(4).unwrap();
        assert_eq!(island.base_fields.len(), 2);
        assert_eq!(world.building_at(Point::new(105, 206)).unwrap().building_id, 20100);
        assert_eq!(world.island_of(&world.cities[0]).map(|i| i.id), Some(4));
    }

    #[test]
    fn test_island_terrain_from_library() {
        let storage = MemoryStorage::new()
            .with_file("/islands/south/lit02.scp", terrain_file(30, 10, &[(1, 0, 0), (2, 0, 1), (2, 0, 2)]));
        let mut w = BinaryWriter::new();
        w.write_block("INSEL5", &island_record(0, 30, 10, 2, true, false));
        w.write_block("INSELHAUS", &overlay(&[]));
        w.write_block("INSELHAUS", &overlay(&[(100, 3, 3)]));

        let world = load(&storage, w.into_vec()).unwrap();
        let island = world.island(0).unwrap();
        assert_eq!(island.base_fields.len(), 3);
        assert_eq!(island.current_fields.len(), 1);
    }

    #[test]
    fn test_missing_terrain_aborts_load() {
        let mut w = BinaryWriter::new();
        w.write_block("INSEL5", &island_record(0, 30, 10, 2, true, false));

        let err = load(&MemoryStorage::new(), w.into_vec()).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::MissingExternalResource);
    }

    #[test]
    fn test_unresolved_player() {
        let mut w = BinaryWriter::new();
        w.write_block("PLAYER4", &player_record(0, PlayerKind::Human, 0));
        w.write_block("SHIP4", &ship_record(3, 0));

        let err = load(&MemoryStorage::new(), w.into_vec()).unwrap_err();
        assert!(matches!(err, Error::UnresolvedReference { kind: "player", id: 3 }));
    }

    #[test]
    fn test_unresolved_island() {
        let mut w = BinaryWriter::new();
        w.write_block("PLAYER4", &player_record(0, PlayerKind::Human, 0));
        w.write_block("STADT4", &city_record(9, 0, "Irgendwo"));

        let err = load(&MemoryStorage::new(), w.into_vec()).unwrap_err();
        assert!(matches!(err, Error::UnresolvedReference { kind: "island", id: 9 }));
    }

    #[test]
    fn test_duplicate_player_id() {
        let mut players = player_record(0, PlayerKind::Human, 2);
        players.extend(player_record(0, PlayerKind::Ai, 2));
        let mut w = BinaryWriter::new();
        w.write_block("PLAYER4", &players);

        let err = load(&MemoryStorage::new(), w.into_vec()).unwrap_err();
        assert!(matches!(err, Error::DuplicateId { kind: "player", id: 2 }));
    }

    #[test]
    fn test_misaligned_record_block() {
        let mut w = BinaryWriter::new();
        w.write_block("PRODLIST2", &[0u8; 30]);

        let err = load(&MemoryStorage::new(), w.into_vec()).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Framing);
    }

    #[test]
    fn test_scenario_generates_islands() {
        let storage = MemoryStorage::new()
            .with_file("/islands/north/med01.scp", terrain_file(50, 10, &[(1, 0, 0)]))
            .with_file("/islands/south/med01.scp", terrain_file(50, 10, &[(1, 0, 0)]));
        let mut w = BinaryWriter::new();
        w.write_block("INSEL5", &island_record(0, 20, 20, 1, false, true));
        w.write_block("INSELHAUS", &overlay(&[]));
        w.write_block("SZENE_INSELN", &settings_record(&[(0, 2, 0, 10, 10), (1, 2, 0, 400, 20)]));

        let world = load(&storage, w.into_vec()).unwrap();
        assert_eq!(world.islands.len(), 2);
        let generated = world.island(1).unwrap();
        assert_eq!(generated.position, Point::new(400, 20));
        assert!(!generated.is_south());
        assert_eq!(world.generation.as_ref().unwrap().templates.len(), 2);
    }

    #[test]
    fn test_load_path() {
        let mut w = BinaryWriter::new();
        w.write_block("PLAYER4", &player_record(7, PlayerKind::Human, 0));
        let storage = MemoryStorage::new().with_file("/savegame/game00.gam", w.into_vec());
        let table = FieldTypeTable::new();
        let loader = WorldLoader::new(&storage, &table);

        let world = tokio_test::block_on(loader.load_path("/savegame/game00.gam")).unwrap();
        assert_eq!(world.player(0).unwrap().money, 7);
    }
}

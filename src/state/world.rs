use std::collections::BTreeMap;

use serde::Serialize;

use crate::codec::Point;
use crate::error::{Error, Result};
use super::castle::Castle;
use super::city::City;
use super::farm_field::FarmField;
use super::field::Field;
use super::generation::WorldGenerationSettings;
use super::house::House;
use super::island::{Island, IslandId};
use super::kontor::Kontor;
use super::player::{Player, PlayerId};
use super::producer::Producer;
use super::ship::Ship;
use super::soldier::Soldier;
use super::task::Task;
use super::timers::Timers;
use super::trader::Trader;

/// Entities owned by exactly one player
pub trait Owned {
    fn player_id(&self) -> PlayerId;
}

/// Entities located on one island
pub trait OnIsland {
    fn island_id(&self) -> IslandId;
}

/// Completed player and island tables handed to second-phase decoders
#[derive(Clone, Copy)]
pub struct RefTables<'a> {
    pub players: &'a BTreeMap<PlayerId, Player>,
    pub islands: &'a BTreeMap<IslandId, Island>,
}

impl<'a> RefTables<'a> {
    pub fn new(
        players: &'a BTreeMap<PlayerId, Player>,
        islands: &'a BTreeMap<IslandId, Island>,
    ) -> Self {
        Self { players, islands }
    }

    /// Resolve a player id as stored on disk (any width)
    pub fn player(&self, id: u32) -> Result<&'a Player> {
        u8::try_from(id)
            .ok()
            .and_then(|id| self.players.get(&id))
            .ok_or(Error::UnresolvedReference { kind: "player", id })
    }

    pub fn island(&self, id: u32) -> Result<&'a Island> {
        u8::try_from(id)
            .ok()
            .and_then(|id| self.islands.get(&id))
            .ok_or(Error::UnresolvedReference { kind: "island", id })
    }
}

/// Mission metadata present only in scenario files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ScenarioInfo {
    pub ranking: Option<u32>,
    pub campaign: Option<u32>,
    pub mission_number: Option<u32>,
}

/// The complete world reconstructed from one container
#[derive(Debug, Clone, Default, Serialize)]
pub struct World {
    /// Empty for missions
    pub name: String,
    pub scenario: Option<ScenarioInfo>,

    pub players: BTreeMap<PlayerId, Player>,
    pub islands: BTreeMap<IslandId, Island>,

    pub cities: Vec<City>,
    pub kontors: Vec<Kontor>,
    pub ships: Vec<Ship>,
    pub soldiers: Vec<Soldier>,
    pub castles: Vec<Castle>,
    pub producers: Vec<Producer>,
    pub houses: Vec<House>,
    pub farm_fields: Vec<FarmField>,
    /// Indexed by `Player::assigned_task_id`
    pub tasks: Vec<Task>,
    pub trader: Option<Trader>,
    pub timers: Option<Timers>,

    /// Generation parameters of a scenario, kept for reference after islands are placed
    pub generation: Option<WorldGenerationSettings>,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(&id)
    }

    pub fn island(&self, id: IslandId) -> Option<&Island> {
        self.islands.get(&id)
    }

    pub fn refs(&self) -> RefTables<'_> {
        RefTables::new(&self.players, &self.islands)
    }

    /// Owning player of any player-owned entity
    pub fn owner<T: Owned>(&self, entity: &T) -> Option<&Player> {
        self.player(entity.player_id())
    }

    /// Island an entity stands on
    pub fn island_of<T: OnIsland>(&self, entity: &T) -> Option<&Island> {
        self.island(entity.island_id())
    }

    /// Island covering a world coordinate
    pub fn island_at(&self, world: Point) -> Option<&Island> {
        self.islands.values().find(|island| island.contains(world))
    }

    /// Player-placed building at a world coordinate
    pub fn building_at(&self, world: Point) -> Option<&Field> {
        let island = self.island_at(world)?;
        island.building_at(island.to_local(world)?)
    }

    pub fn cities_on(&self, island: IslandId) -> impl Iterator<Item = &City> {
        self.cities.iter().filter(move |c| c.island_id == island)
    }

    pub fn kontors_on(&self, island: IslandId) -> impl Iterator<Item = &Kontor> {
        self.kontors.iter().filter(move |k| k.island_id == island)
    }

    pub fn producers_on(&self, island: IslandId) -> impl Iterator<Item = &Producer> {
        self.producers.iter().filter(move |p| p.island_id == island)
    }

    pub fn ships_of(&self, player: PlayerId) -> impl Iterator<Item = &Ship> {
        self.ships.iter().filter(move |s| s.player_id == player)
    }

    pub fn soldiers_of(&self, player: PlayerId) -> impl Iterator<Item = &Soldier> {
        self.soldiers.iter().filter(move |s| s.player_id == player)
    }

    pub fn cities_of(&self, player: PlayerId) -> impl Iterator<Item = &City> {
        self.cities.iter().filter(move |c| c.player_id == player)
    }

    pub fn assigned_task(&self, player: &Player) -> Option<&Task> {
        if !player.has_task() {
            return None;
        }
        self.tasks.get(player.assigned_task_id as usize)
    }

    /// Smallest island id not yet taken
    pub fn next_island_id(&self) -> Option<IslandId> {
        (0..=IslandId::MAX).find(|id| !self.islands.contains_key(id))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::codec::BinaryReader;
    use crate::state::island::tests::island_record;
    use crate::state::player::tests::player_record;
    use crate::state::player::PlayerKind;

    /// A world holding only the given players and 10x10 islands
    pub(crate) fn world_with(players: &[u8], islands: &[u8]) -> World {
        let mut world = World::new();
        for &id in players {
            let data = player_record(0, PlayerKind::Ai, id);
            world.players.insert(id, Player::read(&mut BinaryReader::new(&data)).unwrap());
        }
        for &id in islands {
            let data = island_record(id, 10, 10, 1, false, true);
            world.islands.insert(id, Island::read(&mut BinaryReader::new(&data)).unwrap());
        }
        world
    }

    #[test]
    fn test_ref_tables_resolve() {
        let world = world_with(&[1], &[4]);
        let refs = world.refs();

        assert_eq!(refs.player(1).unwrap().id, 1);
        assert_eq!(refs.island(4).unwrap().id, 4);
        assert!(matches!(
            refs.player(2),
            Err(Error::UnresolvedReference { kind: "player", id: 2 })
        ));
        assert!(matches!(
            refs.island(0x104),
            Err(Error::UnresolvedReference { kind: "island", id: 0x104 })
        ));
    }

    #[test]
    fn test_next_island_id() {
        assert_eq!(World::new().next_island_id(), Some(0));
        assert_eq!(world_with(&[], &[0, 1, 3]).next_island_id(), Some(2));
    }

    #[test]
    fn test_island_at() {
        // island_record places every island at (100, 200)
        let world = world_with(&[], &[2]);
        assert_eq!(world.island_at(Point::new(105, 205)).map(|i| i.id), Some(2));
        assert!(world.island_at(Point::new(5, 5)).is_none());
        assert!(world.building_at(Point::new(105, 205)).is_none());
    }
}

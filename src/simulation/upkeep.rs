use std::collections::BTreeMap;

use crate::config::FieldTypeTable;
use crate::error::{Error, Result};
use crate::state::{PlayerId, World};
use super::production::building_of;

/// Upkeep sums are charged in sixths
pub const UPKEEP_DIVISOR: u32 = 6;

/// Upkeep owed by each player for one charge period.
///
/// Every producer costs its building's active or inactive upkeep, billed to
/// the player owning the building field. Every known player appears in the
/// result, even with nothing to pay.
pub fn player_upkeep(world: &World, fields: &FieldTypeTable) -> Result<BTreeMap<PlayerId, u32>> {
    let mut sums: BTreeMap<PlayerId, u32> = world.players.keys().map(|&id| (id, 0)).collect();

    for producer in &world.producers {
        let building = building_of(&world.islands, producer)?;
        let Some(params) = fields.require(building.building_id)?.production.as_ref() else {
            continue;
        };
        if !world.players.contains_key(&building.player_id) {
            return Err(Error::UnresolvedReference { kind: "player", id: building.player_id as u32 });
        }
        let cost = if producer.active() { params.upkeep_active } else { params.upkeep_inactive };
        *sums.entry(building.player_id).or_default() += cost;
    }

    Ok(sums.into_iter().map(|(id, sum)| (id, sum / UPKEEP_DIVISOR)).collect())
}

/// Deduct one period of upkeep from every player's money
pub fn charge_upkeep(world: &mut World, fields: &FieldTypeTable) -> Result<BTreeMap<PlayerId, u32>> {
    let upkeep = player_upkeep(world, fields)?;
    for (id, &amount) in &upkeep {
        if let Some(player) = world.players.get_mut(id) {
            player.money = player.money.saturating_sub(amount as i32);
        }
    }
    Ok(upkeep)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::codec::{BinaryReader, Point, Rotation4};
    use crate::config::field_type::tests::FIELDS_JSON;
    use crate::state::producer::tests::IDLE_AT_8_14;
    use crate::state::world::tests::world_with;
    use crate::state::{Field, Producer};

    pub(crate) fn building(building_id: u32, x: u8, y: u8, player_id: u8) -> Field {
        Field {
            building_id,
            x,
            y,
            rotation: Rotation4::North,
            animation: 0,
            unknown: 0,
            status: 0,
            random: 0,
            player_id,
            reserved: 0,
        }
    }

    pub(crate) fn producer_at(island: u8, x: u32, y: u32, active: bool) -> Producer {
        let mut producer = Producer::decode(&mut BinaryReader::new(&IDLE_AT_8_14)).unwrap();
        producer.island_id = island;
        producer.position = Point::new(x, y);
        producer.flags.set_active(active);
        producer
    }

    /// Players 1 and 2, island 0 holding a weaver at (1, 1) and (4, 4) owned by
    /// player 1 and a fisher at (6, 6) owned by player 2
    pub(crate) fn production_world() -> World {
        let mut world = world_with(&[1, 2], &[0]);
        let island = world.islands.get_mut(&0).unwrap();
        island.current_fields.insert(building(20100, 1, 1, 1)).unwrap();
        island.current_fields.insert(building(20100, 4, 4, 1)).unwrap();
        island.current_fields.insert(building(20101, 6, 6, 2)).unwrap();
        world.producers = vec![
            producer_at(0, 1, 1, true),
            producer_at(0, 4, 4, false),
            producer_at(0, 6, 6, true),
        ];
        world
    }

    #[test]
    fn test_upkeep_sums_by_owner() {
        let table = FieldTypeTable::from_json(FIELDS_JSON.as_bytes()).unwrap();
        let upkeep = player_upkeep(&production_world(), &table).unwrap();
        // player 1: (10 + 4) / 6, player 2: 5 / 6
        assert_eq!(upkeep, BTreeMap::from([(1, 2), (2, 0)]));
    }

    #[test]
    fn test_charge_upkeep() {
        let table = FieldTypeTable::from_json(FIELDS_JSON.as_bytes()).unwrap();
        let mut world = production_world();
        world.players.get_mut(&1).unwrap().money = 100;

        charge_upkeep(&mut world, &table).unwrap();
        assert_eq!(world.player(1).unwrap().money, 98);
        assert_eq!(world.player(2).unwrap().money, 0);
    }

    #[test]
    fn test_producer_without_building() {
        let table = FieldTypeTable::from_json(FIELDS_JSON.as_bytes()).unwrap();
        let mut world = production_world();
        world.producers.push(producer_at(0, 9, 9, true));

        let err = player_upkeep(&world, &table).unwrap_err();
        assert!(matches!(err, Error::UnresolvedReference { kind: "building", .. }));
    }

    #[test]
    fn test_building_owned_by_unknown_player() {
        let table = FieldTypeTable::from_json(FIELDS_JSON.as_bytes()).unwrap();
        let mut world = production_world();
        world.islands.get_mut(&0).unwrap().current_fields.insert(building(20100, 1, 1, 5)).unwrap();

        let err = player_upkeep(&world, &table).unwrap_err();
        assert!(matches!(err, Error::UnresolvedReference { kind: "player", id: 5 }));
    }
}

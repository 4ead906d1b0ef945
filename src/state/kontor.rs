use serde::Serialize;

use crate::codec::{BinaryReader, Point};
use crate::error::Result;
use super::good::Good;
use super::island::IslandId;
use super::player::PlayerId;
use super::world::{OnIsland, Owned, RefTables};

/// A trading post. Its goods are shared by every warehouse of the same city.
#[derive(Debug, Clone, Serialize)]
pub struct Kontor {
    pub island_id: IslandId,
    pub position: Point,
    pub player_id: PlayerId,
    pub goods: Vec<Good>,
}

impl Kontor {
    pub const SIZE: usize = 4 + Self::GOOD_SLOTS * Good::SIZE;
    pub const GOOD_SLOTS: usize = 50;
    /// Only these slots hold tradeable goods
    pub const TRADED_SLOTS: std::ops::Range<usize> = 2..25;

    pub fn read(reader: &mut BinaryReader, refs: &RefTables) -> Result<Self> {
        let island_id = refs.island(reader.read_u8()? as u32)?.id;
        let position = reader.read_point_u8()?;
        let player_id = refs.player(reader.read_u8()? as u32)?.id;

        let mut goods = Vec::with_capacity(Self::TRADED_SLOTS.len());
        for slot in 0..Self::GOOD_SLOTS {
            if Self::TRADED_SLOTS.contains(&slot) {
                goods.push(Good::read(reader)?);
            } else {
                reader.skip(Good::SIZE)?;
            }
        }

        Ok(Self { island_id, position, player_id, goods })
    }

    pub fn good(&self, good_id: u16) -> Option<&Good> {
        self.goods.iter().find(|g| g.good_id == good_id)
    }
}

impl Owned for Kontor {
    fn player_id(&self) -> PlayerId {
        self.player_id
    }
}

impl OnIsland for Kontor {
    fn island_id(&self) -> IslandId {
        self.island_id
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::codec::BinaryWriter;
    use crate::error::Error;
    use crate::state::good::tests::good_record;
    use crate::state::good::TradeAction;
    use crate::state::world::tests::world_with;

    pub(crate) fn kontor_record(island: u8, player: u8) -> Vec<u8> {
        let mut w = BinaryWriter::new();
        w.write_u8(island);
        w.write_u8(12);
        w.write_u8(30);
        w.write_u8(player);
        for slot in 0..Kontor::GOOD_SLOTS as u16 {
            // untraded slots carry an invalid action that must not be decoded
            let action = if Kontor::TRADED_SLOTS.contains(&(slot as usize)) { 1 } else { 7 };
            w.write_bytes(&good_record(slot + 100, 10, 20, action, slot));
        }
        w.into_vec()
    }

    #[test]
    fn test_read_kontor() {
        let world = world_with(&[1], &[0]);
        let data = kontor_record(0, 1);
        assert_eq!(data.len(), Kontor::SIZE);

        let mut reader = BinaryReader::new(&data);
        let kontor = Kontor::read(&mut reader, &world.refs()).unwrap();
        assert!(reader.is_empty());
        assert_eq!(kontor.position, Point::new(12, 30));
        assert_eq!(kontor.goods.len(), 23);
        assert_eq!(kontor.goods[0].good_id, 102);
        assert_eq!(kontor.goods[22].good_id, 124);
        assert!(kontor.goods.iter().all(|g| g.action == TradeAction::Sell));
        assert!(kontor.good(101).is_none());
        assert_eq!(world.owner(&kontor).map(|p| p.id), Some(1));
    }

    #[test]
    fn test_kontor_unresolved_references() {
        let world = world_with(&[1], &[0]);
        let err = Kontor::read(&mut BinaryReader::new(&kontor_record(0, 2)), &world.refs()).unwrap_err();
        assert!(matches!(err, Error::UnresolvedReference { kind: "player", id: 2 }));
        let err = Kontor::read(&mut BinaryReader::new(&kontor_record(5, 1)), &world.refs()).unwrap_err();
        assert!(matches!(err, Error::UnresolvedReference { kind: "island", id: 5 }));
    }
}

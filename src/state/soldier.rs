use serde::Serialize;

use crate::codec::{BinaryReader, Point, Rotation8};
use crate::error::Result;
use super::player::PlayerId;
use super::world::{Owned, RefTables};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SoldierKind {
    Swordsman,
    Cavalry,
    Musketeer,
    Gunner,
    Native,
}

impl SoldierKind {
    pub fn from_u16(v: u16) -> Option<Self> {
        match v {
            0 => Some(Self::Swordsman),
            1 => Some(Self::Cavalry),
            2 => Some(Self::Musketeer),
            3 => Some(Self::Gunner),
            8 => Some(Self::Native),
            _ => None,
        }
    }
}

/// A land unit
#[derive(Debug, Clone, Serialize)]
pub struct Soldier {
    pub id: u16,
    pub player_id: PlayerId,
    pub kind: Option<SoldierKind>,
    pub kind_raw: u16,
    /// Whole tiles, rounded down
    pub position: Point,
    /// As stored, in half-tile steps
    pub position_half: Point,
    pub rotation: Rotation8,
    pub hit_points: u16,
    pub patrolling: bool,
    /// Undecoded movement words
    pub courses: [u32; 3],
    #[serde(skip)]
    pub reserved: Vec<u8>,
}

impl Soldier {
    pub const SIZE: usize = 68;

    pub fn read(reader: &mut BinaryReader, refs: &RefTables) -> Result<Self> {
        let mut reserved = Vec::new();

        let half = reader.read_point_u16()?;
        let hit_points = reader.read_u16_le()?;
        let kind_raw = reader.read_u16_le()?;
        let id = reader.read_u16_le()?;
        let course1 = reader.read_u32_le()?;
        reader.read_reserved(10, &mut reserved)?;
        let player_id = refs.player(reader.read_u8()? as u32)?.id;
        reader.read_reserved(2, &mut reserved)?;
        let rotation = Rotation8::decode("soldier rotation", reader.read_u8()? as u16)?;
        reader.read_reserved(1, &mut reserved)?;
        let patrolling = reader.read_bool()?;
        let course2 = reader.read_u32_le()?;
        let course3 = reader.read_u32_le()?;
        reader.read_reserved(30, &mut reserved)?;

        Ok(Self {
            id,
            player_id,
            kind: SoldierKind::from_u16(kind_raw),
            kind_raw,
            position: Point::new(half.x / 2, half.y / 2),
            position_half: half,
            rotation,
            hit_points,
            patrolling,
            courses: [course1, course2, course3],
            reserved,
        })
    }
}

impl Owned for Soldier {
    fn player_id(&self) -> PlayerId {
        self.player_id
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::codec::BinaryWriter;
    use crate::error::Error;
    use crate::state::world::tests::world_with;

    pub(crate) fn soldier_record(player: u8, kind: u16) -> Vec<u8> {
        let mut w = BinaryWriter::new();
        w.write_u16_le(41);
        w.write_u16_le(80);
        w.write_u16_le(100);
        w.write_u16_le(kind);
        w.write_u16_le(9);
        w.write_u32_le(0);
        w.write_zeroes(10);
        w.write_u8(player);
        w.write_zeroes(2);
        w.write_u8(6);
        w.write_u8(0);
        w.write_u8(1);
        w.write_u32_le(0);
        w.write_u32_le(0);
        w.write_zeroes(30);
        w.into_vec()
    }

    #[test]
    fn test_read_soldier() {
        let world = world_with(&[3], &[]);
        let data = soldier_record(3, 2);
        assert_eq!(data.len(), Soldier::SIZE);

        let mut reader = BinaryReader::new(&data);
        let soldier = Soldier::read(&mut reader, &world.refs()).unwrap();
        assert!(reader.is_empty());
        assert_eq!(soldier.id, 9);
        assert_eq!(soldier.kind, Some(SoldierKind::Musketeer));
        assert_eq!(soldier.position, Point::new(20, 40));
        assert_eq!(soldier.rotation, Rotation8::West);
        assert!(soldier.patrolling);
        assert_eq!(soldier.hit_points, 100);
    }

    #[test]
    fn test_odd_half_tile_position_is_kept() {
        let world = world_with(&[3], &[]);
        let mut data = soldier_record(3, 0);
        data[..4].copy_from_slice(&[41, 0, 81, 0]);

        let soldier = Soldier::read(&mut BinaryReader::new(&data), &world.refs()).unwrap();
        assert_eq!(soldier.position, Point::new(20, 40));
        assert_eq!(soldier.position_half, Point::new(41, 81));
    }

    #[test]
    fn test_unknown_soldier_kind_is_kept_raw() {
        let world = world_with(&[3], &[]);
        let soldier = Soldier::read(&mut BinaryReader::new(&soldier_record(3, 5)), &world.refs()).unwrap();
        assert_eq!(soldier.kind, None);
        assert_eq!(soldier.kind_raw, 5);
    }

    #[test]
    fn test_soldier_unresolved_player() {
        let world = world_with(&[3], &[]);
        let err = Soldier::read(&mut BinaryReader::new(&soldier_record(0, 0)), &world.refs()).unwrap_err();
        assert!(matches!(err, Error::UnresolvedReference { kind: "player", id: 0 }));
    }
}

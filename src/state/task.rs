use serde::Serialize;

use crate::codec::BinaryReader;
use crate::error::Result;

/// A mission objective text
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Task {
    /// Position in the task list, referenced by `Player::assigned_task_id`
    pub id: usize,
    /// Not validated against the player table; the layout of this record is uncertain
    pub player_id: u32,
    pub text: String,
    #[serde(skip)]
    pub reserved: Vec<u8>,
}

impl Task {
    pub const SIZE: usize = 2244;

    pub fn read(reader: &mut BinaryReader, id: usize) -> Result<Self> {
        let player_id = reader.read_u32_le()?;
        let mut reserved = Vec::new();
        reader.read_reserved(100, &mut reserved)?;
        let text = reader.read_fixed_string(2140)?;
        Ok(Self { id, player_id, text, reserved })
    }
}

use serde::Serialize;

use crate::codec::BinaryReader;
use crate::error::Result;

/// One entry of the free trader's price list; only the good id is understood
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TraderGood {
    pub good_id: u32,
    pub values: [u32; 2],
}

/// The free trader
#[derive(Debug, Clone, Serialize)]
pub struct Trader {
    pub goods: Vec<TraderGood>,
    #[serde(skip)]
    pub reserved: Vec<u8>,
}

impl Trader {
    pub const SIZE: usize = 604;
    pub const GOOD_SLOTS: usize = 24;

    pub fn read(reader: &mut BinaryReader) -> Result<Self> {
        let mut reserved = Vec::new();
        reader.read_reserved(4 + 20, &mut reserved)?;

        let mut goods = Vec::with_capacity(Self::GOOD_SLOTS);
        for _ in 0..Self::GOOD_SLOTS {
            goods.push(TraderGood {
                good_id: reader.read_u32_le()?,
                values: [reader.read_u32_le()?, reader.read_u32_le()?],
            });
        }
        reader.read_reserved(292, &mut reserved)?;

        Ok(Self { goods, reserved })
    }
}

use serde::Serialize;

use crate::codec::{bits, BinaryReader, GoodAmount};
use crate::error::{Error, Result};

/// What a trading post does with a good
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum TradeAction {
    #[default]
    None,
    Sell,
    Buy,
}

impl TradeAction {
    pub fn from_bits(v: u32) -> Result<Self> {
        match v {
            0 => Ok(Self::None),
            1 => Ok(Self::Sell),
            2 => Ok(Self::Buy),
            v => Err(Error::unexpected("trade action", v)),
        }
    }
}

/// One good slot of a trading post
///
/// The leading word packs sell price(10) | buy price(10) | action(12).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Good {
    pub good_id: u16,
    pub sell_price: u16,
    pub buy_price: u16,
    pub action: TradeAction,
    pub wanted_sell: GoodAmount,
    pub wanted_buy: GoodAmount,
    pub current: GoodAmount,
    /// The word after the packed prices, then the two words around the id
    #[serde(skip)]
    pub reserved: [u8; 8],
}

impl Good {
    pub const SIZE: usize = 20;

    pub fn read(reader: &mut BinaryReader) -> Result<Self> {
        let mut reserved = [0u8; 8];
        let packed = reader.read_u32_le()?;
        reserved[..4].copy_from_slice(reader.read_bytes(4)?);
        let wanted_sell = reader.read_amount()?;
        let wanted_buy = reader.read_amount()?;
        let current = reader.read_amount()?;
        reserved[4..6].copy_from_slice(reader.read_bytes(2)?);
        let good_id = reader.read_u16_le()?;
        reserved[6..].copy_from_slice(reader.read_bytes(2)?);

        Ok(Self {
            good_id,
            sell_price: bits(packed, 0, 10) as u16,
            buy_price: bits(packed, 10, 10) as u16,
            action: TradeAction::from_bits(bits(packed, 20, 12))?,
            wanted_sell,
            wanted_buy,
            current,
            reserved,
        })
    }
}

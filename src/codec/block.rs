//! Container framing.
//!
//! A container is a flat run of `{tag: 16 bytes}{length: u32}{payload}` blocks
//! with no header, checksum or padding. The only nesting is positional:
//! `INSELHAUS` building overlays belong to the `INSEL5` block read before them.

use bytes::Bytes;
use indexmap::IndexMap;
use tracing::debug;

use crate::codec::BinaryReader;
use crate::error::{Error, Result};

pub const TAG_LEN: usize = 16;

pub const ISLAND_TAG: &str = "INSEL5";
pub const ISLAND_OVERLAY_TAG: &str = "INSELHAUS";

/// One tagged, length-prefixed span of a container
#[derive(Debug, Clone)]
pub struct Block {
    pub tag: String,
    pub data: Bytes,
}

impl Block {
    /// Read one block header and slice its payload out of `source`.
    /// `reader` must be positioned inside `source`; it is advanced past the
    /// payload whether or not the payload is later consumed.
    pub fn read(reader: &mut BinaryReader, source: &Bytes) -> Result<Self> {
        let tag = reader.read_fixed_string(TAG_LEN)?;
        let declared = reader.read_u32_le()? as usize;
        if declared > reader.remaining() {
            return Err(Error::BlockOverrun {
                tag,
                declared,
                remaining: reader.remaining(),
            });
        }
        let start = reader.position();
        reader.skip(declared)?;
        Ok(Self {
            tag,
            data: source.slice(start..start + declared),
        })
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// A fresh cursor over the payload
    pub fn reader(&self) -> BinaryReader<'_> {
        BinaryReader::new(&self.data)
    }

    /// Number of fixed-size records in the payload, rejecting a trailing partial record
    pub fn record_count(&self, record: usize) -> Result<usize> {
        if self.data.len() % record != 0 {
            return Err(Error::MisalignedBlock {
                tag: self.tag.clone(),
                len: self.data.len(),
                record,
            });
        }
        Ok(self.data.len() / record)
    }
}

/// An island block with the overlay blocks that followed it
#[derive(Debug, Clone)]
pub struct IslandBlock {
    pub block: Block,
    pub overlays: Vec<Block>,
}

/// A framed container: blocks grouped by tag in first-seen order, islands kept apart.
#[derive(Debug, Clone, Default)]
pub struct Container {
    blocks: IndexMap<String, Vec<Block>>,
    islands: Vec<IslandBlock>,
}

impl Container {
    pub fn parse(data: impl Into<Bytes>) -> Result<Self> {
        let source: Bytes = data.into();
        let mut reader = BinaryReader::new(&source);
        let mut container = Self::default();

        while !reader.is_empty() {
            let block = Block::read(&mut reader, &source)?;
            debug!(tag = %block.tag, len = block.len(), "framed block");
            container.push(block)?;
        }

        Ok(container)
    }

    fn push(&mut self, block: Block) -> Result<()> {
        match block.tag.as_str() {
            ISLAND_TAG => self.islands.push(IslandBlock { block, overlays: Vec::new() }),
            ISLAND_OVERLAY_TAG => self
                .islands
                .last_mut()
                .ok_or(Error::OrphanOverlay)?
                .overlays
                .push(block),
            _ => self.blocks.entry(block.tag.clone()).or_default().push(block),
        }
        Ok(())
    }

    /// All blocks with `tag`; empty if the tag never occurs.
    pub fn blocks(&self, tag: &str) -> &[Block] {
        self.blocks.get(tag).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn first(&self, tag: &str) -> Option<&Block> {
        self.blocks(tag).first()
    }

    /// First block with `tag` that carries a payload
    pub fn first_non_empty(&self, tag: &str) -> Option<&Block> {
        self.blocks(tag).iter().find(|b| !b.is_empty())
    }

    pub fn islands(&self) -> &[IslandBlock] {
        &self.islands
    }

    /// Tags and block counts in first-seen order, islands excluded
    pub fn tags(&self) -> impl Iterator<Item = (&str, usize)> {
        self.blocks.iter().map(|(tag, blocks)| (tag.as_str(), blocks.len()))
    }
}

use std::collections::BTreeSet;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;
use tracing::{debug, info};

use crate::codec::Point;
use crate::config::FieldTypeTable;
use crate::error::{Error, Result};
use crate::state::field::read_overlay;
use crate::state::{Island, IslandId, IslandTemplate, World, WorldGenerationSettings};
use super::terrain::{climate_dir, TerrainEntry, TerrainLoader};

/// An island placed from a template
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedIsland {
    pub id: IslandId,
    pub template_num: u8,
    /// Terrain file the island was sampled from
    pub source: String,
}

/// Expands scenario island templates into concrete islands
pub struct WorldGenerator<'a> {
    terrain: TerrainLoader<'a>,
    fields: &'a FieldTypeTable,
}

impl<'a> WorldGenerator<'a> {
    pub fn new(terrain: TerrainLoader<'a>, fields: &'a FieldTypeTable) -> Self {
        Self { terrain, fields }
    }

    /// Place one island per template whose slot is still free.
    ///
    /// Templates are handled in order; each new island takes the smallest
    /// unused id at the time it is placed. A slot counts as taken only when
    /// the world held that island before generation started.
    pub async fn populate<R: Rng + ?Sized>(
        &self,
        world: &mut World,
        settings: &WorldGenerationSettings,
        rng: &mut R,
    ) -> Result<Vec<GeneratedIsland>> {
        let concrete: BTreeSet<IslandId> = world.islands.keys().copied().collect();
        let mut generated = Vec::new();
        for template in &settings.templates {
            if concrete.contains(&template.num) {
                debug!(slot = template.num, "template slot already has an island");
                continue;
            }
            let island = self.generate(world, template, rng).await?;
            info!(
                slot = template.num,
                island = island.id,
                source = %island.source,
                "generated island"
            );
            generated.push(island);
        }
        Ok(generated)
    }

    async fn generate<R: Rng + ?Sized>(
        &self,
        world: &mut World,
        template: &IslandTemplate,
        rng: &mut R,
    ) -> Result<GeneratedIsland> {
        let candidates = self.terrain.candidates(template.size, template.climate).await?;
        let entry = candidates.choose(rng).ok_or_else(|| Error::MissingResource {
            path: format!(
                "{}/{}??.scp",
                climate_dir(template.climate.climates()[0]),
                template.size.code()
            ),
        })?;

        let id = world
            .next_island_id()
            .ok_or_else(|| Error::unexpected("island count", world.islands.len() as u64))?;
        let island = self.build_island(id, template.position, entry).await?;
        world.islands.insert(id, island);

        Ok(GeneratedIsland { id, template_num: template.num, source: entry.path.clone() })
    }

    async fn build_island(&self, id: IslandId, position: Point, entry: &TerrainEntry) -> Result<Island> {
        if position.x > u16::MAX as u32 || position.y > u16::MAX as u32 {
            return Err(Error::unexpected("template position", (position.x as u64) << 32 | position.y as u64));
        }

        let file = self.terrain.load(&entry.path).await?;
        let block = file.island_block()?;
        let mut island = Island::read(&mut block.block.reader())?;
        island.id = id;
        island.position = position;
        island.climate = entry.climate;
        island.base_island_number = entry.number;
        island.differs_from_base = false;

        // Library files mix terrain and pre-placed buildings in their overlays
        for overlay in &block.overlays {
            for field in read_overlay(overlay)? {
                if self.fields.require(field.building_id)?.kind.is_ground() {
                    island.base_fields.insert(field)?;
                } else {
                    island.current_fields.insert(field)?;
                }
            }
        }
        Ok(island)
    }
}

use std::collections::BTreeMap;

use serde::Serialize;

use crate::codec::GoodAmount;
use crate::config::{FieldTypeTable, ProductionParams};
use crate::error::{Error, Result};
use crate::state::{Field, Island, IslandId, Producer};

/// Ticks an idle producer waits before checking its inputs again
pub const RETRY_TICKS: u16 = 11;

/// What one production tick did to a producer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StepOutcome {
    /// A cycle finished and one ton was added to the output stock
    Completed { continues: bool },
    /// Enough input was on hand and a new cycle began
    Started,
    /// Inputs were checked and found lacking
    Starved,
    /// Only the timer moved
    Waiting,
}

fn count_down(timer: u16) -> u16 {
    if timer <= 1 { RETRY_TICKS } else { timer - 1 }
}

/// Advance one producer by one production tick.
///
/// `cnt_production` is the global production counter; idle producers also
/// check their inputs whenever it is 0. The active flag only decides whether
/// a new cycle may start.
pub fn step(producer: &mut Producer, params: &ProductionParams, cnt_production: u8) -> StepOutcome {
    let amount1 = GoodAmount::from_tons(params.amount1);
    let amount2 = GoodAmount::from_tons(params.amount2);
    let max_stock = GoodAmount::from_tons(params.max_stock);
    let one_ton = GoodAmount::from_tons(1);

    if producer.is_producing() && producer.timer == 1 {
        let continues = producer.active()
            && producer.first_good_stock >= GoodAmount::from_tons(params.amount1.saturating_mul(2))
            && producer.second_good_stock >= GoodAmount::from_tons(params.amount2.saturating_mul(2))
            && producer.stock < max_stock.saturating_sub(one_ton);

        producer.stock = producer.stock.saturating_add(one_ton);
        producer.prod_count = producer.prod_count.saturating_add(one_ton);
        producer.first_good_stock = producer.first_good_stock.saturating_sub(amount1);
        // unverified: the game may not consume the second input here
        producer.second_good_stock = producer.second_good_stock.saturating_sub(amount2);
        producer.timer = if continues { params.interval } else { RETRY_TICKS };
        producer.set_producing(continues);
        producer.status.set_no_good_count(0);
        producer.status.set_produced(true);
        return StepOutcome::Completed { continues };
    }

    if !producer.is_producing() && (producer.timer == 1 || cnt_production == 0) && producer.active() {
        let can_produce = producer.first_good_stock >= amount1
            && producer.second_good_stock >= amount2
            && producer.stock < max_stock;
        if can_produce {
            producer.timer = params.interval;
            producer.set_producing(true);
            producer.status.set_produced(false);
            return StepOutcome::Started;
        }
        if producer.timer <= 1 {
            let failures = producer.status.no_good_count().saturating_add(1);
            producer.status.set_no_good_count(failures);
        }
        producer.timer = count_down(producer.timer);
        return StepOutcome::Starved;
    }

    producer.timer = count_down(producer.timer);
    StepOutcome::Waiting
}

/// The building field a producer sits on
pub(crate) fn building_of<'w>(
    islands: &'w BTreeMap<IslandId, Island>,
    producer: &Producer,
) -> Result<&'w Field> {
    let island = islands.get(&producer.island_id).ok_or(Error::UnresolvedReference {
        kind: "island",
        id: producer.island_id as u32,
    })?;
    island.building_at(producer.position).ok_or(Error::UnresolvedReference {
        kind: "building",
        id: producer.position.x << 8 | producer.position.y,
    })
}

/// Counts of one production pass over a world
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ProductionReport {
    pub stepped: usize,
    pub completed: usize,
    pub started: usize,
    pub starved: usize,
}

/// Step every producer once
pub fn step_all(
    producers: &mut [Producer],
    islands: &BTreeMap<IslandId, Island>,
    fields: &FieldTypeTable,
    cnt_production: u8,
) -> Result<ProductionReport> {
    let mut report = ProductionReport::default();
    for producer in producers.iter_mut() {
        let building = building_of(islands, producer)?;
        let Some(params) = fields.require(building.building_id)?.production.as_ref() else {
            continue;
        };
        match step(producer, params, cnt_production) {
            StepOutcome::Completed { .. } => report.completed += 1,
            StepOutcome::Started => report.started += 1,
            StepOutcome::Starved => report.starved += 1,
            StepOutcome::Waiting => {}
        }
        report.stepped += 1;
    }
    Ok(report)
}

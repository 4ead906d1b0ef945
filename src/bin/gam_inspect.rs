use std::path::{Path, PathBuf};

use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;

use gam_world::codec::Container;
use gam_world::config::FieldTypeTable;
use gam_world::loader::{DirStorage, Storage, WorldLoader, ZipStorage};
use gam_world::simulation::TickExecutor;
use gam_world::state::World;

#[derive(Parser)]
#[command(name = "gam-inspect")]
#[command(about = "Load a save or scenario and print what it contains")]
struct Cli {
    /// Save or scenario file
    file: PathBuf,

    /// Game data directory or zip archive holding the island library
    #[arg(long)]
    data: PathBuf,

    /// Field definitions as JSON
    #[arg(long)]
    fields: Option<PathBuf>,

    /// Seed for the island choice of generated scenarios
    #[arg(long)]
    seed: Option<u64>,

    /// Dump the whole world as JSON
    #[arg(long)]
    json: bool,

    /// Only list the container's blocks
    #[arg(long)]
    blocks: bool,

    /// Game ticks to simulate after loading (needs --fields)
    #[arg(long, default_value_t = 0)]
    ticks: u32,
}

async fn open_storage(path: &Path) -> gam_world::Result<Box<dyn Storage>> {
    let is_zip = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("zip"));
    if is_zip {
        Ok(Box::new(ZipStorage::open(path).await?))
    } else {
        Ok(Box::new(DirStorage::new(path)))
    }
}

fn print_blocks(container: &Container) {
    for (tag, count) in container.tags() {
        println!("{tag:<16} {count}");
    }
    for (i, island) in container.islands().iter().enumerate() {
        println!("INSEL5 #{i:<9} {} overlays", island.overlays.len());
    }
}

fn print_summary(world: &World) {
    if !world.name.is_empty() {
        println!("Name: {}", world.name);
    }
    if let Some(scenario) = &world.scenario {
        println!(
            "Scenario: ranking={:?} campaign={:?} mission={:?}",
            scenario.ranking, scenario.campaign, scenario.mission_number
        );
    }

    println!("Players: {}", world.players.len());
    for player in world.players.values() {
        println!(
            "  #{} {:?} {:?} money={} cities={} ships={}",
            player.id,
            player.kind,
            player.name,
            player.money,
            world.cities_of(player.id).count(),
            world.ships_of(player.id).count(),
        );
    }

    println!("Islands: {}", world.islands.len());
    for island in world.islands.values() {
        println!(
            "  #{} {}x{} at ({}, {}) {:?} base={} fields={}/{}",
            island.id,
            island.width,
            island.height,
            island.position.x,
            island.position.y,
            island.climate,
            island.base_island_number,
            island.base_fields.len(),
            island.current_fields.len(),
        );
    }

    println!("Cities: {}", world.cities.len());
    println!("Kontors: {}", world.kontors.len());
    println!("Ships: {}", world.ships.len());
    println!("Soldiers: {}", world.soldiers.len());
    println!("Castles: {}", world.castles.len());
    println!("Producers: {}", world.producers.len());
    println!("Houses: {}", world.houses.len());
    println!("Farm fields: {}", world.farm_fields.len());
    println!("Tasks: {}", world.tasks.len());
    if let Some(generation) = &world.generation {
        println!("Island templates: {}", generation.templates.len());
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let data = tokio::fs::read(&cli.file).await?;

    if cli.blocks {
        print_blocks(&Container::parse(data)?);
        return Ok(());
    }

    let fields = match &cli.fields {
        Some(path) => FieldTypeTable::from_json(&tokio::fs::read(path).await?)?,
        None => FieldTypeTable::new(),
    };
    let storage = open_storage(&cli.data).await?;
    let loader = WorldLoader::new(storage.as_ref(), &fields);

    let mut world = match cli.seed {
        Some(seed) => loader.load_with_rng(data, &mut StdRng::seed_from_u64(seed)).await?,
        None => loader.load(data).await?,
    };

    if cli.ticks > 0 {
        let mut executor = TickExecutor::new(&fields, &world);
        let results = executor.run(&mut world, cli.ticks)?;
        let completed: usize = results
            .iter()
            .filter_map(|r| r.production)
            .map(|p| p.completed)
            .sum();
        eprintln!("simulated {} ticks, {completed} production cycles completed", cli.ticks);
    }

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&world)?);
    } else {
        print_summary(&world);
    }
    Ok(())
}

use clap::{Parser, Subcommand};
use std::fs;
use std::path::PathBuf;
use streetsim_worldgen::world_loader::{self, WorldLayout, WorldLoader};
use streetsim_worldgen::world_mesh::WorldMeshGenerator;
use streetsim_worldgen::{World, WorldGenConfig};
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Override log level (trace|debug|info|warn|error)
    #[arg(short, long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print a summary of a world file
    Info {
        /// Path to a world file (.yaml, .json or .msgpack)
        world_file: PathBuf,
    },
    /// Run the generation pipeline against a world file
    Generate {
        /// Path to a world file (.yaml, .json or .msgpack)
        world_file: PathBuf,

        /// Path to a worldgen.toml with fallback generation settings
        #[arg(short, long, default_value = "./worldgen.toml")]
        config: String,

        /// Override the random seed stored in the world file
        #[arg(long)]
        seed: Option<u64>,

        /// Export the generated layout as a Wavefront OBJ mesh
        #[arg(long)]
        obj: Option<PathBuf>,

        /// Write the derived layout cache next to the world file
        #[arg(long)]
        write_cache: bool,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let log_level = args.log_level.clone().unwrap_or_else(|| "info".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .init();

    match args.command {
        Command::Info { world_file } => {
            let world = WorldLoader::load_from_file(&world_file)?;
            println!("World: {}", world.name);
            println!("  Points:   {}", world.points.len());
            println!("  Segments: {}", world.segments.len());
            println!("  Seed:     {}", world.seed);
            match &world.settings {
                Some(settings) => println!(
                    "  Settings: road width {}, building width {}, tree count {}",
                    settings.roads.width, settings.buildings.width, settings.trees.count
                ),
                None => println!("  Settings: none embedded (tool defaults apply)"),
            }
        }
        Command::Generate {
            world_file,
            config,
            seed,
            obj,
            write_cache,
        } => {
            let file = WorldLoader::load_from_file(&world_file)?;
            info!("Loaded world '{}' from {}", file.name, world_file.display());

            let settings = file
                .settings
                .clone()
                .unwrap_or_else(|| WorldGenConfig::load_or_default(&config));
            let seed = seed.unwrap_or(file.seed);

            let graph = WorldLoader::build_graph(&file);
            let mut world = World::new(settings, seed);
            world.generate(&graph);

            println!("Generated '{}' (seed {}):", file.name, seed);
            println!("  Road envelopes: {}", world.road_envelopes().len());
            println!("  Border segments: {}", world.road_borders().len());
            println!("  Buildings:      {}", world.buildings().len());
            println!("  Trees:          {}", world.trees().len());
            println!("  Lane guides:    {}", world.lane_guides().len());

            if let Some(obj_path) = obj {
                let mesh = WorldMeshGenerator::generate_mesh(&world);
                fs::write(&obj_path, WorldMeshGenerator::export_obj(&mesh))?;
                println!("  Mesh written to {}", obj_path.display());
            }

            if write_cache {
                let layout = WorldLayout::from_world(&world);
                world_loader::save_layout_cache(&world_file, &layout)?;
                println!(
                    "  Layout cache written to {}",
                    world_loader::layout_cache_path(&world_file).display()
                );
            }
        }
    }

    Ok(())
}

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tile_io::{read_tiles, BinaryReader, PlaceholderRegistry, StaticRegistry, TileGrid, TypeDirectory};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tile-inspect")]
#[command(about = "Inspect a saved foreign tile section")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the tile and wall directory
    Directory { file: PathBuf },
    /// Decode the section into an empty grid
    Decode {
        file: PathBuf,

        #[arg(long)]
        width: u32,

        #[arg(long)]
        height: u32,

        /// Registry manifest (JSON); without one every entry becomes a placeholder
        #[arg(long)]
        registry: Option<PathBuf>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    let args = Args::parse();
    match args.command {
        Command::Directory { file } => {
            let data = std::fs::read(&file)?;
            let directory = TypeDirectory::read(&mut BinaryReader::new(&data))?;

            println!("tiles: {}", directory.tiles.len());
            for entry in &directory.tiles {
                let fi = if entry.frame_important { " (frame important)" } else { "" };
                println!("  {:5} {}{}", entry.saved_id, entry.content, fi);
            }
            println!("walls: {}", directory.walls.len());
            for entry in &directory.walls {
                println!("  {:5} {}", entry.saved_id, entry.content);
            }
        }
        Command::Decode { file, width, height, registry } => {
            let registry = match registry {
                Some(path) => StaticRegistry::from_json(&std::fs::read_to_string(path)?)?,
                None => StaticRegistry::default(),
            };
            let data = std::fs::read(&file)?;
            let mut reader = BinaryReader::new(&data);
            let mut grid = TileGrid::new(width, height);
            let mut placeholders = PlaceholderRegistry::new();

            let report = read_tiles(&mut reader, &mut grid, &registry, &mut placeholders)?;
            println!("{:#?}", report);
            if !reader.is_empty() {
                println!("{} trailing bytes", reader.remaining());
            }
            for (id, identity) in placeholders.iter().enumerate() {
                match identity.frame {
                    Some((fx, fy)) => println!("  placeholder {:4} {} frame ({}, {})", id, identity.content, fx, fy),
                    None => println!("  placeholder {:4} {}", id, identity.content),
                }
            }
        }
    }

    Ok(())
}

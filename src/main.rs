mod config;
mod driver;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tessel_world::BlockPosition;

use config::TesselConfig;

#[derive(Parser, Debug)]
#[command(name = "tessel", version, about = "Chunked voxel world editing and meshing")]
struct Cli {
    /// Runtime configuration file
    #[arg(long, default_value = "tessel.toml")]
    config: PathBuf,

    /// Block definitions; overrides `blocks_path` from the config
    #[arg(long)]
    blocks: Option<PathBuf>,

    /// Chunk edge length as a power of two; overrides `world.grid_bits`
    #[arg(long)]
    grid_bits: Option<i32>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fill a cuboid with one block type and remesh it
    Fill {
        #[arg(long, value_parser = parse_position, allow_hyphen_values = true)]
        from: BlockPosition,
        #[arg(long, value_parser = parse_position, allow_hyphen_values = true)]
        to: BlockPosition,
        #[arg(long)]
        block: String,
    },
    /// Fill a cuboid from 3D noise and remesh it
    Noise {
        #[arg(long, value_parser = parse_position, allow_hyphen_values = true)]
        from: BlockPosition,
        #[arg(long, value_parser = parse_position, allow_hyphen_values = true)]
        to: BlockPosition,
        #[arg(long)]
        block: String,
        #[arg(long, default_value_t = 1337)]
        seed: i32,
    },
    /// Build a demo region, save it, reload it and compare
    Roundtrip {
        #[arg(long, default_value = "stone")]
        block: String,
        #[arg(long, default_value_t = 1337)]
        seed: i32,
    },
}

fn parse_position(s: &str) -> Result<BlockPosition, String> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    if parts.len() != 3 {
        return Err(format!("expected x,y,z but got `{s}`"));
    }
    let mut v = [0i32; 3];
    for (slot, part) in v.iter_mut().zip(&parts) {
        *slot = part
            .parse()
            .map_err(|e| format!("bad coordinate `{part}`: {e}"))?;
    }
    Ok(BlockPosition::new(v[0], v[1], v[2]))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let mut cfg = TesselConfig::load_or_default(&cli.config)?;
    if let Some(path) = cli.blocks {
        cfg.blocks_path = path;
    }
    if let Some(bits) = cli.grid_bits {
        cfg.world.grid_bits = bits;
    }

    let session = driver::Session::open(&cfg)?;
    match cli.command {
        Command::Fill { from, to, block } => session.fill(from, to, &block)?,
        Command::Noise {
            from,
            to,
            block,
            seed,
        } => session.noise(from, to, &block, seed)?,
        Command::Roundtrip { block, seed } => session.roundtrip(&block, seed)?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positions_parse_with_negatives_and_spaces() {
        assert_eq!(parse_position("1,-2, 3"), Ok(BlockPosition::new(1, -2, 3)));
        assert!(parse_position("1,2").is_err());
        assert!(parse_position("1,x,3").is_err());
    }

    #[test]
    fn cli_overrides_parse() {
        let cli = Cli::try_parse_from([
            "tessel",
            "--grid-bits",
            "3",
            "fill",
            "--from",
            "-4,0,-4",
            "--to",
            "4,2,4",
            "--block",
            "stone",
        ])
        .unwrap();
        assert_eq!(cli.grid_bits, Some(3));
        match cli.command {
            Command::Fill { from, to, block } => {
                assert_eq!(from, BlockPosition::new(-4, 0, -4));
                assert_eq!(to, BlockPosition::new(4, 2, 4));
                assert_eq!(block, "stone");
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}

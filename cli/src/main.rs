use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use digsite_core::{
    Cell, DigSite, LayoutGenerator, RandomLayoutGenerator, SiteState, StrikeOutcome, Tool,
    compute_pattern,
};
use std::path::PathBuf;

mod config;
mod render;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    /// Site description (TOML), the built-in site is used when omitted
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Force a seed instead of random
    #[arg(short, long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a treasure layout and print it
    Layout {
        /// Print the layout as JSON instead of a grid
        #[arg(long)]
        json: bool,
    },
    /// Print the cells a tool affects around a cell
    Pattern {
        /// pickaxe | hammer
        #[arg(short, long, default_value = "pickaxe", value_parser = parse_tool)]
        tool: Tool,

        /// Target cell as `x,y`
        #[arg(long, default_value = "0,0", value_parser = parse_cell)]
        at: Cell,
    },
    /// Strike a generated site and report the score
    Play {
        /// Strikes as `tool@x,y`, applied in order
        #[arg(value_parser = parse_strike, required = true)]
        strikes: Vec<(Tool, Cell)>,
    },
}

fn parse_tool(s: &str) -> Result<Tool, String> {
    s.parse()
        .map_err(|()| format!("unknown tool {s:?}, expected pickaxe or hammer"))
}

fn parse_cell(s: &str) -> Result<Cell, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected x,y but got {s:?}"))?;
    let coord = |part: &str| {
        part.trim()
            .parse::<i32>()
            .map_err(|err| format!("bad coordinate {part:?}: {err}"))
    };
    Ok((coord(x)?, coord(y)?))
}

fn parse_strike(s: &str) -> Result<(Tool, Cell), String> {
    let (tool, cell) = s
        .split_once('@')
        .ok_or_else(|| format!("expected tool@x,y but got {s:?}"))?;
    Ok((parse_tool(tool)?, parse_cell(cell)?))
}

fn clock_seed() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_nanos() as u64)
}

fn main() -> Result<()> {
    let args = Args::parse();
    env_logger::Builder::new()
        .filter_level(args.verbose.log_level_filter())
        .init();

    let seed = args.seed.unwrap_or_else(clock_seed);
    log::info!("seed: {}", seed);

    match args.command {
        Command::Pattern { tool, at } => {
            let profile = tool.profile();
            let pattern = compute_pattern(at, profile.power, profile.resistance);
            for entry in &pattern {
                println!("{:?} power {}", entry.cell, entry.power);
            }
            print!("{}", render::pattern(&pattern));
        }
        Command::Layout { json } => {
            let site = config::load(args.config.as_deref())?;
            let layout = RandomLayoutGenerator::new(seed)
                .generate(&site.config, &site.pool)
                .context("Could not generate layout")?;
            if json {
                println!("{}", serde_json::to_string_pretty(&layout)?);
            } else {
                print!("{}", render::layout(&layout));
            }
        }
        Command::Play { strikes } => {
            let loaded = config::load(args.config.as_deref())?;
            let mut site = DigSite::generate(&loaded.config, &loaded.pool, seed)
                .context("Could not generate dig site")?;
            print!("{}", render::site(&site));

            let mut outcome = StrikeOutcome::NoChange;
            for (tool, cell) in strikes {
                if site.is_finished() {
                    log::warn!("Site finished, ignoring remaining strikes");
                    break;
                }
                let result = site
                    .strike(cell, tool.profile())
                    .with_context(|| format!("{}@{},{}", tool.name(), cell.0, cell.1))?;
                println!(
                    "{}@{},{} -> {:?} (stability {}, score {})",
                    tool.name(),
                    cell.0,
                    cell.1,
                    result,
                    site.stability(),
                    site.score()
                );
                outcome = outcome | result;
            }

            print!("{}", render::site(&site));
            println!(
                "state {:?}, score {} of {}",
                site.state(),
                site.score(),
                site.layout().total_score()
            );
            if site.state() == SiteState::Collapsed {
                bail!("The wall collapsed");
            }
            log::debug!("merged outcome: {:?}", outcome);
        }
    }

    Ok(())
}

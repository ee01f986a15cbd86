use std::error::Error;
use std::io::Read;
use std::str::FromStr;

use clap::{Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use valve_pressure::{DuoSearch, Handoff, SearchConfig, ShortestPaths, SoloSearch, Volcano};

const PART1_MINUTES: i64 = 30;
const PART2_MINUTES: i64 = 26;

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Part {
    Part1,
    Part2,
    Both,
}

/// Release as much pressure as possible from the valves described on stdin.
#[derive(Parser, Debug)]
struct Args {
    #[arg(value_enum, default_value_t = Part::Both)]
    part: Part,
    /// Valve everyone starts at.
    #[arg(long, default_value = "AA")]
    start: String,
    /// Minutes available, instead of 30 for part1 and 26 for part2.
    #[arg(long)]
    minutes: Option<i64>,
    /// Give up after expanding this many search states.
    #[arg(long)]
    max_expansions: Option<u64>,
    /// Let the first agent hand over to the elephant only after opening this many valves.
    /// Faster, but may miss the best answer.
    #[arg(long)]
    handoff_after: Option<usize>,
}

impl Args {
    fn config(&self) -> SearchConfig {
        SearchConfig {
            max_expansions: self.max_expansions,
            handoff: self.handoff_after.map_or(Handoff::Exhaustive, Handoff::AfterOpening),
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let args = Args::parse();
    let input = std::io::read_to_string(std::io::stdin().lock())?;
    match args.part {
        Part::Part1 => println!("{}", part1(input.as_bytes(), &args)?),
        Part::Part2 => println!("{}", part2(input.as_bytes(), &args)?),
        Part::Both => {
            println!("{}", part1(input.as_bytes(), &args)?);
            println!("{}", part2(input.as_bytes(), &args)?);
        }
    }
    Ok(())
}

fn part1(r: impl Read, args: &Args) -> Result<usize, Box<dyn Error>> {
    let volcano = Volcano::from_str(&std::io::read_to_string(r)?)?;
    let paths = ShortestPaths::new(&volcano);
    let mut search = SoloSearch::new(&paths, args.config());
    let best = search.max_pressure(
        volcano.handle(&args.start)?,
        args.minutes.unwrap_or(PART1_MINUTES),
        volcano.openable())?;
    info!(expansions = search.expansions(), "part1");
    Ok(best)
}

fn part2(r: impl Read, args: &Args) -> Result<usize, Box<dyn Error>> {
    let volcano = Volcano::from_str(&std::io::read_to_string(r)?)?;
    let paths = ShortestPaths::new(&volcano);
    let mut search = DuoSearch::new(&paths, args.config());
    let best = search.max_pressure_two_agents(
        volcano.handle(&args.start)?,
        args.minutes.unwrap_or(PART2_MINUTES),
        volcano.openable())?;
    info!(expansions = search.expansions(), "part2");
    Ok(best)
}

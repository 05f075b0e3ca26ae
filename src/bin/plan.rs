use std::path::PathBuf;
use std::process;
use std::str::FromStr;

use catan_opening::board::{EdgeId, MapType};
use catan_opening::cli::RunConfig;
use catan_opening::game::{GameAction, GameState};
use catan_opening::planner::{OpeningPlanner, PlanTree, SettlementPair};
use clap::Parser;
use serde::Serialize;

#[derive(Debug, Parser)]
#[command(name = "catan-opening-plan")]
#[command(about = "Print the opening plan of the first seat on a seeded board as JSON")]
struct Args {
    /// Board seed
    #[arg(long)]
    seed: Option<u64>,

    /// Map type: BASE, MINI, or TOURNAMENT
    #[arg(long)]
    map: Option<String>,

    /// JSON file with "game" and "planner" sections
    #[arg(long)]
    config: Option<PathBuf>,

    /// Skip the enemy look-ahead when planning the road
    #[arg(long)]
    no_lookahead: bool,

    /// Single-line JSON
    #[arg(long)]
    compact: bool,
}

#[derive(Serialize)]
struct PlanReport {
    seed: u64,
    map_type: String,
    seat: usize,
    pair: SettlementPair,
    first_road: EdgeId,
    tree: PlanTree,
}

fn main() {
    env_logger::init();
    let args = Args::parse();
    match run(&args) {
        Ok(output) => println!("{output}"),
        Err(err) => {
            eprintln!("Error: {err}");
            process::exit(1);
        }
    }
}

fn run(args: &Args) -> Result<String, Box<dyn std::error::Error>> {
    let RunConfig {
        game: mut config,
        mut planner,
    } = RunConfig::load(args.config.as_deref())?;
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(map) = &args.map {
        config.map_type = MapType::from_str(map)?;
    }
    if args.no_lookahead {
        planner.lookahead = false;
    }

    let planner = OpeningPlanner::new(planner);
    let mut game = GameState::new(config.clone())?;
    let seat = game.current_player;
    let player = game.player(seat).ok_or("first seat is empty")?;
    let plan = planner.plan_opening(&game.map, player)?;

    game.step(GameAction::settlement(seat, plan.pair.first))?;
    let player = game.player(seat).ok_or("first seat is empty")?;
    let first_road = planner.plan_initial_road(&game.map, player, &game)?;

    let report = PlanReport {
        seed: config.seed,
        map_type: config.map_type.to_string(),
        seat,
        pair: plan.pair,
        first_road,
        tree: plan.tree,
    };
    let output = if args.compact {
        serde_json::to_string(&report)?
    } else {
        serde_json::to_string_pretty(&report)?
    };
    Ok(output)
}

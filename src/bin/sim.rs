use std::path::PathBuf;
use std::process;
use std::str::FromStr;
use std::time::Instant;

use catan_opening::MapType;
use catan_opening::cli::{
    PlayerInstance, RunConfig, StatisticsAccumulator, create_player, print_player_help,
};
use catan_opening::game::{Game, GameConfig};
use catan_opening::planner::PlannerConfig;
use catan_opening::types::Color;
use clap::Parser;

#[derive(Debug, Parser, Clone)]
#[command(name = "catan-opening-sim")]
#[command(about = "Play the initial placement rounds between player strategies and compare openings")]
struct Args {
    /// Number of setups to play
    #[arg(short = 'n', long, default_value_t = 5)]
    num: u32,

    /// Comma-separated player codes, one per seat (e.g. O,R,R,R).
    /// Use ':' for player params (e.g. O:nolook). '_' leaves a seat empty.
    #[arg(long, default_value = "O,R,R,R")]
    players: String,

    /// Base seed; game i uses seed + i
    #[arg(long)]
    seed: Option<u64>,

    /// Map type: BASE, MINI, or TOURNAMENT
    #[arg(long)]
    map: Option<String>,

    /// Seat that places first
    #[arg(long)]
    first_player: Option<usize>,

    /// JSON file with "game" and "planner" sections
    #[arg(long)]
    config: Option<PathBuf>,

    /// Show player codes and exit
    #[arg(long)]
    help_players: bool,

    /// Silence per-game output
    #[arg(long)]
    quiet: bool,

    /// Number of worker threads
    #[arg(long, default_value_t = 1)]
    workers: usize,
}

struct Seating {
    codes: Vec<Option<String>>,
    planner: PlannerConfig,
}

impl Seating {
    /// Fresh player instances, indexed by seat. Vacant seats get a
    /// placeholder that is never asked to move.
    fn instantiate(&self) -> Result<Vec<PlayerInstance>, String> {
        self.codes
            .iter()
            .map(|code| {
                let key = code.as_deref().unwrap_or("R");
                let mut parts = key.split(':');
                let code = parts.next().unwrap_or_default();
                let params: Vec<&str> = parts.collect();
                create_player(code, &params, &self.planner)
                    .ok_or_else(|| format!("unknown player code '{code}'"))
            })
            .collect()
    }
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    if args.help_players {
        print_player_help();
        return;
    }
    if let Err(err) = run(&args) {
        eprintln!("Error: {err}");
        process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), String> {
    let RunConfig {
        game: mut base_config,
        planner,
    } = RunConfig::load(args.config.as_deref()).map_err(|err| err.to_string())?;

    let codes: Vec<Option<String>> = args
        .players
        .split(',')
        .map(|key| (key != "_").then(|| key.to_string()))
        .collect();
    if codes.len() < 2 || codes.len() > Color::ORDERED.len() {
        return Err("must specify 2-4 seats".to_string());
    }
    base_config.max_players = codes.len();
    base_config.vacant_seats = codes
        .iter()
        .enumerate()
        .filter(|(_, code)| code.is_none())
        .map(|(seat, _)| seat)
        .collect();
    base_config.num_players = codes.len() - base_config.vacant_seats.len();
    if let Some(seed) = args.seed {
        base_config.seed = seed;
    }
    if let Some(map) = &args.map {
        base_config.map_type = MapType::from_str(map)
            .map_err(|_| format!("invalid map type '{map}'. Use BASE, MINI, or TOURNAMENT"))?;
    }
    if let Some(first) = args.first_player {
        base_config.first_player = first;
    }

    let seating = Seating { codes, planner };
    let players = seating.instantiate()?;

    let mut stats = StatisticsAccumulator::new();
    if args.workers > 1 {
        run_parallel_simulations(args, &seating, &base_config, &mut stats)?;
    } else {
        run_sequential_simulations(args, &players, &base_config, &mut stats)?;
    }

    if !args.quiet {
        print_summary(&stats, &players, &base_config);
    }
    Ok(())
}

fn game_config(base: &GameConfig, game_idx: u64) -> GameConfig {
    GameConfig {
        seed: base.seed + game_idx,
        ..base.clone()
    }
}

fn run_sequential_simulations(
    args: &Args,
    players: &[PlayerInstance],
    base: &GameConfig,
    stats: &mut StatisticsAccumulator,
) -> Result<(), String> {
    for game_idx in 0..args.num {
        let start = Instant::now();
        let mut game = Game::new(game_config(base, game_idx as u64)).map_err(|e| e.to_string())?;
        game.play_setup(players).map_err(|e| e.to_string())?;
        let duration = start.elapsed();

        stats.after(&game, duration);

        if !args.quiet {
            let placements: String = game
                .state
                .players()
                .map(|p| {
                    let nodes: Vec<String> = p.settlements.iter().map(|n| n.to_string()).collect();
                    format!("{:?}@{}", p.color, nodes.join("+"))
                })
                .collect::<Vec<_>>()
                .join(", ");
            println!(
                "Game {:>4}: [{}] Duration={:?}",
                game_idx + 1,
                placements,
                duration
            );
        }
    }
    Ok(())
}

fn run_parallel_simulations(
    args: &Args,
    seating: &Seating,
    base: &GameConfig,
    stats: &mut StatisticsAccumulator,
) -> Result<(), String> {
    use std::thread;

    let games_per_worker = args.num as usize / args.workers;
    let remainder = args.num as usize % args.workers;

    thread::scope(|scope| {
        let mut handles = Vec::new();
        for worker_id in 0..args.workers {
            let num_games = if worker_id < remainder {
                games_per_worker + 1
            } else {
                games_per_worker
            };
            let start_idx = worker_id * games_per_worker + worker_id.min(remainder);

            handles.push(scope.spawn(move || -> Result<StatisticsAccumulator, String> {
                let players = seating.instantiate()?;
                let mut local_stats = StatisticsAccumulator::new();
                for local_idx in 0..num_games {
                    let game_idx = (start_idx + local_idx) as u64;
                    let start = Instant::now();
                    let mut game = Game::new(game_config(base, game_idx)).map_err(|e| e.to_string())?;
                    game.play_setup(&players).map_err(|e| e.to_string())?;
                    local_stats.after(&game, start.elapsed());
                }
                Ok(local_stats)
            }));
        }

        for handle in handles {
            let worker_stats = handle
                .join()
                .map_err(|_| "worker thread panicked".to_string())??;
            stats.stats.merge(worker_stats.stats);
        }
        Ok(())
    })
}

fn print_summary(stats: &StatisticsAccumulator, players: &[PlayerInstance], config: &GameConfig) {
    println!("\n{}", "=".repeat(80));
    println!("SETUP SUMMARY");
    println!("{}", "=".repeat(80));

    println!("\nPlayer Summary:");
    println!(
        "{:<20} {:<10} {:<12} {:<12} {:<8}",
        "Player", "Fastest", "Avg Speed", "Avg Weight", "Ports"
    );
    println!("{}", "-".repeat(66));

    for (seat, player) in players.iter().enumerate() {
        if config.vacant_seats.contains(&seat) {
            continue;
        }
        let color = Color::ORDERED[seat];
        let fastest = stats.stats.fastest.get(&color).copied().unwrap_or(0);
        let ports = stats.stats.ports_by_player.get(&color).copied().unwrap_or(0);
        println!(
            "{:<20} {:<10} {:<12.2} {:<12.2} {:<8}",
            format!("{} ({:?})", player.name(), color),
            fastest,
            stats.stats.avg_speed(color),
            stats.stats.avg_weight(color),
            ports
        );
    }

    println!("\nGame Summary:");
    println!("  Total Games: {}", stats.stats.games);
    println!("  Avg Ticks: {:.2}", stats.stats.get_avg_ticks());
    println!("  Avg Duration: {:.2?}", stats.stats.get_avg_duration());
}

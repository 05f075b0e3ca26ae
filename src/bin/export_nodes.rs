use std::process;
use std::str::FromStr;

use catan_opening::board::{CatanMap, MapType, NodeId};
use clap::Parser;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;

#[derive(Debug, Parser)]
#[command(name = "catan-opening-nodes")]
#[command(about = "Export land node ids with their lattice addresses as JSON")]
struct Args {
    /// Map type: BASE, MINI, or TOURNAMENT
    #[arg(default_value = "BASE")]
    map: String,

    /// Board seed
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

#[derive(Serialize)]
struct NodeRecord {
    id: NodeId,
    row: i32,
    col: i32,
    tiles: Vec<u16>,
    number_weight: u32,
    port: Option<String>,
}

fn main() {
    env_logger::init();
    let args = Args::parse();
    let map_type = MapType::from_str(&args.map).unwrap_or_else(|err| {
        eprintln!("Error: {err}");
        process::exit(1);
    });
    let mut rng = StdRng::seed_from_u64(args.seed);
    let map = CatanMap::build_with_rng(map_type, &mut rng).unwrap_or_else(|err| {
        eprintln!("Error: {err}");
        process::exit(1);
    });

    let records: Vec<NodeRecord> = map
        .land_nodes
        .iter()
        .filter_map(|node| {
            let coord = map.node_coord(*node)?;
            Some(NodeRecord {
                id: *node,
                row: coord.row,
                col: coord.col,
                tiles: map
                    .adjacent_tiles
                    .get(node)
                    .map(|ids| ids.to_vec())
                    .unwrap_or_default(),
                number_weight: map.node_number_weight(*node),
                port: map.port_at(*node).map(|kind| match kind {
                    None => "3:1".to_string(),
                    Some(resource) => format!("2:1 {resource}"),
                }),
            })
        })
        .collect();

    log::info!(
        "{} land nodes, lowest id {:?}",
        records.len(),
        map.min_node_id()
    );
    match serde_json::to_string_pretty(&records) {
        Ok(output) => println!("{output}"),
        Err(err) => {
            eprintln!("Error: {err}");
            process::exit(1);
        }
    }
}

//! Pallet loading CLI.

use clap::Parser;
use palletpack_core::{pack_with_config, Config};

#[derive(Parser)]
#[command(name = "palletpack")]
#[command(about = "Pack the maximum number of identical boxes into a pallet")]
#[command(version)]
struct Cli {
    /// Pallet length
    pallet_l: i32,

    /// Pallet width
    pallet_w: i32,

    /// Box length
    box_l: i32,

    /// Box width
    box_w: i32,

    /// Print only the JSON placement array
    #[arg(long)]
    json_only: bool,

    /// Maximum five-block recursion depth (0 = unbounded)
    #[arg(short, long, default_value = "0")]
    depth: u32,

    /// Memoization memory budget in mebibytes
    #[arg(short, long, default_value = "256")]
    memory_limit: usize,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let config = Config::new()
        .with_max_depth(cli.depth)
        .with_memory_limit(cli.memory_limit * 1024 * 1024);

    let result = match pack_with_config(cli.pallet_l, cli.pallet_w, cli.box_l, cli.box_w, &config) {
        Ok(result) => result,
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    };

    let json = match result.to_json() {
        Ok(json) => json,
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    };

    if cli.json_only {
        println!("{json}");
        return;
    }

    println!(
        "packed {} boxes of {}x{} into {}x{} (upper bound {}{})",
        result.count,
        cli.box_l,
        cli.box_w,
        cli.pallet_l,
        cli.pallet_w,
        result.upper_bound,
        if result.optimal { ", optimal" } else { "" },
    );
    println!("{json}");
}

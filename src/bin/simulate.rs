//! Bingo draws-to-win simulator CLI.
//!
//! Usage:
//!   cargo run --bin simulate -- [OPTIONS]
//!
//! Examples:
//!   cargo run --bin simulate                        # 1000 games, 2 boards, 5x5, 1-75
//!   cargo run --bin simulate -- -n 10000 -b 20      # 10k games with 20 boards
//!   cargo run --bin simulate -- -w blackout --csv   # Blackout, export CSV
//!   cargo run --bin simulate -- --seed 42           # Reproducible run

use std::env;
use std::str::FromStr;
use std::thread;
use std::time::Duration;

use bingo::build_info::version_line;
use bingo::logging::init_logging;
use bingo::simulator::{default_csv_filename, BatchScheduler, SimConfig, SimReport};

struct CliOptions {
    config: SimConfig,
    csv_path: Option<String>,
    json: bool,
    verbose: bool,
}

fn main() {
    let args: Vec<String> = env::args().collect();
    let options = parse_args(&args);
    init_logging(options.verbose);
    let config = options.config;

    println!("╔═══════════════════════════════════════════════════════════════╗");
    println!("║              BINGO DRAWS-TO-WIN SIMULATOR                     ║");
    println!("╚═══════════════════════════════════════════════════════════════╝");
    println!("  {}", version_line());
    println!();
    println!("Configuration:");
    println!("  Games:          {}", config.total_games);
    println!("  Boards:         {} x {1}x{1}", config.board_count, config.board_size);
    println!("  Number Range:   {}-{}", config.min_num, config.max_num);
    println!("  Win Condition:  {}", config.win_condition);
    println!(
        "  Mode:           {}",
        if config.parallel { "parallel" } else { "sequential" }
    );
    if let Some(seed) = config.seed {
        println!("  Seed:           {}", seed);
    }
    println!();

    let scheduler = match BatchScheduler::new(config.clone()) {
        Ok(scheduler) => scheduler,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    println!("Running simulation...");
    let progress = scheduler.progress();
    let outcome = thread::scope(|s| {
        let batch = s.spawn(|| scheduler.run());
        while !batch.is_finished() {
            let p = progress.snapshot();
            eprint!("\r  {} / {} ({}%)", p.completed, p.total, p.percent());
            thread::sleep(Duration::from_millis(200));
        }
        eprintln!();
        batch.join()
    });
    let outcome = match outcome {
        Ok(outcome) => outcome,
        Err(_) => {
            eprintln!("Error: simulation worker panicked");
            std::process::exit(1);
        }
    };
    println!();

    let report = SimReport::new(config, outcome);
    println!("{}", report.to_text());

    if let Some(path) = options.csv_path {
        match report.write_csv(&path) {
            Ok(()) => println!("CSV exported to: {}", path),
            Err(e) => {
                eprintln!("Failed to write {}: {}", path, e);
                std::process::exit(1);
            }
        }
    }

    if options.json {
        let filename = format!(
            "bingo_report_{}.json",
            chrono::Utc::now().format("%Y%m%d_%H%M%S")
        );
        match std::fs::write(&filename, report.to_json()) {
            Ok(()) => println!("JSON report saved to: {}", filename),
            Err(e) => {
                eprintln!("Failed to write {}: {}", filename, e);
                std::process::exit(1);
            }
        }
    }
}

fn parse_value<T: FromStr>(args: &[String], i: usize, flag: &str) -> T
where
    T::Err: std::fmt::Display,
{
    let Some(raw) = args.get(i + 1) else {
        eprintln!("Missing value for {}", flag);
        std::process::exit(1);
    };
    raw.parse().unwrap_or_else(|e| {
        eprintln!("Invalid {} value '{}': {}", flag, raw, e);
        std::process::exit(1);
    })
}

fn parse_args(args: &[String]) -> CliOptions {
    let mut options = CliOptions {
        config: SimConfig::default(),
        csv_path: None,
        json: false,
        verbose: false,
    };
    let config = &mut options.config;

    let mut i = 1;
    while i < args.len() {
        let flag = args[i].as_str();
        match flag {
            "-n" | "--games" => {
                config.total_games = parse_value(args, i, flag);
                i += 1;
            }
            "-s" | "--size" => {
                config.board_size = parse_value(args, i, flag);
                i += 1;
            }
            "-b" | "--boards" => {
                config.board_count = parse_value(args, i, flag);
                i += 1;
            }
            "--min" => {
                config.min_num = parse_value(args, i, flag);
                i += 1;
            }
            "--max" => {
                config.max_num = parse_value(args, i, flag);
                i += 1;
            }
            "-w" | "--win" => {
                config.win_condition = parse_value(args, i, flag);
                i += 1;
            }
            "--seed" => {
                config.seed = Some(parse_value(args, i, flag));
                i += 1;
            }
            "--threads" => {
                config.threads = Some(parse_value(args, i, flag));
                i += 1;
            }
            "--interval" => {
                config.progress_interval = parse_value(args, i, flag);
                i += 1;
            }
            "--sequential" => {
                config.parallel = false;
            }
            "--config" => {
                let path: String = parse_value(args, i, flag);
                *config = SimConfig::from_json_file(&path).unwrap_or_else(|e| {
                    eprintln!("{}: {}", path, e);
                    std::process::exit(1);
                });
                i += 1;
            }
            "--classic" => {
                *config = SimConfig::classic(config.board_count);
            }
            "--csv" => {
                // Optional path argument
                match args.get(i + 1).filter(|a| !a.starts_with('-')) {
                    Some(path) => {
                        options.csv_path = Some(path.clone());
                        i += 1;
                    }
                    None => options.csv_path = Some(default_csv_filename()),
                }
            }
            "--json" => {
                options.json = true;
            }
            "-v" | "--verbose" => {
                options.verbose = true;
            }
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            other => {
                eprintln!("Unknown argument: {}", other);
                eprintln!("Run with --help for usage.");
                std::process::exit(1);
            }
        }
        i += 1;
    }

    options
}

fn print_help() {
    println!("Bingo Draws-to-Win Simulator");
    println!();
    println!("USAGE:");
    println!("    cargo run --bin simulate -- [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("    -n, --games <N>     Number of games to simulate (default: 1000, max 100000)");
    println!("    -s, --size <S>      Board side length (default: 5)");
    println!("    -b, --boards <B>    Boards in play per game (default: 2)");
    println!("    --min <N>           Lowest callable number (default: 1)");
    println!("    --max <N>           Highest callable number (default: 75)");
    println!("    -w, --win <TYPE>    row, column, diagonal, blackout or any (default: any)");
    println!("    --seed <S>          Random seed for reproducibility");
    println!("    --sequential        Run games one at a time instead of in parallel");
    println!("    --threads <T>       Worker threads for parallel runs (default: all cores)");
    println!("    --interval <N>      Games between progress checks (default: 100)");
    println!("    --config <FILE>     Load settings from a JSON file");
    println!("    --classic           Reset to the 75-ball 5x5 game");
    println!("    --csv [FILE]        Export results as CSV");
    println!("    --json              Save JSON report");
    println!("    -v, --verbose       Debug logging");
    println!("    -h, --help          Show this help");
    println!();
    println!("EXAMPLES:");
    println!("    cargo run --bin simulate -- -n 10000 -b 20");
    println!("    cargo run --bin simulate -- -s 3 --max 30 -w diagonal");
    println!("    cargo run --bin simulate -- --seed 42 --csv results.csv");
}

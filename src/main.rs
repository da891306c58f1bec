//! Live bingo caller.
//!
//! Serves the current game to display screens and admin panels over
//! WebSocket. Build with `--features web`.
//!
//! Usage:
//!   bingo [--port N] [--boards B] [--size S] [--min N] [--max N] [-v]
//!
//! The port falls back to the `PORT` environment variable, then 3000.

use std::env;
use std::sync::Arc;

use bingo::build_info::version_line;
use bingo::constants::DEFAULT_PORT;
use bingo::logging::init_logging;
use bingo::session::{GameSession, GameSettings};
use bingo::web::{start_live_server, LiveServer};

struct ServerOptions {
    port: u16,
    settings: GameSettings,
    verbose: bool,
}

#[tokio::main]
async fn main() {
    let args: Vec<String> = env::args().collect();
    let options = parse_args(&args);
    init_logging(options.verbose);

    tracing::info!("{}", version_line());

    let mut rng = rand::thread_rng();
    let session = match GameSession::new(options.settings, &mut rng) {
        Ok(session) => session,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let server = Arc::new(LiveServer::new(session));
    if let Err(e) = start_live_server(options.port, server).await {
        eprintln!("Server error: {}", e);
        std::process::exit(1);
    }
}

fn parse_args(args: &[String]) -> ServerOptions {
    let mut options = ServerOptions {
        port: env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(DEFAULT_PORT),
        settings: GameSettings::default(),
        verbose: false,
    };

    let mut i = 1;
    while i < args.len() {
        let flag = args[i].as_str();
        let value = args.get(i + 1);
        match flag {
            "--port" | "-p" => {
                options.port = parse_or_exit(flag, value);
                i += 1;
            }
            "--boards" | "-b" => {
                options.settings.board_count = parse_or_exit(flag, value);
                i += 1;
            }
            "--size" | "-s" => {
                options.settings.board_size = parse_or_exit(flag, value);
                i += 1;
            }
            "--min" => {
                options.settings.number_range_min = parse_or_exit(flag, value);
                i += 1;
            }
            "--max" => {
                options.settings.number_range_max = parse_or_exit(flag, value);
                i += 1;
            }
            "-v" | "--verbose" => {
                options.verbose = true;
            }
            "-h" | "--help" => {
                println!("Usage: bingo [--port N] [--boards B] [--size S] [--min N] [--max N] [-v]");
                std::process::exit(0);
            }
            other => {
                eprintln!("Unknown argument: {}", other);
                std::process::exit(1);
            }
        }
        i += 1;
    }

    options
}

fn parse_or_exit<T: std::str::FromStr>(flag: &str, value: Option<&String>) -> T {
    match value.and_then(|v| v.parse().ok()) {
        Some(parsed) => parsed,
        None => {
            eprintln!("Invalid or missing value for {}", flag);
            std::process::exit(1);
        }
    }
}

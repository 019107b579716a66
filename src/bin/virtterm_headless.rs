//! virtterm headless runner
//!
//! Feeds a byte stream from stdin or a file through a virtual terminal and
//! prints the resulting screen, optionally with the events it produced.

use std::io::{self, Read};
use std::path::Path;
use std::process::ExitCode;

use virtterm::app::logging;
use virtterm::{Config, Terminal};

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();

    let mut cols = 80usize;
    let mut rows = 24usize;
    let mut input_file: Option<String> = None;
    let mut config_file: Option<String> = None;
    let mut output_format = OutputFormat::Text;
    let mut show_events = false;
    let mut show_help = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-c" | "--cols" => {
                i += 1;
                if i < args.len() {
                    cols = args[i].parse().unwrap_or(80);
                }
            },
            "-r" | "--rows" => {
                i += 1;
                if i < args.len() {
                    rows = args[i].parse().unwrap_or(24);
                }
            },
            "-f" | "--file" => {
                i += 1;
                if i < args.len() {
                    input_file = Some(args[i].clone());
                }
            },
            "--config" => {
                i += 1;
                if i < args.len() {
                    config_file = Some(args[i].clone());
                }
            },
            "-j" | "--json" => {
                output_format = OutputFormat::Json;
            },
            "-t" | "--text" => {
                output_format = OutputFormat::Text;
            },
            "-e" | "--events" => {
                show_events = true;
            },
            "-h" | "--help" => {
                show_help = true;
            },
            _ => {
                if input_file.is_none() && !args[i].starts_with('-') {
                    input_file = Some(args[i].clone());
                }
            },
        }
        i += 1;
    }

    if show_help {
        print_help();
        return ExitCode::SUCCESS;
    }

    let config = match &config_file {
        Some(path) => match Config::load(Path::new(path)) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error loading config '{}': {}", path, e);
                return ExitCode::FAILURE;
            },
        },
        None => Config::load_or_default(),
    };
    logging::init(config.debug);

    let input_data = match &input_file {
        Some(path) => match std::fs::read(path) {
            Ok(data) => data,
            Err(e) => {
                eprintln!("Error reading file '{}': {}", path, e);
                return ExitCode::FAILURE;
            },
        },
        None => {
            let mut data = Vec::new();
            if let Err(e) = io::stdin().read_to_end(&mut data) {
                eprintln!("Error reading stdin: {}", e);
                return ExitCode::FAILURE;
            }
            data
        },
    };

    let mut terminal = Terminal::new(rows, cols, config);
    terminal.write(&input_data);
    let events = terminal.drain_events();
    let snapshot = terminal.snapshot();

    match output_format {
        OutputFormat::Text => {
            let cursor = terminal.cursor();
            println!("Terminal State ({}x{}):", terminal.columns(), terminal.rows());
            println!("Cursor: ({}, {})", cursor.row, cursor.col);
            println!("---");
            print!("{}", snapshot.to_text());
            println!("---");
            if show_events {
                for event in &events {
                    println!("{:?}", event);
                }
            }
        },
        OutputFormat::Json => {
            let output = if show_events {
                serde_json::to_string_pretty(&serde_json::json!({
                    "snapshot": snapshot,
                    "events": events,
                }))
            } else {
                serde_json::to_string_pretty(&snapshot)
            };
            match output {
                Ok(json) => println!("{}", json),
                Err(e) => {
                    eprintln!("Error serializing snapshot: {}", e);
                    return ExitCode::FAILURE;
                },
            }
        },
    }

    ExitCode::SUCCESS
}

#[derive(Clone, Copy)]
enum OutputFormat {
    Text,
    Json,
}

fn print_help() {
    println!("virtterm headless runner");
    println!();
    println!("Usage: virtterm-headless [OPTIONS] [INPUT_FILE]");
    println!();
    println!("Options:");
    println!("  -c, --cols <N>       Set terminal width (default: 80)");
    println!("  -r, --rows <N>       Set terminal height (default: 24)");
    println!("  -f, --file <PATH>    Read input from file instead of stdin");
    println!("      --config <PATH>  Load configuration from a JSON file");
    println!("  -j, --json           Output snapshot as JSON");
    println!("  -t, --text           Output snapshot as text (default)");
    println!("  -e, --events         Also output the events produced");
    println!("  -h, --help           Show this help message");
    println!();
    println!("Environment:");
    println!("  RUST_LOG             Override the log filter (e.g. RUST_LOG=debug)");
}

//! Run a command on a pty attached to a virtual terminal
//!
//! Pumps the command's output until it exits, then prints the final
//! screen as text (or JSON with `--json`).

use std::process::ExitCode;

use virtterm::app::logging;
use virtterm::pty::{Session, Status};
use virtterm::{Config, Terminal};

/// Milliseconds to wait for output before checking whether the child is gone
const POLL_INTERVAL_MS: i32 = 100;

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();

    let mut cols = 80usize;
    let mut rows = 24usize;
    let mut json = false;
    let mut command: Vec<String> = Vec::new();

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
            "-j" | "--json" => json = true,
            "-h" | "--help" => {
                println!("Usage: virtterm-run [-c COLS] [-r ROWS] [--json] [--] COMMAND [ARGS...]");
                return ExitCode::SUCCESS;
            },
            "--" => {
                command.extend(args[i + 1..].iter().cloned());
                break;
            },
            _ => {
                command.extend(args[i..].iter().cloned());
                break;
            },
        }
        i += 1;
    }

    let config = Config::load_or_default();
    logging::init(config.debug);

    let terminal = Terminal::new(rows, cols, config);
    let spawned = match command.split_first() {
        Some((program, rest)) => {
            let rest: Vec<&str> = rest.iter().map(String::as_str).collect();
            Session::spawn(terminal, program, &rest)
        },
        None => {
            let shell = std::env::var("SHELL").unwrap_or_else(|_| "/bin/sh".to_string());
            Session::spawn(terminal, &shell, &[])
        },
    };
    let mut session = match spawned {
        Ok(session) => session,
        Err(e) => {
            eprintln!("Error spawning command: {}", e);
            return ExitCode::FAILURE;
        },
    };

    loop {
        let ready = match session.pty().poll_read(POLL_INTERVAL_MS) {
            Ok(ready) => ready,
            Err(e) => {
                eprintln!("Error polling pty: {}", e);
                return ExitCode::FAILURE;
            },
        };
        if ready {
            match session.process() {
                Ok(Status::Continue) => {},
                Ok(Status::Closed) => break,
                Err(e) => {
                    eprintln!("Error reading pty: {}", e);
                    return ExitCode::FAILURE;
                },
            }
        } else if !session.pty_mut().is_alive() {
            break;
        }
    }

    let exit_code = match session.pty_mut().wait() {
        Ok(code) => code,
        Err(e) => {
            tracing::warn!("{}", e);
            1
        },
    };

    let snapshot = session.terminal().snapshot();
    if json {
        match snapshot.to_json() {
            Ok(output) => println!("{}", output),
            Err(e) => {
                eprintln!("Error serializing snapshot: {}", e);
                return ExitCode::FAILURE;
            },
        }
    } else {
        print!("{}", snapshot.to_text());
    }

    ExitCode::from(u8::try_from(exit_code).unwrap_or(1))
}

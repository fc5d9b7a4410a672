use std::env;
use std::path::Path;

use serde::Serialize;

use crate::drk::{DrkSim, DrkSimSettings};
use crate::gear::{load_roster_csv, GearSet};
use crate::parallel::WorkerPool;
use crate::server;
use crate::solver::simulate_sets_with_progress;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Serve,
    Simulate,
    Solve,
}

pub fn parse_command(args: &[String]) -> Option<Command> {
    match args.get(1).map(String::as_str) {
        Some("serve") => Some(Command::Serve),
        Some("simulate") => Some(Command::Simulate),
        Some("solve") => Some(Command::Solve),
        _ => None,
    }
}

pub fn run_with_args(args: &[String]) -> i32 {
    match parse_command(args) {
        Some(Command::Serve) => handle_serve(),
        Some(Command::Simulate) => handle_simulate(args),
        Some(Command::Solve) => handle_solve(args),
        None => {
            eprintln!("usage: darkside <serve|simulate|solve>");
            2
        }
    }
}

fn handle_serve() -> i32 {
    let bind_addr = env::var("DARKSIDE_BIND").unwrap_or_else(|_| "127.0.0.1:3000".to_string());
    match server::run_server(&bind_addr) {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("server error: {err}");
            1
        }
    }
}

#[derive(Debug, Clone, Serialize)]
struct SimulateSummary {
    rotation: String,
    main_dps_result: f64,
    uses: usize,
    fight_time: f64,
}

fn handle_simulate(args: &[String]) -> i32 {
    let fight_time = parse_f64_arg(args.get(2), "fight_time", 510.0);
    let as_table = args.iter().any(|arg| arg == "--table");

    let sim = DrkSim::new(Some(DrkSimSettings {
        fight_time,
        ..DrkSimSettings::default()
    }));
    let result = sim.simulate(&GearSet::baseline());
    let summary = SimulateSummary {
        rotation: result.rotation,
        main_dps_result: result.main_dps_result,
        uses: result.records.len(),
        fight_time,
    };

    if as_table {
        println!("rotation\tfight_time\tdps\tuses");
        println!(
            "{}\t{}\t{:.2}\t{}",
            summary.rotation, summary.fight_time, summary.main_dps_result, summary.uses
        );
        return 0;
    }

    match serde_json::to_string_pretty(&summary) {
        Ok(payload) => {
            println!("{payload}");
            0
        }
        Err(err) => {
            eprintln!("failed to serialize simulation result: {err}");
            1
        }
    }
}

#[derive(Debug, Clone, Serialize)]
struct SolveSummary {
    sets_evaluated: usize,
    best_name: Option<String>,
    best_dps: Option<f64>,
}

fn handle_solve(args: &[String]) -> i32 {
    let Some(roster_path) = args.get(2) else {
        eprintln!("usage: darkside solve <roster.csv> [workers]");
        return 2;
    };
    let workers = parse_usize_arg(args.get(3), "workers", 0);

    let sets = match load_roster_csv(Path::new(roster_path)) {
        Ok(sets) => sets,
        Err(err) => {
            eprintln!("{err}");
            return 1;
        }
    };

    let sim = DrkSim::new(None);
    let pool = WorkerPool::with_workers(workers);
    let best = simulate_sets_with_progress(&sim, &sets, &pool, |done, total| {
        eprintln!("solved {done}/{total} sets");
    });

    let summary = SolveSummary {
        sets_evaluated: sets.len(),
        best_name: best.as_ref().map(|(_, set)| set.name.clone()),
        best_dps: best.as_ref().map(|(dps, _)| *dps),
    };
    match serde_json::to_string_pretty(&summary) {
        Ok(payload) => {
            println!("{payload}");
            0
        }
        Err(err) => {
            eprintln!("failed to serialize solve result: {err}");
            1
        }
    }
}

fn parse_f64_arg(value: Option<&String>, name: &str, default: f64) -> f64 {
    match value {
        Some(raw) => match raw.parse::<f64>() {
            Ok(parsed) if parsed > 0.0 => parsed,
            _ => {
                eprintln!("invalid {name} {raw:?}, using {default}");
                default
            }
        },
        None => default,
    }
}

fn parse_usize_arg(value: Option<&String>, name: &str, default: usize) -> usize {
    match value {
        Some(raw) => match raw.parse::<usize>() {
            Ok(parsed) => parsed,
            Err(_) => {
                eprintln!("invalid {name} {raw:?}, using {default}");
                default
            }
        },
        None => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|part| part.to_string()).collect()
    }

    #[test]
    fn known_commands_parse() {
        assert_eq!(parse_command(&args(&["darkside", "serve"])), Some(Command::Serve));
        assert_eq!(
            parse_command(&args(&["darkside", "simulate"])),
            Some(Command::Simulate)
        );
        assert_eq!(parse_command(&args(&["darkside", "solve"])), Some(Command::Solve));
    }

    #[test]
    fn unknown_commands_do_not_parse() {
        assert_eq!(parse_command(&args(&["darkside"])), None);
        assert_eq!(parse_command(&args(&["darkside", "optimize"])), None);
    }

    #[test]
    fn bad_numeric_args_fall_back_to_defaults() {
        assert_eq!(parse_f64_arg(Some(&"nope".to_string()), "fight_time", 510.0), 510.0);
        assert_eq!(parse_f64_arg(Some(&"-3".to_string()), "fight_time", 510.0), 510.0);
        assert_eq!(parse_f64_arg(Some(&"120".to_string()), "fight_time", 510.0), 120.0);
        assert_eq!(parse_usize_arg(Some(&"4".to_string()), "workers", 0), 4);
    }
}

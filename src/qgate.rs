//! Apply a comma-separated list of gates to ∣0⟩ and print the measurement
//! tally as `outcome: count` lines.
//!
//! Exits with 0 on success, 1 if the circuit or shot count is rejected, and 2
//! on a malformed command line. Logging goes to stderr and is controlled by
//! `RUST_LOG`.

use std::process::ExitCode;
use qgate_sim::{
    QGateError,
    circuit::{ Circuit, EmptyPolicy, RunConfig, Runner },
};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

const USAGE: &str = "\
Usage: qgate [--gates X,H,...] [--shots N] [--seed N] [--parallel]
             [--reject-empty] [--state]

Options:
  --gates LIST     comma-separated gates from X, Y, Z, S, T, H (default: none)
  --shots N        number of measurement shots (default: 1000)
  --seed N         seed the random number generator
  --parallel       sample shots on all cores
  --reject-empty   treat a circuit with no gates as an error
  --state          also print the final state and its exact probabilities
  --help           print this message";

#[derive(Debug, Error)]
enum CliError {
    #[error("{0}")]
    Usage(String),

    #[error(transparent)]
    Sim(#[from] QGateError),
}

#[derive(Clone, Debug, PartialEq)]
struct Args {
    gates: String,
    shots: i64,
    seed: Option<u64>,
    parallel: bool,
    reject_empty: bool,
    show_state: bool,
    help: bool,
}

impl Default for Args {
    fn default() -> Self {
        Self {
            gates: String::new(),
            shots: 1000,
            seed: None,
            parallel: false,
            reject_empty: false,
            show_state: false,
            help: false,
        }
    }
}

fn parse_args<I>(args: I) -> Result<Args, CliError>
where I: IntoIterator<Item = String>
{
    let mut parsed = Args::default();
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        // accept both `--flag value` and `--flag=value`
        let (flag, inline) = match arg.split_once('=') {
            Some((flag, value)) => (flag.to_string(), Some(value.to_string())),
            None => (arg, None),
        };
        let mut value = || {
            inline.clone()
                .or_else(|| args.next())
                .ok_or_else(|| CliError::Usage(format!("missing value for {}", flag)))
        };
        match flag.as_str() {
            "--gates" | "-g" => { parsed.gates = value()?; },
            "--shots" | "-n" => {
                let raw = value()?;
                parsed.shots = raw.trim().parse()
                    .map_err(|_| CliError::Usage(
                        format!("shot count must be an integer, got '{}'", raw)))?;
            },
            "--seed" => {
                let raw = value()?;
                parsed.seed = Some(
                    raw.trim().parse()
                        .map_err(|_| CliError::Usage(
                            format!("seed must be a non-negative integer, got '{}'", raw)))?
                );
            },
            "--parallel" => { parsed.parallel = true; },
            "--reject-empty" => { parsed.reject_empty = true; },
            "--state" => { parsed.show_state = true; },
            "--help" | "-h" => { parsed.help = true; },
            _ => { return Err(CliError::Usage(format!("unknown argument '{}'", flag))); },
        }
    }
    Ok(parsed)
}

fn execute(args: Args) -> Result<(), CliError> {
    if args.help {
        println!("{}", USAGE);
        return Ok(());
    }
    if args.shots <= 0 {
        return Err(QGateError::InvalidShotCount(args.shots).into());
    }
    let circuit: Circuit = args.gates.parse()?;
    let config = RunConfig::default()
        .with_shots(args.shots as usize)
        .with_seed(args.seed)
        .with_parallel(args.parallel)
        .with_empty_policy(
            if args.reject_empty { EmptyPolicy::Reject } else { EmptyPolicy::Identity }
        );
    let mut runner = Runner::with_config(config);
    if args.show_state {
        let state = runner.evolve(&circuit)?;
        let [p0, p1] = state.probabilities();
        let [x, y, z] = state.bloch();
        println!("circuit: {}", circuit.diagram());
        println!("state: {}", state);
        println!("probabilities: 0: {:.4}, 1: {:.4}", p0, p1);
        println!("bloch: ({:+.4}, {:+.4}, {:+.4})", x, y, z);
    }
    let counts = runner.run(&circuit)?;
    println!("{}", counts);
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    init_tracing();
    match parse_args(std::env::args().skip(1)).and_then(execute) {
        Ok(()) => ExitCode::SUCCESS,
        Err(CliError::Usage(msg)) => {
            eprintln!("error: {}", msg);
            eprintln!("{}", USAGE);
            ExitCode::from(2)
        },
        Err(CliError::Sim(err)) => {
            eprintln!("error: {}", err);
            ExitCode::from(1)
        },
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn args(s: &str) -> Result<Args, CliError> {
        parse_args(s.split_whitespace().map(String::from))
    }

    #[test]
    fn defaults() {
        assert_eq!(args("").unwrap(), Args::default());
    }

    #[test]
    fn full_command_line() {
        let parsed = args("--gates X,H,H --shots 250 --seed=7 --parallel --state")
            .unwrap();
        assert_eq!(parsed.gates, "X,H,H");
        assert_eq!(parsed.shots, 250);
        assert_eq!(parsed.seed, Some(7));
        assert!(parsed.parallel && parsed.show_state && !parsed.reject_empty);
    }

    #[test]
    fn negative_shots_parse_but_fail_to_run() {
        let parsed = args("--gates X --shots -5").unwrap();
        assert!(matches!(
            execute(parsed),
            Err(CliError::Sim(QGateError::InvalidShotCount(-5)))
        ));
    }

    #[test]
    fn unknown_gate_fails_to_run() {
        let parsed = args("--gates X,Q --shots 10").unwrap();
        assert!(matches!(
            execute(parsed),
            Err(CliError::Sim(QGateError::UnknownGate(name))) if name == "Q"
        ));
    }

    #[test]
    fn usage_errors() {
        assert!(matches!(args("--shots lots"), Err(CliError::Usage(_))));
        assert!(matches!(args("--shots"), Err(CliError::Usage(_))));
        assert!(matches!(args("--frobnicate"), Err(CliError::Usage(_))));
    }

    #[test]
    fn reject_empty_flag() {
        let parsed = args("--reject-empty --seed 1").unwrap();
        assert!(matches!(execute(parsed), Err(CliError::Sim(QGateError::EmptyCircuit))));
    }
}

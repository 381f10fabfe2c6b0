//! Walk through the standard single-qubit gate demonstrations: each Pauli
//! gate, the S and T phase gates, Hadamard, a double Hadamard, and the
//! combination H → X → S → H, sampling 1000 shots of each.
//!
//! Usage: `gate_demos [SEED]`

use std::process::ExitCode;
use itertools::Itertools;
use qgate_sim::{
    QGateResult,
    circuit::{ Circuit, Runner },
    gate::Gate,
};
use tracing_subscriber::EnvFilter;

const SHOTS: usize = 1000;

struct Demo {
    title: &'static str,
    input: &'static str,
    gates: &'static [Gate],
    expected: &'static str,
}

const DEMOS: [Demo; 8] = [
    Demo {
        title: "Pauli-X Gate",
        input: "∣0⟩",
        gates: &[Gate::X],
        expected: "all measurements give 1",
    },
    Demo {
        title: "Pauli-Y Gate",
        input: "∣0⟩",
        gates: &[Gate::Y],
        expected: "all measurements give 1",
    },
    Demo {
        title: "Pauli-Z Gate",
        input: "(∣0⟩ + ∣1⟩)/√2 (after Hadamard)",
        gates: &[Gate::H, Gate::Z],
        expected: "roughly equal distribution between 0 and 1",
    },
    Demo {
        title: "Phase (S) Gate",
        input: "(∣0⟩ + ∣1⟩)/√2 (after Hadamard)",
        gates: &[Gate::H, Gate::S],
        expected: "roughly equal distribution (phase is not observable)",
    },
    Demo {
        title: "T Gate (π/8)",
        input: "(∣0⟩ + ∣1⟩)/√2 (after Hadamard)",
        gates: &[Gate::H, Gate::T],
        expected: "roughly equal distribution",
    },
    Demo {
        title: "Hadamard Gate",
        input: "∣0⟩",
        gates: &[Gate::H],
        expected: "roughly equal distribution (50% 0, 50% 1)",
    },
    Demo {
        title: "Double Hadamard Gate",
        input: "∣0⟩",
        gates: &[Gate::H, Gate::H],
        expected: "all measurements give 0 (H H = I)",
    },
    Demo {
        title: "Gate Combination Circuit",
        input: "∣0⟩",
        gates: &[Gate::H, Gate::X, Gate::S, Gate::H],
        expected: "roughly equal distribution",
    },
];

fn run_demo(runner: &mut Runner, demo: &Demo) -> QGateResult<()> {
    let circuit = Circuit::new(demo.gates.iter().copied());
    let [p0, p1] = runner.probabilities(&circuit)?;
    let counts = runner.run_shots(&circuit, SHOTS)?;
    println!("\n=== {} ===", demo.title);
    for gate in circuit.gates().iter().unique() {
        println!("{}", gate.description());
    }
    println!("Input: {}", demo.input);
    println!("Circuit: {}", circuit);
    println!("{}", circuit.diagram());
    println!(
        "Measurement counts: {{{}}}",
        counts.iter().map(|(o, n)| format!("'{}': {}", o, n)).join(", "),
    );
    println!("Exact probabilities: 0: {:.4}, 1: {:.4}", p0, p1);
    println!("Expected: {}", demo.expected);
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
    let seed: Option<u64> = match std::env::args().nth(1) {
        None => None,
        Some(raw) => match raw.parse() {
            Ok(seed) => Some(seed),
            Err(_) => {
                eprintln!("error: seed must be a non-negative integer, got '{}'", raw);
                eprintln!("Usage: gate_demos [SEED]");
                return ExitCode::from(2);
            },
        },
    };
    let mut runner = Runner::new(seed);

    println!("{}", "=".repeat(50));
    println!("SINGLE-QUBIT GATES: PAULI, PHASE, AND HADAMARD");
    println!("{}", "=".repeat(50));
    for demo in DEMOS.iter() {
        if let Err(err) = run_demo(&mut runner, demo) {
            eprintln!("error in '{}': {}", demo.title, err);
            return ExitCode::from(1);
        }
    }
    println!("\n{}", "=".repeat(50));
    println!("All examples completed successfully!");
    println!("{}", "=".repeat(50));
    ExitCode::SUCCESS
}

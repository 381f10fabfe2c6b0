//! Property-based tests for qgate-sim using proptest
//!
//! Checks properties that must hold for every gate sequence, not just the
//! hand-picked circuits covered by the unit tests.

use proptest::prelude::*;
use qgate_sim::{
    circuit::{ run, Circuit, RunConfig, Runner },
    gate::{ is_unitary, Gate },
    measure::Outcome,
    state::State,
};

fn gate_strategy() -> impl Strategy<Value = Gate> {
    (0..Gate::ALL.len()).prop_map(|k| Gate::ALL[k])
}

fn circuit_strategy(max_len: usize) -> impl Strategy<Value = Circuit> {
    prop::collection::vec(gate_strategy(), 0..max_len).prop_map(Circuit::new)
}

proptest! {
    /// Property: unitary gates never change the norm beyond tolerance
    #[test]
    fn norm_preserved(circuit in circuit_strategy(64)) {
        let state = Runner::new(Some(0)).evolve(&circuit).unwrap();
        prop_assert!(
            (state.norm() - 1.0).abs() < 1e-9,
            "norm drifted to {} after {}", state.norm(), circuit
        );
    }

    /// Property: probabilities are in [0, 1] and sum to 1
    #[test]
    fn probabilities_sum_to_one(circuit in circuit_strategy(32)) {
        let [p0, p1] = Runner::new(Some(0)).probabilities(&circuit).unwrap();
        prop_assert!((0.0..=1.0 + 1e-12).contains(&p0));
        prop_assert!((0.0..=1.0 + 1e-12).contains(&p1));
        prop_assert!((p0 + p1 - 1.0).abs() < 1e-9);
    }

    /// Property: applying a gate sequence and then its reverse of inverses
    /// returns to ∣0⟩; involutions are their own inverse
    #[test]
    fn involutions_undo(gates in prop::collection::vec(gate_strategy(), 0..16)) {
        let forward: Vec<Gate> = gates.into_iter()
            .filter(|g| g.is_involution())
            .collect();
        let mut state = State::zero();
        state.apply_circuit(&forward);
        state.apply_circuit(forward.iter().rev());
        prop_assert!(state.approx_eq(&State::zero(), 1e-9));
    }

    /// Property: diagonal gates never change measurement probabilities
    #[test]
    fn diagonal_gates_keep_probabilities(
        prefix in circuit_strategy(8),
        phases in prop::collection::vec(gate_strategy(), 0..8),
    ) {
        let runner = Runner::new(Some(0));
        let before = runner.probabilities(&prefix).unwrap();
        let mut extended = prefix.clone();
        phases.into_iter()
            .filter(|g| g.is_diagonal())
            .for_each(|g| { extended.push(g); });
        let after = runner.probabilities(&extended).unwrap();
        prop_assert!((before[0] - after[0]).abs() < 1e-9);
    }

    /// Property: counts always sum to the number of shots
    #[test]
    fn counts_sum_to_shots(
        circuit in circuit_strategy(8),
        shots in 1usize..2000,
        seed in any::<u64>(),
        parallel in any::<bool>(),
    ) {
        let config = RunConfig::default()
            .with_seed(Some(seed))
            .with_parallel(parallel);
        let counts = Runner::with_config(config)
            .run_shots(&circuit, shots)
            .unwrap();
        prop_assert_eq!(counts.total(), shots);
    }

    /// Property: identical circuit, shots, and seed give identical counts
    #[test]
    fn seeded_runs_are_deterministic(
        circuit in circuit_strategy(8),
        shots in 1usize..500,
        seed in any::<u64>(),
    ) {
        let names: Vec<&str> = circuit.gates().iter().map(|g| g.name()).collect();
        prop_assert_eq!(
            run(&names, shots, Some(seed)).unwrap(),
            run(&names, shots, Some(seed)).unwrap()
        );
    }
}

#[test]
fn every_gate_is_unitary() {
    for gate in Gate::ALL {
        assert!(is_unitary(&gate.matrix(), 1e-9), "{}", gate);
    }
}

#[test]
fn hadamard_ten_thousand_shots() {
    // σ = 50 for p = 1/2, n = 10000
    let counts = run(&["H"], 10_000, Some(42)).unwrap();
    let zeros = counts.get(Outcome::Zero) as f64;
    let ones = counts.get(Outcome::One) as f64;
    assert!((zeros - 5000.0).abs() <= 200.0, "zeros: {}", zeros);
    assert!((ones - 5000.0).abs() <= 200.0, "ones: {}", ones);
}

#[test]
fn z_after_x_measures_like_one() {
    let counts = run(&["X", "Z"], 500, Some(3)).unwrap();
    assert_eq!(counts.get(Outcome::One), 500);
    assert_eq!(counts.get(Outcome::Zero), 0);
}

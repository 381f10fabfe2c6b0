//! Abstractions for building single-qubit circuits and driving repeated
//! measurement of their output.
//!
//! A run has two phases. First, every gate of a [`Circuit`] is applied in order
//! to a working copy of ∣0⟩. Then the resulting state, which is never modified
//! again, is sampled once per shot and the outcomes are tallied into
//! [`Counts`]. Because no gate here can entangle or branch, one post-gate state
//! serves every shot.

use std::{ fmt, str::FromStr };
use itertools::Itertools;
use rand::{ rngs::StdRng, Rng, SeedableRng };
use rayon::iter::{ IndexedParallelIterator, IntoParallelIterator, ParallelIterator };
use tracing::{ debug, info };
use crate::{
    QGateError,
    QGateResult,
    gate::Gate,
    measure::{ self, Counts },
    state::{ State, NORM_TOL },
};

/// Number of shots handed to each task by the parallel sampler.
pub const PAR_CHUNK: usize = 4096;

/// An ordered series of [`Gate`]s acting on a single qubit initialized to
/// ∣0⟩.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Circuit(Vec<Gate>);

impl IntoIterator for Circuit {
    type Item = Gate;
    type IntoIter = <Vec<Gate> as IntoIterator>::IntoIter;

    fn into_iter(self) -> Self::IntoIter { self.0.into_iter() }
}

impl<'a> IntoIterator for &'a Circuit {
    type Item = &'a Gate;
    type IntoIter = <&'a Vec<Gate> as IntoIterator>::IntoIter;

    fn into_iter(self) -> Self::IntoIter { self.0.iter() }
}

impl FromIterator<Gate> for Circuit {
    fn from_iter<I>(iter: I) -> Self
    where I: IntoIterator<Item = Gate>
    {
        Self(iter.into_iter().collect())
    }
}

/// Parses a comma-separated list of gate names, e.g. `"H, X, S, H"`.
///
/// A blank string gives the empty circuit; a blank entry between commas is an
/// unknown gate.
impl FromStr for Circuit {
    type Err = QGateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            Ok(Self::default())
        } else {
            Self::from_names(s.split(','))
        }
    }
}

/// Writes the gates in application order, e.g. `H → X → S → H`.
impl fmt::Display for Circuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            write!(f, "I")
        } else {
            write!(f, "{}", self.0.iter().join(" → "))
        }
    }
}

impl Circuit {
    /// Create a new circuit from a series of gates.
    pub fn new<I>(gates: I) -> Self
    where I: IntoIterator<Item = Gate>
    {
        gates.into_iter().collect()
    }

    /// Create a new circuit from a series of gate names.
    ///
    /// Fails on the first name that does not belong to the gate table.
    pub fn from_names<I, S>(names: I) -> QGateResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        names.into_iter()
            .map(|name| name.as_ref().parse::<Gate>())
            .collect::<QGateResult<Vec<Gate>>>()
            .map(Self)
    }

    pub fn len(&self) -> usize { self.0.len() }

    pub fn is_empty(&self) -> bool { self.0.is_empty() }

    /// Return the gates of `self` in application order.
    pub fn gates(&self) -> &[Gate] { &self.0 }

    /// Append a gate.
    pub fn push(&mut self, gate: Gate) -> &mut Self {
        self.0.push(gate);
        self
    }

    /// Render `self` as a one-line wire diagram ending in a measurement, e.g.
    /// `q: ∣0⟩──H──X──M`.
    pub fn diagram(&self) -> String {
        let body: String = self.0.iter().map(|g| format!("──{}", g)).collect();
        format!("q: ∣0⟩{}──M", body)
    }
}

/// How to treat a circuit with no gates.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum EmptyPolicy {
    /// The empty circuit is the identity: every shot measures 0.
    #[default]
    Identity,
    /// The empty circuit is an error ([`QGateError::EmptyCircuit`]).
    Reject,
}

/// Settings for a [`Runner`].
#[derive(Clone, Debug, PartialEq)]
pub struct RunConfig {
    /// Number of shots taken by [`Runner::run`].
    pub shots: usize,
    /// Seed for the internal random number generator; drawn from system
    /// entropy if `None`.
    pub seed: Option<u64>,
    /// Treatment of circuits with no gates.
    pub empty_policy: EmptyPolicy,
    /// Sample shots on the `rayon` thread pool.
    pub parallel: bool,
    /// Tolerance on the norm drift before a state is renormalized.
    pub norm_tol: f64,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            shots: 1000,
            seed: None,
            empty_policy: EmptyPolicy::default(),
            parallel: false,
            norm_tol: NORM_TOL,
        }
    }
}

impl RunConfig {
    pub fn with_shots(mut self, shots: usize) -> Self {
        self.shots = shots;
        self
    }

    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_empty_policy(mut self, empty_policy: EmptyPolicy) -> Self {
        self.empty_policy = empty_policy;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_norm_tol(mut self, norm_tol: f64) -> Self {
        self.norm_tol = norm_tol;
        self
    }
}

/// Main driver for applying circuits and sampling their output.
///
/// The random number generator persists across runs, so consecutive runs on
/// one `Runner` draw different samples while the whole sequence stays
/// reproducible for a fixed seed.
#[derive(Clone, Debug)]
pub struct Runner {
    pub config: RunConfig,
    pub rng: StdRng,
}

impl Default for Runner {
    fn default() -> Self { Self::with_config(RunConfig::default()) }
}

impl Runner {
    /// Create a new `Runner` with default settings, optionally seeding the
    /// internal random number generator.
    pub fn new(seed: Option<u64>) -> Self {
        Self::with_config(RunConfig::default().with_seed(seed))
    }

    /// Create a new `Runner` from explicit settings.
    pub fn with_config(config: RunConfig) -> Self {
        let rng
            = config.seed.map(StdRng::seed_from_u64)
            .unwrap_or_else(StdRng::from_entropy);
        Self { config, rng }
    }

    /// Apply every gate of `circuit` to ∣0⟩ and return the final state.
    pub fn evolve(&self, circuit: &Circuit) -> QGateResult<State> {
        if circuit.is_empty() && self.config.empty_policy == EmptyPolicy::Reject
        {
            return Err(QGateError::EmptyCircuit);
        }
        let mut state = State::zero();
        for gate in circuit {
            state = state.apply_tol(&gate.matrix(), self.config.norm_tol);
            debug!(%gate, %state, "applied gate");
        }
        Ok(state)
    }

    /// Return the exact probabilities of measuring 0 and 1 at the end of
    /// `circuit`.
    pub fn probabilities(&self, circuit: &Circuit) -> QGateResult<[f64; 2]> {
        self.evolve(circuit).map(|state| state.probabilities())
    }

    /// Draw `shots` measurements of a fixed `state`.
    pub fn sample(&mut self, state: &State, shots: usize)
        -> QGateResult<Counts>
    {
        if shots == 0 {
            return Err(QGateError::InvalidShotCount(0));
        }
        if self.config.parallel {
            Ok(self.sample_par(state, shots))
        } else {
            Ok(measure::sample(state, shots, &mut self.rng))
        }
    }

    // each chunk gets its own generator, seeded in chunk order from
    // `self.rng`, so results don't depend on thread scheduling
    fn sample_par(&mut self, state: &State, shots: usize) -> Counts {
        let n_chunks = shots.div_ceil(PAR_CHUNK);
        let seeds: Vec<u64> = (0..n_chunks).map(|_| self.rng.gen()).collect();
        let state = *state;
        seeds.into_par_iter()
            .enumerate()
            .map(|(k, seed)| {
                let n = PAR_CHUNK.min(shots - k * PAR_CHUNK);
                let mut rng = StdRng::seed_from_u64(seed);
                measure::sample(&state, n, &mut rng)
            })
            .reduce(Counts::new, |mut acc, counts| { acc.merge(&counts); acc })
    }

    /// Run `circuit` for `self.config.shots` shots.
    pub fn run(&mut self, circuit: &Circuit) -> QGateResult<Counts> {
        self.run_shots(circuit, self.config.shots)
    }

    /// Run `circuit` for a given number of shots.
    pub fn run_shots(&mut self, circuit: &Circuit, shots: usize)
        -> QGateResult<Counts>
    {
        if shots == 0 {
            return Err(QGateError::InvalidShotCount(0));
        }
        info!(%circuit, shots, parallel = self.config.parallel, "running circuit");
        let state = self.evolve(circuit)?;
        let counts = self.sample(&state, shots)?;
        debug!(counts = ?counts.to_labeled(), "sampling finished");
        Ok(counts)
    }
}

/// Run a circuit given as a series of gate names for `shots` shots,
/// optionally seeding the random number generator.
///
/// The empty circuit is the identity. Deterministic for a fixed seed.
pub fn run<S>(gates: &[S], shots: usize, seed: Option<u64>)
    -> QGateResult<Counts>
where S: AsRef<str>
{
    if shots == 0 {
        return Err(QGateError::InvalidShotCount(0));
    }
    let circuit = Circuit::from_names(gates)?;
    Runner::new(seed).run_shots(&circuit, shots)
}

#[cfg(test)]
mod test {
    use std::collections::BTreeMap;
    use super::*;
    use crate::measure::Outcome;

    #[test]
    fn hadamard_statistics() {
        // 4σ band for p = 1/2, n = 10000
        let counts = run(&["H"], 10_000, Some(42)).unwrap();
        assert_eq!(counts.total(), 10_000);
        for outcome in [Outcome::Zero, Outcome::One] {
            let n = counts.get(outcome) as i64;
            assert!((n - 5000).abs() <= 200, "{}: {}", outcome, n);
        }
    }

    #[test]
    fn x_always_one() {
        let counts = run(&["X"], 1000, None).unwrap();
        assert_eq!(counts.to_labeled(), BTreeMap::from([("1", 1000)]));
    }

    #[test]
    fn empty_is_identity() {
        let counts = run::<&str>(&[], 100, Some(0)).unwrap();
        assert_eq!(counts.to_labeled(), BTreeMap::from([("0", 100)]));
    }

    #[test]
    fn empty_rejected_by_policy() {
        let config = RunConfig::default()
            .with_seed(Some(0))
            .with_empty_policy(EmptyPolicy::Reject);
        let mut runner = Runner::with_config(config);
        assert_eq!(runner.run(&Circuit::default()), Err(QGateError::EmptyCircuit));
        assert!(runner.run(&Circuit::new([Gate::H])).is_ok());
    }

    #[test]
    fn zero_shots() {
        assert_eq!(run(&["X"], 0, None), Err(QGateError::InvalidShotCount(0)));
        let mut runner = Runner::new(Some(1));
        assert_eq!(
            runner.sample(&State::zero(), 0),
            Err(QGateError::InvalidShotCount(0)),
        );
    }

    #[test]
    fn unknown_gate() {
        assert_eq!(
            run(&["Q"], 10, None),
            Err(QGateError::UnknownGate("Q".to_string())),
        );
        assert_eq!(
            run(&["H", "CNOT", "Q"], 10, None),
            Err(QGateError::UnknownGate("CNOT".to_string())),
        );
    }

    #[test]
    fn seeded_runs_repeat() {
        let gates = ["H", "T", "H"];
        assert_eq!(
            run(&gates, 2000, Some(12345)).unwrap(),
            run(&gates, 2000, Some(12345)).unwrap(),
        );
    }

    #[test]
    fn parallel_seeded_runs_repeat() {
        let config = RunConfig::default()
            .with_seed(Some(99))
            .with_parallel(true)
            .with_shots(3 * PAR_CHUNK + 17);
        let circuit: Circuit = "H, S, H".parse().unwrap();
        let a = Runner::with_config(config.clone()).run(&circuit).unwrap();
        let b = Runner::with_config(config.clone()).run(&circuit).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.total(), config.shots);
    }

    #[test]
    fn runner_advances_rng() {
        let circuit = Circuit::new([Gate::H]);
        let mut runner = Runner::new(Some(5));
        let first = runner.run_shots(&circuit, 500).unwrap();
        let second = runner.run_shots(&circuit, 500).unwrap();
        assert_eq!(first.total(), second.total());
        let mut replay = Runner::new(Some(5));
        assert_eq!(replay.run_shots(&circuit, 500).unwrap(), first);
    }

    #[test]
    fn combination_probabilities() {
        let runner = Runner::new(Some(0));
        let circuit: Circuit = "H,X,S,H".parse().unwrap();
        let [p0, p1] = runner.probabilities(&circuit).unwrap();
        assert!((p0 - 0.5).abs() < 1e-12 && (p1 - 0.5).abs() < 1e-12);
        let hh: Circuit = "H,H".parse().unwrap();
        let [p0, _] = runner.probabilities(&hh).unwrap();
        assert!((p0 - 1.0).abs() < 1e-12);
    }

    #[test]
    fn evolve_leaves_zero_state_alone() {
        let runner = Runner::new(Some(0));
        let out = runner.evolve(&Circuit::new([Gate::X])).unwrap();
        assert_eq!(out, State::zero().apply_gate(Gate::X));
        assert_eq!(runner.evolve(&Circuit::default()).unwrap(), State::zero());
    }

    #[test]
    fn parse_circuits() {
        let circuit: Circuit = "X, h ,S".parse().unwrap();
        assert_eq!(circuit.gates(), &[Gate::X, Gate::H, Gate::S]);
        assert!("  ".parse::<Circuit>().unwrap().is_empty());
        assert_eq!(
            "X,,H".parse::<Circuit>(),
            Err(QGateError::UnknownGate(String::new())),
        );
    }

    #[test]
    fn display_circuits() {
        let circuit = Circuit::new([Gate::H, Gate::X, Gate::S, Gate::H]);
        assert_eq!(circuit.to_string(), "H → X → S → H");
        assert_eq!(circuit.diagram(), "q: ∣0⟩──H──X──S──H──M");
        assert_eq!(Circuit::default().to_string(), "I");
        assert_eq!(Circuit::default().diagram(), "q: ∣0⟩──M");
    }
}

//! The fixed set of single-qubit gates and their unitary matrices.
//!
//! All matrices are written in the *z*-basis, ordered ∣0⟩ then ∣1⟩, and are
//! built once into a shared read-only table on first use.
//!
//! See also: <https://en.wikipedia.org/wiki/Quantum_logic_gate>

use std::{ fmt, str::FromStr };
use nalgebra as na;
use num_complex::Complex64 as C64;
use once_cell::sync::Lazy;
use rustc_hash::FxHashMap;
use crate::{ c, QGateError, QGateResult };

/// A 2 × 2 complex matrix acting on a single qubit.
pub type Mat2 = na::Matrix2<C64>;

/// Description of a single gate.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Gate {
    /// π rotation about X
    X,
    /// π rotation about Y
    Y,
    /// π rotation about Z
    Z,
    /// π/2 rotation about Z (the Phase gate)
    S,
    /// π/4 rotation about Z
    T,
    /// Hadamard
    H,
}

static GATE_TABLE: Lazy<FxHashMap<Gate, Mat2>> = Lazy::new(|| {
    use std::f64::consts::{ FRAC_1_SQRT_2, FRAC_PI_4 };
    const ZERO: C64 = C64 { re: 0.0, im: 0.0 };
    const ONE:  C64 = C64 { re: 1.0, im: 0.0 };
    const ORT2: C64 = C64 { re: FRAC_1_SQRT_2, im: 0.0 };
    Gate::ALL.iter().copied()
        .map(|gate| {
            // `Matrix2::new` takes its entries in row-major order
            let mat = match gate {
                Gate::X => Mat2::new(ZERO, ONE, ONE, ZERO),
                Gate::Y => Mat2::new(ZERO, c!(i (-1.0)), c!(i 1.0), ZERO),
                Gate::Z => Mat2::new(ONE, ZERO, ZERO, -ONE),
                Gate::S => Mat2::new(ONE, ZERO, ZERO, c!(i 1.0)),
                Gate::T => Mat2::new(ONE, ZERO, ZERO, c!(e FRAC_PI_4)),
                Gate::H => Mat2::new(ORT2, ORT2, ORT2, -ORT2),
            };
            (gate, mat)
        })
        .collect()
});

impl fmt::Display for Gate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.name().fmt(f)
    }
}

/// Parses a gate name, ignoring surrounding whitespace and case. `P` and
/// `PHASE` are accepted as aliases of `S`.
impl FromStr for Gate {
    type Err = QGateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        match name.to_ascii_uppercase().as_str() {
            "X" => Ok(Self::X),
            "Y" => Ok(Self::Y),
            "Z" => Ok(Self::Z),
            "S" | "P" | "PHASE" => Ok(Self::S),
            "T" => Ok(Self::T),
            "H" => Ok(Self::H),
            _ => Err(QGateError::UnknownGate(name.to_string())),
        }
    }
}

impl Gate {
    /// Every supported gate, in table order.
    pub const ALL: [Self; 6] = [
        Self::X, Self::Y, Self::Z, Self::S, Self::T, Self::H,
    ];

    /// Return the canonical (upper-case, single-letter) name of `self`.
    pub fn name(&self) -> &'static str {
        match self {
            Self::X => "X",
            Self::Y => "Y",
            Self::Z => "Z",
            Self::S => "S",
            Self::T => "T",
            Self::H => "H",
        }
    }

    /// Return a short human-readable description of `self`.
    pub fn description(&self) -> &'static str {
        match self {
            Self::X => "Pauli-X (NOT): ∣0⟩ → ∣1⟩, ∣1⟩ → ∣0⟩",
            Self::Y => "Pauli-Y: ∣0⟩ → i∣1⟩, ∣1⟩ → –i∣0⟩",
            Self::Z => "Pauli-Z (phase flip): ∣0⟩ → ∣0⟩, ∣1⟩ → –∣1⟩",
            Self::S => "Phase (S): ∣0⟩ → ∣0⟩, ∣1⟩ → i∣1⟩",
            Self::T => "T (π/8): ∣0⟩ → ∣0⟩, ∣1⟩ → e^iπ/4∣1⟩",
            Self::H => "Hadamard: ∣0⟩ → ∣+⟩, ∣1⟩ → ∣–⟩",
        }
    }

    /// Return the unitary matrix of `self` in the *z*-basis.
    pub fn matrix(&self) -> Mat2 { GATE_TABLE[self] }

    /// Return `true` if `self` is one of the three Pauli gates.
    pub fn is_pauli(&self) -> bool { matches!(self, Self::X | Self::Y | Self::Z) }

    /// Return `true` if `self` is diagonal in the *z*-basis, i.e. it only
    /// changes relative phases and never measurement probabilities.
    pub fn is_diagonal(&self) -> bool {
        matches!(self, Self::Z | Self::S | Self::T)
    }

    /// Return `true` if `self` is its own inverse.
    pub fn is_involution(&self) -> bool {
        matches!(self, Self::X | Self::Y | Self::Z | Self::H)
    }
}

/// Look up the matrix for a gate by name.
///
/// Fails with [`QGateError::UnknownGate`] for anything outside the supported
/// set.
pub fn gate_matrix(name: &str) -> QGateResult<Mat2> {
    name.parse::<Gate>().map(|gate| gate.matrix())
}

/// Return `true` if `M M†` is the identity to within `tol` (Frobenius norm).
pub fn is_unitary(mat: &Mat2, tol: f64) -> bool {
    (mat * mat.adjoint() - Mat2::identity()).norm() < tol
}

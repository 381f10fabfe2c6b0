//! Statevector representation of a single qubit.
//!
//! A [`State`] is the pair of *z*-basis amplitudes (α, β) of α∣0⟩ + β∣1⟩ with
//! |α|² + |β|² = 1. Gates act by ordinary matrix-vector multiplication; since
//! every gate in the table is unitary, the norm is only ever disturbed by
//! floating-point error, and a state is renormalized only when that error
//! grows past a tolerance.

use std::fmt;
use nalgebra as na;
use num_complex::Complex64 as C64;
use tracing::debug;
use crate::{
    c,
    gate::{ Gate, Mat2 },
};

/// Default tolerance on |‖ψ‖ – 1| beyond which a state is renormalized after a
/// gate application.
pub const NORM_TOL: f64 = 1e-12;

/// A pure single-qubit state in the *z*-basis.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct State(na::Vector2<C64>);

/// Creates a [`State::zero`].
impl Default for State {
    fn default() -> Self { Self::zero() }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prec = f.precision().unwrap_or(4);
        let [a, b] = self.amps();
        write!(f, "({:+.*}{:+.*}i)∣0⟩ ", prec, a.re, prec, a.im)?;
        write!(f, "+ ({:+.*}{:+.*}i)∣1⟩", prec, b.re, prec, b.im)?;
        Ok(())
    }
}

impl AsRef<na::Vector2<C64>> for State {
    fn as_ref(&self) -> &na::Vector2<C64> { &self.0 }
}

impl State {
    /// ∣0⟩
    pub fn zero() -> Self { Self(na::Vector2::new(c!(1.0), c!(0.0))) }

    /// ∣1⟩
    pub fn one() -> Self { Self(na::Vector2::new(c!(0.0), c!(1.0))) }

    /// ∣+⟩ = (∣0⟩ + ∣1⟩) / √2
    pub fn plus() -> Self {
        use std::f64::consts::FRAC_1_SQRT_2;
        Self(na::Vector2::new(c!(FRAC_1_SQRT_2), c!(FRAC_1_SQRT_2)))
    }

    /// ∣–⟩ = (∣0⟩ – ∣1⟩) / √2
    pub fn minus() -> Self {
        use std::f64::consts::FRAC_1_SQRT_2;
        Self(na::Vector2::new(c!(FRAC_1_SQRT_2), c!(-FRAC_1_SQRT_2)))
    }

    /// Create a new state from a pair of amplitudes, normalizing them.
    ///
    /// Returns `None` if both amplitudes are zero or either is non-finite.
    pub fn from_amps(a: C64, b: C64) -> Option<Self> {
        let psi = na::Vector2::new(a, b);
        let norm = psi.norm();
        (norm.is_finite() && norm > 0.0)
            .then(|| Self(psi.map(|amp| amp / norm)))
    }

    /// Return the *z*-basis amplitudes, with ∣0⟩ ordered first.
    pub fn amps(&self) -> [C64; 2] { [self.0[0], self.0[1]] }

    /// Return the amplitude on ∣0⟩.
    pub fn alpha(&self) -> C64 { self.0[0] }

    /// Return the amplitude on ∣1⟩.
    pub fn beta(&self) -> C64 { self.0[1] }

    /// Return the Euclidean norm of the amplitude vector.
    pub fn norm(&self) -> f64 { self.0.norm() }

    /// Return the Born-rule probabilities of measuring 0 and 1, respectively.
    pub fn probabilities(&self) -> [f64; 2] {
        [self.0[0].norm_sqr(), self.0[1].norm_sqr()]
    }

    /// Return the Cartesian coordinates of `self` on the Bloch sphere.
    ///
    /// ∣0⟩ sits at +*z*, ∣+⟩ at +*x*, and (∣0⟩ + i∣1⟩) / √2 at +*y*.
    pub fn bloch(&self) -> [f64; 3] {
        let [a, b] = self.amps();
        let coh = a.conj() * b;
        [2.0 * coh.re, 2.0 * coh.im, a.norm_sqr() - b.norm_sqr()]
    }

    /// Return `M ψ` for a gate matrix `M`, renormalizing only if the norm has
    /// drifted from 1 by more than [`NORM_TOL`].
    pub fn apply(&self, mat: &Mat2) -> Self { self.apply_tol(mat, NORM_TOL) }

    /// Like [`Self::apply`], but with an explicit renormalization tolerance.
    pub fn apply_tol(&self, mat: &Mat2, tol: f64) -> Self {
        Self(mat * self.0).renormalized(tol)
    }

    /// Return the result of applying `gate` to `self`.
    pub fn apply_gate(&self, gate: Gate) -> Self { self.apply(&gate.matrix()) }

    /// Apply `gate` to `self` in place.
    pub fn apply_mut(&mut self, gate: Gate) -> &mut Self {
        *self = self.apply_gate(gate);
        self
    }

    /// Apply a series of gates in place, in order.
    pub fn apply_circuit<'a, I>(&mut self, gates: I) -> &mut Self
    where I: IntoIterator<Item = &'a Gate>
    {
        gates.into_iter().copied().for_each(|g| { self.apply_mut(g); });
        self
    }

    /// Return `true` if every amplitude of `self` is within `tol` of the
    /// corresponding amplitude of `other`.
    ///
    /// Global phase is *not* factored out.
    pub fn approx_eq(&self, other: &Self, tol: f64) -> bool {
        self.0.iter().zip(other.0.iter()).all(|(a, b)| (a - b).norm() < tol)
    }

    fn renormalized(self, tol: f64) -> Self {
        let norm = self.0.norm();
        if (norm - 1.0).abs() > tol && norm > 0.0 {
            debug!(norm, "renormalizing state");
            Self(self.0.map(|amp| amp / norm))
        } else {
            self
        }
    }
}

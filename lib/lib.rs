//! Tools for simulating a single qubit acted on by the fixed gate set of
//! Pauli-*X*, Pauli-*Y*, Pauli-*Z*, Phase (*S*), *T*, and Hadamard.
//!
//! - [`gate`] holds the gate table: one immutable 2 × 2 unitary per gate.
//! - [`state`] describes the statevector α∣0⟩ + β∣1⟩ and applies gates to it.
//! - [`measure`] samples single shots in the *Z* basis and tallies them.
//! - [`circuit`] strings the above together: a gate sequence is applied to
//! ∣0⟩ and the resulting state is sampled a requested number of times.
//!
//! # Example
//! ```
//! use qgate_sim::{ circuit::run, measure::Outcome };
//!
//! // H followed by H is the identity, so every shot gives 0
//! let counts = run(&["H", "H"], 1000, Some(42)).unwrap();
//! assert_eq!(counts.get(Outcome::Zero), 1000);
//! assert_eq!(counts.get(Outcome::One), 0);
//! ```

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QGateError {
    #[error("unknown gate '{0}': expected one of X, Y, Z, S, T, H")]
    UnknownGate(String),

    #[error("invalid shot count {0}: must be a positive integer")]
    InvalidShotCount(i64),

    #[error("empty circuit: at least one gate is required")]
    EmptyCircuit,
}
pub type QGateResult<T> = Result<T, QGateError>;

pub mod gate;
pub mod state;
pub mod measure;
pub mod circuit;

pub extern crate num_complex;
/// Handy macro to create `num_complex::Complex64`s from more natural and
/// succinct syntax.
///
/// ```
/// use std::f64::consts::PI;
/// use num_complex::Complex64;
/// use qgate_sim::c;
///
/// assert_eq!( c!(i (-1.0)),    Complex64::new(0.0, -1.0)      );
/// assert_eq!( c!(e PI),        Complex64::cis(PI)             );
/// assert_eq!( c!(1.0),         Complex64::new(1.0, 0.0)       );
/// assert_eq!( c!(1.0, 1.0),    Complex64::new(1.0, 1.0)       );
/// assert_eq!( c!(1.0, e PI),   Complex64::from_polar(1.0, PI) );
/// ```
#[macro_export]
macro_rules! c {
    ( i $im:expr )
        => { $crate::num_complex::Complex64::new(0.0, $im) };
    ( e $ph:expr )
        => { $crate::num_complex::Complex64::cis($ph) };
    ( $re:expr )
        => { $crate::num_complex::Complex64::new($re, 0.0) };
    ( $r:expr, e $ph:expr )
        => { $crate::num_complex::Complex64::from_polar($r, $ph) };
    ( $re:expr, $im:expr )
        => { $crate::num_complex::Complex64::new($re, $im) };
}

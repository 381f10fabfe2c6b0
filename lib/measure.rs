//! Projective measurement of a single qubit in the *z*-basis.
//!
//! A shot collapses the state to ∣0⟩ with probability |α|² and to ∣1⟩
//! otherwise. Sampling never modifies the state it reads, so any number of
//! shots may be drawn against the same post-gate state.

use std::{ collections::BTreeMap, fmt };
use itertools::Itertools;
use rand::Rng;
use crate::state::State;

/// The classical result of a single shot.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Outcome {
    /// ∣0⟩
    Zero,
    /// ∣1⟩
    One,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.label().fmt(f)
    }
}

impl Outcome {
    /// Return the bit-string label of `self`, `"0"` or `"1"`.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Zero => "0",
            Self::One => "1",
        }
    }

    /// Convert to a bare bit.
    pub fn as_bit(&self) -> u8 {
        match self {
            Self::Zero => 0,
            Self::One => 1,
        }
    }
}

/// Perform a single *z*-basis measurement on `state`.
///
/// Draws `r` uniformly from [0, 1) and returns [`Outcome::Zero`] if `r < |α|²`,
/// otherwise [`Outcome::One`].
pub fn measure<R>(state: &State, rng: &mut R) -> Outcome
where R: Rng + ?Sized
{
    let p0 = state.alpha().norm_sqr();
    if rng.gen::<f64>() < p0 { Outcome::Zero } else { Outcome::One }
}

/// Draw `shots` independent measurements of `state` and tally them.
pub fn sample<R>(state: &State, shots: usize, rng: &mut R) -> Counts
where R: Rng + ?Sized
{
    (0..shots).map(|_| measure(state, rng)).collect()
}

/// Tally of measurement outcomes over a number of shots.
///
/// Only outcomes that were actually observed appear as keys; querying an
/// unobserved outcome with [`Self::get`] gives zero.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Counts(BTreeMap<Outcome, usize>);

impl FromIterator<Outcome> for Counts {
    fn from_iter<I>(iter: I) -> Self
    where I: IntoIterator<Item = Outcome>
    {
        let mut counts = Self::new();
        iter.into_iter().for_each(|o| { counts.record(o); });
        counts
    }
}

impl FromIterator<(Outcome, usize)> for Counts {
    fn from_iter<I>(iter: I) -> Self
    where I: IntoIterator<Item = (Outcome, usize)>
    {
        let mut counts = Self::new();
        iter.into_iter()
            .filter(|(_, n)| *n > 0)
            .for_each(|(o, n)| { *counts.0.entry(o).or_insert(0) += n; });
        counts
    }
}

impl<'a> IntoIterator for &'a Counts {
    type Item = (&'a Outcome, &'a usize);
    type IntoIter = std::collections::btree_map::Iter<'a, Outcome, usize>;

    fn into_iter(self) -> Self::IntoIter { self.0.iter() }
}

/// Writes one `outcome: count` line per observed outcome.
impl fmt::Display for Counts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            self.0.iter().map(|(o, n)| format!("{}: {}", o, n)).join("\n"),
        )
    }
}

impl Counts {
    /// Create a new, empty tally.
    pub fn new() -> Self { Self(BTreeMap::new()) }

    /// Record a single outcome.
    pub fn record(&mut self, outcome: Outcome) -> &mut Self {
        *self.0.entry(outcome).or_insert(0) += 1;
        self
    }

    /// Add all of `other`'s tallies to `self`.
    pub fn merge(&mut self, other: &Self) -> &mut Self {
        other.0.iter()
            .for_each(|(o, n)| { *self.0.entry(*o).or_insert(0) += n; });
        self
    }

    /// Return the number of times `outcome` was observed.
    pub fn get(&self, outcome: Outcome) -> usize {
        self.0.get(&outcome).copied().unwrap_or(0)
    }

    /// Return the total number of shots recorded.
    pub fn total(&self) -> usize { self.0.values().sum() }

    /// Return the number of distinct outcomes observed.
    pub fn len(&self) -> usize { self.0.len() }

    pub fn is_empty(&self) -> bool { self.0.is_empty() }

    /// Return the observed frequency of `outcome`, or `None` if nothing has
    /// been recorded.
    pub fn frequency(&self, outcome: Outcome) -> Option<f64> {
        let total = self.total();
        (total > 0).then(|| self.get(outcome) as f64 / total as f64)
    }

    /// Iterate over observed outcomes and their counts, `0` before `1`.
    pub fn iter(&self) -> impl Iterator<Item = (Outcome, usize)> + '_ {
        self.0.iter().map(|(o, n)| (*o, *n))
    }

    /// Return the tally keyed by bit-string label.
    pub fn to_labeled(&self) -> BTreeMap<&'static str, usize> {
        self.iter().map(|(o, n)| (o.label(), n)).collect()
    }
}

//! Core state definitions for the Shut the Box MDP
//!
//! This module defines the value types the rest of the engine is keyed on.
//! All of them are small, immutable and `Copy`; solver state (utilities) is
//! stored separately in flat arrays indexed by state position.

use std::fmt;

/// Smallest total two six-sided dice can show.
pub const MIN_DICE_TOTAL: u8 = 2;
/// Largest total two six-sided dice can show.
pub const MAX_DICE_TOTAL: u8 = 12;
/// Number of distinct dice totals (2 through 12 inclusive).
pub const NUM_DICE_TOTALS: usize = (MAX_DICE_TOTAL - MIN_DICE_TOTAL + 1) as usize;

/// An immutable set of distinct numbers from 1..=16, stored as a bitmask
/// (bit `n - 1` set means the number `n` is present).
///
/// Represents the numbers not yet eliminated in the current round. Two sets
/// are equal iff their elements are equal; all operations return new sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NumberSet(u16);

impl NumberSet {
    /// Largest number (and largest game size) a set can hold.
    pub const MAX_NUMBERS: u8 = 16;

    /// The empty set.
    pub fn empty() -> Self {
        NumberSet(0)
    }

    /// The full set {1, 2, ..., n}.
    pub fn full(n: u8) -> Self {
        assert!(
            n >= 1 && n <= Self::MAX_NUMBERS,
            "NumberSet size must be 1-16"
        );
        NumberSet(((1u32 << n) - 1) as u16)
    }

    /// Reconstruct a set from its raw bitmask.
    pub fn from_mask(mask: u16) -> Self {
        NumberSet(mask)
    }

    /// Raw bitmask (bit `n - 1` ↔ number `n`).
    pub fn mask(self) -> u16 {
        self.0
    }

    /// Whether the number `n` is in the set. Numbers outside 1..=16 are
    /// never members.
    pub fn contains(self, n: u8) -> bool {
        n >= 1 && n <= Self::MAX_NUMBERS && self.0 & (1u16 << (n - 1)) != 0
    }

    /// New set with `n` added.
    pub fn with(self, n: u8) -> Self {
        assert!(n >= 1 && n <= Self::MAX_NUMBERS, "number must be 1-16");
        NumberSet(self.0 | (1u16 << (n - 1)))
    }

    /// New set with `n` removed (no-op if absent).
    pub fn without(self, n: u8) -> Self {
        assert!(n >= 1 && n <= Self::MAX_NUMBERS, "number must be 1-16");
        NumberSet(self.0 & !(1u16 << (n - 1)))
    }

    /// New set with every element of `other` removed.
    pub fn difference(self, other: NumberSet) -> Self {
        NumberSet(self.0 & !other.0)
    }

    /// Whether every element of `self` is also in `other`.
    pub fn is_subset_of(self, other: NumberSet) -> bool {
        self.0 & !other.0 == 0
    }

    /// Sum of the elements.
    pub fn sum(self) -> u32 {
        self.iter().map(u32::from).sum()
    }

    /// Number of elements.
    pub fn len(self) -> u32 {
        self.0.count_ones()
    }

    /// Whether the set has no elements.
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Elements in ascending order.
    pub fn iter(self) -> impl Iterator<Item = u8> + Clone {
        (1..=Self::MAX_NUMBERS).filter(move |&n| self.contains(n))
    }
}

impl FromIterator<u8> for NumberSet {
    fn from_iter<T: IntoIterator<Item = u8>>(iter: T) -> Self {
        iter.into_iter().fold(NumberSet::empty(), NumberSet::with)
    }
}

impl fmt::Display for NumberSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, n) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", n)?;
        }
        write!(f, "}}")
    }
}

/// A position in the round: the numbers still open and the total the dice
/// currently show.
///
/// States are compared and hashed by value; this is the key used for utility
/// lookup and the memoized action lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct State {
    remaining: NumberSet,
    dice_total: u8,
}

impl State {
    /// Create a state. The dice total must lie in [2, 12].
    pub fn new(remaining: NumberSet, dice_total: u8) -> Self {
        assert!(
            (MIN_DICE_TOTAL..=MAX_DICE_TOTAL).contains(&dice_total),
            "dice total must be 2-12"
        );
        State { remaining, dice_total }
    }

    /// Numbers not yet eliminated.
    pub fn remaining(self) -> NumberSet {
        self.remaining
    }

    /// Current dice total (2-12).
    pub fn dice_total(self) -> u8 {
        self.dice_total
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.remaining, self.dice_total)
    }
}

/// A legal move: a non-empty subset of the state's remaining numbers whose
/// sum equals the state's dice total. Choosing it eliminates those numbers.
///
/// "No legal action" is always represented as an empty action list, never as
/// an empty-set action (the empty subset sums to 0, outside [2, 12]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Action(NumberSet);

impl Action {
    /// Create an action from a non-empty set of numbers.
    pub fn new(numbers: NumberSet) -> Self {
        assert!(!numbers.is_empty(), "an action must eliminate at least one number");
        Action(numbers)
    }

    /// The numbers this action eliminates.
    pub fn numbers(self) -> NumberSet {
        self.0
    }

    /// Sum of the eliminated numbers (equals the dice total of every state
    /// this action is legal in).
    pub fn sum(self) -> u32 {
        self.0.sum()
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

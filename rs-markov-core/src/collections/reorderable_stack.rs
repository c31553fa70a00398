use std::fmt;

use rand::Rng;
use rand::seq::SliceRandom;

use crate::error::{MarkovError, Result};

/// Last-in first-out stack that can be randomly reordered.
///
/// Each window of a trained model owns one of these, holding every character
/// observed after that window (duplicates kept). Shuffling before popping turns
/// repeated pops into sampling without replacement from the observations, so
/// frequent continuations come out proportionally more often.
///
/// # Invariants
/// - `shuffle` never changes the multiset of values nor their count
///
/// # Notes
/// - The top of the stack is the last element of the backing `Vec`.
/// - Because `shuffle` reorders the stack, it does not always behave as a strict LIFO.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReorderableStack<T> {
	items: Vec<T>,
}

impl<T> ReorderableStack<T> {
	/// Creates an empty stack.
	pub fn new() -> Self {
		Self { items: Vec::new() }
	}

	/// Places a value on top.
	pub fn push(&mut self, value: T) {
		self.items.push(value);
	}

	/// Removes and returns the top value, or `None` if the stack is empty.
	pub fn pop(&mut self) -> Option<T> {
		self.items.pop()
	}

	/// Same as `pop`, reporting an empty stack as an error.
	pub fn try_pop(&mut self) -> Result<T> {
		self.pop().ok_or(MarkovError::EmptyContainer)
	}

	/// Returns the top value without removing it.
	pub fn peek(&self) -> Option<&T> {
		self.items.last()
	}

	pub fn is_empty(&self) -> bool {
		self.items.is_empty()
	}

	pub fn len(&self) -> usize {
		self.items.len()
	}

	/// Iterates from top to bottom.
	pub fn iter(&self) -> impl Iterator<Item = &T> {
		self.items.iter().rev()
	}

	/// Applies a uniformly random permutation to the stack.
	///
	/// Uses a Fisher-Yates shuffle driven by the given random source, so every
	/// ordering is equally likely and a seeded source gives a reproducible order.
	/// Only the future pop order changes.
	pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
		self.items.shuffle(rng);
	}
}

impl<T: Clone> ReorderableStack<T> {
	/// Returns the current values from top to bottom, leaving the stack untouched.
	pub fn to_ordered_list(&self) -> Vec<T> {
		self.iter().cloned().collect()
	}
}

impl<T> Default for ReorderableStack<T> {
	fn default() -> Self {
		Self::new()
	}
}

/// Pushes the values in iteration order: the last one ends up on top.
impl<T> FromIterator<T> for ReorderableStack<T> {
	fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
		Self { items: iter.into_iter().collect() }
	}
}

/// Renders the values top-to-bottom as `[c, b, a]`.
impl<T: fmt::Display> fmt::Display for ReorderableStack<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "[")?;
		for (i, value) in self.iter().enumerate() {
			if i > 0 {
				write!(f, ", ")?;
			}
			write!(f, "{value}")?;
		}
		write!(f, "]")
	}
}

use std::collections::VecDeque;
use std::fmt;

use crate::error::{MarkovError, Result};

/// First-in first-out sequence of values.
///
/// Used by the model as the generation cursor: characters are enqueued at the back
/// as they are generated and `maintain_size` drops the oldest ones so that the
/// sequence never grows past the window width.
///
/// # Responsibilities
/// - Append at the back, remove from the front
/// - Trim itself down to a maximum size
/// - Expose its contents front-to-back without mutation
///
/// # Notes
/// - Emptiness is reported through `Option`: `dequeue` and `peek` return `None`
///   on an empty sequence. `try_dequeue` maps that to `MarkovError::EmptyContainer`.
/// - All operations are O(1) except `maintain_size` (O(excess)) and
///   `to_ordered_list` (O(n)).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OrderedSequence<T> {
	items: VecDeque<T>,
}

impl<T> OrderedSequence<T> {
	/// Creates an empty sequence.
	pub fn new() -> Self {
		Self { items: VecDeque::new() }
	}

	/// Appends a value at the back. The sequence has no capacity limit by itself.
	pub fn enqueue(&mut self, value: T) {
		self.items.push_back(value);
	}

	/// Removes and returns the front value, or `None` if the sequence is empty.
	pub fn dequeue(&mut self) -> Option<T> {
		self.items.pop_front()
	}

	/// Same as `dequeue`, reporting an empty sequence as an error.
	pub fn try_dequeue(&mut self) -> Result<T> {
		self.dequeue().ok_or(MarkovError::EmptyContainer)
	}

	/// Returns the front value without removing it.
	pub fn peek(&self) -> Option<&T> {
		self.items.front()
	}

	pub fn is_empty(&self) -> bool {
		self.items.is_empty()
	}

	pub fn size(&self) -> usize {
		self.items.len()
	}

	/// Dequeues from the front until at most `max_size` values remain.
	///
	/// The retained values are the `max_size` most recently enqueued ones, in their
	/// original order. Does nothing if the sequence already fits.
	pub fn maintain_size(&mut self, max_size: usize) {
		while self.items.len() > max_size {
			self.items.pop_front();
		}
	}

	/// Removes every value.
	pub fn clear(&mut self) {
		self.items.clear();
	}

	/// Iterates front-to-back.
	pub fn iter(&self) -> impl Iterator<Item = &T> {
		self.items.iter()
	}
}

impl<T: Clone> OrderedSequence<T> {
	/// Returns the current values from front to back, leaving the sequence untouched.
	pub fn to_ordered_list(&self) -> Vec<T> {
		self.items.iter().cloned().collect()
	}
}

impl<T> Default for OrderedSequence<T> {
	fn default() -> Self {
		Self::new()
	}
}

impl<T> FromIterator<T> for OrderedSequence<T> {
	fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
		Self { items: iter.into_iter().collect() }
	}
}

/// Renders the values front-to-back as `[a, b, c]`.
impl<T: fmt::Display> fmt::Display for OrderedSequence<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "[")?;
		for (i, value) in self.items.iter().enumerate() {
			if i > 0 {
				write!(f, ", ")?;
			}
			write!(f, "{value}")?;
		}
		write!(f, "]")
	}
}

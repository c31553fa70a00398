//! Linear containers backing the Markov model.
//!
//! - `OrderedSequence`: FIFO with a trim-to-size operation (the generation cursor)
//! - `ReorderableStack`: LIFO with a uniform random reorder (per-window continuations)

/// Bounded-size FIFO used as the sliding window.
pub mod ordered_sequence;

/// LIFO of candidate characters supporting a fair shuffle.
pub mod reorderable_stack;

pub use ordered_sequence::OrderedSequence;
pub use reorderable_stack::ReorderableStack;

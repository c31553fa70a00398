//! Character-level Markov text generation library.
//!
//! This crate provides a k-order Markov chain over characters:
//! - Training from sample text into a window -> continuations mapping
//! - Sliding-window generation with re-seeding on unknown windows
//! - The two small containers the model is built on (FIFO window, shuffleable LIFO)
//!
//! Reading text from disk and printing results are left to the caller.

/// Error type shared by the containers and the model.
pub mod error;

/// Ordered containers used by the model.
///
/// `OrderedSequence` is the FIFO used as the generation cursor,
/// `ReorderableStack` holds the continuations observed for one window.
pub mod collections;

/// Markov model, its configuration and training / generation logic.
pub mod model;

pub use error::{MarkovError, Result};
pub use model::config::{MarkovConfig, SamplingMode};
pub use model::markov_model::MarkovModel;

//! Top-level module for the Markov generation system.
//!
//! - `MarkovModel`: window -> continuations mapping, training and generation
//! - `MarkovConfig`: construction parameters (window width, shuffling, sampling mode)

/// Construction parameters of a `MarkovModel`.
///
/// Deserializable so it can be read from query strings or config files.
pub mod config;

/// Character-level k-order Markov model.
///
/// Handles training from sample text, the sliding-window cursor,
/// and generation with re-seeding on unknown windows.
pub mod markov_model;

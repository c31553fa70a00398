use thiserror::Error;

/// Errors raised by the Markov model and its containers.
///
/// The containers themselves report emptiness through `Option`; `EmptyContainer`
/// is what their `try_*` accessors return when a caller prefers a `Result`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MarkovError {
	/// A dequeue, pop or peek was attempted on an empty container.
	#[error("container is empty")]
	EmptyContainer,

	/// The model was configured with values it cannot work with (ex. a zero window width).
	#[error("invalid configuration: {0}")]
	InvalidConfiguration(String),
}

pub type Result<T> = std::result::Result<T, MarkovError>;

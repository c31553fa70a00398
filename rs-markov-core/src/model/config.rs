use serde::Deserialize;

use crate::error::{MarkovError, Result};

/// How a continuation is drawn from a window's stack during generation.
#[derive(Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SamplingMode {
	/// Pop the top of the stack. Each generated character permanently removes
	/// one training observation, so repeated generation on the same model
	/// eventually exhausts its windows.
	#[default]
	Consume,
	/// Read the top of the stack without removing it. The trained
	/// observations are never exhausted.
	Preserve,
}

/// Parameters fixed when a `MarkovModel` is built.
///
/// # Invariants
/// - `window_width >= 1` once validated
///
/// # Notes
/// - Missing fields fall back to `MarkovConfig::default()` when deserialized.
#[derive(Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct MarkovConfig {
	/// Number of characters in a window (the order `k` of the model).
	pub window_width: usize,

	/// Whether a window's stack is shuffled before each draw.
	pub shuffle_on_generate: bool,

	/// Destructive (`Consume`) or non-destructive (`Preserve`) draws.
	pub sampling: SamplingMode,

	/// Character emitted each time the cursor is re-seeded.
	pub separator: char,
}

impl MarkovConfig {
	/// Creates a configuration with the default sampling mode and separator.
	pub fn new(window_width: usize, shuffle_on_generate: bool) -> Self {
		Self {
			window_width,
			shuffle_on_generate,
			..Self::default()
		}
	}

	pub fn with_sampling(mut self, sampling: SamplingMode) -> Self {
		self.sampling = sampling;
		self
	}

	pub fn with_separator(mut self, separator: char) -> Self {
		self.separator = separator;
		self
	}

	/// Checks that the configuration can drive a model.
	///
	/// # Errors
	/// Returns `InvalidConfiguration` if `window_width` is zero.
	pub fn validate(&self) -> Result<()> {
		if self.window_width == 0 {
			return Err(MarkovError::InvalidConfiguration(
				"window_width must be >= 1".to_owned(),
			));
		}
		Ok(())
	}
}

impl Default for MarkovConfig {
	fn default() -> Self {
		Self {
			window_width: 3,
			shuffle_on_generate: true,
			sampling: SamplingMode::Consume,
			separator: '\n',
		}
	}
}

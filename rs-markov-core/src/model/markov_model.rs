use std::collections::HashMap;

use log::{debug, trace};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::config::{MarkovConfig, SamplingMode};
use crate::collections::{OrderedSequence, ReorderableStack};
use crate::error::Result;

/// Upper bound on the output buffer reserved up front by `generate`.
const OUTPUT_CAPACITY_LIMIT: usize = 4096;

/// Character-level Markov model of order `k`.
///
/// The model maps every `k`-character window seen in the training text to a
/// stack of the characters that followed it. Generation walks this mapping with a
/// sliding window (the cursor): the current window selects a stack, a character is
/// drawn from it, appended to the output and pushed into the cursor.
///
/// # Responsibilities
/// - Accumulate continuations per window during training
/// - Maintain the generation cursor across calls
/// - Re-seed the cursor (emitting a separator) when a window has no continuation
///
/// # Invariants
/// - `config.window_width >= 1` and never changes after construction
/// - Every key of `windows` is exactly `window_width` characters long
/// - The cursor holds at most `window_width` characters between draws
///
/// # Notes
/// - With `SamplingMode::Consume` (the default), generating permanently removes
///   the observations it uses: repeated calls on one instance will end up
///   emitting only separators. Use `SamplingMode::Preserve` or `fork` to avoid it.
/// - The random source is injected so that tests can seed it.
/// - Not meant for concurrent use; `fork` gives each user an independent copy.
#[derive(Clone, Debug)]
pub struct MarkovModel<R = StdRng> {
	/// Construction parameters (window width, shuffling, sampling, separator).
	config: MarkovConfig,

	/// Mapping from a window to the characters observed right after it.
	/// Example: { "the" => [' ', 'r', ' ', 'm'] }
	windows: HashMap<String, ReorderableStack<char>>,

	/// Last `window_width` characters generated or seeded.
	cursor: OrderedSequence<char>,

	/// Random source used to shuffle stacks.
	rng: R,
}

impl MarkovModel {
	/// Creates an empty model with a random source seeded from the OS.
	///
	/// # Errors
	/// Returns `InvalidConfiguration` if `config.window_width` is zero.
	pub fn new(config: MarkovConfig) -> Result<Self> {
		Self::with_rng(config, StdRng::from_os_rng())
	}

	/// Creates an empty model whose random source is seeded with `seed`.
	///
	/// Two models built with the same seed and trained on the same text
	/// generate the same output.
	pub fn seeded(config: MarkovConfig, seed: u64) -> Result<Self> {
		Self::with_rng(config, StdRng::seed_from_u64(seed))
	}
}

impl<R: Rng> MarkovModel<R> {
	/// Creates an empty model using the given random source.
	///
	/// # Errors
	/// Returns `InvalidConfiguration` if `config.window_width` is zero.
	pub fn with_rng(config: MarkovConfig, rng: R) -> Result<Self> {
		config.validate()?;
		Ok(Self {
			config,
			windows: HashMap::new(),
			cursor: OrderedSequence::new(),
			rng,
		})
	}

	pub fn config(&self) -> &MarkovConfig {
		&self.config
	}

	pub fn window_width(&self) -> usize {
		self.config.window_width
	}

	/// Number of distinct windows recorded, including exhausted ones.
	pub fn key_count(&self) -> usize {
		self.windows.len()
	}

	/// Returns `true` once at least one observation has been recorded.
	pub fn is_trained(&self) -> bool {
		!self.windows.is_empty()
	}

	/// Iterates over the recorded windows, in no particular order.
	pub fn keys(&self) -> impl Iterator<Item = &str> {
		self.windows.keys().map(String::as_str)
	}

	/// Returns the continuations left for `window`, top of the stack first.
	///
	/// Returns `None` if the window was never seen during training.
	pub fn continuations(&self, window: &str) -> Option<Vec<char>> {
		self.windows.get(window).map(ReorderableStack::to_ordered_list)
	}

	/// Returns the cursor's contents as a lookup key.
	pub fn cursor_window(&self) -> String {
		self.cursor.iter().collect()
	}

	/// Adds the transitions found in `text` to the model.
	///
	/// Each `window_width`-character substring that is followed by another
	/// character records that character on the window's stack. Texts no longer
	/// than the window contribute nothing.
	///
	/// # Notes
	/// - Additive: training twice on the same text doubles every stack.
	/// - Characters are Unicode scalar values, not bytes.
	pub fn train(&mut self, text: &str) {
		let chars: Vec<char> = text.chars().collect();
		let k = self.config.window_width;
		if chars.len() <= k {
			debug!("Text of {} chars is too short for windows of {k}, nothing learned", chars.len());
			return;
		}

		for i in 0..chars.len() - k {
			let window: String = chars[i..i + k].iter().collect();
			self.windows.entry(window).or_default().push(chars[i + k]);
		}

		debug!(
			"Trained on {} chars: {} observations, {} windows known",
			chars.len(),
			chars.len() - k,
			self.windows.len()
		);
	}

	/// Clears the cursor and loads it with the first `window_width` characters
	/// of `seed_text` (fewer if the seed is shorter).
	pub fn reset_cursor(&mut self, seed_text: &str) {
		self.cursor.clear();
		for c in seed_text.chars().take(self.config.window_width) {
			self.cursor.enqueue(c);
		}
		debug!("Cursor reset to {}", self.cursor);
	}

	/// Generates `length` characters from the model.
	///
	/// # Parameters
	/// - `length`: Number of characters to produce, separators included.
	/// - `seed_text`: Text whose leading characters (re)initialise the cursor.
	///
	/// # Behavior
	/// - An empty cursor is first loaded from `seed_text`; otherwise generation
	///   resumes where the previous call stopped.
	/// - When the current window is unknown or exhausted, the configured separator
	///   is emitted (it counts toward `length`) and the cursor is reset from `seed_text`.
	/// - Otherwise the window's stack is optionally shuffled, a character is drawn
	///   according to the sampling mode, emitted, and pushed into the cursor.
	///
	/// # Notes
	/// - A seed shorter than the window produces a window that matches nothing,
	///   hence an output made only of separators. This is not an error.
	/// - `length == 0` returns an empty string without touching the model.
	pub fn generate(&mut self, length: usize, seed_text: &str) -> String {
		if length == 0 {
			return String::new();
		}
		if self.cursor.is_empty() {
			self.reset_cursor(seed_text);
		}

		let mut output = String::with_capacity(length.min(OUTPUT_CAPACITY_LIMIT));
		let mut produced = 0;
		while produced < length {
			let window = self.cursor_window();
			let next = match self.windows.get_mut(&window) {
				Some(stack) if !stack.is_empty() => {
					if self.config.shuffle_on_generate {
						stack.shuffle(&mut self.rng);
					}
					match self.config.sampling {
						SamplingMode::Consume => stack.pop(),
						SamplingMode::Preserve => stack.peek().copied(),
					}
				}
				_ => None,
			};

			match next {
				Some(c) => {
					trace!("{window:?} -> {c:?}");
					output.push(c);
					self.cursor.enqueue(c);
					self.cursor.maintain_size(self.config.window_width);
				}
				None => {
					trace!("No continuation for {window:?}, re-seeding");
					output.push(self.config.separator);
					self.reset_cursor(seed_text);
				}
			}
			produced += 1;
		}

		output
	}

	/// Returns an independent copy of the trained model.
	///
	/// The copy has its own stacks, its own random source and an empty cursor,
	/// so generating from it leaves `self` untouched.
	pub fn fork<R2: Rng>(&self, rng: R2) -> MarkovModel<R2> {
		MarkovModel {
			config: self.config.clone(),
			windows: self.windows.clone(),
			cursor: OrderedSequence::new(),
			rng,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::error::MarkovError;

	fn deterministic(k: usize) -> MarkovModel {
		MarkovModel::seeded(MarkovConfig::new(k, false), 0).unwrap()
	}

	fn sorted(mut values: Vec<char>) -> Vec<char> {
		values.sort();
		values
	}

	#[test]
	fn zero_window_is_rejected() {
		let err = MarkovModel::new(MarkovConfig::new(0, true)).unwrap_err();
		assert!(matches!(err, MarkovError::InvalidConfiguration(_)));
	}

	#[test]
	fn train_records_every_following_char() {
		let mut model = deterministic(3);
		model.train("abcabcabc");

		assert_eq!(model.continuations("abc"), Some(vec!['a', 'a']));
		assert_eq!(model.continuations("bca"), Some(vec!['b', 'b']));
		assert_eq!(model.continuations("cab"), Some(vec!['c', 'c']));
		assert_eq!(model.key_count(), 3);
		assert!(model.keys().all(|key| key.chars().count() == 3));
	}

	#[test]
	fn train_keeps_last_pushed_on_top() {
		let mut model = deterministic(1);
		model.train("aabb");

		assert_eq!(model.continuations("a"), Some(vec!['b', 'a']));
		assert_eq!(model.continuations("b"), Some(vec!['b']));
		assert_eq!(model.key_count(), 2);
	}

	#[test]
	fn train_ignores_text_not_longer_than_window() {
		let mut model = deterministic(4);
		model.train("");
		model.train("abc");
		model.train("abcd");
		assert!(!model.is_trained());

		model.train("abcde");
		assert_eq!(model.continuations("abcd"), Some(vec!['e']));
		assert_eq!(model.key_count(), 1);
	}

	#[test]
	fn train_is_additive() {
		let mut model = deterministic(2);
		model.train("hello");
		model.train("hello");

		assert_eq!(model.continuations("ll"), Some(vec!['o', 'o']));
		assert_eq!(model.continuations("he"), Some(vec!['l', 'l']));
		assert_eq!(model.key_count(), 3);
	}

	#[test]
	fn train_counts_chars_not_bytes() {
		let mut model = deterministic(2);
		model.train("héhé");

		assert_eq!(model.continuations("hé"), Some(vec!['h']));
		assert_eq!(model.continuations("éh"), Some(vec!['é']));
	}

	#[test]
	fn golden_output_without_shuffle() {
		let mut model = deterministic(1);
		model.train("aabb");

		assert_eq!(model.generate(3, "a"), "bb\n");
	}

	#[test]
	fn reseed_consumes_one_unit_of_length() {
		let mut model = deterministic(2);
		model.train("xyz");

		// "qq" is unknown: one separator, then the cursor is reloaded from the seed
		assert_eq!(model.generate(1, "qq"), "\n");
		assert_eq!(model.cursor_window(), "qq");
	}

	#[test]
	fn reseed_restarts_from_seed_text() {
		let mut model = deterministic(2);
		model.train("xyzxyz");

		// xy->z, yz->x, zx->y, xy->z, then "yz" and "xy" are exhausted
		assert_eq!(model.generate(6, "xy"), "zxyz\n\n");
	}

	#[test]
	fn length_past_reserved_capacity_is_exact() {
		let mut model = deterministic(1);
		model.train("aabb");

		let length = OUTPUT_CAPACITY_LIMIT * 2 + 1;
		let output = model.generate(length, "a");
		assert_eq!(output.chars().count(), length);
		assert!(output.starts_with("bb\na\n"));
		assert!(output[4..].chars().all(|c| c == '\n'));
	}

	#[test]
	fn zero_length_does_not_touch_cursor() {
		let mut model = deterministic(1);
		model.train("aabb");

		assert_eq!(model.generate(0, "a"), "");
		assert_eq!(model.cursor_window(), "");
		assert_eq!(model.continuations("a"), Some(vec!['b', 'a']));
	}

	#[test]
	fn short_seed_only_produces_separators() {
		let mut model = deterministic(3);
		model.train("abcabc");

		assert_eq!(model.generate(4, "ab"), "\n\n\n\n");
	}

	#[test]
	fn cursor_survives_between_calls() {
		let mut model = deterministic(1);
		model.train("abab");

		assert_eq!(model.generate(2, "a"), "ba");
		// The cursor still holds "a", so the seed "b" is not used
		assert_eq!(model.generate(1, "b"), "b");
	}

	#[test]
	fn cursor_never_exceeds_window() {
		let mut model = MarkovModel::seeded(MarkovConfig::new(3, true), 9).unwrap();
		model.train("the quick brown fox jumps over the lazy dog");

		for _ in 0..20 {
			model.generate(5, "the");
			assert!(model.cursor_window().chars().count() <= 3);
		}
	}

	#[test]
	fn consume_mode_exhausts_observations() {
		let mut model = deterministic(1);
		model.train("aabb");

		let first = model.generate(10, "a");
		assert_eq!(first, "bb\na\n\n\n\n\n\n");
		assert_eq!(first.chars().filter(|c| *c != '\n').count(), 3);

		let second = model.generate(5, "a");
		assert!(second.chars().all(|c| c == '\n'));
		assert_eq!(model.continuations("a"), Some(vec![]));
		assert_eq!(model.key_count(), 2);
	}

	#[test]
	fn preserve_mode_keeps_observations() {
		let config = MarkovConfig::new(1, false).with_sampling(SamplingMode::Preserve);
		let mut model = MarkovModel::seeded(config, 0).unwrap();
		model.train("aabb");

		assert_eq!(model.generate(5, "a"), "bbbbb");
		assert_eq!(model.continuations("a"), Some(vec!['b', 'a']));
		assert_eq!(model.continuations("b"), Some(vec!['b']));
	}

	#[test]
	fn custom_separator_is_emitted() {
		let config = MarkovConfig::new(1, false).with_separator('|');
		let mut model = MarkovModel::seeded(config, 0).unwrap();
		model.train("aabb");

		assert_eq!(model.generate(3, "a"), "bb|");
	}

	#[test]
	fn shuffle_with_uniform_stacks_is_deterministic() {
		let mut model = MarkovModel::seeded(MarkovConfig::new(3, true), 99).unwrap();
		model.train("abcabcabc");

		assert_eq!(model.generate(6, "abc"), "abcabc");
	}

	#[test]
	fn shuffled_generation_only_uses_observed_chars() {
		let text = "mississippi river";
		let mut model = MarkovModel::seeded(MarkovConfig::new(2, true), 5).unwrap();
		model.train(text);

		let output = model.generate(40, text);
		assert_eq!(output.chars().count(), 40);

		let mut remaining = sorted(text.chars().skip(2).collect());
		for c in output.chars().filter(|c| *c != '\n') {
			let position = remaining.iter().position(|r| *r == c);
			assert!(position.is_some(), "{c:?} emitted more often than observed");
			if let Some(p) = position {
				remaining.remove(p);
			}
		}
	}

	#[test]
	fn same_seed_same_output() {
		let text = "she sells sea shells by the sea shore";
		let mut first = MarkovModel::seeded(MarkovConfig::new(2, true), 17).unwrap();
		let mut second = MarkovModel::seeded(MarkovConfig::new(2, true), 17).unwrap();
		first.train(text);
		second.train(text);

		assert_eq!(first.generate(30, text), second.generate(30, text));
	}

	#[test]
	fn fork_is_independent() {
		let mut model = deterministic(1);
		model.train("aabb");

		let mut fork = model.fork(StdRng::seed_from_u64(1));
		assert_eq!(fork.generate(3, "a"), "bb\n");

		assert_eq!(model.continuations("a"), Some(vec!['b', 'a']));
		assert_eq!(model.cursor_window(), "");
		assert_eq!(model.generate(3, "a"), "bb\n");
	}
}

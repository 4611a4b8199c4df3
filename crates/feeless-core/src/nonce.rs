//! Nonce source for transaction bodies.
//!
//! Nonces are random 64-bit values. Every value handed out is remembered for
//! the life of the generator and a repeat is redrawn, so attempts running
//! concurrently in one process never share a nonce.

use dashmap::DashSet;

type Source = Box<dyn Fn() -> u64 + Send + Sync>;

/// Hands out unique random nonces.
pub struct NonceGenerator {
	source: Source,
	issued: DashSet<u64>,
}

impl NonceGenerator {
	/// Creates a generator backed by the thread-local RNG.
	pub fn new() -> Self {
		Self::from_source(rand::random::<u64>)
	}

	/// Creates a generator drawing candidates from `source`.
	pub fn from_source<F>(source: F) -> Self
	where
		F: Fn() -> u64 + Send + Sync + 'static,
	{
		Self {
			source: Box::new(source),
			issued: DashSet::new(),
		}
	}

	/// Returns a nonce not handed out before by this generator.
	pub fn next_nonce(&self) -> u64 {
		loop {
			let candidate = (self.source)();
			if self.issued.insert(candidate) {
				return candidate;
			}
			tracing::debug!(nonce = candidate, "Nonce collision, redrawing");
		}
	}

	/// Number of nonces handed out so far.
	pub fn issued(&self) -> usize {
		self.issued.len()
	}
}

impl Default for NonceGenerator {
	fn default() -> Self {
		Self::new()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::sync::atomic::{AtomicUsize, Ordering};
	use std::sync::Arc;

	#[test]
	fn test_redraws_on_collision() {
		let sequence = [5u64, 5, 5, 7, 5, 7, 9];
		let cursor = Arc::new(AtomicUsize::new(0));
		let draws = cursor.clone();
		let generator = NonceGenerator::from_source(move || {
			sequence[draws.fetch_add(1, Ordering::SeqCst) % sequence.len()]
		});

		assert_eq!(generator.next_nonce(), 5);
		assert_eq!(generator.next_nonce(), 7);
		assert_eq!(generator.next_nonce(), 9);
		assert_eq!(cursor.load(Ordering::SeqCst), 7);
		assert_eq!(generator.issued(), 3);
	}

	#[test]
	fn test_concurrent_draws_are_unique() {
		let generator = Arc::new(NonceGenerator::from_source({
			let counter = AtomicUsize::new(0);
			// only 64 distinct values, so threads collide constantly
			move || (counter.fetch_add(1, Ordering::Relaxed) % 64) as u64
		}));

		let handles: Vec<_> = (0..4)
			.map(|_| {
				let generator = generator.clone();
				std::thread::spawn(move || {
					(0..16).map(|_| generator.next_nonce()).collect::<Vec<_>>()
				})
			})
			.collect();

		let mut all: Vec<u64> = handles
			.into_iter()
			.flat_map(|h| h.join().unwrap())
			.collect();
		all.sort_unstable();
		all.dedup();
		assert_eq!(all.len(), 64);
	}

	#[test]
	fn test_random_source() {
		let generator = NonceGenerator::default();
		let a = generator.next_nonce();
		let b = generator.next_nonce();
		assert_ne!(a, b);
	}
}

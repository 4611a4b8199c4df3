//! Registry trait for self-registering implementations.

/// Ties an implementation to the name it is selected by in configuration.
///
/// Every implementation module (for example `feeless_account::implementations::local`)
/// exposes a `Registry` type implementing this trait, so the service can
/// collect factories without hard-coding names in two places.
pub trait ImplementationRegistry {
	/// Key under `[<section>.implementations]`, e.g. `"local"` or `"ephemeral"`.
	const NAME: &'static str;

	/// Factory function type the implementation provides.
	type Factory;

	/// Returns the factory function.
	fn factory() -> Self::Factory;
}

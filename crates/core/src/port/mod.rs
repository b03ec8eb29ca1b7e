// Port Layer - Interfaces for nondeterministic inputs (clock, ids, randomness)

pub mod id_provider;
pub mod random_source;
pub mod time_provider;

// Re-exports
pub use id_provider::IdProvider;
pub use random_source::RandomSource;
pub use time_provider::TimeProvider;

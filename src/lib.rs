//! # u-sampling
//!
//! Randomized permutation, sampling, and structural cloning primitives.
//!
//! This crate provides small, stateless building blocks that are
//! domain-agnostic: shuffle a sequence, draw a few elements from it, or copy
//! a nested container at a chosen depth.
//!
//! ## Modules
//!
//! - [`random`] — Uniform `[0, 1)` sources, seeded construction, index draws
//! - [`shuffle`] — Fisher-Yates shuffle, in place and out of place
//! - [`sample`] — Sampling without replacement with count validation
//! - [`structure`] — Nested containers with deep and shallow clones
//! - [`error`] — Error types
//!
//! ## Design Philosophy
//!
//! - **Injected randomness**: every randomized operation takes its source as
//!   a `&mut` parameter, so tests run under a fixed seed
//! - **Ownership states the contract**: operations that consume their input
//!   take it by value
//! - **Property-based testing**: permutation and sampling invariants verified
//!   via proptest

pub mod error;
pub mod random;
pub mod sample;
pub mod shuffle;
pub mod structure;

pub use error::{CloneError, ConfigError, SampleError};
pub use random::{create_rng, entropy_rng, random_bool, SourceConfig, UniformSource};
pub use sample::{pick_one, pick_some, Pick, SampleCount};
pub use shuffle::{shuffle_in_place, shuffled, shuffled_from, shuffled_indices};
pub use structure::{deep_clone, shallow_clone, Container, Kind, Node, Value};

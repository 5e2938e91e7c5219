//! Implementations of the engine's backend traits for concrete providers.

mod bigcommerce;

//! Agora Types - Core type definitions for the AGORA voting platform.
//!
//! This crate provides the fundamental types used throughout AGORA:
//! - Addresses (20-byte, Bech32m encoded)
//! - Type-level errors

pub mod address;
pub mod error;

#[cfg(feature = "serde")]
mod serialization;

pub use address::Address;
pub use error::TypesError;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{Address, TypesError};
}

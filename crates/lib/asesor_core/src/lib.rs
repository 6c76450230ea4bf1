//! # asesor_core
//!
//! Core domain logic for Asesor: the store profile, the BCV rate cache, the
//! system prompt and the completion client.

pub mod cta;
pub mod llm;
pub mod money;
pub mod profile;
pub mod prompt;
pub mod rates;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

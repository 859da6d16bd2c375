//! Decoded profile input and symbol resolution.
//!
//! This module handles:
//! - The decoded profile schema consumed by the index
//! - Reading that schema from JSON
//! - Splitting raw function names into package/type/function parts

pub mod profile;
pub mod schema;
pub mod symbols;

// Re-export main types
pub use profile::{parse_profile, read_profile};
pub use schema::{Frame, Profile, Sample, ValueType};
pub use symbols::{parse_func_name, GoSymbolResolver, ResolvedSymbol, SymbolResolver};

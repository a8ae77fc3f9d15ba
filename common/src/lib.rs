//! fxgate Common Types
//!
//! Currency codes, canonical currency pairs, and the fixed-point text form
//! used to store rates in a key-value cache.

pub mod error;
pub mod monetary;
pub mod rate;

pub use error::*;
pub use monetary::*;
pub use rate::*;

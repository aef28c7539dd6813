//! Configuration utility types.
//!
//! | Module    | Purpose                                    |
//! |-----------|--------------------------------------------|
//! | `error`   | Configuration error types                  |
//! | `field`   | Dotted field paths for diagnostics         |
//! | `pattern` | Regex path matcher with serde support      |

mod error;
mod field;
mod pattern;

pub use error::ConfigError;
pub use field::FieldPath;
pub use pattern::{ANY_EXTENSION, Pattern};

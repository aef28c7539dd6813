//! Configuration section definitions.
//!
//! Each module corresponds to a section in `kiln.toml`:
//!
//! | Module    | TOML Section  | Purpose                                   |
//! |-----------|---------------|-------------------------------------------|
//! | `build`   | `[build]`     | Source root, output dir, explicit adds    |
//! | `find`    | `[find]`      | Discovery pattern/filter, detection       |
//! | `process` | `[process]`   | Processor toggles/options and their order |
//! | `combine` | `[combine]`   | Extension → combined output path          |

mod build;
mod combine;
mod find;
mod process;

pub use build::{AddEntry, BuildSectionConfig};
pub use combine::CombineConfig;
pub use find::{Detect, FindOptions};
pub use process::{ProcessConfig, Toggle};

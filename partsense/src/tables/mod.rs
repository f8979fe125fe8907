//! Data-Driven Rule Tables
//!
//! Manufacturers whose part numbers need no decoding beyond named captures
//! can be described in JSON instead of code:
//!
//! ```json
//! {
//!   "provider": "Abracon",
//!   "categories": ["CRYSTAL"],
//!   "rules": [{ "category": "CRYSTAL", "pattern": "^(?P<series>ABM8)-(?P<frequency>[0-9.]+)MHZ" }],
//!   "fixed": ["frequency"]
//! }
//! ```
//!
//! Tables are loaded from user directories (see
//! [`EngineOptions`](crate::core::EngineOptions)) or from the copies embedded
//! in the binary, and become ordinary providers through [`TableProvider`].

pub mod builtin;
pub mod provider;
pub mod schema;

pub use builtin::{embedded_providers, embedded_tables, load_directory, load_table_file};
pub use provider::TableProvider;
pub use schema::{RuleTable, TableRule};

//! Decoder for the binary export data of compiled Go packages.
//!
//! A compiler serializes the public API of a compiled package (its
//! declarations, types, constant values and source positions) into a compact
//! binary "export data" stream so that other packages can be type-checked
//! against it without its sources. [`import_data`] reconstructs that API as a
//! type graph inside a [`gotypes::universe::Universe`].
//!
//! The stream is decoded in a single synchronous pass. Strings, packages and
//! types are interned in append-only tables so that later records can refer
//! back to them by index; named types are interned before their definition is
//! read, which is how self-referential types are encoded. Structural
//! violations are reported as a [`FormatError`] wrapped in an [`ImportError`].
//!
//! ```rust
//! use std::collections::HashMap;
//!
//! use gotypes::{position::FileSet, universe::Universe};
//!
//! // Version 4 header, no debug markers, positions disabled, then package
//! // "demo" with no objects.
//! let data = b"version 4\n\n\x00\x00\x01\x07demo\x00\x0b\x00";
//! let mut universe = Universe::new();
//! let mut fset = FileSet::new();
//! let mut imports = HashMap::new();
//!
//! let (read, pkg) = gcimport::import_data(
//!     &mut universe,
//!     &mut fset,
//!     &mut imports,
//!     data,
//!     "example.com/demo",
//! )
//! .unwrap();
//! assert_eq!(read, data.len());
//! assert_eq!(universe.package(pkg).name(), "demo");
//! assert!(universe.package(pkg).is_complete());
//! assert_eq!(imports["example.com/demo"], pkg);
//! ```
//!
//! Logging goes through the [`log`] facade; no logger is installed.

pub mod config;
mod driver;
pub mod error;
pub mod intern;
mod objects;
mod position;
pub mod reader;
pub mod tags;
mod type_graph;
pub mod value;
pub mod version;

pub use config::{DEFAULT_MAX_DEPTH, ImportConfig};
pub use driver::{import_data, import_data_with_config};
pub use error::{FormatError, FormatResult, ImportError, ImportResult};
pub use position::MAX_LINES;

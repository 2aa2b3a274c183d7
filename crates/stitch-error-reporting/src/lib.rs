//! Error reporting and diagnostic messages for stitch.
//!
//! Library crates report failures through their own `thiserror` enums. When a
//! failure reaches a user it is converted into a [`DiagnosticMessage`], which
//! follows the tidyverse structure (title, problem, details, hints) and can be
//! rendered as plain text, as JSON, or as an ariadne source snippet when a
//! [`stitch_source_map::SourceContext`] is available.
//!
//! Every diagnostic produced by stitch carries a stable code (`S-<subsystem>-<n>`)
//! that is looked up in the embedded [`ERROR_CATALOG`].
//!
//! ```
//! use stitch_error_reporting::DiagnosticMessageBuilder;
//!
//! let error = DiagnosticMessageBuilder::error("Imported File Not Found")
//!     .with_code("S-3-1")
//!     .problem("`partials/header.yml` does not exist")
//!     .add_hint("Check the path is relative to the import root?")
//!     .build();
//!
//! assert!(error.to_text(None).contains("[S-3-1]"));
//! ```

pub mod builder;
pub mod catalog;
pub mod diagnostic;

pub use builder::DiagnosticMessageBuilder;
pub use catalog::{ERROR_CATALOG, ErrorCodeInfo, get_error_info, get_subsystem};
pub use diagnostic::{DetailItem, DetailKind, DiagnosticKind, DiagnosticMessage};

//! Source locations for stitch
//!
//! Every YAML node that stitch composes remembers where it came from: which
//! file, and which character range inside that file. Imports pull content from
//! many files into a single value, so locations are always qualified by a
//! [`FileId`] that is registered in a [`SourceContext`].
//!
//! # Example
//!
//! ```rust
//! use stitch_source_map::*;
//!
//! let mut ctx = SourceContext::new();
//! let file_id = ctx.add_file("config.yml".into(), Some("name: demo\nport: 80".into()));
//!
//! let info = SourceInfo::from_offsets(file_id, 11, 15);
//! let (path, location) = ctx.resolve_start(&info).unwrap();
//! assert_eq!(path, "config.yml");
//! assert_eq!(location.row, 1);
//! ```

pub mod context;
pub mod source_info;
pub mod types;
pub mod utils;

pub use context::{SourceContext, SourceFile};
pub use source_info::SourceInfo;
pub use types::{FileId, Location, Range};
pub use utils::{offset_to_location, range_from_offsets};

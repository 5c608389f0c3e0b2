//! mocktree-core: tree resolution and view projection
//!
//! Everything the mock tree server knows about its data lives here. The HTTP
//! layer only routes requests into [`TreeService`].
//!
//! ```text
//! raw request path
//!     └── path::parse_segments     strip prefix, split, decode
//!         └── resolve::NodeResolver    descend by identifier field, copy match
//!             └── view::ViewProjector      element / collection shape + paths
//! ```
//!
//! The tree itself is loaded once through [`source::DataSource`] into an
//! immutable [`source::Snapshot`].

pub mod config;
pub mod error;
pub mod path;
pub mod resolve;
pub mod service;
pub mod source;
pub mod view;

pub use config::{TreeConfig, TreeOptions};
pub use error::{Result, TreeError};
pub use path::TreePath;
pub use resolve::NodeResolver;
pub use service::TreeService;
pub use source::{DataSource, FileSource, InMemorySource, Snapshot, TreeSource};
pub use view::{ViewMode, ViewProjector, PATH_FIELD};

//! Domain types for the ferox-map tool.
//!
//! # Module Organization
//!
//! - [`resource`] - Resource records and their classified form
//! - [`tag`] - Classification categories
//! - [`base_url`] - The detected origin of a scan
//!
//! All public types are re-exported here and at the crate root:
//!
//! ```
//! use fm_core::{BaseUrl, ClassificationTag, ResourceRecord};
//! ```

pub mod base_url;
pub mod resource;
pub mod tag;

pub use base_url::BaseUrl;
pub use resource::{ClassifiedResource, ResourceRecord};
pub use tag::ClassificationTag;

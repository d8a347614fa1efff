//! Feature domain
//!
//! A feature is an `(HTTP method, path template)` pair declaring one action a key
//! may invoke.

mod entity;
mod matcher;
mod path;

pub use entity::Feature;
pub use matcher::{any_feature_matches, feature_matches, RequestedAction};
pub use path::{split_segments, PathTemplate, Segment, PARAM_PREFIX};

pub mod builder;
pub mod encoder;

pub use builder::{build_url, expand_templates};
pub use encoder::{EncodedQuery, encode_component};

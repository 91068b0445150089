//! Token dataset and the matching engine: color decoding, hue
//! classification, distance ranking and query dispatch.

pub mod codec;
pub mod dataset;
pub mod hue;
pub mod query;
pub mod ranker;

pub use dataset::TokenSet;
pub use query::{Query, QueryKind};

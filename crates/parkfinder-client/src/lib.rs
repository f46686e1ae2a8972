pub mod client;
pub mod error;
pub mod normalize;
pub(crate) mod retry;
pub mod types;

pub use client::ActivityClient;
pub use error::ClientError;
pub use normalize::{expand_abbreviations, normalize_page};
pub use types::{LoadMoreRequest, LoadMoreResponse, RawActivity, RawActivityPark};

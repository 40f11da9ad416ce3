pub mod client;
pub mod error;
pub mod extract;
pub mod limit;
pub mod normalize;
mod parse;
mod retry;
pub mod types;

pub use client::CaptureClient;
pub use error::ScrapeError;
pub use extract::{asin_from_url, extract, is_product_url};
pub use limit::CaptureLimiter;
pub use normalize::to_capture;
pub use types::{BestSellerRank, KindleInfo, RawProduct, SeriesInfo};

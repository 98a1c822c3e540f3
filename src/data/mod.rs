pub mod fetcher;
pub mod market;

pub use fetcher::{MarketDataClient, MarketDataSource};
pub use market::{FieldValue, MarketRecord, MarketSnapshot};

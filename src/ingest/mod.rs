pub mod headlines;
pub mod prices;

pub use headlines::{dedup_and_date, RawArticle};
pub use prices::normalize_price_series;

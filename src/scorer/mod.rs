pub mod daily;
pub mod sentiment;

pub use daily::aggregate_daily;
pub use sentiment::{PolarityModel, SentimentScorer, VaderModel};

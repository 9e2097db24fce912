pub mod bet_type;
pub mod config;
pub mod error;
pub mod export;
pub mod history;
pub mod league;
pub mod logging;
pub mod probability;
pub mod report;
pub mod sample_feed;
pub mod selector;
pub mod types;
pub mod value;

pub use bet_type::BetType;
pub use config::TipConfig;
pub use league::League;
pub use selector::{TipSelector, select_tips};
pub use types::{HeadToHead, MarketOdds, Match, Outcome, TeamStats, Tip};

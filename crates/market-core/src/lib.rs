pub mod error;
pub mod traits;
pub mod types;

pub use error::MarketError;
pub use traits::QuoteProvider;
pub use types::{
    change_percent, Bar, CashFlow, Exchange, IndicatorSet, Quote, Signal, TradeAction,
};

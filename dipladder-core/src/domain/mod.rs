//! Domain types: candles, positions, stake bounds.

pub mod candle;
pub mod position;
pub mod stake;

pub use candle::{validate_series, Candle};
pub use position::{Entry, Position};
pub use stake::StakeBounds;

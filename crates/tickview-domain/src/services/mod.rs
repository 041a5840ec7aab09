pub mod alignment;
pub mod ohlcv;
pub mod overlay;
pub mod tick_codec;
pub mod vwap;

pub mod artifacts;
pub mod catalog;
pub mod market_data;
mod scan;

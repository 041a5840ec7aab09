pub mod catalog;
pub mod charting;
pub mod config;
pub mod export;
pub mod meta;
mod shared;
pub mod validation;

//! Core domain types and logic.

pub mod acquisition;
pub mod catalog;
pub mod derivation;
pub mod error;
pub mod indicator;
pub mod ohlcv;
pub mod options;
pub mod pipeline;
pub mod presentation;
pub mod series;

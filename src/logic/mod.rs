//! Rate detection logic

pub mod rate;
pub mod timestamp;

pub use rate::{RateFilter, RateHit};

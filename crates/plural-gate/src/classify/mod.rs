//! Classification layer: oracle client and per-event decision cache.

pub mod cache;
pub mod client;

pub use cache::{DecisionCache, CACHE_CAPACITY};
pub use client::{Classifier, HttpOracle, Verdict};

//! Core traits defined in `bjdms-core` and implemented by other crates.

pub mod cache;

pub use cache::CacheProvider;

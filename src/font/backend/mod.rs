//! Implementations of the [`Face`](crate::font::common::Face) trait for
//! various font parsing crates.

#[cfg(feature = "ttfparser-fontparser")]
pub mod ttf_parser;

//! Common utilities and data structures

pub mod binary;
pub mod half;

pub use binary::{SampleType, ValueCodec};

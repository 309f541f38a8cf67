// File: streamwatch-core/src/test_utils/mod.rs
pub mod helpers;

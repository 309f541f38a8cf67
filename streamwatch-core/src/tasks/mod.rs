// File: streamwatch-core/src/tasks/mod.rs
pub mod live_check;

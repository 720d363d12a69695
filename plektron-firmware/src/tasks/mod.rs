//! Embassy task implementations

pub mod input;
pub mod ui;

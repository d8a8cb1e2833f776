//! Terminal presentation layer

pub mod chart;
pub mod dashboard;
pub mod export;
pub mod setup;
pub mod ui;

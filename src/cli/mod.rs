pub mod chart;
pub mod revenue;
pub mod setup;
pub mod ui;

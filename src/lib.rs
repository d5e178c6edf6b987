pub mod app;
pub mod catalog;
pub mod config;
pub mod error;
pub mod filters;
pub mod format;
pub mod ui;
pub mod view;

#[cfg(test)]
mod tests;

pub use config::DashboardConfig;
pub use error::DashboardError;

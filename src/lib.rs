//! worklens: turn free-text daily work reports into a work-hours dashboard

pub mod cli;
pub mod config;
pub mod logging;
pub mod services;
pub mod session;
pub mod tui;
pub mod types;

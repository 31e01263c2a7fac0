//! TUI widgets

pub mod confirm;
pub mod days;
pub mod help;
pub mod input;
pub mod overview;
pub mod spinner;
pub mod stats;
pub mod suggestions;
pub mod tabs;

pub mod audio;
pub mod config;
pub mod duration;
pub mod errors;
pub mod logging;
pub mod menu;
pub mod progress;
pub mod reward;
pub mod store;
pub mod task;
pub mod tracker;
pub mod ui;

pub mod config;
pub mod data;
pub mod format;
pub mod providers;
pub mod uploads;

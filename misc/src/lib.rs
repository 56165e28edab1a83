pub mod api;
pub mod config;
pub mod dirs;
pub mod logs;
pub mod time;

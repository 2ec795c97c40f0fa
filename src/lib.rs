pub mod config;
pub mod consts;
pub mod models;
pub mod page;
pub mod services;
pub mod utils;

pub mod api;
pub mod config;
pub mod errors;
pub mod feed;
pub mod logging;
pub mod models;
pub mod youtube;

pub mod config;
pub mod filters;
pub mod grouping;
pub mod handlers;
pub mod models;
pub mod proxy;
pub mod refresh;
pub mod session;
pub mod storage;
pub mod utils;
pub mod view;

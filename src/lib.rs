pub mod audio;
pub mod auth;
pub mod client;
pub mod config;
pub mod dom;
pub mod error;
pub mod event;
pub mod http;
pub mod storage;
pub mod ui;
pub mod util;

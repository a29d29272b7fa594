pub mod commands;
pub mod controller;
pub mod controls;
pub mod media;
pub mod queue;
pub mod state;
pub mod store;
pub mod traits;

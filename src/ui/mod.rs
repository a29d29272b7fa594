pub mod app;
pub mod history;
pub mod initializers;
pub mod input;
pub mod message;
pub mod route;
pub mod router;
pub mod template_cache;
pub mod traits;
pub mod util;
pub mod views;

pub mod bus;
pub mod events;

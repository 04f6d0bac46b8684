pub mod core;
pub mod engine;
mod ws;
mod ws_handler;

pub use core::messages;
pub use ws_handler::handle_connection;

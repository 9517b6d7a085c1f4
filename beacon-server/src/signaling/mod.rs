mod ws_handler;

pub use ws_handler::{ConnectParams, room_socket};

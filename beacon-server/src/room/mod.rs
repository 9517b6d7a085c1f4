mod member;
mod room;
mod room_command;
mod room_manager;

pub use member::{ConnectionId, MemberHandle};
pub(crate) use member::Member;
pub(crate) use room::{Room, RoomHandle};
pub(crate) use room_command::RoomCommand;
pub use room_manager::RoomManager;

mod test_leave;
mod test_peer_list_on_join;
mod test_reconnect;
mod test_rooms_are_isolated_by_name;

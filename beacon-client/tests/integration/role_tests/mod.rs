mod test_nothing_negotiates_before_the_first_peer_list;

mod test_turn_credentials;

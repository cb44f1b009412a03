mod peer_session_table;

pub use peer_session_table::InMemoryPeerSessionTable;

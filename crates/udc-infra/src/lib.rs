pub mod registry;
pub mod time;

pub use registry::InMemoryPeerSessionTable;
pub use time::SystemClock;

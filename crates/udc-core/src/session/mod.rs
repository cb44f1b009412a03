//! Peer session record and its processing-state model.

mod peer_session;
mod processing_state;
mod target_app;

pub use peer_session::{PeerSession, SessionFlags};
pub use processing_state::{SessionProcessingState, TransitionError};
pub use target_app::{
    TargetAppCheckState, TargetAppInfo, TargetAppList, TargetAppListError, MAX_TARGET_APP_INFOS,
};

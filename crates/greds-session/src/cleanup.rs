//! Eviction of idle sessions from the live map.
//!
//! Closing an idle session only drops its in-memory entry; checkpoints
//! already written for it stay in storage and can still be rehydrated.

use chrono::Duration;

use crate::manager::SessionManager;

/// Default idle timeout before a live session is evicted: 1 hour.
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::hours(1);

/// Close every live session idle for longer than `idle_timeout`.
///
/// Returns the number of sessions closed.
pub fn cleanup_stale_sessions(manager: &SessionManager, idle_timeout: Duration) -> usize {
    let mut removed = 0;

    for id in manager.session_ids() {
        let stale = manager
            .get_session(&id)
            .map(|session| session.idle_duration() > idle_timeout)
            .unwrap_or(false);

        if stale && manager.close(&id).is_ok() {
            removed += 1;
        }
    }

    removed
}

//! Activity tracking with throttled persistence.
//!
//! User activity arrives far more often than it is worth persisting (a
//! pointer move can fire hundreds of times a second). The tracker keeps
//! the latest sighting in memory and only says "write now" once the
//! write interval has passed since the previous write.

use std::fmt;
use std::time::Duration;

/// The user-activity signals the session observes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActivityKind {
    PointerMove,
    KeyPress,
    Click,
    Scroll,
}

impl ActivityKind {
    /// Every observed signal, in a stable order.
    pub const ALL: [ActivityKind; 4] = [
        ActivityKind::PointerMove,
        ActivityKind::KeyPress,
        ActivityKind::Click,
        ActivityKind::Scroll,
    ];
}

impl fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PointerMove => write!(f, "pointer-move"),
            Self::KeyPress => write!(f, "key-press"),
            Self::Click => write!(f, "click"),
            Self::Scroll => write!(f, "scroll"),
        }
    }
}

/// Throttle state for one authenticated session.
///
/// Created when the session becomes authenticated (the entry write counts
/// as the first write) and dropped when it leaves, so nothing carries
/// over between sessions.
#[derive(Debug, Clone)]
pub struct ActivityTracker {
    write_interval_ms: u64,
    last_write_ms: u64,
    last_seen_ms: u64,
    signals: u64,
}

impl ActivityTracker {
    /// Starts tracking at `now_ms`, which is treated as the last write.
    pub fn new(write_interval: Duration, now_ms: u64) -> Self {
        Self {
            write_interval_ms: write_interval.as_millis() as u64,
            last_write_ms: now_ms,
            last_seen_ms: now_ms,
            signals: 0,
        }
    }

    /// Records a signal seen at `now_ms`.
    ///
    /// Returns `true` when at least the write interval has elapsed since
    /// the last write; the caller must then persist `now_ms`, which this
    /// call already records as the new last write.
    pub fn observe(&mut self, now_ms: u64) -> bool {
        self.signals += 1;
        self.last_seen_ms = self.last_seen_ms.max(now_ms);

        if now_ms.saturating_sub(self.last_write_ms) >= self.write_interval_ms {
            self.last_write_ms = now_ms;
            true
        } else {
            false
        }
    }

    /// When activity was last seen (epoch ms).
    pub fn last_seen_ms(&self) -> u64 {
        self.last_seen_ms
    }

    /// When the timestamp was last written (epoch ms).
    pub fn last_write_ms(&self) -> u64 {
        self.last_write_ms
    }

    /// Signals observed since tracking started.
    pub fn signals(&self) -> u64 {
        self.signals
    }
}

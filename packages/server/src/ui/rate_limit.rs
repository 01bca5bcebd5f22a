//! Per-connection, per-action rate limiting.
//!
//! Fixed-window counter, not a sliding window: bursts at window
//! boundaries are admitted, which is acceptable because an over-limit
//! burst only costs bounded broadcast fan-out. Each connection's
//! dispatcher owns its own limiter; there is no ambient global table.

use std::collections::HashMap;

/// Event kinds subject to rate limiting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RateLimitAction {
    CodeChange,
    ChatMessage,
    CursorUpdate,
}

impl RateLimitAction {
    /// Maximum events admitted per window
    pub fn limit(self) -> u32 {
        match self {
            RateLimitAction::CodeChange | RateLimitAction::ChatMessage => 100,
            // Cursor updates are high-frequency; tighter threshold
            RateLimitAction::CursorUpdate => 50,
        }
    }

    /// Window length in milliseconds
    pub fn window_ms(self) -> i64 {
        match self {
            RateLimitAction::CodeChange | RateLimitAction::ChatMessage => 60_000,
            RateLimitAction::CursorUpdate => 10_000,
        }
    }
}

#[derive(Debug)]
struct Window {
    started_at: i64,
    count: u32,
}

/// Fixed-window counters for one connection
#[derive(Debug, Default)]
pub struct RateLimiter {
    windows: HashMap<RateLimitAction, Window>,
}

impl RateLimiter {
    /// Create a limiter with no recorded windows
    pub fn new() -> Self {
        Self {
            windows: HashMap::new(),
        }
    }

    /// Record an attempt at `now_ms` and decide whether to admit it.
    ///
    /// A fresh or elapsed window resets to count 1 and admits; within a
    /// window, attempts beyond the action's limit are rejected without
    /// being counted.
    pub fn check(&mut self, action: RateLimitAction, now_ms: i64) -> bool {
        match self.windows.get_mut(&action) {
            Some(window) if now_ms - window.started_at <= action.window_ms() => {
                if window.count >= action.limit() {
                    return false;
                }
                window.count += 1;
                true
            }
            _ => {
                self.windows.insert(
                    action,
                    Window {
                        started_at: now_ms,
                        count: 1,
                    },
                );
                true
            }
        }
    }
}

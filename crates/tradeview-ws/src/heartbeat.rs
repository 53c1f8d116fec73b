//! Ping-timeout tracking for the push channel.
//!
//! Engine.IO pings come from the server. The client answers each one and
//! treats the connection as dead once no ping has arrived within
//! `ping_interval + ping_timeout`.

use chrono::{DateTime, Utc};
use std::time::Duration;
use tracing::debug;

/// Used until the open handshake announces the server's values.
const DEFAULT_PING_INTERVAL_MS: u64 = 25_000;
const DEFAULT_PING_TIMEOUT_MS: u64 = 20_000;

/// Lower bound for the check period.
const MIN_CHECK_INTERVAL_MS: u64 = 100;

/// Heartbeat monitor for one connection.
#[derive(Debug, Clone)]
pub struct HeartbeatMonitor {
    ping_interval_ms: u64,
    ping_timeout_ms: u64,
    /// Last ping (or connection start).
    last_ping: DateTime<Utc>,
    pings_received: u64,
}

impl HeartbeatMonitor {
    pub fn new(ping_interval_ms: u64, ping_timeout_ms: u64) -> Self {
        Self {
            ping_interval_ms,
            ping_timeout_ms,
            last_ping: Utc::now(),
            pings_received: 0,
        }
    }

    /// Adopt the intervals announced by the server and restart the clock.
    pub fn configure(&mut self, ping_interval_ms: u64, ping_timeout_ms: u64) {
        self.ping_interval_ms = ping_interval_ms;
        self.ping_timeout_ms = ping_timeout_ms;
        self.last_ping = Utc::now();
        debug!(ping_interval_ms, ping_timeout_ms, "Heartbeat configured");
    }

    pub fn record_ping(&mut self) {
        self.last_ping = Utc::now();
        self.pings_received += 1;
    }

    pub fn pings_received(&self) -> u64 {
        self.pings_received
    }

    /// Longest silence tolerated before the connection is considered dead.
    pub fn deadline_ms(&self) -> u64 {
        self.ping_interval_ms.saturating_add(self.ping_timeout_ms)
    }

    pub fn is_timed_out_at(&self, now: DateTime<Utc>) -> bool {
        let silent_ms = (now - self.last_ping).num_milliseconds();
        silent_ms > self.deadline_ms() as i64
    }

    pub fn is_timed_out(&self) -> bool {
        self.is_timed_out_at(Utc::now())
    }

    /// How often the connection loop should look at the deadline.
    pub fn check_interval(&self) -> Duration {
        Duration::from_millis((self.ping_timeout_ms / 2).max(MIN_CHECK_INTERVAL_MS))
    }
}

impl Default for HeartbeatMonitor {
    fn default() -> Self {
        Self::new(DEFAULT_PING_INTERVAL_MS, DEFAULT_PING_TIMEOUT_MS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration as ChronoDuration;

    #[test]
    fn test_heartbeat_initial_state() {
        let hb = HeartbeatMonitor::default();
        assert!(!hb.is_timed_out());
        assert_eq!(hb.deadline_ms(), 45_000);
        assert_eq!(hb.pings_received(), 0);
    }

    #[test]
    fn test_heartbeat_times_out_after_deadline() {
        let hb = HeartbeatMonitor::new(1_000, 500);
        let now = Utc::now();

        assert!(!hb.is_timed_out_at(now + ChronoDuration::milliseconds(1_400)));
        assert!(hb.is_timed_out_at(now + ChronoDuration::milliseconds(1_600)));
    }

    #[test]
    fn test_ping_resets_deadline() {
        let mut hb = HeartbeatMonitor::new(1_000, 500);
        hb.record_ping();
        let after_ping = Utc::now();

        assert!(!hb.is_timed_out_at(after_ping + ChronoDuration::milliseconds(1_400)));
        assert_eq!(hb.pings_received(), 1);
    }

    #[test]
    fn test_check_interval_has_floor() {
        let hb = HeartbeatMonitor::new(10, 10);
        assert_eq!(hb.check_interval(), Duration::from_millis(MIN_CHECK_INTERVAL_MS));
    }
}

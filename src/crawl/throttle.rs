// src/crawl/throttle.rs
// =============================================================================
// Politeness: keeps successive fetches of the same host `delay` apart.
//
// Each host has a "next free slot". A worker that wants to fetch:
// 1. takes the host's slot (or "now" if the slot is in the past)
// 2. moves the slot forward by `delay` for whoever comes next
// 3. sleeps until its own slot
//
// The lock is only held for steps 1-2, never while sleeping, so workers
// fetching different hosts never wait on each other.
// =============================================================================

use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

#[derive(Debug)]
pub struct HostThrottle {
    delay: Duration,
    next_slot: Mutex<HashMap<String, Instant>>,
}

impl HostThrottle {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            next_slot: Mutex::new(HashMap::new()),
        }
    }

    /// Waits until it is this caller's turn to fetch from `host`.
    pub async fn wait_turn(&self, host: &str) {
        if self.delay.is_zero() {
            return;
        }

        let slot = {
            let mut next_slot = self.next_slot.lock().await;
            let now = Instant::now();
            let slot = next_slot
                .get(host)
                .copied()
                .filter(|slot| *slot > now)
                .unwrap_or(now);
            next_slot.insert(host.to_string(), slot + self.delay);
            slot
        };

        tokio::time::sleep_until(slot).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_same_host_is_spaced_by_delay() {
        let throttle = HostThrottle::new(Duration::from_millis(500));
        let start = Instant::now();

        throttle.wait_turn("example.com").await;
        assert_eq!(start.elapsed(), Duration::ZERO);

        throttle.wait_turn("example.com").await;
        assert_eq!(start.elapsed(), Duration::from_millis(500));

        throttle.wait_turn("example.com").await;
        assert_eq!(start.elapsed(), Duration::from_millis(1000));
    }

    #[tokio::test(start_paused = true)]
    async fn test_different_hosts_do_not_wait() {
        let throttle = HostThrottle::new(Duration::from_millis(500));
        let start = Instant::now();

        throttle.wait_turn("a.example.com").await;
        throttle.wait_turn("b.example.com").await;
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_idle_host_is_not_delayed() {
        let throttle = HostThrottle::new(Duration::from_millis(100));
        throttle.wait_turn("example.com").await;

        tokio::time::sleep(Duration::from_secs(1)).await;
        let before = Instant::now();
        throttle.wait_turn("example.com").await;
        assert_eq!(before.elapsed(), Duration::ZERO);
    }

    #[tokio::test]
    async fn test_zero_delay_never_sleeps() {
        let throttle = HostThrottle::new(Duration::ZERO);
        throttle.wait_turn("example.com").await;
        throttle.wait_turn("example.com").await;
    }
}

//! Sliding-window attempt limiter keyed by client address.
//!
//! Held in process memory: it resets on restart and is not shared between
//! instances, so treat it as advisory.

use std::{
    collections::{HashMap, VecDeque},
    net::IpAddr,
    sync::Mutex,
    time::{Duration, Instant},
};

use crate::config::RateLimitConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitDecision {
    pub allowed: bool,
    pub remaining: u32,
    /// Time until the oldest counted attempt leaves the window.
    pub retry_after: Duration,
}

#[derive(Debug)]
pub struct RateLimiter {
    max_attempts: u32,
    window: Duration,
    hits: Mutex<HashMap<IpAddr, VecDeque<Instant>>>,
}

impl RateLimiter {
    pub fn new(max_attempts: u32, window: Duration) -> Self {
        Self {
            max_attempts,
            window,
            hits: Mutex::new(HashMap::new()),
        }
    }

    pub fn from_config(cfg: &RateLimitConfig) -> Self {
        Self::new(cfg.max_attempts, Duration::from_secs(cfg.window_secs))
    }

    /// Record an attempt from `key` and report whether it is within budget.
    pub fn check(&self, key: IpAddr) -> RateLimitDecision {
        self.check_at(key, Instant::now())
    }

    fn check_at(&self, key: IpAddr, now: Instant) -> RateLimitDecision {
        let mut hits = self.hits.lock().unwrap_or_else(|p| p.into_inner());

        // Drop keys whose attempts have all aged out so the map stays bounded.
        let window = self.window;
        hits.retain(|_, q| q.back().is_some_and(|t| now.duration_since(*t) < window));

        let queue = hits.entry(key).or_default();
        while queue
            .front()
            .is_some_and(|t| now.duration_since(*t) >= window)
        {
            queue.pop_front();
        }

        let used = queue.len() as u32;
        if used >= self.max_attempts {
            let retry_after = queue
                .front()
                .map(|t| window.saturating_sub(now.duration_since(*t)))
                .unwrap_or(window);
            return RateLimitDecision {
                allowed: false,
                remaining: 0,
                retry_after,
            };
        }

        queue.push_back(now);
        RateLimitDecision {
            allowed: true,
            remaining: self.max_attempts - used - 1,
            retry_after: Duration::ZERO,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    const A: IpAddr = IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1));
    const B: IpAddr = IpAddr::V4(Ipv4Addr::new(10, 0, 0, 2));

    #[test]
    fn allows_up_to_limit_then_blocks() {
        let limiter = RateLimiter::new(5, Duration::from_secs(60));
        let t0 = Instant::now();
        for i in 0..5 {
            let d = limiter.check_at(A, t0 + Duration::from_secs(i));
            assert!(d.allowed, "attempt {i} should pass");
            assert_eq!(d.remaining, 4 - i as u32);
        }
        let blocked = limiter.check_at(A, t0 + Duration::from_secs(10));
        assert!(!blocked.allowed);
        assert_eq!(blocked.retry_after, Duration::from_secs(50));
    }

    #[test]
    fn keys_are_independent() {
        let limiter = RateLimiter::new(1, Duration::from_secs(60));
        let t0 = Instant::now();
        assert!(limiter.check_at(A, t0).allowed);
        assert!(!limiter.check_at(A, t0).allowed);
        assert!(limiter.check_at(B, t0).allowed);
    }

    #[test]
    fn window_slides() {
        let limiter = RateLimiter::new(2, Duration::from_secs(60));
        let t0 = Instant::now();
        assert!(limiter.check_at(A, t0).allowed);
        assert!(limiter.check_at(A, t0 + Duration::from_secs(30)).allowed);
        assert!(!limiter.check_at(A, t0 + Duration::from_secs(59)).allowed);
        // first attempt aged out, one slot frees up
        assert!(limiter.check_at(A, t0 + Duration::from_secs(60)).allowed);
        assert!(!limiter.check_at(A, t0 + Duration::from_secs(61)).allowed);
    }

    #[test]
    fn rejected_attempts_do_not_extend_the_block() {
        let limiter = RateLimiter::new(1, Duration::from_secs(10));
        let t0 = Instant::now();
        assert!(limiter.check_at(A, t0).allowed);
        for s in 1..10 {
            assert!(!limiter.check_at(A, t0 + Duration::from_secs(s)).allowed);
        }
        assert!(limiter.check_at(A, t0 + Duration::from_secs(10)).allowed);
    }
}

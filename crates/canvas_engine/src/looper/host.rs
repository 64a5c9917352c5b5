//! Frame hosts
//!
//! A frame host is the "call me back on the next frame" primitive the looper
//! runs on. Requesting a frame arms a single callback; the driver then asks
//! the host for the timestamp of that frame with [`FrameHost::next_frame`].

use std::thread;
use std::time::{Duration, Instant};

/// Handle of a requested frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(u64);

/// Source of frame callbacks
pub trait FrameHost {
    /// Current host time in milliseconds
    fn now(&self) -> f64;

    /// Arm a callback for the next frame
    fn request_frame(&mut self) -> FrameHandle;

    /// Disarm a requested callback
    fn cancel_frame(&mut self, handle: FrameHandle);

    /// Wait for the armed frame and return its timestamp
    ///
    /// Returns `None` when no frame is armed or the host has no more frames
    /// to give.
    fn next_frame(&mut self) -> Option<f64>;
}

#[derive(Debug, Clone, Default)]
struct Requests {
    pending: Option<FrameHandle>,
    issued: u64,
}

impl Requests {
    fn request(&mut self) -> FrameHandle {
        self.issued += 1;
        let handle = FrameHandle(self.issued);
        self.pending = Some(handle);
        handle
    }

    fn cancel(&mut self, handle: FrameHandle) {
        if self.pending == Some(handle) {
            self.pending = None;
        }
    }

    fn take(&mut self) -> Option<FrameHandle> {
        self.pending.take()
    }
}

/// Deterministic host that advances time by a fixed interval per frame
#[derive(Debug, Clone)]
pub struct SimulatedFrameHost {
    now: f64,
    interval_ms: f64,
    requests: Requests,
    frame_limit: Option<u64>,
    frames: u64,
}

impl SimulatedFrameHost {
    /// Create a host starting at `start_ms` with frames `interval_ms` apart
    pub fn new(start_ms: f64, interval_ms: f64) -> Self {
        Self {
            now: start_ms,
            interval_ms,
            requests: Requests::default(),
            frame_limit: None,
            frames: 0,
        }
    }

    /// Create a host ticking at `frames_per_second`, starting at zero
    pub fn at_rate(frames_per_second: f64) -> Self {
        Self::new(0.0, 1000.0 / frames_per_second)
    }

    /// Stop delivering frames after `limit` of them
    #[must_use]
    pub fn with_frame_limit(mut self, limit: u64) -> Self {
        self.frame_limit = Some(limit);
        self
    }

    /// Change the frame interval
    pub fn set_interval(&mut self, interval_ms: f64) {
        self.interval_ms = interval_ms;
    }

    /// Frames delivered so far
    pub const fn frames_delivered(&self) -> u64 {
        self.frames
    }

    /// Whether a frame is armed
    pub const fn has_pending_frame(&self) -> bool {
        self.requests.pending.is_some()
    }
}

impl FrameHost for SimulatedFrameHost {
    fn now(&self) -> f64 {
        self.now
    }

    fn request_frame(&mut self) -> FrameHandle {
        self.requests.request()
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        self.requests.cancel(handle);
    }

    fn next_frame(&mut self) -> Option<f64> {
        if self.frame_limit.is_some_and(|limit| self.frames >= limit) {
            return None;
        }
        self.requests.take()?;
        self.now += self.interval_ms;
        self.frames += 1;
        Some(self.now)
    }
}

/// Wall-clock host that sleeps until the next frame is due
#[derive(Debug, Clone)]
pub struct RealtimeFrameHost {
    origin: Instant,
    interval: Duration,
    last_frame: Option<Instant>,
    requests: Requests,
    frame_limit: Option<u64>,
    frames: u64,
}

impl RealtimeFrameHost {
    /// Create a host targeting `frames_per_second`
    pub fn new(frames_per_second: f64) -> Self {
        Self {
            origin: Instant::now(),
            interval: Duration::from_secs_f64(1.0 / frames_per_second.max(1.0)),
            last_frame: None,
            requests: Requests::default(),
            frame_limit: None,
            frames: 0,
        }
    }

    /// Stop delivering frames after `limit` of them
    #[must_use]
    pub fn with_frame_limit(mut self, limit: u64) -> Self {
        self.frame_limit = Some(limit);
        self
    }

    fn elapsed_ms(&self, at: Instant) -> f64 {
        at.duration_since(self.origin).as_secs_f64() * 1000.0
    }
}

impl FrameHost for RealtimeFrameHost {
    fn now(&self) -> f64 {
        self.elapsed_ms(Instant::now())
    }

    fn request_frame(&mut self) -> FrameHandle {
        self.requests.request()
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        self.requests.cancel(handle);
    }

    fn next_frame(&mut self) -> Option<f64> {
        if self.frame_limit.is_some_and(|limit| self.frames >= limit) {
            return None;
        }
        self.requests.take()?;

        if let Some(last) = self.last_frame {
            let due = last + self.interval;
            let now = Instant::now();
            if due > now {
                thread::sleep(due - now);
            }
        }
        let at = Instant::now();
        self.last_frame = Some(at);
        self.frames += 1;
        Some(self.elapsed_ms(at))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_simulated_frames_need_a_request() {
        let mut host = SimulatedFrameHost::new(100.0, 10.0);
        assert_eq!(host.next_frame(), None);

        host.request_frame();
        assert_eq!(host.next_frame(), Some(110.0));
        assert_eq!(host.next_frame(), None);
    }

    #[test]
    fn test_cancel_disarms_only_matching_handle() {
        let mut host = SimulatedFrameHost::new(0.0, 10.0);
        let stale = host.request_frame();
        let current = host.request_frame();
        host.cancel_frame(stale);
        assert!(host.has_pending_frame());
        host.cancel_frame(current);
        assert!(!host.has_pending_frame());
    }

    #[test]
    fn test_frame_limit() {
        let mut host = SimulatedFrameHost::at_rate(60.0).with_frame_limit(2);
        for _ in 0..2 {
            host.request_frame();
            assert!(host.next_frame().is_some());
        }
        host.request_frame();
        assert_eq!(host.next_frame(), None);
        assert_eq!(host.frames_delivered(), 2);
    }

    #[test]
    fn test_at_rate_interval() {
        let mut host = SimulatedFrameHost::at_rate(50.0);
        host.request_frame();
        assert_relative_eq!(host.next_frame().unwrap(), 20.0);
    }

    #[test]
    fn test_realtime_host_is_monotonic() {
        let mut host = RealtimeFrameHost::new(1000.0).with_frame_limit(3);
        let mut last = host.now();
        for _ in 0..3 {
            host.request_frame();
            let now = host.next_frame().unwrap();
            assert!(now >= last);
            last = now;
        }
        host.request_frame();
        assert_eq!(host.next_frame(), None);
    }
}

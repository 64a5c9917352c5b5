//! Frame scheduler
//!
//! The [`Looper`] turns frame-host callbacks into frames: it normalizes delta
//! time against a reference frame rate, keeps a rolling frame-rate estimate,
//! drives an optional renderer stage and then runs update subscribers.
//!
//! ## States
//!
//! ```text
//! Idle --trigger--> Running <--pause/resume--> Paused
//!                      |                          |
//!                      +----------stop------------+--> Stopped (terminal)
//! ```

pub mod host;

use std::collections::VecDeque;
use std::error::Error;

pub use host::{FrameHandle, FrameHost, RealtimeFrameHost, SimulatedFrameHost};

use crate::core::config::LooperConfig;
use crate::foundation::logging::{debug, error, trace, warn};
use crate::render::{DrawingSurface, RenderError, RenderMetrics, Renderer};

/// Lifecycle of a looper
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    /// Not started yet
    Idle,
    /// Ticking
    Running,
    /// Frames are ignored until resumed
    Paused,
    /// Finished for good
    Stopped,
}

/// What subscribers receive each frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameInfo {
    /// Frame timestamp (ms)
    pub now: f64,
    /// Elapsed time in frames at the reference rate; 0 on the first frame
    pub delta_time: f64,
    /// Ticks within the rolling window
    pub frame_rate: usize,
    /// Timestamp of the previous frame; equals `now` on the first frame
    pub last_timestamp: f64,
    /// Reference frame rate
    pub perfect_frame_rate: f64,
    /// Render pass metrics, when a stage was bound
    pub metrics: Option<RenderMetrics>,
}

/// Renderer and surface the looper draws each frame
pub struct Stage<'a> {
    /// Renderer to run
    pub renderer: &'a mut Renderer,
    /// Surface to draw on
    pub surface: &'a mut dyn DrawingSurface,
}

/// Result returned by update subscribers
pub type SubscriberResult = Result<(), Box<dyn Error>>;

type UpdateCallback = Box<dyn FnMut(&FrameInfo) -> SubscriberResult>;

/// Handle for removing a subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Looper errors
#[derive(thiserror::Error, Debug)]
pub enum LoopError {
    /// The looper was stopped and cannot run again
    #[error("Looper is stopped")]
    Stopped,

    /// `trigger` was called while already running
    #[error("Looper is already running")]
    AlreadyRunning,

    /// The render stage failed; the looper stopped
    #[error("Render failed: {0}")]
    Render(#[from] RenderError),
}

/// Frame scheduler
pub struct Looper {
    state: LoopState,
    perfect_frame_rate: f64,
    window_ms: f64,
    last_timestamp: Option<f64>,
    delta_time: f64,
    frame_rate: usize,
    window: VecDeque<f64>,
    frame: Option<FrameHandle>,
    subscribers: Vec<(SubscriptionId, UpdateCallback)>,
    next_subscription: u64,
    subscriber_failures: u64,
    frames: u64,
}

impl std::fmt::Debug for Looper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Looper")
            .field("state", &self.state)
            .field("delta_time", &self.delta_time)
            .field("frame_rate", &self.frame_rate)
            .field("subscribers", &self.subscribers.len())
            .field("frames", &self.frames)
            .finish_non_exhaustive()
    }
}

impl Default for Looper {
    fn default() -> Self {
        Self::from_config(&LooperConfig::default())
    }
}

impl Looper {
    /// Create a new looper with the default 60 fps reference rate
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a looper from configuration
    pub fn from_config(config: &LooperConfig) -> Self {
        Self {
            state: LoopState::Idle,
            perfect_frame_rate: config.perfect_frame_rate,
            window_ms: config.frame_rate_window_ms,
            last_timestamp: None,
            delta_time: 0.0,
            frame_rate: 0,
            window: VecDeque::new(),
            frame: None,
            subscribers: Vec::new(),
            next_subscription: 0,
            subscriber_failures: 0,
            frames: 0,
        }
    }

    /// Current state
    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Delta time of the last frame
    pub fn delta_time(&self) -> f64 {
        self.delta_time
    }

    /// Frame rate estimate of the last frame
    pub fn frame_rate(&self) -> usize {
        self.frame_rate
    }

    /// Reference frame rate
    pub fn perfect_frame_rate(&self) -> f64 {
        self.perfect_frame_rate
    }

    /// Frames ticked so far
    pub fn frame_count(&self) -> u64 {
        self.frames
    }

    /// Subscriber calls that returned an error so far
    pub fn subscriber_failures(&self) -> u64 {
        self.subscriber_failures
    }

    /// Run `callback` every frame, after the render stage
    pub fn subscribe(&mut self, callback: impl FnMut(&FrameInfo) -> SubscriberResult + 'static) -> SubscriptionId {
        self.next_subscription += 1;
        let id = SubscriptionId(self.next_subscription);
        self.subscribers.push((id, Box::new(callback)));
        id
    }

    /// Remove a subscriber; returns whether it existed
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(subscription, _)| *subscription != id);
        self.subscribers.len() != before
    }

    /// Start ticking and run the first frame right away
    ///
    /// From `Paused` this resumes. Fails when already running or stopped.
    pub fn trigger(
        &mut self,
        host: &mut dyn FrameHost,
        stage: Option<&mut Stage<'_>>,
    ) -> Result<Option<FrameInfo>, LoopError> {
        match self.state {
            LoopState::Idle | LoopState::Paused => {
                debug!("Looper triggered from {:?}", self.state);
                self.state = LoopState::Running;
                self.last_timestamp = None;
            }
            LoopState::Running => return Err(LoopError::AlreadyRunning),
            LoopState::Stopped => return Err(LoopError::Stopped),
        }
        let now = host.now();
        self.tick(host, now, stage)
    }

    /// Ignore frames until resumed
    pub fn pause(&mut self, host: &mut dyn FrameHost) {
        if self.state == LoopState::Running {
            self.state = LoopState::Paused;
            self.cancel_pending(host);
            debug!("Looper paused");
        }
    }

    /// Continue after a pause
    ///
    /// The first frame after resuming has zero delta time.
    pub fn resume(&mut self, host: &mut dyn FrameHost) -> Result<(), LoopError> {
        match self.state {
            LoopState::Paused => {
                self.state = LoopState::Running;
                self.last_timestamp = None;
                self.frame = Some(host.request_frame());
                debug!("Looper resumed");
                Ok(())
            }
            LoopState::Stopped => Err(LoopError::Stopped),
            LoopState::Idle | LoopState::Running => Ok(()),
        }
    }

    /// Stop for good
    pub fn stop(&mut self, host: &mut dyn FrameHost) {
        if self.state != LoopState::Stopped {
            self.state = LoopState::Stopped;
            self.cancel_pending(host);
            debug!("Looper stopped after {} frames", self.frames);
        }
    }

    fn cancel_pending(&mut self, host: &mut dyn FrameHost) {
        if let Some(frame) = self.frame.take() {
            host.cancel_frame(frame);
        }
    }

    /// Run one frame at host time `now`
    ///
    /// Returns `None` when the looper is not running. A failing render stage
    /// stops the looper; failing subscribers are logged and skipped.
    pub fn tick(
        &mut self,
        host: &mut dyn FrameHost,
        now: f64,
        stage: Option<&mut Stage<'_>>,
    ) -> Result<Option<FrameInfo>, LoopError> {
        if self.state != LoopState::Running {
            trace!("Ignoring frame at {now:.3} while {:?}", self.state);
            return Ok(None);
        }
        self.frame = None;
        self.frames += 1;

        let last_timestamp = self.last_timestamp.unwrap_or(now);
        self.delta_time = (now - last_timestamp) / (1000.0 / self.perfect_frame_rate);
        self.last_timestamp = Some(now);

        self.window.push_back(now);
        while self.window.front().is_some_and(|&stamp| stamp <= now - self.window_ms) {
            self.window.pop_front();
        }
        self.frame_rate = self.window.len();

        let metrics = match stage {
            Some(stage) => {
                stage.renderer.advance_animations(now);
                stage.renderer.clear_scene(stage.surface);
                match stage.renderer.render_objects_in_camera(stage.surface, self.delta_time) {
                    Ok(metrics) => Some(metrics),
                    Err(err) => {
                        error!("Frame {} failed, stopping: {}", self.frames, err);
                        self.stop(host);
                        return Err(err.into());
                    }
                }
            }
            None => None,
        };

        let info = FrameInfo {
            now,
            delta_time: self.delta_time,
            frame_rate: self.frame_rate,
            last_timestamp,
            perfect_frame_rate: self.perfect_frame_rate,
            metrics,
        };

        for (id, subscriber) in &mut self.subscribers {
            if let Err(err) = subscriber(&info) {
                self.subscriber_failures += 1;
                warn!("Update subscriber {:?} failed: {}", id, err);
            }
        }

        if self.state == LoopState::Running {
            self.frame = Some(host.request_frame());
        }
        Ok(Some(info))
    }

    /// Trigger, then tick every frame the host delivers
    ///
    /// Returns the number of frames ticked once the host runs dry or the
    /// looper leaves the running state.
    pub fn run(&mut self, host: &mut dyn FrameHost, mut stage: Option<Stage<'_>>) -> Result<u64, LoopError> {
        let start = self.frames;
        self.trigger(host, stage.as_mut())?;
        while let Some(now) = host.next_frame() {
            self.tick(host, now, stage.as_mut())?;
        }
        Ok(self.frames - start)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::cell::RefCell;
    use std::rc::Rc;

    use crate::foundation::ids::IdAllocator;
    use crate::render::{Camera, RecordingSurface};
    use crate::scene::Scene;

    #[test]
    fn test_first_frame_has_zero_delta() {
        let mut host = SimulatedFrameHost::new(1000.0, 1000.0 / 60.0);
        let mut looper = Looper::new();
        let info = looper.trigger(&mut host, None).unwrap().unwrap();
        assert_eq!(info.delta_time, 0.0);
        assert_eq!(info.last_timestamp, 1000.0);
        assert_eq!(looper.state(), LoopState::Running);
        assert!(host.has_pending_frame());
    }

    #[test]
    fn test_delta_time_is_one_at_steady_60hz() {
        let mut host = SimulatedFrameHost::at_rate(60.0).with_frame_limit(120);
        let mut looper = Looper::new();
        let deltas = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&deltas);
        looper.subscribe(move |info| {
            sink.borrow_mut().push(info.delta_time);
            Ok(())
        });

        let frames = looper.run(&mut host, None).unwrap();
        assert_eq!(frames, 121);
        for delta in deltas.borrow().iter().skip(1) {
            assert_relative_eq!(*delta, 1.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_delta_scales_with_perfect_rate() {
        let config = LooperConfig {
            perfect_frame_rate: 30.0,
            ..LooperConfig::default()
        };
        let mut looper = Looper::from_config(&config);
        let mut host = SimulatedFrameHost::at_rate(60.0);
        looper.trigger(&mut host, None).unwrap();
        let now = host.next_frame().unwrap();
        let info = looper.tick(&mut host, now, None).unwrap().unwrap();
        assert_relative_eq!(info.delta_time, 0.5, epsilon = 1e-9);
    }

    #[test]
    fn test_frame_rate_counts_rolling_window() {
        let mut host = SimulatedFrameHost::new(0.0, 100.0).with_frame_limit(30);
        let mut looper = Looper::new();
        looper.run(&mut host, None).unwrap();
        // ticks at 2000..=3000 step 100, window excludes exactly 2000
        assert_eq!(looper.frame_rate(), 10);
    }

    #[test]
    fn test_subscribers_run_in_order_and_failures_are_isolated() {
        let mut host = SimulatedFrameHost::at_rate(60.0);
        let mut looper = Looper::new();
        let order = Rc::new(RefCell::new(Vec::new()));

        let log = Rc::clone(&order);
        looper.subscribe(move |_| {
            log.borrow_mut().push("first");
            Ok(())
        });
        looper.subscribe(|_| Err("boom".into()));
        let log = Rc::clone(&order);
        looper.subscribe(move |_| {
            log.borrow_mut().push("third");
            Ok(())
        });

        looper.trigger(&mut host, None).unwrap();
        let now = host.next_frame().unwrap();
        looper.tick(&mut host, now, None).unwrap();

        assert_eq!(*order.borrow(), vec!["first", "third", "first", "third"]);
        assert_eq!(looper.subscriber_failures(), 2);
        assert_eq!(looper.state(), LoopState::Running);
    }

    #[test]
    fn test_unsubscribe() {
        let mut looper = Looper::new();
        let id = looper.subscribe(|_| Ok(()));
        assert!(looper.unsubscribe(id));
        assert!(!looper.unsubscribe(id));
    }

    #[test]
    fn test_pause_resume_and_stop() {
        let mut host = SimulatedFrameHost::at_rate(60.0);
        let mut looper = Looper::new();
        looper.trigger(&mut host, None).unwrap();

        looper.pause(&mut host);
        assert_eq!(looper.state(), LoopState::Paused);
        assert!(!host.has_pending_frame());
        assert!(looper.tick(&mut host, 500.0, None).unwrap().is_none());

        looper.resume(&mut host).unwrap();
        let now = host.next_frame().unwrap();
        let info = looper.tick(&mut host, now, None).unwrap().unwrap();
        assert_eq!(info.delta_time, 0.0);

        looper.stop(&mut host);
        assert!(!host.has_pending_frame());
        assert!(matches!(looper.trigger(&mut host, None), Err(LoopError::Stopped)));
        assert!(matches!(looper.resume(&mut host), Err(LoopError::Stopped)));
    }

    #[test]
    fn test_double_trigger_is_rejected() {
        let mut host = SimulatedFrameHost::at_rate(60.0);
        let mut looper = Looper::new();
        looper.trigger(&mut host, None).unwrap();
        assert!(matches!(looper.trigger(&mut host, None), Err(LoopError::AlreadyRunning)));
    }

    #[test]
    fn test_render_failure_stops_looper() {
        let mut renderer = Renderer::new(Scene::new(100.0, 100.0), IdAllocator::new());
        let mut surface = RecordingSurface::new(100.0, 100.0);
        let mut host = SimulatedFrameHost::at_rate(60.0);
        let mut looper = Looper::new();

        let mut stage = Stage {
            renderer: &mut renderer,
            surface: &mut surface,
        };
        let err = looper.trigger(&mut host, Some(&mut stage)).unwrap_err();
        assert!(matches!(err, LoopError::Render(RenderError::NoCamera)));
        assert_eq!(looper.state(), LoopState::Stopped);
        assert!(!host.has_pending_frame());
    }

    #[test]
    fn test_stage_frame_clears_then_renders() {
        let mut renderer = Renderer::new(Scene::new(100.0, 100.0), IdAllocator::new());
        let camera = Camera::for_scene(renderer.scene());
        renderer.set_camera(camera);
        let mut surface = RecordingSurface::new(100.0, 100.0);
        let mut host = SimulatedFrameHost::at_rate(60.0).with_frame_limit(3);
        let mut looper = Looper::new();

        let frames = looper
            .run(
                &mut host,
                Some(Stage {
                    renderer: &mut renderer,
                    surface: &mut surface,
                }),
            )
            .unwrap();
        assert_eq!(frames, 4);
        let clears = surface
            .commands()
            .iter()
            .filter(|command| matches!(command, crate::render::DrawCommand::ClearRect { .. }))
            .count();
        assert_eq!(clears, 4);
        assert_eq!(surface.save_depth(), 0);
    }
}

//! Per-owner tween scheduling
//!
//! A [`TweenScheduler`] keeps at most one running tween per field. Owners
//! (render objects, the camera) advance their scheduler once per frame with
//! the frame timestamp and write the returned values back into themselves.
//! Starting a tween on a field that is already animating replaces the old one.

use std::cell::Cell;
use std::collections::HashMap;
use std::hash::Hash;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use slotmap::{new_key_type, SlotMap};

use super::easing::Easing;
use crate::foundation::math::utils::lerp;
use crate::scene::ObjectError;

new_key_type! {
    struct TweenKey;
}

/// Duration and curve of an animation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnimationSpec {
    /// Length of the animation in milliseconds
    pub duration_ms: f64,
    /// Interpolation curve
    pub easing: Easing,
}

impl AnimationSpec {
    /// Create a new animation spec
    pub const fn new(duration_ms: f64, easing: Easing) -> Self {
        Self { duration_ms, easing }
    }

    /// Create a spec from an easing name such as `"easeOutCubic"`
    pub fn named(duration_ms: f64, easing: &str) -> Result<Self, ObjectError> {
        Ok(Self::new(duration_ms, easing.parse()?))
    }
}

/// Lifecycle of a tween handle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TweenStatus {
    /// Started but not yet advanced
    Pending,
    /// At least one frame has been applied
    Running,
    /// Every field reached its target
    Finished,
    /// Cancelled or replaced before finishing
    Cancelled,
}

#[derive(Debug)]
struct HandleState {
    status: Cell<TweenStatus>,
    live: Cell<usize>,
}

/// Cancellable handle returned by every animation helper
///
/// A handle may cover several fields (`animate_position` moves x and y
/// together); it finishes when the last of them does.
#[derive(Debug, Clone)]
pub struct TweenHandle {
    state: Rc<HandleState>,
}

impl TweenHandle {
    fn new(fields: usize) -> Self {
        Self {
            state: Rc::new(HandleState {
                status: Cell::new(if fields == 0 { TweenStatus::Finished } else { TweenStatus::Pending }),
                live: Cell::new(fields),
            }),
        }
    }

    /// Stop the animation where it is; no further values are written
    pub fn cancel(&self) {
        if self.is_active() {
            self.state.status.set(TweenStatus::Cancelled);
        }
    }

    /// Current status
    pub fn status(&self) -> TweenStatus {
        self.state.status.get()
    }

    /// Whether the animation is still pending or running
    pub fn is_active(&self) -> bool {
        matches!(self.status(), TweenStatus::Pending | TweenStatus::Running)
    }

    fn mark_running(&self) {
        if self.status() == TweenStatus::Pending {
            self.state.status.set(TweenStatus::Running);
        }
    }

    fn release(&self, completed: bool) {
        let live = self.state.live.get().saturating_sub(1);
        self.state.live.set(live);
        if !completed {
            self.cancel();
        } else if live == 0 && self.is_active() {
            self.state.status.set(TweenStatus::Finished);
        }
    }
}

#[derive(Debug)]
struct Tween<F> {
    field: F,
    from: f64,
    to: f64,
    spec: AnimationSpec,
    started_at: Option<f64>,
    handle: TweenHandle,
}

/// One-tween-per-field animation scheduler
#[derive(Debug)]
pub struct TweenScheduler<F> {
    tweens: SlotMap<TweenKey, Tween<F>>,
    by_field: HashMap<F, TweenKey>,
}

impl<F> Default for TweenScheduler<F> {
    fn default() -> Self {
        Self {
            tweens: SlotMap::with_key(),
            by_field: HashMap::new(),
        }
    }
}

impl<F: Copy + Eq + Hash> TweenScheduler<F> {
    /// Create an empty scheduler
    pub fn new() -> Self {
        Self::default()
    }

    /// Animate one field from `from` to `to`
    pub fn start(&mut self, field: F, from: f64, to: f64, spec: AnimationSpec) -> TweenHandle {
        let handle = TweenHandle::new(1);
        self.insert(field, from, to, spec, handle.clone());
        handle
    }

    /// Animate several fields under a single handle
    pub fn start_group(&mut self, fields: &[(F, f64, f64)], spec: AnimationSpec) -> TweenHandle {
        let handle = TweenHandle::new(fields.len());
        for &(field, from, to) in fields {
            self.insert(field, from, to, spec, handle.clone());
        }
        handle
    }

    fn insert(&mut self, field: F, from: f64, to: f64, spec: AnimationSpec, handle: TweenHandle) {
        if let Some(previous) = self.by_field.remove(&field).and_then(|key| self.tweens.remove(key)) {
            previous.handle.release(false);
        }
        let key = self.tweens.insert(Tween {
            field,
            from,
            to,
            spec,
            started_at: None,
            handle,
        });
        self.by_field.insert(field, key);
    }

    /// Advance every tween to `now` and return the values to write back
    ///
    /// A tween's clock starts at the first advance after it was started.
    /// The final step always yields the exact target value.
    pub fn advance(&mut self, now: f64) -> Vec<(F, f64)> {
        let mut updates = Vec::with_capacity(self.tweens.len());
        let mut done = Vec::new();

        for (key, tween) in &mut self.tweens {
            if !tween.handle.is_active() {
                done.push((key, false));
                continue;
            }

            let started_at = *tween.started_at.get_or_insert(now);
            let progress = if tween.spec.duration_ms > 0.0 {
                (now - started_at) / tween.spec.duration_ms
            } else {
                1.0
            };

            if progress >= 1.0 {
                updates.push((tween.field, tween.to));
                done.push((key, true));
            } else {
                tween.handle.mark_running();
                let eased = tween.spec.easing.apply(progress);
                updates.push((tween.field, lerp(tween.from, tween.to, eased)));
            }
        }

        for (key, completed) in done {
            if let Some(tween) = self.tweens.remove(key) {
                if self.by_field.get(&tween.field) == Some(&key) {
                    self.by_field.remove(&tween.field);
                }
                tween.handle.release(completed);
            }
        }

        updates
    }

    /// Cancel whatever animates `field`
    pub fn cancel_field(&mut self, field: F) {
        if let Some(tween) = self.by_field.remove(&field).and_then(|key| self.tweens.remove(key)) {
            tween.handle.release(false);
        }
    }

    /// Cancel every tween
    pub fn cancel_all(&mut self) {
        for (_, tween) in self.tweens.drain() {
            tween.handle.release(false);
        }
        self.by_field.clear();
    }

    /// Whether `field` has an active tween
    pub fn is_animating(&self, field: F) -> bool {
        self.by_field
            .get(&field)
            .and_then(|key| self.tweens.get(*key))
            .is_some_and(|tween| tween.handle.is_active())
    }

    /// Number of scheduled tweens
    pub fn len(&self) -> usize {
        self.tweens.len()
    }

    /// Whether nothing is scheduled
    pub fn is_empty(&self) -> bool {
        self.tweens.is_empty()
    }
}

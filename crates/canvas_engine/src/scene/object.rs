//! Render objects
//!
//! A render object is anything the renderer can draw and update. Concrete
//! shapes implement [`RenderObject`] and embed an [`ObjectCore`], which holds
//! identity, placement, bounds, style, event callbacks, hover/press state,
//! dragging and running animations.
//!
//! ## Lifecycle
//!
//! Objects are created standalone and stay inert until a renderer adopts
//! them. `update_events` does nothing for an object that was never added.

use std::any::Any;
use std::fmt;
use std::time::SystemTime;

use crate::animation::{AnimationSpec, TweenHandle, TweenScheduler};
use crate::foundation::ids::{IdAllocator, ObjectId, RendererId};
use crate::foundation::logging::trace;
use crate::foundation::math::{utils::deg_to_rad, Affine, Vec2};
use crate::render::camera::Camera;
use crate::render::surface::DrawingSurface;

use super::bounds::Bounds;
use super::drag::{DragOptions, DragState};
use super::events::{EventPayload, EventRegistry, InteractionState, ObjectEvent, PointerSample};
use super::pointer::{PointerSnapshot, PointerState, WheelDelta};
use super::style::{StyleBag, StyleGroups};
use super::ObjectError;

/// What a draw call did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawOutcome {
    /// Something was drawn
    Drawn,
    /// Nothing was drawn
    Skipped,
}

/// Frame-based sprite animation attached to an object
///
/// Advanced by the renderer every frame the object is drawn.
pub trait SpriteAnimation: fmt::Debug {
    /// Advance by `delta_time` frames at the reference frame rate
    fn update(&mut self, delta_time: f64);
}

/// Everything an object's update sees for one frame
pub struct UpdateContext<'a> {
    /// Surface the frame is drawn on
    pub surface: &'a mut dyn DrawingSurface,
    /// Elapsed time in frames at the reference frame rate
    pub delta_time: f64,
    /// Frame timestamp in milliseconds
    pub timestamp: f64,
    /// Active camera, if the renderer has one
    pub camera: Option<&'a Camera>,
    /// Screen-space pointer
    pub pointer: &'a PointerState,
    /// Wheel input delivered this frame
    pub wheel: Option<WheelDelta>,
}

/// A drawable, updatable scene entity
pub trait RenderObject: Any {
    /// Shared object state
    fn core(&self) -> &ObjectCore;

    /// Mutable shared object state
    fn core_mut(&mut self) -> &mut ObjectCore;

    /// Draw onto the surface, already transformed by the camera
    ///
    /// Must not change which objects the renderer holds.
    fn draw(&mut self, surface: &mut dyn DrawingSurface) -> Result<DrawOutcome, ObjectError> {
        let _ = surface;
        Ok(DrawOutcome::Skipped)
    }

    /// Per-frame update; interactive objects call
    /// [`ObjectCore::update_events`] from here
    fn update(&mut self, ctx: &mut UpdateContext<'_>) -> Result<(), ObjectError> {
        let _ = ctx;
        Ok(())
    }

    /// Called once when a renderer adopts the object
    ///
    /// Returned objects are added right after this one and recorded as its
    /// children.
    fn on_add(&mut self, ids: &IdAllocator) -> Vec<Box<dyn RenderObject>> {
        let _ = ids;
        Vec::new()
    }

    /// Upcast for downcasting to the concrete type
    fn as_any(&self) -> &dyn Any;

    /// Mutable upcast for downcasting to the concrete type
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Numeric fields that can be animated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnimatedField {
    /// Horizontal position
    X,
    /// Vertical position
    Y,
    /// Axis-aligned width
    Width,
    /// Axis-aligned height
    Height,
    /// Radial radius
    Radius,
    /// Rotation in degrees
    Rotation,
    /// Horizontal scale
    ScaleX,
    /// Vertical scale
    ScaleY,
}

/// State shared by every render object
#[derive(Debug)]
pub struct ObjectCore {
    id: ObjectId,
    created_at: SystemTime,
    creation_order: u64,

    /// Horizontal position
    pub x: f64,
    /// Vertical position
    pub y: f64,
    /// Bounding shape relative to `(x, y)`
    pub bounds: Bounds,
    /// Rotation in degrees
    pub rotation: f64,
    /// Optional scale; `None` means unscaled
    pub scale: Option<Vec2>,
    /// Explicit transform replacing position, rotation and scale
    pub matrix: Option<Affine>,
    /// Presentation settings read by `draw`
    pub style: StyleBag,
    /// Draw and update even when outside the camera view
    pub force_rendering: bool,
    /// Event callbacks
    pub events: EventRegistry,

    visible: bool,
    style_groups: StyleGroups,
    interaction: InteractionState,
    drag: DragState,
    renderer_id: Option<RendererId>,
    children: Vec<ObjectId>,
    sprite_animation: Option<Box<dyn SpriteAnimation>>,
    tweens: TweenScheduler<AnimatedField>,
}

impl ObjectCore {
    /// Create a new object core at `(x, y)`
    pub fn new(ids: &IdAllocator, x: f64, y: f64, bounds: Bounds) -> Self {
        Self {
            id: ids.next_object(),
            created_at: SystemTime::now(),
            creation_order: ids.next_creation_order(),
            x,
            y,
            bounds,
            rotation: 0.0,
            scale: None,
            matrix: None,
            style: StyleBag::new(),
            force_rendering: false,
            events: EventRegistry::new(),
            visible: false,
            style_groups: StyleGroups::default(),
            interaction: InteractionState::default(),
            drag: DragState::default(),
            renderer_id: None,
            children: Vec::new(),
            sprite_animation: None,
            tweens: TweenScheduler::new(),
        }
    }

    /// Builder-style style assignment
    #[must_use]
    pub fn with_style(mut self, style: StyleBag) -> Self {
        self.style = style;
        self
    }

    /// Stable identity
    pub const fn id(&self) -> ObjectId {
        self.id
    }

    /// Wall-clock creation time
    pub const fn created_at(&self) -> SystemTime {
        self.created_at
    }

    /// Position in the allocator's creation sequence
    pub const fn creation_order(&self) -> u64 {
        self.creation_order
    }

    /// Whether the last frame found the object inside the camera view
    pub const fn is_visible(&self) -> bool {
        self.visible
    }

    pub(crate) fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// Renderer that adopted the object, if any
    ///
    /// Kept after the object is destroyed.
    pub const fn renderer_id(&self) -> Option<RendererId> {
        self.renderer_id
    }

    /// Whether a renderer ever adopted the object
    pub const fn is_attached(&self) -> bool {
        self.renderer_id.is_some()
    }

    pub(crate) fn attach(&mut self, renderer: RendererId) {
        self.renderer_id = Some(renderer);
    }

    /// Ids of objects added through this object's `on_add`
    pub fn children(&self) -> &[ObjectId] {
        &self.children
    }

    pub(crate) fn add_child(&mut self, child: ObjectId) {
        self.children.push(child);
    }

    /// Hover and press flags
    pub const fn interaction(&self) -> &InteractionState {
        &self.interaction
    }

    /// Attach a sprite animation
    pub fn set_sprite_animation(&mut self, animation: Box<dyn SpriteAnimation>) {
        self.sprite_animation = Some(animation);
    }

    /// Detach the sprite animation
    pub fn clear_sprite_animation(&mut self) -> Option<Box<dyn SpriteAnimation>> {
        self.sprite_animation.take()
    }

    pub(crate) fn advance_sprite(&mut self, delta_time: f64) {
        if let Some(animation) = self.sprite_animation.as_mut() {
            animation.update(delta_time);
        }
    }

    // ----- placement -----

    /// Position as a vector
    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Move to `(x, y)`
    pub fn set_position(&mut self, x: f64, y: f64) {
        self.x = x;
        self.y = y;
    }

    /// Center of the object: `(x + w/2, y + h/2)` for rectangles, else `(x, y)`
    pub fn center_point(&self) -> Vec2 {
        self.bounds.center(self.position())
    }

    /// Place a rectangle so its center is `(x, y)`
    pub fn center(&mut self, x: f64, y: f64) -> Result<(), ObjectError> {
        let (width, height) = self.require_size("center")?;
        self.x = x - width / 2.0;
        self.y = y - height / 2.0;
        Ok(())
    }

    /// `(width, height)` for axis-aligned objects
    pub const fn size(&self) -> Option<(f64, f64)> {
        self.bounds.size()
    }

    /// Grow or shrink a rectangle
    pub fn change_size(&mut self, delta_width: f64, delta_height: f64) -> Result<(), ObjectError> {
        let (width, height) = self.require_size("change size")?;
        self.bounds = Bounds::rect(width + delta_width, height + delta_height);
        Ok(())
    }

    /// Set a rectangle's size
    pub fn set_fixed_size(&mut self, width: f64, height: f64) -> Result<(), ObjectError> {
        self.require_size("set fixed size")?;
        self.bounds = Bounds::rect(width, height);
        Ok(())
    }

    /// Transform from object space into world space
    ///
    /// The explicit matrix wins when set; otherwise translate, rotate about
    /// the origin, then scale.
    pub fn local_transform(&self) -> Affine {
        if let Some(matrix) = self.matrix {
            return matrix;
        }
        let scale = self.scale.unwrap_or_else(|| Vec2::new(1.0, 1.0));
        Affine::translation(self.x, self.y)
            .multiply(&Affine::rotation(deg_to_rad(self.rotation)))
            .multiply(&Affine::scaling(scale.x, scale.y))
    }

    fn require_size(&self, op: &'static str) -> Result<(f64, f64), ObjectError> {
        self.bounds.size().ok_or(ObjectError::MissingField {
            op,
            field: "width and height",
            kind: self.bounds.kind(),
        })
    }

    fn require_radius(&self, op: &'static str) -> Result<f64, ObjectError> {
        self.bounds.radius().ok_or(ObjectError::MissingField {
            op,
            field: "radius",
            kind: self.bounds.kind(),
        })
    }

    // ----- style groups -----

    /// Store a named style snapshot
    pub fn create_style_group(&mut self, name: &str, style: StyleBag) -> Result<(), ObjectError> {
        self.style_groups.create(name, style)
    }

    /// Copy a named snapshot onto the live style
    pub fn use_style_group(&mut self, name: &str) -> Result<(), ObjectError> {
        let group = self.style_groups.get(name)?;
        self.style.merge(group);
        Ok(())
    }

    // ----- animation -----

    /// Animate `x` to `to`
    pub fn animate_x_position(&mut self, to: f64, spec: AnimationSpec) -> TweenHandle {
        self.tweens.start(AnimatedField::X, self.x, to, spec)
    }

    /// Animate `y` to `to`
    pub fn animate_y_position(&mut self, to: f64, spec: AnimationSpec) -> TweenHandle {
        self.tweens.start(AnimatedField::Y, self.y, to, spec)
    }

    /// Animate both coordinates under one handle
    pub fn animate_position(&mut self, x: f64, y: f64, spec: AnimationSpec) -> TweenHandle {
        self.tweens.start_group(
            &[(AnimatedField::X, self.x, x), (AnimatedField::Y, self.y, y)],
            spec,
        )
    }

    /// Animate a rectangle's width
    pub fn animate_width(&mut self, to: f64, spec: AnimationSpec) -> Result<TweenHandle, ObjectError> {
        let (width, _) = self.require_size("animate width")?;
        Ok(self.tweens.start(AnimatedField::Width, width, to, spec))
    }

    /// Animate a rectangle's height
    pub fn animate_height(&mut self, to: f64, spec: AnimationSpec) -> Result<TweenHandle, ObjectError> {
        let (_, height) = self.require_size("animate height")?;
        Ok(self.tweens.start(AnimatedField::Height, height, to, spec))
    }

    /// Animate a circle's radius
    pub fn animate_radius(&mut self, to: f64, spec: AnimationSpec) -> Result<TweenHandle, ObjectError> {
        let radius = self.require_radius("animate radius")?;
        Ok(self.tweens.start(AnimatedField::Radius, radius, to, spec))
    }

    /// Animate rotation, in degrees
    pub fn animate_rotation(&mut self, to: f64, spec: AnimationSpec) -> TweenHandle {
        self.tweens.start(AnimatedField::Rotation, self.rotation, to, spec)
    }

    /// Animate both scale axes under one handle
    pub fn animate_scale(&mut self, to: Vec2, spec: AnimationSpec) -> TweenHandle {
        let from = self.scale.unwrap_or_else(|| Vec2::new(1.0, 1.0));
        self.tweens.start_group(
            &[(AnimatedField::ScaleX, from.x, to.x), (AnimatedField::ScaleY, from.y, to.y)],
            spec,
        )
    }

    /// Whether `field` is being animated
    pub fn is_animating(&self, field: AnimatedField) -> bool {
        self.tweens.is_animating(field)
    }

    /// Cancel every running animation
    pub fn cancel_animations(&mut self) {
        self.tweens.cancel_all();
    }

    /// Write the animated values for frame time `now`
    pub fn advance_animations(&mut self, now: f64) {
        if self.tweens.is_empty() {
            return;
        }
        for (field, value) in self.tweens.advance(now) {
            self.apply_animated(field, value);
        }
    }

    fn apply_animated(&mut self, field: AnimatedField, value: f64) {
        match (field, &mut self.bounds) {
            (AnimatedField::X, _) => self.x = value,
            (AnimatedField::Y, _) => self.y = value,
            (AnimatedField::Width, Bounds::AxisAligned { width, .. }) => *width = value,
            (AnimatedField::Height, Bounds::AxisAligned { height, .. }) => *height = value,
            (AnimatedField::Radius, Bounds::Radial { radius }) => *radius = value,
            (AnimatedField::Rotation, _) => self.rotation = value,
            (AnimatedField::ScaleX, _) => self.scale.get_or_insert_with(|| Vec2::new(1.0, 1.0)).x = value,
            (AnimatedField::ScaleY, _) => self.scale.get_or_insert_with(|| Vec2::new(1.0, 1.0)).y = value,
            // bounds kind changed while the tween ran
            _ => {}
        }
    }

    // ----- dragging -----

    /// Set how the object drags
    pub fn configure_dragging(&mut self, options: DragOptions) {
        self.drag.configure(options);
    }

    /// Start following presses; fails if dragging was never configured
    pub fn enable_dragging(&mut self) -> Result<(), ObjectError> {
        if !self.drag.is_configured() {
            return Err(ObjectError::DraggingNotConfigured);
        }
        self.drag.set_enabled(true);
        Ok(())
    }

    /// Stop following presses, ending any drag in progress
    pub fn disable_dragging(&mut self) {
        self.drag.set_enabled(false);
    }

    /// Whether dragging is enabled
    pub const fn is_draggable(&self) -> bool {
        self.drag.is_enabled()
    }

    /// Whether a drag is in progress
    pub const fn is_dragging(&self) -> bool {
        self.drag.is_dragging()
    }

    // ----- events -----

    /// Hit test the pointer and fire the resulting events
    ///
    /// Does nothing until a renderer has adopted the object, or when the
    /// context carries no camera.
    pub fn update_events(&mut self, ctx: &UpdateContext<'_>) {
        let Some(camera) = ctx.camera else {
            return;
        };
        if !self.is_attached() {
            return;
        }

        let pointer = ctx.pointer;
        let world = camera.screen_to_world(pointer.position());
        let origin = self.position();
        let sample = PointerSample {
            inside: pointer.in_window() && self.bounds.contains(origin, world),
            pressed: pointer.is_pressed(),
            press_generation: pointer.press_generation(),
            wheel: ctx.wheel.is_some(),
        };

        let mut fired = self.interaction.step(sample);
        let drag = self.drag.step(&fired, sample.pressed, world, origin);
        if let Some(position) = drag.position {
            self.set_position(position.x, position.y);
        }
        fired.extend(drag.events);

        if !fired.is_empty() {
            let mouse = pointer.snapshot(ctx.wheel);
            for event in fired {
                self.fire(event, Some(world), Some(mouse), ctx.timestamp);
            }
        }

        if self.visible {
            self.fire(ObjectEvent::Render, None, None, ctx.timestamp);
        }
    }

    fn fire(&mut self, event: ObjectEvent, mouse_position: Option<Vec2>, mouse: Option<PointerSnapshot>, timestamp: f64) {
        if !self.events.has_listener(event) {
            return;
        }
        trace!("{} fires {}", self.id, event);
        let payload = EventPayload {
            event,
            target: self.id,
            mouse_position,
            mouse,
            timestamp,
        };
        self.events.fire(&payload);
    }
}

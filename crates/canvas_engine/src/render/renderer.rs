//! # Renderer
//!
//! Owns the object registry, the scene and the active camera, and runs the
//! per-frame pass: camera transform, visibility culling, then draw and update
//! for every object that survives culling.
//!
//! ## Frame Pass
//!
//! ```text
//! save → translate/scale (camera) → global transform
//!   for each object in insertion order:
//!     off-screen rendering | force rendering | inside view band → draw, sprite, update
//!     otherwise → visible = false, skipped
//! restore → replace visible set → metrics
//! ```

use crate::animation::{AnimationSpec, TweenHandle};
use crate::core::config::{ApplicationConfig, DEFAULT_VISIBILITY_MARGIN};
use crate::foundation::ids::{IdAllocator, ObjectId, RendererId};
use crate::foundation::logging::{debug, trace, warn};
use crate::foundation::math::{Affine, Vec2};
use crate::foundation::time::{Clock, SystemClock};
use crate::scene::{ObjectError, PointerState, RenderObject, Scene, UpdateContext, WheelDelta};

use super::camera::{Camera, Scaling};
use super::culling::ViewBand;
use super::surface::DrawingSurface;

/// Timing and size of the last frame pass
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RenderMetrics {
    /// Clock time when the pass started (ms)
    pub started_at: f64,
    /// Clock time when the pass ended (ms)
    pub ended_at: f64,
    /// `ended_at - started_at`
    pub duration: f64,
    /// Number of objects found inside the camera view
    pub rendered_amount_of_objects: usize,
}

/// Renderer errors
#[derive(thiserror::Error, Debug)]
pub enum RenderError {
    /// Rendering was requested before a camera was assigned
    #[error("Renderer has no camera")]
    NoCamera,

    /// An object with this id is already registered
    #[error("{0} is already registered")]
    DuplicateObject(ObjectId),

    /// No registered object has this id
    #[error("{0} is not registered")]
    UnknownObject(ObjectId),

    /// An object's draw or update failed
    #[error("{id} failed: {source}")]
    Object {
        /// Failing object
        id: ObjectId,
        /// What went wrong
        #[source]
        source: ObjectError,
    },
}

/// Scene renderer and object registry
pub struct Renderer {
    id: RendererId,
    ids: IdAllocator,
    scene: Scene,
    camera: Option<Camera>,
    objects: Vec<Box<dyn RenderObject>>,
    visible: Vec<ObjectId>,
    metrics: RenderMetrics,
    visibility_margin: f64,
    global_transform: Option<Affine>,
    clock: Box<dyn Clock>,
}

impl std::fmt::Debug for Renderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Renderer")
            .field("id", &self.id)
            .field("objects", &self.objects.len())
            .field("visible", &self.visible.len())
            .field("has_camera", &self.camera.is_some())
            .field("metrics", &self.metrics)
            .finish_non_exhaustive()
    }
}

impl Renderer {
    /// Create a new renderer for a scene, without a camera
    pub fn new(scene: Scene, ids: IdAllocator) -> Self {
        Self {
            id: ids.next_renderer(),
            ids,
            scene,
            camera: None,
            objects: Vec::new(),
            visible: Vec::new(),
            metrics: RenderMetrics::default(),
            visibility_margin: DEFAULT_VISIBILITY_MARGIN,
            global_transform: None,
            clock: Box::new(SystemClock::new()),
        }
    }

    /// Create a renderer with its scene and camera from configuration
    pub fn from_config(config: &ApplicationConfig, ids: IdAllocator) -> Self {
        let scene = Scene::from_config(&config.scene);
        let camera = Camera::from_config(&config.camera, &scene);
        let mut renderer = Self::new(scene, ids);
        renderer.camera = Some(camera);
        renderer.visibility_margin = config.renderer.visibility_margin;
        renderer
    }

    /// Replace the clock used for frame metrics
    #[must_use]
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// This renderer's id
    pub const fn id(&self) -> RendererId {
        self.id
    }

    /// Id source shared with the application
    pub const fn ids(&self) -> &IdAllocator {
        &self.ids
    }

    /// The scene
    pub const fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Mutable scene, for feeding input and resizing
    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    // ----- camera -----

    /// Assign the camera, returning the one it replaces
    pub fn set_camera(&mut self, camera: Camera) -> Option<Camera> {
        self.camera.replace(camera)
    }

    /// Remove the camera
    pub fn take_camera(&mut self) -> Option<Camera> {
        self.camera.take()
    }

    /// Active camera
    pub const fn camera(&self) -> Option<&Camera> {
        self.camera.as_ref()
    }

    /// Mutable active camera
    pub fn camera_mut(&mut self) -> Option<&mut Camera> {
        self.camera.as_mut()
    }

    /// Center the camera on a registered object
    pub fn focus_camera(
        &mut self,
        id: ObjectId,
        scaling: Option<Scaling>,
        offset: Vec2,
        animation: Option<AnimationSpec>,
    ) -> Result<Option<TweenHandle>, RenderError> {
        let viewport = self.scene.size();
        let camera = self.camera.as_mut().ok_or(RenderError::NoCamera)?;
        let object = self
            .objects
            .iter()
            .find(|object| object.core().id() == id)
            .ok_or(RenderError::UnknownObject(id))?;
        Ok(camera.focus(object.core(), viewport, scaling, offset, animation))
    }

    // ----- registry -----

    /// Register an object
    ///
    /// Fails without touching the registry if the id is already present.
    /// Objects returned by the object's `on_add` are registered right after
    /// it and recorded as its children. If one of them cannot be added, the
    /// object and the children added so far are removed again.
    pub fn add(&mut self, mut object: Box<dyn RenderObject>) -> Result<ObjectId, RenderError> {
        let id = object.core().id();
        if self.contains(id) {
            return Err(RenderError::DuplicateObject(id));
        }

        object.core_mut().attach(self.id);
        let children = object.on_add(&self.ids);
        let index = self.objects.len();
        self.objects.push(object);
        debug!("Added {} to {} ({} objects)", id, self.id, self.objects.len());

        for child in children {
            match self.add(child) {
                Ok(child_id) => self.objects[index].core_mut().add_child(child_id),
                Err(err) => {
                    warn!("Adding a child of {} failed, removing it again: {}", id, err);
                    self.discard(id);
                    return Err(err);
                }
            }
        }
        Ok(id)
    }

    /// Remove an object together with every child it registered
    fn discard(&mut self, id: ObjectId) {
        if let Some(object) = self.destroy(id) {
            for child in object.core().children() {
                self.discard(*child);
            }
        }
    }

    /// Register a concrete object
    pub fn add_object<T: RenderObject>(&mut self, object: T) -> Result<ObjectId, RenderError> {
        self.add(Box::new(object))
    }

    /// Unregister an object and hand it back
    ///
    /// The relative order of the remaining objects is kept. The object keeps
    /// its renderer id.
    pub fn destroy(&mut self, id: ObjectId) -> Option<Box<dyn RenderObject>> {
        let index = self.objects.iter().position(|object| object.core().id() == id)?;
        let object = self.objects.remove(index);
        self.visible.retain(|visible| *visible != id);
        debug!("Removed {} from {}", id, self.id);
        Some(object)
    }

    /// Whether an object is registered
    pub fn contains(&self, id: ObjectId) -> bool {
        self.objects.iter().any(|object| object.core().id() == id)
    }

    /// Registered object by id
    pub fn get(&self, id: ObjectId) -> Option<&dyn RenderObject> {
        self.objects
            .iter()
            .find(|object| object.core().id() == id)
            .map(|object| &**object)
    }

    /// Mutable registered object by id
    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut dyn RenderObject> {
        let object: &mut dyn RenderObject = self
            .objects
            .iter_mut()
            .find(|object| object.core().id() == id)?
            .as_mut();
        Some(object)
    }

    /// Registered object downcast to its concrete type
    pub fn get_as<T: RenderObject>(&self, id: ObjectId) -> Option<&T> {
        self.get(id)?.as_any().downcast_ref::<T>()
    }

    /// Mutable registered object downcast to its concrete type
    pub fn get_as_mut<T: RenderObject>(&mut self, id: ObjectId) -> Option<&mut T> {
        self.get_mut(id)?.as_any_mut().downcast_mut::<T>()
    }

    /// Registered ids in insertion order
    pub fn object_ids(&self) -> Vec<ObjectId> {
        self.objects.iter().map(|object| object.core().id()).collect()
    }

    /// Registered objects in insertion order
    pub fn objects(&self) -> impl Iterator<Item = &dyn RenderObject> + '_ {
        self.objects.iter().map(|object| &**object)
    }

    /// Number of registered objects
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Whether nothing is registered
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Objects found inside the camera view by the last pass
    pub fn visible_ids(&self) -> &[ObjectId] {
        &self.visible
    }

    /// Metrics of the last pass
    pub const fn last_metrics(&self) -> RenderMetrics {
        self.metrics
    }

    /// Objects whose bounds contain a world point, topmost first
    pub fn objects_at(&self, world: Vec2) -> Vec<ObjectId> {
        self.objects
            .iter()
            .rev()
            .map(|object| object.core())
            .filter(|core| core.bounds.contains(core.position(), world))
            .map(|core| core.id())
            .collect()
    }

    // ----- settings -----

    /// Culling margin in screen units
    pub const fn visibility_margin(&self) -> f64 {
        self.visibility_margin
    }

    /// Change the culling margin
    pub fn set_visibility_margin(&mut self, margin: f64) {
        self.visibility_margin = margin;
    }

    /// Transform applied after the camera for every object
    pub const fn global_transform(&self) -> Option<Affine> {
        self.global_transform
    }

    /// Set or clear the transform applied after the camera
    pub fn set_global_transform(&mut self, transform: Option<Affine>) {
        self.global_transform = transform;
    }

    // ----- frame -----

    /// Advance camera and object animations to frame time `now`
    pub fn advance_animations(&mut self, now: f64) {
        if let Some(camera) = self.camera.as_mut() {
            camera.advance_animations(now);
        }
        for object in &mut self.objects {
            object.core_mut().advance_animations(now);
        }
    }

    /// Clear the whole scene area, ignoring the current transform
    pub fn clear_scene(&self, surface: &mut dyn DrawingSurface) {
        surface.save();
        surface.set_transform(&Affine::IDENTITY);
        surface.clear_rect(0.0, 0.0, self.scene.width(), self.scene.height());
        surface.restore();
    }

    /// Fill the whole scene area with a color, ignoring the current transform
    pub fn paint_scene(&self, surface: &mut dyn DrawingSurface, color: &str) {
        surface.save();
        surface.set_transform(&Affine::IDENTITY);
        surface.set_fill_style(color);
        surface.fill_rect(0.0, 0.0, self.scene.width(), self.scene.height());
        surface.restore();
    }

    /// Draw and update every object the camera can see
    ///
    /// Fails immediately when no camera is assigned. The surface state is
    /// restored even if an object fails.
    pub fn render_objects_in_camera(
        &mut self,
        surface: &mut dyn DrawingSurface,
        delta_time: f64,
    ) -> Result<RenderMetrics, RenderError> {
        let camera = self.camera.as_ref().ok_or(RenderError::NoCamera)?;
        let started_at = self.clock.now_ms();
        let wheel = self.scene.pointer_mut().take_wheel();

        surface.save();
        surface.translate(camera.x, camera.y);
        surface.scale(camera.scale_x, camera.scale_y);
        if let Some(transform) = &self.global_transform {
            surface.transform(transform);
        }

        let pass = FramePass {
            camera,
            band: ViewBand::from_camera(camera, self.visibility_margin),
            pointer: self.scene.pointer(),
            wheel,
            delta_time,
            timestamp: started_at,
        };
        let mut visible = Vec::with_capacity(self.visible.len());
        let result = pass.run(&mut self.objects, surface, &mut visible);
        surface.restore();

        let ended_at = self.clock.now_ms();
        self.visible = visible;
        self.metrics = RenderMetrics {
            started_at,
            ended_at,
            duration: ended_at - started_at,
            rendered_amount_of_objects: self.visible.len(),
        };
        trace!(
            "Rendered {}/{} objects in {:.3}ms",
            self.metrics.rendered_amount_of_objects,
            self.objects.len(),
            self.metrics.duration
        );

        result.map(|()| self.metrics)
    }
}

struct FramePass<'a> {
    camera: &'a Camera,
    band: ViewBand,
    pointer: &'a PointerState,
    wheel: Option<WheelDelta>,
    delta_time: f64,
    timestamp: f64,
}

impl FramePass<'_> {
    fn run(
        &self,
        objects: &mut [Box<dyn RenderObject>],
        surface: &mut dyn DrawingSurface,
        visible: &mut Vec<ObjectId>,
    ) -> Result<(), RenderError> {
        for index in 0..objects.len() {
            if let Err(err) = self.visit(objects[index].as_mut(), surface, visible) {
                // unvisited objects must not keep last frame's flag
                for object in &mut objects[index + 1..] {
                    object.core_mut().set_visible(false);
                }
                return Err(err);
            }
        }
        Ok(())
    }

    fn visit(
        &self,
        object: &mut dyn RenderObject,
        surface: &mut dyn DrawingSurface,
        visible: &mut Vec<ObjectId>,
    ) -> Result<(), RenderError> {
        let core = object.core();
        let id = core.id();
        let (draw, in_view) = if self.camera.off_screen_rendering {
            (true, !core.force_rendering)
        } else if core.force_rendering {
            (true, false)
        } else if self.band.intersects(&core.bounds.extent(core.position())) {
            (true, true)
        } else {
            (false, false)
        };

        object.core_mut().set_visible(in_view);
        if !draw {
            return Ok(());
        }
        if in_view {
            visible.push(id);
        }

        let wrap = |source| RenderError::Object { id, source };
        object.draw(surface).map_err(wrap)?;
        object.core_mut().advance_sprite(self.delta_time);

        let mut ctx = UpdateContext {
            surface: &mut *surface,
            delta_time: self.delta_time,
            timestamp: self.timestamp,
            camera: Some(self.camera),
            pointer: self.pointer,
            wheel: self.wheel,
        };
        object.update(&mut ctx).map_err(wrap)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::time::ManualClock;
    use crate::render::surface::{DrawCommand, RecordingSurface};
    use crate::scene::Bounds;
    use crate::test_support::Probe;

    fn renderer() -> Renderer {
        let ids = IdAllocator::new();
        let scene = Scene::new(800.0, 600.0);
        let mut renderer = Renderer::new(scene, ids);
        let camera = Camera::for_scene(renderer.scene());
        renderer.set_camera(camera);
        renderer
    }

    fn probe(renderer: &Renderer, x: f64, y: f64) -> Probe {
        Probe::new(renderer.ids(), x, y, Bounds::rect(10.0, 10.0))
    }

    #[test]
    fn test_duplicate_add_leaves_registry_unchanged() {
        let mut renderer = renderer();
        let first = renderer.add_object(probe(&renderer, 0.0, 0.0)).unwrap();

        // an independent allocator hands out the same ids
        let stranger = Probe::new(&IdAllocator::new(), 50.0, 50.0, Bounds::rect(1.0, 1.0));
        assert_eq!(stranger.core().id(), first);
        assert!(matches!(
            renderer.add_object(stranger),
            Err(RenderError::DuplicateObject(dup)) if dup == first
        ));
        assert_eq!(renderer.object_ids(), vec![first]);

        // a destroyed object can come back
        let object = renderer.destroy(first).unwrap();
        renderer.add(object).unwrap();
        assert_eq!(renderer.len(), 1);
    }

    #[test]
    fn test_destroy_preserves_order() {
        let mut renderer = renderer();
        let a = renderer.add_object(probe(&renderer, 0.0, 0.0)).unwrap();
        let b = renderer.add_object(probe(&renderer, 0.0, 0.0)).unwrap();
        let c = renderer.add_object(probe(&renderer, 0.0, 0.0)).unwrap();

        let removed = renderer.destroy(b).unwrap();
        assert_eq!(renderer.object_ids(), vec![a, c]);
        assert_eq!(removed.core().renderer_id(), Some(renderer.id()));
        assert!(renderer.destroy(b).is_none());
        assert_eq!(renderer.object_ids(), vec![a, c]);
    }

    #[test]
    fn test_render_without_camera_fails_every_time() {
        let mut renderer = renderer();
        renderer.take_camera();
        let mut surface = RecordingSurface::new(800.0, 600.0);
        for _ in 0..2 {
            assert!(matches!(
                renderer.render_objects_in_camera(&mut surface, 1.0),
                Err(RenderError::NoCamera)
            ));
        }
        assert!(surface.commands().is_empty());
    }

    #[test]
    fn test_set_camera_is_last_write_wins() {
        let mut renderer = renderer();
        let mut zoomed = Camera::new(800.0, 600.0);
        zoomed.scale(3.0);
        let previous = renderer.set_camera(zoomed);
        assert_eq!(previous.map(|camera| camera.scale_x), Some(1.0));
        assert_eq!(renderer.camera().map(|camera| camera.scale_x), Some(3.0));
    }

    #[test]
    fn test_cascade_adds_children_after_parent() {
        let mut renderer = renderer();
        let parent = probe(&renderer, 0.0, 0.0).spawning(2);
        let parent_id = renderer.add_object(parent).unwrap();

        let ids = renderer.object_ids();
        assert_eq!(ids.len(), 3);
        assert_eq!(ids[0], parent_id);
        let parent = renderer.get(parent_id).unwrap();
        assert_eq!(parent.core().children(), &ids[1..]);
        for child in &ids[1..] {
            assert!(renderer.get(*child).unwrap().core().is_attached());
        }
    }

    #[test]
    fn test_failed_child_add_removes_the_whole_cascade() {
        let mut renderer = renderer();
        let parent = probe(&renderer, 0.0, 0.0).spawning(2);
        let parent_id = parent.core().id();

        // occupy the id the second child is about to receive
        let stranger_ids = IdAllocator::new();
        for _ in 0..=parent_id.raw() {
            stranger_ids.next_object();
        }
        let stranger = Probe::new(&stranger_ids, 500.0, 500.0, Bounds::rect(1.0, 1.0));
        let taken = renderer.add_object(stranger).unwrap();
        assert_eq!(taken.raw(), parent_id.raw() + 2);

        let err = renderer.add_object(parent).unwrap_err();
        assert!(matches!(err, RenderError::DuplicateObject(dup) if dup == taken));
        assert_eq!(renderer.object_ids(), vec![taken]);
        assert!(!renderer.contains(parent_id));
    }

    #[test]
    fn test_get_as_downcasts() {
        let mut renderer = renderer();
        let id = renderer.add_object(probe(&renderer, 0.0, 0.0)).unwrap();
        renderer.get_as_mut::<Probe>(id).unwrap().fail_draw = true;
        assert!(renderer.get_as::<Probe>(id).unwrap().fail_draw);
    }

    #[test]
    fn test_objects_at_returns_topmost_first() {
        let mut renderer = renderer();
        let below = renderer.add_object(probe(&renderer, 0.0, 0.0)).unwrap();
        let above = renderer.add_object(probe(&renderer, 5.0, 5.0)).unwrap();
        assert_eq!(renderer.objects_at(Vec2::new(7.0, 7.0)), vec![above, below]);
        assert_eq!(renderer.objects_at(Vec2::new(1.0, 1.0)), vec![below]);
        assert!(renderer.objects_at(Vec2::new(100.0, 100.0)).is_empty());
    }

    #[test]
    fn test_metrics_come_from_clock() {
        let clock = ManualClock::new(500.0);
        let mut renderer = renderer().with_clock(clock.clone());
        renderer.add_object(probe(&renderer, 10.0, 10.0)).unwrap();

        let mut surface = RecordingSurface::new(800.0, 600.0);
        let metrics = renderer.render_objects_in_camera(&mut surface, 1.0).unwrap();
        assert_eq!(metrics.started_at, 500.0);
        assert_eq!(metrics.duration, 0.0);
        assert_eq!(metrics.rendered_amount_of_objects, 1);
        assert_eq!(renderer.last_metrics(), metrics);
    }

    #[test]
    fn test_failing_object_still_restores_surface() {
        let mut renderer = renderer();
        let mut broken = probe(&renderer, 10.0, 10.0);
        broken.fail_draw = true;
        let id = renderer.add_object(broken).unwrap();

        let mut surface = RecordingSurface::new(800.0, 600.0);
        let err = renderer.render_objects_in_camera(&mut surface, 1.0).unwrap_err();
        assert!(matches!(err, RenderError::Object { id: failed, .. } if failed == id));
        assert_eq!(surface.save_depth(), 0);
        assert_eq!(surface.commands().last(), Some(&DrawCommand::Restore));
    }

    #[test]
    fn test_clear_and_paint_cover_scene_in_screen_space() {
        let renderer = renderer();
        let mut surface = RecordingSurface::new(800.0, 600.0);
        surface.translate(50.0, 50.0);
        renderer.clear_scene(&mut surface);
        renderer.paint_scene(&mut surface, "#202020");

        let commands = surface.take_commands();
        assert!(commands.contains(&DrawCommand::ClearRect { x: 0.0, y: 0.0, width: 800.0, height: 600.0 }));
        assert!(commands.contains(&DrawCommand::FillStyle("#202020".to_string())));
        assert!(commands.contains(&DrawCommand::FillRect { x: 0.0, y: 0.0, width: 800.0, height: 600.0 }));
        assert_eq!(surface.current_transform(), Affine::translation(50.0, 50.0));
    }

    #[test]
    fn test_focus_camera_needs_registered_object() {
        let mut renderer = renderer();
        let stray = probe(&renderer, 0.0, 0.0);
        let stray_id = stray.core().id();
        assert!(matches!(
            renderer.focus_camera(stray_id, None, Vec2::zeros(), None),
            Err(RenderError::UnknownObject(_))
        ));

        let id = renderer.add_object(probe(&renderer, 95.0, 95.0)).unwrap();
        renderer.focus_camera(id, None, Vec2::zeros(), None).unwrap();
        let camera = renderer.camera().unwrap();
        assert_eq!((camera.x, camera.y), (300.0, 200.0));
    }
}

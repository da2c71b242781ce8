//! Transient editor state: selection, drag gestures and the view transform
//!
//! Only the display preferences are persisted. A [`DragSession`] only touches the yard when it
//! finishes; until then it tracks a preview position and whether that
//! position would be accepted.

use log::debug;

use crate::config::EditorConfig;
use crate::error::EditorError;
use crate::geometry::{clamp_to_yard, Footprint, Point};
use crate::model::{Container, Yard};
use crate::persist::Preferences;
use crate::placement::{PlacementError, PlacementOptions, PlacementResolver};
use crate::store::{Movement, YardBook};

/// Screen pixels per grid cell below which the view will not fit a yard
pub const MIN_PIXELS_PER_CELL: f64 = 8.0;

/// Margin kept around a fitted yard, in pixels
const FIT_PADDING: f64 = 32.0;

/// Smallest viewport edge assumed when fitting, in pixels
const MIN_FIT_EXTENT: f64 = 200.0;

/// Wheel delta to zoom exponent
const WHEEL_ZOOM_RATE: f64 = 0.002;

/// An in-progress drag of one container
#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    pub layer_id: String,
    pub container_id: String,
    grab_offset: Point,
    footprint: Footprint,
    preview: Point,
    last_valid: Point,
    valid: bool,
}

impl DragSession {
    /// Start dragging `container_id` from yard-space point `pointer`
    pub fn begin(yard: &Yard, container_id: &str, pointer: Point) -> Result<Self, EditorError> {
        let location = yard
            .locate(container_id)
            .ok_or_else(|| EditorError::not_found("container", container_id))?;
        let layer = &yard.layers[location.layer];
        let container: &Container = &layer.containers[location.index];
        let origin = container.position();
        Ok(Self {
            layer_id: layer.id.clone(),
            container_id: container.id.clone(),
            grab_offset: Point::new(pointer.x - origin.x, pointer.y - origin.y),
            footprint: container.footprint(yard.unit),
            preview: origin,
            last_valid: origin,
            valid: true,
        })
    }

    /// Track the pointer. Returns the preview position, which is snapped and
    /// clamped but may collide; see [`DragSession::is_valid`].
    pub fn update(&mut self, yard: &Yard, pointer: Point, options: PlacementOptions) -> Point {
        let Some(layer) = yard.layer(&self.layer_id) else {
            self.valid = false;
            return self.preview;
        };
        let resolver = PlacementResolver::new(yard, layer, options);
        let raw = pointer.offset(-self.grab_offset.x, -self.grab_offset.y);
        let candidate = clamp_to_yard(yard, resolver.snap(raw), self.footprint);
        self.preview = candidate;
        self.valid = resolver.is_free(self.footprint, candidate, Some(&self.container_id));
        if self.valid {
            self.last_valid = candidate;
        }
        candidate
    }

    /// Whether the most recent preview position is free
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn preview(&self) -> Point {
        self.preview
    }

    pub fn last_valid(&self) -> Point {
        self.last_valid
    }

    /// Release the pointer. A valid drag commits its last valid position; an
    /// invalid one is discarded and the container stays where it was.
    pub fn finish(self, yard: &mut Yard) -> Result<Point, EditorError> {
        if !self.valid {
            debug!("drag of '{}' released over a blocked spot", self.container_id);
            return Err(PlacementError::Blocked.into());
        }
        yard.move_container(
            &self.layer_id,
            &self.container_id,
            Movement::To(self.last_valid),
            PlacementOptions::default().with_snap(false),
        )
    }
}

/// Size of the drawing area in screen pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Zoom and pan of the yard view.
///
/// Screen position = pan + yard position × base scale × zoom. The base scale
/// fits the yard into the viewport; zoom is the user's multiplier on top.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewTransform {
    pub base_scale: f64,
    pub zoom: f64,
    pub pan_x: f64,
    pub pan_y: f64,
    /// Set once the user pans or zooms; fitting then keeps their framing
    pub user_adjusted: bool,
    zoom_min: f64,
    zoom_max: f64,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self::from_config(&EditorConfig::default())
    }
}

impl ViewTransform {
    pub fn from_config(config: &EditorConfig) -> Self {
        Self {
            base_scale: 1.0,
            zoom: 1.0,
            pan_x: 0.0,
            pan_y: 0.0,
            user_adjusted: false,
            zoom_min: config.zoom_min,
            zoom_max: config.zoom_max,
        }
    }

    /// Pixels per yard unit
    pub fn scale(&self) -> f64 {
        self.base_scale * self.zoom
    }

    /// Back to zoom 1 with no pan
    pub fn reset(&mut self) {
        self.zoom = 1.0;
        self.pan_x = 0.0;
        self.pan_y = 0.0;
        self.user_adjusted = false;
    }

    fn clamp_zoom(&self, zoom: f64) -> f64 {
        zoom.clamp(self.zoom_min, self.zoom_max)
    }

    /// Set the zoom factor, clamped to the configured limits
    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = self.clamp_zoom(zoom);
    }

    /// Recompute the base scale for `yard` in `viewport`.
    ///
    /// The yard never drops below [`MIN_PIXELS_PER_CELL`]. An untouched view
    /// is centred; a user-framed view has its pan rescaled instead.
    pub fn fit(&mut self, yard: &Yard, viewport: Viewport) {
        let available_w = (viewport.width - FIT_PADDING).max(MIN_FIT_EXTENT);
        let available_h = (viewport.height - FIT_PADDING).max(MIN_FIT_EXTENT);
        let candidate = (available_w / yard.width).min(available_h / yard.height);
        let min_scale = MIN_PIXELS_PER_CELL / yard.unit.grid_cell();
        let previous = if self.base_scale > 0.0 {
            self.base_scale
        } else {
            1.0
        };
        self.base_scale = candidate.max(min_scale);

        if self.user_adjusted {
            let ratio = self.base_scale / previous;
            self.pan_x *= ratio;
            self.pan_y *= ratio;
        } else {
            self.pan_x = (viewport.width - yard.width * self.base_scale) / 2.0;
            self.pan_y = (viewport.height - yard.height * self.base_scale) / 2.0;
        }
        self.zoom = self.clamp_zoom(self.zoom);
    }

    /// Zoom by a wheel event, keeping the yard point under `pointer` fixed
    pub fn wheel(&mut self, pointer: Point, delta_y: f64) {
        let before = self.scale();
        if before <= 0.0 {
            return;
        }
        let anchor = self.screen_to_yard(pointer);
        self.zoom = self.clamp_zoom(self.zoom * (-delta_y * WHEEL_ZOOM_RATE).exp());
        let after = self.scale();
        self.pan_x = pointer.x - anchor.x * after;
        self.pan_y = pointer.y - anchor.y * after;
        self.user_adjusted = true;
    }

    /// Pan by a screen-space drag delta
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.pan_x += dx;
        self.pan_y += dy;
        self.user_adjusted = true;
    }

    /// Convert a screen point to yard units
    pub fn screen_to_yard(&self, screen: Point) -> Point {
        let scale = self.scale();
        Point::new((screen.x - self.pan_x) / scale, (screen.y - self.pan_y) / scale)
    }

    /// Convert a yard point to screen pixels
    pub fn yard_to_screen(&self, point: Point) -> Point {
        let scale = self.scale();
        Point::new(point.x * scale + self.pan_x, point.y * scale + self.pan_y)
    }
}

/// Explicit editor context threaded through operations
#[derive(Debug, Clone)]
pub struct EditorState {
    pub book: YardBook,
    pub config: EditorConfig,
    pub selected_container_id: Option<String>,
    pub snap_enabled: bool,
    pub view: ViewTransform,
    pub preferences: Preferences,
}

impl EditorState {
    pub fn new(book: YardBook, config: EditorConfig) -> Self {
        Self {
            book,
            snap_enabled: config.snap_enabled,
            view: ViewTransform::from_config(&config),
            config,
            selected_container_id: None,
            preferences: Preferences::default(),
        }
    }

    /// Placement knobs for the current snap toggle
    pub fn placement_options(&self) -> PlacementOptions {
        self.config.placement_options().with_snap(self.snap_enabled)
    }

    pub fn toggle_snap(&mut self) -> bool {
        self.snap_enabled = !self.snap_enabled;
        self.snap_enabled
    }

    /// Switch yards; the selection and framing belong to the old yard
    pub fn open_yard(&mut self, yard_id: &str) -> Result<(), EditorError> {
        self.book.set_active_yard(yard_id)?;
        self.selected_container_id = None;
        self.view.reset();
        Ok(())
    }

    /// Select a container on the active layer of the active yard
    pub fn select(&mut self, container_id: &str) -> Result<(), EditorError> {
        let on_active_layer = self
            .book
            .active_yard()
            .and_then(Yard::active_layer)
            .is_some_and(|layer| layer.container(container_id).is_some());
        if !on_active_layer {
            return Err(EditorError::not_found("container", container_id));
        }
        self.selected_container_id = Some(container_id.to_string());
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        self.selected_container_id = None;
    }

    /// The selected container, if it still exists
    pub fn selected_container(&self) -> Option<&Container> {
        let id = self.selected_container_id.as_deref()?;
        self.book.active_yard()?.container(id)
    }
}

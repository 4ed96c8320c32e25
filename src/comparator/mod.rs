//! Before/after split view.
//!
//! The original image fills the widget; the enhanced image is drawn on top,
//! clipped to the area left of a draggable vertical divider. A drag starts
//! on the divider handle and is then tracked through window-wide pointer
//! events, so it keeps working (clamped to the widget) when the pointer
//! leaves the widget and ends wherever the button is released.

pub mod geometry;
pub mod pointer;
pub mod slider;

use crate::encoded::EncodedImage;
use eframe::egui::{
    self, load::TexturePoll, pos2, vec2, Color32, CursorIcon, LayerId, Pos2, Rect, Sense, Shape,
    Stroke,
};
use pointer::{PointerEvent, PointerHub, Subscription};
use slider::{DragPhase, SliderState};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_MOUNT: AtomicU64 = AtomicU64::new(0);

const DIVIDER_WIDTH: f32 = 4.0;
const HANDLE_RADIUS: f32 = 18.0;

struct Layer {
    uri: String,
    bytes: Option<egui::load::Bytes>,
}

impl Layer {
    fn new(mount: u64, label: &str, image: &EncodedImage) -> Self {
        let uri = format!("bytes://comparator/{mount}/{label}.{}", image.file_extension());
        let bytes = match image.decode() {
            Ok(bytes) => Some(egui::load::Bytes::from(bytes)),
            Err(e) => {
                tracing::warn!("{label} image cannot be displayed: {e}");
                None
            }
        };
        Self { uri, bytes }
    }

    fn poll(&self, ctx: &egui::Context, size: egui::Vec2) -> Option<TexturePoll> {
        let bytes = self.bytes.clone()?;
        egui::Image::from_bytes(self.uri.clone(), bytes)
            .load_for_size(ctx, size)
            .ok()
    }
}

/// Drag state shared between the widget and its global listener.
struct Grip {
    ctx: egui::Context,
    state: RefCell<SliderState>,
    /// Bounding box and layer from the most recent frame.
    bounds: Cell<Rect>,
    layer: Cell<Option<LayerId>>,
}

impl Grip {
    fn handle_rect(&self) -> Rect {
        geometry::handle_hit_rect(self.bounds.get(), self.state.borrow().position())
    }

    /// A press grabs the handle only where nothing is drawn above the widget.
    fn grabs(&self, pos: Pos2) -> bool {
        let Some(layer) = self.layer.get() else {
            return false;
        };
        if !self.handle_rect().contains(pos) {
            return false;
        }
        self.ctx.layer_id_at(pos).map_or(true, |top| top == layer)
    }

    fn handle(&self, event: &PointerEvent) {
        match *event {
            PointerEvent::Pressed { pos } => {
                if self.grabs(pos) {
                    self.state.borrow_mut().press();
                }
            }
            PointerEvent::TouchStarted { pos } => {
                if self.grabs(pos) {
                    self.state.borrow_mut().touch_start(pos.x, self.bounds.get());
                }
            }
            _ => self.state.borrow_mut().handle(event, self.bounds.get()),
        }
    }
}

/// A mounted comparison of one `(original, enhanced)` pair.
///
/// Create a fresh instance for every new pair. The global pointer listener
/// lives exactly as long as the instance.
pub struct Comparator {
    id: egui::Id,
    original: Layer,
    enhanced: Layer,
    grip: Rc<Grip>,
    _subscription: Subscription,
}

impl Comparator {
    pub fn mount(
        ctx: &egui::Context,
        hub: &PointerHub,
        original: &EncodedImage,
        enhanced: &EncodedImage,
    ) -> Self {
        let mount = NEXT_MOUNT.fetch_add(1, Ordering::Relaxed);
        let grip = Rc::new(Grip {
            ctx: ctx.clone(),
            state: RefCell::new(SliderState::default()),
            bounds: Cell::new(Rect::NOTHING),
            layer: Cell::new(None),
        });
        let subscription = {
            let grip = grip.clone();
            hub.subscribe(move |event| grip.handle(event))
        };
        Self {
            id: egui::Id::new(("comparator", mount)),
            original: Layer::new(mount, "original", original),
            enhanced: Layer::new(mount, "enhanced", enhanced),
            grip,
            _subscription: subscription,
        }
    }

    pub fn position(&self) -> f32 {
        self.grip.state.borrow().position()
    }

    pub fn set_position(&self, percent: f32) {
        self.grip.state.borrow_mut().set_position(percent);
    }

    pub fn phase(&self) -> DragPhase {
        self.grip.state.borrow().phase()
    }

    /// Bounding box from the most recent frame.
    pub fn bounds(&self) -> Rect {
        self.grip.bounds.get()
    }

    pub fn handle_rect(&self) -> Rect {
        self.grip.handle_rect()
    }

    /// Lay out and paint the widget. Presses, moves and releases arrive
    /// through the pointer hub, hit-tested against the last painted frame.
    pub fn show(&mut self, ui: &mut egui::Ui) -> egui::Response {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::hover());
        self.grip.bounds.set(rect);
        self.grip.layer.set(Some(ui.layer_id()));

        let handle = ui.interact(self.handle_rect(), self.id.with("handle"), Sense::drag());
        if handle.hovered() || self.phase() == DragPhase::Dragging {
            ui.ctx().set_cursor_icon(CursorIcon::ResizeHorizontal);
        }

        self.paint(ui, rect);
        response
    }

    fn paint(&self, ui: &egui::Ui, rect: Rect) {
        let painter = ui.painter_at(rect);
        let position = self.position();

        self.paint_layer(ui, &painter, &self.original, rect);
        let clip = geometry::clip_rect(rect, position).intersect(painter.clip_rect());
        self.paint_layer(ui, &painter.with_clip_rect(clip), &self.enhanced, rect);

        let x = geometry::divider_x(rect, position);
        painter.rect_filled(
            Rect::from_center_size(pos2(x, rect.center().y), vec2(DIVIDER_WIDTH, rect.height())),
            0.0,
            Color32::from_white_alpha(128),
        );
        let center = pos2(x, rect.center().y);
        painter.circle(
            center,
            HANDLE_RADIUS,
            Color32::WHITE,
            Stroke::new(2.0, Color32::from_gray(40)),
        );
        let arrow = Color32::from_gray(40);
        for dir in [-1.0, 1.0] {
            let tip = center + vec2(dir * 10.0, 0.0);
            let base = center + vec2(dir * 3.0, 0.0);
            painter.add(Shape::convex_polygon(
                vec![tip, base + vec2(0.0, -5.0), base + vec2(0.0, 5.0)],
                arrow,
                Stroke::NONE,
            ));
        }
    }

    fn paint_layer(&self, ui: &egui::Ui, painter: &egui::Painter, layer: &Layer, rect: Rect) {
        match layer.poll(ui.ctx(), rect.size()) {
            Some(TexturePoll::Ready { texture }) => {
                let target = geometry::contain_rect(rect, texture.size);
                painter.image(
                    texture.id,
                    target,
                    Rect::from_min_max(pos2(0.0, 0.0), pos2(1.0, 1.0)),
                    Color32::WHITE,
                );
            }
            Some(TexturePoll::Pending { .. }) => {
                ui.ctx().request_repaint();
            }
            None => {
                painter.text(
                    rect.center(),
                    egui::Align2::CENTER_CENTER,
                    "Image could not be displayed",
                    egui::FontId::proportional(14.0),
                    ui.visuals().error_fg_color,
                );
            }
        }
    }
}

impl Drop for Comparator {
    fn drop(&mut self) {
        self.grip.ctx.forget_image(&self.original.uri);
        self.grip.ctx.forget_image(&self.enhanced.uri);
    }
}

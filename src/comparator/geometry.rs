use eframe::egui::{pos2, vec2, Pos2, Rect, Vec2};

/// Width of the area around the divider that accepts a press.
pub const HANDLE_GRAB_WIDTH: f32 = 16.0;

/// Slider position, in percent, for a horizontal pointer coordinate.
///
/// The offset is clamped to `[0, width]` first so positions outside the
/// widget pin to the nearest edge. Returns `None` for degenerate bounds.
pub fn position_from_x(x: f32, bounds: Rect) -> Option<f32> {
    let width = bounds.width();
    if !(width > 0.0) || !width.is_finite() {
        return None;
    }
    let offset = (x - bounds.left()).clamp(0.0, width);
    Some(offset / width * 100.0)
}

/// Horizontal screen coordinate of the divider.
pub fn divider_x(bounds: Rect, position: f32) -> f32 {
    bounds.left() + bounds.width() * position / 100.0
}

/// Region showing the enhanced layer: from the left edge to the divider,
/// full height, as a clockwise quad starting top-left.
pub fn clip_polygon(bounds: Rect, position: f32) -> [Pos2; 4] {
    let x = divider_x(bounds, position);
    [
        pos2(bounds.left(), bounds.top()),
        pos2(x, bounds.top()),
        pos2(x, bounds.bottom()),
        pos2(bounds.left(), bounds.bottom()),
    ]
}

pub fn clip_rect(bounds: Rect, position: f32) -> Rect {
    Rect::from_points(&clip_polygon(bounds, position))
}

/// Largest rect with the image's aspect ratio that fits inside `bounds`,
/// centred.
pub fn contain_rect(bounds: Rect, image_size: Vec2) -> Rect {
    if image_size.x <= 0.0 || image_size.y <= 0.0 {
        return bounds;
    }
    let scale = (bounds.width() / image_size.x).min(bounds.height() / image_size.y);
    Rect::from_center_size(bounds.center(), image_size * scale)
}

/// The part of the divider that reacts to presses.
pub fn handle_hit_rect(bounds: Rect, position: f32) -> Rect {
    Rect::from_center_size(
        pos2(divider_x(bounds, position), bounds.center().y),
        vec2(HANDLE_GRAB_WIDTH, bounds.height()),
    )
}

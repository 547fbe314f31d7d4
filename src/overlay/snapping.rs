use super::geometry::{Point, Size};

/// Where a dragged center ends up after snapping, and which axes snapped
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Snapped {
    pub position: Point,
    /// x coordinate of the vertical guide, when the x axis snapped
    pub vertical_guide: Option<f32>,
    /// y coordinate of the horizontal guide, when the y axis snapped
    pub horizontal_guide: Option<f32>,
}

/// Snap each axis of `center` independently to the surface midpoint.
/// A threshold of 0 disables snapping.
pub fn snap_to_center(center: Point, surface: Size, threshold: f32) -> Snapped {
    let mid = surface.center();
    let x = check_snap(center.x, mid.x, threshold);
    let y = check_snap(center.y, mid.y, threshold);

    Snapped {
        position: Point::new(x.unwrap_or(center.x), y.unwrap_or(center.y)),
        vertical_guide: x,
        horizontal_guide: y,
    }
}

fn check_snap(value: f32, target: f32, threshold: f32) -> Option<f32> {
    if threshold > 0.0 && (value - target).abs() <= threshold {
        Some(target)
    } else {
        None
    }
}

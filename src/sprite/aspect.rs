use crate::camera::Viewport;

/// Neither axis of a fitted sprite may exceed one world unit.
const MAX_AXIS_SCALE: f32 = 1.0;

/// Fit a `width` x `height` pixel rectangle into the viewport, preserving its
/// aspect ratio.
///
/// The binding axis follows the letterbox/pillarbox rule: when the viewport
/// is wider (in aspect) than the rectangle, pixel dimensions are normalized
/// by width, otherwise by height. The normalized dimensions times `factor`
/// give the candidate scales; if either exceeds the one-world-unit cap, both
/// shrink proportionally so the larger lands exactly on the cap. Components
/// are always in (0, 1] for positive inputs, with the third axis fixed at 1.
pub fn calculate_aspect_ratio(
    width: f32,
    height: f32,
    factor: f32,
    viewport: &Viewport,
) -> [f32; 3] {
    if !(width > 0.0 && height > 0.0) {
        return [1.0, 1.0, 1.0];
    }

    let per_pixel = if viewport.aspect() > width / height {
        viewport.world_width / width
    } else {
        viewport.world_height / height
    };

    let scale_x = width * per_pixel * factor;
    let scale_y = height * per_pixel * factor;

    let largest = scale_x.max(scale_y);
    if largest > MAX_AXIS_SCALE {
        [
            scale_x / largest * MAX_AXIS_SCALE,
            scale_y / largest * MAX_AXIS_SCALE,
            1.0,
        ]
    } else {
        [
            scale_x.min(MAX_AXIS_SCALE),
            scale_y.min(MAX_AXIS_SCALE),
            1.0,
        ]
    }
}

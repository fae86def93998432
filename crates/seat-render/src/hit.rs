//! Hit testing: point → canvas object lookup.
//!
//! Seats paint above furniture, and later objects above earlier ones, so
//! the walk goes seats first, each list back to front. Seats bound past
//! the roster are never drawn and never hit.

use kurbo::{Affine, Ellipse, Point, Rect, RoundedRect, Shape};
use seat_core::id::ObjectId;
use seat_core::layout::Viewport;
use seat_core::model::{CustomObject, ShapeTag};

/// Corner radius of `rounded` furniture, in pixels.
pub const ROUNDED_RADIUS: f64 = 8.0;

/// Find the topmost object under the pixel position (px, py).
///
/// `viewport` is the size of the canvas box the position is relative to;
/// `zoom` scales the objects' pixel footprints. Returns `None` when the
/// position is on empty canvas.
pub fn hit_test(
    objects: &[CustomObject],
    roster_len: usize,
    viewport: Viewport,
    zoom: f32,
    px: f32,
    py: f32,
) -> Option<ObjectId> {
    let point = Point::new(px as f64, py as f64);
    let (seats, furniture): (Vec<&CustomObject>, Vec<&CustomObject>) = objects
        .iter()
        .filter(|o| o.kind.participant_index().is_none_or(|slot| slot < roster_len))
        .partition(|o| o.kind.participant_index().is_some());

    seats
        .iter()
        .rev()
        .chain(furniture.iter().rev())
        .find(|o| contains(o, viewport, zoom, point))
        .map(|o| o.id)
}

/// Whether `point` lies inside the drawn shape of `object`.
pub fn contains(object: &CustomObject, viewport: Viewport, zoom: f32, point: Point) -> bool {
    let (cx, cy) = viewport.to_pixels(object.x, object.y);
    let center = Point::new(cx as f64, cy as f64);
    let (w, h) = object.kind.size();
    let size = (w as f64 * zoom as f64, h as f64 * zoom as f64);

    let (shape, rotation) = object
        .kind
        .footprint()
        .map(|f| (f.shape, f.rotation))
        .unwrap_or((ShapeTag::Circle, 0.0));

    // Bring the point into the object's unrotated frame.
    let local = Affine::rotate_about(-(rotation as f64).to_radians(), center) * point;
    let rect = Rect::from_center_size(center, size);
    match shape {
        ShapeTag::Circle => Ellipse::from_rect(rect).contains(local),
        ShapeTag::Square => rect.contains(local),
        ShapeTag::Rounded => {
            RoundedRect::from_rect(rect, ROUNDED_RADIUS * zoom as f64).contains(local)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use seat_core::model::{ObjectKind, ObjectType};

    const VP: Viewport = Viewport {
        width: 1000.0,
        height: 500.0,
    };

    fn furniture(ty: ObjectType, x: f32, y: f32) -> CustomObject {
        CustomObject::new(ObjectKind::furniture(ty).unwrap(), x, y)
    }

    #[test]
    fn hit_on_center_and_miss_on_empty_canvas() {
        let table = furniture(ObjectType::TableRound, 50.0, 50.0);
        let objects = vec![table.clone()];
        // Center is (500, 250), radius 40.
        assert_eq!(hit_test(&objects, 7, VP, 1.0, 500.0, 250.0), Some(table.id));
        assert_eq!(hit_test(&objects, 7, VP, 1.0, 535.0, 250.0), Some(table.id));
        assert_eq!(hit_test(&objects, 7, VP, 1.0, 545.0, 250.0), None);
        assert_eq!(hit_test(&objects, 7, VP, 1.0, 10.0, 10.0), None);
    }

    #[test]
    fn zoom_scales_footprint() {
        let table = furniture(ObjectType::TableRound, 50.0, 50.0);
        let objects = vec![table.clone()];
        assert_eq!(hit_test(&objects, 7, VP, 2.0, 570.0, 250.0), Some(table.id));
        assert_eq!(hit_test(&objects, 7, VP, 0.5, 530.0, 250.0), None);
    }

    #[test]
    fn seat_wins_over_furniture_below_it() {
        let table = furniture(ObjectType::TableRect, 50.0, 50.0);
        let seat = CustomObject::new(ObjectKind::seat(0), 50.0, 50.0);
        // Furniture listed last would be topmost if order alone decided.
        let objects = vec![seat.clone(), table];
        assert_eq!(hit_test(&objects, 7, VP, 1.0, 500.0, 250.0), Some(seat.id));
    }

    #[test]
    fn unseated_slot_does_not_cover_furniture() {
        let table = furniture(ObjectType::TableRound, 50.0, 50.0);
        let ghost = CustomObject::new(ObjectKind::seat(20), 50.0, 50.0);
        let objects = vec![table.clone(), ghost.clone()];
        assert_eq!(hit_test(&objects, 7, VP, 1.0, 500.0, 250.0), Some(table.id));
        assert_eq!(hit_test(&objects, 21, VP, 1.0, 500.0, 250.0), Some(ghost.id));
    }

    #[test]
    fn later_furniture_is_on_top() {
        let a = furniture(ObjectType::Stage, 50.0, 50.0);
        let b = furniture(ObjectType::Plant, 50.0, 50.0);
        let objects = vec![a, b.clone()];
        assert_eq!(hit_test(&objects, 7, VP, 1.0, 500.0, 250.0), Some(b.id));
    }

    #[test]
    fn rotation_turns_the_hit_area() {
        let mut stage = furniture(ObjectType::Stage, 50.0, 50.0);
        // 200 x 80: a point 90px right of center is inside unrotated.
        assert!(contains(&stage, VP, 1.0, Point::new(590.0, 250.0)));
        if let ObjectKind::Stage(fp) = &mut stage.kind {
            fp.rotation = 90.0;
        }
        assert!(!contains(&stage, VP, 1.0, Point::new(590.0, 250.0)));
        assert!(contains(&stage, VP, 1.0, Point::new(500.0, 340.0)));
    }
}

//! Pointer interaction sessions.
//!
//! A drag (or a held rotate key) is an explicit value instead of a set of
//! loose flags: it begins on press, is sampled on every move and ends on
//! release. The geometric part of each step lives in free functions so it
//! can be tested without an editor.

use crate::model::{FeatureId, Point, normalize_angle, snap_angle};

/// The interaction in progress, if any.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Interaction {
    #[default]
    None,
    /// Dragging empty background. `last` is the previous screen sample.
    Panning { last: Point },
    /// Moving a single vertex of a committed feature.
    DraggingVertex { feature: FeatureId, index: usize },
    /// Moving a whole feature. Positions are recomputed from the snapshot
    /// taken at press time so no error accumulates.
    DraggingShape {
        feature: FeatureId,
        origin_points: Vec<Point>,
        start_doc: Point,
    },
    /// Rotate key held. `ref_angle` is unset until the first pointer sample.
    Rotating {
        feature: FeatureId,
        ref_angle: Option<f64>,
    },
}

impl Interaction {
    pub fn is_idle(&self) -> bool {
        matches!(self, Interaction::None)
    }

    pub fn is_rotating(&self) -> bool {
        matches!(self, Interaction::Rotating { .. })
    }

    /// Feature the session operates on.
    pub fn feature(&self) -> Option<FeatureId> {
        match self {
            Interaction::None | Interaction::Panning { .. } => None,
            Interaction::DraggingVertex { feature, .. }
            | Interaction::DraggingShape { feature, .. }
            | Interaction::Rotating { feature, .. } => Some(*feature),
        }
    }

    /// Whether a pointer release ends this session. Rotation lasts as long
    /// as the key is held.
    pub fn ends_on_release(&self) -> bool {
        matches!(
            self,
            Interaction::Panning { .. }
                | Interaction::DraggingVertex { .. }
                | Interaction::DraggingShape { .. }
        )
    }
}

/// Whole-shape drag: every point becomes `origin + (now - start)`.
pub fn drag_shape_points(origin: &[Point], start: Point, now: Point) -> Vec<Point> {
    let dx = now.x - start.x;
    let dy = now.y - start.y;
    origin.iter().map(|p| p.offset(dx, dy)).collect()
}

/// Outcome of one rotation sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationStep {
    /// Angle to rotate by, `None` for the first (reference-only) sample.
    pub delta: Option<f64>,
    /// Reference angle for the next sample: always the raw pointer angle.
    pub next_ref: f64,
}

/// Compute one rotation step around `pivot` for a pointer sample at `pointer`.
///
/// With `snap_step` set the delta is rounded to the nearest multiple of it.
pub fn rotation_step(
    pivot: Point,
    ref_angle: Option<f64>,
    pointer: Point,
    snap_step: Option<f64>,
) -> RotationStep {
    let angle = pointer.angle_from(&pivot);
    let delta = ref_angle.map(|reference| {
        let raw = normalize_angle(angle - reference);
        match snap_step {
            Some(step) => snap_angle(raw, step),
            None => raw,
        }
    });
    RotationStep {
        delta,
        next_ref: angle,
    }
}

/// Rotate every point about `pivot`.
pub fn rotate_points(points: &mut [Point], pivot: Point, angle: f64) {
    for p in points.iter_mut() {
        *p = p.rotated_about(&pivot, angle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_drag_shape_points_translates() {
        let origin = [Point::new(0.0, 0.0), Point::new(4.0, 0.0), Point::new(0.0, 3.0)];
        let moved = drag_shape_points(&origin, Point::new(1.0, 1.0), Point::new(6.0, -1.0));
        assert_eq!(
            moved,
            vec![Point::new(5.0, -2.0), Point::new(9.0, -2.0), Point::new(5.0, 1.0)]
        );
    }

    #[test]
    fn test_first_rotation_sample_sets_reference_only() {
        let step = rotation_step(Point::new(0.0, 0.0), None, Point::new(10.0, 0.0), None);
        assert_eq!(step.delta, None);
        assert!(step.next_ref.abs() < EPS);
    }

    #[test]
    fn test_rotation_delta_and_reference_update() {
        let step = rotation_step(Point::new(0.0, 0.0), Some(0.0), Point::new(0.0, 10.0), None);
        assert!((step.delta.unwrap() - FRAC_PI_2).abs() < EPS);
        assert!((step.next_ref - FRAC_PI_2).abs() < EPS);
    }

    #[test]
    fn test_snapped_delta_keeps_raw_reference() {
        let step15 = 15f64.to_radians();
        let pointer = Point::new(20f64.to_radians().cos(), 20f64.to_radians().sin());
        let step = rotation_step(Point::new(0.0, 0.0), Some(0.0), pointer, Some(step15));
        assert!((step.delta.unwrap() - step15).abs() < EPS);
        assert!((step.next_ref - 20f64.to_radians()).abs() < EPS);
    }

    #[test]
    fn test_delta_wraps_across_pi() {
        // From just below +PI to just above -PI is a small positive turn
        let reference = 179f64.to_radians();
        let pointer = Point::new((-179f64).to_radians().cos(), (-179f64).to_radians().sin());
        let step = rotation_step(Point::new(0.0, 0.0), Some(reference), pointer, None);
        assert!((step.delta.unwrap() - 2f64.to_radians()).abs() < 1e-6);
    }

    #[test]
    fn test_session_release_semantics() {
        assert!(!Interaction::None.ends_on_release());
        assert!(Interaction::Panning { last: Point::default() }.ends_on_release());
        let rotating = Interaction::Rotating {
            feature: 1,
            ref_angle: None,
        };
        assert!(!rotating.ends_on_release());
        assert!(rotating.is_rotating());
        assert_eq!(rotating.feature(), Some(1));
    }
}

use approx::assert_relative_eq;
use kine::nalgebra::{Rotation3, Vector3, point, vector};
use kine::{Error, FrameId, FrameRegistry, SpatialForce, SpatialMotion, Transform};
use proptest::prelude::*;

fn vector3() -> impl Strategy<Value = Vector3<f64>> {
    (-5.0f64..5.0, -5.0f64..5.0, -5.0f64..5.0).prop_map(|(x, y, z)| vector![x, y, z])
}

fn rotation() -> impl Strategy<Value = Rotation3<f64>> {
    vector3().prop_map(|v| Rotation3::new(v * 0.5))
}

fn transform(source: FrameId, target: FrameId) -> impl Strategy<Value = Transform<f64>> {
    (rotation(), vector3()).prop_map(move |(r, p)| Transform::new(source, target, r, p))
}

fn chain() -> impl Strategy<Value = ([FrameId; 4], [Transform<f64>; 3])> {
    let mut frames = FrameRegistry::new();
    let ids = ["a", "b", "c", "d"].map(|label| frames.create(label));
    let [a, b, c, d] = ids;
    (transform(a, b), transform(b, c), transform(c, d)).prop_map(move |(t1, t2, t3)| (ids, [t1, t2, t3]))
}

proptest! {
    #[test]
    fn composition_is_associative((_, [t1, t2, t3]) in chain()) {
        let left = t3.compose(&t2).unwrap().compose(&t1).unwrap();
        let right = t3.compose(&t2.compose(&t1).unwrap()).unwrap();
        prop_assert_eq!((left.source(), left.target()), (right.source(), right.target()));
        prop_assert!(left.rel_equal(&right, 1e-9));
    }

    #[test]
    fn mismatched_composition_always_fails((ids, [t1, t2, t3]) in chain()) {
        let ts = [t1, t2, t3];
        for outer in &ts {
            for inner in &ts {
                let result = outer.compose(inner);
                if inner.target() == outer.source() {
                    prop_assert!(result.is_ok());
                } else {
                    prop_assert_eq!(
                        result,
                        Err(Error::FrameMismatch { expected: outer.source(), found: inner.target() })
                    );
                }
            }
        }
        let stray = Transform::identity(ids[3]);
        prop_assert!(t1.compose(&stray).is_err());
    }

    #[test]
    fn inverse_undoes_transform((_, [t1, _, _]) in chain(), p in vector3()) {
        let p = point![p.x, p.y, p.z];
        let back = t1.inverse().transform_point(&t1.transform_point(&p));
        prop_assert!((back - p).norm() < 1e-9);
    }

    #[test]
    fn motion_force_dot_is_bilinear(
        a in -10.0f64..10.0,
        (w1, v1, w2, v2) in (vector3(), vector3(), vector3(), vector3()),
        (f, n) in (vector3(), vector3()),
    ) {
        let frames = FrameRegistry::new();
        let world = frames.world();
        let m1 = SpatialMotion::new(world, w1, v1);
        let m2 = SpatialMotion::new(world, w2, v2);
        let force = SpatialForce::new(world, f, n);
        let combined = (m1 * a).checked_add(&m2).unwrap();
        let lhs = combined.dot(&force).unwrap();
        let rhs = a * m1.dot(&force).unwrap() + m2.dot(&force).unwrap();
        prop_assert!((lhs - rhs).abs() <= 1e-9 * (1.0 + lhs.abs()));

        let scaled = force * a;
        let lhs = m1.dot(&scaled.checked_add(&force).unwrap()).unwrap();
        let rhs = a * m1.dot(&force).unwrap() + m1.dot(&force).unwrap();
        prop_assert!((lhs - rhs).abs() <= 1e-9 * (1.0 + lhs.abs()));
    }
}

#[test]
fn dot_rejects_mismatched_frames() {
    let mut frames = FrameRegistry::new();
    let a = frames.create("a");
    let b = frames.create("b");
    let m = SpatialMotion::<f64>::from_angular(a, vector![1.0, 0.0, 0.0]);
    let f = SpatialForce::<f64>::from_torque(b, vector![1.0, 0.0, 0.0]);
    assert_eq!(m.dot(&f), Err(Error::FrameMismatch { expected: a, found: b }));
}

#[test]
fn transform_display_lists_rows() {
    let mut frames = FrameRegistry::new();
    let body = frames.create("body");
    let t = Transform::from_translation(body, frames.world(), vector![1.0, 2.0, 3.0]);
    let text = t.to_string();
    let lines: Vec<_> = text.lines().collect();
    assert_eq!(lines.len(), 5);
    assert_eq!(lines[1], "1, 0, 0");
    assert_eq!(lines[4], "1, 2, 3");
}

#[test]
fn motion_moves_with_transform() {
    let mut frames = FrameRegistry::new();
    let body = frames.create("body");
    let t = Transform::new(
        body,
        frames.world(),
        Rotation3::from_axis_angle(&Vector3::z_axis(), std::f64::consts::FRAC_PI_2),
        vector![0.0, 0.0, 0.0],
    );
    let v = SpatialMotion::from_linear(body, vector![1.0, 0.0, 0.0]);
    let moved = t.transform_motion(&v).unwrap();
    assert_eq!(moved.frame(), frames.world());
    assert_relative_eq!(moved.linear(), vector![0.0, 1.0, 0.0], epsilon = 1e-12);
}

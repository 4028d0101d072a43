#![cfg(feature = "serde")]

use kine::nalgebra::vector;
use kine::{FrameRegistry, SpatialForce, SpatialMotion, Transform, axis_angle};

#[test]
fn transform_round_trips_through_json() {
    let mut frames = FrameRegistry::new();
    let body = frames.create("body");
    let t = Transform::new(
        body,
        frames.world(),
        axis_angle(&vector![0.0, 0.6, 0.8], 0.7),
        vector![1.0, -2.0, 0.5],
    );
    let json = serde_json::to_string(&t).unwrap();
    let back: Transform<f64> = serde_json::from_str(&json).unwrap();
    assert_eq!(back, t);
    assert_eq!(back.source(), body);
}

#[test]
fn spatial_vectors_round_trip_through_json() {
    let mut frames = FrameRegistry::new();
    let body = frames.create("body");
    let v = SpatialMotion::new(body, vector![0.1, 0.2, 0.3], vector![1.0, 0.0, -1.0]);
    let f = SpatialForce::new(body, vector![2.0, -1.0, 0.0], vector![0.0, 0.5, 4.0]);

    let v_back: SpatialMotion<f64> = serde_json::from_str(&serde_json::to_string(&v).unwrap()).unwrap();
    let f_back: SpatialForce<f64> = serde_json::from_str(&serde_json::to_string(&f).unwrap()).unwrap();
    assert_eq!(v_back, v);
    assert_eq!(f_back, f);
    assert_eq!(v_back.dot(&f_back), v.dot(&f));
}

use proptest::prelude::*;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use streetsim_worldgen::{Point2, Polygon, Segment};

fn hash_of<T: Hash>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

fn square(x: f32, y: f32, size: f32) -> Polygon {
    Polygon::new(vec![
        Point2::new(x, y),
        Point2::new(x + size, y),
        Point2::new(x + size, y + size),
        Point2::new(x, y + size),
    ])
}

proptest! {
    #[test]
    fn segment_equality_is_order_independent(
        ax in -1e6f32..1e6,
        ay in -1e6f32..1e6,
        bx in -1e6f32..1e6,
        by in -1e6f32..1e6,
    ) {
        let forward = Segment::new(Point2::new(ax, ay), Point2::new(bx, by));
        let reverse = Segment::new(Point2::new(bx, by), Point2::new(ax, ay));

        prop_assert_eq!(forward, reverse);
        prop_assert_eq!(hash_of(&forward), hash_of(&reverse));
    }

    // Disjoint input must pass through the union untouched: no crossings
    // means no splits, and no polygon swallows another's boundary.
    // Integer-valued coordinates keep the ray casts exact.
    #[test]
    fn union_of_disjoint_squares_keeps_every_segment(
        x1 in -50i32..50,
        y1 in -50i32..50,
        half1 in 1i32..20,
        x2 in 300i32..800,
        y2 in 300i32..800,
        half2 in 1i32..20,
    ) {
        let a = square(x1 as f32, y1 as f32, (2 * half1) as f32);
        let b = square(x2 as f32, y2 as f32, (2 * half2) as f32);

        let soup = Polygon::union(&[a.clone(), b.clone()]);

        prop_assert_eq!(soup.len(), 8);
        for seg in a.segments().iter().chain(b.segments()) {
            prop_assert!(soup.contains(seg));
        }
    }
}

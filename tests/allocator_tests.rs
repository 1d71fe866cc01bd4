use colour_flood::{AxisPermutation, ColourAllocator, Rgb};
use std::collections::HashSet;

fn reversed(c: Rgb) -> Rgb {
    Rgb::new(c.b, c.g, c.r)
}

/// Deterministic stream of targets clustered around a few centres.
fn targets(n: usize) -> Vec<Rgb> {
    let centres = [
        Rgb::new(10, 200, 30),
        Rgb::new(128, 128, 128),
        Rgb::new(250, 5, 250),
    ];
    (0..n)
        .map(|i| {
            let c = centres[i % centres.len()];
            let wobble = (i / centres.len()) as u8 % 5;
            Rgb::new(
                c.r.saturating_add(wobble),
                c.g.saturating_sub(wobble),
                c.b,
            )
        })
        .collect()
}

#[test]
fn test_allocations_never_repeat_without_echo() {
    let mut allocator = ColourAllocator::new(AxisPermutation::Grb);
    let granted: Vec<Rgb> = targets(2000)
        .into_iter()
        .map(|t| allocator.allocate(t))
        .collect();
    let unique: HashSet<_> = granted.iter().collect();
    assert_eq!(unique.len(), granted.len());
    assert_eq!(allocator.used_count(), 2000);
}

#[test]
fn test_bgr_mirrors_rgb() {
    let mut rgb = ColourAllocator::new(AxisPermutation::Rgb);
    let mut bgr = ColourAllocator::new(AxisPermutation::Bgr);
    for t in targets(500) {
        let a = bgr.allocate(t);
        let b = reversed(rgb.allocate(reversed(t)));
        assert_eq!(a, b, "target {}", t);
    }
}

#[test]
fn test_grants_stay_close_to_target() {
    let mut allocator = ColourAllocator::new(AxisPermutation::Rgb);
    let target = Rgb::new(64, 64, 64);
    for _ in 0..123 {
        let granted = allocator.allocate(target);
        // 123 points fit inside the radius-3 ball, so none lies outside it.
        assert!(granted.dist_sqr(target) <= 9, "granted {}", granted);
    }
}

#[test]
fn test_pruning_switch_mid_stream_changes_nothing() {
    let stream = targets(1500);
    let mut plain = ColourAllocator::new(AxisPermutation::Brg);
    let mut pruned = ColourAllocator::new(AxisPermutation::Brg);

    for (i, t) in stream.into_iter().enumerate() {
        if i == 700 {
            pruned.enable_pruning();
        }
        assert_eq!(plain.allocate(t), pruned.allocate(t));
    }
    assert!(pruned.is_pruning());
    assert!(!plain.is_pruning());
}

#[test]
fn test_echo_releases_oldest_colour() {
    let window = 5;
    let mut allocator = ColourAllocator::new(AxisPermutation::Rgb).with_echo_window(window);
    let first = allocator.allocate(Rgb::black());

    for i in 1..window {
        assert!(allocator.is_used(first), "released after {} allocations", i);
        allocator.allocate(Rgb::white());
    }
    assert!(!allocator.is_used(first));
    assert_eq!(allocator.allocate(Rgb::black()), first);
}

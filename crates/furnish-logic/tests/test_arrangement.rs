//! Integration tests for full arrangements over the bundled household data.
//!
//! Exercises: tables → root selection → relation expansion → packing
//!
//! All tests are pure logic — no simulator, no rendering.

use std::collections::BTreeSet;

use furnish_logic::bounds::{fits_in_region, footprint};
use furnish_logic::prelude::*;
use furnish_logic::tables::validate;

// ── Helpers ────────────────────────────────────────────────────────────

fn engine(seed: u64) -> ArrangementEngine {
    ArrangementEngine::household(EngineConfig {
        seed,
        ..EngineConfig::default()
    })
    .expect("bundled data parses")
}

fn room() -> RegionBounds {
    RegionBounds::centered(0.0, 0.0, 12.0, 12.0)
}

/// 4×4 square with the 2×2 quadrant at (2..4, 2..4) cut out.
fn l_room() -> PolygonRegion {
    PolygonRegion::new(vec![
        (0.0, 0.0),
        (4.0, 0.0),
        (4.0, 2.0),
        (2.0, 2.0),
        (2.0, 4.0),
        (0.0, 4.0),
    ])
}

/// Names of placements whose fit anchors leave `region`.
fn escaping(e: &ArrangementEngine, r: &ArrangementResult, region: &dyn Region) -> Vec<String> {
    r.placements
        .iter()
        .filter(|p| {
            let record = e.catalog().record(&p.model_name).unwrap();
            !fits_in_region(record, p.position, region)
        })
        .map(|p| p.model_name.clone())
        .collect()
}

// ── Scenarios ──────────────────────────────────────────────────────────

#[test]
fn stool_in_open_room() {
    let mut e = engine(1);
    let r = e.arrange_at("stool", Vec3::ZERO, 0.0, &room()).unwrap();
    assert!(r.success);
    assert_eq!(r.placements.len(), 1);
    assert_eq!(r.placements[0].category, "stool");
    assert!((0.0..360.0).contains(&r.placements[0].rotation));
}

#[test]
fn stool_rotation_varies_with_seed() {
    let yaws: BTreeSet<i32> = (0..20)
        .map(|seed| {
            let r = engine(seed).arrange_at("stool", Vec3::ZERO, 0.0, &room()).unwrap();
            r.placements[0].rotation as i32
        })
        .collect();
    assert!(yaws.len() > 5, "stool yaw should be sampled, got {:?}", yaws);
}

#[test]
fn bowls_sit_on_table_top() {
    let base_y = 0.2;
    let mut bowls = 0;
    for seed in 0..20 {
        let mut e = engine(seed);
        let r = e
            .arrange_at("table", Vec3::new(1.0, base_y, -1.0), 0.0, &room())
            .unwrap();
        let table = &r.placements[0];
        let top = e.catalog().record(&table.model_name).unwrap().bounds.top.y;
        for p in r.of_category("bowl") {
            assert!((p.position.y - (top + base_y)).abs() < 1e-5);
            bowls += 1;
        }
    }
    assert!(bowls > 0, "twenty tables should carry at least one bowl");
}

#[test]
fn tiny_region_fails_gracefully() {
    for category in ["stool", "table", "sofa", "shelf"] {
        let mut e = engine(0);
        let closet = RegionBounds::centered(0.0, 0.0, 0.05, 0.05);
        let r = e.arrange_at(category, Vec3::ZERO, 0.0, &closet).unwrap();
        assert!(!r.success, "{} should not fit", category);
        assert!(r.object_ids.is_empty());
        assert!(r.kinematic_object_ids.is_empty());
    }
}

#[test]
fn unknown_category_is_error() {
    let mut e = engine(0);
    let err = e.arrange_at("hovercraft", Vec3::ZERO, 0.0, &room()).unwrap_err();
    assert!(matches!(err, ArrangeError::InvalidCategory(_)));
}

// ── Invariants ─────────────────────────────────────────────────────────

#[test]
fn same_seed_same_result() {
    for category in ["table", "sofa", "shelf", "side_table"] {
        let a = engine(77).arrange_at(category, Vec3::ZERO, 45.0, &room()).unwrap();
        let b = engine(77).arrange_at(category, Vec3::ZERO, 45.0, &room()).unwrap();
        assert_eq!(a, b, "{} not deterministic", category);
        let ja = serde_json::to_string(&a).unwrap();
        let jb = serde_json::to_string(&b).unwrap();
        assert_eq!(ja, jb);
    }
}

#[test]
fn kinematic_categories_never_rotate() {
    let mut e = engine(5);
    let kinematic = e.tables().kinematic.clone();
    for seed in 0..10 {
        e.reseed(seed);
        for category in ["table", "sofa", "shelf", "refrigerator"] {
            let r = e.arrange_at(category, Vec3::ZERO, 120.0, &room()).unwrap();
            for p in &r.placements {
                if kinematic.contains(&p.category) {
                    assert!(p.kinematic);
                    assert_eq!(p.rotation, 0.0, "{} rotated", p.model_name);
                    assert!(r.kinematic_object_ids.contains(&p.id));
                }
            }
        }
    }
}

#[test]
fn sofa_arrangement_stays_in_room() {
    let living = RegionBounds::new(-2.0, 2.5, -1.5, 1.5);
    for seed in 0..20 {
        let mut e = engine(seed);
        let r = e.arrange_at("sofa", Vec3::ZERO, 0.0, &living).unwrap();
        let outside = escaping(&e, &r, &living);
        assert!(outside.is_empty(), "seed {}: {:?} escape the room", seed, outside);
    }
}

#[test]
fn rotated_table_keeps_tableware_in_tight_room() {
    // Only the 1.6×0.9 table fits; at 45° its corners swing past the walls.
    let tight = RegionBounds::new(-0.82, 0.82, -0.47, 0.47);
    let mut packed = 0;
    for seed in 0..40 {
        let mut e = engine(seed);
        let r = e.arrange_at("table", Vec3::ZERO, 45.0, &tight).unwrap();
        assert!(r.success);
        let outside = escaping(&e, &r, &tight);
        assert!(outside.is_empty(), "seed {}: {:?} escape the room", seed, outside);
        packed += r.len() - 1;
    }
    assert!(packed > 0, "the middle of the table should still carry objects");
}

#[test]
fn table_near_l_cutout_keeps_tableware_in_room() {
    let l = l_room();
    let mut roots = 0;
    for seed in 0..40 {
        let mut e = engine(seed);
        let r = e.arrange_at("table", Vec3::new(1.5, 0.0, 1.8), 0.0, &l).unwrap();
        if r.success {
            roots += 1;
        }
        let outside = escaping(&e, &r, &l);
        assert!(outside.is_empty(), "seed {}: {:?} escape the room", seed, outside);
    }
    assert!(roots > 0);
}

#[test]
fn side_tables_carry_their_own_objects() {
    let mut found = false;
    for seed in 0..20 {
        let r = engine(seed).arrange_at("sofa", Vec3::ZERO, 0.0, &room()).unwrap();
        let side_ids = r.of_category("side_table").count();
        assert!(side_ids <= 2);
        let on_tables = r
            .placements
            .iter()
            .filter(|p| ["table_lamp", "vase", "cup"].contains(&p.category.as_str()))
            .count();
        if side_ids > 0 && on_tables > 0 {
            found = true;
            assert!(r.categories.contains(&"side_table".to_string()));
        }
    }
    assert!(found, "some side table should carry a lamp, vase or cup");
}

#[test]
fn packed_objects_do_not_crowd() {
    let cell = 0.05;
    for seed in 0..20 {
        let mut e = engine(seed);
        let r = e.arrange_at("table", Vec3::ZERO, 0.0, &room()).unwrap();
        let packed: Vec<_> = r.placements[1..].iter().collect();
        for (i, a) in packed.iter().enumerate() {
            let fa = footprint(e.catalog().record(&a.model_name).unwrap());
            for b in &packed[i + 1..] {
                let fb = footprint(e.catalog().record(&b.model_name).unwrap());
                let d = a.position.distance(&b.position);
                assert!(
                    d > fa.max(fb) - 0.1 * cell,
                    "{} and {} too close: {}",
                    a.model_name,
                    b.model_name,
                    d
                );
            }
        }
    }
}

#[test]
fn object_ids_match_placements() {
    let r = engine(3).arrange_at("sofa", Vec3::ZERO, 0.0, &room()).unwrap();
    let ids: Vec<u32> = r.placements.iter().map(|p| p.id).collect();
    assert_eq!(ids, r.object_ids);
    let unique: BTreeSet<u32> = ids.iter().copied().collect();
    assert_eq!(unique.len(), ids.len());
    let mut sorted = r.categories.clone();
    sorted.sort();
    sorted.dedup();
    assert_eq!(sorted, r.categories);
}

#[test]
fn polygon_room_is_respected() {
    // The stool must land in the arm that contains the request point.
    let l = l_room();
    let mut e = engine(8);
    assert!(e.arrange_at("stool", Vec3::new(1.0, 0.0, 3.0), 0.0, &l).unwrap().success);
    assert!(!e.arrange_at("stool", Vec3::new(3.0, 0.0, 3.0), 0.0, &l).unwrap().success);
}

#[test]
fn bundled_tables_are_consistent() {
    let catalog = Catalog::household().unwrap();
    let tables = ArrangementTables::household().unwrap();
    let issues = validate(&tables, &catalog);
    assert!(issues.is_empty(), "{:?}", issues);
}

#[test]
fn injected_catalog_and_allocator() {
    struct Counter(u32);
    impl IdAllocator for Counter {
        fn next_id(&mut self) -> u32 {
            self.0 += 10;
            self.0
        }
    }
    let tables = ArrangementTables::household().unwrap();
    let catalog = Catalog::household().unwrap();
    let mut e = ArrangementEngine::new(catalog, tables, Counter(0), EngineConfig::default());
    let r = e.arrange_at("table", Vec3::ZERO, 0.0, &room()).unwrap();
    for (i, id) in r.object_ids.iter().enumerate() {
        assert_eq!(*id, (i as u32 + 1) * 10);
    }
}

//! Selection Buffer Tests
//!
//! Capture a region of an in-memory world and check what the buffer projects
//! back out under rotation and mirroring.

use glam::IVec3;
use terra_clone::game::clone_tool::{
    GROWTH_NOT_APPLICABLE, PlacedObjectRecord, ScanOptions, Selection,
};
use terra_clone::world::memory::PrefabSpec;
use terra_clone::world::{FlipMode, MemoryWorld, ObjectCapabilities, Orientation, WorldError};

const GROUND: i32 = 2;
const TOP: i32 = GROUND + 1;

// ============================================================================
// HELPERS
// ============================================================================

fn world() -> MemoryWorld {
    let mut world = MemoryWorld::new(IVec3::new(-8, -8, 0), IVec3::new(8, 8, 8));
    world.fill_ground(GROUND);
    world.register_prefab(
        "Path",
        PrefabSpec::single(ObjectCapabilities {
            flippable: true,
            growable: false,
        }),
    );
    world.register_prefab(
        "Pine.Tree",
        PrefabSpec::single(ObjectCapabilities {
            flippable: false,
            growable: true,
        }),
    );
    world.register_prefab(
        "Bench",
        PrefabSpec {
            shape: vec![IVec3::ZERO, IVec3::X],
            capabilities: ObjectCapabilities::default(),
        },
    );
    world
}

fn spawn(world: &mut MemoryWorld, prefab: &str, coord: IVec3, orientation: Orientation) {
    world
        .spawn(prefab, coord, orientation, FlipMode::UNFLIPPED, 0.5)
        .expect("spawn rejected");
}

fn scan(world: &MemoryWorld, a: IVec3, b: IVec3) -> Selection {
    let mut selection = Selection::new();
    selection
        .scan(world, a, b, ScanOptions::default())
        .expect("scan failed");
    selection
}

fn find<'a>(records: &'a [PlacedObjectRecord], prefab: &str) -> &'a PlacedObjectRecord {
    records
        .iter()
        .find(|r| r.prefab == prefab)
        .unwrap_or_else(|| panic!("{prefab} not captured"))
}

/// A mixed patch: ground, a path strip, a tree and a two-cell bench.
fn patch() -> (MemoryWorld, Selection) {
    let mut world = world();
    spawn(&mut world, "Path", IVec3::new(0, 0, TOP), Orientation::Cw90);
    spawn(&mut world, "Path", IVec3::new(1, 0, TOP), Orientation::Cw0);
    spawn(&mut world, "Pine.Tree", IVec3::new(2, 1, TOP), Orientation::Cw270);
    spawn(&mut world, "Bench", IVec3::new(0, 2, TOP), Orientation::Cw0);
    let selection = scan(&world, IVec3::new(0, 0, GROUND), IVec3::new(3, 2, TOP));
    (world, selection)
}

// ============================================================================
// READ-BACK
// ============================================================================

#[test]
fn test_reads_are_idempotent() {
    let (_world, mut selection) = patch();
    selection.rotate(true);
    selection.flip();

    let terrain_a: Vec<_> = selection.terrain().collect();
    let terrain_b: Vec<_> = selection.terrain().collect();
    assert_eq!(terrain_a, terrain_b);

    let objects_a: Vec<_> = selection.objects().collect();
    let objects_b: Vec<_> = selection.objects().collect();
    assert_eq!(objects_a, objects_b);
}

#[test]
fn test_four_rotations_restore_output() {
    let (_world, mut selection) = patch();
    let terrain: Vec<_> = selection.terrain().collect();
    let objects: Vec<_> = selection.objects().collect();

    for _ in 0..4 {
        selection.rotate(true);
    }
    assert_eq!(selection.orientation(), Orientation::Cw0);
    assert_eq!(selection.terrain().collect::<Vec<_>>(), terrain);
    assert_eq!(selection.objects().collect::<Vec<_>>(), objects);

    selection.rotate(false);
    selection.rotate(true);
    assert_eq!(selection.objects().collect::<Vec<_>>(), objects);
}

#[test]
fn test_double_flip_restores_output() {
    let (_world, mut selection) = patch();
    let terrain: Vec<_> = selection.terrain().collect();
    let objects: Vec<_> = selection.objects().collect();

    selection.flip();
    assert_ne!(selection.objects().collect::<Vec<_>>(), objects);
    selection.flip();
    assert!(!selection.flip_mode().is_flipped());
    assert_eq!(selection.terrain().collect::<Vec<_>>(), terrain);
    assert_eq!(selection.objects().collect::<Vec<_>>(), objects);
}

// ============================================================================
// OBJECT FACING
// ============================================================================

#[test]
fn test_flip_reverses_flippable_longitudinal_object() {
    let mut world = world();
    spawn(&mut world, "Path", IVec3::new(0, 0, TOP), Orientation::Cw0);
    spawn(&mut world, "Pine.Tree", IVec3::new(1, 0, TOP), Orientation::Cw0);
    let mut selection = scan(&world, IVec3::new(0, 0, TOP), IVec3::new(1, 0, TOP));

    selection.flip();
    let objects: Vec<_> = selection.objects().collect();

    let path = find(&objects, "Path");
    assert_eq!(path.orientation, Orientation::Cw180);
    assert!(path.flip.is_flipped());

    let tree = find(&objects, "Pine.Tree");
    assert_eq!(tree.orientation, Orientation::Cw0);
    assert!(!tree.flip.is_flipped());
}

#[test]
fn test_flip_reverses_non_flippable_lateral_object() {
    let mut world = world();
    spawn(&mut world, "Pine.Tree", IVec3::new(0, 0, TOP), Orientation::Cw90);
    let mut selection = scan(&world, IVec3::new(0, 0, TOP), IVec3::new(0, 0, TOP));

    selection.flip();
    let objects: Vec<_> = selection.objects().collect();
    assert_eq!(objects[0].orientation, Orientation::Cw270);
    assert!(!objects[0].flip.is_flipped());
}

#[test]
fn test_single_object_rotated_once() {
    let mut world = world();
    let cell = IVec3::new(3, -2, TOP);
    spawn(&mut world, "Path", cell, Orientation::Cw90);
    let mut selection = scan(&world, cell, cell);
    assert_eq!(selection.center(), cell);

    selection.rotate(true);
    assert_eq!(selection.orientation(), Orientation::Cw90);

    let objects: Vec<_> = selection.objects().collect();
    assert_eq!(objects.len(), 1);
    assert_eq!(objects[0].coordinates, cell);
    assert_eq!(objects[0].orientation, Orientation::Cw180);
    assert_eq!(objects[0].flip, FlipMode::UNFLIPPED);
}

// ============================================================================
// SCAN
// ============================================================================

#[test]
fn test_multi_cell_object_captured_once() {
    for include_stacked in [false, true] {
        let mut world = world();
        spawn(&mut world, "Bench", IVec3::new(0, 0, TOP), Orientation::Cw0);

        let mut selection = Selection::new();
        let options = ScanOptions {
            include_air: false,
            include_stacked,
        };
        selection
            .scan(&world, IVec3::new(-1, -1, TOP), IVec3::new(2, 1, TOP), options)
            .unwrap();
        assert_eq!(selection.object_count(), 1, "include_stacked = {include_stacked}");
    }
}

#[test]
fn test_growth_and_capabilities_captured() {
    let (_world, selection) = patch();
    let objects: Vec<_> = selection.captured_objects().collect();

    let tree = find(&objects, "Pine.Tree");
    assert_eq!(tree.growth, 0.5);
    assert!(!tree.flippable);

    let path = find(&objects, "Path");
    assert_eq!(path.growth, GROWTH_NOT_APPLICABLE);
    assert!(path.flippable);
}

#[test]
fn test_air_only_captured_when_requested() {
    let world = world();
    let (a, b) = (IVec3::new(0, 0, GROUND), IVec3::new(1, 1, TOP));

    let selection = scan(&world, a, b);
    assert_eq!(selection.terrain_count(), 4);
    assert!(selection.terrain().all(|(_, solid)| solid));

    let mut with_air = Selection::new();
    let options = ScanOptions {
        include_air: true,
        include_stacked: false,
    };
    with_air.scan(&world, a, b, options).unwrap();
    assert_eq!(with_air.terrain_count(), 8);
    assert_eq!(with_air.terrain().filter(|(_, solid)| !solid).count(), 4);
}

#[test]
fn test_cells_outside_map_skipped() {
    let world = world();
    let mut selection = Selection::new();
    let summary = selection
        .scan(
            &world,
            IVec3::new(7, 7, GROUND),
            IVec3::new(9, 9, GROUND),
            ScanOptions::default(),
        )
        .unwrap();
    assert_eq!(summary.cells_visited, 9);
    assert_eq!(summary.terrain, 4);
}

#[test]
fn test_failed_query_keeps_partial_capture() {
    let mut world = world();
    spawn(&mut world, "Path", IVec3::new(0, 0, TOP), Orientation::Cw0);
    spawn(&mut world, "Path", IVec3::new(2, 0, TOP), Orientation::Cw0);
    world.inject_query_fault(IVec3::new(1, 0, GROUND));

    let mut selection = Selection::new();
    let result = selection.scan(
        &world,
        IVec3::new(0, 0, GROUND),
        IVec3::new(2, 0, TOP),
        ScanOptions::default(),
    );

    assert!(matches!(result, Err(WorldError::QueryFailed(_))));
    assert_eq!(selection.object_count(), 1);
    assert_eq!(selection.terrain_count(), 2);
    assert_eq!(selection.size(), IVec3::new(3, 1, 2));
}

#[test]
fn test_rescan_replaces_contents_and_transform() {
    let (world, mut selection) = patch();
    selection.rotate(true);
    selection.flip();

    selection
        .scan(&world, IVec3::new(5, 5, GROUND), IVec3::new(5, 5, GROUND), ScanOptions::default())
        .unwrap();
    assert_eq!(selection.object_count(), 0);
    assert_eq!(selection.terrain_count(), 1);
    assert_eq!(selection.orientation(), Orientation::Cw0);
    assert!(!selection.flip_mode().is_flipped());
}

// ============================================================================
// MIRROR PIVOT
// ============================================================================

#[test]
fn test_even_and_odd_width_mirror_differently() {
    let mut world = world();
    spawn(&mut world, "Path", IVec3::new(0, 0, TOP), Orientation::Cw0);
    spawn(&mut world, "Path", IVec3::new(5, 0, TOP), Orientation::Cw0);

    // Same object at the capture center in both, width 2 vs width 3
    let mut even = scan(&world, IVec3::new(0, 0, TOP), IVec3::new(1, 0, TOP));
    let mut odd = scan(&world, IVec3::new(4, 0, TOP), IVec3::new(6, 0, TOP));
    assert_eq!(even.flip_width(), 2);
    assert_eq!(odd.flip_width(), 1);

    even.flip();
    odd.flip();
    let even_rel = even.objects().next().unwrap().coordinates - even.center();
    let odd_rel = odd.objects().next().unwrap().coordinates - odd.center();
    assert_eq!(even_rel, IVec3::X);
    assert_eq!(odd_rel, IVec3::ZERO);

    // Mirrored footprints stay where they were
    assert_eq!(even.bounds(), (IVec3::new(0, 0, TOP), IVec3::new(1, 0, TOP)));
    assert_eq!(odd.bounds(), (IVec3::new(4, 0, TOP), IVec3::new(6, 0, TOP)));
}

#[test]
fn test_moved_selection_projects_around_new_center() {
    let (_world, mut selection) = patch();
    let before: Vec<_> = selection.objects().collect();

    let offset = IVec3::new(10, -4, 1);
    selection.update_position(IVec3::new(0, 0, GROUND) + offset, IVec3::new(3, 2, TOP) + offset);
    let after: Vec<_> = selection.objects().collect();

    for (a, b) in before.iter().zip(&after) {
        assert_eq!(b.coordinates - a.coordinates, offset);
        assert_eq!(b.orientation, a.orientation);
    }
}

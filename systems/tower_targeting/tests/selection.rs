use path_defence_core::{EnemyId, Point};
use path_defence_system_tower_targeting::{nearest_in_range, within_radius, Candidate};

fn candidate(id: u32, x: f32, y: f32) -> Candidate {
    Candidate::new(EnemyId::new(id), Point::new(x, y))
}

#[test]
fn targets_nearest_enemy_within_range() {
    let origin = Point::new(300.0, 220.0);
    let enemies = [
        candidate(1, 300.0, 150.0),
        candidate(2, 330.0, 200.0),
        candidate(3, 500.0, 220.0),
    ];

    let selected = nearest_in_range(origin, 100.0, enemies);

    assert_eq!(selected, Some(candidate(2, 330.0, 200.0)));
}

#[test]
fn enemy_outside_range_is_ignored() {
    let origin = Point::new(0.0, 0.0);
    let enemies = [candidate(1, 150.0, 0.0), candidate(2, 0.0, -101.0)];

    assert_eq!(nearest_in_range(origin, 100.0, enemies), None);
}

#[test]
fn first_encountered_wins_ties() {
    let origin = Point::new(100.0, 100.0);
    let enemies = [
        candidate(9, 130.0, 100.0),
        candidate(3, 70.0, 100.0),
        candidate(5, 100.0, 130.0),
    ];

    let selected = nearest_in_range(origin, 50.0, enemies).map(|c| c.id);

    assert_eq!(
        selected,
        Some(EnemyId::new(9)),
        "ties resolve to iteration order, not identifier order",
    );
}

#[test]
fn empty_candidates_produce_no_target() {
    assert_eq!(
        nearest_in_range(Point::new(0.0, 0.0), 500.0, Vec::<Candidate>::new()),
        None
    );
}

#[test]
fn blast_radius_collects_every_enemy_around_center() {
    let center = Point::new(200.0, 200.0);
    let enemies = [
        candidate(1, 200.0, 200.0),
        candidate(2, 240.0, 230.0),
        candidate(3, 251.0, 200.0),
        candidate(4, 150.0, 200.0),
    ];

    let hit: Vec<EnemyId> = within_radius(center, 50.0, enemies).collect();

    assert_eq!(hit, vec![EnemyId::new(1), EnemyId::new(2), EnemyId::new(4)]);
}

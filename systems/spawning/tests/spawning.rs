use path_defence_core::{EnemyKind, WaveError, WaveProgress};
use path_defence_system_spawning::WaveSchedule;

const SPAWN_DELAY: u32 = 60;

fn drain_ticks(schedule: &mut WaveSchedule, ticks: u32) -> Vec<(u32, EnemyKind)> {
    (1..=ticks)
        .filter_map(|tick| schedule.tick().map(|kind| (tick, kind)))
        .collect()
}

#[test]
fn spawns_in_insertion_order_every_delay() {
    let mut schedule = WaveSchedule::new(SPAWN_DELAY);
    schedule
        .add_wave(vec![EnemyKind::Basic, EnemyKind::Fast, EnemyKind::Tank])
        .expect("add wave");
    schedule.start_next().expect("start wave");

    let spawns = drain_ticks(&mut schedule, 180);

    assert_eq!(
        spawns,
        vec![
            (60, EnemyKind::Basic),
            (120, EnemyKind::Fast),
            (180, EnemyKind::Tank),
        ],
        "one spawn per delay, in wave order",
    );
}

#[test]
fn exhausted_wave_deactivates_without_spawning() {
    let mut schedule = WaveSchedule::new(SPAWN_DELAY);
    schedule.add_wave(vec![EnemyKind::Basic]).expect("add wave");
    schedule.add_wave(vec![EnemyKind::Fast]).expect("add wave");
    schedule.start_next().expect("start wave");

    assert_eq!(drain_ticks(&mut schedule, 60), vec![(60, EnemyKind::Basic)]);
    assert!(schedule.is_active());

    assert!(drain_ticks(&mut schedule, 60).is_empty());
    assert!(!schedule.is_active(), "wave ends one delay after its last spawn");
    assert_eq!(schedule.current_wave(), 1);
    assert!(!schedule.is_finished(), "a second wave is still pending");
}

#[test]
fn start_next_rejects_active_and_exhausted_schedules() {
    let mut schedule = WaveSchedule::new(1);
    assert_eq!(schedule.start_next(), Err(WaveError::NoMoreWaves));

    schedule.add_wave(vec![EnemyKind::Basic]).expect("add wave");
    schedule.start_next().expect("start wave");
    assert_eq!(schedule.start_next(), Err(WaveError::WaveAlreadyActive));

    assert_eq!(schedule.tick(), Some(EnemyKind::Basic));
    assert_eq!(schedule.tick(), None);
    assert_eq!(schedule.start_next(), Err(WaveError::NoMoreWaves));
}

#[test]
fn add_wave_is_rejected_while_spawning() {
    let mut schedule = WaveSchedule::new(SPAWN_DELAY);
    schedule.add_wave(vec![EnemyKind::Basic]).expect("add wave");
    schedule.start_next().expect("start wave");

    assert_eq!(
        schedule.add_wave(vec![EnemyKind::Tank]),
        Err(WaveError::WaveAlreadyActive)
    );
    assert_eq!(schedule.wave_count(), 1);
}

#[test]
fn finished_only_after_last_wave_deactivates() {
    let mut schedule = WaveSchedule::new(SPAWN_DELAY);
    schedule
        .add_wave(vec![EnemyKind::Basic, EnemyKind::Basic])
        .expect("add wave");
    assert!(!schedule.is_finished(), "an unstarted wave remains");

    schedule.start_next().expect("start wave");
    let mut finished_at = None;
    for tick in 1..=400 {
        let _ = schedule.tick();
        if schedule.is_finished() {
            finished_at = Some(tick);
            break;
        }
        assert!(schedule.is_active(), "wave stays active until finished");
    }

    assert_eq!(
        finished_at,
        Some(180),
        "two spawns at 60 and 120, deactivation at 180",
    );
}

#[test]
fn cursor_resets_between_waves() {
    let mut schedule = WaveSchedule::new(2);
    schedule
        .add_wave(vec![EnemyKind::Basic, EnemyKind::Basic])
        .expect("add wave");
    schedule
        .add_wave(vec![EnemyKind::Fast, EnemyKind::Tank, EnemyKind::Tank])
        .expect("add wave");

    schedule.start_next().expect("start wave");
    let _ = drain_ticks(&mut schedule, 6);
    assert_eq!(
        schedule.progress(),
        WaveProgress {
            current: 1,
            total: 2,
            spawned: 0,
            size: 3,
            active: false,
        }
    );

    schedule.start_next().expect("start second wave");
    assert_eq!(schedule.progress().spawned, 0);
    assert_eq!(
        drain_ticks(&mut schedule, 4),
        vec![(2, EnemyKind::Fast), (4, EnemyKind::Tank)]
    );
}

#[test]
fn empty_wave_completes_after_one_delay() {
    let mut schedule = WaveSchedule::new(SPAWN_DELAY);
    schedule.add_wave(Vec::new()).expect("add wave");
    schedule.start_next().expect("start wave");

    assert!(drain_ticks(&mut schedule, 59).is_empty());
    assert!(schedule.is_active());
    assert_eq!(schedule.tick(), None);
    assert!(schedule.is_finished());
}

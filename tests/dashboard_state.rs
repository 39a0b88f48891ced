use pitch_metrics::mock_feed::mock_dataset;
use pitch_metrics::report::build_reports;
use pitch_metrics::state::{DashboardState, Screen};

fn state(matches: usize, step: u16) -> DashboardState {
    DashboardState::new(build_reports(&mock_dataset(4, matches)), step)
}

#[test]
fn playback_stops_at_final_minute() {
    let mut s = state(1, 7);
    let end = s.final_minute();
    assert!(end >= 90);

    s.toggle_play();
    assert!(s.playing);
    let mut guard = 0;
    while s.tick() {
        assert!(s.cursor <= end);
        guard += 1;
        assert!(guard < 1000);
    }
    assert_eq!(s.cursor, end);
    assert!(!s.playing);
    assert!(s.logs.back().is_some_and(|l| l.contains("full time")));

    // paused: ticking does nothing
    assert!(!s.tick());
    assert_eq!(s.cursor, end);
}

#[test]
fn play_after_full_time_restarts() {
    let mut s = state(1, 200);
    s.toggle_play();
    s.tick();
    assert_eq!(s.cursor, s.final_minute());
    s.toggle_play();
    assert!(s.playing);
    assert_eq!(s.cursor, 0);
}

#[test]
fn stepping_is_bounded() {
    let mut s = state(1, 5);
    s.step_back();
    assert_eq!(s.cursor, 0);
    s.step_forward();
    assert_eq!(s.cursor, 5);
    assert_eq!(s.visible_timeline().len(), 6);
    for _ in 0..100 {
        s.step_forward();
    }
    assert_eq!(s.cursor, s.final_minute());
    assert_eq!(
        s.timeline_point(),
        s.current().and_then(|r| r.timeline.last().copied())
    );
}

#[test]
fn selecting_matches_wraps_and_resets() {
    let mut s = state(3, 10);
    s.step_forward();
    s.toggle_play();
    s.select_next();
    assert_eq!(s.selected, 1);
    assert_eq!(s.cursor, 0);
    assert!(!s.playing);

    s.select_prev();
    s.select_prev();
    assert_eq!(s.selected, 2);
    s.select_next();
    assert_eq!(s.selected, 0);
}

#[test]
fn empty_state_is_inert() {
    let mut s = DashboardState::new(Vec::new(), 0);
    assert_eq!(s.step, 1);
    s.select_next();
    s.toggle_play();
    assert!(!s.playing);
    assert!(!s.tick());
    assert!(s.visible_timeline().is_empty());
    assert!(s.teams().is_none());
}

#[test]
fn screens_cycle_and_logs_are_capped() {
    let mut s = state(1, 1);
    assert_eq!(s.screen, Screen::Overview);
    s.cycle_screen();
    s.cycle_screen();
    assert_eq!(s.screen, Screen::Shape);
    s.cycle_screen();
    assert_eq!(s.screen, Screen::Overview);

    for i in 0..250 {
        s.push_log(format!("[INFO] line {i}"));
    }
    assert_eq!(s.logs.len(), 200);
    assert_eq!(s.logs.front().map(String::as_str), Some("[INFO] line 50"));
}

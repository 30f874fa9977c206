use super::*;
use std::thread;

#[test]
fn test_search_limits_depth_only() {
    let limits = SearchLimits::depth(5);
    assert_eq!(limits.depth, 5);
    assert!(limits.move_time.is_none());
    assert!(!limits.time_control().has_deadline());
}

#[test]
fn test_search_limits_with_time() {
    let limits = SearchLimits::depth_and_time(4, Duration::from_millis(100));
    assert_eq!(limits.depth, 4);
    assert_eq!(limits.move_time, Some(Duration::from_millis(100)));
    assert!(limits.time_control().has_deadline());
}

#[test]
fn test_time_control_expiry() {
    let mut tc = TimeControl::new(Some(Duration::from_millis(10)));
    tc.start();
    assert!(!tc.is_stopped());

    // Wait for time to expire
    thread::sleep(Duration::from_millis(20));
    assert!(tc.check_time());
    assert!(tc.is_stopped());
}

#[test]
fn test_time_control_no_limit() {
    let mut tc = TimeControl::new(None);
    tc.start();
    thread::sleep(Duration::from_millis(10));
    assert!(!tc.check_time());
    assert!(!tc.is_stopped());
}

#[test]
fn test_time_control_manual_stop() {
    let mut tc = TimeControl::new(None);
    tc.start();
    assert!(!tc.is_stopped());
    let before = tc.clone();
    tc.stop();
    assert!(tc.is_stopped());
    assert!(!before.is_stopped());
    tc.start();
    assert!(!tc.is_stopped());
}

#[test]
fn test_check_interval() {
    let tc = TimeControl::new(None).with_check_interval(4);
    assert!(tc.should_check_time(0));
    assert!(!tc.should_check_time(3));
    assert!(tc.should_check_time(8));
    let every = TimeControl::new(None).with_check_interval(0);
    assert!(every.should_check_time(7));
}

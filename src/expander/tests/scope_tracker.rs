use pretty_assertions::assert_eq;

use crate::expander::{CloseKind, ScopeTracker};

#[test]
fn test_close_without_pending_opens_ends_scope() {
    let mut tracker = ScopeTracker::default();
    tracker.go_deeper();
    assert_eq!(tracker.depth(), 1);
    assert_eq!(tracker.close(), CloseKind::Scope);
    assert_eq!(tracker.depth(), 0);
}

#[test]
fn test_unknown_openings_are_closed_literally() {
    let mut tracker = ScopeTracker::default();
    tracker.go_deeper();
    tracker.open();
    tracker.open();
    assert_eq!(tracker.close(), CloseKind::Literal);
    assert_eq!(tracker.close(), CloseKind::Literal);
    assert_eq!(tracker.close(), CloseKind::Scope);
}

#[test]
fn test_pending_count_is_restored_after_inner_scope() {
    let mut tracker = ScopeTracker::default();
    tracker.open();
    tracker.go_deeper();
    tracker.open();
    tracker.go_deeper();

    assert_eq!(tracker.close(), CloseKind::Scope);
    assert_eq!(tracker.close(), CloseKind::Literal);
    assert_eq!(tracker.close(), CloseKind::Scope);
    assert_eq!(tracker.close(), CloseKind::Literal);
    assert_eq!(tracker.close(), CloseKind::Unmatched);
}

#[test]
fn test_close_on_fresh_tracker_is_unmatched() {
    let mut tracker = ScopeTracker::default();
    assert_eq!(tracker.close(), CloseKind::Unmatched);
    assert_eq!(tracker, ScopeTracker::default());
}

use super::*;
use crate::net::service::test_double::FakeService;
use crate::state::bookmarks::BookmarksState;
use futures::executor::block_on;

fn row(id: &str, owner: &str) -> Bookmark {
    Bookmark {
        id: id.to_owned(),
        owner: owner.to_owned(),
        url: format!("https://example.com/{id}"),
        title: id.to_owned(),
        created_at: "2026-08-07T12:34:56Z".to_owned(),
    }
}

// =============================================================
// delete_with_reconcile
// =============================================================

#[test]
fn successful_delete_needs_no_reconciliation() {
    let service = FakeService::signed_in("user-1", "a@b.c");
    service.rows.borrow_mut().push(row("a", "user-1"));

    let outcome = block_on(delete_with_reconcile(&service, "user-1", "a"));
    assert!(outcome.is_none());
    assert_eq!(service.delete_calls.get(), 1);
    assert_eq!(service.list_calls.get(), 0);
    assert!(service.rows.borrow().is_empty());
}

#[test]
fn failed_delete_refetches_the_full_list() {
    let service = FakeService::signed_in("user-1", "a@b.c");
    service.rows.borrow_mut().push(row("a", "user-1"));
    *service.fail_delete_with.borrow_mut() = Some("delete rejected".to_owned());

    let outcome = block_on(delete_with_reconcile(&service, "user-1", "a")).expect("reconciled");
    let items = outcome.expect("fetch succeeds");
    assert_eq!(service.list_calls.get(), 1);
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].id, "a");
}

#[test]
fn failed_delete_restores_the_optimistically_removed_row() {
    let service = FakeService::signed_in("user-1", "a@b.c");
    service.rows.borrow_mut().push(row("a", "user-1"));
    *service.fail_delete_with.borrow_mut() = Some("delete rejected".to_owned());

    // The component removes the row locally, then reconciles.
    let mut state = BookmarksState::default();
    state.reset_for_owner(Some("user-1".to_owned()));
    state.finish_load(Ok(vec![row("a", "user-1")]));
    state.begin_delete("a");
    state.remove("a");
    assert!(!state.contains("a"));

    let reconciled = block_on(delete_with_reconcile(&service, "user-1", "a")).expect("reconciled");
    state.finish_load(reconciled);
    assert!(state.contains("a"));
    assert!(state.error.is_none());
}

#[test]
fn failed_delete_and_failed_refetch_surface_the_fetch_error() {
    let service = FakeService::signed_in("user-1", "a@b.c");
    *service.fail_delete_with.borrow_mut() = Some("delete rejected".to_owned());
    *service.fail_list_with.borrow_mut() = Some("fetch failed: 500".to_owned());

    let mut state = BookmarksState::default();
    state.reset_for_owner(Some("user-1".to_owned()));
    state.finish_load(Ok(vec![row("a", "user-1")]));
    state.remove("a");

    let reconciled = block_on(delete_with_reconcile(&service, "user-1", "a")).expect("reconciled");
    state.finish_load(reconciled);
    assert!(state.items.is_empty());
    assert_eq!(state.error.as_deref(), Some("fetch failed: 500"));
}

// =============================================================
// display_date
// =============================================================

#[test]
fn display_date_takes_the_date_portion() {
    assert_eq!(display_date("2026-08-07T12:34:56Z"), "2026-08-07");
}

#[test]
fn display_date_passes_through_unexpected_formats() {
    assert_eq!(display_date("yesterday"), "yesterday");
}

use super::*;

fn bookmark(id: &str, owner: &str, created_at: &str) -> Bookmark {
    Bookmark {
        id: id.to_owned(),
        owner: owner.to_owned(),
        url: format!("https://example.com/{id}"),
        title: format!("Bookmark {id}"),
        created_at: created_at.to_owned(),
    }
}

fn loaded_state(ids: &[&str]) -> BookmarksState {
    let mut state = BookmarksState::default();
    state.reset_for_owner(Some("user-1".to_owned()));
    let items = ids
        .iter()
        .enumerate()
        .map(|(i, id)| bookmark(id, "user-1", &format!("2026-08-0{}T00:00:00Z", 9 - i)))
        .collect();
    state.finish_load(Ok(items));
    state
}

// =============================================================
// Reset / initial load
// =============================================================

#[test]
fn default_state_is_empty_and_idle() {
    let state = BookmarksState::default();
    assert!(state.items.is_empty());
    assert!(!state.loading);
    assert!(state.owner.is_none());
}

#[test]
fn reset_for_owner_starts_loading() {
    let mut state = BookmarksState::default();
    state.reset_for_owner(Some("user-1".to_owned()));
    assert!(state.loading);
    assert_eq!(state.owner.as_deref(), Some("user-1"));
}

#[test]
fn switching_owner_empties_the_previous_list() {
    let mut state = loaded_state(&["a", "b"]);
    state.reset_for_owner(Some("user-2".to_owned()));
    assert!(state.items.is_empty());
    assert!(state.error.is_none());
    assert_eq!(state.owner.as_deref(), Some("user-2"));
}

#[test]
fn reset_to_no_owner_clears_without_loading() {
    let mut state = loaded_state(&["a"]);
    state.reset_for_owner(None);
    assert!(state.items.is_empty());
    assert!(!state.loading);
}

#[test]
fn finish_load_success_populates_and_clears_loading() {
    let mut state = BookmarksState::default();
    state.reset_for_owner(Some("user-1".to_owned()));
    state.finish_load(Ok(vec![bookmark("a", "user-1", "2026-08-02T00:00:00Z")]));
    assert!(!state.loading);
    assert_eq!(state.items.len(), 1);
    assert!(state.error.is_none());
}

#[test]
fn finish_load_failure_surfaces_error_with_empty_list() {
    let mut state = loaded_state(&["a"]);
    state.finish_load(Err("fetch failed: 500".to_owned()));
    assert!(state.items.is_empty());
    assert_eq!(state.error.as_deref(), Some("fetch failed: 500"));
    assert!(!state.loading);
}

// =============================================================
// Feed events
// =============================================================

#[test]
fn insert_event_prepends() {
    let mut state = loaded_state(&["b", "c"]);
    state.apply_event(ChangeEvent::Insert(bookmark("a", "user-1", "2026-08-09T00:00:00Z")));
    let ids: Vec<&str> = state.items.iter().map(|b| b.id.as_str()).collect();
    assert_eq!(ids, ["a", "b", "c"]);
}

#[test]
fn insert_of_present_id_is_idempotent() {
    let mut state = loaded_state(&["a", "b"]);
    state.apply_event(ChangeEvent::Insert(bookmark("a", "user-1", "2026-08-09T00:00:00Z")));
    assert_eq!(state.items.len(), 2);
    assert_eq!(state.items.iter().filter(|b| b.id == "a").count(), 1);
}

#[test]
fn delete_event_removes_matching_id() {
    let mut state = loaded_state(&["a", "b"]);
    state.apply_event(ChangeEvent::Delete { id: "a".to_owned() });
    assert!(!state.contains("a"));
    assert!(state.contains("b"));
}

#[test]
fn deleting_an_absent_id_is_a_no_op() {
    let mut state = loaded_state(&["a"]);
    state.apply_event(ChangeEvent::Delete { id: "zz".to_owned() });
    assert_eq!(state.items.len(), 1);
}

#[test]
fn update_event_replaces_in_place() {
    let mut state = loaded_state(&["a", "b"]);
    let mut changed = bookmark("b", "user-1", "2026-08-08T00:00:00Z");
    changed.title = "Renamed".to_owned();
    state.apply_event(ChangeEvent::Update(changed));
    let ids: Vec<&str> = state.items.iter().map(|b| b.id.as_str()).collect();
    assert_eq!(ids, ["a", "b"]);
    assert_eq!(state.items[1].title, "Renamed");
}

#[test]
fn update_event_for_absent_id_is_a_no_op() {
    let mut state = loaded_state(&["a"]);
    state.apply_event(ChangeEvent::Update(bookmark("zz", "user-1", "2026-08-08T00:00:00Z")));
    assert_eq!(state.items.len(), 1);
    assert!(!state.contains("zz"));
}

// =============================================================
// Optimistic deletes interleaved with the feed
// =============================================================

#[test]
fn optimistic_delete_then_feed_delete_converges() {
    let mut state = loaded_state(&["a", "b"]);
    state.begin_delete("a");
    state.remove("a"); // optimistic local removal
    state.apply_event(ChangeEvent::Delete { id: "a".to_owned() }); // feed echo
    assert!(!state.contains("a"));
    assert_eq!(state.items.len(), 1);
    assert!(state.deleting.is_none());
}

#[test]
fn feed_delete_then_optimistic_delete_converges() {
    let mut state = loaded_state(&["a", "b"]);
    state.apply_event(ChangeEvent::Delete { id: "a".to_owned() });
    state.remove("a");
    assert!(!state.contains("a"));
    assert_eq!(state.items.len(), 1);
}

#[test]
fn final_list_contains_id_iff_no_delete_was_observed() {
    // Exhaust all interleavings of one insert, one local delete, and one
    // feed delete for the same id: the row survives only in orderings where
    // no delete follows it.
    let insert = || ChangeEvent::Insert(bookmark("x", "user-1", "2026-08-09T00:00:00Z"));
    let feed_delete = || ChangeEvent::Delete { id: "x".to_owned() };

    // Each op: (apply, is_delete)
    let sequences: Vec<Vec<(&str, bool)>> = vec![
        vec![("insert", false), ("local", true), ("feed", true)],
        vec![("insert", false), ("feed", true), ("local", true)],
        vec![("local", true), ("insert", false), ("feed", true)],
        vec![("feed", true), ("insert", false), ("local", true)],
        vec![("local", true), ("feed", true), ("insert", false)],
        vec![("feed", true), ("local", true), ("insert", false)],
    ];

    for sequence in sequences {
        let mut state = loaded_state(&[]);
        let mut delete_seen_after_insert = false;
        let mut inserted = false;
        for (op, is_delete) in &sequence {
            match *op {
                "insert" => {
                    state.apply_event(insert());
                    inserted = true;
                    delete_seen_after_insert = false;
                }
                "local" => state.remove("x"),
                "feed" => state.apply_event(feed_delete()),
                _ => unreachable!(),
            }
            if *is_delete && inserted {
                delete_seen_after_insert = true;
            }
        }
        let expect_present = inserted && !delete_seen_after_insert;
        assert_eq!(
            state.contains("x"),
            expect_present,
            "sequence {sequence:?} should leave presence = {expect_present}"
        );
    }
}

#[test]
fn round_trip_fetch_after_insert_yields_exactly_one_head_row() {
    // Feed insert arrives, then a full fetch (already containing the row)
    // replaces the list: the row appears exactly once, at the head.
    let mut state = BookmarksState::default();
    state.reset_for_owner(Some("user-1".to_owned()));
    state.apply_event(ChangeEvent::Insert(bookmark("new", "user-1", "2026-08-09T00:00:00Z")));
    state.finish_load(Ok(vec![
        bookmark("new", "user-1", "2026-08-09T00:00:00Z"),
        bookmark("old", "user-1", "2026-08-01T00:00:00Z"),
    ]));
    assert_eq!(state.items.iter().filter(|b| b.id == "new").count(), 1);
    assert_eq!(state.items[0].id, "new");
}

// =============================================================
// Delete-in-flight flag
// =============================================================

#[test]
fn begin_delete_marks_the_row() {
    let mut state = loaded_state(&["a"]);
    state.begin_delete("a");
    assert_eq!(state.deleting.as_deref(), Some("a"));
}

#[test]
fn removing_the_row_clears_its_delete_flag() {
    let mut state = loaded_state(&["a"]);
    state.begin_delete("a");
    state.remove("a");
    assert!(state.deleting.is_none());
}

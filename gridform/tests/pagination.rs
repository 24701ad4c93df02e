//! Tests for the pagination adapter.

use std::sync::{Arc, Mutex};

use gridform::pagination::{
    DEFAULT_PAGE_SIZES, PageEvent, PaginationState, Paginator,
};

fn capture(paginator: &Paginator) -> Arc<Mutex<Vec<PageEvent>>> {
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = events.clone();
    paginator.on_event(move |event| sink.lock().unwrap().push(event));
    events
}

#[test]
fn test_default_state() {
    let state = PaginationState::default();
    assert_eq!(state.page_num, 1);
    assert_eq!(state.page_size, 10);
    assert_eq!(state.total, 0);
    assert_eq!(state.index_offset(), 0);
}

#[test]
fn test_index_offset() {
    let state = PaginationState {
        page_num: 3,
        page_size: 20,
        total: 100,
    };
    assert_eq!(state.index_offset(), 40);
}

#[test]
fn test_default_page_sizes() {
    let paginator = Paginator::new(PaginationState::default());
    assert_eq!(paginator.page_sizes(), DEFAULT_PAGE_SIZES);
}

#[test]
fn test_current_change_emits_sync_then_combined() {
    let paginator = Paginator::new(PaginationState {
        page_num: 1,
        page_size: 10,
        total: 100,
    });
    let events = capture(&paginator);

    paginator.handle_current_change(4);

    assert_eq!(paginator.state().page_num, 4);
    assert_eq!(
        *events.lock().unwrap(),
        vec![
            PageEvent::PageNum(4),
            PageEvent::Pagination {
                page_num: 4,
                page_size: 10,
            },
        ]
    );
}

#[test]
fn test_size_change_within_bounds_keeps_page() {
    let paginator = Paginator::new(PaginationState {
        page_num: 2,
        page_size: 10,
        total: 100,
    });
    let events = capture(&paginator);

    paginator.handle_size_change(20);

    let state = paginator.state();
    assert_eq!(state.page_num, 2);
    assert_eq!(state.page_size, 20);
    assert_eq!(
        *events.lock().unwrap(),
        vec![
            PageEvent::PageSize(20),
            PageEvent::Pagination {
                page_num: 2,
                page_size: 20,
            },
        ]
    );
}

#[test]
fn test_size_change_past_the_end_resets_page() {
    let paginator = Paginator::new(PaginationState {
        page_num: 3,
        page_size: 10,
        total: 25,
    });
    let events = capture(&paginator);

    // 3 * 20 > 25, the current page no longer exists at the new size
    paginator.handle_size_change(20);

    let state = paginator.state();
    assert_eq!(state.page_num, 1);
    assert_eq!(state.page_size, 20);
    assert_eq!(
        *events.lock().unwrap(),
        vec![
            PageEvent::PageNum(1),
            PageEvent::PageSize(20),
            PageEvent::Pagination {
                page_num: 1,
                page_size: 20,
            },
        ]
    );
}

#[test]
fn test_sync_replaces_state_without_events() {
    let paginator = Paginator::new(PaginationState::default());
    let events = capture(&paginator);

    paginator.sync(PaginationState {
        page_num: 2,
        page_size: 50,
        total: 500,
    });

    assert_eq!(paginator.index_offset(), 50);
    assert!(events.lock().unwrap().is_empty());
}

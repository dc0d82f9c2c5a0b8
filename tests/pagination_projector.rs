use proptest::prelude::*;

use listsync::engine::pagination::{Pager, project, total_pages};

#[test]
fn total_pages_never_below_one() {
    assert_eq!(total_pages(0, 25), 1);
    assert_eq!(total_pages(25, 25), 1);
    assert_eq!(total_pages(26, 25), 2);
    assert_eq!(total_pages(30, 0), 30);
}

#[test]
fn shrinking_collection_clamps_page() {
    let mut pager = Pager::new(25);
    let p = pager.set_page(2, 30);
    assert_eq!((p.current_page, p.total_pages, p.start, p.end), (2, 2, 25, 30));

    assert!(pager.clamp_to(10));
    assert_eq!(pager.current_page(), 1);
    assert_eq!(pager.projection(10).total_pages, 1);
}

#[test]
fn growing_collection_keeps_page() {
    let mut pager = Pager::new(10);
    pager.set_page(3, 30);
    assert!(!pager.clamp_to(31));
    assert_eq!(pager.current_page(), 3);
}

#[test]
fn next_and_prev_stop_at_bounds() {
    let mut pager = Pager::new(10);
    assert_eq!(pager.prev(25).current_page, 1);
    assert_eq!(pager.next(25).current_page, 2);
    assert_eq!(pager.next(25).current_page, 3);
    assert_eq!(pager.next(25).current_page, 3);
    pager.reset();
    assert_eq!(pager.current_page(), 1);
}

#[test]
fn window_slices_the_page() {
    let items: Vec<u32> = (0..30).collect();
    let p = project(items.len(), 25, 2);
    assert_eq!(p.window(&items), &items[25..30]);

    let empty: Vec<u32> = Vec::new();
    let p = project(0, 25, 4);
    assert_eq!(p.current_page, 1);
    assert!(p.window(&empty).is_empty());
}

proptest! {
    #[test]
    fn projection_stays_in_bounds(len in 0usize..500, page_size in 1usize..60, page in 0usize..40) {
        let p = project(len, page_size, page);
        prop_assert!(p.current_page >= 1);
        prop_assert!(p.current_page <= p.total_pages);
        prop_assert_eq!(p.total_pages, total_pages(len, page_size));
        prop_assert!(p.start <= p.end);
        prop_assert!(p.end <= len);
        prop_assert!(p.end - p.start <= page_size);
    }

    #[test]
    fn windows_partition_the_collection(len in 0usize..300, page_size in 1usize..40) {
        let items: Vec<usize> = (0..len).collect();
        let pages = total_pages(len, page_size);
        let mut seen = Vec::new();
        for page in 1..=pages {
            seen.extend_from_slice(project(len, page_size, page).window(&items));
        }
        prop_assert_eq!(seen, items);
    }
}

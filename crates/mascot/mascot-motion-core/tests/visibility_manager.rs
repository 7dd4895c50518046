use mascot_motion_core::{
    host::{Rect, CLASS_VISIBLE},
    visibility::{DECOR_ROOT_MARGIN, DECOR_THRESHOLD},
    ElementId, ScrollDirection, VisibilityManager,
};
use mascot_test_fixtures::{FakeHost, HostOp};

const DECOR: &str = ".illustration";

fn with_decor(n: usize) -> (FakeHost, Vec<ElementId>, VisibilityManager) {
    let mut host = FakeHost::new();
    let els = (0..n)
        .map(|i| host.add_element(DECOR, Rect::new(0.0, 300.0 * i as f64, 200.0, 200.0)))
        .collect();
    let mgr = VisibilityManager::attach(DECOR, 0.0, &mut host);
    (host, els, mgr)
}

#[test]
fn observes_every_match_with_decor_margin() {
    let (host, els, mgr) = with_decor(3);
    assert_eq!(mgr.elements(), els.as_slice());
    for el in &els {
        let opts = host.observe_options(*el).expect("observed");
        assert_eq!(opts.root_margin, DECOR_ROOT_MARGIN);
        assert_eq!(opts.threshold, DECOR_THRESHOLD);
    }
}

#[test]
fn elements_toggle_independently() {
    let (mut host, els, mut mgr) = with_decor(2);
    mgr.on_intersection(els[0], true, &mut host);
    assert!(host.has_class(els[0], CLASS_VISIBLE));
    assert!(!host.has_class(els[1], CLASS_VISIBLE));

    mgr.on_intersection(els[1], true, &mut host);
    mgr.on_intersection(els[0], false, &mut host);
    assert!(!host.has_class(els[0], CLASS_VISIBLE));
    assert!(host.has_class(els[1], CLASS_VISIBLE));
}

#[test]
fn foreign_elements_are_ignored() {
    let (mut host, _els, mut mgr) = with_decor(1);
    let stranger = host.add_element(".other", Rect::default());
    host.clear_ops();
    mgr.on_intersection(stranger, true, &mut host);
    assert!(host.ops().is_empty());
}

#[test]
fn empty_selector_is_fine() {
    let mut host = FakeHost::new();
    let mut mgr = VisibilityManager::attach(".nothing", 0.0, &mut host);
    assert!(mgr.elements().is_empty());
    mgr.detach(&mut host);
    assert!(host.ops().is_empty());
}

#[test]
fn scroll_direction_is_evaluated_once_per_frame() {
    let (mut host, _els, mut mgr) = with_decor(1);
    assert_eq!(mgr.scroll_direction(), None);

    mgr.on_scroll(10.0, &mut host);
    mgr.on_scroll(40.0, &mut host);
    mgr.on_scroll(80.0, &mut host);
    let requests = host
        .ops()
        .iter()
        .filter(|op| matches!(op, HostOp::RequestFrame(_)))
        .count();
    assert_eq!(requests, 1);
    // Nothing is derived until the frame fires.
    assert_eq!(mgr.scroll_direction(), None);

    host.run_frame(16.0, |_, handle, _| {
        assert!(mgr.on_frame(handle));
    });
    assert_eq!(mgr.scroll_direction(), Some(ScrollDirection::Down));

    mgr.on_scroll(30.0, &mut host);
    host.run_frame(32.0, |_, handle, _| {
        mgr.on_frame(handle);
    });
    assert_eq!(mgr.scroll_direction(), Some(ScrollDirection::Up));

    // No movement keeps the previous direction.
    mgr.on_scroll(30.0, &mut host);
    host.run_frame(48.0, |_, handle, _| {
        mgr.on_frame(handle);
    });
    assert_eq!(mgr.scroll_direction(), Some(ScrollDirection::Up));
}

#[test]
fn detach_cancels_pending_frame_and_unobserves() {
    let (mut host, els, mut mgr) = with_decor(2);
    mgr.on_scroll(100.0, &mut host);
    assert_eq!(host.pending_frames(), 1);

    mgr.detach(&mut host);
    assert_eq!(host.pending_frames(), 0);
    for el in els {
        assert!(!host.is_observed(el));
    }
    assert!(mgr.elements().is_empty());
}

use approx::assert_relative_eq;
use mascot_motion_core::{
    config::{MascotConfig, MascotOptions},
    host::{Rect, CLASS_VISIBLE},
    motion::pose_at,
    ConfigError, ElementId, MascotAnimator, Phase, Point,
};
use mascot_test_fixtures::{FakeHost, HostOp};

const SELECTOR: &str = ".mundo-mascot";

fn setup() -> (FakeHost, ElementId, MascotAnimator) {
    let mut host = FakeHost::new();
    let el = host.add_element(SELECTOR, Rect::new(100.0, 200.0, 80.0, 120.0));
    let anim = MascotAnimator::attach(SELECTOR, &MascotOptions::default(), &mut host)
        .expect("default options are valid");
    (host, el, anim)
}

fn run_timers(host: &mut FakeHost, anim: &mut MascotAnimator, until: f64) {
    host.run_timers_until(until, |h, handle, at| {
        anim.on_timer(handle, at, h);
    });
}

fn run_frame(host: &mut FakeHost, anim: &mut MascotAnimator, at: f64) {
    host.run_frame(at, |h, handle, now| {
        anim.on_frame(handle, now, h);
    });
}

fn frame_requests(host: &FakeHost) -> usize {
    host.ops()
        .iter()
        .filter(|op| matches!(op, HostOp::RequestFrame(_)))
        .count()
}

#[test]
fn attach_observes_and_measures_center() {
    let (host, el, anim) = setup();
    assert!(anim.is_attached());
    assert_eq!(anim.element(), Some(el));
    assert_eq!(anim.phase(), Phase::Hidden);
    assert_eq!(anim.element_center(), Some(Point::new(140.0, 260.0)));
    let opts = host.observe_options(el).expect("mascot observed");
    assert_eq!(opts.threshold, 0.3);
    assert_eq!(host.pending_frames(), 0);
    assert_eq!(host.pending_timers(), 0);
}

#[test]
fn entrance_waits_for_delay_plus_settle() {
    let (mut host, el, mut anim) = setup();
    let cfg = MascotConfig::default();

    anim.on_visibility(true, &mut host);
    assert_eq!(anim.phase(), Phase::Entering);
    assert!(!host.has_class(el, CLASS_VISIBLE));

    // Just before the reveal.
    run_timers(&mut host, &mut anim, cfg.entrance_delay - 1.0);
    assert!(!host.has_class(el, CLASS_VISIBLE));

    run_timers(&mut host, &mut anim, cfg.entrance_delay);
    assert!(host.has_class(el, CLASS_VISIBLE));
    assert_eq!(anim.phase(), Phase::Entering);

    // Just before floating: no frame requested yet.
    run_timers(&mut host, &mut anim, cfg.time_to_float() - 1.0);
    assert_eq!(anim.phase(), Phase::Entering);
    assert_eq!(frame_requests(&host), 0);

    run_timers(&mut host, &mut anim, cfg.time_to_float());
    assert_eq!(anim.phase(), Phase::Floating);
    assert_eq!(host.pending_frames(), 1);
}

#[test]
fn floating_writes_pose_each_frame() {
    let (mut host, el, mut anim) = setup();
    let cfg = MascotConfig::default();
    anim.on_visibility(true, &mut host);
    let start = cfg.time_to_float();
    run_timers(&mut host, &mut anim, start);

    run_frame(&mut host, &mut anim, start + 250.0);
    let expected = pose_at(&cfg, 250.0, None, Point::new(140.0, 260.0));
    assert_eq!(anim.last_pose(), Some(expected));
    assert_eq!(
        host.style(el, "transform"),
        Some(expected.transform_css().as_str())
    );
    assert_eq!(
        host.style(el, "filter"),
        Some(expected.shadow.to_css().as_str())
    );
    // The loop keeps itself alive.
    assert_eq!(host.pending_frames(), 1);

    run_frame(&mut host, &mut anim, start + 500.0);
    let second = anim.last_pose().expect("pose");
    assert_relative_eq!(
        second.translate_y,
        pose_at(&cfg, 500.0, None, Point::new(140.0, 260.0)).translate_y,
        epsilon = 1e-12
    );
}

#[test]
fn leaving_viewport_stops_the_loop_immediately() {
    let (mut host, el, mut anim) = setup();
    let cfg = MascotConfig::default();
    anim.on_visibility(true, &mut host);
    run_timers(&mut host, &mut anim, cfg.time_to_float());
    run_frame(&mut host, &mut anim, cfg.time_to_float() + 16.0);
    assert_eq!(host.pending_frames(), 1);

    anim.on_visibility(false, &mut host);
    assert_eq!(anim.phase(), Phase::Hidden);
    assert!(!host.has_class(el, CLASS_VISIBLE));
    assert_eq!(host.pending_frames(), 0);

    host.clear_ops();
    run_frame(&mut host, &mut anim, cfg.time_to_float() + 32.0);
    assert!(host.ops().is_empty(), "no work after leaving: {:?}", host.ops());
}

#[test]
fn leaving_during_entrance_cancels_pending_timers() {
    let (mut host, el, mut anim) = setup();
    let cfg = MascotConfig::default();
    anim.on_visibility(true, &mut host);
    run_timers(&mut host, &mut anim, cfg.entrance_delay);
    assert!(host.has_class(el, CLASS_VISIBLE));

    anim.on_visibility(false, &mut host);
    assert_eq!(anim.phase(), Phase::Hidden);
    assert!(!host.has_class(el, CLASS_VISIBLE));
    assert_eq!(host.pending_timers(), 0);

    run_timers(&mut host, &mut anim, 10_000.0);
    assert_eq!(anim.phase(), Phase::Hidden);
    assert_eq!(frame_requests(&host), 0);
}

#[test]
fn reentry_restarts_entrance_and_clock() {
    let (mut host, _el, mut anim) = setup();
    let cfg = MascotConfig::default();
    anim.on_visibility(true, &mut host);
    run_timers(&mut host, &mut anim, cfg.time_to_float());
    anim.on_visibility(false, &mut host);

    let back = 5_000.0;
    run_timers(&mut host, &mut anim, back);
    anim.on_visibility(true, &mut host);
    assert_eq!(anim.phase(), Phase::Entering);
    run_timers(&mut host, &mut anim, back + cfg.time_to_float());
    assert_eq!(anim.phase(), Phase::Floating);

    // Elapsed time counts from the new floating start.
    run_frame(&mut host, &mut anim, back + cfg.time_to_float() + 100.0);
    let expected = pose_at(&cfg, 100.0, None, Point::new(140.0, 260.0));
    assert_eq!(anim.last_pose(), Some(expected));
}

#[test]
fn duplicate_events_are_ignored() {
    let (mut host, _el, mut anim) = setup();
    anim.on_visibility(false, &mut host);
    assert!(host.ops().iter().all(|op| !op.is_mutation()));

    anim.on_visibility(true, &mut host);
    anim.on_visibility(true, &mut host);
    assert_eq!(host.pending_timers(), 1);
}

#[test]
fn pointer_offset_follows_latest_position() {
    let (mut host, _el, mut anim) = setup();
    let cfg = MascotConfig::default();
    anim.on_visibility(true, &mut host);
    run_timers(&mut host, &mut anim, cfg.time_to_float());

    // Pointer exactly on the center contributes nothing.
    anim.on_pointer_move(140.0, 260.0);
    run_frame(&mut host, &mut anim, cfg.time_to_float());
    let still = anim.last_pose().expect("pose");
    assert_eq!(still, pose_at(&cfg, 0.0, None, Point::ZERO));

    anim.on_pointer_move(0.0, 0.0);
    anim.on_pointer_move(240.0, 260.0);
    run_frame(&mut host, &mut anim, cfg.time_to_float());
    let nudged = anim.last_pose().expect("pose");
    assert_relative_eq!(nudged.translate_x - still.translate_x, 2.0, epsilon = 1e-9);
    assert_relative_eq!(nudged.translate_y, still.translate_y, epsilon = 1e-12);
}

#[test]
fn resize_recomputes_center() {
    let (mut host, el, mut anim) = setup();
    host.set_rect(el, Rect::new(0.0, 0.0, 50.0, 50.0));
    assert_eq!(anim.element_center(), Some(Point::new(140.0, 260.0)));
    anim.on_resize(&mut host);
    assert_eq!(anim.element_center(), Some(Point::new(25.0, 25.0)));
}

#[test]
fn stale_frame_handles_do_nothing() {
    let (mut host, _el, mut anim) = setup();
    let cfg = MascotConfig::default();
    anim.on_visibility(true, &mut host);
    run_timers(&mut host, &mut anim, cfg.time_to_float());
    host.clear_ops();
    assert!(!anim.on_frame(mascot_motion_core::FrameHandle(999), 5_000.0, &mut host));
    assert!(host.ops().is_empty());
}

#[test]
fn detach_cancels_everything() {
    let (mut host, el, mut anim) = setup();
    let cfg = MascotConfig::default();
    anim.on_visibility(true, &mut host);
    run_timers(&mut host, &mut anim, cfg.time_to_float());
    anim.wave(&mut host);

    anim.detach(&mut host);
    assert!(!anim.is_attached());
    assert_eq!(host.pending_frames(), 0);
    assert_eq!(host.pending_timers(), 0);
    assert!(!host.is_observed(el));
}

#[test]
fn invalid_options_are_rejected_before_touching_the_page() {
    let mut host = FakeHost::new();
    host.add_element(SELECTOR, Rect::default());
    let opts = MascotOptions {
        float_amplitude: Some(-3.0),
        ..Default::default()
    };
    let err = MascotAnimator::attach(SELECTOR, &opts, &mut host).unwrap_err();
    assert_eq!(
        err,
        ConfigError::Negative {
            field: "float_amplitude",
            value: -3.0
        }
    );
    assert!(host.ops().is_empty());
}

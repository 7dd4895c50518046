use mascot_motion_core::{MascotAnimator, MascotOptions, Rect};
use mascot_test_fixtures::FakeHost;
use serde_json::to_string_pretty;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut host = FakeHost::new();
    host.add_element(".mundo-mascot", Rect::new(600.0, 400.0, 160.0, 200.0));

    let opts: MascotOptions =
        serde_json::from_str(r#"{ "entranceDelay": 0, "floatAmplitude": 14 }"#)?;
    let mut mascot = MascotAnimator::attach(".mundo-mascot", &opts, &mut host)?;

    // Scroll the mascot into view and let the entrance play out.
    mascot.on_visibility(true, &mut host);
    host.run_timers_until(800.0, |h, t, now| {
        mascot.on_timer(t, now, h);
    });
    mascot.on_pointer_move(900.0, 300.0);

    // One second of 60 fps frames.
    let mut poses = Vec::new();
    for i in 1..=60 {
        let at = 800.0 + i as f64 * 1000.0 / 60.0;
        host.run_frame(at, |h, f, now| {
            mascot.on_frame(f, now, h);
        });
        if i % 15 == 0 {
            poses.extend(mascot.last_pose());
        }
    }

    println!("Sampled poses:\n{}", to_string_pretty(&poses)?);
    mascot.detach(&mut host);
    Ok(())
}

use face_arena_rendering_macroquad::EyeLatch;

fn run_sequence(held: &[bool]) -> Vec<(bool, bool)> {
    let mut latch = EyeLatch::default();
    held.iter().map(|&closed| latch.observe(closed)).collect()
}

#[test]
fn blink_fires_once_per_release() {
    let held = [false, true, true, false, false, true, false];
    let expected = vec![
        (false, false),
        (true, false),
        (true, false),
        (false, true),
        (false, false),
        (true, false),
        (false, true),
    ];

    let first_run = run_sequence(&held);
    let second_run = run_sequence(&held);

    assert_eq!(first_run, expected);
    assert_eq!(first_run, second_run);
}

#[test]
fn open_eyes_never_blink() {
    assert!(run_sequence(&[false; 8]).iter().all(|&(_, blink)| !blink));
}

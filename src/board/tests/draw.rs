//! Draw detection tests.

use crate::uci::Engine;

fn play_all(engine: &mut Engine, moves: &[&str]) {
    for text in moves {
        assert!(!engine.play(text).is_illegal(), "move {text} is legal");
    }
}

#[test]
fn test_threefold_repetition_is_draw() {
    let mut engine = Engine::with_config(1, 1);
    // Each 4-ply rotation cycle returns to the opening position.
    let cycle = ["a0R", "a7L", "a0L", "a7R"];
    play_all(&mut engine, &cycle);
    assert!(!engine.is_drawn(), "two occurrences are not a draw");
    play_all(&mut engine, &cycle);
    assert!(engine.is_drawn(), "third occurrence draws");
}

#[test]
fn test_no_progress_rule() {
    let mut engine = Engine::with_config(1, 1);
    engine.options_mut().set("nmoves_draw", 1);
    assert!(!engine.is_drawn());
    play_all(&mut engine, &["a0R", "a7L"]);
    assert!(engine.is_drawn(), "two victimless plies hit the limit");
}

#[test]
fn test_detect_draws_off_disables_everything() {
    let mut engine = Engine::with_config(1, 1);
    engine.options_mut().set("detect_draws", 0);
    let cycle = ["a0R", "a7L", "a0L", "a7R"];
    for _ in 0..3 {
        play_all(&mut engine, &cycle);
    }
    assert!(!engine.is_drawn());
}

#[test]
fn test_single_repetition_after_zap_not_draw() {
    let mut engine = Engine::with_config(1, 1);
    // The self-squash resets the progress counter; one rotation cycle
    // afterwards repeats the post-zap position only twice.
    assert_eq!(engine.play("b1a1").count, 1);
    play_all(&mut engine, &["a7L", "a0R", "a7R", "a0L"]);
    assert!(!engine.is_drawn());
}

use super::*;

#[test]
fn counter_starts_idle() {
    assert!(!ProgressCounter::new().is_active());
}

#[test]
fn counter_stays_active_until_every_start_is_done() {
    let progress = ProgressCounter::new();
    progress.start();
    progress.start();
    progress.done();
    assert!(progress.is_active());
    progress.done();
    assert!(!progress.is_active());
}

#[test]
fn extra_done_does_not_underflow() {
    let progress = ProgressCounter::new();
    progress.done();
    progress.start();
    assert!(progress.is_active());
}

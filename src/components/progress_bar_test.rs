use super::*;

#[test]
fn bar_stays_visible_across_overlapping_transitions() {
    let owner = Owner::new();
    owner.with(|| {
        let visible = RwSignal::new(false);
        let bar = BarProgress::new(visible);

        bar.start();
        bar.start();
        assert!(visible.get_untracked());
        bar.done();
        assert!(visible.get_untracked());
        bar.done();
        assert!(!visible.get_untracked());
    });
}

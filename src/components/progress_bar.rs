//! Thin bar across the top of the page while a route transition is checked.

#[cfg(test)]
#[path = "progress_bar_test.rs"]
mod progress_bar_test;

use leptos::prelude::*;

use crate::router::progress::{ProgressCounter, ProgressIndicator};

/// Visibility of the bar, provided as context by `App`.
#[derive(Clone, Copy, Debug)]
pub struct NavigationProgress(pub RwSignal<bool>);

/// [`ProgressIndicator`] that mirrors overlapping transitions into a signal.
pub struct BarProgress {
    counter: ProgressCounter,
    visible: RwSignal<bool>,
}

impl BarProgress {
    #[must_use]
    pub fn new(visible: RwSignal<bool>) -> Self {
        Self { counter: ProgressCounter::new(), visible }
    }

    fn publish(&self) {
        self.visible.set(self.counter.is_active());
    }
}

impl ProgressIndicator for BarProgress {
    fn start(&self) {
        self.counter.start();
        self.publish();
    }

    fn done(&self) {
        self.counter.done();
        self.publish();
    }
}

#[component]
pub fn ProgressBar() -> impl IntoView {
    let progress = expect_context::<NavigationProgress>();
    view! {
        <div
            class="progress-bar"
            class:progress-bar--active=move || progress.0.get()
            role="progressbar"
            aria-hidden=move || (!progress.0.get()).to_string()
        ></div>
    }
}

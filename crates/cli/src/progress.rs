use std::sync::LazyLock;

use indicatif::{ProgressBar, ProgressStyle};
use kami_core::downloads::ProgressSink;

const PB_STYLE: &str = "{spinner:.blue} {prefix:>12.cyan.bold} [{elapsed_precise}] {wide_bar:.cyan/blue} {bytes}/{total_bytes} ({bytes_per_sec}, {eta})";

const TICK: &str = "⠁⠂⠄⡀⢀⠠⠐⠈ ";

const PB_CHARS: &str = "█▓▒░  ";

static PB_TEMPLATE: LazyLock<Option<ProgressStyle>> = LazyLock::new(|| {
    ProgressStyle::with_template(PB_STYLE)
        .ok()
        .map(|style| style.tick_chars(TICK).progress_chars(PB_CHARS))
});

/// Download progress drawn as an `indicatif` bar.
pub struct ProgressBarSink {
    pb: ProgressBar,
}

impl ProgressBarSink {
    pub fn new(prefix: &str) -> Self {
        let pb = ProgressBar::hidden().with_prefix(prefix.to_owned());
        let pb = match PB_TEMPLATE.as_ref() {
            Some(style) => pb.with_style(style.clone()),
            None => pb,
        };

        Self { pb }
    }
}

impl ProgressSink for ProgressBarSink {
    fn begin(&self, total: Option<u64>) {
        self.pb.set_draw_target(indicatif::ProgressDrawTarget::stderr());
        if let Some(total) = total {
            self.pb.set_length(total);
        }
        self.pb.set_position(0);
    }

    fn advance(&self, bytes: u64) {
        self.pb.inc(bytes);
    }

    fn finish(&self) {
        self.pb.finish();
    }
}

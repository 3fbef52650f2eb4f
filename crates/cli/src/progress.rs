use anyhow::Result;
use autobind_graph::ProgressSink;
use indicatif::{ProgressBar, ProgressStyle};

/// Renders scan and walk progress on stderr
pub struct BarProgress {
    bar: ProgressBar,
}

impl BarProgress {
    pub fn new(message: &'static str, hidden: bool) -> Result<Self> {
        let bar = if hidden {
            ProgressBar::hidden()
        } else {
            let bar = ProgressBar::new(0);
            bar.set_style(
                ProgressStyle::default_bar()
                    .template("{spinner:.green} {msg} [{bar:30.cyan/blue}] {pos}/{len}")?
                    .progress_chars("=> "),
            );
            bar
        };
        bar.set_message(message);
        Ok(Self { bar })
    }
}

impl ProgressSink for BarProgress {
    fn progress(&self, current: usize, total: usize) {
        self.bar.set_length(total as u64);
        self.bar.set_position(current as u64);
    }

    fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

/// Side channel for long graph walks. Not part of any result.
pub trait ProgressSink {
    /// Called after `current` of `total` items have been processed
    fn progress(&self, current: usize, total: usize);

    /// Called once when the walk is over
    fn finish(&self) {}
}

impl ProgressSink for () {
    fn progress(&self, _current: usize, _total: usize) {}
}

impl<F> ProgressSink for F
where
    F: Fn(usize, usize),
{
    fn progress(&self, current: usize, total: usize) {
        self(current, total);
    }
}

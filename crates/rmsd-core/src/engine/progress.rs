/// Progress events emitted while a calculator works through an ensemble.
///
/// A whole-matrix computation reports one phase containing one task whose
/// steps are matrix rows; callers drive spinners or progress bars from
/// these without the engine knowing how they render.
#[derive(Debug, Clone)]
pub enum Progress {
    /// A named phase of the computation has begun.
    PhaseStart { name: String },
    /// The current phase has finished.
    PhaseFinish,
    /// A measurable task with a known number of steps has begun.
    TaskStart { total_steps: u64 },
    /// One step of the current task completed.
    TaskIncrement,
    /// The current task has finished.
    TaskFinish,
    /// A free-form status message.
    Message(String),
}

/// Callback invoked with each [`Progress`] event.
pub type ProgressCallback<'a> = Box<dyn Fn(Progress) + Send + Sync + 'a>;

/// Dispatches progress events to an optional callback.
///
/// A reporter without a callback swallows events, so computation code can
/// report unconditionally.
pub struct ProgressReporter<'a> {
    callback: Option<ProgressCallback<'a>>,
}

impl<'a> ProgressReporter<'a> {
    /// Creates a reporter that discards every event.
    pub fn new() -> Self {
        Self { callback: None }
    }

    /// Creates a reporter that forwards events to `callback`.
    pub fn with_callback(callback: ProgressCallback<'a>) -> Self {
        Self {
            callback: Some(callback),
        }
    }

    /// Sends an event to the callback, if one is attached.
    pub fn report(&self, progress: Progress) {
        if let Some(callback) = &self.callback {
            callback(progress);
        }
    }
}

impl Default for ProgressReporter<'_> {
    fn default() -> Self {
        Self::new()
    }
}

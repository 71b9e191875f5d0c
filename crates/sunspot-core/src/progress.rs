/// Processing stage of a tracking run, used for progress reporting.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    Loading,
    Detecting,
    Tracking,
    Downloading,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Loading => write!(f, "Loading frames"),
            Self::Detecting => write!(f, "Detecting sunspots"),
            Self::Tracking => write!(f, "Tracking"),
            Self::Downloading => write!(f, "Downloading"),
        }
    }
}

/// Progress callbacks for long-running operations.
///
/// All methods have default no-op implementations.
pub trait ProgressReporter: Send + Sync {
    /// A new stage has started with `total_items` work items, if known.
    fn begin_stage(&self, _stage: Stage, _total_items: Option<usize>) {}

    /// `items_done` items of the current stage are complete.
    fn advance(&self, _items_done: usize) {}

    fn finish_stage(&self) {}
}

pub struct NoOpReporter;
impl ProgressReporter for NoOpReporter {}

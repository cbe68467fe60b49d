use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Duration;

use crate::preference::PreferenceCosts;

/// Run parameters for [`assign`](crate::assign).
///
/// ```
/// use std::time::Duration;
/// use course_assigner::AssignerConfig;
///
/// let config = AssignerConfig::default().with_time_limit(Duration::from_secs(5));
/// assert_eq!(config.time_limit, Some(Duration::from_secs(5)));
/// ```
#[derive(Debug, Clone, Default)]
pub struct AssignerConfig {
    pub costs: PreferenceCosts,
    /// Wall-clock budget for the solver, checked between augmentations.
    pub time_limit: Option<Duration>,
    /// Stop after this many augmenting paths; each routes one student or filler.
    pub augmentation_limit: Option<usize>,
    /// Raised by the caller to abort the solver between augmentations.
    pub interrupt: Option<Arc<AtomicBool>>,
}

impl AssignerConfig {
    pub fn with_costs(mut self, costs: PreferenceCosts) -> Self {
        self.costs = costs;
        self
    }

    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    pub fn with_augmentation_limit(mut self, limit: usize) -> Self {
        self.augmentation_limit = Some(limit);
        self
    }

    pub fn with_interrupt(mut self, flag: Arc<AtomicBool>) -> Self {
        self.interrupt = Some(flag);
        self
    }
}

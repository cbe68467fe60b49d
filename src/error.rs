use std::time::Duration;

use thiserror::Error;

/// Problems with the input, detected before any flow network is built.
///
/// Identifiers are carried as rendered strings so the error type stays
/// independent of the caller's id type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("students can't fit into courses: {shortfall} more places needed")]
    Capacity { shortfall: u64 },

    #[error("{surplus} spare seats can't be balanced on this target")]
    SurplusOverflow { surplus: u64 },

    #[error("invalid course {course:?} in preferences of student {student:?}")]
    UnknownCourse { student: String, course: String },

    #[error("student {student:?} lists {count} preferences, at most {max} are allowed")]
    TooManyPreferences {
        student: String,
        count: usize,
        max: usize,
    },

    #[error("student {student:?} lists course {course:?} more than once")]
    DuplicatePreference { student: String, course: String },

    #[error("course {0:?} is defined more than once")]
    DuplicateCourse(String),

    #[error("student {0:?} is defined more than once")]
    DuplicateStudent(String),

    #[error("preference costs must be negative, at least -1e9 and strictly increasing by rank, got {0:?}")]
    InvalidCostScale(Vec<i64>),
}

#[derive(Debug, Error)]
pub enum AssignError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The network or the solver broke one of its own guarantees. Never a user error.
    #[error("internal invariant violated: {0}")]
    InternalInvariant(String),

    #[error("solver aborted after {augmentations} augmentations ({elapsed:?} elapsed)")]
    Timeout {
        elapsed: Duration,
        augmentations: usize,
    },
}

impl AssignError {
    pub fn is_user_error(&self) -> bool {
        matches!(self, AssignError::Validation(_))
    }
}

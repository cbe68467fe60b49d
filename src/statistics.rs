use log::warn;
use serde::{Deserialize, Serialize};

use crate::assignment::Assignment;
use crate::common::{EntityId, Student, MAX_PREFERENCES};

/// How many students got their first, second, third or none of their choices.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statistics {
    counts: [usize; MAX_PREFERENCES + 1],
}

impl Statistics {
    pub fn first(&self) -> usize {
        self.counts[0]
    }
    pub fn second(&self) -> usize {
        self.counts[1]
    }
    pub fn third(&self) -> usize {
        self.counts[2]
    }
    pub fn none(&self) -> usize {
        self.counts[MAX_PREFERENCES]
    }
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }
    pub fn as_array(&self) -> [usize; MAX_PREFERENCES + 1] {
        self.counts
    }
}

impl From<[usize; MAX_PREFERENCES + 1]> for Statistics {
    fn from(counts: [usize; MAX_PREFERENCES + 1]) -> Self {
        Statistics { counts }
    }
}

/// Buckets every student by the rank of the course they were placed in.
///
/// Students absent from `assignment` are skipped with a warning.
pub fn compute_statistics<T: EntityId>(
    assignment: &Assignment<T>,
    students: &[Student<T>],
) -> Statistics {
    let placements = assignment.placements();
    let mut counts = [0; MAX_PREFERENCES + 1];
    for student in students {
        let Some(course) = placements.get(&student.id) else {
            warn!("student {} has no course, left out of statistics", student.id);
            continue;
        };
        let bucket = student
            .rank_of(course)
            .filter(|r| *r < MAX_PREFERENCES)
            .unwrap_or(MAX_PREFERENCES);
        counts[bucket] += 1;
    }
    Statistics { counts }
}

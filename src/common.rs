use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Display};
use std::hash::Hash;

/// Longest preference list a student may hand in.
pub const MAX_PREFERENCES: usize = 3;

pub trait EntityId: Eq + Hash + Ord + Debug + Clone + Display {}
impl<T> EntityId for T where T: Eq + Hash + Ord + Debug + Clone + Display {}

#[derive(Clone, Eq, PartialEq, Hash, Debug, Serialize, Deserialize)]
pub struct Course<T: EntityId> {
    pub id: T,
    pub capacity: u32,
}

impl<T: EntityId> Course<T> {
    pub fn new(id: T, capacity: u32) -> Self {
        Course { id, capacity }
    }
}

impl<T: EntityId> Display for Course<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({} seats)", self.id, self.capacity)
    }
}

#[derive(Clone, Eq, PartialEq, Hash, Debug, Serialize, Deserialize)]
pub struct Student<T: EntityId> {
    pub id: T,
    /// Course ids, best first.
    pub preferences: Vec<T>,
}

impl<T: EntityId> Student<T> {
    pub fn new(id: T, preferences: Vec<T>) -> Self {
        Student { id, preferences }
    }
    /// 0-based position of `course` in the preference list.
    pub fn rank_of(&self, course: &T) -> Option<usize> {
        self.preferences.iter().position(|c| c == course)
    }
    pub fn has_preferences(&self) -> bool {
        !self.preferences.is_empty()
    }
}

impl<T: EntityId> Display for Student<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> [", self.id)?;
        for (i, course) in self.preferences.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{course}")?;
        }
        write!(f, "]")
    }
}

/// Collects `(id, capacity)` pairs, keeping their order.
pub fn courses_from<T, I>(pairs: I) -> Vec<Course<T>>
where
    T: EntityId,
    I: IntoIterator<Item = (T, u32)>,
{
    pairs
        .into_iter()
        .map(|(id, capacity)| Course::new(id, capacity))
        .collect()
}

/// Collects `(id, preferences)` pairs, keeping their order.
pub fn students_from<T, P, I>(pairs: I) -> Vec<Student<T>>
where
    T: EntityId,
    P: IntoIterator<Item = T>,
    I: IntoIterator<Item = (T, P)>,
{
    pairs
        .into_iter()
        .map(|(id, prefs)| Student::new(id, prefs.into_iter().collect()))
        .collect()
}

pub fn total_capacity<T: EntityId>(courses: &[Course<T>]) -> u64 {
    courses.iter().map(|c| u64::from(c.capacity)).sum()
}

/// Seats left over once every student is placed, `None` when the count does
/// not fit in `usize` on this target.
pub fn surplus_seats(capacity: u64, students: usize) -> Option<usize> {
    let students = u64::try_from(students).ok()?;
    usize::try_from(capacity.saturating_sub(students)).ok()
}

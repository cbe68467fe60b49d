use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::common::{Course, EntityId, Student};
use crate::preference::PreferenceCosts;

/// Student -> course.
pub type Placements<T> = BTreeMap<T, T>;

/// Course -> students placed there.
///
/// Every course of the run has an entry, empty or not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Assignment<T: EntityId>(BTreeMap<T, BTreeSet<T>>);

impl<T: EntityId> Assignment<T> {
    pub fn with_courses<'a, I>(courses: I) -> Self
    where
        T: 'a,
        I: IntoIterator<Item = &'a T>,
    {
        Assignment(
            courses
                .into_iter()
                .map(|c| (c.clone(), BTreeSet::new()))
                .collect(),
        )
    }
    pub(crate) fn insert(&mut self, course: T, student: T) -> bool {
        self.0.entry(course).or_default().insert(student)
    }
    pub fn course(&self, course: &T) -> Option<&BTreeSet<T>> {
        self.0.get(course)
    }
    pub fn course_of(&self, student: &T) -> Option<&T> {
        self.0
            .iter()
            .find(|(_, students)| students.contains(student))
            .map(|(course, _)| course)
    }
    pub fn iter(&self) -> impl Iterator<Item = (&T, &BTreeSet<T>)> {
        self.0.iter()
    }
    pub fn courses(&self) -> impl Iterator<Item = &T> {
        self.0.keys()
    }
    /// Number of students placed.
    pub fn len(&self) -> usize {
        self.0.values().map(BTreeSet::len).sum()
    }
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
    /// Student -> course view.
    pub fn placements(&self) -> Placements<T> {
        self.0
            .iter()
            .flat_map(|(course, students)| {
                students.iter().map(move |s| (s.clone(), course.clone()))
            })
            .collect()
    }
    /// Whether no course holds more students than it has seats.
    pub fn fits(&self, courses: &[Course<T>]) -> bool {
        courses.iter().all(|c| {
            self.course(&c.id)
                .map_or(true, |s| s.len() as u64 <= u64::from(c.capacity))
        })
    }
    /// Sum of placement costs under `costs`; students missing from the assignment add nothing.
    pub fn total_cost(&self, students: &[Student<T>], costs: &PreferenceCosts) -> i64 {
        let placements = self.placements();
        students
            .iter()
            .filter_map(|s| placements.get(&s.id).map(|c| costs.cost(s.rank_of(c))))
            .sum()
    }
    pub fn into_inner(self) -> BTreeMap<T, BTreeSet<T>> {
        self.0
    }
}

impl<'a, T: EntityId> IntoIterator for &'a Assignment<T> {
    type Item = (&'a T, &'a BTreeSet<T>);
    type IntoIter = std::collections::btree_map::Iter<'a, T, BTreeSet<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

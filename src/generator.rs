//! Random instances for demos, benchmarks and tests.
//!
//! Each course carries a popularity weight; every generated student draws
//! distinct courses with probability proportional to those weights.

use log::debug;
use rand::distributions::{Distribution, WeightedIndex};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::common::{Course, Student, MAX_PREFERENCES};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub name: String,
    /// Relative popularity, 0 means never chosen.
    pub weight: u32,
    pub capacity: u32,
}

impl CatalogEntry {
    pub fn new(name: impl Into<String>, weight: u32, capacity: u32) -> Self {
        CatalogEntry {
            name: name.into(),
            weight,
            capacity,
        }
    }
}

#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    pub students: usize,
    /// Clamped to [`MAX_PREFERENCES`].
    pub preferences_per_student: usize,
    pub seed: u64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            students: 300,
            preferences_per_student: MAX_PREFERENCES,
            seed: 42,
        }
    }
}

impl GeneratorConfig {
    pub fn with_students(mut self, n: usize) -> Self {
        self.students = n;
        self
    }

    pub fn with_preferences_per_student(mut self, n: usize) -> Self {
        self.preferences_per_student = n;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

/// Draws up to `count` distinct catalogue indices by weight.
///
/// Stops early once every course with a positive weight has been drawn.
fn draw_distinct<R: Rng>(catalog: &[CatalogEntry], count: usize, rng: &mut R) -> Vec<usize> {
    let mut weights: Vec<u32> = catalog.iter().map(|c| c.weight).collect();
    let mut picked = Vec::with_capacity(count);
    while picked.len() < count {
        let Ok(dist) = WeightedIndex::new(&weights) else {
            break;
        };
        let i = dist.sample(rng);
        weights[i] = 0;
        picked.push(i);
    }
    picked
}

/// Generates the course list and `config.students` students named `student_0000`, ...
pub fn generate_with<R: Rng>(
    catalog: &[CatalogEntry],
    config: &GeneratorConfig,
    rng: &mut R,
) -> (Vec<Course<String>>, Vec<Student<String>>) {
    let per_student = config.preferences_per_student.min(MAX_PREFERENCES);
    let courses = catalog
        .iter()
        .map(|c| Course::new(c.name.clone(), c.capacity))
        .collect();
    let students: Vec<_> = (0..config.students)
        .map(|i| {
            let prefs = draw_distinct(catalog, per_student, rng)
                .into_iter()
                .map(|c| catalog[c].name.clone())
                .collect();
            Student::new(format!("student_{i:04}"), prefs)
        })
        .collect();
    debug!(
        "generated {} students over {} courses",
        students.len(),
        catalog.len()
    );
    (courses, students)
}

/// [`generate_with`] on a `ChaCha8Rng` seeded from `config.seed`.
pub fn generate(
    catalog: &[CatalogEntry],
    config: &GeneratorConfig,
) -> (Vec<Course<String>>, Vec<Student<String>>) {
    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
    generate_with(catalog, config, &mut rng)
}

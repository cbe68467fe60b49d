//! Optimal assignment of students to capacity-limited courses.
//!
//! Every student hands in up to three ranked course preferences. The
//! assignment places every student in exactly one course, never exceeds a
//! course's capacity and minimises the total preference cost, found as a
//! min-cost flow:
//!
//! 1. [`validate`] rejects input that cannot be placed.
//! 2. [`FlowNetwork::build`] turns courses and students into a flow network.
//! 3. [`solve_and_extract`] routes the flow and decodes it into an
//!    [`Assignment`], from which [`compute_statistics`] derives the
//!    first/second/third/none counts.
//!
//! [`assign`] runs all of it.
//!
//! ```
//! use course_assigner::{assign, courses_from, students_from, AssignerConfig};
//!
//! let courses = courses_from([("Math", 2), ("Art", 1)]);
//! let students = students_from([
//!     ("Al", vec!["Math"]),
//!     ("Bo", vec!["Math", "Art"]),
//!     ("Cy", vec!["Art"]),
//! ]);
//! let outcome = assign(&courses, &students, &AssignerConfig::default()).unwrap();
//! assert_eq!(outcome.statistics.as_array(), [3, 0, 0, 0]);
//! ```

pub mod assignment;
pub mod common;
pub mod config;
pub mod error;
pub mod extract;
pub mod generator;
pub mod network;
pub mod preference;
pub mod solver;
pub mod statistics;
pub mod validation;

use log::info;
use serde::{Deserialize, Serialize};

pub use assignment::{Assignment, Placements};
pub use common::{courses_from, students_from, Course, EntityId, Student, MAX_PREFERENCES};
pub use config::AssignerConfig;
pub use error::{AssignError, ValidationError};
pub use extract::{extract, solve_and_extract};
pub use network::FlowNetwork;
pub use preference::{PreferenceCosts, MAX_COST_MAGNITUDE};
pub use solver::{solve, Budget, FlowSolution};
pub use statistics::{compute_statistics, Statistics};
pub use validation::validate;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome<T: EntityId> {
    pub assignment: Assignment<T>,
    pub placements: Placements<T>,
    pub statistics: Statistics,
    /// Sum of preference costs of all placements.
    pub total_cost: i64,
}

/// Validates, builds, solves and decodes in one blocking call.
///
/// Nothing is returned unless the whole pipeline succeeds.
pub fn assign<T: EntityId>(
    courses: &[Course<T>],
    students: &[Student<T>],
    config: &AssignerConfig,
) -> Result<Outcome<T>, AssignError> {
    validate(courses, students)?;
    let budget = Budget::from_config(config);
    let network = FlowNetwork::build(courses, students, &config.costs);
    let (assignment, placements) = solve_and_extract(&network, &budget)?;
    let statistics = compute_statistics(&assignment, students);
    let total_cost = assignment.total_cost(students, &config.costs);
    info!(
        "assigned {} students: {} first, {} second, {} third, {} none (cost {})",
        placements.len(),
        statistics.first(),
        statistics.second(),
        statistics.third(),
        statistics.none(),
        total_cost
    );
    Ok(Outcome {
        assignment,
        placements,
        statistics,
        total_cost,
    })
}

/// [`assign`] with the default cost scale and no time limit.
pub fn assign_to_courses<T: EntityId>(
    courses: &[Course<T>],
    students: &[Student<T>],
) -> Result<Outcome<T>, AssignError> {
    assign(courses, students, &AssignerConfig::default())
}

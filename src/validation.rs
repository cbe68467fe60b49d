use std::collections::HashSet;

use log::debug;

use crate::common::{surplus_seats, total_capacity, Course, EntityId, Student, MAX_PREFERENCES};
use crate::error::ValidationError;

/// Checks that the input can be turned into a feasible flow network.
///
/// Capacity is checked first (enough seats, and few enough spare seats to
/// balance with one filler node each), then identifier uniqueness, then every
/// student's preference list in input order. The first problem found is
/// returned.
pub fn validate<T: EntityId>(
    courses: &[Course<T>],
    students: &[Student<T>],
) -> Result<(), ValidationError> {
    let capacity = total_capacity(courses);
    let demand = students.len() as u64;
    if capacity < demand {
        return Err(ValidationError::Capacity {
            shortfall: demand - capacity,
        });
    }
    if surplus_seats(capacity, students.len()).is_none() {
        return Err(ValidationError::SurplusOverflow {
            surplus: capacity - demand,
        });
    }

    let mut course_ids = HashSet::with_capacity(courses.len());
    for course in courses {
        if !course_ids.insert(&course.id) {
            return Err(ValidationError::DuplicateCourse(course.id.to_string()));
        }
    }
    let mut student_ids = HashSet::with_capacity(students.len());
    for student in students {
        if !student_ids.insert(&student.id) {
            return Err(ValidationError::DuplicateStudent(student.id.to_string()));
        }
    }

    for student in students {
        check_preferences(student, &course_ids)?;
    }
    debug!(
        "validated {} courses ({} seats) and {} students",
        courses.len(),
        capacity,
        students.len()
    );
    Ok(())
}

fn check_preferences<T: EntityId>(
    student: &Student<T>,
    course_ids: &HashSet<&T>,
) -> Result<(), ValidationError> {
    if student.preferences.len() > MAX_PREFERENCES {
        return Err(ValidationError::TooManyPreferences {
            student: student.id.to_string(),
            count: student.preferences.len(),
            max: MAX_PREFERENCES,
        });
    }
    let mut seen = HashSet::with_capacity(student.preferences.len());
    for pref in &student.preferences {
        if !course_ids.contains(pref) {
            return Err(ValidationError::UnknownCourse {
                student: student.id.to_string(),
                course: pref.to_string(),
            });
        }
        if !seen.insert(pref) {
            return Err(ValidationError::DuplicatePreference {
                student: student.id.to_string(),
                course: pref.to_string(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::{courses_from, students_from};

    #[test]
    fn test_valid_input() {
        let courses = courses_from([("Math", 2), ("Art", 1)]);
        let students = students_from([
            ("Al", vec!["Math"]),
            ("Bo", vec!["Math", "Art"]),
            ("Cy", vec!["Art"]),
        ]);
        assert_eq!(validate(&courses, &students), Ok(()));
    }

    #[test]
    fn test_capacity_shortfall() {
        let courses = courses_from([("Math", 1)]);
        let students = students_from([("Al", vec!["Math"]), ("Bo", vec!["Math"])]);
        assert_eq!(
            validate(&courses, &students),
            Err(ValidationError::Capacity { shortfall: 1 })
        );

        let students = students_from([("Al", vec![]), ("Bo", vec![]), ("Cy", vec![])]);
        assert_eq!(
            validate(&Vec::<Course<&str>>::new(), &students),
            Err(ValidationError::Capacity { shortfall: 3 })
        );
    }

    #[test]
    fn test_large_surplus() {
        // 2^32 spare seats: balanced on 64-bit targets, rejected on 32-bit ones.
        let courses = courses_from([("Math", u32::MAX), ("Art", 1)]);
        let students = students_from([("Al", vec!["Math"])]);
        let expected = if cfg!(target_pointer_width = "64") {
            Ok(())
        } else {
            Err(ValidationError::SurplusOverflow { surplus: 1 << 32 })
        };
        assert_eq!(validate(&courses, &students), expected);
    }

    #[test]
    fn test_capacity_checked_before_preferences() {
        let courses = courses_from([("Math", 1)]);
        let students = students_from([("Al", vec!["Chem"]), ("Bo", vec!["Math"])]);
        assert_eq!(
            validate(&courses, &students),
            Err(ValidationError::Capacity { shortfall: 1 })
        );
    }

    #[test]
    fn test_unknown_course() {
        let courses = courses_from([("Math", 2)]);
        let students = students_from([("Al", vec!["Math"]), ("Bo", vec!["Math", "Chem"])]);
        assert_eq!(
            validate(&courses, &students),
            Err(ValidationError::UnknownCourse {
                student: "Bo".into(),
                course: "Chem".into(),
            })
        );
    }

    #[test]
    fn test_list_shape() {
        let courses = courses_from([("A", 1), ("B", 1), ("C", 1), ("D", 1)]);
        let students = students_from([("Al", vec!["A", "B", "C", "D"])]);
        assert_eq!(
            validate(&courses, &students),
            Err(ValidationError::TooManyPreferences {
                student: "Al".into(),
                count: 4,
                max: 3,
            })
        );

        let students = students_from([("Al", vec!["A", "B", "A"])]);
        assert_eq!(
            validate(&courses, &students),
            Err(ValidationError::DuplicatePreference {
                student: "Al".into(),
                course: "A".into(),
            })
        );
    }

    #[test]
    fn test_duplicate_ids() {
        let courses = courses_from([("Math", 1), ("Math", 1)]);
        let students = students_from([("Al", vec!["Math"])]);
        assert_eq!(
            validate(&courses, &students),
            Err(ValidationError::DuplicateCourse("Math".into()))
        );

        let courses = courses_from([("Math", 2)]);
        let students = students_from([("Al", vec!["Math"]), ("Al", vec![])]);
        assert_eq!(
            validate(&courses, &students),
            Err(ValidationError::DuplicateStudent("Al".into()))
        );
    }

    #[test]
    fn test_zero_capacity_course_is_fine() {
        let courses = courses_from([("Math", 0), ("Art", 1)]);
        let students = students_from([("Al", vec!["Math"])]);
        assert_eq!(validate(&courses, &students), Ok(()));
    }
}

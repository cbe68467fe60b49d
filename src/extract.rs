use log::debug;
use petgraph::graph::EdgeIndex;
use petgraph::visit::EdgeRef;
use petgraph::Direction;

use crate::assignment::{Assignment, Placements};
use crate::common::EntityId;
use crate::error::AssignError;
use crate::network::{FlowNetwork, NodeKind};
use crate::solver::{solve, Budget, FlowSolution};

/// Decodes an optimal flow into course memberships.
///
/// Every student and filler must route exactly one unit and no course may
/// take more than its capacity, otherwise the network or the flow is broken
/// and [`AssignError::InternalInvariant`] is returned. The same error is
/// returned when `solution` was solved for a different network. Fillers are
/// dropped.
pub fn extract<T: EntityId>(
    network: &FlowNetwork<T>,
    solution: &FlowSolution,
) -> Result<(Assignment<T>, Placements<T>), AssignError> {
    if solution.edge_count() != network.edge_count() {
        return Err(AssignError::InternalInvariant(format!(
            "solution covers {} edges, network has {}",
            solution.edge_count(),
            network.edge_count()
        )));
    }
    let flow = |edge: EdgeIndex| {
        solution.flow(edge).ok_or_else(|| {
            AssignError::InternalInvariant(format!("no flow recorded for edge {}", edge.index()))
        })
    };
    let graph = network.graph();
    let course_ids = graph.node_weights().filter_map(|n| match &n.kind {
        NodeKind::Course(id) => Some(id),
        _ => None,
    });
    let mut assignment = Assignment::with_courses(course_ids);
    let mut placements = Placements::new();
    let mut fillers = 0;

    for node in graph.node_indices() {
        let kind = &network.node(node).kind;
        if let NodeKind::Course(id) = kind {
            let capacity = -network.node(node).supply;
            let taken = graph
                .edges_directed(node, Direction::Incoming)
                .map(|e| flow(e.id()))
                .sum::<Result<i64, _>>()?;
            if taken > capacity {
                return Err(AssignError::InternalInvariant(format!(
                    "course {id} takes {taken} units with capacity {capacity}"
                )));
            }
            continue;
        }

        let mut routed = 0;
        let mut target = None;
        for (edge, to, _) in network.arcs_from(node) {
            let f = flow(edge)?;
            if f > 0 {
                routed += f;
                target = Some(to);
            }
        }
        let (1, Some(target)) = (routed, target) else {
            return Err(AssignError::InternalInvariant(format!(
                "{kind:?} routes {routed} units instead of 1"
            )));
        };
        let NodeKind::Course(course) = &network.node(target).kind else {
            return Err(AssignError::InternalInvariant(format!(
                "{kind:?} routes its unit to a non-course node"
            )));
        };
        match kind {
            NodeKind::Student(student) => {
                assignment.insert(course.clone(), student.clone());
                placements.insert(student.clone(), course.clone());
            }
            NodeKind::Filler(_) => fillers += 1,
            NodeKind::Course(_) => {}
        }
    }

    debug!(
        "extracted {} placements, dropped {} filler units",
        placements.len(),
        fillers
    );
    Ok((assignment, placements))
}

/// Solves `network` to optimality and decodes the result.
pub fn solve_and_extract<T: EntityId>(
    network: &FlowNetwork<T>,
    budget: &Budget,
) -> Result<(Assignment<T>, Placements<T>), AssignError> {
    let solution = solve(network, budget)?;
    extract(network, &solution)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::{courses_from, students_from};
    use crate::preference::PreferenceCosts;

    #[test]
    fn test_fillers_are_dropped() {
        let courses = courses_from([("Math", 3)]);
        let students = students_from([("Al", vec!["Math"])]);
        let network = FlowNetwork::build(&courses, &students, &PreferenceCosts::default());
        assert_eq!(network.filler_count(), 2);
        let (assignment, placements) = solve_and_extract(&network, &Budget::unlimited()).unwrap();
        assert_eq!(assignment.len(), 1);
        assert_eq!(
            assignment.course(&"Math").unwrap().iter().collect::<Vec<_>>(),
            vec![&"Al"]
        );
        assert_eq!(placements.len(), 1);
    }

    #[test]
    fn test_every_course_listed() {
        let courses = courses_from([("Math", 1), ("Art", 1), ("Music", 2)]);
        let students = students_from([("Al", vec!["Art"])]);
        let network = FlowNetwork::build(&courses, &students, &PreferenceCosts::default());
        let (assignment, placements) = solve_and_extract(&network, &Budget::unlimited()).unwrap();
        assert_eq!(assignment.courses().count(), 3);
        assert!(assignment.course(&"Math").unwrap().is_empty());
        assert!(assignment.course(&"Music").unwrap().is_empty());
        assert_eq!(placements.get("Al"), Some(&"Art"));
    }

    #[test]
    fn test_solution_from_another_network() {
        let costs = PreferenceCosts::default();
        let small = FlowNetwork::build(
            &courses_from([("Math", 1)]),
            &students_from([("Al", vec!["Math"])]),
            &costs,
        );
        let large = FlowNetwork::build(
            &courses_from([("Math", 2), ("Art", 1)]),
            &students_from([("Al", vec!["Math"]), ("Bo", vec!["Art"])]),
            &costs,
        );
        let solution = solve(&small, &Budget::unlimited()).unwrap();
        match extract(&large, &solution) {
            Err(AssignError::InternalInvariant(msg)) => {
                assert!(msg.contains("solution covers 1 edges"), "{msg}")
            }
            other => panic!("expected invariant error, got {other:?}"),
        }
        assert!(extract(&small, &solution).is_ok());
    }

    #[test]
    fn test_placements_match_assignment() {
        let courses = courses_from([("Math", 2), ("Art", 2)]);
        let students = students_from([
            ("Al", vec!["Art", "Math"]),
            ("Bo", vec!["Art"]),
            ("Cy", vec!["Art", "Math"]),
            ("Dee", vec![]),
        ]);
        let network = FlowNetwork::build(&courses, &students, &PreferenceCosts::default());
        let (assignment, placements) = solve_and_extract(&network, &Budget::unlimited()).unwrap();
        assert_eq!(assignment.placements(), placements);
        assert!(assignment.fits(&courses));
        assert_eq!(placements.get("Bo"), Some(&"Art"));
        assert_eq!(placements.get("Dee"), Some(&"Math"));
    }
}

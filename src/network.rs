use std::collections::HashMap;

use log::{debug, warn};
use petgraph::graph::{DiGraph, EdgeIndex, NodeIndex};
use petgraph::visit::EdgeRef;

use crate::common::{surplus_seats, total_capacity, Course, EntityId, Student};
use crate::preference::PreferenceCosts;

#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum NodeKind<T: EntityId> {
    Course(T),
    Student(T),
    /// Balances supply and demand when there are more seats than students.
    Filler(usize),
}

#[derive(Clone, Debug)]
pub struct FlowNode<T: EntityId> {
    pub kind: NodeKind<T>,
    /// Positive emits units, negative absorbs them.
    pub supply: i64,
}

#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub struct FlowArc {
    pub capacity: i64,
    pub cost: i64,
}

/// Min-cost flow instance: one unit leaves every student and filler and
/// every course absorbs exactly its capacity.
#[derive(Clone, Debug)]
pub struct FlowNetwork<T: EntityId> {
    graph: DiGraph<FlowNode<T>, FlowArc>,
    courses: usize,
    students: usize,
    fillers: usize,
}

impl<T: EntityId> FlowNetwork<T> {
    /// Builds the network for validated input.
    ///
    /// Nodes are added courses first, then students, then fillers. Each
    /// student gets its ranked edges in preference order followed by
    /// zero-cost edges to all remaining courses in course order.
    ///
    /// Every spare seat becomes a filler node with an edge to each course, so
    /// the network holds `O((students + spare seats) * courses)` edges; large
    /// spare capacity costs memory even when few students are placed. If the
    /// spare seat count does not fit in `usize` no fillers are added and the
    /// solver rejects the unbalanced network.
    pub fn build(courses: &[Course<T>], students: &[Student<T>], costs: &PreferenceCosts) -> Self {
        let mut graph = DiGraph::new();
        let mut course_nodes = Vec::with_capacity(courses.len());
        let mut by_id = HashMap::with_capacity(courses.len());
        for course in courses {
            let node = graph.add_node(FlowNode {
                kind: NodeKind::Course(course.id.clone()),
                supply: -i64::from(course.capacity),
            });
            course_nodes.push(node);
            by_id.insert(&course.id, node);
        }

        for student in students {
            let node = graph.add_node(FlowNode {
                kind: NodeKind::Student(student.id.clone()),
                supply: 1,
            });
            for (rank, pref) in student.preferences.iter().enumerate() {
                let Some(&target) = by_id.get(pref) else {
                    continue;
                };
                graph.add_edge(
                    node,
                    target,
                    FlowArc {
                        capacity: 1,
                        cost: costs.cost(Some(rank)),
                    },
                );
            }
            for (course, &target) in courses.iter().zip(&course_nodes) {
                if student.rank_of(&course.id).is_none() {
                    graph.add_edge(node, target, FlowArc { capacity: 1, cost: 0 });
                }
            }
        }

        let capacity = total_capacity(courses);
        let surplus = surplus_seats(capacity, students.len()).unwrap_or_else(|| {
            warn!("{capacity} seats for {} students: too many fillers", students.len());
            0
        });
        for i in 0..surplus {
            let node = graph.add_node(FlowNode {
                kind: NodeKind::Filler(i),
                supply: 1,
            });
            for &target in &course_nodes {
                graph.add_edge(node, target, FlowArc { capacity: 1, cost: 0 });
            }
        }

        debug!(
            "built flow network: {} courses, {} students, {} fillers, {} edges",
            courses.len(),
            students.len(),
            surplus,
            graph.edge_count()
        );
        FlowNetwork {
            graph,
            courses: courses.len(),
            students: students.len(),
            fillers: surplus,
        }
    }
    pub fn graph(&self) -> &DiGraph<FlowNode<T>, FlowArc> {
        &self.graph
    }
    pub fn node(&self, index: NodeIndex) -> &FlowNode<T> {
        &self.graph[index]
    }
    pub fn arc(&self, index: EdgeIndex) -> &FlowArc {
        &self.graph[index]
    }
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }
    pub fn course_count(&self) -> usize {
        self.courses
    }
    pub fn student_count(&self) -> usize {
        self.students
    }
    pub fn filler_count(&self) -> usize {
        self.fillers
    }
    /// Units emitted by students and fillers.
    pub fn total_supply(&self) -> i64 {
        self.graph
            .node_weights()
            .map(|n| n.supply)
            .filter(|s| *s > 0)
            .sum()
    }
    pub fn is_balanced(&self) -> bool {
        self.graph.node_weights().map(|n| n.supply).sum::<i64>() == 0
    }
    /// Outgoing arcs of `node` as `(edge, target, arc)`.
    pub fn arcs_from(
        &self,
        node: NodeIndex,
    ) -> impl Iterator<Item = (EdgeIndex, NodeIndex, &FlowArc)> + '_ {
        self.graph
            .edges(node)
            .map(|e| (e.id(), e.target(), &self.graph[e.id()]))
    }
}

use crate::graph::{EntityType, Graph};

/// One entity as it appears in a diagram.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: String,
    pub label: String,
    pub entity_type: EntityType,
    /// Whether the report has a record of its own for this entity.
    pub tracked: bool,
}

impl Node {
    fn resolve(graph: &Graph, name: &str) -> Self {
        Self {
            id: name.to_string(),
            label: name.to_string(),
            entity_type: graph.node_of(name).entity_type.clone(),
            tracked: graph.contains(name),
        }
    }
}

/// The neighbourhood of one focal entity: its direct dependencies, itself,
/// and its direct dependents. Referenced entities are resolved one level
/// deep only; their own edges are never followed.
#[derive(Debug, Clone)]
pub struct FocusIR {
    pub focal: Node,
    pub dependencies: Vec<Node>,
    pub dependents: Vec<Node>,
}

impl FocusIR {
    pub fn from_graph(graph: &Graph, focal: &str) -> Self {
        let resolve_all = |names: &[String]| -> Vec<Node> {
            names.iter().map(|n| Node::resolve(graph, n)).collect()
        };

        Self {
            focal: Node::resolve(graph, focal),
            dependencies: resolve_all(graph.in_edges(focal)),
            dependents: resolve_all(graph.out_edges(focal)),
        }
    }

    pub fn edge_count(&self) -> usize {
        self.dependencies.len() + self.dependents.len()
    }

    /// Entity types present in the diagram, in first-seen order
    /// (dependencies, focal, dependents).
    pub fn entity_types(&self) -> Vec<&EntityType> {
        let mut seen: Vec<&EntityType> = Vec::new();
        let all = self
            .dependencies
            .iter()
            .chain(std::iter::once(&self.focal))
            .chain(self.dependents.iter());
        for node in all {
            if !seen.contains(&&node.entity_type) {
                seen.push(&node.entity_type);
            }
        }
        seen
    }
}

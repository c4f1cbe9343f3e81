use std::collections::HashMap;

/// Directed graph of typed relations between observable ids.
/// Adjacency is id-keyed: source -> (target -> relation label).
/// Self-edges are pruned at insertion and can never be stored.
#[derive(Debug, Clone, Default)]
pub struct RelationGraph {
    adjacency: HashMap<String, HashMap<String, String>>,
}

impl RelationGraph {
    pub fn new() -> Self {
        Self {
            adjacency: HashMap::new(),
        }
    }

    /// Insert one typed edge. A self-edge is dropped silently.
    pub fn relate(&mut self, source: &str, target: &str, label: &str) {
        if source == target {
            return;
        }
        self.adjacency
            .entry(source.to_string())
            .or_default()
            .insert(target.to_string(), label.to_string());
    }

    /// Outgoing edges of one node.
    pub fn targets_of(&self, source: &str) -> Option<&HashMap<String, String>> {
        self.adjacency.get(source)
    }

    /// All (source, target, label) triples.
    pub fn edges(&self) -> impl Iterator<Item = (&str, &str, &str)> {
        self.adjacency.iter().flat_map(|(source, targets)| {
            targets
                .iter()
                .map(move |(target, label)| (source.as_str(), target.as_str(), label.as_str()))
        })
    }

    pub fn edge_count(&self) -> usize {
        self.adjacency.values().map(|t| t.len()).sum()
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.adjacency.contains_key(id)
            || self.adjacency.values().any(|targets| targets.contains_key(id))
    }

    /// Rewrite the graph for a 1:N expansion of `original_id` into `new_ids`.
    /// Returns a new graph; the receiver is left untouched, so a rewrite can
    /// never trip over its own iteration order.
    ///
    /// Outgoing edges of the original are duplicated onto every new id, and
    /// edges pointing at the original are re-pointed at every new id. The
    /// original id no longer appears in the result. Edges among the new ids
    /// themselves are never invented; only existing edges get relabeled ends.
    pub fn expand(&self, original_id: &str, new_ids: &[String]) -> RelationGraph {
        let mut rewritten = RelationGraph::new();

        for (source, targets) in &self.adjacency {
            if source == original_id {
                // Fan the original's outgoing edges out over every new id.
                for new_id in new_ids {
                    for (target, label) in targets {
                        if target == original_id {
                            continue;
                        }
                        rewritten.relate(new_id, target, label);
                    }
                }
            } else {
                for (target, label) in targets {
                    if target == original_id {
                        // Re-point the incoming edge at every new id.
                        for new_id in new_ids {
                            rewritten.relate(source, new_id, label);
                        }
                    } else {
                        rewritten.relate(source, target, label);
                    }
                }
            }
        }

        rewritten
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_self_edge_is_pruned() {
        let mut graph = RelationGraph::new();
        graph.relate("a", "a", "Contains");
        graph.relate("a", "b", "Contains");

        assert_eq!(graph.edge_count(), 1);
        assert!(graph.targets_of("a").unwrap().contains_key("b"));
    }

    #[test]
    fn test_expand_duplicates_outgoing_edges() {
        let mut graph = RelationGraph::new();
        graph.relate("a", "b", "Related_To");

        let rewritten = graph.expand("a", &ids(&["a1", "a2"]));

        assert_eq!(rewritten.edge_count(), 2);
        assert_eq!(rewritten.targets_of("a1").unwrap()["b"], "Related_To");
        assert_eq!(rewritten.targets_of("a2").unwrap()["b"], "Related_To");
        assert!(rewritten.targets_of("a").is_none());
    }

    #[test]
    fn test_expand_repoints_incoming_edges() {
        let mut graph = RelationGraph::new();
        graph.relate("c", "a", "Connected_To");
        graph.relate("c", "d", "Contains");

        let rewritten = graph.expand("a", &ids(&["a1", "a2"]));

        let targets = rewritten.targets_of("c").unwrap();
        assert_eq!(targets["a1"], "Connected_To");
        assert_eq!(targets["a2"], "Connected_To");
        assert_eq!(targets["d"], "Contains");
        assert!(!targets.contains_key("a"));
    }

    #[test]
    fn test_expand_drops_original_self_reference() {
        // An input relating to itself must not spray edges over the new ids.
        let mut graph = RelationGraph::new();
        // relate() already prunes a->a, so seed via expand of a two-node loop.
        graph.relate("a", "b", "Related_To");
        graph.relate("b", "a", "Related_To");

        let rewritten = graph.expand("a", &ids(&["a1"]));

        assert_eq!(rewritten.targets_of("a1").unwrap()["b"], "Related_To");
        assert_eq!(rewritten.targets_of("b").unwrap()["a1"], "Related_To");
        assert!(!rewritten.contains_node("a"));
    }

    #[test]
    fn test_expand_is_order_independent() {
        let mut graph = RelationGraph::new();
        graph.relate("a", "b", "Contains");
        graph.relate("b", "c", "Contains");

        let one = graph
            .expand("a", &ids(&["a1", "a2"]))
            .expand("b", &ids(&["b1"]));
        let two = graph
            .expand("b", &ids(&["b1"]))
            .expand("a", &ids(&["a1", "a2"]));

        let mut edges_one: Vec<(String, String, String)> = one
            .edges()
            .map(|(s, t, l)| (s.to_string(), t.to_string(), l.to_string()))
            .collect();
        let mut edges_two: Vec<(String, String, String)> = two
            .edges()
            .map(|(s, t, l)| (s.to_string(), t.to_string(), l.to_string()))
            .collect();
        edges_one.sort();
        edges_two.sort();

        assert_eq!(edges_one, edges_two);
    }
}

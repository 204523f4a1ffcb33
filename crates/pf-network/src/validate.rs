//! Structural validation of a network snapshot.

use std::collections::HashSet;

use crate::error::{NetworkError, NetworkResult};
use crate::model::Network;

/// Check ids are unique and every segment endpoint exists.
///
/// Hydraulic completeness is deliberately not checked here; missing fluid
/// or geometry degrades to warnings during propagation instead.
pub fn validate_network(network: &Network) -> NetworkResult<()> {
    let mut node_ids = HashSet::new();
    for node in &network.nodes {
        if !node_ids.insert(node.id.as_str()) {
            return Err(NetworkError::DuplicateNode {
                id: node.id.clone(),
            });
        }
    }

    let mut segment_ids = HashSet::new();
    for seg in &network.segments {
        if !segment_ids.insert(seg.id.as_str()) {
            return Err(NetworkError::DuplicateSegment {
                id: seg.id.clone(),
            });
        }
        for node in [&seg.from, &seg.to] {
            if !node_ids.contains(node.as_str()) {
                return Err(NetworkError::UnknownNode {
                    segment: seg.id.clone(),
                    node: node.clone(),
                });
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Node, Segment};

    #[test]
    fn accepts_well_formed_network() {
        let net = Network {
            nodes: vec![Node::new("a"), Node::new("b")],
            segments: vec![Segment::new("s1", "a", "b")],
        };
        assert!(validate_network(&net).is_ok());
    }

    #[test]
    fn rejects_duplicate_node() {
        let net = Network {
            nodes: vec![Node::new("a"), Node::new("a")],
            segments: vec![],
        };
        assert!(matches!(
            validate_network(&net),
            Err(NetworkError::DuplicateNode { .. })
        ));
    }

    #[test]
    fn rejects_dangling_segment() {
        let net = Network {
            nodes: vec![Node::new("a")],
            segments: vec![Segment::new("s1", "a", "ghost")],
        };
        assert!(matches!(
            validate_network(&net),
            Err(NetworkError::UnknownNode { .. })
        ));
    }
}

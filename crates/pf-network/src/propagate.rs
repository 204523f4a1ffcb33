//! Pressure propagation across the network graph.
//!
//! Breadth-first traversal from a designated source node. Each popped node
//! pushes its pressure/temperature into every outgoing segment, the segment
//! is recalculated, and the drop is applied to the far endpoint. The
//! traversal owns private working copies; the input network is never
//! mutated. Hydraulic failures degrade to warnings, never abort the walk.

use std::collections::{HashMap, HashSet, VecDeque};

use pf_core::numeric::{Tolerances, nearly_equal};
use pf_core::quantity::{LengthUnit, Qty};
use pf_fluids::FluidContext;

use crate::error::{NetworkError, NetworkResult};
use crate::model::{Boundary, Network, Node, Segment, SegmentKind};
use crate::recalc::{HydraulicModels, recalculate_segment};

/// Result of one traversal: the full node and segment sets plus an ordered
/// warning list. Entities never reached come back unchanged.
#[derive(Debug, Clone, PartialEq)]
pub struct PropagationOutcome {
    pub nodes: Vec<Node>,
    pub segments: Vec<Segment>,
    pub warnings: Vec<String>,
}

/// Propagate pressure from `start_node` through the network.
///
/// A segment is outgoing from a node when that node is its hydraulic
/// inlet; the far endpoint is the target. The first value to arrive at a
/// node wins; a later conflicting arrival is reported as a warning, not
/// reconciled. Each node is expanded at most once, so the walk terminates
/// on cyclic networks too.
pub fn propagate_pressure(
    network: &Network,
    start_node: &str,
    models: &HydraulicModels,
) -> NetworkResult<PropagationOutcome> {
    if network.node(start_node).is_none() {
        return Err(NetworkError::UnknownStartNode {
            id: start_node.to_string(),
        });
    }

    let mut nodes: HashMap<String, Node> = network
        .nodes
        .iter()
        .map(|n| (n.id.clone(), n.clone()))
        .collect();
    let mut segments: HashMap<String, Segment> = network
        .segments
        .iter()
        .map(|s| (s.id.clone(), s.clone()))
        .collect();
    let mut warnings: Vec<String> = Vec::new();

    let mut queue: VecDeque<String> = VecDeque::new();
    let mut visited: HashSet<String> = HashSet::new();
    // Nodes whose pressure was written by this traversal (or the start
    // node itself); first arrival wins against these.
    let mut assigned: HashSet<String> = HashSet::new();
    queue.push_back(start_node.to_string());
    assigned.insert(start_node.to_string());

    while let Some(node_id) = queue.pop_front() {
        if !visited.insert(node_id.clone()) {
            continue;
        }
        let current = nodes[&node_id].clone();
        let Some(p_current) = current.pressure.map(|q| q.si()) else {
            warnings.push(format!(
                "node '{}': no pressure defined, branch stopped",
                current.display_name()
            ));
            continue;
        };
        tracing::debug!(node = %node_id, pressure_pa = p_current, "expanding node");

        let outgoing: Vec<String> = network
            .segments_from(&node_id)
            .map(|s| s.id.clone())
            .collect();

        for seg_id in outgoing {
            let mut seg = segments[&seg_id].clone();
            seg.boundary = Boundary {
                pressure: current.pressure,
                temperature: current.temperature,
            };
            let ctx = match (current.fluid, seg.mass_flow) {
                (Some(fluid), Some(mdot)) => Some(FluidContext::new(fluid, mdot)),
                _ => None,
            };
            let target_id = seg.outlet_node().to_string();

            // Missing-length estimation: when the target pressure is
            // already known, probe with a synthetic 1 m length to get a
            // drop gradient and back out the length that matches the
            // required drop. Only a drop with a friction contribution
            // scales with length; a user-specified drop alone does not,
            // and a non-positive required drop has no forward solution.
            // The length stays unresolved in both cases.
            if missing_length(&seg) {
                if let Some(p_target) = nodes.get(&target_id).and_then(|n| n.pressure) {
                    let required = p_current - p_target.si();
                    if required > 0.0 {
                        let mut probe = seg.clone();
                        probe.geometry.length = Some(Qty::new(1.0, LengthUnit::Meter));
                        let probe = recalculate_segment(&probe, ctx.as_ref(), models);
                        let gradient = probe
                            .results
                            .filter(|r| r.drops.friction_and_fitting.is_some_and(|f| f > 0.0))
                            .map(|r| r.drops.total)
                            .filter(|g| *g > 0.0);
                        if let Some(gradient) = gradient {
                            let estimate = required / gradient;
                            seg.geometry.length = Some(Qty::new(estimate, LengthUnit::Meter));
                            warnings.push(format!(
                                "segment '{}': estimated missing length {:.3} m from known endpoint pressures",
                                seg.id, estimate
                            ));
                        }
                    }
                }
            }

            let seg = recalculate_segment(&seg, ctx.as_ref(), models);
            let drop = match seg.results.as_ref() {
                Some(r) => r.drops.total,
                None => {
                    warnings.push(format!(
                        "segment '{}': no calculated pressure drop, assuming 0",
                        seg.id
                    ));
                    0.0
                }
            };
            let outlet_temperature = seg.summary.as_ref().map(|s| s.outlet.temperature);
            segments.insert(seg.id.clone(), seg);

            let p_out = p_current - drop;
            let Some(target) = nodes.get_mut(&target_id) else {
                warnings.push(format!(
                    "segment '{seg_id}': unknown target node '{target_id}'"
                ));
                continue;
            };

            if assigned.contains(&target_id) {
                if let Some(existing) = target.pressure.map(|q| q.si()) {
                    if !nearly_equal(existing, p_out, Tolerances::default()) {
                        warnings.push(format!(
                            "node '{}': keeping first-arrival pressure {existing:.1} Pa, conflicting arrival {p_out:.1} Pa via segment '{seg_id}'",
                            target.display_name()
                        ));
                    }
                }
            } else {
                // Write back in the target's own unit, SI default.
                let p_unit = target.pressure.map(|q| q.unit).unwrap_or_default();
                target.pressure = Some(Qty::from_si(p_out, p_unit));

                // Prefer the segment's computed outlet temperature; fall
                // back to carrying the inlet temperature unchanged.
                let t_out =
                    outlet_temperature.or_else(|| current.temperature.map(|q| q.si()));
                if let Some(t_out) = t_out {
                    let t_unit = target.temperature.map(|q| q.unit).unwrap_or_default();
                    target.temperature = Some(Qty::from_si(t_out, t_unit));
                }
                assigned.insert(target_id.clone());
            }

            if !visited.contains(&target_id) {
                queue.push_back(target_id);
            }
        }
    }

    Ok(PropagationOutcome {
        nodes: network
            .nodes
            .iter()
            .map(|n| nodes.remove(&n.id).unwrap_or_else(|| n.clone()))
            .collect(),
        segments: network
            .segments
            .iter()
            .map(|s| segments.remove(&s.id).unwrap_or_else(|| s.clone()))
            .collect(),
        warnings,
    })
}

fn missing_length(seg: &Segment) -> bool {
    matches!(seg.kind, SegmentKind::Pipeline { .. })
        && !seg.geometry.length.map(|q| q.si() > 0.0).unwrap_or(false)
}

//! The clock derivation graph: oscillator → PLL → domains.

use crate::domain::Phase;
use crate::plan::GeneratorPlan;
use bringup_common::Frequency;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use serde::Serialize;
use std::collections::BTreeMap;

/// A node in the clock graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ClockNode {
    /// A board reference oscillator.
    Oscillator {
        /// Input resource name.
        name: String,
        /// Oscillator frequency.
        frequency: Frequency,
    },
    /// The PLL VCO.
    Generator {
        /// VCO frequency.
        vco: Frequency,
    },
    /// A generated clock domain.
    Domain {
        /// Domain name.
        name: String,
        /// Output frequency.
        frequency: Frequency,
        /// Phase offset.
        phase: Phase,
    },
}

/// An edge in the clock graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ClockStep {
    /// Reference to VCO: `× M / N`.
    Multiply {
        /// Pre-divider N.
        pre_divide: u32,
        /// Feedback multiplier M.
        multiply: u32,
    },
    /// VCO to output: `/ C`, shifted by a number of phase steps.
    Divide {
        /// Output counter C.
        divide: u32,
        /// Phase shift steps.
        phase_steps: u32,
    },
}

/// Directed graph tracing every domain back to its oscillator.
#[derive(Debug, Clone)]
pub struct ClockGraph {
    graph: DiGraph<ClockNode, ClockStep>,
    domains: BTreeMap<String, NodeIndex>,
    order: Vec<NodeIndex>,
}

impl ClockGraph {
    /// Builds the graph for a plan.
    pub fn from_plan(plan: &GeneratorPlan) -> Self {
        let mut graph = DiGraph::new();
        let osc = plan.oscillator();
        let root = graph.add_node(ClockNode::Oscillator {
            name: osc.name.clone(),
            frequency: osc.frequency,
        });
        let config = plan.config();
        let vco = graph.add_node(ClockNode::Generator { vco: config.vco });
        graph.add_edge(
            root,
            vco,
            ClockStep::Multiply {
                pre_divide: config.pre_divide,
                multiply: config.multiply,
            },
        );

        let mut domains = BTreeMap::new();
        let mut order = Vec::with_capacity(plan.domains().len());
        for domain in plan.domains().iter() {
            let node = graph.add_node(ClockNode::Domain {
                name: domain.name.clone(),
                frequency: domain.frequency,
                phase: domain.phase,
            });
            graph.add_edge(
                vco,
                node,
                ClockStep::Divide {
                    divide: domain.provenance.divide,
                    phase_steps: domain.provenance.phase_steps,
                },
            );
            domains.insert(domain.name.clone(), node);
            order.push(node);
        }

        Self {
            graph,
            domains,
            order,
        }
    }

    /// Returns the node chain from the oscillator to the named domain.
    pub fn path_to(&self, domain: &str) -> Option<Vec<&ClockNode>> {
        let mut node = *self.domains.get(domain)?;
        let mut path = vec![&self.graph[node]];
        while let Some(parent) = self
            .graph
            .neighbors_directed(node, Direction::Incoming)
            .next()
        {
            path.push(&self.graph[parent]);
            node = parent;
        }
        path.reverse();
        Some(path)
    }

    /// Returns the oscillator the named domain is derived from.
    pub fn source_of(&self, domain: &str) -> Option<&ClockNode> {
        self.path_to(domain)?.into_iter().next()
    }

    /// Returns the edges from the oscillator to the named domain.
    pub fn steps_to(&self, domain: &str) -> Option<Vec<ClockStep>> {
        let mut node = *self.domains.get(domain)?;
        let mut steps = Vec::new();
        while let Some(edge) = self
            .graph
            .edges_directed(node, Direction::Incoming)
            .next()
        {
            steps.push(*edge.weight());
            node = edge.source();
        }
        steps.reverse();
        Some(steps)
    }

    /// Returns the domain names in PLL output order.
    pub fn domain_names(&self) -> Vec<&str> {
        self.order
            .iter()
            .filter_map(|&idx| match &self.graph[idx] {
                ClockNode::Domain { name, .. } => Some(name.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Returns the number of nodes.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DomainRequest;
    use crate::plan::{plan, Oscillator};
    use crate::pll::{PllSpec, SpeedGrade};
    use crate::topology::Topology;

    fn graph(topology: Topology) -> ClockGraph {
        plan(
            topology,
            Oscillator::new("clk50", Frequency::from_mhz(50)),
            vec![
                DomainRequest::primary("sys", Frequency::from_mhz(50)),
                DomainRequest::auxiliary("vga", Frequency::from_mhz(25)),
            ],
            PllSpec::cyclone_v(SpeedGrade::I7),
        )
        .unwrap()
        .graph()
    }

    #[test]
    fn every_domain_traces_to_oscillator() {
        let g = graph(Topology::HalfRate);
        for name in g.domain_names() {
            match g.source_of(name) {
                Some(ClockNode::Oscillator { name, .. }) => assert_eq!(name, "clk50"),
                other => panic!("unexpected source {other:?}"),
            }
        }
        assert_eq!(g.node_count(), 2 + 4);
    }

    #[test]
    fn path_goes_through_vco() {
        let g = graph(Topology::FullRate);
        let path = g.path_to("vga").unwrap();
        assert_eq!(path.len(), 3);
        assert!(matches!(path[1], ClockNode::Generator { .. }));
        let steps = g.steps_to("vga").unwrap();
        assert_eq!(
            steps,
            vec![
                ClockStep::Multiply {
                    pre_divide: 1,
                    multiply: 32
                },
                ClockStep::Divide {
                    divide: 64,
                    phase_steps: 0
                },
            ]
        );
        assert!(g.path_to("sys2x").is_none());
    }

    #[test]
    fn domain_order_matches_plan() {
        let g = graph(Topology::FullRate);
        assert_eq!(g.domain_names(), vec!["sys", "sys_ps", "vga"]);
    }
}

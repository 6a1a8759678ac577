pub mod dinic;
pub mod edmonds_karp;
pub mod error;
pub mod graph;
pub mod push_relabel_fifo;

use crate::maximum_flow::error::Result;
use crate::maximum_flow::graph::FlowNetwork;

/// Common contract of every maximum flow strategy.
///
/// A solver mutates the flow stored on `network` in place and returns the value of the flow
/// it added. Running a second solver on an already maximal flow therefore returns zero;
/// call [`FlowNetwork::reset_flows`] first to compare strategies on the same topology.
pub trait MaximumFlowSolver<Flow> {
    fn solve(&mut self, source: usize, sink: usize, network: &mut FlowNetwork<Flow>) -> Result<Flow>;
}

use crate::maximum_flow::error::Result;
use crate::maximum_flow::graph::FlowNetwork;
use crate::maximum_flow::MaximumFlowSolver;
use log::{debug, trace};
use num_traits::{NumAssign, Signed};
use std::collections::VecDeque;
use std::fmt::Debug;

/// Augments along shortest residual paths found by breadth-first search. O(nm^2)
#[derive(Default)]
pub struct EdmondsKarp;

impl<Flow> MaximumFlowSolver<Flow> for EdmondsKarp
where
    Flow: NumAssign + Signed + Ord + Copy + Debug,
{
    fn solve(&mut self, source: usize, sink: usize, network: &mut FlowNetwork<Flow>) -> Result<Flow> {
        network.check_terminals(source, sink)?;
        debug!("edmonds-karp: source={} sink={} n={} m={}", source, sink, network.num_vertices(), network.num_edges());

        let n = network.num_vertices();
        let mut prev = vec![usize::MAX; n];
        let mut visited = vec![false; n];
        let mut queue = VecDeque::new();
        let mut flow = Flow::zero();
        let mut augmentations = 0_usize;

        loop {
            prev.fill(usize::MAX);
            visited.fill(false);

            // bfs
            queue.clear();
            queue.push_back(source);
            visited[source] = true;
            while let Some(u) = queue.pop_front() {
                if u == sink {
                    break;
                }

                for &arc in network.neighbors(u) {
                    let edge = network.arc(arc);
                    if visited[edge.to] || edge.residual_capacity() == Flow::zero() {
                        continue;
                    }

                    visited[edge.to] = true;
                    prev[edge.to] = arc;
                    queue.push_back(edge.to);
                }
            }

            if !visited[sink] {
                break;
            }

            // calculate delta
            let mut delta = network.arc(prev[sink]).residual_capacity();
            let mut v = sink;
            while v != source {
                let edge = network.arc(prev[v]);
                delta = delta.min(edge.residual_capacity());
                v = edge.from;
            }

            // update flow
            let mut v = sink;
            while v != source {
                let arc = prev[v];
                network.push_flow_unchecked(arc, delta);
                v = network.arc(arc).from;
            }

            trace!("edmonds-karp: augmented {:?}", delta);
            flow += delta;
            augmentations += 1;
        }

        debug!("edmonds-karp: flow={:?} after {} augmentations", flow, augmentations);
        Ok(flow)
    }
}

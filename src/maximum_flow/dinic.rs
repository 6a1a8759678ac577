use crate::maximum_flow::error::Result;
use crate::maximum_flow::graph::FlowNetwork;
use crate::maximum_flow::MaximumFlowSolver;
use log::{debug, trace};
use num_traits::{NumAssign, Signed};
use std::collections::VecDeque;
use std::fmt::Debug;

const UNREACHED: usize = usize::MAX;

/// Blocking flows over BFS level graphs. O(n^2 m)
#[derive(Default)]
pub struct Dinic;

impl<Flow> MaximumFlowSolver<Flow> for Dinic
where
    Flow: NumAssign + Signed + Ord + Copy + Debug,
{
    fn solve(&mut self, source: usize, sink: usize, network: &mut FlowNetwork<Flow>) -> Result<Flow> {
        network.check_terminals(source, sink)?;
        debug!("dinic: source={} sink={} n={} m={}", source, sink, network.num_vertices(), network.num_edges());

        let mut phase = Phase::new(network.num_vertices());
        let mut flow = Flow::zero();
        let mut phases = 0_usize;

        while phase.update_levels(network, source, sink) {
            phases += 1;
            let mut phase_flow = Flow::zero();
            loop {
                let delta = phase.augment(network, source, sink);
                if delta == Flow::zero() {
                    break;
                }
                phase_flow += delta;
            }
            debug!("dinic: phase {} sink level {} pushed {:?}", phases, phase.levels[sink], phase_flow);
            flow += phase_flow;
        }

        debug!("dinic: flow={:?} after {} phases", flow, phases);
        Ok(flow)
    }
}

// working state of one solve call
struct Phase {
    levels: Vec<usize>,
    current_edge: Vec<usize>,
    que: VecDeque<usize>,
    path: Vec<usize>,
}

impl Phase {
    fn new(num_vertices: usize) -> Self {
        Self { levels: vec![UNREACHED; num_vertices], current_edge: vec![0; num_vertices], que: VecDeque::new(), path: Vec::new() }
    }

    // O(n + m)
    // levels[u] = distance from source to u in the residual network
    // returns whether sink is reachable
    fn update_levels<Flow>(&mut self, network: &FlowNetwork<Flow>, source: usize, sink: usize) -> bool
    where
        Flow: NumAssign + Signed + Ord + Copy + Debug,
    {
        self.levels.fill(UNREACHED);
        self.current_edge.fill(0);
        self.levels[source] = 0;
        self.que.clear();
        self.que.push_back(source);

        while let Some(u) = self.que.pop_front() {
            for &arc in network.neighbors(u) {
                let e = network.arc(arc);
                if self.levels[e.to] == UNREACHED && e.residual_capacity() > Flow::zero() {
                    self.levels[e.to] = self.levels[u] + 1;
                    self.que.push_back(e.to);
                }
            }
        }

        self.levels[sink] != UNREACHED
    }

    #[inline]
    fn is_admissible<Flow>(&self, network: &FlowNetwork<Flow>, u: usize, arc: usize) -> bool
    where
        Flow: NumAssign + Signed + Ord + Copy + Debug,
    {
        let e = network.arc(arc);
        e.residual_capacity() > Flow::zero() && self.levels[e.to] != UNREACHED && self.levels[e.to] == self.levels[u] + 1
    }

    // Depth-first search for one source-sink path in the level graph, kept on an explicit arc
    // stack. Arcs before current_edge[u] are known to lead nowhere in this phase.
    // Returns the amount pushed, zero once the level graph is blocked.
    fn augment<Flow>(&mut self, network: &mut FlowNetwork<Flow>, source: usize, sink: usize) -> Flow
    where
        Flow: NumAssign + Signed + Ord + Copy + Debug,
    {
        self.path.clear();
        let mut u = source;

        loop {
            if u == sink {
                let delta = self.path.iter().map(|&arc| network.arc(arc).residual_capacity()).min().unwrap_or_else(Flow::zero);
                for &arc in self.path.iter() {
                    network.push_flow_unchecked(arc, delta);
                }
                trace!("dinic: augmented {:?} along {} arcs", delta, self.path.len());
                return delta;
            }

            // advance
            let neighbors = network.neighbors(u);
            while self.current_edge[u] < neighbors.len() && !self.is_admissible(network, u, neighbors[self.current_edge[u]]) {
                self.current_edge[u] += 1;
            }

            if let Some(&arc) = neighbors.get(self.current_edge[u]) {
                self.path.push(arc);
                u = network.arc(arc).to;
                continue;
            }

            // retreat
            if u == source {
                return Flow::zero();
            }
            self.levels[u] = UNREACHED;
            match self.path.pop() {
                Some(arc) => {
                    u = network.arc(arc).from;
                    self.current_edge[u] += 1;
                }
                None => return Flow::zero(),
            }
        }
    }
}

use crate::maximum_flow::error::{FlowError, Result};
use crate::maximum_flow::graph::FlowNetwork;
use crate::maximum_flow::MaximumFlowSolver;
use log::{debug, trace};
use num_traits::{NumAssign, Signed};
use std::collections::VecDeque;
use std::fmt::Debug;

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PushRelabelConfig {
    /// Lift every vertex at or above an emptied height level (below n) to n + 1 at once.
    pub gap_relabeling: bool,
}

/// Preflow push-relabel with FIFO selection of active vertices. O(n^3)
#[derive(Default)]
pub struct PushRelabelFifo {
    config: PushRelabelConfig,
}

impl PushRelabelFifo {
    pub fn new(config: PushRelabelConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PushRelabelConfig {
        &self.config
    }
}

impl<Flow> MaximumFlowSolver<Flow> for PushRelabelFifo
where
    Flow: NumAssign + Signed + Ord + Copy + Debug,
{
    fn solve(&mut self, source: usize, sink: usize, network: &mut FlowNetwork<Flow>) -> Result<Flow> {
        network.check_terminals(source, sink)?;
        debug!("push-relabel: source={} sink={} n={} m={} gap={}", source, sink, network.num_vertices(), network.num_edges(), self.config.gap_relabeling);

        let mut preflow = Preflow::new(network, source, sink, self.config);
        preflow.pre_process(network);

        while let Some(u) = preflow.active_nodes.pop_front() {
            let height = preflow.heights[u];
            preflow.discharge(network, u)?;

            // may have become re-activatable by neighbors
            if preflow.heights[u] > height {
                preflow.activate(u);
            }
        }

        let flow = preflow.excesses[sink];
        debug!("push-relabel: flow={:?} pushes={} relabels={} gaps={}", flow, preflow.push_count, preflow.relabel_count, preflow.gap_count);
        Ok(flow)
    }
}

// working state of one solve call
struct Preflow<Flow> {
    source: usize,
    sink: usize,
    num_nodes: usize,
    config: PushRelabelConfig,

    heights: Vec<usize>,
    excesses: Vec<Flow>,
    current_edge: Vec<usize>,
    height_count: Vec<usize>,
    active_nodes: VecDeque<usize>,

    push_count: usize,
    relabel_count: usize,
    gap_count: usize,
}

impl<Flow> Preflow<Flow>
where
    Flow: NumAssign + Signed + Ord + Copy + Debug,
{
    fn new(network: &FlowNetwork<Flow>, source: usize, sink: usize, config: PushRelabelConfig) -> Self {
        let n = network.num_vertices();
        Self {
            source,
            sink,
            num_nodes: n,
            config,
            heights: vec![0; n],
            excesses: vec![Flow::zero(); n],
            current_edge: vec![0; n],
            height_count: vec![0; 2 * n],
            active_nodes: VecDeque::new(),
            push_count: 0,
            relabel_count: 0,
            gap_count: 0,
        }
    }

    #[inline]
    fn max_height(&self) -> usize {
        2 * self.num_nodes - 1
    }

    fn pre_process(&mut self, network: &mut FlowNetwork<Flow>) {
        self.heights[self.source] = self.num_nodes;
        self.height_count[0] = self.num_nodes - 1;
        self.height_count[self.num_nodes] = 1;

        // saturate every arc leaving source
        for i in 0..network.neighbors(self.source).len() {
            let arc = network.neighbors(self.source)[i];
            let edge = network.arc(arc);
            let (to, delta) = (edge.to, edge.residual_capacity());
            if to == self.source || delta <= Flow::zero() {
                continue;
            }
            network.push_flow_unchecked(arc, delta);
            self.excesses[self.source] -= delta;
            self.excesses[to] += delta;
        }

        for u in 0..self.num_nodes {
            if u != self.source && u != self.sink {
                self.active_nodes.push_back(u);
            }
        }
    }

    #[inline]
    fn activate(&mut self, u: usize) {
        if u != self.source && u != self.sink {
            self.active_nodes.push_back(u);
        }
    }

    fn discharge(&mut self, network: &mut FlowNetwork<Flow>, u: usize) -> Result<()> {
        if u == self.source || u == self.sink {
            return Err(FlowError::PrecondCheckFailure(format!("terminal {} selected for discharge", u)));
        }

        while self.excesses[u] > Flow::zero() {
            match network.neighbors(u).get(self.current_edge[u]).copied() {
                Some(arc) => {
                    if self.is_admissible(network, u, arc) {
                        self.push(network, u, arc);
                    } else {
                        self.current_edge[u] += 1;
                    }
                }
                None => {
                    let k = self.heights[u];
                    if self.config.gap_relabeling && k < self.num_nodes && self.height_count[k] == 1 {
                        self.gap_relabeling(k);
                    } else {
                        self.relabel(network, u)?;
                    }
                    self.current_edge[u] = 0;
                }
            }
        }

        Ok(())
    }

    #[inline]
    fn is_admissible(&self, network: &FlowNetwork<Flow>, u: usize, arc: usize) -> bool {
        let e = network.arc(arc);
        e.residual_capacity() > Flow::zero() && self.heights[u] == self.heights[e.to] + 1
    }

    // push from u
    fn push(&mut self, network: &mut FlowNetwork<Flow>, u: usize, arc: usize) {
        let edge = network.arc(arc);
        let to = edge.to;
        let delta = self.excesses[u].min(edge.residual_capacity());

        network.push_flow_unchecked(arc, delta);
        self.excesses[u] -= delta;
        self.excesses[to] += delta;
        self.push_count += 1;
        trace!("push-relabel: push {:?} along {} -> {}", delta, u, to);

        if self.excesses[to] == delta {
            self.activate(to);
        }
    }

    fn relabel(&mut self, network: &FlowNetwork<Flow>, u: usize) -> Result<()> {
        let new_height = network
            .neighbors(u)
            .iter()
            .map(|&arc| network.arc(arc))
            .filter(|edge| edge.residual_capacity() > Flow::zero())
            .map(|edge| self.heights[edge.to] + 1)
            .min()
            .ok_or_else(|| FlowError::PrecondCheckFailure(format!("vertex {} has excess {:?} but no residual arc", u, self.excesses[u])))?;

        if new_height <= self.heights[u] || new_height > self.max_height() {
            return Err(FlowError::PrecondCheckFailure(format!("relabel of vertex {} from {} to {} breaks the height bound", u, self.heights[u], new_height)));
        }

        trace!("push-relabel: relabel {} from {} to {}", u, self.heights[u], new_height);
        self.height_count[self.heights[u]] -= 1;
        self.heights[u] = new_height;
        self.height_count[new_height] += 1;
        self.relabel_count += 1;
        Ok(())
    }

    // gap relabeling heuristic
    // no vertex is left at height k, so nothing at or above k (and below n) reaches sink
    // set height[u] in [k, n) to n + 1
    // lifted heads may turn arcs behind other cursors admissible, so every cursor restarts
    // O(n)
    fn gap_relabeling(&mut self, k: usize) {
        let lifted = self.num_nodes + 1;
        for u in 0..self.num_nodes {
            let height = self.heights[u];
            if height >= k && height < self.num_nodes {
                self.height_count[height] -= 1;
                self.heights[u] = lifted;
                self.height_count[lifted] += 1;
            }
        }
        self.current_edge.fill(0);
        self.gap_count += 1;
        trace!("push-relabel: gap at height {}", k);
    }
}

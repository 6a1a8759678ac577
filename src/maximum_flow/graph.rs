use crate::maximum_flow::error::{FlowError, Result};
use num_traits::{NumAssign, Signed};
use std::collections::VecDeque;
use std::fmt::Debug;

/// A stored arc of the residual network.
///
/// Every edge added by the caller is stored as a forward arc at an even index followed by its
/// backward arc (capacity zero). `rev` is the index of the paired arc. The backward arc's flow
/// is the negation of the forward flow and may therefore be negative.
#[derive(PartialEq, Debug, Clone)]
pub struct Edge<Flow> {
    pub from: usize,
    pub to: usize,
    pub flow: Flow,
    pub capacity: Flow,
    pub rev: usize,
}

impl<Flow> Edge<Flow>
where
    Flow: NumAssign + Copy,
{
    #[inline]
    pub fn residual_capacity(&self) -> Flow {
        self.capacity - self.flow
    }
}

#[derive(Debug, Clone)]
pub struct FlowNetwork<Flow> {
    num_vertices: usize,
    edges: Vec<Edge<Flow>>,
    adjacency: Vec<Vec<usize>>,
}

impl<Flow> FlowNetwork<Flow>
where
    Flow: NumAssign + Signed + Ord + Copy + Debug,
{
    pub fn new(num_vertices: usize) -> Result<Self> {
        if num_vertices == 0 {
            return Err(FlowError::EmptyNetwork);
        }
        Ok(Self { num_vertices, edges: Vec::new(), adjacency: vec![Vec::new(); num_vertices] })
    }

    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.num_vertices
    }

    /// Number of edges added by the caller; each one is stored as two arcs.
    #[inline]
    pub fn num_edges(&self) -> usize {
        self.edges.len() / 2
    }

    #[inline]
    pub fn num_arcs(&self) -> usize {
        self.edges.len()
    }

    // return forward arc index
    pub fn add_edge(&mut self, from: usize, to: usize, capacity: Flow) -> Result<usize> {
        self.check_vertex(from)?;
        self.check_vertex(to)?;
        if capacity < Flow::zero() {
            return Err(FlowError::NegativeCapacity { from, to });
        }

        let forward = self.edges.len();
        let backward = forward + 1;
        self.edges.push(Edge { from, to, flow: Flow::zero(), capacity, rev: backward });
        self.edges.push(Edge { from: to, to: from, flow: Flow::zero(), capacity: Flow::zero(), rev: forward });
        self.adjacency[from].push(forward);
        self.adjacency[to].push(backward);

        Ok(forward)
    }

    pub fn edge(&self, arc: usize) -> Option<&Edge<Flow>> {
        self.edges.get(arc)
    }

    /// All stored arcs, forward and backward interleaved.
    pub fn edges(&self) -> &[Edge<Flow>] {
        &self.edges
    }

    /// Arc indices leaving `u`, in insertion order.
    #[inline]
    pub fn neighbors(&self, u: usize) -> &[usize] {
        &self.adjacency[u]
    }

    pub fn residual_capacity(&self, arc: usize) -> Result<Flow> {
        self.check_arc(arc)?;
        Ok(self.edges[arc].residual_capacity())
    }

    pub fn push_flow(&mut self, arc: usize, amount: Flow) -> Result<()> {
        self.check_arc(arc)?;
        let residual_capacity = self.edges[arc].residual_capacity();
        if amount < Flow::zero() || amount > residual_capacity {
            return Err(FlowError::PrecondCheckFailure(format!("cannot push {:?} along arc {} with residual capacity {:?}", amount, arc, residual_capacity)));
        }
        self.push_flow_unchecked(arc, amount);
        Ok(())
    }

    // solvers only push amounts bounded by the residual they just read
    #[inline]
    pub(crate) fn push_flow_unchecked(&mut self, arc: usize, amount: Flow) {
        debug_assert!(amount >= Flow::zero() && amount <= self.edges[arc].residual_capacity());
        let rev = self.edges[arc].rev;

        // update flow
        self.edges[arc].flow += amount;
        self.edges[rev].flow -= amount;
    }

    #[inline]
    pub(crate) fn arc(&self, arc: usize) -> &Edge<Flow> {
        &self.edges[arc]
    }

    pub fn reset_flows(&mut self) {
        self.edges.iter_mut().for_each(|e| e.flow = Flow::zero());
    }

    /// `(from, to, flow)` of every caller-added edge, in insertion order.
    pub fn flows(&self) -> impl Iterator<Item = (usize, usize, Flow)> + '_ {
        self.edges.iter().step_by(2).map(|e| (e.from, e.to, e.flow))
    }

    /// Inflow minus outflow of `u` over caller-added edges.
    pub fn net_flow(&self, u: usize) -> Flow {
        self.flows().fold(Flow::zero(), |mut flow, (from, to, f)| {
            if to == u {
                flow += f;
            }
            if from == u {
                flow -= f;
            }
            flow
        })
    }

    /// Net outflow of `source`.
    pub fn maximum_flow(&self, source: usize) -> Flow {
        -self.net_flow(source)
    }

    /// Vertices reachable from `source` through arcs with positive residual capacity.
    ///
    /// After a maximum flow has been computed this is the source side of a minimum cut.
    /// The returned vector is indexed by vertex.
    pub fn minimum_cut(&self, source: usize) -> Result<Vec<bool>> {
        self.check_vertex(source)?;
        let mut visited = vec![false; self.num_vertices];
        let mut que = VecDeque::from([source]);
        visited[source] = true;

        while let Some(u) = que.pop_front() {
            for &i in self.adjacency[u].iter() {
                let e = &self.edges[i];
                if !visited[e.to] && e.residual_capacity() > Flow::zero() {
                    visited[e.to] = true;
                    que.push_back(e.to);
                }
            }
        }

        Ok(visited)
    }

    /// Total capacity of caller-added edges leaving `source_side` for the rest.
    /// `source_side` is indexed by vertex, as returned by [`FlowNetwork::minimum_cut`].
    pub fn cut_capacity(&self, source_side: &[bool]) -> Result<Flow> {
        if source_side.len() != self.num_vertices {
            return Err(FlowError::CutSizeMismatch { len: source_side.len(), num_vertices: self.num_vertices });
        }
        Ok(self.edges.iter().step_by(2).filter(|e| source_side[e.from] && !source_side[e.to]).fold(Flow::zero(), |sum, e| sum + e.capacity))
    }

    pub(crate) fn check_terminals(&self, source: usize, sink: usize) -> Result<()> {
        self.check_vertex(source)?;
        self.check_vertex(sink)?;
        if source == sink {
            return Err(FlowError::SourceIsSink(source));
        }
        Ok(())
    }

    fn check_vertex(&self, vertex: usize) -> Result<()> {
        if vertex >= self.num_vertices {
            return Err(FlowError::VertexOutOfRange { vertex, num_vertices: self.num_vertices });
        }
        Ok(())
    }

    fn check_arc(&self, arc: usize) -> Result<()> {
        if arc >= self.edges.len() {
            return Err(FlowError::ArcOutOfRange { arc, num_arcs: self.edges.len() });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_network() {
        assert_eq!(FlowNetwork::<i64>::new(0).unwrap_err(), FlowError::EmptyNetwork);
    }

    #[test]
    fn add_edge_validates_input() {
        let mut network = FlowNetwork::<i64>::new(3).unwrap();
        assert_eq!(network.add_edge(0, 3, 1), Err(FlowError::VertexOutOfRange { vertex: 3, num_vertices: 3 }));
        assert_eq!(network.add_edge(5, 0, 1), Err(FlowError::VertexOutOfRange { vertex: 5, num_vertices: 3 }));
        assert_eq!(network.add_edge(0, 1, -1), Err(FlowError::NegativeCapacity { from: 0, to: 1 }));
        assert_eq!(network.num_edges(), 0);
    }

    #[test]
    fn add_edge_links_forward_and_backward_arcs() {
        let mut network = FlowNetwork::<i64>::new(3).unwrap();
        assert_eq!(network.add_edge(0, 1, 5), Ok(0));
        assert_eq!(network.add_edge(0, 1, 7), Ok(2));
        assert_eq!(network.add_edge(2, 2, 3), Ok(4));

        assert_eq!(network.num_edges(), 3);
        assert_eq!(network.num_arcs(), 6);
        assert_eq!(network.edge(1), Some(&Edge { from: 1, to: 0, flow: 0, capacity: 0, rev: 0 }));
        assert_eq!(network.edge(2).unwrap().rev, 3);
        assert_eq!(network.neighbors(0), &[0, 2]);
        assert_eq!(network.neighbors(1), &[1, 3]);
        assert_eq!(network.neighbors(2), &[4, 5]);
    }

    #[test]
    fn push_flow_updates_both_arcs() {
        let mut network = FlowNetwork::<i32>::new(2).unwrap();
        let e = network.add_edge(0, 1, 10).unwrap();

        network.push_flow(e, 4).unwrap();
        assert_eq!(network.residual_capacity(e), Ok(6));
        assert_eq!(network.residual_capacity(e + 1), Ok(4));
        assert_eq!(network.edge(e + 1).unwrap().flow, -4);

        // cancel through the backward arc
        network.push_flow(e + 1, 3).unwrap();
        assert_eq!(network.edge(e).unwrap().flow, 1);
        assert_eq!(network.flows().collect::<Vec<_>>(), vec![(0, 1, 1)]);
        assert_eq!(network.maximum_flow(0), 1);
        assert_eq!(network.net_flow(1), 1);
    }

    #[test]
    fn push_flow_rejects_over_push() {
        let mut network = FlowNetwork::<i32>::new(2).unwrap();
        let e = network.add_edge(0, 1, 2).unwrap();

        assert!(matches!(network.push_flow(e, 3), Err(FlowError::PrecondCheckFailure(_))));
        assert!(matches!(network.push_flow(e, -1), Err(FlowError::PrecondCheckFailure(_))));
        assert_eq!(network.push_flow(9, 1), Err(FlowError::ArcOutOfRange { arc: 9, num_arcs: 2 }));
        assert_eq!(network.edge(e).unwrap().flow, 0);
    }

    #[test]
    fn reset_flows_clears_every_arc() {
        let mut network = FlowNetwork::<i64>::new(3).unwrap();
        let a = network.add_edge(0, 1, 3).unwrap();
        let b = network.add_edge(1, 2, 3).unwrap();
        network.push_flow(a, 2).unwrap();
        network.push_flow(b, 2).unwrap();

        network.reset_flows();
        assert!(network.edges().iter().all(|e| e.flow == 0));
    }

    #[test]
    fn minimum_cut_follows_residual_arcs() {
        let mut network = FlowNetwork::<i64>::new(4).unwrap();
        let a = network.add_edge(0, 1, 1).unwrap();
        network.add_edge(1, 2, 5).unwrap();
        network.add_edge(3, 0, 4).unwrap();
        network.push_flow(a, 1).unwrap();

        let side = network.minimum_cut(0).unwrap();
        assert_eq!(side, vec![true, false, false, false]);
        assert_eq!(network.cut_capacity(&side), Ok(1));
    }

    #[test]
    fn cut_capacity_rejects_wrong_length() {
        let mut network = FlowNetwork::<i64>::new(3).unwrap();
        network.add_edge(0, 2, 4).unwrap();

        assert_eq!(network.cut_capacity(&[true]), Err(FlowError::CutSizeMismatch { len: 1, num_vertices: 3 }));
        assert_eq!(network.cut_capacity(&[true, true, true, false]), Err(FlowError::CutSizeMismatch { len: 4, num_vertices: 3 }));
        assert!(network.cut_capacity(&[true]).unwrap_err().is_invalid_argument());
        assert_eq!(network.cut_capacity(&[true, true, false]), Ok(4));
    }
}

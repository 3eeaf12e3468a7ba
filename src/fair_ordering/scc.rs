/*
    Copyright © 2023, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! Collapse of the precedence graph into its strongly connected components (SCCs).
//!
//! Commands in the same SCC are mutually reachable: the precedence rule cannot decide which of them
//! goes first, so they are treated as one tied group from here on.
//!
//! SCCs are found with Tarjan's algorithm, run with an explicit stack instead of recursion so that a
//! long chain of precedences cannot overflow the thread's stack. The traversal is the same as the
//! recursive formulation's: roots are tried in ascending node order, successors are visited in
//! successor-list order, and SCC ids are handed out in the order SCCs are completed. Given the same
//! graph, every replica therefore computes the same SCC ids with the same members.

use super::graph::PrecedenceGraph;

/// Result of collapsing a [`PrecedenceGraph`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct StronglyConnectedComponents {
    /// `belongs_to[node]` is the id of the SCC that `node` is in.
    belongs_to: Vec<usize>,

    /// `members[scc]` lists the nodes in SCC `scc`, in the order they were popped off Tarjan's stack.
    members: Vec<Vec<usize>>,
}

impl StronglyConnectedComponents {
    pub(crate) fn count(&self) -> usize {
        self.members.len()
    }

    pub(crate) fn belongs_to(&self, node: usize) -> usize {
        self.belongs_to[node]
    }

    pub(crate) fn members(&self, scc: usize) -> &[usize] {
        &self.members[scc]
    }
}

/// Per-node bookkeeping of Tarjan's algorithm.
struct Tarjan<'g> {
    graph: &'g PrecedenceGraph,
    next_discovery: usize,
    discovery: Vec<Option<usize>>,
    low_link: Vec<usize>,
    on_stack: Vec<bool>,
    stack: Vec<usize>,
    belongs_to: Vec<usize>,
    members: Vec<Vec<usize>>,
}

impl<'g> Tarjan<'g> {
    fn new(graph: &'g PrecedenceGraph) -> Self {
        let node_count = graph.node_count();
        Self {
            graph,
            next_discovery: 0,
            discovery: vec![None; node_count],
            low_link: vec![0; node_count],
            on_stack: vec![false; node_count],
            stack: Vec::with_capacity(node_count),
            belongs_to: vec![0; node_count],
            members: Vec::new(),
        }
    }

    fn discover(&mut self, node: usize) {
        self.discovery[node] = Some(self.next_discovery);
        self.low_link[node] = self.next_discovery;
        self.next_discovery += 1;
        self.stack.push(node);
        self.on_stack[node] = true;
    }

    /// Depth-first search from `root`, which must not have been discovered yet.
    ///
    /// Each frame on `call_stack` is a node together with the position of the next successor of that
    /// node to look at.
    fn search(&mut self, root: usize) {
        let graph = self.graph;
        self.discover(root);
        let mut call_stack: Vec<(usize, usize)> = vec![(root, 0)];

        while let Some(&(node, next_successor)) = call_stack.last() {
            if let Some(&successor) = graph.successors(node).get(next_successor) {
                let top = call_stack.len() - 1;
                call_stack[top].1 += 1;

                match self.discovery[successor] {
                    None => {
                        self.discover(successor);
                        call_stack.push((successor, 0));
                    }
                    Some(discovered_at) if self.on_stack[successor] => {
                        self.low_link[node] = self.low_link[node].min(discovered_at);
                    }
                    Some(_) => {}
                }
            } else {
                call_stack.pop();
                if Some(self.low_link[node]) == self.discovery[node] {
                    self.complete_scc(node);
                }
                if let Some(&(parent, _)) = call_stack.last() {
                    self.low_link[parent] = self.low_link[parent].min(self.low_link[node]);
                }
            }
        }
    }

    /// Pop the SCC rooted at `root` off the stack and give it the next SCC id.
    fn complete_scc(&mut self, root: usize) {
        let scc = self.members.len();
        let mut members = Vec::new();
        while let Some(member) = self.stack.pop() {
            self.on_stack[member] = false;
            self.belongs_to[member] = scc;
            members.push(member);
            if member == root {
                break;
            }
        }
        self.members.push(members);
    }
}

/// Find the strongly connected components of `graph`. Never fails.
pub(crate) fn collapse(graph: &PrecedenceGraph) -> StronglyConnectedComponents {
    let mut tarjan = Tarjan::new(graph);
    for root in 0..graph.node_count() {
        if tarjan.discovery[root].is_none() {
            tarjan.search(root);
        }
    }

    log::trace!(
        "Collapsed {} commands into {} strongly connected components",
        graph.node_count(),
        tarjan.members.len()
    );

    StronglyConnectedComponents {
        belongs_to: tarjan.belongs_to,
        members: tarjan.members,
    }
}

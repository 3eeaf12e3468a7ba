/*
    Copyright © 2023, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! Construction of the precedence graph: the directed graph whose edge `j -> i` says "enough
//! replicas received command `j` before command `i` for that to be binding".

use std::collections::HashMap;

use crate::types::{data_types::CommandId, ordered_list::OrderedList};

use super::types::{FairOrderingError, Fairness};

/// Dense numbering of the distinct commands in the reference ordering.
///
/// Indices are assigned `0, 1, 2, ...` in the order commands are first seen while scanning the
/// reference ordering. Since every replica scans the same reference ordering, every replica assigns
/// the same indices.
#[derive(Debug)]
pub(crate) struct CommandIndex {
    indices: HashMap<CommandId, usize>,
    commands: Vec<CommandId>,
}

impl CommandIndex {
    pub(crate) fn from_reference(reference: &OrderedList) -> Self {
        let mut indices = HashMap::with_capacity(reference.len());
        let mut commands = Vec::with_capacity(reference.len());
        for command in &reference.commands {
            indices.entry(*command).or_insert_with(|| {
                commands.push(*command);
                commands.len() - 1
            });
        }

        Self { indices, commands }
    }

    /// Number of distinct commands.
    pub(crate) fn len(&self) -> usize {
        self.commands.len()
    }

    pub(crate) fn index(&self, command: &CommandId) -> Option<usize> {
        self.indices.get(command).copied()
    }

    pub(crate) fn command(&self, index: usize) -> CommandId {
        self.commands[index]
    }
}

/// Directed graph over command indices, stored as one successor list per node.
///
/// Successor lists preserve insertion order. Nothing stops the same edge from being added twice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PrecedenceGraph {
    successors: Vec<Vec<usize>>,
}

impl PrecedenceGraph {
    /// Create a graph with `node_count` nodes and no edges.
    pub(crate) fn new(node_count: usize) -> Self {
        Self {
            successors: vec![Vec::new(); node_count],
        }
    }

    pub(crate) fn add_edge(&mut self, from: usize, to: usize) {
        self.successors[from].push(to);
    }

    pub(crate) fn node_count(&self) -> usize {
        self.successors.len()
    }

    pub(crate) fn successors(&self, node: usize) -> &[usize] {
        &self.successors[node]
    }

    pub(crate) fn edge_count(&self) -> usize {
        self.successors.iter().map(Vec::len).sum()
    }

    /// Iterate through every edge `(from, to)`, grouped by `from` in ascending order.
    pub(crate) fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.successors
            .iter()
            .enumerate()
            .flat_map(|(from, tos)| tos.iter().map(move |&to| (from, to)))
    }
}

/// Check the preconditions of a fair ordering round, then build its precedence graph.
///
/// Every ordering in `orderings` is [sorted by timestamp](OrderedList::sort_by_timestamp) *in place*
/// as a side effect, but only after the preconditions have been checked.
///
/// # Edges
///
/// For every ordered pair of distinct commands `(j, i)` from the reference ordering
/// (`orderings[0]`), the edge `j -> i` is added if the number of replicas that
/// [received `j` before `i`](received_before) is strictly greater than
/// `fairness.threshold(orderings.len())`. Edges are added in ascending order of `i`, and for equal
/// `i` in ascending order of `j`.
///
/// # Errors
///
/// - [`FairOrderingError::EmptyReplicaSet`] if `orderings` is empty.
/// - [`FairOrderingError::MalformedOrderedList`] if `orderings[0]` is empty or not well formed.
pub(crate) fn build(
    orderings: &mut [OrderedList],
    fairness: Fairness,
) -> Result<(PrecedenceGraph, CommandIndex), FairOrderingError> {
    let reference = orderings.first().ok_or(FairOrderingError::EmptyReplicaSet)?;
    if reference.is_empty() || !reference.is_well_formed() {
        return Err(FairOrderingError::MalformedOrderedList {
            commands: reference.commands.len(),
            timestamps: reference.timestamps.len(),
        });
    }

    for (replica, ordering) in orderings.iter_mut().enumerate() {
        if !ordering.is_well_formed() {
            log::warn!(
                "Ordering of replica {} has {} commands but {} timestamps; unpaired commands are treated as received last",
                replica,
                ordering.commands.len(),
                ordering.timestamps.len()
            );
        }
        ordering.sort_by_timestamp();
    }

    let index = CommandIndex::from_reference(&orderings[0]);
    let positions: Vec<Vec<Option<usize>>> = orderings
        .iter()
        .map(|ordering| first_positions(ordering, &index))
        .collect();

    let threshold = fairness.threshold(orderings.len());
    let mut graph = PrecedenceGraph::new(index.len());
    for i in 0..index.len() {
        for j in 0..index.len() {
            if j != i && received_before(j, i, &positions) as f64 > threshold {
                graph.add_edge(j, i);
            }
        }
    }

    log::debug!(
        "Built precedence graph over {} commands from {} orderings (threshold {}): {} edges",
        index.len(),
        orderings.len(),
        threshold,
        graph.edge_count()
    );

    Ok((graph, index))
}

/// For every command in `index`, the position at which it first appears in `ordering`, if at all.
fn first_positions(ordering: &OrderedList, index: &CommandIndex) -> Vec<Option<usize>> {
    let mut positions = vec![None; index.len()];
    for (position, command) in ordering.commands.iter().enumerate() {
        if let Some(command_index) = index.index(command) {
            positions[command_index].get_or_insert(position);
        }
    }
    positions
}

/// Count the replicas that received command `j` before command `i`.
///
/// A replica counts if, scanning its ordering from the start, it runs into `j` before it runs into
/// `i`. In particular, a replica that has `j` but not `i` counts, while a replica that has neither
/// does not.
fn received_before(j: usize, i: usize, positions: &[Vec<Option<usize>>]) -> usize {
    positions
        .iter()
        .filter(|replica| match (replica[j], replica[i]) {
            (Some(position_j), Some(position_i)) => position_j < position_i,
            (Some(_), None) => true,
            (None, _) => false,
        })
        .count()
}

/*
    Copyright © 2023, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! Level-by-level topological scheduling of the SCC condensation into [`Batch`]es.
//!
//! The condensation is the DAG that remains after every SCC of the precedence graph is replaced by a
//! single node. Scheduling runs Kahn's algorithm over it, except that instead of taking one ready SCC
//! at a time, it takes *every* ready SCC at once, and emits all of their commands as one batch. The
//! number of batches is therefore the number of levels of the condensation, not the number of SCCs.

use super::{
    graph::{CommandIndex, PrecedenceGraph},
    scc::StronglyConnectedComponents,
    types::{Batch, FairOrderingError},
};

/// The DAG over SCC ids induced by a precedence graph.
///
/// Every precedence edge that crosses from one SCC into another becomes one condensation edge, even
/// if another precedence edge already connects the same pair of SCCs. The in-degree of an SCC hence
/// counts precedence edges, not predecessor SCCs, and an SCC only becomes ready once *all* of the
/// precedence edges into it have been resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Condensation {
    successors: Vec<Vec<usize>>,
    in_degree: Vec<usize>,
}

impl Condensation {
    pub(crate) fn new(graph: &PrecedenceGraph, sccs: &StronglyConnectedComponents) -> Self {
        let mut successors = vec![Vec::new(); sccs.count()];
        let mut in_degree = vec![0; sccs.count()];
        for (from, to) in graph.edges() {
            let (from_scc, to_scc) = (sccs.belongs_to(from), sccs.belongs_to(to));
            if from_scc != to_scc {
                successors[from_scc].push(to_scc);
                in_degree[to_scc] += 1;
            }
        }

        Self {
            successors,
            in_degree,
        }
    }

    pub(crate) fn in_degree(&self, scc: usize) -> usize {
        self.in_degree[scc]
    }
}

/// Drain `condensation` level by level, emitting the commands of every level as one [`Batch`].
///
/// Consumes the condensation, since draining it zeroes its in-degrees.
///
/// # Errors
///
/// Returns [`FairOrderingError::SchedulingInvariantViolation`] if the batches do not contain every
/// command in `index` exactly once, i.e., if some SCCs never became ready.
pub(crate) fn schedule(
    mut condensation: Condensation,
    sccs: &StronglyConnectedComponents,
    index: &CommandIndex,
) -> Result<Vec<Batch>, FairOrderingError> {
    let mut ready: Vec<usize> = (0..sccs.count())
        .filter(|&scc| condensation.in_degree(scc) == 0)
        .collect();

    let mut batches = Vec::new();
    let mut scheduled = 0;
    while !ready.is_empty() {
        let mut batch = Batch::new();
        let mut next_ready = Vec::new();
        for scc in ready {
            for &node in sccs.members(scc) {
                if batch.insert(index.command(node)) {
                    scheduled += 1;
                }
            }
            for &successor in &condensation.successors[scc] {
                condensation.in_degree[successor] -= 1;
                if condensation.in_degree[successor] == 0 {
                    next_ready.push(successor);
                }
            }
        }
        batches.push(batch);
        ready = next_ready;
    }

    if scheduled != index.len() {
        log::error!(
            "Fair ordering scheduled {} out of {} distinct commands; the SCC condensation is not acyclic",
            scheduled,
            index.len()
        );
        return Err(FairOrderingError::SchedulingInvariantViolation {
            scheduled,
            distinct_commands: index.len(),
        });
    }

    log::trace!(
        "Scheduled {} commands from {} SCCs into {} batches",
        scheduled,
        sccs.count(),
        batches.len()
    );

    Ok(batches)
}

/*
    Copyright © 2023, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! Engine that merges the command orderings of many replicas into one fair ordering.
//!
//! ## Why fair ordering
//!
//! Plain HotStuff lets the leader of a view put pending commands into its block in any order it
//! likes. A Byzantine leader can use this to front-run or censor. With fair ordering, every replica
//! attaches to its vote an [`OrderedList`]: the pending commands it knows about, in the order it
//! received them. The next leader then runs [`order`] over the orderings it collected, and proposes
//! blocks whose contents follow the result. No single replica, and no minority of replicas, can
//! change which of two commands comes first.
//!
//! ## How it works
//!
//! [`order`] runs three stages, all within a single call and without keeping any state between
//! calls:
//! 1. **Precedence graph** ([`graph`]): every ordering is sorted by timestamp, and the distinct
//!    commands of the *reference* ordering (the leader's own, at index 0) are numbered. For every
//!    ordered pair of commands `(j, i)`, an edge `j -> i` is added if more than
//!    `fairness × n_replica` replicas received `j` before `i`.
//! 2. **SCC collapse** ([`scc`]): commands that are mutually reachable in the precedence graph
//!    cannot be ordered relative to each other, and are merged into one strongly connected component.
//! 3. **Batch scheduling** ([`schedule`]): the DAG of SCCs is topologically sorted level by level.
//!    All SCCs in the same level form one [`Batch`].
//!
//! The result is a sequence of batches. The batch sequence is the commit order, while commands in the
//! same batch are tied.
//!
//! ## Reference ordering
//!
//! Only commands that appear in the reference ordering are scheduled. A command that only other
//! replicas have seen is left out of this round's result, even if every other replica has it.
//!
//! ## Determinism
//!
//! Given the same orderings (in the same sequence) and the same fairness, every replica computes the
//! same batches: command numbering follows the reference ordering, the graph and SCC traversals run in
//! ascending numeric order, and batches iterate in ascending [`CommandId`] order.

pub(crate) mod graph;

pub(crate) mod scc;

pub(crate) mod schedule;

pub mod types;

use crate::types::{data_types::CommandId, ordered_list::OrderedList};

use self::{
    schedule::Condensation,
    types::{Batch, FairOrderingError, Fairness},
};

/// Merge `proposal_orderings` into a sequence of [`Batch`]es, such that the precedence between any
/// two commands in different batches is backed by more than `fairness × proposal_orderings.len()`
/// replicas.
///
/// `proposal_orderings[0]` must be the proposer's own ordering; only its commands are scheduled.
///
/// # Side effects
///
/// Every ordering in `proposal_orderings` is sorted by timestamp in place. Callers that need the
/// original sequence must keep their own copy.
///
/// # Errors
///
/// - [`FairOrderingError::EmptyReplicaSet`] if `proposal_orderings` is empty.
/// - [`FairOrderingError::MalformedOrderedList`] if the reference ordering is empty, or has a
///   different number of commands and timestamps. Nothing is sorted in this case.
/// - [`FairOrderingError::SchedulingInvariantViolation`] if the result would not contain every
///   distinct command of the reference ordering exactly once. This never happens unless this crate
///   has a bug.
pub fn order(
    proposal_orderings: &mut [OrderedList],
    fairness: Fairness,
) -> Result<Vec<Batch>, FairOrderingError> {
    let (graph, index) = graph::build(proposal_orderings, fairness)?;
    let sccs = scc::collapse(&graph);
    let condensation = Condensation::new(&graph, &sccs);
    let batches = schedule::schedule(condensation, &sccs, &index)?;

    log::debug!(
        "Fairly ordered {} commands from {} orderings into {} batches",
        index.len(),
        proposal_orderings.len(),
        batches.len()
    );

    Ok(batches)
}

/// Like [`order`], but leaves the caller's orderings untouched by running on a copy of them.
pub fn order_cloned(
    proposal_orderings: &[OrderedList],
    fairness: Fairness,
) -> Result<Vec<Batch>, FairOrderingError> {
    let mut snapshot = proposal_orderings.to_vec();
    order(&mut snapshot, fairness)
}

/// Whether `batches` contain every distinct command of `reference` exactly once, and nothing else.
pub fn covers_reference(batches: &[Batch], reference: &OrderedList) -> bool {
    let mut expected: Vec<CommandId> = reference.commands.clone();
    expected.sort();
    expected.dedup();

    let mut actual = types::commit_sequence(batches);
    actual.sort();

    expected == actual
}

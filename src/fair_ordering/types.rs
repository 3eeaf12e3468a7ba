/*
    Copyright © 2023, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! Definitions of types that go into and come out of the fair ordering [engine](super::order).

use std::collections::{btree_set, BTreeSet};

use crate::types::data_types::CommandId;

/// Fraction of the replicas that must agree that one command came before another for that
/// precedence to be binding.
///
/// Written `g` in the Aequitas literature. Must lie in the open interval `(0, 1)`:
/// - Values closer to 1 demand near-unanimous agreement before two commands are ordered. Fewer
///   precedences are binding, so more commands end up in the same batch.
/// - Values at or below 0.5 allow a command pair to be "ordered" in both directions at once. The
///   engine then treats the pair as tied.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
pub struct Fairness(f64);

impl Fairness {
    /// Create a new `Fairness` with inner value `g`.
    ///
    /// # Errors
    ///
    /// Returns an [`InvalidFairnessError`] if `g` is not strictly between 0 and 1 (this includes NaN).
    pub fn new(g: f64) -> Result<Self, InvalidFairnessError> {
        if g > 0.0 && g < 1.0 {
            Ok(Self(g))
        } else {
            Err(InvalidFairnessError { fairness: g })
        }
    }

    /// Get the inner `f64` value of this `Fairness`.
    pub const fn get(&self) -> f64 {
        self.0
    }

    /// The number of replicas that a precedence needs to be supported by *more than* in order to be
    /// binding, given that `n_replica` replicas submitted orderings.
    pub fn threshold(&self, n_replica: usize) -> f64 {
        self.0 * n_replica as f64
    }
}

/// Returned by [`Fairness::new`] when the requested value is outside of `(0, 1)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InvalidFairnessError {
    pub fairness: f64,
}

/// Set of commands that become ready to commit in the same scheduling round.
///
/// The fair ordering engine outputs a sequence of batches. The order *between* batches is the commit
/// order. The order *within* a batch is not decided by the fairness rule: its commands are genuinely
/// tied. To make sure that every replica nevertheless packs a batch into blocks in the same sequence,
/// [`iter`](Self::iter) yields commands in ascending [`CommandId`] order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Batch(BTreeSet<CommandId>);

impl Batch {
    /// Create a new, empty `Batch`.
    pub fn new() -> Self {
        Self(BTreeSet::new())
    }

    /// Add `command` to this batch. Returns whether the command was not already in the batch.
    pub(crate) fn insert(&mut self, command: CommandId) -> bool {
        self.0.insert(command)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, command: &CommandId) -> bool {
        self.0.contains(command)
    }

    /// Iterate through the commands in this batch, in ascending `CommandId` order.
    pub fn iter(&self) -> btree_set::Iter<'_, CommandId> {
        self.0.iter()
    }

    /// Get the commands in this batch as a vector, in ascending `CommandId` order.
    pub fn to_vec(&self) -> Vec<CommandId> {
        self.0.iter().copied().collect()
    }
}

impl FromIterator<CommandId> for Batch {
    fn from_iter<I: IntoIterator<Item = CommandId>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for Batch {
    type Item = CommandId;
    type IntoIter = btree_set::IntoIter<CommandId>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Batch {
    type Item = &'a CommandId;
    type IntoIter = btree_set::Iter<'a, CommandId>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Flatten `batches` into a single commit sequence: batch by batch, and within every batch in
/// ascending `CommandId` order.
pub fn commit_sequence(batches: &[Batch]) -> Vec<CommandId> {
    batches.iter().flat_map(|batch| batch.iter().copied()).collect()
}

/// The different ways a call to [`order`](super::order) can fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FairOrderingError {
    /// No orderings were supplied. There is nothing to fairly order this round; the caller may fall
    /// back to the proposer's own ordering.
    EmptyReplicaSet,

    /// The reference ordering (the proposer's, at index 0) is empty, or its commands and timestamps
    /// are not index-aligned. This points at a bug in whatever constructed the list.
    MalformedOrderedList { commands: usize, timestamps: usize },

    /// Scheduling finished without emitting every distinct command exactly once. This can only happen
    /// if the SCC condensation still contains a cycle, and means that the guarantee "every command
    /// agreed upon is eventually ordered" no longer holds. Callers should treat this as fatal.
    SchedulingInvariantViolation {
        scheduled: usize,
        distinct_commands: usize,
    },
}

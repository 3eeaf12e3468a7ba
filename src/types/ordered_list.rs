/*
    Copyright © 2023, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! Definition of the [`OrderedList`] type: a single replica's view of the order in which pending
//! commands arrived.

use borsh::{BorshDeserialize, BorshSerialize};

use super::data_types::{CommandId, Timestamp};

/// Sequence of commands observed by one replica, together with the local time at which each command
/// was received.
///
/// `commands[k]` was received at `timestamps[k]`. A well-formed `OrderedList` therefore has
/// `commands.len() == timestamps.len()`, and contains every command at most once. Neither property is
/// enforced on construction: `OrderedList`s arrive from other replicas, and it is the
/// [fair ordering engine](crate::fair_ordering::order) that decides what to do with malformed ones.
///
/// Replicas attach an `OrderedList` to every vote they send. The leader then feeds the set of
/// `OrderedList`s it collected for a proposal into [`order`](crate::fair_ordering::order).
#[derive(Clone, Debug, Default, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct OrderedList {
    pub commands: Vec<CommandId>,
    pub timestamps: Vec<Timestamp>,
}

impl OrderedList {
    /// Create a new `OrderedList` from index-aligned `commands` and `timestamps`.
    pub fn new(commands: Vec<CommandId>, timestamps: Vec<Timestamp>) -> Self {
        Self {
            commands,
            timestamps,
        }
    }

    /// Create a new `OrderedList` from `(command, timestamp)` pairs.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (CommandId, Timestamp)>) -> Self {
        let (commands, timestamps) = pairs.into_iter().unzip();
        Self {
            commands,
            timestamps,
        }
    }

    /// Number of commands in this list.
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Whether every command in this list has exactly one timestamp.
    pub fn is_well_formed(&self) -> bool {
        self.commands.len() == self.timestamps.len()
    }

    /// Iterate through the `(command, timestamp)` pairs in this list, in list order.
    ///
    /// Commands without a matching timestamp (only possible if this list is not
    /// [well formed](Self::is_well_formed)) are skipped.
    pub fn iter(&self) -> impl Iterator<Item = (&CommandId, &Timestamp)> {
        self.commands.iter().zip(self.timestamps.iter())
    }

    /// Put this list in canonical order: ascending by timestamp.
    ///
    /// The sort is stable, so commands received at the same timestamp keep their relative order, and
    /// it moves each command together with its own timestamp. Sorting an already sorted list is a
    /// no-op.
    ///
    /// If this list is not well formed, only the leading `min(commands.len(), timestamps.len())`
    /// pairs are sorted. Unpaired trailing entries stay where they are.
    pub fn sort_by_timestamp(&mut self) {
        let paired = self.commands.len().min(self.timestamps.len());

        let mut pairs: Vec<(CommandId, Timestamp)> = self.commands[..paired]
            .iter()
            .copied()
            .zip(self.timestamps[..paired].iter().copied())
            .collect();
        pairs.sort_by_key(|&(_, timestamp)| timestamp);

        for (position, (command, timestamp)) in pairs.into_iter().enumerate() {
            self.commands[position] = command;
            self.timestamps[position] = timestamp;
        }
    }

    /// Whether this list is already in canonical order.
    pub fn is_sorted_by_timestamp(&self) -> bool {
        self.timestamps.windows(2).all(|pair| pair[0] <= pair[1])
    }
}

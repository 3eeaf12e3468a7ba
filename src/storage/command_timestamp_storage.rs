/*
    Copyright © 2023, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! Replica-side record of which commands have been received, and when.

use std::collections::{HashMap, HashSet};

use crate::types::{
    data_types::{CommandId, CryptoHash, Timestamp},
    ordered_list::OrderedList,
};

/// Stores, for a single replica:
/// 1. Every command the replica has ever received, together with the time it was first received.
/// 2. The *available* commands: those received but not yet included in an accepted proposal. These
///    are what the replica proposes to order next.
/// 3. The [`OrderedList`] the replica attached to its vote for each block, so that it can answer
///    consistently if asked for the same block again.
///
/// ## Timestamps
///
/// [`add_command`](Self::add_command) stamps commands with the current wall-clock time. Only the
/// relative order of a replica's own timestamps matters to the fair ordering engine, so clocks do not
/// need to be synchronized across replicas.
#[derive(Debug, Default, Clone)]
pub struct CommandTimestampStorage {
    received_at: HashMap<CommandId, Timestamp>,

    // In order of arrival.
    available: Vec<(CommandId, Timestamp)>,
    history: Vec<CommandId>,

    preferred_orderings: HashMap<CryptoHash, OrderedList>,
}

impl CommandTimestampStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `command` was received just now. Returns `false`, and changes nothing, if
    /// `command` was received before.
    pub fn add_command(&mut self, command: CommandId) -> bool {
        self.add_command_at(command, Timestamp::now())
    }

    /// Record that `command` was received at `timestamp`. Returns `false`, and changes nothing, if
    /// `command` was received before.
    pub fn add_command_at(&mut self, command: CommandId, timestamp: Timestamp) -> bool {
        if self.received_at.contains_key(&command) {
            return false;
        }

        self.received_at.insert(command, timestamp);
        self.available.push((command, timestamp));
        self.history.push(command);
        true
    }

    /// Whether `command` has never been received.
    pub fn is_new_command(&self, command: &CommandId) -> bool {
        !self.received_at.contains_key(command)
    }

    /// Remove `committed` from the available commands. Call this once a proposal containing
    /// `committed` has been accepted. The commands stay in the receipt history.
    pub fn refresh_available_commands(&mut self, committed: &[CommandId]) {
        let committed: HashSet<&CommandId> = committed.iter().collect();
        self.available
            .retain(|(command, _)| !committed.contains(command));
    }

    /// Get the time at which `command` was received.
    pub fn timestamp(&self, command: &CommandId) -> Option<Timestamp> {
        self.received_at.get(command).copied()
    }

    /// Get the times at which each of `commands` was received, in the same order as `commands`.
    ///
    /// Returns `None` if any of `commands` was never received.
    pub fn timestamps(&self, commands: &[CommandId]) -> Option<Vec<Timestamp>> {
        commands
            .iter()
            .map(|command| self.timestamp(command))
            .collect()
    }

    /// Get the ordering to attach to this replica's vote for `block`: the available commands, oldest
    /// first.
    ///
    /// The first call for a given `block` takes a snapshot of the available commands and caches it.
    /// Later calls for the same `block` return the cached snapshot, even if commands arrived or were
    /// committed in between.
    pub fn ordered_list(&mut self, block: CryptoHash) -> OrderedList {
        let available = &self.available;
        self.preferred_orderings
            .entry(block)
            .or_insert_with(|| {
                let mut ordered_list = OrderedList::from_pairs(available.iter().copied());
                ordered_list.sort_by_timestamp();
                ordered_list
            })
            .clone()
    }

    /// Drop the cached ordering for `block`, returning it if there was one.
    pub fn forget_ordered_list(&mut self, block: &CryptoHash) -> Option<OrderedList> {
        self.preferred_orderings.remove(block)
    }

    /// Every command ever received, in order of arrival.
    pub fn all_commands(&self) -> &[CommandId] {
        &self.history
    }

    /// The receipt timestamps of [`all_commands`](Self::all_commands), in the same order.
    pub fn all_timestamps(&self) -> Vec<Timestamp> {
        self.history
            .iter()
            .filter_map(|command| self.timestamp(command))
            .collect()
    }

    /// Number of commands received but not yet committed.
    pub fn available_len(&self) -> usize {
        self.available.len()
    }
}

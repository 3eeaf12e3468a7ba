/*
    Copyright © 2023, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! Leader-side cache of the orderings received for each proposal, and the entry point that runs the
//! fair ordering engine over them.

use std::{
    collections::{HashMap, HashSet},
    sync::mpsc::Sender,
    time::SystemTime,
};

use ed25519_dalek::VerifyingKey;

use crate::{
    config::FairOrderingConfiguration,
    events::{Event, FairOrderEvent, ReceiveOrderedListEvent},
    fair_ordering::{
        self,
        types::{Batch, FairOrderingError, Fairness},
    },
    logging,
    types::{data_types::CryptoHash, ordered_list::OrderedList},
};

/// Orderings collected for a single proposal.
#[derive(Debug, Clone, Default)]
struct ProposalOrderings {
    leader: Option<OrderedList>,
    replicas: Vec<OrderedList>,
    origins: HashSet<VerifyingKey>,
}

impl ProposalOrderings {
    /// Leader's ordering first, then replica orderings in the order they were received.
    fn snapshot(&self) -> Option<Vec<OrderedList>> {
        let leader = self.leader.as_ref()?;
        let mut snapshot = Vec::with_capacity(1 + self.replicas.len());
        snapshot.push(leader.clone());
        snapshot.extend(self.replicas.iter().cloned());
        Some(snapshot)
    }
}

/// Stores every [`OrderedList`] that the leader has collected, keyed by the hash of the block that
/// the orderings were sent for.
///
/// For each block, the storage holds:
/// - The leader's own ordering, which becomes the reference ordering (index 0) of the fair ordering
///   round.
/// - At most one ordering from every other replica, attached to that replica's vote.
///
/// ## Concurrency
///
/// Votes arrive on many connections at once. `OrderedListStorage` does no synchronization of its own:
/// share it behind a lock (e.g., `Arc<Mutex<OrderedListStorage>>`). [`fair_order`](Self::fair_order)
/// runs the engine on a private copy of the stored orderings, so the lock only needs to be held
/// for the duration of the call, and later insertions never affect a round that has already started.
pub struct OrderedListStorage {
    config: FairOrderingConfiguration,
    cache: HashMap<CryptoHash, ProposalOrderings>,
    event_publisher: Option<Sender<Event>>,
}

impl OrderedListStorage {
    pub fn new(config: FairOrderingConfiguration) -> Self {
        Self {
            config,
            cache: HashMap::new(),
            event_publisher: None,
        }
    }

    /// Publish the events this storage emits to `event_publisher`.
    pub fn with_event_publisher(mut self, event_publisher: Sender<Event>) -> Self {
        self.event_publisher = Some(event_publisher);
        self
    }

    pub fn fairness(&self) -> Fairness {
        self.config.fairness
    }

    /// Set the leader's own `ordering` for `block`, replacing any previous one.
    ///
    /// `leader` is recorded as having contributed, so that the leader's own vote for `block` does not
    /// get its ordering counted a second time.
    pub fn insert_leader_ordering(
        &mut self,
        block: CryptoHash,
        leader: &VerifyingKey,
        ordering: OrderedList,
    ) {
        let proposal_orderings = self.cache.entry(block).or_default();
        proposal_orderings.leader = Some(ordering);
        proposal_orderings.origins.insert(*leader);
    }

    /// Add the `ordering` that `origin` attached to its vote for `block`.
    ///
    /// Returns `false`, and changes nothing, if an ordering from `origin` for `block` was already
    /// stored.
    pub fn insert_replica_ordering(
        &mut self,
        block: CryptoHash,
        origin: &VerifyingKey,
        ordering: OrderedList,
    ) -> bool {
        let proposal_orderings = self.cache.entry(block).or_default();
        if !proposal_orderings.origins.insert(*origin) {
            return false;
        }

        let commands = ordering.len();
        proposal_orderings.replicas.push(ordering);

        if self.config.log_events || self.event_publisher.is_some() {
            let event = ReceiveOrderedListEvent {
                timestamp: SystemTime::now(),
                origin: *origin,
                block,
                commands,
            };
            if self.config.log_events {
                logging::log_event(&event);
            }
            Event::publish(&self.event_publisher, Event::ReceiveOrderedList(event));
        }

        true
    }

    /// Get a copy of the orderings stored for `block`: the leader's first, then the replicas' in the
    /// order they were inserted.
    ///
    /// Returns `None` if the leader's ordering for `block` has not been inserted.
    pub fn orderings(&self, block: &CryptoHash) -> Option<Vec<OrderedList>> {
        self.cache.get(block)?.snapshot()
    }

    /// Number of orderings stored for `block`, the leader's included.
    pub fn replica_count(&self, block: &CryptoHash) -> usize {
        self.cache.get(block).map_or(0, |proposal_orderings| {
            proposal_orderings.leader.iter().count() + proposal_orderings.replicas.len()
        })
    }

    /// Hashes of every block that some ordering is stored for, in no particular order.
    pub fn block_hashes(&self) -> Vec<CryptoHash> {
        self.cache.keys().copied().collect()
    }

    /// Drop every ordering stored for `block`. Returns whether there were any.
    pub fn remove(&mut self, block: &CryptoHash) -> bool {
        self.cache.remove(block).is_some()
    }

    /// Fairly order the commands of the leader's ordering for `block`, using every ordering stored for
    /// `block` and the configured fairness.
    ///
    /// The stored orderings are not modified.
    ///
    /// # Errors
    ///
    /// Returns [`FairOrderingError::EmptyReplicaSet`] if the leader's ordering for `block` has not
    /// been inserted. Otherwise, fails exactly as [`fair_ordering::order`] does.
    pub fn fair_order(&self, block: &CryptoHash) -> Result<Vec<Batch>, FairOrderingError> {
        let mut orderings = self
            .orderings(block)
            .ok_or(FairOrderingError::EmptyReplicaSet)?;

        let batches = match fair_ordering::order(&mut orderings, self.config.fairness) {
            Ok(batches) => batches,
            Err(err) => {
                log::warn!(
                    "Failed to fairly order block {}: {:?}",
                    logging::first_seven_base64_chars(&block.bytes()),
                    err
                );
                return Err(err);
            }
        };

        if self.config.log_events || self.event_publisher.is_some() {
            let event = FairOrderEvent {
                timestamp: SystemTime::now(),
                block: *block,
                replicas: orderings.len(),
                commands: batches.iter().map(Batch::len).sum(),
                batches: batches.len(),
            };
            if self.config.log_events {
                logging::log_event(&event);
            }
            Event::publish(&self.event_publisher, Event::FairOrder(event));
        }

        Ok(batches)
    }
}

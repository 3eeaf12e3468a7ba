/*
    Copyright © 2023, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! Definitions of fair ordering events for event handling and logging.
//!
//! Note: an event for a given action indicates that the action has been completed.

use std::{sync::mpsc::Sender, time::SystemTime};

use ed25519_dalek::VerifyingKey;

use crate::types::data_types::CryptoHash;

pub enum Event {
    // Events that involve receiving an ordering from a replica.
    ReceiveOrderedList(ReceiveOrderedListEvent),
    // Events that involve running the fair ordering engine.
    FairOrder(FairOrderEvent),
}

impl Event {
    /// Send `event` to `event_publisher`, if there is one. A disconnected subscriber is ignored.
    pub(crate) fn publish(event_publisher: &Option<Sender<Event>>, event: Event) {
        if let Some(event_publisher) = event_publisher {
            let _ = event_publisher.send(event);
        }
    }
}

/// The leader accepted the ordering that `origin` attached to its vote for `block`.
pub struct ReceiveOrderedListEvent {
    pub timestamp: SystemTime,
    pub origin: VerifyingKey,
    pub block: CryptoHash,
    pub commands: usize,
}

/// The leader fairly ordered the `commands` distinct commands of its own ordering for `block`, using
/// the orderings of `replicas` replicas (itself included), into `batches` batches.
pub struct FairOrderEvent {
    pub timestamp: SystemTime,
    pub block: CryptoHash,
    pub replicas: usize,
    pub commands: usize,
    pub batches: usize,
}

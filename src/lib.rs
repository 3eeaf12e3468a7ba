/*
    Copyright © 2023, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! Fair ordering of commands for HotStuff replicas, following the Aequitas approach. It offers:
//! 1. A [fair ordering engine](fair_ordering::order) that merges the command orderings observed by
//!    every replica into a sequence of batches that no minority of replicas can reorder,
//! 2. A replica-side [store](storage::CommandTimestampStorage) that records when commands arrived and
//!    produces the ordering a replica attaches to its vote,
//! 3. A leader-side [store](storage::OrderedListStorage) that collects those orderings per proposal
//!    and runs the engine over them,
//! 4. and borsh-serializable [types] for carrying orderings inside consensus messages.
//!
//! Block proposal, voting, networking, and signature verification are left to the consensus
//! implementation that embeds this crate.

pub mod config;

pub mod events;

pub mod fair_ordering;

pub(crate) mod logging;

pub mod storage;

pub mod types;

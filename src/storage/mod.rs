/*
    Copyright © 2023, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! In-memory stores that produce the fair ordering engine's inputs.
//!
//! Fair ordering of a proposal flows through both stores:
//! 1. Every replica records incoming commands in its [`CommandTimestampStorage`]. When it votes for a
//!    block, it attaches [`ordered_list`](CommandTimestampStorage::ordered_list) to the vote.
//! 2. The leader inserts its own ordering and every ordering it receives with a vote into its
//!    [`OrderedListStorage`], then calls [`fair_order`](OrderedListStorage::fair_order) to get the
//!    batches to build its next blocks from.
//! 3. Once a block is accepted, replicas call
//!    [`refresh_available_commands`](CommandTimestampStorage::refresh_available_commands) so that its
//!    commands stop being proposed.
//!
//! Neither store is persisted. Losing them on restart only means that the next round is ordered
//! from fresh observations.

pub mod command_timestamp_storage;

pub mod ordered_list_storage;

pub use command_timestamp_storage::CommandTimestampStorage;

pub use ordered_list_storage::OrderedListStorage;

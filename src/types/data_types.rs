/*
    Copyright © 2023, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! Types that exist only to store bytes, and do not have any major "active" behavior.

use std::{
    fmt::{self, Debug, Display, Formatter},
    hash::Hash,
    time::SystemTime,
};

use borsh::{BorshDeserialize, BorshSerialize};
use sha2::{Digest, Sha256};

/// 32-byte cryptographic hash.
///
/// Within this crate, `CryptoHash`-es identify the *blocks* (proposals) that orderings are attached
/// to. How these hashes are computed is up to the consensus layer that owns the block tree.
#[derive(Clone, Copy, PartialEq, Eq, Hash, BorshDeserialize, BorshSerialize)]
pub struct CryptoHash([u8; 32]);

impl CryptoHash {
    /// Create a new `CryptoHash` wrapping `bytes`.
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the inner `[u8; 32]` value of this `CryptoHash`.
    pub const fn bytes(&self) -> [u8; 32] {
        self.0
    }
}

impl Display for CryptoHash {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl Debug for CryptoHash {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Content hash of a client command.
///
/// Two commands are "the same command" if and only if their `CommandId`s are equal. Nothing else
/// about a command (e.g., who relayed it, or when) takes part in equality.
///
/// # Ordering
///
/// `CommandId`s are totally ordered by their bytes. This order carries no fairness meaning; it is
/// only used to iterate the commands of a [`Batch`](crate::fair_ordering::types::Batch) in the same
/// sequence on every replica.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, BorshDeserialize, BorshSerialize)]
pub struct CommandId([u8; 32]);

impl CommandId {
    /// Create a new `CommandId` wrapping `bytes`.
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Compute the `CommandId` of a command by SHA256-hashing its serialized payload.
    pub fn from_command_bytes(command: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(command);
        Self(hasher.finalize().into())
    }

    /// Get the inner `[u8; 32]` value of this `CommandId`.
    pub const fn bytes(&self) -> [u8; 32] {
        self.0
    }
}

impl Display for CommandId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl Debug for CommandId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Instant at which a replica first received a command, as a number of microseconds since the Unix
/// Epoch.
///
/// Timestamps are local observations. They are only ever compared with other timestamps taken by the
/// same replica.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default, BorshDeserialize, BorshSerialize,
)]
pub struct Timestamp(u64);

impl Timestamp {
    /// Create a new `Timestamp` with an `int` value, in microseconds.
    pub const fn new(int: u64) -> Self {
        Self(int)
    }

    /// Get the `Timestamp` of the current wall-clock time.
    ///
    /// A clock that reads earlier than the Unix Epoch is treated as reading the Epoch itself.
    pub fn now() -> Self {
        let micros = SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .map(|elapsed| elapsed.as_micros() as u64)
            .unwrap_or(0);
        Self(micros)
    }

    /// Get the inner `u64` value of this `Timestamp`.
    pub const fn int(&self) -> u64 {
        self.0
    }
}

impl Display for Timestamp {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        std::fmt::Display::fmt(&self.0, f)
    }
}

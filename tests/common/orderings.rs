//! Helpers for building commands, orderings, and expected batches out of short command names.

use ed25519_dalek::{SigningKey, VerifyingKey};
use hotstuff_aequitas::{
    fair_ordering::types::{Batch, Fairness},
    types::{
        data_types::{CommandId, CryptoHash, Timestamp},
        ordered_list::OrderedList,
    },
};
use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};
use rand_core::OsRng;

pub(crate) fn command(name: &str) -> CommandId {
    CommandId::from_command_bytes(name.as_bytes())
}

// An ordering in which `names` were received one microsecond apart, in the given order.
pub(crate) fn ordering(names: &[&str]) -> OrderedList {
    OrderedList::from_pairs(
        names
            .iter()
            .enumerate()
            .map(|(position, name)| (command(name), Timestamp::new(1_000 + position as u64))),
    )
}

pub(crate) fn batches(groups: &[&[&str]]) -> Vec<Batch> {
    groups
        .iter()
        .map(|group| group.iter().map(|name| command(name)).collect())
        .collect()
}

pub(crate) fn fairness(g: f64) -> Fairness {
    Fairness::new(g).unwrap()
}

pub(crate) fn block(n: u8) -> CryptoHash {
    CryptoHash::new([n; 32])
}

pub(crate) fn verifying_keys(count: usize) -> Vec<VerifyingKey> {
    let mut csprg = OsRng {};
    (0..count)
        .map(|_| SigningKey::generate(&mut csprg).verifying_key())
        .collect()
}

// `replicas` orderings over the commands "c0".."c{commands - 1}". Every replica receives the commands
// in a random order, with random gaps between their timestamps. The reference ordering is first.
pub(crate) fn random_orderings(seed: u64, replicas: usize, commands: usize) -> Vec<OrderedList> {
    let mut rng = StdRng::seed_from_u64(seed);
    let names: Vec<String> = (0..commands).map(|n| format!("c{}", n)).collect();

    (0..replicas)
        .map(|_| {
            let mut received = names.clone();
            received.shuffle(&mut rng);

            let mut now = 0;
            let pairs: Vec<(CommandId, Timestamp)> = received
                .iter()
                .map(|name| {
                    now += rng.gen_range(1, 50);
                    (command(name), Timestamp::new(now))
                })
                .collect();

            // Hand the list over out of timestamp order, as a replica that sent it unsorted would.
            let mut shuffled = pairs;
            shuffled.shuffle(&mut rng);
            OrderedList::from_pairs(shuffled)
        })
        .collect()
}

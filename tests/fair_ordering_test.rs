/*
    Copyright © 2023, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! Tests of the fair ordering engine through its public entry points, [`order`] and
//! [`order_cloned`].
//!
//! Commands are named by short strings (see [`common::orderings`]); each test builds the orderings
//! that a set of replicas would have attached to their votes and checks the batches that come out.

mod common;

use common::{logging::setup_logger, orderings::*};
use hotstuff_aequitas::{
    fair_ordering::{
        covers_reference, order, order_cloned,
        types::{commit_sequence, Batch, FairOrderingError, Fairness},
    },
    types::{
        data_types::{CommandId, Timestamp},
        ordered_list::OrderedList,
    },
};
use log::LevelFilter;

#[test]
fn unanimous_orderings_give_one_singleton_batch_per_command() {
    setup_logger(LevelFilter::Trace);

    for g in [0.01, 0.25, 0.5, 0.66, 0.75, 0.99] {
        let mut orderings = vec![ordering(&["A", "B", "C", "D"]); 5];
        let result = order(&mut orderings, fairness(g)).unwrap();

        assert_eq!(result, batches(&[&["A"], &["B"], &["C"], &["D"]]), "g = {}", g);
    }
}

#[test]
fn evenly_split_pair_is_one_batch_at_half_fairness() {
    setup_logger(LevelFilter::Trace);

    // Each direction is supported by exactly 2 out of 4 replicas, and 2 is not greater than 0.5 × 4.
    let mut orderings = vec![
        ordering(&["A", "B"]),
        ordering(&["B", "A"]),
        ordering(&["A", "B"]),
        ordering(&["B", "A"]),
    ];
    let result = order(&mut orderings, fairness(0.5)).unwrap();

    assert_eq!(result, batches(&[&["A", "B"]]));
}

#[test]
fn evenly_split_pair_is_one_batch_below_half_fairness() {
    // Now both directions are binding, and the resulting cycle ties A and B.
    let mut orderings = vec![
        ordering(&["A", "B"]),
        ordering(&["B", "A"]),
        ordering(&["A", "B"]),
        ordering(&["B", "A"]),
    ];
    let result = order(&mut orderings, fairness(0.4)).unwrap();

    assert_eq!(result, batches(&[&["A", "B"]]));
}

#[test]
fn support_equal_to_threshold_is_not_enough() {
    let orderings = vec![
        ordering(&["A", "B"]),
        ordering(&["A", "B"]),
        ordering(&["A", "B"]),
        ordering(&["B", "A"]),
    ];

    // 3 out of 4 replicas put A first. 0.75 × 4 = 3.
    assert_eq!(
        order_cloned(&orderings, fairness(0.75)).unwrap(),
        batches(&[&["A", "B"]])
    );
    assert_eq!(
        order_cloned(&orderings, fairness(0.74)).unwrap(),
        batches(&[&["A"], &["B"]])
    );
}

#[test]
fn single_replica_keeps_its_own_order() {
    let mut orderings = vec![ordering(&["D", "B", "A", "C"])];
    let result = order(&mut orderings, fairness(0.9)).unwrap();

    assert_eq!(result, batches(&[&["D"], &["B"], &["A"], &["C"]]));
}

#[test]
fn successive_permutations() {
    // Five replicas, each seeing the next lexicographic permutation of 1, 2, 3, 4.
    let orderings = vec![
        ordering(&["1", "2", "3", "4"]),
        ordering(&["1", "2", "4", "3"]),
        ordering(&["1", "3", "2", "4"]),
        ordering(&["1", "3", "4", "2"]),
        ordering(&["1", "4", "2", "3"]),
    ];

    // Every pair among 2, 3, 4 is ordered one way by 3 replicas and the other way by 2.
    assert_eq!(
        order_cloned(&orderings, fairness(0.75)).unwrap(),
        batches(&[&["1"], &["2", "3", "4"]])
    );
    assert_eq!(
        order_cloned(&orderings, fairness(0.5)).unwrap(),
        batches(&[&["1"], &["2"], &["3"], &["4"]])
    );
}

#[test]
fn tie_only_covers_the_contested_commands() {
    // A and B are contested; everyone agrees they come before C.
    let mut orderings = vec![
        ordering(&["A", "B", "C"]),
        ordering(&["B", "A", "C"]),
        ordering(&["A", "B", "C"]),
        ordering(&["B", "A", "C"]),
    ];
    let result = order(&mut orderings, fairness(0.6)).unwrap();

    assert_eq!(result, batches(&[&["A", "B"], &["C"]]));
}

#[test]
fn minority_cannot_reorder() {
    // A Byzantine minority claims to have seen C first.
    let mut orderings = vec![
        ordering(&["A", "B", "C"]),
        ordering(&["A", "B", "C"]),
        ordering(&["A", "B", "C"]),
        ordering(&["C", "B", "A"]),
    ];
    let result = order(&mut orderings, fairness(0.6)).unwrap();

    assert_eq!(result, batches(&[&["A"], &["B"], &["C"]]));
}

#[test]
fn commands_missing_from_reference_are_dropped() {
    // Every other replica has seen X, but the leader has not.
    let mut orderings = vec![
        ordering(&["A", "B"]),
        ordering(&["X", "A", "B"]),
        ordering(&["X", "A", "B"]),
        ordering(&["A", "X", "B"]),
    ];
    let result = order(&mut orderings, fairness(0.6)).unwrap();

    assert_eq!(result, batches(&[&["A"], &["B"]]));
    assert!(result.iter().all(|batch| !batch.contains(&command("X"))));
}

#[test]
fn orderings_are_ordered_by_timestamp_not_by_position() {
    let leader = OrderedList::new(
        vec![command("B"), command("A")],
        vec![Timestamp::new(7), Timestamp::new(3)],
    );
    let mut orderings = vec![leader, ordering(&["A", "B"])];
    let result = order(&mut orderings, fairness(0.5)).unwrap();

    assert_eq!(result, batches(&[&["A"], &["B"]]));
    assert_eq!(orderings[0].commands, vec![command("A"), command("B")]);
    assert_eq!(orderings[0].timestamps, vec![Timestamp::new(3), Timestamp::new(7)]);
}

#[test]
fn order_cloned_leaves_the_input_untouched() {
    let leader = OrderedList::new(
        vec![command("B"), command("A")],
        vec![Timestamp::new(7), Timestamp::new(3)],
    );
    let orderings = vec![leader.clone(), ordering(&["A", "B"])];
    order_cloned(&orderings, fairness(0.5)).unwrap();

    assert_eq!(orderings[0], leader);
}

#[test]
fn canonicalizing_is_idempotent() {
    let mut list = OrderedList::new(
        vec![command("C"), command("A"), command("B"), command("D")],
        vec![
            Timestamp::new(30),
            Timestamp::new(10),
            Timestamp::new(10),
            Timestamp::new(20),
        ],
    );
    list.sort_by_timestamp();
    let sorted_once = list.clone();
    list.sort_by_timestamp();

    assert!(sorted_once.is_sorted_by_timestamp());
    assert_eq!(list, sorted_once);
    // A and B share a timestamp and keep their relative order.
    assert_eq!(
        sorted_once.commands,
        vec![command("A"), command("B"), command("D"), command("C")]
    );
}

#[test]
fn empty_replica_set_is_rejected() {
    assert_eq!(
        order(&mut [], fairness(0.5)).unwrap_err(),
        FairOrderingError::EmptyReplicaSet
    );
}

#[test]
fn malformed_reference_is_rejected_before_any_work() {
    let malformed = OrderedList::new(
        vec![command("B"), command("A")],
        vec![Timestamp::new(9)],
    );
    let unsorted_replica = OrderedList::new(
        vec![command("B"), command("A")],
        vec![Timestamp::new(9), Timestamp::new(1)],
    );
    let mut orderings = vec![malformed.clone(), unsorted_replica.clone()];

    assert_eq!(
        order(&mut orderings, fairness(0.5)).unwrap_err(),
        FairOrderingError::MalformedOrderedList {
            commands: 2,
            timestamps: 1
        }
    );
    assert_eq!(orderings, vec![malformed, unsorted_replica]);
}

#[test]
fn empty_reference_is_rejected() {
    let mut orderings = vec![OrderedList::default(), ordering(&["A"])];

    assert_eq!(
        order(&mut orderings, fairness(0.5)).unwrap_err(),
        FairOrderingError::MalformedOrderedList {
            commands: 0,
            timestamps: 0
        }
    );
}

#[test]
fn malformed_non_reference_ordering_is_tolerated() {
    setup_logger(LevelFilter::Trace);

    // The second replica's last command has no timestamp. It is treated as received last.
    let short = OrderedList::new(
        vec![command("A"), command("B"), command("C")],
        vec![Timestamp::new(2), Timestamp::new(1)],
    );
    let mut orderings = vec![ordering(&["B", "A", "C"]), short];
    let result = order(&mut orderings, fairness(0.5)).unwrap();

    assert_eq!(result, batches(&[&["B"], &["A"], &["C"]]));
    assert_eq!(
        orderings[1].commands,
        vec![command("B"), command("A"), command("C")]
    );
}

#[test]
fn duplicates_in_reference_are_scheduled_once() {
    let leader = OrderedList::new(
        vec![command("A"), command("B"), command("A")],
        vec![Timestamp::new(1), Timestamp::new(2), Timestamp::new(3)],
    );
    let mut orderings = vec![leader, ordering(&["A", "B"])];
    let result = order(&mut orderings, fairness(0.5)).unwrap();

    assert_eq!(result, batches(&[&["A"], &["B"]]));
}

#[test]
fn every_command_is_scheduled_exactly_once_at_every_fairness() {
    for seed in 0..20 {
        let orderings = random_orderings(seed, 7, 12);
        for g in [0.05, 0.2, 0.4, 0.5, 0.6, 0.7, 0.8, 0.95] {
            let result = order_cloned(&orderings, fairness(g)).unwrap();

            assert!(
                covers_reference(&result, &orderings[0]),
                "seed = {}, g = {}",
                seed,
                g
            );
            assert!(result.iter().all(|batch| !batch.is_empty()));
        }
    }
}

#[test]
fn result_does_not_depend_on_the_order_of_non_reference_orderings() {
    for seed in 0..10 {
        let orderings = random_orderings(seed, 6, 10);
        let mut reversed = orderings.clone();
        reversed[1..].reverse();

        assert_eq!(
            order_cloned(&orderings, fairness(0.6)).unwrap(),
            order_cloned(&reversed, fairness(0.6)).unwrap()
        );
    }
}

#[test]
fn commit_sequence_follows_batches_then_command_ids() {
    let mut orderings = vec![
        ordering(&["A", "B", "C"]),
        ordering(&["B", "A", "C"]),
        ordering(&["A", "B", "C"]),
        ordering(&["B", "A", "C"]),
    ];
    let result = order(&mut orderings, fairness(0.6)).unwrap();

    let mut tied: Vec<CommandId> = vec![command("A"), command("B")];
    tied.sort();
    let mut expected = tied;
    expected.push(command("C"));

    assert_eq!(commit_sequence(&result), expected);
    assert_eq!(result[0].iter().copied().collect::<Vec<_>>(), result[0].to_vec());
}

#[test]
fn batches_compare_as_sets() {
    let forward: Batch = [command("A"), command("B")].into_iter().collect();
    let backward: Batch = [command("B"), command("A")].into_iter().collect();

    assert_eq!(forward, backward);
    assert_eq!(forward.len(), 2);
}

#[test]
fn fairness_must_lie_strictly_between_zero_and_one() {
    for g in [0.0, 1.0, -0.5, 1.5, f64::NAN] {
        assert!(Fairness::new(g).is_err(), "g = {}", g);
    }

    let g = Fairness::new(0.75).unwrap();
    assert_eq!(g.get(), 0.75);
    assert_eq!(g.threshold(4), 3.0);
}

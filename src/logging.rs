/*
    Copyright © 2023, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! Functions that log out events.
//!
//! The logs defined in this module are printed if the user enabled them via the
//! [configuration](crate::config::FairOrderingConfiguration).
//!
//! This crate logs using the [log](https://docs.rs/log/latest/log/) crate. To get these messages
//! printed onto a terminal or to a file, set up a
//! [logging implementation](https://docs.rs/log/latest/log/#available-logging-implementations).
//!
//! ## Log message format
//!
//! Log messages are CSVs (Comma Separated Values) with at least two values. The first two values are
//! always:
//! 1. The name of the [event](crate::events) in PascalCase (defined in this module as constants).
//! 2. The time the event was emitted (as number of seconds since the Unix Epoch).
//!
//! The rest of the values differ depending on the kind of event. For example, the following snippet
//! is how a [FairOrder](crate::events::FairOrderEvent) is printed:
//!
//! ```text
//! FairOrder, 1701329264, fNGCJyk, 4, 12, 5
//! ```
//!
//! In the snippet:
//! - The third value is the first seven characters of the Base64 encoding of the hash of the block
//!   whose orderings were merged.
//! - The fourth value is the number of orderings that were merged.
//! - The fifth value is the number of distinct commands that were ordered.
//! - The sixth value is the number of batches they were ordered into.

use std::time::SystemTime;

use base64::{engine::general_purpose::STANDARD_NO_PAD, Engine as _};

use crate::events::*;

// Names of each event in PascalCase for printing:
pub const RECEIVE_ORDERED_LIST: &str = "ReceiveOrderedList";
pub const FAIR_ORDER: &str = "FairOrder";

/// Implemented by event types. Used to get a closure that logs the event.
pub(crate) trait Logger {
    /// Returns a pointer to the default logging handler for a given event type.
    fn get_logger() -> Box<dyn Fn(&Self) + Send>;
}

impl Logger for ReceiveOrderedListEvent {
    fn get_logger() -> Box<dyn Fn(&Self) + Send> {
        let logger = |receive_ordered_list_event: &ReceiveOrderedListEvent| {
            log::info!(
                "{}, {}, {}, {}, {}",
                RECEIVE_ORDERED_LIST,
                secs_since_unix_epoch(receive_ordered_list_event.timestamp),
                first_seven_base64_chars(&receive_ordered_list_event.origin.to_bytes()),
                first_seven_base64_chars(&receive_ordered_list_event.block.bytes()),
                receive_ordered_list_event.commands
            )
        };
        Box::new(logger)
    }
}

impl Logger for FairOrderEvent {
    fn get_logger() -> Box<dyn Fn(&Self) + Send> {
        let logger = |fair_order_event: &FairOrderEvent| {
            log::info!(
                "{}, {}, {}, {}, {}, {}",
                FAIR_ORDER,
                secs_since_unix_epoch(fair_order_event.timestamp),
                first_seven_base64_chars(&fair_order_event.block.bytes()),
                fair_order_event.replicas,
                fair_order_event.commands,
                fair_order_event.batches
            )
        };
        Box::new(logger)
    }
}

/// Log `event` with its default logger.
pub(crate) fn log_event<E: Logger>(event: &E) {
    (E::get_logger())(event)
}

/// Get a more readable representation of a byte sequence by base64-encoding it and taking the first 7
/// characters.
pub(crate) fn first_seven_base64_chars(bytes: &[u8]) -> String {
    let encoded = STANDARD_NO_PAD.encode(bytes);
    if encoded.len() > 7 {
        encoded[0..7].to_string()
    } else {
        encoded
    }
}

/// Events stamped before the Unix Epoch are printed as if they happened at the Epoch.
fn secs_since_unix_epoch(timestamp: SystemTime) -> u64 {
    timestamp
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

/*
    Copyright © 2023, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! User-defined parameters of the leader-side fair ordering round.

use typed_builder::TypedBuilder;

use crate::fair_ordering::types::Fairness;

/// Stores the user-defined parameters that the leader needs to fairly order a proposal, that is:
/// 1. The [fairness](Fairness) parameter `g`.
/// 2. The "Log Events" flag, if set to "true" then logs should be printed.
///
/// ## Fairness
///
/// All replicas must be configured with the same fairness. Otherwise, replicas that check a
/// proposal's ordering against their own computation of it will disagree with the leader.
///
/// ## Log Events
///
/// This crate logs using the [log](https://docs.rs/log/latest/log/) crate. To get these messages
/// printed onto a terminal or to a file, set up a [logging
/// implementation](https://docs.rs/log/latest/log/#available-logging-implementations).
#[derive(Clone, Debug, TypedBuilder)]
#[builder(builder_method(doc = "
    Create a builder for building a [FairOrderingConfiguration]. On the builder call the following methods to construct a valid [FairOrderingConfiguration].

    Required:
    - `.fairness(...)`
    - `.log_events(...)`
"))]
pub struct FairOrderingConfiguration {
    #[builder(setter(doc = "Set the fraction of replicas that must agree on a precedence for it to be binding. Required."))]
    pub fairness: Fairness,
    #[builder(setter(doc = "Enable logging? Required."))]
    pub log_events: bool,
}

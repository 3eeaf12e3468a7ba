/*
    Copyright © 2023, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! Types that are used across multiple components of this crate.
//!
//! Types specific to the fair ordering engine, e.g., [`Batch`](crate::fair_ordering::types::Batch),
//! can be found in [`crate::fair_ordering::types`].

pub mod data_types;

pub mod ordered_list;

// Copyright 2026 Acroharvest Contributors
// SPDX-License-Identifier: Apache-2.0

//! Acroharvest library — exhaustive acronym harvester.
//!
//! This library crate exposes the core modules for integration testing.

#![allow(clippy::new_without_default)]

pub mod audit;
pub mod buckets;
pub mod cli;
pub mod config;
pub mod export;
pub mod harvester;
pub mod keyspace;
pub mod lookup;
pub mod pattern;
pub mod snapshot;
pub mod throttle;

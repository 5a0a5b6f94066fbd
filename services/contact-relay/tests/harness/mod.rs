// SPDX-FileCopyrightText: 2026 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Test harness for the contact relay.
//!
//! Provides a recording email dispatcher, request helpers that drive the
//! router in-process, payload generators, and abuse simulation.

#![allow(dead_code)]

pub mod app;
pub mod attacks;
pub mod generators;
pub mod metrics;

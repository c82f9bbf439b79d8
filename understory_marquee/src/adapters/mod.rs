// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Adapters to integrate with other Understory crates.
//!
//! Enabled via feature flags so the engine itself only depends on the host traits.

#[cfg(feature = "document_adapter")]
pub mod document;

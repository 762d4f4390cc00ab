// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Render-pass configuration.

use crate::layout::ZeroWeightPolicy;

/// Tunables for a render pass, passed to [`Frame`](crate::node::Frame).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EngineConfig {
    /// How containers lay out axes whose cells all have zero weight.
    pub zero_weight: ZeroWeightPolicy,
    /// Re-select the backend's entry matrix mode when the pass returns.
    ///
    /// Nodes that render cameras, scenes, or sprites switch matrix modes
    /// internally. With this set, the caller always gets back the mode it
    /// handed in, even if a node changed it and did not switch back.
    pub restore_matrix_mode: bool,
}

impl EngineConfig {
    /// Default configuration: degenerate layouts are errors and the entry
    /// matrix mode is restored.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            zero_weight: ZeroWeightPolicy::Reject,
            restore_matrix_mode: true,
        }
    }

    /// Configuration for prototyping: degenerate layouts collapse to their
    /// fixed sizes instead of failing the pass.
    #[must_use]
    pub const fn lenient() -> Self {
        Self {
            zero_weight: ZeroWeightPolicy::Collapse,
            restore_matrix_mode: true,
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}

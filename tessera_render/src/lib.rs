// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Headless backend and command lists for tessera.
//!
//! This crate provides a [`Backend`](tessera_core::backend::Backend)
//! implementation that draws nothing. It tracks every piece of state a
//! fixed-function pipeline would (matrix stacks, attribute stacks, enabled
//! capabilities, viewport, textures) and records what it was asked to do:
//!
//! - [`Command`] — one backend call, with closed batches folded into a
//!   single [`DrawItem`]
//! - [`CommandList`] — the ordered commands for one or more passes
//! - [`Violation`] — a call that a real pipeline would reject, such as a pop
//!   on an empty stack or a state change inside an open batch
//!
//! [`RecordingBackend`] is the backend used by tests and by headless tools
//! that want to inspect a frame.

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

mod command;
mod recording;
#[cfg(test)]
mod scene_tests;

pub use command::{Command, CommandList, DrawItem, DrawVertex};
pub use recording::{RecordingBackend, Violation};

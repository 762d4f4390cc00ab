// Copyright 2026 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core types for a retained-mode scene graph.
//!
//! `tessera_core` provides a tree of renderable nodes that compose geometric
//! transforms and graphics-state modifications, a tiling layout engine for
//! screen-space widgets, and an event model that routes positional input
//! through nested coordinate spaces. It is `no_std` compatible (with
//! `alloc`) and talks to graphics hardware only through the [`Backend`]
//! trait.
//!
//! # Architecture
//!
//! Rendering and input flow through the same tree but never interleave:
//!
//! ```text
//!   Frame::render(scene)
//!       │
//!       ▼
//!   push_state ──► render ──► render_children ──► pop_state
//!                                   │                 ▲
//!                                   └─ (per child) ───┘
//!
//!   Event ──► trigger ──► handle ──► trigger_children
//!                                        │
//!                  Container: hit-test, translate pos, one child
//!                  otherwise: broadcast to every child
//! ```
//!
//! **[`node`]** — The renderable tree. Every node owns its transform,
//! feature toggles, bound texture, modifications, and children. State is
//! acquired through a scope guard so each push is matched by exactly one pop
//! on every exit path, including errors and panics.
//!
//! **[`modification`]** and **[`transform`]** — Reversible backend state
//! changes (blend function, texture parameters, callbacks) and the
//! non-reversible transforms that rely on the matrix stack instead.
//!
//! **[`layout`]** — One-dimensional weighted/fixed partitions combined into
//! a 2-D [`Grid`](layout::Grid) with half-open hit-testing.
//!
//! **[`widget`]** — Screen-space nodes bound to grid cells. Containers own a
//! grid, lay out their children on every push, and route positional events
//! to the child under the pointer.
//!
//! **[`event`]** — Typed keyboard and mouse events and the
//! [`EventHandler`](event::EventHandler) contract.
//!
//! **[`backend`]** — The [`Backend`] trait that immediate-mode graphics
//! implementations provide.
//!
//! **[`trace`]** — [`TraceSink`](trace::TraceSink) trait and event types for
//! render-pass instrumentation, with a zero-overhead
//! [`Tracer`](trace::Tracer) wrapper.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one branch
//!   per call site).
//!
//! [`Backend`]: backend::Backend

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

pub mod backend;
pub mod config;
pub mod error;
pub mod event;
pub mod layout;
pub mod matrix;
pub mod modification;
pub mod node;
pub mod texture;
pub mod trace;
pub mod transform;
pub mod widget;

pub use error::{BackendError, LayoutError, RenderError};

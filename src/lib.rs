//! **tiletree**: a tree-based tiling layout engine.
//!
//! Every workspace holds one node per monitor, and each monitor is the root
//! of a tree of containers and windows.  A container splits its space
//! horizontally or vertically between its children by percentage, or shows
//! one child at a time as a stack or a tab group.  The engine turns that
//! tree into window rectangles and keeps it tidy as windows come and go,
//! move, swap, float, and get dragged around with the pointer.
//!
//! # Architecture
//!
//! The crate is organised around two core traits:
//!
//! * [`traits::Host`] abstracts the window system (monitors, window
//!   properties, pointer, frame writes) so the layout logic is not coupled
//!   to any specific compositor.
//! * [`traits::CommandSource`] abstracts the transport that delivers
//!   user intent so the main loop is not coupled to any specific IPC
//!   mechanism.
//!
//! [`tree`] holds the layout tree and every structural operation on it,
//! [`drag`] the pointer-driven drop logic, and [`tiler`] ties them to a
//! host.  Concrete implementations live in [`headless`] (an in-memory
//! host) and [`ipc`] (Unix-socket listener).

pub mod command;
pub mod config;
pub mod drag;
pub mod float_rules;
pub mod geometry;
pub mod headless;
pub mod ipc;
pub mod tiler;
pub mod timer;
pub mod traits;
pub mod tree;

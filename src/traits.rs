//! Core traits that decouple tiletree from any specific window system or
//! transport mechanism.
//!
//! Every concrete backend (a compositor integration, the in-memory
//! [`HeadlessHost`](crate::headless::HeadlessHost), a Unix-socket listener,
//! a test harness) implements one of these traits.  The
//! [`Tiler`](crate::tiler::Tiler) only depends on these abstractions.

use crate::command::{MonitorInfo, WindowInfo};
use crate::geometry::Rect;
use crate::tree::WindowId;
use std::sync::mpsc;

/// Abstraction over the window system that owns the real windows.
///
/// The engine only reads window properties, asks where the pointer is, and
/// writes frame rectangles; it never interprets window handles.  Methods
/// take `&self` so an implementation can be shared with callbacks; one
/// that records state uses interior mutability.
pub trait Host {
    /// The error type produced by this host.
    type Error: std::error::Error + Send + 'static;

    /// Monitors on the current workspace, with their usable work areas.
    fn monitors(&self) -> Result<Vec<MonitorInfo>, Self::Error>;

    /// Properties of `window` needed to place it in the tree.
    fn window_info(&self, window: WindowId) -> Result<WindowInfo, Self::Error>;

    /// The focused window, if any.
    fn focused_window(&self) -> Result<Option<WindowId>, Self::Error>;

    /// Pointer position in global screen coordinates.
    fn pointer(&self) -> Result<(i32, i32), Self::Error>;

    /// Current frame rectangle of `window`.
    fn frame(&self, window: WindowId) -> Result<Rect, Self::Error>;

    /// Move and resize `window`.
    fn set_frame(&self, window: WindowId, rect: Rect) -> Result<(), Self::Error>;

    /// Raise `window` and give it keyboard focus.
    fn focus(&self, window: WindowId) -> Result<(), Self::Error>;
}

//  Command Source

/// A source of messages for the daemon's main loop.
///
/// Implementations listen on some transport (a Unix socket, a compositor
/// event stream, an in-memory channel) and forward parsed messages into
/// the provided [`mpsc::Sender`].
///
/// # Contract
///
/// * [`run`](CommandSource::run) **blocks** until the source is exhausted or
///   an unrecoverable error occurs.
/// * Each received message must be sent through `sink` exactly once.
/// * Implementations must be [`Send`] so they can run on a dedicated thread.
pub trait CommandSource: Send {
    /// What the source produces, typically a [`Command`](crate::command::Command)
    /// or a wrapper around one.
    type Message: Send + 'static;

    /// The error type produced by this source.
    type Error: std::error::Error + Send + 'static;

    /// Start listening and forward every incoming message into `sink`.
    ///
    /// This method blocks the calling thread.  To run multiple sources
    /// concurrently, spawn each one on its own thread.
    fn run(&mut self, sink: mpsc::Sender<Self::Message>) -> Result<(), Self::Error>;
}

//! IPC listener that accepts requests over a Unix socket.
//!
//! External tools (scripts, key-bind helpers, a compositor bridge) can
//! connect to the socket and send newline-delimited JSON messages.

pub mod listener;

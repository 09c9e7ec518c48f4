//! Headless backend.
//!
//! [`HeadlessHost`] is a window system that exists only in memory: clients
//! open and close "windows" over the socket, and the engine tiles them
//! exactly as it would real ones.  It drives the daemon binary and makes
//! the whole pipeline scriptable.
//!
//! Nothing outside this module should depend on the headless host.
//!
//! # Wire format
//!
//! Each socket line is either a [`HostRequest`] or a
//! [`Command`](crate::command::Command), both externally tagged JSON:
//!
//! ```json
//! {"OpenWindow":{"info":{"class":"kitty","title":"shell"}}}
//! {"Pointer":{"x":640,"y":200}}
//! {"Focus":"left"}
//! "Dump"
//! ```

pub mod host;

pub use host::{HeadlessError, HeadlessHost, HeadlessWindow};

use crate::command::{Command, MonitorInfo, WindowInfo};
use crate::geometry::Rect;
use crate::tiler::{Tiler, TilerError};
use crate::tree::WindowId;
use log::{info, warn};
use serde::{Deserialize, Serialize};

/// Changes to the simulated window system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum HostRequest {
    /// Create a window and start tracking it.
    OpenWindow {
        #[serde(default)]
        info: WindowInfo,
        #[serde(default)]
        frame: Option<Rect>,
    },
    /// Destroy a window.
    CloseWindow(WindowId),
    /// Give a window focus, as a click would.
    FocusWindow(WindowId),
    /// Move the pointer.  During a drag this also updates the drop preview.
    Pointer { x: i32, y: i32 },
    /// Replace the monitor set.
    Monitors(Vec<MonitorInfo>),
    /// Log the layout tree and every window's frame.
    Dump,
}

/// One line of input to the headless daemon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Request {
    Host(HostRequest),
    Command(Command),
}

/// Apply a [`Request`] to the host and the tiler.
pub fn dispatch(tiler: &mut Tiler<HeadlessHost>, request: Request) -> Result<(), TilerError> {
    match request {
        Request::Command(cmd) => {
            if let Command::SetMinimized { window, minimized } = cmd {
                if let Err(e) = tiler.host().set_minimized(window, minimized) {
                    warn!("{}", e);
                    return Ok(());
                }
            }
            tiler.handle(cmd)
        }
        Request::Host(HostRequest::OpenWindow { info, frame }) => {
            let window = tiler.host().open_window(info, frame);
            info!("opened {}", window);
            tiler.handle(Command::Track(window))
        }
        Request::Host(HostRequest::CloseWindow(window)) => {
            if let Err(e) = tiler.host().close_window(window) {
                warn!("{}", e);
                return Ok(());
            }
            tiler.handle(Command::Untrack(window))
        }
        Request::Host(HostRequest::FocusWindow(window)) => {
            if let Err(e) = crate::traits::Host::focus(tiler.host(), window) {
                warn!("{}", e);
            }
            Ok(())
        }
        Request::Host(HostRequest::Pointer { x, y }) => {
            tiler.host().set_pointer(x, y);
            if tiler.drag().is_active() {
                tiler.handle(Command::DragMotion)?;
            }
            Ok(())
        }
        Request::Host(HostRequest::Monitors(monitors)) => {
            tiler.host().set_monitors(monitors);
            tiler.handle(Command::MonitorsChanged)
        }
        Request::Host(HostRequest::Dump) => {
            tiler.flush();
            info!("tree:\n{}", tiler.tree().debug_tree());
            for (id, w) in tiler.host().windows() {
                info!("{} {:?} {}", id, w.info.class, w.frame);
            }
            Ok(())
        }
    }
}

//! [`Host`] implementation that keeps every window in memory.

use crate::command::{MonitorInfo, WindowInfo};
use crate::geometry::Rect;
use crate::traits::Host;
use crate::tree::WindowId;
use log::debug;
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;

/// A window as the headless host sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadlessWindow {
    pub info: WindowInfo,
    pub frame: Rect,
}

/// Errors from the headless host.
#[derive(Debug, thiserror::Error)]
pub enum HeadlessError {
    #[error("unknown window {0}")]
    UnknownWindow(WindowId),
}

/// In-memory window system.
///
/// Windows are created by [`open_window`](HeadlessHost::open_window) and
/// only ever move when the engine calls [`Host::set_frame`].  Window ids
/// are handed out sequentially starting at `0x1`.
#[derive(Debug)]
pub struct HeadlessHost {
    monitors: RefCell<Vec<MonitorInfo>>,
    windows: RefCell<BTreeMap<WindowId, HeadlessWindow>>,
    focused: Cell<Option<WindowId>>,
    pointer: Cell<(i32, i32)>,
    next_id: Cell<u64>,
}

impl HeadlessHost {
    pub fn new(monitors: Vec<MonitorInfo>) -> Self {
        Self {
            monitors: RefCell::new(monitors),
            windows: RefCell::new(BTreeMap::new()),
            focused: Cell::new(None),
            pointer: Cell::new((0, 0)),
            next_id: Cell::new(1),
        }
    }

    /// Create a window and focus it.  Without a `frame` it starts as an
    /// empty rect at the origin of its monitor.
    pub fn open_window(&self, info: WindowInfo, frame: Option<Rect>) -> WindowId {
        let id = WindowId(self.next_id.get());
        self.next_id.set(self.next_id.get() + 1);
        let frame = frame.unwrap_or_else(|| {
            self.monitors
                .borrow()
                .iter()
                .find(|m| m.index == info.monitor)
                .map(|m| Rect::new(m.work_area.x, m.work_area.y, 0, 0))
                .unwrap_or_default()
        });
        debug!("open {} ({:?})", id, info.class);
        self.windows
            .borrow_mut()
            .insert(id, HeadlessWindow { info, frame });
        self.focused.set(Some(id));
        id
    }

    /// Destroy a window.  Focus falls back to the most recently opened
    /// remaining one.
    pub fn close_window(&self, window: WindowId) -> Result<(), HeadlessError> {
        let mut windows = self.windows.borrow_mut();
        windows
            .remove(&window)
            .ok_or(HeadlessError::UnknownWindow(window))?;
        if self.focused.get() == Some(window) {
            self.focused.set(windows.keys().next_back().copied());
        }
        Ok(())
    }

    pub fn set_minimized(&self, window: WindowId, minimized: bool) -> Result<(), HeadlessError> {
        self.windows
            .borrow_mut()
            .get_mut(&window)
            .map(|w| w.info.minimized = minimized)
            .ok_or(HeadlessError::UnknownWindow(window))
    }

    pub fn set_pointer(&self, x: i32, y: i32) {
        self.pointer.set((x, y));
    }

    pub fn set_monitors(&self, monitors: Vec<MonitorInfo>) {
        *self.monitors.borrow_mut() = monitors;
    }

    pub fn window(&self, window: WindowId) -> Option<HeadlessWindow> {
        self.windows.borrow().get(&window).cloned()
    }

    /// Snapshot of every window, ordered by id.
    pub fn windows(&self) -> Vec<(WindowId, HeadlessWindow)> {
        self.windows
            .borrow()
            .iter()
            .map(|(id, w)| (*id, w.clone()))
            .collect()
    }
}

impl Host for HeadlessHost {
    type Error = HeadlessError;

    fn monitors(&self) -> Result<Vec<MonitorInfo>, HeadlessError> {
        Ok(self.monitors.borrow().clone())
    }

    fn window_info(&self, window: WindowId) -> Result<WindowInfo, HeadlessError> {
        self.windows
            .borrow()
            .get(&window)
            .map(|w| w.info.clone())
            .ok_or(HeadlessError::UnknownWindow(window))
    }

    fn focused_window(&self) -> Result<Option<WindowId>, HeadlessError> {
        Ok(self.focused.get())
    }

    fn pointer(&self) -> Result<(i32, i32), HeadlessError> {
        Ok(self.pointer.get())
    }

    fn frame(&self, window: WindowId) -> Result<Rect, HeadlessError> {
        self.windows
            .borrow()
            .get(&window)
            .map(|w| w.frame)
            .ok_or(HeadlessError::UnknownWindow(window))
    }

    fn set_frame(&self, window: WindowId, rect: Rect) -> Result<(), HeadlessError> {
        let mut windows = self.windows.borrow_mut();
        let w = windows
            .get_mut(&window)
            .ok_or(HeadlessError::UnknownWindow(window))?;
        w.frame = rect;
        Ok(())
    }

    fn focus(&self, window: WindowId) -> Result<(), HeadlessError> {
        if !self.windows.borrow().contains_key(&window) {
            return Err(HeadlessError::UnknownWindow(window));
        }
        self.focused.set(Some(window));
        Ok(())
    }
}

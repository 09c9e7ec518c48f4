//! The orchestrator that ties the layout tree, the host and the drag
//! controller together.
//!
//! [`Tiler`] owns the [`Tree`] and reacts to [`Command`]s by mutating the
//! tree and pushing the resulting geometry to the [`Host`].  Renders are
//! debounced: structural commands only arm the render timer, and the owner
//! calls [`poll`](Tiler::poll) (or [`flush`](Tiler::flush)) to apply them.

use crate::command::{Command, Direction, Orientation};
use crate::config::{Config, TilingConfig};
use crate::drag::DragController;
use crate::float_rules::{resolve_mode, FloatOverride};
use crate::geometry::Rect;
use crate::timer::Debounce;
use crate::traits::Host;
use crate::tree::{process_gap, Layout, NodeData, NodeId, NodeType, Tree, WindowId, WindowMode};
use log::{debug, info, warn};
use std::time::{Duration, Instant};

/// Possible errors from the tiler.
#[derive(Debug, thiserror::Error)]
pub enum TilerError {
    /// The host returned an error.
    #[error("host error: {0}")]
    Host(String),
}

fn host_err(e: impl std::error::Error) -> TilerError {
    TilerError::Host(e.to_string())
}

/// Runs the tiling engine against a [`Host`].
///
/// The tiler is generic over any [`Host`] implementation, making it
/// independent of any concrete window system.
///
/// # Typical usage
///
/// ```ignore
/// let mut tiler = Tiler::new(host, &Config::default());
/// tiler.handle(Command::MonitorsChanged)?;
/// tiler.handle(Command::Track(window))?;
/// tiler.flush();
/// ```
pub struct Tiler<H: Host> {
    host: H,
    tree: Tree,
    config: TilingConfig,
    overrides: Vec<FloatOverride>,
    drag: DragController,
    drop_hint: Option<Rect>,
    render: Debounce,
}

impl<H: Host> Tiler<H> {
    pub fn new(host: H, config: &Config) -> Self {
        Self {
            host,
            tree: Tree::new(config.tiling.tree_settings()),
            config: config.tiling.clone(),
            overrides: config.float_overrides.clone(),
            drag: DragController::new(config.tiling.drag_center_layout),
            drop_hint: None,
            render: Debounce::new(config.daemon.render_debounce()),
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn drag(&self) -> &DragController {
        &self.drag
    }

    /// Where the dragged window would land, while a drag is in progress.
    pub fn drop_hint(&self) -> Option<Rect> {
        self.drop_hint
    }

    /// Process a single [`Command`].
    ///
    /// Operations that cannot apply (nothing focused, nothing in that
    /// direction, ...) are logged and ignored.  Errors are only returned
    /// when a host query fails.
    pub fn handle(&mut self, cmd: Command) -> Result<(), TilerError> {
        match cmd {
            Command::Track(window) => {
                self.track_window(window)?;
            }

            Command::Untrack(window) => {
                self.untrack_window(window);
            }

            Command::SetMinimized { window, minimized } => {
                if let Some(node) = self.tree.find_node(window) {
                    if self.tree.set_minimized(node, minimized) {
                        debug!("{} minimized: {}", window, minimized);
                        self.changed();
                    }
                }
            }

            Command::Focus(dir) => {
                info!("focus {}", dir);
                self.focus(dir)?;
            }

            Command::Move(dir) => {
                info!("move {}", dir);
                if let Some(node) = self.focused_node()? {
                    if self.tree.move_node(node, dir) {
                        self.changed();
                    }
                }
            }

            Command::Swap(dir) => {
                info!("swap {}", dir);
                if let Some(node) = self.focused_node()? {
                    match self.tree.swap_partner(node, dir) {
                        Some(partner) => {
                            self.swap_pairs(node, partner, true)?;
                        }
                        None => debug!("nothing to swap with {}", dir),
                    }
                }
            }

            Command::Split(orientation) => {
                info!("split {}", orientation);
                self.split(orientation)?;
            }

            Command::SetLayout(layout) => {
                info!("layout {}", layout);
                if let Some(node) = self.focused_node()? {
                    if self.tree.set_layout(node, layout).is_some() {
                        self.changed();
                    }
                }
            }

            Command::ToggleFloat => {
                if let Some(node) = self.focused_node()? {
                    if let Some(mode) = self.tree.toggle_float(node) {
                        info!("toggle float: now {:?}", mode);
                        self.changed();
                    }
                }
            }

            Command::DragBegin { force_container } => {
                if let Some(node) = self.focused_node()? {
                    if self.drag.begin(&mut self.tree, node, force_container) {
                        info!("drag begin");
                        self.schedule_render();
                    }
                }
            }

            Command::DragMotion => {
                if self.drag.is_active() {
                    let pointer = self.host.pointer().map_err(host_err)?;
                    self.drop_hint = self.drag.update(&mut self.tree, pointer);
                    debug!(
                        "drag motion at {:?}: hint {:?}",
                        pointer,
                        self.drop_hint.map(|r| r.to_string())
                    );
                }
            }

            Command::DragEnd => {
                if self.drag.is_active() {
                    let pointer = self.host.pointer().map_err(host_err)?;
                    let dropped = self.drag.finish(&mut self.tree, pointer);
                    info!("drag end at {:?} (dropped: {})", pointer, dropped);
                    self.drop_hint = None;
                    self.changed();
                }
            }

            Command::CancelGrab => {
                if self.drag.is_active() {
                    info!("drag cancelled");
                    self.drag.cancel();
                    self.drag.abort(&mut self.tree);
                    self.drop_hint = None;
                    self.schedule_render();
                }
            }

            Command::MonitorsChanged => {
                self.sync_monitors()?;
            }

            Command::Clean => {
                self.changed();
            }
        }
        Ok(())
    }

    //  Windows

    /// Start tiling `window`, placing it under the attach node on its
    /// monitor (or at the end of the monitor).  Returns its node.
    pub fn track_window(&mut self, window: WindowId) -> Result<NodeId, TilerError> {
        if let Some(node) = self.tree.find_node(window) {
            debug!("{} already tracked", window);
            return Ok(node);
        }
        let info = self.host.window_info(window).map_err(host_err)?;
        let monitor = self.monitor_node(info.workspace, info.monitor)?;
        let parent = self
            .tree
            .attach_node()
            .filter(|&a| {
                self.tree.monitor_of(a) == Some(monitor)
                    && matches!(
                        self.tree.node_type(a),
                        Some(NodeType::Container | NodeType::Monitor)
                    )
            })
            .unwrap_or(monitor);

        let mode = resolve_mode(&self.overrides, window, &info);
        let node = self
            .tree
            .create_node(parent, NodeData::window(window, mode))
            .ok_or_else(|| TilerError::Host(format!("cannot attach {} to the tree", window)))?;
        self.tree.set_minimized(node, info.minimized);
        match self.host.frame(window) {
            Ok(rect) => self.tree.set_rect(node, rect),
            Err(e) => warn!("no frame for {}: {}", window, e),
        }
        self.tree.reset_sibling_percent(parent);
        self.tree.set_attach_node(Some(parent));
        info!(
            "tracking {} ({:?} {:?}) as {:?}",
            window, info.class, info.title, mode
        );
        self.changed();
        Ok(node)
    }

    /// Forget a destroyed window.  Returns whether it was tracked.
    pub fn untrack_window(&mut self, window: WindowId) -> bool {
        let Some(node) = self.tree.find_node(window) else {
            return false;
        };
        if self.drag.grabbed() == Some(node) {
            self.drag.abort(&mut self.tree);
            self.drop_hint = None;
        }
        self.tree.remove_node(node);
        info!("untracked {}", window);
        self.changed();
        true
    }

    /// The tree node of the host's focused window.
    pub fn focused_node(&self) -> Result<Option<NodeId>, TilerError> {
        let focused = self.host.focused_window().map_err(host_err)?;
        let node = focused.and_then(|w| self.tree.find_node(w));
        if node.is_none() {
            debug!("no tracked window focused");
        }
        Ok(node)
    }

    fn focus(&mut self, dir: Direction) -> Result<(), TilerError> {
        let Some(node) = self.focused_node()? else {
            return Ok(());
        };
        let Some(target) = self.tree.next(node, dir).and_then(|n| self.tree.window_for(n)) else {
            debug!("nothing to focus {}", dir);
            return Ok(());
        };
        self.focus_node(target)
    }

    /// Focus the window of `node`, making it the visible entry of a
    /// stacked/tabbed parent.
    fn focus_node(&mut self, node: NodeId) -> Result<(), TilerError> {
        let Some(window) = self.tree.get(node).and_then(|n| n.window()) else {
            return Ok(());
        };
        if let Some(parent) = self.tree.parent(node) {
            let grouped = self.tree.layout(parent).is_some_and(Layout::is_grouped);
            if grouped && self.tree.last_focused(parent) != Some(node) {
                self.tree.set_last_focused(parent, Some(node));
                self.schedule_render();
            }
        }
        self.host.focus(window).map_err(host_err)
    }

    fn split(&mut self, orientation: Orientation) -> Result<(), TilerError> {
        let Some(node) = self.focused_node()? else {
            return Ok(());
        };
        if self.tree.split(node, orientation, false).is_some() {
            self.schedule_render();
        }
        Ok(())
    }

    /// Swap two windows and move both host windows to their new places
    /// right away.  With `focus`, `a`'s window is raised and focused.
    ///
    /// Returns `false` when either window cannot be swapped.
    pub fn swap_pairs(&mut self, a: NodeId, b: NodeId, focus: bool) -> Result<bool, TilerError> {
        if !self.tree.swap_pairs(a, b) {
            return Ok(false);
        }
        self.tree.clean_tree();
        let gap = self.config.gap();
        for node in [a, b] {
            let Some(n) = self.tree.get(node) else {
                continue;
            };
            if let (Some(window), true) = (n.window(), n.is_tiled_window()) {
                let rect = process_gap(n.rect, gap);
                if let Err(e) = self.host.set_frame(window, rect) {
                    warn!("failed to place {}: {}", window, e);
                }
            }
        }
        if focus {
            self.focus_node(a)?;
        }
        self.schedule_render();
        Ok(true)
    }

    //  Monitors

    /// Bring the monitor nodes of every known workspace in line with the
    /// host.  Windows of a vanished monitor move to a remaining one.
    pub fn sync_monitors(&mut self) -> Result<(), TilerError> {
        let monitors = self.host.monitors().map_err(host_err)?;
        if monitors.is_empty() {
            warn!("host reports no monitors, keeping the current layout");
            return Ok(());
        }
        let mut workspaces = self.tree.workspace_indices();
        if workspaces.is_empty() {
            workspaces.push(0);
        }
        for ws in workspaces {
            for m in &monitors {
                self.tree.add_monitor(ws, m.index, m.work_area);
            }
            for index in self.tree.monitor_indices(ws) {
                if !monitors.iter().any(|m| m.index == index) {
                    info!("monitor {} on workspace {} is gone", index, ws);
                    if !self.tree.remove_monitor(ws, index) {
                        warn!("kept monitor {} on workspace {}: nowhere to move its windows", index, ws);
                    }
                }
            }
        }
        info!("{} monitor(s)", monitors.len());
        self.changed();
        Ok(())
    }

    /// The node for `monitor` on `workspace`, created from the host's
    /// monitor list on first use.  Unknown monitors fall back to the
    /// first one.
    fn monitor_node(&mut self, workspace: usize, monitor: usize) -> Result<NodeId, TilerError> {
        if let Some(node) = self.tree.monitor(workspace, monitor) {
            return Ok(node);
        }
        let monitors = self.host.monitors().map_err(host_err)?;
        let info = monitors
            .iter()
            .find(|m| m.index == monitor)
            .or_else(|| monitors.first())
            .ok_or_else(|| TilerError::Host("no monitors reported".into()))?;
        if let Some(node) = self.tree.monitor(workspace, info.index) {
            return Ok(node);
        }
        Ok(self.tree.add_monitor(workspace, info.index, info.work_area))
    }

    //  Rendering

    fn changed(&mut self) {
        self.tree.clean_tree();
        self.schedule_render();
    }

    fn schedule_render(&mut self) {
        self.render.schedule(Instant::now());
    }

    pub fn is_render_pending(&self) -> bool {
        self.render.is_pending()
    }

    /// Time until the pending render is due.
    pub fn render_due_in(&self, now: Instant) -> Option<Duration> {
        self.render.remaining(now)
    }

    /// Render if the debounce deadline has passed.  Returns whether it
    /// rendered.
    pub fn poll(&mut self, now: Instant) -> bool {
        if self.render.fire_if_due(now) {
            self.render();
            true
        } else {
            false
        }
    }

    /// Render now if a render is pending.
    pub fn flush(&mut self) -> bool {
        if self.render.is_pending() {
            self.render();
            true
        } else {
            false
        }
    }

    /// Lay out every monitor and write the frames of all tiled windows to
    /// the host.  Returns how many windows were placed.
    pub fn render(&mut self) -> usize {
        self.render.cancel();
        self.tree.arrange_all();
        let gap = self.config.gap();
        let mut placed = 0;
        for node in self.tree.nodes_by_type(NodeType::Window) {
            let Some(n) = self.tree.get(node) else {
                continue;
            };
            let Some(leaf) = n.data().leaf() else {
                continue;
            };
            if leaf.mode != WindowMode::Tile || leaf.minimized {
                continue;
            }
            let rect = process_gap(n.rect, gap);
            match self.host.set_frame(leaf.window, rect) {
                Ok(()) => placed += 1,
                Err(e) => warn!("failed to place {}: {}", leaf.window, e),
            }
        }
        debug!("rendered {} window(s)", placed);
        placed
    }
}

//  Tests

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{MonitorInfo, WindowInfo, WindowType};
    use crate::float_rules::OverrideMode;
    use std::cell::{Cell, RefCell};
    use std::collections::HashMap;

    #[derive(Debug, thiserror::Error)]
    #[error("recorder error: {0}")]
    struct RecorderError(String);

    /// A host that records frame writes and focus calls.
    #[derive(Debug, Default)]
    struct RecorderHost {
        monitors: RefCell<Vec<MonitorInfo>>,
        infos: RefCell<HashMap<WindowId, WindowInfo>>,
        focused: Cell<Option<WindowId>>,
        pointer: Cell<(i32, i32)>,
        frames: RefCell<HashMap<WindowId, Rect>>,
        focus_log: RefCell<Vec<WindowId>>,
        broken: RefCell<Vec<WindowId>>,
    }

    impl RecorderHost {
        fn with_monitor(width: i32, height: i32) -> Self {
            let host = Self::default();
            host.monitors.borrow_mut().push(MonitorInfo {
                index: 0,
                work_area: Rect::new(0, 0, width, height),
            });
            host
        }

        fn add(&self, id: u64) -> WindowId {
            let window = WindowId(id);
            self.infos.borrow_mut().insert(
                window,
                WindowInfo {
                    class: "term".into(),
                    title: format!("term {}", id),
                    ..WindowInfo::default()
                },
            );
            self.focused.set(Some(window));
            window
        }

        fn frame_of(&self, id: u64) -> Option<Rect> {
            self.frames.borrow().get(&WindowId(id)).copied()
        }
    }

    impl Host for RecorderHost {
        type Error = RecorderError;

        fn monitors(&self) -> Result<Vec<MonitorInfo>, RecorderError> {
            Ok(self.monitors.borrow().clone())
        }

        fn window_info(&self, window: WindowId) -> Result<WindowInfo, RecorderError> {
            self.infos
                .borrow()
                .get(&window)
                .cloned()
                .ok_or_else(|| RecorderError(format!("unknown window {}", window)))
        }

        fn focused_window(&self) -> Result<Option<WindowId>, RecorderError> {
            Ok(self.focused.get())
        }

        fn pointer(&self) -> Result<(i32, i32), RecorderError> {
            Ok(self.pointer.get())
        }

        fn frame(&self, window: WindowId) -> Result<Rect, RecorderError> {
            self.frames
                .borrow()
                .get(&window)
                .copied()
                .ok_or_else(|| RecorderError("no frame yet".into()))
        }

        fn set_frame(&self, window: WindowId, rect: Rect) -> Result<(), RecorderError> {
            if self.broken.borrow().contains(&window) {
                return Err(RecorderError("window is gone".into()));
            }
            self.frames.borrow_mut().insert(window, rect);
            Ok(())
        }

        fn focus(&self, window: WindowId) -> Result<(), RecorderError> {
            self.focused.set(Some(window));
            self.focus_log.borrow_mut().push(window);
            Ok(())
        }
    }

    fn no_gap_config() -> Config {
        let mut config = Config::default();
        config.tiling.gap_size = 0;
        config
    }

    /// Tiler over a 900x600 monitor with windows 1..=n tracked in order;
    /// the last one is focused.
    fn tiler_with(n: u64, config: &Config) -> Tiler<RecorderHost> {
        let mut tiler = Tiler::new(RecorderHost::with_monitor(900, 600), config);
        tiler.handle(Command::MonitorsChanged).unwrap();
        for id in 1..=n {
            let w = tiler.host().add(id);
            tiler.handle(Command::Track(w)).unwrap();
        }
        tiler.flush();
        tiler
    }

    #[test]
    fn tracked_windows_share_the_monitor() {
        let tiler = tiler_with(3, &no_gap_config());
        assert_eq!(tiler.host().frame_of(1), Some(Rect::new(0, 0, 300, 600)));
        assert_eq!(tiler.host().frame_of(2), Some(Rect::new(300, 0, 300, 600)));
        assert_eq!(tiler.host().frame_of(3), Some(Rect::new(600, 0, 300, 600)));
        assert!(!tiler.is_render_pending());
    }

    #[test]
    fn windows_tracked_one_render_apart_get_equal_shares() {
        let mut tiler = Tiler::new(RecorderHost::with_monitor(900, 600), &no_gap_config());
        tiler.handle(Command::MonitorsChanged).unwrap();
        let mut widths = Vec::new();
        for id in 1..=3 {
            let w = tiler.host().add(id);
            tiler.handle(Command::Track(w)).unwrap();
            tiler.flush();
            let row: Vec<i32> = (1..=id)
                .filter_map(|i| tiler.host().frame_of(i))
                .map(|r| r.width)
                .collect();
            widths.push(row);
        }
        assert_eq!(widths, vec![vec![900], vec![450, 450], vec![300, 300, 300]]);
    }

    #[test]
    fn gaps_are_applied() {
        let tiler = tiler_with(1, &Config::default());
        assert_eq!(tiler.host().frame_of(1), Some(Rect::new(4, 4, 892, 592)));
    }

    #[test]
    fn render_is_debounced() {
        let mut config = no_gap_config();
        config.daemon.render_debounce_ms = 10_000;
        let mut tiler = Tiler::new(RecorderHost::with_monitor(900, 600), &config);
        tiler.handle(Command::MonitorsChanged).unwrap();
        let w = tiler.host().add(1);
        tiler.handle(Command::Track(w)).unwrap();
        assert!(tiler.is_render_pending());
        assert_eq!(tiler.host().frame_of(1), None);
        let now = Instant::now();
        assert!(!tiler.poll(now));
        assert!(tiler.render_due_in(now).is_some());
        assert!(tiler.poll(now + Duration::from_secs(11)));
        assert_eq!(tiler.host().frame_of(1), Some(Rect::new(0, 0, 900, 600)));
    }

    #[test]
    fn tracking_twice_is_harmless() {
        let mut tiler = tiler_with(1, &no_gap_config());
        tiler.handle(Command::Track(WindowId(1))).unwrap();
        assert_eq!(tiler.tree().windows_in(tiler.tree().root()).len(), 1);
    }

    #[test]
    fn tracking_unknown_window_is_a_host_error() {
        let mut tiler = tiler_with(0, &no_gap_config());
        let err = tiler.handle(Command::Track(WindowId(42))).unwrap_err();
        assert!(err.to_string().starts_with("host error"));
    }

    #[test]
    fn dialogs_and_overrides_float() {
        let mut config = no_gap_config();
        config.float_overrides.push(FloatOverride {
            wm_class: "mpv".into(),
            wm_title: None,
            wm_id: None,
            mode: OverrideMode::Float,
        });
        let mut tiler = tiler_with(1, &config);

        let dialog = tiler.host().add(2);
        tiler
            .host()
            .infos
            .borrow_mut()
            .entry(dialog)
            .and_modify(|i| i.window_type = WindowType::Dialog);
        tiler.handle(Command::Track(dialog)).unwrap();

        let video = tiler.host().add(3);
        tiler
            .host()
            .infos
            .borrow_mut()
            .entry(video)
            .and_modify(|i| i.class = "mpv".into());
        tiler.handle(Command::Track(video)).unwrap();
        tiler.flush();

        let mode = |w: WindowId| {
            let tree = tiler.tree();
            tree.find_node(w).and_then(|n| tree.get(n)).and_then(|n| n.mode())
        };
        assert_eq!(mode(dialog), Some(WindowMode::Float));
        assert_eq!(mode(video), Some(WindowMode::Float));
        assert_eq!(tiler.host().frame_of(1), Some(Rect::new(0, 0, 900, 600)));
    }

    #[test]
    fn untrack_reflows_remaining_windows() {
        let mut tiler = tiler_with(3, &no_gap_config());
        tiler.handle(Command::Untrack(WindowId(2))).unwrap();
        tiler.flush();
        assert_eq!(tiler.host().frame_of(1), Some(Rect::new(0, 0, 450, 600)));
        assert_eq!(tiler.host().frame_of(3), Some(Rect::new(450, 0, 450, 600)));
    }

    #[test]
    fn focus_moves_between_neighbours() {
        let mut tiler = tiler_with(3, &no_gap_config());
        tiler.handle(Command::Focus(Direction::Left)).unwrap();
        assert_eq!(tiler.host().focused.get(), Some(WindowId(2)));
        tiler.handle(Command::Focus(Direction::Left)).unwrap();
        tiler.handle(Command::Focus(Direction::Left)).unwrap();
        assert_eq!(tiler.host().focused.get(), Some(WindowId(1)));
        assert_eq!(tiler.host().focus_log.borrow().len(), 2);
    }

    #[test]
    fn split_then_track_nests_new_window() {
        let mut tiler = tiler_with(2, &no_gap_config());
        tiler.handle(Command::Split(Orientation::Vertical)).unwrap();
        let w = tiler.host().add(3);
        tiler.handle(Command::Track(w)).unwrap();
        tiler.flush();
        assert_eq!(tiler.host().frame_of(1), Some(Rect::new(0, 0, 450, 600)));
        assert_eq!(tiler.host().frame_of(2), Some(Rect::new(450, 0, 450, 300)));
        assert_eq!(tiler.host().frame_of(3), Some(Rect::new(450, 300, 450, 300)));
    }

    #[test]
    fn move_and_swap_commands() {
        let mut tiler = tiler_with(2, &no_gap_config());
        tiler.handle(Command::Move(Direction::Left)).unwrap();
        tiler.flush();
        assert_eq!(tiler.host().frame_of(2), Some(Rect::new(0, 0, 450, 600)));

        tiler.handle(Command::Swap(Direction::Right)).unwrap();
        // The swap places both windows immediately and keeps focus on 2.
        assert_eq!(tiler.host().frame_of(2), Some(Rect::new(450, 0, 450, 600)));
        assert_eq!(tiler.host().frame_of(1), Some(Rect::new(0, 0, 450, 600)));
        assert_eq!(tiler.host().focus_log.borrow().last(), Some(&WindowId(2)));
    }

    #[test]
    fn tabbed_windows_share_the_full_rect() {
        let mut tiler = tiler_with(2, &no_gap_config());
        tiler.handle(Command::SetLayout(Layout::Tabbed)).unwrap();
        tiler.flush();
        assert_eq!(tiler.host().frame_of(1), Some(Rect::new(0, 0, 900, 600)));
        assert_eq!(tiler.host().frame_of(2), Some(Rect::new(0, 0, 900, 600)));

        tiler.handle(Command::Focus(Direction::Left)).unwrap();
        assert_eq!(tiler.host().focused.get(), Some(WindowId(1)));
    }

    #[test]
    fn toggle_float_gives_space_back() {
        let mut tiler = tiler_with(2, &no_gap_config());
        tiler.handle(Command::ToggleFloat).unwrap();
        tiler.flush();
        assert_eq!(tiler.host().frame_of(1), Some(Rect::new(0, 0, 900, 600)));
    }

    #[test]
    fn drag_to_edge_and_cancel() {
        let mut tiler = tiler_with(3, &no_gap_config());
        // Focus window 1 and drag it below window 3.
        tiler.host().focused.set(Some(WindowId(1)));
        tiler.handle(Command::DragBegin { force_container: false }).unwrap();
        tiler.flush();
        assert_eq!(tiler.host().frame_of(3), Some(Rect::new(450, 0, 450, 600)));

        tiler.host().pointer.set((675, 550));
        tiler.handle(Command::DragMotion).unwrap();
        assert_eq!(tiler.drop_hint(), Some(Rect::new(450, 300, 450, 300)));

        tiler.handle(Command::DragEnd).unwrap();
        tiler.flush();
        assert_eq!(tiler.drop_hint(), None);
        assert_eq!(tiler.host().frame_of(2), Some(Rect::new(0, 0, 450, 600)));
        assert_eq!(tiler.host().frame_of(3), Some(Rect::new(450, 0, 450, 300)));
        assert_eq!(tiler.host().frame_of(1), Some(Rect::new(450, 300, 450, 300)));

        tiler.handle(Command::DragBegin { force_container: false }).unwrap();
        assert!(tiler.drag().is_active());
        tiler.handle(Command::CancelGrab).unwrap();
        assert!(!tiler.drag().is_active());
        tiler.flush();
        assert_eq!(tiler.host().frame_of(1), Some(Rect::new(450, 300, 450, 300)));
    }

    #[test]
    fn host_failures_are_logged_not_fatal() {
        let mut tiler = tiler_with(2, &no_gap_config());
        tiler.host().broken.borrow_mut().push(WindowId(1));
        tiler.handle(Command::Clean).unwrap();
        assert_eq!(tiler.render(), 1);
    }

    #[test]
    fn monitor_removal_rehomes_windows() {
        let host = RecorderHost::with_monitor(900, 600);
        host.monitors.borrow_mut().push(MonitorInfo {
            index: 1,
            work_area: Rect::new(900, 0, 900, 600),
        });
        let mut tiler = Tiler::new(host, &no_gap_config());
        tiler.handle(Command::MonitorsChanged).unwrap();
        let w = tiler.host().add(1);
        tiler
            .host()
            .infos
            .borrow_mut()
            .entry(w)
            .and_modify(|i| i.monitor = 1);
        tiler.handle(Command::Track(w)).unwrap();
        tiler.flush();
        assert_eq!(tiler.host().frame_of(1), Some(Rect::new(900, 0, 900, 600)));

        tiler.host().monitors.borrow_mut().truncate(1);
        tiler.handle(Command::MonitorsChanged).unwrap();
        tiler.flush();
        assert_eq!(tiler.host().frame_of(1), Some(Rect::new(0, 0, 900, 600)));
    }

    #[test]
    fn minimized_windows_free_their_space() {
        let mut tiler = tiler_with(2, &no_gap_config());
        tiler
            .handle(Command::SetMinimized {
                window: WindowId(2),
                minimized: true,
            })
            .unwrap();
        tiler.flush();
        assert_eq!(tiler.host().frame_of(1), Some(Rect::new(0, 0, 900, 600)));
    }
}

// Shell: runs parsed commands against a session and renders the result.
// Pointer gestures are simulated on a fixed virtual screen.

use std::fmt::Write as _;

use tabdock_core::{Domain, Rect, TabRef, Vec2};
use tabdock_input::{DragCoordinator, DragOutcome, DropZones};
use tabdock_layout::{LayoutOp, ResizeController, Tab, Workspace};
use tabdock_session::{DockSettings, LayoutStorage, UiState, WorkspaceSession};

use crate::command::Command;

/// Virtual screen the panel row is laid out on for `drag`.
pub const SCREEN: Rect = Rect {
    x: 0.0,
    y: 0.0,
    width: 1200.0,
    height: 800.0,
};
pub const TAB_BAR_HEIGHT: f32 = 28.0;
pub const TAB_WIDTH: f32 = 120.0;

pub struct Shell<S: LayoutStorage + 'static> {
    session: WorkspaceSession<S>,
    drag: DragCoordinator,
    resize: ResizeController,
}

impl<S: LayoutStorage + 'static> Shell<S> {
    pub fn new(session: WorkspaceSession<S>, settings: &DockSettings) -> Self {
        Self {
            session,
            drag: DragCoordinator::with_activation_distance(settings.drag_activation_distance),
            resize: ResizeController::with_min_fraction(settings.min_panel_fraction),
        }
    }

    pub fn session(&self) -> &WorkspaceSession<S> {
        &self.session
    }

    /// Run one command. Returns true if the layout or UI state changed.
    pub fn execute(&mut self, command: Command) -> bool {
        let domain = self.session.domain();
        let op = match command {
            Command::Open { id, title } => LayoutOp::OpenTab(Tab::item(id, title, domain.default_tab_kind())),
            Command::Folder { id, title } => LayoutOp::OpenFolderTab { id, title },
            Command::Close(tab) => LayoutOp::CloseTab(tab),
            Command::Activate(tab) => LayoutOp::SetActiveTab(tab),
            Command::Title(tab, title) => LayoutOp::UpdateTabTitle(tab, title),
            Command::Dirty(tab, dirty) => LayoutOp::SetTabDirty(tab, dirty),
            Command::AddPanel => LayoutOp::AddPanel,
            Command::RemovePanel(panel) => LayoutOp::RemovePanel(panel),
            Command::Focus(panel) => LayoutOp::SetActivePanel(panel),
            Command::Reorder { panel, from, to } => LayoutOp::ReorderTabs { panel, from, to },
            Command::Move { from, to, tab, index } => LayoutOp::MoveTabToPanel { from, to, tab, index },
            Command::Split { from, tab, target } => LayoutOp::AddPanelWithTab { from, tab, target },
            Command::Resize {
                left,
                right,
                dx,
                container_px,
            } => {
                let store = self.session.store_mut();
                if !self.resize.begin(store.workspace(), &left, &right, 0.0, container_px) {
                    log::warn!("{} and {} are not adjacent panels", left, right);
                    return false;
                }
                self.resize.motion(dx);
                return self.resize.release(store);
            }
            Command::Drag { tab, x, y } => return self.drag_tab(tab, Vec2::new(x, y)),
            Command::Sidebar(open) => return self.session.set_sidebar_open(open),
            Command::Expand(folder) => {
                self.session.toggle_folder(folder);
                return true;
            }
            Command::Show | Command::Quit => return false,
        };
        self.session.dispatch(op)
    }

    /// Press at the centre of `tab`'s header, move to `to`, release.
    fn drag_tab(&mut self, tab: TabRef, to: Vec2) -> bool {
        let store = self.session.store_mut();
        let ws = store.workspace();
        let Some((pi, ti)) = ws.find_tab(tab) else {
            log::warn!("tab {} is not open", tab);
            return false;
        };
        let columns = ws.column_rects(SCREEN);
        let (panel, column) = &columns[pi];
        let origin = Rect::new(column.x + ti as f32 * TAB_WIDTH, column.y, TAB_WIDTH, TAB_BAR_HEIGHT);
        let press = Vec2::new(origin.x + origin.width / 2.0, origin.y + origin.height / 2.0);

        let zones = DropZones::for_workspace(ws, SCREEN, TAB_BAR_HEIGHT, TAB_WIDTH);
        if !self.drag.press(ws, panel, tab, press, origin) {
            return false;
        }
        self.drag.motion(to, &zones);
        match self.drag.release(to, &zones, store) {
            DragOutcome::Dropped(op) => {
                log::info!("drop: {:?}", op);
                true
            }
            DragOutcome::Click { panel, tab } => {
                let focused = store.set_active_panel(&panel);
                store.set_active_tab(tab) || focused
            }
            outcome => {
                log::info!("drag ended without change: {:?}", outcome);
                false
            }
        }
    }

    pub fn render(&self) -> String {
        render(self.session.domain(), self.session.store().workspace(), &self.session.ui())
    }
}

/// Plain-text picture of a workspace, one panel per block.
pub fn render(domain: Domain, ws: &Workspace, ui: &UiState) -> String {
    let mut out = String::new();
    let total = ws.total_width();
    for panel in &ws.panels {
        let marker = if panel.id == ws.active_panel { "*" } else { " " };
        let share = if total > 0.0 { panel.width / total * 100.0 } else { 0.0 };
        let _ = writeln!(out, "{marker} {} ({:.0}%)", panel.id, share);
        if panel.tabs.is_empty() {
            let _ = writeln!(out, "    (empty)");
        }
        for tab in &panel.tabs {
            let active = if panel.active_tab == Some(tab.id) { ">" } else { " " };
            let dirty = if tab.is_dirty { " [+]" } else { "" };
            let _ = writeln!(out, "  {active} {} {} <{}>{dirty}", tab.id, tab.title, tab.kind.as_str());
        }
    }
    let expanded: Vec<String> = ui.expanded_folders.iter().map(|id| id.to_string()).collect();
    let _ = writeln!(
        out,
        "[{}] sidebar {}, expanded: {}",
        domain.as_str(),
        if ui.sidebar_open { "open" } else { "closed" },
        if expanded.is_empty() { "-".to_string() } else { expanded.join(",") }
    );
    out
}

use std::collections::{BTreeMap, HashSet};

use tabdock_core::{PanelId, Rect, TabKind, TabRef};

/// Flex weight given to newly created panels.
pub const DEFAULT_PANEL_WIDTH: f32 = 1.0;

// ──────────────────────────────────────────────
// Tab
// ──────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct Tab {
    pub id: TabRef,
    pub title: String,
    pub is_dirty: bool,
    pub kind: TabKind,
    /// Kind-specific metadata. Carried through moves and persistence, never read.
    pub meta: BTreeMap<String, String>,
}

impl Tab {
    pub fn new(id: TabRef, title: impl Into<String>, kind: TabKind) -> Self {
        Self {
            id,
            title: title.into(),
            is_dirty: false,
            kind,
            meta: BTreeMap::new(),
        }
    }

    pub fn item(id: u64, title: impl Into<String>, kind: TabKind) -> Self {
        Self::new(TabRef::Item(id), title, kind)
    }

    /// Tab for a folder. The ref lives in the container id space so it never
    /// collides with an item of the same number.
    pub fn folder(id: u64, title: impl Into<String>) -> Self {
        Self::new(TabRef::Container(id), title, TabKind::Folder)
    }

    pub fn with_meta(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.meta.insert(key.into(), value.into());
        self
    }
}

// ──────────────────────────────────────────────
// Panel
// ──────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    pub id: PanelId,
    pub tabs: Vec<Tab>,
    pub active_tab: Option<TabRef>,
    /// Relative flex weight, not pixels.
    pub width: f32,
}

impl Panel {
    pub fn new(id: PanelId) -> Self {
        Self {
            id,
            tabs: Vec::new(),
            active_tab: None,
            width: DEFAULT_PANEL_WIDTH,
        }
    }

    pub fn tab_index(&self, tab: TabRef) -> Option<usize> {
        self.tabs.iter().position(|t| t.id == tab)
    }

    pub fn contains(&self, tab: TabRef) -> bool {
        self.tab_index(tab).is_some()
    }

    pub fn active(&self) -> Option<&Tab> {
        let active = self.active_tab?;
        self.tabs.iter().find(|t| t.id == active)
    }

    /// Remove a tab. When it was the active tab, the tab that slides into its
    /// slot (or the new last tab) becomes active.
    fn take_tab(&mut self, tab: TabRef) -> Option<Tab> {
        let index = self.tab_index(tab)?;
        let removed = self.tabs.remove(index);
        if self.active_tab == Some(tab) {
            self.active_tab = if self.tabs.is_empty() {
                None
            } else {
                Some(self.tabs[index.min(self.tabs.len() - 1)].id)
            };
        }
        Some(removed)
    }
}

// ──────────────────────────────────────────────
// Panel id allocation
// ──────────────────────────────────────────────

/// Monotonic source of panel ids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PanelIdAllocator {
    last: u64,
}

impl PanelIdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resume numbering after `last`, so the next id is `last + 1`.
    pub fn resume_after(last: u64) -> Self {
        Self { last }
    }

    /// Allocator that cannot reproduce any id already used in `workspace`.
    pub fn for_workspace(workspace: &Workspace) -> Self {
        let last = workspace
            .panels
            .iter()
            .filter_map(|p| p.id.numeric_suffix())
            .max()
            .unwrap_or(0);
        Self::resume_after(last)
    }

    pub fn last(&self) -> u64 {
        self.last
    }

    pub fn next_id(&mut self) -> PanelId {
        self.last += 1;
        PanelId::from_seq(self.last)
    }
}

// ──────────────────────────────────────────────
// Operations
// ──────────────────────────────────────────────

/// Every layout mutation, as a value. Applied with [`Workspace::apply`].
#[derive(Debug, Clone, PartialEq)]
pub enum LayoutOp {
    AddPanel,
    RemovePanel(PanelId),
    SetActivePanel(PanelId),
    SetPanelWidths {
        left: PanelId,
        right: PanelId,
        left_width: f32,
        right_width: f32,
    },
    OpenTab(Tab),
    OpenFolderTab {
        id: u64,
        title: String,
    },
    CloseTab(TabRef),
    SetActiveTab(TabRef),
    UpdateTabTitle(TabRef, String),
    SetTabDirty(TabRef, bool),
    ReorderTabs {
        panel: PanelId,
        from: usize,
        to: usize,
    },
    MoveTabToPanel {
        from: PanelId,
        to: PanelId,
        tab: TabRef,
        index: Option<usize>,
    },
    AddPanelWithTab {
        from: PanelId,
        tab: TabRef,
        target: PanelId,
    },
}

// ──────────────────────────────────────────────
// Workspace
// ──────────────────────────────────────────────

/// The row of panels plus the active one. Operations never mutate in place;
/// each returns `Some(next)` or `None` when the workspace would not change
/// (including every reference to a panel or tab that does not exist).
#[derive(Debug, Clone, PartialEq)]
pub struct Workspace {
    pub panels: Vec<Panel>,
    pub active_panel: PanelId,
}

impl Workspace {
    /// Workspace holding a single empty panel.
    pub fn with_default_panel(ids: &mut PanelIdAllocator) -> Self {
        let panel = Panel::new(ids.next_id());
        Self {
            active_panel: panel.id.clone(),
            panels: vec![panel],
        }
    }

    pub fn panel(&self, id: &PanelId) -> Option<&Panel> {
        self.panels.iter().find(|p| &p.id == id)
    }

    pub fn panel_index(&self, id: &PanelId) -> Option<usize> {
        self.panels.iter().position(|p| &p.id == id)
    }

    pub fn active_panel(&self) -> Option<&Panel> {
        self.panel(&self.active_panel)
    }

    /// Locate a tab as `(panel_index, tab_index)`, scanning panels left to right.
    pub fn find_tab(&self, tab: TabRef) -> Option<(usize, usize)> {
        self.panels
            .iter()
            .enumerate()
            .find_map(|(pi, p)| p.tab_index(tab).map(|ti| (pi, ti)))
    }

    pub fn tab(&self, tab: TabRef) -> Option<&Tab> {
        let (pi, ti) = self.find_tab(tab)?;
        Some(&self.panels[pi].tabs[ti])
    }

    pub fn tab_count(&self) -> usize {
        self.panels.iter().map(|p| p.tabs.len()).sum()
    }

    pub fn total_width(&self) -> f32 {
        self.panels.iter().map(|p| p.width).sum()
    }

    /// Lay the panels out side by side inside `area`, proportionally to their widths.
    pub fn column_rects(&self, area: Rect) -> Vec<(PanelId, Rect)> {
        let total = self.total_width();
        let mut x = area.x;
        self.panels
            .iter()
            .map(|p| {
                let w = if total > 0.0 {
                    area.width * p.width / total
                } else {
                    area.width / self.panels.len() as f32
                };
                let rect = Rect::new(x, area.y, w, area.height);
                x += w;
                (p.id.clone(), rect)
            })
            .collect()
    }

    /// Check every structural invariant, reporting the first violation.
    pub fn check_invariants(&self) -> Result<(), String> {
        if self.panels.is_empty() {
            return Err("workspace has no panels".into());
        }
        if self.active_panel().is_none() {
            return Err(format!("active panel {} does not exist", self.active_panel));
        }
        let mut panel_ids = HashSet::new();
        let mut tab_ids = HashSet::new();
        for panel in &self.panels {
            if !panel_ids.insert(&panel.id) {
                return Err(format!("panel id {} appears twice", panel.id));
            }
            if !(panel.width.is_finite() && panel.width > 0.0) {
                return Err(format!("panel {} has width {}", panel.id, panel.width));
            }
            for tab in &panel.tabs {
                if !tab_ids.insert(tab.id) {
                    return Err(format!("tab {} is open more than once", tab.id));
                }
            }
            if let Some(active) = panel.active_tab {
                if !panel.contains(active) {
                    return Err(format!("panel {} points at missing tab {}", panel.id, active));
                }
            }
        }
        Ok(())
    }

    pub fn apply(&self, op: &LayoutOp, ids: &mut PanelIdAllocator) -> Option<Workspace> {
        match op {
            LayoutOp::AddPanel => Some(self.add_panel(ids)),
            LayoutOp::RemovePanel(panel) => self.remove_panel(panel),
            LayoutOp::SetActivePanel(panel) => self.set_active_panel(panel),
            LayoutOp::SetPanelWidths {
                left,
                right,
                left_width,
                right_width,
            } => self.set_panel_widths(left, right, *left_width, *right_width),
            LayoutOp::OpenTab(tab) => self.open_tab(tab.clone()),
            LayoutOp::OpenFolderTab { id, title } => self.open_folder_tab(*id, title.clone()),
            LayoutOp::CloseTab(tab) => self.close_tab(*tab),
            LayoutOp::SetActiveTab(tab) => self.set_active_tab(*tab),
            LayoutOp::UpdateTabTitle(tab, title) => self.update_tab_title(*tab, title),
            LayoutOp::SetTabDirty(tab, dirty) => self.set_tab_dirty(*tab, *dirty),
            LayoutOp::ReorderTabs { panel, from, to } => self.reorder_tabs(panel, *from, *to),
            LayoutOp::MoveTabToPanel {
                from,
                to,
                tab,
                index,
            } => self.move_tab_to_panel(from, to, *tab, *index),
            LayoutOp::AddPanelWithTab { from, tab, target } => {
                self.add_panel_with_tab(from, *tab, target, ids)
            }
        }
    }

    // ── Panels ──────────────────────────────────

    /// Insert an empty panel right after the active one and activate it.
    pub fn add_panel(&self, ids: &mut PanelIdAllocator) -> Workspace {
        let mut next = self.clone();
        let at = self
            .panel_index(&self.active_panel)
            .map_or(next.panels.len(), |i| i + 1);
        let panel = Panel::new(next.fresh_panel_id(ids));
        next.active_panel = panel.id.clone();
        next.panels.insert(at, panel);
        next
    }

    /// Close a panel, folding its tabs into the left neighbour (or the right
    /// one when closing the first panel). The last panel is never removed.
    pub fn remove_panel(&self, panel: &PanelId) -> Option<Workspace> {
        if self.panels.len() <= 1 {
            return None;
        }
        let index = self.panel_index(panel)?;
        let mut next = self.clone();
        let closing = next.panels.remove(index);
        // After removal the right neighbour slides into `index`.
        let neighbour = &mut next.panels[index.saturating_sub(1)];
        neighbour.tabs.extend(closing.tabs);
        if closing.active_tab.is_some() {
            neighbour.active_tab = closing.active_tab;
        }
        neighbour.width += closing.width;
        if next.active_panel == closing.id {
            next.active_panel = neighbour.id.clone();
        }
        Some(next)
    }

    pub fn set_active_panel(&self, panel: &PanelId) -> Option<Workspace> {
        if &self.active_panel == panel || self.panel(panel).is_none() {
            return None;
        }
        let mut next = self.clone();
        next.active_panel = panel.clone();
        Some(next)
    }

    pub fn set_panel_widths(
        &self,
        left: &PanelId,
        right: &PanelId,
        left_width: f32,
        right_width: f32,
    ) -> Option<Workspace> {
        let valid = |w: f32| w.is_finite() && w > 0.0;
        if left == right || !valid(left_width) || !valid(right_width) {
            return None;
        }
        let li = self.panel_index(left)?;
        let ri = self.panel_index(right)?;
        if self.panels[li].width == left_width && self.panels[ri].width == right_width {
            return None;
        }
        let mut next = self.clone();
        next.panels[li].width = left_width;
        next.panels[ri].width = right_width;
        Some(next)
    }

    // ── Tabs ────────────────────────────────────

    /// Bring a tab into view. An already-open tab is focused where it is;
    /// otherwise it is appended to the active panel.
    pub fn open_tab(&self, tab: Tab) -> Option<Workspace> {
        if let Some((pi, _)) = self.find_tab(tab.id) {
            let panel = &self.panels[pi];
            if self.active_panel == panel.id && panel.active_tab == Some(tab.id) {
                return None;
            }
            let mut next = self.clone();
            next.active_panel = panel.id.clone();
            next.panels[pi].active_tab = Some(tab.id);
            return Some(next);
        }
        let pi = self.panel_index(&self.active_panel)?;
        let mut next = self.clone();
        let panel = &mut next.panels[pi];
        panel.active_tab = Some(tab.id);
        panel.tabs.push(tab);
        Some(next)
    }

    pub fn open_folder_tab(&self, folder_id: u64, title: impl Into<String>) -> Option<Workspace> {
        self.open_tab(Tab::folder(folder_id, title))
    }

    /// Close a tab in the active panel. Tabs in other panels are left alone.
    pub fn close_tab(&self, tab: TabRef) -> Option<Workspace> {
        let pi = self.panel_index(&self.active_panel)?;
        let mut next = self.clone();
        next.panels[pi].take_tab(tab)?;
        Some(next)
    }

    /// Activate a tab of the active panel without looking at other panels.
    pub fn set_active_tab(&self, tab: TabRef) -> Option<Workspace> {
        let pi = self.panel_index(&self.active_panel)?;
        let panel = &self.panels[pi];
        if panel.active_tab == Some(tab) || !panel.contains(tab) {
            return None;
        }
        let mut next = self.clone();
        next.panels[pi].active_tab = Some(tab);
        Some(next)
    }

    pub fn update_tab_title(&self, tab: TabRef, title: &str) -> Option<Workspace> {
        let (pi, ti) = self.find_tab(tab)?;
        if self.panels[pi].tabs[ti].title == title {
            return None;
        }
        let mut next = self.clone();
        next.panels[pi].tabs[ti].title = title.to_string();
        Some(next)
    }

    pub fn set_tab_dirty(&self, tab: TabRef, is_dirty: bool) -> Option<Workspace> {
        let (pi, ti) = self.find_tab(tab)?;
        if self.panels[pi].tabs[ti].is_dirty == is_dirty {
            return None;
        }
        let mut next = self.clone();
        next.panels[pi].tabs[ti].is_dirty = is_dirty;
        Some(next)
    }

    /// Move the tab at `from` so it ends up at `to` (splice semantics).
    /// `to` past the end means "last".
    pub fn reorder_tabs(&self, panel: &PanelId, from: usize, to: usize) -> Option<Workspace> {
        let pi = self.panel_index(panel)?;
        let len = self.panels[pi].tabs.len();
        if from >= len {
            return None;
        }
        let to = to.min(len - 1);
        if from == to {
            return None;
        }
        let mut next = self.clone();
        let tabs = &mut next.panels[pi].tabs;
        let tab = tabs.remove(from);
        tabs.insert(to, tab);
        Some(next)
    }

    /// Move a tab into another panel at `index` (appended when `None`), then
    /// focus it there.
    pub fn move_tab_to_panel(
        &self,
        from: &PanelId,
        to: &PanelId,
        tab: TabRef,
        index: Option<usize>,
    ) -> Option<Workspace> {
        if from == to {
            return self.move_within_panel(from, tab, index);
        }
        let fi = self.panel_index(from)?;
        let ti = self.panel_index(to)?;
        let mut next = self.clone();
        let moved = next.panels[fi].take_tab(tab)?;
        let dest = &mut next.panels[ti];
        let at = index.map_or(dest.tabs.len(), |i| i.min(dest.tabs.len()));
        dest.tabs.insert(at, moved);
        dest.active_tab = Some(tab);
        next.active_panel = to.clone();
        Some(next)
    }

    fn move_within_panel(
        &self,
        panel: &PanelId,
        tab: TabRef,
        index: Option<usize>,
    ) -> Option<Workspace> {
        let pi = self.panel_index(panel)?;
        let current = self.panels[pi].tab_index(tab)?;
        let last = self.panels[pi].tabs.len() - 1;
        let mut next = self
            .reorder_tabs(panel, current, index.unwrap_or(last))
            .unwrap_or_else(|| self.clone());
        next.panels[pi].active_tab = Some(tab);
        next.active_panel = panel.clone();
        if &next == self {
            None
        } else {
            Some(next)
        }
    }

    /// Split: pull a tab out of `from` into a brand new panel placed right
    /// after `target`.
    pub fn add_panel_with_tab(
        &self,
        from: &PanelId,
        tab: TabRef,
        target: &PanelId,
        ids: &mut PanelIdAllocator,
    ) -> Option<Workspace> {
        let fi = self.panel_index(from)?;
        let ti = self.panel_index(target)?;
        if !self.panels[fi].contains(tab) {
            return None;
        }
        let mut next = self.clone();
        let moved = next.panels[fi].take_tab(tab)?;
        let mut panel = Panel::new(next.fresh_panel_id(ids));
        panel.tabs.push(moved);
        panel.active_tab = Some(tab);
        next.active_panel = panel.id.clone();
        next.panels.insert(ti + 1, panel);
        Some(next)
    }

    /// Next allocator id that is not already taken in this workspace.
    fn fresh_panel_id(&self, ids: &mut PanelIdAllocator) -> PanelId {
        loop {
            let id = ids.next_id();
            if self.panel(&id).is_none() {
                return id;
            }
        }
    }
}

// Layout store: owns the panel row and applies every layout mutation.
// Single-threaded by construction (Rc state, boxed FnMut listeners).

mod resize;
mod workspace;

use std::rc::Rc;

use tabdock_core::{PanelId, TabRef};

pub use resize::{clamp_pair, ResizeController, HANDLE_HIT_THRESHOLD, MIN_PANEL_FRACTION};
pub use workspace::{LayoutOp, Panel, PanelIdAllocator, Tab, Workspace, DEFAULT_PANEL_WIDTH};

// ──────────────────────────────────────────────
// LayoutStore
// ──────────────────────────────────────────────

/// Handle returned by [`LayoutStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subscription(u64);

type Listener = Box<dyn FnMut(&Workspace)>;

pub struct LayoutStore {
    state: Rc<Workspace>,
    ids: PanelIdAllocator,
    listeners: Vec<(Subscription, Listener)>,
    next_subscription: u64,
}

impl LayoutStore {
    /// Store holding a single empty panel.
    pub fn new() -> Self {
        let mut ids = PanelIdAllocator::new();
        let workspace = Workspace::with_default_panel(&mut ids);
        Self::from_parts(workspace, ids)
    }

    /// Store over a rehydrated workspace. `ids` must already be past every
    /// panel id in `workspace`.
    pub fn from_parts(workspace: Workspace, ids: PanelIdAllocator) -> Self {
        Self {
            state: Rc::new(workspace),
            ids,
            listeners: Vec::new(),
            next_subscription: 1,
        }
    }

    /// Current workspace value. Later dispatches never touch the returned value.
    pub fn state(&self) -> Rc<Workspace> {
        Rc::clone(&self.state)
    }

    pub fn workspace(&self) -> &Workspace {
        &self.state
    }

    pub fn panel_ids(&self) -> &PanelIdAllocator {
        &self.ids
    }

    /// Apply an operation. Returns true (and notifies listeners) only if the
    /// workspace changed; otherwise the current `Rc` is kept as is.
    pub fn dispatch(&mut self, op: LayoutOp) -> bool {
        match self.state.apply(&op, &mut self.ids) {
            Some(next) => {
                debug_assert!(
                    next.check_invariants().is_ok(),
                    "{:?} broke an invariant: {:?}",
                    op,
                    next.check_invariants()
                );
                self.state = Rc::new(next);
                self.notify();
                true
            }
            None => {
                log::debug!("layout op left workspace unchanged: {:?}", op);
                false
            }
        }
    }

    pub fn subscribe<F>(&mut self, listener: F) -> Subscription
    where
        F: FnMut(&Workspace) + 'static,
    {
        let sub = Subscription(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((sub, Box::new(listener)));
        sub
    }

    /// Returns false if the subscription was already gone.
    pub fn unsubscribe(&mut self, sub: Subscription) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(s, _)| *s != sub);
        self.listeners.len() != before
    }

    fn notify(&mut self) {
        let state = Rc::clone(&self.state);
        for (_, listener) in &mut self.listeners {
            listener(&state);
        }
    }

    // ── Operation shorthands ────────────────────

    pub fn add_panel(&mut self) -> bool {
        self.dispatch(LayoutOp::AddPanel)
    }

    pub fn remove_panel(&mut self, panel: &PanelId) -> bool {
        self.dispatch(LayoutOp::RemovePanel(panel.clone()))
    }

    pub fn set_active_panel(&mut self, panel: &PanelId) -> bool {
        self.dispatch(LayoutOp::SetActivePanel(panel.clone()))
    }

    pub fn set_panel_widths(
        &mut self,
        left: &PanelId,
        right: &PanelId,
        left_width: f32,
        right_width: f32,
    ) -> bool {
        self.dispatch(LayoutOp::SetPanelWidths {
            left: left.clone(),
            right: right.clone(),
            left_width,
            right_width,
        })
    }

    pub fn open_tab(&mut self, tab: Tab) -> bool {
        self.dispatch(LayoutOp::OpenTab(tab))
    }

    pub fn open_folder_tab(&mut self, folder_id: u64, title: impl Into<String>) -> bool {
        self.dispatch(LayoutOp::OpenFolderTab {
            id: folder_id,
            title: title.into(),
        })
    }

    pub fn close_tab(&mut self, tab: TabRef) -> bool {
        self.dispatch(LayoutOp::CloseTab(tab))
    }

    pub fn set_active_tab(&mut self, tab: TabRef) -> bool {
        self.dispatch(LayoutOp::SetActiveTab(tab))
    }

    pub fn update_tab_title(&mut self, tab: TabRef, title: impl Into<String>) -> bool {
        self.dispatch(LayoutOp::UpdateTabTitle(tab, title.into()))
    }

    pub fn set_tab_dirty(&mut self, tab: TabRef, is_dirty: bool) -> bool {
        self.dispatch(LayoutOp::SetTabDirty(tab, is_dirty))
    }

    pub fn reorder_tabs(&mut self, panel: &PanelId, from: usize, to: usize) -> bool {
        self.dispatch(LayoutOp::ReorderTabs {
            panel: panel.clone(),
            from,
            to,
        })
    }

    pub fn move_tab_to_panel(
        &mut self,
        from: &PanelId,
        to: &PanelId,
        tab: TabRef,
        index: Option<usize>,
    ) -> bool {
        self.dispatch(LayoutOp::MoveTabToPanel {
            from: from.clone(),
            to: to.clone(),
            tab,
            index,
        })
    }

    pub fn add_panel_with_tab(&mut self, from: &PanelId, tab: TabRef, target: &PanelId) -> bool {
        self.dispatch(LayoutOp::AddPanelWithTab {
            from: from.clone(),
            tab,
            target: target.clone(),
        })
    }
}

impl Default for LayoutStore {
    fn default() -> Self {
        Self::new()
    }
}

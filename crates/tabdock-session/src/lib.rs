// Persistence adapter: keeps each domain's layout (and the sidebar state next
// to it) in durable client storage and restores it on start.

mod session;
mod settings;
mod storage;

use std::cell::{Ref, RefCell};
use std::rc::Rc;

use tabdock_core::Domain;
use tabdock_layout::{LayoutOp, LayoutStore, Subscription, Workspace};

pub use session::{
    load_layout, save_layout, PersistedLayout, PersistedPanel, PersistedSidebar, PersistedTab, PersistedTabId,
    Restored, UiState,
};
pub use settings::{load_settings, load_settings_from, DockSettings};
pub use storage::{FileStorage, LayoutStorage, MemoryStorage};

// ──────────────────────────────────────────────
// WorkspaceSession
// ──────────────────────────────────────────────

/// A restored store wired to its storage: every store change and every UI
/// setter writes the layout back.
pub struct WorkspaceSession<S: LayoutStorage + 'static> {
    domain: Domain,
    store: LayoutStore,
    ui: Rc<RefCell<UiState>>,
    storage: Rc<RefCell<S>>,
    subscription: Option<Subscription>,
}

impl<S: LayoutStorage + 'static> WorkspaceSession<S> {
    /// Load `domain`'s layout from `storage` and start saving on change.
    pub fn open(domain: Domain, storage: S) -> Self {
        let Restored { workspace, ids, ui } = load_layout(&storage, domain);
        log::info!(
            "Restored {} layout: {} panel(s), {} tab(s)",
            domain.as_str(),
            workspace.panels.len(),
            workspace.tab_count()
        );
        let mut store = LayoutStore::from_parts(workspace, ids);
        let ui = Rc::new(RefCell::new(ui));
        let storage = Rc::new(RefCell::new(storage));

        let listener_ui = Rc::clone(&ui);
        let listener_storage = Rc::clone(&storage);
        let subscription = store.subscribe(move |workspace: &Workspace| {
            let ui = listener_ui.borrow();
            save_layout(&mut *listener_storage.borrow_mut(), domain, workspace, &ui);
        });

        Self {
            domain,
            store,
            ui,
            storage,
            subscription: Some(subscription),
        }
    }

    pub fn domain(&self) -> Domain {
        self.domain
    }

    pub fn store(&self) -> &LayoutStore {
        &self.store
    }

    /// Mutable store access. Changes made through it are still saved while
    /// the session is attached.
    pub fn store_mut(&mut self) -> &mut LayoutStore {
        &mut self.store
    }

    pub fn dispatch(&mut self, op: LayoutOp) -> bool {
        self.store.dispatch(op)
    }

    pub fn ui(&self) -> Ref<'_, UiState> {
        self.ui.borrow()
    }

    pub fn storage(&self) -> Ref<'_, S> {
        self.storage.borrow()
    }

    pub fn is_attached(&self) -> bool {
        self.subscription.is_some()
    }

    /// Returns false (and writes nothing) if the sidebar was already in
    /// that state.
    pub fn set_sidebar_open(&mut self, open: bool) -> bool {
        {
            let mut ui = self.ui.borrow_mut();
            if ui.sidebar_open == open {
                return false;
            }
            ui.sidebar_open = open;
        }
        self.save_if_attached();
        true
    }

    /// Flip a folder's expanded state in the sidebar tree. Returns the new
    /// state.
    pub fn toggle_folder(&mut self, folder_id: u64) -> bool {
        let expanded = self.ui.borrow_mut().expanded_folders.toggle(folder_id);
        self.save_if_attached();
        expanded
    }

    /// Write the current layout regardless of attachment.
    pub fn save_now(&self) {
        let ui = self.ui.borrow();
        save_layout(&mut *self.storage.borrow_mut(), self.domain, self.store.workspace(), &ui);
    }

    /// Stop saving on change. Returns false if already detached.
    pub fn detach(&mut self) -> bool {
        match self.subscription.take() {
            Some(sub) => self.store.unsubscribe(sub),
            None => false,
        }
    }

    fn save_if_attached(&self) {
        if self.is_attached() {
            self.save_now();
        }
    }
}

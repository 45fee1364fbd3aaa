// Layout persistence: save/restore a domain's panel row across reloads.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};
use tabdock_core::{Domain, IdSet, PanelId, TabKind, TabRef};
use tabdock_layout::{Panel, PanelIdAllocator, Tab, Workspace, DEFAULT_PANEL_WIDTH};

use crate::storage::LayoutStorage;

// ──────────────────────────────────────────────
// Serializable layout types
// ──────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedLayout {
    pub panels: Vec<PersistedPanel>,
    #[serde(default)]
    pub active_panel_id: Option<String>,
    #[serde(default)]
    pub sidebar: PersistedSidebar,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedPanel {
    pub id: String,
    #[serde(default)]
    pub tabs: Vec<PersistedTab>,
    #[serde(default)]
    pub active_tab_id: Option<PersistedTabId>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub active_tab_container: bool,
    #[serde(default = "default_width")]
    pub width: f32,
}

/// A tab id as stored. Current layouts write the unsigned id and mark
/// containers with a separate flag; older layouts wrote containers as
/// negated ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PersistedTabId {
    Id(u64),
    Legacy(i64),
}

impl PersistedTabId {
    fn decode(self, container: bool) -> TabRef {
        match self {
            PersistedTabId::Id(id) if container => TabRef::Container(id),
            PersistedTabId::Id(id) => TabRef::Item(id),
            PersistedTabId::Legacy(id) if container || id < 0 => TabRef::Container(id.unsigned_abs()),
            PersistedTabId::Legacy(id) => TabRef::Item(id as u64),
        }
    }

    fn encode(tab: TabRef) -> (Self, bool) {
        (PersistedTabId::Id(tab.raw_id()), tab.is_container())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedTab {
    pub id: PersistedTabId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub is_dirty: bool,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub container: bool,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub meta: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedSidebar {
    #[serde(default = "default_true")]
    pub open: bool,
    #[serde(default)]
    pub expanded_folder_ids: Vec<u64>,
}

impl Default for PersistedSidebar {
    fn default() -> Self {
        Self {
            open: true,
            expanded_folder_ids: Vec::new(),
        }
    }
}

fn default_width() -> f32 {
    DEFAULT_PANEL_WIDTH
}

fn default_true() -> bool {
    true
}

fn is_false(value: &bool) -> bool {
    !*value
}

// ──────────────────────────────────────────────
// Sibling UI state
// ──────────────────────────────────────────────

/// Non-layout UI state persisted next to the panels.
#[derive(Debug, Clone, PartialEq)]
pub struct UiState {
    pub sidebar_open: bool,
    pub expanded_folders: IdSet,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            sidebar_open: true,
            expanded_folders: IdSet::new(),
        }
    }
}

/// Everything needed to rebuild a domain's workspace.
#[derive(Debug, Clone, PartialEq)]
pub struct Restored {
    pub workspace: Workspace,
    pub ids: PanelIdAllocator,
    pub ui: UiState,
}

impl Restored {
    /// Fresh single-panel workspace.
    pub fn fresh() -> Self {
        let mut ids = PanelIdAllocator::new();
        let workspace = Workspace::with_default_panel(&mut ids);
        Self {
            workspace,
            ids,
            ui: UiState::default(),
        }
    }
}

// ──────────────────────────────────────────────
// Workspace → persisted
// ──────────────────────────────────────────────

impl PersistedLayout {
    pub fn capture(workspace: &Workspace, ui: &UiState) -> Self {
        let panels = workspace
            .panels
            .iter()
            .map(|panel| {
                let active = panel.active_tab.map(PersistedTabId::encode);
                PersistedPanel {
                    id: panel.id.to_string(),
                    tabs: panel
                        .tabs
                        .iter()
                        .map(|tab| {
                            let (id, container) = PersistedTabId::encode(tab.id);
                            PersistedTab {
                                id,
                                title: tab.title.clone(),
                                is_dirty: tab.is_dirty,
                                kind: Some(tab.kind.as_str().to_string()),
                                container,
                                meta: tab.meta.clone(),
                            }
                        })
                        .collect(),
                    active_tab_id: active.map(|(id, _)| id),
                    active_tab_container: active.map_or(false, |(_, container)| container),
                    width: panel.width,
                }
            })
            .collect();

        PersistedLayout {
            panels,
            active_panel_id: Some(workspace.active_panel.to_string()),
            sidebar: PersistedSidebar {
                open: ui.sidebar_open,
                expanded_folder_ids: ui.expanded_folders.iter().collect(),
            },
        }
    }

    // ──────────────────────────────────────────
    // Persisted → workspace
    // ──────────────────────────────────────────

    /// Rebuild a valid workspace. Returns `None` when there is nothing usable
    /// (no panels at all). Everything else is repaired rather than rejected.
    pub fn restore(self, domain: Domain) -> Option<Restored> {
        let mut seen_panels = HashSet::new();
        let mut seen_tabs = HashSet::new();
        let mut panels = Vec::with_capacity(self.panels.len());

        for persisted in self.panels {
            if !seen_panels.insert(persisted.id.clone()) {
                log::warn!("Dropping duplicate panel {}", persisted.id);
                continue;
            }
            let mut panel = Panel::new(PanelId::new(persisted.id));
            if persisted.width.is_finite() && persisted.width > 0.0 {
                panel.width = persisted.width;
            }
            for tab in persisted.tabs {
                let tab_ref = tab.id.decode(tab.container);
                if !seen_tabs.insert(tab_ref) {
                    log::warn!("Dropping duplicate tab {} in {}", tab_ref, panel.id);
                    continue;
                }
                let kind = match tab.kind.as_deref() {
                    Some(name) => TabKind::from_name(name).unwrap_or_else(|| {
                        log::debug!("Unknown tab type {:?}; using {:?}", name, domain.default_tab_kind());
                        domain.default_tab_kind()
                    }),
                    None if tab_ref.is_container() => TabKind::Folder,
                    None => domain.default_tab_kind(),
                };
                panel.tabs.push(Tab {
                    id: tab_ref,
                    title: tab.title,
                    is_dirty: tab.is_dirty,
                    kind,
                    meta: tab.meta,
                });
            }
            panel.active_tab = persisted
                .active_tab_id
                .map(|id| id.decode(persisted.active_tab_container))
                .filter(|active| panel.contains(*active));
            panels.push(panel);
        }

        if panels.is_empty() {
            return None;
        }

        let active_panel = self
            .active_panel_id
            .map(PanelId::new)
            .filter(|id| panels.iter().any(|p| &p.id == id))
            .unwrap_or_else(|| panels[0].id.clone());

        let workspace = Workspace {
            panels,
            active_panel,
        };
        let ids = PanelIdAllocator::for_workspace(&workspace);
        let ui = UiState {
            sidebar_open: self.sidebar.open,
            expanded_folders: self.sidebar.expanded_folder_ids.into_iter().collect(),
        };
        Some(Restored { workspace, ids, ui })
    }
}

// ──────────────────────────────────────────────
// Storage I/O
// ──────────────────────────────────────────────

/// Persist a domain's layout. Failures are logged, never returned.
pub fn save_layout(storage: &mut dyn LayoutStorage, domain: Domain, workspace: &Workspace, ui: &UiState) {
    let layout = PersistedLayout::capture(workspace, ui);
    match serde_json::to_string(&layout) {
        Ok(json) => {
            if let Err(e) = storage.write(domain.storage_key(), &json) {
                log::error!("Failed to write {} layout: {}", domain.as_str(), e);
            }
        }
        Err(e) => {
            log::error!("Failed to serialize {} layout: {}", domain.as_str(), e);
        }
    }
}

/// Load a domain's layout, falling back to a fresh single-panel workspace if
/// nothing usable is stored.
pub fn load_layout(storage: &dyn LayoutStorage, domain: Domain) -> Restored {
    let key = domain.storage_key();
    let data = match storage.read(key) {
        Some(data) => data,
        None => return Restored::fresh(),
    };
    let layout: PersistedLayout = match serde_json::from_str(&data) {
        Ok(layout) => layout,
        Err(e) => {
            log::warn!("Failed to parse stored {} layout: {}", domain.as_str(), e);
            return Restored::fresh();
        }
    };
    match layout.restore(domain) {
        Some(restored) => restored,
        None => {
            log::warn!("Stored {} layout has no panels; starting fresh", domain.as_str());
            Restored::fresh()
        }
    }
}

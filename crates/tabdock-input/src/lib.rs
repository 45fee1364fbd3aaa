// Drag coordinator: turns one pointer gesture on a tab into at most one
// layout operation (reorder, move across panels, or split into a new panel).

mod tests;

use tabdock_core::{PanelId, Rect, TabRef, Vec2};
use tabdock_layout::{LayoutOp, LayoutStore, Tab, Workspace};

/// Pointer travel (px) that turns a press into a drag.
pub const ACTIVATION_DISTANCE: f32 = 5.0;

// ──────────────────────────────────────────────
// Drop zones
// ──────────────────────────────────────────────

/// What a rectangle on screen stands for when something is dropped on it.
#[derive(Debug, Clone, PartialEq)]
pub enum ZoneKind {
    /// A tab in a panel's tab bar, at its position in that bar.
    Tab {
        panel: PanelId,
        tab: TabRef,
        index: usize,
    },
    /// The tab bar of a panel, outside any tab.
    Header { panel: PanelId },
    /// The content area below a panel's tab bar.
    Content { panel: PanelId },
}

impl ZoneKind {
    fn priority(&self) -> u8 {
        match self {
            ZoneKind::Tab { .. } => 0,
            ZoneKind::Header { .. } => 1,
            ZoneKind::Content { .. } => 2,
        }
    }

    pub fn panel(&self) -> &PanelId {
        match self {
            ZoneKind::Tab { panel, .. }
            | ZoneKind::Header { panel }
            | ZoneKind::Content { panel } => panel,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DropZone {
    pub kind: ZoneKind,
    pub rect: Rect,
}

/// Snapshot of every drop zone currently on screen, reported by the renderer.
#[derive(Debug, Clone, Default)]
pub struct DropZones {
    zones: Vec<DropZone>,
}

impl DropZones {
    pub fn new() -> Self {
        Self::default()
    }

    /// Zones for a panel row drawn in `area` with a `tab_bar_height` tall tab
    /// bar and fixed `tab_width` tabs laid out from the left edge of each panel.
    pub fn for_workspace(workspace: &Workspace, area: Rect, tab_bar_height: f32, tab_width: f32) -> Self {
        let mut zones = Self::new();
        for (panel_id, rect) in workspace.column_rects(area) {
            let bar = Rect::new(rect.x, rect.y, rect.width, tab_bar_height.min(rect.height));
            if let Some(panel) = workspace.panel(&panel_id) {
                for (index, tab) in panel.tabs.iter().enumerate() {
                    let x = bar.x + index as f32 * tab_width;
                    if x >= bar.x + bar.width {
                        break;
                    }
                    let w = tab_width.min(bar.x + bar.width - x);
                    zones.add_tab(panel_id.clone(), tab.id, index, Rect::new(x, bar.y, w, bar.height));
                }
            }
            zones.add_header(panel_id.clone(), bar);
            zones.add_content(
                panel_id,
                Rect::new(rect.x, bar.y + bar.height, rect.width, rect.height - bar.height),
            );
        }
        zones
    }

    pub fn add_tab(&mut self, panel: PanelId, tab: TabRef, index: usize, rect: Rect) {
        self.zones.push(DropZone {
            kind: ZoneKind::Tab { panel, tab, index },
            rect,
        });
    }

    pub fn add_header(&mut self, panel: PanelId, rect: Rect) {
        self.zones.push(DropZone {
            kind: ZoneKind::Header { panel },
            rect,
        });
    }

    pub fn add_content(&mut self, panel: PanelId, rect: Rect) {
        self.zones.push(DropZone {
            kind: ZoneKind::Content { panel },
            rect,
        });
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    /// The most specific zone under the pointer: tab, then header, then content.
    pub fn hit(&self, pos: Vec2) -> Option<&DropZone> {
        self.zones
            .iter()
            .filter(|z| z.rect.contains(pos))
            .min_by_key(|z| z.kind.priority())
    }

    /// Fallback collision: the zone overlapping `rect` the most.
    pub fn overlap(&self, rect: Rect) -> Option<&DropZone> {
        let mut best: Option<(f32, &DropZone)> = None;
        for zone in &self.zones {
            let area = zone.rect.intersection_area(&rect);
            if area > 0.0 && best.map_or(true, |(a, _)| area > a) {
                best = Some((area, zone));
            }
        }
        best.map(|(_, zone)| zone)
    }

    /// Resolve a drop: pointer hit first, then overlap with the dragged overlay.
    pub fn resolve(&self, pos: Vec2, overlay: Rect) -> Option<&DropZone> {
        self.hit(pos).or_else(|| self.overlap(overlay))
    }
}

// ──────────────────────────────────────────────
// Drag state machine
// ──────────────────────────────────────────────

/// Transient copy of the dragged tab. Lives only as long as the gesture.
#[derive(Debug, Clone, PartialEq)]
pub struct DragPreview {
    pub source_panel: PanelId,
    pub tab: Tab,
    /// Where the dragged overlay is drawn right now.
    pub overlay: Rect,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DragState {
    Idle,
    Pending {
        panel: PanelId,
        tab: Tab,
        press_pos: Vec2,
        origin: Rect,
    },
    Dragging {
        preview: DragPreview,
        press_pos: Vec2,
        origin: Rect,
        target: Option<ZoneKind>,
    },
}

/// How a gesture ended.
#[derive(Debug, Clone, PartialEq)]
pub enum DragOutcome {
    /// Released before the activation distance: treat as a click on the tab.
    Click { panel: PanelId, tab: TabRef },
    /// Exactly this operation was dispatched and changed the layout.
    Dropped(LayoutOp),
    /// Dropped on a valid zone that implies no change (own header, itself).
    NoOp,
    /// Escape, or released outside every zone.
    Cancelled,
}

pub struct DragCoordinator {
    state: DragState,
    activation_distance: f32,
}

impl DragCoordinator {
    pub fn new() -> Self {
        Self::with_activation_distance(ACTIVATION_DISTANCE)
    }

    pub fn with_activation_distance(distance: f32) -> Self {
        Self {
            state: DragState::Idle,
            activation_distance: distance.max(0.0),
        }
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    pub fn preview(&self) -> Option<&DragPreview> {
        match &self.state {
            DragState::Dragging { preview, .. } => Some(preview),
            _ => None,
        }
    }

    /// Zone the current drag would drop on, for hover feedback.
    pub fn target(&self) -> Option<&ZoneKind> {
        match &self.state {
            DragState::Dragging { target, .. } => target.as_ref(),
            _ => None,
        }
    }

    /// Pointer pressed on `tab` in `panel`. `origin` is the tab's on-screen
    /// rect, used to position the overlay. Returns false if the tab is not in
    /// that panel.
    pub fn press(&mut self, workspace: &Workspace, panel: &PanelId, tab: TabRef, pos: Vec2, origin: Rect) -> bool {
        let tab = match workspace
            .panel(panel)
            .and_then(|p| p.tabs.iter().find(|t| t.id == tab))
        {
            Some(t) => t.clone(),
            None => {
                log::debug!("press on unknown tab {} in {}", tab, panel);
                self.state = DragState::Idle;
                return false;
            }
        };
        self.state = DragState::Pending {
            panel: panel.clone(),
            tab,
            press_pos: pos,
            origin,
        };
        true
    }

    /// Pointer moved. Promotes a pending press to a drag once past the
    /// activation distance, and tracks the hovered zone while dragging.
    pub fn motion(&mut self, pos: Vec2, zones: &DropZones) -> Option<&ZoneKind> {
        let state = std::mem::replace(&mut self.state, DragState::Idle);
        self.state = match state {
            DragState::Pending {
                panel,
                tab,
                press_pos,
                origin,
            } => {
                if pos.distance(press_pos) >= self.activation_distance {
                    let overlay = overlay_at(origin, press_pos, pos);
                    log::debug!("drag started for tab {} from {}", tab.id, panel);
                    DragState::Dragging {
                        preview: DragPreview {
                            source_panel: panel,
                            tab,
                            overlay,
                        },
                        press_pos,
                        origin,
                        target: zones.resolve(pos, overlay).map(|z| z.kind.clone()),
                    }
                } else {
                    DragState::Pending {
                        panel,
                        tab,
                        press_pos,
                        origin,
                    }
                }
            }
            DragState::Dragging {
                mut preview,
                press_pos,
                origin,
                ..
            } => {
                preview.overlay = overlay_at(origin, press_pos, pos);
                let target = zones.resolve(pos, preview.overlay).map(|z| z.kind.clone());
                DragState::Dragging {
                    preview,
                    press_pos,
                    origin,
                    target,
                }
            }
            DragState::Idle => DragState::Idle,
        };
        self.target()
    }

    /// Pointer released. Dispatches at most one operation to `store`.
    pub fn release(&mut self, pos: Vec2, zones: &DropZones, store: &mut LayoutStore) -> DragOutcome {
        match std::mem::replace(&mut self.state, DragState::Idle) {
            DragState::Idle => DragOutcome::Cancelled,
            DragState::Pending { panel, tab, .. } => DragOutcome::Click { panel, tab: tab.id },
            DragState::Dragging {
                mut preview,
                press_pos,
                origin,
                ..
            } => {
                preview.overlay = overlay_at(origin, press_pos, pos);
                let zone = match zones.resolve(pos, preview.overlay) {
                    Some(zone) => zone,
                    None => {
                        log::debug!("tab {} dropped outside every zone", preview.tab.id);
                        return DragOutcome::Cancelled;
                    }
                };
                match drop_operation(store.workspace(), &preview, &zone.kind) {
                    Some(op) => {
                        log::debug!("tab {} dropped on {:?}: {:?}", preview.tab.id, zone.kind, op);
                        if store.dispatch(op.clone()) {
                            DragOutcome::Dropped(op)
                        } else {
                            DragOutcome::NoOp
                        }
                    }
                    None => DragOutcome::NoOp,
                }
            }
        }
    }

    /// Abandon the gesture (Escape). Returns true if one was in progress.
    pub fn cancel(&mut self) -> bool {
        !matches!(std::mem::replace(&mut self.state, DragState::Idle), DragState::Idle)
    }
}

impl Default for DragCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

fn overlay_at(origin: Rect, press_pos: Vec2, pos: Vec2) -> Rect {
    origin.translate(Vec2::new(pos.x - press_pos.x, pos.y - press_pos.y))
}

/// The operation implied by dropping `preview` on `zone`, or `None` when the
/// drop means "leave things as they are".
pub fn drop_operation(workspace: &Workspace, preview: &DragPreview, zone: &ZoneKind) -> Option<LayoutOp> {
    let source = &preview.source_panel;
    let dragged = preview.tab.id;
    match zone {
        ZoneKind::Tab { panel, tab, index } => {
            if *tab == dragged {
                None
            } else if panel == source {
                let from = workspace.panel(source)?.tab_index(dragged)?;
                Some(LayoutOp::ReorderTabs {
                    panel: panel.clone(),
                    from,
                    to: *index,
                })
            } else {
                Some(LayoutOp::MoveTabToPanel {
                    from: source.clone(),
                    to: panel.clone(),
                    tab: dragged,
                    index: Some(*index),
                })
            }
        }
        ZoneKind::Header { panel } if panel == source => None,
        ZoneKind::Header { panel } => Some(LayoutOp::MoveTabToPanel {
            from: source.clone(),
            to: panel.clone(),
            tab: dragged,
            index: None,
        }),
        ZoneKind::Content { panel } => Some(LayoutOp::AddPanelWithTab {
            from: source.clone(),
            tab: dragged,
            target: panel.clone(),
        }),
    }
}

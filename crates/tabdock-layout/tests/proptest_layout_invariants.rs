//! Property-based invariant tests for the layout store.
//!
//! 1. No tab ref is open twice, anywhere in the workspace
//! 2. Every active tab is present in its panel
//! 3. The workspace always keeps at least one panel
//! 4. Reorder permutes a panel's tabs and leaves its active tab alone
//! 5. Cross-panel moves conserve the pair's tab count
//! 6. Resized widths stay above the floor and keep their sum

use proptest::prelude::*;
use tabdock_core::{PanelId, TabKind, TabRef};
use tabdock_layout::{clamp_pair, LayoutOp, LayoutStore, ResizeController, Tab, Workspace, MIN_PANEL_FRACTION};

// ── Strategies ──────────────────────────────────────────────────────────

/// Small ids collide often; the boundary ids sit around the signed range.
fn id_strategy() -> impl Strategy<Value = u64> {
    prop_oneof![
        8 => 0u64..6,
        1 => Just(i64::MAX as u64),
        1 => Just(i64::MAX as u64 + 1),
        1 => Just(u64::MAX),
    ]
}

fn tab_ref_strategy() -> impl Strategy<Value = TabRef> {
    (any::<bool>(), id_strategy()).prop_map(|(container, id)| {
        if container {
            TabRef::Container(id)
        } else {
            TabRef::Item(id)
        }
    })
}

/// Panel arguments are indices into the live workspace; an index past the
/// end names a panel that does not exist.
#[derive(Debug, Clone)]
enum Op {
    AddPanel,
    RemovePanel(usize),
    Focus(usize),
    Widths(usize, f32),
    Open(TabRef),
    Close(TabRef),
    Activate(TabRef),
    Dirty(TabRef, bool),
    Title(TabRef, String),
    Reorder(usize, usize, usize),
    Move(usize, usize, TabRef, Option<usize>),
    Split(usize, TabRef, usize),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    let panel = 0usize..5;
    prop_oneof![
        1 => Just(Op::AddPanel),
        1 => panel.clone().prop_map(Op::RemovePanel),
        1 => panel.clone().prop_map(Op::Focus),
        1 => (panel.clone(), -1.0f32..1.0).prop_map(|(p, d)| Op::Widths(p, d)),
        3 => tab_ref_strategy().prop_map(Op::Open),
        1 => tab_ref_strategy().prop_map(Op::Close),
        1 => tab_ref_strategy().prop_map(Op::Activate),
        1 => (tab_ref_strategy(), any::<bool>()).prop_map(|(t, d)| Op::Dirty(t, d)),
        1 => (tab_ref_strategy(), "[a-z]{0,6}").prop_map(|(t, s)| Op::Title(t, s)),
        1 => (panel.clone(), 0usize..6, 0usize..6).prop_map(|(p, f, t)| Op::Reorder(p, f, t)),
        1 => (panel.clone(), panel.clone(), tab_ref_strategy(), proptest::option::of(0usize..6))
            .prop_map(|(f, t, tab, i)| Op::Move(f, t, tab, i)),
        1 => (panel.clone(), tab_ref_strategy(), panel).prop_map(|(f, tab, t)| Op::Split(f, tab, t)),
    ]
}

fn panel_at(ws: &Workspace, index: usize) -> PanelId {
    ws.panels
        .get(index)
        .map_or_else(|| PanelId::new("panel-404"), |p| p.id.clone())
}

fn tab_for(tab: TabRef) -> Tab {
    match tab {
        TabRef::Item(id) => Tab::item(id, "item", TabKind::Document),
        TabRef::Container(id) => Tab::folder(id, "folder"),
    }
}

/// Turn an index-based op into a store operation against `ws`.
fn resolve(op: &Op, ws: &Workspace) -> LayoutOp {
    match op {
        Op::AddPanel => LayoutOp::AddPanel,
        Op::RemovePanel(p) => LayoutOp::RemovePanel(panel_at(ws, *p)),
        Op::Focus(p) => LayoutOp::SetActivePanel(panel_at(ws, *p)),
        Op::Widths(p, delta) => {
            let left = panel_at(ws, *p);
            let right = panel_at(ws, *p + 1);
            let (lw, rw) = match (ws.panel(&left), ws.panel(&right)) {
                (Some(l), Some(r)) => clamp_pair(l.width, r.width, *delta, MIN_PANEL_FRACTION),
                _ => (1.0, 1.0),
            };
            LayoutOp::SetPanelWidths {
                left,
                right,
                left_width: lw,
                right_width: rw,
            }
        }
        Op::Open(tab) => LayoutOp::OpenTab(tab_for(*tab)),
        Op::Close(tab) => LayoutOp::CloseTab(*tab),
        Op::Activate(tab) => LayoutOp::SetActiveTab(*tab),
        Op::Dirty(tab, dirty) => LayoutOp::SetTabDirty(*tab, *dirty),
        Op::Title(tab, title) => LayoutOp::UpdateTabTitle(*tab, title.clone()),
        Op::Reorder(p, from, to) => LayoutOp::ReorderTabs {
            panel: panel_at(ws, *p),
            from: *from,
            to: *to,
        },
        Op::Move(from, to, tab, index) => LayoutOp::MoveTabToPanel {
            from: panel_at(ws, *from),
            to: panel_at(ws, *to),
            tab: *tab,
            index: *index,
        },
        Op::Split(from, tab, target) => LayoutOp::AddPanelWithTab {
            from: panel_at(ws, *from),
            tab: *tab,
            target: panel_at(ws, *target),
        },
    }
}

fn sorted_refs(ws: &Workspace, panel: &PanelId) -> Vec<TabRef> {
    let mut refs: Vec<TabRef> = ws
        .panel(panel)
        .map(|p| p.tabs.iter().map(|t| t.id).collect())
        .unwrap_or_default();
    refs.sort();
    refs
}

/// Store whose active panel holds `n` document tabs, ids 0..n.
fn store_with_tabs(n: u64) -> LayoutStore {
    let mut store = LayoutStore::new();
    for id in 0..n {
        store.open_tab(Tab::item(id, "doc", TabKind::Document));
    }
    store
}

// ═══════════════════════════════════════════════════════════════════════
// 1–3. Structural invariants under arbitrary operation sequences
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn invariants_hold_after_every_operation(ops in proptest::collection::vec(op_strategy(), 0..80)) {
        let mut store = LayoutStore::new();
        for op in &ops {
            let before = store.state();
            let layout_op = resolve(op, &before);
            store.dispatch(layout_op.clone());
            let after = store.workspace();

            prop_assert!(!after.panels.is_empty());
            if let Err(violation) = after.check_invariants() {
                prop_assert!(false, "{:?} broke the workspace: {}", layout_op, violation);
            }
            let (was, now) = (before.tab_count(), after.tab_count());
            match layout_op {
                LayoutOp::OpenTab(_) | LayoutOp::OpenFolderTab { .. } => prop_assert!(now == was || now == was + 1),
                LayoutOp::CloseTab(_) => prop_assert!(now == was || now + 1 == was),
                _ => prop_assert_eq!(now, was, "{:?}", layout_op),
            }
        }
    }

    #[test]
    fn reopening_never_duplicates(refs in proptest::collection::vec(tab_ref_strategy(), 1..40)) {
        let mut store = LayoutStore::new();
        for tab in &refs {
            store.open_tab(tab_for(*tab));
        }
        let mut distinct = refs.clone();
        distinct.sort();
        distinct.dedup();
        prop_assert_eq!(store.workspace().tab_count(), distinct.len());
        let last = refs[refs.len() - 1];
        let ws = store.workspace();
        prop_assert_eq!(ws.active_panel().and_then(|p| p.active_tab), Some(last));
    }
}

// ═══════════════════════════════════════════════════════════════════════
// 4. Reorder is a permutation
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn reorder_preserves_tabs_and_active(n in 1u64..8, from in 0usize..10, to in 0usize..10) {
        let mut store = store_with_tabs(n);
        let panel = store.workspace().active_panel.clone();
        let before = store.state();
        store.reorder_tabs(&panel, from, to);
        let after = store.workspace();

        prop_assert_eq!(sorted_refs(after, &panel), sorted_refs(&before, &panel));
        prop_assert_eq!(
            after.panel(&panel).and_then(|p| p.active_tab),
            before.panel(&panel).and_then(|p| p.active_tab)
        );
        if from < n as usize {
            let moved = before.panels[0].tabs[from].id;
            let landed = to.min(n as usize - 1);
            prop_assert_eq!(after.panels[0].tabs[landed].id, moved);
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// 5. Moves conserve count
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn move_conserves_pair_count(
        left in 1u64..6,
        right in 0u64..6,
        pick in 0u64..6,
        index in proptest::option::of(0usize..8),
    ) {
        let mut store = store_with_tabs(left);
        store.add_panel();
        for id in 100..100 + right {
            store.open_tab(Tab::item(id, "doc", TabKind::Document));
        }
        let (from, to) = (PanelId::new("panel-1"), PanelId::new("panel-2"));
        let tab = TabRef::Item(pick % left);
        let count = |ws: &Workspace| ws.panel(&from).map_or(0, |p| p.tabs.len()) + ws.panel(&to).map_or(0, |p| p.tabs.len());

        let before = count(store.workspace());
        prop_assert!(store.move_tab_to_panel(&from, &to, tab, index));
        let ws = store.workspace();
        prop_assert_eq!(count(ws), before);
        prop_assert_eq!(ws.panel(&to).and_then(|p| p.active_tab), Some(tab));
        prop_assert_eq!(&ws.active_panel, &to);
    }
}

// ═══════════════════════════════════════════════════════════════════════
// 6. Resize floor and sum
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn clamp_pair_respects_floor_and_sum(
        start_left in 0.05f32..5.0,
        start_right in 0.05f32..5.0,
        delta in -3.0f32..3.0,
    ) {
        let combined = start_left + start_right;
        let floor = combined * MIN_PANEL_FRACTION;
        let (left, right) = clamp_pair(start_left, start_right, delta, MIN_PANEL_FRACTION);
        prop_assert!(left >= floor, "left {} < floor {}", left, floor);
        prop_assert!(right >= floor, "right {} < floor {}", right, floor);
        prop_assert!((left + right - combined).abs() <= combined * 1e-6);
    }

    #[test]
    fn resize_drag_lands_within_bounds(client_x in -2000.0f32..2000.0, container_px in 100.0f32..2000.0) {
        let mut store = LayoutStore::new();
        store.add_panel();
        let (left, right) = (PanelId::new("panel-1"), PanelId::new("panel-2"));
        let mut resize = ResizeController::new();
        prop_assert!(resize.begin(store.workspace(), &left, &right, 0.0, container_px));
        resize.motion(client_x);
        resize.release(&mut store);

        let ws = store.workspace();
        let floor = 2.0 * MIN_PANEL_FRACTION;
        let (lw, rw) = (ws.panels[0].width, ws.panels[1].width);
        prop_assert!(lw >= floor && rw >= floor, "{} / {}", lw, rw);
        prop_assert!((lw + rw - 2.0).abs() <= 2.0 * 1e-6);
    }
}

#[cfg(test)]
mod tests {
    use crate::{drop_operation, DragCoordinator, DragOutcome, DragState, DropZones, ZoneKind};
    use tabdock_core::{PanelId, Rect, TabKind, TabRef, Vec2};
    use tabdock_layout::{LayoutOp, LayoutStore, Tab};

    const AREA: Rect = Rect {
        x: 0.0,
        y: 0.0,
        width: 800.0,
        height: 600.0,
    };
    const BAR: f32 = 30.0;
    const TAB_W: f32 = 100.0;

    fn p(id: &str) -> PanelId {
        PanelId::new(id)
    }

    /// panel-1 (x 0..400) holds tabs 1, 2, 3; panel-2 (x 400..800) holds 10, 11.
    fn store() -> LayoutStore {
        let mut store = LayoutStore::new();
        for id in 1..=3 {
            store.open_tab(Tab::item(id, format!("doc {id}"), TabKind::Document));
        }
        store.add_panel();
        for id in 10..=11 {
            store.open_tab(Tab::item(id, format!("doc {id}"), TabKind::Document));
        }
        store
    }

    fn zones(store: &LayoutStore) -> DropZones {
        DropZones::for_workspace(store.workspace(), AREA, BAR, TAB_W)
    }

    fn tab_rect(panel_x: f32, index: usize) -> Rect {
        Rect::new(panel_x + index as f32 * TAB_W, 0.0, TAB_W, BAR)
    }

    /// Press on tab `index` of the panel at `panel_x`, then drag to `to`.
    fn drag(
        coordinator: &mut DragCoordinator,
        store: &LayoutStore,
        panel: &str,
        tab: u64,
        panel_x: f32,
        index: usize,
        to: Vec2,
    ) {
        let origin = tab_rect(panel_x, index);
        let press = Vec2::new(origin.x + 50.0, 15.0);
        assert!(coordinator.press(store.workspace(), &p(panel), TabRef::Item(tab), press, origin));
        coordinator.motion(to, &zones(store));
    }

    // ── Activation threshold ────────────────────

    #[test]
    fn small_motion_stays_a_click() {
        let mut store = store();
        let mut dc = DragCoordinator::new();
        let zones = zones(&store);
        dc.press(store.workspace(), &p("panel-1"), TabRef::Item(2), Vec2::new(150.0, 15.0), tab_rect(0.0, 1));
        dc.motion(Vec2::new(153.0, 17.0), &zones);
        assert!(!dc.is_dragging());
        assert!(dc.preview().is_none());

        let before = store.state();
        let outcome = dc.release(Vec2::new(153.0, 17.0), &zones, &mut store);
        assert_eq!(
            outcome,
            DragOutcome::Click {
                panel: p("panel-1"),
                tab: TabRef::Item(2)
            }
        );
        assert!(std::rc::Rc::ptr_eq(&before, &store.state()));
    }

    #[test]
    fn motion_past_threshold_starts_drag_without_mutation() {
        let store = store();
        let before = store.state();
        let mut dc = DragCoordinator::new();
        drag(&mut dc, &store, "panel-1", 1, 0.0, 0, Vec2::new(50.0, 200.0));
        assert!(dc.is_dragging());
        let preview = dc.preview().unwrap();
        assert_eq!(preview.tab.id, TabRef::Item(1));
        assert_eq!(preview.source_panel, p("panel-1"));
        assert!(std::rc::Rc::ptr_eq(&before, &store.state()));
        assert_eq!(dc.target(), Some(&ZoneKind::Content { panel: p("panel-1") }));
    }

    #[test]
    fn press_on_unknown_tab_is_ignored() {
        let store = store();
        let mut dc = DragCoordinator::new();
        assert!(!dc.press(store.workspace(), &p("panel-1"), TabRef::Item(10), Vec2::new(0.0, 0.0), AREA));
        assert_eq!(*dc.state(), DragState::Idle);
    }

    // ── Drop resolution ─────────────────────────

    #[test]
    fn drop_on_tab_in_same_panel_reorders() {
        let mut store = store();
        let mut dc = DragCoordinator::new();
        let target = Vec2::new(250.0, 15.0);
        drag(&mut dc, &store, "panel-1", 1, 0.0, 0, target);
        let outcome = dc.release(target, &zones(&store), &mut store);
        assert_eq!(
            outcome,
            DragOutcome::Dropped(LayoutOp::ReorderTabs {
                panel: p("panel-1"),
                from: 0,
                to: 2
            })
        );
        let tabs: Vec<_> = store.workspace().panels[0].tabs.iter().map(|t| t.id).collect();
        assert_eq!(tabs, vec![TabRef::Item(2), TabRef::Item(3), TabRef::Item(1)]);
        assert!(!dc.is_dragging());
    }

    #[test]
    fn drop_on_tab_in_other_panel_moves_to_its_index() {
        let mut store = store();
        let mut dc = DragCoordinator::new();
        let target = Vec2::new(450.0, 15.0);
        drag(&mut dc, &store, "panel-1", 2, 0.0, 1, target);
        let outcome = dc.release(target, &zones(&store), &mut store);
        assert!(matches!(
            outcome,
            DragOutcome::Dropped(LayoutOp::MoveTabToPanel { index: Some(0), .. })
        ));
        let ws = store.workspace();
        let right: Vec<_> = ws.panels[1].tabs.iter().map(|t| t.id).collect();
        assert_eq!(right, vec![TabRef::Item(2), TabRef::Item(10), TabRef::Item(11)]);
        assert_eq!(ws.active_panel, p("panel-2"));
        assert_eq!(ws.panels[1].active_tab, Some(TabRef::Item(2)));
    }

    #[test]
    fn drop_on_other_header_appends() {
        let mut store = store();
        let mut dc = DragCoordinator::new();
        let target = Vec2::new(750.0, 15.0);
        drag(&mut dc, &store, "panel-1", 3, 0.0, 2, target);
        let outcome = dc.release(target, &zones(&store), &mut store);
        assert!(matches!(
            outcome,
            DragOutcome::Dropped(LayoutOp::MoveTabToPanel { index: None, .. })
        ));
        let right: Vec<_> = store.workspace().panels[1].tabs.iter().map(|t| t.id).collect();
        assert_eq!(right, vec![TabRef::Item(10), TabRef::Item(11), TabRef::Item(3)]);
    }

    #[test]
    fn drop_on_own_header_is_noop() {
        let mut store = store();
        let before = store.state();
        let mut dc = DragCoordinator::new();
        let target = Vec2::new(350.0, 15.0);
        drag(&mut dc, &store, "panel-1", 1, 0.0, 0, target);
        assert_eq!(dc.release(target, &zones(&store), &mut store), DragOutcome::NoOp);
        assert!(std::rc::Rc::ptr_eq(&before, &store.state()));
    }

    #[test]
    fn drop_on_itself_is_noop() {
        let mut store = store();
        let mut dc = DragCoordinator::new();
        let target = Vec2::new(40.0, 10.0);
        drag(&mut dc, &store, "panel-1", 1, 0.0, 0, Vec2::new(80.0, 15.0));
        assert_eq!(dc.release(target, &zones(&store), &mut store), DragOutcome::NoOp);
    }

    #[test]
    fn drop_on_content_splits_after_target() {
        let mut store = store();
        let mut dc = DragCoordinator::new();
        let target = Vec2::new(600.0, 300.0);
        drag(&mut dc, &store, "panel-1", 1, 0.0, 0, target);
        let outcome = dc.release(target, &zones(&store), &mut store);
        assert_eq!(
            outcome,
            DragOutcome::Dropped(LayoutOp::AddPanelWithTab {
                from: p("panel-1"),
                tab: TabRef::Item(1),
                target: p("panel-2"),
            })
        );
        let ws = store.workspace();
        let order: Vec<_> = ws.panels.iter().map(|p| p.id.to_string()).collect();
        assert_eq!(order, vec!["panel-1", "panel-2", "panel-3"]);
        assert_eq!(ws.active_panel, p("panel-3"));
    }

    #[test]
    fn drop_outside_zones_falls_back_to_overlap() {
        let mut store = store();
        let mut dc = DragCoordinator::new();
        // Pointer just below the area; the overlay (tab-sized, following the
        // pointer) still overlaps the bottom of panel-2's content.
        let origin = tab_rect(0.0, 0);
        dc.press(store.workspace(), &p("panel-1"), TabRef::Item(1), Vec2::new(50.0, 25.0), origin);
        let target = Vec2::new(600.0, 605.0);
        let zones = zones(&store);
        dc.motion(target, &zones);
        assert_eq!(dc.target(), Some(&ZoneKind::Content { panel: p("panel-2") }));
        let outcome = dc.release(target, &zones, &mut store);
        assert!(matches!(outcome, DragOutcome::Dropped(LayoutOp::AddPanelWithTab { .. })));
    }

    #[test]
    fn drop_far_away_cancels() {
        let mut store = store();
        let before = store.state();
        let mut dc = DragCoordinator::new();
        let target = Vec2::new(2000.0, 2000.0);
        drag(&mut dc, &store, "panel-1", 1, 0.0, 0, target);
        assert_eq!(dc.target(), None);
        assert_eq!(dc.release(target, &zones(&store), &mut store), DragOutcome::Cancelled);
        assert!(std::rc::Rc::ptr_eq(&before, &store.state()));
    }

    #[test]
    fn escape_cancels_and_clears_preview() {
        let store = store();
        let mut dc = DragCoordinator::new();
        drag(&mut dc, &store, "panel-1", 1, 0.0, 0, Vec2::new(600.0, 300.0));
        assert!(dc.cancel());
        assert!(dc.preview().is_none());
        assert!(!dc.cancel());
    }

    #[test]
    fn stale_payload_is_harmless() {
        let mut store = store();
        let mut dc = DragCoordinator::new();
        let target = Vec2::new(600.0, 300.0);
        drag(&mut dc, &store, "panel-1", 1, 0.0, 0, target);
        // The tab is closed by someone else mid-drag.
        store.set_active_panel(&p("panel-1"));
        store.close_tab(TabRef::Item(1));
        let before = store.state();
        assert_eq!(dc.release(target, &zones(&store), &mut store), DragOutcome::NoOp);
        assert!(std::rc::Rc::ptr_eq(&before, &store.state()));
    }

    // ── Zone priority ───────────────────────────

    #[test]
    fn tab_beats_header_beats_content() {
        let mut zones = DropZones::new();
        let panel = p("panel-1");
        zones.add_content(panel.clone(), Rect::new(0.0, 0.0, 100.0, 100.0));
        zones.add_header(panel.clone(), Rect::new(0.0, 0.0, 100.0, 20.0));
        zones.add_tab(panel.clone(), TabRef::Item(1), 0, Rect::new(0.0, 0.0, 40.0, 20.0));

        let kind = |pos| zones.hit(pos).map(|z| z.kind.clone());
        assert!(matches!(kind(Vec2::new(10.0, 10.0)), Some(ZoneKind::Tab { .. })));
        assert!(matches!(kind(Vec2::new(60.0, 10.0)), Some(ZoneKind::Header { .. })));
        assert!(matches!(kind(Vec2::new(60.0, 60.0)), Some(ZoneKind::Content { .. })));
        assert_eq!(kind(Vec2::new(160.0, 60.0)), None);
    }

    #[test]
    fn drop_operation_for_stale_reorder_source() {
        let store = store();
        let preview = crate::DragPreview {
            source_panel: p("panel-1"),
            tab: Tab::item(99, "gone", TabKind::Document),
            overlay: AREA,
        };
        let zone = ZoneKind::Tab {
            panel: p("panel-1"),
            tab: TabRef::Item(2),
            index: 1,
        };
        assert_eq!(drop_operation(store.workspace(), &preview, &zone), None);
    }
}

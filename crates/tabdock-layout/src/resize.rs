use tabdock_core::{PanelId, Rect, Vec2};

use crate::{LayoutStore, Workspace};

/// Smallest share of the pair's combined width either panel may shrink to.
pub const MIN_PANEL_FRACTION: f32 = 0.15;

/// Handle hit-test threshold in pixels.
pub const HANDLE_HIT_THRESHOLD: f32 = 8.0;

/// Redistribute two adjacent widths after the handle between them moved by
/// `delta_ratio` of the container. The pair's sum is preserved and neither
/// side ends up below `min_fraction` of it.
pub fn clamp_pair(start_left: f32, start_right: f32, delta_ratio: f32, min_fraction: f32) -> (f32, f32) {
    let combined = start_left + start_right;
    let floor = combined * min_fraction;
    let mut left = start_left + delta_ratio * combined;
    if !left.is_finite() {
        left = start_left;
    }
    // A clamped side takes `floor` exactly, never `combined - (combined - floor)`.
    if left <= floor {
        return (floor, combined - floor);
    }
    let right = combined - left;
    if right <= floor {
        return (combined - floor, floor);
    }
    (left, right)
}

// ──────────────────────────────────────────────
// ResizeController
// ──────────────────────────────────────────────

struct ResizeSession {
    left: PanelId,
    right: PanelId,
    start_x: f32,
    container_px: f32,
    start_left: f32,
    start_right: f32,
    /// Last computed pair not yet handed to the store.
    pending: Option<(f32, f32)>,
}

/// Drives one handle drag at a time. Motion only computes; widths reach the
/// store on `frame` (once per animation frame) or `release`.
pub struct ResizeController {
    min_fraction: f32,
    session: Option<ResizeSession>,
}

impl ResizeController {
    pub fn new() -> Self {
        Self::with_min_fraction(MIN_PANEL_FRACTION)
    }

    /// Fractions above one half would leave no valid width, so they are capped.
    pub fn with_min_fraction(min_fraction: f32) -> Self {
        let min_fraction = if min_fraction.is_finite() {
            min_fraction.clamp(0.0, 0.5)
        } else {
            MIN_PANEL_FRACTION
        };
        Self {
            min_fraction,
            session: None,
        }
    }

    pub fn min_fraction(&self) -> f32 {
        self.min_fraction
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    /// The two panels around the active handle, if a drag is in progress.
    pub fn panels(&self) -> Option<(&PanelId, &PanelId)> {
        self.session.as_ref().map(|s| (&s.left, &s.right))
    }

    /// Start dragging the handle between `left` and the panel right after it.
    /// Returns false (and starts nothing) if they are not adjacent in that order.
    pub fn begin(
        &mut self,
        workspace: &Workspace,
        left: &PanelId,
        right: &PanelId,
        start_x: f32,
        container_px: f32,
    ) -> bool {
        let li = match workspace.panel_index(left) {
            Some(i) => i,
            None => return false,
        };
        let r = match workspace.panels.get(li + 1) {
            Some(p) if &p.id == right => p,
            _ => return false,
        };
        let l = &workspace.panels[li];
        if l.width + r.width <= 0.0 {
            return false;
        }
        self.session = Some(ResizeSession {
            left: l.id.clone(),
            right: r.id.clone(),
            start_x,
            container_px,
            start_left: l.width,
            start_right: r.width,
            pending: None,
        });
        true
    }

    /// Start a drag on whichever handle lies within `HANDLE_HIT_THRESHOLD` of
    /// `position`, given the pixel area the panel row occupies.
    pub fn begin_at(&mut self, workspace: &Workspace, area: Rect, position: Vec2) -> bool {
        if position.y < area.y || position.y > area.y + area.height {
            return false;
        }
        let columns = workspace.column_rects(area);
        let mut best: Option<(f32, usize)> = None;
        for (i, (_, rect)) in columns.iter().enumerate().skip(1) {
            let dist = (position.x - rect.x).abs();
            if dist <= HANDLE_HIT_THRESHOLD && best.map_or(true, |(d, _)| dist < d) {
                best = Some((dist, i));
            }
        }
        match best {
            Some((_, i)) => {
                let left = columns[i - 1].0.clone();
                let right = columns[i].0.clone();
                self.begin(workspace, &left, &right, position.x, area.width)
            }
            None => false,
        }
    }

    /// Recompute the pair for the pointer at `client_x`. Nothing is applied yet.
    pub fn motion(&mut self, client_x: f32) -> Option<(f32, f32)> {
        let min_fraction = self.min_fraction;
        let session = self.session.as_mut()?;
        if !(session.container_px > 0.0) {
            return None;
        }
        let delta_ratio = (client_x - session.start_x) / session.container_px;
        let pair = clamp_pair(session.start_left, session.start_right, delta_ratio, min_fraction);
        session.pending = Some(pair);
        Some(pair)
    }

    /// Animation frame tick: apply the latest pending pair, if any.
    pub fn frame(&mut self, store: &mut LayoutStore) -> bool {
        match self.session.as_mut() {
            Some(session) => Self::flush(session, store),
            None => false,
        }
    }

    /// End the drag, committing the last computed pair if a frame has not
    /// already done so. A press without motion changes nothing.
    pub fn release(&mut self, store: &mut LayoutStore) -> bool {
        match self.session.take() {
            Some(mut session) => Self::flush(&mut session, store),
            None => false,
        }
    }

    pub fn cancel(&mut self) {
        self.session = None;
    }

    fn flush(session: &mut ResizeSession, store: &mut LayoutStore) -> bool {
        match session.pending.take() {
            Some((left_width, right_width)) => {
                store.set_panel_widths(&session.left, &session.right, left_width, right_width)
            }
            None => false,
        }
    }
}

impl Default for ResizeController {
    fn default() -> Self {
        Self::new()
    }
}

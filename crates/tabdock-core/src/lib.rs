use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

// ──────────────────────────────────────────────
// Geometry
// ──────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.x
            && point.x <= self.x + self.width
            && point.y >= self.y
            && point.y <= self.y + self.height
    }

    /// Return a copy moved by `delta`.
    pub fn translate(&self, delta: Vec2) -> Self {
        Self::new(self.x + delta.x, self.y + delta.y, self.width, self.height)
    }

    /// Area of the overlap between two rects (0.0 when disjoint).
    pub fn intersection_area(&self, other: &Rect) -> f32 {
        let w = (self.x + self.width).min(other.x + other.width) - self.x.max(other.x);
        let h = (self.y + self.height).min(other.y + other.height) - self.y.max(other.y);
        if w <= 0.0 || h <= 0.0 {
            0.0
        } else {
            w * h
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: Vec2) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

// ──────────────────────────────────────────────
// Identity
// ──────────────────────────────────────────────

const PANEL_ID_PREFIX: &str = "panel-";

/// Identifier of a panel column, e.g. `panel-3`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PanelId(String);

impl PanelId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Build the id produced by the allocator for sequence number `seq`.
    pub fn from_seq(seq: u64) -> Self {
        Self(format!("{PANEL_ID_PREFIX}{seq}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Trailing decimal digits of the id, if any. `panel-12` → 12.
    pub fn numeric_suffix(&self) -> Option<u64> {
        let digits_at = self
            .0
            .rfind(|c: char| !c.is_ascii_digit())
            .map_or(0, |i| i + 1);
        self.0[digits_at..].parse().ok()
    }
}

impl fmt::Display for PanelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PanelId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Reference to the thing a tab shows. Items (documents, chat rooms) and
/// containers (folders) live in separate id spaces, so `Item(5)` and
/// `Container(5)` may be open at the same time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TabRef {
    Item(u64),
    Container(u64),
}

impl TabRef {
    pub fn raw_id(&self) -> u64 {
        match self {
            TabRef::Item(id) | TabRef::Container(id) => *id,
        }
    }

    pub fn is_container(&self) -> bool {
        matches!(self, TabRef::Container(_))
    }
}

impl fmt::Display for TabRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TabRef::Item(id) => write!(f, "{id}"),
            TabRef::Container(id) => write!(f, "f{id}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseTabRefError(String);

impl fmt::Display for ParseTabRefError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid tab reference: {:?}", self.0)
    }
}

impl std::error::Error for ParseTabRefError {}

/// Parses `7` as an item and `f7` as a container.
impl FromStr for TabRef {
    type Err = ParseTabRefError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseTabRefError(s.to_string());
        match s.strip_prefix('f') {
            Some(rest) => rest.parse().map(TabRef::Container).map_err(|_| err()),
            None => s.parse().map(TabRef::Item).map_err(|_| err()),
        }
    }
}

// ──────────────────────────────────────────────
// Tab kinds and workspace domains
// ──────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TabKind {
    Document,
    Folder,
    Room,
}

impl TabKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TabKind::Document => "document",
            TabKind::Folder => "folder",
            TabKind::Room => "room",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "document" => Some(TabKind::Document),
            "folder" => Some(TabKind::Folder),
            "room" => Some(TabKind::Room),
            _ => None,
        }
    }
}

/// The two workspaces that share the docking engine. Each keeps its own
/// persisted layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Domain {
    Chat,
    Documents,
}

impl Domain {
    pub fn as_str(self) -> &'static str {
        match self {
            Domain::Chat => "chat",
            Domain::Documents => "documents",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "chat" => Some(Domain::Chat),
            "documents" | "docs" => Some(Domain::Documents),
            _ => None,
        }
    }

    /// Storage key of this domain's persisted layout.
    pub fn storage_key(self) -> &'static str {
        match self {
            Domain::Chat => "chat-layout",
            Domain::Documents => "documents-layout",
        }
    }

    /// Kind assigned to persisted tabs that were saved without one.
    pub fn default_tab_kind(self) -> TabKind {
        match self {
            Domain::Chat => TabKind::Room,
            Domain::Documents => TabKind::Document,
        }
    }
}

// ──────────────────────────────────────────────
// IdSet
// ──────────────────────────────────────────────

/// Set of numeric ids (expanded folders and the like). Iteration is in
/// ascending order; insertion order is not kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdSet(BTreeSet<u64>);

impl IdSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: u64) -> bool {
        self.0.contains(&id)
    }

    /// Returns true if the id was not already present.
    pub fn insert(&mut self, id: u64) -> bool {
        self.0.insert(id)
    }

    /// Returns true if the id was present.
    pub fn remove(&mut self, id: u64) -> bool {
        self.0.remove(&id)
    }

    /// Insert if absent, remove if present. Returns the new membership.
    pub fn toggle(&mut self, id: u64) -> bool {
        if self.0.remove(&id) {
            false
        } else {
            self.0.insert(id);
            true
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = u64> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<u64> for IdSet {
    fn from_iter<I: IntoIterator<Item = u64>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn panel_id_suffix() {
        assert_eq!(PanelId::from_seq(12).numeric_suffix(), Some(12));
        assert_eq!(PanelId::new("panel-x").numeric_suffix(), None);
        assert_eq!(PanelId::new("7").numeric_suffix(), Some(7));
        assert_eq!(PanelId::new("left-panel-03").numeric_suffix(), Some(3));
    }

    #[test]
    fn tab_ref_parse_and_display() {
        assert_eq!("5".parse::<TabRef>(), Ok(TabRef::Item(5)));
        assert_eq!("f5".parse::<TabRef>(), Ok(TabRef::Container(5)));
        assert!("fx".parse::<TabRef>().is_err());
        assert!("-3".parse::<TabRef>().is_err());
        assert_eq!(TabRef::Container(9).to_string(), "f9");
        assert_ne!(TabRef::Item(5), TabRef::Container(5));
    }

    #[test]
    fn rect_intersection() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(5.0, 5.0, 10.0, 10.0);
        assert_eq!(a.intersection_area(&b), 25.0);
        let c = Rect::new(20.0, 0.0, 5.0, 5.0);
        assert_eq!(a.intersection_area(&c), 0.0);
    }

    #[test]
    fn id_set_membership() {
        let mut set = IdSet::new();
        assert!(set.insert(3));
        assert!(!set.insert(3));
        assert!(set.contains(3));
        assert!(!set.toggle(3));
        assert!(set.is_empty());
        assert!(set.toggle(4));
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![4]);
    }
}

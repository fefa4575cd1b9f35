//! Mystery tiles: stand-ins for tiles whose content pack is not loaded.
//!
//! Every distinct missing identity is interned once per loaded world. The cell keeps
//! the placeholder runtime type and a frame that encodes the identity's index, so the
//! identity can be written back verbatim on the next save.

use indexmap::IndexSet;

use super::directory::RemapTable;
use crate::content::ContentRef;

/// Frames carry up to 15 bits each
const FRAME_SPAN: u32 = 0x8000;

/// Largest id a [`PlaceholderFrame`] can hold
pub const MAX_PLACEHOLDER_ID: u32 = FRAME_SPAN * FRAME_SPAN - 1;

/// What a placeholder cell stands for
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PlaceholderIdentity {
    pub content: ContentRef,
    /// Original frame, present only for frame-important tiles
    pub frame: Option<(i16, i16)>,
}

impl PlaceholderIdentity {
    pub fn new(content: ContentRef) -> Self {
        Self { content, frame: None }
    }

    pub fn with_frame(content: ContentRef, frame_x: i16, frame_y: i16) -> Self {
        Self {
            content,
            frame: Some((frame_x, frame_y)),
        }
    }

    pub fn frame_important(&self) -> bool {
        self.frame.is_some()
    }
}

/// Placeholder id packed into a cell's frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlaceholderFrame(u32);

impl PlaceholderFrame {
    pub fn new(id: u32) -> Option<Self> {
        (id <= MAX_PLACEHOLDER_ID).then_some(Self(id))
    }

    pub fn id(self) -> u32 {
        self.0
    }

    pub fn frame_x(self) -> i16 {
        (self.0 % FRAME_SPAN) as i16
    }

    pub fn frame_y(self) -> i16 {
        (self.0 / FRAME_SPAN) as i16
    }

    pub fn from_frame(frame_x: i16, frame_y: i16) -> Option<Self> {
        if frame_x < 0 || frame_y < 0 {
            return None;
        }
        Some(Self(frame_y as u32 * FRAME_SPAN + frame_x as u32))
    }
}

/// Per-world list of missing identities. Clear it when the world unloads.
#[derive(Debug, Clone, Default)]
pub struct PlaceholderRegistry {
    pending: IndexSet<PlaceholderIdentity>,
}

impl PlaceholderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild the list from identities the caller stored alongside the world.
    ///
    /// Returns `None` if the list repeats an identity, since every later index and
    /// every placeholder frame pointing at it would shift.
    pub fn from_identities(identities: impl IntoIterator<Item = PlaceholderIdentity>) -> Option<Self> {
        let mut pending = IndexSet::new();
        for identity in identities {
            if !pending.insert(identity) {
                return None;
            }
        }
        Some(Self { pending })
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &PlaceholderIdentity> {
        self.pending.iter()
    }

    pub fn get(&self, id: u32) -> Option<&PlaceholderIdentity> {
        self.pending.get_index(id as usize)
    }

    /// Identity behind a placeholder cell's frame
    pub fn identity_at(&self, frame_x: i16, frame_y: i16) -> Option<&PlaceholderIdentity> {
        self.get(PlaceholderFrame::from_frame(frame_x, frame_y)?.id())
    }

    /// Index of `identity`, appending it if unseen. `None` once the frame id space is full.
    pub fn intern(&mut self, identity: PlaceholderIdentity) -> Option<PlaceholderFrame> {
        if let Some(idx) = self.pending.get_index_of(&identity) {
            return PlaceholderFrame::new(idx as u32);
        }
        if self.pending.len() as u64 > u64::from(MAX_PLACEHOLDER_ID) {
            return None;
        }
        let (idx, _) = self.pending.insert_full(identity);
        PlaceholderFrame::new(idx as u32)
    }

    /// Placeholder frame for a decoded tile, or `None` when `saved_id` resolved normally.
    ///
    /// `frame_x`/`frame_y` are the frames just read from the record. They become part
    /// of the identity when the saved entry is frame-important.
    pub fn resolve(
        &mut self,
        saved_id: u16,
        remap: &RemapTable,
        frame_x: i16,
        frame_y: i16,
    ) -> Option<PlaceholderFrame> {
        let content = remap.unresolved(saved_id)?.clone();
        let identity = if remap.frame_important(saved_id) {
            PlaceholderIdentity::with_frame(content, frame_x, frame_y)
        } else {
            PlaceholderIdentity::new(content)
        };
        let frame = self.intern(identity);
        if frame.is_none() {
            tracing::warn!(saved_id, "placeholder id space exhausted");
        }
        frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_encoding_reversible() {
        for id in [0, 1, 17, FRAME_SPAN - 1, FRAME_SPAN, FRAME_SPAN * 3 + 5, MAX_PLACEHOLDER_ID] {
            let frame = PlaceholderFrame::new(id).unwrap();
            assert!(frame.frame_x() >= 0 && frame.frame_y() >= 0);
            assert_eq!(PlaceholderFrame::from_frame(frame.frame_x(), frame.frame_y()), Some(frame));
        }
        assert_eq!(PlaceholderFrame::new(MAX_PLACEHOLDER_ID + 1), None);
        assert_eq!(PlaceholderFrame::from_frame(-1, 0), None);
    }

    #[test]
    fn test_intern_dedupes_by_value() {
        let mut registry = PlaceholderRegistry::new();
        let ore = PlaceholderIdentity::new(ContentRef::new("Foo", "Ore"));
        let a = registry.intern(ore.clone()).unwrap();
        let b = registry.intern(PlaceholderIdentity::new(ContentRef::new("Foo", "Bar"))).unwrap();
        let c = registry.intern(ore.clone()).unwrap();

        assert_eq!(a, c);
        assert_ne!(a, b);
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.identity_at(a.frame_x(), a.frame_y()), Some(&ore));
    }

    #[test]
    fn test_frame_is_part_of_identity() {
        let mut registry = PlaceholderRegistry::new();
        let content = ContentRef::new("Foo", "Torch");
        let left = registry.intern(PlaceholderIdentity::with_frame(content.clone(), 0, 0));
        let right = registry.intern(PlaceholderIdentity::with_frame(content.clone(), 18, 0));
        let plain = registry.intern(PlaceholderIdentity::new(content));

        assert_ne!(left, right);
        assert_ne!(left, plain);
        assert_eq!(registry.len(), 3);

        registry.clear();
        assert!(registry.is_empty());
    }

    #[test]
    fn test_from_identities_rejects_repeats() {
        let ore = PlaceholderIdentity::new(ContentRef::new("Foo", "Ore"));
        let torch = PlaceholderIdentity::with_frame(ContentRef::new("Foo", "Torch"), 18, 0);

        let rebuilt = PlaceholderRegistry::from_identities([ore.clone(), torch.clone()]).unwrap();
        assert_eq!(rebuilt.get(0), Some(&ore));
        assert_eq!(rebuilt.get(1), Some(&torch));

        assert!(PlaceholderRegistry::from_identities([ore.clone(), torch, ore]).is_none());
    }
}

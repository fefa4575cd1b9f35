use std::fmt;

use serde::{Deserialize, Serialize};

use super::limits::VanillaLimits;

/// A piece of content named by its owning pack
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ContentRef {
    pub pack: String,
    pub name: String,
}

impl ContentRef {
    pub fn new(pack: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            pack: pack.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for ContentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.pack, self.name)
    }
}

/// Armor category shown on a mannequin row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum EquipCategory {
    Head = 0,
    Body = 1,
    Legs = 2,
}

impl EquipCategory {
    pub const ALL: [EquipCategory; 3] = [Self::Head, Self::Body, Self::Legs];

    pub fn from_u8(v: u8) -> Option<Self> {
        match v {
            0 => Some(Self::Head),
            1 => Some(Self::Body),
            2 => Some(Self::Legs),
            _ => None,
        }
    }
}

/// What the codec needs to know about currently loaded content.
///
/// Forward lookups run on load, reverse lookups on save. `None` from a forward
/// lookup means the pack or the content inside it is not loaded.
pub trait ContentRegistry {
    fn limits(&self) -> &VanillaLimits;

    fn resolve_tile(&self, content: &ContentRef) -> Option<u16>;
    fn resolve_wall(&self, content: &ContentRef) -> Option<u16>;
    fn resolve_equip_slot(&self, category: EquipCategory, content: &ContentRef) -> Option<u16>;

    fn tile_content(&self, tile_type: u16) -> Option<ContentRef>;
    fn wall_content(&self, wall: u16) -> Option<ContentRef>;
    fn equip_content(&self, category: EquipCategory, slot: u16) -> Option<ContentRef>;

    fn tile_frame_important(&self, tile_type: u16) -> bool;

    /// Runtime type standing in for tiles whose pack is missing
    fn placeholder_tile(&self) -> u16;

    fn is_mannequin(&self, tile_type: u16) -> bool;
}

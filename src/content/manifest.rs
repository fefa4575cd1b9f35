//! In-memory registry and the JSON manifest it can be built from.

use ahash::{AHashMap, AHashSet};
use serde::{Deserialize, Serialize};

use super::limits::VanillaLimits;
use super::registry::{ContentRef, ContentRegistry, EquipCategory};

/// Pack that owns the placeholder tile
pub const BUILTIN_PACK: &str = "builtin";
/// Content name of the placeholder tile
pub const PLACEHOLDER_NAME: &str = "MysteryTile";

/// Mannequin and womannequin
fn default_mannequins() -> Vec<u16> {
    vec![128, 269]
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegistryManifest {
    #[serde(default)]
    pub limits: VanillaLimits,
    #[serde(default = "default_mannequins")]
    pub mannequin_tiles: Vec<u16>,
    /// Built-in tile ids whose frame is part of their identity
    #[serde(default)]
    pub frame_important_tiles: Vec<u16>,
    #[serde(default)]
    pub packs: Vec<PackManifest>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PackManifest {
    pub name: String,
    #[serde(default)]
    pub tiles: Vec<TileManifest>,
    #[serde(default)]
    pub walls: Vec<String>,
    #[serde(default)]
    pub equips: EquipManifest,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TileManifest {
    pub name: String,
    #[serde(default)]
    pub frame_important: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EquipManifest {
    #[serde(default)]
    pub head: Vec<String>,
    #[serde(default)]
    pub body: Vec<String>,
    #[serde(default)]
    pub legs: Vec<String>,
}

impl EquipManifest {
    fn names(&self, category: EquipCategory) -> &[String] {
        match category {
            EquipCategory::Head => &self.head,
            EquipCategory::Body => &self.body,
            EquipCategory::Legs => &self.legs,
        }
    }
}

/// Registry with runtime ids handed out in registration order.
///
/// Foreign ids start at the matching [`VanillaLimits`] count. The placeholder tile is
/// always the first foreign tile.
#[derive(Debug, Clone)]
pub struct StaticRegistry {
    limits: VanillaLimits,
    tiles: Vec<ContentRef>,
    tile_ids: AHashMap<ContentRef, u16>,
    walls: Vec<ContentRef>,
    wall_ids: AHashMap<ContentRef, u16>,
    equips: [Vec<ContentRef>; 3],
    equip_ids: [AHashMap<ContentRef, u16>; 3],
    frame_important: AHashSet<u16>,
    mannequins: AHashSet<u16>,
    placeholder: u16,
}

impl StaticRegistry {
    pub fn new(limits: VanillaLimits) -> Self {
        let mut registry = Self {
            limits,
            tiles: Vec::new(),
            tile_ids: AHashMap::new(),
            walls: Vec::new(),
            wall_ids: AHashMap::new(),
            equips: Default::default(),
            equip_ids: Default::default(),
            frame_important: AHashSet::new(),
            mannequins: default_mannequins().into_iter().collect(),
            placeholder: limits.tile_count,
        };
        registry.placeholder = registry.add_tile(BUILTIN_PACK, PLACEHOLDER_NAME, true);
        registry
    }

    pub fn from_manifest(manifest: &RegistryManifest) -> Self {
        let mut registry = Self::new(manifest.limits);
        registry.mannequins = manifest.mannequin_tiles.iter().copied().collect();
        registry
            .frame_important
            .extend(manifest.frame_important_tiles.iter().copied());

        for pack in &manifest.packs {
            for tile in &pack.tiles {
                registry.add_tile(&pack.name, &tile.name, tile.frame_important);
            }
            for wall in &pack.walls {
                registry.add_wall(&pack.name, wall);
            }
            for category in EquipCategory::ALL {
                for name in pack.equips.names(category) {
                    registry.add_equip(category, &pack.name, name);
                }
            }
        }
        registry
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        let manifest: RegistryManifest = serde_json::from_str(json)?;
        Ok(Self::from_manifest(&manifest))
    }

    /// Register a tile, returning its runtime id. Re-registering returns the old id.
    pub fn add_tile(&mut self, pack: &str, name: &str, frame_important: bool) -> u16 {
        let content = ContentRef::new(pack, name);
        if let Some(&id) = self.tile_ids.get(&content) {
            return id;
        }
        let id = self.limits.tile_count + self.tiles.len() as u16;
        if frame_important {
            self.frame_important.insert(id);
        }
        self.tile_ids.insert(content.clone(), id);
        self.tiles.push(content);
        id
    }

    pub fn add_wall(&mut self, pack: &str, name: &str) -> u16 {
        let content = ContentRef::new(pack, name);
        if let Some(&id) = self.wall_ids.get(&content) {
            return id;
        }
        let id = self.limits.wall_count + self.walls.len() as u16;
        self.wall_ids.insert(content.clone(), id);
        self.walls.push(content);
        id
    }

    pub fn add_equip(&mut self, category: EquipCategory, pack: &str, name: &str) -> u16 {
        let idx = category as usize;
        let content = ContentRef::new(pack, name);
        if let Some(&slot) = self.equip_ids[idx].get(&content) {
            return slot;
        }
        let slot = self.limits.equip_slots(category) + self.equips[idx].len() as u16;
        self.equip_ids[idx].insert(content.clone(), slot);
        self.equips[idx].push(content);
        slot
    }

    /// Mark a built-in tile type as frame-important
    pub fn set_frame_important(&mut self, tile_type: u16) {
        self.frame_important.insert(tile_type);
    }

    pub fn tile_id(&self, pack: &str, name: &str) -> Option<u16> {
        self.resolve_tile(&ContentRef::new(pack, name))
    }

    pub fn wall_id(&self, pack: &str, name: &str) -> Option<u16> {
        self.resolve_wall(&ContentRef::new(pack, name))
    }

    fn tile_ref(&self, tile_type: u16) -> Option<&ContentRef> {
        let idx = tile_type.checked_sub(self.limits.tile_count)?;
        self.tiles.get(idx as usize)
    }
}

impl Default for StaticRegistry {
    fn default() -> Self {
        Self::new(VanillaLimits::default())
    }
}

impl ContentRegistry for StaticRegistry {
    fn limits(&self) -> &VanillaLimits {
        &self.limits
    }

    fn resolve_tile(&self, content: &ContentRef) -> Option<u16> {
        self.tile_ids.get(content).copied()
    }

    fn resolve_wall(&self, content: &ContentRef) -> Option<u16> {
        self.wall_ids.get(content).copied()
    }

    fn resolve_equip_slot(&self, category: EquipCategory, content: &ContentRef) -> Option<u16> {
        self.equip_ids[category as usize].get(content).copied()
    }

    fn tile_content(&self, tile_type: u16) -> Option<ContentRef> {
        self.tile_ref(tile_type).cloned()
    }

    fn wall_content(&self, wall: u16) -> Option<ContentRef> {
        let idx = wall.checked_sub(self.limits.wall_count)?;
        self.walls.get(idx as usize).cloned()
    }

    fn equip_content(&self, category: EquipCategory, slot: u16) -> Option<ContentRef> {
        let idx = slot.checked_sub(self.limits.equip_slots(category))?;
        self.equips[category as usize].get(idx as usize).cloned()
    }

    fn tile_frame_important(&self, tile_type: u16) -> bool {
        self.frame_important.contains(&tile_type)
    }

    fn placeholder_tile(&self) -> u16 {
        self.placeholder
    }

    fn is_mannequin(&self, tile_type: u16) -> bool {
        self.mannequins.contains(&tile_type)
    }
}

use serde::{Deserialize, Serialize};

use super::registry::EquipCategory;

/// Built-in id counts. Ids at or above these belong to content packs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VanillaLimits {
    pub tile_count: u16,
    pub wall_count: u16,
    pub head_slots: u16,
    pub body_slots: u16,
    pub legs_slots: u16,
}

impl Default for VanillaLimits {
    fn default() -> Self {
        Self {
            tile_count: 470,
            wall_count: 231,
            head_slots: 216,
            body_slots: 210,
            legs_slots: 161,
        }
    }
}

impl VanillaLimits {
    pub fn is_foreign_tile(&self, tile_type: u16) -> bool {
        tile_type >= self.tile_count
    }

    pub fn is_foreign_wall(&self, wall: u16) -> bool {
        wall >= self.wall_count
    }

    pub fn equip_slots(&self, category: EquipCategory) -> u16 {
        match category {
            EquipCategory::Head => self.head_slots,
            EquipCategory::Body => self.body_slots,
            EquipCategory::Legs => self.legs_slots,
        }
    }

    pub fn is_foreign_equip(&self, category: EquipCategory, slot: u16) -> bool {
        slot >= self.equip_slots(category)
    }
}

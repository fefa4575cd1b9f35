//! Items held by item-frame fixtures.

use indexmap::IndexMap;

use crate::codec::{BinaryReader, BinaryWriter};
use crate::error::{Error, Result};

/// Host-side encoding of a held item
pub trait ItemSerializer {
    type Item;

    /// Whether the item belongs to foreign content the host format cannot store
    fn needs_saving(&self, item: &Self::Item) -> bool;
    fn write_item(&self, item: &Self::Item, writer: &mut BinaryWriter);
    fn read_item(&self, reader: &mut BinaryReader) -> Result<Self::Item>;
}

/// Item-frame fixtures keyed by fixture id, in placement order
#[derive(Debug, Clone, PartialEq)]
pub struct ItemFrames<I> {
    frames: IndexMap<i32, I>,
}

impl<I> Default for ItemFrames<I> {
    fn default() -> Self {
        Self { frames: IndexMap::new() }
    }
}

impl<I> ItemFrames<I> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: i32, item: I) -> Option<I> {
        self.frames.insert(id, item)
    }

    pub fn get(&self, id: i32) -> Option<&I> {
        self.frames.get(&id)
    }

    pub fn get_mut(&mut self, id: i32) -> Option<&mut I> {
        self.frames.get_mut(&id)
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (i32, &I)> {
        self.frames.iter().map(|(&id, item)| (id, item))
    }

    /// Fixtures whose item has to go into the extension section
    pub(crate) fn to_save<'a, S>(&'a self, serializer: &'a S) -> Vec<(i32, &'a I)>
    where
        S: ItemSerializer<Item = I>,
    {
        self.iter().filter(|(_, item)| serializer.needs_saving(item)).collect()
    }
}

pub(crate) fn write_items<I, S>(writer: &mut BinaryWriter, entries: &[(i32, &I)], serializer: &S)
where
    S: ItemSerializer<Item = I>,
{
    writer.write_i32_le(entries.len() as i32);
    for (id, item) in entries {
        writer.write_i32_le(*id);
        serializer.write_item(item, writer);
    }
}

/// Read saved items into their fixtures, returning how many were placed
pub(crate) fn read_items<S: ItemSerializer>(
    reader: &mut BinaryReader,
    frames: &mut ItemFrames<S::Item>,
    serializer: &S,
) -> Result<usize> {
    let count = reader.read_i32_le()?;
    if count < 0 {
        return Err(Error::NegativeCount(count));
    }
    for _ in 0..count {
        let id = reader.read_i32_le()?;
        let item = serializer.read_item(reader)?;
        let slot = frames.get_mut(id).ok_or(Error::MissingFixture(id))?;
        *slot = item;
    }
    Ok(count as usize)
}

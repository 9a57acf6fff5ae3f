//! Ordered list of drawables. List order is paint order.

use crate::scene::DrawableId;

/// Render list. The same id may appear more than once.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RenderList {
    items: Vec<DrawableId>,
}

impl RenderList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an id and return its index.
    pub fn push(&mut self, id: DrawableId) -> usize {
        self.items.push(id);
        self.items.len() - 1
    }

    /// Index of the first occurrence of `id`.
    pub fn position(&self, id: DrawableId) -> Option<usize> {
        self.items.iter().position(|item| *item == id)
    }

    pub fn get(&self, index: usize) -> Option<DrawableId> {
        self.items.get(index).copied()
    }

    /// Remove the entry at `index`, shifting later entries down by one.
    pub fn remove_at(&mut self, index: usize) -> Option<DrawableId> {
        if index < self.items.len() {
            Some(self.items.remove(index))
        } else {
            None
        }
    }

    /// Move the entry at `from` to `to`.
    ///
    /// `to` is clamped to the last index. Entries between the two positions
    /// shift by one to close the gap; nothing is swapped. Returns `false`
    /// without touching the list when `from` is out of range or equals the
    /// clamped `to`.
    pub fn move_item(&mut self, from: usize, to: usize) -> bool {
        if from >= self.items.len() {
            return false;
        }

        let to = to.min(self.items.len() - 1);
        if from == to {
            return false;
        }

        let item = self.items.remove(from);
        self.items.insert(to, item);
        true
    }

    pub fn iter(&self) -> impl Iterator<Item = DrawableId> + '_ {
        self.items.iter().copied()
    }

    pub fn as_slice(&self) -> &[DrawableId] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

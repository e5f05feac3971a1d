//! The ordered layer collection and the current selection.
//!
//! Every mutation builds a new layer vector and swaps it in, so a reader
//! holding a [`LayerStore::snapshot`] keeps a consistent view and change
//! detection is a pointer or revision comparison.

use std::sync::Arc;

use crate::clipboard::StyleClipboard;
use crate::layer::{Layer, LayerId};

/// Move direction for [`LayerStore::reorder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Toward the front (higher index).
    Up,
    /// Toward the back (lower index).
    Down,
}

#[derive(Debug, Clone, Default)]
pub struct LayerStore {
    layers: Arc<Vec<Layer>>,
    selected: Option<LayerId>,
    revision: u64,
}

impl LayerStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// A store holding exactly the default background layer.
    pub fn new_session() -> Self {
        Self::from_layers(vec![Layer::default_background()])
    }

    pub fn from_layers(layers: Vec<Layer>) -> Self {
        Self {
            layers: Arc::new(layers),
            selected: None,
            revision: 0,
        }
    }

    /// Layers in storage (z) order, bottom first.
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Shared handle to the current layer vector.
    pub fn snapshot(&self) -> Arc<Vec<Layer>> {
        Arc::clone(&self.layers)
    }

    /// Incremented on every committed mutation.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn get(&self, id: &LayerId) -> Option<&Layer> {
        self.layers.iter().find(|l| &l.id == id)
    }

    pub fn index_of(&self, id: &LayerId) -> Option<usize> {
        self.layers.iter().position(|l| &l.id == id)
    }

    pub fn selected(&self) -> Option<&LayerId> {
        self.selected.as_ref()
    }

    pub fn selected_layer(&self) -> Option<&Layer> {
        self.selected.as_ref().and_then(|id| self.get(id))
    }

    /// Layers front-most first, as a layer panel lists them.
    pub fn display_order(&self) -> Vec<&Layer> {
        self.layers.iter().rev().collect()
    }

    /// Append `layer` on top and select it. A colliding id is replaced with
    /// a fresh one. Returns the id the layer was stored under.
    pub fn add(&mut self, mut layer: Layer) -> LayerId {
        if self.get(&layer.id).is_some() {
            layer.id = LayerId::generate();
        }
        let id = layer.id.clone();
        let mut next = self.layers.as_ref().clone();
        next.push(layer);
        self.selected = Some(id.clone());
        self.commit(next);
        tracing::debug!("added layer {}", id);
        id
    }

    /// Replace the layer with the same id. Unknown ids are ignored.
    pub fn update(&mut self, layer: Layer) -> bool {
        let Some(index) = self.index_of(&layer.id) else {
            return false;
        };
        let mut next = self.layers.as_ref().clone();
        next[index] = layer;
        self.commit(next);
        true
    }

    /// Apply `f` to a copy of the layer with `id` and store the result.
    pub fn modify(&mut self, id: &LayerId, f: impl FnOnce(&mut Layer)) -> bool {
        let Some(mut layer) = self.get(id).cloned() else {
            return false;
        };
        f(&mut layer);
        layer.id = id.clone();
        self.update(layer)
    }

    /// Swap the layer at `index` with its neighbor in `direction`.
    /// Moves past either end are no-ops.
    pub fn reorder(&mut self, index: usize, direction: Direction) -> bool {
        let len = self.layers.len();
        if index >= len {
            return false;
        }
        let other = match direction {
            Direction::Up if index + 1 < len => index + 1,
            Direction::Down if index > 0 => index - 1,
            _ => return false,
        };
        let mut next = self.layers.as_ref().clone();
        next.swap(index, other);
        self.commit(next);
        true
    }

    pub fn set_visible(&mut self, id: &LayerId, visible: bool) -> bool {
        self.modify(id, |l| l.visible = visible)
    }

    pub fn set_locked(&mut self, id: &LayerId, locked: bool) -> bool {
        self.modify(id, |l| l.locked = locked)
    }

    pub fn toggle_visible(&mut self, id: &LayerId) -> bool {
        self.modify(id, |l| l.visible = !l.visible)
    }

    pub fn toggle_locked(&mut self, id: &LayerId) -> bool {
        self.modify(id, |l| l.locked = !l.locked)
    }

    /// Delete a layer. Clears the selection if it pointed at it.
    pub fn remove(&mut self, id: &LayerId) -> Option<Layer> {
        let index = self.index_of(id)?;
        let mut next = self.layers.as_ref().clone();
        let removed = next.remove(index);
        self.commit(next);
        Some(removed)
    }

    /// Select a layer, or clear the selection with `None`. Selecting an
    /// unknown id clears the selection.
    pub fn select(&mut self, id: Option<&LayerId>) {
        self.selected = id.filter(|id| self.get(id).is_some()).cloned();
    }

    /// Replace the whole collection (project load). Clears the selection.
    pub fn replace_all(&mut self, layers: Vec<Layer>) {
        self.selected = None;
        self.commit(layers);
    }

    /// Capture the style of layer `id`.
    pub fn copy_style(&self, id: &LayerId) -> Option<StyleClipboard> {
        self.get(id).map(StyleClipboard::copy_from)
    }

    /// Paste a captured style onto layer `id`.
    pub fn paste_style(&mut self, id: &LayerId, style: &StyleClipboard) -> bool {
        let Some(target) = self.get(id) else {
            return false;
        };
        let pasted = style.paste_onto(target);
        self.update(pasted)
    }

    fn commit(&mut self, layers: Vec<Layer>) {
        self.layers = Arc::new(layers);
        self.revision += 1;
        if let Some(id) = &self.selected {
            if self.get(id).is_none() {
                self.selected = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use carda_core::LayerType;

    fn types(store: &LayerStore) -> Vec<LayerType> {
        store.layers().iter().map(|l| l.layer_type()).collect()
    }

    #[test]
    fn test_new_session_has_one_background() {
        let store = LayerStore::new_session();
        assert_eq!(types(&store), vec![LayerType::Background]);
        assert!(store.layers()[0].locked);
        assert!(store.selected().is_none());
    }

    #[test]
    fn test_add_appends_and_selects() {
        let mut store = LayerStore::new_session();
        let text = store.add(Layer::default_text());
        let image = store.add(Layer::default_image("data:image/png;base64,AA=="));
        assert_eq!(
            types(&store),
            vec![LayerType::Background, LayerType::Text, LayerType::Image]
        );
        assert_eq!(store.selected(), Some(&image));
        let display: Vec<_> = store.display_order().iter().map(|l| l.layer_type()).collect();
        assert_eq!(
            display,
            vec![LayerType::Image, LayerType::Text, LayerType::Background]
        );
        assert!(store.get(&text).is_some());
    }

    #[test]
    fn test_add_replaces_colliding_id() {
        let mut store = LayerStore::new();
        let layer = Layer::default_text();
        let a = store.add(layer.clone());
        let b = store.add(layer);
        assert_ne!(a, b);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_reorder_swaps_neighbors() {
        let mut store = LayerStore::new_session();
        let a = store.add(Layer::default_text());
        let b = store.add(Layer::default_text());
        assert!(store.reorder(1, Direction::Up));
        assert_eq!(store.index_of(&a), Some(2));
        assert_eq!(store.index_of(&b), Some(1));
        assert!(store.reorder(2, Direction::Down));
        assert_eq!(store.index_of(&a), Some(1));
    }

    #[test]
    fn test_reorder_boundaries_are_noops() {
        let mut store = LayerStore::new_session();
        store.add(Layer::default_text());
        let before = store.layers().to_vec();
        let rev = store.revision();
        assert!(!store.reorder(1, Direction::Up));
        assert!(!store.reorder(0, Direction::Down));
        assert!(!store.reorder(7, Direction::Down));
        assert_eq!(store.layers(), before.as_slice());
        assert_eq!(store.revision(), rev);
    }

    #[test]
    fn test_mutation_replaces_vector() {
        let mut store = LayerStore::new_session();
        let before = store.snapshot();
        let id = store.layers()[0].id.clone();
        store.set_visible(&id, false);
        let after = store.snapshot();
        assert!(!Arc::ptr_eq(&before, &after));
        assert!(before[0].visible);
        assert!(!after[0].visible);
    }

    #[test]
    fn test_update_unknown_id_is_noop() {
        let mut store = LayerStore::new_session();
        let rev = store.revision();
        assert!(!store.update(Layer::default_text()));
        assert_eq!(store.revision(), rev);
    }

    #[test]
    fn test_remove_clears_selection() {
        let mut store = LayerStore::new_session();
        let id = store.add(Layer::default_text());
        assert_eq!(store.selected(), Some(&id));
        assert!(store.remove(&id).is_some());
        assert!(store.selected().is_none());
        assert!(store.remove(&id).is_none());
    }

    #[test]
    fn test_remove_other_keeps_selection() {
        let mut store = LayerStore::new_session();
        let a = store.add(Layer::default_text());
        let b = store.add(Layer::default_text());
        store.remove(&a);
        assert_eq!(store.selected(), Some(&b));
    }

    #[test]
    fn test_select_unknown_clears() {
        let mut store = LayerStore::new_session();
        let id = store.add(Layer::default_text());
        store.select(Some(&LayerId::new("missing")));
        assert!(store.selected().is_none());
        store.select(Some(&id));
        assert_eq!(store.selected_layer().map(|l| &l.id), Some(&id));
        store.select(None);
        assert!(store.selected().is_none());
    }

    #[test]
    fn test_toggles() {
        let mut store = LayerStore::new_session();
        let id = store.layers()[0].id.clone();
        store.toggle_locked(&id);
        assert!(!store.layers()[0].locked);
        store.toggle_visible(&id);
        assert!(!store.layers()[0].visible);
        store.set_locked(&id, true);
        assert!(store.layers()[0].locked);
    }

    #[test]
    fn test_replace_all_clears_selection() {
        let mut store = LayerStore::new_session();
        store.add(Layer::default_text());
        store.replace_all(vec![Layer::default_background(), Layer::default_frame()]);
        assert!(store.selected().is_none());
        assert_eq!(types(&store), vec![LayerType::Background, LayerType::Frame]);
    }

    #[test]
    fn test_modify_cannot_change_id() {
        let mut store = LayerStore::new_session();
        let id = store.add(Layer::default_text());
        store.modify(&id, |l| {
            l.id = LayerId::new("hijack");
            l.x = 10.0;
        });
        assert_eq!(store.get(&id).map(|l| l.x), Some(10.0));
    }
}

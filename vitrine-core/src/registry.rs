//! Group registry: trigger elements per group plus their lazily created
//! slides and content.

use crate::error::LightboxError;
use crate::load::{Content, LoadTicket, SlideId};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Counter for generating per-instance default group keys
static INSTANCE_COUNTER: AtomicU64 = AtomicU64::new(0);

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupKey(String);

impl GroupKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for GroupKey {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for GroupKey {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One independently navigable set of triggers.
///
/// `slides`, `contents` and `pending` are keyed by trigger index and only ever
/// hold indices inside `0..triggers.len()`.
#[derive(Debug)]
pub struct Group<E> {
    triggers: Vec<E>,
    slides: BTreeMap<usize, SlideId>,
    contents: BTreeMap<usize, Content>,
    pending: BTreeMap<usize, LoadTicket>,
}

impl<E> Default for Group<E> {
    fn default() -> Self {
        Self {
            triggers: Vec::new(),
            slides: BTreeMap::new(),
            contents: BTreeMap::new(),
            pending: BTreeMap::new(),
        }
    }
}

/// What `Group::remove_at` took out.
#[derive(Debug, Clone, PartialEq)]
pub struct RemovedEntry<E> {
    pub index: usize,
    pub trigger: E,
    pub slide: Option<SlideId>,
}

impl<E: PartialEq> Group<E> {
    pub fn len(&self) -> usize {
        self.triggers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triggers.is_empty()
    }

    pub fn triggers(&self) -> &[E] {
        &self.triggers
    }

    pub fn trigger(&self, index: usize) -> Option<&E> {
        self.triggers.get(index)
    }

    pub fn index_of(&self, el: &E) -> Option<usize> {
        self.triggers.iter().position(|t| t == el)
    }

    pub fn slide(&self, index: usize) -> Option<SlideId> {
        self.slides.get(&index).copied()
    }

    pub fn slides(&self) -> impl Iterator<Item = (usize, SlideId)> + '_ {
        self.slides.iter().map(|(i, id)| (*i, *id))
    }

    pub fn index_of_slide(&self, slide: SlideId) -> Option<usize> {
        self.slides
            .iter()
            .find_map(|(i, id)| (*id == slide).then_some(*i))
    }

    pub fn content(&self, index: usize) -> Option<Content> {
        self.contents.get(&index).copied()
    }

    pub fn is_pending(&self, index: usize) -> bool {
        self.pending.contains_key(&index)
    }

    pub fn insert_slide(&mut self, index: usize, slide: SlideId) {
        debug_assert!(index < self.triggers.len());
        self.slides.insert(index, slide);
    }

    pub fn begin_load(&mut self, index: usize, ticket: LoadTicket) {
        self.pending.insert(index, ticket);
    }

    /// Store a finished load. Returns the slide index, or `None` for a stale ticket.
    pub fn finish_load(&mut self, ticket: LoadTicket, content: Content) -> Option<usize> {
        let index = self.index_of_slide(ticket.slide)?;
        if self.pending.get(&index) != Some(&ticket) {
            return None;
        }
        self.pending.remove(&index);
        self.contents.insert(index, content);
        Some(index)
    }

    /// Content settled without a load (e.g. the trigger stopped qualifying).
    pub fn store_content(&mut self, index: usize, content: Content) {
        debug_assert!(index < self.triggers.len());
        self.pending.remove(&index);
        self.contents.insert(index, content);
    }

    /// Drop every slide, content and pending load. Returns the dropped slide ids.
    pub fn clear_materialised(&mut self) -> Vec<SlideId> {
        self.contents.clear();
        self.pending.clear();
        std::mem::take(&mut self.slides).into_values().collect()
    }

    /// Remove the trigger at `index` together with its aligned entries, shifting
    /// later entries down by one.
    pub fn remove_at(&mut self, index: usize) -> Option<RemovedEntry<E>> {
        if index >= self.triggers.len() {
            return None;
        }
        let trigger = self.triggers.remove(index);
        let slide = self.slides.remove(&index);
        self.contents.remove(&index);
        self.pending.remove(&index);
        shift_down(&mut self.slides, index);
        shift_down(&mut self.contents, index);
        shift_down(&mut self.pending, index);
        Some(RemovedEntry {
            index,
            trigger,
            slide,
        })
    }
}

fn shift_down<V>(map: &mut BTreeMap<usize, V>, removed: usize) {
    let tail = map.split_off(&removed);
    map.extend(tail.into_iter().map(|(i, v)| (i - 1, v)));
}

/// All groups of one lightbox instance.
#[derive(Debug)]
pub struct Registry<E> {
    groups: BTreeMap<GroupKey, Group<E>>,
    default_key: GroupKey,
    next_slide: u64,
}

impl<E: Clone + PartialEq> Default for Registry<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Clone + PartialEq> Registry<E> {
    pub fn new() -> Self {
        let instance = INSTANCE_COUNTER.fetch_add(1, Ordering::Relaxed);
        Self {
            groups: BTreeMap::new(),
            default_key: GroupKey(format!("vitrine-default-{}", instance)),
            next_slide: 0,
        }
    }

    /// Key assigned to triggers that carry no group of their own.
    pub fn default_key(&self) -> &GroupKey {
        &self.default_key
    }

    pub fn group(&self, key: &GroupKey) -> Option<&Group<E>> {
        self.groups.get(key)
    }

    pub fn group_mut(&mut self, key: &GroupKey) -> Option<&mut Group<E>> {
        self.groups.get_mut(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &GroupKey> {
        self.groups.keys()
    }

    /// Append `el` to its group, creating the group on first use.
    pub fn insert(&mut self, key: GroupKey, el: E) -> Result<usize, LightboxError> {
        let group = self.groups.entry(key.clone()).or_default();
        if group.index_of(&el).is_some() {
            return Err(LightboxError::DuplicateTrigger {
                group: key.to_string(),
            });
        }
        group.triggers.push(el);
        Ok(group.triggers.len() - 1)
    }

    pub fn remove(&mut self, key: &GroupKey, el: &E) -> Option<RemovedEntry<E>> {
        let group = self.groups.get_mut(key)?;
        let index = group.index_of(el)?;
        group.remove_at(index)
    }

    /// Group and index of a registered trigger.
    pub fn locate(&self, el: &E) -> Option<(GroupKey, usize)> {
        self.groups
            .iter()
            .find_map(|(key, group)| group.index_of(el).map(|i| (key.clone(), i)))
    }

    pub fn contains(&self, el: &E) -> bool {
        self.locate(el).is_some()
    }

    pub fn all_triggers(&self) -> Vec<E> {
        self.groups
            .values()
            .flat_map(|group| group.triggers.iter().cloned())
            .collect()
    }

    pub fn allocate_slide(&mut self) -> SlideId {
        let id = SlideId(self.next_slide);
        self.next_slide += 1;
        id
    }

    pub fn clear(&mut self) {
        self.groups.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::Size;

    fn image() -> Content {
        Content::Image {
            natural: Size::new(640.0, 480.0),
        }
    }

    #[test]
    fn test_default_keys_are_unique_per_instance() {
        let a: Registry<u32> = Registry::new();
        let b: Registry<u32> = Registry::new();
        assert_ne!(a.default_key(), b.default_key());
    }

    #[test]
    fn test_insert_rejects_duplicates() {
        let mut registry = Registry::new();
        let key = GroupKey::from("g");
        assert_eq!(registry.insert(key.clone(), 1), Ok(0));
        assert_eq!(registry.insert(key.clone(), 2), Ok(1));
        assert!(matches!(
            registry.insert(key, 1),
            Err(LightboxError::DuplicateTrigger { .. })
        ));
    }

    #[test]
    fn test_locate_finds_group_and_index() {
        let mut registry = Registry::new();
        registry.insert("a".into(), 1).unwrap();
        registry.insert("b".into(), 2).unwrap();
        registry.insert("b".into(), 3).unwrap();
        assert_eq!(registry.locate(&3), Some((GroupKey::from("b"), 1)));
        assert_eq!(registry.locate(&4), None);
    }

    #[test]
    fn test_remove_shifts_aligned_entries() {
        let mut registry = Registry::new();
        let key = GroupKey::from("g");
        for el in 0..4 {
            registry.insert(key.clone(), el).unwrap();
        }
        let slides: Vec<SlideId> = (0..4).map(|_| registry.allocate_slide()).collect();
        let group = registry.group_mut(&key).unwrap();
        for (i, id) in slides.iter().enumerate() {
            group.insert_slide(i, *id);
        }
        group.begin_load(3, LoadTicket { slide: slides[3] });
        group.contents.insert(1, image());
        group.contents.insert(2, Content::Error);

        let removed = registry.remove(&key, &1).unwrap();
        assert_eq!(removed.index, 1);
        assert_eq!(removed.slide, Some(slides[1]));

        let group = registry.group(&key).unwrap();
        assert_eq!(group.triggers(), &[0, 2, 3]);
        assert_eq!(group.slide(1), Some(slides[2]));
        assert_eq!(group.slide(2), Some(slides[3]));
        assert_eq!(group.slide(3), None);
        assert_eq!(group.content(1), Some(Content::Error));
        assert!(group.is_pending(2));
        assert!(!group.is_pending(3));
    }

    #[test]
    fn test_finish_load_rejects_stale_ticket() {
        let mut registry = Registry::new();
        let key = GroupKey::from("g");
        registry.insert(key.clone(), 7).unwrap();
        let slide = registry.allocate_slide();
        let group = registry.group_mut(&key).unwrap();
        group.insert_slide(0, slide);
        let ticket = LoadTicket { slide };
        group.begin_load(0, ticket);

        group.clear_materialised();
        assert_eq!(group.finish_load(ticket, image()), None);
        assert_eq!(group.content(0), None);
    }

    #[test]
    fn test_finish_load_stores_content() {
        let mut registry = Registry::new();
        let key = GroupKey::from("g");
        registry.insert(key.clone(), 7).unwrap();
        let slide = registry.allocate_slide();
        let group = registry.group_mut(&key).unwrap();
        group.insert_slide(0, slide);
        let ticket = LoadTicket { slide };
        group.begin_load(0, ticket);

        assert_eq!(group.finish_load(ticket, image()), Some(0));
        assert_eq!(group.content(0), Some(image()));
        assert!(!group.is_pending(0));
    }
}

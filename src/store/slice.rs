//! List and single-value containers with their reducers.

/// Identity used to patch a list in place.
///
/// Products and portfolio projects are addressed by slug, every other
/// resource by numeric id.
pub trait Keyed {
    type Key: PartialEq;

    fn key(&self) -> Self::Key;
}

/// A fetched list plus its request state.
#[derive(Debug, Clone)]
pub struct Slice<T> {
    pub items: Vec<T>,
    /// Backend count; exceeds `items.len()` when paginated.
    pub total: u64,
    pub loading: bool,
    pub error: Option<String>,
    /// Set after the first successful fetch.
    pub loaded: bool,
}

impl<T> Default for Slice<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            total: 0,
            loading: false,
            error: None,
            loaded: false,
        }
    }
}

impl<T> Slice<T> {
    pub fn pending(&mut self) {
        self.loading = true;
        self.error = None;
    }

    pub fn fulfilled(&mut self, items: Vec<T>, total: u64) {
        self.items = items;
        self.total = total;
        self.loading = false;
        self.loaded = true;
    }

    pub fn rejected(&mut self, message: impl Into<String>) {
        self.loading = false;
        self.error = Some(message.into());
    }

    pub fn inserted(&mut self, item: T) {
        self.items.push(item);
        self.total += 1;
    }

    pub fn prepended(&mut self, item: T) {
        self.items.insert(0, item);
        self.total += 1;
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<T: Keyed> Slice<T> {
    /// Replaces the item with the same key; returns whether one was found.
    pub fn updated(&mut self, item: T) -> bool {
        let key = item.key();
        match self.items.iter_mut().find(|existing| existing.key() == key) {
            Some(slot) => {
                *slot = item;
                true
            }
            None => false,
        }
    }

    /// Drops every item with `key`; returns how many were removed.
    pub fn removed(&mut self, key: &T::Key) -> usize {
        let before = self.items.len();
        self.items.retain(|item| item.key() != *key);
        let removed = before - self.items.len();
        self.total = self.total.saturating_sub(removed as u64);
        removed
    }

    pub fn find(&self, key: &T::Key) -> Option<&T> {
        self.items.iter().find(|item| item.key() == *key)
    }
}

/// A single fetched record (detail page, analytics, overview).
#[derive(Debug, Clone)]
pub struct Resource<T> {
    pub value: Option<T>,
    pub loading: bool,
    pub error: Option<String>,
}

impl<T> Default for Resource<T> {
    fn default() -> Self {
        Self {
            value: None,
            loading: false,
            error: None,
        }
    }
}

impl<T> Resource<T> {
    pub fn pending(&mut self) {
        self.loading = true;
        self.error = None;
    }

    pub fn fulfilled(&mut self, value: T) {
        self.value = Some(value);
        self.loading = false;
    }

    /// Keeps the previous value so a failed refresh still renders stale data.
    pub fn rejected(&mut self, message: impl Into<String>) {
        self.loading = false;
        self.error = Some(message.into());
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Row {
        id: i64,
        name: &'static str,
    }

    impl Keyed for Row {
        type Key = i64;

        fn key(&self) -> i64 {
            self.id
        }
    }

    fn loaded() -> Slice<Row> {
        let mut slice = Slice::default();
        slice.pending();
        slice.fulfilled(
            vec![Row { id: 1, name: "a" }, Row { id: 2, name: "b" }],
            2,
        );
        slice
    }

    #[test]
    fn pending_clears_error() {
        let mut slice: Slice<Row> = Slice::default();
        slice.rejected("boom");
        assert_eq!(slice.error.as_deref(), Some("boom"));
        slice.pending();
        assert!(slice.loading);
        assert!(slice.error.is_none());
    }

    #[test]
    fn insert_update_remove_by_key() {
        let mut slice = loaded();

        slice.inserted(Row { id: 3, name: "c" });
        slice.prepended(Row { id: 0, name: "z" });
        assert_eq!(slice.total, 4);
        assert_eq!(slice.items[0].id, 0);

        assert!(slice.updated(Row { id: 2, name: "B" }));
        assert!(!slice.updated(Row { id: 9, name: "?" }));
        assert_eq!(slice.find(&2).map(|r| r.name), Some("B"));

        assert_eq!(slice.removed(&1), 1);
        assert_eq!(slice.removed(&1), 0);
        assert_eq!(slice.total, 3);
        assert_eq!(
            slice.items.iter().map(|r| r.id).collect::<Vec<_>>(),
            vec![0, 2, 3]
        );
    }

    #[test]
    fn total_never_underflows() {
        let mut slice = Slice::default();
        slice.fulfilled(vec![Row { id: 1, name: "a" }], 0);
        slice.removed(&1);
        assert_eq!(slice.total, 0);
    }

    #[test]
    fn failed_refresh_keeps_value() {
        let mut resource = Resource::default();
        resource.fulfilled(5);
        resource.pending();
        resource.rejected("offline");
        assert_eq!(resource.value, Some(5));
        assert!(!resource.loading);
    }
}

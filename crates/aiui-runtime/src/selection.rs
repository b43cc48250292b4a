//! Guard against out-of-order content loads.
//!
//! Every selection hands out a [`Ticket`]. A load that finishes with a
//! ticket that is no longer current is discarded, so a slow earlier load
//! can never overwrite the content of a later selection.

/// Proof of which selection started a load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket<K> {
    key: K,
    generation: u64,
}

impl<K> Ticket<K> {
    pub fn key(&self) -> &K {
        &self.key
    }
}

/// The current selection and its loaded content.
#[derive(Debug)]
pub struct ContentSelection<K, V> {
    generation: u64,
    selected: Option<K>,
    loaded: Option<V>,
}

impl<K, V> Default for ContentSelection<K, V> {
    fn default() -> Self {
        Self {
            generation: 0,
            selected: None,
            loaded: None,
        }
    }
}

impl<K: Clone + PartialEq, V> ContentSelection<K, V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select `key`, invalidating every outstanding ticket.
    pub fn select(&mut self, key: K) -> Ticket<K> {
        self.generation += 1;
        self.selected = Some(key.clone());
        self.loaded = None;
        Ticket {
            key,
            generation: self.generation,
        }
    }

    /// Store a finished load. Returns `false` and drops `value` when the
    /// ticket is stale.
    pub fn complete(&mut self, ticket: &Ticket<K>, value: V) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.loaded = Some(value);
        true
    }

    pub fn is_current(&self, ticket: &Ticket<K>) -> bool {
        ticket.generation == self.generation && self.selected.as_ref() == Some(&ticket.key)
    }

    /// The selected key and its content, once loaded.
    pub fn current(&self) -> Option<(&K, &V)> {
        Some((self.selected.as_ref()?, self.loaded.as_ref()?))
    }

    pub fn selected(&self) -> Option<&K> {
        self.selected.as_ref()
    }

    /// Drop the selection. Outstanding tickets become stale.
    pub fn clear(&mut self) {
        self.generation += 1;
        self.selected = None;
        self.loaded = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stale_load_does_not_overwrite_newer_selection() {
        let mut selection: ContentSelection<String, String> = ContentSelection::new();

        let slow = selection.select("/a".to_string());
        let fast = selection.select("/b".to_string());

        assert!(selection.complete(&fast, "b".to_string()));
        assert!(!selection.complete(&slow, "a".to_string()));

        let (key, value) = selection.current().unwrap();
        assert_eq!(key, "/b");
        assert_eq!(value, "b");
    }

    #[test]
    fn reselecting_the_same_key_invalidates_old_ticket() {
        let mut selection: ContentSelection<&str, u32> = ContentSelection::new();

        let first = selection.select("/a");
        let second = selection.select("/a");

        assert!(!selection.is_current(&first));
        assert!(selection.complete(&second, 2));
        assert_eq!(selection.current(), Some((&"/a", &2)));
    }

    #[test]
    fn clear_discards_in_flight_loads() {
        let mut selection: ContentSelection<&str, u32> = ContentSelection::new();
        let ticket = selection.select("/a");

        selection.clear();

        assert!(!selection.complete(&ticket, 1));
        assert!(selection.current().is_none());
        assert!(selection.selected().is_none());
    }

    #[test]
    fn nothing_is_current_before_load_completes() {
        let mut selection: ContentSelection<&str, u32> = ContentSelection::new();
        let ticket = selection.select("/a");

        assert_eq!(selection.selected(), Some(&"/a"));
        assert!(selection.current().is_none());
        assert_eq!(ticket.key(), &"/a");
    }
}

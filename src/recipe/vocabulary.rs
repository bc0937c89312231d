use std::collections::HashSet;

/// Every ingredient token seen so far, lower-cased, in first-seen order.
///
/// Entries are only ever added.
#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    entries: Vec<String>,
    seen: HashSet<String>,
}

impl Vocabulary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a token (lower-cased). Returns false if it was already known.
    pub fn insert(&mut self, token: &str) -> bool {
        let token = token.to_lowercase();
        if self.seen.contains(&token) {
            return false;
        }
        self.seen.insert(token.clone());
        self.entries.push(token);
        true
    }

    pub fn contains(&self, token: &str) -> bool {
        self.seen.contains(&token.to_lowercase())
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    /// Entries starting with `prefix`, in insertion order
    pub fn with_prefix<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.iter().filter(move |entry| entry.starts_with(prefix))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> Extend<&'a str> for Vocabulary {
    fn extend<T: IntoIterator<Item = &'a str>>(&mut self, iter: T) {
        for token in iter {
            self.insert(token);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_lowercases_and_dedupes() {
        let mut vocab = Vocabulary::new();
        assert!(vocab.insert("Tomato"));
        assert!(!vocab.insert("tomato"));
        assert!(vocab.insert("Turmeric"));

        assert_eq!(vocab.len(), 2);
        assert!(vocab.contains("TOMATO"));
        assert_eq!(vocab.iter().collect::<Vec<_>>(), vec!["tomato", "turmeric"]);
    }

    #[test]
    fn test_with_prefix_keeps_insertion_order() {
        let mut vocab = Vocabulary::new();
        vocab.extend(["turmeric", "salt", "tea leaves", "tomato"]);

        let hits: Vec<_> = vocab.with_prefix("t").collect();
        assert_eq!(hits, vec!["turmeric", "tea leaves", "tomato"]);
    }
}

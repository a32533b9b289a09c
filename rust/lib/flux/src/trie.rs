use std::collections::HashMap;
use std::sync::RwLock;

/// A thread-safe trie for matching subscription patterns against state paths.
///
/// Patterns use `/` as the level separator and support two wildcards:
/// - `+` matches exactly one path level
/// - `#` matches any number of remaining levels (must be the last segment)
///
/// # Examples
///
/// ```ignore
/// let trie = Trie::new();
/// trie.insert("articles/list", 1);
/// trie.insert("articles/+", 2);
/// trie.insert("#", 3);
///
/// // "articles/list" matches the exact pattern, the single-level
/// // wildcard, and the root wildcard.
/// let results = trie.match_path("articles/list"); // [1, 2, 3]
/// ```
pub struct Trie<T> {
    root: RwLock<TrieNode<T>>,
}

struct TrieNode<T> {
    /// Exact-match children, keyed by segment string.
    children: HashMap<String, TrieNode<T>>,
    /// `+` wildcard child, matching exactly one level.
    single: Option<Box<TrieNode<T>>>,
    /// `#` wildcard child, matching any remaining levels.
    multi: Option<Box<TrieNode<T>>>,
    /// Values stored at this node (when a pattern terminates here).
    values: Vec<T>,
}

impl<T> Default for TrieNode<T> {
    fn default() -> Self {
        Self {
            children: HashMap::new(),
            single: None,
            multi: None,
            values: Vec::new(),
        }
    }
}

impl<T: Clone> Trie<T> {
    /// Create a new empty trie.
    pub fn new() -> Self {
        Self {
            root: RwLock::new(TrieNode::default()),
        }
    }

    /// Insert a value at the given pattern.
    ///
    /// Pattern examples: `"auth/state"`, `"comments/items/+"`, `"articles/#"`, `"#"`.
    pub fn insert(&self, pattern: &str, value: T) {
        let mut root = self.root.write().unwrap();
        root.insert(pattern, value);
    }

    /// Return all values whose patterns match the given concrete path.
    ///
    /// For example, path `"comments/items/42"` matches patterns:
    /// - `"comments/items/42"` (exact)
    /// - `"comments/items/+"` (single-level wildcard)
    /// - `"comments/#"` (multi-level wildcard)
    /// - `"#"` (match all)
    pub fn match_path(&self, path: &str) -> Vec<T> {
        let root = self.root.read().unwrap();
        let mut results = Vec::new();
        root.collect_matches(path, &mut results);
        results
    }

    /// Remove values matching the predicate from the given pattern.
    ///
    /// Returns `true` if any values were removed.
    pub fn remove<F>(&self, pattern: &str, predicate: F) -> bool
    where
        F: Fn(&T) -> bool,
    {
        let mut root = self.root.write().unwrap();
        root.remove(pattern, &predicate)
    }

    /// Check if any values exist at the given pattern (exact pattern, not matching).
    pub fn has_pattern(&self, pattern: &str) -> bool {
        let root = self.root.read().unwrap();
        root.has_pattern(pattern)
    }
}

impl<T> Default for Trie<T>
where
    T: Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> TrieNode<T> {
    fn insert(&mut self, pattern: &str, value: T) {
        if pattern.is_empty() {
            self.values.push(value);
            return;
        }

        let (first, rest) = split_first(pattern);

        match first {
            "+" => {
                let child = self
                    .single
                    .get_or_insert_with(|| Box::new(TrieNode::default()));
                child.insert(rest, value);
            }
            "#" => {
                // `#` terminates the pattern; the value lives on the multi child.
                let child = self
                    .multi
                    .get_or_insert_with(|| Box::new(TrieNode::default()));
                child.values.push(value);
            }
            segment => {
                let child = self
                    .children
                    .entry(segment.to_string())
                    .or_insert_with(TrieNode::default);
                child.insert(rest, value);
            }
        }
    }

    fn collect_matches(&self, path: &str, results: &mut Vec<T>) {
        if path.is_empty() {
            // Patterns that terminate here match exactly.
            results.extend(self.values.iter().cloned());
            // `#` at this level also matches zero remaining levels.
            if let Some(ref multi) = self.multi {
                results.extend(multi.values.iter().cloned());
            }
            return;
        }

        let (first, rest) = split_first(path);

        // Exact segment match.
        if let Some(child) = self.children.get(first) {
            child.collect_matches(rest, results);
        }

        // Single-level wildcard `+` consumes this one segment.
        if let Some(ref single) = self.single {
            single.collect_matches(rest, results);
        }

        // Multi-level wildcard `#` matches everything from here on.
        if let Some(ref multi) = self.multi {
            results.extend(multi.values.iter().cloned());
        }
    }

    fn remove<F>(&mut self, pattern: &str, predicate: &F) -> bool
    where
        F: Fn(&T) -> bool,
    {
        if pattern.is_empty() {
            let before = self.values.len();
            self.values.retain(|v| !predicate(v));
            return self.values.len() < before;
        }

        let (first, rest) = split_first(pattern);

        match first {
            "+" => {
                if let Some(ref mut child) = self.single {
                    return child.remove(rest, predicate);
                }
            }
            "#" => {
                if let Some(ref mut child) = self.multi {
                    let before = child.values.len();
                    child.values.retain(|v| !predicate(v));
                    return child.values.len() < before;
                }
            }
            segment => {
                if let Some(child) = self.children.get_mut(segment) {
                    return child.remove(rest, predicate);
                }
            }
        }

        false
    }

    fn has_pattern(&self, pattern: &str) -> bool {
        if pattern.is_empty() {
            return !self.values.is_empty();
        }

        let (first, rest) = split_first(pattern);

        match first {
            "+" => self
                .single
                .as_ref()
                .map_or(false, |child| child.has_pattern(rest)),
            "#" => self
                .multi
                .as_ref()
                .map_or(false, |child| !child.values.is_empty()),
            segment => self
                .children
                .get(segment)
                .map_or(false, |child| child.has_pattern(rest)),
        }
    }
}

/// Split a path into (first_segment, rest).
///
/// `"articles/list"` -> `("articles", "list")`
/// `"articles"` -> `("articles", "")`
/// `""` -> `("", "")`
fn split_first(path: &str) -> (&str, &str) {
    match path.find('/') {
        Some(idx) => (&path[..idx], &path[idx + 1..]),
        None => (path, ""),
    }
}

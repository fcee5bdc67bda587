//! Patterns - ordered sequences of typed primitives
//!
//! A pattern is the unit of input to the discrimination network. It is
//! also what a link tests and what a node's image holds. Patterns are
//! compared item by item: a test pattern *matches* an input when it is a
//! prefix of it.
//!
//! A pattern can be marked finished. A finished pattern used as a test
//! only matches an input of exactly the same length, so the empty finished
//! pattern is the "nothing more" marker.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Input channel a pattern belongs to. Each modality has its own network
/// root and its own short-term memory.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Modality {
    Visual,
    Verbal,
    Action,
}

impl Modality {
    /// All modalities, in index order.
    pub const ALL: [Modality; 3] = [Modality::Visual, Modality::Verbal, Modality::Action];

    /// Dense index, used to address per-modality tables.
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Modality::Visual => 0,
            Modality::Verbal => 1,
            Modality::Action => 2,
        }
    }
}

impl fmt::Display for Modality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Modality::Visual => "visual",
            Modality::Verbal => "verbal",
            Modality::Action => "action",
        };
        f.write_str(name)
    }
}

/// An item at a location, e.g. a piece on a board square.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ItemSquare {
    pub item: String,
    pub col: i32,
    pub row: i32,
}

impl ItemSquare {
    pub fn new(item: impl Into<String>, col: i32, row: i32) -> Self {
        Self {
            item: item.into(),
            col,
            row,
        }
    }
}

impl fmt::Display for ItemSquare {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{} {} {}]", self.item, self.col, self.row)
    }
}

/// A single feature.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Primitive {
    Token(String),
    Number(i64),
    ItemSquare(ItemSquare),
}

impl Primitive {
    pub fn token(value: impl Into<String>) -> Self {
        Primitive::Token(value.into())
    }

    pub fn item_square(item: impl Into<String>, col: i32, row: i32) -> Self {
        Primitive::ItemSquare(ItemSquare::new(item, col, row))
    }

    /// The item-on-square payload, if this is one.
    pub fn as_item_square(&self) -> Option<&ItemSquare> {
        match self {
            Primitive::ItemSquare(is) => Some(is),
            _ => None,
        }
    }
}

impl From<ItemSquare> for Primitive {
    fn from(is: ItemSquare) -> Self {
        Primitive::ItemSquare(is)
    }
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Primitive::Token(t) => f.write_str(t),
            Primitive::Number(n) => write!(f, "{}", n),
            Primitive::ItemSquare(is) => is.fmt(f),
        }
    }
}

/// An ordered sequence of primitives in one modality.
///
/// Equality compares modality and items only; the finished flag is not
/// part of a pattern's identity.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Pattern {
    modality: Modality,
    items: Vec<Primitive>,
    finished: bool,
}

impl Pattern {
    /// Create an empty, unfinished pattern.
    pub fn new(modality: Modality) -> Self {
        Self {
            modality,
            items: Vec::new(),
            finished: false,
        }
    }

    /// Create an unfinished pattern from items.
    pub fn from_items(modality: Modality, items: impl IntoIterator<Item = Primitive>) -> Self {
        Self {
            modality,
            items: items.into_iter().collect(),
            finished: false,
        }
    }

    /// Create a pattern of plain tokens.
    pub fn tokens<S: AsRef<str>>(modality: Modality, tokens: &[S]) -> Self {
        Self::from_items(modality, tokens.iter().map(|t| Primitive::token(t.as_ref())))
    }

    /// Create a visual pattern of items on squares.
    pub fn item_squares(items: impl IntoIterator<Item = ItemSquare>) -> Self {
        Self::from_items(Modality::Visual, items.into_iter().map(Primitive::from))
    }

    /// The empty finished pattern: matches only when nothing remains.
    pub fn end_marker(modality: Modality) -> Self {
        Self {
            modality,
            items: Vec::new(),
            finished: true,
        }
    }

    #[inline]
    pub fn modality(&self) -> Modality {
        self.modality
    }

    #[inline]
    pub fn items(&self) -> &[Primitive] {
        &self.items
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[inline]
    pub fn first(&self) -> Option<&Primitive> {
        self.items.first()
    }

    #[inline]
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Is this the "nothing more" marker?
    pub fn is_end_marker(&self) -> bool {
        self.finished && self.items.is_empty()
    }

    /// Mark finished. Finished patterns are immutable.
    pub fn finish(&mut self) {
        self.finished = true;
    }

    /// Builder form of [`Pattern::finish`].
    pub fn finished(mut self) -> Self {
        self.finished = true;
        self
    }

    /// Append an item. Returns false (and leaves the pattern unchanged)
    /// if the pattern is finished.
    pub fn push(&mut self, item: Primitive) -> bool {
        if self.finished {
            return false;
        }
        self.items.push(item);
        true
    }

    /// Copy of this pattern with one more item, unfinished.
    pub fn append(&self, item: Primitive) -> Self {
        let mut items = self.items.clone();
        items.push(item);
        Self {
            modality: self.modality,
            items,
            finished: false,
        }
    }

    /// This pattern followed by `other`. The result takes `other`'s
    /// finished flag.
    pub fn concat(&self, other: &Pattern) -> Self {
        let mut items = self.items.clone();
        items.extend(other.items.iter().cloned());
        Self {
            modality: self.modality,
            items,
            finished: other.finished,
        }
    }

    /// Does this pattern, used as a test, pass `input`?
    ///
    /// Same modality and a prefix of `input`; a finished test must also
    /// have exactly `input`'s length. The input's own finished flag plays
    /// no part.
    pub fn matches(&self, input: &Pattern) -> bool {
        if self.modality != input.modality {
            return false;
        }
        if self.finished {
            if self.items.len() != input.items.len() {
                return false;
            }
        } else if self.items.len() > input.items.len() {
            return false;
        }
        self.items.iter().zip(&input.items).all(|(a, b)| a == b)
    }

    /// Is this pattern a strict prefix of `other`?
    pub fn is_strict_prefix_of(&self, other: &Pattern) -> bool {
        self.modality == other.modality
            && self.items.len() < other.items.len()
            && self.items.iter().zip(&other.items).all(|(a, b)| a == b)
    }

    /// What is left of this pattern once the leading items it shares with
    /// `prefix` are stripped.
    ///
    /// A finished prefix that consumes everything also consumes the
    /// finished flag, so the result cannot pass the end marker twice.
    pub fn remove(&self, prefix: &Pattern) -> Self {
        let shared = self
            .items
            .iter()
            .zip(&prefix.items)
            .take_while(|(a, b)| a == b)
            .count();
        let items: Vec<Primitive> = self.items[shared..].to_vec();
        let finished = if items.is_empty() {
            self.finished && !(prefix.finished && shared == prefix.items.len())
        } else {
            self.finished
        };
        Self {
            modality: self.modality,
            items,
            finished,
        }
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.modality == other.modality && self.items == other.items
    }
}

impl Eq for Pattern {}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<")?;
        for item in &self.items {
            write!(f, " {}", item)?;
        }
        if self.finished {
            f.write_str(" $")?;
        }
        f.write_str(" >")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn verbal(tokens: &[&str]) -> Pattern {
        Pattern::tokens(Modality::Verbal, tokens)
    }

    #[test]
    fn test_prefix_matches() {
        let test = verbal(&["A", "B"]);
        assert!(test.matches(&verbal(&["A", "B", "C"])));
        assert!(test.matches(&verbal(&["A", "B"])));
        assert!(!test.matches(&verbal(&["A"])));
        assert!(!test.matches(&verbal(&["B", "A", "C"])));
        assert!(Pattern::new(Modality::Verbal).matches(&verbal(&["X"])));
    }

    #[test]
    fn test_modality_must_agree() {
        let test = Pattern::tokens(Modality::Visual, &["A"]);
        assert!(!test.matches(&verbal(&["A"])));
        assert_ne!(test, verbal(&["A"]));
    }

    #[test]
    fn test_finished_test_requires_exact_length() {
        let test = verbal(&["A"]).finished();
        assert!(test.matches(&verbal(&["A"])));
        assert!(test.matches(&verbal(&["A"]).finished()));
        assert!(!test.matches(&verbal(&["A", "B"])));
        assert!(!test.matches(&verbal(&["A", "B"]).finished()));

        let marker = Pattern::end_marker(Modality::Verbal);
        assert!(marker.matches(&Pattern::new(Modality::Verbal)));
        assert!(!marker.matches(&verbal(&["A"])));
    }

    #[test]
    fn test_remove_prefix() {
        let rest = verbal(&["A", "B", "C"]).remove(&verbal(&["A", "B"]));
        assert_eq!(rest, verbal(&["C"]));

        let rest = verbal(&["A", "B"]).remove(&verbal(&["X"]));
        assert_eq!(rest, verbal(&["A", "B"]));
    }

    #[test]
    fn test_remove_consumes_end_marker() {
        let input = verbal(&["A"]).finished();
        let rest = input.remove(&verbal(&["A"]));
        assert!(rest.is_empty());
        assert!(rest.is_finished());

        let rest = rest.remove(&Pattern::end_marker(Modality::Verbal));
        assert!(rest.is_empty());
        assert!(!rest.is_finished());
    }

    #[test]
    fn test_finished_is_immutable() {
        let mut p = verbal(&["A"]).finished();
        assert!(!p.push(Primitive::token("B")));
        assert_eq!(p.len(), 1);
        // Equality ignores the flag.
        assert_eq!(p, verbal(&["A"]));
    }

    #[test]
    fn test_display() {
        let p = Pattern::item_squares([ItemSquare::new("P", 1, 2)]).finished();
        assert_eq!(p.to_string(), "< [P 1 2] $ >");
    }
}

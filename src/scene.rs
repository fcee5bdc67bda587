//! Scenes - 2-D grids of named objects
//!
//! A scene is what the model looks at and what a visual-spatial field
//! renders back out. Each square holds one object: an identifier and a
//! class. A handful of reserved class tokens mark squares that do not
//! hold a real object.

use std::collections::HashMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{ChrestError, ChrestResult};
use crate::pattern::{ItemSquare, Pattern};

/// Square that was never observable.
pub const BLIND_SQUARE_TOKEN: &str = "*";

/// Square observed to be vacant.
pub const EMPTY_SQUARE_TOKEN: &str = ".";

/// The observer's own position.
pub const CREATOR_TOKEN: &str = "SELF";

/// Square observed once whose memory has since decayed.
pub const UNKNOWN_SQUARE_TOKEN: &str = "?";

/// Prefix of identifiers given to inferred, unobserved objects.
pub const GHOST_ID_PREFIX: &str = "ghost-";

/// The contents of one square.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SceneObject {
    identifier: String,
    object_class: String,
}

impl SceneObject {
    pub fn new(identifier: impl Into<String>, object_class: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            object_class: object_class.into(),
        }
    }

    pub fn blind() -> Self {
        Self::new(BLIND_SQUARE_TOKEN, BLIND_SQUARE_TOKEN)
    }

    pub fn empty() -> Self {
        Self::new(EMPTY_SQUARE_TOKEN, EMPTY_SQUARE_TOKEN)
    }

    pub fn unknown() -> Self {
        Self::new(UNKNOWN_SQUARE_TOKEN, UNKNOWN_SQUARE_TOKEN)
    }

    #[inline]
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    #[inline]
    pub fn object_class(&self) -> &str {
        &self.object_class
    }

    pub fn is_blind(&self) -> bool {
        self.object_class == BLIND_SQUARE_TOKEN
    }

    pub fn is_empty(&self) -> bool {
        self.object_class == EMPTY_SQUARE_TOKEN
    }

    pub fn is_unknown(&self) -> bool {
        self.object_class == UNKNOWN_SQUARE_TOKEN
    }

    pub fn is_creator(&self) -> bool {
        self.object_class == CREATOR_TOKEN
    }

    /// A real object: not blind, empty or unknown.
    pub fn is_concrete(&self) -> bool {
        !(self.is_blind() || self.is_empty() || self.is_unknown())
    }
}

/// A named rectangular grid of squares, addressed by (col, row).
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Scene {
    name: String,
    width: usize,
    height: usize,
    /// Column-major: index = col * height + row.
    squares: Vec<SceneObject>,
}

impl Scene {
    /// Create a scene with every square blind.
    pub fn new(name: impl Into<String>, width: usize, height: usize) -> Self {
        Self {
            name: name.into(),
            width,
            height,
            squares: vec![SceneObject::blind(); width * height],
        }
    }

    /// Scene over column-major `squares`; short input is padded blind.
    pub(crate) fn from_columns(
        name: impl Into<String>,
        width: usize,
        height: usize,
        squares: impl IntoIterator<Item = SceneObject>,
    ) -> Self {
        let mut squares: Vec<SceneObject> = squares.into_iter().take(width * height).collect();
        squares.resize(width * height, SceneObject::blind());
        Self {
            name: name.into(),
            width,
            height,
            squares,
        }
    }

    /// Build a scene from text rows, top row first in `rows[0]` holding
    /// row index `height - 1`. Tokens are whitespace separated: `*` blind,
    /// `.` empty, otherwise `identifier:class`.
    pub fn from_rows<S: AsRef<str>>(name: impl Into<String>, rows: &[S]) -> ChrestResult<Self> {
        let height = rows.len();
        let width = rows
            .iter()
            .map(|r| r.as_ref().split_whitespace().count())
            .max()
            .unwrap_or(0);
        let mut scene = Self::new(name, width, height);

        for (i, line) in rows.iter().enumerate() {
            let row = (height - 1 - i) as i32;
            for (col, token) in line.as_ref().split_whitespace().enumerate() {
                let object = match token {
                    BLIND_SQUARE_TOKEN => SceneObject::blind(),
                    EMPTY_SQUARE_TOKEN => SceneObject::empty(),
                    _ => match token.split_once(':') {
                        Some((id, class)) => SceneObject::new(id, class),
                        None => {
                            return Err(ChrestError::config(format!(
                                "scene token {:?} is not identifier:class",
                                token
                            )))
                        }
                    },
                };
                scene.set(col as i32, row, object)?;
            }
        }
        Ok(scene)
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    pub fn in_bounds(&self, col: i32, row: i32) -> bool {
        col >= 0 && row >= 0 && (col as usize) < self.width && (row as usize) < self.height
    }

    fn index(&self, col: i32, row: i32) -> Option<usize> {
        self.in_bounds(col, row)
            .then(|| col as usize * self.height + row as usize)
    }

    /// Object on a square, `None` outside the scene.
    pub fn get(&self, col: i32, row: i32) -> Option<&SceneObject> {
        self.index(col, row).map(|i| &self.squares[i])
    }

    /// Replace a square's contents.
    pub fn set(&mut self, col: i32, row: i32, object: SceneObject) -> ChrestResult<()> {
        let i = self
            .index(col, row)
            .ok_or(ChrestError::OutOfBounds { col, row })?;
        self.squares[i] = object;
        Ok(())
    }

    pub fn add_object(
        &mut self,
        col: i32,
        row: i32,
        identifier: impl Into<String>,
        object_class: impl Into<String>,
    ) -> ChrestResult<()> {
        self.set(col, row, SceneObject::new(identifier, object_class))
    }

    pub fn add_empty(&mut self, col: i32, row: i32) -> ChrestResult<()> {
        self.set(col, row, SceneObject::empty())
    }

    /// Squares with their coordinates, column-major.
    pub fn squares(&self) -> impl Iterator<Item = (i32, i32, &SceneObject)> + '_ {
        let height = self.height;
        self.squares.iter().enumerate().map(move |(i, o)| {
            ((i / height.max(1)) as i32, (i % height.max(1)) as i32, o)
        })
    }

    pub fn is_entirely_blind(&self) -> bool {
        self.squares.iter().all(SceneObject::is_blind)
    }

    /// Coordinates of the first square holding `identifier`.
    pub fn locate(&self, identifier: &str) -> Option<(i32, i32)> {
        self.squares()
            .find(|(_, _, o)| o.is_concrete() && o.identifier() == identifier)
            .map(|(c, r, _)| (c, r))
    }

    /// Visual pattern of the real, non-creator objects within `radius`
    /// squares of (col, row), column-major.
    pub fn objects_in_view(&self, col: i32, row: i32, radius: i32) -> Pattern {
        let items = (col - radius..=col + radius).flat_map(|c| {
            (row - radius..=row + radius).filter_map(move |r| {
                self.get(c, r)
                    .filter(|o| o.is_concrete() && !o.is_creator())
                    .map(|o| ItemSquare::new(o.object_class(), c, r))
            })
        });
        Pattern::item_squares(items)
    }

    /// Identifiers used by more than one real object.
    pub fn duplicate_identifiers(&self) -> Vec<String> {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for o in self.squares.iter().filter(|o| o.is_concrete()) {
            *counts.entry(o.identifier()).or_insert(0) += 1;
        }
        let mut dups: Vec<String> = counts
            .into_iter()
            .filter(|&(_, n)| n > 1)
            .map(|(id, _)| id.to_string())
            .collect();
        dups.sort();
        dups
    }

    // =========================================================================
    // COMPARISON
    // =========================================================================

    fn check_dimensions(&self, other: &Scene) -> ChrestResult<()> {
        if self.width != other.width || self.height != other.height {
            return Err(ChrestError::DimensionMismatch {
                width: self.width,
                height: self.height,
                other_width: other.width,
                other_height: other.height,
            });
        }
        Ok(())
    }

    /// Real objects that count in comparisons (the creator does not).
    fn counted(o: &SceneObject) -> bool {
        o.is_concrete() && !o.is_creator()
    }

    /// Squares where both scenes hold a counted object of the same class.
    fn correct_placements(&self, reproduction: &Scene) -> usize {
        self.squares
            .iter()
            .zip(&reproduction.squares)
            .filter(|(a, b)| Self::counted(a) && Self::counted(b) && a.object_class == b.object_class)
            .count()
    }

    fn object_count(&self) -> usize {
        self.squares.iter().filter(|o| Self::counted(o)).count()
    }

    /// Fraction of this scene's objects the reproduction placed correctly.
    pub fn recall(&self, reproduction: &Scene) -> ChrestResult<f64> {
        self.check_dimensions(reproduction)?;
        let total = self.object_count();
        if total == 0 {
            return Ok(0.0);
        }
        Ok(self.correct_placements(reproduction) as f64 / total as f64)
    }

    /// Fraction of the reproduction's objects that are correct.
    pub fn precision(&self, reproduction: &Scene) -> ChrestResult<f64> {
        self.check_dimensions(reproduction)?;
        let total = reproduction.object_count();
        if total == 0 {
            return Ok(0.0);
        }
        Ok(self.correct_placements(reproduction) as f64 / total as f64)
    }

    /// Objects in this scene the reproduction does not have in place.
    pub fn errors_of_omission(&self, reproduction: &Scene) -> ChrestResult<usize> {
        self.check_dimensions(reproduction)?;
        Ok(self.object_count() - self.correct_placements(reproduction))
    }

    /// Objects in the reproduction that this scene does not have in place.
    pub fn errors_of_commission(&self, reproduction: &Scene) -> ChrestResult<usize> {
        self.check_dimensions(reproduction)?;
        Ok(reproduction.object_count() - self.correct_placements(reproduction))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board() -> Scene {
        Scene::from_rows(
            "board",
            &[
                "a:A .   *", //
                ".   b:B .",
                "c:C .   s:SELF",
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_from_rows_layout() {
        let s = board();
        assert_eq!((s.width(), s.height()), (3, 3));
        assert_eq!(s.get(0, 2).unwrap().identifier(), "a");
        assert_eq!(s.get(0, 0).unwrap().object_class(), "C");
        assert!(s.get(2, 2).unwrap().is_blind());
        assert!(s.get(1, 0).unwrap().is_empty());
        assert!(s.get(2, 0).unwrap().is_creator());
        assert_eq!(s.get(3, 0), None);
        assert_eq!(s.locate("b"), Some((1, 1)));
    }

    #[test]
    fn test_bad_token_rejected() {
        assert!(Scene::from_rows("x", &["oops"]).is_err());
    }

    #[test]
    fn test_set_out_of_bounds() {
        let mut s = Scene::new("s", 2, 2);
        assert!(s.is_entirely_blind());
        assert_eq!(
            s.add_empty(2, 0),
            Err(ChrestError::OutOfBounds { col: 2, row: 0 })
        );
    }

    #[test]
    fn test_objects_in_view_skips_sentinels_and_creator() {
        let s = board();
        let p = s.objects_in_view(1, 1, 1);
        let items: Vec<_> = p
            .items()
            .iter()
            .filter_map(|i| i.as_item_square().cloned())
            .collect();
        assert_eq!(
            items,
            vec![
                ItemSquare::new("C", 0, 0),
                ItemSquare::new("A", 0, 2),
                ItemSquare::new("B", 1, 1),
            ]
        );
        assert_eq!(s.objects_in_view(0, 0, 0).len(), 1);
    }

    #[test]
    fn test_duplicate_identifiers() {
        let s = Scene::from_rows("d", &["x:A x:B y:A ."]).unwrap();
        assert_eq!(s.duplicate_identifiers(), vec!["x".to_string()]);
        assert!(board().duplicate_identifiers().is_empty());
    }

    #[test]
    fn test_recall_precision_and_errors() {
        let original = board();
        let mut reproduction = Scene::new("r", 3, 3);
        reproduction.add_object(0, 2, "a", "A").unwrap();
        reproduction.add_object(1, 1, "z", "Z").unwrap();

        assert!((original.recall(&reproduction).unwrap() - 1.0 / 3.0).abs() < 1e-12);
        assert!((original.precision(&reproduction).unwrap() - 0.5).abs() < 1e-12);
        assert_eq!(original.errors_of_omission(&reproduction).unwrap(), 2);
        assert_eq!(original.errors_of_commission(&reproduction).unwrap(), 1);
    }

    #[test]
    fn test_comparison_dimension_mismatch() {
        let original = board();
        let small = Scene::new("small", 2, 3);
        assert!(matches!(
            original.recall(&small),
            Err(ChrestError::DimensionMismatch { width: 3, other_width: 2, .. })
        ));
        assert!(original.errors_of_commission(&small).is_err());
    }
}

//! Visual-spatial field objects - one remembered thing on one square
//!
//! An object is born at `time_created` and is live until its terminus.
//! A terminus of `None` means the object never decays (blind squares, the
//! observer). Objects are never removed from a field; they are closed by
//! lowering their terminus and superseded by a fresh instance.
//!
//! Whether an object is recognised can change over its life, so the
//! status is kept as a history of (time, recognised) switches.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::clock::Time;
use crate::scene::{SceneObject, BLIND_SQUARE_TOKEN, CREATOR_TOKEN, EMPTY_SQUARE_TOKEN};

/// A remembered object in a visual-spatial field.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct VisualSpatialFieldObject {
    identifier: String,
    object_class: String,
    time_created: Time,
    terminus: Option<Time>,
    ghost: bool,
    /// Recognition switches, ascending by time.
    recognition: Vec<(Time, bool)>,
}

impl VisualSpatialFieldObject {
    /// Create a live object. `lifespan` of `None` makes it eternal.
    pub fn new(
        identifier: impl Into<String>,
        object_class: impl Into<String>,
        time_created: Time,
        recognised: bool,
        ghost: bool,
        lifespan: Option<Time>,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            object_class: object_class.into(),
            time_created,
            terminus: lifespan.map(|l| time_created + l),
            ghost,
            recognition: vec![(time_created, recognised)],
        }
    }

    /// Permanent placeholder for a square that was never observable.
    pub fn blind(time_created: Time) -> Self {
        Self::new(
            BLIND_SQUARE_TOKEN,
            BLIND_SQUARE_TOKEN,
            time_created,
            false,
            false,
            None,
        )
    }

    /// Placeholder for a square observed to be vacant.
    pub fn empty(time_created: Time, lifespan: Time) -> Self {
        Self::new(
            EMPTY_SQUARE_TOKEN,
            EMPTY_SQUARE_TOKEN,
            time_created,
            false,
            false,
            Some(lifespan),
        )
    }

    #[inline]
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    #[inline]
    pub fn object_class(&self) -> &str {
        &self.object_class
    }

    #[inline]
    pub fn time_created(&self) -> Time {
        self.time_created
    }

    #[inline]
    pub fn terminus(&self) -> Option<Time> {
        self.terminus
    }

    #[inline]
    pub fn is_ghost(&self) -> bool {
        self.ghost
    }

    pub fn is_blind(&self) -> bool {
        self.object_class == BLIND_SQUARE_TOKEN
    }

    pub fn is_empty_square(&self) -> bool {
        self.object_class == EMPTY_SQUARE_TOKEN
    }

    pub fn is_creator(&self) -> bool {
        self.object_class == CREATOR_TOKEN
    }

    /// A real object rather than a blind or empty placeholder.
    pub fn is_concrete(&self) -> bool {
        !(self.is_blind() || self.is_empty_square())
    }

    /// Live at `time`: created at or before it and not yet terminated.
    pub fn is_alive(&self, time: Time) -> bool {
        self.time_created <= time && self.terminus.map_or(true, |t| time < t)
    }

    /// Recognition status at `time`. False before creation.
    pub fn is_recognised(&self, time: Time) -> bool {
        self.recognition
            .iter()
            .rev()
            .find(|&&(t, _)| t <= time)
            .map_or(false, |&(_, r)| r)
    }

    /// Recognition switches, oldest first.
    pub fn recognition_history(&self) -> &[(Time, bool)] {
        &self.recognition
    }

    /// The square this object renders as in a scene.
    pub fn to_scene_object(&self) -> SceneObject {
        SceneObject::new(self.identifier.clone(), self.object_class.clone())
    }

    /// Close the object at `time`. An object that has already decayed
    /// keeps its earlier terminus.
    pub(crate) fn terminate(&mut self, time: Time) {
        self.terminus = Some(self.terminus.map_or(time, |t| t.min(time)));
    }

    /// Touch the object at `time`: push its terminus out to a full
    /// lifespan from now, never pulling it in. Eternal objects are
    /// unaffected.
    pub(crate) fn refresh(&mut self, time: Time, lifespan: Time) {
        if let Some(t) = self.terminus {
            self.terminus = Some(t.max(time + lifespan));
        }
    }

    /// Switch recognition status at `time` and restart its lifespan.
    pub(crate) fn set_recognised(&mut self, time: Time, recognised: bool, lifespan: Time) {
        if self.is_recognised(time) != recognised {
            self.recognition.push((time, recognised));
        }
        if self.terminus.is_some() {
            self.terminus = Some(time + lifespan);
        }
    }
}

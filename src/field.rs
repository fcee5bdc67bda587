//! Visual-spatial field - a time-indexed memory of a scene
//!
//! Every square keeps an append-only log of the objects remembered there.
//! Nothing is edited in place except termini: an object that moves or
//! decays is closed, and whatever replaces it is appended. Queries at a
//! time `t` resolve each square to the latest logged object live at `t`,
//! so asking about the past and the future is always consistent.
//!
//! A field is built once from a scene, using the model to recognise
//! chunks, and is afterwards changed only by moving objects.

use std::collections::HashSet;

use tracing::{debug, trace};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::clock::Time;
use crate::config::{FieldOptions, FieldTimings};
use crate::error::{ChrestError, ChrestResult};
use crate::model::Chrest;
use crate::object::VisualSpatialFieldObject;
use crate::pattern::Modality;
use crate::perception::FixationStrategy;
use crate::scene::{Scene, SceneObject, GHOST_ID_PREFIX};

/// A remembered, decaying rendition of a scene.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct VisualSpatialField {
    name: String,
    width: usize,
    height: usize,
    creation_time: Time,
    pub(crate) timings: FieldTimings,
    options: FieldOptions,
    encoded_scene: Scene,
    /// Per-square logs, column-major: index = col * height + row.
    pub(crate) log: Vec<Vec<VisualSpatialFieldObject>>,
}

/// An object waiting to be written by the chunk pass.
enum Pending {
    Seen(usize, SceneObject),
    Ghost(usize, String),
}

impl VisualSpatialField {
    /// Fixate `scene`, then encode what was recognised and seen.
    ///
    /// Encoding order is: the creator (if asked for, free of charge),
    /// recognised chunks oldest first, leftover objects, empty squares.
    /// Squares nothing was written to stay blind forever. Attention is
    /// busy until the last item is encoded.
    ///
    /// Fails without touching the model if attention is busy at `time`,
    /// the timings are invalid, or two objects in the scene share an
    /// identifier.
    pub fn new(
        model: &mut Chrest,
        scene: &Scene,
        timings: FieldTimings,
        options: FieldOptions,
        strategy: &mut dyn FixationStrategy,
        time: Time,
    ) -> ChrestResult<Self> {
        timings.validate()?;
        if !model.clocks().attention_free_at(time) {
            return Err(ChrestError::AttentionBusy {
                requested: time,
                free_at: model.attention_clock(),
            });
        }
        if let Some(identifier) = scene.duplicate_identifiers().into_iter().next() {
            return Err(ChrestError::DuplicateIdentifier { identifier });
        }

        let mut field = Self {
            name: scene.name().to_string(),
            width: scene.width(),
            height: scene.height(),
            creation_time: time,
            timings,
            options,
            encoded_scene: scene.clone(),
            log: vec![Vec::new(); scene.width() * scene.height()],
        };

        if scene.is_entirely_blind() {
            debug!(scene = scene.name(), "scene entirely blind, nothing encoded");
            field.width = 0;
            field.height = 0;
            field.log.clear();
            return Ok(field);
        }

        model.stm_mut(Modality::Visual).clear();
        let fixations = model.scan_scene(scene, options.number_fixations, strategy, time);

        let finished_at = field.encode(model, scene, time);
        model.consume_attention(finished_at);

        debug!(
            scene = scene.name(),
            fixations = fixations.len(),
            start = time,
            finished_at,
            "visual-spatial field encoded"
        );
        Ok(field)
    }

    /// Write the scene into the per-square logs. Returns the time encoding
    /// finished.
    fn encode(&mut self, model: &Chrest, scene: &Scene, time: Time) -> Time {
        let t = self.timings;

        for (col, row, object) in scene.squares() {
            if object.is_blind() {
                let idx = self.square_index(col, row);
                self.log[idx].push(VisualSpatialFieldObject::blind(time));
            }
        }

        let mut now = time + t.access_time;

        if self.options.encode_creator {
            if let Some((col, row, creator)) = scene.squares().find(|(_, _, o)| o.is_creator()) {
                let idx = self.square_index(col, row);
                self.log[idx].push(VisualSpatialFieldObject::new(
                    creator.identifier(),
                    creator.object_class(),
                    now,
                    false,
                    false,
                    None,
                ));
            }
        }

        // Identifiers of every real object written so far.
        let mut encoded: HashSet<String> = HashSet::new();
        let mut ghosted: HashSet<(String, i32, i32)> = HashSet::new();
        let mut ghost_count = 0usize;

        let chunks: Vec<_> = model.stm(Modality::Visual).iter().rev().collect();
        for chunk in chunks {
            let Some(node) = model.node(chunk) else {
                continue;
            };
            if model.ltm().is_root(chunk) || node.image().is_empty() {
                continue;
            }

            let mut pending = Vec::new();
            let mut again = Vec::new();
            for item in node.image().items().iter().filter_map(|i| i.as_item_square()) {
                let Some(square) = scene.get(item.col, item.row) else {
                    continue;
                };
                let idx = self.square_index(item.col, item.row);
                if square.is_concrete() && !square.is_creator() {
                    if square.object_class() != item.item {
                        continue;
                    }
                    if encoded.contains(square.identifier()) {
                        again.push((idx, square.identifier().to_string()));
                    } else {
                        encoded.insert(square.identifier().to_string());
                        pending.push(Pending::Seen(idx, square.clone()));
                    }
                } else if self.options.encode_ghost_objects
                    && (square.is_blind() || square.is_empty())
                    && ghosted.insert((item.item.clone(), item.col, item.row))
                {
                    pending.push(Pending::Ghost(idx, item.item.clone()));
                }
            }

            if !pending.is_empty() {
                now += t.object_encoding_time;
            }
            for p in pending {
                let (idx, object) = match p {
                    Pending::Seen(idx, o) => (
                        idx,
                        VisualSpatialFieldObject::new(
                            o.identifier(),
                            o.object_class(),
                            now,
                            true,
                            false,
                            Some(t.recognised_object_lifespan),
                        ),
                    ),
                    Pending::Ghost(idx, class) => {
                        let identifier = loop {
                            ghost_count += 1;
                            let id = format!("{}{}", GHOST_ID_PREFIX, ghost_count);
                            // Real objects may already use the name.
                            if scene.locate(&id).is_none() {
                                break id;
                            }
                        };
                        (
                            idx,
                            VisualSpatialFieldObject::new(
                                identifier,
                                class,
                                now,
                                true,
                                true,
                                Some(t.recognised_object_lifespan),
                            ),
                        )
                    }
                };
                trace!(id = object.identifier(), time = now, "recognised object encoded");
                self.log[idx].push(object);
            }

            // Recognised again by a later chunk.
            for (idx, id) in again {
                if let Some(o) = self.log[idx]
                    .iter_mut()
                    .rev()
                    .find(|o| o.identifier() == id && o.is_alive(now))
                {
                    o.set_recognised(now, true, t.recognised_object_lifespan);
                }
            }
        }

        for (col, row, object) in scene.squares() {
            if !object.is_concrete() || object.is_creator() || encoded.contains(object.identifier()) {
                continue;
            }
            now += t.object_encoding_time;
            let idx = self.square_index(col, row);
            encoded.insert(object.identifier().to_string());
            trace!(id = object.identifier(), time = now, "unrecognised object encoded");
            self.log[idx].push(VisualSpatialFieldObject::new(
                object.identifier(),
                object.object_class(),
                now,
                false,
                false,
                Some(t.unrecognised_object_lifespan),
            ));
        }

        for (col, row, object) in scene.squares() {
            let idx = self.square_index(col, row);
            if object.is_empty() && self.log[idx].is_empty() {
                now += t.empty_square_encoding_time;
                self.log[idx].push(VisualSpatialFieldObject::empty(now, t.unrecognised_object_lifespan));
            }
        }

        for square in self.log.iter_mut().filter(|s| s.is_empty()) {
            square.push(VisualSpatialFieldObject::blind(time));
        }

        now
    }

    // =========================================================================
    // GEOMETRY
    // =========================================================================

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

    /// Time the field was requested; attention was first used then.
    #[inline]
    pub fn creation_time(&self) -> Time {
        self.creation_time
    }

    #[inline]
    pub fn timings(&self) -> &FieldTimings {
        &self.timings
    }

    #[inline]
    pub fn options(&self) -> &FieldOptions {
        &self.options
    }

    /// The scene the field was built from.
    #[inline]
    pub fn encoded_scene(&self) -> &Scene {
        &self.encoded_scene
    }

    pub fn in_bounds(&self, col: i32, row: i32) -> bool {
        col >= 0 && row >= 0 && (col as usize) < self.width && (row as usize) < self.height
    }

    pub(crate) fn index(&self, col: i32, row: i32) -> Option<usize> {
        self.in_bounds(col, row)
            .then(|| col as usize * self.height + row as usize)
    }

    /// Index of a square known to be in bounds.
    fn square_index(&self, col: i32, row: i32) -> usize {
        col as usize * self.height + row as usize
    }

    // =========================================================================
    // QUERIES
    // =========================================================================

    /// Everything ever logged on a square, oldest first.
    pub fn square_log(&self, col: i32, row: i32) -> Option<&[VisualSpatialFieldObject]> {
        self.index(col, row).map(|i| self.log[i].as_slice())
    }

    /// Objects live on a square at `time`, oldest first.
    pub fn objects_on_square(&self, col: i32, row: i32, time: Time) -> Vec<&VisualSpatialFieldObject> {
        self.square_log(col, row)
            .map(|log| log.iter().filter(|o| o.is_alive(time)).collect())
            .unwrap_or_default()
    }

    /// Square holding a live, real object with `identifier` at `time`.
    pub fn locate(&self, identifier: &str, time: Time) -> Option<(i32, i32)> {
        let height = self.height.max(1);
        self.log.iter().enumerate().find_map(|(i, log)| {
            log.iter()
                .any(|o| o.is_concrete() && o.identifier() == identifier && o.is_alive(time))
                .then(|| ((i / height) as i32, (i % height) as i32))
        })
    }

    /// What one square shows at `time`.
    ///
    /// The latest live object wins. Ghosts are skipped unless asked for.
    /// With nothing live, a square that held something earlier is unknown;
    /// one that never did is blind.
    pub fn resolve(&self, col: i32, row: i32, time: Time, include_ghosts: bool) -> SceneObject {
        let Some(log) = self.square_log(col, row) else {
            return SceneObject::blind();
        };
        if let Some(o) = log
            .iter()
            .rev()
            .find(|o| o.is_alive(time) && (include_ghosts || !o.is_ghost()))
        {
            return o.to_scene_object();
        }
        if log.iter().any(|o| o.time_created() <= time) {
            SceneObject::unknown()
        } else {
            SceneObject::blind()
        }
    }

    /// Render the whole field at `time`.
    pub fn get_as_scene(&self, time: Time, include_ghosts: bool) -> Scene {
        let (width, height) = (self.width as i32, self.height as i32);
        let squares = (0..width).flat_map(|col| {
            (0..height).map(move |row| self.resolve(col, row, time, include_ghosts))
        });
        Scene::from_columns(self.name.clone(), self.width, self.height, squares)
    }
}

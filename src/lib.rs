//! CHREST-style chunking with a visual-spatial field
//!
//! Learning and perception are serialised through two simulated clocks.
//! Memories decay unless something refreshes them.
//!
//! # Core Types
//!
//! - **Chrest**: discrimination network, short-term memories and clocks
//! - **VisualSpatialField**: decaying, time-indexed memory of a scene
//!
//! # Architecture: Network / Field / Clocks
//!
//! 1. **Network** - patterns are sorted down a tree of tests; a node's
//!    image is the chunk it completes. Learning grows the tree
//!    (discrimination) or an image (familiarisation), one step per call.
//! 2. **Field** - fixations on a scene are recognised through the
//!    network; recognised chunks and loose objects are written into
//!    per-square logs with a lifespan, then moved around in batches.
//! 3. **Clocks** - the learning clock gates network growth (busy means
//!    silent no-op); the attention clock gates the field (busy means
//!    rejection).
//!
//! Time is always supplied by the caller. Nothing waits: a caller that
//! finds a resource busy tries again at a later time.
//!
//! # Example: Remember and Rearrange a Scene
//!
//! ```rust
//! use chrest_vsf::{
//!     Chrest, ChrestConfig, FieldOptions, FieldTimings, ItemSquare, Scene, ScanFixations,
//!     VisualSpatialField,
//! };
//!
//! // 1. A model and a scene to look at
//! let mut model = Chrest::new(ChrestConfig::default()).unwrap();
//! let scene = Scene::from_rows("desk", &[
//!     "cup:Cup .",
//!     ".       pen:Pen",
//! ]).unwrap();
//!
//! // 2. Build the field: fixate, recognise, encode
//! let timings = FieldTimings::new(25, 10, 100, 50, 10_000, 8_000);
//! let mut field = VisualSpatialField::new(
//!     &mut model,
//!     &scene,
//!     timings,
//!     FieldOptions::new(2),
//!     &mut ScanFixations,
//!     0,
//! ).unwrap();
//!
//! // Attention is busy until everything is encoded
//! let ready = model.attention_clock();
//! assert_eq!(ready, 100 + 25 * 2 + 10 * 2);
//!
//! // 3. Move the cup next to the pen
//! field.move_objects(&mut model, &[vec![
//!     ItemSquare::new("cup", 0, 1),
//!     ItemSquare::new("cup", 1, 1),
//! ]], ready).unwrap();
//!
//! let now = model.attention_clock();
//! assert_eq!(field.locate("cup", now), Some((1, 1)));
//!
//! // 4. Long after, everything has decayed
//! let later = field.get_as_scene(now + 1_000_000, true);
//! assert!(later.get(1, 1).unwrap().is_unknown());
//! ```

mod clock;
mod config;
mod error;
mod field;
mod model;
mod movement;
mod network;
mod object;
mod pattern;
mod perception;
mod reinforcement;
mod scene;
mod stm;

pub use clock::{Clocks, Time};
pub use config::{ChrestConfig, FieldOptions, FieldTimings};
pub use error::{ChrestError, ChrestResult, MoveViolation};
pub use field::VisualSpatialField;
pub use model::Chrest;
pub use network::{Link, Ltm, Node, NodeId};
pub use object::VisualSpatialFieldObject;
pub use pattern::{ItemSquare, Modality, Pattern, Primitive};
pub use perception::{Fixation, FixationStrategy, RandomFixations, ScanFixations};
pub use reinforcement::ReinforcementTheory;
pub use scene::{
    Scene, SceneObject, BLIND_SQUARE_TOKEN, CREATOR_TOKEN, EMPTY_SQUARE_TOKEN, GHOST_ID_PREFIX,
    UNKNOWN_SQUARE_TOKEN,
};
pub use stm::Stm;

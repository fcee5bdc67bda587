//! Model and field configuration

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::clock::Time;
use crate::error::{ChrestError, ChrestResult};
use crate::pattern::Modality;

/// Configuration for a model.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ChrestConfig {
    /// Time to add a node to the network.
    pub discrimination_time: Time,

    /// Time to extend a node's image by one item.
    pub familiarisation_time: Time,

    /// Time to add a visual-to-action link.
    pub add_link_time: Time,

    /// Short-term memory capacities per modality.
    pub visual_stm_capacity: usize,
    pub verbal_stm_capacity: usize,
    pub action_stm_capacity: usize,

    /// Radius, in squares, of what one fixation takes in.
    pub field_of_view: i32,
}

impl ChrestConfig {
    /// Create a standard configuration.
    pub fn new() -> Self {
        Self {
            discrimination_time: 10_000,
            familiarisation_time: 2_000,
            add_link_time: 10_000,
            visual_stm_capacity: 4,
            verbal_stm_capacity: 2,
            action_stm_capacity: 4,
            field_of_view: 2,
        }
    }

    /// Builder: set both learning costs.
    pub fn with_learning_times(mut self, discrimination: Time, familiarisation: Time) -> Self {
        self.discrimination_time = discrimination;
        self.familiarisation_time = familiarisation;
        self
    }

    /// Builder: set one capacity for every short-term memory.
    pub fn with_stm_capacity(mut self, capacity: usize) -> Self {
        self.visual_stm_capacity = capacity;
        self.verbal_stm_capacity = capacity;
        self.action_stm_capacity = capacity;
        self
    }

    pub fn stm_capacity(&self, modality: Modality) -> usize {
        match modality {
            Modality::Visual => self.visual_stm_capacity,
            Modality::Verbal => self.verbal_stm_capacity,
            Modality::Action => self.action_stm_capacity,
        }
    }

    /// Validate configuration.
    pub fn validate(&self) -> ChrestResult<()> {
        if self.discrimination_time < 0 || self.familiarisation_time < 0 || self.add_link_time < 0
        {
            return Err(ChrestError::config("learning times must be >= 0"));
        }
        if Modality::ALL.iter().any(|&m| self.stm_capacity(m) == 0) {
            return Err(ChrestError::config("stm capacity must be > 0"));
        }
        if self.field_of_view < 0 {
            return Err(ChrestError::config("field_of_view must be >= 0"));
        }
        Ok(())
    }
}

impl Default for ChrestConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Timing parameters of a visual-spatial field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FieldTimings {
    /// Cost of encoding one recognised chunk or one unrecognised object.
    pub object_encoding_time: Time,

    /// Cost of encoding one empty square.
    pub empty_square_encoding_time: Time,

    /// Cost of accessing the field before encoding or picking up.
    pub access_time: Time,

    /// Cost of putting an object down.
    pub object_movement_time: Time,

    /// How long a recognised object lives after its last refresh.
    pub recognised_object_lifespan: Time,

    /// How long an unrecognised object or empty square lives.
    pub unrecognised_object_lifespan: Time,
}

impl FieldTimings {
    pub fn new(
        object_encoding_time: Time,
        empty_square_encoding_time: Time,
        access_time: Time,
        object_movement_time: Time,
        recognised_object_lifespan: Time,
        unrecognised_object_lifespan: Time,
    ) -> Self {
        Self {
            object_encoding_time,
            empty_square_encoding_time,
            access_time,
            object_movement_time,
            recognised_object_lifespan,
            unrecognised_object_lifespan,
        }
    }

    /// Lifespan for an object with the given recognition status.
    #[inline]
    pub fn lifespan(&self, recognised: bool) -> Time {
        if recognised {
            self.recognised_object_lifespan
        } else {
            self.unrecognised_object_lifespan
        }
    }

    /// Validate timings.
    pub fn validate(&self) -> ChrestResult<()> {
        let costs = [
            self.object_encoding_time,
            self.empty_square_encoding_time,
            self.access_time,
            self.object_movement_time,
        ];
        if costs.iter().any(|&t| t < 0) {
            return Err(ChrestError::config("field costs must be >= 0"));
        }
        if self.recognised_object_lifespan <= 0 || self.unrecognised_object_lifespan <= 0 {
            return Err(ChrestError::config("object lifespans must be > 0"));
        }
        Ok(())
    }
}

impl Default for FieldTimings {
    fn default() -> Self {
        Self::new(25, 10, 100, 50, 10_000, 8_000)
    }
}

/// What to do when building a visual-spatial field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FieldOptions {
    /// Fixations to make on the scene before encoding.
    pub number_fixations: usize,

    /// Encode objects a recognised chunk predicts but the scene lacks.
    pub encode_ghost_objects: bool,

    /// Encode the observer's own position.
    pub encode_creator: bool,
}

impl FieldOptions {
    pub fn new(number_fixations: usize) -> Self {
        Self {
            number_fixations,
            encode_ghost_objects: false,
            encode_creator: false,
        }
    }

    pub fn with_ghost_objects(mut self, encode: bool) -> Self {
        self.encode_ghost_objects = encode;
        self
    }

    pub fn with_creator(mut self, encode: bool) -> Self {
        self.encode_creator = encode;
        self
    }
}

impl Default for FieldOptions {
    fn default() -> Self {
        Self::new(20)
    }
}

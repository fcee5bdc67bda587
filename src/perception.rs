//! Perception - fixating a scene and feeding what is seen to the network
//!
//! Where to look next is decided by a [`FixationStrategy`]. Domain
//! heuristics live outside this crate; two general strategies are
//! provided here.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::trace;

use crate::clock::Time;
use crate::model::Chrest;
use crate::network::NodeId;
use crate::pattern::Pattern;
use crate::scene::Scene;

/// Chooses the next square to fixate.
pub trait FixationStrategy {
    /// Propose the next fixation given the squares already fixated, or
    /// `None` to stop early.
    fn next_fixation(&mut self, scene: &Scene, history: &[(i32, i32)]) -> Option<(i32, i32)>;
}

/// Squares a fixation may usefully land on: real objects, not the
/// observer.
fn object_squares(scene: &Scene) -> Vec<(i32, i32)> {
    scene
        .squares()
        .filter(|(_, _, o)| o.is_concrete() && !o.is_creator())
        .map(|(c, r, _)| (c, r))
        .collect()
}

/// Visit every object square once, column-major.
#[derive(Clone, Copy, Debug, Default)]
pub struct ScanFixations;

impl FixationStrategy for ScanFixations {
    fn next_fixation(&mut self, scene: &Scene, history: &[(i32, i32)]) -> Option<(i32, i32)> {
        object_squares(scene)
            .into_iter()
            .find(|sq| !history.contains(sq))
    }
}

/// Jump to a random object square, never the one just fixated when there
/// is a choice.
#[derive(Clone, Debug)]
pub struct RandomFixations {
    rng: StdRng,
}

impl RandomFixations {
    /// Reproducible fixation sequence.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomFixations {
    fn default() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }
}

impl FixationStrategy for RandomFixations {
    fn next_fixation(&mut self, scene: &Scene, history: &[(i32, i32)]) -> Option<(i32, i32)> {
        let mut candidates = object_squares(scene);
        if candidates.len() > 1 {
            if let Some(last) = history.last() {
                candidates.retain(|sq| sq != last);
            }
        }
        candidates.choose(&mut self.rng).copied()
    }
}

/// One fixation and what it produced.
#[derive(Clone, Debug, PartialEq)]
pub struct Fixation {
    pub col: i32,
    pub row: i32,
    /// Objects in view, as presented to the network.
    pub pattern: Pattern,
    /// Node the pattern was recognised as.
    pub recognised: NodeId,
}

impl Chrest {
    /// Make up to `fixations` fixations on `scene` at `time`.
    ///
    /// Each fixation takes in every real object within the configured
    /// field of view and passes it through [`Chrest::recognise_and_learn`],
    /// so recognised chunks accumulate in visual short-term memory.
    /// Fixations that see nothing are recorded by the strategy but not
    /// returned.
    pub fn scan_scene(
        &mut self,
        scene: &Scene,
        fixations: usize,
        strategy: &mut dyn FixationStrategy,
        time: Time,
    ) -> Vec<Fixation> {
        let radius = self.config().field_of_view;
        let mut history = Vec::new();
        let mut made = Vec::new();

        for _ in 0..fixations {
            let Some((col, row)) = strategy.next_fixation(scene, &history) else {
                break;
            };
            history.push((col, row));

            let pattern = scene.objects_in_view(col, row, radius);
            if pattern.is_empty() {
                continue;
            }
            let recognised = self.recognise_and_learn(&pattern, time);
            trace!(col, row, %pattern, node = %recognised, "fixation");
            made.push(Fixation {
                col,
                row,
                pattern,
                recognised,
            });
        }
        made
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ChrestConfig;
    use crate::pattern::Modality;

    fn scene() -> Scene {
        Scene::from_rows("s", &["a:A . b:B", ". me:SELF .", "c:C . *"]).unwrap()
    }

    #[test]
    fn test_scan_visits_objects_column_major() {
        let s = scene();
        let mut strategy = ScanFixations;
        let mut history = Vec::new();
        while let Some(sq) = strategy.next_fixation(&s, &history) {
            history.push(sq);
        }
        assert_eq!(history, vec![(0, 0), (0, 2), (2, 2)]);
    }

    #[test]
    fn test_random_fixations_reproducible() {
        let s = scene();
        let run = |seed| {
            let mut strategy = RandomFixations::seeded(seed);
            let mut history = Vec::new();
            for _ in 0..10 {
                let sq = strategy.next_fixation(&s, &history).unwrap();
                history.push(sq);
            }
            history
        };
        let first = run(7);
        assert_eq!(first, run(7));
        for pair in first.windows(2) {
            assert_ne!(pair[0], pair[1]);
        }
    }

    #[test]
    fn test_scan_scene_fills_stm() {
        let mut m = Chrest::new(ChrestConfig::new().with_learning_times(10, 2)).unwrap();
        let s = scene();
        let made = m.scan_scene(&s, 5, &mut ScanFixations, 0);

        // Only three object squares to visit.
        assert_eq!(made.len(), 3);
        assert_eq!(made[0].pattern.len(), 3);
        assert!(!m.stm(Modality::Visual).is_empty());
        // First fixation learned a primitive, the rest found learning busy.
        assert_eq!(m.learning_clock(), 10);
        assert_eq!(m.ltm().size(Modality::Visual), 1);
    }
}

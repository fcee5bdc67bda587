//! The model - network, short-term memories and clocks together
//!
//! All learning goes through [`Chrest::recognise_and_learn`]. Lookup is
//! always allowed; learning only happens when the learning clock is free
//! at the time supplied, and then charges its cost to that clock.
//!
//! Learning one input proceeds by small steps:
//!
//! - **discriminate** - add a child under the recognised node, tested on
//!   the first item of the input not yet covered by the node's contents
//!   (or the "nothing more" marker when nothing is left);
//! - **familiarise** - append the next missing item to the recognised
//!   node's image.
//!
//! An item can only be used in either step once it is itself known as a
//! primitive (a child of the root tests exactly that item). Otherwise the
//! primitive is learned first.

use tracing::{debug, trace};

use crate::clock::{Clocks, Time};
use crate::config::ChrestConfig;
use crate::error::{ChrestError, ChrestResult};
use crate::network::{Ltm, Node, NodeId};
use crate::pattern::{Modality, Pattern, Primitive};
use crate::reinforcement::ReinforcementTheory;
use crate::stm::Stm;

/// Outcome of one learning attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Learning {
    /// A new node was added to the network.
    Discriminated(NodeId),
    /// A node's image grew by one item.
    Familiarised(NodeId),
    /// Nothing to learn, or learning was busy.
    Unchanged,
}

/// A chunking model.
#[derive(Clone, Debug)]
pub struct Chrest {
    config: ChrestConfig,
    ltm: Ltm,
    stms: [Stm; 3],
    clocks: Clocks,
    reinforcement_theory: Option<ReinforcementTheory>,
}

impl Chrest {
    /// Create a model whose clocks are free from time 0.
    pub fn new(config: ChrestConfig) -> ChrestResult<Self> {
        Self::created_at(config, 0)
    }

    /// Create a model whose clocks are free from `time`.
    pub fn created_at(config: ChrestConfig, time: Time) -> ChrestResult<Self> {
        config.validate()?;
        Ok(Self::assemble(config, time))
    }

    /// Fresh state for a validated configuration.
    fn assemble(config: ChrestConfig, time: Time) -> Self {
        let stms = Modality::ALL.map(|m| Stm::new(m, config.stm_capacity(m)));
        Self {
            config,
            ltm: Ltm::new(time),
            stms,
            clocks: Clocks::new(time),
            reinforcement_theory: None,
        }
    }

    // =========================================================================
    // ACCESSORS
    // =========================================================================

    pub fn config(&self) -> &ChrestConfig {
        &self.config
    }

    pub fn ltm(&self) -> &Ltm {
        &self.ltm
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.ltm.node(id)
    }

    pub fn stm(&self, modality: Modality) -> &Stm {
        &self.stms[modality.index()]
    }

    pub(crate) fn stm_mut(&mut self, modality: Modality) -> &mut Stm {
        &mut self.stms[modality.index()]
    }

    pub fn clocks(&self) -> Clocks {
        self.clocks
    }

    pub fn attention_clock(&self) -> Time {
        self.clocks.attention()
    }

    pub fn learning_clock(&self) -> Time {
        self.clocks.learning()
    }

    pub fn max_clock(&self) -> Time {
        self.clocks.max()
    }

    pub(crate) fn consume_attention(&mut self, until: Time) {
        self.clocks.consume_attention(until);
    }

    // =========================================================================
    // RECOGNITION AND LEARNING
    // =========================================================================

    /// Deepest node whose test path matches `pattern`. No side effects.
    pub fn recognise(&self, pattern: &Pattern) -> NodeId {
        self.ltm.recognise(pattern)
    }

    /// Recognise `pattern` and, if learning is free at `time`, learn one
    /// step towards it.
    ///
    /// Returns the recognised node. A non-empty pattern always puts that
    /// node at the front of its modality's short-term memory.
    pub fn recognise_and_learn(&mut self, pattern: &Pattern, time: Time) -> NodeId {
        let node = self.recognise(pattern);
        if pattern.is_empty() {
            return node;
        }

        if self.clocks.learning_free_at(time) {
            match self.learn(node, pattern, time) {
                Ok(Learning::Discriminated(child)) => {
                    debug!(node = %node, child = %child, %pattern, time, "discriminated");
                }
                Ok(Learning::Familiarised(n)) => {
                    debug!(node = %n, %pattern, time, "familiarised");
                }
                Ok(Learning::Unchanged) => {}
                // Ids come from this network; unreachable in practice.
                Err(e) => debug!(error = %e, "learning skipped"),
            }
        } else {
            trace!(time, free_at = self.clocks.learning(), "learning busy");
        }

        if let Some(evicted) = self.stm_mut(pattern.modality()).push(node) {
            trace!(evicted = %evicted, "stm eviction");
        }
        node
    }

    /// Pick and apply one learning step for `pattern` at `node`.
    fn learn(&mut self, node: NodeId, pattern: &Pattern, time: Time) -> ChrestResult<Learning> {
        let image = self.ltm.get(node)?.image();
        if !self.ltm.is_root(node) && image == pattern {
            return Ok(Learning::Unchanged);
        }
        if self.ltm.is_root(node) || image.is_finished() || !image.matches(pattern) {
            self.discriminate(node, pattern, time)
        } else {
            self.familiarise(node, pattern, time)
        }
    }

    fn discriminate(&mut self, node: NodeId, pattern: &Pattern, time: Time) -> ChrestResult<Learning> {
        let modality = pattern.modality();
        let new_information = pattern.remove(self.ltm.get(node)?.contents());

        let Some(item) = new_information.first().cloned() else {
            // Input ends here: distinguish it with the "nothing more" marker.
            let has_marker = self
                .ltm
                .get(node)?
                .children()
                .iter()
                .any(|l| l.test().is_end_marker());
            if has_marker {
                return Ok(Learning::Unchanged);
            }
            let child = self.ltm.add_child(node, Pattern::end_marker(modality), time)?;
            self.charge_learning(time + self.config.discrimination_time);
            return Ok(Learning::Discriminated(child));
        };

        if !self.ltm.knows_primitive(modality, &item) {
            return self.learn_primitive(modality, item, time);
        }

        let test = Pattern::from_items(modality, [item]);
        let child = self.ltm.add_child(node, test, time)?;
        self.charge_learning(time + self.config.discrimination_time);
        Ok(Learning::Discriminated(child))
    }

    fn familiarise(&mut self, node: NodeId, pattern: &Pattern, time: Time) -> ChrestResult<Learning> {
        let modality = pattern.modality();
        let new_information = pattern.remove(self.ltm.get(node)?.image());

        let Some(item) = new_information.first().cloned() else {
            return Ok(Learning::Unchanged);
        };

        if !self.ltm.knows_primitive(modality, &item) {
            return self.learn_primitive(modality, item, time);
        }

        self.ltm.get_mut(node)?.image_mut().push(item);
        self.charge_learning(time + self.config.familiarisation_time);
        Ok(Learning::Familiarised(node))
    }

    /// Add `item` as a single-item test under the modality root.
    fn learn_primitive(
        &mut self,
        modality: Modality,
        item: Primitive,
        time: Time,
    ) -> ChrestResult<Learning> {
        let root = self.ltm.root(modality);
        let child = self
            .ltm
            .add_child(root, Pattern::from_items(modality, [item]), time)?;
        self.charge_learning(time + self.config.discrimination_time);
        Ok(Learning::Discriminated(child))
    }

    fn charge_learning(&mut self, until: Time) {
        self.clocks.consume_learning(until);
    }

    // =========================================================================
    // REINFORCEMENT
    // =========================================================================

    /// Select the reinforcement theory. Only the first selection sticks;
    /// later calls are ignored and return false.
    pub fn set_reinforcement_theory(&mut self, theory: ReinforcementTheory) -> bool {
        if self.reinforcement_theory.is_some() {
            return false;
        }
        self.reinforcement_theory = Some(theory);
        true
    }

    pub fn reinforcement_theory(&self) -> Option<ReinforcementTheory> {
        self.reinforcement_theory
    }

    /// Associate an action node with a visual node, weight 0.0.
    ///
    /// Returns `Ok(false)` without change when learning is busy at `time`
    /// or the link already exists.
    pub fn add_action_link(&mut self, visual: NodeId, action: NodeId, time: Time) -> ChrestResult<bool> {
        self.check_modality(visual, Modality::Visual)?;
        self.check_modality(action, Modality::Action)?;

        if !self.clocks.learning_free_at(time) {
            return Ok(false);
        }
        let links = self.ltm.get_mut(visual)?.action_links_mut();
        if links.contains_key(&action) {
            return Ok(false);
        }
        links.insert(action, 0.0);
        self.charge_learning(time + self.config.add_link_time);
        debug!(visual = %visual, action = %action, time, "action link added");
        Ok(true)
    }

    /// Add the active theory's value for `variables` to the weight of the
    /// link from `visual` to `action`. Returns the new weight.
    pub fn reinforce_action_link(
        &mut self,
        visual: NodeId,
        action: NodeId,
        variables: &[f64],
    ) -> ChrestResult<f64> {
        self.check_modality(visual, Modality::Visual)?;
        self.check_modality(action, Modality::Action)?;

        let theory = self
            .reinforcement_theory
            .ok_or(ChrestError::NoReinforcementTheory)?;
        let value = theory.calculate_reinforcement_value(variables)?;
        let weight = self
            .ltm
            .get_mut(visual)?
            .action_links_mut()
            .entry(action)
            .or_insert(0.0);
        *weight += value;
        Ok(*weight)
    }

    fn check_modality(&self, id: NodeId, expected: Modality) -> ChrestResult<()> {
        let found = self.ltm.get(id)?.modality();
        if found != expected {
            return Err(ChrestError::ModalityMismatch { expected, found });
        }
        Ok(())
    }
}

impl Default for Chrest {
    /// The default configuration always validates.
    fn default() -> Self {
        Self::assemble(ChrestConfig::default(), 0)
    }
}

//! Object movement in a visual-spatial field
//!
//! A batch is a list of sequences; each sequence is one object's path as
//! (identifier, col, row) waypoints, starting where the object is now.
//! Every hop picks the object up (charged `access_time`) and puts it
//! down at the next waypoint (charged `object_movement_time`). Costs
//! accumulate over the whole batch and attention is busy until the last
//! put-down.
//!
//! Batches are all or nothing. Every sequence must start where its object
//! is at the time of the request, and an object may lead only one
//! sequence. The whole batch is then played against a copy of the square
//! logs and committed only if every hop is legal.

use std::collections::HashMap;

use tracing::{debug, trace};

use crate::clock::Time;
use crate::error::{ChrestResult, MoveViolation};
use crate::field::VisualSpatialField;
use crate::model::Chrest;
use crate::object::VisualSpatialFieldObject;
use crate::pattern::ItemSquare;

impl VisualSpatialField {
    /// Apply a batch of moves requested at `time`.
    ///
    /// Rejected as a whole, leaving field and model untouched, when
    /// attention is busy at `time`, a sequence has fewer than two
    /// waypoints or names more than one object, a sequence does not start
    /// where its object is at `time`, two sequences move the same object,
    /// or an object is not at a later waypoint when picked up.
    ///
    /// An object present at `time` that decays before its first pick-up is
    /// still carried.
    ///
    /// Putting an object down on a blind square or outside the field
    /// removes it from the field.
    pub fn move_objects(
        &mut self,
        model: &mut Chrest,
        moves: &[Vec<ItemSquare>],
        time: Time,
    ) -> ChrestResult<()> {
        let free_at = model.attention_clock();
        if time < free_at {
            return Err(MoveViolation::AttentionBusy {
                requested: time,
                free_at,
            }
            .into());
        }
        check_sequences(moves)?;
        self.check_initial_locations(moves, time)?;
        check_repeated_objects(moves)?;
        if moves.is_empty() {
            return Ok(());
        }

        let mut log = self.log.clone();
        let mut now = time;
        for (sequence, waypoints) in moves.iter().enumerate() {
            for (hop, pair) in waypoints.windows(2).enumerate() {
                now += self.timings.access_time;
                let picked = self.pick_up(&mut log, sequence, hop, &pair[0], time, now)?;
                now += self.timings.object_movement_time;
                self.put_down(&mut log, &picked, &pair[1], now);
            }
        }

        self.log = log;
        model.consume_attention(now);
        debug!(sequences = moves.len(), start = time, finished_at = now, "objects moved");
        Ok(())
    }

    /// Every sequence starts on a square holding its object at `time`.
    fn check_initial_locations(&self, moves: &[Vec<ItemSquare>], time: Time) -> ChrestResult<()> {
        for (sequence, waypoints) in moves.iter().enumerate() {
            let Some(start) = waypoints.first() else {
                continue;
            };
            let present = self
                .square_log(start.col, start.row)
                .map_or(false, |log| {
                    log.iter()
                        .any(|o| o.is_concrete() && o.identifier() == start.item && o.is_alive(time))
                });
            if !present {
                return Err(MoveViolation::InitialLocation {
                    sequence,
                    identifier: start.item.clone(),
                    col: start.col,
                    row: start.row,
                }
                .into());
            }
        }
        Ok(())
    }

    /// Close the object at `from` and leave the right placeholder behind.
    ///
    /// The first hop of a sequence takes the instance checked at
    /// `requested`, even if it has decayed since.
    fn pick_up(
        &self,
        log: &mut [Vec<VisualSpatialFieldObject>],
        sequence: usize,
        hop: usize,
        from: &ItemSquare,
        requested: Time,
        now: Time,
    ) -> ChrestResult<VisualSpatialFieldObject> {
        let violation = || {
            let (identifier, col, row) = (from.item.clone(), from.col, from.row);
            if hop == 0 {
                MoveViolation::InitialLocation {
                    sequence,
                    identifier,
                    col,
                    row,
                }
            } else {
                MoveViolation::NotAtLocation {
                    sequence,
                    identifier,
                    col,
                    row,
                }
            }
        };

        let idx = self.index(from.col, from.row).ok_or_else(violation)?;
        let square = &mut log[idx];
        let here = |o: &VisualSpatialFieldObject, t: Time| {
            o.is_concrete() && o.identifier() == from.item && o.is_alive(t)
        };
        let pos = square
            .iter()
            .rposition(|o| here(o, now))
            .or_else(|| {
                (hop == 0)
                    .then(|| square.iter().rposition(|o| here(o, requested)))
                    .flatten()
            })
            .ok_or_else(violation)?;

        square[pos].terminate(now);
        let picked = square[pos].clone();
        trace!(id = picked.identifier(), col = from.col, row = from.row, time = now, "picked up");

        self.refresh_square(square, now);

        let occupied = square.iter().any(|o| o.is_concrete() && o.is_alive(now));
        let covered = square
            .iter()
            .any(|o| !o.is_concrete() && o.is_alive(now));
        if !occupied && !covered {
            // A ghost's square was never seen to be empty.
            square.push(if picked.is_ghost() {
                VisualSpatialFieldObject::blind(now)
            } else {
                VisualSpatialFieldObject::empty(now, self.timings.unrecognised_object_lifespan)
            });
        }
        Ok(picked)
    }

    /// Place a fresh, unrecognised instance of `picked` at `to`.
    fn put_down(
        &self,
        log: &mut [Vec<VisualSpatialFieldObject>],
        picked: &VisualSpatialFieldObject,
        to: &ItemSquare,
        now: Time,
    ) {
        let Some(idx) = self.index(to.col, to.row) else {
            trace!(id = picked.identifier(), col = to.col, row = to.row, "moved off field");
            return;
        };
        let square = &mut log[idx];
        if square.iter().any(|o| o.is_blind() && o.is_alive(now)) {
            trace!(id = picked.identifier(), col = to.col, row = to.row, "moved onto blind square");
            return;
        }

        for o in square.iter_mut().filter(|o| o.is_empty_square() && o.is_alive(now)) {
            o.terminate(now);
        }
        self.refresh_square(square, now);

        let lifespan = if picked.is_creator() {
            None
        } else {
            Some(self.timings.unrecognised_object_lifespan)
        };
        trace!(id = picked.identifier(), col = to.col, row = to.row, time = now, "put down");
        square.push(VisualSpatialFieldObject::new(
            picked.identifier(),
            picked.object_class(),
            now,
            false,
            picked.is_ghost(),
            lifespan,
        ));
    }

    /// Touching a square keeps the real objects on it in mind.
    fn refresh_square(&self, square: &mut [VisualSpatialFieldObject], now: Time) {
        for o in square.iter_mut().filter(|o| o.is_concrete() && o.is_alive(now)) {
            let lifespan = self.timings.lifespan(o.is_recognised(now));
            o.refresh(now, lifespan);
        }
    }
}

/// An object leads at most one sequence per batch.
fn check_repeated_objects(moves: &[Vec<ItemSquare>]) -> ChrestResult<()> {
    let mut leaders: HashMap<&str, usize> = HashMap::new();
    for (sequence, waypoints) in moves.iter().enumerate() {
        let Some(start) = waypoints.first() else {
            continue;
        };
        if let Some(&first) = leaders.get(start.item.as_str()) {
            return Err(MoveViolation::RepeatedObject {
                sequence,
                first,
                identifier: start.item.clone(),
            }
            .into());
        }
        leaders.insert(&start.item, sequence);
    }
    Ok(())
}

/// Shape checks that need no field state.
fn check_sequences(moves: &[Vec<ItemSquare>]) -> ChrestResult<()> {
    for (sequence, waypoints) in moves.iter().enumerate() {
        let Some(first) = waypoints.first().filter(|_| waypoints.len() >= 2) else {
            return Err(MoveViolation::IncompleteSequence { sequence }.into());
        };
        if let Some(other) = waypoints.iter().find(|w| w.item != first.item) {
            return Err(MoveViolation::NonSerial {
                sequence,
                expected: first.item.clone(),
                found: other.item.clone(),
            }
            .into());
        }
    }
    Ok(())
}

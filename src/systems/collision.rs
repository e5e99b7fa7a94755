use hecs::{Entity, World};
use serde::{Deserialize, Serialize};

use crate::components::{Aabb, Actor, HitBox};

/// Float drift tolerated before two edges count as overlapping.
const EPSILON: f64 = 1e-9;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

/// Which actors each mover is tested against.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PairPolicy {
    /// Each actor is tested only against actors spawned after it; the last
    /// actor never moves under collision. Outcomes depend on spawn order.
    #[default]
    Forward,
    /// Each actor is tested against every other actor.
    AllOthers,
}

/// Result of resolving one axis of motion.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Resolution {
    /// Largest displacement along the axis that does not overlap anything.
    pub displacement: f64,
    pub colliding: bool,
}

fn span(area: &Aabb, axis: Axis) -> (f64, f64) {
    match axis {
        Axis::X => (area.left(), area.right()),
        Axis::Y => (area.top(), area.bottom()),
    }
}

fn cross(axis: Axis) -> Axis {
    match axis {
        Axis::X => Axis::Y,
        Axis::Y => Axis::X,
    }
}

/// Open-interval overlap: touching spans do not overlap.
fn overlaps((a_min, a_max): (f64, f64), (b_min, b_max): (f64, f64)) -> bool {
    a_min < b_max - EPSILON && b_min < a_max - EPSILON
}

/// Clamp `delta` along `axis` so `mover` stops at the first obstacle in its
/// path. Obstacles behind the mover are ignored; one it already overlaps
/// pins the displacement to zero.
///
/// Zero displacement and zero-area rectangles never collide.
pub fn resolve_axis(mover: &Aabb, delta: f64, axis: Axis, obstacles: &[Aabb]) -> Resolution {
    let mut resolved = Resolution {
        displacement: delta,
        colliding: false,
    };
    if delta == 0.0 || mover.is_degenerate() {
        return resolved;
    }

    let (lo, hi) = span(mover, axis);
    let side = span(mover, cross(axis));

    for other in obstacles.iter().filter(|o| !o.is_degenerate()) {
        if !overlaps(side, span(other, cross(axis))) {
            continue;
        }
        let (o_lo, o_hi) = span(other, axis);
        let limit = if overlaps((lo, hi), (o_lo, o_hi)) {
            Some(0.0)
        } else if delta > 0.0 && o_lo >= hi - EPSILON {
            let gap = (o_lo - hi).max(0.0);
            (gap < delta).then_some(gap)
        } else if delta < 0.0 && o_hi <= lo + EPSILON {
            let gap = (lo - o_hi).max(0.0);
            (gap < -delta).then_some(-gap)
        } else {
            None
        };

        if let Some(limit) = limit {
            resolved.colliding = true;
            if limit.abs() < resolved.displacement.abs() {
                resolved.displacement = limit;
            }
        }
    }
    resolved
}

/// `probe_depth` only ever lengthens a downward sweep.
fn vertical_sweep(vec_y: f64, probe_depth: f64) -> f64 {
    if vec_y < 0.0 {
        vec_y
    } else {
        vec_y + probe_depth
    }
}

/// Clamp every mover's velocity against the hitboxes of the others, X then
/// Y, all against positions from before this tick's commit.
///
/// A falling or resting actor's vertical pass probes `probe_depth` past the
/// intended `vec.y`, so one standing on a floor at zero velocity still
/// reports `on_floor`. A rising actor sweeps exactly its own `vec.y`.
pub fn collision_system(world: &mut World, order: &[Entity], policy: PairPolicy, probe_depth: f64) {
    let boxes: Vec<(Entity, Aabb)> = order
        .iter()
        .filter_map(|&e| world.get::<&HitBox>(e).ok().map(|h| (e, h.area)))
        .collect();

    for (i, &(entity, area)) in boxes.iter().enumerate() {
        let others: Vec<Aabb> = match policy {
            PairPolicy::Forward => boxes[i + 1..].iter().map(|&(_, a)| a).collect(),
            PairPolicy::AllOthers => boxes
                .iter()
                .enumerate()
                .filter(|&(j, _)| j != i)
                .map(|(_, &(_, a))| a)
                .collect(),
        };
        if others.is_empty() {
            continue;
        }

        let Ok(mut actor) = world.get::<&mut Actor>(entity) else {
            continue;
        };

        let x = resolve_axis(&area, actor.vec.x, Axis::X, &others);
        if x.colliding {
            actor.vec.x = x.displacement;
        }

        let sweep = vertical_sweep(actor.vec.y, probe_depth);
        let y = resolve_axis(&area, sweep, Axis::Y, &others);
        if y.colliding {
            actor.on_floor = true;
            actor.vec.y = y.displacement;
        } else {
            actor.on_floor = false;
        }

        log::trace!(
            "{entity:?}: vec=({:.2}, {:.2}) on_floor={}",
            actor.vec.x,
            actor.vec.y,
            actor.on_floor
        );
    }
}

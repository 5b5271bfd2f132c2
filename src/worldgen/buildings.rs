use crate::config::WorldGenConfig;
use crate::geometry::{Envelope, Polygon, Segment};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Extra slack subtracted from the spacing requirement so footprints laid
/// out exactly `spacing` apart survive their own rejection check.
const SPACING_EPSILON: f32 = 1e-3;

/// A placed building footprint with its extrusion height. Rebuilt
/// wholesale on every generation pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Building {
    pub footprint: Polygon,
    pub height: f32,
}

/// Derive building placements from the road skeleton.
///
/// Wider guide corridors are buffered around each road segment and
/// unioned; every surviving corridor segment long enough for at least one
/// building is subdivided into slots, each slot is buffered into a
/// rectangular footprint, and conflicting footprints are rejected in a
/// single ordered pass.
pub(crate) fn generate_buildings(segments: &[Segment], config: &WorldGenConfig) -> Vec<Building> {
    let buildings = &config.buildings;
    let corridor_width = config.roads.width + buildings.width + buildings.spacing * 2.0;

    let corridors: Vec<Polygon> = segments
        .iter()
        .map(|seg| {
            Envelope::new(*seg, corridor_width, config.roads.roundness)
                .polygon()
                .clone()
        })
        .collect();

    let mut guides = Polygon::union(&corridors);
    // Too short to fit even one building
    guides.retain(|seg| seg.length() >= buildings.min_length);

    let mut slots = Vec::new();
    for guide in &guides {
        subdivide_guide(guide, buildings.min_length, buildings.spacing, &mut slots);
    }

    let bases: Vec<Polygon> = slots
        .iter()
        .map(|slot| Envelope::new(*slot, buildings.width, 1).polygon().clone())
        .collect();

    let removed = reject_conflicting(&bases, buildings.spacing);
    let kept: Vec<Building> = bases
        .into_iter()
        .zip(removed)
        .filter(|(_, removed)| !removed)
        .map(|(footprint, _)| Building {
            footprint,
            height: buildings.height,
        })
        .collect();

    debug!(
        guides = guides.len(),
        candidates = slots.len(),
        placed = kept.len(),
        "building placement finished"
    );
    kept
}

/// Split a guide segment into equal-length building slots separated by
/// `spacing`, as many as fit given the minimum slot length.
fn subdivide_guide(guide: &Segment, min_length: f32, spacing: f32, out: &mut Vec<Segment>) {
    let padded = guide.length() + spacing;
    let count = (padded / (min_length + spacing)).floor() as usize;
    if count == 0 {
        return;
    }
    let slot_length = padded / count as f32 - spacing;
    let dir = guide.direction();

    let mut q1 = guide.a;
    let mut q2 = q1.add(&dir.scale(slot_length));
    out.push(Segment::new(q1, q2));
    for _ in 1..count {
        q1 = q2.add(&dir.scale(spacing));
        q2 = q1.add(&dir.scale(slot_length));
        out.push(Segment::new(q1, q2));
    }
}

/// One-pass conflict rejection over the candidate list in order.
///
/// A later candidate is dropped when it intersects, or sits closer than
/// `spacing - epsilon` to, any earlier surviving candidate. Removals never
/// re-trigger evaluation of candidates that already survived, so a kept
/// footprint can in principle still conflict transitively; that behavior
/// is intentional and relied upon by tuned layouts.
fn reject_conflicting(bases: &[Polygon], spacing: f32) -> Vec<bool> {
    let mut removed = vec![false; bases.len()];
    for i in 0..bases.len() {
        if removed[i] {
            continue;
        }
        for j in (i + 1)..bases.len() {
            if removed[j] {
                continue;
            }
            if bases[i].intersects_polygon(&bases[j])
                || bases[i].distance_to_polygon(&bases[j]) < spacing - SPACING_EPSILON
            {
                removed[j] = true;
            }
        }
    }
    removed
}

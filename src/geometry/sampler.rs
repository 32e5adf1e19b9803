use rand::Rng;

use crate::domain::{Boundary, SamplePoint};

/// Attempts allowed per requested point before giving up
pub const ATTEMPT_MULTIPLIER: usize = 20;

/// Upper bound on the up-front allocation for accepted points
const MAX_PREALLOCATED: usize = 1 << 16;

/// Result of one sampling run
#[derive(Debug, Clone)]
pub struct SampleReport {
    /// Accepted points in generation order
    pub points: Vec<SamplePoint>,
    pub requested: usize,
    /// Candidates drawn, accepted or not
    pub attempts: usize,
    pub max_attempts: usize,
}

impl SampleReport {
    /// Number of requested points that could not be generated
    pub fn shortfall(&self) -> usize {
        self.requested.saturating_sub(self.points.len())
    }

    pub fn is_complete(&self) -> bool {
        self.shortfall() == 0
    }
}

/// Draw `count` points uniformly distributed inside `boundary`.
///
/// # Algorithm
/// 1. Take the bounding box of every boundary vertex
/// 2. Draw x and y independently and uniformly within the box
/// 3. Round to 6 decimals and keep the candidate if the boundary covers it
///    (edges included)
/// 4. Stop at `count` points or after `count * ATTEMPT_MULTIPLIER` draws
///
/// Running out of attempts is not an error: the partial set is returned and
/// the shortfall is logged.
pub fn generate<R: Rng + ?Sized>(boundary: &Boundary, count: usize, rng: &mut R) -> SampleReport {
    let max_attempts = count.saturating_mul(ATTEMPT_MULTIPLIER);
    let mut report = SampleReport {
        points: Vec::with_capacity(count.min(MAX_PREALLOCATED)),
        requested: count,
        attempts: 0,
        max_attempts,
    };

    if count == 0 {
        return report;
    }

    let Some(bounds) = boundary.bounds() else {
        tracing::warn!("boundary has no vertices, nothing to sample");
        return report;
    };
    let (min, max) = (bounds.min(), bounds.max());

    while report.points.len() < count && report.attempts < max_attempts {
        let lon = rng.gen_range(min.x..=max.x);
        let lat = rng.gen_range(min.y..=max.y);
        report.attempts += 1;

        // Test the rounded position so every kept point is itself inside
        let candidate = SamplePoint::new(lat, lon);
        if boundary.covers(candidate.longitude, candidate.latitude) {
            report.points.push(candidate);
        }
    }

    if !report.is_complete() {
        tracing::warn!(
            generated = report.points.len(),
            requested = count,
            attempts = max_attempts,
            "Only generated {} points out of {} requested after {} attempts",
            report.points.len(),
            count,
            max_attempts
        );
    }

    report
}

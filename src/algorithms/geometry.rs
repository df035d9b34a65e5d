//! Convex hull by Andrew's monotone chain
//!
//! Points keep their input order in every payload; the hull is a list of
//! indices into that order, counter-clockwise from the leftmost point.

use crate::recorder::errors::{check_len, InputError};
use crate::snapshot::{Payload, Point, Recorder, Role, Snapshot, Status, StepBudgetExceeded};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub const MAX_POINTS: usize = 64;
const RANDOM_WIDTH: i32 = 60;
const RANDOM_HEIGHT: i32 = 20;

pub const HULL_CODE: &[&str] = &[
    "sort points by x, then y",
    "for p in sorted:                       (lower hull)",
    "  while last two points and p turn clockwise: pop",
    "  push p",
    "for p in reversed sorted:              (upper hull)",
    "  while last two points and p turn clockwise: pop",
    "  push p",
    "hull = chain without its repeated first point",
];

pub fn validate_points(points: &[Point]) -> Result<(), InputError> {
    check_len("point set", points.len(), MAX_POINTS)?;
    match points
        .iter()
        .position(|p| !p.x.is_finite() || !p.y.is_finite())
    {
        Some(index) => Err(InputError::NonFinite { index }),
        None => Ok(()),
    }
}

pub fn validate_random(count: usize) -> Result<(), InputError> {
    if count < 3 {
        return Err(InputError::OutOfRange {
            what: "point count",
            value: count as i64,
            min: 3,
            max: MAX_POINTS as i64,
        });
    }
    check_len("point count", count, MAX_POINTS)
}

/// Integer-valued points on a small canvas, reproducible from `seed`
pub fn random_points(count: usize, seed: u64) -> Vec<Point> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            Point::new(
                f64::from(rng.gen_range(0..=RANDOM_WIDTH)),
                f64::from(rng.gen_range(0..=RANDOM_HEIGHT)),
            )
        })
        .collect()
}

/// Positive when o -> a -> b turns counter-clockwise
fn cross(o: Point, a: Point, b: Point) -> f64 {
    (a.x - o.x) * (b.y - o.y) - (a.y - o.y) * (b.x - o.x)
}

struct Hull<'a> {
    points: &'a [Point],
    chain: Vec<usize>,
}

impl Hull<'_> {
    fn frame(&self, narration: String) -> Snapshot {
        Snapshot::new(
            Payload::Points {
                points: self.points.to_vec(),
                hull: self.chain.clone(),
            },
            narration,
        )
        .highlight(Role::Hull, self.chain.iter().copied())
        .var("chain", self.chain.len())
    }

    /// One monotone-chain step; `floor` protects the part of the chain
    /// built by the previous pass.
    fn extend(
        &mut self,
        p: usize,
        floor: usize,
        line: usize,
        rec: &mut Recorder,
    ) -> Result<(), StepBudgetExceeded> {
        let at = self.points[p];
        rec.push(
            self.frame(format!("Consider point {} at ({}, {})", p, at.x, at.y))
                .highlight(Role::Candidate, [p])
                .line(line)
                .var("p", p),
        )?;
        while self.chain.len() >= floor + 2 {
            let a = self.chain[self.chain.len() - 2];
            let b = self.chain[self.chain.len() - 1];
            if cross(self.points[a], self.points[b], at) > 0.0 {
                break;
            }
            self.chain.pop();
            rec.push(
                self.frame(format!("Turn at point {} is not counter-clockwise, drop it", b))
                    .highlight(Role::Eliminated, [b])
                    .highlight(Role::Candidate, [p])
                    .line(line)
                    .var("p", p),
            )?;
        }
        self.chain.push(p);
        rec.push(
            self.frame(format!("Push point {} onto the chain", p))
                .highlight(Role::Active, [p])
                .line(line + 1)
                .var("p", p),
        )
    }
}

pub fn convex_hull(points: &[Point], rec: &mut Recorder) -> Result<(), StepBudgetExceeded> {
    let mut order: Vec<usize> = (0..points.len()).collect();
    order.sort_by(|&i, &j| {
        points[i]
            .x
            .total_cmp(&points[j].x)
            .then(points[i].y.total_cmp(&points[j].y))
    });
    order.dedup_by(|a, b| points[*a] == points[*b]);

    let mut hull = Hull {
        points,
        chain: Vec::new(),
    };
    rec.push(
        hull.frame(format!(
            "Sort {} points by x, then y ({} distinct)",
            points.len(),
            order.len()
        ))
        .line(0)
        .var("points", points.len()),
    )?;

    if order.len() < 3 {
        hull.chain = order;
        return rec.push(
            hull.frame("Fewer than three distinct points: every one is on the hull".to_string())
                .line(7)
                .status(Status::Done),
        );
    }

    for &p in &order {
        hull.extend(p, 0, 2, rec)?;
    }
    let lower = hull.chain.len();
    rec.push(
        hull.frame(format!("Lower hull has {} points, now walk back for the upper hull", lower))
            .line(4),
    )?;
    for &p in order[..order.len() - 1].iter().rev() {
        hull.extend(p, lower - 1, 5, rec)?;
    }
    hull.chain.pop();

    let size = hull.chain.len();
    rec.push(
        hull.frame(format!("Convex hull has {} vertices", size))
            .line(7)
            .var("hull size", size)
            .status(Status::Done),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interior_points_stay_off_the_hull() {
        let points = [
            Point::new(0.0, 0.0),
            Point::new(4.0, 0.0),
            Point::new(2.0, 1.0),
            Point::new(4.0, 4.0),
            Point::new(0.0, 4.0),
            Point::new(2.0, 0.0),
        ];
        let mut rec = Recorder::new(1_000);
        convex_hull(&points, &mut rec).unwrap();
        let last = rec.last().unwrap();
        assert_eq!(last.marked(Role::Hull), &[0, 1, 3, 4]);
        assert_eq!(last.status, Status::Done);
    }

    #[test]
    fn random_points_are_reproducible() {
        assert_eq!(random_points(10, 7), random_points(10, 7));
    }

    #[test]
    fn non_finite_coordinates_are_rejected() {
        let points = [Point::new(0.0, 0.0), Point::new(f64::NAN, 1.0)];
        assert_eq!(
            validate_points(&points),
            Err(InputError::NonFinite { index: 1 })
        );
    }
}

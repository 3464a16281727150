// Archimedean spiral candidate generator.
//
// Every tag starts a fresh sampler at the canvas center, so later tags search
// outward from the same origin rather than from the previous tag.

use crate::config::SpiralParams;

use super::Point;

/// Infinite sequence of candidate centers along `r = a + b·θ`.
#[derive(Debug, Clone)]
pub struct SpiralSampler {
    origin: Point,
    a: f64,
    b: f64,
    step: f64,
    index: usize,
}

impl SpiralSampler {
    pub fn new(origin: Point, params: &SpiralParams) -> Self {
        Self {
            origin,
            a: params.a as f64,
            b: params.b as f64,
            step: params.step as f64,
            index: 0,
        }
    }

    /// Angle of the next sample to be yielded.
    pub fn theta(&self) -> f64 {
        self.index as f64 * self.step
    }

    pub fn radius_at(&self, theta: f64) -> f64 {
        self.a + self.b * theta
    }

    /// Number of samples already yielded.
    pub fn taken(&self) -> usize {
        self.index
    }

    pub fn reset(&mut self) {
        self.index = 0;
    }
}

impl Iterator for SpiralSampler {
    type Item = Point;

    fn next(&mut self) -> Option<Point> {
        // θ is derived from the index rather than accumulated so that the
        // sequence is bit-identical across runs and restarts.
        let theta = self.theta();
        let r = self.radius_at(theta);
        self.index += 1;
        Some(Point::new(
            (self.origin.x as f64 + r * theta.cos()) as f32,
            (self.origin.y as f64 + r * theta.sin()) as f32,
        ))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (usize::MAX, None)
    }
}

/// Samples needed before the spiral radius reaches `radius`, inclusive of the
/// sample at θ = 0.
pub fn samples_to_reach(params: &SpiralParams, radius: f32) -> usize {
    let a = params.a as f64;
    let radius = radius as f64;
    if radius <= a {
        return 1;
    }
    let theta = (radius - a) / params.b as f64;
    let steps = (theta / params.step as f64).ceil();
    if steps >= usize::MAX as f64 {
        return usize::MAX;
    }
    steps as usize + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(a: f32, b: f32, step: f32) -> SpiralParams {
        SpiralParams { a, b, step }
    }

    #[test]
    fn first_sample_sits_at_origin_plus_a() {
        let mut spiral = SpiralSampler::new(Point::new(50.0, 40.0), &params(0.0, 2.0, 0.35));
        assert_eq!(spiral.next(), Some(Point::new(50.0, 40.0)));

        let mut offset = SpiralSampler::new(Point::new(50.0, 40.0), &params(5.0, 2.0, 0.35));
        assert_eq!(offset.next(), Some(Point::new(55.0, 40.0)));
    }

    #[test]
    fn radius_grows_with_each_sample() {
        let origin = Point::new(0.0, 0.0);
        let spiral = SpiralSampler::new(origin, &params(0.0, 1.5, 0.35));
        let radii: Vec<f32> = spiral
            .take(40)
            .map(|p| (p.x * p.x + p.y * p.y).sqrt())
            .collect();
        for pair in radii.windows(2) {
            assert!(pair[1] > pair[0], "radius should increase: {pair:?}");
        }
    }

    #[test]
    fn restarted_sampler_repeats_sequence() {
        let mut spiral = SpiralSampler::new(Point::new(10.0, 10.0), &SpiralParams::default());
        let first: Vec<Point> = spiral.by_ref().take(25).collect();
        assert_eq!(spiral.taken(), 25);
        spiral.reset();
        let second: Vec<Point> = spiral.take(25).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn samples_to_reach_covers_requested_radius() {
        let p = params(0.0, 2.0, 0.5);
        let n = samples_to_reach(&p, 100.0);
        let spiral = SpiralSampler::new(Point::default(), &p);
        let theta_last = (n - 1) as f64 * 0.5;
        assert!(spiral.radius_at(theta_last) >= 100.0);
        assert!(spiral.radius_at(theta_last - 0.5) < 100.0);
        assert_eq!(samples_to_reach(&params(10.0, 1.0, 0.35), 5.0), 1);
    }
}

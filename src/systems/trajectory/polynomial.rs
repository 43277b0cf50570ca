use nalgebra::{DMatrix, Vector3};

use crate::resources::BoundaryConditions;
use crate::utils::{falling_factorial, ConfigurationError};

/// One polynomial piece of a minimum-derivative trajectory.
///
/// The polynomial is written on normalised time `tau = (t - start_time) / duration`.
#[derive(Debug, Clone, PartialEq)]
pub struct TrajectorySegment {
    pub start_time: f64,
    pub duration: f64,
    /// Coefficient of `tau^j` for each axis
    pub coefficients: Vec<Vector3<f64>>,
}

impl TrajectorySegment {
    pub fn end_time(&self) -> f64 {
        self.start_time + self.duration
    }

    /// `k`-th time derivative at absolute time `t`, clamped to the segment.
    pub fn evaluate(&self, t: f64, k: usize) -> Vector3<f64> {
        let tau = ((t - self.start_time) / self.duration).clamp(0.0, 1.0);
        let scale = self.duration.powi(k as i32);
        self.coefficients
            .iter()
            .enumerate()
            .skip(k)
            .fold(Vector3::zeros(), |acc, (j, c)| {
                acc + c * (falling_factorial(j, k) * tau.powi((j - k) as i32))
            })
            / scale
    }
}

/// Row of `d^k/dtau^k` of the monomial basis at `tau`.
fn basis(count: usize, k: usize, tau: f64) -> Vec<f64> {
    (0..count)
        .map(|j| {
            if j < k {
                0.0
            } else {
                falling_factorial(j, k) * tau.powi((j - k) as i32)
            }
        })
        .collect()
}

fn set_row(a: &mut DMatrix<f64>, row: usize, col: usize, values: &[f64], scale: f64) {
    for (j, v) in values.iter().enumerate() {
        a[(row, col + j)] += v * scale;
    }
}

/// Solve the minimum-derivative problem through `points`.
///
/// Produces polynomials of degree `2 order - 1` matching every point, with
/// derivatives `1..2 order - 2` continuous at interior points and derivatives
/// `1..order - 1` fixed at both ends. The three axes share one factorisation.
pub fn solve_segments(
    points: &[Vector3<f64>],
    times: &[f64],
    order: usize,
    boundary: &BoundaryConditions,
) -> Result<Vec<TrajectorySegment>, ConfigurationError> {
    let segments = points.len().saturating_sub(1);
    if segments == 0 || times.len() != points.len() || order == 0 {
        return Err(ConfigurationError::SingularTrajectory);
    }

    let n = 2 * order;
    let unknowns = segments * n;
    let durations: Vec<f64> = times.windows(2).map(|w| w[1] - w[0]).collect();

    let mut a = DMatrix::<f64>::zeros(unknowns, unknowns);
    let mut b = DMatrix::<f64>::zeros(unknowns, 3);
    let mut row = 0;

    // Position at both ends of every segment
    for s in 0..segments {
        set_row(&mut a, row, s * n, &basis(n, 0, 0.0), 1.0);
        b.row_mut(row).copy_from(&points[s].transpose());
        row += 1;
        set_row(&mut a, row, s * n, &basis(n, 0, 1.0), 1.0);
        b.row_mut(row).copy_from(&points[s + 1].transpose());
        row += 1;
    }

    // Endpoint derivatives, scaled to normalised time
    let last = segments - 1;
    for k in 1..order {
        set_row(&mut a, row, 0, &basis(n, k, 0.0), 1.0);
        let value = boundary.start_derivative(k) * durations[0].powi(k as i32);
        b.row_mut(row).copy_from(&value.transpose());
        row += 1;

        set_row(&mut a, row, last * n, &basis(n, k, 1.0), 1.0);
        let value = boundary.end_derivative(k) * durations[last].powi(k as i32);
        b.row_mut(row).copy_from(&value.transpose());
        row += 1;
    }

    // Continuity at interior points, multiplied through by T_s^k
    for s in 0..segments.saturating_sub(1) {
        for k in 1..=(2 * order - 2) {
            let ratio = (durations[s] / durations[s + 1]).powi(k as i32);
            set_row(&mut a, row, s * n, &basis(n, k, 1.0), 1.0);
            set_row(&mut a, row, (s + 1) * n, &basis(n, k, 0.0), -ratio);
            row += 1;
        }
    }
    debug_assert_eq!(row, unknowns);

    let solution = a
        .lu()
        .solve(&b)
        .ok_or(ConfigurationError::SingularTrajectory)?;
    if solution.iter().any(|v| !v.is_finite()) {
        return Err(ConfigurationError::SingularTrajectory);
    }

    Ok((0..segments)
        .map(|s| TrajectorySegment {
            start_time: times[s],
            duration: durations[s],
            coefficients: (0..n)
                .map(|j| {
                    let r = s * n + j;
                    Vector3::new(solution[(r, 0)], solution[(r, 1)], solution[(r, 2)])
                })
                .collect(),
        })
        .collect())
}

/// Rest-to-rest variant: every segment starts and ends with zero derivatives,
/// apart from any explicit conditions at the first and last point.
pub fn solve_stopping_segments(
    points: &[Vector3<f64>],
    times: &[f64],
    order: usize,
    boundary: &BoundaryConditions,
) -> Result<Vec<TrajectorySegment>, ConfigurationError> {
    let segments = points.len().saturating_sub(1);
    let mut result = Vec::with_capacity(segments);
    for s in 0..segments {
        let local = BoundaryConditions {
            start: if s == 0 {
                boundary.start.clone()
            } else {
                Vec::new()
            },
            end: if s + 1 == segments {
                boundary.end.clone()
            } else {
                Vec::new()
            },
        };
        result.extend(solve_segments(
            &points[s..=s + 1],
            &times[s..=s + 1],
            order,
            &local,
        )?);
    }
    Ok(result)
}

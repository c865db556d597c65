//! Closed-form collision prediction and elastic collision response.
//!
//! All functions here are pure: they take positions/velocities/radii and
//! return a predicted `Duration` or new velocities, without touching the
//! event queue or mutating any `Marble`. `Simulation` is the only caller.
//! Signatures are expressed in terms of `quantities`' dimensional newtypes
//! rather than bare `f64`, so a caller cannot, say, pass a duration where a
//! length was expected.

use crate::marble::Marble;
use crate::quantities::{Duration, Length, Mass, Speed, TimePoint};

/// One of the four arena walls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wall {
    Left,
    Right,
    Top,
    Bottom,
}

/// Predicts the next collision of `marble` (evaluated at `t_now`) with any
/// of the four walls of a `w` by `h` arena. Returns the soonest candidate
/// `(dt, wall)` with `dt > 0`, or `None` if the marble is stationary on both
/// axes.
///
/// Ties between the x-axis and y-axis candidate are broken in favor of the
/// x-axis candidate (deterministic, arbitrary — see SPEC_FULL §4.3).
pub fn predict_wall_collision(
    marble: &Marble,
    t_now: TimePoint,
    w: Length,
    h: Length,
) -> Option<(Duration, Wall)> {
    let (x, y) = marble.position_at(t_now);
    let (vx, vy) = marble.velocity_typed();
    let r = marble.radius_length();

    let x_candidate = if vx.get() > 0.0 {
        Some(((w - x - r) / vx, Wall::Right))
    } else if vx.get() < 0.0 {
        Some(((r - x) / vx, Wall::Left))
    } else {
        None
    };

    let y_candidate = if vy.get() > 0.0 {
        Some(((h - y - r) / vy, Wall::Bottom))
    } else if vy.get() < 0.0 {
        Some(((r - y) / vy, Wall::Top))
    } else {
        None
    };

    match (x_candidate, y_candidate) {
        (Some(x_cand), Some(y_cand)) => {
            if x_cand.0 <= y_cand.0 {
                Some(x_cand)
            } else {
                Some(y_cand)
            }
        }
        (Some(x_cand), None) => Some(x_cand),
        (None, Some(y_cand)) => Some(y_cand),
        (None, None) => None,
    }
}

/// Flips the velocity component normal to `wall`; the tangential component
/// is unchanged.
pub fn reflect_off_wall(vx: Speed, vy: Speed, wall: Wall) -> (Speed, Speed) {
    match wall {
        Wall::Left | Wall::Right => (-vx, vy),
        Wall::Top | Wall::Bottom => (vx, -vy),
    }
}

/// Predicts the next contact date between two marbles, evaluated at
/// `t_now`, by solving the quadratic `a*t^2 + 2*b*t + c = 0` in `dt`
/// (time-from-now). Returns `Some(dt)` with `dt > 0` for the first future
/// contact, or `None` if the marbles never meet (parallel trajectories,
/// no real roots, or both roots non-positive).
///
/// `a == 0` (identical velocities) is documented as "no collision": two
/// marbles moving in lockstep either never touch or are already in
/// contact forever, and neither case has a meaningful future collision
/// date. The quadratic's coefficients mix squared-velocity and
/// squared-length terms with no single consistent unit, so they're
/// computed over plain `f64`s pulled from the typed inputs; only the
/// function's boundary is dimensionally typed.
pub fn predict_marble_marble_collision(
    m1: &Marble,
    m2: &Marble,
    t_now: TimePoint,
) -> Option<Duration> {
    let (x1, y1) = m1.position_at(t_now);
    let (x2, y2) = m2.position_at(t_now);
    let (vx1, vy1) = m1.velocity_typed();
    let (vx2, vy2) = m2.velocity_typed();

    let dvx = vx1.get() - vx2.get();
    let dvy = vy1.get() - vy2.get();
    let dx = (x1 - x2).get();
    let dy = (y1 - y2).get();
    let r_sum = (m1.radius_length() + m2.radius_length()).get();

    let a = dvx * dvx + dvy * dvy;
    if a <= 0.0 {
        return None;
    }

    let b = dx * dvx + dy * dvy;
    let c = dx * dx + dy * dy - r_sum * r_sum;

    let delta = b * b - a * c;
    if delta < 0.0 {
        return None;
    }

    let sqrt_delta = delta.sqrt();
    let root_small = (-b - sqrt_delta) / a;
    let root_large = (-b + sqrt_delta) / a;

    // The smaller root is the physical first contact; the larger one is the
    // pass-through exit of the overlap region and must be discarded.
    if root_small > 0.0 {
        Some(Duration::new(root_small))
    } else if root_large > 0.0 {
        // Both roots negative means contact was strictly in the past; this
        // branch (small <= 0 < large) only happens when the marbles already
        // overlap at t_now, which this design does not resolve further.
        None
    } else {
        None
    }
}

/// Elastic collision response for two marbles already at contact, returning
/// their post-collision `(vx, vy)` velocities.
///
/// When one mass is zero, it absorbs the full velocity change and the
/// other marble is unaffected (the limit of the formula as `m -> 0`). When
/// both masses are zero, the pair is treated as a no-op to avoid a `0/0`
/// division.
pub fn resolve_elastic_collision(
    pos1: (Length, Length),
    vel1: (Speed, Speed),
    m1: Mass,
    pos2: (Length, Length),
    vel2: (Speed, Speed),
    m2: Mass,
) -> ((Speed, Speed), (Speed, Speed)) {
    if m1.get() == 0.0 && m2.get() == 0.0 {
        return (vel1, vel2);
    }

    let nx = (pos2.0 - pos1.0).get();
    let ny = (pos2.1 - pos1.1).get();
    let dist = (nx * nx + ny * ny).sqrt();
    let (nx, ny) = if dist > 0.0 {
        (nx / dist, ny / dist)
    } else {
        // Degenerate: centers coincide. No well-defined normal; leave
        // velocities untouched rather than divide by zero.
        return (vel1, vel2);
    };

    let rel_vx = vel2.0.get() - vel1.0.get();
    let rel_vy = vel2.1.get() - vel1.1.get();
    let v_n_scalar = rel_vx * nx + rel_vy * ny;
    let v_nx = v_n_scalar * nx;
    let v_ny = v_n_scalar * ny;

    let total_mass = m1.get() + m2.get();
    let v1_new = (
        Speed::new(vel1.0.get() + (2.0 * m2.get() / total_mass) * v_nx),
        Speed::new(vel1.1.get() + (2.0 * m2.get() / total_mass) * v_ny),
    );
    let v2_new = (
        Speed::new(vel2.0.get() - (2.0 * m1.get() / total_mass) * v_nx),
        Speed::new(vel2.1.get() - (2.0 * m1.get() / total_mass) * v_ny),
    );
    (v1_new, v2_new)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn len(v: f64) -> Length {
        Length::new(v)
    }
    fn spd(v: f64) -> Speed {
        Speed::new(v)
    }
    fn t(v: f64) -> TimePoint {
        TimePoint::new(v)
    }

    #[test]
    fn wall_collision_right() {
        let m = Marble::new(1.0, 0.0, 1.0, 5.0, 1.0, 0.0);
        let (dt, wall) =
            predict_wall_collision(&m, t(0.0), len(10.0), len(10.0)).unwrap();
        assert_eq!(wall, Wall::Right);
        assert_approx_eq::assert_approx_eq!(dt.get(), 8.0);
    }

    #[test]
    fn wall_collision_stationary_marble_has_no_candidate() {
        let m = Marble::new(1.0, 0.0, 5.0, 5.0, 0.0, 0.0);
        assert!(predict_wall_collision(&m, t(0.0), len(10.0), len(10.0)).is_none());
    }

    #[test]
    fn reflect_flips_only_normal_component() {
        assert_eq!(
            reflect_off_wall(spd(3.0), spd(4.0), Wall::Right),
            (spd(-3.0), spd(4.0))
        );
        assert_eq!(
            reflect_off_wall(spd(3.0), spd(4.0), Wall::Left),
            (spd(-3.0), spd(4.0))
        );
        assert_eq!(
            reflect_off_wall(spd(3.0), spd(4.0), Wall::Top),
            (spd(3.0), spd(-4.0))
        );
        assert_eq!(
            reflect_off_wall(spd(3.0), spd(4.0), Wall::Bottom),
            (spd(3.0), spd(-4.0))
        );
    }

    #[test]
    fn marble_marble_frontal_collision_date() {
        let m1 = Marble::new(1.0, 1.0, 1.0, 5.0, 1.0, 0.0);
        let m2 = Marble::new(1.0, 1.0, 9.0, 5.0, -1.0, 0.0);
        let dt = predict_marble_marble_collision(&m1, &m2, t(0.0)).unwrap();
        assert_approx_eq::assert_approx_eq!(dt.get(), 3.0);
    }

    #[test]
    fn parallel_marbles_never_collide() {
        let m1 = Marble::new(1.0, 1.0, 0.0, 0.0, 1.0, 0.0);
        let m2 = Marble::new(1.0, 1.0, 10.0, 0.0, 1.0, 0.0);
        assert!(predict_marble_marble_collision(&m1, &m2, t(0.0)).is_none());
    }

    #[test]
    fn diverging_marbles_never_collide() {
        let m1 = Marble::new(1.0, 1.0, 0.0, 0.0, -1.0, 0.0);
        let m2 = Marble::new(1.0, 1.0, 10.0, 0.0, 1.0, 0.0);
        assert!(predict_marble_marble_collision(&m1, &m2, t(0.0)).is_none());
    }

    #[test]
    fn elastic_collision_equal_masses_swaps_normal_velocity() {
        let (v1, v2) = resolve_elastic_collision(
            (len(0.0), len(0.0)),
            (spd(1.0), spd(0.0)),
            Mass::new(1.0),
            (len(2.0), len(0.0)),
            (spd(-1.0), spd(0.0)),
            Mass::new(1.0),
        );
        assert_approx_eq::assert_approx_eq!(v1.0.get(), -1.0);
        assert_approx_eq::assert_approx_eq!(v2.0.get(), 1.0);
    }

    #[test]
    fn elastic_collision_zero_mass_probe_absorbs_change() {
        // m1 is a massless probe; m2 is a heavy, fast marble. The probe
        // should absorb the full relative velocity while m2 is unaffected.
        let (v1, v2) = resolve_elastic_collision(
            (len(0.0), len(0.0)),
            (spd(0.0), spd(0.0)),
            Mass::new(0.0),
            (len(1.0), len(0.0)),
            (spd(-5.0), spd(0.0)),
            Mass::new(10.0),
        );
        assert_approx_eq::assert_approx_eq!(v2.0.get(), -5.0);
        assert!(v1.0.get() < 0.0);
    }

    #[test]
    fn elastic_collision_both_zero_mass_is_noop() {
        let (v1, v2) = resolve_elastic_collision(
            (len(0.0), len(0.0)),
            (spd(1.0), spd(0.0)),
            Mass::new(0.0),
            (len(1.0), len(0.0)),
            (spd(-1.0), spd(0.0)),
            Mass::new(0.0),
        );
        assert_eq!(v1, (spd(1.0), spd(0.0)));
        assert_eq!(v2, (spd(-1.0), spd(0.0)));
    }

    #[test]
    fn elastic_collision_conserves_momentum_and_energy() {
        let m1 = Mass::new(3.0);
        let m2 = Mass::new(7.0);
        let vel1 = (spd(2.0), spd(-1.0));
        let vel2 = (spd(-1.0), spd(0.5));
        let pos1 = (len(0.0), len(0.0));
        let pos2 = (len(1.0), len(1.0));
        let (v1, v2) = resolve_elastic_collision(pos1, vel1, m1, pos2, vel2, m2);

        let momentum_before = (
            m1.get() * vel1.0.get() + m2.get() * vel2.0.get(),
            m1.get() * vel1.1.get() + m2.get() * vel2.1.get(),
        );
        let momentum_after = (
            m1.get() * v1.0.get() + m2.get() * v2.0.get(),
            m1.get() * v1.1.get() + m2.get() * v2.1.get(),
        );
        assert_approx_eq::assert_approx_eq!(momentum_before.0, momentum_after.0, 1e-9);
        assert_approx_eq::assert_approx_eq!(momentum_before.1, momentum_after.1, 1e-9);

        let ke = |m: Mass, v: (Speed, Speed)| {
            0.5 * m.get() * (v.0.get() * v.0.get() + v.1.get() * v.1.get())
        };
        let ke_before = ke(m1, vel1) + ke(m2, vel2);
        let ke_after = ke(m1, v1) + ke(m2, v2);
        assert_approx_eq::assert_approx_eq!(ke_before, ke_after, 1e-9);
    }
}

//! Connector geometry between node boxes.
//!
//! [`build_path`] is a pure function from two box positions and a link
//! kind to a [`PathDescriptor`]. Positions are box top-left corners; the
//! sequencer guarantees both endpoints exist before calling, so there is
//! no fallible lookup at this level.

use glam::Vec2;

use crate::model::LinkKind;

/// One drawing segment of a connector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathSegment {
    /// Straight segment to a point.
    LineTo(Vec2),
    /// Cubic Bézier segment.
    CubicTo {
        /// First control point.
        c1: Vec2,
        /// Second control point.
        c2: Vec2,
        /// Segment end point.
        to: Vec2,
    },
}

/// Connector geometry: a start point plus drawing segments.
#[derive(Debug, Clone, PartialEq)]
pub struct PathDescriptor {
    /// Pen-down point.
    pub start: Vec2,
    /// Drawing segments in order.
    pub segments: Vec<PathSegment>,
}

impl PathDescriptor {
    /// End point of the path.
    #[must_use]
    pub fn end(&self) -> Vec2 {
        match self.segments.last() {
            Some(PathSegment::LineTo(p)) => *p,
            Some(PathSegment::CubicTo { to, .. }) => *to,
            None => self.start,
        }
    }

    /// Interpolate toward another descriptor of the same segment shape.
    ///
    /// Used to morph a connector while its endpoints slide. If the two
    /// shapes differ (a link changed kind mid-shift) the target wins
    /// outright — a snap, not a blend.
    #[must_use]
    pub fn lerp(&self, other: &Self, t: f32) -> Self {
        if self.segments.len() != other.segments.len() {
            return other.clone();
        }
        let segments = self
            .segments
            .iter()
            .zip(other.segments.iter())
            .map(|(a, b)| match (a, b) {
                (PathSegment::LineTo(p), PathSegment::LineTo(q)) => {
                    PathSegment::LineTo(p.lerp(*q, t))
                }
                (
                    PathSegment::CubicTo { c1, c2, to },
                    PathSegment::CubicTo { c1: d1, c2: d2, to: q },
                ) => PathSegment::CubicTo {
                    c1: c1.lerp(*d1, t),
                    c2: c2.lerp(*d2, t),
                    to: to.lerp(*q, t),
                },
                _ => *b,
            })
            .collect();
        Self { start: self.start.lerp(other.start, t), segments }
    }
}

/// Compute connector geometry between two box positions for a link kind.
///
/// `from` and `to` are box top-left corners; `box_w`/`box_h` are the box
/// dimensions. The four kinds occupy distinct visual channels:
///
/// - forward: trailing edge of `from` to leading edge of `to`, mid-height.
/// - backward: the offset channel low on the boxes, dipping below the row,
///   so it never coincides with the forward connector of the same pair.
/// - circular with `from == to`: a self-loop arched above the single box.
/// - circular otherwise: a wrap arc bypassing the row — above it for
///   circular-forward, below it for circular-backward — rather than
///   crossing intermediate nodes.
#[must_use]
pub fn build_path(
    kind: LinkKind,
    from: Vec2,
    to: Vec2,
    box_w: f32,
    box_h: f32,
) -> PathDescriptor {
    match kind {
        LinkKind::Forward => forward(from, to, box_w, box_h),
        LinkKind::Backward => backward(from, to, box_w, box_h),
        LinkKind::CircularForward => {
            if from == to {
                self_loop(from, box_w, box_h, true)
            } else {
                wrap(from, to, box_w, box_h, true)
            }
        }
        LinkKind::CircularBackward => {
            if from == to {
                self_loop(from, box_w, box_h, false)
            } else {
                wrap(from, to, box_w, box_h, false)
            }
        }
    }
}

fn forward(from: Vec2, to: Vec2, box_w: f32, box_h: f32) -> PathDescriptor {
    let start = Vec2::new(from.x + box_w, from.y + box_h / 2.0);
    let end = Vec2::new(to.x, to.y + box_h / 2.0);
    PathDescriptor { start, segments: vec![PathSegment::LineTo(end)] }
}

fn backward(from: Vec2, to: Vec2, box_w: f32, box_h: f32) -> PathDescriptor {
    // Low anchor points plus a dip below the row keep this channel clear
    // of the forward connector between the same pair.
    let start = Vec2::new(from.x, from.y + box_h * 0.75);
    let end = Vec2::new(to.x + box_w, to.y + box_h * 0.75);
    let dip = box_h * 0.75;
    let c1 = Vec2::new(start.x - box_w * 0.25, start.y + dip);
    let c2 = Vec2::new(end.x + box_w * 0.25, end.y + dip);
    PathDescriptor {
        start,
        segments: vec![PathSegment::CubicTo { c1, c2, to: end }],
    }
}

fn self_loop(at: Vec2, box_w: f32, box_h: f32, above: bool) -> PathDescriptor {
    // Single-element circular container: the connector leaves one edge of
    // the box and re-enters the other, looping over (or under) it.
    let sign = if above { -1.0 } else { 1.0 };
    let y = if above { at.y } else { at.y + box_h };
    let start = Vec2::new(at.x + box_w * 0.75, y);
    let end = Vec2::new(at.x + box_w * 0.25, y);
    let reach = sign * box_h * 1.5;
    let c1 = Vec2::new(start.x + box_w * 0.5, y + reach);
    let c2 = Vec2::new(end.x - box_w * 0.5, y + reach);
    PathDescriptor {
        start,
        segments: vec![PathSegment::CubicTo { c1, c2, to: end }],
    }
}

fn wrap(
    from: Vec2,
    to: Vec2,
    box_w: f32,
    box_h: f32,
    above: bool,
) -> PathDescriptor {
    let sign = if above { -1.0 } else { 1.0 };
    let edge_y = |p: Vec2| if above { p.y } else { p.y + box_h };
    let start = Vec2::new(from.x + box_w / 2.0, edge_y(from));
    let end = Vec2::new(to.x + box_w / 2.0, edge_y(to));
    // Rise scales gently with span so long wraps clear the whole row.
    let span = (start.x - end.x).abs();
    let rise = sign * (box_h * 1.25 + span * 0.08);
    let c1 = Vec2::new(start.x, start.y + rise);
    let c2 = Vec2::new(end.x, end.y + rise);
    PathDescriptor {
        start,
        segments: vec![PathSegment::CubicTo { c1, c2, to: end }],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const W: f32 = 80.0;
    const H: f32 = 40.0;

    #[test]
    fn test_forward_joins_trailing_to_leading_edge() {
        let a = Vec2::new(50.0, 120.0);
        let b = Vec2::new(150.0, 120.0);
        let path = build_path(LinkKind::Forward, a, b, W, H);

        assert_eq!(path.start, Vec2::new(130.0, 140.0));
        assert_eq!(path.end(), Vec2::new(150.0, 140.0));
        assert_eq!(path.segments.len(), 1);
    }

    #[test]
    fn test_backward_is_distinct_from_forward() {
        let a = Vec2::new(50.0, 120.0);
        let b = Vec2::new(130.0, 120.0);
        let fwd = build_path(LinkKind::Forward, a, b, W, H);
        let back = build_path(LinkKind::Backward, b, a, W, H);
        assert_ne!(fwd, back);
        // The backward channel runs low on the boxes.
        assert!(back.start.y > a.y + H / 2.0);
    }

    #[test]
    fn test_self_loop_when_endpoints_coincide() {
        let p = Vec2::new(50.0, 120.0);
        let path = build_path(LinkKind::CircularForward, p, p, W, H);
        // Anchored to the single box, arcing above it.
        assert!(path.start.x > p.x && path.start.x < p.x + W);
        match path.segments[0] {
            PathSegment::CubicTo { c1, c2, .. } => {
                assert!(c1.y < p.y);
                assert!(c2.y < p.y);
            }
            PathSegment::LineTo(_) => unreachable!("self-loop must curve"),
        }
    }

    #[test]
    fn test_wrap_forward_routes_above_row() {
        let tail = Vec2::new(290.0, 120.0);
        let head = Vec2::new(50.0, 120.0);
        let path = build_path(LinkKind::CircularForward, tail, head, W, H);
        match path.segments[0] {
            PathSegment::CubicTo { c1, c2, .. } => {
                assert!(c1.y < tail.y);
                assert!(c2.y < head.y);
            }
            PathSegment::LineTo(_) => unreachable!("wrap must curve"),
        }
    }

    #[test]
    fn test_wrap_backward_routes_below_row() {
        let head = Vec2::new(50.0, 120.0);
        let tail = Vec2::new(290.0, 120.0);
        let path = build_path(LinkKind::CircularBackward, head, tail, W, H);
        match path.segments[0] {
            PathSegment::CubicTo { c1, c2, .. } => {
                assert!(c1.y > head.y + H);
                assert!(c2.y > tail.y + H);
            }
            PathSegment::LineTo(_) => unreachable!("wrap must curve"),
        }
    }

    #[test]
    fn test_lerp_midpoint() {
        let a = build_path(
            LinkKind::Forward,
            Vec2::new(0.0, 0.0),
            Vec2::new(100.0, 0.0),
            W,
            H,
        );
        let b = build_path(
            LinkKind::Forward,
            Vec2::new(0.0, 0.0),
            Vec2::new(200.0, 0.0),
            W,
            H,
        );
        let mid = a.lerp(&b, 0.5);
        assert_eq!(mid.end().x, 150.0);
    }

    #[test]
    fn test_lerp_shape_mismatch_snaps_to_target() {
        let line = build_path(
            LinkKind::Forward,
            Vec2::ZERO,
            Vec2::new(100.0, 0.0),
            W,
            H,
        );
        let mut two = line.clone();
        two.segments.push(PathSegment::LineTo(Vec2::ONE));
        assert_eq!(line.lerp(&two, 0.25), two);
    }
}

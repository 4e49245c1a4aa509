//! One animated channel write.

use std::time::Duration;

use glam::Vec2;

use crate::canvas::Canvas;
use crate::easing::EasingFunction;
use crate::error::StageError;
use crate::model::{Indicator, LinkEntity, NodeId};
use crate::path::PathDescriptor;
use crate::animation::preferences::TweenSpec;

/// The canvas channel a tween drives, with its start and end values.
///
/// Position-store writes happen up front when a tween is planned; tweens
/// only interpolate the visual channel between the previous geometry and
/// the destination.
#[derive(Debug, Clone)]
pub enum TweenTarget {
    /// Slide a node element between two positions.
    NodeMove {
        /// Node element to move.
        id: NodeId,
        /// Visual start position.
        from: Vec2,
        /// Destination position.
        to: Vec2,
    },
    /// Fade a node element between two opacities.
    NodeFade {
        /// Node element to fade.
        id: NodeId,
        /// Start opacity.
        from: f32,
        /// End opacity.
        to: f32,
    },
    /// Morph a link element between two path shapes.
    LinkMorph {
        /// Link element to morph.
        link: LinkEntity,
        /// Start geometry.
        from: PathDescriptor,
        /// End geometry.
        to: PathDescriptor,
    },
    /// Fade a link element between two opacities.
    LinkFade {
        /// Link element to fade.
        link: LinkEntity,
        /// Start opacity.
        from: f32,
        /// End opacity.
        to: f32,
    },
    /// Slide an indicator marker between two anchors.
    IndicatorMove {
        /// Indicator to move.
        which: Indicator,
        /// Visual start anchor.
        from: Vec2,
        /// Destination anchor.
        to: Vec2,
    },
    /// Pure timing: suspends the choreography without touching the canvas.
    Hold,
}

/// A tween: target channel plus timing.
#[derive(Debug, Clone)]
pub struct Tween {
    /// Channel and value range.
    pub target: TweenTarget,
    /// Total duration.
    pub duration: Duration,
    /// Easing curve.
    pub easing: EasingFunction,
}

impl Tween {
    /// Build a tween from a target and a timing spec.
    #[must_use]
    pub const fn new(target: TweenTarget, spec: TweenSpec) -> Self {
        Self { target, duration: spec.duration, easing: spec.easing }
    }

    /// Apply the eased interpolated value for progress `eased_t` to the
    /// canvas. `eased_t = 1.0` writes the exact end state.
    pub(crate) fn apply(
        &self,
        eased_t: f32,
        canvas: &mut dyn Canvas,
    ) -> Result<(), StageError> {
        match &self.target {
            TweenTarget::NodeMove { id, from, to } => {
                canvas.set_node_position(*id, from.lerp(*to, eased_t))
            }
            TweenTarget::NodeFade { id, from, to } => {
                canvas.set_node_opacity(*id, from + (to - from) * eased_t)
            }
            TweenTarget::LinkMorph { link, from, to } => {
                if eased_t >= 1.0 {
                    canvas.set_link_path(link, to)
                } else {
                    canvas.set_link_path(link, &from.lerp(to, eased_t))
                }
            }
            TweenTarget::LinkFade { link, from, to } => {
                canvas.set_link_opacity(link, from + (to - from) * eased_t)
            }
            TweenTarget::IndicatorMove { which, from, to } => {
                canvas.set_indicator_position(*which, from.lerp(*to, eased_t))
            }
            TweenTarget::Hold => Ok(()),
        }
    }
}

//! Surface-relative locomotion for the controlled body.
//!
//! The pieces are usable on their own: [`align`] re-orients toward a sampled
//! normal, [`solve`] turns 2D intent into a tangent-plane direction, and
//! [`BodyController`] strings them together with synthetic gravity.

mod body;
mod orientation;
mod tangent;

pub use body::{BodyController, BodyStep, ViewReference};
pub use orientation::align;
pub use tangent::{solve, tangent_basis};

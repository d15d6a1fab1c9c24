//! Player module: the controllable agent.
//!
//! ## Sub-module layout
//!
//! | Module | Responsibility |
//! |--------|----------------|
//! | [`state`] | The `Player` record and the movement-intent input types |
//! | [`control`] | Movement intent, stamina-gated sprint, jumping, aim smoothing, per-tick physics |
//! | [`combat`] | Firing, invulnerability-gated damage, weapon cycling, pickups |
//!
//! All public items are re-exported at this level so that the rest of the crate
//! can use flat `crate::player::*` imports without knowing the sub-module
//! layout.

pub mod combat;
pub mod control;
pub mod state;

pub use state::{MoveDirection, MovementIntent, Player};

//! Engine-independent gameplay control.
//!
//! Everything here runs against the collaborator traits in [`body`] and
//! [`afterimage::AfterimageVisuals`]; nothing touches the ECS. The plugins own the adapters.
//!
//! ```text
//! input ──► PlayerController::tick ──► PhysicsBody / AnimationPlayer
//!                 │  DamageState, DashState
//!                 └─► AfterimageTrail ──► AfterimageVisuals (spawn / release)
//!
//! boundary contact ──► EnemyController::reverse_direction
//! hazard contact   ──► PlayerController::handle_damage
//! ```

pub mod afterimage;
pub mod body;
pub mod damage;
pub mod dash;
pub mod enemy;
pub mod player;
pub mod tuning;

pub use afterimage::{Afterimage, AfterimageTrail, AfterimageVisuals};
pub use body::{AnimationKey, AnimationPlayer, Facing, FrameSnapshot, PhysicsBody};
pub use damage::DamageState;
pub use dash::{dash_speed_at, DashState, DashStep};
pub use enemy::{EnemyController, PatrolState};
pub use player::{HorizontalIntent, PlayerController, PlayerInput, PlayerPhase, TickReport};
pub use tuning::{EnemyTuning, PlayerTuning};

/*!
Collision root module.

This module re-exports submodules that implement the ray-fan kinematic
controller for axis-aligned boxes. The code is split for clarity:

- types:    shared data types (Vec2, Bounds, RayHit, layers, surface kinds)
- query:    the `RayCaster` seam between the resolver and any geometry backend
- probe:    ray origins and spacing derived from the body bounds
- settings: designer-facing controller tuning
- state:    per-body contact and slope state carried between steps
- resolver: the controller itself (descend, horizontal, vertical passes)
*/

pub mod probe;
pub mod query;
pub mod resolver;
pub mod settings;
pub mod state;
pub mod types;

// Re-export commonly used types.
pub use probe::{RayOrigins, RaySpacing, RaycastProbe};
pub use query::{RayCaster, RayFilter};
pub use resolver::{Controller, Motion, MoveRequest};
pub use settings::ControllerSettings;
pub use state::CollisionState;
pub use types::{Bounds, ColliderId, CollisionLayers, RayHit, Surface, Vec2};

pub mod codec;
pub mod error;
pub mod geometry;
pub mod grid;
pub mod id;
pub mod model;
pub mod parse;

pub use codec::{Coordinates, LineRecord, NodeRecord, SceneFile};
pub use error::{CodecError, ValidationError};
pub use grid::{Axis, GridConfig, GridModel, GridTransform, Graduation, Spacings};
pub use id::{ForceId, IdAllocator, LineId, NodeId};
pub use model::*;
pub use parse::{parse_force_value, parse_spacings};

// Re-export kurbo types so downstream crates share one point/vector type
pub use kurbo::{Point, Vec2};

// Use cases layer: grenade lifecycle, plugin dispatch and the session loop.

pub mod grenade_flag;
pub mod host;
pub mod session;
pub mod tracker;
pub mod types;

pub use grenade_flag::GrenadeFlag;
pub use host::SimulatedHost;
pub use session::{Session, session_task};
pub use tracker::GrenadeTracker;
pub use types::{FireOutcome, GameEvent, HostCommand, SessionReport};

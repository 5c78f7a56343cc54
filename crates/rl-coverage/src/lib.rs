//! `rl-coverage` — service coverage measured along roads.
//!
//! A service building (well, market, watch post) reaches the tiles within
//! its radius *by road*, not as the crow flies.  Near the edge of its range
//! the service weakens instead of cutting off.
//!
//! | Module         | Contents                                            |
//! |----------------|-----------------------------------------------------|
//! | [`emitter`]    | `Emitter`, `ServiceKind`                            |
//! | [`efficiency`] | `efficiency`, `max_steps` — the falloff curve       |
//! | [`engine`]     | `CoverageEngine`, `CoverageMap`                     |
//! | [`error`]      | `CoverageError`, `CoverageResult<T>`                |

pub mod efficiency;
pub mod emitter;
pub mod engine;
pub mod error;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use efficiency::{efficiency, max_steps};
pub use emitter::{Emitter, ServiceKind};
pub use engine::{CoverageEngine, CoverageMap};
pub use error::{CoverageError, CoverageResult};

//! Multi-round planning state.
//!
//! ```text
//! GENERATING ─► JUDGING ─► AGGREGATING ─┬─► CONVERGED
//!     ▲                                 ├─► EXHAUSTED (rounds / time / cost)
//!     └────────────── CONTINUE ◄────────┘
//! GENERATING ─► FAILED (no candidates and nothing to fall back to)
//! ```

mod response;
mod state;

pub use response::{Degradation, PlanResponse, Termination};
pub use state::{LoopState, RoundState};

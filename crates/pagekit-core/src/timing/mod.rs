//! Temporal filters: debounce and throttle.
//!
//! # Debounce vs. throttle (for beginners)
//!
//! Both filters sit between a noisy event source (scroll, resize) and an
//! action that should not run on every event.
//!
//! ```text
//! events:    x x x x x         x x x
//! debounce:            ↑ (once, after the burst settles)        ↑
//! throttle:  ↑     ↑     ↑     ↑     ↑  (at most once per window)
//! ```
//!
//! - **Debounce** waits until the events *stop* for a full cooldown, then runs
//!   once.  Good for expensive work that only matters when things settle,
//!   like recomputing sticky offsets after a resize.
//! - **Throttle** runs immediately, then ignores events until the cooldown has
//!   elapsed.  Good for visual feedback that must track input promptly but at
//!   a bounded rate, like the scroll handler (one call per ~16 ms frame).
//!
//! # Explicit time
//!
//! Neither type owns a timer.  Every method takes `now`, a [`Duration`]
//! measured from the start of the page session, and the host decides when to
//! call [`Debounce::poll`].  Each instance holds at most one pending deadline,
//! so calling them at any frequency never grows state.
//!
//! [`Duration`]: std::time::Duration

pub mod debounce;
pub mod throttle;

pub use debounce::Debounce;
pub use throttle::Throttle;

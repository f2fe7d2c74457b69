//! Viewport observation and scroll/resize-derived presentation state.
//!
//! # Two kinds of viewport events (for beginners)
//!
//! - **Entered view** – "tell me once, the first time this element becomes
//!   visible".  Lazy images swap in their real `src`, reveal animations add
//!   their `animated` class.  After firing, the subscription is gone.
//!
//! - **Scroll changed** – "tell me where the page is scrolled to", repeatedly
//!   but at a bounded rate.  The header's `scrolled` class, the hero parallax
//!   offset and the reading-progress bar are all pure functions of the scroll
//!   position (see [`effects`]).
//!
//! The observer never talks to a browser.  Visibility comes either pushed in
//! through [`observer::ViewportObserver::notify_intersection`] (one entry per
//! element, as an intersection primitive reports them) or pulled through an
//! [`observer::IntersectionProbe`].

pub mod effects;
pub mod observer;

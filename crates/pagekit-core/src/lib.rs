//! # pagekit-core
//!
//! Platform-neutral building blocks for PageKit, the interactivity layer of a
//! small content/affiliate-marketing site with an inline "admin mode" editor.
//!
//! This crate has zero dependencies on browsers, file systems, sockets or
//! async runtimes.  Everything time-related takes an explicit `now`, and
//! everything viewport-related consumes plain numbers or a small probe trait,
//! so all of it can be unit-tested deterministically.
//!
//! # Architecture overview (for beginners)
//!
//! A PageKit page session has one editable *configuration document* (site
//! name, hero headline, affiliate links, ...) and a handful of presentational
//! behaviours driven by scrolling and resizing.  This crate defines:
//!
//! - **`document`** – The configuration document: a tree of string leaves
//!   addressed by dotted paths such as `affiliateLinks.amazon`.  Writes never
//!   mutate a document in place; they return a new one that shares every
//!   untouched branch with the old one.
//!
//! - **`timing`** – Debounce and throttle, the two temporal filters used for
//!   resize and scroll handling, as explicit state objects.
//!
//! - **`viewport`** – Fire-once "entered view" subscriptions, a rate-limited
//!   scroll stream, and the scroll/resize-derived presentation flags (header
//!   "scrolled" class, parallax offset, reading progress).
//!
//! - **`notify`** – Transient user-facing notices with timed auto-dismiss.
//!
//! - **`ids`** – Monotonic identifier sequence shared by the modules above.

pub mod document;
pub mod ids;
pub mod notify;
pub mod timing;
pub mod viewport;

// Re-export the most-used types at the crate root so callers can write
// `pagekit_core::ConfigDocument` instead of `pagekit_core::document::node::ConfigDocument`.
pub use document::defaults::default_site_document;
pub use document::node::{ConfigDocument, ConfigNode, DocumentBuilder};
pub use document::path::{FieldPath, PathError};
pub use ids::IdSequence;
pub use notify::{Notice, NoticeId, NoticeKind, NoticePhase, NoticeTiming, NotificationQueue};
pub use timing::{Debounce, Throttle};
pub use viewport::effects::{
    reading_progress, ContentRegion, LayoutSnapshot, ResizeEffects, ResizeMetrics, ScrollEffects,
    ScrollSnapshot,
};
pub use viewport::observer::{
    ElementBounds, ElementId, IntersectionProbe, LayoutProbe, ScrollPosition, SubscriptionId,
    ViewportObserver,
};

//! PageShell: one page session, driven entirely by [`PageEvent`]s.
//!
//! The shell is where the independent pieces meet:
//!
//! ```text
//!  user intents ─────┐                       ┌──► ConfigStore ──► KeyValueStore
//!  (ToggleAdmin,     │                       │
//!   BeginEdit, ...)  ├──► PageShell::handle ─┼──► EditSession
//!                    │                       │
//!  environment ──────┘                       ├──► ViewportObserver ──► reveal sets
//!  (Scroll, Resize,                          ├──► Debounce<ResizeMetrics>
//!   Intersection, Tick)                      └──► NotificationQueue
//!
//!  PageShell::state() ──► PresentationState (what the renderer draws)
//! ```
//!
//! # Errors never escape
//!
//! The renderer has nowhere to send a `Result`.  A rejected intent becomes an
//! `Error` notice plus a `warn!` line; a commit whose storage write failed
//! becomes a `Warning` notice.  [`PageShell::handle`] itself is infallible.

use std::collections::BTreeSet;
use std::sync::mpsc;
use std::time::Duration;

use pagekit_core::{
    ConfigDocument, ContentRegion, Debounce, ElementBounds, ElementId, FieldPath,
    IntersectionProbe, LayoutProbe, LayoutSnapshot, Notice, NoticeId, NoticeKind, NoticeTiming,
    NotificationQueue, ResizeEffects, ResizeMetrics, ScrollEffects, ScrollPosition,
    ScrollSnapshot, ViewportObserver,
};
use tracing::{debug, warn};

use super::config_store::{ConfigStore, LoadSource};
use super::edit_session::{DiscardPolicy, Draft, EditError, EditSession};
use super::persistence::KeyValueStore;

/// What an observed element does when it first enters the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealKind {
    /// Swap the placeholder for the real image source.
    LazyImage,
    /// Start the element's entrance animation.
    Animate,
}

impl RevealKind {
    /// Pixels the element's top must rise above the viewport bottom before it
    /// counts as entered.
    pub fn inset(self) -> f64 {
        match self {
            RevealKind::LazyImage => 0.0,
            RevealKind::Animate => 100.0,
        }
    }
}

/// Everything the shell reacts to.
#[derive(Debug, Clone, PartialEq)]
pub enum PageEvent {
    // ── user intents ──────────────────────────────────────────────────────────
    ToggleAdmin,
    BeginEdit { path: String },
    UpdateDraft { value: String },
    Commit,
    Cancel,
    CloseNotice { id: NoticeId },

    // ── environment ───────────────────────────────────────────────────────────
    /// Registers a fire-once reveal for `element`.
    Watch { element: ElementId, kind: RevealKind },
    /// Records the layout position of `element`.
    Place { element: ElementId, bounds: ElementBounds },
    /// `element` was removed from the document.
    Detach { element: ElementId },
    /// Sets (or clears) the article body used for reading progress.
    Content { region: Option<ContentRegion> },
    Scroll(ScrollPosition),
    Resize(ResizeMetrics),
    Intersection { element: ElementId, is_intersecting: bool },
    /// Advances timers: the resize debounce and notice lifecycles.
    Tick,
}

/// Tunables for one shell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShellOptions {
    pub scroll_cooldown: Duration,
    pub resize_debounce: Duration,
    /// Apply the first resize of a burst instead of the last.
    pub resize_leading: bool,
    pub notice_timing: NoticeTiming,
    pub scroll_effects: ScrollEffects,
    pub resize_effects: ResizeEffects,
    pub discard_policy: DiscardPolicy,
}

impl Default for ShellOptions {
    fn default() -> Self {
        Self {
            scroll_cooldown: ViewportObserver::DEFAULT_SCROLL_COOLDOWN,
            resize_debounce: Duration::from_millis(250),
            resize_leading: false,
            notice_timing: NoticeTiming::default(),
            scroll_effects: ScrollEffects::default(),
            resize_effects: ResizeEffects::default(),
            discard_policy: DiscardPolicy::default(),
        }
    }
}

/// Snapshot of everything the renderer needs.
#[derive(Debug, Clone, PartialEq)]
pub struct PresentationState {
    pub document: ConfigDocument,
    pub load_source: LoadSource,
    pub admin_mode: bool,
    pub editing: Option<Draft>,
    pub notices: Vec<Notice>,
    pub scroll: ScrollSnapshot,
    pub layout: LayoutSnapshot,
    pub loaded_images: BTreeSet<ElementId>,
    pub animated: BTreeSet<ElementId>,
}

/// One page session.
pub struct PageShell<S> {
    store: ConfigStore<S>,
    session: EditSession,
    observer: ViewportObserver,
    probe: LayoutProbe,
    resize: Debounce<ResizeMetrics>,
    notices: NotificationQueue,
    scroll_effects: ScrollEffects,
    resize_effects: ResizeEffects,
    content: Option<ContentRegion>,
    scroll: ScrollSnapshot,
    layout: LayoutSnapshot,
    reveal_tx: mpsc::Sender<(ElementId, RevealKind)>,
    reveal_rx: mpsc::Receiver<(ElementId, RevealKind)>,
    scroll_rx: mpsc::Receiver<ScrollPosition>,
    loaded_images: BTreeSet<ElementId>,
    animated: BTreeSet<ElementId>,
}

impl<S: KeyValueStore> PageShell<S> {
    pub fn new(store: ConfigStore<S>, options: ShellOptions) -> Self {
        let (reveal_tx, reveal_rx) = mpsc::channel();
        let (scroll_tx, scroll_rx) = mpsc::channel();
        let mut observer = ViewportObserver::new(options.scroll_cooldown);
        observer.subscribe_scroll(move |position| {
            let _ = scroll_tx.send(position);
        });
        let resize = if options.resize_leading {
            Debounce::leading(options.resize_debounce)
        } else {
            Debounce::new(options.resize_debounce)
        };
        Self {
            store,
            session: EditSession::new(options.discard_policy),
            observer,
            probe: LayoutProbe::default(),
            resize,
            notices: NotificationQueue::new(options.notice_timing),
            scroll_effects: options.scroll_effects,
            resize_effects: options.resize_effects,
            content: None,
            scroll: ScrollSnapshot::default(),
            layout: LayoutSnapshot::default(),
            reveal_tx,
            reveal_rx,
            scroll_rx,
            loaded_images: BTreeSet::new(),
            animated: BTreeSet::new(),
        }
    }

    pub fn store(&self) -> &ConfigStore<S> {
        &self.store
    }

    pub fn session(&self) -> &EditSession {
        &self.session
    }

    pub fn observer(&self) -> &ViewportObserver {
        &self.observer
    }

    /// Consumes one event at `now` (time since the session started).
    pub fn handle(&mut self, now: Duration, event: PageEvent) {
        match event {
            PageEvent::ToggleAdmin => {
                let enabled = self.session.toggle_admin_mode();
                debug!(enabled, "admin mode toggled");
            }
            PageEvent::BeginEdit { path } => {
                let result = FieldPath::parse(&path)
                    .map_err(EditError::from)
                    .and_then(|path| self.session.begin_edit(path, self.store.current()));
                if let Err(e) = result {
                    self.reject(now, "begin edit", e);
                }
            }
            PageEvent::UpdateDraft { value } => {
                if let Err(e) = self.session.update_draft(value) {
                    self.reject(now, "update draft", e);
                }
            }
            PageEvent::Commit => self.commit(now),
            PageEvent::Cancel => {
                self.session.cancel();
            }
            PageEvent::CloseNotice { id } => {
                self.notices.close(now, id);
            }
            PageEvent::Watch { element, kind } => {
                let tx = self.reveal_tx.clone();
                self.observer.observe(element, kind.inset(), move |entered| {
                    // The receiver lives as long as the shell that owns the observer.
                    let _ = tx.send((entered, kind));
                });
                self.refresh_viewport();
            }
            PageEvent::Place { element, bounds } => {
                self.probe.place(element, bounds);
                self.refresh_viewport();
            }
            PageEvent::Detach { element } => {
                self.probe.detach(element);
                let dropped = self.observer.forget_element(element);
                debug!(element = element.0, dropped, "element detached");
            }
            PageEvent::Content { region } => {
                self.content = region;
                self.scroll = self.scroll_effects.snapshot(self.probe.position(), region);
            }
            PageEvent::Scroll(position) => {
                self.probe.set_position(position);
                self.observer.on_scroll(now, position);
                self.drain_scroll();
            }
            PageEvent::Resize(metrics) => {
                if let Some(metrics) = self.resize.call(now, metrics) {
                    self.apply_layout(metrics);
                }
            }
            PageEvent::Intersection {
                element,
                is_intersecting,
            } => {
                self.observer.notify_intersection(element, is_intersecting);
                self.drain_reveals();
            }
            PageEvent::Tick => self.tick(now),
        }
    }

    /// The earliest instant at which a [`PageEvent::Tick`] would change
    /// anything.
    pub fn next_deadline(&self) -> Option<Duration> {
        match (self.resize.deadline(), self.notices.next_deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    pub fn state(&self) -> PresentationState {
        PresentationState {
            document: self.store.current().clone(),
            load_source: self.store.source(),
            admin_mode: self.session.admin_mode(),
            editing: self.session.draft().cloned(),
            notices: self.notices.notices().to_vec(),
            scroll: self.scroll,
            layout: self.layout,
            loaded_images: self.loaded_images.clone(),
            animated: self.animated.clone(),
        }
    }

    fn commit(&mut self, now: Duration) {
        match self.session.commit(&mut self.store) {
            Ok(outcome) if outcome.is_persisted() => {
                self.notices.push(now, "Changes saved", NoticeKind::Success);
            }
            Ok(outcome) => {
                let message = match outcome.persisted {
                    Err(e) => format!("Saved for this visit only: {e}"),
                    Ok(()) => "Saved for this visit only".to_string(),
                };
                self.notices.push(now, message, NoticeKind::Warning);
            }
            Err(e) => self.reject(now, "commit", e),
        }
    }

    fn tick(&mut self, now: Duration) {
        if let Some(metrics) = self.resize.poll(now) {
            self.apply_layout(metrics);
        }
        self.notices.tick(now);
    }

    fn apply_layout(&mut self, metrics: ResizeMetrics) {
        self.layout = self.resize_effects.snapshot(metrics);
        debug!(width = metrics.viewport_width, "resize settled");
    }

    /// Positions that passed the scroll throttle, latest wins.
    fn drain_scroll(&mut self) {
        let Some(position) = self.scroll_rx.try_iter().last() else {
            return;
        };
        self.scroll = self.scroll_effects.snapshot(position, self.content);
        self.refresh_viewport();
    }

    fn refresh_viewport(&mut self) {
        self.observer.refresh(&PlacedOnly(&self.probe));
        self.drain_reveals();
    }

    fn drain_reveals(&mut self) {
        while let Ok((element, kind)) = self.reveal_rx.try_recv() {
            match kind {
                RevealKind::LazyImage => self.loaded_images.insert(element),
                RevealKind::Animate => self.animated.insert(element),
            };
        }
    }

    fn reject(&mut self, now: Duration, action: &str, error: EditError) {
        warn!("{action} rejected: {error}");
        self.notices.push(now, error.to_string(), NoticeKind::Error);
    }
}

/// Elements that were never placed are tracked through pushed
/// [`PageEvent::Intersection`]s instead and must not look detached; real
/// detachment arrives as [`PageEvent::Detach`].
struct PlacedOnly<'a>(&'a LayoutProbe);

impl IntersectionProbe for PlacedOnly<'_> {
    fn is_intersecting(&self, element: ElementId, inset: f64) -> Option<bool> {
        Some(self.0.is_intersecting(element, inset).unwrap_or(false))
    }
}

impl<S> std::fmt::Debug for PageShell<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageShell")
            .field("session", &self.session)
            .field("observer", &self.observer)
            .field("notices", &self.notices.len())
            .finish()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

//! JSON bridge between a renderer and the [`PageShell`].
//!
//! A renderer (a browser page, a test harness, `pagekit serve` on a pipe)
//! speaks newline-delimited JSON.  Each inbound line is one [`IntentMsg`];
//! each reply is a [`CommandResult`] wrapping the resulting
//! [`PresentationDto`].
//!
//! # JSON discriminant
//!
//! Every inbound message is a JSON object with a `"type"` field naming the
//! variant, all other fields flattened into the same object:
//!
//! ```json
//! {"type":"BeginEdit","path":"heroTitle"}
//! {"type":"Scroll","scroll_top":240.0,"viewport_height":800.0}
//! {"type":"Tick"}
//! ```
//!
//! # Data Transfer Objects (DTOs)
//!
//! Internal types such as [`Draft`] or [`FieldPath`](pagekit_core::FieldPath)
//! keep their fields private.  The DTOs here contain only plain
//! JSON-serialisable fields and are the only shapes the renderer sees.  Any
//! change to a DTO must be mirrored by the renderer.
//!
//! # `CommandResult<T>` wrapper
//!
//! Every reply has the same shape, `{ success, data, error }`, so the
//! renderer can always read `success` first.

use std::time::Duration;

use pagekit_core::{
    ConfigDocument, ContentRegion, ElementBounds, ElementId, LayoutSnapshot, Notice, NoticeId,
    NoticeKind, NoticePhase, ResizeMetrics, ScrollPosition, ScrollSnapshot,
};
use serde::{Deserialize, Serialize};

use crate::application::config_store::{DefaultReason, LoadSource};
use crate::application::edit_session::Draft;
use crate::application::page_shell::{PageEvent, PageShell, PresentationState, RevealKind};
use crate::application::persistence::KeyValueStore;

// ── Inbound messages ──────────────────────────────────────────────────────────

/// How a watched element is revealed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RevealKindDto {
    LazyImage,
    Animate,
}

impl From<RevealKindDto> for RevealKind {
    fn from(kind: RevealKindDto) -> Self {
        match kind {
            RevealKindDto::LazyImage => RevealKind::LazyImage,
            RevealKindDto::Animate => RevealKind::Animate,
        }
    }
}

/// All messages a renderer can send.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum IntentMsg {
    ToggleAdmin,
    BeginEdit { path: String },
    UpdateDraft { value: String },
    Commit,
    Cancel,
    CloseNotice { id: u64 },
    Watch { element: u64, kind: RevealKindDto },
    Place { element: u64, top: f64, height: f64 },
    Detach { element: u64 },
    Content { top: f64, height: f64 },
    ClearContent,
    Scroll { scroll_top: f64, viewport_height: f64 },
    Resize { viewport_width: f64, header_height: f64 },
    Intersection { element: u64, is_intersecting: bool },
    Tick,
    /// Asks for the current state without changing anything.
    GetState,
}

impl IntentMsg {
    /// The shell event for this message; `None` for [`IntentMsg::GetState`].
    pub fn into_event(self) -> Option<PageEvent> {
        let event = match self {
            IntentMsg::ToggleAdmin => PageEvent::ToggleAdmin,
            IntentMsg::BeginEdit { path } => PageEvent::BeginEdit { path },
            IntentMsg::UpdateDraft { value } => PageEvent::UpdateDraft { value },
            IntentMsg::Commit => PageEvent::Commit,
            IntentMsg::Cancel => PageEvent::Cancel,
            IntentMsg::CloseNotice { id } => PageEvent::CloseNotice { id: NoticeId(id) },
            IntentMsg::Watch { element, kind } => PageEvent::Watch {
                element: ElementId(element),
                kind: kind.into(),
            },
            IntentMsg::Place {
                element,
                top,
                height,
            } => PageEvent::Place {
                element: ElementId(element),
                bounds: ElementBounds { top, height },
            },
            IntentMsg::Detach { element } => PageEvent::Detach {
                element: ElementId(element),
            },
            IntentMsg::Content { top, height } => PageEvent::Content {
                region: Some(ContentRegion { top, height }),
            },
            IntentMsg::ClearContent => PageEvent::Content { region: None },
            IntentMsg::Scroll {
                scroll_top,
                viewport_height,
            } => PageEvent::Scroll(ScrollPosition::new(scroll_top, viewport_height)),
            IntentMsg::Resize {
                viewport_width,
                header_height,
            } => PageEvent::Resize(ResizeMetrics {
                viewport_width,
                header_height,
            }),
            IntentMsg::Intersection {
                element,
                is_intersecting,
            } => PageEvent::Intersection {
                element: ElementId(element),
                is_intersecting,
            },
            IntentMsg::Tick => PageEvent::Tick,
            IntentMsg::GetState => return None,
        };
        Some(event)
    }
}

// ── Outbound DTOs ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftDto {
    pub path: String,
    pub original: String,
    pub value: String,
    pub dirty: bool,
}

impl From<&Draft> for DraftDto {
    fn from(draft: &Draft) -> Self {
        Self {
            path: draft.path().to_string(),
            original: draft.original().to_owned(),
            value: draft.value().to_owned(),
            dirty: draft.is_dirty(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoticeDto {
    pub id: u64,
    pub message: String,
    pub kind: NoticeKind,
    pub phase: NoticePhase,
}

impl From<&Notice> for NoticeDto {
    fn from(notice: &Notice) -> Self {
        Self {
            id: notice.id.0,
            message: notice.message.clone(),
            kind: notice.kind,
            phase: notice.phase,
        }
    }
}

/// Everything the renderer draws.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PresentationDto {
    pub document: ConfigDocument,
    /// `"persisted"` or `"defaults:<reason>"`.
    pub load_source: String,
    pub admin_mode: bool,
    pub editing: Option<DraftDto>,
    pub notices: Vec<NoticeDto>,
    pub scroll: ScrollSnapshot,
    pub layout: LayoutSnapshot,
    pub loaded_images: Vec<u64>,
    pub animated: Vec<u64>,
}

impl From<&PresentationState> for PresentationDto {
    fn from(state: &PresentationState) -> Self {
        Self {
            document: state.document.clone(),
            load_source: describe_source(state.load_source),
            admin_mode: state.admin_mode,
            editing: state.editing.as_ref().map(DraftDto::from),
            notices: state.notices.iter().map(NoticeDto::from).collect(),
            scroll: state.scroll,
            layout: state.layout,
            loaded_images: state.loaded_images.iter().map(|e| e.0).collect(),
            animated: state.animated.iter().map(|e| e.0).collect(),
        }
    }
}

fn describe_source(source: LoadSource) -> String {
    let reason = match source {
        LoadSource::Persisted => return "persisted".to_string(),
        LoadSource::Defaults(DefaultReason::Missing) => "missing",
        LoadSource::Defaults(DefaultReason::Unreadable) => "unreadable",
        LoadSource::Defaults(DefaultReason::Malformed) => "malformed",
        LoadSource::Defaults(DefaultReason::ShapeMismatch) => "shape-mismatch",
        LoadSource::Defaults(DefaultReason::Reset) => "reset",
    };
    format!("defaults:{reason}")
}

/// Unified response wrapper.
#[derive(Debug, Serialize, Deserialize)]
pub struct CommandResult<T: Serialize> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T: Serialize> CommandResult<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }
    pub fn err(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(msg.into()),
        }
    }
}

// ── Dispatch ──────────────────────────────────────────────────────────────────

/// Applies one message to `shell` and returns the state that follows.
pub fn dispatch<S: KeyValueStore>(
    shell: &mut PageShell<S>,
    now: Duration,
    msg: IntentMsg,
) -> PresentationDto {
    if let Some(event) = msg.into_event() {
        shell.handle(now, event);
    }
    PresentationDto::from(&shell.state())
}

/// Parses one JSON line and [`dispatch`]es it.
///
/// A line that is not a valid [`IntentMsg`] yields an error result and leaves
/// the shell untouched.
pub fn dispatch_json<S: KeyValueStore>(
    shell: &mut PageShell<S>,
    now: Duration,
    line: &str,
) -> CommandResult<PresentationDto> {
    match serde_json::from_str::<IntentMsg>(line) {
        Ok(msg) => CommandResult::ok(dispatch(shell, now, msg)),
        Err(e) => CommandResult::err(format!("invalid message: {e}")),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

//! Transient user-facing notifications: a toast queue and a busy gauge.
//!
//! `ToastQueue` and `LoaderGauge` are plain data so their invariants are
//! host-testable; the handles wrap them in signals and are provided once at
//! the application root. Every toast walks
//! created -> visible -> fading-out (300 ms) -> removed.

use leptos::prelude::*;
use leptos::task::spawn_local;

use gloo_timers::future::TimeoutFuture;

/// How long the fade-out transition runs before a toast is detached.
pub const FADE_OUT_MS: u32 = 300;

pub const DEFAULT_TOAST_MS: u32 = 3000;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ToastKind {
    #[default]
    Info,
    Success,
    Error,
    Warning,
}

impl ToastKind {
    fn class(self) -> &'static str {
        match self {
            ToastKind::Info => "toast toast-info",
            ToastKind::Success => "toast toast-success",
            ToastKind::Error => "toast toast-error",
            ToastKind::Warning => "toast toast-warning",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Toast {
    pub id: u64,
    pub message: String,
    pub kind: ToastKind,
    pub duration_ms: u32,
}

/// Ordered toast sequence. Insertion order is display order; ids are unique
/// for the life of the process.
#[derive(Clone, Debug, Default)]
pub struct ToastQueue {
    toasts: Vec<Toast>,
    next_id: u64,
}

impl ToastQueue {
    pub fn push(&mut self, message: impl Into<String>, kind: ToastKind, duration_ms: u32) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.toasts.push(Toast {
            id,
            message: message.into(),
            kind,
            duration_ms,
        });
        id
    }

    pub fn dismiss(&mut self, id: u64) -> bool {
        let before = self.toasts.len();
        self.toasts.retain(|toast| toast.id != id);
        self.toasts.len() != before
    }

    pub fn iter(&self) -> impl Iterator<Item = &Toast> {
        self.toasts.iter()
    }

    pub fn len(&self) -> usize {
        self.toasts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }
}

/// Reference-counted busy indicator. Overlapping operations each call
/// `show`/`hide`; the bar stays up until the last one finishes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LoaderGauge {
    active: u32,
}

impl LoaderGauge {
    pub fn show(&mut self) {
        self.active += 1;
    }

    pub fn hide(&mut self) {
        self.active = self.active.saturating_sub(1);
    }

    pub fn busy(&self) -> bool {
        self.active > 0
    }
}

/// Context handle for enqueueing toasts from anywhere in the tree.
#[derive(Clone, Copy)]
pub struct ToastHandle {
    queue: RwSignal<ToastQueue>,
}

impl ToastHandle {
    pub fn add(&self, message: impl Into<String>, kind: ToastKind, duration_ms: u32) {
        // If the queue signal is gone nothing was enqueued, so no dismissal
        // may be scheduled; a made-up id would hit a live toast.
        let Some(id) = self.queue.try_update(|q| q.push(message, kind, duration_ms)) else {
            return;
        };
        let queue = self.queue;
        spawn_local(async move {
            TimeoutFuture::new(duration_ms + FADE_OUT_MS).await;
            queue.try_update(|q| q.dismiss(id));
        });
    }

    pub fn info(&self, message: impl Into<String>) {
        self.add(message, ToastKind::Info, DEFAULT_TOAST_MS);
    }

    pub fn success(&self, message: impl Into<String>) {
        self.add(message, ToastKind::Success, DEFAULT_TOAST_MS);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.add(message, ToastKind::Error, DEFAULT_TOAST_MS);
    }

    fn dismiss(&self, id: u64) {
        self.queue.try_update(|q| q.dismiss(id));
    }
}

/// Context handle for the busy gauge.
#[derive(Clone, Copy)]
pub struct LoaderHandle {
    gauge: RwSignal<LoaderGauge>,
}

impl LoaderHandle {
    pub fn show(&self) {
        self.gauge.update(|g| g.show());
    }

    pub fn hide(&self) {
        self.gauge.try_update(|g| g.hide());
    }

    pub fn busy(&self) -> bool {
        self.gauge.get().busy()
    }
}

/// Installs both handles into context. Call once from the root component.
pub fn provide_notifications() -> (ToastHandle, LoaderHandle) {
    let toasts = ToastHandle {
        queue: RwSignal::new(ToastQueue::default()),
    };
    let loader = LoaderHandle {
        gauge: RwSignal::new(LoaderGauge::default()),
    };
    provide_context(toasts);
    provide_context(loader);
    (toasts, loader)
}

pub fn use_toasts() -> ToastHandle {
    expect_context::<ToastHandle>()
}

pub fn use_loader() -> LoaderHandle {
    expect_context::<LoaderHandle>()
}

/// Thin progress bar across the top of the viewport while anything is busy.
#[component]
pub fn LoaderBar() -> impl IntoView {
    let loader = use_loader();
    move || {
        loader.busy().then(|| {
            view! {
                <div class="loader-track">
                    <div class="loader-bar"></div>
                </div>
            }
        })
    }
}

/// Renders the toast stack in the bottom-right corner.
#[component]
pub fn ToastHost() -> impl IntoView {
    let toasts = use_toasts();
    view! {
        <div class="toast-stack">
            {move || {
                toasts
                    .queue
                    .get()
                    .iter()
                    .map(|toast| {
                        view! { <ToastView toast=toast.clone() /> }
                    })
                    .collect::<Vec<_>>()
            }}
        </div>
    }
}

#[component]
fn ToastView(toast: Toast) -> impl IntoView {
    let toasts = use_toasts();
    let (visible, set_visible) = signal(false);
    let id = toast.id;
    let kind = toast.kind;
    let duration_ms = toast.duration_ms;

    // created -> visible on the next tick so the fade-in transition runs,
    // then back out shortly before the queue drops the toast.
    spawn_local(async move {
        TimeoutFuture::new(10).await;
        set_visible.try_set(true);
        TimeoutFuture::new(duration_ms).await;
        set_visible.try_set(false);
    });

    let close = move |_| {
        set_visible.try_set(false);
        spawn_local(async move {
            TimeoutFuture::new(FADE_OUT_MS).await;
            toasts.dismiss(id);
        });
    };

    let class = move || {
        format!(
            "{} {}",
            kind.class(),
            if visible.get() { "toast-shown" } else { "toast-hidden" }
        )
    };

    view! {
        <div class=class>
            <span class="toast-message">{toast.message.clone()}</span>
            <button class="toast-close" on:click=close>
                "\u{00d7}"
            </button>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toast_ids_are_unique_and_ordered() {
        let mut queue = ToastQueue::default();
        let a = queue.push("one", ToastKind::Info, 500);
        let b = queue.push("two", ToastKind::Error, 500);
        let c = queue.push("three", ToastKind::Success, 500);
        assert!(a < b && b < c);
        let order: Vec<_> = queue.iter().map(|t| t.message.as_str()).collect();
        assert_eq!(order, vec!["one", "two", "three"]);
    }

    #[test]
    fn dismiss_removes_only_the_target() {
        let mut queue = ToastQueue::default();
        let a = queue.push("one", ToastKind::Info, 500);
        let b = queue.push("two", ToastKind::Info, 500);
        assert!(queue.dismiss(a));
        assert!(!queue.dismiss(a));
        assert_eq!(queue.len(), 1);
        assert!(queue.iter().all(|t| t.id == b));
    }

    #[test]
    fn stray_dismiss_leaves_live_toasts_alone() {
        let mut queue = ToastQueue::default();
        assert!(!queue.dismiss(0));
        let first = queue.push("one", ToastKind::Info, 500);
        // The first toast takes id 0, so a dismissal scheduled without a
        // real id must never be allowed to reach the queue.
        assert_eq!(first, 0);
        assert!(!queue.dismiss(99));
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn ids_not_reused_after_dismiss() {
        let mut queue = ToastQueue::default();
        let a = queue.push("one", ToastKind::Info, 500);
        queue.dismiss(a);
        let b = queue.push("two", ToastKind::Info, 500);
        assert_ne!(a, b);
    }

    #[test]
    fn loader_gauge_counts_overlapping_operations() {
        let mut gauge = LoaderGauge::default();
        assert!(!gauge.busy());
        gauge.show();
        gauge.show();
        gauge.hide();
        // A sibling operation is still pending; the bar must stay up.
        assert!(gauge.busy());
        gauge.hide();
        assert!(!gauge.busy());
        // Extra hides are a no-op, not an underflow.
        gauge.hide();
        assert!(!gauge.busy());
    }
}

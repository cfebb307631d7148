//! Auth-state context. The signal is the subscription surface: anything that
//! reads it re-renders when the session changes.

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::backend::Backend;
use crate::model::Session;

#[derive(Clone, Copy)]
pub struct AuthContext {
    pub session: RwSignal<Option<Session>>,
    /// False until the initial session probe has answered, so auth-gated
    /// pages can tell "not signed in" from "still checking".
    pub resolved: RwSignal<bool>,
}

impl AuthContext {
    pub fn user(&self) -> Option<Session> {
        self.session.get()
    }

    pub fn signed_in(&self) -> bool {
        self.session.with(Option::is_some)
    }
}

/// Provides the auth context and kicks off the initial session probe.
pub fn provide_auth(backend: Backend) -> AuthContext {
    let ctx = AuthContext {
        session: RwSignal::new(None),
        resolved: RwSignal::new(false),
    };
    provide_context(ctx);
    spawn_local(async move {
        match backend.current_user().await {
            Ok(session) => ctx.session.try_set(session),
            Err(e) => {
                leptos::logging::warn!("session probe failed: {e}");
                ctx.session.try_set(None)
            }
        };
        ctx.resolved.try_set(true);
    });
    ctx
}

pub fn use_auth() -> AuthContext {
    expect_context::<AuthContext>()
}

pub fn use_backend() -> Backend {
    expect_context::<Backend>()
}

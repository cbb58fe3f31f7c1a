use dioxus::prelude::*;
use services::AuthState;

use crate::context::AppContext;

/// Session state as a signal, refreshed whenever the session context
/// publishes a change.
pub fn use_auth_state() -> Signal<AuthState> {
    let ctx = use_context::<AppContext>();
    let session = ctx.session();
    let initial = session.state();
    let state = use_signal(move || initial);

    use_future(move || {
        let session = session.clone();
        let mut state = state;
        async move {
            let mut rx = session.subscribe();
            loop {
                let next = rx.borrow_and_update().clone();
                if *state.peek() != next {
                    state.set(next);
                }
                if rx.changed().await.is_err() {
                    break;
                }
            }
        }
    });

    state
}

use std::{collections::HashMap, sync::Arc};

use axum::{Extension, extract::Query, response::Html};
use tokio::sync::Mutex;

use crate::{config::Config, spotify, types::AuthState, warning};

/// OAuth redirect target for `sporlist auth`.
///
/// Any outcome other than a stored token is recorded in [`AuthState::failed`]
/// so the waiting CLI can stop early.
pub async fn callback(
    Query(params): Query<HashMap<String, String>>,
    Extension(config): Extension<Arc<Config>>,
    Extension(shared_state): Extension<Arc<Mutex<Option<AuthState>>>>,
) -> Html<&'static str> {
    let expected = match shared_state.lock().await.as_ref() {
        Some(auth_state) => auth_state.state.clone(),
        None => return Html("<h4>No authorization in progress.</h4>"),
    };

    if let Some(err) = params.get("error") {
        warning!("Authorization was denied: {}", err);
        fail(&shared_state, format!("authorization denied: {err}")).await;
        return Html("<h4>Authorization denied.</h4>");
    }

    if params.get("state") != Some(&expected) {
        warning!("Callback state does not match, ignoring it");
        fail(&shared_state, "callback state does not match".to_string()).await;
        return Html("<h4>State mismatch.</h4>");
    }

    let Some(code) = params.get("code") else {
        fail(&shared_state, "callback without authorization code".to_string()).await;
        return Html("<h4>Missing authorization code.</h4>");
    };

    match spotify::auth::exchange_code(&config, code).await {
        Ok(token) => {
            if let Some(auth_state) = shared_state.lock().await.as_mut() {
                auth_state.token = Some(token);
            }
            Html("<h2>Authentication successful.</h2><p>Close browser window.</p>")
        }
        Err(e) => {
            warning!("Token exchange failed: {}", e);
            fail(&shared_state, format!("token exchange failed: {e}")).await;
            Html("<h4>Login failed.</h4>")
        }
    }
}

async fn fail(shared_state: &Mutex<Option<AuthState>>, reason: String) {
    if let Some(auth_state) = shared_state.lock().await.as_mut() {
        auth_state.failed = Some(reason);
    }
}

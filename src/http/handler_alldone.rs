//! Handles any request to / or the redirect route - Hands the authorization code to the device named in `state`

use axum::{
    extract::{RawQuery, State},
    response::Html,
};
use axum_template::TemplateEngine;
use minijinja::context;

use super::context::AppState;
use crate::{
    errors::{HandoffError, HttpError, Result},
    handoff::{CallbackParams, DeviceTarget, StateParams},
    templates::REDIRECT_TEMPLATE,
};

/// Complete the provider callback by redirecting the browser to the device.
///
/// Responds with 400 when `code`/`state` or the device target inside
/// `state` is missing, and with a page whose script navigates to
/// `http://{device_ip}{callback_path}?code={code}` otherwise.
pub async fn handle_alldone(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> Result<Html<String>> {
    let params =
        CallbackParams::from_query(query.as_deref()).ok_or(HandoffError::MissingCallbackParams)?;

    let state_params = StateParams::decode(&params.state)?;
    let target =
        DeviceTarget::from_state(&state_params).ok_or(HandoffError::MissingDeviceTarget)?;

    let redirect_url = target.redirect_url(&params.code);

    let body = state
        .template_env
        .render(
            REDIRECT_TEMPLATE,
            context! {
                redirect_url => redirect_url,
            },
        )
        .map_err(|err| HttpError::TemplateRenderingFailed(err.to_string()))?;

    Ok(Html(body))
}

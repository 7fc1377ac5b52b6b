//! Profile page. Mock data only; nothing here calls the backend.

use axum::{extract::State, response::Html};
use minijinja::context;

use pneumoscan_common::profile::{demo_activity, demo_security, UserProfile};

use crate::error::WebResult;
use crate::state::SharedState;

pub async fn profile_page(State(state): State<SharedState>) -> WebResult<Html<String>> {
    let user = UserProfile::demo();
    let html = state.templates.render(
        "profile.html",
        context! {
            active => "profile",
            last_login => user.last_login.format("%Y-%m-%d %H:%M").to_string(),
            user => user,
            security => demo_security(),
            activity => demo_activity()
                .into_iter()
                .map(|a| context! {
                    date => a.date.format("%Y-%m-%d").to_string(),
                    action => a.action,
                    patient => a.patient,
                })
                .collect::<Vec<_>>(),
        },
    )?;
    Ok(Html(html))
}

use crate::errors::AppError;
use crate::models::{CheckInRequest, ModeRequest, SessionView, StatsUpdate};
use crate::session::Session;
use crate::state::AppState;
use crate::stats::apply_update;
use crate::ui::render_index;
use axum::{
    extract::State,
    http::{header, HeaderMap, HeaderName},
    response::{Html, Redirect},
    Json,
};
use chrono::{Local, NaiveDate};
use tracing::{info, warn};

pub const SESSION_COOKIE: &str = "journal_session";

/// Response paired with the cookie naming the session it was served from.
pub type WithCookie<T> = ([(HeaderName, String); 1], T);

pub async fn index(State(state): State<AppState>, headers: HeaderMap) -> WithCookie<Html<String>> {
    let today = today();
    let mut sessions = state.sessions.lock().await;
    let (id, session) = sessions.ensure(session_id(&headers));
    with_cookie(&id, Html(render_index(&session.view(today))))
}

pub async fn get_session(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<WithCookie<Json<SessionView>>, AppError> {
    respond(&state, &headers, |_, _| Ok(())).await
}

pub async fn put_stats(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(update): Json<StatsUpdate>,
) -> Result<WithCookie<Json<SessionView>>, AppError> {
    let stats = apply_update(update)?;
    respond(&state, &headers, move |session, _| {
        session.stats = stats;
        Ok(())
    })
    .await
}

pub async fn reflection(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<WithCookie<Json<SessionView>>, AppError> {
    respond(&state, &headers, |session, _| session.request_reflection()).await
}

pub async fn put_mode(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<ModeRequest>,
) -> Result<WithCookie<Json<SessionView>>, AppError> {
    respond(&state, &headers, move |session, _| {
        session.mode = payload.mode;
        Ok(())
    })
    .await
}

pub async fn complete(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<WithCookie<Json<SessionView>>, AppError> {
    respond(&state, &headers, |session, today| {
        if session.complete_today(today) {
            info!(streak = session.streak, "day marked complete");
        }
        Ok(())
    })
    .await
}

pub async fn reset(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<WithCookie<Json<SessionView>>, AppError> {
    respond(&state, &headers, |session, _| session.new_day()).await
}

pub async fn complete_form(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<WithCookie<Redirect>, AppError> {
    let (cookie, _) = complete(State(state), headers).await?;
    Ok((cookie, Redirect::to("/")))
}

pub async fn reset_form(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<WithCookie<Redirect>, AppError> {
    let (cookie, _) = reset(State(state), headers).await?;
    Ok((cookie, Redirect::to("/")))
}

pub async fn check_in(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<CheckInRequest>,
) -> Result<WithCookie<Json<SessionView>>, AppError> {
    let (id, messages) = {
        let mut sessions = state.sessions.lock().await;
        let (id, session) = sessions.ensure(session_id(&headers));
        if let Some(mode) = payload.mode {
            session.mode = mode;
        }
        let messages = session.begin_check_in(&payload.message)?;
        info!(
            mode = session.mode.label(),
            reflection = session.reflection_pending,
            context = messages.len(),
            "sending check-in"
        );
        (id, messages)
    };

    // The lock is released while the upstream call is in flight.
    let outcome = state.chat.send_check_in(&messages).await;

    let today = today();
    let mut sessions = state.sessions.lock().await;
    let Some(session) = sessions.get_mut(&id) else {
        return Err(AppError::conflict("session ended before the reply arrived"));
    };
    match outcome {
        Ok(reply) => {
            session.finish_check_in(reply);
            info!(turns = session.transcript.len(), "check-in answered");
            Ok(with_cookie(&id, Json(session.view(today))))
        }
        Err(err) => {
            session.abort_check_in();
            warn!(error = %err, "chat call failed");
            Err(err.into())
        }
    }
}

/// Applies `apply` to the caller's session and returns the updated view.
async fn respond<F>(
    state: &AppState,
    headers: &HeaderMap,
    apply: F,
) -> Result<WithCookie<Json<SessionView>>, AppError>
where
    F: FnOnce(&mut Session, NaiveDate) -> Result<(), AppError>,
{
    let today = today();
    let mut sessions = state.sessions.lock().await;
    let (id, session) = sessions.ensure(session_id(headers));
    apply(session, today)?;
    Ok(with_cookie(&id, Json(session.view(today))))
}

fn with_cookie<T>(id: &str, body: T) -> WithCookie<T> {
    let cookie = format!("{SESSION_COOKIE}={id}; Path=/; HttpOnly; SameSite=Lax");
    ([(header::SET_COOKIE, cookie)], body)
}

fn session_id(headers: &HeaderMap) -> Option<&str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value)
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn session_id_found_among_other_cookies() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; journal_session=abc-123; lang=en"),
        );
        assert_eq!(session_id(&headers), Some("abc-123"));
    }

    #[test]
    fn session_id_absent_without_cookie() {
        let mut headers = HeaderMap::new();
        assert_eq!(session_id(&headers), None);
        headers.insert(header::COOKIE, HeaderValue::from_static("theme=dark"));
        assert_eq!(session_id(&headers), None);
    }

    #[test]
    fn cookie_names_session() {
        let ([(name, value)], ()) = with_cookie("abc", ());
        assert_eq!(name, header::SET_COOKIE);
        assert!(value.starts_with("journal_session=abc;"));
    }
}

use axum::{
    extract::State,
    response::{Html, Redirect},
};

use crate::{api::AppState, spotify};

pub async fn index() -> Html<&'static str> {
    Html("Login Screen <a href='/login'>Login With Spotify</a>")
}

pub async fn login(State(state): State<AppState>) -> Redirect {
    let url = spotify::auth::build_authorize_url(&state.config);
    Redirect::to(url.as_str())
}

pub async fn authorized() -> Html<&'static str> {
    Html("<h2>Authentication successful.</h2><p>Close browser window.</p>")
}

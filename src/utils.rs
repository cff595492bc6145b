use rand::{Rng, distr::Alphanumeric};
use url::form_urlencoded;

pub const SESSION_ID_LEN: usize = 32;

pub fn generate_session_id() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(SESSION_ID_LEN)
        .map(char::from)
        .collect()
}

/// `/tracks?playlist_ids=a&playlist_ids=b` for the given ids.
pub fn tracks_location(playlist_ids: &[String]) -> String {
    if playlist_ids.is_empty() {
        return "/tracks".to_string();
    }

    let mut query = form_urlencoded::Serializer::new(String::new());
    for id in playlist_ids {
        query.append_pair("playlist_ids", id);
    }
    format!("/tracks?{}", query.finish())
}

/// Every `playlist_ids` value of a raw query string, in order.
pub fn parse_playlist_ids(query: Option<&str>) -> Vec<String> {
    let Some(query) = query else {
        return Vec::new();
    };

    form_urlencoded::parse(query.as_bytes())
        .filter(|(key, value)| key == "playlist_ids" && !value.is_empty())
        .map(|(_, value)| value.into_owned())
        .collect()
}

/// Value of the cookie `name` in a `Cookie` header.
pub fn cookie_value<'a>(header: &'a str, name: &str) -> Option<&'a str> {
    header.split(';').find_map(|pair| {
        let (key, value) = pair.trim().split_once('=')?;
        (key == name).then_some(value)
    })
}

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

/// Session id cookie: host-only, `HttpOnly`, `SameSite=Lax`, whole site.
pub fn session_cookie(name: &str, id: &str) -> Cookie<'static> {
    let mut cookie = Cookie::new(name.to_string(), id.to_string());
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_same_site(SameSite::Lax);
    cookie
}

pub fn session_id(jar: &CookieJar, name: &str) -> Option<String> {
    jar.get(name)
        .map(|cookie| cookie.value().to_string())
        .filter(|id| !id.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cookie_attributes() {
        let cookie = session_cookie("mw_session", "abc");
        assert_eq!(cookie.value(), "abc");
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
    }

    #[test]
    fn reads_id_from_jar() {
        let jar = CookieJar::new().add(session_cookie("mw_session", "abc"));
        assert_eq!(session_id(&jar, "mw_session").as_deref(), Some("abc"));
        assert_eq!(session_id(&jar, "other"), None);
    }
}

//! One-shot notices carried across a redirect in a cookie.

use axum_extra::extract::cookie::{Cookie, CookieJar};

const FLASH_COOKIE: &str = "flash";

pub fn set(jar: CookieJar, message: &str) -> CookieJar {
    let value = urlencoding::encode(message).into_owned();
    jar.add(
        Cookie::build((FLASH_COOKIE, value))
            .path("/")
            .http_only(true),
    )
}

/// Reads the pending notice, if any, and clears it.
pub fn take(jar: CookieJar) -> (CookieJar, Option<String>) {
    let message = jar
        .get(FLASH_COOKIE)
        .and_then(|cookie| urlencoding::decode(cookie.value()).ok())
        .map(|message| message.into_owned())
        .filter(|message| !message.is_empty());

    if message.is_none() {
        return (jar, None);
    }

    let jar = jar.remove(Cookie::build(FLASH_COOKIE).path("/"));
    (jar, message)
}

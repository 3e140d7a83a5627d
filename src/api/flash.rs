//! One-time notices carried across a redirect in a cookie.
//!
//! The cookie stores a short key rather than the text itself; the next
//! settings page resolves the key to a message and clears the cookie.

use axum_extra::extract::cookie::{Cookie, CookieJar};

use crate::config::{FLASH_COOKIE, FLASH_COOKIE_PATH};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flash {
    ProfileUpdated,
    PasswordUpdated,
}

impl Flash {
    fn key(self) -> &'static str {
        match self {
            Flash::ProfileUpdated => "profile-updated",
            Flash::PasswordUpdated => "password-updated",
        }
    }

    fn from_key(key: &str) -> Option<Self> {
        match key {
            "profile-updated" => Some(Flash::ProfileUpdated),
            "password-updated" => Some(Flash::PasswordUpdated),
            _ => None,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Flash::ProfileUpdated => "프로필을 수정했습니다.",
            Flash::PasswordUpdated => "패스워드를 변경했습니다.",
        }
    }
}

/// Queue a notice for the next settings page.
pub fn set(jar: CookieJar, flash: Flash) -> CookieJar {
    jar.add(
        Cookie::build((FLASH_COOKIE, flash.key()))
            .path(FLASH_COOKIE_PATH)
            .http_only(true),
    )
}

/// Consume the pending notice, if any.
pub fn take(jar: CookieJar) -> (CookieJar, Option<String>) {
    let Some(cookie) = jar.get(FLASH_COOKIE) else {
        return (jar, None);
    };

    let message = Flash::from_key(cookie.value()).map(|f| f.message().to_string());
    let jar = jar.remove(Cookie::build(FLASH_COOKIE).path(FLASH_COOKIE_PATH));
    (jar, message)
}

use std::convert::Infallible;

use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use axum::response::{IntoResponseParts, ResponseParts};
use axum_extra::extract::cookie::{Cookie, Key, SignedCookieJar};

const USERNAME_COOKIE: &str = "vellum_user";
const MESSAGE_COOKIE: &str = "vellum_message";
const ERROR_COOKIE: &str = "vellum_error";

/// One-shot flash strings pulled out of the session for rendering.
#[derive(Debug, Default, Clone)]
pub struct Flash {
    pub message: Option<String>,
    pub error: Option<String>,
}

/// Signed-cookie session: an optional username plus one-shot flash fields.
///
/// Extract it in a handler, mutate it, and return it as a response part so
/// the cookie changes reach the browser. Cookies with a bad signature are
/// treated as absent by the jar.
pub struct Session {
    jar: SignedCookieJar,
}

impl Session {
    pub fn username(&self) -> Option<String> {
        self.jar.get(USERNAME_COOKIE).map(|c| c.value().to_string())
    }

    pub fn sign_in(&mut self, username: &str) {
        self.add(Self::cookie(USERNAME_COOKIE, username.to_string()));
    }

    pub fn sign_out(&mut self) {
        self.remove(USERNAME_COOKIE);
    }

    /// Queue a one-shot notice shown on the next rendered page.
    pub fn flash_message(&mut self, message: impl Into<String>) {
        self.add(Self::cookie(MESSAGE_COOKIE, message.into()));
    }

    /// Queue a one-shot error shown on the next rendered page.
    pub fn flash_error(&mut self, error: impl Into<String>) {
        self.add(Self::cookie(ERROR_COOKIE, error.into()));
    }

    /// Remove and return the one-shot flash fields; they render exactly once.
    pub fn take_flash(&mut self) -> Flash {
        let message = self.jar.get(MESSAGE_COOKIE).map(|c| c.value().to_string());
        let error = self.jar.get(ERROR_COOKIE).map(|c| c.value().to_string());
        if message.is_some() {
            self.remove(MESSAGE_COOKIE);
        }
        if error.is_some() {
            self.remove(ERROR_COOKIE);
        }
        Flash { message, error }
    }

    fn add(&mut self, cookie: Cookie<'static>) {
        self.jar = self.jar.clone().add(cookie);
    }

    fn remove(&mut self, name: &'static str) {
        // The removal cookie must carry the same path as the original.
        self.jar = self
            .jar
            .clone()
            .remove(Cookie::build((name, "")).path("/").build());
    }

    fn cookie(name: &'static str, value: String) -> Cookie<'static> {
        Cookie::build((name, value)).path("/").http_only(true).build()
    }
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for Session
where
    S: Send + Sync,
    Key: FromRef<S>,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let jar = SignedCookieJar::from_request_parts(parts, state).await?;
        Ok(Session { jar })
    }
}

impl IntoResponseParts for Session {
    type Error = Infallible;

    fn into_response_parts(self, res: ResponseParts) -> Result<ResponseParts, Self::Error> {
        self.jar.into_response_parts(res)
    }
}

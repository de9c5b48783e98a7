//! One-shot flash messages carried across a redirect in a cookie.

use axum::http::{HeaderMap, HeaderValue};
use serde::Serialize;

use crate::shared::constants::FLASH_COOKIE;
use crate::shared::cookies::{build_cookie, expire_cookie, read_cookie};

const FLASH_MAX_AGE_SECS: u64 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashCategory {
    Success,
    Danger,
}

impl FlashCategory {
    fn as_str(&self) -> &'static str {
        match self {
            FlashCategory::Success => "success",
            FlashCategory::Danger => "danger",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Flash {
    pub message: String,
    pub category: FlashCategory,
}

impl Flash {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            category: FlashCategory::Success,
        }
    }

    pub fn danger(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            category: FlashCategory::Danger,
        }
    }

    /// `Set-Cookie` value that carries this flash to the next page
    pub fn to_cookie(&self) -> HeaderValue {
        let value = format!("{}:{}", self.category.as_str(), self.message);
        build_cookie(
            FLASH_COOKIE,
            &urlencoding::encode(&value),
            FLASH_MAX_AGE_SECS,
            false,
        )
    }

    /// Read a pending flash from the request cookies
    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        let raw = read_cookie(headers, FLASH_COOKIE)?;
        let decoded = urlencoding::decode(&raw).ok()?;
        let (category, message) = decoded.split_once(':')?;

        let category = match category {
            "success" => FlashCategory::Success,
            "danger" => FlashCategory::Danger,
            _ => return None,
        };

        Some(Self {
            message: message.to_string(),
            category,
        })
    }

    /// `Set-Cookie` value that consumes a displayed flash
    pub fn clear_cookie() -> HeaderValue {
        expire_cookie(FLASH_COOKIE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header;

    #[test]
    fn test_flash_survives_cookie_transport() {
        let flash = Flash::success("Account created! Please login.");
        let set_cookie = flash.to_cookie();
        let pair = set_cookie.to_str().unwrap().split(';').next().unwrap().to_string();

        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_str(&pair).unwrap());

        assert_eq!(Flash::from_headers(&headers), Some(flash));
    }

    #[test]
    fn test_garbage_cookie_is_ignored() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("flash=nonsense"));
        assert_eq!(Flash::from_headers(&headers), None);
    }
}

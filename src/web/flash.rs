//! One-shot flash messages carried in a signed cookie.

use anyhow::Result;
use axum::http::{HeaderMap, header::COOKIE};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

pub const FLASH_COOKIE: &str = "flash";

/// Seconds a flash survives if nothing renders it.
const FLASH_TTL_SECONDS: i64 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashLevel {
    Success,
    Error,
}

impl FlashLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    pub level: FlashLevel,
    pub message: String,
}

impl Flash {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Error,
            message: message.into(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct FlashClaims {
    #[serde(flatten)]
    flash: Flash,
    exp: usize,
    iat: usize,
}

pub struct FlashSigner {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl FlashSigner {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_ref()),
            decoding_key: DecodingKey::from_secret(secret.as_ref()),
        }
    }

    pub fn sign(&self, flash: &Flash) -> Result<String> {
        let now = Utc::now();
        let claims = FlashClaims {
            flash: flash.clone(),
            exp: (now + Duration::seconds(FLASH_TTL_SECONDS)).timestamp() as usize,
            iat: now.timestamp() as usize,
        };
        Ok(encode(&Header::default(), &claims, &self.encoding_key)?)
    }

    pub fn verify(&self, token: &str) -> Result<Flash> {
        let mut validation = Validation::default();
        validation.leeway = 5;
        let data = decode::<FlashClaims>(token, &self.decoding_key, &validation)?;
        Ok(data.claims.flash)
    }

    /// `Set-Cookie` value carrying `flash`.
    pub fn set_cookie(&self, flash: &Flash) -> Result<String> {
        let token = self.sign(flash)?;
        Ok(format!(
            "{FLASH_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={FLASH_TTL_SECONDS}"
        ))
    }

    /// Read the flash from request cookies. Forged or expired cookies read as none.
    pub fn from_headers(&self, headers: &HeaderMap) -> Option<Flash> {
        let token = cookie_value(headers, FLASH_COOKIE)?;
        self.verify(token).ok()
    }
}

/// `Set-Cookie` value that removes the flash cookie.
pub fn clear_cookie() -> String {
    format!("{FLASH_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}

fn cookie_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value)
        .filter(|value| !value.is_empty())
}

//! Service Account Authentication
//!
//! サービスアカウントの鍵ファイルからRS256署名のJWTを生成し、
//! トークンエンドポイントでアクセストークンと交換する。

use std::path::Path;

use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};

use crate::error::SyncError;

/// 読み取り専用スコープ
pub const SHEETS_READONLY_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets.readonly";

const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// アサーションの有効期間（秒）
const ASSERTION_LIFETIME_SECS: i64 = 3600;

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

/// サービスアカウントの鍵ファイル（必要なフィールドのみ）
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

#[derive(Debug, Serialize, PartialEq)]
struct Claims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<u64>,
}

impl ServiceAccountKey {
    /// 鍵ファイルを読み込む
    pub fn from_file(path: &Path) -> Result<Self, SyncError> {
        let raw = std::fs::read_to_string(path)?;
        serde_json::from_str(&raw).map_err(|e| {
            SyncError::Auth(format!(
                "Invalid service account file {}: {}",
                path.display(),
                e
            ))
        })
    }

    fn claims<'a>(&'a self, scope: &'a str, issued_at: i64) -> Claims<'a> {
        Claims {
            iss: &self.client_email,
            scope,
            aud: &self.token_uri,
            iat: issued_at,
            exp: issued_at + ASSERTION_LIFETIME_SECS,
        }
    }

    /// 署名済みのJWTアサーションを生成
    pub fn assertion(&self, scope: &str, issued_at: i64) -> Result<String, SyncError> {
        let key = EncodingKey::from_rsa_pem(self.private_key.as_bytes())
            .map_err(|e| SyncError::Auth(format!("Invalid private key: {}", e)))?;

        encode(
            &Header::new(Algorithm::RS256),
            &self.claims(scope, issued_at),
            &key,
        )
        .map_err(|e| SyncError::Auth(format!("Failed to sign assertion: {}", e)))
    }

    /// アクセストークンを取得する
    pub fn fetch_access_token(
        &self,
        http: &reqwest::blocking::Client,
        scope: &str,
    ) -> Result<String, SyncError> {
        let assertion = self.assertion(scope, chrono::Utc::now().timestamp())?;

        tracing::debug!("Requesting access token from {}", self.token_uri);
        let response = http
            .post(&self.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(SyncError::Auth(format!(
                "Token endpoint returned status {}: {}",
                status.as_u16(),
                body
            )));
        }

        let token: TokenResponse = response.json()?;
        if let Some(expires_in) = token.expires_in {
            tracing::debug!("Access token valid for {}s", expires_in);
        }
        Ok(token.access_token)
    }
}

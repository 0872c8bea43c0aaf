use actix_web::middleware::Next;
use actix_web::{
    Error, HttpResponse,
    body::BoxBody,
    dev::{ServiceRequest, ServiceResponse},
    web,
};
use subtle::ConstantTimeEq;
use tracing::{debug, info, trace};

use crate::api::constants::API_KEY_HEADER;
use crate::api::jwt::JwtService;
use crate::config::AuthConfig;

/// `/check-ip` 鉴权配置（作为 app_data 注入）
pub struct AuthGate {
    enabled: bool,
    shared_key: String,
    jwt: JwtService,
}

impl AuthGate {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            enabled: config.enabled,
            shared_key: config.shared_key.clone(),
            jwt: JwtService::new(&config.jwt_secret),
        }
    }

    pub fn disabled() -> Self {
        Self::new(&AuthConfig::default())
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn key_matches(&self, provided: Option<&[u8]>) -> bool {
        match provided {
            Some(provided) => provided.ct_eq(self.shared_key.as_bytes()).into(),
            None => false,
        }
    }
}

fn unauthorized(req: ServiceRequest, message: impl Into<String>) -> ServiceResponse<BoxBody> {
    req.into_response(
        HttpResponse::Unauthorized()
            .insert_header(("Content-Type", "application/json; charset=utf-8"))
            .json(serde_json::json!({ "message": message.into() })),
    )
}

pub struct IpAuthorization;

impl IpAuthorization {
    /// 共享密钥 + Bearer JWT 两级校验
    pub async fn check(
        req: ServiceRequest,
        next: Next<BoxBody>,
    ) -> Result<ServiceResponse<BoxBody>, Error> {
        let Some(gate) = req.app_data::<web::Data<AuthGate>>().cloned() else {
            debug!("AuthGate not registered, authorization skipped");
            return next.call(req).await;
        };

        if !gate.is_enabled() {
            return next.call(req).await;
        }

        let provided_key = req.headers().get(API_KEY_HEADER).map(|v| v.as_bytes());
        if !gate.key_matches(provided_key) {
            info!("Authorization failed: {} mismatch or missing", API_KEY_HEADER);
            return Ok(unauthorized(req, "Unauthorized"));
        }

        let token = req
            .headers()
            .get("Authorization")
            .and_then(|h| h.to_str().ok())
            .and_then(|s| s.strip_prefix("Bearer "))
            .map(str::to_string);

        let Some(token) = token else {
            info!("Authorization failed: bearer token not provided");
            return Ok(unauthorized(req, "Token not provided"));
        };

        match gate.jwt.validate_token(&token) {
            Ok(claims) => {
                trace!("Bearer token accepted for subject {}", claims.sub);
                next.call(req).await
            }
            Err(e) => {
                info!("Bearer token validation failed: {}", e);
                Ok(unauthorized(req, format!("Invalid token: {}", e)))
            }
        }
    }
}

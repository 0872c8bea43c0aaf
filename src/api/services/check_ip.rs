use actix_web::dev::HttpServiceFactory;
use actix_web::{HttpRequest, HttpResponse, Responder, http::header::CONTENT_TYPE, web};
use serde::Deserialize;
use tracing::{debug, trace};

use crate::api::constants::CHECK_IP_PATH;
use crate::api::middleware::IpAuthorization;
use crate::services::{LookupRequest, LookupService};
use crate::utils::ip::extract_client_ip;

/// `ip` / `timezone`，来自 query、JSON 或表单
#[derive(Debug, Default, Clone, Deserialize)]
pub struct CheckIpParams {
    #[serde(default)]
    pub ip: Option<String>,
    #[serde(default)]
    pub timezone: Option<String>,
}

impl CheckIpParams {
    /// body 中的字段优先于 query
    fn merge(self, body: CheckIpParams) -> CheckIpParams {
        CheckIpParams {
            ip: body.ip.or(self.ip),
            timezone: body.timezone.or(self.timezone),
        }
    }
}

/// 解析 urlencoded 键值对；重复键末条生效，其余键忽略
fn parse_pairs(input: &str) -> Result<CheckIpParams, String> {
    let pairs = web::Query::<Vec<(String, String)>>::from_query(input)
        .map(web::Query::into_inner)
        .map_err(|e| e.to_string())?;

    let mut params = CheckIpParams::default();
    for (key, value) in pairs {
        match key.as_str() {
            "ip" => params.ip = Some(value),
            "timezone" => params.timezone = Some(value),
            _ => {}
        }
    }
    Ok(params)
}

/// 解析 query string；无法解析时视为空
fn parse_query(req: &HttpRequest) -> CheckIpParams {
    parse_pairs(req.query_string()).unwrap_or_else(|e| {
        debug!("Ignoring unparseable /check-ip query: {}", e);
        CheckIpParams::default()
    })
}

/// 解析 POST body；无法解析时视为空
fn parse_body(req: &HttpRequest, body: &[u8]) -> CheckIpParams {
    if body.is_empty() {
        return CheckIpParams::default();
    }

    let is_json = req
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.contains("json"));

    let parsed = if is_json {
        serde_json::from_slice::<CheckIpParams>(body).map_err(|e| e.to_string())
    } else {
        std::str::from_utf8(body)
            .map_err(|e| e.to_string())
            .and_then(parse_pairs)
    };

    parsed.unwrap_or_else(|e| {
        debug!("Ignoring unparseable /check-ip body: {}", e);
        CheckIpParams::default()
    })
}

pub struct CheckIpService;

impl CheckIpService {
    pub async fn check_get(req: HttpRequest, lookup: web::Data<LookupService>) -> impl Responder {
        let params = parse_query(&req);
        Self::respond(&req, params, &lookup).await
    }

    pub async fn check_post(
        req: HttpRequest,
        body: web::Bytes,
        lookup: web::Data<LookupService>,
    ) -> impl Responder {
        let params = parse_query(&req).merge(parse_body(&req, &body));
        Self::respond(&req, params, &lookup).await
    }

    async fn respond(
        req: &HttpRequest,
        params: CheckIpParams,
        lookup: &LookupService,
    ) -> HttpResponse {
        let ip = extract_client_ip(req, params.ip.as_deref());
        trace!("check-ip request: ip={:?}, timezone={:?}", ip, params.timezone);

        let outcome = lookup.check(LookupRequest::new(ip, params.timezone)).await;
        HttpResponse::Ok().json(outcome)
    }
}

/// `GET|POST /check-ip`，带鉴权
pub fn check_ip_routes() -> impl HttpServiceFactory {
    web::resource(CHECK_IP_PATH)
        .wrap(actix_web::middleware::from_fn(IpAuthorization::check))
        .route(web::get().to(CheckIpService::check_get))
        .route(web::post().to(CheckIpService::check_post))
}

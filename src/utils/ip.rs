//! IP 地址处理工具
//!
//! - 点分十进制 ↔ 32 位数值互转
//! - 回环地址识别
//! - 从 HTTP 请求提取客户端 IP（显式参数 → CF-Connecting-IP → 连接地址）

use std::net::Ipv4Addr;

use actix_web::HttpRequest;
use tracing::trace;

use crate::errors::{IpCountryError, Result};

/// Cloudflare 注入的真实客户端 IP 头
pub const CF_CONNECTING_IP: &str = "CF-Connecting-IP";

/// 将 IP 字面量转换为 32 位数值
///
/// 纯数字直接透传（必须落在 u32 范围内），否则按点分十进制 IPv4 解析。
pub fn ip_to_numeric(literal: &str) -> Result<u32> {
    let literal = literal.trim();

    if !literal.is_empty() && literal.bytes().all(|b| b.is_ascii_digit()) {
        return literal
            .parse::<u32>()
            .map_err(|_| IpCountryError::malformed_address(format!("Wrong format: {}", literal)));
    }

    literal
        .parse::<Ipv4Addr>()
        .map(u32::from)
        .map_err(|_| IpCountryError::malformed_address(format!("Wrong format: {}", literal)))
}

/// 32 位数值还原为点分十进制
pub fn numeric_to_ip(value: u32) -> Ipv4Addr {
    Ipv4Addr::from(value)
}

/// 是否为回环地址字面量（127.0.0.1 / ::1）
pub fn is_loopback_literal(ip: &str) -> bool {
    matches!(ip.trim(), "127.0.0.1" | "::1")
}

/// 从 HttpRequest 提取客户端 IP
///
/// 优先级：
/// 1. 请求显式携带的 `ip` 字段（query 或 body，由调用方传入）
/// 2. `CF-Connecting-IP` 头
/// 3. 传输层对端地址
pub fn extract_client_ip(req: &HttpRequest, explicit: Option<&str>) -> Option<String> {
    if let Some(ip) = explicit.map(str::trim).filter(|s| !s.is_empty()) {
        trace!("Client IP from request field: {}", ip);
        return Some(ip.to_string());
    }

    if let Some(ip) = req
        .headers()
        .get(CF_CONNECTING_IP)
        .and_then(|h| h.to_str().ok())
        .map(str::trim)
        .filter(|s| !s.is_empty())
    {
        trace!("Client IP from {} header: {}", CF_CONNECTING_IP, ip);
        return Some(ip.to_string());
    }

    req.peer_addr().map(|addr| addr.ip().to_string())
}

//! API 模块常量定义

/// 共享密钥请求头
pub const API_KEY_HEADER: &str = "X-IPCountry-Key";

/// 查询端点路径
pub const CHECK_IP_PATH: &str = "/check-ip";

/// POST 请求体上限
pub const MAX_BODY_BYTES: usize = 16 * 1024;

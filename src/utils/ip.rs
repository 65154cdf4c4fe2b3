//! IP 地址处理工具
//!
//! 访问统计以调用方网络地址作为 origin。默认使用连接 IP，
//! 仅当连接来自可信代理时才采用 X-Forwarded-For。

use std::net::{IpAddr, SocketAddr};

use actix_web::HttpRequest;
use tracing::debug;

/// Origin used when no address can be determined
pub const UNKNOWN_ORIGIN: &str = "unknown";

/// 检查 IP 是否在可信代理列表中
pub fn is_trusted_proxy(ip: &str, trusted_proxies: &[String]) -> bool {
    // 先尝试解析为 SocketAddr（支持 ip:port），如果失败再尝试纯 IpAddr
    let ip_addr = if let Ok(socket_addr) = ip.parse::<SocketAddr>() {
        socket_addr.ip()
    } else if let Ok(ip_addr) = ip.parse::<IpAddr>() {
        ip_addr
    } else {
        return false;
    };

    trusted_proxies.iter().any(|proxy| {
        if proxy.contains('/') {
            ip_in_cidr(&ip_addr, proxy)
        } else {
            proxy.parse::<IpAddr>().is_ok_and(|proxy_addr| proxy_addr == ip_addr)
        }
    })
}

/// CIDR 检查
pub fn ip_in_cidr(ip: &IpAddr, cidr: &str) -> bool {
    let Some((network, prefix_len)) = cidr.split_once('/') else {
        return false;
    };

    let Ok(prefix_len): Result<u8, _> = prefix_len.parse() else {
        return false;
    };

    let Ok(network_addr) = network.parse::<IpAddr>() else {
        return false;
    };

    match (ip, network_addr) {
        (IpAddr::V4(ip), IpAddr::V4(net)) => {
            if prefix_len > 32 {
                return false;
            }
            let mask = u32::MAX.checked_shl(32 - prefix_len as u32).unwrap_or(0);
            (u32::from(*ip) & mask) == (u32::from(net) & mask)
        }
        (IpAddr::V6(ip), IpAddr::V6(net)) => {
            if prefix_len > 128 {
                return false;
            }
            let mask = u128::MAX.checked_shl(128 - prefix_len as u32).unwrap_or(0);
            (u128::from(*ip) & mask) == (u128::from(net) & mask)
        }
        _ => false, // IPv4 vs IPv6 不匹配
    }
}

/// Strip a trailing `:port` (and IPv6 brackets) from a peer address
fn host_only(addr: &str) -> String {
    addr.parse::<SocketAddr>()
        .map(|socket| socket.ip().to_string())
        .unwrap_or_else(|_| addr.to_string())
}

/// 提取客户端 IP，作为访问统计的 origin
pub fn extract_client_ip(req: &HttpRequest, trusted_proxies: &[String]) -> Option<String> {
    let conn_info = req.connection_info();
    let peer = conn_info.peer_addr()?;

    if !trusted_proxies.is_empty() && is_trusted_proxy(peer, trusted_proxies) {
        let real_ip = conn_info.realip_remote_addr().unwrap_or(peer);
        debug!("Trusted proxy: {} -> {}", peer, real_ip);
        return Some(host_only(real_ip));
    }

    Some(host_only(peer))
}

/// [`extract_client_ip`] with the `"unknown"` fallback
pub fn origin_of(req: &HttpRequest, trusted_proxies: &[String]) -> String {
    extract_client_ip(req, trusted_proxies).unwrap_or_else(|| UNKNOWN_ORIGIN.to_string())
}

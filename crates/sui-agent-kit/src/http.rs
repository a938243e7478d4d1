use eyre::Context as _;
use reqwest::Client;
use std::time::Duration;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

const LOOPBACK_HOSTS: [&str; 3] = ["127.0.0.1", "localhost", "[::1]"];

/// `http://` URLs are only allowed when the host is the local machine.
fn is_loopback_http(url: &str) -> bool {
    let Some(rest) = url.strip_prefix("http://") else {
        return false;
    };
    let authority = rest.split('/').next().unwrap_or_default();
    let host = if authority.starts_with('[') {
        authority
            .find(']')
            .and_then(|end| authority.get(..=end))
            .unwrap_or(authority)
    } else {
        authority.split(':').next().unwrap_or_default()
    };
    LOOPBACK_HOSTS.contains(&host)
}

pub fn ensure_https_or_loopback(url: &str, name: &str) -> eyre::Result<()> {
    let url = url.trim();
    if url.starts_with("https://") || is_loopback_http(url) {
        return Ok(());
    }
    eyre::bail!("{name} must be https, or plain http on a loopback host: {url}");
}

pub fn client(timeout: Duration) -> eyre::Result<Client> {
    Client::builder()
        .timeout(timeout)
        .build()
        .context("build http client")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_https_or_loopback_is_allowed() {
        assert!(ensure_https_or_loopback("https://fullnode.mainnet.sui.io:443", "rpc").is_ok());
        assert!(ensure_https_or_loopback("http://127.0.0.1:9000", "rpc").is_ok());
        assert!(ensure_https_or_loopback("http://localhost", "rpc").is_ok());
        assert!(ensure_https_or_loopback("http://localhost.evil.com", "rpc").is_err());
        assert!(ensure_https_or_loopback("http://fullnode.sui.io", "rpc").is_err());
        assert!(ensure_https_or_loopback("http://[::1]:9000/", "rpc").is_ok());
        assert!(ensure_https_or_loopback("http://127.0.0.1.nip.io", "rpc").is_err());
    }
}

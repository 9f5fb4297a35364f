//! Validation of user-supplied URLs and the short site name used in report titles.

use url::{Host, Url};

use crate::errors::AppError;

const INVALID_URL: &str = "Please enter a valid URL.";

/// Parses and checks a user-supplied URL.
///
/// Accepts absolute `http`/`https` URLs whose host is a dotted domain, `localhost`,
/// or an IP literal. Surrounding whitespace is ignored.
pub fn validate_url(input: &str) -> Result<Url, AppError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(AppError::Validation(INVALID_URL.to_string()));
    }

    let url = Url::parse(input).map_err(|_| AppError::Validation(INVALID_URL.to_string()))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(AppError::Validation(INVALID_URL.to_string()));
    }

    let host_ok = match url.host() {
        Some(Host::Domain(domain)) => {
            domain == "localhost"
                || (domain.contains('.') && domain.split('.').all(|label| !label.is_empty()))
        }
        Some(Host::Ipv4(_)) | Some(Host::Ipv6(_)) => true,
        None => false,
    };

    if !host_ok {
        return Err(AppError::Validation(INVALID_URL.to_string()));
    }

    Ok(url)
}

/// Short, capitalized site name: `https://www.example.com/x` → `Example`.
///
/// Strips a `www.` prefix, keeps the first dot-separated label and upper-cases its
/// first character. Falls back to `Website` when the URL has no host.
pub fn domain_label(url: &Url) -> String {
    let Some(host) = url.host_str() else {
        return "Website".to_string();
    };

    let host = host.replace("www.", "");
    let first = host.split('.').next().unwrap_or_default();

    let mut chars = first.chars();
    match chars.next() {
        Some(c) => c.to_uppercase().chain(chars).collect(),
        None => "Website".to_string(),
    }
}

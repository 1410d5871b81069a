// src/services/expand.rs

//! URL expander.
//!
//! Derives probe URL candidates from an asset. Wildcards expand into a fixed
//! list of common subdomains; there is no DNS lookup or liveness check.

use url::Url;

use crate::models::{Asset, AssetType, ProbeUrl};

/// Subdomain labels tried under a wildcard's base domain, in order.
pub const WILDCARD_LABELS: [&str; 8] = [
    "www", "api", "admin", "portal", "app", "beta", "staging", "dev",
];

/// Raw candidate strings for an asset, before validation.
fn candidates(asset: &Asset) -> Vec<String> {
    let identifier = asset.identifier.as_str();
    match asset.asset_type {
        AssetType::Url if identifier.starts_with("http://") || identifier.starts_with("https://") => {
            vec![identifier.to_string()]
        }
        AssetType::Wildcard => match identifier.strip_prefix("*.") {
            Some(domain) => std::iter::once(format!("https://{domain}"))
                .chain(
                    WILDCARD_LABELS
                        .iter()
                        .map(|label| format!("https://{label}.{domain}")),
                )
                .collect(),
            None => vec![format!("https://{identifier}")],
        },
        AssetType::Url => vec![format!("https://{identifier}")],
    }
}

/// Whether a candidate parses as a URL with a non-empty host.
pub fn has_host(candidate: &str) -> bool {
    Url::parse(candidate)
        .ok()
        .and_then(|url| url.host_str().map(|host| !host.is_empty()))
        .unwrap_or(false)
}

/// Validated candidate URL strings for an asset.
///
/// Candidates that fail to parse, or parse without a host, are dropped one
/// at a time.
pub fn expand(asset: &Asset) -> impl Iterator<Item = String> {
    candidates(asset).into_iter().filter(|candidate| {
        let keep = has_host(candidate);
        if !keep {
            log::debug!("Discarding probe candidate without host: {}", candidate);
        }
        keep
    })
}

/// Probe URLs for an asset, tagged with its program, platform and type.
pub fn probe_urls(asset: &Asset) -> impl Iterator<Item = ProbeUrl> + '_ {
    expand(asset).map(move |url| ProbeUrl::for_asset(url, asset))
}

//! Credential scrubbing for collector log output.
//!
//! Failure messages from user collect functions and must-gather runs can
//! carry cluster credentials (kubeconfig fragments, bearer tokens, URLs with
//! basic auth). They are scrubbed before being logged.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref CREDENTIAL_PATTERNS: Vec<(Regex, &'static str)> = vec![
        // kubeconfig client credentials
        (Regex::new(r"(?i)(client-key-data|client-certificate-data)\s*:\s*([A-Za-z0-9+/=]+)").unwrap(),
         "$1: <REDACTED_KEY_DATA>"),

        // Bearer tokens
        (Regex::new(r"(?i)(authorization\s*[:=]\s*(?:bearer\s+)?|bearer\s+)([A-Za-z0-9\-._~+/]{8,}=*)").unwrap(),
         "$1<REDACTED_TOKEN>"),

        // Generic tokens, including kubeconfig `token:` entries
        (Regex::new(r"(?i)(token|access[_-]?token|auth[_-]?token)\s*[:=]\s*([A-Za-z0-9\-._~+/]{8,}=*)").unwrap(),
         "$1=<REDACTED_TOKEN>"),

        // Generic passwords
        (Regex::new(r"(?i)(password|passwd|pwd)\s*[:=]\s*([^\s]+)").unwrap(),
         "$1=<REDACTED_PASSWORD>"),

        // Basic auth in URLs
        (Regex::new(r"(https?://)([^:/\s]+):([^@\s]+)@").unwrap(),
         "$1<REDACTED_USER>:<REDACTED_PASS>@"),
    ];
}

/// Replaces anything that looks like a credential with a placeholder.
///
/// ```
/// use ocp_data_collector::security::scrub_credentials;
///
/// let scrubbed = scrub_credentials("login failed: password=hunter22");
/// assert_eq!(scrubbed, "login failed: password=<REDACTED_PASSWORD>");
/// ```
pub fn scrub_credentials(input: &str) -> String {
    let mut result = input.to_string();

    for (pattern, replacement) in CREDENTIAL_PATTERNS.iter() {
        result = pattern.replace_all(&result, *replacement).to_string();
    }

    result
}

/// Formats `context: error` and scrubs the result.
pub fn safe_error_message(context: &str, error: &impl std::fmt::Display) -> String {
    scrub_credentials(&format!("{}: {}", context, error))
}

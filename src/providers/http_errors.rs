use anyhow::anyhow;
use std::error::Error as StdError;
use std::io::ErrorKind;

/// Walks the source chain looking for an io error of `kind`, or a message
/// containing `needle` for transports that only expose text.
fn error_chain_matches(err: &(dyn StdError + 'static), kind: ErrorKind, needle: &str) -> bool {
    let mut current: Option<&(dyn StdError + 'static)> = Some(err);
    while let Some(source) = current {
        let io_kind_matches = source
            .downcast_ref::<std::io::Error>()
            .is_some_and(|io_err| io_err.kind() == kind);
        if io_kind_matches || source.to_string().to_ascii_lowercase().contains(needle) {
            return true;
        }
        current = source.source();
    }

    false
}

fn error_chain_has_timeout(err: &(dyn StdError + 'static)) -> bool {
    error_chain_matches(err, ErrorKind::TimedOut, "timed out")
}

fn error_chain_has_connection_refused(err: &(dyn StdError + 'static)) -> bool {
    error_chain_matches(err, ErrorKind::ConnectionRefused, "connection refused")
}

pub(crate) fn completion_api_request_error(
    err: reqwest::Error,
    api_url: &str,
    timeout_secs: u64,
) -> anyhow::Error {
    if err.is_timeout() || error_chain_has_timeout(&err) {
        return anyhow!(
            "Completion request timed out after {}s while calling '{}'. \
             Increase MODEL_TIMEOUT_SECS or try again later.",
            timeout_secs,
            api_url
        );
    }

    if !err.is_connect() {
        return anyhow!("Failed to call completion API at '{}': {}", api_url, err);
    }

    if error_chain_has_connection_refused(&err) {
        anyhow!(
            "Connection refused by completion API at '{}'. \
             Check that DEEPSEEK_API_URL points at a running endpoint.",
            api_url
        )
    } else {
        anyhow!(
            "Failed to connect to completion API at '{}'. \
             Check DEEPSEEK_API_URL and network connectivity.",
            api_url
        )
    }
}

use std::fmt;

use tracing::warn;
use xmlmap::Value;

use crate::error::WinRmError;

/// `f:WSManFault` code reported when a long-poll receive produced no output
/// within the operation timeout (`ERROR_WSMAN_OPERATION_TIMEDOUT`).
pub const WSMAN_FAULT_CODE_OPERATION_TIMEOUT: &str = "2150858793";

// Fixed fault-envelope paths, with the namespace prefixes the service emits.
const FAULT_CODE_PATH: &[&str] = &["s:Envelope", "s:Body", "s:Fault", "s:Code", "s:Value"];
const FAULT_SUBCODE_PATH: &[&str] = &[
    "s:Envelope",
    "s:Body",
    "s:Fault",
    "s:Code",
    "s:Subcode",
    "s:Value",
];
const FAULT_REASON_PATH: &[&str] = &["s:Envelope", "s:Body", "s:Fault", "s:Reason", "s:Text"];
const WSMAN_FAULT_CODE_PATH: &[&str] = &[
    "s:Envelope",
    "s:Body",
    "s:Fault",
    "s:Detail",
    "f:WSManFault",
    "@Code",
];

/// Unexpected HTTP response returned by the remote management endpoint.
///
/// Carries the raw response so the SOAP fault details can be recovered after
/// the fact. Every fault accessor is total: a missing or malformed fault
/// payload degrades to `None` plus a warning log entry, never to a panic or
/// a secondary error.
#[derive(Debug, Clone, typed_builder::TypedBuilder)]
pub struct TransportError {
    /// Transport identifier, e.g. "http" or "https".
    #[builder(setter(into))]
    pub protocol: String,
    /// HTTP status code as received; no range validation is applied.
    pub status_code: u16,
    /// Raw response body, possibly empty or not XML at all.
    #[builder(setter(into))]
    pub response_text: String,
}

impl TransportError {
    /// The response body as a generic XML tree, re-parsed on every call.
    pub fn parsed_response(&self) -> Option<Value> {
        match xmlmap::parse(&self.response_text) {
            Ok(parsed) => Some(parsed),
            Err(error) => {
                warn!(%error, "response body is not a well-formed XML document");
                None
            }
        }
    }

    /// SOAP fault code (`s:Code/s:Value`), when present.
    pub fn fault_code(&self) -> Option<String> {
        self.fault_lookup("fault code", FAULT_CODE_PATH)
    }

    /// SOAP fault subcode (`s:Code/s:Subcode/s:Value`), when present.
    pub fn fault_subcode(&self) -> Option<String> {
        self.fault_lookup("fault subcode", FAULT_SUBCODE_PATH)
    }

    /// Human-readable fault reason (`s:Reason/s:Text`), when present.
    pub fn fault_reason(&self) -> Option<String> {
        self.fault_lookup("fault reason", FAULT_REASON_PATH)
    }

    /// Numeric code of the `f:WSManFault` detail element, when present.
    pub fn wsman_fault_code(&self) -> Option<String> {
        self.fault_lookup("WSManFault code", WSMAN_FAULT_CODE_PATH)
    }

    /// Route the failure to the taxonomy branch the caller expects: an
    /// operation-timeout fault becomes [`WinRmError::OperationTimeout`],
    /// everything else stays a transport error.
    pub fn classify(self) -> WinRmError {
        if self.wsman_fault_code().as_deref() == Some(WSMAN_FAULT_CODE_OPERATION_TIMEOUT) {
            return WinRmError::OperationTimeout;
        }
        WinRmError::Transport(self)
    }

    /// The user-facing description, also the `Display` output. An absent
    /// fault reason renders as an empty segment.
    pub fn message(&self) -> String {
        format!(
            "Bad HTTP response returned from server. Code {}: {}",
            self.status_code,
            self.fault_reason().unwrap_or_default()
        )
    }

    fn fault_lookup(&self, what: &str, path: &[&str]) -> Option<String> {
        let parsed = self.parsed_response()?;
        match parsed.walk(path) {
            Ok(node) => match node.inner_text() {
                Some(text) => Some(text.to_owned()),
                None => {
                    warn!(kind = node.kind(), "unable to find {what}: node has no text content");
                    None
                }
            },
            Err(error) => {
                warn!(%error, "unable to find {what}");
                None
            }
        }
    }
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

impl std::error::Error for TransportError {}

//! Per-request trace ids in W3C `traceparent` form.
//!
//! Every request gets an id of the shape `00-<trace-id>-<span-id>-<flags>`.
//! When the caller sent a well-formed `traceparent` header its trace id and
//! flags are kept and only a fresh span id is minted for this hop; otherwise
//! a new trace is started.

use std::collections::HashMap;
use uuid::Uuid;

/// W3C trace context header name
pub const TRACE_PARENT: &str = "traceparent";

/// Trace id for a request with the given headers
pub fn trace_id_for(headers: &HashMap<String, String>) -> String {
    let incoming = headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(TRACE_PARENT))
        .and_then(|(_, v)| parse_traceparent(v));

    match incoming {
        Some(parent) => {
            verity_log::trace!(
                target: "verity::trace",
                "continuing trace {} from span {}",
                parent.trace_id,
                parent.span_id
            );
            format!("00-{}-{}-{}", parent.trace_id, new_span_id(), parent.flags)
        }
        None => format!("00-{}-{}-00", Uuid::new_v4().simple(), new_span_id()),
    }
}

#[derive(Debug, PartialEq, Eq)]
struct TraceParent {
    trace_id: String,
    span_id: String,
    flags: String,
}

fn parse_traceparent(value: &str) -> Option<TraceParent> {
    let parts: Vec<&str> = value.trim().split('-').collect();
    let [version, trace_id, span_id, flags] = parts.as_slice() else {
        return None;
    };

    let valid = *version == "00"
        && is_lower_hex(trace_id, 32)
        && is_lower_hex(span_id, 16)
        && is_lower_hex(flags, 2)
        && trace_id.bytes().any(|b| b != b'0')
        && span_id.bytes().any(|b| b != b'0');

    valid.then(|| TraceParent {
        trace_id: trace_id.to_string(),
        span_id: span_id.to_string(),
        flags: flags.to_string(),
    })
}

fn is_lower_hex(s: &str, len: usize) -> bool {
    s.len() == len && s.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}

fn new_span_id() -> String {
    let mut id = Uuid::new_v4().simple().to_string();
    id.truncate(16);
    id
}

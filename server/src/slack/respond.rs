//! Response normalization.
//!
//! Every handler result becomes exactly one envelope, either returned in the
//! HTTP response or posted later to the request's `response_url`.

use serde_json::Value;

use crate::commands::{HandlerOutput, HandlerResult, DELAYED_RESPONSE_FLAG};

use super::types::ResponseEnvelope;

/// Where a normalized envelope goes.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// Sent as the JSON body of the HTTP response.
    Immediate(ResponseEnvelope),
    /// Acknowledged with an empty 200, then posted to `response_url`.
    Delayed(ResponseEnvelope),
}

impl Reply {
    pub fn envelope(&self) -> &ResponseEnvelope {
        match self {
            Self::Immediate(envelope) | Self::Delayed(envelope) => envelope,
        }
    }

    pub fn is_delayed(&self) -> bool {
        matches!(self, Self::Delayed(_))
    }
}

/// Turn a handler result into the envelope the caller receives.
///
/// Errors and plain text become ephemeral text replies. Payload fields overlay
/// an ephemeral default; the delayed flag is stripped and only a literal
/// `true` selects the delayed path.
pub fn normalize(result: HandlerResult) -> Reply {
    match result {
        Err(e) => Reply::Immediate(ResponseEnvelope::with_text(e.message())),
        Ok(HandlerOutput::Text(text)) => Reply::Immediate(ResponseEnvelope::with_text(text)),
        Ok(HandlerOutput::Payload(mut fields)) => {
            let delayed = matches!(fields.remove(DELAYED_RESPONSE_FLAG), Some(Value::Bool(true)));
            let envelope = ResponseEnvelope::new().merge(fields);
            if delayed {
                Reply::Delayed(envelope)
            } else {
                Reply::Immediate(envelope)
            }
        }
    }
}

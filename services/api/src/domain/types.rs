use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A payment-provider event whose signature has been verified.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WebhookEvent {
    pub id: String,
    /// Provider event type, e.g. `payment_intent.succeeded`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Unix timestamp (seconds) at which the provider created the event.
    pub created: i64,
    #[serde(default, deserialize_with = "data_object")]
    pub data: Value,
}

fn data_object<'de, D>(deserializer: D) -> Result<Value, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    struct Data {
        #[serde(default)]
        object: Value,
    }
    Ok(Data::deserialize(deserializer)?.object)
}

/// Parsed `Stripe-Signature` header: `t=<unix>,v1=<hex>[,v1=<hex>...]`.
///
/// Schemes other than `v1` (e.g. the `v0` test scheme) are ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureHeader {
    pub timestamp: i64,
    /// The `t` value exactly as sent; this is what the provider signed.
    pub signed_timestamp: String,
    pub signatures: Vec<Vec<u8>>,
}

impl SignatureHeader {
    /// Returns `None` when the header has no timestamp or no usable `v1` signature.
    pub fn parse(header: &str) -> Option<Self> {
        let mut timestamp = None;
        let mut signatures = Vec::new();
        for item in header.split(',') {
            let Some((key, value)) = item.trim().split_once('=') else {
                continue;
            };
            match key {
                "t" => {
                    timestamp = value
                        .parse::<i64>()
                        .ok()
                        .map(|parsed| (parsed, value.to_owned()))
                }
                "v1" => {
                    if let Ok(sig) = hex::decode(value) {
                        signatures.push(sig);
                    }
                }
                _ => {}
            }
        }
        if signatures.is_empty() {
            return None;
        }
        let (timestamp, signed_timestamp) = timestamp?;
        Some(Self {
            timestamp,
            signed_timestamp,
            signatures,
        })
    }
}

/// Body returned to the provider once an event has been accepted.
#[derive(Debug, Serialize)]
pub struct WebhookAck {
    pub received: bool,
}

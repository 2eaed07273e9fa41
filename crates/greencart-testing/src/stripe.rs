//! Payment webhook signing, mirroring what the provider sends.

use hmac::{Hmac, Mac};
use sha2::Sha256;

pub const TEST_WEBHOOK_SECRET: &str = "whsec_test_secret_for_unit_tests_only";

/// Build a `Stripe-Signature` header value (`t=<timestamp>,v1=<hex>`) for `payload`.
pub fn signature_header(secret: &str, timestamp: i64, payload: &[u8]) -> String {
    let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes())
        .expect("HMAC accepts keys of any length");
    mac.update(format!("{timestamp}.").as_bytes());
    mac.update(payload);
    let signature = hex::encode(mac.finalize().into_bytes());
    format!("t={timestamp},v1={signature}")
}

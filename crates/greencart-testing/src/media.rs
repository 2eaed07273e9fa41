//! Media-storage API mock.

use httpmock::prelude::*;
use httpmock::Mock;
use serde_json::json;

pub const MEDIA_CLOUD: &str = "greencart-test";
pub const MEDIA_API_KEY: &str = "test-api-key";
pub const MEDIA_API_SECRET: &str = "test-api-secret";

/// Mount the account ping endpoint on `server`, answering `status` with
/// `{"status": ping_status}`. Only requests carrying basic auth match.
pub async fn mock_media_ping<'a>(
    server: &'a MockServer,
    status: u16,
    ping_status: &str,
) -> Mock<'a> {
    let body = json!({ "status": ping_status });
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path(format!("/v1_1/{MEDIA_CLOUD}/ping"))
                .header_exists("authorization");
            then.status(status)
                .header("content-type", "application/json")
                .json_body(body);
        })
        .await
}

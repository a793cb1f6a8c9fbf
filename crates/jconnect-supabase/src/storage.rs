//! Supabase storage endpoints.
//!
//! Object upload, removal, and public URL construction for storage buckets.
//! Uploads carry the caller's content type; the path convention (bucket and
//! key layout) belongs to the caller.

use serde::Deserialize;
use tracing::info;

use crate::client::SupabaseClient;
use crate::error::SupabaseResult;

/// Upload response from the storage service.
#[derive(Debug, Deserialize)]
struct UploadResponse {
    /// Object key as `{bucket}/{path}`.
    #[serde(rename = "Key", default)]
    key: Option<String>,
}

impl SupabaseClient {
    /// Upload an object, returning its `{bucket}/{path}` key.
    pub async fn upload_object(
        &self,
        bucket: &str,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> SupabaseResult<String> {
        let url = format!(
            "{}/object/{}/{}",
            self.config.storage_url(),
            bucket,
            encode_path(path)
        );
        let content_type = content_type.to_string();
        let size = bytes.len();

        self.execute("upload_object", bucket, async {
            let response = self
                .send_with_auth(|http, bearer| {
                    http.post(&url)
                        .bearer_auth(bearer)
                        .header("Content-Type", &content_type)
                        .body(bytes.clone())
                })
                .await?;

            let status = response.status();
            if !status.is_success() {
                return Err(self.error_from_response(status, &url, response).await);
            }

            let parsed: UploadResponse = response.json().await.unwrap_or(UploadResponse {
                key: None,
            });
            let key = parsed
                .key
                .unwrap_or_else(|| format!("{}/{}", bucket, path));
            info!(bucket = %bucket, path = %path, size, "Uploaded object");
            Ok(key)
        })
        .await
    }

    /// Remove objects from a bucket.
    pub async fn remove_objects(&self, bucket: &str, paths: &[&str]) -> SupabaseResult<()> {
        if paths.is_empty() {
            return Ok(());
        }
        let url = format!("{}/object/{}", self.config.storage_url(), bucket);
        let body = serde_json::json!({ "prefixes": paths });

        self.execute("remove_objects", bucket, async {
            let response = self
                .send_with_auth(|http, bearer| http.delete(&url).bearer_auth(bearer).json(&body))
                .await?;

            let status = response.status();
            if !status.is_success() {
                return Err(self.error_from_response(status, &url, response).await);
            }
            info!(bucket = %bucket, count = paths.len(), "Removed objects");
            Ok(())
        })
        .await
    }

    /// Public download URL for an object in a public bucket. No network
    /// round trip; the URL is derived from configuration.
    pub fn public_url(&self, bucket: &str, path: &str) -> String {
        format!(
            "{}/object/public/{}/{}",
            self.config.storage_url(),
            bucket,
            encode_path(path)
        )
    }
}

/// Percent-encode a storage path, preserving `/` separators.
fn encode_path(path: &str) -> String {
    path.split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

// =============================================================================
// Tests
// =============================================================================

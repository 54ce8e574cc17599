//! Avatar image store
//!
//! Cloudinary signed uploads. The stored avatar is always the 250x250 fill
//! transformation of the uploaded image.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;

use super::ServiceError;
use crate::config::CloudinarySettings;

/// Public id under which a user's avatar is stored.
pub fn avatar_public_id(email: &str) -> String {
    format!("contacts_app/{}", email)
}

/// Stores uploaded avatars and returns their public URL
#[async_trait]
pub trait ImageStore: Send + Sync {
    async fn upload_avatar(
        &self,
        public_id: &str,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<String, ServiceError>;
}

/// First 500 characters of an upstream error body
fn error_excerpt(body: &str) -> String {
    body.chars().take(500).collect()
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    version: u64,
    public_id: String,
}

/// Cloudinary client
pub struct CloudinaryStore {
    client: Client,
    settings: CloudinarySettings,
    upload_url: String,
}

impl CloudinaryStore {
    pub fn new(settings: CloudinarySettings) -> Self {
        let upload_url = format!(
            "https://api.cloudinary.com/v1_1/{}/image/upload",
            settings.cloud_name
        );
        Self {
            client: Client::new(),
            settings,
            upload_url,
        }
    }

    /// SHA-1 request signature: parameters sorted by name, joined as a query
    /// string, followed by the API secret.
    pub fn sign(&self, params: &[(&str, &str)]) -> String {
        let mut sorted = params.to_vec();
        sorted.sort_by(|a, b| a.0.cmp(b.0));

        let mut payload = sorted
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("&");
        payload.push_str(&self.settings.api_secret);

        sha1_smol::Sha1::from(payload).digest().to_string()
    }

    /// Delivery URL of the 250x250 fill crop of an uploaded image.
    pub fn avatar_url(&self, public_id: &str, version: u64) -> String {
        format!(
            "https://res.cloudinary.com/{}/image/upload/c_fill,h_250,w_250/v{}/{}",
            self.settings.cloud_name, version, public_id
        )
    }
}

#[async_trait]
impl ImageStore for CloudinaryStore {
    async fn upload_avatar(
        &self,
        public_id: &str,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<String, ServiceError> {
        let timestamp = chrono::Utc::now().timestamp().to_string();
        let signature = self.sign(&[
            ("overwrite", "true"),
            ("public_id", public_id),
            ("timestamp", &timestamp),
        ]);

        let form = Form::new()
            .part("file", Part::bytes(bytes).file_name(file_name.to_owned()))
            .text("api_key", self.settings.api_key.clone())
            .text("public_id", public_id.to_owned())
            .text("overwrite", "true")
            .text("timestamp", timestamp)
            .text("signature", signature);

        let response = self
            .client
            .post(&self.upload_url)
            .multipart(form)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(ServiceError::Upstream {
                status,
                message: error_excerpt(&body),
            });
        }

        let uploaded: UploadResponse = response.json().await?;
        tracing::debug!(public_id = %uploaded.public_id, version = uploaded.version, "Avatar uploaded");

        Ok(self.avatar_url(&uploaded.public_id, uploaded.version))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> CloudinaryStore {
        CloudinaryStore::new(CloudinarySettings {
            cloud_name: "demo".into(),
            api_key: "1234".into(),
            api_secret: "abcd".into(),
        })
    }

    #[test]
    fn signature_sorts_params() {
        let store = store();
        let a = store.sign(&[("timestamp", "1315060510"), ("public_id", "sample")]);
        let b = store.sign(&[("public_id", "sample"), ("timestamp", "1315060510")]);
        assert_eq!(a, b);
        assert_eq!(
            a,
            sha1_smol::Sha1::from("public_id=sample&timestamp=1315060510abcd")
                .digest()
                .to_string()
        );
        assert_eq!(a.len(), 40);
    }

    #[test]
    fn avatar_url_has_fill_transformation() {
        assert_eq!(
            store().avatar_url("contacts_app/a@b.com", 17),
            "https://res.cloudinary.com/demo/image/upload/c_fill,h_250,w_250/v17/contacts_app/a@b.com"
        );
    }

    #[test]
    fn error_excerpt_cuts_on_char_boundary() {
        let body = "€".repeat(300);
        let excerpt = error_excerpt(&body);
        assert_eq!(excerpt.chars().count(), 300);

        let long = "é".repeat(800);
        assert_eq!(error_excerpt(&long).chars().count(), 500);
    }

    #[tokio::test]
    async fn multibyte_upstream_error_is_reported() {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            // Drain the request up to the closing multipart boundary
            let mut request = Vec::new();
            let mut buf = [0u8; 4096];
            while !request.ends_with(b"--\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            let body = "€".repeat(300);
            let response = format!(
                "HTTP/1.1 500 Internal Server Error\r\ncontent-type: text/plain; charset=utf-8\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
        });

        let mut store = store();
        store.upload_url = format!("http://{}/upload", addr);

        let err = store
            .upload_avatar("contacts_app/a@b.com", "a.png", vec![1, 2, 3])
            .await
            .unwrap_err();
        match err {
            ServiceError::Upstream { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message.chars().count(), 300);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn public_id_is_namespaced() {
        assert_eq!(avatar_public_id("a@b.com"), "contacts_app/a@b.com");
    }
}

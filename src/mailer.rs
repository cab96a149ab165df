use serde::Serialize;
use thiserror::Error;
use tracing::info;

const RESEND_URL: &str = "https://api.resend.com/emails";

#[derive(Debug, Error)]
pub enum MailError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("mail provider returned {status}: {body}")]
    Rejected { status: u16, body: String },
}

#[derive(Serialize)]
struct EmailRequest<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    html: &'a str,
}

/// Sends the digest through the Resend HTTP API.
pub struct Mailer {
    client: reqwest::Client,
    api_key: String,
    from: String,
}

impl Mailer {
    pub fn new(api_key: String, from: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            from,
        }
    }

    pub async fn send(&self, to: &str, subject: &str, html: &str) -> Result<(), MailError> {
        let body = EmailRequest {
            from: &self.from,
            to: [to],
            subject,
            html,
        };

        info!(to = %to, subject = %subject, "sending digest");
        let resp = self
            .client
            .post(RESEND_URL)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(MailError::Rejected {
                status: status.as_u16(),
                body,
            });
        }
        info!(to = %to, "digest sent");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_payload_shape() {
        let req = EmailRequest {
            from: "Club Digest <noreply@example.org>",
            to: ["coach@example.org"],
            subject: "Résultats US TALENCE - 15/02",
            html: "<p>hi</p>",
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["to"][0], "coach@example.org");
        assert_eq!(json["subject"], "Résultats US TALENCE - 15/02");
        assert_eq!(json["html"], "<p>hi</p>");
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::path::PathBuf;

use super::domain::ApplicationId;

/// Finalized terms handed to the document renderer once a loan is sanctioned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SanctionPayload {
    pub application_id: ApplicationId,
    pub customer_name: String,
    pub mobile: String,
    pub pan: String,
    pub loan_amount: u64,
    pub tenure_months: u32,
    pub monthly_income: u64,
    pub annual_interest_rate_percent: f64,
    pub emi: f64,
    pub credit_score: u16,
    pub issued_at: DateTime<Utc>,
}

/// Boundary to the external sanction-letter renderer.
pub trait ArtifactRequestor: Send + Sync {
    /// Renders the payload and returns a reference (path or URL) to the document.
    fn issue(&self, payload: &SanctionPayload) -> Result<String, RenderError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("failed to write sanction letter: {0}")]
    Io(#[from] std::io::Error),
    #[error("renderer rejected payload: {0}")]
    Rejected(String),
}

/// Writes a plain-text sanction letter per application into a directory.
#[derive(Debug, Clone)]
pub struct TextLetterRenderer {
    output_dir: PathBuf,
    url_prefix: String,
}

impl TextLetterRenderer {
    pub fn new(output_dir: impl Into<PathBuf>, url_prefix: impl Into<String>) -> Self {
        Self {
            output_dir: output_dir.into(),
            url_prefix: url_prefix.into(),
        }
    }

    fn render(payload: &SanctionPayload) -> String {
        let mut letter = String::new();
        let _ = writeln!(letter, "LOAN SANCTION LETTER");
        let _ = writeln!(letter, "Reference: APP-{}", payload.application_id);
        let _ = writeln!(letter, "Issued: {}", payload.issued_at.format("%Y-%m-%d %H:%M UTC"));
        let _ = writeln!(letter);
        let _ = writeln!(letter, "Dear {},", payload.customer_name);
        let _ = writeln!(
            letter,
            "Your personal loan application has been sanctioned on the following terms."
        );
        let _ = writeln!(letter);
        let _ = writeln!(letter, "Sanctioned amount : {}", payload.loan_amount);
        let _ = writeln!(letter, "Tenure            : {} months", payload.tenure_months);
        let _ = writeln!(
            letter,
            "Interest rate     : {:.2}% p.a.",
            payload.annual_interest_rate_percent
        );
        let _ = writeln!(letter, "Monthly EMI       : {:.2}", payload.emi);
        let _ = writeln!(letter, "Credit score      : {}", payload.credit_score);
        let _ = writeln!(letter, "PAN               : {}", payload.pan);
        letter
    }
}

impl ArtifactRequestor for TextLetterRenderer {
    fn issue(&self, payload: &SanctionPayload) -> Result<String, RenderError> {
        if payload.customer_name.trim().is_empty() {
            return Err(RenderError::Rejected("customer name is empty".to_string()));
        }

        std::fs::create_dir_all(&self.output_dir)?;
        let file_name = format!("{}.txt", payload.application_id);
        std::fs::write(self.output_dir.join(&file_name), Self::render(payload))?;

        Ok(format!(
            "{}/{}",
            self.url_prefix.trim_end_matches('/'),
            file_name
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn payload() -> SanctionPayload {
        SanctionPayload {
            application_id: ApplicationId(42),
            customer_name: "Asha Rao".to_string(),
            mobile: "9876543210".to_string(),
            pan: "ABCDE1234F".to_string(),
            loan_amount: 150_000,
            tenure_months: 24,
            monthly_income: 30_000,
            annual_interest_rate_percent: 12.0,
            emi: 7061.02,
            credit_score: 750,
            issued_at: Utc
                .with_ymd_and_hms(2025, 1, 15, 9, 30, 0)
                .single()
                .expect("valid timestamp"),
        }
    }

    #[test]
    fn writes_letter_and_returns_url() {
        let dir = std::env::temp_dir().join(format!("loan-letters-{}", std::process::id()));
        let renderer = TextLetterRenderer::new(&dir, "/letters/");

        let reference = renderer.issue(&payload()).expect("letter renders");
        assert_eq!(reference, "/letters/42.txt");

        let contents = std::fs::read_to_string(dir.join("42.txt")).expect("letter written");
        assert!(contents.contains("Dear Asha Rao,"));
        assert!(contents.contains("Monthly EMI       : 7061.02"));
        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn rejects_blank_customer_name() {
        let renderer = TextLetterRenderer::new(std::env::temp_dir(), "/letters");
        let mut payload = payload();
        payload.customer_name = "  ".to_string();
        assert!(matches!(
            renderer.issue(&payload),
            Err(RenderError::Rejected(_))
        ));
    }
}

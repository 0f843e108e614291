//! Rifa Copywriter - raffle description generation
//!
//! A [`DescriptionGenerator`] turns a raffle's title, price and prizes into
//! a short marketing text. [`generate_raffle_description`] never fails: an
//! unconfigured generator or an empty answer yields [`FALLBACK_DESCRIPTION`],
//! any other failure yields [`GENERATION_FAILED`].

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod error;
pub mod gemini;

pub use error::CopyError;
pub use gemini::{GeminiConfig, GeminiGenerator};

use async_trait::async_trait;

/// Text used when no description could be generated
pub const FALLBACK_DESCRIPTION: &str = "Join our exclusive raffle today! Win amazing prizes.";

/// Text used when the generator failed
pub const GENERATION_FAILED: &str = "Error generating content. Please write description manually.";

/// Persona given to the model
pub const SYSTEM_INSTRUCTION: &str =
    "You are a professional marketing copywriter for high-end digital raffles.";

/// What the description is about
#[derive(Debug, Clone, PartialEq)]
pub struct DescriptionRequest {
    /// Raffle title
    pub title: String,
    /// Price of one ticket
    pub ticket_price: f64,
    /// Prize names, best first
    pub prizes: Vec<String>,
}

impl DescriptionRequest {
    /// Create a request
    #[must_use]
    pub fn new(title: impl Into<String>, ticket_price: f64, prizes: Vec<String>) -> Self {
        Self {
            title: title.into(),
            ticket_price,
            prizes,
        }
    }

    /// Prompt sent to the model
    #[must_use]
    pub fn prompt(&self) -> String {
        format!(
            "Write a catchy, exciting, and professional description for a digital raffle.\n\
             Title: {}\n\
             Ticket Price: ${}\n\
             Prizes involved: {}\n\n\
             Keep it under 100 words. Use emojis. Focus on urgency and trust.",
            self.title,
            self.ticket_price,
            self.prizes.join(", ")
        )
    }
}

/// Source of raffle descriptions
#[async_trait]
pub trait DescriptionGenerator: Send + Sync {
    /// Generate a description
    async fn generate(&self, request: &DescriptionRequest) -> Result<String, CopyError>;
}

/// Generate a description, falling back to fixed texts on any failure
pub async fn generate_raffle_description(
    generator: &dyn DescriptionGenerator,
    request: &DescriptionRequest,
) -> String {
    match generator.generate(request).await {
        Ok(text) if !text.trim().is_empty() => text.trim().to_string(),
        Ok(_) | Err(CopyError::EmptyResponse) => {
            tracing::warn!("generator returned no text, using fallback description");
            FALLBACK_DESCRIPTION.to_string()
        }
        Err(e) if e.is_unconfigured() => {
            tracing::warn!("API key missing, using fallback description");
            FALLBACK_DESCRIPTION.to_string()
        }
        Err(e) => {
            tracing::error!(error = %e, "description generation failed");
            GENERATION_FAILED.to_string()
        }
    }
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(Result<&'static str, fn() -> CopyError>);

    #[async_trait]
    impl DescriptionGenerator for Fixed {
        async fn generate(&self, _request: &DescriptionRequest) -> Result<String, CopyError> {
            self.0.map(str::to_string).map_err(|make| make())
        }
    }

    fn request() -> DescriptionRequest {
        DescriptionRequest::new(
            "Mega Sorteo",
            10.0,
            vec!["iPhone".to_string(), "AirPods".to_string()],
        )
    }

    #[test]
    fn prompt_names_title_price_and_prizes() {
        let prompt = request().prompt();
        assert!(prompt.contains("Title: Mega Sorteo"));
        assert!(prompt.contains("Ticket Price: $10\n"));
        assert!(prompt.contains("Prizes involved: iPhone, AirPods"));
        assert!(prompt.contains("under 100 words"));
    }

    #[tokio::test]
    async fn generated_text_is_trimmed() {
        let text = generate_raffle_description(&Fixed(Ok("  ¡Participa!  ")), &request()).await;
        assert_eq!(text, "¡Participa!");
    }

    #[tokio::test]
    async fn empty_text_falls_back() {
        let text = generate_raffle_description(&Fixed(Ok("   ")), &request()).await;
        assert_eq!(text, FALLBACK_DESCRIPTION);
    }

    #[tokio::test]
    async fn missing_key_falls_back() {
        let text =
            generate_raffle_description(&Fixed(Err(|| CopyError::MissingApiKey)), &request()).await;
        assert_eq!(text, FALLBACK_DESCRIPTION);
    }

    #[tokio::test]
    async fn failure_asks_for_manual_text() {
        let failing = Fixed(Err(|| CopyError::Status {
            status: 500,
            body: "boom".to_string(),
        }));
        let text = generate_raffle_description(&failing, &request()).await;
        assert_eq!(text, GENERATION_FAILED);
    }
}

pub mod gemini;
pub mod traits;

pub use traits::{ChatMessage, Provider};

use crate::config::GenerationConfig;

/// Factory: create the right provider from config
pub fn create_provider(
    name: &str,
    api_key: Option<&str>,
    generation: &GenerationConfig,
) -> anyhow::Result<Box<dyn Provider>> {
    match name {
        "gemini" | "google" | "google-gemini" => {
            Ok(Box::new(gemini::GeminiProvider::new(api_key, generation)))
        }
        _ => anyhow::bail!(
            "Unknown provider: {name}. Supported: gemini (aliases: google, google-gemini)."
        ),
    }
}

/// Format a non-2xx API response into an error, consuming the body for detail.
pub(crate) async fn api_error(provider: &str, response: reqwest::Response) -> anyhow::Error {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    anyhow::anyhow!("{provider} API error ({status}): {body}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn factory_gemini() {
        let generation = GenerationConfig::default();
        assert!(create_provider("gemini", Some("test-key"), &generation).is_ok());
        assert!(create_provider("google", Some("test-key"), &generation).is_ok());
        assert!(create_provider("google-gemini", None, &generation).is_ok());
    }

    #[test]
    fn factory_unknown_provider_errors() {
        let generation = GenerationConfig::default();
        let result = create_provider("nonexistent", None, &generation);
        assert!(result.is_err());
        let msg = result.err().unwrap().to_string();
        assert!(msg.contains("Unknown provider"));
        assert!(msg.contains("nonexistent"));
    }

    #[test]
    fn factory_empty_name_errors() {
        assert!(create_provider("", None, &GenerationConfig::default()).is_err());
    }
}

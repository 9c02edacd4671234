// Application settings, read from environment variables (optionally via a
// .env file loaded in main).

const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";
const DEFAULT_MAX_TOKENS: u32 = 1000;
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8000";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub anthropic_api_key: String,
    pub anthropic_model: String,
    pub anthropic_max_tokens: u32,
    pub cors_origins: Vec<String>,
    pub bind_addr: String,
}

impl AppConfig {
    /// Reads configuration from the environment. The API key is the only
    /// required variable; everything else has a default.
    pub fn from_env() -> Self {
        let anthropic_api_key = std::env::var("ANTHROPIC_API_KEY").expect(
            "Missing ANTHROPIC_API_KEY environment variable! Create a .env file with your API key.",
        );
        let anthropic_model =
            std::env::var("ANTHROPIC_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        let anthropic_max_tokens = std::env::var("ANTHROPIC_MAX_TOKENS")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(DEFAULT_MAX_TOKENS);
        let cors_origins = parse_origins(std::env::var("CORS_ORIGINS").ok().as_deref());
        let bind_addr =
            std::env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());

        Self {
            anthropic_api_key,
            anthropic_model,
            anthropic_max_tokens,
            cors_origins,
            bind_addr,
        }
    }
}

/// Splits a comma-separated origin list, falling back to the fixed defaults
/// when the variable is unset or blank.
fn parse_origins(raw: Option<&str>) -> Vec<String> {
    match raw {
        Some(value) if !value.trim().is_empty() => value
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect(),
        _ => vec![
            "http://localhost:3000".to_string(),
            "http://localhost:3001".to_string(),
            "https://*.vercel.app".to_string(),
        ],
    }
}

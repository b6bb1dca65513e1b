use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::layout::CapacityModel;
use crate::render::FontFamily;

/// Application configuration loaded from environment variables.
/// Every variable is optional; page geometry defaults to A4 at 96 dpi.
#[derive(Debug, Clone)]
pub struct Config {
    /// Generation is disabled when unset.
    pub anthropic_api_key: Option<String>,
    pub port: u16,
    pub rust_log: String,
    pub page_width_px: f32,
    pub page_height_px: f32,
    pub page_padding_top_px: f32,
    pub page_padding_bottom_px: f32,
    pub element_margin_px: f32,
    pub measure_timeout_ms: u64,
    /// Face the metric surface measures text in.
    pub font_family: FontFamily,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            anthropic_api_key: std::env::var("ANTHROPIC_API_KEY")
                .ok()
                .filter(|k| !k.trim().is_empty()),
            port: env_or("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            page_width_px: env_or("PAGE_WIDTH_PX", 794.0)?,
            page_height_px: env_or("PAGE_HEIGHT_PX", 1123.0)?,
            page_padding_top_px: env_or("PAGE_PADDING_TOP_PX", 48.0)?,
            page_padding_bottom_px: env_or("PAGE_PADDING_BOTTOM_PX", 48.0)?,
            element_margin_px: env_or("ELEMENT_MARGIN_PX", 16.0)?,
            measure_timeout_ms: env_or("MEASURE_TIMEOUT_MS", 2000)?,
            font_family: env_or("FONT_FAMILY", FontFamily::Sans)?,
        })
    }

    /// Page geometry for the default age range.
    pub fn capacity(&self) -> CapacityModel {
        CapacityModel::new(self.page_width_px, self.page_height_px)
            .with_padding(self.page_padding_top_px, self.page_padding_bottom_px)
            .with_margin(self.element_margin_px)
    }

    pub fn measure_timeout(&self) -> Duration {
        Duration::from_millis(self.measure_timeout_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            anthropic_api_key: None,
            port: 8080,
            rust_log: "info".to_string(),
            page_width_px: 794.0,
            page_height_px: 1123.0,
            page_padding_top_px: 48.0,
            page_padding_bottom_px: 48.0,
            element_margin_px: 16.0,
            measure_timeout_ms: 2000,
            font_family: FontFamily::Sans,
        }
    }
}

fn env_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    parse_or(key, std::env::var(key).ok(), default)
}

fn parse_or<T>(key: &str, raw: Option<String>, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match raw {
        Some(value) if !value.trim().is_empty() => value
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has invalid value '{value}'")),
        _ => Ok(default),
    }
}

use crate::config::SourceConfig;
use crate::error::{Error, Result};
use crate::recipe::raw::RawCollection;
use reqwest::{Client, Response};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

/// Where the recipe collection lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecipeSource {
    Remote(Url),
    Local(PathBuf),
}

impl RecipeSource {
    /// `http(s)` URLs are fetched; anything else is a file path
    pub fn parse(location: &str) -> Result<Self> {
        let location = location.trim();
        if location.is_empty() {
            return Err(Error::Validation(
                "Recipe source must not be empty".to_string(),
            ));
        }

        if location.starts_with("http://") || location.starts_with("https://") {
            return Ok(RecipeSource::Remote(Url::parse(location)?));
        }

        Ok(RecipeSource::Local(PathBuf::from(location)))
    }
}

impl std::fmt::Display for RecipeSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecipeSource::Remote(url) => write!(f, "{url}"),
            RecipeSource::Local(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Reads and parses the recipe collection in one shot, no retries
pub struct Loader {
    client: Client,
    max_size: usize,
}

impl Loader {
    pub fn new(config: &SourceConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(Error::Http)?;

        Ok(Self {
            client,
            max_size: config.max_size,
        })
    }

    pub async fn load(&self, source: &RecipeSource) -> Result<RawCollection> {
        let bytes = match source {
            RecipeSource::Remote(url) => self.fetch(url).await?,
            RecipeSource::Local(path) => self.read_file(path).await?,
        };

        let collection = RawCollection::from_slice(&bytes)?;
        info!("Read {} raw recipes from {}", collection.len(), source);
        Ok(collection)
    }

    async fn fetch(&self, url: &Url) -> Result<Vec<u8>> {
        debug!("Fetching recipe source: {}", url);

        let response = self.client.get(url.clone()).send().await?;

        if !response.status().is_success() {
            return Err(Error::Source(format!("HTTP {}", response.status().as_u16())));
        }

        if let Some(content_length) = response.content_length() {
            if content_length > self.max_size as u64 {
                return Err(self.too_large(content_length as usize));
            }
        }

        self.read_with_limit(response).await
    }

    async fn read_with_limit(&self, response: Response) -> Result<Vec<u8>> {
        let bytes = response.bytes().await?;

        if bytes.len() > self.max_size {
            return Err(self.too_large(bytes.len()));
        }

        Ok(bytes.to_vec())
    }

    async fn read_file(&self, path: &PathBuf) -> Result<Vec<u8>> {
        debug!("Reading recipe source: {}", path.display());

        let metadata = tokio::fs::metadata(path).await?;
        if metadata.len() > self.max_size as u64 {
            return Err(self.too_large(metadata.len() as usize));
        }

        Ok(tokio::fs::read(path).await?)
    }

    fn too_large(&self, size: usize) -> Error {
        Error::Source(format!(
            "Recipe source size {} exceeds maximum {}",
            size, self.max_size
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_source() {
        assert!(matches!(
            RecipeSource::parse("https://example.com/recipe.json").unwrap(),
            RecipeSource::Remote(_)
        ));
        assert_eq!(
            RecipeSource::parse("./recipe.json").unwrap(),
            RecipeSource::Local(PathBuf::from("./recipe.json"))
        );
        assert!(RecipeSource::parse("  ").is_err());
        assert!(RecipeSource::parse("http://").is_err());
    }

    #[test]
    fn test_loader_creation() {
        let settings = crate::config::test_settings("./recipe.json");
        assert!(Loader::new(&settings.source).is_ok());
    }
}

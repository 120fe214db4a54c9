use crate::config::types::{Config, OutputFormat};
use crate::config::validation::validate;
use crate::ConfigResult;

/// Command-line values that replace what the config file says
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub query: Option<String>,
    pub max_pages: Option<u32>,
    pub months_ago: Option<u32>,
    pub force_jsonl: bool,
}

impl ConfigOverrides {
    /// Applies the overrides and validates the result
    ///
    /// The file was validated when it was loaded; an override can still
    /// make it invalid, so the whole configuration is checked again.
    pub fn apply(&self, config: &mut Config) -> ConfigResult<()> {
        if let Some(query) = &self.query {
            config.search.query = query.clone();
        }
        if let Some(pages) = self.max_pages {
            config.search.max_pages = pages;
        }
        if let Some(months) = self.months_ago {
            config.crawler.months_ago = months;
        }
        if self.force_jsonl {
            config.output.format = OutputFormat::Jsonl;
        }

        validate(config)
    }
}

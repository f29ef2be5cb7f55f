use crate::core::chart::{ChartSize, ChartWindow};
use crate::core::extract::TableSelector;
use anyhow::{Context, Result};
use chrono::NaiveDate;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::{fs, path::PathBuf};
use tracing::{debug, warn};

pub const DEFAULT_YAHOO_BASE_URL: &str = "https://query1.finance.yahoo.com";

// Both default companies point at the same page, as the course material did.
const DEFAULT_REVENUE_URL: &str = "https://cf-courses-data.s3.us.cloud-object-storage.appdomain.cloud/IBMDeveloperSkillsNetwork-PY0220EN-SkillsNetwork/labs/project/revenue.htm";

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Company {
    pub name: String,
    pub symbol: String,
    pub revenue_url: String,
    /// Overrides the top level `table` setting for this company.
    #[serde(default)]
    pub table: Option<TableSelector>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct YahooProviderConfig {
    pub base_url: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ProvidersConfig {
    pub yahoo: Option<YahooProviderConfig>,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        ProvidersConfig {
            yahoo: Some(YahooProviderConfig {
                base_url: DEFAULT_YAHOO_BASE_URL.to_string(),
            }),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct HttpConfig {
    pub retries: usize,
    pub retry_delay_ms: u64,
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        HttpConfig {
            retries: 3,
            retry_delay_ms: 500,
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct ChartConfig {
    pub price_cutoff: NaiveDate,
    pub revenue_cutoff: NaiveDate,
    pub width: u32,
    pub height: u32,
}

impl Default for ChartConfig {
    fn default() -> Self {
        let window = ChartWindow::default();
        let size = ChartSize::default();
        ChartConfig {
            price_cutoff: window.price_cutoff,
            revenue_cutoff: window.revenue_cutoff,
            width: size.width,
            height: size.height,
        }
    }
}

impl ChartConfig {
    pub fn window(&self) -> ChartWindow {
        ChartWindow {
            price_cutoff: self.price_cutoff,
            revenue_cutoff: self.revenue_cutoff,
        }
    }

    pub fn size(&self) -> ChartSize {
        ChartSize {
            width: self.width,
            height: self.height,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    pub companies: Vec<Company>,
    #[serde(default)]
    pub providers: ProvidersConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub table: TableSelector,
    #[serde(default)]
    pub chart: ChartConfig,
    pub output_dir: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            companies: vec![
                Company {
                    name: "Tesla".to_string(),
                    symbol: "TSLA".to_string(),
                    revenue_url: DEFAULT_REVENUE_URL.to_string(),
                    table: None,
                },
                Company {
                    name: "GameStop".to_string(),
                    symbol: "GME".to_string(),
                    revenue_url: DEFAULT_REVENUE_URL.to_string(),
                    table: None,
                },
            ],
            providers: ProvidersConfig::default(),
            http: HttpConfig::default(),
            table: TableSelector::default(),
            chart: ChartConfig::default(),
            output_dir: None,
        }
    }
}

impl AppConfig {
    /// Loads the config from the default location, or falls back to the
    /// built-in companies when no file has been set up.
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!(
                "No config at {}, using built-in defaults",
                config_path.display()
            );
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("io", "revchart", "revchart")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    pub fn yahoo_base_url(&self) -> &str {
        self.providers
            .yahoo
            .as_ref()
            .map_or(DEFAULT_YAHOO_BASE_URL, |p| &p.base_url)
    }

    /// Table selection for `company`, honouring its override.
    pub fn table_for<'a>(&'a self, company: &'a Company) -> &'a TableSelector {
        company.table.as_ref().unwrap_or(&self.table)
    }

    /// Warns about companies that scrape revenue from the same page.
    ///
    /// Returns the shared URLs with the names of the companies using them.
    pub fn check_shared_revenue_urls(&self) -> Vec<(String, Vec<String>)> {
        let mut by_url: HashMap<&str, Vec<String>> = HashMap::new();
        for company in &self.companies {
            by_url
                .entry(company.revenue_url.as_str())
                .or_default()
                .push(company.name.clone());
        }

        let mut shared: Vec<(String, Vec<String>)> = by_url
            .into_iter()
            .filter(|(_, names)| names.len() > 1)
            .map(|(url, names)| (url.to_string(), names))
            .collect();
        shared.sort();

        for (url, names) in &shared {
            warn!(
                url = %url,
                companies = ?names,
                "Companies share the same revenue page; their revenue series will be identical"
            );
        }
        shared
    }
}

// # dnsyncd - DNSync runner
//
// This binary is a THIN integration layer over dnsync-core:
// - DO NOT add reconciliation, DNS, or retry logic here
// - All reconciliation logic MUST be in dnsync-core
// - Configuration is via environment variables ONLY
//
// The dnsyncd binary is responsible for:
// 1. Reading configuration from environment variables
// 2. Initializing tracing and the runtime
// 3. Registering providers
// 4. Running one pass: read current records, then apply a change set if given
//
// ## Configuration
//
// ### DNS Provider
// - `DNSYNC_PROVIDER_TYPE`: Provider type (hetzner)
// - `DNSYNC_PROVIDER_API_TOKEN`: API token
// - `DNSYNC_PROVIDER_API_URL`: API base URL override (optional)
//
// ### Engine
// - `DNSYNC_DRY_RUN`: Log mutations instead of issuing them (true/false)
// - `DNSYNC_PAGE_SIZE`: Items per listing page (1-1000)
// - `DNSYNC_HTTP_TIMEOUT_SECS`: Per-request timeout (1-300)
// - `DNSYNC_CHANGES_FILE`: JSON change set to apply (optional)
//
// ### Logging
// - `DNSYNC_LOG_LEVEL`: trace, debug, info, warn, error
//
// ## Example
//
// ```bash
// export DNSYNC_PROVIDER_TYPE=hetzner
// export DNSYNC_PROVIDER_API_TOKEN=your_token
// export DNSYNC_CHANGES_FILE=/etc/dnsync/changes.json
// export DNSYNC_DRY_RUN=true
//
// dnsyncd
// ```
//
// A change set file looks like:
//
// ```json
// {
//   "create": [{"dnsName": "www.example.com", "recordType": "A", "targets": ["1.2.3.4"]}],
//   "delete": [{"dnsName": "old.example.com", "recordType": "A", "targets": []}]
// }
// ```

use anyhow::{Context, Result};
use dnsync_core::config::{DEFAULT_PAGE_SIZE, DEFAULT_TIMEOUT_SECS, MAX_PAGE_SIZE};
use dnsync_core::{Changes, ProviderConfig, ProviderRegistry};
use std::env;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

/// Exit codes for different termination scenarios
///
/// - 0: Pass completed
/// - 1: Configuration or startup error
/// - 2: Runtime error (read, resolution, or mutation failure)
#[derive(Debug, Clone, Copy)]
enum DnsyncExitCode {
    Success = 0,
    ConfigError = 1,
    RuntimeError = 2,
}

impl From<DnsyncExitCode> for ExitCode {
    fn from(code: DnsyncExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Application configuration
#[derive(Debug)]
struct Config {
    provider_type: String,
    provider_api_token: String,
    provider_api_url: Option<String>,
    dry_run: bool,
    page_size: u32,
    timeout_secs: u64,
    changes_file: Option<PathBuf>,
    log_level: String,
}

impl Config {
    /// Load configuration from environment variables
    fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let page_size = match lookup("DNSYNC_PAGE_SIZE") {
            Some(raw) => raw
                .parse()
                .with_context(|| format!("DNSYNC_PAGE_SIZE is not a number: {}", raw))?,
            None => DEFAULT_PAGE_SIZE,
        };

        let timeout_secs = match lookup("DNSYNC_HTTP_TIMEOUT_SECS") {
            Some(raw) => raw
                .parse()
                .with_context(|| format!("DNSYNC_HTTP_TIMEOUT_SECS is not a number: {}", raw))?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        let dry_run = match lookup("DNSYNC_DRY_RUN").as_deref().map(str::to_lowercase) {
            None => false,
            Some(v) if v == "true" || v == "1" || v == "yes" => true,
            Some(v) if v == "false" || v == "0" || v == "no" || v.is_empty() => false,
            Some(v) => anyhow::bail!("DNSYNC_DRY_RUN must be true or false. Got: {}", v),
        };

        Ok(Self {
            provider_type: lookup("DNSYNC_PROVIDER_TYPE").unwrap_or_else(|| "hetzner".to_string()),
            provider_api_token: lookup("DNSYNC_PROVIDER_API_TOKEN").unwrap_or_default(),
            provider_api_url: lookup("DNSYNC_PROVIDER_API_URL").filter(|u| !u.is_empty()),
            dry_run,
            page_size,
            timeout_secs,
            changes_file: lookup("DNSYNC_CHANGES_FILE")
                .filter(|p| !p.is_empty())
                .map(PathBuf::from),
            log_level: lookup("DNSYNC_LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
        })
    }

    /// Validate the configuration
    fn validate(&self) -> Result<()> {
        if self.provider_api_token.is_empty() {
            anyhow::bail!(
                "DNSYNC_PROVIDER_API_TOKEN is required. \
                Set it via: export DNSYNC_PROVIDER_API_TOKEN=your_token"
            );
        }

        // Check for obvious placeholder tokens (common mistake)
        let token_lower = self.provider_api_token.to_lowercase();
        if token_lower.contains("your_token")
            || token_lower.contains("replace_me")
            || token_lower == "token"
        {
            anyhow::bail!(
                "DNSYNC_PROVIDER_API_TOKEN appears to be a placeholder. \
                Use an actual API token from your DNS provider."
            );
        }

        match self.provider_type.as_str() {
            "hetzner" => {}
            _ => anyhow::bail!(
                "DNSYNC_PROVIDER_TYPE '{}' is not supported. \
                Supported providers: hetzner",
                self.provider_type
            ),
        }

        if let Some(ref url) = self.provider_api_url
            && !url.starts_with("https://")
            && !url.starts_with("http://")
        {
            anyhow::bail!(
                "DNSYNC_PROVIDER_API_URL must use HTTP or HTTPS scheme. Got: {}",
                url
            );
        }

        if !(1..=MAX_PAGE_SIZE).contains(&self.page_size) {
            anyhow::bail!(
                "DNSYNC_PAGE_SIZE must be between 1 and {}. Got: {}",
                MAX_PAGE_SIZE,
                self.page_size
            );
        }

        if !(1..=300).contains(&self.timeout_secs) {
            anyhow::bail!(
                "DNSYNC_HTTP_TIMEOUT_SECS must be between 1 and 300 seconds. Got: {}",
                self.timeout_secs
            );
        }

        if let Some(ref path) = self.changes_file
            && !path.exists()
        {
            anyhow::bail!("DNSYNC_CHANGES_FILE does not exist: {}", path.display());
        }

        parse_log_level(&self.log_level)?;

        Ok(())
    }

    fn provider_config(&self) -> ProviderConfig {
        ProviderConfig::Hetzner {
            api_token: self.provider_api_token.clone(),
            api_url: self.provider_api_url.clone(),
            dry_run: self.dry_run,
            page_size: self.page_size,
            timeout_secs: self.timeout_secs,
        }
    }
}

fn parse_log_level(level: &str) -> Result<Level> {
    match level.to_lowercase().as_str() {
        "trace" => Ok(Level::TRACE),
        "debug" => Ok(Level::DEBUG),
        "info" => Ok(Level::INFO),
        "warn" => Ok(Level::WARN),
        "error" => Ok(Level::ERROR),
        _ => anyhow::bail!(
            "DNSYNC_LOG_LEVEL '{}' is not valid. \
            Valid levels: trace, debug, info, warn, error",
            level
        ),
    }
}

/// Load a JSON change set
fn load_changes(path: &Path) -> Result<Changes> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read change set {}", path.display()))?;
    Changes::from_json(&raw)
        .with_context(|| format!("Failed to parse change set {}", path.display()))
}

fn main() -> ExitCode {
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {:#}", e);
            return DnsyncExitCode::ConfigError.into();
        }
    };

    if let Err(e) = config.validate() {
        eprintln!("Configuration validation error: {:#}", e);
        return DnsyncExitCode::ConfigError.into();
    }

    let log_level = parse_log_level(&config.log_level).unwrap_or(Level::INFO);
    let subscriber = FmtSubscriber::builder().with_max_level(log_level).finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return DnsyncExitCode::ConfigError.into();
    }

    info!("Starting dnsyncd");

    let rt = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return DnsyncExitCode::RuntimeError.into();
        }
    };

    rt.block_on(async {
        match run(config).await {
            Ok(()) => DnsyncExitCode::Success,
            Err(e) => {
                error!("Pass failed: {:#}", e);
                DnsyncExitCode::RuntimeError
            }
        }
    })
    .into()
}

/// Run one reconciliation pass
async fn run(config: Config) -> Result<()> {
    let registry = ProviderRegistry::new();

    #[cfg(feature = "hetzner")]
    {
        info!("Registering Hetzner provider");
        dnsync_provider_hetzner::register(&registry);
    }

    let provider = registry.create_provider(&config.provider_config())?;
    info!(
        "Provider: {} [mode: {}]",
        provider.provider_name(),
        if config.dry_run { "DRY-RUN" } else { "LIVE" }
    );

    let endpoints = provider.records().await?;
    info!("Current state: {} endpoint(s)", endpoints.len());
    for endpoint in &endpoints {
        info!("  {}", endpoint);
    }

    let Some(path) = config.changes_file.as_deref() else {
        info!("No change set given, nothing to apply");
        return Ok(());
    };

    let changes = load_changes(path)?;
    info!(
        "Loaded change set: {} create(s), {} update(s), {} delete(s)",
        changes.create.len(),
        changes.update_new.len(),
        changes.delete.len()
    );

    provider.apply_changes(&changes).await?;
    info!("Change set applied");

    Ok(())
}

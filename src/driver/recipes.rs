//! Browser construction recipes
//!
//! Each supported selector string maps to a fixed recipe: browser kind,
//! capability flags, extra command-line options, and the WebDriver endpoint
//! to connect to. The mapping is static; resolving happens once when the
//! pool is built, so a bad selector fails at load time rather than when the
//! first test asks for a browser.

use thirtyfour::{Capabilities, CapabilitiesHelper, ChromiumLikeCapabilities, DesiredCapabilities};
use tracing::info;
use url::Url;

use super::DriverError;
use crate::config::Settings;

/// Process-level override for the `browser` configuration key.
pub const BROWSER_ENV: &str = "BOOKSTACK_BROWSER";

/// Default local WebDriver endpoints per browser.
const CHROMEDRIVER_URL: &str = "http://localhost:9515";
const GECKODRIVER_URL: &str = "http://localhost:4444";
const EDGEDRIVER_URL: &str = "http://localhost:9515";
const SAFARIDRIVER_URL: &str = "http://localhost:4444";
/// Selenium standalone container, e.g.
/// `docker run -d -p 4444:4444 --shm-size="2g" selenium/standalone-chrome:latest`
const SELENIUM_DOCKER_URL: &str = "http://localhost:4444";

/// Browser families the harness can drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrowserKind {
    Chrome,
    Firefox,
    Edge,
    Safari,
}

impl BrowserKind {
    fn default_endpoint(&self) -> &'static str {
        match self {
            BrowserKind::Chrome => CHROMEDRIVER_URL,
            BrowserKind::Firefox => GECKODRIVER_URL,
            BrowserKind::Edge => EDGEDRIVER_URL,
            BrowserKind::Safari => SAFARIDRIVER_URL,
        }
    }
}

/// Declarative construction recipe resolved from a selector string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowserRecipe {
    /// The selector this recipe was resolved from.
    pub selector: String,
    pub browser: BrowserKind,
    pub headless: bool,
    /// Accept self-signed/invalid TLS certificates.
    pub accept_insecure_certs: bool,
    /// Extra browser command-line options.
    pub args: Vec<String>,
    /// WebDriver endpoint to open sessions against.
    pub webdriver_url: String,
}

impl BrowserRecipe {
    /// Resolve the configured selector into a recipe.
    ///
    /// The `BOOKSTACK_BROWSER` process variable takes precedence over the
    /// `browser` key of the properties file. Custom options come from the
    /// comma-separated `addBrowserOptions` list; the endpoint can be
    /// overridden with `webdriverUrl`.
    pub fn resolve(settings: &Settings) -> Result<Self, DriverError> {
        let selector = match std::env::var(BROWSER_ENV) {
            Ok(value) if !value.is_empty() => {
                info!("Browser selector {} taken from {}", value, BROWSER_ENV);
                value
            }
            _ => settings.require("browser")?.to_string(),
        };

        Self::for_selector(&selector, settings)
    }

    /// Recipe for an explicit selector string.
    pub fn for_selector(selector: &str, settings: &Settings) -> Result<Self, DriverError> {
        let mut recipe = match selector {
            "chrome" => Self::base(selector, BrowserKind::Chrome),
            "chrome-headless" => Self {
                headless: true,
                accept_insecure_certs: true,
                args: vec![
                    "--verbose".to_string(),
                    "--allow-insecure-localhost".to_string(),
                    "--disable-dev-shm-usage".to_string(),
                    "--no-sandbox".to_string(),
                    "--disable-gpu".to_string(),
                ],
                ..Self::base(selector, BrowserKind::Chrome)
            },
            "chrome-with-options" => Self::with_options(selector, BrowserKind::Chrome, settings)?,
            "chrome-docker" => Self {
                args: vec!["--verbose".to_string(), "--disable-gpu".to_string()],
                webdriver_url: SELENIUM_DOCKER_URL.to_string(),
                ..Self::base(selector, BrowserKind::Chrome)
            },
            "firefox" => Self::base(selector, BrowserKind::Firefox),
            "firefox-headless" => Self {
                headless: true,
                ..Self::base(selector, BrowserKind::Firefox)
            },
            "firefox-with-options" => Self::with_options(selector, BrowserKind::Firefox, settings)?,
            "edge" => Self::base(selector, BrowserKind::Edge),
            "edge-with-options" => Self::with_options(selector, BrowserKind::Edge, settings)?,
            "safari" => Self::base(selector, BrowserKind::Safari),
            other => return Err(DriverError::UnsupportedBrowser(other.to_string())),
        };

        recipe.check_host_support()?;

        if let Some(url) = settings.get("webdriverUrl") {
            recipe.webdriver_url = url.to_string();
        }
        Url::parse(&recipe.webdriver_url).map_err(|e| DriverError::InvalidEndpoint {
            url: recipe.webdriver_url.clone(),
            reason: e.to_string(),
        })?;

        Ok(recipe)
    }

    fn base(selector: &str, browser: BrowserKind) -> Self {
        Self {
            selector: selector.to_string(),
            browser,
            headless: false,
            accept_insecure_certs: false,
            args: Vec::new(),
            webdriver_url: browser.default_endpoint().to_string(),
        }
    }

    /// Recipe driven by the `addBrowserOptions` list. `--headless` and
    /// `--allow-insecure-localhost` entries also flip the matching
    /// capability flags.
    fn with_options(
        selector: &str,
        browser: BrowserKind,
        settings: &Settings,
    ) -> Result<Self, DriverError> {
        settings.require("addBrowserOptions")?;
        let args = settings.get_values("addBrowserOptions").unwrap_or_default();

        let headless = args.iter().any(|a| a == "--headless" || a == "--headless=new");
        let accept_insecure_certs = args.iter().any(|a| a == "--allow-insecure-localhost");

        Ok(Self {
            headless,
            accept_insecure_certs,
            args,
            ..Self::base(selector, browser)
        })
    }

    /// Edge only runs on Windows and Safari only on macOS; anything else is
    /// a hard error.
    fn check_host_support(&self) -> Result<(), DriverError> {
        let supported = match self.browser {
            BrowserKind::Edge => cfg!(target_os = "windows"),
            BrowserKind::Safari => cfg!(target_os = "macos"),
            _ => true,
        };

        if supported {
            Ok(())
        } else {
            Err(DriverError::UnsupportedEnvironment {
                browser: format!("{:?}", self.browser),
            })
        }
    }

    /// Build the WebDriver capability set for this recipe.
    pub fn capabilities(&self) -> Result<Capabilities, DriverError> {
        let caps: Capabilities = match self.browser {
            BrowserKind::Chrome => {
                let mut caps = DesiredCapabilities::chrome();
                if self.headless {
                    caps.set_headless()?;
                }
                for arg in &self.args {
                    caps.add_arg(arg)?;
                }
                if self.accept_insecure_certs {
                    caps.accept_insecure_certs(true)?;
                }
                caps.into()
            }
            BrowserKind::Edge => {
                let mut caps = DesiredCapabilities::edge();
                if self.headless {
                    caps.set_headless()?;
                }
                for arg in &self.args {
                    caps.add_arg(arg)?;
                }
                if self.accept_insecure_certs {
                    caps.accept_insecure_certs(true)?;
                }
                caps.into()
            }
            BrowserKind::Firefox => {
                let mut caps = DesiredCapabilities::firefox();
                if self.headless {
                    caps.set_headless()?;
                }
                for arg in &self.args {
                    caps.add_arg(arg)?;
                }
                if self.accept_insecure_certs {
                    caps.accept_insecure_certs(true)?;
                }
                caps.into()
            }
            BrowserKind::Safari => DesiredCapabilities::safari().into(),
        };

        Ok(caps)
    }
}

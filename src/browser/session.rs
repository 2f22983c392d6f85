use crate::{
    browser::{
        config::{ConnectionOptions, LaunchOptions},
        page::ChromePage,
    },
    error::{CaptureError, Result},
};
use headless_chrome::{Browser, Tab};
use std::{sync::Arc, time::Duration};

/// Add a scheme to bare addresses typed on the command line
pub fn normalize_url(url: &str) -> String {
    let trimmed = url.trim();

    if trimmed.contains("://") || trimmed.starts_with("data:") || trimmed.starts_with("about:") {
        return trimmed.to_string();
    }

    if trimmed.starts_with("localhost") || trimmed.starts_with("127.0.0.1") {
        return format!("http://{}", trimmed);
    }

    format!("https://{}", trimmed)
}

/// A Chrome/Chromium instance with the tab that captures run in
pub struct BrowserSession {
    browser: Browser,
    tab: Arc<Tab>,
}

impl BrowserSession {
    /// Launch a new browser instance with the given options
    pub fn launch(options: LaunchOptions) -> Result<Self> {
        let mut launch_opts = headless_chrome::LaunchOptions::default();

        // Keep the browser alive while change events are being watched
        launch_opts.idle_browser_timeout = Duration::from_secs(60 * 60);
        launch_opts.headless = options.headless;
        launch_opts.window_size = Some((options.window_width, options.window_height));
        launch_opts.sandbox = options.sandbox;

        if let Some(path) = options.chrome_path {
            launch_opts.path = Some(path);
        }

        if let Some(dir) = options.user_data_dir {
            launch_opts.user_data_dir = Some(dir);
        }

        let browser = Browser::new(launch_opts).map_err(|e| CaptureError::LaunchFailed(e.to_string()))?;
        let tab = browser
            .new_tab()
            .map_err(|e| CaptureError::LaunchFailed(format!("Failed to create tab: {}", e)))?;

        log::debug!("Launched browser (headless: {})", options.headless);
        Ok(Self { browser, tab })
    }

    /// Connect to an existing browser instance via WebSocket
    pub fn connect(options: ConnectionOptions) -> Result<Self> {
        let browser =
            Browser::connect(options.ws_url.clone()).map_err(|e| CaptureError::ConnectionFailed(e.to_string()))?;
        let tab = browser
            .new_tab()
            .map_err(|e| CaptureError::ConnectionFailed(format!("Failed to create tab: {}", e)))?;
        tab.set_default_timeout(Duration::from_millis(options.timeout));

        log::debug!("Connected to browser at {}", options.ws_url);
        Ok(Self { browser, tab })
    }

    /// The tab captures run in
    pub fn tab(&self) -> &Arc<Tab> {
        &self.tab
    }

    /// Get the underlying Browser instance
    pub fn browser(&self) -> &Browser {
        &self.browser
    }

    /// Navigate the capture tab to a URL
    pub fn navigate(&self, url: &str) -> Result<()> {
        self.tab
            .navigate_to(url)
            .map_err(|e| CaptureError::NavigationFailed(format!("Failed to navigate to {}: {}", url, e)))?;

        Ok(())
    }

    /// Wait for navigation to complete
    pub fn wait_for_navigation(&self) -> Result<()> {
        self.tab
            .wait_until_navigated()
            .map_err(|e| CaptureError::NavigationFailed(format!("Navigation timeout: {}", e)))?;

        Ok(())
    }

    /// Navigate and wait until the document has loaded
    pub fn open(&self, url: &str) -> Result<ChromePage> {
        let url = normalize_url(url);
        self.navigate(&url)?;
        self.wait_for_navigation()?;
        log::debug!("Loaded {}", url);
        Ok(self.page())
    }

    /// Capture surface for the current document
    pub fn page(&self) -> ChromePage {
        ChromePage::new(self.tab.clone())
    }

    /// Close the capture tab; the browser exits when the session is dropped
    pub fn close(&self) -> Result<()> {
        self.tab
            .close(true)
            .map_err(|e| CaptureError::ScriptFailed(format!("Failed to close tab: {}", e)))?;
        Ok(())
    }
}

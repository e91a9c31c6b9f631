//! Browser control for live runs.
//!
//! With the `browser` feature, [`CdpDriver`] drives Chromium over the Chrome
//! `DevTools` Protocol (chromiumoxide) and implements [`crate::ElementDriver`],
//! so every page object and scenario runs against the live storefront
//! unchanged. Queries are evaluated as JavaScript built from
//! [`crate::Selector::to_js`]; clicks and typing go through CDP input events.

use serde::Deserialize;

/// Browser launch configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    /// Run without a window
    pub headless: bool,
    /// Chromium sandbox (disable in containers)
    pub sandbox: bool,
    /// Path to the Chromium binary; auto-detected when unset
    pub executable: Option<String>,
    /// Viewport width
    pub viewport_width: u32,
    /// Viewport height
    pub viewport_height: u32,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: true,
            sandbox: true,
            executable: None,
            viewport_width: 1280,
            viewport_height: 720,
        }
    }
}

impl BrowserConfig {
    /// Set viewport dimensions
    #[must_use]
    pub const fn with_viewport(mut self, width: u32, height: u32) -> Self {
        self.viewport_width = width;
        self.viewport_height = height;
        self
    }

    /// Set headless mode
    #[must_use]
    pub const fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    /// Set the Chromium binary
    #[must_use]
    pub fn with_executable(mut self, path: impl Into<String>) -> Self {
        self.executable = Some(path.into());
        self
    }

    /// Disable the sandbox (containers, CI)
    #[must_use]
    pub const fn with_no_sandbox(mut self) -> Self {
        self.sandbox = false;
        self
    }
}

#[cfg(feature = "browser")]
mod cdp {
    use super::BrowserConfig;
    use crate::driver::ElementDriver;
    use crate::locator::Selector;
    use crate::result::{ProbeError, ProbeResult};
    use async_trait::async_trait;
    use chromiumoxide::browser::{Browser, BrowserConfig as CdpConfig};
    use chromiumoxide::page::Page;
    use futures::StreamExt;
    use serde::de::DeserializeOwned;
    use tokio::sync::Mutex;
    use tokio::task::JoinHandle;
    use tracing::{debug, trace};

    /// Attribute used to hand a JS-resolved element to CDP input commands
    const TARGET_ATTRIBUTE: &str = "data-storefront-target";

    /// Script body run against the first match `el` (may be undefined)
    fn on_first(selector: &Selector, body: &str) -> String {
        format!("(() => {{ const el = {}[0]; {body} }})()", selector.to_js())
    }

    fn js_literal(s: &str) -> String {
        serde_json::Value::String(s.to_owned()).to_string()
    }

    /// [`ElementDriver`] over one Chromium tab
    #[derive(Debug)]
    pub struct CdpDriver {
        browser: Mutex<Browser>,
        page: Page,
        handler: JoinHandle<()>,
    }

    impl CdpDriver {
        /// Launch Chromium and open a blank tab.
        ///
        /// # Errors
        ///
        /// [`ProbeError::Driver`] when Chromium cannot be started.
        pub async fn launch(config: &BrowserConfig) -> ProbeResult<Self> {
            let mut builder = CdpConfig::builder()
                .window_size(config.viewport_width, config.viewport_height);
            if !config.headless {
                builder = builder.with_head();
            }
            if !config.sandbox {
                builder = builder.no_sandbox();
            }
            if let Some(path) = &config.executable {
                builder = builder.chrome_executable(path);
            }
            let cdp_config = builder.build().map_err(ProbeError::driver)?;

            let (browser, mut handler) = Browser::launch(cdp_config)
                .await
                .map_err(ProbeError::driver)?;
            let handler = tokio::spawn(async move {
                while let Some(event) = handler.next().await {
                    if event.is_err() {
                        break;
                    }
                }
            });
            let page = browser
                .new_page("about:blank")
                .await
                .map_err(ProbeError::driver)?;
            debug!(headless = config.headless, "chromium launched");
            Ok(Self {
                browser: Mutex::new(browser),
                page,
                handler,
            })
        }

        /// Close the browser.
        ///
        /// # Errors
        ///
        /// [`ProbeError::Driver`] when Chromium does not shut down cleanly.
        pub async fn close(self) -> ProbeResult<()> {
            let mut browser = self.browser.lock().await;
            browser.close().await.map_err(ProbeError::driver)?;
            drop(browser);
            self.handler.abort();
            Ok(())
        }

        async fn eval<T: DeserializeOwned>(&self, script: String) -> ProbeResult<T> {
            trace!(script = %script, "evaluate");
            self.page
                .evaluate(script)
                .await
                .map_err(ProbeError::driver)?
                .into_value()
                .map_err(ProbeError::driver)
        }

        /// Mark the first match so CDP can address it, returning the mark
        async fn tag_first(&self, selector: &Selector) -> ProbeResult<String> {
            let token = uuid::Uuid::new_v4().simple().to_string();
            let body = format!(
                "if (!el) return false; el.setAttribute({}, {}); return true;",
                js_literal(TARGET_ATTRIBUTE),
                js_literal(&token)
            );
            if self.eval::<bool>(on_first(selector, &body)).await? {
                Ok(format!("[{TARGET_ATTRIBUTE}=\"{token}\"]"))
            } else {
                Err(ProbeError::driver(format!("no element matches {selector}")))
            }
        }

        async fn set_native_value(&self, selector: &Selector, value: &str, event: &str) -> ProbeResult<()> {
            let body = format!(
                "if (!el) return false; \
                 const proto = Object.getPrototypeOf(el); \
                 const desc = Object.getOwnPropertyDescriptor(proto, 'value'); \
                 if (!desc || !desc.set) return false; \
                 desc.set.call(el, {}); \
                 el.dispatchEvent(new Event({}, {{ bubbles: true }})); \
                 return true;",
                js_literal(value),
                js_literal(event)
            );
            if self.eval::<bool>(on_first(selector, &body)).await? {
                Ok(())
            } else {
                Err(ProbeError::driver(format!("{selector} has no settable value")))
            }
        }
    }

    #[async_trait]
    impl ElementDriver for CdpDriver {
        async fn navigate(&self, url: &str) -> ProbeResult<()> {
            self.page.goto(url).await.map_err(ProbeError::driver)?;
            Ok(())
        }

        async fn current_url(&self) -> ProbeResult<String> {
            Ok(self
                .page
                .url()
                .await
                .map_err(ProbeError::driver)?
                .unwrap_or_default())
        }

        async fn count(&self, selector: &Selector) -> ProbeResult<usize> {
            self.eval(format!("{}.length", selector.to_js())).await
        }

        async fn is_visible(&self, selector: &Selector) -> ProbeResult<bool> {
            let body = "if (!el) return false; \
                        const style = getComputedStyle(el); \
                        const rect = el.getBoundingClientRect(); \
                        return style.display !== 'none' && style.visibility !== 'hidden' \
                            && (rect.width > 0 || rect.height > 0);";
            self.eval(on_first(selector, body)).await
        }

        async fn is_enabled(&self, selector: &Selector) -> ProbeResult<bool> {
            self.eval(on_first(selector, "return !!el && !el.disabled;"))
                .await
        }

        async fn text(&self, selector: &Selector) -> ProbeResult<Option<String>> {
            self.eval(on_first(selector, "return el ? (el.textContent || '') : null;"))
                .await
        }

        async fn all_texts(&self, selector: &Selector) -> ProbeResult<Vec<String>> {
            self.eval(format!(
                "{}.map(el => el.textContent || '')",
                selector.to_js()
            ))
            .await
        }

        async fn value(&self, selector: &Selector) -> ProbeResult<Option<String>> {
            self.eval(on_first(
                selector,
                "return el && 'value' in el ? String(el.value) : null;",
            ))
            .await
        }

        async fn click(&self, selector: &Selector) -> ProbeResult<()> {
            let target = self.tag_first(selector).await?;
            let element = self
                .page
                .find_element(target.as_str())
                .await
                .map_err(ProbeError::driver)?;
            element.click().await.map_err(ProbeError::driver)?;
            debug!(selector = %selector, "clicked");
            Ok(())
        }

        async fn fill(&self, selector: &Selector, text: &str) -> ProbeResult<()> {
            self.set_native_value(selector, "", "input").await?;
            if text.is_empty() {
                return Ok(());
            }
            let target = self.tag_first(selector).await?;
            let element = self
                .page
                .find_element(target.as_str())
                .await
                .map_err(ProbeError::driver)?;
            element.focus().await.map_err(ProbeError::driver)?;
            element.type_str(text).await.map_err(ProbeError::driver)?;
            Ok(())
        }

        async fn select_option(&self, selector: &Selector, value: &str) -> ProbeResult<()> {
            self.set_native_value(selector, value, "change").await
        }
    }
}

#[cfg(feature = "browser")]
pub use cdp::CdpDriver;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = BrowserConfig::default();
        assert!(config.headless);
        assert!(config.sandbox);
        assert_eq!((config.viewport_width, config.viewport_height), (1280, 720));
    }

    #[test]
    fn test_builders() {
        let config = BrowserConfig::default()
            .with_headless(false)
            .with_no_sandbox()
            .with_viewport(800, 600)
            .with_executable("/usr/bin/chromium");
        assert!(!config.headless);
        assert!(!config.sandbox);
        assert_eq!(config.executable.as_deref(), Some("/usr/bin/chromium"));
        assert_eq!(config.viewport_width, 800);
    }

    #[test]
    fn test_yaml_partial() {
        let config: BrowserConfig = serde_yaml_ng::from_str("headless: false\n").unwrap();
        assert!(!config.headless);
        assert_eq!(config.viewport_height, 720);
    }
}

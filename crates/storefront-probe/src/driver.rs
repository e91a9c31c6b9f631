//! Element driver abstraction.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  ElementDriver (async trait, &self, interior mutability)     │
//! ├──────────────────────────────────────────────────────────────┤
//! │  ┌──────────────────────┐      ┌──────────────────────────┐  │
//! │  │  CdpDriver           │      │  MockStorefront          │  │
//! │  │  (feature "browser") │      │  (in-memory store + DOM) │  │
//! │  │  chromiumoxide CDP   │      │  used by every test      │  │
//! │  └──────────────────────┘      └──────────────────────────┘  │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Driver methods act immediately on whatever matches right now. Waiting lives
//! one level up in [`ElementRef`], which every page object goes through.

use async_trait::async_trait;
use tracing::debug;

use crate::locator::{Locator, Selector};
use crate::result::{ProbeError, ProbeResult};
use crate::wait::poll_until;

/// Immediate element operations against one browsing context.
///
/// Single-element operations act on the first match in document order.
#[async_trait]
pub trait ElementDriver: Send + Sync {
    /// Load a URL and wait for the document
    async fn navigate(&self, url: &str) -> ProbeResult<()>;

    /// Current document URL
    async fn current_url(&self) -> ProbeResult<String>;

    /// Number of elements matching the selector
    async fn count(&self, selector: &Selector) -> ProbeResult<usize>;

    /// Whether the first match is rendered. `false` when nothing matches.
    async fn is_visible(&self, selector: &Selector) -> ProbeResult<bool>;

    /// Whether the first match accepts input. `false` when nothing matches.
    async fn is_enabled(&self, selector: &Selector) -> ProbeResult<bool>;

    /// Text content of the first match
    async fn text(&self, selector: &Selector) -> ProbeResult<Option<String>>;

    /// Text content of every match, in document order
    async fn all_texts(&self, selector: &Selector) -> ProbeResult<Vec<String>>;

    /// Form value of the first match
    async fn value(&self, selector: &Selector) -> ProbeResult<Option<String>>;

    /// Click the first match
    async fn click(&self, selector: &Selector) -> ProbeResult<()>;

    /// Replace the value of the first match
    async fn fill(&self, selector: &Selector, text: &str) -> ProbeResult<()>;

    /// Empty the value of the first match
    async fn clear(&self, selector: &Selector) -> ProbeResult<()> {
        self.fill(selector, "").await
    }

    /// Select an `<option>` by value on the first match
    async fn select_option(&self, selector: &Selector, value: &str) -> ProbeResult<()>;
}

/// A locator bound to a driver, with bounded waits in front of every action.
#[derive(Clone, Copy)]
pub struct ElementRef<'a> {
    driver: &'a dyn ElementDriver,
    locator: &'a Locator,
}

impl std::fmt::Debug for ElementRef<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ElementRef")
            .field("locator", &self.locator.to_string())
            .finish()
    }
}

/// Bind a locator to a driver
#[must_use]
pub fn find<'a>(driver: &'a dyn ElementDriver, locator: &'a Locator) -> ElementRef<'a> {
    ElementRef { driver, locator }
}

impl<'a> ElementRef<'a> {
    /// The bound locator
    #[must_use]
    pub const fn locator(&self) -> &'a Locator {
        self.locator
    }

    fn selector(&self) -> &'a Selector {
        self.locator.selector()
    }

    /// Wait until at least one element matches.
    ///
    /// # Errors
    ///
    /// [`ProbeError::ElementNotFound`] when nothing matches within the budget.
    pub async fn wait_present(&self) -> ProbeResult<()> {
        let driver = self.driver;
        let selector = self.selector();
        let result = poll_until(self.locator.wait(), || async move {
            Ok(driver.count(selector).await? > 0)
        })
        .await?;
        if result.success {
            Ok(())
        } else {
            Err(ProbeError::ElementNotFound {
                selector: self.locator.to_string(),
                waited_ms: result.elapsed_ms(),
            })
        }
    }

    /// Wait until the first match is present, visible and enabled.
    ///
    /// # Errors
    ///
    /// [`ProbeError::ElementNotFound`] if nothing ever matched,
    /// [`ProbeError::Timeout`] if a match never became actionable.
    pub async fn wait_actionable(&self) -> ProbeResult<()> {
        let driver = self.driver;
        let selector = self.selector();
        let result = poll_until(self.locator.wait(), || async move {
            if driver.count(selector).await? == 0 {
                return Ok(false);
            }
            Ok(driver.is_visible(selector).await? && driver.is_enabled(selector).await?)
        })
        .await?;
        if result.success {
            return Ok(());
        }
        if self.driver.count(selector).await? == 0 {
            Err(ProbeError::ElementNotFound {
                selector: self.locator.to_string(),
                waited_ms: result.elapsed_ms(),
            })
        } else {
            Err(ProbeError::Timeout {
                selector: self.locator.to_string(),
                ms: result.elapsed_ms(),
            })
        }
    }

    /// Wait until no match is visible. Succeeds at once when nothing matches.
    ///
    /// # Errors
    ///
    /// [`ProbeError::Timeout`] if a match is still visible when the budget runs out.
    pub async fn wait_hidden(&self) -> ProbeResult<()> {
        let driver = self.driver;
        let selector = self.selector();
        let result = poll_until(self.locator.wait(), || async move {
            Ok(!driver.is_visible(selector).await?)
        })
        .await?;
        if result.success {
            Ok(())
        } else {
            Err(ProbeError::Timeout {
                selector: self.locator.to_string(),
                ms: result.elapsed_ms(),
            })
        }
    }

    /// Number of current matches, without waiting
    pub async fn count(&self) -> ProbeResult<usize> {
        self.driver.count(self.selector()).await
    }

    /// Visibility of the first match, without waiting
    pub async fn is_visible(&self) -> ProbeResult<bool> {
        self.driver.is_visible(self.selector()).await
    }

    /// Enabled state of the first match, without waiting
    pub async fn is_enabled(&self) -> ProbeResult<bool> {
        self.driver.is_enabled(self.selector()).await
    }

    /// Text of every current match, without waiting
    pub async fn all_texts(&self) -> ProbeResult<Vec<String>> {
        self.driver.all_texts(self.selector()).await
    }

    /// Text of the first match, after waiting for it
    pub async fn text(&self) -> ProbeResult<String> {
        self.wait_present().await?;
        self.driver
            .text(self.selector())
            .await?
            .ok_or_else(|| self.vanished())
    }

    /// Form value of the first match, after waiting for it.
    ///
    /// # Errors
    ///
    /// [`ProbeError::Driver`] when the match is not a form control.
    pub async fn value(&self) -> ProbeResult<String> {
        self.wait_present().await?;
        self.driver
            .value(self.selector())
            .await?
            .ok_or_else(|| ProbeError::driver(format!("{} has no form value", self.locator)))
    }

    /// Wait until actionable, then click
    pub async fn click(&self) -> ProbeResult<()> {
        self.wait_actionable().await?;
        debug!(locator = %self.locator, "click");
        self.driver.click(self.selector()).await
    }

    /// Wait until actionable, then replace the value
    pub async fn fill(&self, text: &str) -> ProbeResult<()> {
        self.wait_actionable().await?;
        debug!(locator = %self.locator, len = text.len(), "fill");
        self.driver.fill(self.selector(), text).await
    }

    /// Wait until actionable, then empty the value
    pub async fn clear(&self) -> ProbeResult<()> {
        self.wait_actionable().await?;
        debug!(locator = %self.locator, "clear");
        self.driver.clear(self.selector()).await
    }

    /// Wait until actionable, then select an option by value
    pub async fn select_option(&self, value: &str) -> ProbeResult<()> {
        self.wait_actionable().await?;
        debug!(locator = %self.locator, value, "select");
        self.driver.select_option(self.selector(), value).await
    }

    fn vanished(&self) -> ProbeError {
        ProbeError::ElementNotFound {
            selector: self.locator.to_string(),
            waited_ms: 0,
        }
    }
}

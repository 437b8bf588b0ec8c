//! Page navigation and element capture.
//!
//! The store pages render a list of `c-wiz[jsrenderer]` components; the job
//! captures one of them by 1-based index. Waiting is two-phase: up to the
//! page-load timeout for any component to render at all, then up to the
//! element wait for the target to become visible.

use std::sync::LazyLock;
use std::time::Duration;

use fantoccini::{Client, Locator, elements::Element};
use regex::Regex;
use tracing::debug;

use cdnwatch_core::SnapshotConfig;

/// CSS selector matching the repeated page components.
pub const COMPONENT_SELECTOR: &str = "c-wiz[jsrenderer]";

/// App id placeholder when the URL carries no `id=` parameter.
const UNKNOWN_APP: &str = "unknown_app";

static APP_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"id=([^&]+)").expect("valid app id pattern"));

/// Errors from a single URL's capture-and-crop attempt.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    /// Navigation to the page failed.
    #[error("navigation failed: {0}")]
    Navigation(String),

    /// No matching component rendered within the page-load timeout.
    #[error("no matching component rendered within the page-load timeout")]
    PageLoadTimeout,

    /// Fewer components than the requested index.
    #[error("page has {found} matching components, cannot capture component {requested}")]
    NotEnoughComponents {
        /// Components actually found on the page.
        found: usize,
        /// The 1-based index that was requested.
        requested: usize,
    },

    /// The target component never became visible.
    #[error("component did not become visible within the wait limit")]
    NotVisible,

    /// Any other WebDriver command failure.
    #[error("WebDriver command failed: {0}")]
    WebDriver(#[from] fantoccini::error::CmdError),

    /// Screenshot bytes could not be decoded or re-encoded.
    #[error("image processing failed: {0}")]
    Image(#[from] image::ImageError),

    /// Writing the cropped screenshot to disk failed.
    #[error("could not write screenshot: {0}")]
    Io(#[from] std::io::Error),
}

/// Extract the app id from a store URL's `id=` query parameter.
///
/// Falls back to a fixed placeholder so every capture has a usable name.
#[must_use]
pub fn app_id_from_url(url: &str) -> String {
    APP_ID_RE
        .captures(url)
        .and_then(|c| c.get(1))
        .map_or_else(|| UNKNOWN_APP.to_owned(), |m| m.as_str().to_owned())
}

/// Navigate to `url` and screenshot its `index`-th (1-based) component.
///
/// Returns the raw PNG bytes of the element screenshot.
///
/// # Errors
///
/// Returns the [`SnapshotError`] variant describing which phase failed.
pub async fn capture_component(
    client: &mut Client,
    url: &str,
    index: usize,
    config: &SnapshotConfig,
) -> Result<Vec<u8>, SnapshotError> {
    client
        .goto(url)
        .await
        .map_err(|e| SnapshotError::Navigation(e.to_string()))?;

    // Page-load wait: the components render late, well after navigation
    // resolves, so poll for the first one.
    client
        .wait()
        .at_most(config.page_load_timeout)
        .for_element(Locator::Css(COMPONENT_SELECTOR))
        .await
        .map_err(|_| SnapshotError::PageLoadTimeout)?;

    let components = client.find_all(Locator::Css(COMPONENT_SELECTOR)).await?;
    let found = components.len();
    let Some(mut target) = (index > 0)
        .then(|| components.into_iter().nth(index - 1))
        .flatten()
    else {
        return Err(SnapshotError::NotEnoughComponents {
            found,
            requested: index,
        });
    };

    if let Ok(Some(renderer)) = target.attr("jsrenderer").await {
        debug!(url, index, renderer, "capturing component");
    }

    wait_until_displayed(&mut target, config.element_wait).await?;
    Ok(target.screenshot().await?)
}

/// Poll an element until it reports as displayed, up to `limit`.
async fn wait_until_displayed(element: &mut Element, limit: Duration) -> Result<(), SnapshotError> {
    let deadline = tokio::time::Instant::now() + limit;
    loop {
        if element.is_displayed().await? {
            return Ok(());
        }
        if tokio::time::Instant::now() >= deadline {
            return Err(SnapshotError::NotVisible);
        }
        tokio::time::sleep(Duration::from_millis(250)).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_extract_app_id_from_store_url() {
        let url = "https://play.google.com/store/apps/details?id=shop.kubon";
        assert_eq!(app_id_from_url(url), "shop.kubon");
    }

    #[test]
    fn test_should_stop_app_id_at_next_parameter() {
        let url = "https://play.google.com/store/apps/details?id=io.example.app&hl=en";
        assert_eq!(app_id_from_url(url), "io.example.app");
    }

    #[test]
    fn test_should_fall_back_for_url_without_id() {
        assert_eq!(app_id_from_url("https://example.com/page"), "unknown_app");
    }
}

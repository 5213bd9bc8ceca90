//! Page-ready callbacks and the small decoration rules the site applies
//! once the document has loaded.

use smallvec::SmallVec;
use url::Url;

/// Classes handed out to featured project cards.
pub const FEATURED_COLORS: [&str; 3] = ["blue", "yellow", "red"];

/// Class marking a featured project card.
pub const FEATURED_CLASS: &str = "featured-project";

type ReadyCallback<C> = Box<dyn FnOnce(&mut C)>;

/// Ordered list of callbacks to run once the page is ready.
///
/// `C` is whatever the host hands the callbacks (the DOM document in the
/// browser, a fake page in tests).
pub struct PageInitializer<C> {
    callbacks: SmallVec<[ReadyCallback<C>; 4]>,
}

impl<C> Default for PageInitializer<C> {
    fn default() -> Self {
        Self {
            callbacks: SmallVec::new(),
        }
    }
}

impl<C> PageInitializer<C> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<F>(&mut self, callback: F)
    where
        F: FnOnce(&mut C) + 'static,
    {
        self.callbacks.push(Box::new(callback));
    }

    /// Run every registered callback in registration order. Each runs once;
    /// the list is empty afterwards. Returns how many ran.
    pub fn run_all(&mut self, ctx: &mut C) -> usize {
        let callbacks = std::mem::take(&mut self.callbacks);
        let count = callbacks.len();
        for callback in callbacks {
            callback(ctx);
        }
        log::debug!("ran {count} page-ready callbacks");
        count
    }

    pub fn len(&self) -> usize {
        self.callbacks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.callbacks.is_empty()
    }
}

impl<C> std::fmt::Debug for PageInitializer<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageInitializer")
            .field("pending", &self.callbacks.len())
            .finish()
    }
}

/// Pick a featured card color from a uniform sample `r` in [0, 1).
pub fn pick_featured_color(r: f64) -> &'static str {
    let last = FEATURED_COLORS.len() - 1;
    let i = (r.max(0.0) * FEATURED_COLORS.len() as f64).floor() as usize;
    FEATURED_COLORS[i.min(last)]
}

/// Host of `href` once resolved against the page URL, for `http(s)`
/// links only. Relative and protocol-relative links take the page's
/// scheme and host.
pub fn link_host(href: &str, page_url: &str) -> Option<String> {
    let href = href.trim();
    let link = match Url::parse(page_url) {
        Ok(base) => base.join(href),
        Err(_) => Url::parse(href),
    }
    .ok()?;

    if !matches!(link.scheme(), "http" | "https") {
        return None;
    }
    link.host_str().map(str::to_owned)
}

/// Whether a link leaves the site and should open in a new tab.
pub fn is_external_link(href: &str, page_url: &str) -> bool {
    let Some(host) = link_host(href, page_url) else {
        return false;
    };
    let page_host = Url::parse(page_url)
        .ok()
        .and_then(|page| page.host_str().map(str::to_owned));
    page_host.as_deref() != Some(host.as_str())
}

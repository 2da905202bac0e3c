//! Browser page capability and page-reloading polls

use std::fmt;
use std::time::Duration;

use crate::clock::Clock;
use crate::error::{PageError, PollResult};
use crate::poller::{Outcome, PollOptions, PollSpec, PollSummary, Poller};

/// Per-attempt wait handed to page assertions when the caller does not set one
pub const DEFAULT_QUERY_WAIT: Duration = Duration::from_millis(500);

/// What a live browser session must offer to the polling helpers.
///
/// Methods take `&self` so a predicate and its reload action can share one page;
/// drivers that need mutation should use interior mutability.
pub trait Page {
    /// URL the browser is currently showing
    fn current_url(&self) -> Result<String, PageError>;

    /// HTTP status of the last navigation
    fn status_code(&self) -> Result<u16, PageError>;

    /// Navigate to `url`, replacing the current document
    fn visit(&self, url: &str) -> Result<(), PageError>;

    /// Evaluate a content or selector assertion, waiting at most `query.wait`.
    ///
    /// Returns `Ok(false)` or [`PageError::NotMet`] when the assertion does not hold.
    fn check(&self, query: &PageQuery) -> Result<bool, PageError>;
}

impl<P: Page + ?Sized> Page for &P {
    fn current_url(&self) -> Result<String, PageError> {
        (**self).current_url()
    }

    fn status_code(&self) -> Result<u16, PageError> {
        (**self).status_code()
    }

    fn visit(&self, url: &str) -> Result<(), PageError> {
        (**self).visit(url)
    }

    fn check(&self, query: &PageQuery) -> Result<bool, PageError> {
        (**self).check(query)
    }
}

/// Kind of page assertion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryKind {
    Content,
    NoContent,
    Selector,
    Css,
    Link,
    Button,
    Field,
    Title,
}

impl QueryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            QueryKind::Content => "has_content",
            QueryKind::NoContent => "has_no_content",
            QueryKind::Selector => "has_selector",
            QueryKind::Css => "has_css",
            QueryKind::Link => "has_link",
            QueryKind::Button => "has_button",
            QueryKind::Field => "has_field",
            QueryKind::Title => "has_title",
        }
    }
}

impl fmt::Display for QueryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single assertion against the current page
#[derive(Debug, Clone, PartialEq)]
pub struct PageQuery {
    pub kind: QueryKind,
    pub value: String,
    /// Container selector the assertion is scoped to
    pub within: Option<String>,
    /// Upper bound on how long one evaluation may wait
    pub wait: Duration,
}

impl PageQuery {
    pub fn new(kind: QueryKind, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
            within: None,
            wait: DEFAULT_QUERY_WAIT,
        }
    }

    pub fn content(text: impl Into<String>) -> Self {
        Self::new(QueryKind::Content, text)
    }

    pub fn no_content(text: impl Into<String>) -> Self {
        Self::new(QueryKind::NoContent, text)
    }

    pub fn css(selector: impl Into<String>) -> Self {
        Self::new(QueryKind::Css, selector)
    }

    pub fn within(mut self, selector: impl Into<String>) -> Self {
        self.within = Some(selector.into());
        self
    }

    pub fn wait(mut self, wait: Duration) -> Self {
        self.wait = wait;
        self
    }
}

impl<C: Clock> Poller<C> {
    /// Poll `predicate`, reloading the current page between attempts
    pub fn reload_page_while_false<P, F>(
        &self,
        page: &P,
        options: &PollOptions,
        predicate: F,
    ) -> PollResult<PollSummary>
    where
        P: Page + ?Sized,
        F: FnMut() -> PollResult<Outcome>,
    {
        let url = page.current_url()?;
        let spec = PollSpec::new(predicate)
            .on_retry(|| reload(page))
            .with_options(options, format!("{} was not passing the expectation.", url));
        self.run(spec)
    }
}

/// Full navigation to whatever the page is showing now
pub(crate) fn reload<P: Page + ?Sized>(page: &P) -> PollResult<()> {
    let url = page.current_url()?;
    page.visit(&url)?;
    Ok(())
}

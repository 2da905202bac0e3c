//! Reload a page until a content or selector assertion holds

use tracing::debug;

use crate::clock::Clock;
use crate::error::{PageError, PollResult};
use crate::page::{reload, Page, PageQuery};
use crate::poller::{Outcome, PollOptions, PollSpec, PollSummary, Poller};

impl<C: Clock> Poller<C> {
    /// Reload `page` until `query` holds.
    ///
    /// A failed assertion only means "not yet"; navigation and driver errors end
    /// the poll.
    pub fn reload_page_until<P>(
        &self,
        page: &P,
        query: &PageQuery,
        options: &PollOptions,
    ) -> PollResult<PollSummary>
    where
        P: Page + ?Sized,
    {
        let url = page.current_url()?;
        let default_reason = format!("{} didn't match {} for {}", url, query.value, query.kind);

        let spec = PollSpec::new(|| check_query(page, query))
            .on_retry(|| reload(page))
            .with_options(options, default_reason);
        self.run(spec)
    }
}

fn check_query<P: Page + ?Sized>(page: &P, query: &PageQuery) -> PollResult<Outcome> {
    match page.check(query) {
        Ok(met) => Ok(met.into()),
        Err(PageError::NotMet(detail)) => {
            debug!(kind = %query.kind, value = %query.value, "{}", detail);
            Ok(Outcome::Continue)
        }
        Err(e) => Err(e.into()),
    }
}

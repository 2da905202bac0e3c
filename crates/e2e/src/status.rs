//! Poll until a page or URL returns an expected HTTP status

use std::collections::BTreeSet;

use crate::clock::Clock;
use crate::error::PollResult;
use crate::http::HeadClient;
use crate::page::{reload, Page};
use crate::poller::{Outcome, PollOptions, PollSpec, PollSummary, Poller};

/// Status codes a resource returns while it is not yet published
pub const DEFAULT_TOLERABLE_CODES: [u16; 1] = [404];

/// Three-way classification of observed status codes.
///
/// Accepted codes end the poll successfully, tolerable codes keep it going, and
/// anything else aborts it. The two sets may overlap; accepted wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusCodeCheck {
    accepted: BTreeSet<u16>,
    tolerable: BTreeSet<u16>,
}

impl StatusCodeCheck {
    /// Accept any of `codes`, tolerating the default "not yet published" codes
    pub fn new(codes: impl IntoIterator<Item = u16>) -> Self {
        Self {
            accepted: codes.into_iter().collect(),
            tolerable: DEFAULT_TOLERABLE_CODES.into_iter().collect(),
        }
    }

    /// Replace the codes that mean "keep retrying"
    pub fn keep_retrying_while(mut self, codes: impl IntoIterator<Item = u16>) -> Self {
        self.tolerable = codes.into_iter().collect();
        self
    }

    pub fn accepted(&self) -> &BTreeSet<u16> {
        &self.accepted
    }

    pub fn tolerable(&self) -> &BTreeSet<u16> {
        &self.tolerable
    }

    pub fn classify(&self, target: &str, code: u16) -> Outcome {
        if self.accepted.contains(&code) {
            Outcome::Stop
        } else if self.tolerable.contains(&code) {
            Outcome::Continue
        } else {
            Outcome::Abort(format!("Aborting reloading {} as a {} was returned", target, code))
        }
    }

    fn fail_reason(&self, target: &str) -> String {
        let codes: Vec<String> = self.accepted.iter().map(u16::to_string).collect();
        format!("{} was not returning {}", target, codes.join(","))
    }
}

impl<C: Clock> Poller<C> {
    /// Reload `page` until its last navigation returned an accepted status
    pub fn reload_page_until_status_code<P>(
        &self,
        page: &P,
        check: &StatusCodeCheck,
        options: &PollOptions,
    ) -> PollResult<PollSummary>
    where
        P: Page + ?Sized,
    {
        let url = page.current_url()?;
        let predicate = || -> PollResult<Outcome> {
            let target = page.current_url()?;
            let code = page.status_code()?;
            Ok(check.classify(&target, code))
        };

        let spec = PollSpec::new(predicate)
            .on_retry(|| reload(page))
            .with_options(options, check.fail_reason(&url));
        self.run(spec)
    }

    /// Issue HEAD requests to `url` until one returns an accepted status
    pub fn reload_url_until_status_code<H>(
        &self,
        client: &H,
        url: &str,
        check: &StatusCodeCheck,
        options: &PollOptions,
    ) -> PollResult<PollSummary>
    where
        H: HeadClient + ?Sized,
    {
        let predicate = || -> PollResult<Outcome> {
            let code = client.head(url)?;
            Ok(check.classify(url, code))
        };

        let spec = PollSpec::new(predicate).with_options(options, check.fail_reason(url));
        self.run(spec)
    }
}

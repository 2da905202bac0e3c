//! Specialist Publisher E2E Polling Helpers
//!
//! End-to-end publishing checks have to wait for content to propagate from the
//! publishing app to the public site. This crate provides the reload-until
//! helpers those checks are built on:
//! - A blocking poller that re-runs a predicate on a fixed interval
//! - Page reload adapters for content and status-code expectations
//! - A HEAD-request adapter for polling a URL directly
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Poller::run(PollSpec) -> PollSummary                       │
//! │    ├── predicate() -> Stop | Continue | Abort(reason)       │
//! │    ├── timeout check (soft: first attempt always runs)      │
//! │    ├── sleep(interval)                                      │
//! │    └── on_retry()            (reload page, if any)          │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Adapters                                                   │
//! │    ├── reload_page_while_false(page, options, predicate)    │
//! │    ├── reload_page_until(page, query, options)              │
//! │    ├── reload_page_until_status_code(page, check, options)  │
//! │    └── reload_url_until_status_code(client, url, check, ..) │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Capabilities                                               │
//! │    ├── Page        (current_url, status_code, visit, check) │
//! │    ├── HeadClient  (head -> status)                         │
//! │    └── Clock       (now, sleep)                             │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ```no_run
//! use publishing_e2e::{HttpClient, PollConfig, PollOptions, Poller, StatusCodeCheck};
//!
//! # fn main() -> publishing_e2e::PollResult<()> {
//! let poller = Poller::new(&PollConfig::default().with_env_overrides()?)?;
//! let client = HttpClient::new()?;
//! poller.reload_url_until_status_code(
//!     &client,
//!     "https://www.gov.uk/aaib-reports/report",
//!     &StatusCodeCheck::new([200]),
//!     &PollOptions::default(),
//! )?;
//! # Ok(())
//! # }
//! ```

pub mod clock;
pub mod config;
pub mod content;
pub mod error;
pub mod http;
pub mod page;
pub mod poller;
pub mod status;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::PollConfig;
pub use error::{PageError, PollError, PollResult};
pub use http::{HeadClient, HttpClient};
pub use page::{Page, PageQuery, QueryKind};
pub use poller::{Outcome, PollOptions, PollSpec, PollSummary, Poller};
pub use status::StatusCodeCheck;

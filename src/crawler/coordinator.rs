//! Crawler coordinator - main crawl orchestration logic
//!
//! The coordinator owns the frontier, the visited set and the worker pool.
//! It dispatches queued URLs to workers until the crawl is quiescent: the
//! frontier is empty and no worker is running, since only a running worker
//! can add to the frontier.

use crate::config::CrawlOptions;
use crate::crawler::asset_checker::AssetChecker;
use crate::crawler::client::HttpClient;
use crate::crawler::fetcher::Fetcher;
use crate::crawler::limiter::RateLimiter;
use crate::crawler::link_checker::LinkChecker;
use crate::crawler::parser::parse_page;
use crate::crawler::pool::TaskPool;
use crate::output::{PageRecord, Report, ReportBuilder};
use crate::state::{Frontier, FrontierEntry, VisitedSet};
use crate::url::is_same_domain;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use url::Url;

/// Dispatcher state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    /// Dispatching frontier entries to workers
    Running,
    /// Frontier is empty; waiting for the next worker to finish, then
    /// re-checking the frontier
    AwaitingWorkers,
    /// Frontier is empty and every worker has finished
    Done,
}

/// State shared by every worker
struct CrawlContext {
    root: Url,
    max_depth: u32,
    fetcher: Arc<Fetcher>,
    link_checker: LinkChecker,
    asset_checker: AssetChecker,
    frontier: Frontier,
    visited: VisitedSet,
    report: ReportBuilder,
}

/// Main crawler coordinator structure
pub struct Coordinator {
    context: Arc<CrawlContext>,
    workers: usize,
    cancel: CancellationToken,
    /// Stops the rate limiter ticker once the crawl is over
    shutdown: CancellationToken,
}

impl Coordinator {
    /// Creates a coordinator for a validated root URL
    ///
    /// Must be called within a tokio runtime.
    ///
    /// # Arguments
    ///
    /// * `options` - Normalized crawl options
    /// * `root` - The parsed root URL; its host and port bound the crawl
    /// * `client` - Transport for every request
    /// * `cancel` - Crawl-wide cancellation signal
    pub fn new(
        options: &CrawlOptions,
        root: Url,
        client: Arc<dyn HttpClient>,
        cancel: CancellationToken,
    ) -> Self {
        let shutdown = cancel.child_token();
        let limiter = Arc::new(RateLimiter::new(options.delay, &shutdown));
        if !limiter.delay().is_zero() {
            tracing::debug!("Pacing requests every {:?}", limiter.delay());
        }
        let fetcher = Arc::new(Fetcher::new(
            client,
            options.user_agent.clone(),
            options.timeout,
            options.retries,
            limiter,
        ));

        let context = CrawlContext {
            max_depth: options.depth,
            link_checker: LinkChecker::new(Arc::clone(&fetcher), options.workers),
            asset_checker: AssetChecker::new(Arc::clone(&fetcher), options.workers),
            fetcher,
            frontier: Frontier::with_root(root.as_str()),
            visited: VisitedSet::new(),
            report: ReportBuilder::new(&root, options.depth),
            root,
        };

        Self {
            context: Arc::new(context),
            workers: options.workers,
            cancel,
            shutdown,
        }
    }

    /// Runs the crawl to quiescence or cancellation and returns the report
    ///
    /// On cancellation no new URL is dispatched, running workers are awaited,
    /// and the report holds every page completed so far.
    pub async fn run(self) -> Report {
        let context = &self.context;
        tracing::info!(
            "Starting crawl of {} (depth {}, {} workers)",
            context.root,
            context.max_depth,
            self.workers
        );

        let start_time = Instant::now();
        let mut pool: TaskPool<()> = TaskPool::new(self.workers);
        let mut phase = Phase::Running;
        let mut dispatched: u64 = 0;

        while phase != Phase::Done {
            let next = match phase {
                Phase::Running if self.cancel.is_cancelled() => Phase::AwaitingWorkers,
                Phase::Running => match context.frontier.dequeue() {
                    Some(entry) => {
                        let worker_context = Arc::clone(context);
                        let worker_cancel = self.cancel.clone();
                        let task = async move {
                            process_url(&worker_context, entry, &worker_cancel).await;
                        };

                        pool.reap();
                        if pool.submit(task, &self.cancel).await {
                            dispatched += 1;
                            if dispatched % 10 == 0 {
                                tracing::info!(
                                    "Progress: {} dispatched, {} pages recorded, {} queued, {} in flight",
                                    dispatched,
                                    context.report.len(),
                                    context.frontier.len(),
                                    pool.in_flight()
                                );
                                tracing::debug!("Worker pool holds {} tasks", pool.retained());
                            }
                            Phase::Running
                        } else {
                            Phase::AwaitingWorkers
                        }
                    }
                    None => Phase::AwaitingWorkers,
                },
                Phase::AwaitingWorkers if self.cancel.is_cancelled() => {
                    pool.join().await;
                    Phase::Done
                }
                Phase::AwaitingWorkers => {
                    if !context.frontier.is_empty() {
                        Phase::Running
                    } else if pool.is_drained() {
                        Phase::Done
                    } else {
                        // Wait for one worker, not all: any finisher may have queued URLs
                        tokio::select! {
                            _ = pool.join_next() => {}
                            _ = self.cancel.cancelled() => {}
                        }
                        Phase::AwaitingWorkers
                    }
                }
                Phase::Done => Phase::Done,
            };

            if next != phase {
                tracing::debug!("Coordinator phase {:?} -> {:?}", phase, next);
                phase = next;
            }
        }

        pool.join().await;
        self.shutdown.cancel();

        if self.cancel.is_cancelled() {
            tracing::warn!(
                "Crawl cancelled; {} URLs left in the frontier",
                context.frontier.len()
            );
        }

        let report = context.report.finish();
        tracing::info!(
            "Crawl finished: {} pages in {:.2}s",
            report.pages.len(),
            start_time.elapsed().as_secs_f64()
        );
        report
    }
}

/// Processes one frontier entry from claim to recorded page
async fn process_url(context: &CrawlContext, entry: FrontierEntry, cancel: &CancellationToken) {
    if !context.visited.claim(&entry.url) {
        tracing::trace!("Skipping already visited {}", entry.url);
        return;
    }

    tracing::debug!("Processing {} (depth {})", entry.url, entry.depth);
    let mut page = PageRecord::new(&entry.url, entry.depth);

    let fetched = match context.fetcher.fetch(&entry.url, cancel).await {
        Ok(fetched) => fetched,
        Err(e) => {
            tracing::warn!("Failed to fetch {}: {}", entry.url, e);
            page.fail(e.to_string());
            context.report.add_page(page);
            return;
        }
    };

    page.apply_http_status(fetched.status_code);

    let Some(body) = fetched.body else {
        context.report.add_page(page);
        return;
    };

    let page_url = match Url::parse(&entry.url) {
        Ok(url) => url,
        Err(e) => {
            tracing::warn!("Cannot resolve links on {}: {}", entry.url, e);
            context.report.add_page(page);
            return;
        }
    };

    let parsed = parse_page(&body, &page_url);
    page.seo = parsed.seo;

    let next_depth = entry.depth.saturating_add(1);
    if page.status.is_ok() && next_depth < context.max_depth {
        enqueue_links(context, &parsed.links, next_depth);
    }

    let ((broken_links, checked_at), assets) = tokio::join!(
        context.link_checker.check(&parsed.links, cancel),
        context.asset_checker.check_refs(parsed.assets, cancel),
    );

    page.broken_links = Some(broken_links);
    page.assets = Some(assets);
    page.discovered_at = checked_at;
    context.report.add_page(page);
}

/// Queues same-domain links that have not been visited yet
fn enqueue_links(context: &CrawlContext, links: &[String], depth: u32) {
    let mut seen = HashSet::new();
    let entries: Vec<FrontierEntry> = links
        .iter()
        .filter_map(|link| Url::parse(link).ok())
        .filter(|url| is_same_domain(url, &context.root))
        .map(|url| url.to_string())
        .filter(|url| !context.visited.contains(url))
        .filter(|url| seen.insert(url.clone()))
        .map(|url| FrontierEntry::new(url, depth))
        .collect();

    if !entries.is_empty() {
        tracing::debug!("Queueing {} links at depth {}", entries.len(), depth);
        context.frontier.enqueue(entries);
    }
}

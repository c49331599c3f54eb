use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio_util::task::TaskTracker;
use tracing::{debug, info, warn};

use crate::args::{Args, Relation};
use crate::extractor::{decode_mailto, Extractor};
use crate::fetcher::{FetchError, Fetcher};
use crate::results::ResultSet;

/// One-way latch shared by every lookup task. Once any task sees the
/// rate-limit marker in an API body, all API-backed strategies short-circuit
/// as "not found" for the rest of the run. Best effort: a race letting one
/// extra call through before the latch lands is acceptable.
#[derive(Debug, Default)]
pub struct RateLimitGate {
    tripped: AtomicBool,
}

impl RateLimitGate {
    pub fn is_limited(&self) -> bool {
        self.tripped.load(Ordering::SeqCst)
    }

    pub fn trip(&self) {
        self.tripped.store(true, Ordering::SeqCst);
    }
}

/// The crawler itself: owns the shared HTTP client, the capture patterns,
/// the result accumulator and the rate-limit gate. One instance per run,
/// shared across every spawned lookup task.
pub struct EmailGetter {
    fetcher: Fetcher,
    extractor: Extractor,
    results: ResultSet,
    gate: RateLimitGate,
    only_users: bool,
    page: u32,
    base_url: String,
}

impl EmailGetter {
    pub fn new(args: &Args) -> Result<Self, FetchError> {
        Ok(EmailGetter {
            fetcher: Fetcher::new()?,
            extractor: Extractor::new(),
            results: ResultSet::new(),
            gate: RateLimitGate::default(),
            only_users: args.no_emails,
            page: args.page,
            base_url: args.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Run one complete job: the root lookup, plus one graph-expansion pass
    /// when a relation was requested. Returns every recorded value in
    /// insertion order once all spawned tasks have finished.
    pub async fn run(self, args: &Args) -> Vec<String> {
        let getter = Arc::new(self);
        let tracker = TaskTracker::new();
        let semaphore = Arc::new(Semaphore::new(args.concurrency.max(1)));

        EmailGetter::spawn_lookup(&getter, &tracker, &semaphore, args.username.clone());

        if let Some(relation) = args.relation() {
            let getter_clone = getter.clone();
            let tracker_clone = tracker.clone();
            let sem_clone = semaphore.clone();
            let root = args.username.clone();
            tracker.spawn(async move {
                EmailGetter::expand(&getter_clone, &tracker_clone, &sem_clone, &root, relation)
                    .await;
            });
        }

        // The expander registers its lookups while it is itself still
        // tracked, so the wait below cannot complete early.
        tracker.close();
        tracker.wait().await;

        info!("Job complete: {} result(s)", getter.results.len());
        getter.results.values()
    }

    /// Spawn one tracked, concurrency-bounded lookup task.
    fn spawn_lookup(
        getter: &Arc<EmailGetter>,
        tracker: &TaskTracker,
        semaphore: &Arc<Semaphore>,
        username: String,
    ) {
        let getter = getter.clone();
        let sem_clone = semaphore.clone();
        tracker.spawn(async move {
            // The semaphore is never closed, so acquire cannot fail.
            let _permit = sem_clone.acquire().await.unwrap();
            getter.lookup(&username).await;
        });
    }

    /// The fallback chain for one username: API, then profile page, then
    /// recent activity, stopping at the first strategy that finds anything.
    /// In username-enumeration mode the chain is bypassed entirely.
    async fn lookup(&self, username: &str) {
        if self.only_users {
            self.results.record(username);
            return;
        }

        if self.extract_from_api(username).await {
            return;
        }
        if self.extract_from_profile(username).await {
            return;
        }
        if self.extract_from_activity(username).await {
            return;
        }

        debug!("No email found for '{}'", username);
    }

    /// Fetch one page of the root user's followers/following listing and
    /// spawn a lookup for every captioned account except the root itself.
    /// One level deep only; spawned lookups never expand further.
    async fn expand(
        getter: &Arc<EmailGetter>,
        tracker: &TaskTracker,
        semaphore: &Arc<Semaphore>,
        root: &str,
        relation: Relation,
    ) {
        let mut url = format!("{}/{}/{}", getter.base_url, root, relation.as_str());
        if getter.page > 1 {
            url.push_str(&format!("?page={}", getter.page));
        }

        let body = match getter.fetcher.fetch(&url).await {
            Ok(body) => body,
            Err(err) => {
                warn!(
                    "Could not fetch {} listing for '{}': {}",
                    relation.as_str(),
                    root,
                    err
                );
                return;
            }
        };

        let related = getter.extractor.listing_usernames(&body);
        info!(
            "Found {} {} entries for '{}'",
            related.len(),
            relation.as_str(),
            root
        );

        for username in related {
            if username != root {
                EmailGetter::spawn_lookup(getter, tracker, semaphore, username);
            }
        }
    }

    /// Strategy 1: the users API. Trips the gate on a rate-limit body.
    async fn extract_from_api(&self, username: &str) -> bool {
        if self.gate.is_limited() {
            return false;
        }

        let url = format!("{}/api/users/{}", self.base_url, username);
        let body = match self.fetcher.fetch(&url).await {
            Ok(body) => body,
            Err(err) => {
                warn!("API lookup for '{}' failed: {}", username, err);
                return false;
            }
        };

        if self.extractor.is_rate_limited(&body) {
            info!("API rate limit exceeded; disabling API strategies for this run");
            self.gate.trip();
            return false;
        }

        match self.extractor.email_field(&body) {
            Some(email) => {
                self.results.record(email);
                true
            }
            None => false,
        }
    }

    /// Strategy 2: the public profile page, which may carry an obfuscated
    /// mailto link. An undecodable link counts as not found.
    async fn extract_from_profile(&self, username: &str) -> bool {
        let url = format!("{}/{}", self.base_url, username);
        let body = match self.fetcher.fetch(&url).await {
            Ok(body) => body,
            Err(err) => {
                warn!("Profile fetch for '{}' failed: {}", username, err);
                return false;
            }
        };

        let Some(raw) = self.extractor.mailto_link(&body) else {
            return false;
        };

        match decode_mailto(&raw) {
            Some(email) => {
                self.results.record(email);
                true
            }
            None => {
                debug!("Discarding undecodable mailto link on '{}' profile", username);
                false
            }
        }
    }

    /// Strategy 3: commit authors of the most recently updated owned
    /// repository. May record several addresses at once.
    async fn extract_from_activity(&self, username: &str) -> bool {
        if self.gate.is_limited() {
            return false;
        }

        let url = format!(
            "{}/api/users/{}/repos?type=owner&sort=updated",
            self.base_url, username
        );
        let body = match self.fetcher.fetch(&url).await {
            Ok(body) => body,
            Err(err) => {
                warn!("Repo listing for '{}' failed: {}", username, err);
                return false;
            }
        };

        let Some(full_name) = self.extractor.repo_full_name(&body) else {
            return false;
        };

        let commits_url = format!("{}/api/repos/{}/commits", self.base_url, full_name);
        let commits = match self.fetcher.fetch(&commits_url).await {
            Ok(body) => body,
            Err(err) => {
                warn!("Commit listing for '{}' failed: {}", full_name, err);
                return false;
            }
        };

        let emails = self.extractor.all_email_fields(&commits);
        for email in &emails {
            self.results.record(email.clone());
        }

        !emails.is_empty()
    }
}

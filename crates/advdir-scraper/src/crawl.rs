//! Breadth-first discovery of additional profile links.
//!
//! The frontier walks same-site `/advisor/*.html` pages starting at the seed
//! page, collecting profile links from every page it fetches. It is purely a
//! discovery aid; the caller always unions in the seed page's own links.

use std::collections::{BTreeSet, HashSet, VecDeque};

use crate::client::PageClient;
use crate::links::{extract_advisor_links, extract_internal_pages};

/// Result of a crawl: discovered profile URLs plus page counters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlOutcome {
    pub advisor_urls: BTreeSet<String>,
    /// Pages fetched successfully, seed included.
    pub pages_fetched: usize,
    /// Pages whose fetch failed.
    pub errors: usize,
}

struct Frontier<'a> {
    base_url: &'a str,
    page_limit: usize,
    visited: HashSet<String>,
    queue: VecDeque<String>,
    outcome: CrawlOutcome,
}

impl<'a> Frontier<'a> {
    fn new(base_url: &'a str, page_limit: usize) -> Self {
        Self {
            base_url,
            page_limit,
            visited: HashSet::new(),
            queue: VecDeque::new(),
            outcome: CrawlOutcome::default(),
        }
    }

    fn has_capacity(&self) -> bool {
        self.outcome.pages_fetched < self.page_limit
    }

    /// Records a fetched page: harvests its profile links and enqueues the
    /// unvisited advisor pages it links to.
    fn absorb(&mut self, page_url: &str, html: &str) {
        self.outcome
            .advisor_urls
            .extend(extract_advisor_links(html, self.base_url));
        for next in extract_internal_pages(html, page_url, self.base_url) {
            if !self.visited.contains(&next) {
                self.queue.push_back(next);
            }
        }
        self.outcome.pages_fetched += 1;

        if self.outcome.pages_fetched % 25 == 0 {
            tracing::info!(
                pages = self.outcome.pages_fetched,
                page_limit = self.page_limit,
                profiles = self.outcome.advisor_urls.len(),
                "crawl progress"
            );
        }
    }

    async fn run(mut self, client: &PageClient) -> CrawlOutcome {
        while self.has_capacity() {
            let Some(page) = self.queue.pop_front() else {
                break;
            };
            if !self.visited.insert(page.clone()) {
                continue;
            }

            match client.fetch_html(&page).await {
                Ok(html) => self.absorb(&page, &html),
                Err(e) => {
                    tracing::warn!(url = %page, error = %e, "crawl page fetch failed");
                    self.outcome.errors += 1;
                }
            }
        }

        tracing::info!(
            pages = self.outcome.pages_fetched,
            errors = self.outcome.errors,
            profiles = self.outcome.advisor_urls.len(),
            unvisited = self.queue.len(),
            "crawl finished"
        );
        self.outcome
    }
}

/// Crawls breadth-first from `seed_url`, fetching at most `page_limit`
/// pages successfully.
///
/// Failed fetches are counted in [`CrawlOutcome::errors`] and do not count
/// toward the limit; their links are never followed.
pub async fn crawl(
    client: &PageClient,
    seed_url: &str,
    base_url: &str,
    page_limit: usize,
) -> CrawlOutcome {
    let mut frontier = Frontier::new(base_url, page_limit);
    frontier.queue.push_back(seed_url.to_owned());
    frontier.run(client).await
}

/// Like [`crawl`], but starts from an already-fetched seed page so it is not
/// requested twice. The seed counts as the first fetched page.
pub async fn crawl_from_seed(
    client: &PageClient,
    seed_url: &str,
    seed_html: &str,
    base_url: &str,
    page_limit: usize,
) -> CrawlOutcome {
    let mut frontier = Frontier::new(base_url, page_limit);
    if frontier.has_capacity() {
        frontier.visited.insert(seed_url.to_owned());
        frontier.absorb(seed_url, seed_html);
    }
    frontier.run(client).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absorb_skips_visited_pages() {
        let mut frontier = Frontier::new("https://www.nbfwm.ca", 10);
        frontier
            .visited
            .insert("https://www.nbfwm.ca/advisor/a.html".to_string());
        frontier.absorb(
            "https://www.nbfwm.ca/advisor.html",
            r#"<a href="/advisor/a.html">A</a><a href="/advisor/b.html">B</a>
               <a href="/advisor/t/our-team/x.html">X</a>"#,
        );
        assert_eq!(frontier.outcome.pages_fetched, 1);
        assert!(frontier
            .outcome
            .advisor_urls
            .contains("https://www.nbfwm.ca/advisor/t/our-team/x.html"));
        assert!(frontier
            .queue
            .contains(&"https://www.nbfwm.ca/advisor/b.html".to_string()));
        assert!(!frontier
            .queue
            .contains(&"https://www.nbfwm.ca/advisor/a.html".to_string()));
    }

    #[test]
    fn zero_limit_has_no_capacity() {
        let frontier = Frontier::new("https://www.nbfwm.ca", 0);
        assert!(!frontier.has_capacity());
    }
}

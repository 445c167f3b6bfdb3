//! The two phases of a run, wired together.
//!
//! 1. **Collection** (optional): search a source for every keyword and append
//!    normalized articles to that source's record store
//! 2. **Distances**: rebuild per-keyword documents from the stores, vectorize
//!    them, and compute the keyword distance matrix

use crate::collect::{CollectionReport, collect_articles};
use crate::config::SearchSource;
use crate::corpus::{combine_documents, load_documents, load_secondary_documents};
use crate::distance::cosine_distances;
use crate::error::Result;
use crate::models::DistanceMatrix;
use crate::outputs::records::{RecordWriter, collected_links};
use crate::scrapers::HttpGet;
use crate::vectorize::TfidfVectorizer;
use std::collections::HashSet;
use tracing::{info, instrument, warn};

/// Settings for one collection phase.
#[derive(Debug, Clone)]
pub struct CollectionSettings<'a> {
    pub source: &'a SearchSource,
    pub store_path: &'a str,
    pub max_results: usize,
    /// Truncate the store first instead of resuming.
    pub fresh: bool,
}

/// Collect articles for `keywords` into the store at `settings.store_path`.
#[instrument(level = "info", skip_all, fields(source = %settings.source.name, store = %settings.store_path))]
pub async fn run_collection<C: HttpGet>(
    client: &C,
    keywords: &[String],
    settings: &CollectionSettings<'_>,
) -> Result<CollectionReport> {
    let already_collected = if settings.fresh {
        HashSet::new()
    } else {
        collected_links(settings.store_path)?
    };
    if !already_collected.is_empty() {
        info!(stored = already_collected.len(), "Resuming; stored links will be skipped");
    }
    let mut writer = RecordWriter::open(settings.store_path, settings.fresh)?;
    collect_articles(
        client,
        settings.source,
        keywords,
        settings.max_results,
        &already_collected,
        &mut writer,
    )
    .await
}

/// Reports of the collection phases that ran to completion.
#[derive(Debug, Default)]
pub struct CollectionRun {
    pub reports: Vec<CollectionReport>,
    /// A shutdown request cut the run short; later phases were not started.
    pub interrupted: bool,
}

/// Run each collection phase in order until all finish or `shutdown` resolves.
///
/// An interrupted phase keeps the rows it already appended. Phases after it
/// are skipped, and the caller goes on to compute distances from whatever the
/// stores hold.
pub async fn collect_until_shutdown<C: HttpGet>(
    client: &C,
    keywords: &[String],
    phases: &[CollectionSettings<'_>],
    shutdown: impl Future<Output = ()>,
) -> Result<CollectionRun> {
    let mut shutdown = std::pin::pin!(shutdown);
    let mut run = CollectionRun::default();
    for settings in phases {
        info!(source = %settings.source.name, "Searching and downloading articles, press Ctrl-C to stop");
        tokio::select! {
            biased;
            _ = &mut shutdown => {
                warn!(
                    store = %settings.store_path,
                    skipped_phases = phases.len() - run.reports.len() - 1,
                    "Collection interrupted; rows written so far are kept, continuing with the distance step"
                );
                run.interrupted = true;
                return Ok(run);
            }
            report = run_collection(client, keywords, settings) => run.reports.push(report?),
        }
    }
    Ok(run)
}

/// TF-IDF cosine distances between the given per-keyword documents.
pub fn semantic_distances(
    keywords: &[String],
    documents: &[String],
    stopwords: HashSet<String>,
) -> Result<DistanceMatrix> {
    info!("Calculating semantic distance between keywords");
    let space = TfidfVectorizer::new(stopwords).fit_transform(documents)?;
    Ok(cosine_distances(&space, keywords))
}

/// Build documents from the stores and compute the distance matrix.
///
/// The primary store must be readable. The secondary store is only read when
/// `secondary_path` is given, and is skipped with a warning if unreadable.
#[instrument(level = "info", skip(keywords, stopwords))]
pub fn distances_from_stores(
    keywords: &[String],
    primary_path: &str,
    secondary_path: Option<&str>,
    stopwords: HashSet<String>,
) -> Result<DistanceMatrix> {
    let primary = load_documents(keywords, primary_path)?;
    let secondary = secondary_path.and_then(|path| load_secondary_documents(keywords, path));
    let documents = combine_documents(primary, secondary);
    semantic_distances(keywords, &documents, stopwords)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ArticleRecord;
    use crate::outputs::records::load_records;
    use crate::scrapers::stub::{StubClient, ok, status};

    const EPS: f64 = 1e-9;

    fn keywords(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    fn write_store(path: &str, rows: &[(&str, &str)]) {
        let mut writer = RecordWriter::open(path, true).unwrap();
        for (i, (keyword, content)) in rows.iter().enumerate() {
            writer
                .append(&ArticleRecord {
                    keyword: keyword.to_string(),
                    article_url: format!("https://a.test/{i}"),
                    article_content: content.to_string(),
                })
                .unwrap();
        }
    }

    fn test_source() -> SearchSource {
        SearchSource {
            search_url: "https://news.test/search".to_string(),
            ..SearchSource::bbc()
        }
    }

    #[test]
    fn test_cat_dog_distances() {
        let kws = keywords(&["cat", "dog"]);
        let docs = vec!["cat cat mouse".to_string(), "dog dog mouse".to_string()];
        let m = semantic_distances(&kws, &docs, HashSet::new()).unwrap();
        assert!(m.between("cat", "dog").unwrap() > 0.0);
        assert_eq!(m.between("cat", "cat"), Some(0.0));
        assert_eq!(m.get(0, 1), m.get(1, 0));
    }

    #[test]
    fn test_identical_documents_zero_distance() {
        let kws = keywords(&["breach", "leak"]);
        let docs = vec!["data breach exposed records".to_string(); 2];
        let m = semantic_distances(&kws, &docs, HashSet::new()).unwrap();
        assert!(m.get(0, 1).abs() < EPS);
    }

    #[test]
    fn test_distances_from_stores_with_secondary() {
        let dir = tempfile::tempdir().unwrap();
        let primary = dir.path().join("primary.csv");
        let secondary = dir.path().join("secondary.csv");
        let (primary, secondary) = (primary.to_str().unwrap(), secondary.to_str().unwrap());
        write_store(primary, &[("cat", "cat cat mouse"), ("dog", "dog dog mouse")]);
        write_store(secondary, &[("cat", "mouse"), ("dog", "cat cat mouse")]);

        let kws = keywords(&["cat", "dog"]);
        let without = distances_from_stores(&kws, primary, None, HashSet::new()).unwrap();
        let with = distances_from_stores(&kws, primary, Some(secondary), HashSet::new()).unwrap();

        assert!(with.get(0, 1) < without.get(0, 1));
    }

    #[test]
    fn test_unreadable_secondary_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let primary = dir.path().join("primary.csv");
        let primary = primary.to_str().unwrap();
        write_store(primary, &[("cat", "cat cat mouse"), ("dog", "dog dog mouse")]);

        let kws = keywords(&["cat", "dog"]);
        let expected = distances_from_stores(&kws, primary, None, HashSet::new()).unwrap();
        let fallback =
            distances_from_stores(&kws, primary, Some("/no/such/add.csv"), HashSet::new()).unwrap();
        assert_eq!(expected, fallback);
    }

    #[test]
    fn test_stopwords_change_distances() {
        let kws = keywords(&["cat", "dog"]);
        let docs = vec!["the cat".to_string(), "the dog".to_string()];
        let with_the = semantic_distances(&kws, &docs, HashSet::new()).unwrap();
        let without_the =
            semantic_distances(&kws, &docs, ["the".to_string()].into()).unwrap();
        assert!(with_the.get(0, 1) < 1.0);
        assert!((without_the.get(0, 1) - 1.0).abs() < EPS);
    }

    #[tokio::test]
    async fn test_collection_then_distances() {
        let client = StubClient::new(|url| {
            if url.contains("/search") {
                let keyword = if url.contains("q=cat") { "cat" } else { "dog" };
                ok(format!(
                    r#"<a class="PromoLink" href="/news/{keyword}-1">x</a><a class="PromoLink" href="/news/{keyword}-2">y</a>"#
                ))
            } else if url.ends_with("cat-1") {
                ok("<article>Cats chase mice.</article>")
            } else if url.ends_with("cat-2") {
                ok("<article>Cats sleep all day.</article>")
            } else {
                status(404)
            }
        });
        let dir = tempfile::tempdir().unwrap();
        let store = dir.path().join("primary.csv");
        let store = store.to_str().unwrap();
        let source = test_source();
        let settings = CollectionSettings {
            source: &source,
            store_path: store,
            max_results: 100,
            fresh: false,
        };
        let kws = keywords(&["cat", "dog"]);

        let report = run_collection(&client, &kws, &settings).await.unwrap();

        assert_eq!(report.keywords[0].records_written, 2);
        assert!(report.keywords[1].has_no_usable_articles());
        let records = load_records(store).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].article_content, "cats chase mice");

        let m = distances_from_stores(&kws, store, None, HashSet::new()).unwrap();
        assert_eq!(m.get(0, 1), 1.0);

        // A rerun resumes: nothing is fetched or written twice.
        let rerun = run_collection(&client, &kws, &settings).await.unwrap();
        assert_eq!(rerun.keywords[0].already_stored, 2);
        assert_eq!(rerun.records_written(), 0);
        assert_eq!(load_records(store).unwrap().len(), 2);
    }

    fn story_client() -> StubClient {
        StubClient::new(|url| {
            if url.contains("/search") {
                ok(r#"<a class="PromoLink" href="/news/story-1">x</a>"#)
            } else {
                ok("<article>Cats and dogs.</article>")
            }
        })
    }

    #[tokio::test]
    async fn test_all_phases_run_without_shutdown() {
        let client = story_client();
        let dir = tempfile::tempdir().unwrap();
        let (first, second) = (dir.path().join("a.csv"), dir.path().join("b.csv"));
        let source = test_source();
        let phases = [first.to_str().unwrap(), second.to_str().unwrap()].map(|store_path| {
            CollectionSettings {
                source: &source,
                store_path,
                max_results: 10,
                fresh: true,
            }
        });

        let run = collect_until_shutdown(&client, &keywords(&["cat"]), &phases, std::future::pending())
            .await
            .unwrap();

        assert!(!run.interrupted);
        assert_eq!(run.reports.len(), 2);
        assert_eq!(load_records(phases[1].store_path).unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_shutdown_skips_remaining_phases() {
        let client = story_client();
        let dir = tempfile::tempdir().unwrap();
        let (first, second) = (dir.path().join("a.csv"), dir.path().join("b.csv"));
        let source = test_source();
        let phases = [first.to_str().unwrap(), second.to_str().unwrap()].map(|store_path| {
            CollectionSettings {
                source: &source,
                store_path,
                max_results: 10,
                fresh: true,
            }
        });
        // Fires as soon as the first phase has touched the network.
        let shutdown = std::future::poll_fn(|_| {
            if client.request_count() > 0 {
                std::task::Poll::Ready(())
            } else {
                std::task::Poll::Pending
            }
        });

        let run = collect_until_shutdown(&client, &keywords(&["cat"]), &phases, shutdown)
            .await
            .unwrap();

        assert!(run.interrupted);
        assert_eq!(run.reports.len(), 1);
        assert_eq!(load_records(phases[0].store_path).unwrap().len(), 1);
        assert!(!second.exists());
    }

    #[tokio::test]
    async fn test_immediate_shutdown_starts_nothing() {
        let client = story_client();
        let dir = tempfile::tempdir().unwrap();
        let store = dir.path().join("a.csv");
        let source = test_source();
        let phases = [CollectionSettings {
            source: &source,
            store_path: store.to_str().unwrap(),
            max_results: 10,
            fresh: true,
        }];

        let run = collect_until_shutdown(&client, &keywords(&["cat"]), &phases, std::future::ready(()))
            .await
            .unwrap();

        assert!(run.interrupted);
        assert!(run.reports.is_empty());
        assert_eq!(client.request_count(), 0);
    }
}

//! Rule retriever: embeds the rule corpus once and answers top-k queries.

use coderag_types::error::{EmbedError, RetrievalError};
use coderag_types::retrieval::{
    DEFAULT_RULE_THRESHOLD, Retrieval, RuleDocument, ScoredDocument, SearchOptions,
};
use tracing::{debug, info};

use super::index::{FlatIpIndex, normalize_l2};
use crate::embedding::embedder::Embedder;

/// Rule corpus plus its in-memory index.
///
/// Generic over the embedder so tests can use a deterministic one; the CLI
/// passes a `BoxEmbedder`.
pub struct RuleRetriever<E: Embedder> {
    embedder: E,
    docs: Vec<RuleDocument>,
    index: FlatIpIndex,
}

impl<E: Embedder> RuleRetriever<E> {
    /// Embed every document and build a fresh index.
    ///
    /// The index dimension is taken from the first returned embedding, so
    /// an embedder reporting a stale `dimension()` still works.
    #[tracing::instrument(skip_all, fields(model = embedder.model_name(), docs = docs.len()))]
    pub async fn build(embedder: E, docs: Vec<RuleDocument>) -> Result<Self, RetrievalError> {
        if docs.is_empty() {
            return Err(RetrievalError::EmptyCorpus);
        }

        let texts: Vec<String> = docs.iter().map(|d| d.text.clone()).collect();
        let mut vectors = embedder.embed(&texts).await?;
        if vectors.len() != texts.len() {
            return Err(EmbedError::CountMismatch {
                sent: texts.len(),
                received: vectors.len(),
            }
            .into());
        }

        let dim = vectors.first().map(Vec::len).unwrap_or_default();
        if dim != embedder.dimension() {
            debug!(
                reported = embedder.dimension(),
                actual = dim,
                "embedder dimension differs from reported value"
            );
        }

        let mut index = FlatIpIndex::new(dim)?;
        for v in vectors.iter_mut() {
            normalize_l2(v);
        }
        index.add(&vectors)?;

        info!(total_docs = index.len(), dim, "rule index ready");
        Ok(Self {
            embedder,
            docs,
            index,
        })
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn documents(&self) -> &[RuleDocument] {
        &self.docs
    }

    pub fn embedder(&self) -> &E {
        &self.embedder
    }

    /// Top-k rules for `query`, best first, minus any below the threshold.
    pub async fn search(
        &self,
        query: &str,
        options: SearchOptions,
    ) -> Result<Retrieval, RetrievalError> {
        if options.k == 0 {
            return Ok(Retrieval::default());
        }

        let mut query_vec = self
            .embedder
            .embed(&[query.to_string()])
            .await?
            .into_iter()
            .next()
            .ok_or(EmbedError::EmptyResponse)?;
        normalize_l2(&mut query_vec);

        let hits = self.index.search(&query_vec, options.k)?;
        let scored: Vec<ScoredDocument> = hits
            .into_iter()
            .filter(|(_, score)| options.threshold.is_none_or(|t| *score >= t))
            .filter_map(|(id, score)| {
                self.docs.get(id).map(|doc| ScoredDocument {
                    id,
                    text: doc.text.clone(),
                    score,
                })
            })
            .collect();

        debug!(
            k = options.k,
            threshold = ?options.threshold,
            hits = scored.len(),
            "rule search complete"
        );
        Ok(Retrieval::from_scored(scored))
    }

    /// Texts of the rules retrieved for `query`. Without a threshold in
    /// `options`, hits below 0.7 are dropped.
    pub async fn rule_docs(
        &self,
        query: &str,
        options: SearchOptions,
    ) -> Result<Vec<String>, RetrievalError> {
        let options = SearchOptions {
            threshold: Some(options.threshold.unwrap_or(DEFAULT_RULE_THRESHOLD)),
            ..options
        };
        Ok(self.search(query, options).await?.docs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::box_embedder::test_support::KeywordEmbedder;
    use crate::retrieval::rules::default_rules;
    use coderag_types::retrieval::RuleCategory;

    fn corpus(texts: &[&str]) -> Vec<RuleDocument> {
        texts
            .iter()
            .enumerate()
            .map(|(id, t)| RuleDocument {
                id,
                category: RuleCategory::Readability,
                text: t.to_string(),
            })
            .collect()
    }

    fn embedder() -> KeywordEmbedder {
        KeywordEmbedder::new(&["loop", "global", "exception", "name"])
    }

    #[tokio::test]
    async fn test_build_rejects_empty_corpus() {
        let result = RuleRetriever::build(embedder(), Vec::new()).await;
        assert!(matches!(result, Err(RetrievalError::EmptyCorpus)));
    }

    #[tokio::test]
    async fn test_search_ranks_matching_rule_first() {
        let retriever = RuleRetriever::build(
            embedder(),
            corpus(&[
                "avoid global state",
                "hoist work out of the loop",
                "catch a specific exception",
            ]),
        )
        .await
        .unwrap();
        assert_eq!(retriever.len(), 3);

        let result = retriever
            .search("why is this loop slow", SearchOptions::top_k(2))
            .await
            .unwrap();
        assert_eq!(result.scored.len(), 2);
        assert_eq!(result.docs[0], "hoist work out of the loop");
        assert!((result.scored[0].score - 1.0).abs() < 1e-6);
        assert!(result.scored[0].score >= result.scored[1].score);
    }

    #[tokio::test]
    async fn test_threshold_drops_weak_hits() {
        let retriever = RuleRetriever::build(
            embedder(),
            corpus(&["global loop", "exception name", "global"]),
        )
        .await
        .unwrap();

        let all = retriever
            .search("global", SearchOptions::top_k(15))
            .await
            .unwrap();
        assert_eq!(all.scored.len(), 3);

        let filtered = retriever
            .search("global", SearchOptions::top_k(15).with_threshold(0.7))
            .await
            .unwrap();
        let ids: Vec<usize> = filtered.scored.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![2, 0]);
    }

    #[tokio::test]
    async fn test_zero_k_returns_nothing() {
        let retriever = RuleRetriever::build(embedder(), corpus(&["loop"]))
            .await
            .unwrap();
        let result = retriever.search("loop", SearchOptions::top_k(0)).await.unwrap();
        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn test_rule_docs_over_default_corpus() {
        let retriever = RuleRetriever::build(embedder(), default_rules())
            .await
            .unwrap();
        assert_eq!(retriever.len(), 19);

        let docs = retriever
            .rule_docs("exception exception", SearchOptions::default())
            .await
            .unwrap();
        assert!(!docs.is_empty());
        assert!(docs[0].contains("exception"));
    }

    #[tokio::test]
    async fn test_rule_docs_honours_k_and_threshold() {
        let retriever = RuleRetriever::build(
            embedder(),
            corpus(&["global", "global loop", "global name", "exception"]),
        )
        .await
        .unwrap();

        let one = retriever
            .rule_docs("global", SearchOptions::top_k(1))
            .await
            .unwrap();
        assert_eq!(one, vec!["global"]);

        // Default floor of 0.7 keeps the two-keyword rules (cosine ~0.707).
        let floor = retriever
            .rule_docs("global", SearchOptions::top_k(15))
            .await
            .unwrap();
        assert_eq!(floor.len(), 3);

        let strict = retriever
            .rule_docs("global", SearchOptions::top_k(15).with_threshold(0.9))
            .await
            .unwrap();
        assert_eq!(strict, vec!["global"]);
    }
}

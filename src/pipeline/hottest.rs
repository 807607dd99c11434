// The hottest-topic engine: one pure pass over an article batch.
//
//   ArticleBatch -> TF-IDF rows -> DBSCAN labels -> dominant cluster
//                -> star ratings for the dominant cluster's members
//
// Nothing is kept between calls. Degenerate batches come back as
// `HottestTopic::Absent` with a reason; only classifier and configuration
// failures are errors.

use serde::Serialize;
use tracing::{debug, info};

use crate::articles::{ArticleBatch, ArticleRecord};
use crate::error::{EngineError, EngineResult};
use crate::sentiment::labels::StarRating;
use crate::sentiment::scorer::{score_texts, DEFAULT_MAX_CHARS};
use crate::sentiment::traits::SentimentClassifier;
use crate::topics::cluster::{dbscan, ClusterLabel, DbscanParams};
use crate::topics::dominant::{cluster_sizes, select_dominant};
use crate::topics::tfidf::TfIdfVectorizer;

/// Every tunable of the engine.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EngineParams {
    pub vectorizer: TfIdfVectorizer,
    pub clustering: DbscanParams,
    /// Characters of each summary passed to the sentiment classifier.
    pub sentiment_max_chars: usize,
}

impl Default for EngineParams {
    fn default() -> Self {
        Self {
            vectorizer: TfIdfVectorizer::default(),
            clustering: DbscanParams::default(),
            sentiment_max_chars: DEFAULT_MAX_CHARS,
        }
    }
}

impl EngineParams {
    pub fn validate(&self) -> EngineResult<()> {
        self.vectorizer.validate()?;
        self.clustering.validate()?;
        if self.sentiment_max_chars < 1 {
            return Err(EngineError::InvalidParameter(
                "sentiment truncation length must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Cluster label of one article.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Assignment {
    pub title: String,
    pub label: ClusterLabel,
}

/// A dominant-topic member with its sentiment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredArticle {
    #[serde(flatten)]
    pub article: ArticleRecord,
    pub stars: StarRating,
}

/// The largest topic cluster of the batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DominantTopic {
    pub label: ClusterLabel,
    /// Members in batch order.
    pub members: Vec<ScoredArticle>,
}

impl DominantTopic {
    /// Mean star rating across members.
    pub fn mean_stars(&self) -> f64 {
        if self.members.is_empty() {
            return 0.0;
        }
        let total: u32 = self.members.iter().map(|m| u32::from(m.stars.value())).sum();
        f64::from(total) / self.members.len() as f64
    }
}

/// Why no hottest topic was reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoTrendReason {
    /// The batch had no articles.
    EmptyBatch,
    /// No term survived vocabulary pruning, so every article is noise.
    VocabularyCollapse,
    /// Fewer than two topic clusters formed.
    TooFewClusters,
}

impl NoTrendReason {
    pub fn describe(&self) -> &'static str {
        match self {
            NoTrendReason::EmptyBatch => "no articles were collected",
            NoTrendReason::VocabularyCollapse => "the summaries share no usable terms",
            NoTrendReason::TooFewClusters => "fewer than two distinct topics formed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum HottestTopic {
    Found(DominantTopic),
    Absent { reason: NoTrendReason },
}

impl HottestTopic {
    pub fn dominant(&self) -> Option<&DominantTopic> {
        match self {
            HottestTopic::Found(topic) => Some(topic),
            HottestTopic::Absent { .. } => None,
        }
    }
}

/// Full result of one engine run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopicReport {
    /// One entry per article, in batch order.
    pub assignments: Vec<Assignment>,
    pub vocabulary_size: usize,
    pub hottest: HottestTopic,
}

impl TopicReport {
    pub fn label_of(&self, title: &str) -> Option<ClusterLabel> {
        self.assignments
            .iter()
            .find(|a| a.title == title)
            .map(|a| a.label)
    }

    pub fn cluster_count(&self) -> usize {
        let labels: Vec<ClusterLabel> = self.assignments.iter().map(|a| a.label).collect();
        cluster_sizes(&labels).len()
    }

    pub fn noise_count(&self) -> usize {
        self.assignments.iter().filter(|a| a.label.is_noise()).count()
    }
}

/// Cluster the batch, pick the hottest topic, and rate its members.
///
/// The classifier is only called when a dominant topic exists.
pub fn find_hottest_topic(
    batch: &ArticleBatch,
    params: &EngineParams,
    classifier: &dyn SentimentClassifier,
) -> EngineResult<TopicReport> {
    params.validate()?;

    if batch.is_empty() {
        info!("Empty batch, no hottest topic");
        return Ok(TopicReport {
            assignments: Vec::new(),
            vocabulary_size: 0,
            hottest: HottestTopic::Absent {
                reason: NoTrendReason::EmptyBatch,
            },
        });
    }

    let matrix = params.vectorizer.fit_transform(&batch.summaries())?;
    let labels = if matrix.is_collapsed() {
        vec![ClusterLabel::Noise; batch.len()]
    } else {
        dbscan(&matrix.rows, &params.clustering)?
    };

    let assignments: Vec<Assignment> = batch
        .iter()
        .zip(&labels)
        .map(|(record, label)| Assignment {
            title: record.title.clone(),
            label: *label,
        })
        .collect();

    let sizes = cluster_sizes(&labels);
    info!(
        articles = batch.len(),
        vocabulary = matrix.dimension(),
        clusters = sizes.len(),
        noise = labels.iter().filter(|l| l.is_noise()).count(),
        "Clustered articles"
    );

    let no_trend = |reason: NoTrendReason| -> EngineResult<TopicReport> {
        info!(reason = reason.describe(), "No hottest topic");
        Ok(TopicReport {
            assignments: assignments.clone(),
            vocabulary_size: matrix.dimension(),
            hottest: HottestTopic::Absent { reason },
        })
    };

    if matrix.is_collapsed() {
        return no_trend(NoTrendReason::VocabularyCollapse);
    }

    let Some(dominant) = select_dominant(&labels) else {
        return no_trend(NoTrendReason::TooFewClusters);
    };

    let members: Vec<&ArticleRecord> = dominant
        .member_indices
        .iter()
        .map(|&i| &batch.records()[i])
        .collect();

    info!(
        label = %dominant.label,
        members = members.len(),
        "Selected hottest topic"
    );

    let texts: Vec<&str> = members.iter().map(|r| r.summary.as_str()).collect();
    let ratings = score_texts(classifier, &texts, params.sentiment_max_chars)?;

    let members: Vec<ScoredArticle> = members
        .into_iter()
        .zip(ratings)
        .map(|(record, stars)| {
            debug!(title = %record.title, stars = stars.value(), "Rated article");
            ScoredArticle {
                article: record.clone(),
                stars,
            }
        })
        .collect();

    Ok(TopicReport {
        assignments,
        vocabulary_size: matrix.dimension(),
        hottest: HottestTopic::Found(DominantTopic {
            label: dominant.label,
            members,
        }),
    })
}

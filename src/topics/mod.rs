// Topic detection: TF-IDF vectors, DBSCAN clusters, dominant-cluster choice.

pub mod cluster;
pub mod dominant;
pub mod tfidf;

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Topic summary from the tag listing endpoint. Unknown fields are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct TopicSummary {
    pub id: u64,
    pub title: String,
    /// Last activity time — topics not bumped since the previous successful
    /// fetch are skipped.
    pub bumped_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct TopicList {
    pub topics: Vec<TopicSummary>,
}

/// Response of `GET /tag/{tag}.json`.
#[derive(Debug, Deserialize)]
pub struct TagResponse {
    pub topic_list: TopicList,
}

/// Response of `GET /t/{id}.json` — only the first post's cooked HTML is
/// of interest.
#[derive(Debug, Deserialize)]
pub(crate) struct TopicResponse {
    pub post_stream: PostStream,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PostStream {
    pub posts: Vec<Post>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Post {
    #[serde(default)]
    pub cooked: String,
}

/// An original-size image discovered in topic HTML.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RemoteImage {
    pub url: String,
    /// 40-hex content hash taken from the upload URL basename; the dedup
    /// key across fetch passes.
    pub hash: String,
}

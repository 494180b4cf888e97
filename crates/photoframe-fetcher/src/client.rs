//! Discourse API client — the two endpoints the fetch job needs, plus raw
//! image downloads.

use std::time::Duration;

use crate::error::Result;
use crate::types::{TagResponse, TopicResponse, TopicSummary};

const USER_AGENT: &str = "photoframe";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub struct DiscourseClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    api_username: String,
}

impl DiscourseClient {
    pub fn new(base_url: &str, api_key: &str, api_username: &str) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            api_username: api_username.to_string(),
        })
    }

    fn get(&self, url: String) -> reqwest::RequestBuilder {
        self.http
            .get(url)
            .header("Api-Key", &self.api_key)
            .header("Api-Username", &self.api_username)
    }

    /// Topics currently carrying `tag`, in the order the API returns them.
    pub async fn tagged_topics(&self, tag: &str) -> Result<Vec<TopicSummary>> {
        let response: TagResponse = self
            .get(format!("{}/tag/{tag}.json", self.base_url))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(response.topic_list.topics)
    }

    /// Cooked HTML of a topic's first post. Topics with no posts yield an
    /// empty string.
    pub async fn topic_html(&self, topic_id: u64) -> Result<String> {
        let response: TopicResponse = self
            .get(format!("{}/t/{topic_id}.json", self.base_url))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(response
            .post_stream
            .posts
            .into_iter()
            .next()
            .map(|post| post.cooked)
            .unwrap_or_default())
    }

    /// Raw bytes of an image upload. `url` is absolute — upload URLs point
    /// at the CDN, not necessarily at `base_url`.
    pub async fn download(&self, url: &str) -> Result<Vec<u8>> {
        let bytes = self
            .get(url.to_string())
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_trimmed_from_base_url() {
        let client = DiscourseClient::new("https://forum.example.com/", "k", "u").unwrap();
        assert_eq!(client.base_url, "https://forum.example.com");
    }
}

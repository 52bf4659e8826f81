//! Hosting platform client.
//!
//! `Platform` is everything a validation run needs from the code host.
//! `GitHub` implements it over the REST API with a blocking `reqwest`
//! client; pagination is drained inside `list_commits`/`list_comments` so
//! callers always see the complete, ordered sequence.

use crate::models::github::{Comment, CommitStatus, PrCommit, PullRequest, RepoRef, User};
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::{ACCEPT, USER_AGENT};
use serde::de::DeserializeOwned;
use serde_json::json;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

const PER_PAGE: usize = 100;

#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{method} {url} returned {status}: {body}")]
    Status {
        method: &'static str,
        url: String,
        status: u16,
        body: String,
    },
    #[error("cannot decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

/// Operations the pipeline performs against the code host.
pub trait Platform {
    fn get_pull_request(&self, repo: &RepoRef, number: u64) -> Result<PullRequest, PlatformError>;
    /// All commits of the pull request, every page, in listing order.
    fn list_commits(&self, repo: &RepoRef, number: u64) -> Result<Vec<PrCommit>, PlatformError>;
    fn create_status(
        &self,
        repo: &RepoRef,
        sha: &str,
        status: &CommitStatus,
    ) -> Result<(), PlatformError>;
    fn list_comments(&self, repo: &RepoRef, number: u64) -> Result<Vec<Comment>, PlatformError>;
    fn create_comment(&self, repo: &RepoRef, number: u64, body: &str) -> Result<(), PlatformError>;
    fn edit_comment(&self, repo: &RepoRef, id: u64, body: &str) -> Result<(), PlatformError>;
    fn delete_comment(&self, repo: &RepoRef, id: u64) -> Result<(), PlatformError>;
    /// Login the bot posts comments as.
    fn bot_login(&self) -> Result<String, PlatformError>;
}

/// GitHub REST v3 client.
pub struct GitHub {
    client: Client,
    api_url: String,
    token: String,
    login: Option<String>,
}

impl GitHub {
    pub fn new(
        api_url: &str,
        token: String,
        login: Option<String>,
        timeout: Duration,
    ) -> Result<Self, PlatformError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|source| PlatformError::Http {
                url: api_url.to_string(),
                source,
            })?;
        Ok(GitHub {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
            token,
            login,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_url, path)
    }

    fn authed(&self, rb: RequestBuilder) -> RequestBuilder {
        rb.bearer_auth(&self.token)
            .header(ACCEPT, "application/vnd.github+json")
            .header(USER_AGENT, concat!("commitlint-bot/", env!("CARGO_PKG_VERSION")))
    }

    fn send(&self, method: &'static str, url: &str, rb: RequestBuilder) -> Result<Response, PlatformError> {
        debug!(method, url, "github request");
        let resp = self.authed(rb).send().map_err(|source| PlatformError::Http {
            url: url.to_string(),
            source,
        })?;
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let body = resp.text().unwrap_or_default();
        Err(PlatformError::Status {
            method,
            url: url.to_string(),
            status: status.as_u16(),
            body,
        })
    }

    fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, PlatformError> {
        self.send("GET", url, self.client.get(url))?
            .json::<T>()
            .map_err(|source| PlatformError::Decode {
                url: url.to_string(),
                source,
            })
    }

    /// Fetch `page=1..` until a short page comes back.
    fn get_all_pages<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>, PlatformError> {
        let mut out = Vec::new();
        let mut page = 1usize;
        loop {
            let url = self.url(&format!("{}?per_page={}&page={}", path, PER_PAGE, page));
            let items: Vec<T> = self.get_json(&url)?;
            let n = items.len();
            out.extend(items);
            if n < PER_PAGE {
                return Ok(out);
            }
            page += 1;
        }
    }
}

impl Platform for GitHub {
    fn get_pull_request(&self, repo: &RepoRef, number: u64) -> Result<PullRequest, PlatformError> {
        self.get_json(&self.url(&format!("/repos/{}/pulls/{}", repo, number)))
    }

    fn list_commits(&self, repo: &RepoRef, number: u64) -> Result<Vec<PrCommit>, PlatformError> {
        self.get_all_pages(&format!("/repos/{}/pulls/{}/commits", repo, number))
    }

    fn create_status(
        &self,
        repo: &RepoRef,
        sha: &str,
        status: &CommitStatus,
    ) -> Result<(), PlatformError> {
        let url = self.url(&format!("/repos/{}/statuses/{}", repo, sha));
        self.send("POST", &url, self.client.post(&url).json(status))?;
        Ok(())
    }

    fn list_comments(&self, repo: &RepoRef, number: u64) -> Result<Vec<Comment>, PlatformError> {
        self.get_all_pages(&format!("/repos/{}/issues/{}/comments", repo, number))
    }

    fn create_comment(&self, repo: &RepoRef, number: u64, body: &str) -> Result<(), PlatformError> {
        let url = self.url(&format!("/repos/{}/issues/{}/comments", repo, number));
        self.send("POST", &url, self.client.post(&url).json(&json!({ "body": body })))?;
        Ok(())
    }

    fn edit_comment(&self, repo: &RepoRef, id: u64, body: &str) -> Result<(), PlatformError> {
        let url = self.url(&format!("/repos/{}/issues/comments/{}", repo, id));
        self.send("PATCH", &url, self.client.patch(&url).json(&json!({ "body": body })))?;
        Ok(())
    }

    fn delete_comment(&self, repo: &RepoRef, id: u64) -> Result<(), PlatformError> {
        let url = self.url(&format!("/repos/{}/issues/comments/{}", repo, id));
        self.send("DELETE", &url, self.client.delete(&url))?;
        Ok(())
    }

    fn bot_login(&self) -> Result<String, PlatformError> {
        if let Some(login) = &self.login {
            return Ok(login.clone());
        }
        let user: User = self.get_json(&self.url("/user"))?;
        Ok(user.login)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::github::StatusState;
    use serde_json::Value as Json;
    use tokio::runtime::Runtime;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    /// Mock server driven from a runtime the blocking client never enters.
    fn server() -> (Runtime, MockServer) {
        let rt = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()
            .unwrap();
        let server = rt.block_on(MockServer::start());
        (rt, server)
    }

    fn client(server: &MockServer, login: Option<&str>) -> GitHub {
        GitHub::new(
            &format!("{}/", server.uri()),
            "t0ken".into(),
            login.map(str::to_string),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    fn repo() -> RepoRef {
        RepoRef {
            owner: "acme".into(),
            name: "shop".into(),
        }
    }

    fn commits_json(range: std::ops::Range<usize>) -> Json {
        Json::Array(
            range
                .map(|i| json!({ "sha": format!("{:03}", i), "commit": { "message": format!("fix: {}", i) } }))
                .collect(),
        )
    }

    fn mount_page(rt: &Runtime, server: &MockServer, page: &str, body: Json) {
        rt.block_on(
            Mock::given(method("GET"))
                .and(path("/repos/acme/shop/pulls/7/commits"))
                .and(query_param("per_page", "100"))
                .and(query_param("page", page))
                .respond_with(ResponseTemplate::new(200).set_body_json(body))
                .mount(server),
        );
    }

    fn received(rt: &Runtime, server: &MockServer) -> Vec<wiremock::Request> {
        rt.block_on(server.received_requests()).unwrap_or_default()
    }

    #[test]
    fn test_list_commits_stops_on_short_page() {
        let (rt, server) = server();
        mount_page(&rt, &server, "1", commits_json(0..100));
        mount_page(&rt, &server, "2", commits_json(100..130));
        let commits = client(&server, None).list_commits(&repo(), 7).unwrap();
        assert_eq!(commits.len(), 130);
        let shas: Vec<_> = commits.iter().map(|c| c.sha.clone()).collect();
        let expected: Vec<_> = (0..130).map(|i| format!("{:03}", i)).collect();
        assert_eq!(shas, expected);
        assert_eq!(received(&rt, &server).len(), 2);
    }

    #[test]
    fn test_full_last_page_requests_one_more() {
        let (rt, server) = server();
        mount_page(&rt, &server, "1", commits_json(0..100));
        mount_page(&rt, &server, "2", json!([]));
        let commits = client(&server, None).list_commits(&repo(), 7).unwrap();
        assert_eq!(commits.len(), 100);
        let reqs = received(&rt, &server);
        assert_eq!(reqs.len(), 2);
        assert_eq!(reqs[1].url.query(), Some("per_page=100&page=2"));
    }

    #[test]
    fn test_error_status_maps_to_status_error() {
        let (rt, server) = server();
        rt.block_on(
            Mock::given(method("GET"))
                .and(path("/repos/acme/shop/pulls/7/commits"))
                .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
                .mount(&server),
        );
        let err = client(&server, None).list_commits(&repo(), 7).unwrap_err();
        match err {
            PlatformError::Status {
                method,
                status,
                body,
                ..
            } => {
                assert_eq!(method, "GET");
                assert_eq!(status, 502);
                assert_eq!(body, "bad gateway");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_create_status_sends_auth_and_payload() {
        let (rt, server) = server();
        rt.block_on(
            Mock::given(method("POST"))
                .and(path("/repos/acme/shop/statuses/headsha"))
                .and(header("authorization", "Bearer t0ken"))
                .and(body_json(json!({
                    "state": "pending",
                    "description": "Waiting for the status to be reported",
                    "context": "commitlint"
                })))
                .respond_with(ResponseTemplate::new(201))
                .mount(&server),
        );
        let status = CommitStatus {
            state: StatusState::Pending,
            description: "Waiting for the status to be reported".into(),
            context: "commitlint".into(),
        };
        client(&server, None)
            .create_status(&repo(), "headsha", &status)
            .unwrap();
        assert_eq!(received(&rt, &server).len(), 1);
    }

    #[test]
    fn test_comment_writes_use_issue_endpoints() {
        let (rt, server) = server();
        rt.block_on(async {
            Mock::given(method("POST"))
                .and(path("/repos/acme/shop/issues/7/comments"))
                .and(body_json(json!({ "body": "new" })))
                .respond_with(ResponseTemplate::new(201))
                .mount(&server)
                .await;
            Mock::given(method("PATCH"))
                .and(path("/repos/acme/shop/issues/comments/55"))
                .and(body_json(json!({ "body": "edited" })))
                .respond_with(ResponseTemplate::new(200))
                .mount(&server)
                .await;
            Mock::given(method("DELETE"))
                .and(path("/repos/acme/shop/issues/comments/55"))
                .respond_with(ResponseTemplate::new(204))
                .mount(&server)
                .await;
        });
        let gh = client(&server, None);
        gh.create_comment(&repo(), 7, "new").unwrap();
        gh.edit_comment(&repo(), 55, "edited").unwrap();
        gh.delete_comment(&repo(), 55).unwrap();
        let methods: Vec<_> = received(&rt, &server)
            .iter()
            .map(|r| r.method.to_string())
            .collect();
        assert_eq!(methods, vec!["POST", "PATCH", "DELETE"]);
    }

    #[test]
    fn test_bot_login_prefers_configured_value() {
        let (rt, server) = server();
        rt.block_on(
            Mock::given(method("GET"))
                .and(path("/user"))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "login": "lint-bot" })))
                .mount(&server),
        );
        assert_eq!(client(&server, Some("fixed")).bot_login().unwrap(), "fixed");
        assert!(received(&rt, &server).is_empty());
        assert_eq!(client(&server, None).bot_login().unwrap(), "lint-bot");
    }
}

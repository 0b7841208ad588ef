mod paging;
mod payload;

use async_trait::async_trait;
use base64::prelude::{BASE64_STANDARD, Engine as _};
use reqwest::{
    Client, RequestBuilder, Response,
    header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
};
use serde::de::DeserializeOwned;

use crate::domain::board::{Board, Sprint, SprintState};
use crate::domain::issue::Issue;
use crate::domain::project::{IssueType, IssueTypeScope, Project};
use crate::domain::ticket::{NewIssue, Ticket};
use crate::domain::user::User;
use crate::error::{AppError, AppResult};
use crate::services::IssueTrackerService;

use self::paging::{collect_pages, collect_until_last};
use self::payload::{
    IssueTypeEnvelope, JiraAssigneeRequest, JiraBoard, JiraCreateIssueRequest,
    JiraCreateIssueResponse, JiraProjectPage, JiraSearchResponse, JiraSprint, JiraUser, JiraValues,
};

const SERVICE: &str = "Jira";
const SEARCH_FIELDS: &str = "summary,status,assignee,issuetype,priority,project,created,updated";
const PROJECT_PAGE_SIZE: usize = 100;
const USER_PAGE_SIZE: usize = 1000;
const AGILE_PAGE_SIZE: usize = 50;

pub const DEFAULT_SEARCH_LIMIT: usize = 50;

pub struct JiraClient {
    http: Client,
    domain: Option<String>,
    email: Option<String>,
    token: Option<String>,
}

impl JiraClient {
    pub fn new(domain: Option<String>, email: Option<String>, token: Option<String>) -> Self {
        Self {
            http: Client::new(),
            domain,
            email,
            token,
        }
    }

    fn base_url(&self) -> AppResult<String> {
        let domain = self
            .domain
            .as_deref()
            .filter(|domain| !domain.trim().is_empty())
            .ok_or_else(|| AppError::Configuration("Jira domain not configured".to_string()))?;
        Ok(normalize_base_url(domain))
    }

    fn api_details(&self) -> AppResult<(String, &str, &str)> {
        let base_url = self.base_url()?;
        let email = self
            .email
            .as_deref()
            .ok_or_else(|| AppError::Configuration("Jira email not configured".to_string()))?;
        let token = self
            .token
            .as_deref()
            .ok_or_else(|| AppError::Configuration("Jira API token not configured".to_string()))?;
        Ok((base_url, email, token))
    }

    fn auth_header(email: &str, token: &str) -> String {
        let credentials = format!("{email}:{token}");
        let encoded = BASE64_STANDARD.encode(credentials);
        format!("Basic {encoded}")
    }

    fn request(&self, method: reqwest::Method, path: &str) -> AppResult<RequestBuilder> {
        let (base_url, email, token) = self.api_details()?;
        tracing::debug!(method = method.as_str(), path, "calling Jira");
        Ok(self
            .http
            .request(method, format!("{base_url}{path}"))
            .header(AUTHORIZATION, Self::auth_header(email, token))
            .header(ACCEPT, "application/json"))
    }

    async fn send(request: RequestBuilder) -> AppResult<Response> {
        let response = request
            .send()
            .await
            .map_err(|err| AppError::Transport(format!("failed to call Jira: {err}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unable to read response>".to_string());
            return Err(AppError::Status {
                service: SERVICE,
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    async fn read_json<T: DeserializeOwned>(response: Response) -> AppResult<T> {
        let body = response
            .text()
            .await
            .map_err(|err| AppError::Transport(format!("failed to read Jira response: {err}")))?;
        serde_json::from_str(&body).map_err(|err| {
            AppError::MalformedResponse(format!("failed to parse Jira response: {err}"))
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> AppResult<T> {
        let request = self.request(reqwest::Method::GET, path)?.query(query);
        let response = Self::send(request).await?;
        Self::read_json(response).await
    }

    async fn fetch_project_page(&self, start_at: usize) -> AppResult<(Vec<Project>, bool)> {
        let page: JiraProjectPage = self
            .get_json(
                "/rest/api/3/project/search",
                &[
                    ("startAt", start_at.to_string()),
                    ("maxResults", PROJECT_PAGE_SIZE.to_string()),
                    ("orderBy", "name".to_string()),
                ],
            )
            .await?;
        let projects = page.values.into_iter().map(Project::from).collect();
        Ok((projects, page.is_last))
    }

    async fn fetch_assignable_page(&self, project_key: &str, start_at: usize) -> AppResult<Vec<User>> {
        let page: Vec<JiraUser> = self
            .get_json(
                "/rest/api/3/user/assignable/search",
                &[
                    ("project", project_key.to_string()),
                    ("startAt", start_at.to_string()),
                    ("maxResults", USER_PAGE_SIZE.to_string()),
                ],
            )
            .await?;
        Ok(page.into_iter().map(User::from).collect())
    }

    async fn fetch_user_page(&self, start_at: usize) -> AppResult<Vec<User>> {
        let page: Vec<JiraUser> = self
            .get_json(
                "/rest/api/3/users/search",
                &[
                    ("startAt", start_at.to_string()),
                    ("maxResults", USER_PAGE_SIZE.to_string()),
                ],
            )
            .await?;
        Ok(page.into_iter().map(User::from).collect())
    }
}

/// Turns a configured domain into a base URL: surrounding whitespace and
/// trailing slashes are dropped and `https://` is added when no scheme is
/// present.
pub fn normalize_base_url(domain: &str) -> String {
    let trimmed = domain.trim().trim_end_matches('/');
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    }
}

pub fn browse_url(base_url: &str, issue_key: &str) -> String {
    format!("{base_url}/browse/{issue_key}")
}

pub fn project_url(base_url: &str, project_key: &str, project_type: Option<&str>) -> String {
    match project_type {
        Some("software") => format!("{base_url}/jira/software/projects/{project_key}"),
        Some("business") => format!("{base_url}/jira/core/projects/{project_key}"),
        Some("service_desk") => format!("{base_url}/jira/servicedesk/projects/{project_key}"),
        _ => browse_url(base_url, project_key),
    }
}

#[async_trait]
impl IssueTrackerService for JiraClient {
    async fn search_issues(&self, jql: &str, limit: usize) -> AppResult<Vec<Issue>> {
        let response: JiraSearchResponse = self
            .get_json(
                "/rest/api/3/search/jql",
                &[
                    ("jql", jql.to_string()),
                    ("maxResults", limit.to_string()),
                    ("fields", SEARCH_FIELDS.to_string()),
                ],
            )
            .await?;
        Ok(response
            .issues
            .into_iter()
            .take(limit)
            .map(Issue::from)
            .collect())
    }

    async fn list_projects(&self) -> AppResult<Vec<Project>> {
        collect_until_last(|start_at| self.fetch_project_page(start_at)).await
    }

    async fn list_issue_types(&self, scope: &IssueTypeScope) -> AppResult<Vec<IssueType>> {
        let path = match scope {
            IssueTypeScope::ProjectId(id) => format!("/rest/api/3/project/{id}/statuses"),
            IssueTypeScope::ProjectKey(key) => {
                format!("/rest/api/3/issue/createmeta/{key}/issuetypes")
            }
        };
        let envelope: IssueTypeEnvelope = self.get_json(&path, &[]).await?;
        Ok(envelope.into_issue_types())
    }

    async fn create_issue(&self, issue: &NewIssue) -> AppResult<Ticket> {
        let request = self
            .request(reqwest::Method::POST, "/rest/api/3/issue")?
            .header(CONTENT_TYPE, "application/json")
            .json(&JiraCreateIssueRequest::new(issue));
        let response = Self::send(request).await?;
        let payload: JiraCreateIssueResponse = Self::read_json(response).await?;

        let url = browse_url(&self.base_url()?, &payload.key);
        Ok(Ticket {
            key: payload.key,
            url: Some(url),
        })
    }

    async fn list_assignable_users(&self, project_key: &str) -> AppResult<Vec<User>> {
        collect_pages(USER_PAGE_SIZE, |start_at| {
            self.fetch_assignable_page(project_key, start_at)
        })
        .await
    }

    async fn list_users(&self) -> AppResult<Vec<User>> {
        collect_pages(USER_PAGE_SIZE, |start_at| self.fetch_user_page(start_at)).await
    }

    async fn current_user(&self) -> AppResult<User> {
        let user: JiraUser = self.get_json("/rest/api/3/myself", &[]).await?;
        Ok(User::from(user))
    }

    async fn set_assignee(&self, issue_key: &str, account_id: Option<&str>) -> AppResult<()> {
        let request = self
            .request(
                reqwest::Method::PUT,
                &format!("/rest/api/3/issue/{issue_key}/assignee"),
            )?
            .header(CONTENT_TYPE, "application/json")
            .json(&JiraAssigneeRequest { account_id });
        Self::send(request).await?;
        Ok(())
    }

    async fn list_boards(&self, project_key: &str) -> AppResult<Vec<Board>> {
        let page: JiraValues<JiraBoard> = self
            .get_json(
                "/rest/agile/1.0/board",
                &[
                    ("projectKeyOrId", project_key.to_string()),
                    ("maxResults", AGILE_PAGE_SIZE.to_string()),
                ],
            )
            .await?;
        Ok(page.values.into_iter().map(Board::from).collect())
    }

    async fn list_sprints(&self, board_id: u64, states: &[SprintState]) -> AppResult<Vec<Sprint>> {
        let states = states
            .iter()
            .map(SprintState::as_str)
            .collect::<Vec<_>>()
            .join(",");
        let page: JiraValues<JiraSprint> = self
            .get_json(
                &format!("/rest/agile/1.0/board/{board_id}/sprint"),
                &[
                    ("state", states),
                    ("maxResults", AGILE_PAGE_SIZE.to_string()),
                ],
            )
            .await?;
        Ok(page.values.into_iter().map(Sprint::from).collect())
    }

    fn issue_url(&self, issue_key: &str) -> AppResult<String> {
        Ok(browse_url(&self.base_url()?, issue_key))
    }

    fn project_url(&self, project_key: &str, project_type: Option<&str>) -> AppResult<String> {
        Ok(project_url(&self.base_url()?, project_key, project_type))
    }
}

#[cfg(test)]
mod tests {
    use std::io::{Read, Write};
    use std::net::{SocketAddr, TcpListener, TcpStream};
    use std::thread::{self, JoinHandle};

    use super::*;

    const AUTH: &str = "Basic bWVAZXhhbXBsZS5jb206c2VjcmV0";

    /// Answers one connection per canned response and returns the request
    /// heads it received.
    fn serve(responses: Vec<(u16, &'static str)>) -> (JiraClient, JoinHandle<Vec<String>>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let address = listener.local_addr().unwrap();
        let handle = thread::spawn(move || {
            let mut heads = Vec::new();
            for (status, body) in responses {
                let (mut stream, _) = listener.accept().unwrap();
                heads.push(read_head(&mut stream));
                let response = format!(
                    "HTTP/1.1 {status} Canned\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                );
                stream.write_all(response.as_bytes()).unwrap();
            }
            heads
        });
        (local_client(address), handle)
    }

    fn local_client(address: SocketAddr) -> JiraClient {
        JiraClient {
            http: Client::builder().no_proxy().build().unwrap(),
            domain: Some(format!("http://{address}")),
            email: Some("me@example.com".to_string()),
            token: Some("secret".to_string()),
        }
    }

    fn read_head(stream: &mut TcpStream) -> String {
        let mut head = Vec::new();
        let mut chunk = [0u8; 1024];
        while !head.windows(4).any(|window| window == b"\r\n\r\n") {
            let read = stream.read(&mut chunk).unwrap();
            if read == 0 {
                break;
            }
            head.extend_from_slice(&chunk[..read]);
        }
        String::from_utf8_lossy(&head).into_owned()
    }

    fn request_line(head: &str) -> &str {
        head.lines().next().unwrap_or_default()
    }

    fn header<'a>(head: &'a str, name: &str) -> Option<&'a str> {
        head.lines()
            .skip(1)
            .filter_map(|line| line.split_once(':'))
            .find(|(key, _)| key.trim().eq_ignore_ascii_case(name))
            .map(|(_, value)| value.trim())
    }

    #[test]
    fn normalizes_domain_without_scheme() {
        assert_eq!(
            normalize_base_url("team.atlassian.net/"),
            "https://team.atlassian.net"
        );
    }

    #[test]
    fn keeps_existing_scheme_and_strips_slashes() {
        assert_eq!(
            normalize_base_url("http://jira.local:8080///"),
            "http://jira.local:8080"
        );
        assert_eq!(
            normalize_base_url(" https://team.atlassian.net "),
            "https://team.atlassian.net"
        );
    }

    #[test]
    fn builds_urls_from_configured_domain() {
        let client = JiraClient::new(Some("team.atlassian.net/".to_string()), None, None);
        assert_eq!(
            client.issue_url("ENG-12").unwrap(),
            "https://team.atlassian.net/browse/ENG-12"
        );
        assert_eq!(
            client.project_url("ENG", Some("software")).unwrap(),
            "https://team.atlassian.net/jira/software/projects/ENG"
        );
        assert_eq!(
            client.project_url("HR", Some("business")).unwrap(),
            "https://team.atlassian.net/jira/core/projects/HR"
        );
        assert_eq!(
            client.project_url("HELP", Some("service_desk")).unwrap(),
            "https://team.atlassian.net/jira/servicedesk/projects/HELP"
        );
        assert_eq!(
            client.project_url("OLD", None).unwrap(),
            "https://team.atlassian.net/browse/OLD"
        );
    }

    #[test]
    fn encodes_basic_auth_credentials() {
        assert_eq!(
            JiraClient::auth_header("me@example.com", "secret"),
            "Basic bWVAZXhhbXBsZS5jb206c2VjcmV0"
        );
    }

    #[test]
    fn missing_domain_is_a_configuration_error() {
        let client = JiraClient::new(None, Some("me@example.com".to_string()), None);
        assert!(matches!(
            client.issue_url("ENG-1"),
            Err(AppError::Configuration(_))
        ));
    }

    #[tokio::test]
    async fn missing_credentials_fail_before_any_request() {
        let client = JiraClient::new(Some("team.atlassian.net".to_string()), None, None);
        let result = client.current_user().await;
        assert!(matches!(result, Err(AppError::Configuration(_))));
    }

    #[tokio::test]
    async fn project_search_follows_is_last() {
        let (client, server) = serve(vec![
            (
                200,
                r#"{"values":[{"id":"1","key":"A","name":"Alpha","projectTypeKey":"software"}],"isLast":false}"#,
            ),
            (
                200,
                r#"{"values":[{"id":"2","key":"B","name":"Beta"}],"isLast":true}"#,
            ),
        ]);

        let projects = client.list_projects().await.unwrap();
        let heads = server.join().unwrap();

        assert_eq!(
            projects.iter().map(|p| p.key.as_str()).collect::<Vec<_>>(),
            vec!["A", "B"]
        );
        assert_eq!(projects[0].project_type.as_deref(), Some("software"));
        assert_eq!(projects[1].project_type, None);
        assert_eq!(
            heads.iter().map(|head| request_line(head)).collect::<Vec<_>>(),
            vec![
                "GET /rest/api/3/project/search?startAt=0&maxResults=100&orderBy=name HTTP/1.1",
                "GET /rest/api/3/project/search?startAt=1&maxResults=100&orderBy=name HTTP/1.1",
            ]
        );
        for head in &heads {
            assert_eq!(header(head, "authorization"), Some(AUTH));
            assert_eq!(header(head, "accept"), Some("application/json"));
        }
    }

    #[tokio::test]
    async fn error_status_keeps_raw_body() {
        let (client, server) = serve(vec![(404, "nope body")]);

        let result = client.current_user().await;
        let heads = server.join().unwrap();

        let Err(AppError::Status {
            service,
            status,
            body,
        }) = result
        else {
            panic!("expected a status error");
        };
        assert_eq!(service, "Jira");
        assert_eq!(status, 404);
        assert_eq!(body, "nope body");
        assert_eq!(request_line(&heads[0]), "GET /rest/api/3/myself HTTP/1.1");
        assert_eq!(header(&heads[0], "authorization"), Some(AUTH));
    }

    #[tokio::test]
    async fn unparsable_success_body_is_malformed() {
        let (client, server) = serve(vec![(200, "not json")]);
        let result = client.current_user().await;
        server.join().unwrap();
        assert!(matches!(result, Err(AppError::MalformedResponse(_))));
    }

    #[tokio::test]
    async fn assignable_users_page_by_thousand() {
        let (client, server) = serve(vec![(
            200,
            r#"[{"accountId":"acc-1","displayName":"Ada","avatarUrls":{"48x48":"https://avatars/ada.png"}}]"#,
        )]);

        let users = client.list_assignable_users("ENG").await.unwrap();
        let heads = server.join().unwrap();

        assert_eq!(users.len(), 1);
        assert_eq!(users[0].account_id, "acc-1");
        assert_eq!(users[0].avatar_url.as_deref(), Some("https://avatars/ada.png"));
        assert_eq!(
            request_line(&heads[0]),
            "GET /rest/api/3/user/assignable/search?project=ENG&startAt=0&maxResults=1000 HTTP/1.1"
        );
        assert_eq!(header(&heads[0], "authorization"), Some(AUTH));
    }

    #[tokio::test]
    async fn sprint_lookup_sends_requested_states() {
        let (client, server) = serve(vec![(
            200,
            r#"{"values":[{"id":7,"name":"Sprint 7","state":"active"}]}"#,
        )]);

        let sprints = client
            .list_sprints(5, &[SprintState::Active, SprintState::Future])
            .await
            .unwrap();
        let heads = server.join().unwrap();

        assert_eq!(sprints.len(), 1);
        assert_eq!(sprints[0].id, 7);
        assert_eq!(sprints[0].state, SprintState::Active);
        assert_eq!(
            request_line(&heads[0]),
            "GET /rest/agile/1.0/board/5/sprint?state=active%2Cfuture&maxResults=50 HTTP/1.1"
        );
        assert_eq!(header(&heads[0], "authorization"), Some(AUTH));
    }
}

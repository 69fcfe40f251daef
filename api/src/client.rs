use crate::wire::{LineupsPayload, ResolverPayload, WireEvent, WireLineup, WireTeam};
use crate::{EventKind, Lineup, Lineups, MatchEvent, MatchResult, Side, Team, VarDecision, VarType};
use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode};
use std::path::PathBuf;
use std::time::Duration;

pub type ApiResult<T> = Result<T, ApiError>;

pub const DEMO_MATCH_ID: &str = "demo";
const DEMO_MATCH_JSON: &str = include_str!("../demo_match.json");
const DEMO_LINEUPS_JSON: &str = include_str!("../demo_lineups.json");

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Network error for {1}: {0}")]
    Network(#[source] reqwest::Error, String),
    #[error("API error for {1}: {0}")]
    Api(#[source] reqwest::Error, String),
    #[error("Parse error for {1}: {0}")]
    Parsing(#[source] reqwest::Error, String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Invalid payload: {0}")]
    Payload(#[from] serde_json::Error),
    #[error("Could not read {path}: {source}")]
    LocalFile {
        path: String,
        source: std::io::Error,
    },
}

/// Client for the Match Resolver, the service that finalizes a match before
/// it is played back.
#[derive(Debug, Clone)]
pub struct ResolverClient {
    client: Client,
    base_url: Option<String>,
    local_path: Option<PathBuf>,
    timeout: Duration,
}

impl Default for ResolverClient {
    fn default() -> Self {
        Self {
            client: Client::builder()
                .user_agent("matchcast/0.1 (terminal match replay)")
                .build()
                .unwrap_or_default(),
            base_url: None,
            local_path: None,
            timeout: Duration::from_secs(10),
        }
    }
}

impl ResolverClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads `MATCHCAST_RESOLVER_URL` and `MATCHCAST_MATCH_JSON`.
    pub fn from_env() -> Self {
        let mut client = Self::new();
        if let Ok(url) = std::env::var("MATCHCAST_RESOLVER_URL")
            && !url.trim().is_empty()
        {
            client = client.with_base_url(url.trim());
        }
        if let Ok(path) = std::env::var("MATCHCAST_MATCH_JSON")
            && !path.trim().is_empty()
        {
            client = client.with_local_path(path.trim());
        }
        client
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into().trim_end_matches('/').to_string());
        self
    }

    pub fn with_local_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.local_path = Some(path.into());
        self
    }

    /// Fetch the finalized result for a match.
    ///
    /// Fallback chain:
    /// 1) local JSON file, when one is configured.
    /// 2) embedded demo match, for the `demo` id or when no resolver URL is set.
    /// 3) resolver endpoint `{base}/matches/{id}/result`.
    pub async fn fetch_match(&self, match_id: &str) -> ApiResult<MatchResult> {
        if let Some(path) = &self.local_path {
            let content = std::fs::read_to_string(path).map_err(|source| ApiError::LocalFile {
                path: path.display().to_string(),
                source,
            })?;
            return parse_match_json(&content);
        }

        let Some(base) = self.base_url.as_deref().filter(|_| match_id != DEMO_MATCH_ID) else {
            return demo_match();
        };

        let url = format!("{base}/matches/{match_id}/result");
        let raw: ResolverPayload = self.get(&url).await?;
        Ok(map_payload(raw, match_id))
    }

    /// Fetch the formation/lineup side payload shown before kickoff.
    pub async fn fetch_lineups(&self, match_id: &str) -> ApiResult<Lineups> {
        let Some(base) = self.base_url.as_deref().filter(|_| match_id != DEMO_MATCH_ID) else {
            let raw: LineupsPayload = serde_json::from_str(DEMO_LINEUPS_JSON)?;
            return Ok(map_lineups(raw));
        };

        let url = format!("{base}/matches/{match_id}/lineups");
        let raw: LineupsPayload = self.get(&url).await?;
        Ok(map_lineups(raw))
    }

    async fn get<T: serde::de::DeserializeOwned>(&self, url: &str) -> ApiResult<T> {
        let response = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| ApiError::Network(e, url.to_owned()))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound(url.to_owned()));
        }

        match response.error_for_status() {
            Ok(res) => res
                .json::<T>()
                .await
                .map_err(|e| ApiError::Parsing(e, url.to_owned())),
            Err(e) => Err(ApiError::Api(e, url.to_owned())),
        }
    }
}

/// Parse a resolver payload held in memory (local file or embedded snapshot).
pub fn parse_match_json(content: &str) -> ApiResult<MatchResult> {
    let raw: ResolverPayload = serde_json::from_str(content)?;
    Ok(map_payload(raw, ""))
}

pub fn demo_match() -> ApiResult<MatchResult> {
    parse_match_json(DEMO_MATCH_JSON)
}

// ---------------------------------------------------------------------------
// Mapping: resolver wire types → clean domain types
// ---------------------------------------------------------------------------

fn map_payload(raw: ResolverPayload, requested_id: &str) -> MatchResult {
    let score = raw.score.unwrap_or_default();
    let mut result = MatchResult {
        id: raw.match_id.unwrap_or_else(|| requested_id.to_string()),
        home: map_team(raw.home, "Home"),
        away: map_team(raw.away, "Away"),
        final_home_goals: score.home.unwrap_or(0),
        final_away_goals: score.away.unwrap_or(0),
        events: raw.events.into_iter().map(map_event).collect(),
        statistics: raw.stats,
        kickoff: raw.kickoff.as_deref().and_then(parse_kickoff),
    };
    result.normalize();
    result
}

fn map_team(raw: Option<WireTeam>, fallback: &str) -> Team {
    let raw = raw.unwrap_or_default();
    let name = raw.name.unwrap_or_else(|| fallback.to_string());
    let short_name = raw
        .short
        .unwrap_or_else(|| name.chars().take(3).collect::<String>().to_uppercase());
    Team {
        id: raw.id.unwrap_or_else(|| name.to_lowercase().replace(' ', "-")),
        name,
        short_name,
    }
}

fn map_event(raw: WireEvent) -> MatchEvent {
    MatchEvent {
        minute: raw.minute,
        kind: parse_kind(&raw.kind),
        side: raw.team.as_deref().map(parse_side).unwrap_or_default(),
        text: raw.text,
        var_type: raw.var_type.as_deref().and_then(parse_var_type),
        decision: raw.decision.as_deref().and_then(parse_decision),
    }
}

fn map_lineups(raw: LineupsPayload) -> Lineups {
    Lineups {
        home: map_lineup(raw.home),
        away: map_lineup(raw.away),
    }
}

fn map_lineup(raw: Option<WireLineup>) -> Lineup {
    let raw = raw.unwrap_or_default();
    Lineup {
        formation: raw.formation.unwrap_or_default(),
        starters: raw.starters,
        bench: raw.bench,
    }
}

fn parse_kickoff(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

fn parse_kind(s: &str) -> EventKind {
    match s.trim().to_ascii_lowercase().as_str() {
        "goal" => EventKind::Goal,
        "penalty_awarded" | "penalty" => EventKind::PenaltyAwarded,
        "red_card" => EventKind::RedCard,
        "var_process" => EventKind::VarProcess,
        "var_verdict" => EventKind::VarVerdict,
        "info" => EventKind::Info,
        _ => EventKind::Other,
    }
}

fn parse_side(s: &str) -> Side {
    match s.trim().to_ascii_lowercase().as_str() {
        "home" => Side::Home,
        "away" => Side::Away,
        _ => Side::None,
    }
}

fn parse_var_type(s: &str) -> Option<VarType> {
    match s.trim().to_ascii_lowercase().as_str() {
        "goal" => Some(VarType::Goal),
        "penalty" => Some(VarType::Penalty),
        "penalty_review" => Some(VarType::PenaltyReview),
        "red_card" => Some(VarType::RedCard),
        "phantom_goal" => Some(VarType::PhantomGoal),
        _ => None,
    }
}

fn parse_decision(s: &str) -> Option<VarDecision> {
    match s.trim().to_ascii_lowercase().as_str() {
        "confirmed" => Some(VarDecision::Confirmed),
        "overturned" => Some(VarDecision::Overturned),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAYLOAD: &str = r#"{
        "match_id": "42",
        "kickoff": "2025-05-18T18:45:00Z",
        "home": {"id": "int", "name": "Internazionale", "short": "INT"},
        "away": {"name": "Lazio"},
        "score": {"home": 1, "away": 0},
        "events": [
            {"minute": 67, "type": "VAR_PROCESS", "team": "away", "text": "Checking goal", "var_type": "goal"},
            {"minute": 23, "type": "goal", "team": "home", "text": "Goal Lautaro"},
            {"minute": 67, "type": "goal", "team": "away", "text": "Goal Immobile"},
            {"minute": 68, "type": "var_verdict", "text": "Offside", "var_type": "GOAL", "decision": "overturned"},
            {"minute": 80, "type": "corner", "team": "nobody", "text": "Corner"}
        ],
        "stats": {"possession": [55, 45]}
    }"#;

    #[test]
    fn test_map_payload_domain_fields() {
        let result = parse_match_json(PAYLOAD).unwrap();
        assert_eq!(result.id, "42");
        assert_eq!(result.home.short_name, "INT");
        assert_eq!(result.away.short_name, "LAZ");
        assert_eq!(result.away.id, "lazio");
        assert_eq!((result.final_home_goals, result.final_away_goals), (1, 0));
        assert!(result.kickoff.is_some());
        assert_eq!(result.statistics["possession"][0], 55);
    }

    #[test]
    fn test_events_sorted_stably_by_minute() {
        let result = parse_match_json(PAYLOAD).unwrap();
        let order: Vec<(u16, EventKind)> = result.events.iter().map(|e| (e.minute, e.kind)).collect();
        assert_eq!(
            order,
            vec![
                (23, EventKind::Goal),
                (67, EventKind::VarProcess),
                (67, EventKind::Goal),
                (68, EventKind::VarVerdict),
                (80, EventKind::Other),
            ]
        );
    }

    #[test]
    fn test_var_fields_are_case_insensitive() {
        let result = parse_match_json(PAYLOAD).unwrap();
        let verdict = &result.events[3];
        assert_eq!(verdict.var_type, Some(VarType::Goal));
        assert_eq!(verdict.decision, Some(VarDecision::Overturned));
        assert_eq!(verdict.side, Side::None);
    }

    #[test]
    fn test_unknown_wire_values_degrade() {
        assert_eq!(parse_kind("corner"), EventKind::Other);
        assert_eq!(parse_side("nobody"), Side::None);
        assert_eq!(parse_var_type("handball"), None);
        assert_eq!(parse_decision("pending"), None);
    }

    #[test]
    fn test_embedded_demo_parses() {
        let demo = demo_match().expect("demo match should parse");
        assert_eq!(demo.id, DEMO_MATCH_ID);
        assert!(!demo.events.is_empty());
        assert!(demo.events.windows(2).all(|w| w[0].minute <= w[1].minute));
    }

    #[tokio::test]
    async fn test_fetch_match_without_resolver_uses_demo() {
        let result = ResolverClient::new().fetch_match("anything").await.unwrap();
        assert_eq!(result.id, DEMO_MATCH_ID);
    }

    #[tokio::test]
    async fn test_fetch_match_reads_resolver_endpoint() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/matches/42/result")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(PAYLOAD)
            .create_async()
            .await;

        let client = ResolverClient::new().with_base_url(server.url());
        let result = client.fetch_match("42").await.unwrap();

        mock.assert_async().await;
        assert_eq!(result.home.name, "Internazionale");
        assert_eq!(result.events.len(), 5);
    }

    #[tokio::test]
    async fn test_fetch_match_not_found() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/matches/missing/result")
            .with_status(404)
            .create_async()
            .await;

        let client = ResolverClient::new().with_base_url(server.url());
        let err = client.fetch_match("missing").await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)), "got {err}");
    }

    #[tokio::test]
    async fn test_fetch_match_server_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/matches/7/result")
            .with_status(500)
            .create_async()
            .await;

        let client = ResolverClient::new().with_base_url(server.url());
        let err = client.fetch_match("7").await.unwrap_err();
        assert!(matches!(err, ApiError::Api(..)), "got {err}");
    }

    #[tokio::test]
    async fn test_fetch_lineups_maps_formation_alias() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/matches/42/lineups")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"home": {"modulo": "3-5-2", "starters": ["Sommer"]}}"#)
            .create_async()
            .await;

        let client = ResolverClient::new().with_base_url(server.url());
        let lineups = client.fetch_lineups("42").await.unwrap();
        assert_eq!(lineups.home.formation, "3-5-2");
        assert_eq!(lineups.home.starters, vec!["Sommer".to_string()]);
        assert!(lineups.away.starters.is_empty());
    }

    #[tokio::test]
    async fn test_local_file_read_error() {
        let client = ResolverClient::new().with_local_path("/nonexistent/matchcast.json");
        let err = client.fetch_match("demo").await.unwrap_err();
        assert!(matches!(err, ApiError::LocalFile { .. }));
    }
}

/// Match Resolver raw wire types: serde shapes for deserializing resolver payloads.
/// These map to our clean domain types via the mapping functions in client.rs.
use serde::Deserialize;

// ---------------------------------------------------------------------------
// Finalized match  (GET /matches/{id}/result)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default, Clone)]
pub struct ResolverPayload {
    pub match_id: Option<String>,
    /// RFC 3339 kickoff timestamp.
    pub kickoff: Option<String>,
    pub home: Option<WireTeam>,
    pub away: Option<WireTeam>,
    pub score: Option<WireScore>,
    #[serde(default)]
    pub events: Vec<WireEvent>,
    /// Passed through untouched.
    #[serde(default)]
    pub stats: serde_json::Value,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct WireTeam {
    pub id: Option<String>,
    pub name: Option<String>,
    #[serde(alias = "abbrev")]
    pub short: Option<String>,
}

#[derive(Debug, Deserialize, Default, Clone, Copy)]
pub struct WireScore {
    pub home: Option<u16>,
    pub away: Option<u16>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct WireEvent {
    pub minute: u16,
    #[serde(rename = "type")]
    pub kind: String,
    /// "home" | "away"; anything else means no side.
    pub team: Option<String>,
    #[serde(default)]
    pub text: String,
    pub var_type: Option<String>,
    pub decision: Option<String>,
}

// ---------------------------------------------------------------------------
// Lineups  (GET /matches/{id}/lineups)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default, Clone)]
pub struct LineupsPayload {
    pub home: Option<WireLineup>,
    pub away: Option<WireLineup>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct WireLineup {
    #[serde(alias = "modulo")]
    pub formation: Option<String>,
    #[serde(default)]
    pub starters: Vec<String>,
    #[serde(default)]
    pub bench: Vec<String>,
}

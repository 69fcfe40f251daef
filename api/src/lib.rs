pub mod client;
pub mod wire;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Domain types, independent of the resolver wire format
// ---------------------------------------------------------------------------

/// Finalized outcome of a match as produced by the Match Resolver.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub id: String,
    pub home: Team,
    pub away: Team,
    pub final_home_goals: u16,
    pub final_away_goals: u16,
    /// Ordered by minute; array order is the tie-break within a minute.
    pub events: Vec<MatchEvent>,
    /// Free-form statistics, never interpreted by the playback engine.
    pub statistics: serde_json::Value,
    pub kickoff: Option<DateTime<Utc>>,
}

impl MatchResult {
    /// Stable sort by minute so same-minute events keep their log order.
    pub fn normalize(&mut self) {
        self.events.sort_by_key(|e| e.minute);
    }

    pub fn team(&self, side: Side) -> Option<&Team> {
        match side {
            Side::Home => Some(&self.home),
            Side::Away => Some(&self.away),
            Side::None => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub id: String,
    pub name: String,       // "Internazionale"
    pub short_name: String, // "INT"
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchEvent {
    pub minute: u16,
    pub kind: EventKind,
    pub side: Side,
    pub text: String,
    /// Present only on `VarProcess` / `VarVerdict`.
    pub var_type: Option<VarType>,
    /// Present only on `VarVerdict`.
    pub decision: Option<VarDecision>,
}

impl MatchEvent {
    pub fn new(minute: u16, kind: EventKind, side: Side, text: impl Into<String>) -> Self {
        Self {
            minute,
            kind,
            side,
            text: text.into(),
            var_type: None,
            decision: None,
        }
    }

    pub fn with_var_type(mut self, var_type: VarType) -> Self {
        self.var_type = Some(var_type);
        self
    }

    pub fn with_decision(mut self, decision: VarDecision) -> Self {
        self.decision = Some(decision);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventKind {
    Goal,
    PenaltyAwarded,
    RedCard,
    VarProcess,
    VarVerdict,
    Info,
    Other,
}

impl EventKind {
    pub fn label(&self) -> &'static str {
        match self {
            EventKind::Goal => "GOAL",
            EventKind::PenaltyAwarded => "PENALTY_AWARDED",
            EventKind::RedCard => "RED_CARD",
            EventKind::VarProcess => "VAR_PROCESS",
            EventKind::VarVerdict => "VAR_VERDICT",
            EventKind::Info => "INFO",
            EventKind::Other => "OTHER",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Side {
    Home,
    Away,
    #[default]
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VarType {
    Goal,
    Penalty,
    PenaltyReview,
    RedCard,
    PhantomGoal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VarDecision {
    Confirmed,
    Overturned,
}

// ---------------------------------------------------------------------------
// Formation / lineup side payload, shown during warm-up only
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Lineups {
    pub home: Lineup,
    pub away: Lineup,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Lineup {
    pub formation: String, // "4-3-3"
    pub starters: Vec<String>,
    pub bench: Vec<String>,
}

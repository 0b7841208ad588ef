#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SprintState {
    Active,
    Future,
    Closed,
    Other(String),
}

impl SprintState {
    pub fn as_str(&self) -> &str {
        match self {
            SprintState::Active => "active",
            SprintState::Future => "future",
            SprintState::Closed => "closed",
            SprintState::Other(state) => state,
        }
    }

    pub fn from_str(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "active" => SprintState::Active,
            "future" => SprintState::Future,
            "closed" => SprintState::Closed,
            other => SprintState::Other(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sprint {
    pub id: u64,
    pub name: String,
    pub state: SprintState,
}

/// First active sprint, the default pick for new tickets.
pub fn default_sprint(sprints: &[Sprint]) -> Option<&Sprint> {
    sprints
        .iter()
        .find(|sprint| sprint.state == SprintState::Active)
}

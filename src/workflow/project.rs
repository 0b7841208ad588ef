use crate::context::AppContext;
use crate::domain::project::Project;
use crate::domain::recent::{RECENT_OPEN_PROJECT_KEYS, rank_by_recent_keys, remember_recent_key};
use crate::error::{AppError, AppResult};
use crate::services::RecentStore;

pub struct ProjectEntry {
    pub project: Project,
    pub url: String,
}

/// Projects with the most recently opened ones first.
pub async fn list_recent_projects(ctx: &AppContext) -> AppResult<Vec<ProjectEntry>> {
    let projects = ctx.issue_tracker.list_projects().await?;
    let recent_keys = load_recent_keys(ctx.recent.as_ref());
    let ranked = rank_by_recent_keys(projects, |project| project.key.as_str(), &recent_keys);

    ranked
        .into_iter()
        .map(|project| -> AppResult<ProjectEntry> {
            let url = ctx
                .issue_tracker
                .project_url(&project.key, project.project_type.as_deref())?;
            Ok(ProjectEntry { project, url })
        })
        .collect()
}

/// Records that a project was opened and returns its URL.
pub async fn open_project(ctx: &AppContext, project_key: &str) -> AppResult<ProjectEntry> {
    let project_key = project_key.trim();
    if project_key.is_empty() {
        return Err(AppError::Precondition("project key is required".to_string()));
    }

    let project = ctx
        .issue_tracker
        .list_projects()
        .await?
        .into_iter()
        .find(|project| project.key.eq_ignore_ascii_case(project_key))
        .ok_or_else(|| AppError::Precondition(format!("unknown project {project_key}")))?;

    let url = ctx
        .issue_tracker
        .project_url(&project.key, project.project_type.as_deref())?;
    record_project_open(ctx.recent.as_ref(), &project.key)?;

    Ok(ProjectEntry { project, url })
}

pub fn record_project_open(store: &dyn RecentStore, project_key: &str) -> AppResult<()> {
    let updated = remember_recent_key(&load_recent_keys(store), project_key);
    let encoded = serde_json::to_string(&updated).map_err(|err| {
        AppError::Configuration(format!("failed to encode recent projects: {err}"))
    })?;
    store.set(RECENT_OPEN_PROJECT_KEYS, &encoded)
}

/// Reads the stored list of recently opened project keys. Anything that is
/// not a JSON array counts as empty; non-string entries are skipped.
pub fn load_recent_keys(store: &dyn RecentStore) -> Vec<String> {
    let Some(saved) = store.get(RECENT_OPEN_PROJECT_KEYS) else {
        return Vec::new();
    };
    match serde_json::from_str::<serde_json::Value>(&saved) {
        Ok(serde_json::Value::Array(values)) => values
            .into_iter()
            .filter_map(|value| value.as_str().map(str::to_string))
            .collect(),
        _ => {
            tracing::debug!("ignoring invalid recent project list");
            Vec::new()
        }
    }
}

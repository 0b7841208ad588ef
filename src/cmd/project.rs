use clap::Args;

use crate::context::AppContext;
use crate::error::AppResult;
use crate::workflow::project::{list_recent_projects, open_project};

#[derive(Args, Debug, Clone)]
pub struct ProjectArgs {
    /// Record the project as opened and print its URL.
    #[arg(short, long)]
    pub open: Option<String>,
}

pub async fn run(ctx: &AppContext, args: ProjectArgs) -> AppResult<()> {
    if let Some(project_key) = args.open.as_deref() {
        let entry = open_project(ctx, project_key).await?;
        println!("{}", entry.url);
        return Ok(());
    }

    for entry in list_recent_projects(ctx).await? {
        println!(
            "{:<10} {:<32} {}",
            entry.project.key, entry.project.name, entry.url
        );
    }
    Ok(())
}

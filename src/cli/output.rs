use serde::Serialize;

use crate::model::Project;

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct ProjectJson {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    pub status: String,
    pub path: String,
}

impl From<&Project> for ProjectJson {
    fn from(project: &Project) -> Self {
        ProjectJson {
            name: project.name.clone(),
            alias: project.alias.clone(),
            status: project.status.to_string(),
            path: project.path.display().to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Text output
// ---------------------------------------------------------------------------

/// The `status` block: name, optional alias, status and path.
pub fn format_project_status(project: &Project) -> String {
    let mut out = format!("Project: {}\n", project.name);
    if let Some(alias) = &project.alias {
        out.push_str(&format!("Alias:   {}\n", alias));
    }
    out.push_str(&format!("Status:  {}\n", project.status));
    out.push_str(&format!("Path:    {}\n", project.path.display()));
    out
}

/// Success line printed after a mutation
pub fn success(message: &str) -> String {
    format!("\u{2713} {}", message)
}

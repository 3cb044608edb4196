//! Designer API routes, relative to the configured base URL (which already ends in `/designer`).

use urlencoding::encode;

fn repo(org: &str, app: &str) -> String {
    format!("/api/repos/repo/{}/{}", encode(org), encode(app))
}

fn app_development(org: &str, app: &str) -> String {
    format!("/api/{}/{}/app-development", encode(org), encode(app))
}

pub fn branches(org: &str, app: &str) -> String {
    format!("{}/branches", repo(org, app))
}

pub fn checkout_branch(org: &str, app: &str) -> String {
    format!("{}/checkout", repo(org, app))
}

pub fn current_branch(org: &str, app: &str) -> String {
    format!("{}/current-branch", repo(org, app))
}

pub fn discard_changes(org: &str, app: &str) -> String {
    format!("{}/discard-changes", repo(org, app))
}

pub fn repo_status(org: &str, app: &str) -> String {
    format!("{}/status", repo(org, app))
}

pub fn form_layout(org: &str, app: &str, layout_name: &str, layout_set_name: &str) -> String {
    format!(
        "{}/form-layout/{}?layoutSetName={}",
        app_development(org, app),
        encode(layout_name),
        encode(layout_set_name)
    )
}

pub fn form_layouts(org: &str, app: &str, layout_set_name: &str) -> String {
    format!(
        "{}/form-layouts?layoutSetName={}",
        app_development(org, app),
        encode(layout_set_name)
    )
}

pub fn layout_settings(org: &str, app: &str, layout_set_name: &str) -> String {
    format!(
        "{}/layout-settings?layoutSetName={}",
        app_development(org, app),
        encode(layout_set_name)
    )
}

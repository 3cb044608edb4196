use std::io::Write;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde_json::Value;

use crate::application::use_cases::branches::errors::BranchOperationError;
use crate::application::use_cases::form_items::form_item_editor::FormItemEditor;
use crate::bootstrap::app_context::AppContext;
use crate::domain::branches::branch::BranchName;
use crate::domain::layouts::form_item::FormItem;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Branch and form layout operations against a Studio designer backend"
)]
pub struct Cli {
    /// App repository to work on (overrides STUDIO_APP)
    #[arg(long, global = true)]
    pub app: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show ahead/behind counts and changed files
    Status,
    /// List branches
    Branches,
    /// Print the checked out branch
    CurrentBranch,
    /// Switch to an existing branch
    Checkout { branch: String },
    /// Create a branch and switch to it
    CreateBranch { branch: String },
    /// Throw away local changes, then switch
    DiscardAndCheckout { branch: String },
    /// Check a name against git branch naming rules without contacting the backend
    ValidateBranchName { name: String },
    /// List layouts of the configured layout set with their item ids
    Layouts,
    /// Give a component or container a new id
    RenameItem {
        #[arg(long)]
        layout: String,
        id: String,
        new_id: String,
    },
    /// Set a property on a component or container through the autosave path
    SetProperty {
        #[arg(long)]
        layout: String,
        id: String,
        key: String,
        /// JSON value; anything that does not parse is stored as a string
        value: String,
    },
}

pub async fn run(ctx: &AppContext, command: Command, out: &mut impl Write) -> anyhow::Result<()> {
    match command {
        Command::ValidateBranchName { name } => {
            let name = BranchName::parse(&name)?;
            writeln!(out, "'{name}' is a valid branch name")?;
        }
        Command::Status => {
            ctx.cfg.require_app()?;
            let status = ctx.branch_operations().repo_status().await?;
            writeln!(
                out,
                "{} (ahead {}, behind {})",
                status.current_branch.as_deref().unwrap_or("(unknown)"),
                status.ahead_by,
                status.behind_by
            )?;
            for entry in &status.content_status {
                writeln!(out, "  {} {}", entry.file_status, entry.file_path)?;
            }
        }
        Command::Branches => {
            ctx.cfg.require_app()?;
            for branch in ctx.branch_operations().list_branches().await? {
                writeln!(out, "{}", branch.name)?;
            }
        }
        Command::CurrentBranch => {
            ctx.cfg.require_app()?;
            let name = ctx.branch_operations().refresh_current_branch().await?;
            writeln!(out, "{name}")?;
        }
        Command::Checkout { branch } => {
            ctx.cfg.require_app()?;
            let branch = BranchName::parse(&branch)?;
            let ops = ctx.branch_operations();
            ops.refresh_current_branch().await?;
            let result = ops.checkout_existing_branch(branch.as_str()).await;
            report_checkout(result, out)?;
        }
        Command::CreateBranch { branch } => {
            ctx.cfg.require_app()?;
            let branch = BranchName::parse(&branch)?;
            let ops = ctx.branch_operations();
            ops.refresh_current_branch().await?;
            let result = ops.checkout_new_branch(branch.as_str()).await;
            report_checkout(result, out)?;
        }
        Command::DiscardAndCheckout { branch } => {
            ctx.cfg.require_app()?;
            let branch = BranchName::parse(&branch)?;
            let result = ctx
                .branch_operations()
                .discard_changes_and_checkout(branch.as_str())
                .await;
            report_checkout(result, out)?;
        }
        Command::Layouts => {
            ctx.cfg.require_app()?;
            let cache = ctx.layout_cache();
            cache.refetch(&ctx.cfg.layout_set, false).await?;
            let layouts = cache.layouts(&ctx.cfg.layout_set).await.unwrap_or_default();
            for (name, layout) in layouts {
                writeln!(out, "{name}: {}", layout.all_item_ids().join(", "))?;
            }
        }
        Command::RenameItem { layout, id, new_id } => {
            ctx.cfg.require_app()?;
            let (editor, item) = open_item(ctx, &layout, &id).await?;
            let saved = editor.handle_save(&id, item.with_id(new_id)).await?;
            writeln!(out, "{} -> {}", saved.previous_id, saved.id)?;
        }
        Command::SetProperty {
            layout,
            id,
            key,
            value,
        } => {
            ctx.cfg.require_app()?;
            let (editor, mut item) = open_item(ctx, &layout, &id).await?;
            let value = serde_json::from_str(&value).unwrap_or(Value::String(value));
            item.set_property(&key, value);
            editor.handle_update(item.clone());
            match editor.debounce_save(&id, item).outcome().await? {
                Some(saved) => writeln!(out, "saved {}", saved.id)?,
                None => writeln!(out, "superseded by a later edit")?,
            }
        }
    }
    Ok(())
}

async fn open_item(
    ctx: &AppContext,
    layout_name: &str,
    id: &str,
) -> anyhow::Result<(FormItemEditor, FormItem)> {
    let cache = Arc::new(ctx.layout_cache());
    cache.refetch(&ctx.cfg.layout_set, false).await?;
    let item = cache
        .layout(&ctx.cfg.layout_set, layout_name)
        .await
        .with_context(|| format!("layout '{layout_name}' not found"))?
        .item(id)
        .with_context(|| format!("no item '{id}' in layout '{layout_name}'"))?;
    let editor = ctx.form_item_editor(cache, layout_name);
    editor.handle_edit(item.clone());
    Ok((editor, item))
}

fn report_checkout<T>(
    result: Result<T, BranchOperationError>,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    match result {
        Ok(_) => Ok(()),
        Err(BranchOperationError::UncommittedChanges(details)) => {
            writeln!(out, "{}", details.message)?;
            for file in &details.uncommitted_files {
                writeln!(out, "  {} {}", file.status, file.file_path)?;
            }
            writeln!(
                out,
                "run `discard-and-checkout {}` to drop them",
                details.target_branch
            )?;
            Err(BranchOperationError::UncommittedChanges(details).into())
        }
        Err(e) => Err(e.into()),
    }
}

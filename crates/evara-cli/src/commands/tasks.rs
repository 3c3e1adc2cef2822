use evara_core::models::{ChecklistDraft, ChecklistPatch, CompletionStatus};
use evara_core::views::{apply_filter, group_by_category, CategoryGroup, CompletionFilter};
use evara_core::ChecklistItem;

use crate::cli::{TaskCommands, TaskFields};
use crate::commands::common::{
    fit, join_words, not_found, print_json, resolve_record, settle, short_id, AppContext,
};
use crate::error::CliError;

pub async fn run_tasks(command: TaskCommands, ctx: &AppContext) -> Result<(), CliError> {
    match command {
        TaskCommands::List { status, json } => run_list(&status, json, ctx).await,
        TaskCommands::Add { name, fields } => {
            let task_name = join_words(&name).ok_or(CliError::MissingField("Task name"))?;
            run_add(task_name, fields, ctx).await
        }
        TaskCommands::Edit {
            id,
            name,
            status,
            fields,
        } => {
            let patch = ChecklistPatch {
                task_name: name,
                category: fields.category,
                due_date: fields.due,
                description: fields.description,
                assigned_to: fields.assigned_to,
                status: status
                    .as_deref()
                    .map(str::parse::<CompletionStatus>)
                    .transpose()?,
            };
            run_edit(&id, patch, ctx).await
        }
        TaskCommands::Toggle { id } => run_toggle(&id, ctx).await,
        TaskCommands::Remove { id } => run_remove(&id, ctx).await,
    }
}

async fn run_list(status: &str, as_json: bool, ctx: &AppContext) -> Result<(), CliError> {
    let filter: CompletionFilter = status.parse()?;
    let tasks = ctx.load_list::<ChecklistItem>().await?;
    let visible = apply_filter(&tasks.items(), &filter);
    let groups = group_by_category(&visible);

    if as_json {
        return print_json(&groups);
    }
    if groups.is_empty() {
        println!("No tasks found.");
        return Ok(());
    }
    for line in format_group_lines(&groups) {
        println!("{line}");
    }
    Ok(())
}

async fn run_add(task_name: String, fields: TaskFields, ctx: &AppContext) -> Result<(), CliError> {
    let draft = ChecklistDraft {
        task_name,
        category: fields.category,
        due_date: fields.due,
        description: fields.description,
        assigned_to: fields.assigned_to,
    };

    let tasks = ctx.load_list::<ChecklistItem>().await?;
    let write = tasks
        .create(draft)
        .ok_or(CliError::MissingField("Task name"))?;
    let id = settle(write).await?;
    println!("Added task {}", short_id(&id));
    Ok(())
}

async fn run_edit(id: &str, patch: ChecklistPatch, ctx: &AppContext) -> Result<(), CliError> {
    let tasks = ctx.load_list::<ChecklistItem>().await?;
    let task = resolve_record(&tasks.items(), id)?;
    let write = tasks
        .update(&task.id, patch)
        .ok_or_else(|| not_found::<ChecklistItem>(id))?;
    settle(write).await?;
    println!("Updated task {}", short_id(task.id.as_str()));
    Ok(())
}

async fn run_toggle(id: &str, ctx: &AppContext) -> Result<(), CliError> {
    let tasks = ctx.load_list::<ChecklistItem>().await?;
    let task = resolve_record(&tasks.items(), id)?;
    let write = tasks
        .toggle_complete(&task.id)
        .ok_or_else(|| not_found::<ChecklistItem>(id))?;
    settle(write).await?;

    let status = tasks
        .get(&task.id)
        .map_or(CompletionStatus::from_completed(!task.is_completed()), |t| {
            t.status()
        });
    println!(
        "Marked task {} as {}",
        short_id(task.id.as_str()),
        status.label().to_ascii_lowercase()
    );
    Ok(())
}

async fn run_remove(id: &str, ctx: &AppContext) -> Result<(), CliError> {
    let tasks = ctx.load_list::<ChecklistItem>().await?;
    let task = resolve_record(&tasks.items(), id)?;
    let write = tasks
        .delete(&task.id)
        .ok_or_else(|| not_found::<ChecklistItem>(id))?;
    settle(write).await?;
    println!("Removed task {} ({})", short_id(task.id.as_str()), task.name());
    Ok(())
}

/// Category headers with the completion ratio, then one line per task
pub fn format_group_lines(groups: &[CategoryGroup]) -> Vec<String> {
    let mut lines = Vec::new();
    for (index, group) in groups.iter().enumerate() {
        if index > 0 {
            lines.push(String::new());
        }
        let done = group.items.iter().filter(|task| task.is_completed()).count();
        lines.push(format!("{} ({done}/{})", group.name, group.items.len()));
        lines.extend(group.items.iter().map(format_task_line));
    }
    lines
}

fn format_task_line(task: &ChecklistItem) -> String {
    let mark = if task.is_completed() { 'x' } else { ' ' };
    let mut line = format!(
        "  [{mark}] {}  {}",
        short_id(task.id.as_str()),
        fit(task.name(), 32)
    );
    if let Some(due) = task.due_date.as_deref() {
        line.push_str("  due ");
        line.push_str(due);
    }
    if let Some(assignee) = task.assigned_to.as_deref() {
        line.push_str("  @");
        line.push_str(assignee);
    }
    line.trim_end().to_string()
}

use chrono::{DateTime, Utc};
use evara_core::models::{parse_event_time, EventDraft, EventPatch};
use evara_core::views::partition_events;
use evara_core::Event;

use crate::cli::{EventCommands, EventFields, EventWindow};
use crate::commands::common::{
    fit, join_words, not_found, print_json, resolve_record, settle, short_id, AppContext,
};
use crate::error::CliError;

pub async fn run_events(command: EventCommands, ctx: &AppContext) -> Result<(), CliError> {
    match command {
        EventCommands::List { when, json } => run_list(when, json, ctx).await,
        EventCommands::Add { title, at, fields } => {
            let event_title = join_words(&title).ok_or(CliError::MissingField("Event title"))?;
            run_add(event_title, &at, fields, ctx).await
        }
        EventCommands::Edit {
            id,
            title,
            at,
            fields,
        } => {
            if let Some(at) = at.as_deref() {
                validate_event_time(at)?;
            }
            let patch = EventPatch {
                event_title: title,
                event_date_time: at,
                location: fields.location,
                description: fields.description,
                event_image: fields.image,
                event_url: fields.url,
            };
            run_edit(&id, patch, ctx).await
        }
        EventCommands::Remove { id } => run_remove(&id, ctx).await,
    }
}

async fn run_list(when: EventWindow, as_json: bool, ctx: &AppContext) -> Result<(), CliError> {
    let events = ctx.load_list::<Event>().await?;
    let visible = select_window(&events.items(), when, Utc::now());

    if as_json {
        return print_json(&visible);
    }
    if visible.is_empty() {
        println!("No events found.");
        return Ok(());
    }
    for line in format_event_lines(&visible) {
        println!("{line}");
    }
    Ok(())
}

async fn run_add(
    event_title: String,
    at: &str,
    fields: EventFields,
    ctx: &AppContext,
) -> Result<(), CliError> {
    validate_event_time(at)?;
    let draft = EventDraft {
        event_title,
        event_date_time: at.to_string(),
        location: fields.location,
        description: fields.description,
        event_image: fields.image,
        event_url: fields.url,
    };

    let events = ctx.load_list::<Event>().await?;
    let write = events
        .create(draft)
        .ok_or(CliError::MissingField("Event date"))?;
    let id = settle(write).await?;
    println!("Added event {}", short_id(&id));
    Ok(())
}

async fn run_edit(id: &str, patch: EventPatch, ctx: &AppContext) -> Result<(), CliError> {
    let events = ctx.load_list::<Event>().await?;
    let event = resolve_record(&events.items(), id)?;
    let write = events
        .update(&event.id, patch)
        .ok_or_else(|| not_found::<Event>(id))?;
    settle(write).await?;
    println!("Updated event {}", short_id(event.id.as_str()));
    Ok(())
}

async fn run_remove(id: &str, ctx: &AppContext) -> Result<(), CliError> {
    let events = ctx.load_list::<Event>().await?;
    let event = resolve_record(&events.items(), id)?;
    let write = events
        .delete(&event.id)
        .ok_or_else(|| not_found::<Event>(id))?;
    settle(write).await?;
    println!(
        "Removed event {} ({})",
        short_id(event.id.as_str()),
        event.title()
    );
    Ok(())
}

/// Blank input is left for the required-field check; anything else must parse.
fn validate_event_time(raw: &str) -> Result<(), CliError> {
    if raw.trim().is_empty() || parse_event_time(raw).is_some() {
        Ok(())
    } else {
        Err(CliError::InvalidDateTime(raw.trim().to_string()))
    }
}

pub fn select_window(events: &[Event], when: EventWindow, now: DateTime<Utc>) -> Vec<Event> {
    match when {
        EventWindow::All => events.to_vec(),
        EventWindow::Upcoming => partition_events(events, now).upcoming,
        EventWindow::Past => partition_events(events, now).past,
    }
}

pub fn format_event_lines(events: &[Event]) -> Vec<String> {
    events
        .iter()
        .map(|event| {
            let when = event
                .starts_at()
                .map_or_else(|| "unscheduled".to_string(), |at| {
                    at.format("%Y-%m-%d %H:%M").to_string()
                });
            let location = event.location.as_deref().unwrap_or_default();
            let line = format!(
                "{}  {when:<16}  {}  {location}",
                short_id(event.id.as_str()),
                fit(event.title(), 28)
            );
            line.trim_end().to_string()
        })
        .collect()
}

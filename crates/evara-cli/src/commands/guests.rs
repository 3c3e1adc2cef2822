use evara_core::models::{GuestDraft, GuestPatch, RsvpStatus};
use evara_core::views::{apply_filter, GuestStats, RsvpFilter};
use evara_core::Guest;

use crate::cli::GuestCommands;
use crate::commands::common::{
    fit, join_words, not_found, print_json, resolve_record, settle, short_id, AppContext,
};
use crate::error::CliError;

pub async fn run_guests(command: GuestCommands, ctx: &AppContext) -> Result<(), CliError> {
    match command {
        GuestCommands::List { rsvp, json } => run_list(&rsvp, json, ctx).await,
        GuestCommands::Add {
            name,
            rsvp,
            dietary,
            plus_one,
        } => run_add(&name, rsvp.as_deref(), dietary, plus_one, ctx).await,
        GuestCommands::Edit {
            id,
            name,
            rsvp,
            dietary,
            plus_one,
        } => {
            let patch = GuestPatch {
                guest_name: name,
                rsvp_status: parse_rsvp(rsvp.as_deref())?,
                dietary_restrictions: dietary,
                plus_one_name: plus_one,
            };
            run_edit(&id, patch, ctx).await
        }
        GuestCommands::Remove { id } => run_remove(&id, ctx).await,
        GuestCommands::Stats { json } => run_stats(json, ctx).await,
    }
}

async fn run_list(rsvp: &str, as_json: bool, ctx: &AppContext) -> Result<(), CliError> {
    let filter: RsvpFilter = rsvp.parse()?;
    let guests = ctx.load_list::<Guest>().await?;
    let visible = apply_filter(&guests.items(), &filter);

    if as_json {
        return print_json(&visible);
    }
    if visible.is_empty() {
        println!("No guests found.");
        return Ok(());
    }
    for line in format_guest_lines(&visible) {
        println!("{line}");
    }
    Ok(())
}

async fn run_add(
    name: &[String],
    rsvp: Option<&str>,
    dietary: Option<String>,
    plus_one: Option<String>,
    ctx: &AppContext,
) -> Result<(), CliError> {
    let guest_name = join_words(name).ok_or(CliError::MissingField("Guest name"))?;
    let draft = GuestDraft {
        guest_name,
        rsvp_status: parse_rsvp(rsvp)?.unwrap_or_default(),
        dietary_restrictions: dietary,
        plus_one_name: plus_one,
    };

    let guests = ctx.load_list::<Guest>().await?;
    let write = guests
        .create(draft)
        .ok_or(CliError::MissingField("Guest name"))?;
    let id = settle(write).await?;
    println!("Added guest {}", short_id(&id));
    Ok(())
}

async fn run_edit(id: &str, patch: GuestPatch, ctx: &AppContext) -> Result<(), CliError> {
    let guests = ctx.load_list::<Guest>().await?;
    let guest = resolve_record(&guests.items(), id)?;
    let write = guests
        .update(&guest.id, patch)
        .ok_or_else(|| not_found::<Guest>(id))?;
    settle(write).await?;
    println!("Updated guest {}", short_id(guest.id.as_str()));
    Ok(())
}

async fn run_remove(id: &str, ctx: &AppContext) -> Result<(), CliError> {
    let guests = ctx.load_list::<Guest>().await?;
    let guest = resolve_record(&guests.items(), id)?;
    let write = guests
        .delete(&guest.id)
        .ok_or_else(|| not_found::<Guest>(id))?;
    settle(write).await?;
    println!("Removed guest {} ({})", short_id(guest.id.as_str()), guest.name());
    Ok(())
}

async fn run_stats(as_json: bool, ctx: &AppContext) -> Result<(), CliError> {
    let guests = ctx.load_list::<Guest>().await?;
    let stats = GuestStats::tally(&guests.items());
    if as_json {
        return print_json(&stats);
    }
    for line in format_stats_lines(&stats) {
        println!("{line}");
    }
    Ok(())
}

fn parse_rsvp(value: Option<&str>) -> Result<Option<RsvpStatus>, CliError> {
    value
        .map(str::parse::<RsvpStatus>)
        .transpose()
        .map_err(CliError::from)
}

pub fn format_guest_lines(guests: &[Guest]) -> Vec<String> {
    guests
        .iter()
        .map(|guest| {
            let rsvp = guest.rsvp_status.map_or("-", RsvpStatus::label);
            let mut line = format!(
                "{}  {}  {rsvp:<9}",
                short_id(guest.id.as_str()),
                fit(guest.name(), 24)
            );
            if let Some(plus_one) = guest.plus_one_name.as_deref() {
                line.push_str(&format!("  +1 {plus_one}"));
            }
            if let Some(dietary) = guest.dietary_restrictions.as_deref() {
                line.push_str(&format!("  [{dietary}]"));
            }
            line.trim_end().to_string()
        })
        .collect()
}

pub fn format_stats_lines(stats: &GuestStats) -> Vec<String> {
    vec![
        format!("Total guests: {}", stats.total),
        format!("Confirmed:    {}", stats.confirmed),
        format!("Pending:      {}", stats.pending),
        format!("Declined:     {}", stats.declined),
        format!("Plus-ones:    {}", stats.plus_ones),
        format!("Headcount:    {}", stats.headcount()),
    ]
}

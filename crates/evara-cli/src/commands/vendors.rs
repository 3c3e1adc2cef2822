use evara_core::models::{VendorDraft, VendorPatch};
use evara_core::views::{apply_filter, service_type_facets, ServiceFilter};
use evara_core::Vendor;

use crate::cli::{VendorCommands, VendorFields};
use crate::commands::common::{
    fit, join_words, not_found, print_json, resolve_record, settle, short_id, AppContext,
};
use crate::error::CliError;

pub async fn run_vendors(command: VendorCommands, ctx: &AppContext) -> Result<(), CliError> {
    match command {
        VendorCommands::List { service, json } => run_list(&service, json, ctx).await,
        VendorCommands::Add {
            name,
            service,
            fields,
        } => {
            let vendor_name = join_words(&name).ok_or(CliError::MissingField("Vendor name"))?;
            run_add(vendor_name, service, fields, ctx).await
        }
        VendorCommands::Edit {
            id,
            name,
            service,
            fields,
        } => {
            let patch = VendorPatch {
                vendor_name: name,
                service_type: service,
                description: fields.description,
                phone_number: fields.phone,
                email: fields.email,
                portfolio_image: fields.image,
            };
            run_edit(&id, patch, ctx).await
        }
        VendorCommands::Remove { id } => run_remove(&id, ctx).await,
        VendorCommands::Services => run_services(ctx).await,
    }
}

async fn run_list(service: &str, as_json: bool, ctx: &AppContext) -> Result<(), CliError> {
    let filter: ServiceFilter = service.parse()?;
    let vendors = ctx.load_list::<Vendor>().await?;
    let visible = apply_filter(&vendors.items(), &filter);

    if as_json {
        return print_json(&visible);
    }
    if visible.is_empty() {
        println!("No vendors found.");
        return Ok(());
    }
    for line in format_vendor_lines(&visible) {
        println!("{line}");
    }
    Ok(())
}

async fn run_add(
    vendor_name: String,
    service_type: String,
    fields: VendorFields,
    ctx: &AppContext,
) -> Result<(), CliError> {
    let draft = VendorDraft {
        vendor_name,
        service_type,
        description: fields.description,
        phone_number: fields.phone,
        email: fields.email,
        portfolio_image: fields.image,
    };

    let vendors = ctx.load_list::<Vendor>().await?;
    let write = vendors
        .create(draft)
        .ok_or(CliError::MissingField("Service type"))?;
    let id = settle(write).await?;
    println!("Added vendor {}", short_id(&id));
    Ok(())
}

async fn run_edit(id: &str, patch: VendorPatch, ctx: &AppContext) -> Result<(), CliError> {
    let vendors = ctx.load_list::<Vendor>().await?;
    let vendor = resolve_record(&vendors.items(), id)?;
    let write = vendors
        .update(&vendor.id, patch)
        .ok_or_else(|| not_found::<Vendor>(id))?;
    settle(write).await?;
    println!("Updated vendor {}", short_id(vendor.id.as_str()));
    Ok(())
}

async fn run_remove(id: &str, ctx: &AppContext) -> Result<(), CliError> {
    let vendors = ctx.load_list::<Vendor>().await?;
    let vendor = resolve_record(&vendors.items(), id)?;
    let write = vendors
        .delete(&vendor.id)
        .ok_or_else(|| not_found::<Vendor>(id))?;
    settle(write).await?;
    println!(
        "Removed vendor {} ({})",
        short_id(vendor.id.as_str()),
        vendor.name()
    );
    Ok(())
}

async fn run_services(ctx: &AppContext) -> Result<(), CliError> {
    let vendors = ctx.load_list::<Vendor>().await?;
    let facets = service_type_facets(&vendors.items());
    if facets.is_empty() {
        println!("No service types yet.");
    }
    for service in facets {
        println!("{service}");
    }
    Ok(())
}

pub fn format_vendor_lines(vendors: &[Vendor]) -> Vec<String> {
    vendors
        .iter()
        .map(|vendor| {
            let contact = [vendor.phone_number.as_deref(), vendor.email.as_deref()]
                .into_iter()
                .flatten()
                .collect::<Vec<_>>()
                .join(", ");
            let line = format!(
                "{}  {}  {}  {contact}",
                short_id(vendor.id.as_str()),
                fit(vendor.name(), 24),
                fit(vendor.service(), 16)
            );
            line.trim_end().to_string()
        })
        .collect()
}

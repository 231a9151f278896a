// SPDX-FileCopyrightText: 2026 Keywarden Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Subcommand handlers. Each handler owns its terminal output; secrets are
//! only printed when explicitly requested with `--reveal`.

use std::path::Path;

use keywarden_core::VaultError;
use keywarden_core::types::{Category, OwnerId, RecordFilter, RecordId};
use keywarden_vault::record::{ExportedRecord, GenerateRequest, NewRecordInput, RecordPatch};
use keywarden_vault::{GeneratorOptions, VaultService};

use crate::{AddArgs, GenArgs, ListArgs};

pub async fn add(
    vault: &VaultService,
    owner: &OwnerId,
    args: AddArgs,
) -> Result<(), VaultError> {
    let password = match args.password {
        Some(password) => password,
        None => read_password_interactive(&args.site)?,
    };

    let category = args
        .category
        .as_deref()
        .map(parse_category)
        .transpose()?;

    let input = NewRecordInput {
        site: args.site,
        site_url: args.url,
        username: args.username,
        email: args.email,
        password,
        notes: args.notes,
        category,
        tags: args
            .tags
            .map(|t| {
                t.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_default(),
        ..Default::default()
    };

    let view = vault.create(owner, input).await?;
    println!(
        "Stored {} ({}) as {} [{}]",
        view.site, view.username, view.id, view.strength
    );
    Ok(())
}

pub async fn show(
    vault: &VaultService,
    owner: &OwnerId,
    id: String,
    reveal: bool,
) -> Result<(), VaultError> {
    let id = RecordId(id);
    if reveal {
        let full = vault.get_for_use(owner, &id).await?;
        print_json(&full)?;
    } else {
        let view = vault.get_display(owner, &id).await?;
        print_json(&view)?;
    }
    Ok(())
}

pub async fn list(
    vault: &VaultService,
    owner: &OwnerId,
    args: ListArgs,
) -> Result<(), VaultError> {
    let filter = RecordFilter {
        category: args.category.as_deref().map(parse_category).transpose()?,
        favorites_only: args.favorites,
        weak_only: args.weak,
        older_than_days: args.older_than,
        search: args.search,
    };

    let records = vault.list(owner, &filter).await?;
    if args.json {
        print_json(&records)?;
        return Ok(());
    }

    if records.is_empty() {
        println!("No records.");
        return Ok(());
    }
    println!(
        "{:<38} {:<24} {:<20} {:<13} {:<11} {:>4}  {}",
        "ID", "SITE", "USERNAME", "CATEGORY", "STRENGTH", "AGE", "FAV"
    );
    for view in &records {
        println!(
            "{:<38} {:<24} {:<20} {:<13} {:<11} {:>4}  {}",
            view.id,
            view.site,
            view.username,
            view.category,
            view.strength,
            view.age_days,
            if view.is_favorite { "*" } else { "" }
        );
    }
    Ok(())
}

pub async fn rm(vault: &VaultService, owner: &OwnerId, id: String) -> Result<(), VaultError> {
    let id = RecordId(id);
    vault.delete(owner, &id).await?;
    println!("Deleted {id}");
    Ok(())
}

pub async fn favorite(
    vault: &VaultService,
    owner: &OwnerId,
    id: String,
) -> Result<(), VaultError> {
    let id = RecordId(id);
    let is_favorite = vault.toggle_favorite(owner, &id).await?;
    println!(
        "{id} is {} a favorite",
        if is_favorite { "now" } else { "no longer" }
    );
    Ok(())
}

pub fn generate(vault: &VaultService, args: GenArgs) -> Result<(), VaultError> {
    let response = vault.generate(&GenerateRequest {
        length: args.length,
        options: GeneratorOptions {
            include_uppercase: !args.no_upper,
            include_lowercase: !args.no_lower,
            include_numbers: !args.no_digits,
            include_symbols: !args.no_symbols,
        },
    })?;
    println!("{}", response.password);
    eprintln!("strength: {}", response.strength);
    Ok(())
}

pub async fn stats(vault: &VaultService, owner: &OwnerId) -> Result<(), VaultError> {
    let stats = vault.security_stats(owner).await?;
    print_json(&stats)
}

pub async fn export(
    vault: &VaultService,
    owner: &OwnerId,
    output: Option<String>,
) -> Result<(), VaultError> {
    let exported = vault.export(owner).await?;
    let json = serde_json::to_string_pretty(&exported)
        .map_err(|e| VaultError::Internal(format!("failed to serialize export: {e}")))?;
    match output {
        Some(path) => {
            std::fs::write(&path, json).map_err(|e| {
                VaultError::Internal(format!("failed to write export to {path}: {e}"))
            })?;
            eprintln!("Exported {} records to {path}", exported.len());
        }
        None => println!("{json}"),
    }
    Ok(())
}

pub async fn import(
    vault: &VaultService,
    owner: &OwnerId,
    input: String,
) -> Result<(), VaultError> {
    let json = std::fs::read_to_string(Path::new(&input))
        .map_err(|e| VaultError::Internal(format!("failed to read {input}: {e}")))?;
    let entries: Vec<ExportedRecord> = serde_json::from_str(&json)
        .map_err(|e| VaultError::Validation(format!("invalid import file: {e}")))?;

    let report = vault.import(owner, entries).await?;
    println!("Imported {} records", report.imported);
    for error in &report.errors {
        eprintln!("  entry {}: {}", error.index, error.message);
    }
    Ok(())
}

pub async fn compromised(
    vault: &VaultService,
    owner: &OwnerId,
    id: String,
    clear: bool,
) -> Result<(), VaultError> {
    let id = RecordId(id);
    vault
        .update(
            owner,
            &id,
            RecordPatch {
                compromised: Some(!clear),
                ..Default::default()
            },
        )
        .await?;
    println!(
        "{id} marked {}",
        if clear { "not compromised" } else { "compromised" }
    );
    Ok(())
}

fn parse_category(s: &str) -> Result<Category, VaultError> {
    s.parse()
        .map_err(|_| VaultError::Validation(format!("unknown category: {s}")))
}

fn read_password_interactive(site: &str) -> Result<String, VaultError> {
    if !std::io::IsTerminal::is_terminal(&std::io::stdin()) {
        return Err(VaultError::Validation(
            "no password provided; pass --password or run interactively".to_string(),
        ));
    }
    eprint!("Password for {site}: ");
    let password = rpassword::read_password()
        .map_err(|e| VaultError::Internal(format!("failed to read password: {e}")))?;
    if password.is_empty() {
        return Err(VaultError::Validation("empty password not allowed".to_string()));
    }
    Ok(password)
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), VaultError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| VaultError::Internal(format!("failed to serialize output: {e}")))?;
    println!("{json}");
    Ok(())
}

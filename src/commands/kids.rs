use std::path::Path;

use jiff::civil::Date;
use serde_json::json;

use super::{CommandOutput, ListOptions, Session, list_command, mutation_output, submit_form};
use crate::cli::OutputOptions;
use crate::error::Result;
use crate::form::{FormController, GrowthEntryForm, KidForm};
use crate::gateway::ResourceGateway;
use crate::model::{Gender, Kid};
use crate::types::RecordId;

pub async fn cmd_kids_ls(options: ListOptions) -> Result<()> {
    list_command::<Kid>(options).await
}

pub async fn cmd_kids_add(
    name: String,
    born: Option<Date>,
    gender: Option<Gender>,
    output: OutputOptions,
) -> Result<()> {
    let session = Session::open()?;
    let mut form = FormController::<KidForm>::new();
    form.open_create(session.today);
    form.edit(|values| {
        values.name = name;
        values.birth_date = born;
        values.gender = gender;
    });
    let outcome = submit_form(&session, &mut form).await?;
    mutation_output::<Kid>("created", outcome, &session.i18n)?.print(output)
}

/// Edit a kid. Only the flags given are changed.
pub async fn cmd_kids_edit(
    id: &str,
    name: Option<String>,
    born: Option<Date>,
    gender: Option<Gender>,
    output: OutputOptions,
) -> Result<()> {
    let session = Session::open()?;
    let kid = session.gateway.fetch_one::<Kid>(&RecordId::from(id)).await?;

    let mut form = FormController::<KidForm>::new();
    form.open_edit(&kid);
    form.edit(|values| {
        if let Some(name) = name {
            values.name = name;
        }
        if born.is_some() {
            values.birth_date = born;
        }
        if gender.is_some() {
            values.gender = gender;
        }
    });
    let outcome = submit_form(&session, &mut form).await?;
    mutation_output::<Kid>("updated", outcome, &session.i18n)?.print(output)
}

pub async fn cmd_kids_growth(
    id: &str,
    date: Option<Date>,
    height: Option<f64>,
    weight: Option<f64>,
    output: OutputOptions,
) -> Result<()> {
    let session = Session::open()?;
    let mut form = GrowthEntryForm::new(session.today);
    if date.is_some() {
        form.date = date;
    }
    form.height_cm = height;
    form.weight_kg = weight;
    let entry = form.build(session.today)?;

    let kid = session
        .gateway
        .append_growth(&RecordId::from(id), &entry)
        .await?;

    CommandOutput::new(json!({ "kid_id": id, "entry": entry, "kid": kid }))
        .with_text(format!("Recorded growth for kid {id} on {}", entry.date))
        .print(output)
}

pub async fn cmd_kids_avatar(id: &str, file: &Path, output: OutputOptions) -> Result<()> {
    let session = Session::open()?;
    let kid = session
        .gateway
        .upload_kid_avatar(&RecordId::from(id), file)
        .await?;
    let avatar_url = kid.as_ref().and_then(|k| k.avatar_url.clone());

    let mut text = format!("Updated avatar of kid {id}");
    if let Some(url) = &avatar_url {
        text.push_str(&format!("\n{url}"));
    }
    CommandOutput::new(json!({ "kid_id": id, "avatar_url": avatar_url }))
        .with_text(text)
        .print(output)
}

use jiff::civil::Date;

use super::{
    ListOptions, Session, delete_command, list_command, mutation_output, submit_form,
};
use crate::cli::OutputOptions;
use crate::error::Result;
use crate::form::{FormController, MilestoneForm};
use crate::gateway::ResourceGateway;
use crate::model::Milestone;
use crate::types::RecordId;

pub async fn cmd_milestones_ls(options: ListOptions) -> Result<()> {
    list_command::<Milestone>(options).await
}

pub async fn cmd_milestones_add(
    kid: String,
    title: String,
    description: Option<String>,
    category: Option<String>,
    on: Option<Date>,
    output: OutputOptions,
) -> Result<()> {
    let session = Session::open()?;
    let mut form = FormController::<MilestoneForm>::new();
    form.open_create(session.today);
    form.edit(|values| {
        values.kid_id = Some(RecordId::from(kid));
        values.title = title;
        values.description = description.unwrap_or_default();
        values.category = category.unwrap_or_default();
        if on.is_some() {
            values.achieved_on = on;
        }
    });
    let outcome = submit_form(&session, &mut form).await?;
    mutation_output::<Milestone>("created", outcome, &session.i18n)?.print(output)
}

pub async fn cmd_milestones_edit(
    id: &str,
    title: Option<String>,
    description: Option<String>,
    category: Option<String>,
    on: Option<Date>,
    output: OutputOptions,
) -> Result<()> {
    let session = Session::open()?;
    let milestone = session
        .gateway
        .fetch_one::<Milestone>(&RecordId::from(id))
        .await?;

    let mut form = FormController::<MilestoneForm>::new();
    form.open_edit(&milestone);
    form.edit(|values| {
        if let Some(title) = title {
            values.title = title;
        }
        if let Some(description) = description {
            values.description = description;
        }
        if let Some(category) = category {
            values.category = category;
        }
        if on.is_some() {
            values.achieved_on = on;
        }
    });
    let outcome = submit_form(&session, &mut form).await?;
    mutation_output::<Milestone>("updated", outcome, &session.i18n)?.print(output)
}

pub async fn cmd_milestones_rm(id: &str, output: OutputOptions) -> Result<()> {
    delete_command::<Milestone>(id, output).await
}

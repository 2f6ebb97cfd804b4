pub mod calendar;
pub mod cli;
pub mod commands;
pub mod config;
pub mod controller;
pub mod display;
pub mod error;
pub mod filter;
pub mod form;
pub mod gateway;
pub mod locale;
pub mod media;
pub mod model;
pub mod paths;
pub mod query;
pub mod search;
pub mod types;
pub mod upload;

pub use config::Config;
pub use controller::{Banner, FetchCommit, FetchTicket, ListController};
pub use error::{ErrorKind, FieldErrors, KeepsakeError, Result};
pub use form::{FormController, FormMode, FormModel};
pub use gateway::{HttpGateway, MutationIntent, MutationOutcome, ResourceGateway};
pub use model::{Payload, Record};
pub use query::{QuerySpec, QueryState, ResourcePage, SortSpec};
pub use types::{ApiPath, ListMode, RecordId, ResourceKind};

//! Subcommands of the `cdb` binary.

use cdb_server::middleware::OpenApiConfig;
use cdb_server::service::ComputerDraft;
use clap::{Args, Subcommand};
use jiff::civil::Date;

use super::ServerConfig;
use crate::console::parse_date;

/// Action run by the binary.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Serves the JSON API until a shutdown signal arrives.
    Serve(ServeArgs),
    /// Applies pending database migrations and exits.
    Migrate,
    /// Prints one page of computers.
    ListComputers(ListComputersArgs),
    /// Prints one page of companies.
    ListCompanies(PageArgs),
    /// Prints the details of a computer.
    ShowComputer {
        /// ID of the computer.
        id: i64,
    },
    /// Creates a computer.
    AddComputer(ComputerArgs),
    /// Replaces every field of a computer.
    UpdateComputer(UpdateComputerArgs),
    /// Deletes one or more computers.
    DeleteComputer {
        /// IDs of the computers.
        #[arg(required = true, num_args = 1..)]
        ids: Vec<i64>,
    },
    /// Deletes a company and every computer it introduced.
    DeleteCompany {
        /// ID of the company.
        id: i64,
    },
}

/// Arguments of the `serve` command.
#[derive(Debug, Clone, Args)]
pub struct ServeArgs {
    /// Server network and lifecycle configuration.
    #[clap(flatten)]
    pub server: ServerConfig,

    /// OpenAPI documentation paths.
    #[clap(flatten)]
    pub openapi: OpenApiConfig,
}

/// Page selection of the console listings.
#[derive(Debug, Default, Clone, Copy, Args)]
pub struct PageArgs {
    /// Zero-based page number.
    #[arg(long, default_value_t = 0)]
    pub page: i64,

    /// Number of rows per page; the configured default when omitted.
    #[arg(long)]
    pub page_size: Option<i64>,
}

/// Arguments of the `list-computers` command.
#[derive(Debug, Default, Clone, Args)]
pub struct ListComputersArgs {
    /// Case-insensitive search on computer and company names.
    #[arg(long, default_value = "")]
    pub search: String,

    /// Column to sort by: name, introduced, discontinued or company.
    #[arg(long)]
    pub sort: Option<String>,

    /// Sort direction: asc or desc.
    #[arg(long)]
    pub order: Option<String>,

    #[clap(flatten)]
    pub page: PageArgs,
}

/// Fields of a computer entered on the console.
#[derive(Debug, Default, Clone, Args)]
pub struct ComputerArgs {
    /// Display name.
    #[arg(long)]
    pub name: String,

    /// Introduction date, `DD/MM/YYYY`.
    #[arg(long, value_parser = parse_date)]
    pub introduced: Option<Date>,

    /// Discontinuation date, `DD/MM/YYYY`.
    #[arg(long, value_parser = parse_date)]
    pub discontinued: Option<Date>,

    /// ID of the company that introduced the computer.
    #[arg(long)]
    pub company_id: Option<i64>,
}

impl ComputerArgs {
    /// Converts the arguments into a draft for the catalog.
    pub fn into_draft(self) -> ComputerDraft {
        ComputerDraft::new(self.name)
            .with_introduced(self.introduced)
            .with_discontinued(self.discontinued)
            .with_company_id(self.company_id)
    }
}

/// Arguments of the `update-computer` command.
#[derive(Debug, Clone, Args)]
pub struct UpdateComputerArgs {
    /// ID of the computer to replace.
    pub id: i64,

    #[clap(flatten)]
    pub computer: ComputerArgs,
}

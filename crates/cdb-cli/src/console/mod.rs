//! Console commands over the catalog.
//!
//! Output goes to any [`Write`] so the commands can be exercised without a
//! terminal. Caller mistakes, missing records and broken business rules are
//! printed and reported as [`Status::Rejected`]; store failures are errors.

mod dates;
mod printer;

use std::io::Write;

use anyhow::Context;
use cdb_postgres::types::{ComputerSortBy, PageRequest};
use cdb_server::service::{Catalog, ListingConfig, ListingRequest, Validated, ValidationResult};
use cdb_server::{Error, ErrorKind};

pub use self::dates::parse_date;
pub use self::printer::{company_line, computer_detail, computer_line};
use crate::config::{Command, ComputerArgs, ListComputersArgs, PageArgs, UpdateComputerArgs};

/// Tracing target for console commands.
pub const TRACING_TARGET_CONSOLE: &str = "cdb_cli::console";

/// Outcome of a console command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// The command did what was asked.
    Done,
    /// The command was refused; the reason has been printed.
    Rejected,
}

/// Runs console commands against a catalog.
#[derive(Debug)]
pub struct Console<W> {
    catalog: Catalog,
    listing: ListingConfig,
    out: W,
}

impl<W: Write> Console<W> {
    /// Creates a console writing to `out`.
    pub fn new(catalog: Catalog, listing: ListingConfig, out: W) -> Self {
        Self {
            catalog,
            listing,
            out,
        }
    }

    /// Returns the output sink.
    pub fn into_inner(self) -> W {
        self.out
    }

    /// Runs a console command; `serve` and `migrate` are not console commands.
    pub async fn run(&mut self, command: Command) -> anyhow::Result<Status> {
        tracing::debug!(target: TRACING_TARGET_CONSOLE, command = ?command, "running command");

        let result = match command {
            Command::ListComputers(args) => self.list_computers(args).await,
            Command::ListCompanies(args) => self.list_companies(args).await,
            Command::ShowComputer { id } => self.show_computer(id).await,
            Command::AddComputer(args) => self.add_computer(args).await,
            Command::UpdateComputer(args) => self.update_computer(args).await,
            Command::DeleteComputer { ids } => self.delete_computers(&ids).await,
            Command::DeleteCompany { id } => self.delete_company(id).await,
            Command::Serve(_) | Command::Migrate => {
                anyhow::bail!("not a console command")
            }
        };

        match result {
            Ok(status) => Ok(status),
            Err(error) => self.reject(error),
        }
    }

    async fn list_computers(&mut self, args: ListComputersArgs) -> Result<Status, CommandError> {
        let page = self.page_request(args.page)?;
        let request = ListingRequest::new(page.page, page.page_size)
            .with_search(&args.search)
            .with_sort_by(ComputerSortBy::resolve(
                args.sort.as_deref(),
                args.order.as_deref(),
            ));

        let page = self.catalog.list_computers(&request).await?;

        writeln!(self.out, "Here is the list of computers")?;
        for computer in &page.elements {
            writeln!(self.out, "{}", computer_line(computer))?;
        }
        self.write_footer(page.current_page, page.total_pages, page.total_elements)?;
        Ok(Status::Done)
    }

    async fn list_companies(&mut self, args: PageArgs) -> Result<Status, CommandError> {
        let page = self.page_request(args)?;
        let page = self.catalog.list_companies(page).await?;

        writeln!(self.out, "Here is the list of companies")?;
        for company in &page.elements {
            writeln!(self.out, "{}", company_line(company))?;
        }
        self.write_footer(page.current_page, page.total_pages, page.total_elements)?;
        Ok(Status::Done)
    }

    async fn show_computer(&mut self, id: i64) -> Result<Status, CommandError> {
        match self.catalog.get_computer(id).await? {
            Some(computer) => {
                writeln!(self.out, "{}", computer_detail(&computer))?;
                Ok(Status::Done)
            }
            None => {
                writeln!(self.out, "Computer {id} does not exist")?;
                Ok(Status::Rejected)
            }
        }
    }

    async fn add_computer(&mut self, args: ComputerArgs) -> Result<Status, CommandError> {
        match self.catalog.create_computer(&args.into_draft()).await? {
            Validated::Valid(id) => {
                writeln!(self.out, "Computer {id} was inserted successfully")?;
                Ok(Status::Done)
            }
            Validated::Invalid(result) => self.write_validation(&result),
        }
    }

    async fn update_computer(&mut self, args: UpdateComputerArgs) -> Result<Status, CommandError> {
        let draft = args.computer.into_draft().with_id(args.id);
        match self.catalog.update_computer(&draft).await? {
            Validated::Valid(()) => {
                writeln!(self.out, "Computer {} was updated successfully", args.id)?;
                Ok(Status::Done)
            }
            Validated::Invalid(result) => self.write_validation(&result),
        }
    }

    async fn delete_computers(&mut self, ids: &[i64]) -> Result<Status, CommandError> {
        if let [id] = ids {
            let computer = self.catalog.delete_computer(*id).await?;
            writeln!(self.out, "{} was deleted successfully", computer_line(&computer))?;
        } else {
            let deleted = self.catalog.delete_computers(ids).await?;
            writeln!(self.out, "{deleted} computer(s) were deleted successfully")?;
        }
        Ok(Status::Done)
    }

    async fn delete_company(&mut self, id: i64) -> Result<Status, CommandError> {
        let company = self.catalog.delete_company(id).await?;
        writeln!(self.out, "{} was deleted successfully", company_line(&company))?;
        Ok(Status::Done)
    }

    fn page_request(&self, args: PageArgs) -> Result<PageRequest, CommandError> {
        let page_size = self.listing.page_size(args.page_size)?;
        Ok(PageRequest::new(args.page, page_size))
    }

    fn write_footer(&mut self, page: i64, pages: i64, total: i64) -> Result<(), CommandError> {
        if pages > 1 {
            writeln!(self.out, "Page {page} of pages 0 to {} ({total} in total)", pages - 1)?;
        }
        Ok(())
    }

    fn write_validation(&mut self, result: &ValidationResult) -> Result<Status, CommandError> {
        for (field, message) in result.iter() {
            writeln!(self.out, "{field}: {message}")?;
        }
        Ok(Status::Rejected)
    }

    fn reject(&mut self, error: CommandError) -> anyhow::Result<Status> {
        match error {
            CommandError::Service(error) if error.kind().is_expected() => {
                tracing::debug!(target: TRACING_TARGET_CONSOLE, error = %error, "command rejected");
                writeln!(self.out, "{}", error.message())?;
                Ok(Status::Rejected)
            }
            CommandError::Service(error) if error.kind() == ErrorKind::Store => {
                Err(error).context("the catalog store failed")
            }
            CommandError::Service(error) => Err(error.into()),
            CommandError::Output(error) => Err(error).context("failed to write console output"),
        }
    }
}

/// Failure of a single console command.
#[derive(Debug, thiserror::Error)]
enum CommandError {
    #[error(transparent)]
    Service(#[from] Error),
    #[error(transparent)]
    Output(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use cdb_server::service::{FixedClock, MemoryStore, ServiceState};
    use jiff::civil::date;

    use super::*;

    fn console(store: &MemoryStore) -> Console<Vec<u8>> {
        let clock = Arc::new(FixedClock(date(2024, 6, 1)));
        let state = ServiceState::from_store(store.clone(), ListingConfig::default(), clock);
        Console::new(state.catalog, state.listing, Vec::new())
    }

    async fn run(store: &MemoryStore, command: Command) -> (Status, String) {
        let mut console = console(store);
        let status = console.run(command).await.expect("console command failed");
        let output = String::from_utf8(console.into_inner()).expect("output is not utf-8");
        (status, output)
    }

    fn computer(name: &str) -> ComputerArgs {
        ComputerArgs {
            name: name.to_owned(),
            ..ComputerArgs::default()
        }
    }

    #[tokio::test]
    async fn add_then_list_computers() {
        let store = MemoryStore::new();
        let apple = store.insert_company("Apple").await;

        let args = ComputerArgs {
            introduced: Some(date(1977, 4, 1)),
            discontinued: Some(date(1993, 10, 1)),
            company_id: Some(apple.id),
            ..computer("Apple II")
        };
        let (status, output) = run(&store, Command::AddComputer(args)).await;
        assert_eq!(status, Status::Done);
        assert!(output.ends_with("was inserted successfully\n"));

        let (_, output) = run(&store, Command::ListComputers(ListComputersArgs::default())).await;
        let lines: Vec<_> = output.lines().collect();
        assert_eq!(lines[0], "Here is the list of computers");
        assert!(lines[1].ends_with(
            " - Apple II. Introduced at 01/04/1977. Discontinued at 01/10/1993. \
             It was created by Apple."
        ));
    }

    #[tokio::test]
    async fn validation_errors_print_one_line_per_field() {
        let store = MemoryStore::new();
        let args = ComputerArgs {
            introduced: Some(date(1965, 1, 1)),
            company_id: Some(9),
            ..computer("")
        };

        let (status, output) = run(&store, Command::AddComputer(args)).await;
        assert_eq!(status, Status::Rejected);
        assert_eq!(
            output,
            "company: Company which introduced the computer does not exist\n\
             introduced: Introduction date must be empty or a valid date!\n\
             name: Name should be filled!\n"
        );
    }

    #[tokio::test]
    async fn missing_computers_are_reported() {
        let store = MemoryStore::new();

        let (status, output) = run(&store, Command::ShowComputer { id: 42 }).await;
        assert_eq!(status, Status::Rejected);
        assert_eq!(output, "Computer 42 does not exist\n");

        let (status, output) = run(&store, Command::DeleteComputer { ids: vec![42] }).await;
        assert_eq!(status, Status::Rejected);
        assert_eq!(output, "Computer 42 does not exist\n");
    }

    #[tokio::test]
    async fn show_computer_prints_details() {
        let store = MemoryStore::new();
        let args = ComputerArgs {
            introduced: Some(date(1983, 1, 19)),
            ..computer("Lisa")
        };
        run(&store, Command::AddComputer(args)).await;

        let (_, listing) = run(&store, Command::ListComputers(ListComputersArgs::default())).await;
        let id: i64 = listing.lines().nth(1).and_then(|l| l.split(" - ").next())
            .and_then(|id| id.parse().ok())
            .expect("listing has no computer");

        let (status, output) = run(&store, Command::ShowComputer { id }).await;
        assert_eq!(status, Status::Done);
        assert_eq!(output, format!("Computer : {id} - Lisa\nIntroduced at 19/01/1983\n"));
    }

    #[tokio::test]
    async fn out_of_range_pages_are_rejected() {
        let store = MemoryStore::new();
        let args = ListComputersArgs {
            page: PageArgs {
                page: 3,
                page_size: None,
            },
            ..ListComputersArgs::default()
        };

        let (status, output) = run(&store, Command::ListComputers(args)).await;
        assert_eq!(status, Status::Rejected);
        assert!(!output.is_empty());
    }

    #[tokio::test]
    async fn deleting_a_company_prints_it() {
        let store = MemoryStore::new();
        let rca = store.insert_company("RCA").await;

        let (status, output) = run(&store, Command::DeleteCompany { id: rca.id }).await;
        assert_eq!(status, Status::Done);
        assert_eq!(output, format!("{} - RCA. was deleted successfully\n", rca.id));

        let (_, output) = run(&store, Command::ListCompanies(PageArgs::default())).await;
        assert_eq!(output, "Here is the list of companies\n");
    }

    #[tokio::test]
    async fn store_failures_are_errors() {
        let store = MemoryStore::new();
        store.set_unavailable(true);

        let mut console = console(&store);
        let result = console
            .run(Command::ListCompanies(PageArgs::default()))
            .await;
        assert!(result.is_err());
    }
}

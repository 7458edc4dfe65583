//! library-admin - command line front end for the library backend
//!
//! Every command maps to one service call; failures exit with the error's
//! numeric code.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use chrono::{Local, NaiveDate};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use library_admin::{
    client::HttpBackend,
    config::{AppConfig, LoggingConfig},
    models::{dates::format_calendar_date, IssueFilter, IssueQuery},
    report::{self, SortColumn},
    services::Services,
    AppError, AppResult,
};

const HELP: &str = "\
library-admin - library administration client

USAGE:
  library-admin <COMMAND> [OPTIONS]

COMMANDS:
  issues [--status all|active] [--search S] [--sort COL]
  export-csv [--out PATH]
  overdue
  stats
  issue --book ID --customer ID
  return ID
  extend ID
  exhibition ID
  exhibition-add ID BOOK
  exhibition-remove ID BOOK
  exhibition-order ID BOOK...
  due-date YYYY-MM-DD [--extended]

Sort columns: id, book, customer, issued, due, returned, status
";

#[derive(Debug)]
enum Command {
    Issues { query: IssueQuery, sort: Option<SortColumn> },
    ExportCsv { out: Option<PathBuf> },
    Overdue,
    Stats,
    Issue { book: String, customer: String },
    Return { id: i64 },
    Extend { id: i64 },
    Exhibition { id: i64 },
    ExhibitionAdd { id: i64, book: String },
    ExhibitionRemove { id: i64, book: String },
    ExhibitionOrder { id: i64, books: Vec<String> },
    DueDate { issued: NaiveDate, extended: bool },
}

fn bad_args(e: pico_args::Error) -> AppError {
    AppError::BadRequest(e.to_string())
}

fn parse_args(mut args: pico_args::Arguments) -> AppResult<Command> {
    let name: String = args
        .subcommand()
        .map_err(bad_args)?
        .ok_or_else(|| AppError::BadRequest("Missing command".to_string()))?;

    let command = match name.as_str() {
        "issues" => {
            let status: Option<IssueFilter> = args.opt_value_from_str("--status").map_err(bad_args)?;
            let search: Option<String> = args.opt_value_from_str("--search").map_err(bad_args)?;
            let sort: Option<SortColumn> = args.opt_value_from_str("--sort").map_err(bad_args)?;
            Command::Issues {
                query: IssueQuery {
                    status: status.unwrap_or_default(),
                    search: search.filter(|s| !s.is_empty()),
                    customer_id: None,
                },
                sort,
            }
        }
        "export-csv" => Command::ExportCsv {
            out: args.opt_value_from_str("--out").map_err(bad_args)?,
        },
        "overdue" => Command::Overdue,
        "stats" => Command::Stats,
        "issue" => Command::Issue {
            book: args.value_from_str("--book").map_err(bad_args)?,
            customer: args.value_from_str("--customer").map_err(bad_args)?,
        },
        "return" => Command::Return {
            id: args.free_from_str().map_err(bad_args)?,
        },
        "extend" => Command::Extend {
            id: args.free_from_str().map_err(bad_args)?,
        },
        "exhibition" => Command::Exhibition {
            id: args.free_from_str().map_err(bad_args)?,
        },
        "exhibition-add" => Command::ExhibitionAdd {
            id: args.free_from_str().map_err(bad_args)?,
            book: args.free_from_str().map_err(bad_args)?,
        },
        "exhibition-remove" => Command::ExhibitionRemove {
            id: args.free_from_str().map_err(bad_args)?,
            book: args.free_from_str().map_err(bad_args)?,
        },
        "exhibition-order" => {
            let id = args.free_from_str().map_err(bad_args)?;
            let books = args
                .finish()
                .into_iter()
                .map(|s| s.to_string_lossy().into_owned())
                .collect();
            return Ok(Command::ExhibitionOrder { id, books });
        }
        "due-date" => {
            let extended = args.contains("--extended");
            let issued: String = args.free_from_str().map_err(bad_args)?;
            let issued = NaiveDate::parse_from_str(&issued, "%Y-%m-%d")
                .map_err(|_| AppError::BadRequest(format!("Invalid date: {}", issued)))?;
            Command::DueDate { issued, extended }
        }
        other => return Err(AppError::BadRequest(format!("Unknown command: {}", other))),
    };

    let rest = args.finish();
    if !rest.is_empty() {
        return Err(AppError::BadRequest(format!("Unexpected arguments: {:?}", rest)));
    }
    Ok(command)
}

fn init_tracing(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("library_admin={}", logging.level).into());

    let registry = tracing_subscriber::registry().with(filter);
    if logging.format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let mut args = pico_args::Arguments::from_env();
    if args.contains(["-h", "--help"]) {
        print!("{}", HELP);
        return Ok(());
    }

    let config = AppConfig::load().context("Failed to load configuration")?;
    init_tracing(&config.logging);

    tracing::info!("Starting library-admin v{}", env!("CARGO_PKG_VERSION"));

    let result = match parse_args(args) {
        Ok(command) => run(command, &config).await,
        Err(e) => {
            eprint!("{}", HELP);
            Err(e)
        }
    };

    if let Err(e) = result {
        tracing::error!("{}", e);
        eprintln!("error: {}", e);
        std::process::exit(e.code() as i32);
    }
    Ok(())
}

async fn run(command: Command, config: &AppConfig) -> AppResult<()> {
    let today = Local::now().date_naive();
    let backend = Arc::new(HttpBackend::new(&config.api)?);
    let services = Services::new(backend, config);
    let loans = &services.loans;

    match command {
        Command::Issues { query, sort } => {
            let mut view = loans.load(query).await?;
            if let Some(column) = sort {
                view = loans.resort(view, column);
            }
            println!(
                "{:>6}  {:<30}  {:<20}  {:<10}  {:<10}  {:<10}  {}",
                "ID", "Book", "Customer", "Issued", "Due", "Returned", "Status"
            );
            for issue in &view.issues {
                let overdue = if loans.is_overdue(issue, today) { " OVERDUE" } else { "" };
                println!(
                    "{:>6}  {:<30}  {:<20}  {:<10}  {:<10}  {:<10}  {}{}",
                    issue.id,
                    issue.book_title,
                    issue.customer_name,
                    show_date(issue.date_issued),
                    show_date(loans.due_date(issue)),
                    issue.date_return.map(format_calendar_date).unwrap_or_default(),
                    issue.status,
                    overdue
                );
            }
        }
        Command::ExportCsv { out } => {
            let view = loans.load(IssueQuery::default()).await?;
            let path = out.unwrap_or_else(|| PathBuf::from(report::export_file_name(today)));
            loans.write_csv(&view, &path).await?;
            println!("{}", path.display());
        }
        Command::Overdue => {
            let view = loans
                .load(IssueQuery {
                    status: IssueFilter::Active,
                    ..Default::default()
                })
                .await?;
            for row in loans.overdue_report(&view, today) {
                println!(
                    "{:>6}  {:<30}  {:<20}  due {}  {} days overdue",
                    row.issue_id,
                    row.book_title,
                    row.customer_name,
                    show_date(row.due_date),
                    row.days_overdue
                );
            }
        }
        Command::Stats => {
            let view = loans.load(IssueQuery::default()).await?;
            let stats = loans.statistics(&view, today);
            println!("Total:       {}", stats.total);
            println!("Outstanding: {}", stats.outstanding);
            println!("Returned:    {}", stats.returned);
            println!("Overdue:     {}", stats.overdue);
            println!("Extended:    {}", stats.extended);
        }
        Command::Issue { book, customer } => {
            loans.issue_book(&book, &customer).await?;
            println!("Book {} issued to {}", book, customer);
        }
        Command::Return { id } => {
            let view = loans.load(IssueQuery::default()).await?;
            loans.return_issue(&view, id, today).await?;
            println!("Issue {} returned", id);
        }
        Command::Extend { id } => {
            let view = loans.load(IssueQuery::default()).await?;
            let view = loans.extend_issue(&view, id).await?;
            let issue = view.find(id)?;
            println!("Issue {} now due {}", id, show_date(loans.due_date(issue)));
        }
        Command::Exhibition { id } => {
            let session = services.exhibitions.open(id).await?;
            println!("{} ({} books)", session.exhibition.title, session.order().len());
            for (position, book) in session.books().iter().enumerate() {
                println!(
                    "{:>3}. {:<12} {}{}",
                    position + 1,
                    book.id,
                    book.title,
                    book.authors
                        .display_name()
                        .map(|a| format!(" / {}", a))
                        .unwrap_or_default()
                );
            }
        }
        Command::ExhibitionAdd { id, book } => {
            let mut session = services.exhibitions.open(id).await?;
            let book = services.catalog.get_book(&book).await?;
            services.exhibitions.add_book(&mut session, book).await?;
            println!("{} books in exhibition {}", session.order().len(), id);
        }
        Command::ExhibitionRemove { id, book } => {
            let mut session = services.exhibitions.open(id).await?;
            services.exhibitions.remove_book(&mut session, &book).await?;
            println!("{} books in exhibition {}", session.order().len(), id);
        }
        Command::ExhibitionOrder { id, books } => {
            let mut session = services.exhibitions.open(id).await?;
            services.exhibitions.reorder(&mut session, books.as_slice()).await?;
            println!("Saved order of exhibition {}", id);
        }
        Command::DueDate { issued, extended } => {
            let due = loans.policy().due_date(Some(issued), extended);
            println!("{}", show_date(due));
        }
    }
    Ok(())
}

fn show_date(date: Option<NaiveDate>) -> String {
    date.map(format_calendar_date)
        .unwrap_or_else(|| "unknown".to_string())
}

use crate::cli::{
    CatalogCommand, Command, OutputArgs, PageArgs, ProductCommand, ReportCommand,
    SubscriptionCommand,
};
use domain::api::PaginationParams;
use domain::catalog::{self, Command as CatalogLifecycle};
use domain::catalogs::CatalogUpload;
use domain::link_analysis::LinkAnalysisRequest;
use domain::subscriptions::CheckoutRequest;
use domain::users::{LoginCredentials, RegisterData};
use domain::{auth, link_analyzer, product, report, subscription, Gateway};
use log::*;
use serde::Serialize;
use std::error::Error as StdError;
use std::fmt;
use std::path::Path;
use tokio::io::AsyncWriteExt;

/// Anything that stops a command from completing.
#[derive(Debug)]
pub enum CliError {
    Domain(domain::error::Error),
    Io(std::io::Error),
    Output(serde_json::Error),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CliError::Domain(err) => write!(f, "{err}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Output(err) => write!(f, "Failed to format output: {err}"),
        }
    }
}

impl StdError for CliError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            CliError::Domain(err) => Some(err),
            CliError::Io(err) => Some(err),
            CliError::Output(err) => Some(err),
        }
    }
}

impl From<domain::error::Error> for CliError {
    fn from(err: domain::error::Error) -> Self {
        CliError::Domain(err)
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::Io(err)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        CliError::Output(err)
    }
}

pub async fn run(command: Command, gateway: &Gateway) -> Result<(), CliError> {
    match command {
        Command::Login { email, password } => {
            let user = auth::login(gateway, &LoginCredentials { email, password }).await?;
            print_json(&user)
        }
        Command::Register {
            name,
            email,
            password,
        } => {
            let data = RegisterData {
                name,
                email,
                password,
            };
            print_json(&auth::register(gateway, &data).await?)
        }
        Command::Logout => {
            auth::logout(gateway).await?;
            info!("Logged out");
            Ok(())
        }
        Command::Whoami => print_json(&auth::current_user(gateway).await?),
        Command::Dashboard => print_json(&report::dashboard_stats(gateway).await?),
        Command::Catalogs(command) => run_catalog(command, gateway).await,
        Command::Products(command) => run_product(command, gateway).await,
        Command::Reports(command) => run_report(command, gateway).await,
        Command::Subscription(command) => run_subscription(command, gateway).await,
        Command::AnalyzeLinks {
            mut links,
            from_file,
            cost,
            tax_rate,
            extra_costs,
        } => {
            if let Some(path) = from_file {
                let text = tokio::fs::read_to_string(&path).await?;
                links.extend(
                    LinkAnalysisRequest::from_lines(&text, cost, tax_rate, extra_costs).links,
                );
            }
            let request = LinkAnalysisRequest {
                links,
                cost,
                tax_rate,
                extra_costs,
            };
            print_json(&link_analyzer::analyze(gateway, &request).await?)
        }
    }
}

async fn run_catalog(command: CatalogCommand, gateway: &Gateway) -> Result<(), CliError> {
    match command {
        CatalogCommand::List { page } => {
            print_json(&catalog::find_all(gateway, &pagination(page)).await?)
        }
        CatalogCommand::Show { id } => print_json(&catalog::find_by_id(gateway, id).await?),
        CatalogCommand::Upload {
            file,
            tax_rate,
            extra_costs,
            ml_links,
        } => {
            let upload = CatalogUpload {
                file_name: file_name(&file),
                mime: guess_mime(&file).map(str::to_string),
                contents: tokio::fs::read(&file).await?,
                tax_rate,
                extra_costs,
                ml_links,
            };
            print_json(&catalog::upload(gateway, upload).await?)
        }
        CatalogCommand::Start { id } => lifecycle(gateway, id, CatalogLifecycle::Start).await,
        CatalogCommand::Pause { id } => lifecycle(gateway, id, CatalogLifecycle::Pause).await,
        CatalogCommand::Resume { id } => lifecycle(gateway, id, CatalogLifecycle::Resume).await,
        CatalogCommand::Cancel { id } => lifecycle(gateway, id, CatalogLifecycle::Cancel).await,
        CatalogCommand::Reanalyze { id } => {
            lifecycle(gateway, id, CatalogLifecycle::Reanalyze).await
        }
        CatalogCommand::Delete { id } => {
            catalog::delete(gateway, id).await?;
            info!("Deleted catalog {id}");
            Ok(())
        }
        CatalogCommand::Logs { id } => print_json(&catalog::logs(gateway, id).await?),
    }
}

async fn lifecycle(
    gateway: &Gateway,
    id: domain::Id,
    command: CatalogLifecycle,
) -> Result<(), CliError> {
    catalog::run(gateway, id, command).await?;
    info!("Sent {command} to catalog {id}");
    Ok(())
}

async fn run_product(command: ProductCommand, gateway: &Gateway) -> Result<(), CliError> {
    match command {
        ProductCommand::List { filters, page } => {
            let filters = filters.into();
            print_json(&product::find_by(gateway, &filters, &pagination(page)).await?)
        }
        ProductCommand::Favorite { ids } => set_favorite(gateway, &ids, true).await,
        ProductCommand::Unfavorite { ids } => set_favorite(gateway, &ids, false).await,
        ProductCommand::Delete { ids } => {
            match ids.as_slice() {
                [id] => product::delete(gateway, *id).await?,
                ids => product::delete_many(gateway, ids).await?,
            }
            info!("Deleted {} product(s)", ids.len());
            Ok(())
        }
        ProductCommand::Export { filters, output } => {
            let bytes = product::export(gateway, &filters.into()).await?;
            write_output(output, &bytes).await
        }
    }
}

async fn set_favorite(gateway: &Gateway, ids: &[domain::Id], favorite: bool) -> Result<(), CliError> {
    match ids {
        [id] => print_json(&product::set_favorite(gateway, *id, favorite).await?),
        ids => {
            product::set_favorite_many(gateway, ids, favorite).await?;
            info!("Updated {} products", ids.len());
            Ok(())
        }
    }
}

async fn run_report(command: ReportCommand, gateway: &Gateway) -> Result<(), CliError> {
    match command {
        ReportCommand::Stats { filters } => {
            print_json(&report::report_stats(gateway, &filters.into()).await?)
        }
        ReportCommand::Export { filters, output } => {
            let bytes = report::export(gateway, &filters.into()).await?;
            write_output(output, &bytes).await
        }
    }
}

async fn run_subscription(command: SubscriptionCommand, gateway: &Gateway) -> Result<(), CliError> {
    match command {
        SubscriptionCommand::Plans => print_json(&subscription::plans(gateway).await?),
        SubscriptionCommand::Current => print_json(&subscription::current(gateway).await?),
        SubscriptionCommand::Usage => print_json(&subscription::usage(gateway).await?),
        SubscriptionCommand::Checkout {
            plan_id,
            success_url,
            cancel_url,
        } => {
            let request = CheckoutRequest {
                plan_id,
                success_url,
                cancel_url,
            };
            print_json(&subscription::create_checkout(gateway, &request).await?)
        }
        SubscriptionCommand::Cancel => {
            subscription::cancel(gateway).await?;
            info!("Subscription cancelled");
            Ok(())
        }
    }
}

fn pagination(page: PageArgs) -> PaginationParams {
    PaginationParams {
        page: page.page,
        limit: page.limit,
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn write_output(output: OutputArgs, bytes: &[u8]) -> Result<(), CliError> {
    match output.output {
        Some(path) => {
            tokio::fs::write(&path, bytes).await?;
            info!("Wrote {} bytes to {}", bytes.len(), path.display());
        }
        None => {
            let mut stdout = tokio::io::stdout();
            stdout.write_all(bytes).await?;
            stdout.flush().await?;
        }
    }
    Ok(())
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "catalog".to_string())
}

fn guess_mime(path: &Path) -> Option<&'static str> {
    let extension = path.extension()?.to_str()?.to_ascii_lowercase();
    match extension.as_str() {
        "csv" => Some("text/csv"),
        "xls" => Some("application/vnd.ms-excel"),
        "xlsx" => Some("application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"),
        "pdf" => Some("application/pdf"),
        "json" => Some("application/json"),
        _ => None,
    }
}

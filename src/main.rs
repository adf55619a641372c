use clap::Parser;
use dotenv::dotenv;
use std::error::Error;
use std::io::{self, StdinLock, Stdout};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use github_license_checker_lib::report::{display_results, export_json};
use github_license_checker_lib::{
    Args, Backend, CheckerConfig, ChromiumPage, HttpPage, LicenseChecker, Page, PageError,
    Prompter, RepositoryRecord, SortMode, DEFAULT_COUNT,
};

fn prompter() -> Prompter<StdinLock<'static>, Stdout> {
    Prompter::new(io::stdin().lock(), io::stdout())
}

/// Run the search on `page` and hand the page back for shutdown.
async fn check<P: Page>(
    page: P,
    config: CheckerConfig,
    keyword: &str,
    sort: SortMode,
    count: usize,
) -> Result<(Vec<RepositoryRecord>, P), PageError> {
    let mut checker = LicenseChecker::new(page, config)?;
    let records = checker.search_repositories(keyword, sort, count).await;
    Ok((records, checker.into_page()))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Load .env first so it can supply GLC_* defaults to the argument parser
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let args = Args::parse();

    let (keyword, count, sort, headless) = if args.interactive() {
        println!("GitHub Repository License Checker");
        println!("{}", "=".repeat(50));

        let mut p = prompter();
        let keyword = p.keyword()?;
        let count = match args.count {
            Some(count) => count,
            None => p.count(DEFAULT_COUNT)?,
        };
        let sort = match args.sort {
            Some(sort) => sort,
            None => p.sort()?,
        };
        // Only the browser backend has a window to hide
        let headless = match (args.backend, args.headless_choice()) {
            (_, Some(headless)) => headless,
            (Backend::Chromium, None) => p.headless()?,
            (Backend::Http, None) => true,
        };
        (keyword, count, sort, headless)
    } else {
        (
            args.keyword.clone().unwrap_or_default(),
            args.count.unwrap_or(DEFAULT_COUNT),
            args.sort.unwrap_or_default(),
            args.headless_choice().unwrap_or(true),
        )
    };

    let config = args.checker_config();
    let records = match args.backend {
        Backend::Chromium => {
            let page = ChromiumPage::launch(headless).await.map_err(|e| {
                error!("Failed to launch Chromium (try --backend http): {}", e);
                e
            })?;
            let (records, page) = check(page, config, &keyword, sort, count).await?;
            // Close the browser before reporting
            page.close().await;
            records
        }
        Backend::Http => {
            let page = HttpPage::new()?;
            let (records, _) = check(page, config, &keyword, sort, count).await?;
            records
        }
    };

    display_results(&records);

    if records.is_empty() {
        return Ok(());
    }

    let save = if args.save {
        true
    } else if args.no_save {
        false
    } else {
        prompter().confirm_save(&args.output)?
    };

    if save {
        match export_json(&records, &args.output).await {
            Ok(()) => println!("\nSaved results to {}.", args.output),
            Err(e) => error!("Failed to save '{}': {}", args.output, e),
        }
    } else {
        info!("Report not saved");
    }

    Ok(())
}

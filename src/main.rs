//! Command-line entry point: run the web calculator or compute one case.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;
use tracing::info;
use tracing_subscriber::EnvFilter;

use withholding_engine::api::{AppState, create_router};
use withholding_engine::calculation::calculate_withholding;
use withholding_engine::config::ConfigLoader;
use withholding_engine::models::{CalculationResult, FilingStatus, WithholdingInputs};

#[derive(Debug, Parser)]
#[command(name = "withholding-engine")]
#[command(about = "Annual federal withholding estimator (IRS Publication 15-T)")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Serve the calculator form and JSON API
    Serve {
        /// Address to listen on
        #[arg(long, default_value = "127.0.0.1:8080")]
        bind: SocketAddr,

        #[command(flatten)]
        tables: TableArgs,
    },
    /// Calculate withholding for one set of inputs
    Calculate {
        /// Gross annual salary
        #[arg(long, allow_negative_numbers = true)]
        salary: Decimal,

        /// Filing status: single, married_filing_jointly or head_of_household
        #[arg(long)]
        filing_status: String,

        /// W-4 Step 3 credit
        #[arg(long, default_value = "0", allow_negative_numbers = true)]
        credit: Decimal,

        /// W-4 Step 4(a) other income
        #[arg(long, default_value = "0", allow_negative_numbers = true)]
        other_income: Decimal,

        /// W-4 Step 4(b) deductions
        #[arg(long, default_value = "0", allow_negative_numbers = true)]
        deductions: Decimal,

        /// Print the full JSON result instead of a summary
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        tables: TableArgs,
    },
}

#[derive(Debug, Args)]
struct TableArgs {
    /// Directory holding publication.yaml and years/*.yaml; built-in tables when omitted
    #[arg(long)]
    config_dir: Option<PathBuf>,

    /// Tax year to use; the latest loaded year when omitted
    #[arg(long)]
    tax_year: Option<i32>,
}

impl TableArgs {
    fn load(&self) -> anyhow::Result<ConfigLoader> {
        match &self.config_dir {
            Some(dir) => ConfigLoader::load(dir)
                .with_context(|| format!("loading tables from {}", dir.display())),
            None => Ok(ConfigLoader::builtin()),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    match Cli::parse().command {
        Command::Serve { bind, tables } => serve(bind, &tables).await,
        Command::Calculate {
            salary,
            filing_status,
            credit,
            other_income,
            deductions,
            json,
            tables,
        } => {
            let inputs = WithholdingInputs {
                gross_annual_salary: salary,
                filing_status: filing_status.parse::<FilingStatus>()?,
                step3_credit: credit,
                step4a_other_income: other_income,
                step4b_deductions: deductions,
            };
            calculate(&inputs, &tables, json)
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn serve(bind: SocketAddr, tables: &TableArgs) -> anyhow::Result<()> {
    let config = tables.load()?;
    let mut state = AppState::new(config);
    if let Some(year) = tables.tax_year {
        state = state.with_default_tax_year(year)?;
    }

    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .with_context(|| format!("binding {}", bind))?;
    info!(addr = %bind, tax_year = state.default_tax_year(), "starting withholding calculator");

    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %err, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    info!("shutdown requested");
}

fn calculate(inputs: &WithholdingInputs, tables: &TableArgs, json: bool) -> anyhow::Result<()> {
    let config = tables.load()?;
    let year = tables.tax_year.unwrap_or(config.latest_year());
    let result = calculate_withholding(inputs, config.tax_year(year)?)?.into_result();

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_summary(&result);
    }
    Ok(())
}

fn print_summary(result: &CalculationResult) {
    println!(
        "Tax year {} ({})",
        result.tax_year,
        result.filing_status.label()
    );
    let rows = [
        ("Federal income tax", &result.display.federal_tax),
        ("Social Security tax", &result.display.social_security_tax),
        ("Medicare tax", &result.display.medicare_tax),
        ("Total tax", &result.display.total_tax),
        ("Net annual income", &result.display.net_income),
        ("Effective rate", &result.display.effective_rate),
    ];
    for (label, value) in rows {
        println!("  {:<22}{:>14}", label, value);
    }
    for warning in &result.audit_trace.warnings {
        println!("  note: {}", warning.message);
    }
}

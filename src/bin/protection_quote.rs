//! `protection-quote` CLI.
//!
//! Usage:
//!   protection-quote quote --product home_protection --term 2 [--vin <VIN> --mileage <N>]
//!   protection-quote decode <VIN> [--model-year <YEAR>]
//!   protection-quote validate <VIN>
//!   protection-quote vsc --make Honda --year 2020 --mileage 60000 [--level gold --term-months 36]
//!   protection-quote coverage-options
//!   protection-quote vehicle-class <MAKE>
//!   protection-quote settings [--family hero] [--jurisdiction CA]
//!   protection-quote products
//!   protection-quote schemas

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use protection_quote::application::services::{
    QuoteOrchestrator, QuoteRequest, ValidationResult, VehicleQuote, VehicleQuoteRequest,
    VscQuoteRequest,
};
use protection_quote::config::AppConfig;
use protection_quote::domain::entities::{DecodedVehicle, Quote, VscQuote};
use protection_quote::domain::vsc_rates::{CoverageLevel, DEFAULT_DEDUCTIBLE, DEFAULT_TERM_MONTHS};
use protection_quote::domain::value_objects::{CheckDigitPolicy, CustomerType, Jurisdiction};
use protection_quote::telemetry;
use serde::Serialize;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "protection-quote", version, about = "Protection-plan quoting and VIN decoding")]
struct Cli {
    /// Configuration file (default: ./protection-quote.toml if present)
    #[arg(short, long, global = true)]
    config: Option<String>,
    /// Accept VINs whose check digit does not match
    #[arg(long, global = true)]
    lenient: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Price a product, optionally for a specific vehicle
    Quote {
        /// Catalog key or product code
        #[arg(short, long)]
        product: String,
        /// Term in years
        #[arg(short, long)]
        term: u32,
        /// Coverage limit (500 or 1000)
        #[arg(long, default_value_t = 500)]
        coverage: u32,
        /// retail | wholesale
        #[arg(long, default_value = "retail")]
        customer: CustomerType,
        /// Jurisdiction code
        #[arg(long, default_value = Jurisdiction::DEFAULT_CODE)]
        jurisdiction: Jurisdiction,
        /// Postal code
        #[arg(long)]
        zip: Option<String>,
        /// VIN of the covered vehicle
        #[arg(long)]
        vin: Option<String>,
        /// Model year hint for the vehicle data provider
        #[arg(long)]
        model_year: Option<i32>,
        /// Odometer reading, enables the eligibility check
        #[arg(long)]
        mileage: Option<u32>,
    },
    /// Decode a VIN
    Decode {
        /// 17-character VIN
        vin: String,
        /// Model year hint for the vehicle data provider
        #[arg(long)]
        model_year: Option<i32>,
    },
    /// Validate a VIN without decoding it
    Validate {
        /// 17-character VIN
        vin: String,
    },
    /// Price a vehicle service contract
    Vsc {
        /// VIN used to fill in make, model and year
        #[arg(long)]
        vin: Option<String>,
        /// Vehicle make
        #[arg(long)]
        make: Option<String>,
        /// Vehicle model
        #[arg(long)]
        model: Option<String>,
        /// Model year
        #[arg(long)]
        year: Option<i32>,
        /// Odometer reading
        #[arg(long)]
        mileage: u32,
        /// silver | gold | platinum
        #[arg(long, default_value = "gold")]
        level: CoverageLevel,
        /// Term in months (12, 24, 36, 48, 60 or 72)
        #[arg(long, default_value_t = DEFAULT_TERM_MONTHS)]
        term_months: u32,
        /// Deductible (0, 50, 100, 200, 500 or 1000)
        #[arg(long, default_value_t = DEFAULT_DEDUCTIBLE)]
        deductible: u32,
        /// retail | wholesale
        #[arg(long, default_value = "retail")]
        customer: CustomerType,
        /// Jurisdiction code
        #[arg(long, default_value = Jurisdiction::DEFAULT_CODE)]
        jurisdiction: Jurisdiction,
    },
    /// List service contract levels, terms, deductibles and class rates
    CoverageOptions,
    /// Show the service contract class a make is rated in
    VehicleClass {
        /// Vehicle make
        make: String,
    },
    /// Show the fees, rates and contact data in effect
    Settings {
        /// Product family for the admin fee (default: the configured family)
        #[arg(long)]
        family: Option<String>,
        /// Jurisdiction code
        #[arg(long, default_value = Jurisdiction::DEFAULT_CODE)]
        jurisdiction: Jurisdiction,
    },
    /// List catalog products and their terms
    Products,
    /// Print JSON schemas of the request and response types
    Schemas,
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let mut config = AppConfig::load_from(cli.config.as_deref()).context("loading configuration")?;
    if cli.lenient {
        config.vin.check_digit_policy = CheckDigitPolicy::Lenient;
    }
    telemetry::init(&config.log)?;

    let orchestrator = QuoteOrchestrator::from_config(&config)?;

    match cli.command {
        Commands::Quote {
            product,
            term,
            coverage,
            customer,
            jurisdiction,
            zip,
            vin,
            model_year,
            mileage,
        } => {
            let mut quote = QuoteRequest::new(product, term)
                .with_coverage_limit(coverage)
                .with_customer_type(customer)
                .with_jurisdiction(jurisdiction);
            if let Some(zip) = zip {
                quote = quote.with_zip_code(zip);
            }
            let request = VehicleQuoteRequest {
                quote,
                vin,
                model_year,
                mileage,
            };
            let result = orchestrator.quote(&request).await?;
            print_json(&result)?;
        }
        Commands::Decode { vin, model_year } => {
            let vehicle = orchestrator.decoder().decode(&vin, model_year).await?;
            print_json(&vehicle)?;
        }
        Commands::Validate { vin } => {
            let result = orchestrator.decoder().validate(&vin);
            print_json(&result)?;
            if !result.valid {
                return Ok(ExitCode::FAILURE);
            }
        }
        Commands::Vsc {
            vin,
            make,
            model,
            year,
            mileage,
            level,
            term_months,
            deductible,
            customer,
            jurisdiction,
        } => {
            let request = VscQuoteRequest {
                vin,
                make,
                model,
                year,
                mileage,
                coverage_level: level,
                term_months,
                deductible,
                customer_type: customer,
                jurisdiction,
                zip_code: None,
            };
            let result = orchestrator.vsc_quote(&request).await?;
            print_json(&result)?;
        }
        Commands::CoverageOptions => {
            print_json(&orchestrator.vsc().coverage_options())?;
        }
        Commands::VehicleClass { make } => {
            print_json(&orchestrator.vsc().vehicle_class_info(&make))?;
        }
        Commands::Settings {
            family,
            jurisdiction,
        } => {
            let family = family.unwrap_or_else(|| config.quote.product_family.clone());
            let snapshot = orchestrator
                .engine()
                .settings()
                .current_settings(&family, &jurisdiction)
                .await;
            print_json(&snapshot)?;
        }
        Commands::Products => {
            print_json(&orchestrator.engine().available_products())?;
        }
        Commands::Schemas => {
            print_json(&serde_json::json!({
                "VehicleQuoteRequest": schemars::schema_for!(VehicleQuoteRequest),
                "VehicleQuote": schemars::schema_for!(VehicleQuote),
                "Quote": schemars::schema_for!(Quote),
                "VscQuoteRequest": schemars::schema_for!(VscQuoteRequest),
                "VscQuote": schemars::schema_for!(VscQuote),
                "DecodedVehicle": schemars::schema_for!(DecodedVehicle),
                "ValidationResult": schemars::schema_for!(ValidationResult),
            }))?;
        }
    }

    Ok(ExitCode::SUCCESS)
}

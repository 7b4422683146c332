use clap::Args;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;

use autolog_core::financing::loan_summary;
use autolog_core::model::LoanTerms;

use crate::input;

/// Arguments for a loan summary
#[derive(Args)]
pub struct LoanArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Amount financed
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Annual interest rate in percent (5.75 = 5.75%)
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Term in months
    #[arg(long)]
    pub term: Option<u32>,

    /// Installments paid so far
    #[arg(long, default_value_t = 0)]
    pub payments_made: u32,

    /// Include the month-by-month schedule
    #[arg(long)]
    pub schedule: bool,
}

#[derive(Deserialize)]
struct LoanInput {
    #[serde(flatten)]
    terms: LoanTerms,
    #[serde(default)]
    payments_made: u32,
}

pub fn run_loan(args: LoanArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let (terms, payments_made) = if let Some(ref path) = args.input {
        let loan: LoanInput = input::file::read_json(path)?;
        (loan.terms, loan.payments_made)
    } else {
        let terms = LoanTerms {
            principal: Some(args.principal.ok_or("--principal is required")?),
            annual_rate: Some(args.rate.ok_or("--rate is required")?),
            term_months: Some(args.term.ok_or("--term is required")?),
            ..Default::default()
        };
        (terms, args.payments_made)
    };

    let result = loan_summary(&terms, payments_made)?;
    let mut value = serde_json::to_value(result)?;
    if !args.schedule {
        if let Some(summary) = value.get_mut("result").and_then(Value::as_object_mut) {
            summary.remove("schedule");
        }
    }
    Ok(value)
}

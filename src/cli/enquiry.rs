use super::quote::{QuoteArgs, resolve};
use super::ui;
use crate::core::config::AppConfig;
use crate::core::enquiry::{
    EnquiryBook, EnquiryDraft, EnquiryFilter, EnquiryStatus, FinanceEnquiry,
};
use crate::core::money::format_amount;
use anyhow::Result;
use clap::{Args, Subcommand};
use comfy_table::Cell;

#[derive(Subcommand, Debug, Clone)]
pub enum EnquiryCommand {
    /// Record a new finance enquiry with its repayment quote
    Add(AddArgs),
    /// List enquiries, newest first
    List {
        /// Only show enquiries with this status: new, contacted or closed
        #[arg(short, long)]
        status: Option<EnquiryStatus>,
        /// Match against customer name, email or model
        #[arg(short = 'q', long)]
        search: Option<String>,
    },
    /// Show one enquiry in full
    Show { id: String },
    /// Change an enquiry's status
    Status { id: String, status: EnquiryStatus },
    /// Delete an enquiry
    Remove { id: String },
}

#[derive(Args, Debug, Clone)]
pub struct AddArgs {
    /// Customer name
    #[arg(long)]
    pub name: String,
    /// Customer email address
    #[arg(long)]
    pub email: String,
    /// Customer phone number
    #[arg(long)]
    pub phone: Option<String>,
    /// Free-form note from the customer
    #[arg(long)]
    pub message: Option<String>,
    #[command(flatten)]
    pub quote: QuoteArgs,
}

pub async fn run(config: &AppConfig, book: &EnquiryBook, command: EnquiryCommand) -> Result<()> {
    let currency = &config.currency;
    match command {
        EnquiryCommand::Add(args) => {
            let quote = resolve(&args.quote, config)?;
            let enquiry = book
                .add(EnquiryDraft {
                    name: args.name,
                    email: args.email,
                    phone: args.phone,
                    model: quote.model,
                    message: args.message,
                    inputs: quote.inputs,
                })
                .await?;
            println!(
                "Recorded enquiry {}",
                ui::style_text(&enquiry.id, ui::StyleType::TotalLabel)
            );
            println!("{}", render_enquiry(&enquiry, currency));
        }
        EnquiryCommand::List { status, search } => {
            let enquiries = book.list(&EnquiryFilter { status, search }).await?;
            if enquiries.is_empty() {
                println!("No finance enquiries found.");
            } else {
                println!("{}", render_enquiry_list(&enquiries, currency));
            }
        }
        EnquiryCommand::Show { id } => {
            let enquiry = book.get(&id).await?;
            println!("{}", render_enquiry(&enquiry, currency));
        }
        EnquiryCommand::Status { id, status } => {
            let enquiry = book.set_status(&id, status).await?;
            println!("Enquiry {} is now {}", enquiry.id, enquiry.status);
        }
        EnquiryCommand::Remove { id } => {
            if book.remove(&id).await? {
                println!("Removed enquiry {id}");
            } else {
                println!(
                    "{}",
                    ui::style_text(&format!("No enquiry with id {id}"), ui::StyleType::Error)
                );
            }
        }
    }
    Ok(())
}

pub fn render_enquiry_list(enquiries: &[FinanceEnquiry], currency: &str) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Id"),
        ui::header_cell("Received"),
        ui::header_cell("Customer"),
        ui::header_cell("Model"),
        ui::header_cell("Loan"),
        ui::header_cell("Repayment"),
        ui::header_cell("Status"),
    ]);

    for enquiry in enquiries {
        table.add_row(vec![
            Cell::new(&enquiry.id),
            Cell::new(enquiry.created_at.format("%Y-%m-%d %H:%M")),
            Cell::new(format!("{}\n{}", enquiry.name, enquiry.email)),
            ui::optional_text_cell(enquiry.model.as_deref()),
            ui::money_cell(enquiry.result.loan_amount, currency),
            Cell::new(format!(
                "{} / {}",
                format_amount(enquiry.result.periodic_payment, currency),
                enquiry.inputs.frequency.period_name()
            )),
            Cell::new(enquiry.status),
        ]);
    }
    table.to_string()
}

pub fn render_enquiry(enquiry: &FinanceEnquiry, currency: &str) -> String {
    let inputs = &enquiry.inputs;
    let result = &enquiry.result;
    let mut table = ui::new_styled_table();

    let text_rows: [(&str, Option<String>); 7] = [
        ("Id", Some(enquiry.id.clone())),
        (
            "Received",
            Some(enquiry.created_at.format("%Y-%m-%d %H:%M:%S UTC").to_string()),
        ),
        ("Customer", Some(enquiry.name.clone())),
        ("Email", Some(enquiry.email.clone())),
        ("Phone", enquiry.phone.clone()),
        ("Model", enquiry.model.clone()),
        ("Status", Some(enquiry.status.to_string())),
    ];
    for (label, value) in text_rows {
        table.add_row(vec![
            ui::label_cell(label),
            ui::optional_text_cell(value.as_deref()),
        ]);
    }

    table.add_row(vec![
        ui::label_cell("Price"),
        ui::money_cell(inputs.price, currency),
    ]);
    table.add_row(vec![
        ui::label_cell("Deposit"),
        ui::money_cell(inputs.deposit, currency),
    ]);
    table.add_row(vec![
        ui::label_cell("Term"),
        Cell::new(format!(
            "{} years at {:.2}% p.a.",
            inputs.term_years, inputs.annual_rate_percent
        )),
    ]);
    table.add_row(vec![
        ui::label_cell(&format!("Repayment per {}", inputs.frequency.period_name())),
        ui::total_money_cell(result.periodic_payment, currency),
    ]);
    table.add_row(vec![
        ui::label_cell("Total interest"),
        ui::money_cell(result.total_interest, currency),
    ]);
    if let Some(message) = &enquiry.message {
        table.add_row(vec![ui::label_cell("Message"), Cell::new(message)]);
    }

    table.to_string()
}

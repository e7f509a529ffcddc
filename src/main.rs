use anyhow::{anyhow, bail, Result};
use clap::{Parser, Subcommand};
use std::sync::Arc;
use std::time::Duration;

use quote_wizard::counter::CounterAnimation;
use quote_wizard::wizard::{validate_details, ContactFields, FieldErrors, QuoteRequest};
use quote_wizard::{
    config, init_config, init_telemetry, ContactField, EmailJsProvider, QuoteModal,
    ServiceCatalog, ServiceId, Status, Step, SubmissionClient, SubmitOutcome,
};

#[derive(Parser)]
#[command(name = "quote-wizard")]
#[command(about = "Request-a-quote wizard: catalog, headless submission and counter preview")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the services a visitor can select
    Catalog,
    /// Run the wizard headlessly and send one quote request
    Request {
        #[arg(long, help = "Contact name (required)")]
        name: String,
        #[arg(long, help = "Contact phone number (required)")]
        phone: String,
        #[arg(long, help = "Contact email")]
        email: Option<String>,
        #[arg(long, help = "Company name")]
        company: Option<String>,
        /// Service id from the catalog; repeat for several services
        #[arg(long = "service", required = true)]
        services: Vec<String>,
        /// Print the outbound payload instead of sending it
        #[arg(long)]
        dry_run: bool,
    },
    /// Print the frames of a counter animation
    Counter {
        /// Display value such as "₹47Cr+" or "4.9/5"
        display: String,
        #[arg(long, help = "Animation length in milliseconds")]
        duration_ms: Option<u64>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_telemetry(&config()?.observability)?;
    init_config()?;

    match cli.command {
        Commands::Catalog => {
            show_catalog();
            Ok(())
        }
        Commands::Request {
            name,
            phone,
            email,
            company,
            services,
            dry_run,
        } => tokio::runtime::Runtime::new()?.block_on(async {
            request_command(name, phone, email, company, services, dry_run).await
        }),
        Commands::Counter {
            display,
            duration_ms,
        } => tokio::runtime::Runtime::new()?
            .block_on(async { counter_command(&display, duration_ms).await }),
    }
}

fn show_catalog() {
    let catalog = ServiceCatalog::default();
    println!("📋 Available services:");
    for option in catalog.options() {
        println!("   {:<20} {}", option.id, option.display_name);
    }
}

async fn request_command(
    name: String,
    phone: String,
    email: Option<String>,
    company: Option<String>,
    services: Vec<String>,
    dry_run: bool,
) -> Result<()> {
    let config = config()?;
    let catalog = Arc::new(ServiceCatalog::default());

    let unknown: Vec<&String> = services
        .iter()
        .filter(|id| !catalog.contains(&ServiceId::from(id.as_str())))
        .collect();
    if !unknown.is_empty() {
        bail!("Unknown service id(s): {unknown:?}. Run `quote-wizard catalog` to list them.");
    }

    let provider = EmailJsProvider::new(&config.dispatch.endpoint, config.dispatch.timeout())?;
    let client = Arc::new(SubmissionClient::new(
        Arc::new(provider),
        config.dispatch.credentials(),
        Arc::clone(&catalog),
    ));

    let fields = ContactFields {
        name,
        email: email.unwrap_or_default(),
        company: company.unwrap_or_default(),
        phone,
    };
    let errors = validate_details(&fields);
    if !errors.is_empty() {
        report_errors(&errors);
        bail!("Contact details are incomplete");
    }

    if dry_run {
        let request = QuoteRequest {
            fields,
            services: services.iter().map(|id| ServiceId::from(id.as_str())).collect(),
        };
        let payload = client.build_payload(&request);
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    let modal = QuoteModal::new(Arc::clone(&client), config.wizard.auto_close_delay(), || {});
    let mut updates = modal.subscribe();
    modal.open();

    for field in ContactField::ALL {
        modal.set_field(field, fields.get(field))?;
    }
    if modal.advance()? != Step::Services {
        report_errors(&modal.snapshot().errors);
        bail!("Contact details are incomplete");
    }

    for id in &services {
        modal.toggle_service(id.as_str())?;
    }

    match modal.submit()? {
        SubmitOutcome::Dispatched => println!("📨 Sending quote request..."),
        other => return Err(anyhow!("Submission was not started: {other:?}")),
    }

    let status = updates
        .wait_for(|snapshot| matches!(snapshot.status, Status::Success | Status::Failure))
        .await?
        .status;
    modal.close();
    client.metrics().log_stats();

    if status == Status::Success {
        println!("✅ Quote request sent");
        Ok(())
    } else {
        bail!("Quote request could not be delivered; see logs for details")
    }
}

fn report_errors(errors: &FieldErrors) {
    for (key, message) in errors.iter() {
        eprintln!("❌ {key}: {message}");
    }
}

async fn counter_command(display: &str, duration_ms: Option<u64>) -> Result<()> {
    let counter_config = &config()?.counter;
    let duration = duration_ms
        .map(Duration::from_millis)
        .unwrap_or_else(|| counter_config.duration());

    let mut counter = CounterAnimation::new(display, duration);
    counter
        .run(counter_config.frame_interval(), |frame| println!("{frame}"))
        .await;
    Ok(())
}

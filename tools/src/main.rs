//! health-runner: headless driver for the customer health engine.
//!
//! Usage:
//!   health-runner --seed 12345 --customers 250 --db health.db
//!   health-runner --db health.db --ipc-mode
//!
//! Batch mode regenerates the demo population and prints a summary.
//! IPC mode reads one JSON command per stdin line and answers with one JSON
//! line on stdout.

use anyhow::Result;
use health_core::{
    clock::EvalClock,
    config::HealthConfig,
    service::{CustomerListRequest, HealthService},
    store::HealthStore,
};
use std::env;
use std::io::{self, BufRead, Write};

#[derive(serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum IpcCommand {
    Health,
    GenerateSampleData {
        num_customers: Option<usize>,
        seed: Option<u64>,
    },
    ListCustomers(CustomerListRequest),
    GetCustomer {
        customer_id: String,
    },
    DashboardMetrics,
    ChurnPredictions {
        limit: Option<u32>,
    },
    RevenueTrends,
    Rescore,
    Quit,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let seed = parse_arg(&args, "--seed", 42u64);
    let ipc_mode = args.iter().any(|a| a == "--ipc-mode");
    let db = string_arg(&args, "--db").unwrap_or(":memory:");

    let config = match string_arg(&args, "--config") {
        Some(path) => HealthConfig::load(path)?,
        None => HealthConfig::default(),
    };
    let customers = parse_arg(&args, "--customers", config.query.default_population);

    let store = HealthStore::open(db)?;
    store.migrate()?;
    let service = HealthService::new(store, config, EvalClock::System);

    if ipc_mode {
        run_ipc_loop(&service, seed)?;
    } else {
        println!("Customer Health: health-runner");
        println!("  seed:       {seed}");
        println!("  customers:  {customers}");
        println!("  db:         {db}");
        println!();

        service.generate_sample_data(customers, seed)?;
        print_summary(&service)?;
    }

    Ok(())
}

fn run_ipc_loop(service: &HealthService, default_seed: u64) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut handle = stdin.lock();
    let mut buffer = String::new();

    loop {
        buffer.clear();
        let bytes_read = handle.read_line(&mut buffer)?;
        if bytes_read == 0 {
            break; // EOF
        }
        if buffer.trim().is_empty() {
            continue;
        }

        let cmd: IpcCommand = match serde_json::from_str(&buffer) {
            Ok(c) => c,
            Err(e) => {
                writeln!(stdout, "{}", serde_json::json!({ "error": e.to_string() }))?;
                stdout.flush()?;
                continue;
            }
        };

        if matches!(cmd, IpcCommand::Quit) {
            break;
        }

        let reply = match handle_command(service, cmd, default_seed) {
            Ok(value) => value,
            Err(e) => {
                log::warn!("ipc: command failed: {e}");
                serde_json::json!({ "error": e.to_string() })
            }
        };
        writeln!(stdout, "{reply}")?;
        stdout.flush()?;
    }
    Ok(())
}

fn handle_command(
    service: &HealthService,
    cmd: IpcCommand,
    default_seed: u64,
) -> Result<serde_json::Value> {
    let value = match cmd {
        IpcCommand::Health => serde_json::json!({
            "status": "healthy",
            "timestamp": chrono::Utc::now().to_rfc3339(),
        }),
        IpcCommand::GenerateSampleData { num_customers, seed } => {
            let n = num_customers.unwrap_or(service.config().query.default_population);
            let summary = service.generate_sample_data(n, seed.unwrap_or(default_seed))?;
            serde_json::json!({
                "message": format!("Successfully generated {n} customers with sample data"),
                "summary": summary,
            })
        }
        IpcCommand::ListCustomers(req) => serde_json::to_value(service.list_customers(&req)?)?,
        IpcCommand::GetCustomer { customer_id } => {
            serde_json::to_value(service.customer_details(&customer_id)?)?
        }
        IpcCommand::DashboardMetrics => serde_json::to_value(service.dashboard_metrics()?)?,
        IpcCommand::ChurnPredictions { limit } => {
            serde_json::to_value(service.churn_predictions(limit)?)?
        }
        IpcCommand::RevenueTrends => {
            serde_json::json!({ "trends": service.revenue_trends()? })
        }
        IpcCommand::Rescore => serde_json::json!({ "rescored": service.rescore_all()? }),
        IpcCommand::Quit => serde_json::Value::Null,
    };
    Ok(value)
}

fn print_summary(service: &HealthService) -> Result<()> {
    let m = service.dashboard_metrics()?;

    println!("=== DASHBOARD ===");
    println!("  customers:          {}", m.total_customers);
    println!("  low risk:           {}", m.low_risk_customers);
    println!("  medium risk:        {}", m.medium_risk_customers);
    println!("  high risk:          {}", m.high_risk_customers);
    println!("  churn rate:         {:.2}%", m.churn_rate);
    println!("  total revenue:      ${:.2}", m.total_revenue);
    println!("  avg lifetime value: ${:.2}", m.avg_lifetime_value);

    println!();
    println!("=== CHURN WATCHLIST ===");
    let predictions = service.churn_predictions(None)?;
    if predictions.is_empty() {
        println!("  (No high-risk customers)");
    }
    for p in &predictions {
        println!("  {} | p(churn) {:.2} | {}", p.name, p.churn_probability, p.key_factors.join(", "));
        for action in &p.recommended_actions {
            println!("      -> {action}");
        }
    }

    println!();
    println!("=== REVENUE (Last 6 Months) ===");
    let trends = service.revenue_trends()?;
    for t in trends.iter().rev().take(6).collect::<Vec<_>>().into_iter().rev() {
        println!("  {}-{:02} | ${:.2} | {} orders", t.year, t.month, t.revenue, t.orders);
    }
    Ok(())
}

fn string_arg<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}

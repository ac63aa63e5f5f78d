use anyhow::Result;
use colored::Colorize;

use crate::gateway::{HttpGateway, QueryGateway};

use super::Commands;

/// Handle CLI subcommands. Returns true when the command was fully
/// handled and the process should exit.
pub async fn handle_command(command: &Commands, gateway: &HttpGateway) -> Result<bool> {
    match command {
        Commands::Stats => {
            show_stats(gateway).await;
            Ok(true)
        }
        Commands::Departments => {
            list_departments(gateway).await?;
            Ok(true)
        }
        Commands::AcquisitionTypes => {
            list_acquisition_types(gateway).await?;
            Ok(true)
        }
        Commands::Version => {
            show_version();
            Ok(true)
        }
        Commands::Chat => Ok(false), // Continue to chat interface
    }
}

/// Print dataset statistics; a failing endpoint is reported, not fatal
async fn show_stats(gateway: &HttpGateway) {
    match gateway.stats().await {
        Ok(stats) => {
            println!("Dataset statistics:");
            println!("  Records:     {}", stats.total_records.to_string().green());
            println!("  Departments: {}", stats.departments.to_string().green());
            println!("  Suppliers:   {}", stats.suppliers.to_string().green());
        }
        Err(e) => println!("Stats unavailable: {}", e.user_message().yellow()),
    }
}

/// List department names known to the dataset
async fn list_departments(gateway: &HttpGateway) -> Result<()> {
    let departments = gateway.departments().await?;
    println!("Departments ({}):", departments.len());
    for department in departments {
        println!("  • {}", department);
    }
    Ok(())
}

/// List acquisition types present in the dataset
async fn list_acquisition_types(gateway: &HttpGateway) -> Result<()> {
    let types = gateway.acquisition_types().await?;
    println!("Acquisition types ({}):", types.len());
    for acquisition_type in types {
        println!("  • {}", acquisition_type);
    }
    Ok(())
}

/// Show version information
pub fn show_version() {
    println!("Procura v{}", env!("CARGO_PKG_VERSION"));
    println!("   Ask natural-language questions against a procurement dataset");
}

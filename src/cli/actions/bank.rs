//! Signed-in actions: the dashboard and the bank account screens.

use crate::api::types::{BankConnection, Transaction, TransactionFilter};
use crate::bank::ConnectionPayload;
use crate::cli::actions::{AppContext, admit_private};
use crate::cli::globals::GlobalArgs;
use anyhow::Result;

/// How many transactions the dashboard shows.
const RECENT_TRANSACTIONS: usize = 5;

/// Execute the dashboard action: balances plus the most recent activity.
/// # Errors
/// Returns an error if either listing cannot be fetched.
pub async fn dashboard(globals: &GlobalArgs) -> Result<()> {
    let ctx = AppContext::build(globals)?;
    let Some(identity) = admit_private(&ctx.session).await? else {
        return Ok(());
    };
    println!("Welcome back, {}.", identity.name);

    let workflow = ctx.bank();
    render_balances(&workflow.balances().await?);

    let mut transactions = workflow.transactions(&TransactionFilter::default()).await?;
    transactions.truncate(RECENT_TRANSACTIONS);
    render_transactions("Recent transactions:", &transactions);
    Ok(())
}

/// Execute the banks action: list the institutions available to connect.
/// # Errors
/// Returns an error if the catalog cannot be fetched.
pub async fn banks(globals: &GlobalArgs) -> Result<()> {
    let ctx = AppContext::build(globals)?;
    if admit_private(&ctx.session).await?.is_none() {
        return Ok(());
    }
    let providers = ctx.bank().providers().await?;
    if providers.is_empty() {
        println!("No institutions available.");
        return Ok(());
    }
    println!("Available institutions:");
    for provider in &providers {
        println!("  - {}", provider.name);
    }
    Ok(())
}

/// Execute the connect action, then show the refreshed account listing.
/// # Errors
/// Returns an error if the connection is rejected or cannot be delivered.
pub async fn connect(globals: &GlobalArgs, bank: &str, payload: ConnectionPayload) -> Result<()> {
    let ctx = AppContext::build(globals)?;
    if admit_private(&ctx.session).await?.is_none() {
        return Ok(());
    }
    let workflow = ctx.bank();
    let connection = workflow.connect(bank, payload).await?;
    println!(
        "Connected {} (account {}).",
        connection.bank_name, connection.account_id
    );
    // The connect call dropped the cached balances, so this refetches.
    render_accounts(&workflow.balances().await?);
    Ok(())
}

/// Execute the accounts action: list linked accounts with their ids.
/// # Errors
/// Returns an error if the listing cannot be fetched.
pub async fn accounts(globals: &GlobalArgs) -> Result<()> {
    let ctx = AppContext::build(globals)?;
    if admit_private(&ctx.session).await?.is_none() {
        return Ok(());
    }
    render_accounts(&ctx.bank().balances().await?);
    Ok(())
}

/// Execute the disconnect action, then show the remaining accounts.
/// # Errors
/// Returns an error if the disconnect is rejected or cannot be delivered.
pub async fn disconnect(globals: &GlobalArgs, account_id: &str) -> Result<()> {
    let ctx = AppContext::build(globals)?;
    if admit_private(&ctx.session).await?.is_none() {
        return Ok(());
    }
    let workflow = ctx.bank();
    workflow.disconnect(account_id).await?;
    println!("Disconnected account {account_id}.");
    render_accounts(&workflow.balances().await?);
    Ok(())
}

/// Execute the balances action.
/// # Errors
/// Returns an error if the listing cannot be fetched.
pub async fn balances(globals: &GlobalArgs) -> Result<()> {
    let ctx = AppContext::build(globals)?;
    if admit_private(&ctx.session).await?.is_none() {
        return Ok(());
    }
    render_balances(&ctx.bank().balances().await?);
    Ok(())
}

/// Execute the transactions action with the provided filter.
/// # Errors
/// Returns an error if the listing cannot be fetched.
pub async fn transactions(globals: &GlobalArgs, filter: TransactionFilter) -> Result<()> {
    let ctx = AppContext::build(globals)?;
    if admit_private(&ctx.session).await?.is_none() {
        return Ok(());
    }
    let transactions = ctx.bank().transactions(&filter).await?;
    render_transactions("Transactions:", &transactions);
    Ok(())
}

fn render_accounts(connections: &[BankConnection]) {
    if connections.is_empty() {
        println!("No linked accounts. Run 'monujo connect' to link one.");
        return;
    }
    println!("Linked accounts:");
    for connection in connections {
        println!("  {}  {}", connection.account_id, connection.bank_name);
    }
}

fn render_balances(connections: &[BankConnection]) {
    if connections.is_empty() {
        println!("No linked accounts. Run 'monujo connect' to link one.");
        return;
    }
    println!("Balances:");
    for connection in connections {
        println!(
            "  {} ({}): {:.2} {}",
            connection.bank_name, connection.account_id, connection.balance, connection.currency
        );
    }
}

fn render_transactions(header: &str, transactions: &[Transaction]) {
    if transactions.is_empty() {
        println!("No transactions.");
        return;
    }
    println!("{header}");
    for transaction in transactions {
        println!(
            "  {}  {:>10.2} {}  {}  {} ({})",
            transaction.date,
            transaction.amount,
            transaction.currency,
            transaction.category,
            transaction.description,
            transaction.bank_name
        );
    }
}

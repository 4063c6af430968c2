use clap::{Arg, Command};

pub const CMD_DASHBOARD: &str = "dashboard";
pub const CMD_BANKS: &str = "banks";
pub const CMD_CONNECT: &str = "connect";
pub const CMD_ACCOUNTS: &str = "accounts";
pub const CMD_DISCONNECT: &str = "disconnect";
pub const CMD_BALANCES: &str = "balances";
pub const CMD_TRANSACTIONS: &str = "transactions";

pub const ARG_BANK: &str = "bank";
pub const ARG_PAYLOAD: &str = "payload";
pub const ARG_ACCOUNT_ID: &str = "account-id";
pub const ARG_CATEGORY: &str = "category";
pub const ARG_START_DATE: &str = "start-date";
pub const ARG_END_DATE: &str = "end-date";

#[must_use]
pub fn with_subcommands(command: Command) -> Command {
    command
        .subcommand(
            Command::new(CMD_DASHBOARD).about("Account overview and recent transactions"),
        )
        .subcommand(Command::new(CMD_BANKS).about("List institutions available for linking"))
        .subcommand(
            Command::new(CMD_CONNECT)
                .about("Link a bank account")
                .arg(
                    Arg::new(ARG_BANK)
                        .long("bank")
                        .help("Institution name, as listed by 'banks'")
                        .required(true),
                )
                .arg(
                    Arg::new(ARG_PAYLOAD)
                        .long("payload")
                        .help("Institution-specific connection payload, a JSON object")
                        .required(true),
                ),
        )
        .subcommand(Command::new(CMD_ACCOUNTS).about("List linked accounts"))
        .subcommand(
            Command::new(CMD_DISCONNECT)
                .about("Unlink a bank account")
                .arg(
                    Arg::new(ARG_ACCOUNT_ID)
                        .long("account-id")
                        .help("Account id, as listed by 'accounts'")
                        .required(true),
                ),
        )
        .subcommand(Command::new(CMD_BALANCES).about("Show balances for linked accounts"))
        .subcommand(
            Command::new(CMD_TRANSACTIONS)
                .about("List transactions, optionally filtered")
                .arg(
                    Arg::new(ARG_CATEGORY)
                        .long("category")
                        .help("Only transactions in this category"),
                )
                .arg(
                    Arg::new(ARG_START_DATE)
                        .long("start-date")
                        .help("Only transactions on or after this date (YYYY-MM-DD)"),
                )
                .arg(
                    Arg::new(ARG_END_DATE)
                        .long("end-date")
                        .help("Only transactions on or before this date (YYYY-MM-DD)"),
                ),
        )
}

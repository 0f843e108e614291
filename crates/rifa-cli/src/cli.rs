//! Command-line definition

use clap::{value_parser, Arg, ArgAction, Command};
use std::path::PathBuf;

/// Subcommands that require the admin password
pub(crate) const ADMIN_COMMANDS: &[&str] = &[
    "approve",
    "reject",
    "withdraw",
    "transactions",
    "draw",
    "draw-cancel",
    "archive",
    "history",
    "set",
    "suspend",
    "resume",
    "prize-add",
    "prize-remove",
    "method-add",
    "method-toggle",
    "method-remove",
    "passwd",
    "describe",
    "reset",
];

fn id_arg(help: &'static str) -> Arg {
    Arg::new("id").required(true).help(help)
}

pub(crate) fn build() -> Command {
    Command::new("rifa")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Digital raffle storefront and admin panel")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("Config file (default: ./rifa.toml if present)"),
        )
        .arg(
            Arg::new("data-dir")
                .long("data-dir")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("Directory holding the raffle records"),
        )
        .arg(
            Arg::new("log-level")
                .long("log-level")
                .global(true)
                .help("Log filter, e.g. info or rifa_core=debug"),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Output as JSON"),
        )
        .arg(
            Arg::new("password")
                .long("password")
                .short('p')
                .global(true)
                .help("Admin password (or RIFA_ADMIN_PASSWORD)"),
        )
        // Storefront
        .subcommand(Command::new("show").about("Show the raffle, prizes and ticket availability"))
        .subcommand(
            Command::new("tickets").about("Show the ticket board").arg(
                Arg::new("available")
                    .long("available")
                    .action(ArgAction::SetTrue)
                    .help("List only available numbers"),
            ),
        )
        .subcommand(
            Command::new("buy")
                .about("Reserve tickets and submit a payment reference")
                .arg(
                    Arg::new("tickets")
                        .long("tickets")
                        .short('t')
                        .required(true)
                        .num_args(1..)
                        .value_delimiter(',')
                        .value_parser(value_parser!(u32))
                        .help("Ticket numbers, e.g. 3,7"),
                )
                .arg(Arg::new("method").long("method").required(true).help("Payment method id"))
                .arg(Arg::new("name").long("name").required(true).help("Buyer name"))
                .arg(Arg::new("phone").long("phone").required(true).help("Buyer phone"))
                .arg(
                    Arg::new("reference")
                        .long("reference")
                        .required(true)
                        .help("Payment reference number"),
                )
                .arg(
                    Arg::new("amount")
                        .long("amount")
                        .value_parser(value_parser!(f64))
                        .help("Amount paid (default: ticket price x count)"),
                ),
        )
        .subcommand(
            Command::new("status")
                .about("Check a participation code")
                .arg(Arg::new("code").required(true).help("Participation code, e.g. TRD-AB12CD")),
        )
        .subcommand(
            Command::new("methods")
                .about("List active payment methods")
                .arg(Arg::new("currency").long("currency").help("Only methods in this currency")),
        )
        // Admin
        .subcommand(Command::new("approve").about("Approve a payment").arg(id_arg("Transaction id")))
        .subcommand(
            Command::new("reject")
                .about("Reject a payment and release its tickets")
                .arg(id_arg("Transaction id"))
                .arg(
                    Arg::new("reason")
                        .long("reason")
                        .default_value("Pago no verificado.")
                        .help("Reason shown to the buyer"),
                ),
        )
        .subcommand(
            Command::new("withdraw")
                .about("Withdraw an approved participant")
                .arg(id_arg("Transaction id")),
        )
        .subcommand(
            Command::new("transactions").about("List transactions").arg(
                Arg::new("status")
                    .long("status")
                    .value_parser(["pending", "approved", "rejected"])
                    .help("Only transactions in this state"),
            ),
        )
        .subcommand(
            Command::new("draw").about("Run the prize drawing").arg(
                Arg::new("instant")
                    .long("instant")
                    .action(ArgAction::SetTrue)
                    .help("Skip the selection delay"),
            ),
        )
        .subcommand(Command::new("draw-cancel").about("Abort a running drawing"))
        .subcommand(Command::new("archive").about("Archive the cycle and start a new one"))
        .subcommand(Command::new("history").about("List archived cycles"))
        .subcommand(
            Command::new("set")
                .about("Update raffle settings")
                .arg(Arg::new("title").long("title"))
                .arg(Arg::new("description").long("description"))
                .arg(Arg::new("price").long("price").value_parser(value_parser!(f64)))
                .arg(Arg::new("total").long("total").value_parser(value_parser!(u32)))
                .arg(Arg::new("date").long("date").help("Drawing date, RFC 3339"))
                .arg(Arg::new("duration").long("duration").value_parser(value_parser!(u64)).help("Selection delay in seconds"))
                .arg(Arg::new("multi-win").long("multi-win").value_parser(value_parser!(bool)))
                .arg(Arg::new("whatsapp").long("whatsapp"))
                .arg(Arg::new("owner").long("owner"))
                .arg(Arg::new("website").long("website")),
        )
        .subcommand(Command::new("suspend").about("Suspend ticket sales"))
        .subcommand(Command::new("resume").about("Resume ticket sales"))
        .subcommand(
            Command::new("prize-add")
                .about("Add a prize ranked last")
                .arg(Arg::new("name").required(true)),
        )
        .subcommand(Command::new("prize-remove").about("Remove a prize").arg(id_arg("Prize id")))
        .subcommand(
            Command::new("method-add")
                .about("Add a payment method")
                .arg(Arg::new("name").long("name").required(true))
                .arg(Arg::new("currency").long("currency").required(true))
                .arg(Arg::new("details").long("details"))
                .arg(Arg::new("instructions").long("instructions")),
        )
        .subcommand(
            Command::new("method-toggle")
                .about("Enable or disable a payment method")
                .arg(id_arg("Payment method id")),
        )
        .subcommand(
            Command::new("method-remove")
                .about("Delete a payment method")
                .arg(id_arg("Payment method id")),
        )
        .subcommand(
            Command::new("passwd")
                .about("Change the admin password")
                .arg(Arg::new("new").long("new").required(true))
                .arg(Arg::new("confirm").long("confirm").required(true)),
        )
        .subcommand(
            Command::new("describe")
                .about("Generate a marketing description")
                .arg(
                    Arg::new("save")
                        .long("save")
                        .action(ArgAction::SetTrue)
                        .help("Store it as the raffle description"),
                ),
        )
        .subcommand(
            Command::new("reset").about("Erase all raffle data").arg(
                Arg::new("yes")
                    .long("yes")
                    .action(ArgAction::SetTrue)
                    .help("Confirm the reset"),
            ),
        )
}

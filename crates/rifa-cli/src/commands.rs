//! Subcommand handlers

use crate::cli::ADMIN_COMMANDS;
use crate::config::AppConfig;
use crate::output::{self, Output, Overview};
use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use clap::ArgMatches;
use rifa_copywriter::{generate_raffle_description, DescriptionRequest, GeminiGenerator};
use rifa_core::prelude::*;
use rifa_store::Storage;
use serde_json::json;

/// Environment variable consulted when `--password` is absent
pub(crate) const PASSWORD_ENV: &str = "RIFA_ADMIN_PASSWORD";

fn arg<'a>(args: &'a ArgMatches, name: &str) -> Result<&'a str> {
    args.get_one::<String>(name)
        .map(String::as_str)
        .with_context(|| format!("missing argument <{name}>"))
}

fn transaction_id(args: &ArgMatches) -> Result<TransactionId> {
    Ok(TransactionId::from(arg(args, "id")?))
}

fn payment_method_id(args: &ArgMatches) -> Result<PaymentMethodId> {
    Ok(PaymentMethodId::from(arg(args, "id")?))
}

fn admin_password(args: &ArgMatches) -> Result<String> {
    if let Some(password) = args.get_one::<String>("password") {
        return Ok(password.clone());
    }
    std::env::var(PASSWORD_ENV)
        .ok()
        .filter(|p| !p.is_empty())
        .with_context(|| format!("admin command requires --password or {PASSWORD_ENV}"))
}

pub(crate) async fn dispatch<S: Storage>(
    service: &RaffleService<S>,
    config: &AppConfig,
    matches: &ArgMatches,
    out: Output,
) -> Result<()> {
    let Some((name, args)) = matches.subcommand() else {
        bail!("no subcommand given");
    };

    if ADMIN_COMMANDS.contains(&name) {
        service
            .authenticate(&admin_password(args)?)
            .context("admin authentication failed")?;
    }

    match name {
        "show" => show(service, out),
        "tickets" => tickets(service, args, out),
        "buy" => buy(service, args, out),
        "status" => {
            let lookup = service.check_status(arg(args, "code")?)?;
            out.emit(&lookup, output::status)
        }
        "methods" => {
            let methods = match args.get_one::<String>("currency") {
                Some(currency) => service.active_payment_methods_for(currency)?,
                None => service.active_payment_methods()?,
            };
            out.emit(&methods, |m| output::payment_methods(m))
        }
        "approve" => {
            let tx = service.approve_transaction(&transaction_id(args)?)?;
            out.emit(&tx, output::transaction)
        }
        "reject" => {
            let tx = service.reject_transaction(&transaction_id(args)?, arg(args, "reason")?)?;
            out.emit(&tx, output::transaction)
        }
        "withdraw" => {
            let tx = service.withdraw_participant(&transaction_id(args)?)?;
            out.emit(&tx, output::transaction)
        }
        "transactions" => {
            let txs = match args.get_one::<String>("status").map(String::as_str) {
                Some("pending") => service.transactions_with_status(TransactionStatus::Pending)?,
                Some("approved") => service.transactions_with_status(TransactionStatus::Approved)?,
                Some("rejected") => service.transactions_with_status(TransactionStatus::Rejected)?,
                _ => service.transactions()?,
            };
            out.emit(&txs, |t| output::transactions(t))
        }
        "draw" => draw(service, args, out).await,
        "draw-cancel" => {
            let config = service.cancel_drawing()?;
            out.emit(&json!({ "raffleStatus": config.raffle_status }), |_| {
                format!("Drawing cancelled, raffle is {}", config.raffle_status)
            })
        }
        "archive" => {
            let cycle = service.archive_current_cycle()?;
            let next = service.config()?.raffle_id;
            out.emit(&cycle, |c| {
                format!(
                    "Archived {} with {} participants. New raffle: {next}",
                    c.id,
                    c.all_participants.len()
                )
            })
        }
        "history" => {
            let cycles = service.history()?;
            out.emit(&cycles, |c| output::history(c))
        }
        "set" => set(service, args, out),
        "suspend" | "resume" => {
            let config = service.set_suspended(name == "suspend")?;
            out.emit(&json!({ "isSuspended": config.is_suspended }), |_| {
                if config.is_suspended {
                    "Sales suspended".to_string()
                } else {
                    "Sales resumed".to_string()
                }
            })
        }
        "prize-add" => {
            let prize = service.add_prize(arg(args, "name")?)?;
            out.emit(&prize, |p| format!("Added prize {}. {} [{}]", p.rank, p.name, p.id))
        }
        "prize-remove" => {
            let prize = service.remove_prize(arg(args, "id")?)?;
            out.emit(&prize, |p| format!("Removed prize {}", p.name))
        }
        "method-add" => {
            let mut method = NewPaymentMethod::new(arg(args, "name")?, arg(args, "currency")?);
            if let Some(details) = args.get_one::<String>("details") {
                method = method.with_details(details.as_str());
            }
            if let Some(instructions) = args.get_one::<String>("instructions") {
                method = method.with_instructions(instructions.as_str());
            }
            let created = service.add_payment_method(method)?;
            out.emit(&created, |m| format!("Added payment method {} [{}]", m.name, m.id))
        }
        "method-toggle" => {
            let method = service.toggle_payment_method(&payment_method_id(args)?)?;
            out.emit(&method, |m| {
                let state = if m.is_active { "enabled" } else { "disabled" };
                format!("{} {state}", m.name)
            })
        }
        "method-remove" => {
            let method = service.delete_payment_method(&payment_method_id(args)?)?;
            out.emit(&method, |m| format!("Removed payment method {}", m.name))
        }
        "passwd" => {
            service.change_admin_password(
                &admin_password(args)?,
                arg(args, "new")?,
                arg(args, "confirm")?,
            )?;
            out.emit(&json!({ "changed": true }), |_| "Admin password changed".to_string())
        }
        "describe" => describe(service, config, args, out).await,
        "reset" => {
            if !args.get_flag("yes") {
                bail!("refusing to erase all data without --yes");
            }
            service.reset_data()?;
            out.emit(&json!({ "reset": true }), |_| "All raffle data erased".to_string())
        }
        other => bail!("unknown command {other}"),
    }
}

fn show<S: Storage>(service: &RaffleService<S>, out: Output) -> Result<()> {
    let view = Overview {
        config: service.config()?,
        availability: service.availability()?,
    };
    out.emit(&view, output::overview)
}

fn tickets<S: Storage>(service: &RaffleService<S>, args: &ArgMatches, out: Output) -> Result<()> {
    let tickets = service.tickets()?;
    if args.get_flag("available") {
        let available: Vec<TicketNumber> = tickets
            .iter()
            .filter(|t| t.is_available())
            .map(|t| t.number)
            .collect();
        return out.emit(&available, |n| output::numbers(n));
    }
    out.emit(&tickets, |t| output::ticket_board(t))
}

fn buy<S: Storage>(service: &RaffleService<S>, args: &ArgMatches, out: Output) -> Result<()> {
    let ticket_numbers: Vec<TicketNumber> = args
        .get_many::<u32>("tickets")
        .map(|values| values.copied().collect())
        .unwrap_or_default();
    let method_id = PaymentMethodId::from(arg(args, "method")?);
    let method = service
        .payment_method(&method_id)?
        .with_context(|| format!("unknown payment method {method_id}"))?;

    let mut distinct = ticket_numbers.clone();
    distinct.sort_unstable();
    distinct.dedup();
    let amount = match args.get_one::<f64>("amount") {
        Some(amount) => *amount,
        None => service.purchase_quote(distinct.len())?,
    };

    let tx = service.create_transaction(PurchaseRequest {
        ticket_numbers,
        payment_method_id: method.id,
        currency: method.currency,
        amount,
        reference_number: arg(args, "reference")?.to_string(),
        customer_name: arg(args, "name")?.to_string(),
        customer_phone: arg(args, "phone")?.to_string(),
    })?;

    out.emit(&tx, |t| {
        format!(
            "{}\nYour payment is pending review. Keep your code: {}",
            output::transaction(t).trim_end(),
            t.unique_code.as_deref().unwrap_or("-")
        )
    })
}

async fn draw<S: Storage>(service: &RaffleService<S>, args: &ArgMatches, out: Output) -> Result<()> {
    let winners = if args.get_flag("instant") {
        service.start_drawing()?;
        service.complete_drawing()?
    } else {
        let seconds = service.config()?.selection_duration;
        if seconds > 0 {
            eprintln!("Selecting winners ({seconds}s)...");
        }
        service.run_drawing().await?
    };
    out.emit(&winners, |w| output::winners(w))
}

fn set<S: Storage>(service: &RaffleService<S>, args: &ArgMatches, out: Output) -> Result<()> {
    let mut config = service.config()?;
    let text = |name: &str| args.get_one::<String>(name).cloned();

    if let Some(title) = text("title") {
        config.title = title;
    }
    if let Some(description) = text("description") {
        config.description = description;
    }
    if let Some(price) = args.get_one::<f64>("price") {
        config.ticket_price = *price;
    }
    if let Some(total) = args.get_one::<u32>("total") {
        config.total_tickets = *total;
    }
    if let Some(date) = text("date") {
        config.raffle_date = DateTime::parse_from_rfc3339(&date)
            .with_context(|| format!("invalid date {date}, expected RFC 3339"))?
            .with_timezone(&Utc);
    }
    if let Some(duration) = args.get_one::<u64>("duration") {
        config.selection_duration = *duration;
    }
    if let Some(multi) = args.get_one::<bool>("multi-win") {
        config.allow_multiple_wins = *multi;
    }
    if let Some(whatsapp) = text("whatsapp") {
        config.whatsapp_contact = whatsapp;
    }
    if let Some(owner) = text("owner") {
        config.owner_name = owner;
    }
    if let Some(website) = text("website") {
        config.website_name = website;
    }

    let config = service.update_config(config)?;
    let availability = service.availability()?;
    out.emit(
        &Overview {
            config,
            availability,
        },
        output::overview,
    )
}

async fn describe<S: Storage>(
    service: &RaffleService<S>,
    config: &AppConfig,
    args: &ArgMatches,
    out: Output,
) -> Result<()> {
    let raffle = service.config()?;
    let request = DescriptionRequest::new(
        raffle.title.clone(),
        raffle.ticket_price,
        raffle.prizes.iter().map(|p| p.name.clone()).collect(),
    );
    let generator = GeminiGenerator::new(config.gemini()).context("failed to build HTTP client")?;
    let description = generate_raffle_description(&generator, &request).await;

    if args.get_flag("save") {
        service.set_description(&description)?;
    }
    out.emit(&json!({ "description": description }), |_| description.clone())
}

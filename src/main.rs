mod logging;

use std::env::{self, VarError};
use std::path::PathBuf;

use eyre::WrapErr;
use namecheap::{Config, Domain, EmailForward, HostRecord, ListFilters, Namecheap, RecordType};
use serde::Serialize;

use self::logging::Logger;

#[derive(Debug, clap::Parser)]
#[command(version, about, max_term_width = 100)]
struct Args {
    /// Path to the TOML file holding API credentials.
    #[arg(
        short,
        long,
        env = "NAMECHEAP_CONFIG",
        value_name = "FILE",
        default_value = "/etc/namecheap.toml"
    )]
    config: PathBuf,

    /// Controls the verbosity of logs.
    ///
    /// Possible log levels are 'error', 'warn', 'info', 'debug', and 'trace' (in that order).
    #[arg(long, env = "NAMECHEAP_LOG_LEVEL", value_name = "LEVEL", default_value = "info")]
    log_level: log::LevelFilter,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, clap::Subcommand)]
enum Command {
    /// List the domains on the account.
    Domains {
        /// Filter to apply, e.g. `search_term=shop` or `page=2`. May be repeated.
        ///
        /// Recognized keys are 'list_type', 'search_term', 'page', 'num_domains', and 'sort_by'.
        #[arg(short, long = "filter", value_name = "KEY=VALUE", value_parser = parse_filter)]
        filters: Vec<(String, String)>,
    },

    /// Show a single domain.
    Domain { name: String },

    /// Show or change a domain's nameservers.
    Nameservers {
        domain: String,
        #[command(subcommand)]
        action: Option<NameserverAction>,
    },

    /// Show or change a domain's host records.
    Hosts {
        domain: String,
        #[command(subcommand)]
        action: Option<HostAction>,
    },

    /// Show or change a domain's email forwarding.
    Forwarding {
        domain: String,
        #[command(subcommand)]
        action: Option<ForwardingAction>,
    },

    /// Show the account's balances.
    Balances,
}

#[derive(Debug, clap::Subcommand)]
enum NameserverAction {
    /// Delegate to custom nameservers.
    Set {
        #[arg(required = true)]
        nameservers: Vec<String>,
        /// Keep the current nameservers and add these to them.
        #[arg(long)]
        append: bool,
    },
    /// Go back to Namecheap's default DNS.
    Default,
    /// Remove nameservers from the custom set. Removing all of them restores the defaults.
    Remove {
        #[arg(required = true)]
        nameservers: Vec<String>,
    },
}

#[derive(Debug, clap::Subcommand)]
enum HostAction {
    /// Show only MX and MXE records.
    Mx,
    /// Add a record, or replace the existing record with the same host name.
    Set {
        /// Host name, e.g. `www` or `@`.
        #[arg(long)]
        name: String,
        #[arg(long = "type", value_name = "TYPE")]
        record_type: String,
        #[arg(long)]
        address: String,
        #[arg(long)]
        ttl: Option<u32>,
        #[arg(long)]
        mx_pref: Option<u32>,
    },
    /// Delete records by host name.
    Delete {
        #[arg(required = true)]
        names: Vec<String>,
        /// Delete MX/MXE records instead of other records.
        #[arg(long)]
        mx: bool,
    },
}

#[derive(Debug, clap::Subcommand)]
enum ForwardingAction {
    /// Forward a mailbox to an address.
    Set { mailbox: String, email: String },
    /// Remove forwarding rules by mailbox and/or target address.
    Remove {
        #[arg(long)]
        mailbox: Vec<String>,
        #[arg(long)]
        email: Vec<String>,
    },
}

/// Reads an environment variable. Any `.env` file has already been loaded into the environment by then.
pub(crate) fn get_var(key: &str) -> Result<String, VarError> {
    env::var(key)
}

fn parse_filter(arg: &str) -> Result<(String, String), String> {
    arg.split_once('=')
        .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
        .ok_or_else(|| format!("expected KEY=VALUE, got `{arg}`"))
}

fn main() -> eyre::Result<()> {
    #[cfg(feature = "dotenv")]
    let _ = dotenvy::dotenv();

    let args = <Args as clap::Parser>::parse();
    Logger::new(args.log_level).init().wrap_err("Failed to initialize logger")?;

    let config = Config::load(&args.config).wrap_err("Invalid configuration")?;
    log::debug!("Using {} endpoint {}", config.environment(), config.endpoint());
    let namecheap = Namecheap::new(config).wrap_err("Failed to set up HTTP client")?;

    run(&namecheap, args.command).wrap_err("Request failed")
}

fn run(namecheap: &Namecheap, command: Command) -> eyre::Result<()> {
    match command {
        Command::Domains { filters } => {
            let filters = ListFilters::from_pairs(filters.iter().map(|(k, v)| (&k[..], &v[..])))?;
            print(&namecheap.domains().list(&filters)?.body)
        },
        Command::Domain { name } => match namecheap.domains().get(&name)?.body {
            Some(domain) => print(&domain),
            None => Err(eyre::eyre!("Domain {name} not found on this account")),
        },
        Command::Nameservers { domain, action } => {
            let domain = Domain::new(domain)?;
            let nameservers = namecheap.nameservers();
            match action {
                None => print(&nameservers.get(&domain)?.body),
                Some(NameserverAction::Set { nameservers: list, append }) => {
                    print(&nameservers.set_custom(&domain, &list, !append)?.body)
                },
                Some(NameserverAction::Default) => print(&nameservers.set_default(&domain)?.body),
                Some(NameserverAction::Remove { nameservers: list }) => print(&nameservers.delete(&domain, &list)?.body),
            }
        },
        Command::Hosts { domain, action } => {
            let domain = Domain::new(domain)?;
            let hosts = namecheap.hosts();
            match action {
                None => print(&hosts.get_all(&domain)?.body),
                Some(HostAction::Mx) => print(&hosts.mx_records(&domain)?.body),
                Some(HostAction::Set {
                    name,
                    record_type,
                    address,
                    ttl,
                    mx_pref,
                }) => {
                    let Ok(record_type) = record_type.parse::<RecordType>();
                    let mut record = HostRecord::new(name, record_type, address);
                    record.ttl = ttl;
                    record.mx_pref = mx_pref;

                    let response = if record.is_mail() {
                        hosts.set_mx_records(&domain, &[record])?
                    } else {
                        hosts.set_host_records(&domain, &[record])?
                    };
                    print(&response.body)
                },
                Some(HostAction::Delete { names, mx: true }) => print(&hosts.delete_mx_hosts(&domain, &names)?.body),
                Some(HostAction::Delete { names, mx: false }) => {
                    print(&hosts.delete_host_records(&domain, &names)?.body)
                },
            }
        },
        Command::Forwarding { domain, action } => {
            let domain = Domain::new(domain)?;
            let forwarding = namecheap.email_forwarding();
            match action {
                None => print(&forwarding.get(&domain)?.body),
                Some(ForwardingAction::Set { mailbox, email }) => {
                    print(&forwarding.set(&domain, &[EmailForward::new(mailbox, email)])?.body)
                },
                Some(ForwardingAction::Remove { mailbox, email }) => {
                    if mailbox.is_empty() && email.is_empty() {
                        eyre::bail!("Nothing to remove: pass at least one --mailbox or --email");
                    }
                    print(&forwarding.remove(&domain, &mailbox, &email)?.body)
                },
            }
        },
        Command::Balances => print(&namecheap.account().balances()?.body),
    }
}

fn print<T: Serialize>(value: &T) -> eyre::Result<()> {
    let json = serde_json::to_string_pretty(value).wrap_err("Failed to serialize output")?;
    println!("{json}");
    Ok(())
}

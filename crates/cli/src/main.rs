use std::fs;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};

use ledger::{filter_entries, monthly_series, totals, EntryDraft, Flow, Ledger, LedgerView};
use models::{Member, PayMode};
use portfolio::{FdDraft, Portfolio};
use store::Collection;

#[derive(Parser, Debug)]
#[command(name = "finbook", about = "Household income/expense ledger and FD portfolio tracker.")]
struct Args {
    /// Directory holding the stored collections (ledger.json, fd_records.json)
    #[arg(long, default_value = "data", global = true)]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Income/expense ledger
    #[command(subcommand)]
    Ledger(LedgerCmd),
    /// Fixed-deposit portfolio
    #[command(subcommand)]
    Fd(FdCmd),
}

#[derive(Subcommand, Debug)]
enum LedgerCmd {
    /// Add a new entry (exactly one of --income / --expense)
    Add {
        /// Entry date, YYYY-MM-DD; defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Income amount
        #[arg(long)]
        income: Option<f64>,
        /// Expenditure amount
        #[arg(long)]
        expense: Option<f64>,
        /// Payment mode for expenses (Cash or Card)
        #[arg(long, default_value = "Cash")]
        mode: PayMode,
        /// Description
        #[arg(long)]
        desc: String,
        /// Remark
        #[arg(long, default_value = "")]
        rem: String,
        /// Owning member
        #[arg(long, default_value = "Family")]
        member: Member,
    },
    /// List entries with the active filters and running totals
    List {
        #[arg(long, default_value = "Family")]
        member: Member,
        /// Case-insensitive text matched against description, remark and date
        #[arg(long, default_value = "")]
        search: String,
        /// Month filter, YYYY-MM
        #[arg(long)]
        month: Option<String>,
    },
    /// Print the running totals for the active filters, without the table
    Summary {
        #[arg(long, default_value = "Family")]
        member: Member,
        #[arg(long, default_value = "")]
        search: String,
        #[arg(long)]
        month: Option<String>,
    },
    /// Replace the entry with the given id
    Edit {
        id: u64,
        #[arg(long)]
        date: Option<NaiveDate>,
        #[arg(long)]
        income: Option<f64>,
        #[arg(long)]
        expense: Option<f64>,
        #[arg(long, default_value = "Cash")]
        mode: PayMode,
        #[arg(long)]
        desc: String,
        #[arg(long, default_value = "")]
        rem: String,
        #[arg(long, default_value = "Family")]
        member: Member,
    },
    /// Delete the entry with the given id (asks for confirmation)
    Delete {
        id: u64,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Trailing-12-month income/expense trend plus the cash/card split
    Trend {
        #[arg(long, default_value = "Family")]
        member: Member,
    },
    /// Delete every entry (asks for confirmation)
    Reset {
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand, Debug)]
enum FdCmd {
    /// Add a new FD record
    Add {
        #[arg(long)]
        depositor: String,
        #[arg(long, default_value = "BOC")]
        bank: String,
        #[arg(long, default_value = "")]
        acc_no: String,
        #[arg(long, default_value = "0")]
        amount: String,
        #[arg(long, default_value = "0")]
        rate: String,
        #[arg(long, default_value = "")]
        period: String,
        #[arg(long, default_value = "0")]
        interest: String,
        #[arg(long, default_value = "")]
        maturity: String,
        #[arg(long, default_value = "0")]
        tax: String,
    },
    /// List all records with column totals
    List,
    /// Replace the record with the given id
    Edit {
        id: u64,
        #[arg(long)]
        depositor: String,
        #[arg(long, default_value = "BOC")]
        bank: String,
        #[arg(long, default_value = "")]
        acc_no: String,
        #[arg(long, default_value = "0")]
        amount: String,
        #[arg(long, default_value = "0")]
        rate: String,
        #[arg(long, default_value = "")]
        period: String,
        #[arg(long, default_value = "0")]
        interest: String,
        #[arg(long, default_value = "")]
        maturity: String,
        #[arg(long, default_value = "0")]
        tax: String,
    },
    /// Delete the record with the given id (asks for confirmation)
    Delete {
        id: u64,
        #[arg(long)]
        yes: bool,
    },
    /// Print the amount/interest/tax column totals
    Totals,
    /// Export all records as CSV
    Export {
        /// Output path; defaults to fd_portfolio_backup.csv
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "finbook=info,ledger=info,portfolio=info,store=warn".into()),
        )
        .init();

    let args = Args::parse();

    match args.command {
        Command::Ledger(cmd) => {
            let collection = Collection::new(args.data_dir.join("ledger.json"));
            run_ledger(cmd, Ledger::open(collection))
        }
        Command::Fd(cmd) => {
            let collection = Collection::new(args.data_dir.join("fd_records.json"));
            run_fd(cmd, Portfolio::open(collection))
        }
    }
}

fn run_ledger(cmd: LedgerCmd, mut book: Ledger) -> Result<()> {
    match cmd {
        LedgerCmd::Add {
            date,
            income,
            expense,
            mode,
            desc,
            rem,
            member,
        } => {
            let draft = entry_draft(date, income, expense, mode, desc, rem, member)?;
            let id = book.add(draft)?;
            println!("Added entry {}", id);
        }
        LedgerCmd::List {
            member,
            search,
            month,
        } => {
            let view = LedgerView {
                member,
                search,
                month,
            };
            let visible = filter_entries(book.entries(), &view);
            println!(
                "{:<16} {:<12} {:>12} {:>12} {:<8} {:<24} {:<16} {:<8}",
                "ID", "DATE", "INCOME", "EXPENSE", "MODE", "DESC", "REMARK", "MEMBER"
            );
            for e in &visible {
                println!(
                    "{:<16} {:<12} {:>12} {:>12} {:<8} {:<24} {:<16} {:<8}",
                    e.id,
                    e.date_string(),
                    fmt_amount(e.income),
                    fmt_amount(e.expenditure),
                    e.category.to_string(),
                    e.desc,
                    e.rem,
                    e.member.to_string(),
                );
            }
            println!();
            print_ledger_totals(&visible, &view);
        }
        LedgerCmd::Summary {
            member,
            search,
            month,
        } => {
            let view = LedgerView {
                member,
                search,
                month,
            };
            let visible = filter_entries(book.entries(), &view);
            print_ledger_totals(&visible, &view);
        }
        LedgerCmd::Edit {
            id,
            date,
            income,
            expense,
            mode,
            desc,
            rem,
            member,
        } => {
            let draft = entry_draft(date, income, expense, mode, desc, rem, member)?;
            book.update(id, draft)?;
            println!("Updated entry {}", id);
        }
        LedgerCmd::Delete { id, yes } => {
            let removed = book.delete(id, |entry| {
                yes || confirm(&format!(
                    "Delete entry {} ({} {})? [y/N] ",
                    entry.id,
                    entry.date_string(),
                    entry.desc
                ))
            })?;
            if removed {
                println!("Deleted entry {}", id);
            } else {
                println!("Kept entry {}", id);
            }
        }
        LedgerCmd::Trend { member } => {
            let today = Local::now().date_naive();
            let series = monthly_series(book.entries(), member, today);
            println!("{:<8} {:>12} {:>12}", "MONTH", "INCOME", "EXPENSE");
            for bucket in &series.months {
                println!(
                    "{:<8} {:>12.2} {:>12.2}",
                    bucket.label, bucket.income, bucket.expenditure
                );
            }
            println!();
            println!(
                "Expense modes: cash {:.2} / card {:.2}",
                series.modes.cash, series.modes.card
            );
        }
        LedgerCmd::Reset { yes } => {
            let cleared = book.clear(|count| {
                yes || confirm(&format!("Clear all {} entries? [y/N] ", count))
            })?;
            if cleared {
                println!("All entries cleared");
            } else {
                println!("Nothing changed");
            }
        }
    }
    Ok(())
}

fn run_fd(cmd: FdCmd, mut portfolio: Portfolio) -> Result<()> {
    match cmd {
        FdCmd::Add {
            depositor,
            bank,
            acc_no,
            amount,
            rate,
            period,
            interest,
            maturity,
            tax,
        } => {
            let id = portfolio.add(FdDraft {
                depositor,
                bank,
                acc_no,
                amount,
                rate,
                period,
                interest,
                maturity,
                tax,
            })?;
            println!("Added FD record {}", id);
        }
        FdCmd::List => {
            println!(
                "{:<16} {:<16} {:<8} {:<12} {:>14} {:>8} {:<8} {:>12} {:<12} {:>10}",
                "ID", "DEPOSITOR", "BANK", "ACCOUNT", "AMOUNT", "RATE %", "PERIOD", "INTEREST",
                "MATURITY", "TAX"
            );
            for r in portfolio.records() {
                println!(
                    "{:<16} {:<16} {:<8} {:<12} {:>14} {:>8} {:<8} {:>12} {:<12} {:>10}",
                    r.id,
                    r.depositor,
                    r.bank,
                    r.acc_no,
                    r.amount,
                    r.rate,
                    r.period,
                    r.interest,
                    r.maturity,
                    r.tax
                );
            }
            let t = portfolio::totals(portfolio.records());
            println!();
            println!(
                "TOTAL  amount {:.2}  interest {:.2}  tax {:.2}",
                t.amount, t.interest, t.tax
            );
        }
        FdCmd::Edit {
            id,
            depositor,
            bank,
            acc_no,
            amount,
            rate,
            period,
            interest,
            maturity,
            tax,
        } => {
            portfolio.update(
                id,
                FdDraft {
                    depositor,
                    bank,
                    acc_no,
                    amount,
                    rate,
                    period,
                    interest,
                    maturity,
                    tax,
                },
            )?;
            println!("Updated FD record {}", id);
        }
        FdCmd::Delete { id, yes } => {
            let removed = portfolio.delete(id, |record| {
                yes || confirm(&format!(
                    "Delete FD record {} ({})? [y/N] ",
                    record.id, record.depositor
                ))
            })?;
            if removed {
                println!("Deleted FD record {}", id);
            } else {
                println!("Kept FD record {}", id);
            }
        }
        FdCmd::Totals => {
            let t = portfolio::totals(portfolio.records());
            println!("Records: {}", portfolio.records().len());
            println!("Amount:   {:.2}", t.amount);
            println!("Interest: {:.2}", t.interest);
            println!("Tax:      {:.2}", t.tax);
        }
        FdCmd::Export { output } => {
            let csv = portfolio.export()?;
            let path = output.unwrap_or_else(|| PathBuf::from(portfolio::EXPORT_FILENAME));
            fs::write(&path, csv)
                .with_context(|| format!("writing export to {}", path.display()))?;
            println!(
                "Exported {} records to {}",
                portfolio.records().len(),
                path.display()
            );
        }
    }
    Ok(())
}

fn print_ledger_totals(visible: &[&models::LedgerEntry], view: &LedgerView) {
    let t = totals(visible);
    println!("Entries: {}", visible.len());
    println!(
        "Income: {:.2}  Expense: {:.2}  (cash {:.2} / card {:.2})",
        t.income, t.expenditure, t.cash, t.card
    );
    let label = if view.month.is_some() {
        "Monthly Balance"
    } else {
        "Net Balance"
    };
    println!("{}: {:.2}", label, t.net());
}

/// Build an entry draft from the add/edit flags, enforcing that exactly
/// one of income/expense was given. Income entries drop the payment
/// mode in favour of the `"-"` sentinel.
fn entry_draft(
    date: Option<NaiveDate>,
    income: Option<f64>,
    expense: Option<f64>,
    mode: PayMode,
    desc: String,
    rem: String,
    member: Member,
) -> Result<EntryDraft> {
    let flow = match (income, expense) {
        (Some(amount), None) => Flow::Income(amount),
        (None, Some(amount)) => Flow::Expense(amount, mode),
        _ => bail!("give exactly one of --income or --expense"),
    };
    match flow {
        Flow::Income(a) | Flow::Expense(a, _) if a < 0.0 => {
            bail!("amounts must be non-negative")
        }
        _ => {}
    }
    Ok(EntryDraft {
        date: date.unwrap_or_else(|| Local::now().date_naive()),
        flow,
        desc,
        rem,
        member,
    })
}

fn fmt_amount(v: f64) -> String {
    if v > 0.0 {
        format!("{:.2}", v)
    } else {
        "-".to_string()
    }
}

/// Synchronous y/N prompt gating destructive operations.
fn confirm(prompt: &str) -> bool {
    print!("{}", prompt);
    let _ = io::stdout().flush();
    let mut line = String::new();
    if io::stdin().lock().read_line(&mut line).is_err() {
        return false;
    }
    let answer = line.trim();
    answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes")
}

use std::{error::Error, io::Write, str::FromStr};

use chrono::Utc;
use chrono_tz::Tz;
use clap::{Args, Parser, Subcommand};
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    style::Print,
    terminal,
    terminal::ClearType,
};
use engine::{Engine, NewUser, Rate, Role};
use migration::MigratorTrait;
use sea_orm::{Database, DatabaseConnection};

#[derive(Parser, Debug)]
#[command(name = "caja_admin")]
#[command(about = "Admin utilities for Caja (bootstrap users, exchange rates)")]
struct Cli {
    /// Database connection string (also read from `DATABASE_URL`).
    #[arg(long, env = "DATABASE_URL", default_value = "sqlite:./caja.db?mode=rwc")]
    database_url: String,

    /// Business timezone used to date closings.
    #[arg(long, env = "CAJA_TIMEZONE", default_value = "America/Caracas")]
    timezone: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    User(User),
    Rate(RateCmd),
}

#[derive(Args, Debug)]
struct User {
    #[command(subcommand)]
    command: UserCommand,
}

#[derive(Subcommand, Debug)]
enum UserCommand {
    /// Create an account; the PIN is asked interactively.
    Create(UserCreateArgs),
    /// Deactivate an account on behalf of an admin.
    Deactivate(UserDeactivateArgs),
    /// List accounts on behalf of an admin.
    List(ActingArgs),
}

#[derive(Args, Debug)]
struct UserCreateArgs {
    #[arg(long)]
    username: String,
    #[arg(long, default_value = "cajera")]
    role: String,
    #[arg(long)]
    first_name: String,
    #[arg(long)]
    last_name: String,
}

#[derive(Args, Debug)]
struct UserDeactivateArgs {
    #[arg(long)]
    username: String,
    #[command(flatten)]
    acting: ActingArgs,
}

#[derive(Args, Debug)]
struct ActingArgs {
    /// Existing user the operation runs as.
    #[arg(long = "as")]
    as_user: String,
}

#[derive(Args, Debug)]
struct RateCmd {
    #[command(subcommand)]
    command: RateCommand,
}

#[derive(Subcommand, Debug)]
enum RateCommand {
    /// Record the current Bs/USD rate.
    Set(RateSetArgs),
    /// Print the current rate.
    Show,
}

#[derive(Args, Debug)]
struct RateSetArgs {
    /// Bs per USD, e.g. `36.50`.
    #[arg(long)]
    rate: String,
    #[command(flatten)]
    acting: ActingArgs,
}

type CliResult<T> = Result<T, Box<dyn Error + Send + Sync>>;

const PIN_MAX_DIGITS: usize = 5;

/// Keeps the terminal in raw mode while a PIN is typed.
struct RawTerminal;

impl RawTerminal {
    fn enable() -> CliResult<Self> {
        terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawTerminal {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

fn notice(out: &mut impl Write, message: &str) -> CliResult<()> {
    execute!(
        out,
        cursor::MoveToColumn(0),
        terminal::Clear(ClearType::CurrentLine),
        Print(message),
        Print("\r\n")
    )?;
    Ok(())
}

/// Reads digits only, echoing `*`, up to [`PIN_MAX_DIGITS`].
fn read_pin(label: &str) -> CliResult<String> {
    let _raw = RawTerminal::enable()?;
    let mut out = std::io::stderr();
    execute!(
        out,
        cursor::MoveToColumn(0),
        terminal::Clear(ClearType::CurrentLine),
        Print(label)
    )?;

    let mut digits = String::with_capacity(PIN_MAX_DIGITS);
    loop {
        let Event::Key(KeyEvent {
            code, modifiers, ..
        }) = event::read()?
        else {
            continue;
        };
        let ctrl = modifiers.contains(KeyModifiers::CONTROL);

        match code {
            KeyCode::Enter => break,
            KeyCode::Char('c') if ctrl => {
                execute!(out, Print("\r\n"))?;
                return Err("interrupted".into());
            }
            KeyCode::Backspace if digits.pop().is_some() => {
                execute!(out, cursor::MoveLeft(1), Print(" "), cursor::MoveLeft(1))?;
            }
            KeyCode::Char(ch) if !ctrl && ch.is_ascii_digit() && digits.len() < PIN_MAX_DIGITS => {
                digits.push(ch);
                execute!(out, Print("*"))?;
            }
            _ => {}
        }
        out.flush()?;
    }

    execute!(out, Print("\r\n"))?;
    out.flush()?;
    Ok(digits)
}

/// Asks for the PIN and its confirmation, three attempts at most.
///
/// The engine validates the PIN too; the length check here only saves a
/// round-trip for an obvious typo.
fn ask_new_pin() -> CliResult<String> {
    let mut out = std::io::stderr();
    for _ in 0..3 {
        let pin = read_pin("PIN (4-5 digits): ")?;
        if pin.len() < 4 {
            notice(&mut out, "PIN must have 4 or 5 digits.")?;
            continue;
        }
        if read_pin("Repeat PIN: ")? == pin {
            return Ok(pin);
        }
        notice(&mut out, "PINs do not match.")?;
    }
    Err("too many attempts".into())
}

async fn connect_db(database_url: &str) -> CliResult<DatabaseConnection> {
    let db = Database::connect(database_url).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

#[tokio::main]
async fn main() -> CliResult<()> {
    let cli = Cli::parse();

    let timezone = match Tz::from_str(&cli.timezone) {
        Ok(tz) => tz,
        Err(err) => {
            eprintln!("invalid timezone {}: {err}", cli.timezone);
            std::process::exit(2);
        }
    };

    let db = connect_db(&cli.database_url).await?;
    let engine = Engine::builder()
        .database(db)
        .timezone(timezone)
        .build()
        .await?;

    match cli.command {
        Command::User(User {
            command: UserCommand::Create(args),
        }) => {
            let role = match Role::try_from(args.role.as_str()) {
                Ok(role) => role,
                Err(err) => {
                    eprintln!("{err}");
                    std::process::exit(2);
                }
            };
            let pin = ask_new_pin()?;

            let user = engine
                .bootstrap_user(NewUser {
                    username: args.username,
                    pin,
                    role,
                    first_name: args.first_name,
                    last_name: args.last_name,
                })
                .await?;
            println!("created user: {} ({})", user.username, user.role.as_str());
        }
        Command::User(User {
            command: UserCommand::Deactivate(args),
        }) => {
            let session = engine.session_for_user(&args.acting.as_user).await?;
            let user = engine.deactivate_user(&session, &args.username).await?;
            println!("deactivated user: {}", user.username);
        }
        Command::User(User {
            command: UserCommand::List(acting),
        }) => {
            let session = engine.session_for_user(&acting.as_user).await?;
            for user in engine.list_users(&session).await? {
                println!(
                    "{}\t{}\t{} {}\t{}",
                    user.username,
                    user.role.as_str(),
                    user.first_name,
                    user.last_name,
                    if user.active { "active" } else { "inactive" }
                );
            }
        }
        Command::Rate(RateCmd {
            command: RateCommand::Set(args),
        }) => {
            let rate = match Rate::from_str(&args.rate) {
                Ok(rate) => rate,
                Err(err) => {
                    eprintln!("{err}");
                    std::process::exit(2);
                }
            };
            let session = engine.session_for_user(&args.acting.as_user).await?;
            let recorded = engine
                .record_exchange_rate(&session, rate, Utc::now())
                .await?;
            println!("recorded rate: {} Bs/USD ({})", recorded.rate, recorded.id);
        }
        Command::Rate(RateCmd {
            command: RateCommand::Show,
        }) => match engine.latest_exchange_rate().await? {
            Some(rate) => println!(
                "{} Bs/USD, recorded {} by {}",
                rate.rate,
                rate.recorded_at.with_timezone(&timezone),
                rate.recorded_by
            ),
            None => println!("no exchange rate recorded yet"),
        },
    }

    Ok(())
}

use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use coolcare::config::ClientConfig;
use coolcare::errors::ClientError;
use coolcare::models::{Access, Booking, BookingStatus, NewService, Service};
use coolcare::services::admin::{self, StatusFilter};
use coolcare::services::auth::{OTP_FAILED_MESSAGE, RESET_LINK_FAILED_MESSAGE, SIGNUP_FAILED_MESSAGE};
use coolcare::services::booking::{BOOKING_FAILED_MESSAGE, SERVICES_FAILED_MESSAGE};
use coolcare::services::history::{self, MY_BOOKINGS_FAILED_MESSAGE};
use coolcare::services::session::{ADMIN_LOGIN_FAILED_MESSAGE, LOGIN_FAILED_MESSAGE};
use coolcare::services::slots::{SlotResolver, SLOTS_FAILED_MESSAGE};
use coolcare::state::AppState;

const CONTACT_BANNER: &str = "Need help right away? Call CoolCare on 1800-123-4567 (10:00-19:00, all days).";

#[derive(Parser)]
#[command(name = "coolcare", version, about = "Book CoolCare appliance services from the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show the welcome screen
    Home,
    /// List the service catalog
    Services,
    /// Show free time slots for a service on a date
    Slots {
        #[arg(long)]
        service: String,
        /// YYYY-MM-DD
        #[arg(long)]
        date: String,
    },
    /// Book a service
    Book {
        #[arg(long)]
        service: String,
        #[arg(long)]
        date: String,
        #[arg(long)]
        time: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        address: String,
        /// 10 digits, no separators
        #[arg(long)]
        contact: String,
    },
    /// List your bookings
    MyBookings,
    Signup {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Confirm the code e-mailed after signup
    VerifyOtp {
        #[arg(long)]
        email: String,
        #[arg(long)]
        otp: String,
    },
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Log in to the admin console with the shared password
    AdminLogin {
        #[arg(long)]
        password: String,
    },
    Logout,
    Whoami,
    /// Reset a forgotten password with an e-mailed code
    ForgotPassword {
        #[arg(long)]
        email: String,
    },
    /// Reset a password with the token from an e-mailed link
    ResetPassword {
        #[arg(long)]
        token: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        confirm: String,
    },
    #[command(subcommand)]
    Admin(AdminCommand),
}

#[derive(Subcommand)]
enum AdminCommand {
    Bookings {
        /// All, Pending, Assigned or Completed
        #[arg(long, default_value = "All")]
        status: String,
    },
    Services,
    AddService {
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long)]
        price: f64,
        /// Minutes
        #[arg(long)]
        duration: u32,
    },
    DeleteService {
        id: String,
    },
    SetStatus {
        id: String,
        status: String,
    },
    DeleteBooking {
        id: String,
    },
}

impl Command {
    /// Account-entry commands make no sense once logged in.
    fn is_guest_only(&self) -> bool {
        matches!(
            self,
            Command::Signup { .. } | Command::VerifyOtp { .. } | Command::Login { .. }
        )
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn fail(e: ClientError, fallback: &str) -> anyhow::Error {
    anyhow::anyhow!(e.user_message(fallback))
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = ClientConfig::from_env().map_err(|e| anyhow::anyhow!("{e}"))?;
    tracing::debug!(api_url = %config.api_url, db = %config.database_url, "starting");
    let state = AppState::from_config(config)?;

    if let Err(e) = state.session.restore().await {
        tracing::warn!(error = %e, "session restore failed, continuing anonymously");
    }

    if cli.command.is_guest_only() {
        guest_only(&state)?;
    }

    match cli.command {
        Command::Home => home(&state)?,
        Command::Services => {
            let services = state
                .api
                .list_services()
                .await
                .map_err(|e| fail(e, SERVICES_FAILED_MESSAGE))?;
            print_services(&services);
        }
        Command::Slots { service, date } => {
            let resolver = SlotResolver::new(state.api.clone(), state.config.working_hours.clone());
            let slots = resolver
                .resolve(&service, &date)
                .await
                .map_err(|e| fail(e, SLOTS_FAILED_MESSAGE))?;
            match slots.notice() {
                Some(notice) => println!("{notice}"),
                None => println!("{}", slots.slots.join("  ")),
            }
        }
        Command::Book {
            service,
            date,
            time,
            name,
            address,
            contact,
        } => {
            let mut workflow = state.booking_workflow();
            workflow
                .load_services()
                .await
                .map_err(|e| fail(e, SERVICES_FAILED_MESSAGE))?;
            workflow
                .select_service(&service)
                .await
                .map_err(|e| fail(e, SLOTS_FAILED_MESSAGE))?;
            workflow
                .set_date(&date)
                .await
                .map_err(|e| fail(e, SLOTS_FAILED_MESSAGE))?;
            workflow.set_time(&time);
            workflow.set_name(&name);
            workflow.set_address(&address);
            workflow.set_contact_number(&contact);

            let token = state.session.token();
            let confirmation = workflow
                .submit(token.as_deref())
                .await
                .map_err(|e| fail(e, BOOKING_FAILED_MESSAGE))?;
            println!("{confirmation}");
        }
        Command::MyBookings => {
            let bookings = history::my_bookings(state.api.as_ref(), &state.session)
                .await
                .map_err(|e| fail(e, MY_BOOKINGS_FAILED_MESSAGE))?;
            if bookings.is_empty() {
                println!("You have no bookings yet.");
            }
            print_bookings(&bookings);
        }
        Command::Signup {
            name,
            email,
            password,
        } => {
            let msg = state
                .auth_flows()
                .signup(&name, &email, &password)
                .await
                .map_err(|e| fail(e, SIGNUP_FAILED_MESSAGE))?;
            println!("{msg}");
            println!("Next: coolcare verify-otp --email {email} --otp <code>");
        }
        Command::VerifyOtp { email, otp } => {
            let msg = state
                .auth_flows()
                .verify_otp(&email, &otp)
                .await
                .map_err(|e| fail(e, OTP_FAILED_MESSAGE))?;
            println!("{msg}");
        }
        Command::Login { email, password } => {
            state
                .session
                .login(&email, &password)
                .await
                .map_err(|e| fail(e, LOGIN_FAILED_MESSAGE))?;
            println!("Login successful!");
        }
        Command::AdminLogin { password } => {
            state
                .session
                .admin_login(&password)
                .await
                .map_err(|e| fail(e, ADMIN_LOGIN_FAILED_MESSAGE))?;
            println!("Login successful!");
        }
        Command::Logout => {
            state.session.logout().map_err(|e| fail(e, "Failed to log out."))?;
            println!("Logged out.");
        }
        Command::Whoami => match state.session.user() {
            Some(user) => println!(
                "{} ({})",
                user.email
                    .or(user.name)
                    .or(state.store.user_email().ok().flatten())
                    .unwrap_or_else(|| "unknown".to_string()),
                user.role.as_str()
            ),
            None => println!("anonymous"),
        },
        Command::ForgotPassword { email } => forgot_password(&state, &email).await?,
        Command::ResetPassword {
            token,
            password,
            confirm,
        } => {
            let msg = state
                .auth_flows()
                .reset_password(&token, &password, &confirm)
                .await
                .map_err(|e| fail(e, RESET_LINK_FAILED_MESSAGE))?;
            println!("{msg}");
        }
        Command::Admin(cmd) => run_admin(&state, cmd).await?,
    }

    Ok(())
}

async fn run_admin(state: &AppState, cmd: AdminCommand) -> anyhow::Result<()> {
    let console = state.admin_console();
    match cmd {
        AdminCommand::Bookings { status } => {
            let filter = StatusFilter::parse(&status)
                .ok_or_else(|| anyhow::anyhow!("unknown status filter: {status}"))?;
            let bookings = console
                .bookings(filter)
                .await
                .map_err(|e| fail(e, admin::BOOKINGS_FAILED_MESSAGE))?;
            if bookings.is_empty() {
                match filter {
                    StatusFilter::All => println!("No bookings found."),
                    StatusFilter::Only(s) => println!("No {} bookings found.", s.as_str()),
                }
            }
            print_bookings(&bookings);
        }
        AdminCommand::Services => {
            let services = console
                .services()
                .await
                .map_err(|e| fail(e, admin::ADMIN_SERVICES_FAILED_MESSAGE))?;
            print_services(&services);
        }
        AdminCommand::AddService {
            name,
            description,
            price,
            duration,
        } => {
            let msg = console
                .add_service(&NewService {
                    name,
                    description,
                    price,
                    duration,
                })
                .await
                .map_err(|e| fail(e, admin::ADD_SERVICE_FAILED_MESSAGE))?;
            println!("{msg}");
        }
        AdminCommand::DeleteService { id } => {
            let msg = console
                .delete_service(&id)
                .await
                .map_err(|e| fail(e, admin::DELETE_SERVICE_FAILED_MESSAGE))?;
            println!("{msg}");
        }
        AdminCommand::SetStatus { id, status } => {
            let status = BookingStatus::parse(&status)
                .ok_or_else(|| anyhow::anyhow!("status must be Pending, Assigned or Completed"))?;
            let msg = console
                .update_status(&id, status)
                .await
                .map_err(|e| fail(e, admin::UPDATE_STATUS_FAILED_MESSAGE))?;
            println!("{msg}");
        }
        AdminCommand::DeleteBooking { id } => {
            let msg = console
                .delete_booking(&id)
                .await
                .map_err(|e| fail(e, admin::DELETE_BOOKING_FAILED_MESSAGE))?;
            println!("{msg}");
        }
    }
    Ok(())
}

fn guest_only(state: &AppState) -> anyhow::Result<()> {
    state
        .session
        .authorize(Access::GuestOnly)
        .map_err(|_| anyhow::anyhow!("You are already logged in. Run `coolcare logout` first."))
}

fn home(state: &AppState) -> anyhow::Result<()> {
    println!("CoolCare: appliance repair and servicing at your doorstep.");
    println!("Run `coolcare services` to see what we offer.");

    if !state.store.contact_popup_shown()? {
        println!();
        println!("{CONTACT_BANNER}");
        state.store.mark_contact_popup_shown()?;
    }
    Ok(())
}

async fn forgot_password(state: &AppState, email: &str) -> anyhow::Result<()> {
    use coolcare::services::password_reset::{
        SEND_CODE_FAILED_MESSAGE, UPDATE_PASSWORD_FAILED_MESSAGE, VERIFY_CODE_FAILED_MESSAGE,
    };

    let mut flow = state.password_reset();
    let msg = flow
        .send_code(email)
        .await
        .map_err(|e| fail(e, SEND_CODE_FAILED_MESSAGE))?;
    println!("{msg}");

    let code = prompt("Verification code: ")?;
    let msg = flow
        .verify_code(&code)
        .await
        .map_err(|e| fail(e, VERIFY_CODE_FAILED_MESSAGE))?;
    println!("{msg}");

    let password = prompt("New password: ")?;
    let confirm = prompt("Confirm new password: ")?;
    let msg = flow
        .set_password(&password, &confirm)
        .await
        .map_err(|e| fail(e, UPDATE_PASSWORD_FAILED_MESSAGE))?;
    println!("{msg}");
    Ok(())
}

fn prompt(label: &str) -> anyhow::Result<String> {
    print!("{label}");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

fn print_services(services: &[Service]) {
    if services.is_empty() {
        println!("No services available at the moment.");
        return;
    }
    for s in services {
        println!("{:<26} {:<28} ₹{:<8} {} mins", s.id, s.name, s.price, s.duration);
        if !s.description.is_empty() {
            println!("{:<26} {}", "", s.description);
        }
    }
}

fn print_bookings(bookings: &[Booking]) {
    for b in bookings {
        println!(
            "{:<26} {:<24} {} {}  {:<10} {} {}",
            b.id,
            b.service_name(),
            b.date_naive()
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_else(|| b.date.clone()),
            b.time,
            b.status.as_str(),
            b.customer_name.as_deref().unwrap_or("N/A"),
            b.contact_number,
        );
    }
}

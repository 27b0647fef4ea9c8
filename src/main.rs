//! Costumerie command line shell
//!
//! Hosts the client screens in a terminal: each subcommand restores the
//! session, reloads one view and prints it.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, bail, Context};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

use costumerie::api::{mime_for_extension, ApiClient};
use costumerie::config::Config;
use costumerie::error::ClientResult;
use costumerie::models::{Costume, CostumeId, Reservation, ReservationId, UserId, UserRole};
use costumerie::services::{FilterCriteria, Month};
use costumerie::session::{FileTokenStore, Session};
use costumerie::views::{
    AdminCostumesView, AdminUsersView, CatalogueView, CostumeDetailView, CostumeForm,
    MyReservationsView, SellerCalendarView, SellerCostumesView, UserForm, ViewStatus, ViewingForm,
};

/// Costumerie - rent and manage costumes from the terminal
#[derive(Parser)]
#[command(name = "costumerie")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// API base URL, overriding API_BASE_URL
    #[arg(long, global = true)]
    base_url: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in and store the token
    Login {
        email: String,
        #[arg(long, env = "COSTUMERIE_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Create a seller account
    Register {
        name: String,
        email: String,
        #[arg(long, env = "COSTUMERIE_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Forget the stored token
    Logout,

    /// Show the signed-in user
    Whoami,

    /// Browse the catalogue
    #[command(alias = "ls")]
    Catalogue(CatalogueArgs),

    /// Show one costume
    Costume { id: CostumeId },

    /// Seller availability calendar and bookings
    Calendar(CalendarArgs),

    /// The signed-in user's reservations
    Reservations {
        #[command(subcommand)]
        command: Option<ReservationCommands>,
    },

    /// Book a viewing appointment
    View(ViewArgs),

    /// Upload an image and print its URL
    Upload { file: PathBuf },

    /// Manage the signed-in seller's costumes
    Seller {
        #[command(subcommand)]
        command: CostumeCommands,
    },

    /// Admin tools
    Admin {
        #[command(subcommand)]
        command: AdminCommands,
    },
}

#[derive(Args)]
struct CatalogueArgs {
    /// Match against name and description
    #[arg(short, long, default_value = "")]
    search: String,

    /// Seller city, exact match
    #[arg(long)]
    city: Option<String>,

    #[arg(long, default_value = "")]
    size: String,

    #[arg(long, default_value = "")]
    min: String,

    #[arg(long, default_value = "")]
    max: String,

    /// Print the available cities instead of costumes
    #[arg(long)]
    cities: bool,
}

#[derive(Args)]
struct CalendarArgs {
    costume_id: CostumeId,

    /// Month to show, YYYY-MM
    #[arg(long)]
    month: Option<String>,

    /// Dates to select, YYYY-MM-DD
    #[arg(long, num_args = 1..)]
    select: Vec<NaiveDate>,

    /// Client name for a new booking
    #[arg(long)]
    name: Option<String>,

    /// Client phone for a new booking
    #[arg(long)]
    phone: Option<String>,

    /// Cancel a reservation of this costume
    #[arg(long)]
    cancel: Option<ReservationId>,
}

#[derive(Subcommand)]
enum ReservationCommands {
    List,
    Cancel { id: ReservationId },
}

#[derive(Args)]
struct ViewArgs {
    costume_id: CostumeId,
    #[arg(long)]
    name: String,
    #[arg(long)]
    phone: String,
    /// Day of the viewing, YYYY-MM-DD
    #[arg(long)]
    date: Option<String>,
    #[arg(long)]
    hour: Option<u32>,
    #[arg(long, default_value_t = 0)]
    minute: u32,
}

#[derive(Subcommand)]
enum AdminCommands {
    Users {
        #[command(subcommand)]
        command: UserCommands,
    },
    Costumes {
        #[command(subcommand)]
        command: CostumeCommands,
    },
}

#[derive(Subcommand)]
enum UserCommands {
    List,
    Create(UserArgs),
    Update {
        id: UserId,
        #[command(flatten)]
        args: UserArgs,
    },
    Delete { id: UserId },
}

#[derive(Args)]
struct UserArgs {
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    email: Option<String>,
    #[arg(long)]
    password: Option<String>,
    /// admin, seller or shopper
    #[arg(long)]
    role: Option<String>,
}

#[derive(Subcommand)]
enum CostumeCommands {
    List,
    Create(CostumeArgs),
    Update {
        id: CostumeId,
        #[command(flatten)]
        args: CostumeArgs,
    },
    Delete { id: CostumeId },
}

#[derive(Args)]
struct CostumeArgs {
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    description: Option<String>,
    #[arg(long)]
    price: Option<String>,
    #[arg(long)]
    size: Option<String>,
    /// Image file to upload and attach
    #[arg(long)]
    image: Option<PathBuf>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = Config::from_env().context("Failed to load configuration")?;
    if let Some(base_url) = &cli.base_url {
        config = config.with_base_url(base_url)?;
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::debug!(
        base_url = %config.api_base_url,
        state_dir = %config.state_dir.display(),
        "Starting costumerie"
    );

    let api = ApiClient::new(&config)?;
    let store = Arc::new(FileTokenStore::new(&config.state_dir));
    let mut session = Session::restore(api, store).await;

    match cli.command {
        Commands::Login { email, password } => {
            let user = session.login(&email, &password).await?;
            println!("Signed in as {} ({})", user.name, user.role);
            println!("Home: {:?}", session.home());
        }
        Commands::Register {
            name,
            email,
            password,
        } => {
            let user = session.register(&name, &email, &password).await?;
            println!("Registered {} ({})", user.name, user.role);
        }
        Commands::Logout => {
            session.logout()?;
            println!("Signed out");
        }
        Commands::Whoami => match session.user() {
            Some(user) => println!("{} <{}> {} ({:?})", user.name, user.email, user.role, session.home()),
            None if session.is_authenticated() => println!("Token stored but profile unavailable"),
            None => println!("Not signed in"),
        },
        Commands::Catalogue(args) => catalogue(&session, args).await?,
        Commands::Costume { id } => {
            let mut view = CostumeDetailView::default();
            let result = view.reload(&session.client(), id).await.cloned();
            let costume = report(&mut view.status, result)?;
            print_costume(&costume);
            if let Some(description) = &costume.description {
                println!("    {}", description);
            }
        }
        Commands::Calendar(args) => calendar(&session, args).await?,
        Commands::Reservations { command } => {
            let mut view = MyReservationsView::new();
            let result = view.reload(&session).await;
            report(&mut view.status, result)?;
            if let Some(ReservationCommands::Cancel { id }) = command {
                let result = view.cancel(&session, id).await;
                report(&mut view.status, result)?;
                println!("Cancelled reservation {}", id);
            }
            view.reservations().iter().for_each(print_reservation);
        }
        Commands::View(args) => {
            let mut form = ViewingForm {
                client_name: args.name,
                client_phone: args.phone,
                minute: args.minute,
                ..ViewingForm::default()
            };
            if let Some(hour) = args.hour {
                form.hour = hour;
            }
            if let Some(date) = &args.date {
                if !form.set_date_text(date) {
                    bail!("Invalid date '{}', expected YYYY-MM-DD", date);
                }
            }
            let reservation = form.submit(&session.client(), args.costume_id).await?;
            print_reservation(&reservation);
        }
        Commands::Upload { file } => {
            let (bytes, mime) = read_image(&file).await?;
            let url = session.client().upload_image(&bytes, mime).await?;
            println!("{}", url);
        }
        Commands::Seller { command } => seller_costumes(&session, command).await?,
        Commands::Admin { command } => match command {
            AdminCommands::Users { command } => admin_users(&session, command).await?,
            AdminCommands::Costumes { command } => admin_costumes(&session, command).await?,
        },
    }

    Ok(())
}

/// Turn a view failure into the alert text the user sees
fn report<T>(status: &mut ViewStatus, result: ClientResult<T>) -> anyhow::Result<T> {
    result.map_err(|e| match status.take_alert() {
        Some(alert) => anyhow!("{}: {}", alert.title, alert.message),
        None => e.into(),
    })
}

async fn catalogue(session: &Session, args: CatalogueArgs) -> anyhow::Result<()> {
    let mut view = CatalogueView::new();
    let result = view.reload(&session.client()).await;
    report(&mut view.status, result)?;

    if args.cities {
        view.cities().iter().for_each(|city| println!("{}", city));
        return Ok(());
    }

    let mut criteria = FilterCriteria::default()
        .with_search(args.search)
        .with_size(args.size)
        .with_price_text(&args.min, &args.max);
    if let Some(city) = args.city {
        criteria = criteria.with_city(city);
    }
    view.criteria = criteria;

    let visible = view.visible();
    visible.iter().for_each(print_costume);
    println!("{} of {} costumes", visible.len(), view.costumes().len());
    Ok(())
}

async fn calendar(session: &Session, args: CalendarArgs) -> anyhow::Result<()> {
    let month = match &args.month {
        Some(raw) => Month::parse(raw)?,
        None => Month::current(),
    };

    let mut view = SellerCalendarView::new();
    let result = view.reload(session).await;
    report(&mut view.status, result)?;
    let result = view.select(session, args.costume_id, month).await.map(|_| ());
    report(&mut view.status, result)?;

    if let Some(id) = args.cancel {
        let result = view.cancel(session, id).await;
        report(&mut view.status, result)?;
        println!("Cancelled reservation {}", id);
    }

    if let Some(calendar) = view.calendar_mut() {
        for date in &args.select {
            calendar.toggle(*date)?;
        }
    }

    if args.name.is_some() || args.phone.is_some() {
        view.draft.client_name = args.name.unwrap_or_default();
        view.draft.client_phone = args.phone.unwrap_or_default();
        let result = view.submit(session).await;
        let created = report(&mut view.status, result)?;
        println!("Booked:");
        print_reservation(&created);
    }

    if let Some(selection) = view.selection() {
        println!("{} - {}", selection.costume.name, selection.calendar.month());
        print_grid(&selection.calendar.grid());
        selection.calendar.reservations().iter().for_each(print_reservation);
    }
    Ok(())
}

async fn seller_costumes(session: &Session, command: CostumeCommands) -> anyhow::Result<()> {
    let mut view = SellerCostumesView::new();
    let result = view.reload(session).await;
    report(&mut view.status, result)?;

    match command {
        CostumeCommands::List => {}
        CostumeCommands::Create(args) => save_costume(session, CostumeForm::new(), args).await?,
        CostumeCommands::Update { id, args } => {
            let costume = view
                .costumes()
                .iter()
                .find(|c| c.id == id)
                .ok_or_else(|| anyhow!("Costume {} is not yours", id))?;
            save_costume(session, CostumeForm::edit(costume), args).await?;
        }
        CostumeCommands::Delete { id } => {
            let result = view.delete(session, id).await;
            report(&mut view.status, result)?;
            println!("Deleted costume {}", id);
            view.costumes().iter().for_each(print_costume);
            return Ok(());
        }
    }
    let result = view.reload(session).await;
    report(&mut view.status, result)?;
    view.costumes().iter().for_each(print_costume);
    Ok(())
}

async fn admin_costumes(session: &Session, command: CostumeCommands) -> anyhow::Result<()> {
    let mut view = AdminCostumesView::new();
    let result = view.reload(session).await;
    report(&mut view.status, result)?;

    match command {
        CostumeCommands::List => {}
        CostumeCommands::Create(args) => save_costume(session, CostumeForm::new(), args).await?,
        CostumeCommands::Update { id, args } => {
            let costume = view
                .costumes()
                .iter()
                .find(|c| c.id == id)
                .ok_or_else(|| anyhow!("Unknown costume {}", id))?;
            save_costume(session, CostumeForm::edit(costume), args).await?;
        }
        CostumeCommands::Delete { id } => {
            let result = view.delete(session, id).await;
            report(&mut view.status, result)?;
            println!("Deleted costume {}", id);
            view.costumes().iter().for_each(print_costume);
            return Ok(());
        }
    }
    let result = view.reload(session).await;
    report(&mut view.status, result)?;
    view.costumes().iter().for_each(print_costume);
    Ok(())
}

async fn save_costume(session: &Session, mut form: CostumeForm, args: CostumeArgs) -> anyhow::Result<()> {
    if let Some(name) = args.name {
        form.name = name;
    }
    if let Some(description) = args.description {
        form.description = description;
    }
    if let Some(price) = args.price {
        form.price = price;
    }
    if let Some(size) = args.size {
        form.size = size;
    }
    if let Some(path) = &args.image {
        let (bytes, mime) = read_image(path).await?;
        let result = form.upload_image(session, &bytes, mime).await.map(|_| ());
        report(&mut form.status, result)?;
    }
    let result = form.submit(session).await;
    let saved = report(&mut form.status, result)?;
    println!("Saved:");
    print_costume(&saved);
    Ok(())
}

async fn admin_users(session: &Session, command: UserCommands) -> anyhow::Result<()> {
    let mut view = AdminUsersView::new();
    let result = view.reload(session).await;
    report(&mut view.status, result)?;

    match command {
        UserCommands::List => {}
        UserCommands::Create(args) => save_user(session, UserForm::new(), args).await?,
        UserCommands::Update { id, args } => {
            let user = view
                .users()
                .iter()
                .find(|u| u.id == id)
                .ok_or_else(|| anyhow!("Unknown user {}", id))?;
            save_user(session, UserForm::edit(user), args).await?;
        }
        UserCommands::Delete { id } => {
            let result = view.delete(session, id).await;
            report(&mut view.status, result)?;
            println!("Deleted user {}", id);
        }
    }
    let result = view.reload(session).await;
    report(&mut view.status, result)?;
    for user in view.users() {
        println!("{:>5}  {:<24} {:<32} {}", user.id, user.name, user.email, user.role);
    }
    Ok(())
}

async fn save_user(session: &Session, mut form: UserForm, args: UserArgs) -> anyhow::Result<()> {
    if let Some(name) = args.name {
        form.name = name;
    }
    if let Some(email) = args.email {
        form.email = email;
    }
    if let Some(password) = args.password {
        form.password = password;
    }
    if let Some(role) = &args.role {
        form.role = UserRole::parse(role).ok_or_else(|| anyhow!("Unknown role '{}'", role))?;
    }
    let result = form.submit(session).await;
    let saved = report(&mut form.status, result)?;
    println!("Saved user {} ({})", saved.name, saved.role);
    Ok(())
}

async fn read_image(path: &PathBuf) -> anyhow::Result<(Vec<u8>, &'static str)> {
    let mime = path
        .extension()
        .and_then(|ext| ext.to_str())
        .and_then(mime_for_extension)
        .ok_or_else(|| anyhow!("Unsupported image type: {}", path.display()))?;
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    Ok((bytes, mime))
}

fn print_costume(costume: &Costume) {
    println!(
        "{:>5}  {:<28} {:>8}  {:<4} {}{}",
        costume.id,
        costume.name,
        costume.price.to_string(),
        costume.size.as_deref().unwrap_or("-"),
        costume.seller_city().unwrap_or("-"),
        if costume.is_available { "" } else { "  (unavailable)" },
    );
}

fn print_reservation(reservation: &Reservation) {
    let costume = reservation
        .costume
        .as_ref()
        .map(|c| c.name.clone())
        .unwrap_or_else(|| format!("costume #{}", reservation.costume_id));
    println!(
        "{:>5}  {:<24} {:<28} {:<10} {} {}",
        reservation.id,
        costume,
        reservation.window.to_string(),
        reservation.status.as_str(),
        reservation.client_name,
        reservation.client_phone,
    );
}

/// Six rows of Sunday-first weeks. `xx` reserved, `[dd]` selected.
fn print_grid(cells: &[costumerie::services::DayCell]) {
    println!(" Su  Mo  Tu  We  Th  Fr  Sa");
    for week in cells.chunks(7) {
        let row: Vec<String> = week
            .iter()
            .map(|cell| {
                let day = cell.date.format("%d").to_string();
                if !cell.in_month {
                    "  . ".to_string()
                } else if cell.reserved {
                    " xx ".to_string()
                } else if cell.selected {
                    format!("[{}]", day)
                } else {
                    format!(" {} ", day)
                }
            })
            .collect();
        println!("{}", row.join(""));
    }
}

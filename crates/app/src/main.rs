use std::{
    error::Error,
    path::{Path, PathBuf},
};

use clap::{Args, Parser, Subcommand};
use engine::{
    CloseTripCmd, Engine, EngineError, ErrorKind, Money, NewBoxCmd, NewEmployeeCmd,
    NewProductCmd, NewSupplierCmd, OpenTripCmd, PaymentCmd, PaymentStatus, PurchaseBoxLine,
    PurchaseCmd, Role, TransferCmd, WasteLine,
};
use migration::{Migrator, MigratorTrait};
use sea_orm::{Database, DatabaseConnection};
use serde::{Serialize, de::DeserializeOwned};

mod settings;

type AppResult<T> = Result<T, Box<dyn Error + Send + Sync>>;

#[derive(Parser, Debug)]
#[command(name = "depot")]
#[command(about = "Warehouse stock, delivery trips and payroll for a distribution depot")]
struct Cli {
    /// Optional config file path (TOML), defaults to `depot.toml`.
    #[arg(long)]
    config: Option<String>,

    /// Database connection string, overrides the configured database.
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Apply pending migrations.
    Migrate {
        /// Drop every table and migrate from scratch.
        #[arg(long, conflicts_with = "status")]
        fresh: bool,
        /// Only print which migrations are applied.
        #[arg(long)]
        status: bool,
    },
    Product(Product),
    Box(BoxArgs),
    Truck(Truck),
    Employee(Employee),
    Supplier(Supplier),
    Stock(Stock),
    Trip(Trip),
    Purchase(Purchase),
    Payment(Payment),
}

#[derive(Args, Debug)]
struct Product {
    #[command(subcommand)]
    command: ProductCommand,
}

#[derive(Subcommand, Debug)]
enum ProductCommand {
    Create {
        #[arg(long)]
        designation: String,
        #[arg(long, value_parser = parse_money)]
        price: Money,
        #[arg(long)]
        capacity: i32,
        #[arg(long, default_value = "")]
        genre: String,
        #[arg(long, default_value_t = 0)]
        stock: i32,
        #[arg(long, default_value_t = 0)]
        units: i32,
        #[arg(long)]
        box_id: Option<i32>,
    },
}

#[derive(Args, Debug)]
struct BoxArgs {
    #[command(subcommand)]
    command: BoxCommand,
}

#[derive(Subcommand, Debug)]
enum BoxCommand {
    Create {
        #[arg(long)]
        designation: String,
        #[arg(long, default_value = "")]
        kind: String,
        #[arg(long, default_value_t = 0)]
        in_stock: i32,
        #[arg(long, default_value_t = 0)]
        empty: i32,
        #[arg(long, default_value_t = 0)]
        sent: i32,
    },
}

#[derive(Args, Debug)]
struct Truck {
    #[command(subcommand)]
    command: TruckCommand,
}

#[derive(Subcommand, Debug)]
enum TruckCommand {
    Create {
        #[arg(long)]
        matricule: String,
        #[arg(long, default_value_t = 0)]
        capacity: i32,
    },
    /// Put the residual of the last closed trip back into the warehouse.
    Empty {
        #[arg(long)]
        matricule: String,
    },
}

#[derive(Args, Debug)]
struct Employee {
    #[command(subcommand)]
    command: EmployeeCommand,
}

#[derive(Subcommand, Debug)]
enum EmployeeCommand {
    Create {
        #[arg(long)]
        cin: String,
        #[arg(long)]
        name: String,
        /// seller, driver or assistant.
        #[arg(long, value_parser = parse_role)]
        role: Role,
        #[arg(long, value_parser = parse_money)]
        salary: Money,
        #[arg(long)]
        tel: Option<String>,
        #[arg(long)]
        address: Option<String>,
    },
}

#[derive(Args, Debug)]
struct Supplier {
    #[command(subcommand)]
    command: SupplierCommand,
}

#[derive(Subcommand, Debug)]
enum SupplierCommand {
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        tel: Option<String>,
        #[arg(long)]
        address: Option<String>,
    },
}

#[derive(Args, Debug)]
struct Stock {
    #[command(subcommand)]
    command: StockCommand,
}

#[derive(Subcommand, Debug)]
enum StockCommand {
    /// One product, or every product without `--id`.
    Product {
        #[arg(long)]
        id: Option<i32>,
    },
    /// One box, or every box without `--id`.
    Box {
        #[arg(long)]
        id: Option<i32>,
    },
    /// Waste balance of a product, or every balance without `--product`.
    Waste {
        #[arg(long, requires = "kind")]
        product: Option<i32>,
        #[arg(long)]
        kind: Option<String>,
        /// Record this much new waste first.
        #[arg(long, requires = "product")]
        add: Option<i32>,
    },
}

#[derive(Args, Debug)]
struct Trip {
    #[command(subcommand)]
    command: TripCommand,
}

#[derive(Subcommand, Debug)]
enum TripCommand {
    /// Open a trip from a JSON payload.
    Open {
        #[arg(long)]
        file: PathBuf,
    },
    /// Close a trip from a JSON payload.
    Close {
        #[arg(long)]
        file: PathBuf,
    },
    /// Move the residual of one trip onto another, from a JSON payload.
    Transfer {
        #[arg(long)]
        file: PathBuf,
    },
    Active {
        #[arg(long)]
        truck: Option<String>,
    },
    LastClosed {
        #[arg(long)]
        truck: String,
    },
    Show {
        #[arg(long)]
        id: i32,
    },
    Previous {
        #[arg(long)]
        id: i32,
    },
}

#[derive(Args, Debug)]
struct Purchase {
    #[command(subcommand)]
    command: PurchaseCommand,
}

#[derive(Subcommand, Debug)]
enum PurchaseCommand {
    Create {
        #[arg(long)]
        file: PathBuf,
    },
    BoxWaste {
        #[arg(long)]
        file: PathBuf,
    },
    Show {
        #[arg(long)]
        id: i32,
    },
    /// Notify the supplier of boxes and waste from a JSON payload.
    Send {
        #[arg(long)]
        file: PathBuf,
    },
}

#[derive(Args, Debug)]
struct Payment {
    #[command(subcommand)]
    command: PaymentCommand,
}

#[derive(Subcommand, Debug)]
enum PaymentCommand {
    Create {
        #[arg(long)]
        cin: String,
        #[arg(long)]
        month: u32,
        #[arg(long)]
        year: i32,
        #[arg(long, value_parser = parse_status, default_value = "pending")]
        status: PaymentStatus,
    },
    Status {
        #[arg(long)]
        id: i32,
        #[arg(long, value_parser = parse_status)]
        status: PaymentStatus,
    },
    Show {
        #[arg(long)]
        id: i32,
    },
    List {
        #[arg(long)]
        cin: String,
    },
}

#[derive(Debug, serde::Deserialize)]
struct SendPayload {
    purchase_id: i32,
    #[serde(default)]
    boxes: Vec<PurchaseBoxLine>,
    #[serde(default)]
    wastes: Vec<WasteLine>,
}

fn parse_money(raw: &str) -> Result<Money, String> {
    raw.parse::<Money>().map_err(|err| err.to_string())
}

fn parse_role(raw: &str) -> Result<Role, String> {
    Role::try_from(raw).map_err(|err| err.to_string())
}

fn parse_status(raw: &str) -> Result<PaymentStatus, String> {
    PaymentStatus::try_from(raw).map_err(|err| err.to_string())
}

fn read_payload<T: DeserializeOwned>(path: &Path) -> AppResult<T> {
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

fn print_json<T: Serialize>(value: &T) -> AppResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Exit status by error class, so scripts can tell a rejected request from
/// a broken database.
fn exit_code(err: &(dyn Error + Send + Sync + 'static)) -> i32 {
    match err.downcast_ref::<EngineError>().map(EngineError::kind) {
        Some(ErrorKind::BadRequest) => 2,
        Some(ErrorKind::NotFound) => 3,
        Some(ErrorKind::Conflict) => 4,
        Some(ErrorKind::Internal) | None => 1,
    }
}

async fn connect_db(database_url: &str) -> AppResult<DatabaseConnection> {
    let db = Database::connect(database_url).await?;
    Migrator::up(&db, None).await?;
    Ok(db)
}

async fn run(engine: &Engine, command: Command) -> AppResult<()> {
    match command {
        Command::Migrate { .. } => Ok(()),
        Command::Product(Product {
            command:
                ProductCommand::Create {
                    designation,
                    price,
                    capacity,
                    genre,
                    stock,
                    units,
                    box_id,
                },
        }) => {
            let mut cmd = NewProductCmd::new(designation, price, capacity)
                .genre(genre)
                .stock(stock, units);
            if let Some(box_id) = box_id {
                cmd = cmd.box_id(box_id);
            }
            print_json(&engine.new_product(cmd).await?)
        }
        Command::Box(BoxArgs {
            command:
                BoxCommand::Create {
                    designation,
                    kind,
                    in_stock,
                    empty,
                    sent,
                },
        }) => {
            let cmd = NewBoxCmd::new(designation, kind).counts(in_stock, empty, sent);
            print_json(&engine.new_box(cmd).await?)
        }
        Command::Truck(Truck { command }) => match command {
            TruckCommand::Create {
                matricule,
                capacity,
            } => print_json(&engine.new_truck(&matricule, capacity).await?),
            TruckCommand::Empty { matricule } => {
                print_json(&engine.empty_truck(&matricule).await?)
            }
        },
        Command::Employee(Employee {
            command:
                EmployeeCommand::Create {
                    cin,
                    name,
                    role,
                    salary,
                    tel,
                    address,
                },
        }) => {
            let mut cmd = NewEmployeeCmd::new(cin, name, role, salary);
            if let Some(tel) = tel {
                cmd = cmd.tel(tel);
            }
            if let Some(address) = address {
                cmd = cmd.address(address);
            }
            print_json(&engine.new_employee(cmd).await?)
        }
        Command::Supplier(Supplier {
            command: SupplierCommand::Create { name, tel, address },
        }) => {
            let mut cmd = NewSupplierCmd::new(name);
            if let Some(tel) = tel {
                cmd = cmd.tel(tel);
            }
            if let Some(address) = address {
                cmd = cmd.address(address);
            }
            print_json(&engine.new_supplier(cmd).await?)
        }
        Command::Stock(Stock { command }) => match command {
            StockCommand::Product { id: Some(id) } => print_json(&engine.product(id).await?),
            StockCommand::Product { id: None } => print_json(&engine.products().await?),
            StockCommand::Box { id: Some(id) } => print_json(&engine.returnable_box(id).await?),
            StockCommand::Box { id: None } => print_json(&engine.boxes().await?),
            StockCommand::Waste {
                product: Some(product),
                kind: Some(kind),
                add,
            } => match add {
                Some(qtt) => print_json(&engine.record_waste(product, &kind, qtt).await?),
                None => print_json(&engine.waste_balance(product, &kind).await?),
            },
            StockCommand::Waste { .. } => print_json(&engine.wastes().await?),
        },
        Command::Trip(Trip { command }) => match command {
            TripCommand::Open { file } => {
                let cmd: OpenTripCmd = read_payload(&file)?;
                print_json(&engine.open_trip(cmd).await?)
            }
            TripCommand::Close { file } => {
                let cmd: CloseTripCmd = read_payload(&file)?;
                print_json(&engine.close_trip(cmd).await?)
            }
            TripCommand::Transfer { file } => {
                let cmd: TransferCmd = read_payload(&file)?;
                print_json(&engine.transfer_products(cmd).await?)
            }
            TripCommand::Active { truck: Some(truck) } => {
                print_json(&engine.active_trip(&truck).await?)
            }
            TripCommand::Active { truck: None } => print_json(&engine.active_trips().await?),
            TripCommand::LastClosed { truck } => {
                print_json(&engine.last_closed_trip(&truck).await?)
            }
            TripCommand::Show { id } => print_json(&engine.trip(id).await?),
            TripCommand::Previous { id } => print_json(&engine.previous_trip(id).await?),
        },
        Command::Purchase(Purchase { command }) => match command {
            PurchaseCommand::Create { file } => {
                let cmd: PurchaseCmd = read_payload(&file)?;
                print_json(&engine.create_purchase(cmd).await?)
            }
            PurchaseCommand::BoxWaste { file } => {
                let cmd: PurchaseCmd = read_payload(&file)?;
                print_json(&engine.create_box_waste_purchase(cmd).await?)
            }
            PurchaseCommand::Show { id } => print_json(&engine.purchase(id).await?),
            PurchaseCommand::Send { file } => {
                let payload: SendPayload = read_payload(&file)?;
                let notice = engine
                    .send_to_supplier(payload.purchase_id, payload.boxes, payload.wastes)
                    .await?;
                print_json(&notice)
            }
        },
        Command::Payment(Payment { command }) => match command {
            PaymentCommand::Create {
                cin,
                month,
                year,
                status,
            } => {
                let cmd = PaymentCmd::new(cin, month, year).status(status);
                print_json(&engine.create_employee_payment(cmd).await?)
            }
            PaymentCommand::Status { id, status } => {
                print_json(&engine.update_payment_status(id, status).await?)
            }
            PaymentCommand::Show { id } => print_json(&engine.payment(id).await?),
            PaymentCommand::List { cin } => print_json(&engine.payments_for_employee(&cin).await?),
        },
    }
}

#[tokio::main]
async fn main() -> AppResult<()> {
    let cli = Cli::parse();
    let settings = settings::Settings::new(cli.config.as_deref())?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "depot={level},engine={level},migration={level}",
            level = settings.app.level
        ))
        .init();

    let database_url = cli
        .database_url
        .clone()
        .unwrap_or_else(|| settings.database.url());

    if let Command::Migrate { fresh, status } = cli.command {
        let db = Database::connect(database_url.as_str()).await?;
        if status {
            Migrator::status(&db).await?;
            return Ok(());
        }
        if fresh {
            Migrator::fresh(&db).await?;
        } else {
            Migrator::up(&db, None).await?;
        }
        tracing::info!(%database_url, fresh, "migrations applied");
        return Ok(());
    }

    let db = connect_db(&database_url).await?;
    let engine = Engine::builder()
        .database(db)
        .settings(settings.engine)
        .build()
        .await?;

    if let Err(err) = run(&engine, cli.command).await {
        eprintln!("{err}");
        std::process::exit(exit_code(err.as_ref()));
    }

    Ok(())
}

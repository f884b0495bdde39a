use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;
use time::{Date, Month};

use cashbook_rs::{
    CategoryName, Email, NewTransaction, NewUser, PasswordHash, PaymentMethod, TransactionKind,
    TransactionStatus, UserName, ValidatedPassword, create_category, create_transaction,
    create_user, initialize_db,
};

/// A utility for creating a test database for the REST API server of cashbook_rs.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,
}

const CATEGORIES: [&str; 5] = ["Salary", "Food", "Rent", "Transport", "Utilities"];

/// Create and populate a database for manual testing.
///
/// The database holds one user, `demo@example.com` with the password `demo1234`,
/// and three months of transactions starting in January 2026.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        None => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        Some(extension) if extension.is_empty() => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        _ => {}
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;

    initialize_db(&conn)?;

    println!("Creating test user...");

    let password_hash = PasswordHash::new(
        ValidatedPassword::new_unchecked("demo1234"),
        PasswordHash::DEFAULT_COST,
    )?;

    let user = create_user(
        NewUser {
            name: UserName::new("Demo User")?,
            email: Email::new("demo@example.com")?,
            password_hash,
        },
        &conn,
    )?;

    println!("Creating categories...");

    for name in CATEGORIES {
        create_category(user.id, CategoryName::new(name)?, &conn)?;
    }

    println!("Creating transactions...");

    let months = [Month::January, Month::February, Month::March];

    for (index, month) in months.into_iter().enumerate() {
        let step = index as f64;
        let seed = [
            (TransactionKind::Income, 3200.0, 1, "Salary", PaymentMethod::Bank),
            (TransactionKind::Expense, 1100.0, 2, "Rent", PaymentMethod::Transfer),
            (TransactionKind::Expense, 240.0 + 35.0 * step, 9, "Food", PaymentMethod::Card),
            (TransactionKind::Expense, 60.0 - 10.0 * step, 14, "Transport", PaymentMethod::Cash),
            (TransactionKind::Expense, 150.0 + 20.0 * step, 21, "Utilities", PaymentMethod::Bank),
        ];

        for (kind, amount, day, category, payment_method) in seed {
            let occurred_on = Date::from_calendar_date(2026, month, day)?;
            let status = if day > 20 && index == months.len() - 1 {
                TransactionStatus::Pending
            } else {
                TransactionStatus::Paid
            };

            create_transaction(
                user.id,
                NewTransaction::build(kind, amount, occurred_on, category)
                    .description(&format!("{category} for {month}"))
                    .payment_method(payment_method)
                    .status(status),
                &conn,
            )?;
        }
    }

    println!("Success!");

    Ok(())
}

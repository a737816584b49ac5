//! # Seed Data Generator
//!
//! Populates the database with sample books and the initial accounts for
//! development.
//!
//! ## Usage
//! ```bash
//! # Seed 40 books (default) into ./shelfmark_dev.db
//! cargo run -p shelfmark-db --bin seed
//!
//! # Custom amount and path
//! cargo run -p shelfmark-db --bin seed -- --count 100 --db ./data/shelfmark.db
//! ```
//!
//! ## Accounts
//! Creates `admin` (ADMINISTRATOR) and `librarian` (LIBRARIAN). Passwords
//! come from `SHELFMARK_ADMIN_PASSWORD` / `SHELFMARK_LIBRARIAN_PASSWORD`;
//! when an env var is absent a random password is generated and printed
//! once. Nothing is ever compiled into the binary.

use std::env;

use argon2::password_hash::rand_core::{OsRng, RngCore};
use shelfmark_core::Role;
use shelfmark_db::{Database, DbConfig};

/// Sample catalog, cycled until `--count` is reached.
const TITLES: &[&str] = &[
    "The Count of Monte Cristo",
    "Pride and Prejudice",
    "Moby-Dick",
    "Great Expectations",
    "Jane Eyre",
    "Wuthering Heights",
    "The Odyssey",
    "Crime and Punishment",
    "War and Peace",
    "Anna Karenina",
    "The Brothers Karamazov",
    "Don Quixote",
    "Les Miserables",
    "A Tale of Two Cities",
    "The Picture of Dorian Gray",
    "Frankenstein",
    "Dracula",
    "The Adventures of Huckleberry Finn",
    "To Kill a Mockingbird",
    "The Great Gatsby",
    "Brave New World",
    "Fahrenheit 451",
    "The Catcher in the Rye",
    "Lord of the Flies",
    "Animal Farm",
    "The Grapes of Wrath",
    "Of Mice and Men",
    "The Old Man and the Sea",
    "One Hundred Years of Solitude",
    "The Hobbit",
    "Treasure Island",
    "The Secret Garden",
    "Anne of Green Gables",
    "Little Women",
    "The Wind in the Willows",
    "Robinson Crusoe",
    "Gulliver's Travels",
    "The Time Machine",
    "The War of the Worlds",
    "Twenty Thousand Leagues Under the Seas",
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .init();

    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut count: usize = 40;
    let mut db_path = String::from("./shelfmark_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--count" | "-c" => {
                if i + 1 < args.len() {
                    count = args[i + 1].parse().unwrap_or(40);
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Shelfmark Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --count <N>    Number of books to generate (default: 40)");
                println!("  -d, --db <PATH>    Database file path (default: ./shelfmark_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("Shelfmark Seed Data Generator");
    println!("=============================");
    println!("Database: {}", db_path);
    println!("Books:    {}", count);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    seed_accounts(&db).await?;
    seed_books(&db, count).await?;

    println!();
    println!("✓ Seed complete!");

    Ok(())
}

/// Creates the initial accounts unless accounts already exist.
async fn seed_accounts(db: &Database) -> Result<(), Box<dyn std::error::Error>> {
    let existing = db.users().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} accounts, skipping", existing);
        return Ok(());
    }

    println!();
    for (username, role, env_var) in [
        ("admin", Role::Administrator, "SHELFMARK_ADMIN_PASSWORD"),
        ("librarian", Role::Librarian, "SHELFMARK_LIBRARIAN_PASSWORD"),
    ] {
        match env::var(env_var) {
            Ok(password) => {
                db.users().create(username, &password, role).await?;
                println!("✓ Created '{}' (password from {})", username, env_var);
            }
            Err(_) => {
                let password = random_password();
                db.users().create(username, &password, role).await?;
                println!("✓ Created '{}' with generated password: {}", username, password);
                println!("  (set {} to choose one next time)", env_var);
            }
        }
    }

    Ok(())
}

/// Inserts `count` sample books, cycling the title list.
async fn seed_books(db: &Database, count: usize) -> Result<(), Box<dyn std::error::Error>> {
    let existing = db.books().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} books, skipping", existing);
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    println!();
    println!("Generating books...");

    let start = std::time::Instant::now();

    for i in 0..count {
        let title = TITLES[i % TITLES.len()];
        let name = if i < TITLES.len() {
            title.to_string()
        } else {
            format!("{} (copy {})", title, i / TITLES.len() + 1)
        };

        // roughly one book in five starts out on loan
        let borrowed_flag = if i % 5 == 0 { 1 } else { 0 };

        db.books().add(&name, borrowed_flag).await?;
    }

    let elapsed = start.elapsed();
    println!("✓ Generated {} books in {:?}", count, elapsed);

    let hits = db.books().find(Some("the")).await?;
    println!("  Search 'the': {} results", hits.len());

    Ok(())
}

/// Generates a 20-character alphanumeric password from OS randomness.
fn random_password() -> String {
    const CHARSET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz23456789";

    let mut bytes = [0u8; 20];
    OsRng.fill_bytes(&mut bytes);

    bytes
        .iter()
        .map(|b| CHARSET[*b as usize % CHARSET.len()] as char)
        .collect()
}

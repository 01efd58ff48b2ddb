//! # Seed Data Generator
//!
//! Populates a SQLite database with demo shopping lists for development.
//!
//! ## Usage
//! ```bash
//! # Generate 20 lists (default)
//! cargo run -p shoplist-db --bin seed
//!
//! # Generate custom amount
//! cargo run -p shoplist-db --bin seed -- --count 200
//!
//! # Specify database path and owner
//! cargo run -p shoplist-db --bin seed -- --db ./data/shoplist.db --owner u1
//! ```
//!
//! ## Generated Data
//! Each list is owned by `--owner`, shares its members with two demo users,
//! and gets a handful of items. Every fifth list is archived and roughly a
//! third of the items are completed, so filters and paging have something
//! to show.

use std::env;
use tracing_subscriber::EnvFilter;

use shoplist_core::{ListFilter, NewItem, NewShoppingList, PageInfo};
use shoplist_db::seed::{DEMO_MEMBER_IDS, DEMO_OWNER_ID};
use shoplist_db::{ShoppingListStore, Storage, StorageConfig};

/// List name themes for realistic test data
const LIST_NAMES: &[&str] = &[
    "Groceries",
    "BBQ party",
    "Weekend trip",
    "Hardware store",
    "Birthday dinner",
    "Office supplies",
    "Pharmacy",
    "Picnic",
    "Camping gear",
    "Holiday baking",
];

/// Item names with their typical quantity
const ITEMS: &[(&str, f64)] = &[
    ("Milk", 2.0),
    ("Bread", 1.0),
    ("Eggs", 12.0),
    ("Apples", 6.0),
    ("Coffee", 1.0),
    ("Sausages", 8.0),
    ("Charcoal", 1.0),
    ("Paper plates", 20.0),
    ("Tomatoes", 4.0),
    ("Cheese", 0.5),
    ("Batteries", 4.0),
    ("Sunscreen", 1.0),
];

/// Items added to each list
const ITEMS_PER_LIST: usize = 4;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,shoplist=debug,sqlx=warn"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut count: usize = 20;
    let mut db_path = String::from("./shoplist.db");
    let mut owner = String::from(DEMO_OWNER_ID);

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--count" | "-c" => {
                if i + 1 < args.len() {
                    count = args[i + 1].parse().unwrap_or(20);
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--owner" | "-o" => {
                if i + 1 < args.len() {
                    owner = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Shoplist Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --count <N>     Number of lists to generate (default: 20)");
                println!("  -d, --db <PATH>     Database file path (default: ./shoplist.db)");
                println!("  -o, --owner <ID>    Owner of the generated lists");
                println!("  -h, --help          Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Shoplist Seed Data Generator");
    println!("===============================");
    println!("Database: {}", db_path);
    println!("Owner:    {}", owner);
    println!("Lists:    {}", count);
    println!();

    let storage = Storage::open(StorageConfig::sqlite(&db_path)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    // Check existing lists
    let existing = storage
        .list_lists(
            &ListFilter::new(owner.as_str()).include_archived(true),
            PageInfo::new(0, 1),
        )
        .await?
        .total;
    if existing > 0 {
        println!("⚠ Database already has {} lists", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        storage.close().await;
        return Ok(());
    }

    println!();
    println!("Generating lists...");

    let start = std::time::Instant::now();
    let mut lists = 0;
    let mut items = 0;

    for n in 0..count {
        let name = format!("{} #{}", LIST_NAMES[n % LIST_NAMES.len()], n + 1);
        let members = std::iter::once(owner.as_str()).chain(DEMO_MEMBER_IDS);

        let list = match storage
            .create_list(NewShoppingList::new(owner.as_str(), name).with_members(members))
            .await
        {
            Ok(list) => list,
            Err(e) => {
                eprintln!("Failed to create list {}: {}", n + 1, e);
                continue;
            }
        };
        lists += 1;

        for k in 0..ITEMS_PER_LIST {
            let (item_name, quantity) = ITEMS[(n * ITEMS_PER_LIST + k) % ITEMS.len()];
            let item = storage
                .add_item(NewItem::new(&list.id, item_name, quantity, owner.as_str()))
                .await?;
            items += 1;

            if (n + k) % 3 == 0 {
                storage.set_item_completed(&item.id, true, &owner).await?;
            }
        }

        if n % 5 == 4 {
            storage.update_list_archived(&list.id, &owner, true).await?;
        }

        if lists % 50 == 0 {
            println!("  Generated {} lists...", lists);
        }
    }

    let elapsed = start.elapsed();
    println!();
    println!("✓ Generated {} lists and {} items in {:?}", lists, items, elapsed);

    // Verify listing
    println!();
    println!("Verifying listing...");
    let active = storage
        .list_lists(&ListFilter::new(owner.as_str()), PageInfo::default())
        .await?;
    println!("  Active lists: {}", active.total);

    let party = storage
        .list_lists(
            &ListFilter::new(owner.as_str()).name("party"),
            PageInfo::default(),
        )
        .await?;
    println!("  Name contains 'party': {}", party.total);

    storage.close().await;

    println!();
    println!("✓ Seed complete!");

    Ok(())
}

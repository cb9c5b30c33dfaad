//! Database seeder for Caisse development and testing.
//!
//! Seeds the admin user, the single main cashbox, and the default
//! withdrawal types. Safe to run repeatedly; existing rows are skipped.
//!
//! Usage: cargo run --bin seeder

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

use caisse_core::auth::hash_password;
use caisse_db::entities::{
    cash_boxes, users, withdrawal_types,
    sea_orm_active_enums::{CashBoxKind, UserRole},
};

/// Admin user ID (consistent for all seeds)
const ADMIN_USER_ID: &str = "00000000-0000-0000-0000-000000000001";
/// Main cashbox ID (consistent for all seeds)
const MAIN_BOX_ID: &str = "00000000-0000-0000-0000-000000000002";

const ADMIN_EMAIL: &str = "admin@caisse.com";

const DEFAULT_WITHDRAWAL_TYPES: [&str; 4] = ["Cash", "Check", "Debt", "Bank Transfer"];

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must be set in environment");

    println!("Connecting to database...");
    let db = caisse_db::connect(&database_url)
        .await
        .expect("Failed to connect to database");

    println!("Seeding admin user...");
    seed_admin_user(&db).await;

    println!("Seeding main cashbox...");
    seed_main_cashbox(&db).await;

    println!("Seeding withdrawal types...");
    seed_withdrawal_types(&db).await;

    println!("Seeding complete!");
}

fn admin_user_id() -> Uuid {
    Uuid::parse_str(ADMIN_USER_ID).unwrap()
}

fn main_box_id() -> Uuid {
    Uuid::parse_str(MAIN_BOX_ID).unwrap()
}

/// Seeds the admin user.
async fn seed_admin_user(db: &DatabaseConnection) {
    if users::Entity::find_by_id(admin_user_id())
        .one(db)
        .await
        .ok()
        .flatten()
        .is_some()
    {
        println!("  Admin user already exists, skipping...");
        return;
    }

    let password =
        std::env::var("SEED_ADMIN_PASSWORD").unwrap_or_else(|_| "password".to_string());
    let password_hash = hash_password(&password).expect("Failed to hash admin password");

    let user = users::ActiveModel {
        id: Set(admin_user_id()),
        name: Set("Administrator".to_string()),
        email: Set(ADMIN_EMAIL.to_string()),
        password_hash: Set(password_hash),
        role: Set(UserRole::Admin),
        is_active: Set(true),
        created_at: Set(Utc::now().into()),
        updated_at: Set(Utc::now().into()),
    };

    if let Err(e) = user.insert(db).await {
        eprintln!("Failed to insert admin user: {e}");
    } else {
        println!("  Created admin user: {ADMIN_EMAIL}");
    }
}

/// Seeds the single main cashbox with a zero balance.
async fn seed_main_cashbox(db: &DatabaseConnection) {
    let existing = cash_boxes::Entity::find()
        .filter(cash_boxes::Column::Kind.eq(CashBoxKind::Main))
        .one(db)
        .await
        .ok()
        .flatten();
    if existing.is_some() {
        println!("  Main cashbox already exists, skipping...");
        return;
    }

    let cash_box = cash_boxes::ActiveModel {
        id: Set(main_box_id()),
        name: Set("Main Cashbox".to_string()),
        kind: Set(CashBoxKind::Main),
        owner_id: Set(admin_user_id()),
        parent_cashbox_id: Set(None),
        balance: Set(Decimal::ZERO),
        daily_limit: Set(None),
        status: Set("active".to_string()),
        created_at: Set(Utc::now().into()),
        updated_at: Set(Utc::now().into()),
    };

    if let Err(e) = cash_box.insert(db).await {
        eprintln!("Failed to insert main cashbox: {e}");
    } else {
        println!("  Created main cashbox");
    }
}

/// Seeds the default withdrawal types.
async fn seed_withdrawal_types(db: &DatabaseConnection) {
    for name in DEFAULT_WITHDRAWAL_TYPES {
        let existing = withdrawal_types::Entity::find()
            .filter(withdrawal_types::Column::Name.eq(name))
            .one(db)
            .await
            .ok()
            .flatten();
        if existing.is_some() {
            println!("  Withdrawal type '{name}' already exists, skipping...");
            continue;
        }

        let withdrawal_type = withdrawal_types::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name.to_string()),
            is_active: Set(true),
            created_at: Set(Utc::now().into()),
            updated_at: Set(Utc::now().into()),
        };

        if let Err(e) = withdrawal_type.insert(db).await {
            eprintln!("Failed to insert withdrawal type '{name}': {e}");
        } else {
            println!("  Created withdrawal type: {name}");
        }
    }
}

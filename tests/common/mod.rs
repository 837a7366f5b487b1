use chrono::{Duration, Utc};
use sea_orm::{ActiveModelTrait, Database, DatabaseConnection, DbErr, Set};
use sea_orm_migration::MigratorTrait;
use std::env;
use uuid::Uuid;

use framekart_backend::entities::{categories, products, sessions};
use framekart_backend::services::sessions::SessionData;
use framekart_backend::services::{
    notify::{NotificationService, OtpSettings},
    pincode::PincodeDirectoryService,
    razorpay::RazorpayService,
    tokens::TokenService,
};
use framekart_backend::AppState;

pub const TEST_JWT_SECRET: &str = "test-secret";
pub const TEST_RAZORPAY_SECRET: &str = "rzp_test_secret";

/// Set up test database connection and apply migrations.
/// Uses TEST_DATABASE_URL environment variable or falls back to default.
pub async fn setup_test_db() -> Result<DatabaseConnection, DbErr> {
    let database_url = env::var("TEST_DATABASE_URL")
        .or_else(|_| env::var("DATABASE_URL"))
        .unwrap_or_else(|_| {
            "postgresql://framekart_user@localhost:5432/framekart_test".to_string()
        });

    let db = Database::connect(&database_url).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

/// App state wired to the test database. External endpoints point at an
/// unroutable host so any accidental outbound call fails loudly.
pub async fn test_app_state() -> AppState {
    let db = setup_test_db().await.expect("Failed to connect to test DB");
    AppState {
        db,
        razorpay: RazorpayService::new(
            "rzp_test_key".to_string(),
            TEST_RAZORPAY_SECRET.to_string(),
            "http://127.0.0.1:9".to_string(),
        ),
        pincode: PincodeDirectoryService::new("http://127.0.0.1:9".to_string()),
        notifier: NotificationService::from_env(),
        tokens: TokenService::new(TEST_JWT_SECRET),
        otp: OtpSettings::from_env(),
    }
}

/// Insert a session row with the given state and return its key. Tests hand
/// the key to requests through the `x-session-key` header.
pub async fn seed_session(db: &DatabaseConnection, data: &SessionData) -> String {
    let key = Uuid::new_v4().simple().to_string();
    let row = sessions::ActiveModel {
        id: Set(key.clone()),
        data: Set(serde_json::to_value(data).unwrap()),
        expiry_date: Set((Utc::now() + Duration::days(1)).into()),
    };
    row.insert(db).await.expect("Failed to seed session");
    key
}

/// Seed an active category and return it. The slug is randomized so tests
/// sharing a database never collide.
pub async fn seed_category(db: &DatabaseConnection) -> categories::Model {
    let slug = format!("cat-{}", Uuid::new_v4().simple());
    let row = categories::ActiveModel {
        name: Set(format!("Category {}", &slug[4..10])),
        slug: Set(slug),
        image: Set(None),
        active: Set(true),
        ..Default::default()
    };
    row.insert(db).await.expect("Failed to seed category")
}

/// Seed an active product with the given shape/gender under a category.
pub async fn seed_product(
    db: &DatabaseConnection,
    category_id: i32,
    shape: &str,
    gender: &str,
    price: &str,
) -> products::Model {
    let slug = format!("frame-{}", Uuid::new_v4().simple());
    let row = products::ActiveModel {
        category_id: Set(category_id),
        brand_id: Set(None),
        name: Set(format!("Frame {}", &slug[6..12])),
        slug: Set(slug),
        description: Set(String::new()),
        gender: Set(gender.to_string()),
        shape: Set(shape.to_string()),
        frame_type: Set("full-rim".to_string()),
        frame_material: Set("acetate".to_string()),
        color: Set("black".to_string()),
        size: Set("medium".to_string()),
        weight_group: Set("light".to_string()),
        base_price: Set(price.parse().unwrap()),
        is_prescription_supported: Set(true),
        is_active: Set(true),
        is_trending: Set(false),
        is_premium: Set(false),
        is_exclusive: Set(false),
        created_at: Set(Utc::now().into()),
        ..Default::default()
    };
    row.insert(db).await.expect("Failed to seed product")
}

use once_cell::sync::OnceCell;
use sea_orm::{ConnectionTrait, Database, DatabaseBackend, DatabaseConnection, Statement};
use std::path::Path;

static DB_CONN: OnceCell<DatabaseConnection> = OnceCell::new();

/// Schema bootstrap, one statement per table. Lists are JSON text columns.
const SCHEMA: &[(&str, &str)] = &[
    (
        "a001_hotel",
        r#"
        CREATE TABLE IF NOT EXISTS a001_hotel (
            id TEXT PRIMARY KEY NOT NULL,
            name TEXT NOT NULL,
            description TEXT NOT NULL DEFAULT '',
            street TEXT NOT NULL DEFAULT '',
            city TEXT NOT NULL DEFAULT '',
            state TEXT NOT NULL DEFAULT '',
            country TEXT NOT NULL DEFAULT '',
            zip_code TEXT NOT NULL DEFAULT '',
            star_rating REAL NOT NULL DEFAULT 0,
            check_in_time TEXT NOT NULL DEFAULT '',
            check_out_time TEXT NOT NULL DEFAULT '',
            amenities TEXT NOT NULL DEFAULT '[]',
            images TEXT NOT NULL DEFAULT '[]',
            tags TEXT NOT NULL DEFAULT '[]',
            is_deleted INTEGER NOT NULL DEFAULT 0,
            created_at TEXT,
            updated_at TEXT,
            version INTEGER NOT NULL DEFAULT 0
        );
        "#,
    ),
    (
        "a002_room",
        r#"
        CREATE TABLE IF NOT EXISTS a002_room (
            id TEXT PRIMARY KEY NOT NULL,
            hotel_id TEXT NOT NULL,
            room_type TEXT NOT NULL,
            description TEXT NOT NULL DEFAULT '',
            max_occupancy INTEGER NOT NULL DEFAULT 1,
            bed_configuration TEXT NOT NULL DEFAULT '[]',
            room_size REAL,
            room_size_unit TEXT NOT NULL DEFAULT '',
            base_price REAL NOT NULL DEFAULT 0,
            discounted_price REAL NOT NULL DEFAULT 0,
            amenities TEXT NOT NULL DEFAULT '[]',
            images TEXT NOT NULL DEFAULT '[]',
            quantity INTEGER NOT NULL DEFAULT 1,
            smoking_allowed INTEGER NOT NULL DEFAULT 0,
            is_deleted INTEGER NOT NULL DEFAULT 0,
            created_at TEXT,
            updated_at TEXT,
            version INTEGER NOT NULL DEFAULT 0
        );
        "#,
    ),
    (
        "a003_review",
        r#"
        CREATE TABLE IF NOT EXISTS a003_review (
            id TEXT PRIMARY KEY NOT NULL,
            hotel_id TEXT NOT NULL,
            reviewer_name TEXT NOT NULL,
            rating REAL NOT NULL,
            title TEXT NOT NULL DEFAULT '',
            comment TEXT NOT NULL DEFAULT '',
            created_at TEXT
        );
        "#,
    ),
    (
        "a004_umrah_package",
        r#"
        CREATE TABLE IF NOT EXISTS a004_umrah_package (
            id TEXT PRIMARY KEY NOT NULL,
            title TEXT NOT NULL,
            description TEXT NOT NULL DEFAULT '',
            duration_days INTEGER NOT NULL,
            departure_city TEXT NOT NULL,
            departure_date TEXT NOT NULL,
            return_date TEXT NOT NULL,
            price_per_person REAL NOT NULL,
            currency TEXT NOT NULL,
            seats INTEGER NOT NULL,
            makkah_hotel TEXT NOT NULL,
            makkah_nights INTEGER NOT NULL,
            madinah_hotel TEXT NOT NULL DEFAULT '',
            madinah_nights INTEGER NOT NULL DEFAULT 0,
            visa_included INTEGER NOT NULL DEFAULT 0,
            flights_included INTEGER NOT NULL DEFAULT 0,
            transport_included INTEGER NOT NULL DEFAULT 0,
            meal_plan TEXT NOT NULL DEFAULT 'none',
            inclusions TEXT NOT NULL DEFAULT '[]',
            images TEXT NOT NULL DEFAULT '[]',
            is_deleted INTEGER NOT NULL DEFAULT 0,
            created_at TEXT,
            updated_at TEXT,
            version INTEGER NOT NULL DEFAULT 0
        );
        "#,
    ),
];

const INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_a002_room_hotel ON a002_room (hotel_id);",
    "CREATE INDEX IF NOT EXISTS idx_a003_review_hotel ON a003_review (hotel_id);",
];

fn build_sqlite_url(path: &Path) -> anyhow::Result<String> {
    let absolute_path = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()?.join(path)
    };
    // Normalize path separators and ensure proper URL form on Windows
    let normalized = absolute_path.to_string_lossy().replace('\\', "/");
    let needs_leading_slash = !normalized.starts_with('/') && normalized.contains(':');
    let prefix = if needs_leading_slash { "/" } else { "" };
    Ok(format!("sqlite://{}{}?mode=rwc", prefix, normalized))
}

pub async fn initialize_database(db_path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let db_url = build_sqlite_url(db_path)?;
    tracing::info!("Opening database: {}", db_url);
    let conn = Database::connect(&db_url).await?;

    for (table, sql) in SCHEMA {
        tracing::debug!("Ensuring table {}", table);
        conn.execute(Statement::from_string(DatabaseBackend::Sqlite, sql.to_string()))
            .await?;
    }
    for sql in INDEXES {
        conn.execute(Statement::from_string(DatabaseBackend::Sqlite, sql.to_string()))
            .await?;
    }

    DB_CONN
        .set(conn)
        .map_err(|_| anyhow::anyhow!("Failed to set DB_CONN"))?;
    Ok(())
}

pub fn get_connection() -> anyhow::Result<&'static DatabaseConnection> {
    DB_CONN
        .get()
        .ok_or_else(|| anyhow::anyhow!("Database connection has not been initialized"))
}

/// Decode a JSON list column; a corrupt value reads as empty
pub fn decode_list(raw: &str) -> Vec<String> {
    serde_json::from_str(raw).unwrap_or_else(|e| {
        tracing::warn!("Corrupt list column {:?}: {}", raw, e);
        Vec::new()
    })
}

pub fn encode_list(items: &[String]) -> String {
    serde_json::to_string(items).unwrap_or_else(|_| "[]".to_string())
}

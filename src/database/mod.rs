use mongodb::{
    bson::{doc, Document},
    options::{ClientOptions, IndexOptions},
    Client, Collection, Database, IndexModel,
};
use std::time::Duration;

use crate::models::{
    feedback::{Feedback, FEEDBACK},
    meeting::{Meeting, MEETINGS},
    user::{User, USERS},
};

/// Shared handle to the document store. Cloning is cheap; the driver pools connections.
#[derive(Clone)]
pub struct MongoDB {
    db: Database,
}

impl MongoDB {
    pub async fn new(uri: &str, db_name: &str) -> Result<Self, mongodb::error::Error> {
        let mut client_options = ClientOptions::parse(uri).await?;

        client_options.app_name = Some("mentor-service".to_string());
        client_options.max_pool_size = Some(20);
        client_options.min_pool_size = Some(2);
        client_options.max_idle_time = Some(Duration::from_secs(300));
        client_options.connect_timeout = Some(Duration::from_secs(5));
        client_options.server_selection_timeout = Some(Duration::from_secs(5));

        let client = Client::with_options(client_options)?;
        let db = client.database(db_name);

        let mongodb = Self { db };
        mongodb.ping().await?;
        mongodb.ensure_indexes().await;

        Ok(mongodb)
    }

    /// Round-trips a `ping` command; used by the health endpoint on every probe.
    pub async fn ping(&self) -> Result<(), mongodb::error::Error> {
        self.db.run_command(doc! { "ping": 1 }).await.map(|_| ())
    }

    pub async fn is_connected(&self) -> bool {
        match self.ping().await {
            Ok(()) => true,
            Err(e) => {
                log::warn!("⚠️  MongoDB ping failed: {}", e);
                false
            }
        }
    }

    /// Creates the unique and lookup indexes the services rely on.
    async fn ensure_indexes(&self) {
        log::info!("🔧 Creating database indexes...");

        let unique = || IndexOptions::builder().unique(true).build();
        let indexes: [(&str, Document, Option<IndexOptions>); 4] = [
            (USERS, doc! { "email": 1 }, Some(unique())),
            (USERS, doc! { "studentId": 1 }, Some(unique())),
            (MEETINGS, doc! { "studentId": 1, "scheduledDate": 1 }, None),
            (FEEDBACK, doc! { "studentId": 1, "createdAt": -1 }, None),
        ];

        for (collection, keys, options) in indexes {
            let label = format!("{}({:?})", collection, keys.keys().collect::<Vec<_>>());
            let model = match options {
                Some(options) => IndexModel::builder().keys(keys).options(options).build(),
                None => IndexModel::builder().keys(keys).build(),
            };

            match self.collection::<Document>(collection).create_index(model).await {
                Ok(_) => log::info!("   ✅ Index ready: {}", label),
                Err(e) => log::warn!("   ⚠️  Could not create index {}: {}", label, e),
            }
        }
    }

    pub fn collection<T: Send + Sync>(&self, name: &str) -> Collection<T> {
        self.db.collection(name)
    }

    pub fn users(&self) -> Collection<User> {
        self.collection(USERS)
    }

    pub fn meetings(&self) -> Collection<Meeting> {
        self.collection(MEETINGS)
    }

    pub fn feedback(&self) -> Collection<Feedback> {
        self.collection(FEEDBACK)
    }
}

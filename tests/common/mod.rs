use std::sync::Arc;

use testcontainers::runners::AsyncRunner;
use testcontainers::ContainerAsync;
use testcontainers_modules::mongo::Mongo;

use jotter::db::repository::{DocumentRepository, MongoDocumentRepository};

/// Holds the running MongoDB container and a repository wired to it.
///
/// The container is kept alive for as long as this struct lives. When
/// dropped, it is stopped and cleaned up automatically.
pub struct TestEnv {
    _mongo: ContainerAsync<Mongo>,
    pub repo: Arc<dyn DocumentRepository>,
}

impl TestEnv {
    /// Spin up MongoDB and build a repository against it.
    pub async fn start() -> Self {
        let mongo_container = Mongo::default()
            .start()
            .await
            .expect("Failed to start MongoDB container");

        let mongo_port = mongo_container
            .get_host_port_ipv4(27017)
            .await
            .expect("Failed to get MongoDB port");
        let mongo_uri = format!("mongodb://127.0.0.1:{}", mongo_port);
        let mongo_client = mongodb::Client::with_uri_str(&mongo_uri)
            .await
            .expect("Failed to connect to MongoDB");
        let mongo_db = mongo_client.database("jotter_test");
        let repo: Arc<dyn DocumentRepository> = Arc::new(MongoDocumentRepository::new(&mongo_db));

        Self {
            _mongo: mongo_container,
            repo,
        }
    }
}

use std::time::Duration;

use deadpool::{managed, Runtime};
use serde::{Deserialize, Serialize};
use surrealdb::{
    engine::remote::ws::{Client, Ws, Wss}, opt::auth, Surreal
};

pub type Pool = managed::Pool<Manager>;
pub type Connection = managed::Object<Manager>;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Unsupported database url {0:?}, expected ws:// or wss://")]
    InvalidUrl(String),
    #[error("Unknown credentials type {0:?}")]
    InvalidCredentials(String),
    #[error("Failed to build pool: {0}")]
    Build(#[from] managed::BuildError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credentials {
    Anonymous,
    Root {
        user: String,
        pass: String,
    },
    Namespace {
        user: String,
        pass: String,
    },
    Database {
        user: String,
        pass: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scheme {
    Ws,
    Wss,
}

#[derive(Debug)]
pub struct Manager {
    scheme: Scheme,
    host: String,

    ns: String,
    db: String,
    creds: Credentials,
}

impl Manager {
    pub fn new(url: &str, ns: &str, db: &str, creds: Credentials) -> Result<Self, ConfigError> {
        let (scheme, host) = match url.split_once("://") {
            Some(("ws", host)) if !host.is_empty() => (Scheme::Ws, host),
            Some(("wss", host)) if !host.is_empty() => (Scheme::Wss, host),
            _ => return Err(ConfigError::InvalidUrl(url.to_string())),
        };
        Ok(Self {
            scheme,
            host: host.to_string(),
            ns: ns.to_string(),
            db: db.to_string(),
            creds,
        })
    }

    async fn sign_in(&self, conn: &Surreal<Client>) -> Result<(), surrealdb::Error> {
        match &self.creds {
            Credentials::Anonymous => {},
            Credentials::Root { user, pass } => {
                conn.signin(auth::Root { username: user.as_str(), password: pass.as_str() }).await?;
            },
            Credentials::Namespace { user, pass } => {
                conn.signin(auth::Namespace {
                    namespace: self.ns.as_str(),
                    username: user.as_str(),
                    password: pass.as_str(),
                }).await?;
            },
            Credentials::Database { user, pass } => {
                conn.signin(auth::Database {
                    namespace: self.ns.as_str(),
                    database: self.db.as_str(),
                    username: user.as_str(),
                    password: pass.as_str(),
                }).await?;
            },
        }
        Ok(())
    }
}

impl managed::Manager for Manager {
    type Type = Surreal<Client>;
    type Error = surrealdb::Error;

    async fn create(&self) -> Result<Self::Type, Self::Error> {
        let conn = match self.scheme {
            Scheme::Ws => Surreal::new::<Ws>(self.host.as_str()).await?,
            Scheme::Wss => Surreal::new::<Wss>(self.host.as_str()).await?,
        };
        self.sign_in(&conn).await?;
        conn.use_ns(self.ns.clone()).use_db(self.db.clone()).await?;
        Ok(conn)
    }

    async fn recycle(&self, conn: &mut Self::Type, _: &managed::Metrics) -> managed::RecycleResult<Self::Error> {
        conn.health().await?;
        Ok(())
    }
}

const fn default_max_connections() -> usize {
    16
}

const fn default_connect_timeout() -> u64 {
    5
}

fn default_credentials_type() -> String {
    "root".to_string()
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Config {
    /// Websocket URL of the server, `ws://host:port` or `wss://host`.
    pub url: String,
    /// Namespace selected on every connection.
    pub ns: String,
    /// Database selected on every connection.
    pub db: String,
    /// Maximum number of connections kept by the pool.
    ///
    /// _Default:_ `16`.
    #[serde(default = "default_max_connections")]
    pub max_connections: usize,
    /// Seconds to wait for a connection to be created or handed out.
    ///
    /// _Default:_ `5`.
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout: u64,
    /// Seconds a recycle check may take before the connection is dropped.
    ///
    /// _Default:_ `None`.
    #[serde(default)]
    pub idle_timeout: Option<u64>,
    /// One of `anonymous`, `root`, `namespace` or `database`.
    ///
    /// _Default:_ `root`.
    #[serde(default = "default_credentials_type")]
    pub credentials_type: String,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub pass: Option<String>,
}

impl Config {
    pub fn credentials(&self) -> Result<Credentials, ConfigError> {
        let user = self.user.clone().unwrap_or_default();
        let pass = self.pass.clone().unwrap_or_default();
        match self.credentials_type.as_str() {
            "anonymous" => Ok(Credentials::Anonymous),
            "root" => Ok(Credentials::Root { user, pass }),
            "namespace" => Ok(Credentials::Namespace { user, pass }),
            "database" => Ok(Credentials::Database { user, pass }),
            other => Err(ConfigError::InvalidCredentials(other.to_string())),
        }
    }

    /// Builds the pool. No connection is opened until the first `get`.
    pub fn create_pool(&self) -> Result<Pool, ConfigError> {
        let manager = Manager::new(&self.url, &self.ns, &self.db, self.credentials()?)?;
        let timeout = Some(Duration::from_secs(self.connect_timeout));
        let pool = Pool::builder(manager)
            .max_size(self.max_connections)
            .wait_timeout(timeout)
            .create_timeout(timeout)
            .recycle_timeout(self.idle_timeout.map(Duration::from_secs))
            .runtime(Runtime::Tokio1)
            .build()?;
        Ok(pool)
    }
}

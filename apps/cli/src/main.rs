//! `warden`: opens a fake database and a fake API client inside a resource
//! scope, uses both, and lets the scope close them.

mod fakes;

use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use warden_log::{Config, Format};
use warden_resource::{TracingObserver, scoped};

use crate::fakes::{FailureMode, FakeApi, FakeDatabase};

#[derive(Debug, Parser)]
#[command(name = "warden", version, about = "Resource scope demo")]
struct Cli {
    /// Log level filter
    #[arg(long, env = "WARDEN_LOG", default_value = "info")]
    log_level: String,

    /// Log output format (compact, pretty, json)
    #[arg(long, env = "WARDEN_LOG_FORMAT", default_value = "compact")]
    log_format: Format,

    /// SQL handed to the fake database
    #[arg(long, default_value = "SELECT * FROM users")]
    query: String,

    /// Make this resource fail to open
    #[arg(long, value_enum)]
    fail_open: Option<Target>,

    /// Make this resource fail to close
    #[arg(long, value_enum)]
    fail_close: Option<Target>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Target {
    Db,
    Api,
}

impl Cli {
    fn failure_for(&self, target: Target) -> FailureMode {
        if self.fail_open == Some(target) {
            FailureMode::OnOpen
        } else if self.fail_close == Some(target) {
            FailureMode::OnClose
        } else {
            FailureMode::None
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::from_env()
        .with_level(cli.log_level.clone())
        .with_format(cli.log_format);
    let _guard = warden_log::init_with(config)?;

    run(&cli)
}

fn run(cli: &Cli) -> Result<()> {
    scoped(Arc::new(TracingObserver), |scope| {
        let db = scope.register(
            "fake_db",
            FakeDatabase::new().with_failure(cli.failure_for(Target::Db)),
        )?;
        let api = scope.register(
            "fake_api",
            FakeApi::new().with_failure(cli.failure_for(Target::Api)),
        )?;

        tracing::debug!(
            db_connected = db.borrow().is_connected(),
            api_session = api.borrow().is_session_open(),
            "Resources ready"
        );

        let result = db.borrow().query(&cli.query);
        let data = api.borrow().fetch_data();

        tracing::info!(result, "Query Result");
        tracing::info!(%data, "API Data");
        Ok::<_, anyhow::Error>(())
    })
}

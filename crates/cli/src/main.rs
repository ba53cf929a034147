// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! # backoffice
//!
//! Operator command line for the restaurant back office's undo workflows.
//!
//! ```text
//! backoffice --role branch_admin --user-id 5 --branch-id 2 sessions --date 2024-01-10
//! backoffice --role super_admin --user-id 1 undo-session 2024-01-10_2024-01-10_09-00
//! backoffice --role super_admin --user-id 1 bulk-import --prefix TM --start 0 --end 9999
//! ```
//!
//! `--role` and `--user-id` are required. They, the connection and the
//! grouping timezone can also come from `BACKOFFICE_ROLE`,
//! `BACKOFFICE_USER_ID`, `BACKOFFICE_API_URL`, `BACKOFFICE_TOKEN` and
//! `BACKOFFICE_TZ`. `RUST_LOG` overrides the `-v`/`-q` log level.

#![deny(
    clippy::pedantic,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]

mod output;

use backoffice_api::{
    AuditScope, BackofficeApi, BulkImportController, BulkImportParams, ClientConfig,
    DEFAULT_BASE_URL, DEFAULT_DELAY_MS, HttpClient, OperationStatus, RecordLoader, UndoExecutor,
};
use backoffice_domain::{AuthenticatedActor, EntityType, Role, parse_date};
use backoffice_undo::{StockSessionGrouper, UndoAuthorizer};
use clap::{Parser, Subcommand};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use color_eyre::{
    Result,
    eyre::{Context, bail, eyre},
};
use std::sync::Arc;
use time::{Date, Month};
use tracing::{info, level_filters::LevelFilter, warn};
use tracing_log::AsTrace;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(args.log_level().to_string()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();

    match args.run().await {
        Ok(()) => (),
        Err(err) => {
            tracing::error!("{err}");
            std::process::exit(1);
        }
    }
    Ok(())
}

#[derive(Debug, Parser)]
#[command(name = "backoffice", version, about = "Restaurant back-office undo tools")]
struct Args {
    /// API root
    #[arg(long, env = "BACKOFFICE_API_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Bearer token passed through to the API
    #[arg(long, env = "BACKOFFICE_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// IANA timezone offset-carrying timestamps are bucketed in.
    /// Server wall-clock timestamps are never shifted.
    #[arg(long, env = "BACKOFFICE_TZ", default_value = "UTC")]
    timezone: String,

    /// Role of the operator running the command
    #[arg(long, env = "BACKOFFICE_ROLE", value_parser = parse_role)]
    role: Role,

    /// User id of the operator running the command
    #[arg(long = "user-id", env = "BACKOFFICE_USER_ID")]
    user_id: i64,

    /// Branch of the operator, or the branch a super admin is looking at
    #[arg(long = "branch-id")]
    branch_id: Option<i64>,

    #[command(subcommand)]
    command: Command,

    #[command(flatten)]
    verbosity: Verbosity<InfoLevel>,
}

#[derive(Clone, Debug, Subcommand)]
enum Command {
    /// List one collection with creator and undo state
    Records {
        /// Entity type, e.g. `waste_entry`
        entity_type: String,
    },

    /// List stock count sessions
    Sessions {
        /// Only sessions counting this business date (YYYY-MM-DD)
        #[arg(long, value_parser = parse_date_arg)]
        date: Option<Date>,
    },

    /// Undo one audit log entry
    Undo {
        /// The audit log entry id
        log_id: i64,
    },

    /// Undo every entry of a stock count session you may undo
    UndoSession {
        /// Session id as printed by `sessions`
        session_id: String,
    },

    /// Show one operator's audit entries for a month
    Activity {
        /// The operator whose entries to show
        #[arg(long = "user-id")]
        user_id: i64,

        /// Calendar year
        #[arg(long)]
        year: i32,

        /// Calendar month, 1-12
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=12))]
        month: u8,

        /// Only entries for this entity type
        #[arg(long)]
        entity_type: Option<String>,
    },

    /// Import B2B products. Ctrl-C cancels.
    BulkImport {
        /// Product prefix, TM or CD
        #[arg(long)]
        prefix: String,

        /// First product number
        #[arg(long)]
        start: i64,

        /// Last product number
        #[arg(long)]
        end: i64,

        /// Pause between upstream requests in milliseconds
        #[arg(long, default_value_t = DEFAULT_DELAY_MS, allow_negative_numbers = true)]
        delay_ms: i64,
    },
}

fn parse_role(value: &str) -> std::result::Result<Role, String> {
    value.parse::<Role>().map_err(|err| err.to_string())
}

fn parse_date_arg(value: &str) -> std::result::Result<Date, String> {
    parse_date(value).map_err(|err| err.to_string())
}

/// Everything a command needs, built once from the global arguments.
struct Session {
    api: Arc<dyn BackofficeApi>,
    actor: AuthenticatedActor,
    authorizer: UndoAuthorizer,
    loader: RecordLoader,
}

impl Args {
    fn log_level(&self) -> LevelFilter {
        self.verbosity.log_level_filter().as_trace()
    }

    const fn actor(&self) -> AuthenticatedActor {
        AuthenticatedActor::new(self.user_id, self.role, self.branch_id)
    }

    fn session(&self) -> Result<Session> {
        let config = ClientConfig::new(&self.base_url).with_token(self.token.clone());
        let api: Arc<dyn BackofficeApi> =
            Arc::new(HttpClient::new(config).wrap_err("invalid API configuration")?);
        let grouper = StockSessionGrouper::from_timezone_name(&self.timezone)
            .wrap_err("invalid --timezone")?;

        Ok(Session {
            loader: RecordLoader::new(Arc::clone(&api), grouper),
            api,
            actor: self.actor(),
            authorizer: UndoAuthorizer::default(),
        })
    }

    async fn run(self) -> Result<()> {
        let session = self.session()?;
        let scope = AuditScope::branch(session.actor.scoped_branch(self.branch_id));

        match self.command {
            Command::Records { entity_type } => {
                let entity_type = EntityType::from(entity_type);
                let records = session.loader.load_annotated(&entity_type, scope).await?;
                print!(
                    "{}",
                    output::render_records(&records, &session.actor, &session.authorizer)
                );
            }
            Command::Sessions { date } => {
                let sessions = session.loader.load_stock_sessions(scope, date).await?;
                print!(
                    "{}",
                    output::render_sessions(&sessions, &session.actor, &session.authorizer)
                );
            }
            Command::Undo { log_id } => {
                UndoExecutor::new(session.api)
                    .undo(log_id)
                    .await
                    .map_err(|err| eyre!(err.user_message()))?;
                println!("Undid audit entry {log_id}.");
            }
            Command::UndoSession { session_id } => {
                let sessions = session.loader.load_stock_sessions(scope, None).await?;
                let Some(target) = sessions.iter().find(|s| s.id == session_id) else {
                    bail!("no stock count session '{session_id}'");
                };
                if target.all_undone {
                    bail!("session '{session_id}' is already undone");
                }
                let report = UndoExecutor::new(Arc::clone(&session.api))
                    .handle_undo_group(target, &session.actor, &session.authorizer)
                    .await;
                println!("{}", output::render_batch_report(&report));
                if !report.is_complete_success() {
                    bail!("session '{session_id}' was only partially undone");
                }
            }
            Command::Activity {
                user_id,
                year,
                month,
                entity_type,
            } => {
                let month = Month::try_from(month).wrap_err("invalid --month")?;
                let entity_type = entity_type.map(EntityType::from);
                let logs = session
                    .loader
                    .load_activity(entity_type.as_ref(), scope.by_user(Some(user_id)), year, month)
                    .await?;
                print!("{}", output::render_activity(&logs));
            }
            Command::BulkImport {
                prefix,
                start,
                end,
                delay_ms,
            } => {
                let params = BulkImportParams::new(&prefix, start, end).with_delay_ms(delay_ms);
                run_bulk_import(session.api, params).await?;
            }
        }
        Ok(())
    }
}

async fn run_bulk_import(api: Arc<dyn BackofficeApi>, params: BulkImportParams) -> Result<()> {
    let controller = BulkImportController::new(api);
    let run = controller.start(params)?;
    let handle = run.cancel_handle();

    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Cancelling bulk import");
            handle.cancel();
        }
    });

    info!("Bulk import running, press Ctrl-C to cancel");
    let state = run.wait().await;
    println!("{}", output::render_import_state(&state));
    if state.status != OperationStatus::Succeeded {
        bail!("bulk import ended as {}", state.status);
    }
    Ok(())
}

use std::{
    net::{IpAddr, SocketAddr},
    str::FromStr,
};

use clap::Parser;
use server::{cli::Cli, db, routes, AppState};
use shared::{configure_tracing, load_dotenv};
use tokio::net::TcpListener;
use tracing::{debug, info};

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    load_dotenv()?;
    configure_tracing()?;

    let args = Cli::parse();
    debug!(?args);

    if args.debug_delete_database {
        db::delete_database(&args.sqlite_connection_string)?;
    }

    // Run the migrations synchronously before creating the pool or launching the server
    let ran = db::run_migrations(&args.sqlite_connection_string)?;
    info!("Ran {ran} db migrations");

    let pool = db::create_pool(&args.sqlite_connection_string)?;

    let socket = SocketAddr::new(IpAddr::from_str(&args.bind_addr)?, args.port);
    let listener = TcpListener::bind(socket).await?;
    info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, routes::router(AppState::new(pool, args))).await?;

    Ok(())
}

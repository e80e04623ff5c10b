use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[clap(name = "fitness server")]
pub struct Cli {
    #[clap(long, env, default_value = "fitness.sqlite")]
    pub sqlite_connection_string: String,
    #[clap(long, env, default_value = "8080")]
    pub port: u16,
    #[clap(long, env, default_value = "127.0.0.1")]
    pub bind_addr: String,
    /// Upper bound for request bodies
    #[arg(long, env, default_value = "65536")]
    pub max_request_bytes: usize,

    /// Deletes the database before starting the main program for debug purposes
    #[arg(long, env, default_value = "false")]
    pub debug_delete_database: bool,
}

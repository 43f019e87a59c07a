use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Parser;
use schema_builder::Schema;
use tracing_util::{ErrorVisibility, SpanVisibility, TraceableError};

use admin_meta::{
    build_admin_meta_root, export_admin_ui_build, get_admin_meta_schema, initialise_lists,
    AdminConfig, AdminMetaBuildError, ExportError, ExposeInternalErrors, SchemaBuildError,
};

const SERVICE_NAME: &str = "print-admin-meta-schema";
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prints the GraphQL schema extended with the admin meta, or the static admin meta as JSON.
#[allow(clippy::struct_excessive_bools)]
#[derive(Parser)]
#[command(version = VERSION)]
struct Options {
    /// The JSON file with the admin configuration. Without one, no lists are configured.
    #[arg(long, value_name = "PATH", env = "ADMIN_CONFIG_PATH")]
    config_path: Option<PathBuf>,

    /// The SDL of the GraphQL schema to extend.
    #[arg(long, value_name = "PATH", env = "BASE_SCHEMA_PATH")]
    base_schema_path: PathBuf,

    /// Log traces to stdout.
    #[arg(long, env = "EXPORT_TRACES_STDOUT")]
    export_traces_stdout: bool,

    /// Whether internal errors should be shown or censored.
    #[arg(long, env = "EXPOSE_INTERNAL_ERRORS")]
    expose_internal_errors: bool,

    /// Print the static admin meta and the views it refers to as JSON instead of the schema.
    #[arg(long)]
    export_admin_meta: bool,
}

#[derive(Debug, thiserror::Error)]
enum StartupError {
    #[error("could not read {}: {source}", path.display())]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid admin configuration in {}: {source}", path.display())]
    InvalidConfig {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("invalid base schema: {0}")]
    InvalidBaseSchema(schema_builder::Error),
    #[error("{0}")]
    AdminMeta(#[from] AdminMetaBuildError),
    #[error("{0}")]
    Schema(#[from] SchemaBuildError),
    #[error("{0}")]
    Export(#[from] ExportError),
    #[error("could not serialize the export: {0}")]
    SerializeExport(serde_json::Error),
}

impl TraceableError for StartupError {
    fn visibility(&self) -> ErrorVisibility {
        ErrorVisibility::User
    }
}

fn read_file(path: &Path) -> Result<String, StartupError> {
    std::fs::read_to_string(path).map_err(|source| StartupError::ReadFile {
        path: path.to_path_buf(),
        source,
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let options = Options::parse();
    let export_traces_stdout = if options.export_traces_stdout {
        tracing_util::ExportTracesStdout::Enable
    } else {
        tracing_util::ExportTracesStdout::Disable
    };
    tracing_util::initialize_tracing(
        SERVICE_NAME.to_string(),
        Some(VERSION),
        export_traces_stdout,
    )?;

    let result = tracing_util::global_tracer()
        .in_span_async(
            "print_admin_meta_schema",
            "Print admin meta schema",
            SpanVisibility::Internal,
            || Box::pin(run(&options)),
        )
        .await;

    tracing_util::shutdown_tracer();
    Ok(result?)
}

#[allow(clippy::print_stdout)]
async fn run(options: &Options) -> Result<(), StartupError> {
    let config: AdminConfig = match &options.config_path {
        Some(path) => serde_json::from_str(&read_file(path)?).map_err(|source| {
            StartupError::InvalidConfig {
                path: path.clone(),
                source,
            }
        })?,
        None => AdminConfig::default(),
    };
    let base_sdl = read_file(&options.base_schema_path)?;
    let base = Schema::from_sdl(&base_sdl).map_err(StartupError::InvalidBaseSchema)?;

    let lists = initialise_lists(&config);
    let admin_meta = Arc::new(build_admin_meta_root(&config, &lists)?);
    let schema = get_admin_meta_schema(
        Arc::new(config),
        &base,
        Arc::new(lists),
        admin_meta.clone(),
        ExposeInternalErrors::from_flag(options.expose_internal_errors),
    )?;

    if options.export_admin_meta {
        let executable = schema.to_executable().map_err(SchemaBuildError::from)?;
        let exported = export_admin_ui_build(&executable, &admin_meta).await?;
        let json =
            serde_json::to_string_pretty(&exported).map_err(StartupError::SerializeExport)?;
        println!("{json}");
    } else {
        print!("{}", schema.generate_sdl());
    }
    Ok(())
}

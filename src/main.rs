//! 命令行查找工具入口

use std::path::PathBuf;
use std::process;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use storefront_resource::env::{self, EnvVar};
use storefront_resource::{
    ConfigManager, MessageResolver, MessageSource, RequestContext, ResourceError,
};

#[derive(Parser, Debug)]
#[command(name = "resource-lookup", version, about = "Resolve a localized storefront message")]
struct Cli {
    /// Message key to resolve
    #[arg(required_unless_present = "env_docs")]
    key: Option<String>,

    /// Positional format arguments substituted into {0}, {1}, ...
    args: Vec<String>,

    /// Resource bundle name
    #[arg(short, long)]
    bundle: Option<String>,

    /// Default message when nothing is found
    #[arg(short, long)]
    default: Option<String>,

    /// Locale, e.g. de_DE
    #[arg(short, long)]
    locale: Option<String>,

    /// Site identifier
    #[arg(short, long)]
    site: Option<String>,

    /// Directory with .properties bundles
    #[arg(long)]
    bundle_dir: Option<PathBuf>,

    /// JSON file with key/value mapping records
    #[arg(long)]
    mapping_file: Option<PathBuf>,

    /// Primary message source: system, key-value-map, dynamic-folder
    #[arg(long)]
    source: Option<MessageSource>,

    /// Config file (TOML or JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print environment variable documentation and exit
    #[arg(long)]
    env_docs: bool,
}

fn main() {
    let cli = Cli::parse();

    let level = env::core::LogLevel::get_or_default("warn".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(level))
        .with_writer(std::io::stderr)
        .init();

    if cli.env_docs {
        print!("{}", env::generate_env_docs());
        return;
    }

    match run(cli) {
        Ok(message) => println!("{}", message),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

fn run(cli: Cli) -> storefront_resource::ResourceResult<String> {
    let key = cli
        .key
        .ok_or_else(|| ResourceError::InvalidInput("缺少消息键".to_string()))?;

    // 命令行参数叠加完成后才校验，构建解析器时统一进行
    let mut config = ConfigManager::load_layered(cli.config.as_deref())?;

    if let Some(source) = cli.source {
        config.message_source = source;
    }
    if let Some(site) = cli.site {
        config.site_id = site;
    }
    if let Some(locale) = cli.locale {
        config.locale = locale;
    }
    if let Some(dir) = cli.bundle_dir {
        config.bundle_dir = Some(dir.to_string_lossy().into_owned());
    }
    if let Some(file) = cli.mapping_file {
        config.mapping_file = Some(file.to_string_lossy().into_owned());
    }

    let ctx: RequestContext = config.default_context();
    let resolver = MessageResolver::from_config(config)?;

    let args: Vec<&str> = cli.args.iter().map(String::as_str).collect();
    let message = if args.is_empty() {
        resolver.msg_in_bundle(&ctx, &key, cli.bundle.as_deref(), cli.default.as_deref())
    } else {
        resolver.msgf(
            &ctx,
            &key,
            cli.bundle.as_deref(),
            cli.default.as_deref(),
            &args,
        )
    };

    Ok(message)
}

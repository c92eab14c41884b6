//! `fragdoc` - drive a composition session from the command line

use anyhow::{bail, Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use fragdoc_catalog::FragmentCatalog;
use fragdoc_codec::Token;
use fragdoc_composition::DropOutcome;
use fragdoc_core::{
    HttpContentSource, NotificationLog, RestoreOutcome, Session, SessionConfig,
};
use fragdoc_storage::{BlobStore, FileStore, MemoryStore};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

fn cli() -> Command {
    let config_arg = Arg::new("config")
        .long("config")
        .short('c')
        .value_parser(value_parser!(PathBuf))
        .help("Session configuration (TOML)");
    let store_arg = Arg::new("store-dir")
        .long("store-dir")
        .value_parser(value_parser!(PathBuf))
        .help("Directory holding the persistence slot");

    Command::new("fragdoc")
        .version(fragdoc_core::VERSION)
        .about("Fragment-driven document composition")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .global(true)
                .action(ArgAction::Count)
                .help("Increase log verbosity (overridden by RUST_LOG)"),
        )
        .arg(
            Arg::new("log-json")
                .long("log-json")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Emit logs as JSON lines"),
        )
        .subcommand(
            Command::new("encode")
                .about("Encode a text file into a persistence token")
                .arg(
                    Arg::new("file")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("File to encode, or - for stdin"),
                ),
        )
        .subcommand(
            Command::new("decode")
                .about("Decode a persistence token")
                .arg(Arg::new("token").required(true).help("Token to decode"))
                .arg(
                    Arg::new("strict")
                        .long("strict")
                        .action(ArgAction::SetTrue)
                        .help("Fail on malformed tokens instead of printing nothing"),
                ),
        )
        .subcommand(
            Command::new("catalog")
                .about("List fragments by group")
                .arg(
                    Arg::new("fragments")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("Fragment catalog (JSON)"),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Output flattened fragments as JSON"),
                ),
        )
        .subcommand(
            Command::new("compose")
                .about("Run a session: load, insert fragments, save")
                .arg(
                    Arg::new("fragments")
                        .long("fragments")
                        .short('f')
                        .value_parser(value_parser!(PathBuf))
                        .help("Fragment catalog (JSON); defaults to fragments_path from config"),
                )
                .arg(
                    Arg::new("input")
                        .long("input")
                        .short('i')
                        .value_parser(value_parser!(PathBuf))
                        .help("File to upload as the starting document"),
                )
                .arg(
                    Arg::new("mime")
                        .long("mime")
                        .help("MIME type of --input (guessed from the extension otherwise)"),
                )
                .arg(
                    Arg::new("fetch")
                        .long("fetch")
                        .action(ArgAction::SetTrue)
                        .help("Fetch the starting document from source_url"),
                )
                .arg(
                    Arg::new("insert")
                        .long("insert")
                        .action(ArgAction::Append)
                        .help("Fragment id to drop into the editor (repeatable)"),
                )
                .arg(config_arg.clone())
                .arg(store_arg.clone()),
        )
        .subcommand(
            Command::new("restore")
                .about("Print the document held in the persistence slot")
                .arg(config_arg)
                .arg(store_arg),
        )
}

fn init_tracing(verbosity: u8, json: bool) {
    let default = match verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let matches = cli().get_matches();
    init_tracing(matches.get_count("verbose"), matches.get_flag("log-json"));

    match matches.subcommand() {
        Some(("encode", args)) => encode(args),
        Some(("decode", args)) => decode(args),
        Some(("catalog", args)) => catalog(args),
        Some(("compose", args)) => compose(args).await,
        Some(("restore", args)) => restore(args).await,
        Some((other, _)) => bail!("unknown subcommand: {other}"),
        None => bail!("no subcommand given"),
    }
}

fn encode(args: &ArgMatches) -> Result<()> {
    let path = args.get_one::<PathBuf>("file").context("missing file")?;
    let text = if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?
    };
    println!("{}", Token::encode(&text));
    Ok(())
}

fn decode(args: &ArgMatches) -> Result<()> {
    let raw = args.get_one::<String>("token").context("missing token")?;
    let token = Token::from_raw(raw.trim());
    let text = if args.get_flag("strict") {
        token.try_decode()?
    } else {
        token.decode()
    };
    print!("{text}");
    Ok(())
}

fn catalog(args: &ArgMatches) -> Result<()> {
    let path = args.get_one::<PathBuf>("fragments").context("missing fragments")?;
    let catalog = FragmentCatalog::from_path(path)?;

    if args.get_flag("json") {
        println!("{}", serde_json::to_string_pretty(catalog.fragments())?);
        return Ok(());
    }

    for (group, fragments) in catalog.groups() {
        println!("{group} ({} Unused)", fragments.len());
        for fragment in fragments {
            println!("  {:<16} {}", fragment.id.as_str(), fragment.content);
        }
    }
    for id in catalog.collisions() {
        eprintln!("warning: duplicate fragment id {id}");
    }
    Ok(())
}

async fn compose(args: &ArgMatches) -> Result<()> {
    let config = session_config(args)?;
    let fragments = args
        .get_one::<PathBuf>("fragments")
        .or(config.fragments_path.as_ref())
        .context("no fragment catalog: pass --fragments or set fragments_path")?;
    let catalog = Arc::new(FragmentCatalog::from_path(fragments)?);
    let log = Arc::new(NotificationLog::new());

    let mut session = Session::new(config.clone(), catalog, open_store(&config))
        .with_notifier(log.clone());

    let mut failed = false;
    if args.get_flag("fetch") {
        let source = HttpContentSource::new(config.source_url.clone());
        failed |= session.load_initial(&source).await.is_err();
    }

    if let Some(input) = args.get_one::<PathBuf>("input") {
        let bytes = std::fs::read(input).with_context(|| format!("reading {}", input.display()))?;
        let mime = args
            .get_one::<String>("mime")
            .cloned()
            .unwrap_or_else(|| guess_mime(input).to_string());
        let filename = input
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        failed |= session.upload(&filename, &bytes, &mime).await.is_err();
    }

    let zone = config.drop_zone.clone();
    for id in args.get_many::<String>("insert").into_iter().flatten() {
        session.drag_start(id.as_str());
        match session.drag_end(Some(zone.as_str())) {
            DropOutcome::Inserted(_) => {}
            DropOutcome::Unresolved { fragment_id } => {
                eprintln!("warning: unknown fragment {fragment_id}");
            }
            other => tracing::debug!(?other, "fragment not inserted"),
        }
    }

    if session.can_save() {
        failed |= session.save().await.is_err();
    }

    for notification in log.drain() {
        eprintln!("{notification}");
    }

    println!("{}", session.content());
    eprintln!(
        "{} used, {:.2}% of catalog, {} unused fragments",
        session.insertions(),
        session.usage_ratio(),
        session
            .catalog()
            .groups()
            .keys()
            .map(|group| session.unused_in_group(group))
            .sum::<usize>()
    );
    if let Some(token) = session.last_token() {
        eprintln!("token: {token}");
    }

    if failed {
        bail!("session finished with errors");
    }
    Ok(())
}

async fn restore(args: &ArgMatches) -> Result<()> {
    let config = session_config(args)?;
    let log = Arc::new(NotificationLog::new());
    let mut session = Session::new(
        config.clone(),
        Arc::new(FragmentCatalog::default()),
        open_store(&config),
    )
    .with_notifier(log.clone());

    let outcome = session.restore_saved().await;
    for notification in log.drain() {
        eprintln!("{notification}");
    }

    match outcome? {
        RestoreOutcome::Restored { .. } => {
            print!("{}", session.content());
            Ok(())
        }
        RestoreOutcome::Unusable => bail!("slot '{}' holds a malformed token", config.slot_name),
    }
}

fn session_config(args: &ArgMatches) -> Result<SessionConfig> {
    let mut config = match args.get_one::<PathBuf>("config") {
        Some(path) => SessionConfig::load(path)?,
        None => SessionConfig::default(),
    };
    if let Some(dir) = args.get_one::<PathBuf>("store-dir") {
        config = config.with_storage_dir(dir);
    }
    Ok(config)
}

fn open_store(config: &SessionConfig) -> Arc<dyn BlobStore> {
    match &config.storage_dir {
        Some(dir) => {
            let mut store = FileStore::new(dir);
            if let Some(export) = &config.export_dir {
                store = store.with_export_dir(export);
            }
            Arc::new(store)
        }
        None => Arc::new(MemoryStore::new()),
    }
}

/// MIME type a browser would report for the file's extension
fn guess_mime(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("txt" | "text") => "text/plain",
        Some("md" | "markdown") => "text/markdown",
        Some("html" | "htm") => "text/html",
        Some("docx") => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        Some("pdf") => "application/pdf",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_is_well_formed() {
        cli().debug_assert();
    }

    #[test]
    fn mime_from_extension() {
        assert_eq!(guess_mime(Path::new("a.TXT")), "text/plain");
        assert_eq!(guess_mime(Path::new("notes.md")), "text/markdown");
        assert_eq!(guess_mime(Path::new("page.htm")), "text/html");
        assert_eq!(guess_mime(Path::new("scan.pdf")), "application/pdf");
        assert_eq!(guess_mime(Path::new("README")), "application/octet-stream");
    }

    #[test]
    fn store_dir_overrides_config() {
        let matches = cli()
            .try_get_matches_from(["fragdoc", "restore", "--store-dir", "/tmp/slots"])
            .unwrap();
        let (_, args) = matches.subcommand().unwrap();
        let config = session_config(args).unwrap();
        assert_eq!(config.storage_dir, Some(PathBuf::from("/tmp/slots")));
        assert_eq!(config.slot_name, "editor-content.b64");
    }

    #[test]
    fn compose_collects_inserts() {
        let matches = cli()
            .try_get_matches_from([
                "fragdoc", "compose", "-f", "f.json", "--insert", "A-1", "--insert", "B-2",
            ])
            .unwrap();
        let (_, args) = matches.subcommand().unwrap();
        let ids: Vec<&String> = args.get_many::<String>("insert").unwrap().collect();
        assert_eq!(ids, ["A-1", "B-2"]);
    }

    fn compose_args(extra: &[&str]) -> ArgMatches {
        let argv: Vec<&str> = ["fragdoc", "compose"]
            .into_iter()
            .chain(extra.iter().copied())
            .collect();
        let matches = cli().try_get_matches_from(argv).unwrap();
        matches.subcommand_matches("compose").unwrap().clone()
    }

    fn write_fragments(dir: &Path) -> PathBuf {
        let path = dir.join("fragments.json");
        std::fs::write(&path, r#"{"A": [{"id": 1, "content": "x"}]}"#).unwrap();
        path
    }

    #[tokio::test]
    async fn compose_without_actions_succeeds() {
        let dir = tempfile::tempdir().unwrap();
        let fragments = write_fragments(dir.path());
        let args = compose_args(&["-f", fragments.to_str().unwrap()]);

        assert!(compose(&args).await.is_ok());
    }

    #[tokio::test]
    async fn compose_insert_saves_to_store_dir() {
        let dir = tempfile::tempdir().unwrap();
        let fragments = write_fragments(dir.path());
        let slots = dir.path().join("slots");
        let args = compose_args(&[
            "-f",
            fragments.to_str().unwrap(),
            "--insert",
            "A-1",
            "--store-dir",
            slots.to_str().unwrap(),
        ]);

        compose(&args).await.unwrap();

        let config = SessionConfig::default().with_storage_dir(&slots);
        let token = open_store(&config).load(&config.slot_name).await.unwrap();
        assert_eq!(token.decode(), "[x]");
    }

    #[tokio::test]
    async fn compose_unknown_insert_is_not_a_failure() {
        let dir = tempfile::tempdir().unwrap();
        let fragments = write_fragments(dir.path());
        let args = compose_args(&["-f", fragments.to_str().unwrap(), "--insert", "Z-9"]);

        assert!(compose(&args).await.is_ok());
    }

    #[tokio::test]
    async fn restore_reads_file_store() {
        let dir = tempfile::tempdir().unwrap();
        let config = SessionConfig::default().with_storage_dir(dir.path());
        open_store(&config)
            .save(&config.slot_name, &Token::encode("saved text"))
            .await
            .unwrap();

        let mut session = Session::new(
            config.clone(),
            Arc::new(FragmentCatalog::default()),
            open_store(&config),
        );
        let outcome = session.restore_saved().await.unwrap();
        assert_eq!(outcome, RestoreOutcome::Restored { chars: 10 });
        assert_eq!(session.content(), "saved text");
    }
}

use anyhow::Context;
use clap::Parser;
use merch_reorder::core::ConfigProvider;
use merch_reorder::domain::model::NotificationKind;
use merch_reorder::utils::{logger, validation::Validate};
use merch_reorder::{
    CliConfig, CommitOutcome, FileSessionStore, RecordingNotifier, ReorderableList,
    RestCollection, SessionContext, TomlConfig,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    if cli.json_logs {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting merch-reorder");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let config = TomlConfig::from_file(&cli.config)
        .with_context(|| format!("reading {}", cli.config.display()))?;
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    // 明確的 session 物件，不從全域狀態讀取 token
    let mut session = config
        .token_file()
        .map(|path| SessionContext::new(FileSessionStore::new(path)));
    if let Some(session) = session.as_mut() {
        session.restore().await?;
        if cli.sign_out {
            session.sign_out().await?;
            tracing::info!("Signed out");
        }
        if let Some(token) = &cli.token {
            session.sign_in(token.clone()).await?;
            tracing::info!("Signed in, token stored");
        }
    } else if cli.token.is_some() || cli.sign_out {
        anyhow::bail!("[session] token_file must be configured to sign in or out");
    }

    let mut backend = RestCollection::new(&config)?;
    if let Some(session) = &session {
        backend = backend.with_session(session);
    }

    let notifier = RecordingNotifier::new();
    let mut list = ReorderableList::new(notifier.clone());
    list.reload(&backend)
        .await
        .with_context(|| format!("fetching {}", config.collection_endpoint()))?;
    tracing::info!("📋 Loaded {} {}", list.entities().len(), config.name());

    for mv in &cli.moves {
        list.move_item(mv.from, mv.to)
            .with_context(|| format!("applying move {}:{}", mv.from, mv.to))?;
    }

    for (position, entity) in list.position_badges() {
        println!(
            "{:>3}. {} {}",
            position,
            entity.id,
            entity.title().unwrap_or("")
        );
    }
    println!("State: {:?}", list.state());

    if cli.commit {
        let result = list.commit(&backend).await;

        for notification in notifier.drain() {
            match notification.kind {
                NotificationKind::Success => println!("✅ {}", notification.message),
                NotificationKind::Failure => eprintln!("❌ {}", notification.message),
            }
        }

        match result {
            Ok(CommitOutcome::Committed { items }) => {
                tracing::info!("Committed {} ranks", items);
            }
            Ok(CommitOutcome::NothingToCommit) => println!("Order unchanged, nothing to save"),
            Err(e) => {
                tracing::error!("❌ Commit failed: {}", e);
                let exit_code = if e.is_recoverable() { 2 } else { 1 };
                std::process::exit(exit_code);
            }
        }
    } else if list.can_save() {
        println!("Unsaved changes; re-run with --commit to save");
    }

    Ok(())
}

use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};

use bluekit::config::ClientConfig;
use bluekit::model::{CatalogId, CollectionId, ProjectId, VariationId, version_label};
use bluekit::organize::CatalogFilter;
use bluekit::remote::{CollectionPatch, RemoteClient};
use bluekit::session::{BrowseSession, PublishItem, PublishOutcome, PullOutcome};

#[derive(Parser)]
#[command(name = "bluekit")]
#[command(about = "Library catalog mirror client", long_about = None)]
struct Cli {
    /// Path to the client config (defaults to ~/.bluekit/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Store the remote URL and access token
    Login {
        #[arg(long)]
        url: String,
        #[arg(long)]
        token: String,
    },

    /// List workspaces
    Workspaces {
        /// Emit JSON
        #[arg(long)]
        json: bool,
    },

    /// List catalogs in a workspace, grouped by collection
    Catalogs {
        #[arg(long)]
        workspace: String,
        /// Case-insensitive name filter for the ungrouped pool
        #[arg(long)]
        filter: Option<String>,
        /// Tag filter for the ungrouped pool (repeatable)
        #[arg(long)]
        tag: Vec<String>,
        /// Emit JSON
        #[arg(long)]
        json: bool,
    },

    /// Refresh the workspace catalog from its backing repository
    Sync {
        #[arg(long)]
        workspace: String,
    },

    /// List collections
    Collections {
        #[arg(long)]
        workspace: String,
        /// Emit JSON
        #[arg(long)]
        json: bool,
    },

    /// Manage a collection
    Collection {
        #[command(subcommand)]
        command: CollectionCommands,
    },

    /// Delete catalogs (and all their variations)
    DeleteCatalogs {
        #[arg(long)]
        workspace: String,
        catalog_ids: Vec<String>,
    },

    /// List indexed resources of a project
    Resources {
        #[arg(long)]
        project: String,
        /// Re-scan the project before listing
        #[arg(long)]
        scan: Option<String>,
        /// Emit JSON
        #[arg(long)]
        json: bool,
    },

    /// Publish local files into the catalog. Items are NAME or NAME:RELPATH.
    Publish {
        #[arg(long)]
        workspace: String,
        #[arg(long)]
        project: String,
        #[arg(long)]
        path: String,
        /// Version tag applied to every published item
        #[arg(long)]
        version_tag: Option<String>,
        items: Vec<String>,
    },

    /// Pull variations into a project
    Pull {
        #[arg(long)]
        workspace: String,
        #[arg(long)]
        project: String,
        #[arg(long)]
        path: String,
        /// Overwrite existing files
        #[arg(long)]
        overwrite: bool,
        variation_ids: Vec<String>,
    },
}

#[derive(Subcommand)]
enum CollectionCommands {
    Create {
        #[arg(long)]
        workspace: String,
        name: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        tag: Vec<String>,
    },
    Update {
        #[arg(long)]
        workspace: String,
        id: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        tag: Vec<String>,
        #[arg(long)]
        color: Option<String>,
    },
    Delete {
        #[arg(long)]
        workspace: String,
        id: String,
    },
    /// Add catalogs to a collection
    Add {
        #[arg(long)]
        workspace: String,
        #[arg(long)]
        collection: String,
        catalog_ids: Vec<String>,
    },
    /// Remove catalogs from a collection
    Remove {
        #[arg(long)]
        workspace: String,
        #[arg(long)]
        collection: String,
        catalog_ids: Vec<String>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run() {
        eprintln!("{:#}", err);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let config_path = match &cli.config {
        Some(path) => path.clone(),
        None => ClientConfig::default_path()?,
    };

    match cli.command {
        Commands::Login { url, token } => {
            let cfg = ClientConfig::new(url, token);
            cfg.save(&config_path)?;
            println!("Logged in to {}", cfg.base_url);
            return Ok(());
        }
        command => {
            let cfg = ClientConfig::load(&config_path)?;
            let client = RemoteClient::new(cfg.base_url, cfg.token)?;
            let mut session = BrowseSession::new(Box::new(client));
            dispatch(&mut session, command)?;
        }
    }

    Ok(())
}

fn dispatch(session: &mut BrowseSession, command: Commands) -> Result<()> {
    match command {
        Commands::Login { .. } => unreachable!("handled before dispatch"),

        Commands::Workspaces { json } => {
            let workspaces = session.list_workspaces()?;
            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&workspaces).context("serialize workspaces")?
                );
            } else {
                for ws in workspaces {
                    let pin = if ws.pinned { "*" } else { " " };
                    println!("{} {} {}/{} ({})", pin, ws.name, ws.owner, ws.repo, ws.id.as_str());
                }
            }
        }

        Commands::Catalogs {
            workspace,
            filter,
            tag,
            json,
        } => {
            open_workspace(session, &workspace)?;
            session.set_filter(CatalogFilter {
                name_query: filter.unwrap_or_default(),
                tags: tag.into_iter().collect(),
            });
            let views = session.views();
            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&serde_json::json!({
                        "ungrouped": views.ungrouped,
                        "grouped": views
                            .grouped
                            .iter()
                            .map(|(id, entries)| (id.as_str().to_string(), entries))
                            .collect::<std::collections::BTreeMap<_, _>>(),
                    }))
                    .context("serialize catalog views")?
                );
            } else {
                for collection in session.collections() {
                    println!("[{}]", collection.name);
                    if let Some(entries) = views.grouped.get(&collection.id) {
                        for entry in entries {
                            print_catalog(entry);
                        }
                    }
                }
                println!("[ungrouped]");
                for entry in &views.ungrouped {
                    print_catalog(entry);
                }
            }
        }

        Commands::Sync { workspace } => {
            open_workspace(session, &workspace)?;
            let report = session.sync_workspace_catalog()?;
            println!(
                "Synced: catalogs +{} ~{}, variations +{} ~{}",
                report.catalogs_created,
                report.catalogs_updated,
                report.variations_created,
                report.variations_updated
            );
        }

        Commands::Collections { workspace, json } => {
            open_workspace(session, &workspace)?;
            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(session.collections())
                        .context("serialize collections")?
                );
            } else {
                for collection in session.collections() {
                    let count = session
                        .collection_members()
                        .get(&collection.id)
                        .map_or(0, |ids| ids.len());
                    println!(
                        "{} {} ({} catalogs)",
                        collection.id.as_str(),
                        collection.name,
                        count
                    );
                }
            }
        }

        Commands::Collection { command } => dispatch_collection(session, command)?,

        Commands::DeleteCatalogs {
            workspace,
            catalog_ids,
        } => {
            open_workspace(session, &workspace)?;
            let ids: Vec<CatalogId> = catalog_ids.into_iter().map(CatalogId).collect();
            let deleted = session.delete_catalogs(&ids)?;
            println!("Deleted {} catalogs", deleted);
        }

        Commands::Resources { project, scan, json } => {
            let resources = session.project_resources(&ProjectId(project), scan.as_deref())?;
            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&resources).context("serialize resources")?
                );
            } else {
                for resource in resources {
                    println!("{} {}", resource.relative_path, resource.id.as_str());
                }
            }
        }

        Commands::Publish {
            workspace,
            project,
            path,
            version_tag,
            items,
        } => {
            open_workspace(session, &workspace)?;
            let items: Vec<PublishItem> = items
                .iter()
                .map(|raw| {
                    let (name, item_path) = match raw.split_once(':') {
                        Some((name, p)) => (name.to_string(), Some(p.to_string())),
                        None => (raw.clone(), None),
                    };
                    PublishItem {
                        name,
                        path: item_path,
                        version_tag: version_tag.clone(),
                    }
                })
                .collect();
            let summary = session.publish_items(&ProjectId(project), &path, &items)?;
            for record in &summary.records {
                match &record.outcome {
                    PublishOutcome::Published(receipt) => {
                        println!("published {} -> {}", record.name, receipt.variation_id.as_str());
                    }
                    PublishOutcome::Unchanged => println!("unchanged {}", record.name),
                    PublishOutcome::NotFound => println!(
                        "not found {} (re-scan the project with `bluekit resources --scan`)",
                        record.name
                    ),
                    PublishOutcome::Failed(msg) => println!("failed {}: {}", record.name, msg),
                }
            }
            println!(
                "{} published, {} unchanged, {} not found, {} failed",
                summary.published(),
                summary.unchanged(),
                summary.missing(),
                summary.failed()
            );
        }

        Commands::Pull {
            workspace,
            project,
            path,
            overwrite,
            variation_ids,
        } => {
            open_workspace(session, &workspace)?;
            let ids: Vec<VariationId> = variation_ids.into_iter().map(VariationId).collect();
            let summary =
                session.pull_variations(&ids, &ProjectId(project), &path, overwrite)?;
            for record in &summary.records {
                match &record.outcome {
                    PullOutcome::Pulled(receipt) => {
                        println!("pulled {} -> {}", record.variation_id.as_str(), receipt.path);
                    }
                    PullOutcome::Failed(msg) => {
                        println!("failed {}: {}", record.variation_id.as_str(), msg);
                    }
                }
            }
            println!("{} pulled, {} failed", summary.pulled(), summary.failed());
        }
    }

    Ok(())
}

fn dispatch_collection(session: &mut BrowseSession, command: CollectionCommands) -> Result<()> {
    match command {
        CollectionCommands::Create {
            workspace,
            name,
            description,
            tag,
        } => {
            open_workspace(session, &workspace)?;
            let id = session.create_collection(&name, description, tag)?;
            println!("Created collection {}", id.as_str());
        }
        CollectionCommands::Update {
            workspace,
            id,
            name,
            description,
            tag,
            color,
        } => {
            open_workspace(session, &workspace)?;
            session.update_collection(
                &CollectionId(id.clone()),
                CollectionPatch {
                    name,
                    description,
                    tags: tag,
                    color,
                },
            )?;
            println!("Updated collection {}", id);
        }
        CollectionCommands::Delete { workspace, id } => {
            open_workspace(session, &workspace)?;
            session.delete_collection(&CollectionId(id.clone()))?;
            println!("Deleted collection {}", id);
        }
        CollectionCommands::Add {
            workspace,
            collection,
            catalog_ids,
        } => {
            open_workspace(session, &workspace)?;
            let ids: Vec<CatalogId> = catalog_ids.into_iter().map(CatalogId).collect();
            session.move_catalogs_to_collection(&CollectionId(collection), &ids)?;
            println!("Added {} catalogs", ids.len());
        }
        CollectionCommands::Remove {
            workspace,
            collection,
            catalog_ids,
        } => {
            open_workspace(session, &workspace)?;
            let ids: Vec<CatalogId> = catalog_ids.into_iter().map(CatalogId).collect();
            session.remove_catalogs_from_collection(&CollectionId(collection), &ids)?;
            println!("Removed {} catalogs", ids.len());
        }
    }
    Ok(())
}

/// Resolve a workspace by id or display name and open it in the session.
fn open_workspace(session: &mut BrowseSession, reference: &str) -> Result<()> {
    let workspaces = session.list_workspaces()?;
    let workspace = workspaces
        .into_iter()
        .find(|ws| ws.id.as_str() == reference || ws.name == reference)
        .ok_or_else(|| anyhow!("workspace {} not found", reference))?;
    session.open_workspace(workspace)
}

fn print_catalog(entry: &bluekit::model::CatalogWithVariations) {
    let total = entry.variations.len();
    let head = entry
        .variations
        .first()
        .map(|v| {
            v.version_tag
                .clone()
                .unwrap_or_else(|| version_label(0, total))
        })
        .unwrap_or_else(|| "-".to_string());
    println!(
        "  {} {} [{}] {} variations (latest {})",
        entry.catalog.id.as_str(),
        entry.catalog.name,
        entry.catalog.artifact_type,
        total,
        head
    );
}

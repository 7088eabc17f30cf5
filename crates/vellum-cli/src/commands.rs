use std::io::Read;
use std::sync::Arc;

use colored::Colorize;
use vellum_mutate::MutationReport;
use vellum_server::{ServerConfig, VellumServer};
use vellum_store::MemoryStore;
use vellum_tree::{Node, NodeKind};

use crate::cli::*;
use crate::client::ApiClient;

pub async fn run_command(cli: Cli) -> anyhow::Result<()> {
    let format = cli.format.clone();
    let client = ApiClient::new(cli.server);
    match cli.command {
        Command::Serve(args) => cmd_serve(args).await,
        Command::Tree(args) => cmd_tree(&client, args, format).await,
        Command::Cat(args) => cmd_cat(&client, args, format).await,
        Command::Doc(args) => cmd_doc(&client, args, format).await,
        Command::Put(args) => cmd_put(&client, args).await,
        Command::Mv(args) => cmd_mv(&client, args).await,
        Command::Rm(args) => cmd_rm(&client, args).await,
    }
}

async fn cmd_serve(args: ServeArgs) -> anyhow::Result<()> {
    let mut config = match args.config {
        Some(path) => ServerConfig::load(path)?,
        None => ServerConfig::default(),
    };
    if let Some(bind) = args.bind {
        config.bind_addr = bind;
    }
    println!("vellum server on {}", config.bind_addr.to_string().bold());
    let store = Arc::new(MemoryStore::new());
    VellumServer::new(store, config).serve().await?;
    Ok(())
}

async fn cmd_tree(client: &ApiClient, args: TreeArgs, format: OutputFormat) -> anyhow::Result<()> {
    let tree = client.tree(args.path.as_deref()).await?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&tree)?),
        OutputFormat::Text => {
            println!("{}", tree.path.to_string().bold());
            print_children(&tree, 1);
        }
    }
    Ok(())
}

fn print_children(node: &Node, depth: usize) {
    for child in node.children() {
        let indent = "  ".repeat(depth);
        match &child.kind {
            NodeKind::Directory { .. } => {
                println!("{indent}{}/", child.name.blue().bold());
                print_children(child, depth + 1);
            }
            NodeKind::File { .. } => println!("{indent}{}", child.name),
            NodeKind::Opaque => println!("{indent}{}", child.name.dimmed()),
        }
    }
}

async fn cmd_cat(client: &ApiClient, args: PathArg, format: OutputFormat) -> anyhow::Result<()> {
    let file = client.file(&args.path).await?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&file)?),
        OutputFormat::Text => println!("{}", file.content),
    }
    Ok(())
}

async fn cmd_doc(client: &ApiClient, args: PathArg, format: OutputFormat) -> anyhow::Result<()> {
    let doc = client.document(&args.path).await?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&doc)?),
        OutputFormat::Text => {
            for (key, value) in doc.frontmatter.iter() {
                let rendered = match value {
                    vellum_frontmatter::FieldValue::Scalar(s) => s.clone(),
                    vellum_frontmatter::FieldValue::List(items) => {
                        format!("[{}]", items.join(", "))
                    }
                };
                println!("{}: {rendered}", key.cyan());
            }
            if !doc.frontmatter.is_empty() {
                println!();
            }
            println!("{}", doc.body);
        }
    }
    Ok(())
}

async fn cmd_put(client: &ApiClient, args: PutArgs) -> anyhow::Result<()> {
    let content = if args.folder {
        None
    } else {
        Some(match &args.file {
            Some(local) => std::fs::read_to_string(local)?,
            None => {
                let mut buffer = String::new();
                std::io::stdin().read_to_string(&mut buffer)?;
                buffer
            }
        })
    };
    let response = client.create(&args.path, content, args.folder).await?;
    println!(
        "{} {} ({})",
        "✓".green().bold(),
        args.path,
        response.hash.short_hex().yellow()
    );
    Ok(())
}

async fn cmd_mv(client: &ApiClient, args: MvArgs) -> anyhow::Result<()> {
    let report = client.rename(&args.old_path, &args.new_name).await?;
    print_report("moved", &report);
    Ok(())
}

async fn cmd_rm(client: &ApiClient, args: PathArg) -> anyhow::Result<()> {
    let report = client.remove(&args.path).await?;
    print_report("deleted", &report);
    Ok(())
}

fn print_report(verb: &str, report: &MutationReport) {
    println!(
        "{} {} file{} {verb}",
        "✓".green().bold(),
        report.succeeded,
        if report.succeeded == 1 { "" } else { "s" }
    );
}

mod args;
mod command;
mod render;

use anyhow::Context;
use args::Args;
use clap::Parser;
use command::{Command, HELP};
use render::show;
use roster::{Client, Controller, Exchange, GraphQLSource, Outcome, RecordId, View};
use tokio::{
    io::{self, AsyncBufReadExt, AsyncWriteExt, BufReader, Lines, Stdin},
    task::JoinHandle
};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

type Input = Lines<BufReader<Stdin>>;
type App<M> = Controller<GraphQLSource<M>>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(args.log_filter()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    info!(endpoint = %args.endpoint, page = args.page, limit = args.limit, "starting");

    let client = Client::builder(args.endpoint.clone())
        .with_default_exchanges()
        .build();
    let controller = Controller::new(GraphQLSource::new(client).with_config(args.source_config()));

    let loading = spawn_load(&controller);
    display(&controller.snapshot());
    loading.await.context("initial load panicked")?;

    let mut input = BufReader::new(io::stdin()).lines();
    let mut tasks = Vec::new();
    println!("{}", HELP);

    loop {
        let line = match ask(&mut input, "> ").await? {
            Some(line) => line,
            None => break
        };
        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(e) => {
                println!("{}", e);
                continue;
            }
        };
        debug!(?command, "parsed input");

        match command {
            Command::Update(id) => {
                if !known(&controller, &id) {
                    continue;
                }
                let name = ask(&mut input, "New name (empty to cancel): ").await?;
                tasks.push(spawn_update(&controller, id, name));
            }
            Command::Delete(id) => {
                if !known(&controller, &id) {
                    continue;
                }
                let answer = ask(&mut input, "Are you sure you want to delete this user? [y/N] ").await?;
                let confirmed = matches!(answer.as_deref().map(str::trim), Some("y" | "Y" | "yes"));
                tasks.push(spawn_delete(&controller, id, confirmed));
            }
            Command::Reload => tasks.push(spawn_load(&controller)),
            Command::List => display(&controller.snapshot()),
            Command::Help => println!("{}", HELP),
            Command::Quit => break
        }
        tasks.retain(|task: &JoinHandle<()>| !task.is_finished());
    }

    controller.teardown();
    for task in tasks {
        task.abort();
    }
    info!("bye");
    Ok(())
}

/// Print `prompt` and read one line. `None` means stdin is closed.
async fn ask(input: &mut Input, prompt: &str) -> anyhow::Result<Option<String>> {
    let mut stdout = io::stdout();
    stdout.write_all(prompt.as_bytes()).await?;
    stdout.flush().await?;
    Ok(input.next_line().await.context("failed to read stdin")?)
}

fn display(view: &View) {
    if let Err(e) = show(std::io::stdout().lock(), view) {
        warn!(error = %e, "could not write to stdout");
    }
}

fn known<M: Exchange>(controller: &App<M>, id: &RecordId) -> bool {
    let present = controller.snapshot().records.iter().any(|record| &record.id == id);
    if !present {
        println!("no user with id {}", id);
    }
    present
}

fn spawn_load<M: Exchange>(controller: &App<M>) -> JoinHandle<()> {
    let controller = controller.clone();
    tokio::spawn(async move {
        // Failures are part of the view.
        let _ = controller.load().await;
        display(&controller.snapshot());
    })
}

fn spawn_update<M: Exchange>(controller: &App<M>, id: RecordId, name: Option<String>) -> JoinHandle<()> {
    let controller = controller.clone();
    tokio::spawn(async move {
        let prompt = move || name.clone();
        report(&controller, controller.request_update(&id, prompt).await);
    })
}

fn spawn_delete<M: Exchange>(controller: &App<M>, id: RecordId, confirmed: bool) -> JoinHandle<()> {
    let controller = controller.clone();
    tokio::spawn(async move {
        report(&controller, controller.request_delete(&id, move || confirmed).await);
    })
}

fn report<M: Exchange, E>(controller: &App<M>, result: Result<Outcome, E>) {
    match result {
        Ok(Outcome::Skipped) => println!("cancelled"),
        Ok(Outcome::Discarded) => debug!("result arrived for a record that is gone"),
        Ok(Outcome::Applied) | Err(_) => display(&controller.snapshot())
    }
}

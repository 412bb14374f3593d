use std::io;
use std::str::FromStr;
use std::time::Duration;

use async_stream::stream;
use eyre::{Result, WrapErr};
use futures::future::{self, FutureExt, LocalBoxFuture};
use futures::{pin_mut, Stream, StreamExt};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

use smart_aircon_assistant::interpreter::{CommandInterpreter, Interpretation, LanguageModel};
use smart_aircon_device::controller::Controller;
use smart_aircon_device::energy::{self, DAILY_USAGE};
use smart_aircon_device::remote::RemoteAction;
use smart_aircon_device::state::DeviceState;

const HELP: &str = "buttons: power up down mode fan vswing hswing eco sleep turbo\n\
                    other: status energy pause resume help quit\n\
                    anything else is sent to the assistant";

#[derive(Debug, Clone, PartialEq)]
enum SessionCommand {
    Press(RemoteAction),
    Status,
    Energy,
    Pause,
    Resume,
    Help,
    Quit,
    Ask(String),
    Blank,
}

impl FromStr for SessionCommand {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let line = s.trim();
        Ok(match line.to_lowercase().as_str() {
            "" => SessionCommand::Blank,
            "status" => SessionCommand::Status,
            "energy" => SessionCommand::Energy,
            "pause" => SessionCommand::Pause,
            "resume" => SessionCommand::Resume,
            "help" | "?" => SessionCommand::Help,
            "quit" | "exit" => SessionCommand::Quit,
            _ => match line.parse::<RemoteAction>() {
                Ok(action) => SessionCommand::Press(action),
                Err(_) => SessionCommand::Ask(line.to_string()),
            },
        })
    }
}

fn input_lines() -> impl Stream<Item = io::Result<String>> {
    stream! {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => yield Ok(line),
                Ok(None) => break,
                Err(e) => {
                    yield Err(e);
                    break;
                }
            }
        }
    }
}

async fn log_changes(receiver: watch::Receiver<DeviceState>) {
    let changes = WatchStream::new(receiver);
    pin_mut!(changes);
    while let Some(state) = changes.next().await {
        debug!("state: {}", state);
    }
    trace!("state watcher finished");
}

fn print_energy() {
    for sample in DAILY_USAGE.iter() {
        println!("  {}", sample);
    }
    println!("  total {:.1} kWh", energy::total_usage());
}

/// Interactive session on stdin. The simulation keeps ticking and buttons
/// stay live while the assistant is thinking; one assistant request is in
/// flight at a time.
pub async fn run<M: LanguageModel>(
    initial: DeviceState,
    tick_rate: Duration,
    interpreter: CommandInterpreter<M>,
) -> Result<()> {
    let controller = Controller::start(initial, tick_rate);
    tokio::spawn(log_changes(controller.subscribe()));

    if !interpreter.is_configured() {
        info!("assistant is not configured, free-text commands will only get a notice");
    }
    println!("{}", HELP);
    println!("{}", controller.current());

    drive(input_lines(), &controller, &interpreter).await?;

    controller
        .shutdown()
        .await
        .wrap_err("Could not stop state controller")
}

type PendingRequest<'a> = LocalBoxFuture<'a, Option<Interpretation>>;

async fn settle(pending: &mut Option<PendingRequest<'_>>) -> Option<Interpretation> {
    match pending.as_mut() {
        Some(request) => request.await,
        None => future::pending().await,
    }
}

async fn deliver(controller: &Controller, interpretation: Option<Interpretation>) -> Result<()> {
    if let Some(interpretation) = interpretation {
        // applied as is, even if the state moved on while the request was out
        if let Some(patch) = interpretation.settings {
            info!("assistant changed {}", patch);
            controller.apply(patch)?;
        }
        println!("🤖 {}", interpretation.reply);
        println!("{}", controller.snapshot().await?);
    }
    Ok(())
}

/// Feeds `lines` to `controller` until quit or end of input. At end of input
/// an outstanding assistant request is still waited for and applied.
async fn drive<S, M>(
    lines: S,
    controller: &Controller,
    interpreter: &CommandInterpreter<M>,
) -> Result<()>
where
    S: Stream<Item = io::Result<String>>,
    M: LanguageModel,
{
    pin_mut!(lines);
    let mut pending: Option<PendingRequest<'_>> = None;

    loop {
        tokio::select! {
            interpretation = settle(&mut pending), if pending.is_some() => {
                pending = None;
                deliver(controller, interpretation).await?;
            }
            line = lines.next() => {
                let line = match line {
                    Some(line) => line.wrap_err("Could not read from stdin")?,
                    None => break,
                };
                let command = line.parse::<SessionCommand>().unwrap_or(SessionCommand::Blank);
                trace!("session command: {:?}", command);

                match command {
                    SessionCommand::Blank => {}
                    SessionCommand::Quit => {
                        if pending.is_some() {
                            debug!("dropping outstanding assistant request");
                        }
                        return Ok(());
                    }
                    SessionCommand::Help => println!("{}", HELP),
                    SessionCommand::Energy => print_energy(),
                    SessionCommand::Status => println!("{}", controller.snapshot().await?),
                    SessionCommand::Pause => controller.pause()?,
                    SessionCommand::Resume => controller.resume()?,
                    SessionCommand::Press(action) => {
                        controller.press(action)?;
                        println!("{}", controller.snapshot().await?);
                    }
                    SessionCommand::Ask(_) if pending.is_some() => {
                        println!("still thinking about the last command, try again in a moment");
                    }
                    SessionCommand::Ask(text) => {
                        let snapshot = controller.snapshot().await?;
                        println!("thinking...");
                        pending = Some(
                            async move { interpreter.interpret(&text, &snapshot).await }
                                .boxed_local(),
                        );
                    }
                }
            }
        }
    }

    if let Some(request) = pending.take() {
        deliver(controller, request.await).await?;
    }
    Ok(())
}

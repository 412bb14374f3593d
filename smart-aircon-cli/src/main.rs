mod conversions;
mod session;

extern crate pretty_env_logger;
#[macro_use]
extern crate log;

use std::time::Duration;

use color_eyre::eyre::{bail, Result, WrapErr};
use structopt::StructOpt;

use smart_aircon_assistant::config::AssistantConfig;
use smart_aircon_assistant::interpreter::CommandInterpreter;
use smart_aircon_device::climate;
use smart_aircon_device::state::DeviceState;

use crate::conversions::InitialState;

#[derive(StructOpt, Debug)]
#[structopt(
    name = "smart-aircon",
    about = "Simulated smart air conditioner with a natural-language remote"
)]
enum Opt {
    /// Run the room temperature model for a number of ticks without waiting
    Simulate {
        /// Number of ticks
        #[structopt(short = "n", long, default_value = "10")]
        ticks: usize,

        #[structopt(flatten)]
        initial_state: InitialState,
    },
    /// Interpret one command against the initial state
    Ask {
        /// Free-text command, e.g. "it's too hot in here"
        #[structopt(required = true)]
        command: Vec<String>,

        #[structopt(flatten)]
        initial_state: InitialState,
    },
    /// Interactive remote on stdin with the simulation running in the background
    Session {
        /// Milliseconds between simulation ticks, the simulator's own rate if omitted
        #[structopt(long)]
        tick_ms: Option<u64>,

        #[structopt(flatten)]
        initial_state: InitialState,
    },
}

fn assistant() -> Result<CommandInterpreter<smart_aircon_assistant::gemini::GeminiClient>> {
    CommandInterpreter::from_config(&AssistantConfig::from_env())
        .wrap_err("Could not set up the assistant")
}

#[tokio::main]
async fn main() -> Result<()> {
    pretty_env_logger::init();
    color_eyre::install()?;

    let opts = Opt::from_args();

    debug!("opts: {:?}", opts);

    match opts {
        Opt::Simulate {
            ticks,
            initial_state,
        } => {
            let mut state = DeviceState::from(initial_state);
            println!("start: {}", state);
            for tick in 1..=ticks {
                climate::tick(&mut state);
                println!("tick {}: room {:.1}°C", tick, state.room_temp);
            }
        }
        Opt::Ask {
            command,
            initial_state,
        } => {
            let interpreter = assistant()?;
            let mut state = DeviceState::from(initial_state);
            match interpreter.interpret(&command.join(" "), &state).await {
                Some(interpretation) => {
                    if let Some(patch) = &interpretation.settings {
                        println!("applying {}", patch);
                        state.apply(patch);
                    }
                    println!("🤖 {}", interpretation.reply);
                    println!("{}", state);
                }
                None => println!("Nothing to interpret"),
            }
        }
        Opt::Session {
            tick_ms,
            initial_state,
        } => {
            let tick_rate = tick_ms.map_or(climate::TICK_RATE, Duration::from_millis);
            if tick_rate.is_zero() {
                bail!("--tick-ms must be greater than zero");
            }
            let interpreter = assistant()?;
            session::run(DeviceState::from(initial_state), tick_rate, interpreter).await?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_tick_rate_is_optional() {
        match Opt::from_iter_safe(&["smart-aircon", "session"]).unwrap() {
            Opt::Session { tick_ms, .. } => assert_eq!(tick_ms, None),
            other => panic!("unexpected {:?}", other),
        }
        match Opt::from_iter_safe(&["smart-aircon", "session", "--tick-ms", "250"]).unwrap() {
            Opt::Session { tick_ms, .. } => assert_eq!(tick_ms, Some(250)),
            other => panic!("unexpected {:?}", other),
        }
    }
}

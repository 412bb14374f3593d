use thiserror::Error;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::{self, Duration, Instant, MissedTickBehavior};

use crate::climate;
use crate::remote::RemoteAction;
use crate::state::patch::StatePatch;
use crate::state::DeviceState;

#[derive(Debug)]
enum ControllerMessage {
    Apply(StatePatch),
    Press(RemoteAction),
    Snapshot(oneshot::Sender<DeviceState>),
    Pause,
    Resume,
    Stop,
}

#[derive(Error, Clone, Debug)]
pub enum ControllerError {
    #[error("Could not communicate with state controller task")]
    Send,
    #[error("State controller task stopped before replying")]
    Reply,
    #[error("State controller task panicked")]
    Join,
}

pub type Result<T> = std::result::Result<T, ControllerError>;

/// Owns the [`DeviceState`] on a single task. Patches, button presses and
/// simulator ticks are all applied there, one at a time, in arrival order.
/// A patch computed from an older snapshot still overwrites newer values.
#[derive(Debug)]
pub struct Controller {
    state_receiver: watch::Receiver<DeviceState>,
    message_sender: mpsc::UnboundedSender<ControllerMessage>,
    handle: JoinHandle<()>,
}

impl Controller {
    /// Spawns the controller task. Must be called from within a tokio runtime.
    pub fn start(initial: DeviceState, tick_rate: Duration) -> Controller {
        let (message_sender, message_receiver) = mpsc::unbounded_channel();
        let (state_sender, state_receiver) = watch::channel(initial.clone());
        let handle = tokio::spawn(Self::run(
            initial,
            tick_rate,
            state_sender,
            message_receiver,
        ));

        Controller {
            state_receiver,
            message_sender,
            handle,
        }
    }

    async fn run(
        mut state: DeviceState,
        tick_rate: Duration,
        state_sender: watch::Sender<DeviceState>,
        mut message_receiver: mpsc::UnboundedReceiver<ControllerMessage>,
    ) {
        info!("starting state controller, tick rate {:?}", tick_rate);
        let mut ticker = time::interval_at(Instant::now() + tick_rate, tick_rate);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut running = true;

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if !running {
                        trace!("simulation paused, skipping tick");
                        continue;
                    }
                    climate::tick(&mut state);
                }
                message = message_receiver.recv() => match message {
                    None => {
                        info!("state controller message sender closed before stop signal");
                        break;
                    }
                    Some(ControllerMessage::Stop) => {
                        info!("state controller received stop signal");
                        break;
                    }
                    Some(ControllerMessage::Apply(patch)) => {
                        debug!("applying patch {}", patch);
                        state.apply(&patch);
                    }
                    Some(ControllerMessage::Press(action)) => match action.patch(&state) {
                        Some(patch) => {
                            debug!("button {} pressed, applying {}", action, patch);
                            state.apply(&patch);
                        }
                        None => debug!("button {} ignored while powered off", action),
                    },
                    Some(ControllerMessage::Snapshot(reply)) => {
                        if reply.send(state.clone()).is_err() {
                            trace!("snapshot requester went away");
                        }
                    }
                    Some(ControllerMessage::Pause) => {
                        info!("state controller pausing simulation");
                        running = false;
                    }
                    Some(ControllerMessage::Resume) => {
                        info!("state controller resuming simulation");
                        running = true;
                    }
                }
            }

            state_sender.send_if_modified(|published| {
                if *published != state {
                    *published = state.clone();
                    true
                } else {
                    false
                }
            });
        }
        info!("state controller stopping");
    }

    fn send(&self, message: ControllerMessage) -> Result<()> {
        self.message_sender
            .send(message)
            .map_err(|_| ControllerError::Send)
    }

    /// Watch channel that sees every published state change.
    pub fn subscribe(&self) -> watch::Receiver<DeviceState> {
        self.state_receiver.clone()
    }

    /// Last published state, without waiting on queued messages.
    pub fn current(&self) -> DeviceState {
        self.state_receiver.borrow().clone()
    }

    /// State after every message queued before this call has been handled.
    pub async fn snapshot(&self) -> Result<DeviceState> {
        let (reply_sender, reply_receiver) = oneshot::channel();
        self.send(ControllerMessage::Snapshot(reply_sender))?;
        reply_receiver.await.map_err(|_| ControllerError::Reply)
    }

    pub fn apply(&self, patch: StatePatch) -> Result<()> {
        self.send(ControllerMessage::Apply(patch))
    }

    pub fn press(&self, action: RemoteAction) -> Result<()> {
        self.send(ControllerMessage::Press(action))
    }

    pub fn pause(&self) -> Result<()> {
        self.send(ControllerMessage::Pause)
    }

    pub fn resume(&self) -> Result<()> {
        self.send(ControllerMessage::Resume)
    }

    pub fn stop(&self) -> Result<()> {
        self.send(ControllerMessage::Stop)
    }

    /// Stops the task and waits for it to finish.
    pub async fn shutdown(self) -> Result<()> {
        // the task may already be gone, which is what we want anyway
        let _ = self.stop();
        self.handle.await.map_err(|_| ControllerError::Join)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::types::{ACMode, TargetTemperature};
    use pretty_assertions::assert_eq;

    const RATE: Duration = Duration::from_secs(2);

    #[tokio::test(start_paused = true)]
    async fn ticks_on_a_fixed_cadence() {
        let controller = Controller::start(DeviceState::default(), RATE);

        time::sleep(Duration::from_secs(1)).await;
        assert_eq!(controller.snapshot().await.unwrap().room_temp, 28.0);

        // ticks at 2s and 4s: 28.0 -> 28.2 -> 28.4
        time::sleep(Duration::from_secs(4)).await;
        assert_eq!(controller.snapshot().await.unwrap().room_temp, 28.4);

        controller.shutdown().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn patches_apply_in_order() {
        let controller = Controller::start(DeviceState::default(), RATE);

        controller
            .apply(StatePatch {
                power: Some(true),
                target_temp: Some(TargetTemperature::new(20.0)),
                ..StatePatch::default()
            })
            .unwrap();
        controller
            .apply(StatePatch {
                target_temp: Some(TargetTemperature::new(27.0)),
                ..StatePatch::default()
            })
            .unwrap();

        let state = controller.snapshot().await.unwrap();
        assert_eq!(
            state,
            DeviceState {
                power: true,
                target_temp: TargetTemperature::new(27.0),
                ..DeviceState::default()
            }
        );
        controller.shutdown().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn presses_use_current_state() {
        let controller = Controller::start(DeviceState::default(), RATE);

        controller.press(RemoteAction::CycleMode).unwrap();
        controller.press(RemoteAction::TogglePower).unwrap();
        controller.press(RemoteAction::CycleMode).unwrap();
        controller.press(RemoteAction::TempDown).unwrap();

        let state = controller.snapshot().await.unwrap();
        assert!(state.power);
        assert_eq!(state.mode, ACMode::Heat);
        assert_eq!(state.target_temp.celsius(), 24.0);
        controller.shutdown().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn cooling_converges_to_target() {
        let controller = Controller::start(DeviceState::default(), RATE);
        controller.press(RemoteAction::TogglePower).unwrap();

        // 28.0 down to 25 at 0.2 per tick takes 15 ticks
        time::sleep(RATE * 20).await;
        let state = controller.snapshot().await.unwrap();
        assert_eq!(state.room_temp, 25.0);
        controller.shutdown().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn pause_stops_the_simulation() {
        let controller = Controller::start(DeviceState::default(), RATE);
        controller.pause().unwrap();

        time::sleep(RATE * 5 + Duration::from_secs(1)).await;
        assert_eq!(controller.snapshot().await.unwrap().room_temp, 28.0);

        controller.resume().unwrap();
        time::sleep(RATE).await;
        assert_eq!(controller.snapshot().await.unwrap().room_temp, 28.2);
        controller.shutdown().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn subscribers_see_changes() {
        let controller = Controller::start(DeviceState::default(), RATE);
        let mut receiver = controller.subscribe();

        controller.press(RemoteAction::TogglePower).unwrap();
        receiver.changed().await.unwrap();
        assert!(receiver.borrow_and_update().power);
        assert!(controller.current().power);
        controller.shutdown().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn stopped_controller_rejects_messages() {
        let controller = Controller::start(DeviceState::default(), RATE);
        controller.stop().unwrap();
        time::sleep(Duration::from_millis(10)).await;

        assert!(matches!(
            controller.apply(StatePatch::default()),
            Err(ControllerError::Send)
        ));
        assert!(matches!(
            controller.snapshot().await,
            Err(ControllerError::Send)
        ));
    }
}

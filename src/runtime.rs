// 100 Hz poll loop around the 1 Hz control state machine
// Note: the state machine blocks this loop while it receives or runs a program,
// just like the button and demo checks on the rover itself.

use std::error::Error;

use tokio::time::{MissedTickBehavior, interval, sleep};
use tracing::{info, warn};

use crate::command::{CommandInput, CommandSource, ScriptSource, SerialCommandSource, ZenohCommandSource};
use crate::config::{
    Args, DEMO_START_DELAY, POLL_INTERVAL, TOPIC_CMD_DEMO, TOPIC_CMD_TEXT, TOPIC_RT_MOTORS,
    TOPIC_STATUS,
};
use crate::control::ControlStateMachine;
use crate::messages::RuntimeStatus;
use crate::motor::{MotorOutput, MotorSink, RovercBus, RovercOutput, SimulatedOutput, ZenohOutput};

/// Snapshot of what the status display shows
pub fn status_of<S: CommandSource, O: MotorOutput>(machine: &ControlStateMachine<S, O>) -> RuntimeStatus {
    RuntimeStatus {
        state: machine.state(),
        queued: machine.queue().iter().collect(),
        motors: machine.speeds(),
    }
}

/// Give the operator time to step back, then queue the demo path
async fn start_demo<S: CommandSource, O: MotorOutput>(machine: &mut ControlStateMachine<S, O>) {
    info!(".. DEMO .. starting in {}s", DEMO_START_DELAY.as_secs());
    sleep(DEMO_START_DELAY).await;
    machine.load_demo();
}

pub async fn run(args: Args) -> Result<(), Box<dyn Error + Send + Sync>> {
    info!("Opening Zenoh session...");
    let session = zenoh::open(zenoh::Config::default()).await?;

    let source = match (&args.script, &args.bt_port) {
        (Some(script), _) => {
            info!("Running preset script {:?}", script);
            CommandInput::Script(ScriptSource::new(script))
        }
        (None, Some(port)) => CommandInput::Serial(SerialCommandSource::open(port)?),
        (None, None) => {
            info!("Subscribed to: {}", TOPIC_CMD_TEXT);
            CommandInput::Zenoh(ZenohCommandSource::new(
                session.declare_subscriber(TOPIC_CMD_TEXT).await?,
            ))
        }
    };

    let output = if args.simulate {
        info!("Simulation mode: motor speeds are only logged");
        MotorSink::Simulated(SimulatedOutput::new())
    } else if let Some(port) = &args.motor_port {
        info!("Opening RoverC bridge on {}", port);
        MotorSink::Roverc(RovercOutput::new(RovercBus::open(port)?))
    } else {
        info!("Publishing motor speeds to: {}", TOPIC_RT_MOTORS);
        MotorSink::Zenoh(ZenohOutput::new(
            session.declare_publisher(TOPIC_RT_MOTORS).await?,
        ))
    };

    let demo_trigger = session.declare_subscriber(TOPIC_CMD_DEMO).await?;
    let pub_status = session.declare_publisher(TOPIC_STATUS).await?;

    let config = args.control_config();
    info!(
        "Runtime started: speed {}, {}ms dwell, {}ms receive timeout, {:?}",
        config.execution_speed,
        config.command_dwell.as_millis(),
        config.receive_timeout.as_millis(),
        config.drain
    );
    let mut machine = ControlStateMachine::new(source, output, config);

    if args.demo {
        start_demo(&mut machine).await;
    }

    let mut tick = interval(POLL_INTERVAL);
    tick.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut last_status: Option<RuntimeStatus> = None;

    // One listener for the whole run, so a ctrl-c during a long step is kept
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            _ = tick.tick() => {}
            _ = &mut ctrl_c => {
                info!("Shutting down");
                break;
            }
        }

        // 1. Demo trigger (any payload), drain so repeated presses count once
        let mut demo_requested = false;
        while let Ok(Some(_)) = demo_trigger.try_recv() {
            demo_requested = true;
        }
        if demo_requested {
            start_demo(&mut machine).await;
        }

        // 2. Advance the state machine once per second
        machine.poll().await;

        // 3. Publish status on change
        let status = status_of(&machine);
        if last_status.as_ref() != Some(&status) {
            match serde_json::to_string(&status) {
                Ok(json) => pub_status.put(json).await?,
                Err(e) => warn!("Failed to encode status: {}", e),
            }
            last_status = Some(status);
        }
    }

    machine.halt().await;
    Ok(())
}

//! End-to-end runs of the control state machine on paused tokio time.

mod common;

use std::time::Duration;

use common::RecordingOutput;
use roverc_runtime::command::ScriptSource;
use roverc_runtime::config::ControlConfig;
use roverc_runtime::control::{ControlState, ControlStateMachine};
use roverc_runtime::motor::{MotorSpeeds, wheel_targets};
use tokio::time::sleep;

type Machine = ControlStateMachine<ScriptSource, RecordingOutput>;

fn machine(script: &str) -> Machine {
    ControlStateMachine::new(
        ScriptSource::new(script),
        RecordingOutput::new(),
        ControlConfig::default(),
    )
}

/// Step until the machine is in `state` (bounded)
async fn step_until(m: &mut Machine, state: ControlState) {
    for _ in 0..10 {
        if m.state() == state {
            return;
        }
        m.step().await;
    }
    panic!("never reached {state}, stuck in {}", m.state());
}

#[tokio::test(start_paused = true)]
async fn scenario_a_program_ramps_through_every_heading() {
    let mut m = machine("0 90 180 270*");
    step_until(&mut m, ControlState::RunningProgram).await;
    assert_eq!(m.queue().iter().collect::<Vec<_>>(), vec![0, 90, 180, 270]);

    m.step().await;
    assert_eq!(m.state(), ControlState::Stopped);

    let frames = &m.drive().output().frames;
    assert_eq!(m.drive().output().max_step(), 5);
    assert!(frames.iter().all(|f| f.in_range()));

    // Each target is reached, in order, before the next heading starts
    let targets: Vec<MotorSpeeds> = [0.0, 90.0, 180.0, 270.0]
        .iter()
        .map(|&a| wheel_targets(a, 50))
        .collect();
    let mut positions = Vec::new();
    let mut from = 0;
    for target in &targets {
        let at = frames[from..]
            .iter()
            .position(|f| f == target)
            .map(|p| p + from)
            .expect("target reached");
        positions.push(at);
        from = at + 1;
    }
    assert!(positions.windows(2).all(|w| w[0] < w[1]));

    // Between reaching a target and leaving for the next, nothing else is written
    for (i, &at) in positions.iter().enumerate().skip(1) {
        let prev = positions[i - 1];
        let ramp = &frames[prev + 1..=at];
        assert_eq!(ramp.len(), MotorSpeeds::steps_to(&targets[i - 1], targets[i]));
    }

    assert_eq!(*frames.last().unwrap(), MotorSpeeds::zero());
}

#[tokio::test(start_paused = true)]
async fn scenario_b_terminated_stream_starts_program() {
    let mut m = machine("90 180 *");
    assert_eq!(m.step().await, ControlState::AwaitingCommands);
    assert_eq!(m.step().await, ControlState::ReceivingCommands);
    assert_eq!(m.step().await, ControlState::RunningProgram);
    assert_eq!(m.queue().iter().collect::<Vec<_>>(), vec![90, 180]);
}

#[tokio::test(start_paused = true)]
async fn scenario_c_silence_forces_program() {
    let mut m = machine("90 18");
    step_until(&mut m, ControlState::ReceivingCommands).await;
    assert_eq!(m.step().await, ControlState::ReceivingCommands);

    sleep(Duration::from_millis(5000)).await;
    assert_eq!(m.step().await, ControlState::ReceivingCommands);

    sleep(Duration::from_millis(1)).await;
    assert_eq!(m.step().await, ControlState::RunningProgram);
    // The unterminated "18" is discarded
    assert_eq!(m.queue().iter().collect::<Vec<_>>(), vec![90]);
}

#[tokio::test(start_paused = true)]
async fn scenario_c_silence_with_empty_queue() {
    let mut m = machine("\r\n");
    step_until(&mut m, ControlState::ReceivingCommands).await;
    m.step().await;
    sleep(Duration::from_millis(5001)).await;
    assert_eq!(m.step().await, ControlState::RunningProgram);
    assert!(m.queue().is_empty());
    assert_eq!(m.step().await, ControlState::Stopped);
    assert!(m.drive().output().frames.is_empty());
}

#[tokio::test(start_paused = true)]
async fn out_of_range_dropped_and_empty_tokens_read_as_zero() {
    let mut m = machine("400 -90 abc 360 1000*");
    step_until(&mut m, ControlState::RunningProgram).await;
    // "abc" has no digits and reads as 0
    assert_eq!(m.queue().iter().collect::<Vec<_>>(), vec![90, 0, 360]);
}

#[tokio::test(start_paused = true)]
async fn double_space_queues_forward_heading() {
    let mut m = machine(" 90  180*");
    step_until(&mut m, ControlState::RunningProgram).await;
    assert_eq!(m.queue().iter().collect::<Vec<_>>(), vec![0, 90, 0, 180]);
}

#[tokio::test(start_paused = true)]
async fn machine_cycles_back_for_the_next_program() {
    let mut m = machine("0*");
    step_until(&mut m, ControlState::RunningProgram).await;
    m.step().await;
    assert_eq!(m.state(), ControlState::Stopped);

    m.source_mut().push("180*");
    step_until(&mut m, ControlState::RunningProgram).await;
    assert_eq!(m.queue().iter().collect::<Vec<_>>(), vec![180]);
    m.step().await;
    assert!(m.speeds().is_zero());
}

#[tokio::test(start_paused = true)]
async fn poll_runs_whole_cycle_at_one_hertz() {
    let mut m = machine("0*");
    let mut seen = vec![m.state()];
    for _ in 0..6 {
        sleep(Duration::from_secs(1)).await;
        m.poll().await;
        if seen.last() != Some(&m.state()) {
            seen.push(m.state());
        }
    }
    assert_eq!(
        &seen[..5],
        &[
            ControlState::Stopped,
            ControlState::AwaitingCommands,
            ControlState::ReceivingCommands,
            ControlState::RunningProgram,
            ControlState::Stopped,
        ]
    );
}

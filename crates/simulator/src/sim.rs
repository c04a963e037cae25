//! Replay loop: trace → `MockGpio` → `ControlPoller` → channel → log.

use control::{
    ConfigError, ControlConfig, ControlInput, ControlPoller, EventChannel, PollStats,
    EVENT_QUEUE_DEPTH,
};
use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use embassy_time::{Duration, Ticker};
use platform::mocks::MockGpio;
use platform::{InputDevice, InputEvent};
use tracing::{debug, info, warn};

/// Everything the consumer saw, tagged with the tick it was drained on.
#[derive(Debug, Default)]
pub struct Report {
    pub events: Vec<(usize, InputEvent)>,
    pub stats: PollStats,
}

/// Poll once per trace sample and collect the resulting events.
///
/// With a `period`, ticks are paced in real time on an embassy ticker.
pub fn simulate(
    config: &ControlConfig,
    trace: &[u32],
    period: Option<Duration>,
) -> Result<Report, ConfigError> {
    let channel: EventChannel<NoopRawMutex, EVENT_QUEUE_DEPTH> = EventChannel::new();
    let mut input = ControlInput::new(&channel);
    let gpio = MockGpio::new(config.pins.idle_bank());
    let mut poller = ControlPoller::new(gpio, channel.sender(), config)?;
    let mut ticker = period.map(Ticker::every);

    let mut report = Report::default();
    for (tick, &bank) in trace.iter().enumerate() {
        if let Some(ticker) = ticker.as_mut() {
            embassy_futures::block_on(ticker.next());
        }
        if poller.gpio_mut().push(bank).is_err() {
            warn!(tick, "mock GPIO script full, sample skipped");
        }
        poller.poll();
        debug!(tick, bank, "poll");

        while let Some(event) = input.poll_event() {
            log_event(tick, &event);
            report.events.push((tick, event));
        }
    }

    report.stats = poller.stats();
    Ok(report)
}

fn log_event(tick: usize, event: &InputEvent) {
    match *event {
        InputEvent::ButtonTransition { button, edge } => {
            info!(tick, ?button, ?edge, "button");
        }
        InputEvent::ButtonRepeat { button } => info!(tick, ?button, "repeat"),
        InputEvent::EncoderStep { encoder, delta } => info!(tick, ?encoder, delta, "encoder"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::Scenario;
    use control::EncoderType;
    use platform::{Button, Edge, Encoder};

    fn events(config: &ControlConfig, scenario: &Scenario) -> Vec<InputEvent> {
        let trace = scenario.to_trace(config);
        simulate(config, &trace, None)
            .unwrap()
            .events
            .into_iter()
            .map(|(_, e)| e)
            .collect()
    }

    fn transition(button: Button, edge: Edge) -> InputEvent {
        InputEvent::ButtonTransition { button, edge }
    }

    fn step(encoder: Encoder, delta: i8) -> InputEvent {
        InputEvent::EncoderStep { encoder, delta }
    }

    #[test]
    fn demo_replays_every_gesture() {
        let config = ControlConfig::default();
        assert_eq!(
            events(&config, &Scenario::demo()),
            vec![
                transition(Button::Button1, Edge::Pressed),
                transition(Button::Button1, Edge::Released),
                step(Encoder::Encoder1, 1),
                step(Encoder::Encoder1, 1),
                step(Encoder::Encoder2, -1),
                transition(Button::EncoderButton1, Edge::Pressed),
                transition(Button::EncoderButton1, Edge::Released),
            ]
        );
    }

    #[test]
    fn reversed_flips_encoder_steps() {
        let config = ControlConfig::default().reversed(true);
        let steps: Vec<InputEvent> = events(&config, &Scenario::demo())
            .into_iter()
            .filter(|e| matches!(e, InputEvent::EncoderStep { .. }))
            .collect();
        assert_eq!(
            steps,
            vec![
                step(Encoder::Encoder1, -1),
                step(Encoder::Encoder1, -1),
                step(Encoder::Encoder2, 1),
            ]
        );
    }

    #[test]
    fn half_step_turns_still_count_detents() {
        let config = ControlConfig::default().encoder_type(EncoderType::Half);
        let scenario = Scenario::parse(
            r#"{ "steps": [ { "idle": 1 }, { "turn": { "encoder": "encoder2", "detents": 3 } } ] }"#,
        )
        .unwrap();
        assert_eq!(events(&config, &scenario), vec![step(Encoder::Encoder2, 1); 3]);
    }

    #[test]
    fn stats_cover_every_sample() {
        let config = ControlConfig::default();
        let trace = Scenario::demo().to_trace(&config);
        let report = simulate(&config, &trace, None).unwrap();
        assert_eq!(report.stats.ticks as usize, trace.len());
        assert_eq!(report.stats.read_errors, 0);
        assert_eq!(report.stats.dropped_events, 0);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = ControlConfig::default().repeat(5, 0);
        assert_eq!(
            simulate(&config, &[], None).unwrap_err(),
            ConfigError::ZeroRepeatInterval
        );
    }
}

#[cfg(test)]
mod core_test {
    use crate::config::Config;
    use crate::device_camera::interface::CameraError;
    use crate::live_detection::core::{
        init, transition, CameraState, Effect, Event, InFlight, Model, Phase, StreamState,
    };
    use crate::live_detection::tests::fixture::cat;
    use crate::object_detector::interface::DetectError;
    use std::time::{Duration, Instant};

    fn ms(t0: Instant, millis: u64) -> Instant {
        t0 + Duration::from_millis(millis)
    }

    fn start(config: &Config, t0: Instant) -> Model {
        let (model, _) = init();
        let (model, _) = transition(
            config,
            model,
            Event::SetStreaming {
                streaming: true,
                now: t0,
            },
        );
        let (model, _) = transition(config, model, Event::CameraStartDone(Ok(())));
        model
    }

    /// Feeds ticks every 50ms in `from..=to` and collects every effect produced.
    fn run_ticks(config: &Config, mut model: Model, t0: Instant, from: u64, to: u64) -> (Model, Vec<Effect>) {
        let mut all_effects = vec![];
        let mut at = from;
        while at <= to {
            let (new_model, effects) = transition(config, model, Event::Tick(ms(t0, at)));
            model = new_model;
            all_effects.extend(effects);
            at += 50;
        }
        (model, all_effects)
    }

    fn captures(effects: &[Effect]) -> usize {
        effects
            .iter()
            .filter(|e| matches!(e, Effect::CaptureFrame { .. }))
            .count()
    }

    #[test]
    fn test_init() {
        let (model, effects) = init();

        assert_eq!(model.stream, StreamState::Idle);
        assert_eq!(model.next_sample_at, None);
        assert!(!model.is_loading());
        assert_eq!(
            effects,
            vec![
                Effect::SubscribeTick,
                Effect::SubscribePreview,
                Effect::SubscribeDisplay
            ]
        );
    }

    #[test]
    fn test_start_streaming_acquires_camera_and_schedules_first_cycle() {
        let config = Config::default();
        let t0 = Instant::now();
        let (model, _) = init();

        let (model, effects) = transition(
            &config,
            model,
            Event::SetStreaming {
                streaming: true,
                now: t0,
            },
        );

        assert_eq!(model.stream, StreamState::Streaming);
        assert_eq!(model.camera, CameraState::Acquiring);
        assert_eq!(model.next_sample_at, Some(ms(t0, 2000)));
        assert_eq!(effects, vec![Effect::StartCamera]);

        let (model, effects) = transition(&config, model, Event::CameraStartDone(Ok(())));
        assert_eq!(model.camera, CameraState::Bound);
        assert!(effects.is_empty());
    }

    #[test]
    fn test_starting_twice_requests_the_camera_once() {
        let config = Config::default();
        let t0 = Instant::now();
        let model = start(&config, t0);

        let (model, effects) = transition(
            &config,
            model,
            Event::SetStreaming {
                streaming: true,
                now: ms(t0, 10),
            },
        );

        assert!(effects.is_empty());
        assert_eq!(model.next_sample_at, Some(ms(t0, 2000)));
    }

    #[test]
    fn test_toggle_on_then_off_releases_camera_and_cancels_timer() {
        let config = Config::default();
        let t0 = Instant::now();
        let (model, _) = init();

        let (model, effects) = transition(&config, model, Event::ToggleStreaming(t0));
        assert_eq!(effects, vec![Effect::StartCamera]);

        let (model, effects) = transition(&config, model, Event::ToggleStreaming(ms(t0, 500)));
        assert_eq!(effects, vec![Effect::StopCamera]);
        assert_eq!(model.stream, StreamState::Idle);
        assert_eq!(model.camera, CameraState::Released);
        assert_eq!(model.next_sample_at, None);
    }

    #[test]
    fn test_stop_while_idle_is_a_no_op() {
        let config = Config::default();
        let (model, _) = init();

        let (model, effects) = transition(
            &config,
            model,
            Event::SetStreaming {
                streaming: false,
                now: Instant::now(),
            },
        );

        assert_eq!(model.stream, StreamState::Idle);
        assert!(effects.is_empty());
    }

    #[test]
    fn test_first_cycle_fires_once_at_sample_rate() {
        let config = Config::default();
        let t0 = Instant::now();
        let model = start(&config, t0);

        let (model, effects) = run_ticks(&config, model, t0, 50, 1950);
        assert_eq!(captures(&effects), 0);

        let (model, effects) = run_ticks(&config, model, t0, 2000, 2000);
        assert_eq!(effects, vec![Effect::CaptureFrame { cycle: 1 }]);
        assert_eq!(model.next_sample_at, Some(ms(t0, 4000)));
    }

    #[test]
    fn test_stopping_before_first_cycle_fires_nothing() {
        let config = Config::default();
        let t0 = Instant::now();
        let model = start(&config, t0);

        let (model, effects) = run_ticks(&config, model, t0, 50, 950);
        assert_eq!(captures(&effects), 0);

        let (model, _) = transition(
            &config,
            model,
            Event::SetStreaming {
                streaming: false,
                now: ms(t0, 1000),
            },
        );
        let (_, effects) = run_ticks(&config, model, t0, 1050, 5000);

        assert_eq!(captures(&effects), 0);
    }

    #[test]
    fn test_full_cycle_stores_detections() {
        let config = Config::default();
        let t0 = Instant::now();
        let model = start(&config, t0);

        let (model, _) = transition(&config, model, Event::Tick(ms(t0, 2000)));
        let (model, effects) = transition(
            &config,
            model,
            Event::FrameCaptureDone {
                cycle: 1,
                result: Ok(Some("QUJD".to_string())),
            },
        );
        assert_eq!(
            effects,
            vec![Effect::Detect {
                cycle: 1,
                payload: "QUJD".to_string()
            }]
        );
        assert!(model.is_loading());

        let (model, effects) = transition(
            &config,
            model,
            Event::DetectDone {
                cycle: 1,
                result: Ok(vec![cat()]),
            },
        );

        assert!(effects.is_empty());
        assert!(!model.is_loading());
        assert_eq!(model.in_flight, None);
        assert_eq!(model.detections, vec![cat()]);
    }

    #[test]
    fn test_due_tick_is_skipped_while_a_request_is_in_flight() {
        let config = Config::default();
        let t0 = Instant::now();
        let model = start(&config, t0);

        let (model, _) = transition(&config, model, Event::Tick(ms(t0, 2000)));
        let (model, _) = transition(
            &config,
            model,
            Event::FrameCaptureDone {
                cycle: 1,
                result: Ok(Some("QUJD".to_string())),
            },
        );

        let (model, effects) = transition(&config, model, Event::Tick(ms(t0, 4000)));
        assert!(effects.is_empty());
        assert_eq!(
            model.in_flight,
            Some(InFlight {
                cycle: 1,
                phase: Phase::Detecting
            })
        );
        assert_eq!(model.next_sample_at, Some(ms(t0, 6000)));

        let (model, _) = transition(
            &config,
            model,
            Event::DetectDone {
                cycle: 1,
                result: Ok(vec![]),
            },
        );
        let (_, effects) = transition(&config, model, Event::Tick(ms(t0, 6000)));
        assert_eq!(effects, vec![Effect::CaptureFrame { cycle: 2 }]);
    }

    #[test]
    fn test_late_tick_does_not_fire_a_burst() {
        let config = Config::default();
        let t0 = Instant::now();
        let model = start(&config, t0);

        let (model, effects) = transition(&config, model, Event::Tick(ms(t0, 7000)));

        assert_eq!(captures(&effects), 1);
        assert_eq!(model.next_sample_at, Some(ms(t0, 8000)));
    }

    #[test]
    fn test_response_after_stop_is_discarded() {
        let config = Config::default();
        let t0 = Instant::now();
        let model = start(&config, t0);

        let (model, _) = transition(&config, model, Event::Tick(ms(t0, 2000)));
        let (model, _) = transition(
            &config,
            model,
            Event::FrameCaptureDone {
                cycle: 1,
                result: Ok(Some("QUJD".to_string())),
            },
        );
        let (model, _) = transition(&config, model, Event::ToggleStreaming(ms(t0, 2100)));

        let (model, effects) = transition(
            &config,
            model,
            Event::DetectDone {
                cycle: 1,
                result: Ok(vec![cat()]),
            },
        );

        assert!(effects.is_empty());
        assert!(model.detections.is_empty());
    }

    #[test]
    fn test_response_from_previous_session_is_discarded() {
        let config = Config::default();
        let t0 = Instant::now();
        let model = start(&config, t0);

        let (model, _) = transition(&config, model, Event::Tick(ms(t0, 2000)));
        let (model, _) = transition(
            &config,
            model,
            Event::FrameCaptureDone {
                cycle: 1,
                result: Ok(Some("QUJD".to_string())),
            },
        );
        let (model, _) = transition(&config, model, Event::ToggleStreaming(ms(t0, 2100)));
        let (model, _) = transition(&config, model, Event::ToggleStreaming(ms(t0, 2200)));
        let (model, _) = transition(&config, model, Event::CameraStartDone(Ok(())));
        let (model, effects) = transition(&config, model, Event::Tick(ms(t0, 4200)));
        assert_eq!(effects, vec![Effect::CaptureFrame { cycle: 2 }]);

        let (model, _) = transition(
            &config,
            model,
            Event::DetectDone {
                cycle: 1,
                result: Ok(vec![cat()]),
            },
        );

        assert!(model.detections.is_empty());
        assert_eq!(
            model.in_flight,
            Some(InFlight {
                cycle: 2,
                phase: Phase::Capturing
            })
        );
    }

    #[test]
    fn test_detect_error_keeps_previous_detections() {
        let config = Config::default();
        let t0 = Instant::now();
        let model = Model {
            detections: vec![cat()],
            ..start(&config, t0)
        };

        let (model, _) = transition(&config, model, Event::Tick(ms(t0, 2000)));
        let (model, _) = transition(
            &config,
            model,
            Event::FrameCaptureDone {
                cycle: 1,
                result: Ok(Some("QUJD".to_string())),
            },
        );
        let (model, effects) = transition(
            &config,
            model,
            Event::DetectDone {
                cycle: 1,
                result: Err(DetectError::Transport("connection reset".to_string())),
            },
        );

        assert!(effects.is_empty());
        assert_eq!(model.detections, vec![cat()]);
        assert_eq!(model.in_flight, None);
        assert!(model.last_error.unwrap().contains("connection reset"));
    }

    #[test]
    fn test_empty_result_replaces_previous_detections() {
        let config = Config::default();
        let t0 = Instant::now();
        let model = Model {
            detections: vec![cat()],
            ..start(&config, t0)
        };

        let (model, _) = transition(&config, model, Event::Tick(ms(t0, 2000)));
        let (model, _) = transition(
            &config,
            model,
            Event::FrameCaptureDone {
                cycle: 1,
                result: Ok(Some("QUJD".to_string())),
            },
        );
        let (model, _) = transition(
            &config,
            model,
            Event::DetectDone {
                cycle: 1,
                result: Ok(vec![]),
            },
        );

        assert!(model.detections.is_empty());
    }

    #[test]
    fn test_missing_frame_skips_cycle_silently() {
        let config = Config::default();
        let t0 = Instant::now();
        let model = start(&config, t0);

        let (model, _) = transition(&config, model, Event::Tick(ms(t0, 2000)));
        let (model, effects) = transition(
            &config,
            model,
            Event::FrameCaptureDone {
                cycle: 1,
                result: Ok(None),
            },
        );

        assert!(effects.is_empty());
        assert_eq!(model.in_flight, None);
        assert_eq!(model.last_error, None);
    }

    #[test]
    fn test_denied_camera_keeps_streaming_requested() {
        let config = Config::default();
        let t0 = Instant::now();
        let (model, _) = init();
        let (model, _) = transition(&config, model, Event::ToggleStreaming(t0));

        let (model, effects) = transition(
            &config,
            model,
            Event::CameraStartDone(Err(CameraError::PermissionDenied("denied".to_string()))),
        );

        assert!(effects.is_empty());
        assert_eq!(model.stream, StreamState::Streaming);
        assert!(matches!(model.camera, CameraState::Unavailable(_)));
        assert!(model.last_error.is_some());

        let (_, effects) = transition(&config, model, Event::Tick(ms(t0, 2000)));
        assert_eq!(effects, vec![Effect::CaptureFrame { cycle: 1 }]);
    }

    #[test]
    fn test_camera_granted_after_stop_is_released() {
        let config = Config::default();
        let t0 = Instant::now();
        let (model, _) = init();
        let (model, _) = transition(&config, model, Event::ToggleStreaming(t0));
        let (model, _) = transition(&config, model, Event::ToggleStreaming(ms(t0, 100)));

        let (model, effects) = transition(&config, model, Event::CameraStartDone(Ok(())));

        assert_eq!(effects, vec![Effect::StopCamera]);
        assert_eq!(model.camera, CameraState::Released);
    }

    #[test]
    fn test_closing_display_stops_camera_and_exits() {
        let config = Config::default();
        let model = start(&config, Instant::now());

        let (model, effects) = transition(&config, model, Event::DisplayClosed);

        assert_eq!(effects, vec![Effect::StopCamera, Effect::Exit]);
        assert_eq!(model.stream, StreamState::Idle);
    }

    #[test]
    fn test_closing_idle_display_only_exits() {
        let config = Config::default();
        let (model, _) = init();

        let (_, effects) = transition(&config, model, Event::DisplayClosed);

        assert_eq!(effects, vec![Effect::Exit]);
    }

    #[test]
    fn test_payload_is_not_logged_in_full() {
        let effect = Effect::Detect {
            cycle: 3,
            payload: "A".repeat(1000),
        };

        assert_eq!(
            effect.to_display_string(),
            "Detect { cycle: 3, payload: 1000 bytes }"
        );
    }
}

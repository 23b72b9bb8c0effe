use super::main::LiveDetection;
use crate::live_detection::core::{init, transition, Effect, Event};
use std::time::Instant;

impl LiveDetection {
    /// Runs the event loop until the display is closed.
    pub fn run(&self) {
        let (mut current_model, effects) = init();

        if self.config.start_streaming {
            self.send(Event::SetStreaming {
                streaming: true,
                now: Instant::now(),
            });
        }

        if let Err(e) = self.render(&current_model) {
            let _ = self.logger.error(&format!("Render failed: {}", e));
        }

        self.execute_effects(effects);

        while let Some(event) = self.recv() {
            // Ticks arrive many times per second and rarely change anything.
            let quiet = matches!(event, Event::Tick(_));
            let event_string = event.to_display_string();

            let (new_model, effects) = transition(&self.config, current_model.clone(), event);

            if !quiet || new_model != current_model {
                let _ = self.logger.info(&format!(
                    "\nevent:\n\t{}\n\nnew model:\n\t{:?}\n\neffects:\n\t{:?}",
                    event_string,
                    new_model,
                    effects
                        .iter()
                        .map(Effect::to_display_string)
                        .collect::<Vec<_>>(),
                ));
            }

            if new_model.detections != current_model.detections
                || new_model.status() != current_model.status()
            {
                if let Err(e) = self.render(&new_model) {
                    let _ = self.logger.error(&format!("Render failed: {}", e));
                }
            }

            current_model = new_model;

            if effects.contains(&Effect::Exit) {
                let remaining = effects.into_iter().filter(|e| *e != Effect::Exit);
                for effect in remaining {
                    self.execute_effect(effect);
                }
                let _ = self.logger.info("Shutting down");
                break;
            }

            self.execute_effects(effects);
        }
    }

    fn execute_effects(&self, effects: Vec<Effect>) {
        for effect in effects {
            let self_clone = self.clone();
            std::thread::spawn(move || self_clone.execute_effect(effect));
        }
    }
}

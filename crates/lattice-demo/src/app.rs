use winit::event::{ElementState, WindowEvent};
use winit::keyboard::{Key, NamedKey};

use lattice_engine::core::{App, AppControl, FrameCtx};

use crate::cli::DemoConfig;
use crate::scene::Scene;

pub struct DemoApp {
    config: DemoConfig,
    scene: Option<Scene>,
    error: Option<anyhow::Error>,
}

impl DemoApp {
    pub fn new(config: DemoConfig) -> Self {
        Self {
            config,
            scene: None,
            error: None,
        }
    }

    /// Turns a fatal rendering error recorded during the run into the
    /// process result.
    pub fn into_result(self) -> anyhow::Result<()> {
        match self.error {
            Some(err) => Err(err.context("rendering failed")),
            None => Ok(()),
        }
    }
}

fn is_escape(event: &WindowEvent) -> bool {
    match event {
        WindowEvent::KeyboardInput { event, .. } => {
            event.state == ElementState::Pressed
                && event.logical_key == Key::Named(NamedKey::Escape)
        }
        _ => false,
    }
}

impl App for DemoApp {
    fn on_window_event(&mut self, event: &WindowEvent) -> AppControl {
        if is_escape(event) {
            log::info!("escape pressed, exiting");
            return AppControl::Exit;
        }
        AppControl::Continue
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        let (config, scene, error) = (&self.config, &mut self.scene, &mut self.error);

        ctx.render(config.clear, |rctx, target| {
            let result = match scene {
                Some(scene) => scene.draw(rctx, target, config),
                None => Scene::new(rctx, config).and_then(|s| scene.insert(s).draw(rctx, target, config)),
            };

            match result {
                Ok(()) => AppControl::Continue,
                Err(err) => {
                    log::error!("{err:#}");
                    *error = Some(err);
                    AppControl::Exit
                }
            }
        })
    }
}

use anyhow::{Context, Result};
use ouroboros::self_referencing;

use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::core::{App as CoreApp, AppControl, FrameCtx, WindowCtx};
use crate::device::{Gpu, GpuInit};

/// When the runtime asks the window for a new frame.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum RedrawMode {
    /// Only after resizes, exposure and similar window events.
    #[default]
    OnDemand,
    /// Every loop iteration.
    Continuous,
}

/// Window/runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
    pub redraw: RedrawMode,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "lattice".to_string(),
            initial_size: LogicalSize::new(800.0, 600.0),
            redraw: RedrawMode::default(),
        }
    }
}

/// Entry point for the runtime.
pub struct Runtime;

impl Runtime {
    /// Opens one window, drives `app` until it exits or the window closes,
    /// and hands the app back.
    pub fn run<A>(config: RuntimeConfig, gpu_init: GpuInit, app: A) -> Result<A>
    where
        A: CoreApp + 'static,
    {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut state = AppState::new(config, gpu_init, app);

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        if let Some(err) = state.failure {
            return Err(err);
        }

        log::info!("runtime finished after {} frames", state.frame_index);
        Ok(state.app)
    }
}

#[self_referencing]
struct WindowEntry {
    window: Window,

    #[borrows(window)]
    #[covariant]
    gpu: Gpu<'this>,
}

struct AppState<A> {
    config: RuntimeConfig,
    gpu_init: GpuInit,
    app: A,

    window: Option<WindowEntry>,
    frame_index: u64,
    exit_requested: bool,
    failure: Option<anyhow::Error>,
}

impl<A> AppState<A>
where
    A: CoreApp + 'static,
{
    fn new(config: RuntimeConfig, gpu_init: GpuInit, app: A) -> Self {
        Self {
            config,
            gpu_init,
            app,
            window: None,
            frame_index: 0,
            exit_requested: false,
            failure: None,
        }
    }

    fn request_exit(&mut self, event_loop: &ActiveEventLoop) {
        self.exit_requested = true;
        event_loop.exit();
    }

    fn create_window_entry(&mut self, event_loop: &ActiveEventLoop) -> Result<WindowEntry> {
        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(self.config.initial_size);

        let window = event_loop
            .create_window(attrs)
            .context("failed to create window")?;

        let gpu_init = self.gpu_init.clone();

        let entry = WindowEntryTryBuilder {
            window,
            gpu_builder: |w| pollster::block_on(Gpu::new(w, gpu_init)),
        }
        .try_build()
        .context("GPU initialization failed for window")?;

        let size = entry.with_window(|w| w.inner_size());
        log::info!(
            "window `{}` created ({}x{} px)",
            self.config.title,
            size.width,
            size.height
        );
        Ok(entry)
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let (app, frame_index) = (&mut self.app, self.frame_index);
        let Some(entry) = self.window.as_mut() else {
            return;
        };

        let control = entry.with_mut(|fields| {
            let mut ctx = FrameCtx {
                window: WindowCtx {
                    window: fields.window,
                },
                gpu: fields.gpu,
                frame_index,
            };
            app.on_frame(&mut ctx)
        });

        self.frame_index += 1;

        if control == AppControl::Exit {
            self.request_exit(event_loop);
        }
    }
}

impl<A> ApplicationHandler for AppState<A>
where
    A: CoreApp + 'static,
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        match self.create_window_entry(event_loop) {
            Ok(entry) => {
                entry.with_window(|w| w.request_redraw());
                self.window = Some(entry);
            }
            Err(e) => {
                log::error!("failed to create window: {e:#}");
                self.failure = Some(e);
                self.request_exit(event_loop);
            }
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        event_loop.set_control_flow(ControlFlow::Wait);

        if self.config.redraw == RedrawMode::Continuous {
            if let Some(entry) = &self.window {
                entry.with_window(|w| w.request_redraw());
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        let is_ours = self
            .window
            .as_ref()
            .is_some_and(|entry| entry.with_window(|w| w.id()) == window_id);
        if !is_ours {
            return;
        }

        if self.app.on_window_event(&event) == AppControl::Exit {
            self.request_exit(event_loop);
            return;
        }

        match &event {
            WindowEvent::CloseRequested => {
                log::info!("window closed");
                self.window = None;
                self.request_exit(event_loop);
            }

            WindowEvent::Resized(new_size) => {
                if let Some(entry) = self.window.as_mut() {
                    entry.with_gpu_mut(|gpu| gpu.resize(*new_size));
                    entry.with_window(|w| w.request_redraw());
                }
            }

            WindowEvent::ScaleFactorChanged { .. } => {
                if let Some(entry) = self.window.as_mut() {
                    let new_size = entry.with_window(|w| w.inner_size());
                    entry.with_gpu_mut(|gpu| gpu.resize(new_size));
                    entry.with_window(|w| w.request_redraw());
                }
            }

            WindowEvent::RedrawRequested => self.redraw(event_loop),

            _ => {}
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        // Release the surface before the window goes away.
        self.window = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_demo_window() {
        let c = RuntimeConfig::default();
        assert_eq!(c.initial_size, LogicalSize::new(800.0, 600.0));
        assert_eq!(c.redraw, RedrawMode::OnDemand);
    }
}
